// crates/wa_physics/src/boundary/mapper.rs

//! patch 面值映射
//!
//! 网格拓扑变化后，按寻址表把旧 patch 的面值搬到新 patch 上。

use crate::fields::FieldValue;

/// patch 面值映射器
pub trait PatchFieldMapper {
    /// 映射后的面数
    fn size(&self) -> usize;

    /// 映射面值
    fn map<T: FieldValue>(&self, values: &[T]) -> Vec<T>;
}

/// 直接寻址映射：`new[i] = old[addressing[i]]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMapper {
    addressing: Vec<usize>,
}

impl DirectMapper {
    /// 由寻址表创建
    pub fn new(addressing: Vec<usize>) -> Self {
        Self { addressing }
    }

    /// 恒等映射
    pub fn identity(n: usize) -> Self {
        Self::new((0..n).collect())
    }

    /// 寻址表
    pub fn addressing(&self) -> &[usize] {
        &self.addressing
    }
}

impl PatchFieldMapper for DirectMapper {
    fn size(&self) -> usize {
        self.addressing.len()
    }

    fn map<T: FieldValue>(&self, values: &[T]) -> Vec<T> {
        self.addressing
            .iter()
            .map(|&i| values.get(i).copied().unwrap_or_else(T::zero))
            .collect()
    }
}
