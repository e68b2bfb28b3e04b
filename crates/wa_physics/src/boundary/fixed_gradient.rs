// crates/wa_physics/src/boundary/fixed_gradient.rs

//! 固定法向梯度边界
//!
//! 边界面值由相邻单元值外推：
//!
//! ```text
//! x_p = x_c + ∇⊥x / Δ
//! ```
//!
//! 其中 `∇⊥x` 为给定的法向梯度，`Δ` 为面中心到单元中心法向距离的倒数。

use wa_config::Dictionary;

use super::error::BoundaryError;
use super::mapper::PatchFieldMapper;
use crate::fields::{parse_patch_values, patch_values_to_json, FieldValue, VolField};
use crate::mesh::FvMesh;
use crate::numerics::BoundaryCoeffs;

/// 固定梯度 patch
#[derive(Debug, Clone, PartialEq)]
pub struct FixedGradientPatch<T: FieldValue> {
    patch: usize,
    patch_name: String,
    gradient: Vec<T>,
}

impl<T: FieldValue> FixedGradientPatch<T> {
    /// 零梯度初值
    pub fn new(mesh: &FvMesh, patch: usize) -> Self {
        Self {
            patch,
            patch_name: mesh.patch(patch).name.clone(),
            gradient: vec![T::zero(); mesh.patch(patch).size],
        }
    }

    /// 给定逐面梯度
    pub fn with_gradient(mesh: &FvMesh, patch: usize, gradient: Vec<T>) -> Result<Self, BoundaryError> {
        let mut bc = Self::new(mesh, patch);
        if gradient.len() != bc.gradient.len() {
            return Err(BoundaryError::SizeMismatch {
                patch: bc.patch_name,
                expected: mesh.patch(patch).size,
                actual: gradient.len(),
            });
        }
        bc.gradient = gradient;
        Ok(bc)
    }

    /// 从字典读取（`gradient` 必需）
    pub fn from_dict(mesh: &FvMesh, patch: usize, dict: &Dictionary) -> Result<Self, BoundaryError> {
        let value = dict
            .get_value("gradient")
            .ok_or_else(|| wa_config::ConfigError::Missing("gradient".into()))?;
        let gradient = parse_patch_values::<T>("gradient", value, mesh.patch(patch).size)?;
        Ok(Self {
            patch,
            patch_name: mesh.patch(patch).name.clone(),
            gradient,
        })
    }

    /// 按映射器重建到另一个 patch
    pub fn mapped<M: PatchFieldMapper>(&self, mesh: &FvMesh, patch: usize, mapper: &M) -> Result<Self, BoundaryError> {
        Self::with_gradient(mesh, patch, mapper.map(&self.gradient))
    }

    /// patch 索引
    #[inline]
    pub fn patch(&self) -> usize {
        self.patch
    }

    /// patch 名
    #[inline]
    pub fn patch_name(&self) -> &str {
        &self.patch_name
    }

    /// 面数
    #[inline]
    pub fn size(&self) -> usize {
        self.gradient.len()
    }

    /// 法向梯度
    #[inline]
    pub fn gradient(&self) -> &[T] {
        &self.gradient
    }

    /// 可变法向梯度
    #[inline]
    pub fn gradient_mut(&mut self) -> &mut [T] {
        &mut self.gradient
    }

    /// 法向梯度（与 [`Self::gradient`] 相同）
    #[inline]
    pub fn sn_grad(&self) -> &[T] {
        &self.gradient
    }

    /// 计算边界面值 `x_c + g / Δ`
    pub fn face_values(&self, mesh: &FvMesh, internal: &VolField<T>) -> Vec<T> {
        let deltas = mesh.patch_delta_coeffs(self.patch);
        mesh.patch_face_cells(self.patch)
            .iter()
            .zip(&self.gradient)
            .zip(deltas)
            .map(|((&cell, &g), delta)| internal.get(cell) + g * (1.0 / delta))
            .collect()
    }

    /// 更新场的边界面值
    pub fn evaluate(&self, mesh: &FvMesh, field: &mut VolField<T>) {
        let values = self.face_values(mesh, field);
        field.boundary_mut(self.patch).copy_from_slice(&values);
    }

    /// 写出 `gradient` 条目
    pub fn write_entries(&self, dict: &mut Dictionary) {
        dict.set("gradient", patch_values_to_json(&self.gradient));
    }
}

impl FixedGradientPatch<f64> {
    /// 输运方程的线性化边界系数
    pub fn coeffs(&self, mesh: &FvMesh) -> BoundaryCoeffs {
        BoundaryCoeffs::fixed_gradient(&self.gradient, &mesh.patch_delta_coeffs(self.patch))
    }
}
