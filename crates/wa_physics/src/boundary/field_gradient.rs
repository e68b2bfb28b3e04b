// crates/wa_physics/src/boundary/field_gradient.rs

//! 基于场的梯度边界条件（`fieldBasedGradient`）
//!
//! 在固定梯度边界的基础上，每次 [`FieldGradientBoundary::update_coeffs`]
//! 从同一注册表中读取指定字段在边界相邻单元的内部值，乘以 `gradCoeff`
//! 作为该 patch 的法向梯度。常用于粗糙壁面处理。
//!
//! 字典格式：
//!
//! ```json
//! {
//!     "type": "fieldBasedGradient",
//!     "gradient": 0,
//!     "field": "U",
//!     "gradCoeff": 2.0
//! }
//! ```
//!
//! 被引用字段的值类型必须与本边界条件一致（标量对标量、向量对向量）。

use wa_config::Dictionary;

use super::error::BoundaryError;
use super::fixed_gradient::FixedGradientPatch;
use super::mapper::PatchFieldMapper;
use crate::fields::{FieldDb, FieldValue, VolField};
use crate::mesh::FvMesh;

/// 类型名
pub const TYPE_NAME: &str = "fieldBasedGradient";

/// 基于场的梯度边界条件
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGradientBoundary<T: FieldValue> {
    base: FixedGradientPatch<T>,
    internal_field: String,
    field_name: String,
    grad_coeff: f64,
}

impl<T: FieldValue> FieldGradientBoundary<T> {
    /// 零梯度、未指定源字段
    pub fn new(mesh: &FvMesh, patch: usize, internal: &VolField<T>) -> Self {
        Self {
            base: FixedGradientPatch::new(mesh, patch),
            internal_field: internal.name().to_string(),
            field_name: String::new(),
            grad_coeff: 0.0,
        }
    }

    /// 给定初始梯度值
    pub fn with_values(
        mesh: &FvMesh,
        patch: usize,
        internal: &VolField<T>,
        gradient: Vec<T>,
    ) -> Result<Self, BoundaryError> {
        Ok(Self {
            base: FixedGradientPatch::with_gradient(mesh, patch, gradient)?,
            internal_field: internal.name().to_string(),
            field_name: String::new(),
            grad_coeff: 0.0,
        })
    }

    /// 从字典构造，`gradient`、`field`、`gradCoeff` 均为必需项
    pub fn from_dict(
        mesh: &FvMesh,
        patch: usize,
        internal: &VolField<T>,
        dict: &Dictionary,
    ) -> Result<Self, BoundaryError> {
        let field_name = dict.get_word("field")?;
        let grad_coeff = dict.get_scalar("gradCoeff")?;
        let base = FixedGradientPatch::from_dict(mesh, patch, dict)?;
        log::debug!(
            "patch '{}': {TYPE_NAME} field={field_name} gradCoeff={grad_coeff}",
            base.patch_name()
        );
        Ok(Self {
            base,
            internal_field: internal.name().to_string(),
            field_name,
            grad_coeff,
        })
    }

    /// 设置源字段与系数
    pub fn with_source(mut self, field_name: impl Into<String>, grad_coeff: f64) -> Self {
        self.field_name = field_name.into();
        self.grad_coeff = grad_coeff;
        self
    }

    /// 按映射器重建到另一个 patch，保留源字段与系数
    pub fn mapped<M: PatchFieldMapper>(&self, mesh: &FvMesh, patch: usize, mapper: &M) -> Result<Self, BoundaryError> {
        Ok(Self {
            base: self.base.mapped(mesh, patch, mapper)?,
            internal_field: self.internal_field.clone(),
            field_name: self.field_name.clone(),
            grad_coeff: self.grad_coeff,
        })
    }

    /// 绑定到另一个内部场，保留源字段与系数
    pub fn rebind(&self, internal: &VolField<T>) -> Self {
        Self {
            internal_field: internal.name().to_string(),
            ..self.clone()
        }
    }

    /// 源字段名
    #[inline]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// 梯度系数
    #[inline]
    pub fn grad_coeff(&self) -> f64 {
        self.grad_coeff
    }

    /// 所绑定的内部场名
    #[inline]
    pub fn internal_field(&self) -> &str {
        &self.internal_field
    }

    /// 固定梯度基础部分
    #[inline]
    pub fn base(&self) -> &FixedGradientPatch<T> {
        &self.base
    }

    /// patch 索引
    #[inline]
    pub fn patch(&self) -> usize {
        self.base.patch()
    }

    /// 当前法向梯度
    #[inline]
    pub fn sn_grad(&self) -> &[T] {
        self.base.sn_grad()
    }

    /// 由源字段更新法向梯度：`grad_f = gradCoeff · field[cell(f)]`
    ///
    /// 只修改本 patch 的梯度数组。
    pub fn update_coeffs(&mut self, db: &FieldDb, mesh: &FvMesh) -> Result<(), BoundaryError> {
        let source = db
            .get::<T>(&self.field_name)
            .map_err(|e| BoundaryError::from_field(self.base.patch_name(), e))?;
        if source.len() != mesh.n_cells() {
            return Err(BoundaryError::SizeMismatch {
                patch: self.base.patch_name().to_string(),
                expected: mesh.n_cells(),
                actual: source.len(),
            });
        }
        let coeff = self.grad_coeff;
        let cells = mesh.patch_face_cells(self.base.patch());
        for (g, &cell) in self.base.gradient_mut().iter_mut().zip(cells) {
            *g = source.get(cell) * coeff;
        }
        Ok(())
    }

    /// 更新场的边界面值
    pub fn evaluate(&self, mesh: &FvMesh, field: &mut VolField<T>) {
        self.base.evaluate(mesh, field);
    }

    /// 写出配置
    pub fn write(&self) -> Dictionary {
        let mut dict = Dictionary::new().with("type", TYPE_NAME);
        self.base.write_entries(&mut dict);
        dict.set("field", self.field_name.as_str());
        dict.set("gradCoeff", self.grad_coeff);
        dict
    }
}
