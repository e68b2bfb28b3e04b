// crates/wa_physics/src/boundary/scalar_bc.rs

//! 标量场边界条件
//!
//! [`ScalarBoundaryCondition`] 用枚举分派四种 patch 条件：
//!
//! | 类型名 | 必需键 |
//! |--------|--------|
//! | `fixedValue` | `value` |
//! | `zeroGradient` | 无 |
//! | `fixedGradient` | `gradient` |
//! | `fieldBasedGradient` | `gradient`, `field`, `gradCoeff` |
//!
//! [`ScalarBoundaryField`] 为一个标量场的全部 patch 持有条件，
//! 负责更新系数、刷新边界面值，并向输运方程提供线性化系数。

use wa_config::Dictionary;

use super::error::BoundaryError;
use super::field_gradient::{self, FieldGradientBoundary};
use super::fixed_gradient::FixedGradientPatch;
use crate::fields::{parse_patch_values, patch_values_to_json, FieldDb, VolField};
use crate::mesh::FvMesh;
use crate::numerics::BoundaryCoeffs;

/// 单个 patch 的标量边界条件
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarBoundaryCondition {
    /// 固定值
    FixedValue {
        /// patch 索引
        patch: usize,
        /// 逐面值
        values: Vec<f64>,
    },
    /// 零梯度
    ZeroGradient {
        /// patch 索引
        patch: usize,
    },
    /// 固定梯度
    FixedGradient(FixedGradientPatch<f64>),
    /// 基于场的梯度
    FieldBasedGradient(FieldGradientBoundary<f64>),
}

impl ScalarBoundaryCondition {
    /// 均匀固定值
    pub fn fixed_value(mesh: &FvMesh, patch: usize, value: f64) -> Self {
        Self::FixedValue {
            patch,
            values: vec![value; mesh.patch(patch).size],
        }
    }

    /// 零梯度
    pub fn zero_gradient(patch: usize) -> Self {
        Self::ZeroGradient { patch }
    }

    /// 从字典构造（按 `type` 分派）
    pub fn from_dict(
        mesh: &FvMesh,
        patch: usize,
        internal: &VolField<f64>,
        dict: &Dictionary,
    ) -> Result<Self, BoundaryError> {
        let type_name = dict.get_word("type")?;
        match type_name.as_str() {
            "fixedValue" => {
                let value = dict
                    .get_value("value")
                    .ok_or_else(|| wa_config::ConfigError::Missing("value".into()))?;
                let values = parse_patch_values("value", value, mesh.patch(patch).size)?;
                Ok(Self::FixedValue { patch, values })
            }
            "zeroGradient" => Ok(Self::ZeroGradient { patch }),
            "fixedGradient" => Ok(Self::FixedGradient(FixedGradientPatch::from_dict(mesh, patch, dict)?)),
            field_gradient::TYPE_NAME => Ok(Self::FieldBasedGradient(FieldGradientBoundary::from_dict(
                mesh, patch, internal, dict,
            )?)),
            _ => Err(BoundaryError::UnknownType {
                patch: mesh.patch(patch).name.clone(),
                type_name,
            }),
        }
    }

    /// 类型名
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::FixedValue { .. } => "fixedValue",
            Self::ZeroGradient { .. } => "zeroGradient",
            Self::FixedGradient(_) => "fixedGradient",
            Self::FieldBasedGradient(_) => field_gradient::TYPE_NAME,
        }
    }

    /// patch 索引
    pub fn patch(&self) -> usize {
        match self {
            Self::FixedValue { patch, .. } | Self::ZeroGradient { patch } => *patch,
            Self::FixedGradient(bc) => bc.patch(),
            Self::FieldBasedGradient(bc) => bc.patch(),
        }
    }

    /// 更新依赖外部字段的系数
    pub fn update_coeffs(&mut self, db: &FieldDb, mesh: &FvMesh) -> Result<(), BoundaryError> {
        if let Self::FieldBasedGradient(bc) = self {
            bc.update_coeffs(db, mesh)?;
        }
        Ok(())
    }

    /// 刷新边界面值
    pub fn evaluate(&self, mesh: &FvMesh, field: &mut VolField<f64>) {
        match self {
            Self::FixedValue { patch, values } => {
                field.boundary_mut(*patch).copy_from_slice(values);
            }
            Self::ZeroGradient { patch } => {
                let values: Vec<f64> = mesh
                    .patch_face_cells(*patch)
                    .iter()
                    .map(|&c| field.get(c))
                    .collect();
                field.boundary_mut(*patch).copy_from_slice(&values);
            }
            Self::FixedGradient(bc) => bc.evaluate(mesh, field),
            Self::FieldBasedGradient(bc) => bc.evaluate(mesh, field),
        }
    }

    /// 输运方程的线性化系数
    pub fn coeffs(&self, mesh: &FvMesh) -> BoundaryCoeffs {
        match self {
            Self::FixedValue { patch, values } => {
                BoundaryCoeffs::fixed_value(values, &mesh.patch_delta_coeffs(*patch))
            }
            Self::ZeroGradient { patch } => BoundaryCoeffs::zero_gradient(mesh.patch(*patch).size),
            Self::FixedGradient(bc) => bc.coeffs(mesh),
            Self::FieldBasedGradient(bc) => bc.base().coeffs(mesh),
        }
    }

    /// 写出配置
    pub fn write(&self) -> Dictionary {
        match self {
            Self::FixedValue { values, .. } => Dictionary::new()
                .with("type", self.type_name())
                .with("value", patch_values_to_json(values)),
            Self::ZeroGradient { .. } => Dictionary::new().with("type", self.type_name()),
            Self::FixedGradient(bc) => {
                let mut dict = Dictionary::new().with("type", self.type_name());
                bc.write_entries(&mut dict);
                dict
            }
            Self::FieldBasedGradient(bc) => bc.write(),
        }
    }
}

/// 一个标量场全部 patch 的边界条件
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarBoundaryField {
    conditions: Vec<ScalarBoundaryCondition>,
}

impl ScalarBoundaryField {
    /// 按 patch 类型生成默认条件：壁面固定值 `wall_value`，其余零梯度
    pub fn wall_default(mesh: &FvMesh, wall_value: f64) -> Self {
        let conditions = mesh
            .patches()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if p.kind.is_wall() {
                    ScalarBoundaryCondition::fixed_value(mesh, i, wall_value)
                } else {
                    ScalarBoundaryCondition::zero_gradient(i)
                }
            })
            .collect();
        Self { conditions }
    }

    /// 在默认条件上按字典覆盖
    ///
    /// 字典键为 patch 名，值为条件字典；未列出的 patch 保持默认。
    pub fn from_dict(
        mesh: &FvMesh,
        internal: &VolField<f64>,
        dict: &Dictionary,
        wall_value: f64,
    ) -> Result<Self, BoundaryError> {
        let mut field = Self::wall_default(mesh, wall_value);
        for name in dict.keys() {
            let patch = mesh
                .patch_index(name)
                .ok_or_else(|| BoundaryError::UnknownPatch(name.to_string()))?;
            let entry = dict.sub_dict(name)?;
            field.conditions[patch] = ScalarBoundaryCondition::from_dict(mesh, patch, internal, &entry)?;
        }
        Ok(field)
    }

    /// 替换某个 patch 的条件
    pub fn set(&mut self, condition: ScalarBoundaryCondition) -> Result<(), BoundaryError> {
        let patch = condition.patch();
        let slot = self
            .conditions
            .get_mut(patch)
            .ok_or_else(|| BoundaryError::UnknownPatch(format!("#{patch}")))?;
        *slot = condition;
        Ok(())
    }

    /// patch 条件，编号越界时为 None
    pub fn get(&self, patch: usize) -> Option<&ScalarBoundaryCondition> {
        self.conditions.get(patch)
    }

    /// 全部条件
    pub fn conditions(&self) -> &[ScalarBoundaryCondition] {
        &self.conditions
    }

    /// 更新全部条件的系数
    pub fn update_coeffs(&mut self, db: &FieldDb, mesh: &FvMesh) -> Result<(), BoundaryError> {
        for bc in &mut self.conditions {
            bc.update_coeffs(db, mesh)?;
        }
        Ok(())
    }

    /// 刷新全部边界面值
    pub fn evaluate(&self, mesh: &FvMesh, field: &mut VolField<f64>) {
        for bc in &self.conditions {
            bc.evaluate(mesh, field);
        }
    }

    /// 全部 patch 的线性化系数
    pub fn coeffs(&self, mesh: &FvMesh) -> Vec<BoundaryCoeffs> {
        self.conditions.iter().map(|bc| bc.coeffs(mesh)).collect()
    }

    /// 写出为 `{ patchName: {...} }`
    pub fn write(&self, mesh: &FvMesh) -> Dictionary {
        let mut dict = Dictionary::new();
        for bc in &self.conditions {
            dict.set_dict(mesh.patch(bc.patch()).name.clone(), bc.write());
        }
        dict
    }
}
