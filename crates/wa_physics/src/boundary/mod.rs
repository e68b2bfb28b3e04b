// crates/wa_physics/src/boundary/mod.rs

//! 边界条件
//!
//! - [`fixed_gradient`]: 固定法向梯度基础实现
//! - [`field_gradient`]: 由其他字段乘系数给出梯度的 `fieldBasedGradient`
//! - [`scalar_bc`]: 标量场 patch 条件的枚举分派与集合
//! - [`mapper`]: 拓扑变化时的面值映射

pub mod error;
pub mod field_gradient;
pub mod fixed_gradient;
pub mod mapper;
pub mod scalar_bc;

pub use error::BoundaryError;
pub use field_gradient::FieldGradientBoundary;
pub use fixed_gradient::FixedGradientPatch;
pub use mapper::{DirectMapper, PatchFieldMapper};
pub use scalar_bc::{ScalarBoundaryCondition, ScalarBoundaryField};
