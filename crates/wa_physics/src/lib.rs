// crates/wa_physics/src/lib.rs

//! Wray-Agarwal Physics Layer
//!
//! 物理层，实现 Wray-Agarwal 单方程湍流闭合及其 RANS/LES 混合变体，
//! 以及 `fieldBasedGradient` 边界条件。
//!
//! # 模块概览
//!
//! - [`mesh`]: 有限体积网格与壁面距离
//! - [`fields`]: 体心场、面心场与字段注册表
//! - [`numerics`]: 梯度、稀疏线性代数与标量输运方程
//! - [`boundary`]: 边界条件
//! - [`turbulence`]: 湍流模型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: wa_cli        ─> 组装算例，驱动 correct()
//! Layer 3: wa_physics    ─> 网格、场、数值方法、湍流模型 (本层)
//! Layer 2: wa_config     ─> Dictionary, TurbulenceProperties
//! Layer 1: wa_foundation ─> WaError, 数值下限
//! ```
//!
//! # 示例
//!
//! ```
//! use glam::DVec3;
//! use wa_physics::fields::{FieldDb, SurfaceScalarField, VolField};
//! use wa_physics::mesh::{FvMesh, PatchKind, WallDistance};
//! use wa_physics::turbulence::{ClosureKind, FlowInputs, ModelBuilder};
//!
//! let mut kinds = [PatchKind::Patch; 6];
//! kinds[2] = PatchKind::Wall;
//! let mesh = FvMesh::cartesian_box([4, 4, 1], DVec3::ONE, kinds).unwrap();
//! let wd = WallDistance::compute(&mesh);
//!
//! let u = VolField::uniform("U", &mesh, DVec3::X);
//! let phi = SurfaceScalarField::flux("phi", &mesh, &u);
//! let mut db = FieldDb::new();
//! db.insert(u).unwrap();
//!
//! let mut model = ModelBuilder::new(&mesh, &wd)
//!     .kind(ClosureKind::WrayAgarwal2017)
//!     .initial_rnu(3e-5)
//!     .build()
//!     .unwrap();
//! model.correct(&FlowInputs::new(&db, &phi, 1e-5, 0.1)).unwrap();
//! assert!(model.rnu().min() >= 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod fields;
pub mod mesh;
pub mod numerics;
pub mod turbulence;

/// 层级标识
pub const LAYER: u8 = 3;

// 重导出核心类型
pub use boundary::{BoundaryError, FieldGradientBoundary, ScalarBoundaryField};
pub use fields::{FieldDb, SurfaceScalarField, VolField};
pub use mesh::{FvMesh, PatchKind, WallDistance};
pub use turbulence::{new_model, ClosureKind, FlowInputs, ModelBuilder, TurbulenceError, WrayAgarwalModel};
