// crates/wa_physics/src/mesh/mod.rs

//! 网格与几何
//!
//! - [`FvMesh`]: owner/neighbour 寻址的三维有限体积网格
//! - [`WallDistance`]: 单元到最近固壁的距离

pub mod fv_mesh;
pub mod wall_distance;

pub use fv_mesh::{BoxSide, FvMesh, Patch, PatchKind};
pub use wall_distance::WallDistance;
