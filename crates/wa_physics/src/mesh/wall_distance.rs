// crates/wa_physics/src/mesh/wall_distance.rs

//! 壁面距离
//!
//! 对每个单元求到最近固壁面中心的距离（暴力搜索，O(N_cell · N_wall)）。
//! 湍流模型以只读借用方式持有该场。

use glam::DVec3;

use wa_foundation::{WaError, WaResult, GREAT};

use super::fv_mesh::FvMesh;
use crate::numerics::map_cells;

/// 单元壁面距离场
#[derive(Debug, Clone, PartialEq)]
pub struct WallDistance {
    y: Vec<f64>,
}

impl WallDistance {
    /// 按 patch 类型（`PatchKind::Wall`）收集固壁并计算
    ///
    /// 网格没有固壁时所有单元的距离为 `GREAT`。
    pub fn compute(mesh: &FvMesh) -> Self {
        let walls: Vec<usize> = mesh
            .patches()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.kind.is_wall())
            .map(|(i, _)| i)
            .collect();
        Self::compute_for_patches(mesh, &walls)
    }

    /// 指定 patch 集合作为固壁计算
    pub fn compute_for_patches(mesh: &FvMesh, wall_patches: &[usize]) -> Self {
        let wall_faces: Vec<DVec3> = wall_patches
            .iter()
            .flat_map(|&p| mesh.patch(p).faces())
            .map(|f| mesh.face_centre(f))
            .collect();

        if wall_faces.is_empty() {
            log::debug!("网格无固壁, 壁面距离取 GREAT");
            return Self {
                y: vec![GREAT; mesh.n_cells()],
            };
        }

        let nearest = |cell: usize| -> f64 {
            let c = mesh.cell_centre(cell);
            wall_faces
                .iter()
                .map(|w| (*w - c).length())
                .fold(GREAT, f64::min)
        };

        Self {
            y: map_cells(mesh.n_cells(), nearest),
        }
    }

    /// 直接给定距离值
    pub fn from_values(mesh: &FvMesh, y: Vec<f64>) -> WaResult<Self> {
        if y.len() != mesh.n_cells() {
            return Err(WaError::size_mismatch("wall distance", mesh.n_cells(), y.len()));
        }
        if y.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(WaError::invalid_input("壁面距离必须为非负有限值"));
        }
        Ok(Self { y })
    }

    /// 单元壁面距离
    #[inline]
    pub fn y(&self, cell: usize) -> f64 {
        self.y[cell]
    }

    /// 全部距离
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.y
    }

    /// 单元数
    #[inline]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PatchKind;

    #[test]
    fn test_channel_distance() {
        // y 方向两侧为壁面，高度 2
        let kinds = [
            PatchKind::Patch,
            PatchKind::Patch,
            PatchKind::Wall,
            PatchKind::Wall,
            PatchKind::Patch,
            PatchKind::Patch,
        ];
        let mesh = FvMesh::cartesian_box([1, 4, 1], DVec3::new(1.0, 2.0, 1.0), kinds).unwrap();
        let wd = WallDistance::compute(&mesh);
        assert!((wd.y(0) - 0.25).abs() < 1e-12);
        assert!((wd.y(1) - 0.75).abs() < 1e-12);
        assert!((wd.y(2) - 0.75).abs() < 1e-12);
        assert!((wd.y(3) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_no_walls() {
        let mesh = FvMesh::cartesian_box([2, 2, 2], DVec3::ONE, [PatchKind::Patch; 6]).unwrap();
        let wd = WallDistance::compute(&mesh);
        assert!(wd.values().iter().all(|&d| d == GREAT));
    }

    #[test]
    fn test_from_values_checks_size() {
        let mesh = FvMesh::cartesian_box([2, 1, 1], DVec3::ONE, [PatchKind::Patch; 6]).unwrap();
        assert!(WallDistance::from_values(&mesh, vec![0.1]).is_err());
        assert!(WallDistance::from_values(&mesh, vec![0.1, -1.0]).is_err());
        assert!(WallDistance::from_values(&mesh, vec![0.1, 0.2]).is_ok());
    }
}
