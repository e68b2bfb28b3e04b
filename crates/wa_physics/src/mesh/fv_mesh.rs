// crates/wa_physics/src/mesh/fv_mesh.rs

//! 三维有限体积网格
//!
//! 采用 owner/neighbour 面寻址：
//!
//! - 内部面编号在前 `[0, n_internal_faces)`，满足 `owner < neighbour`
//! - 边界面按 patch 连续存放在其后
//! - 面积向量 `Sf` 指向 owner 外侧，模长为面积
//!
//! 网格只存储几何与拓扑，不持有任何物理场。

use glam::DVec3;
use serde::{Deserialize, Serialize};

use wa_foundation::{WaError, WaResult, VSMALL};

/// 边界 patch 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PatchKind {
    /// 一般边界（入口、出口等）
    #[default]
    Patch,
    /// 固壁（参与壁面距离计算）
    Wall,
    /// 对称面
    Symmetry,
}

impl PatchKind {
    /// 是否为固壁
    #[inline]
    pub fn is_wall(&self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// 边界 patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// 名称
    pub name: String,
    /// 类型
    pub kind: PatchKind,
    /// 第一个面的全局编号
    pub start: usize,
    /// 面数
    pub size: usize,
}

impl Patch {
    /// 全局面编号范围
    #[inline]
    pub fn faces(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.size
    }
}

/// 笛卡尔盒子的六个侧面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSide {
    /// x 最小侧
    XMin,
    /// x 最大侧
    XMax,
    /// y 最小侧
    YMin,
    /// y 最大侧
    YMax,
    /// z 最小侧
    ZMin,
    /// z 最大侧
    ZMax,
}

impl BoxSide {
    /// 全部侧面（patch 顺序）
    pub const ALL: [BoxSide; 6] = [
        BoxSide::XMin,
        BoxSide::XMax,
        BoxSide::YMin,
        BoxSide::YMax,
        BoxSide::ZMin,
        BoxSide::ZMax,
    ];

    /// 默认 patch 名
    pub fn default_name(&self) -> &'static str {
        match self {
            Self::XMin => "xMin",
            Self::XMax => "xMax",
            Self::YMin => "yMin",
            Self::YMax => "yMax",
            Self::ZMin => "zMin",
            Self::ZMax => "zMax",
        }
    }
}

/// 有限体积网格
#[derive(Debug, Clone)]
pub struct FvMesh {
    cell_centres: Vec<DVec3>,
    cell_volumes: Vec<f64>,
    face_centres: Vec<DVec3>,
    face_areas: Vec<DVec3>,
    owner: Vec<usize>,
    neighbour: Vec<usize>,
    patches: Vec<Patch>,
    cell_faces: Vec<Vec<usize>>,
}

impl FvMesh {
    /// 从原始几何与寻址构造
    ///
    /// `neighbour` 的长度即内部面数；边界面必须被 `patches` 完整覆盖。
    pub fn from_components(
        cell_centres: Vec<DVec3>,
        cell_volumes: Vec<f64>,
        face_centres: Vec<DVec3>,
        face_areas: Vec<DVec3>,
        owner: Vec<usize>,
        neighbour: Vec<usize>,
        patches: Vec<Patch>,
    ) -> WaResult<Self> {
        let n_cells = cell_centres.len();
        let n_faces = face_centres.len();

        if cell_volumes.len() != n_cells {
            return Err(WaError::size_mismatch("cell_volumes", n_cells, cell_volumes.len()));
        }
        if face_areas.len() != n_faces {
            return Err(WaError::size_mismatch("face_areas", n_faces, face_areas.len()));
        }
        if owner.len() != n_faces {
            return Err(WaError::size_mismatch("owner", n_faces, owner.len()));
        }
        if neighbour.len() > n_faces {
            return Err(WaError::invalid_mesh("内部面数超过总面数"));
        }
        if let Some(v) = cell_volumes.iter().find(|v| **v <= VSMALL) {
            return Err(WaError::invalid_mesh(format!("单元体积非正: {v}")));
        }

        let mut expected_start = neighbour.len();
        for patch in &patches {
            if patch.start != expected_start {
                return Err(WaError::invalid_mesh(format!(
                    "patch '{}' 起始面 {} 不连续 (期望 {})",
                    patch.name, patch.start, expected_start
                )));
            }
            expected_start += patch.size;
        }
        if expected_start != n_faces {
            return Err(WaError::invalid_mesh("边界 patch 未覆盖全部边界面"));
        }

        let mut cell_faces = vec![Vec::new(); n_cells];
        for (face, &own) in owner.iter().enumerate() {
            if own >= n_cells {
                return Err(WaError::invalid_mesh(format!("面 {face} 的 owner 越界")));
            }
            cell_faces[own].push(face);
        }
        for (face, &nei) in neighbour.iter().enumerate() {
            if nei >= n_cells || nei <= owner[face] {
                return Err(WaError::invalid_mesh(format!(
                    "内部面 {face} 的 neighbour 无效 (owner={}, neighbour={nei})",
                    owner[face]
                )));
            }
            cell_faces[nei].push(face);
        }

        Ok(Self {
            cell_centres,
            cell_volumes,
            face_centres,
            face_areas,
            owner,
            neighbour,
            patches,
            cell_faces,
        })
    }

    /// 均匀笛卡尔盒子网格
    ///
    /// patch 顺序为 `xMin, xMax, yMin, yMax, zMin, zMax`，`kinds` 依此顺序给出类型。
    pub fn cartesian_box(n: [usize; 3], lengths: DVec3, kinds: [PatchKind; 6]) -> WaResult<Self> {
        let axis = |count: usize, length: f64| -> Vec<f64> {
            (0..=count)
                .map(|i| length * i as f64 / count.max(1) as f64)
                .collect()
        };
        Self::from_axis_nodes(
            &axis(n[0], lengths.x),
            &axis(n[1], lengths.y),
            &axis(n[2], lengths.z),
            kinds,
        )
    }

    /// 由三个方向的节点坐标构造结构化盒子网格（可非均匀）
    pub fn from_axis_nodes(
        xs: &[f64],
        ys: &[f64],
        zs: &[f64],
        kinds: [PatchKind; 6],
    ) -> WaResult<Self> {
        for (name, nodes) in [("x", xs), ("y", ys), ("z", zs)] {
            if nodes.len() < 2 {
                return Err(WaError::invalid_mesh(format!("{name} 方向至少需要两个节点")));
            }
            if nodes.windows(2).any(|w| w[1] <= w[0]) {
                return Err(WaError::invalid_mesh(format!("{name} 方向节点坐标必须严格递增")));
            }
        }

        let (nx, ny, nz) = (xs.len() - 1, ys.len() - 1, zs.len() - 1);
        let cell = |i: usize, j: usize, k: usize| i + nx * (j + ny * k);
        let mid = |nodes: &[f64], i: usize| 0.5 * (nodes[i] + nodes[i + 1]);
        let width = |nodes: &[f64], i: usize| nodes[i + 1] - nodes[i];

        let n_cells = nx * ny * nz;
        let mut cell_centres = Vec::with_capacity(n_cells);
        let mut cell_volumes = Vec::with_capacity(n_cells);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    cell_centres.push(DVec3::new(mid(xs, i), mid(ys, j), mid(zs, k)));
                    cell_volumes.push(width(xs, i) * width(ys, j) * width(zs, k));
                }
            }
        }

        let mut face_centres = Vec::new();
        let mut face_areas = Vec::new();
        let mut owner = Vec::new();
        let mut neighbour = Vec::new();

        // 内部面：x, y, z 方向依次
        for k in 0..nz {
            for j in 0..ny {
                for i in 1..nx {
                    face_centres.push(DVec3::new(xs[i], mid(ys, j), mid(zs, k)));
                    face_areas.push(DVec3::X * width(ys, j) * width(zs, k));
                    owner.push(cell(i - 1, j, k));
                    neighbour.push(cell(i, j, k));
                }
            }
        }
        for k in 0..nz {
            for j in 1..ny {
                for i in 0..nx {
                    face_centres.push(DVec3::new(mid(xs, i), ys[j], mid(zs, k)));
                    face_areas.push(DVec3::Y * width(xs, i) * width(zs, k));
                    owner.push(cell(i, j - 1, k));
                    neighbour.push(cell(i, j, k));
                }
            }
        }
        for k in 1..nz {
            for j in 0..ny {
                for i in 0..nx {
                    face_centres.push(DVec3::new(mid(xs, i), mid(ys, j), zs[k]));
                    face_areas.push(DVec3::Z * width(xs, i) * width(ys, j));
                    owner.push(cell(i, j, k - 1));
                    neighbour.push(cell(i, j, k));
                }
            }
        }

        let mut patches = Vec::with_capacity(6);
        for (side, kind) in BoxSide::ALL.into_iter().zip(kinds) {
            let start = face_centres.len();
            match side {
                BoxSide::XMin | BoxSide::XMax => {
                    let (i, x, sign) = if side == BoxSide::XMin {
                        (0, xs[0], -1.0)
                    } else {
                        (nx - 1, xs[nx], 1.0)
                    };
                    for k in 0..nz {
                        for j in 0..ny {
                            face_centres.push(DVec3::new(x, mid(ys, j), mid(zs, k)));
                            face_areas.push(DVec3::X * sign * width(ys, j) * width(zs, k));
                            owner.push(cell(i, j, k));
                        }
                    }
                }
                BoxSide::YMin | BoxSide::YMax => {
                    let (j, y, sign) = if side == BoxSide::YMin {
                        (0, ys[0], -1.0)
                    } else {
                        (ny - 1, ys[ny], 1.0)
                    };
                    for k in 0..nz {
                        for i in 0..nx {
                            face_centres.push(DVec3::new(mid(xs, i), y, mid(zs, k)));
                            face_areas.push(DVec3::Y * sign * width(xs, i) * width(zs, k));
                            owner.push(cell(i, j, k));
                        }
                    }
                }
                BoxSide::ZMin | BoxSide::ZMax => {
                    let (k, z, sign) = if side == BoxSide::ZMin {
                        (0, zs[0], -1.0)
                    } else {
                        (nz - 1, zs[nz], 1.0)
                    };
                    for j in 0..ny {
                        for i in 0..nx {
                            face_centres.push(DVec3::new(mid(xs, i), mid(ys, j), z));
                            face_areas.push(DVec3::Z * sign * width(xs, i) * width(ys, j));
                            owner.push(cell(i, j, k));
                        }
                    }
                }
            }
            patches.push(Patch {
                name: side.default_name().to_string(),
                kind,
                start,
                size: face_centres.len() - start,
            });
        }

        Self::from_components(
            cell_centres,
            cell_volumes,
            face_centres,
            face_areas,
            owner,
            neighbour,
            patches,
        )
    }

    /// 重命名 patch
    pub fn rename_patch(&mut self, old: &str, new: impl Into<String>) -> WaResult<()> {
        let idx = self
            .patch_index(old)
            .ok_or_else(|| WaError::not_found(format!("patch '{old}'")))?;
        self.patches[idx].name = new.into();
        Ok(())
    }

    // =========================================================================
    // 基本统计
    // =========================================================================

    /// 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cell_centres.len()
    }

    /// 总面数
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.face_centres.len()
    }

    /// 内部面数
    #[inline]
    pub fn n_internal_faces(&self) -> usize {
        self.neighbour.len()
    }

    // =========================================================================
    // 几何
    // =========================================================================

    /// 单元中心
    #[inline]
    pub fn cell_centre(&self, cell: usize) -> DVec3 {
        self.cell_centres[cell]
    }

    /// 单元体积
    #[inline]
    pub fn cell_volume(&self, cell: usize) -> f64 {
        self.cell_volumes[cell]
    }

    /// 全部单元体积
    #[inline]
    pub fn cell_volumes(&self) -> &[f64] {
        &self.cell_volumes
    }

    /// 面中心
    #[inline]
    pub fn face_centre(&self, face: usize) -> DVec3 {
        self.face_centres[face]
    }

    /// 面积向量（指向 owner 外侧）
    #[inline]
    pub fn face_area_vector(&self, face: usize) -> DVec3 {
        self.face_areas[face]
    }

    /// 面积
    #[inline]
    pub fn face_area(&self, face: usize) -> f64 {
        self.face_areas[face].length()
    }

    /// 单位法向
    #[inline]
    pub fn face_normal(&self, face: usize) -> DVec3 {
        self.face_areas[face].normalize_or_zero()
    }

    /// 面的 owner 单元
    #[inline]
    pub fn face_owner(&self, face: usize) -> usize {
        self.owner[face]
    }

    /// 面的 neighbour 单元（边界面为 None）
    #[inline]
    pub fn face_neighbour(&self, face: usize) -> Option<usize> {
        self.neighbour.get(face).copied()
    }

    /// 单元关联的面
    #[inline]
    pub fn cell_faces(&self, cell: usize) -> &[usize] {
        &self.cell_faces[cell]
    }

    /// 内部面线性插值权重（owner 侧）
    ///
    /// `φ_f = w φ_O + (1 - w) φ_N`
    pub fn interpolation_weight(&self, face: usize) -> f64 {
        let Some(nei) = self.face_neighbour(face) else {
            return 1.0;
        };
        let n = self.face_normal(face);
        let d_own = n.dot(self.face_centres[face] - self.cell_centres[self.owner[face]]).abs();
        let d_nei = n.dot(self.cell_centres[nei] - self.face_centres[face]).abs();
        let total = d_own + d_nei;
        if total < VSMALL {
            0.5
        } else {
            d_nei / total
        }
    }

    /// 面扩散系数 δ = 1 / |n·d|
    ///
    /// 内部面取 owner 到 neighbour 中心距离，边界面取 owner 中心到面中心距离。
    pub fn delta_coeff(&self, face: usize) -> f64 {
        let n = self.face_normal(face);
        let d = match self.face_neighbour(face) {
            Some(nei) => self.cell_centres[nei] - self.cell_centres[self.owner[face]],
            None => self.face_centres[face] - self.cell_centres[self.owner[face]],
        };
        1.0 / n.dot(d).abs().max(VSMALL)
    }

    /// 单元中心到各面中心的最大距离（`maxDeltaxyz` 的基础尺度）
    pub fn max_delta_xyz(&self, cell: usize) -> f64 {
        let c = self.cell_centres[cell];
        self.cell_faces[cell]
            .iter()
            .map(|&f| (self.face_centres[f] - c).length())
            .fold(0.0, f64::max)
    }

    // =========================================================================
    // 边界
    // =========================================================================

    /// 全部 patch
    #[inline]
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// 按索引获取 patch
    #[inline]
    pub fn patch(&self, index: usize) -> &Patch {
        &self.patches[index]
    }

    /// patch 数
    #[inline]
    pub fn n_patches(&self) -> usize {
        self.patches.len()
    }

    /// 按名称查找 patch 索引
    pub fn patch_index(&self, name: &str) -> Option<usize> {
        self.patches.iter().position(|p| p.name == name)
    }

    /// patch 面的相邻单元
    pub fn patch_face_cells(&self, patch: usize) -> &[usize] {
        &self.owner[self.patches[patch].faces()]
    }

    /// patch 面的扩散系数
    pub fn patch_delta_coeffs(&self, patch: usize) -> Vec<f64> {
        self.patches[patch]
            .faces()
            .map(|f| self.delta_coeff(f))
            .collect()
    }

    /// 边界面所属 patch 与局部编号
    pub fn which_patch(&self, face: usize) -> Option<(usize, usize)> {
        self.patches
            .iter()
            .enumerate()
            .find(|(_, p)| p.faces().contains(&face))
            .map(|(i, p)| (i, face - p.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(n: [usize; 3]) -> FvMesh {
        FvMesh::cartesian_box(n, DVec3::ONE, [PatchKind::Patch; 6]).unwrap()
    }

    #[test]
    fn test_box_counts() {
        let mesh = unit_box([3, 2, 1]);
        assert_eq!(mesh.n_cells(), 6);
        // 内部面: x 2*2*1 + y 3*1*1 + z 0
        assert_eq!(mesh.n_internal_faces(), 7);
        assert_eq!(mesh.n_patches(), 6);
        let boundary: usize = mesh.patches().iter().map(|p| p.size).sum();
        assert_eq!(boundary, 2 * (2 * 1 + 3 * 1 + 3 * 2));
        assert_eq!(mesh.n_faces(), 7 + boundary);
    }

    #[test]
    fn test_closed_cells() {
        let mesh = unit_box([3, 3, 2]);
        for cell in 0..mesh.n_cells() {
            let mut sum = DVec3::ZERO;
            for &f in mesh.cell_faces(cell) {
                let sf = mesh.face_area_vector(f);
                sum += if mesh.face_owner(f) == cell { sf } else { -sf };
            }
            assert!(sum.length() < 1e-12, "单元 {cell} 不闭合: {sum:?}");
        }
    }

    #[test]
    fn test_volumes_sum() {
        let mesh = FvMesh::cartesian_box([4, 5, 2], DVec3::new(2.0, 1.0, 0.5), [PatchKind::Wall; 6])
            .unwrap();
        let total: f64 = mesh.cell_volumes().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_delta_xyz_uniform() {
        let mesh = FvMesh::cartesian_box([2, 2, 2], DVec3::splat(2.0), [PatchKind::Patch; 6])
            .unwrap();
        // 单元边长 1，中心到面中心距离 0.5
        for cell in 0..mesh.n_cells() {
            assert!((mesh.max_delta_xyz(cell) - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_weights_and_deltas() {
        let mesh = FvMesh::from_axis_nodes(
            &[0.0, 1.0, 3.0],
            &[0.0, 1.0],
            &[0.0, 1.0],
            [PatchKind::Patch; 6],
        )
        .unwrap();
        // 中心 0.5 和 2.0，面在 1.0
        let w = mesh.interpolation_weight(0);
        assert!((w - 1.0 / 1.5).abs() < 1e-12);
        assert!((mesh.delta_coeff(0) - 1.0 / 1.5).abs() < 1e-12);

        let xmin = mesh.patch_index("xMin").unwrap();
        let deltas = mesh.patch_delta_coeffs(xmin);
        assert!((deltas[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_nodes() {
        let result = FvMesh::from_axis_nodes(&[0.0, 0.0], &[0.0, 1.0], &[0.0, 1.0], [PatchKind::Patch; 6]);
        assert!(result.is_err());
    }

    #[test]
    fn test_which_patch() {
        let mesh = unit_box([2, 2, 1]);
        let ymax = mesh.patch_index("yMax").unwrap();
        let face = mesh.patch(ymax).start + 1;
        assert_eq!(mesh.which_patch(face), Some((ymax, 1)));
        assert_eq!(mesh.which_patch(0), None);
    }
}
