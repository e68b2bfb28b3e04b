// crates/wa_physics/src/turbulence/hybrid.rs

//! RANS/LES 混合区域场
//!
//! 每次 `correct()` 先调用 [`HybridFields::calc_fdes`]，再调用
//! [`HybridFields::calc_blend_factors`]：
//!
//! - `fdes`: DES 指示量，第二耗散项乘以 `1 / max(fdes, SMALL)`。
//!   WA2017DES 中 `fdes = min(CDES Δ / L_RANS, 1)`，等于 1 即 RANS；
//!   WA2017DESDIT 中 `fdes` 是未截断的比值 `CDES Δ / L_RANS`，可大于 1，
//!   不再表示区域，区域只看 `blendFactor`（全场为 LES）
//! - `outDelta`: 滤波尺度 Δ（输出用）
//! - `blendFactor`: RANS 单元为 1，LES 单元为 0
//! - 面混合因子：`blendFactor` 线性插值到面，边界面取 owner 值，
//!   每个输运量一份，供外部离散按面切换格式

use wa_foundation::SMALL;

use super::capability::{ClosureCapability, HybridScale};
use crate::fields::{SurfaceScalarField, VolField};
use crate::mesh::FvMesh;
use crate::numerics::map_cells;

/// 使用面混合因子的输运量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendedQuantity {
    /// 速度
    Velocity,
    /// 涡粘性代理量
    Rnu,
    /// 压力
    Pressure,
    /// 湍动能
    KineticEnergy,
    /// 耗散率
    DissipationRate,
    /// 焓
    Enthalpy,
}

impl BlendedQuantity {
    /// 全部输运量（存储顺序）
    pub const ALL: [BlendedQuantity; 6] = [
        BlendedQuantity::Velocity,
        BlendedQuantity::Rnu,
        BlendedQuantity::Pressure,
        BlendedQuantity::KineticEnergy,
        BlendedQuantity::DissipationRate,
        BlendedQuantity::Enthalpy,
    ];

    /// 对应字段名后缀
    pub fn field_suffix(&self) -> &'static str {
        match self {
            Self::Velocity => "U",
            Self::Rnu => "Rnu",
            Self::Pressure => "p",
            Self::KineticEnergy => "K",
            Self::DissipationRate => "e",
            Self::Enthalpy => "h",
        }
    }

    /// 面场名 `blendFactor<suffix>`
    pub fn field_name(&self) -> String {
        format!("blendFactor{}", self.field_suffix())
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// 混合模型的区域场
#[derive(Debug, Clone)]
pub struct HybridFields {
    max_delta: Vec<f64>,
    fdes: VolField<f64>,
    out_delta: VolField<f64>,
    blend_factor: VolField<f64>,
    face_blend: Vec<SurfaceScalarField>,
}

impl HybridFields {
    /// 创建（初始全部为 RANS）
    pub fn new(mesh: &FvMesh) -> Self {
        Self {
            max_delta: (0..mesh.n_cells()).map(|c| mesh.max_delta_xyz(c)).collect(),
            fdes: VolField::uniform("fdes", mesh, 1.0),
            out_delta: VolField::uniform("outDelta", mesh, 0.0),
            blend_factor: VolField::uniform("blendFactor", mesh, 1.0),
            face_blend: BlendedQuantity::ALL
                .iter()
                .map(|q| SurfaceScalarField::uniform(q.field_name(), mesh, 1.0))
                .collect(),
        }
    }

    /// 计算 fdes、Δ 与单元区域标记
    pub fn calc_fdes<C: ClosureCapability + Sync>(
        &mut self,
        mesh: &FvMesh,
        capability: &C,
        rnu: &[f64],
        strain: &[f64],
    ) {
        let max_delta = &self.max_delta;
        let scales: Vec<HybridScale> = map_cells(mesh.n_cells(), |c| {
            capability
                .hybrid_length_scale(rnu[c], strain[c], max_delta[c])
                .unwrap_or(HybridScale {
                    delta: max_delta[c],
                    fdes: 1.0,
                    les: false,
                })
        });

        for (c, scale) in scales.iter().enumerate() {
            self.fdes.internal_mut()[c] = scale.fdes;
            self.out_delta.internal_mut()[c] = scale.delta;
            self.blend_factor.internal_mut()[c] = if scale.les { 0.0 } else { 1.0 };
        }
        self.fdes.correct_boundary_from_owner(mesh);
        self.out_delta.correct_boundary_from_owner(mesh);
        self.blend_factor.correct_boundary_from_owner(mesh);

        let n_les = scales.iter().filter(|s| s.les).count();
        log::debug!("DES: {n_les}/{} 个单元处于 LES 区", mesh.n_cells());
    }

    /// 将区域标记插值到面
    pub fn calc_blend_factors(&mut self, mesh: &FvMesh) {
        let values: Vec<f64> = (0..mesh.n_faces())
            .map(|f| self.blend_factor.face_value(mesh, f))
            .collect();
        for field in &mut self.face_blend {
            field.values_mut().copy_from_slice(&values);
        }
    }

    /// 第二耗散项乘子 `1 / max(fdes, SMALL)`
    #[inline]
    pub fn destruction_multiplier(&self, cell: usize) -> f64 {
        1.0 / self.fdes.get(cell).max(SMALL)
    }

    /// DES 指示量（DIT 变体为未截断的 LES 比值，见模块说明）
    pub fn fdes(&self) -> &VolField<f64> {
        &self.fdes
    }

    /// 滤波尺度
    pub fn out_delta(&self) -> &VolField<f64> {
        &self.out_delta
    }

    /// 区域标记（RANS = 1, LES = 0）
    pub fn blend_factor(&self) -> &VolField<f64> {
        &self.blend_factor
    }

    /// 某输运量的面混合因子
    pub fn face_blend(&self, quantity: BlendedQuantity) -> &SurfaceScalarField {
        &self.face_blend[quantity.index()]
    }

    /// LES 区域标记（LES = 1, RANS = 0）
    pub fn les_region(&self) -> VolField<f64> {
        let mut region = self.blend_factor.clone().with_name("LESRegion");
        region.internal_mut().iter_mut().for_each(|b| *b = 1.0 - *b);
        for p in 0..region.n_patches() {
            region.boundary_mut(p).iter_mut().for_each(|b| *b = 1.0 - *b);
        }
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PatchKind;
    use crate::turbulence::capability::ClosureFlavor;
    use crate::turbulence::coeffs::DesCoeffs;
    use glam::DVec3;

    fn mesh() -> FvMesh {
        FvMesh::cartesian_box([4, 1, 1], DVec3::new(4.0, 1.0, 1.0), [PatchKind::Patch; 6]).unwrap()
    }

    #[test]
    fn test_mixed_regions_and_faces() {
        let mesh = mesh();
        let mut hybrid = HybridFields::new(&mesh);
        let flavor = ClosureFlavor::Des(DesCoeffs::default());
        // 单元 0、1 的 L_RANS 大（LES），单元 2、3 小（RANS）
        let rnu = vec![100.0, 100.0, 1e-6, 1e-6];
        let strain = vec![1.0; 4];
        hybrid.calc_fdes(&mesh, &flavor, &rnu, &strain);
        hybrid.calc_blend_factors(&mesh);

        assert_eq!(hybrid.blend_factor().internal(), &[0.0, 0.0, 1.0, 1.0]);
        let les = hybrid.les_region();
        assert_eq!(les.internal(), &[1.0, 1.0, 0.0, 0.0]);
        assert_eq!(les.name(), "LESRegion");

        // 内部面 1 位于单元 1 与 2 之间
        let faces = hybrid.face_blend(BlendedQuantity::Pressure);
        assert!((faces.value(1) - 0.5).abs() < 1e-12);
        assert_eq!(faces.value(0), 0.0);
        for q in BlendedQuantity::ALL {
            assert_eq!(hybrid.face_blend(q).values(), faces.values());
        }

        // 边界面取 owner 值
        let xmax = mesh.patch_index("xMax").unwrap();
        let face = mesh.patch(xmax).start;
        assert_eq!(faces.value(face), 1.0);
    }

    #[test]
    fn test_multiplier() {
        let mesh = mesh();
        let mut hybrid = HybridFields::new(&mesh);
        let flavor = ClosureFlavor::Des(DesCoeffs::default());
        hybrid.calc_fdes(&mesh, &flavor, &[100.0; 4], &[1.0; 4]);
        for c in 0..4 {
            let fdes = hybrid.fdes().get(c);
            assert!(fdes < 1.0);
            assert!((hybrid.destruction_multiplier(c) - 1.0 / fdes).abs() < 1e-12);
            // Δ = 2 · 0.5
            assert!((hybrid.out_delta().get(c) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(BlendedQuantity::Velocity.field_name(), "blendFactorU");
        assert_eq!(BlendedQuantity::Enthalpy.field_name(), "blendFactorh");
    }
}
