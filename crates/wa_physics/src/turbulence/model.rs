// crates/wa_physics/src/turbulence/model.rs

//! Wray-Agarwal 单方程湍流模型
//!
//! 求解涡粘性代理量 R（`Rnu`）的输运方程：
//!
//! ```text
//! ∂R/∂t + ∇·(φR) − ∇·((σR R + ν)∇R)
//!     = C1 R S + f1 C2kw (R/S) ∇R·∇S − (1 − f1) D₂
//!
//! D₂ = C2ke R² |∇S|² / S²
//! ```
//!
//! 涡粘性：
//!
//! ```text
//! νt = fμ R,  fμ = χ³ / (χ³ + Cw³),  χ = R / ν
//! ```
//!
//! 四种变体的差异由 [`ClosureFlavor`] 提供，见 [`super::capability`]。
//!
//! # 每步顺序
//!
//! 1. 由 ∇U 计算 S（下限 `SMALL`）
//! 2. 更新 R 的边界条件系数
//! 3. 重新计算 f1；混合模型：`calc_fdes` → `calc_blend_factors`
//! 4. 混合系数，计算 ∇R、∇S 与 D₂，组装并求解
//! 5. R 截断为非负，写回全部场，刷新边界值
//! 6. 更新 νt
//!
//! 第 5 步之前的任何错误都不改变模型状态。

use glam::DVec3;
use serde::Serialize;

use wa_config::{Dictionary, TurbulenceProperties};
use wa_foundation::{clamp_valid, safe_div, sqr, WaError, SMALL, VSMALL};

use super::capability::{BlendedCoeffs, ClosureCapability, ClosureFlavor};
use super::coeffs::WrayAgarwalCoeffs;
use super::error::{TurbulenceError, TurbulenceResult};
use super::hybrid::{BlendedQuantity, HybridFields};
use super::kind::ClosureKind;
use crate::boundary::ScalarBoundaryField;
use crate::fields::{FieldDb, SurfaceScalarField, VolField};
use crate::mesh::{FvMesh, WallDistance};
use crate::numerics::linear_algebra::{SolverConfig, SolverResult};
use crate::numerics::{green_gauss_scalar, map_cells, strain_rate_field, ScalarTransportMatrix};

/// 每步由外部流场提供的输入
#[derive(Debug, Clone, Copy)]
pub struct FlowInputs<'f> {
    /// 同一区域的字段注册表（速度场与边界条件的源字段）
    pub fields: &'f FieldDb,
    /// 面体积通量
    pub phi: &'f SurfaceScalarField,
    /// 分子运动粘度 ν
    pub nu: f64,
    /// 时间步长
    pub dt: f64,
}

impl<'f> FlowInputs<'f> {
    /// 创建
    pub fn new(fields: &'f FieldDb, phi: &'f SurfaceScalarField, nu: f64, dt: f64) -> Self {
        Self { fields, phi, nu, dt }
    }

    fn validate(&self) -> TurbulenceResult<()> {
        if !(self.nu > 0.0 && self.nu.is_finite()) {
            return Err(WaError::invalid_input(format!("分子粘度必须为正: {}", self.nu)).into());
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(WaError::invalid_input(format!("时间步长必须为正: {}", self.dt)).into());
        }
        Ok(())
    }
}

/// 一步求解的统计
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CorrectionStats {
    /// 线性求解迭代次数
    pub iterations: usize,
    /// 线性求解是否收敛
    pub converged: bool,
    /// 截断为零的单元数
    pub clipped_cells: usize,
    /// LES 单元数（纯 RANS 模型为 0）
    pub les_cells: usize,
    /// R 最小值
    pub rnu_min: f64,
    /// R 最大值
    pub rnu_max: f64,
    /// νt 最大值
    pub nut_max: f64,
}

/// Wray-Agarwal 模型
///
/// 网格与壁面距离由调用方持有，模型只读借用。
#[derive(Debug, Clone)]
pub struct WrayAgarwalModel<'a> {
    pub(super) mesh: &'a FvMesh,
    pub(super) wall_distance: &'a WallDistance,
    pub(super) kind: ClosureKind,
    pub(super) flavor: ClosureFlavor,
    pub(super) coeffs: WrayAgarwalCoeffs,
    pub(super) rnu: VolField<f64>,
    pub(super) rnu_bcs: ScalarBoundaryField,
    pub(super) f1: VolField<f64>,
    pub(super) strain: VolField<f64>,
    pub(super) nut: VolField<f64>,
    pub(super) hybrid: Option<HybridFields>,
    pub(super) solver: SolverConfig,
    pub(super) velocity_name: String,
    pub(super) d2_unbounded: Vec<f64>,
    pub(super) d2_applied: Vec<f64>,
    pub(super) last_stats: Option<CorrectionStats>,
}

impl<'a> WrayAgarwalModel<'a> {
    /// 推进一个时间步
    ///
    /// 所有中间量先在局部计算，线性求解成功后才写回模型；
    /// 返回错误时模型状态保持调用前的值。
    pub fn correct(&mut self, flow: &FlowInputs<'_>) -> TurbulenceResult<CorrectionStats> {
        flow.validate()?;
        let mesh = self.mesh;
        let n_cells = mesh.n_cells();
        let nu = flow.nu;

        // 应变率
        let u = flow.fields.vector(&self.velocity_name)?;
        u.check_mesh(mesh)?;
        let mut strain_field = self.strain.clone();
        for (s, raw) in strain_field.internal_mut().iter_mut().zip(strain_rate_field(mesh, u)) {
            *s = clamp_valid(raw, SMALL, f64::MAX, SMALL);
        }
        strain_field.correct_boundary_from_owner(mesh);

        // 边界条件（源字段缺失时在此返回）
        let mut rnu_bcs = self.rnu_bcs.clone();
        rnu_bcs.update_coeffs(flow.fields, mesh)?;
        let bcs = rnu_bcs.coeffs(mesh);

        // 混合函数
        let rnu_old: Vec<f64> = self.rnu.internal().iter().map(|r| r.max(0.0)).collect();
        let flavor = self.flavor;
        let wall_distance = self.wall_distance;
        let strain = strain_field.internal();
        let f1 = map_cells(n_cells, |c| {
            flavor.blend_weight(rnu_old[c], strain[c], wall_distance.y(c), nu)
        });

        let mut hybrid = self.hybrid.clone();
        if let Some(hybrid) = hybrid.as_mut() {
            hybrid.calc_fdes(mesh, &flavor, &rnu_old, strain);
            hybrid.calc_blend_factors(mesh);
        }

        // 混合系数与各源项系数
        let coeffs = self.coeffs;
        let blended: Vec<BlendedCoeffs> = f1.iter().map(|&f| flavor.blend_coefficients(&coeffs, f)).collect();
        let grad_r: Vec<DVec3> = green_gauss_scalar(mesh, &self.rnu);
        let grad_s: Vec<DVec3> = green_gauss_scalar(mesh, &strain_field);

        let mut d2_unbounded = vec![0.0; n_cells];
        let mut d2_applied = vec![0.0; n_cells];
        let mut production = vec![0.0; n_cells];
        let mut cross = vec![0.0; n_cells];
        let mut destruction = vec![0.0; n_cells];
        for c in 0..n_cells {
            let r = rnu_old[c];
            let s = strain[c];
            let b = &blended[c];

            let unbounded = b.c2ke * sqr(r) * grad_s[c].length_squared() / sqr(s);
            let bounded = flavor
                .destruction_bound(unbounded, grad_r[c].length_squared())
                .unwrap_or(unbounded);
            let multiplier = hybrid.as_ref().map_or(1.0, |h| h.destruction_multiplier(c));
            let applied = bounded * multiplier;
            d2_unbounded[c] = unbounded;
            d2_applied[c] = applied;

            production[c] = b.c1 * s;
            cross[c] = f1[c] * b.c2kw * grad_r[c].dot(grad_s[c]) / s;
            destruction[c] = -safe_div((1.0 - f1[c]) * applied, r, 0.0);
        }

        let gamma = self.face_diffusivity(&blended, nu);

        let mut eqn = ScalarTransportMatrix::new(mesh);
        eqn.ddt_euler(flow.dt, &rnu_old)?
            .div_upwind(flow.phi, &bcs)?
            .laplacian(&gamma, &bcs)?
            .su_sp(&production, &rnu_old)?
            .su_sp(&cross, &rnu_old)?
            .sp(&destruction)?;

        let mut psi = rnu_old;
        let result: SolverResult = eqn.solve(&mut psi, self.solver, self.rnu.name())?;

        let mut clipped_cells = 0;
        for r in &mut psi {
            if r.is_nan() || *r < 0.0 {
                *r = 0.0;
                clipped_cells += 1;
            }
        }
        if clipped_cells > 0 {
            log::debug!("Rnu: {clipped_cells} 个单元截断为零");
        }

        // 提交
        self.f1.internal_mut().copy_from_slice(&f1);
        self.f1.correct_boundary_from_owner(mesh);
        self.strain = strain_field;
        self.hybrid = hybrid;
        self.d2_unbounded = d2_unbounded;
        self.d2_applied = d2_applied;
        self.rnu_bcs = rnu_bcs;
        self.rnu.internal_mut().copy_from_slice(&psi);
        self.rnu_bcs.evaluate(mesh, &mut self.rnu);

        self.correct_nut(nu);

        let stats = CorrectionStats {
            iterations: result.iterations,
            converged: result.is_converged(),
            clipped_cells,
            les_cells: self
                .hybrid
                .as_ref()
                .map_or(0, |h| h.blend_factor().internal().iter().filter(|&&b| b < 0.5).count()),
            rnu_min: self.rnu.min(),
            rnu_max: self.rnu.max(),
            nut_max: self.nut.max(),
        };
        self.last_stats = Some(stats);
        Ok(stats)
    }

    /// 逐面扩散系数 σR R + ν
    ///
    /// 边界面使用 owner 的 σR 与 R 的边界值。
    fn face_diffusivity(&self, blended: &[BlendedCoeffs], nu: f64) -> Vec<f64> {
        let mesh = self.mesh;
        let internal: Vec<f64> = blended
            .iter()
            .zip(self.rnu.internal())
            .map(|(b, &r)| b.sigma * r.max(0.0) + nu)
            .collect();
        let mut gamma = VolField::uniform("DRnuEff", mesh, nu);
        gamma.internal_mut().copy_from_slice(&internal);
        for p in 0..mesh.n_patches() {
            let rb = self.rnu.boundary(p);
            for (local, (g, &cell)) in gamma
                .boundary_mut(p)
                .iter_mut()
                .zip(mesh.patch_face_cells(p))
                .enumerate()
            {
                *g = blended[cell].sigma * rb[local].max(0.0) + nu;
            }
        }
        (0..mesh.n_faces()).map(|f| gamma.face_value(mesh, f)).collect()
    }

    /// 由当前 R 更新 νt（内部值与边界值）
    pub fn correct_nut(&mut self, nu: f64) {
        let cw3 = self.coeffs.cw.powi(3);
        let nu = nu.max(VSMALL);
        let f_mu = |r: f64| {
            let r = r.max(0.0);
            let chi3 = (r / nu).powi(3);
            safe_div(chi3, chi3 + cw3, 0.0) * r
        };
        for (nut, &r) in self.nut.internal_mut().iter_mut().zip(self.rnu.internal()) {
            *nut = f_mu(r);
        }
        for p in 0..self.mesh.n_patches() {
            for (nut, &r) in self.nut.boundary_mut(p).iter_mut().zip(self.rnu.boundary(p)) {
                *nut = f_mu(r);
            }
        }
    }

    /// 重新读取湍流属性
    ///
    /// 源文件内容变化时更新系数并返回 `true`；内容未变时返回 `false`。
    pub fn read(&mut self, props: &mut TurbulenceProperties) -> TurbulenceResult<bool> {
        if !props.reload()? {
            return Ok(false);
        }
        self.apply_properties(props)
    }

    /// 按属性更新系数，返回是否有系数变化
    pub fn apply_properties(&mut self, props: &TurbulenceProperties) -> TurbulenceResult<bool> {
        let requested = props.model_name()?;
        if requested != self.kind.type_name() {
            return Err(TurbulenceError::KindMismatch {
                current: self.kind.type_name().to_string(),
                requested,
            });
        }
        let coeffs = WrayAgarwalCoeffs::from_dict(&props.coeffs_dict(self.kind.type_name())?)?;
        let flavor = ClosureFlavor::from_properties(self.kind, props)?;
        let changed = coeffs != self.coeffs || flavor != self.flavor;
        if changed {
            log::info!("{}: 模型系数已更新", self.kind);
            self.coeffs = coeffs;
            self.flavor = flavor;
        }
        Ok(changed)
    }

    /// 写出当前系数块 `<Model>Coeffs`
    pub fn write_coeffs(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        self.coeffs.write_into(&mut dict);
        match self.flavor {
            ClosureFlavor::Bounded { cm } => {
                dict.set("Cm", cm);
            }
            ClosureFlavor::Des(des) | ClosureFlavor::DesDit(des) => {
                dict.set("CDES", des.cdes);
            }
            ClosureFlavor::Rans => {}
        }
        dict
    }

    /// LES 区域标记（LES = 1），纯 RANS 模型为 None
    pub fn les_region(&self) -> Option<VolField<f64>> {
        self.hybrid.as_ref().map(HybridFields::les_region)
    }

    /// 模型种类
    pub fn kind(&self) -> ClosureKind {
        self.kind
    }

    /// 模型变体
    pub fn flavor(&self) -> &ClosureFlavor {
        &self.flavor
    }

    /// 基础系数
    pub fn coeffs(&self) -> &WrayAgarwalCoeffs {
        &self.coeffs
    }

    /// 网格
    pub fn mesh(&self) -> &FvMesh {
        self.mesh
    }

    /// 涡粘性代理量 R
    pub fn rnu(&self) -> &VolField<f64> {
        &self.rnu
    }

    /// 可变 R（初始化与重启用）
    pub fn rnu_mut(&mut self) -> &mut VolField<f64> {
        &mut self.rnu
    }

    /// R 的边界条件
    pub fn rnu_boundary(&self) -> &ScalarBoundaryField {
        &self.rnu_bcs
    }

    /// 混合函数 f1
    pub fn f1(&self) -> &VolField<f64> {
        &self.f1
    }

    /// 应变率 S
    pub fn strain(&self) -> &VolField<f64> {
        &self.strain
    }

    /// 涡粘性 νt
    pub fn nut(&self) -> &VolField<f64> {
        &self.nut
    }

    /// 未加上界和 DES 乘子的第二耗散项
    pub fn d2_unbounded(&self) -> &[f64] {
        &self.d2_unbounded
    }

    /// 实际使用的第二耗散项
    pub fn d2_applied(&self) -> &[f64] {
        &self.d2_applied
    }

    /// DES 指示量
    pub fn fdes(&self) -> Option<&VolField<f64>> {
        self.hybrid.as_ref().map(HybridFields::fdes)
    }

    /// 滤波尺度 Δ
    pub fn out_delta(&self) -> Option<&VolField<f64>> {
        self.hybrid.as_ref().map(HybridFields::out_delta)
    }

    /// 区域标记（RANS = 1）
    pub fn blend_factor(&self) -> Option<&VolField<f64>> {
        self.hybrid.as_ref().map(HybridFields::blend_factor)
    }

    /// 某输运量的面混合因子
    pub fn face_blend(&self, quantity: BlendedQuantity) -> Option<&SurfaceScalarField> {
        self.hybrid.as_ref().map(|h| h.face_blend(quantity))
    }

    /// 上一步统计
    pub fn last_stats(&self) -> Option<&CorrectionStats> {
        self.last_stats.as_ref()
    }

    /// 线性求解配置
    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PatchKind;
    use crate::turbulence::factory::ModelBuilder;

    fn channel() -> FvMesh {
        let kinds = [
            PatchKind::Patch,
            PatchKind::Patch,
            PatchKind::Wall,
            PatchKind::Wall,
            PatchKind::Symmetry,
            PatchKind::Symmetry,
        ];
        FvMesh::cartesian_box([6, 8, 1], DVec3::new(3.0, 1.0, 0.1), kinds).unwrap()
    }

    fn shear_flow(mesh: &FvMesh) -> (FieldDb, SurfaceScalarField) {
        let u: Vec<DVec3> = (0..mesh.n_cells())
            .map(|c| {
                let y = mesh.cell_centre(c).y;
                DVec3::new(4.0 * y * (1.0 - y), 0.0, 0.0)
            })
            .collect();
        let u = VolField::from_internal("U", mesh, u).unwrap();
        let phi = SurfaceScalarField::flux("phi", mesh, &u);
        let mut db = FieldDb::new();
        db.insert(u).unwrap();
        (db, phi)
    }

    #[test]
    fn test_correct_keeps_rnu_non_negative() {
        let mesh = channel();
        let wd = WallDistance::compute(&mesh);
        let (db, phi) = shear_flow(&mesh);
        let mut model = ModelBuilder::new(&mesh, &wd)
            .kind(ClosureKind::WrayAgarwal2017)
            .initial_rnu(3e-3)
            .build()
            .unwrap();
        let flow = FlowInputs::new(&db, &phi, 1e-3, 0.01);
        for _ in 0..5 {
            model.correct(&flow).unwrap();
        }
        assert!(model.rnu().internal().iter().all(|&r| r >= 0.0 && r.is_finite()));
        assert!(model.f1().internal().iter().all(|&f| (0.0..=1.0).contains(&f)));
        assert!(model.nut().internal().iter().all(|&n| n >= 0.0 && n.is_finite()));
        assert!(model.les_region().is_none());
        assert!(model.last_stats().is_some());
    }

    #[test]
    fn test_nut_damping() {
        let mesh = channel();
        let wd = WallDistance::compute(&mesh);
        let mut model = ModelBuilder::new(&mesh, &wd).initial_rnu(1.0).build().unwrap();
        // χ = 1000 ≫ Cw，fμ ≈ 1
        model.correct_nut(1e-3);
        assert!((model.nut().get(0) - 1.0).abs() < 1e-6);

        // χ = Cw，fμ = 1/2
        let cw = model.coeffs().cw;
        model.rnu_mut().fill(cw * 1e-3);
        model.correct_nut(1e-3);
        assert!((model.nut().get(0) - 0.5 * cw * 1e-3).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_flow_inputs() {
        let mesh = channel();
        let wd = WallDistance::compute(&mesh);
        let (db, phi) = shear_flow(&mesh);
        let mut model = ModelBuilder::new(&mesh, &wd).build().unwrap();
        assert!(model.correct(&FlowInputs::new(&db, &phi, 0.0, 0.01)).is_err());
        assert!(model.correct(&FlowInputs::new(&db, &phi, 1e-3, -1.0)).is_err());

        let empty = FieldDb::new();
        assert!(matches!(
            model.correct(&FlowInputs::new(&empty, &phi, 1e-3, 0.01)),
            Err(TurbulenceError::Field(_))
        ));
    }

    #[test]
    fn test_apply_properties_kind_mismatch() {
        let mesh = channel();
        let wd = WallDistance::compute(&mesh);
        let mut model = ModelBuilder::new(&mesh, &wd).build().unwrap();
        let props = TurbulenceProperties::for_model("WA2017DES");
        assert!(matches!(
            model.apply_properties(&props),
            Err(TurbulenceError::KindMismatch { .. })
        ));

        let mut props = TurbulenceProperties::for_model("WrayAgarwal2017");
        assert!(!model.apply_properties(&props).unwrap());
        props.set_coeff("WrayAgarwal2017", "C1ke", 0.12).unwrap();
        assert!(model.apply_properties(&props).unwrap());
        assert_eq!(model.coeffs().c1ke, 0.12);
        assert_eq!(model.write_coeffs().get_scalar("C1ke").unwrap(), 0.12);
    }
}
