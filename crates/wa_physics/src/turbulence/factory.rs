// crates/wa_physics/src/turbulence/factory.rs

//! 模型构造
//!
//! [`new_model`] 按 `turbulenceProperties` 的 `model` 字段选择模型；
//! [`ModelBuilder`] 允许逐项指定初值、边界条件与求解参数。
//!
//! ```
//! use glam::DVec3;
//! use wa_config::TurbulenceProperties;
//! use wa_physics::mesh::{FvMesh, PatchKind, WallDistance};
//! use wa_physics::turbulence::{new_model, ClosureKind};
//!
//! let mut kinds = [PatchKind::Patch; 6];
//! kinds[2] = PatchKind::Wall;
//! let mesh = FvMesh::cartesian_box([4, 4, 1], DVec3::ONE, kinds).unwrap();
//! let wd = WallDistance::compute(&mesh);
//! let props = TurbulenceProperties::for_model("WA2017DES");
//! let model = new_model(&props, &mesh, &wd).unwrap();
//! assert_eq!(model.kind(), ClosureKind::Wa2017Des);
//! assert!(model.les_region().is_some());
//! ```

use wa_config::{Dictionary, TurbulenceProperties};
use wa_foundation::{WaError, SMALL};

use super::capability::ClosureFlavor;
use super::coeffs::WrayAgarwalCoeffs;
use super::error::TurbulenceResult;
use super::hybrid::HybridFields;
use super::kind::ClosureKind;
use super::model::WrayAgarwalModel;
use crate::boundary::ScalarBoundaryField;
use crate::fields::VolField;
use crate::mesh::{FvMesh, WallDistance};
use crate::numerics::linear_algebra::SolverConfig;

/// 按湍流属性创建模型
pub fn new_model<'a>(
    props: &TurbulenceProperties,
    mesh: &'a FvMesh,
    wall_distance: &'a WallDistance,
) -> TurbulenceResult<WrayAgarwalModel<'a>> {
    ModelBuilder::new(mesh, wall_distance)
        .properties(props.clone())
        .build()
}

/// 模型构建器
#[derive(Debug, Clone)]
pub struct ModelBuilder<'a> {
    mesh: &'a FvMesh,
    wall_distance: &'a WallDistance,
    kind: ClosureKind,
    properties: Option<TurbulenceProperties>,
    initial_rnu: f64,
    rnu_field: Option<VolField<f64>>,
    rnu_boundary: Option<Dictionary>,
    solver: SolverConfig,
    velocity: String,
}

impl<'a> ModelBuilder<'a> {
    /// 默认 WA2017、R 初值 0、壁面 R = 0
    pub fn new(mesh: &'a FvMesh, wall_distance: &'a WallDistance) -> Self {
        Self {
            mesh,
            wall_distance,
            kind: ClosureKind::WrayAgarwal2017,
            properties: None,
            initial_rnu: 0.0,
            rnu_field: None,
            rnu_boundary: None,
            solver: SolverConfig::new(1e-8, 500).with_atol(1e-16),
            velocity: "U".into(),
        }
    }

    /// 模型种类（使用默认系数）
    pub fn kind(mut self, kind: ClosureKind) -> Self {
        self.kind = kind;
        self
    }

    /// 湍流属性（种类与系数均从中读取，覆盖 [`Self::kind`]）
    pub fn properties(mut self, props: TurbulenceProperties) -> Self {
        self.properties = Some(props);
        self
    }

    /// 均匀 R 初值
    pub fn initial_rnu(mut self, value: f64) -> Self {
        self.initial_rnu = value;
        self
    }

    /// 给定 R 初始场（覆盖 [`Self::initial_rnu`]）
    pub fn rnu_field(mut self, field: VolField<f64>) -> Self {
        self.rnu_field = Some(field);
        self
    }

    /// R 的边界条件字典 `{ patchName: {...} }`
    pub fn rnu_boundary(mut self, dict: Dictionary) -> Self {
        self.rnu_boundary = Some(dict);
        self
    }

    /// 线性求解配置
    pub fn solver(mut self, config: SolverConfig) -> Self {
        self.solver = config;
        self
    }

    /// 速度场名（默认 `U`）
    pub fn velocity(mut self, name: impl Into<String>) -> Self {
        self.velocity = name.into();
        self
    }

    /// 构建模型
    pub fn build(self) -> TurbulenceResult<WrayAgarwalModel<'a>> {
        let mesh = self.mesh;
        let n_cells = mesh.n_cells();
        if self.wall_distance.len() != n_cells {
            return Err(WaError::size_mismatch("wall distance", n_cells, self.wall_distance.len()).into());
        }

        let (kind, coeffs, flavor) = match &self.properties {
            Some(props) => {
                let kind: ClosureKind = props.model_name()?.parse()?;
                let coeffs = WrayAgarwalCoeffs::from_dict(&props.coeffs_dict(kind.type_name())?)?;
                (kind, coeffs, ClosureFlavor::from_properties(kind, props)?)
            }
            None => (self.kind, WrayAgarwalCoeffs::default(), ClosureFlavor::default_for(self.kind)),
        };

        let mut rnu = match self.rnu_field {
            Some(field) => {
                field.check_mesh(mesh)?;
                field
            }
            None => {
                if !(self.initial_rnu >= 0.0 && self.initial_rnu.is_finite()) {
                    return Err(WaError::invalid_input(format!("R 初值必须非负: {}", self.initial_rnu)).into());
                }
                VolField::uniform("Rnu", mesh, self.initial_rnu)
            }
        };

        let rnu_bcs = match &self.rnu_boundary {
            Some(dict) => ScalarBoundaryField::from_dict(mesh, &rnu, dict, 0.0)?,
            None => ScalarBoundaryField::wall_default(mesh, 0.0),
        };
        rnu_bcs.evaluate(mesh, &mut rnu);

        let hybrid = flavor.is_hybrid().then(|| HybridFields::new(mesh));
        log::info!(
            "湍流模型 {kind}: {n_cells} 个单元, {} 个 patch{}",
            mesh.n_patches(),
            if hybrid.is_some() { ", RANS/LES 混合" } else { "" }
        );

        Ok(WrayAgarwalModel {
            mesh,
            wall_distance: self.wall_distance,
            kind,
            flavor,
            coeffs,
            rnu,
            rnu_bcs,
            f1: VolField::uniform("f1", mesh, 0.0),
            strain: VolField::uniform("S", mesh, SMALL),
            nut: VolField::uniform("nut", mesh, 0.0),
            hybrid,
            solver: self.solver,
            velocity_name: self.velocity,
            d2_unbounded: vec![0.0; n_cells],
            d2_applied: vec![0.0; n_cells],
            last_stats: None,
        })
    }
}
