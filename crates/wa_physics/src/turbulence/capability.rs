// crates/wa_physics/src/turbulence/capability.rs

//! 闭合能力接口
//!
//! 四种模型共享同一输运方程，只在少数步骤上不同：
//!
//! | 步骤 | WA2017 | WA2017m | WA2017DES | WA2017DESDIT |
//! |------|--------|---------|-----------|--------------|
//! | f1 / 系数混合 | 基础 | 基础 | 基础 | 基础 |
//! | 第二耗散项上界 | 无 | `Cm │∇R│²` | 无 | 无 |
//! | 混合长度尺度 | 无 | 无 | `min(CDES Δ / L, 1)` | `CDES Δ / L` |
//!
//! [`ClosureCapability`] 描述这些步骤，[`ClosureFlavor`] 用枚举分派实现，
//! 模型只持有一个 `ClosureFlavor` 值。

use serde::{Deserialize, Serialize};

use wa_config::{ConfigError, TurbulenceProperties};
use wa_foundation::{safe_div, safe_sqrt, SMALL, VSMALL};

use super::blend::{blend, blend_f1};
use super::coeffs::{DesCoeffs, WrayAgarwalCoeffs, DEFAULT_CM};
use super::kind::ClosureKind;

/// 单元混合后的方程系数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendedCoeffs {
    /// 产生项系数 C1
    pub c1: f64,
    /// 扩散系数 σR
    pub sigma: f64,
    /// 交叉扩散项系数 C2kw
    pub c2kw: f64,
    /// 第二耗散项系数 C2ke
    pub c2ke: f64,
}

/// 单元混合长度尺度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridScale {
    /// 滤波尺度 Δ
    pub delta: f64,
    /// DES 指示量；DES 变体中等于 1 为 RANS，DIT 变体为未截断的比值
    pub fdes: f64,
    /// 是否处于 LES 区
    pub les: bool,
}

/// 闭合能力
pub trait ClosureCapability {
    /// 混合函数 f1
    fn blend_weight(&self, rnu: f64, strain: f64, wall_distance: f64, nu: f64) -> f64 {
        blend_f1(rnu, strain, wall_distance, nu)
    }

    /// 按 f1 混合系数
    fn blend_coefficients(&self, coeffs: &WrayAgarwalCoeffs, f1: f64) -> BlendedCoeffs {
        BlendedCoeffs {
            c1: blend(f1, coeffs.c1kw, coeffs.c1ke),
            sigma: blend(f1, coeffs.sigmakw, coeffs.sigmake),
            c2kw: coeffs.c2kw(),
            c2ke: coeffs.c2ke(),
        }
    }

    /// 第二耗散项上界后的值，无上界时为 None
    fn destruction_bound(&self, _unbounded: f64, _grad_rnu_sq: f64) -> Option<f64> {
        None
    }

    /// 混合长度尺度，纯 RANS 模型为 None
    fn hybrid_length_scale(&self, _rnu: f64, _strain: f64, _max_delta: f64) -> Option<HybridScale> {
        None
    }
}

/// 模型变体
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClosureFlavor {
    /// 纯 RANS
    Rans,
    /// 第二耗散项有界
    Bounded {
        /// 上界系数
        cm: f64,
    },
    /// DES
    Des(DesCoeffs),
    /// DES，强制 LES
    DesDit(DesCoeffs),
}

impl ClosureFlavor {
    /// 各种类的默认变体
    pub fn default_for(kind: ClosureKind) -> Self {
        match kind {
            ClosureKind::WrayAgarwal2017 => Self::Rans,
            ClosureKind::WrayAgarwal2017m => Self::Bounded { cm: DEFAULT_CM },
            ClosureKind::Wa2017Des => Self::Des(DesCoeffs::default()),
            ClosureKind::Wa2017DesDit => Self::DesDit(DesCoeffs::default()),
        }
    }

    /// 从湍流属性读取变体参数
    pub fn from_properties(kind: ClosureKind, props: &TurbulenceProperties) -> Result<Self, ConfigError> {
        let coeffs = props.coeffs_dict(kind.type_name())?;
        Ok(match kind {
            ClosureKind::WrayAgarwal2017 => Self::Rans,
            ClosureKind::WrayAgarwal2017m => Self::Bounded {
                cm: coeffs.get_positive_scalar_or("Cm", DEFAULT_CM)?,
            },
            ClosureKind::Wa2017Des => Self::Des(DesCoeffs::from_dicts(&coeffs, &props.delta_coeffs()?)?),
            ClosureKind::Wa2017DesDit => {
                Self::DesDit(DesCoeffs::from_dicts(&coeffs, &props.delta_coeffs()?)?)
            }
        })
    }

    /// DES 系数（混合模型）
    pub fn des_coeffs(&self) -> Option<&DesCoeffs> {
        match self {
            Self::Des(des) | Self::DesDit(des) => Some(des),
            _ => None,
        }
    }

    /// 是否为混合模型
    pub fn is_hybrid(&self) -> bool {
        self.des_coeffs().is_some()
    }
}

/// RANS 长度尺度 `√(R/S)`
#[inline]
pub fn rans_length_scale(rnu: f64, strain: f64) -> f64 {
    safe_sqrt(safe_div(rnu.max(0.0), strain.max(SMALL), 0.0))
}

impl ClosureCapability for ClosureFlavor {
    fn destruction_bound(&self, unbounded: f64, grad_rnu_sq: f64) -> Option<f64> {
        match self {
            Self::Bounded { cm } => Some(unbounded.min(cm * grad_rnu_sq).max(0.0)),
            _ => None,
        }
    }

    fn hybrid_length_scale(&self, rnu: f64, strain: f64, max_delta: f64) -> Option<HybridScale> {
        let (des, forced_les) = match self {
            Self::Des(des) => (des, false),
            Self::DesDit(des) => (des, true),
            _ => return None,
        };
        let delta = des.delta_coeff * max_delta;
        let l_rans = rans_length_scale(rnu, strain);
        let ratio = safe_div(des.cdes * delta, l_rans.max(VSMALL), f64::MAX);
        Some(if forced_les {
            // 区域固定为 LES，比值只作为耗散乘子
            HybridScale {
                delta,
                fdes: ratio,
                les: true,
            }
        } else {
            let fdes = ratio.min(1.0);
            HybridScale {
                delta,
                fdes,
                les: fdes < 1.0,
            }
        })
    }
}
