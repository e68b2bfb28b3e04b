// crates/wa_physics/src/turbulence/mod.rs

//! Wray-Agarwal 湍流闭合
//!
//! | 类型名 | 说明 |
//! |--------|------|
//! | `WrayAgarwal2017` | WA-2017 单方程 RANS |
//! | `WrayAgarwal2017m` | 第二耗散项以 `Cm │∇R│²` 为上界 |
//! | `WA2017DES` | 按 `fdes = min(CDES Δ / L, 1)` 切换 RANS/LES |
//! | `WA2017DESDIT` | 全场使用 LES 长度尺度 |
//!
//! - [`kind`]: 类型名与解析
//! - [`coeffs`]: 模型系数与默认值
//! - [`blend`]: 混合函数 f1
//! - [`capability`]: 变体差异的能力接口
//! - [`hybrid`]: DES 区域场与面混合因子
//! - [`model`]: 输运方程求解与涡粘性
//! - [`factory`]: 按配置构造模型

pub mod blend;
pub mod capability;
pub mod coeffs;
pub mod error;
pub mod factory;
pub mod hybrid;
pub mod kind;
pub mod model;

pub use blend::{blend, blend_f1, F1_MAX};
pub use capability::{BlendedCoeffs, ClosureCapability, ClosureFlavor, HybridScale};
pub use coeffs::{DesCoeffs, WrayAgarwalCoeffs, DEFAULT_CM};
pub use error::{TurbulenceError, TurbulenceResult};
pub use factory::{new_model, ModelBuilder};
pub use hybrid::{BlendedQuantity, HybridFields};
pub use kind::ClosureKind;
pub use model::{CorrectionStats, FlowInputs, WrayAgarwalModel};
