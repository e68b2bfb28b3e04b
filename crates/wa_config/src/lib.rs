// crates/wa_config/src/lib.rs

//! Wray-Agarwal Config Layer
//!
//! 配置层，提供字典式配置读取与湍流属性文件管理。
//!
//! # 模块概览
//!
//! - [`dictionary`]: `Dictionary` 键值块，带类型化查询
//! - [`turbulence_properties`]: 湍流属性（模型选择 + `<Model>Coeffs` 系数块）
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: wa_cli        ─> 加载 TurbulenceProperties，驱动模型
//! Layer 3: wa_physics    ─> 从 Dictionary 构造模型与边界条件
//! Layer 2: wa_config     ─> Dictionary, TurbulenceProperties (本层)
//! Layer 1: wa_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dictionary;
pub mod error;
pub mod turbulence_properties;

/// 层级标识
pub const LAYER: u8 = 2;

// 重导出核心类型
pub use dictionary::Dictionary;
pub use error::ConfigError;
pub use turbulence_properties::TurbulenceProperties;
