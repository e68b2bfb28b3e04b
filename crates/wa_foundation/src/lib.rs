// crates/wa_foundation/src/lib.rs

//! Wray-Agarwal Foundation Layer
//!
//! 基础层，提供整个工作区共享的错误类型和数值保护工具。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`float`]: 数值下限常量与安全运算
//!
//! # 示例
//!
//! ```
//! use wa_foundation::{safe_div, WaError, WaResult, SMALL};
//!
//! fn ratio(a: f64, b: f64) -> WaResult<f64> {
//!     if !a.is_finite() {
//!         return Err(WaError::invalid_input("分子非有限"));
//!     }
//!     Ok(safe_div(a, b, 0.0))
//! }
//!
//! assert_eq!(ratio(1.0, 0.0).unwrap(), 0.0);
//! assert!(SMALL > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod float;

// 重导出常用类型
pub use error::{WaError, WaResult};
pub use float::{clamp_valid, safe_div, safe_sqrt, sqr, GREAT, SMALL, VSMALL};
