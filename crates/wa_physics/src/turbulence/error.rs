// crates/wa_physics/src/turbulence/error.rs

//! 湍流模型错误类型

use wa_config::ConfigError;
use wa_foundation::WaError;

use crate::boundary::BoundaryError;
use crate::fields::FieldError;

/// 湍流模型错误
#[derive(Debug, thiserror::Error)]
pub enum TurbulenceError {
    /// 配置错误（缺失或无效系数、未知模型）
    #[error("湍流配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 边界条件错误
    #[error("边界条件错误: {0}")]
    Boundary(#[from] BoundaryError),

    /// 字段查找错误
    #[error("字段错误: {0}")]
    Field(#[from] FieldError),

    /// 网格或数值错误
    #[error(transparent)]
    Foundation(#[from] WaError),

    /// 读取的配置与当前模型种类不一致
    #[error("模型种类不一致: 当前 {current}, 配置 {requested}")]
    KindMismatch {
        /// 当前模型
        current: String,
        /// 配置中的模型
        requested: String,
    },
}

/// 湍流模型结果类型
pub type TurbulenceResult<T> = Result<T, TurbulenceError>;
