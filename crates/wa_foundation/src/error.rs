// crates/wa_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `WaError` 枚举和 `WaResult` 类型别名。
//!
//! 分层约定：基础层只定义通用错误，配置错误在 `wa_config` 中定义，
//! 边界条件与湍流模型错误在 `wa_physics` 中扩展。

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type WaResult<T> = Result<T, WaError>;

/// 基础错误类型
#[derive(Error, Debug)]
pub enum WaError {
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound {
        /// 未找到的路径
        path: PathBuf,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 无效网格拓扑
    #[error("无效的网格拓扑: {message}")]
    InvalidMesh {
        /// 具体错误信息
        message: String,
    },

    /// 资源未找到
    #[error("资源未找到: {resource}")]
    NotFound {
        /// 资源名称
        resource: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

impl WaError {
    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 文件不存在
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 无效网格
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// 资源未找到
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// 检查两个数组长度一致
///
/// # 示例
///
/// ```
/// use wa_foundation::error::ensure_len;
///
/// assert!(ensure_len("velocity", 3, 3).is_ok());
/// assert!(ensure_len("velocity", 3, 2).is_err());
/// ```
pub fn ensure_len(name: &'static str, expected: usize, actual: usize) -> WaResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(WaError::size_mismatch(name, expected, actual))
    }
}
