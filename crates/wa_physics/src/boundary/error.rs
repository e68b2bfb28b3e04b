// crates/wa_physics/src/boundary/error.rs

//! 边界条件错误类型

use wa_config::ConfigError;

use crate::fields::{FieldError, FieldType};

/// 边界条件错误
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// 引用的字段不存在
    #[error("patch '{patch}': 字段 '{field}' 不存在")]
    FieldNotFound {
        /// patch 名
        patch: String,
        /// 字段名
        field: String,
    },

    /// 引用的字段类型不匹配
    #[error("patch '{patch}': 字段 '{field}' 类型不匹配 (期望 {expected}, 实际 {actual})")]
    TypeMismatch {
        /// patch 名
        patch: String,
        /// 字段名
        field: String,
        /// 期望类型
        expected: FieldType,
        /// 实际类型
        actual: FieldType,
    },

    /// 未知 patch
    #[error("未知 patch '{0}'")]
    UnknownPatch(String),

    /// 未知边界条件类型
    #[error("patch '{patch}': 未知边界条件类型 '{type_name}'")]
    UnknownType {
        /// patch 名
        patch: String,
        /// 类型名
        type_name: String,
    },

    /// 面数不匹配
    #[error("patch '{patch}': 面值数量不匹配 (期望 {expected}, 实际 {actual})")]
    SizeMismatch {
        /// patch 名
        patch: String,
        /// 期望数量
        expected: usize,
        /// 实际数量
        actual: usize,
    },

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BoundaryError {
    /// 将字段查找错误附加 patch 上下文
    pub fn from_field(patch: &str, err: FieldError) -> Self {
        match err {
            FieldError::TypeMismatch {
                name,
                expected,
                actual,
            } => Self::TypeMismatch {
                patch: patch.to_string(),
                field: name,
                expected,
                actual,
            },
            FieldError::NotFound(name) | FieldError::InvalidName(name) => Self::FieldNotFound {
                patch: patch.to_string(),
                field: name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_context() {
        let err = BoundaryError::from_field(
            "wall",
            FieldError::TypeMismatch {
                name: "U".into(),
                expected: FieldType::Scalar,
                actual: FieldType::Vector,
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("wall") && msg.contains("U"));
        assert!(matches!(err, BoundaryError::TypeMismatch { .. }));
    }
}
