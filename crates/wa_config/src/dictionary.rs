// crates/wa_config/src/dictionary.rs

//! 字典式配置块
//!
//! `Dictionary` 是对 JSON 对象的薄包装，提供类型化查询：
//!
//! - 必需项：[`Dictionary::get_scalar`]、[`Dictionary::get_word`]，缺失即报错
//! - 可选项：[`Dictionary::get_scalar_or`]，缺失取默认值，但格式错误仍报错
//! - 子字典：[`Dictionary::sub_dict`]、[`Dictionary::sub_dict_or_empty`]
//!
//! 湍流模型系数块（`WrayAgarwal2017Coeffs` 等）、边界条件条目
//! 都以 `Dictionary` 的形式读写。
//!
//! # 示例
//!
//! ```
//! use wa_config::Dictionary;
//!
//! let dict = Dictionary::from_json_str(r#"{ "field": "U", "gradCoeff": 2.0 }"#).unwrap();
//! assert_eq!(dict.get_word("field").unwrap(), "U");
//! assert_eq!(dict.get_scalar("gradCoeff").unwrap(), 2.0);
//! assert_eq!(dict.get_scalar_or("Cm", 8.0).unwrap(), 8.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// 键值配置块
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: Map<String, Value>,
}

impl Dictionary {
    /// 创建空字典
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 值创建（必须是对象）
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(ConfigError::Parse(format!(
                "期望字典对象, 实际为 {}",
                json_kind(&other)
            ))),
        }
    }

    /// 从 JSON 字符串解析
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// 序列化为格式化 JSON 字符串
    pub fn to_json_string_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(&self.entries).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 转为 JSON 值
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }

    /// 是否包含键
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 条目数
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有键（插入顺序不保证）
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// 原始 JSON 值
    #[inline]
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// 查询必需的标量
    pub fn get_scalar(&self, key: &str) -> Result<f64, ConfigError> {
        match self.entries.get(key) {
            Some(value) => parse_scalar(key, value),
            None => Err(ConfigError::Missing(key.to_string())),
        }
    }

    /// 查询可选标量，缺失时返回默认值
    ///
    /// 键存在但不是数值时仍返回错误，不做静默回退。
    pub fn get_scalar_or(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        match self.entries.get(key) {
            Some(value) => parse_scalar(key, value),
            None => Ok(default),
        }
    }

    /// 查询必需的正标量
    pub fn get_positive_scalar_or(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        let value = self.get_scalar_or(key, default)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(ConfigError::invalid(key, value, "必须为正"))
        }
    }

    /// 查询必需的单词（字符串）
    pub fn get_word(&self, key: &str) -> Result<String, ConfigError> {
        match self.entries.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            Some(Value::String(_)) => Err(ConfigError::invalid(key, "\"\"", "不能为空")),
            Some(other) => Err(ConfigError::invalid(key, other, "期望字符串")),
            None => Err(ConfigError::Missing(key.to_string())),
        }
    }

    /// 查询可选单词
    pub fn get_word_or(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        if self.entries.contains_key(key) {
            self.get_word(key)
        } else {
            Ok(default.to_string())
        }
    }

    /// 查询必需的子字典
    pub fn sub_dict(&self, key: &str) -> Result<Dictionary, ConfigError> {
        match self.entries.get(key) {
            Some(value @ Value::Object(_)) => Self::from_value(value.clone()),
            Some(other) => Err(ConfigError::invalid(key, other, "期望字典")),
            None => Err(ConfigError::Missing(key.to_string())),
        }
    }

    /// 查询可选子字典，缺失时返回空字典
    pub fn sub_dict_or_empty(&self, key: &str) -> Result<Dictionary, ConfigError> {
        if self.entries.contains_key(key) {
            self.sub_dict(key)
        } else {
            Ok(Dictionary::new())
        }
    }

    /// 设置条目
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// 设置子字典
    pub fn set_dict(&mut self, key: impl Into<String>, dict: Dictionary) -> &mut Self {
        self.entries.insert(key.into(), Value::Object(dict.entries));
        self
    }

    /// 移除条目
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// 链式设置（构建器风格）
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }
}

fn parse_scalar(key: &str, value: &Value) -> Result<f64, ConfigError> {
    match value.as_f64() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ConfigError::invalid(key, value, "期望有限数值")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dictionary {
        Dictionary::from_json_str(
            r#"{
                "kappa": 0.41,
                "name": "WrayAgarwal2017",
                "bad": "x",
                "inner": { "deltaCoeff": 2 }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_required_scalar() {
        let dict = sample();
        assert!((dict.get_scalar("kappa").unwrap() - 0.41).abs() < 1e-15);
        assert!(matches!(dict.get_scalar("Cw"), Err(ConfigError::Missing(_))));
        assert!(matches!(
            dict.get_scalar("bad"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_optional_scalar_keeps_errors() {
        let dict = sample();
        assert_eq!(dict.get_scalar_or("Cw", 8.54).unwrap(), 8.54);
        assert!(dict.get_scalar_or("bad", 1.0).is_err());
    }

    #[test]
    fn test_positive_scalar() {
        let dict = Dictionary::new().with("CDES", -0.1);
        assert!(dict.get_positive_scalar_or("CDES", 0.41).is_err());
    }

    #[test]
    fn test_integer_reads_as_scalar() {
        let inner = sample().sub_dict("inner").unwrap();
        assert_eq!(inner.get_scalar("deltaCoeff").unwrap(), 2.0);
    }

    #[test]
    fn test_word() {
        let dict = sample();
        assert_eq!(dict.get_word("name").unwrap(), "WrayAgarwal2017");
        assert!(dict.get_word("kappa").is_err());
        assert_eq!(dict.get_word_or("delta", "maxDeltaxyz").unwrap(), "maxDeltaxyz");
    }

    #[test]
    fn test_sub_dict_or_empty() {
        let dict = sample();
        assert!(dict.sub_dict_or_empty("missingCoeffs").unwrap().is_empty());
        assert!(dict.sub_dict_or_empty("kappa").is_err());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(Dictionary::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let dict = sample();
        let text = dict.to_json_string_pretty().unwrap();
        let back = Dictionary::from_json_str(&text).unwrap();
        assert_eq!(dict, back);
    }
}
