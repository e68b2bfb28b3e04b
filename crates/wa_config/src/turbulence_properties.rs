// crates/wa_config/src/turbulence_properties.rs

//! 湍流属性配置
//!
//! 对应一个 JSON 文件，包含模型选择和系数块：
//!
//! ```json
//! {
//!     "simulationType": "LES",
//!     "model": "WA2017DES",
//!     "WA2017DESCoeffs": { "kappa": 0.41, "CDES": 0.41 },
//!     "delta": "maxDeltaxyz",
//!     "maxDeltaxyzCoeffs": { "deltaCoeff": 2 }
//! }
//! ```
//!
//! 系数块以 `<ModelName>Coeffs` 命名，缺失时模型使用默认系数。
//! [`TurbulenceProperties::reload`] 重新读取源文件并报告内容是否改变，
//! 供模型的 `read()` 判断是否需要刷新系数。

use std::path::{Path, PathBuf};

use crate::dictionary::Dictionary;
use crate::error::ConfigError;

/// 默认 LES 滤波尺度类型
pub const DEFAULT_DELTA: &str = "maxDeltaxyz";

/// 湍流属性
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurbulenceProperties {
    dict: Dictionary,
    source: Option<PathBuf>,
}

impl TurbulenceProperties {
    /// 从字典创建（无源文件）
    pub fn from_dict(dict: Dictionary) -> Self {
        Self { dict, source: None }
    }

    /// 从 JSON 字符串解析
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_dict(Dictionary::from_json_str(text)?))
    }

    /// 为指定模型构造最小属性（仅含 `model` 键）
    pub fn for_model(model: &str) -> Self {
        Self::from_dict(Dictionary::new().with("model", model))
    }

    /// 从文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let dict = Dictionary::from_json_str(&content)?;
        log::debug!("加载湍流属性: {}", path.display());
        Ok(Self {
            dict,
            source: Some(path.to_path_buf()),
        })
    }

    /// 保存到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.dict.to_json_string_pretty()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 重新读取源文件
    ///
    /// # 返回
    /// - `Ok(true)`: 内容发生变化（已更新）
    /// - `Ok(false)`: 内容未变，或没有源文件
    pub fn reload(&mut self) -> Result<bool, ConfigError> {
        let Some(path) = self.source.clone() else {
            return Ok(false);
        };
        let content = std::fs::read_to_string(&path)?;
        let dict = Dictionary::from_json_str(&content)?;
        if dict == self.dict {
            return Ok(false);
        }
        log::debug!("湍流属性已修改: {}", path.display());
        self.dict = dict;
        Ok(true)
    }

    /// 源文件路径
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 完整字典
    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    /// 可变字典（用于程序化修改系数）
    pub fn dict_mut(&mut self) -> &mut Dictionary {
        &mut self.dict
    }

    /// 模型类型名（必需）
    pub fn model_name(&self) -> Result<String, ConfigError> {
        self.dict.get_word("model")
    }

    /// `<type_name>Coeffs` 系数块，缺失时为空
    pub fn coeffs_dict(&self, type_name: &str) -> Result<Dictionary, ConfigError> {
        self.dict.sub_dict_or_empty(&format!("{type_name}Coeffs"))
    }

    /// 设置 `<type_name>Coeffs` 中的某个系数
    pub fn set_coeff(&mut self, type_name: &str, key: &str, value: f64) -> Result<(), ConfigError> {
        let block = format!("{type_name}Coeffs");
        let mut coeffs = self.dict.sub_dict_or_empty(&block)?;
        coeffs.set(key, value);
        self.dict.set_dict(block, coeffs);
        Ok(())
    }

    /// LES 滤波尺度类型名（默认 `maxDeltaxyz`）
    pub fn delta_type(&self) -> Result<String, ConfigError> {
        self.dict.get_word_or("delta", DEFAULT_DELTA)
    }

    /// 滤波尺度系数块 `<delta>Coeffs`
    pub fn delta_coeffs(&self) -> Result<Dictionary, ConfigError> {
        let delta = self.delta_type()?;
        self.dict.sub_dict_or_empty(&format!("{delta}Coeffs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DES: &str = r#"{
        "simulationType": "LES",
        "model": "WA2017DES",
        "WA2017DESCoeffs": { "kappa": 0.41, "CDES": 0.41 },
        "delta": "maxDeltaxyz",
        "maxDeltaxyzCoeffs": { "deltaCoeff": 2 }
    }"#;

    #[test]
    fn test_model_and_blocks() {
        let props = TurbulenceProperties::from_json_str(DES).unwrap();
        assert_eq!(props.model_name().unwrap(), "WA2017DES");
        let coeffs = props.coeffs_dict("WA2017DES").unwrap();
        assert_eq!(coeffs.get_scalar("CDES").unwrap(), 0.41);
        let delta = props.delta_coeffs().unwrap();
        assert_eq!(delta.get_scalar("deltaCoeff").unwrap(), 2.0);
    }

    #[test]
    fn test_missing_model_is_error() {
        let props = TurbulenceProperties::from_json_str("{}").unwrap();
        assert!(matches!(props.model_name(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_missing_coeffs_block_is_empty() {
        let props = TurbulenceProperties::for_model("WrayAgarwal2017");
        assert!(props.coeffs_dict("WrayAgarwal2017").unwrap().is_empty());
        assert_eq!(props.delta_type().unwrap(), DEFAULT_DELTA);
    }

    #[test]
    fn test_set_coeff() {
        let mut props = TurbulenceProperties::for_model("WrayAgarwal2017m");
        props.set_coeff("WrayAgarwal2017m", "Cm", 6.0).unwrap();
        let coeffs = props.coeffs_dict("WrayAgarwal2017m").unwrap();
        assert_eq!(coeffs.get_scalar("Cm").unwrap(), 6.0);
    }

    #[test]
    fn test_reload_detects_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turbulenceProperties.json");
        std::fs::write(&path, DES).unwrap();

        let mut props = TurbulenceProperties::from_file(&path).unwrap();
        assert!(!props.reload().unwrap());

        let mut edited = props.clone();
        edited.set_coeff("WA2017DES", "CDES", 0.65).unwrap();
        edited.save_to_file(&path).unwrap();

        assert!(props.reload().unwrap());
        let coeffs = props.coeffs_dict("WA2017DES").unwrap();
        assert_eq!(coeffs.get_scalar("CDES").unwrap(), 0.65);
        assert!(!props.reload().unwrap());
    }

    #[test]
    fn test_reload_without_source() {
        let mut props = TurbulenceProperties::for_model("WrayAgarwal2017");
        assert!(!props.reload().unwrap());
    }
}
