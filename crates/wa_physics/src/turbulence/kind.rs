// crates/wa_physics/src/turbulence/kind.rs

//! 闭合模型类型名
//!
//! 运行时按 `turbulenceProperties` 中的 `model` 字段选择模型。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use wa_config::ConfigError;

/// 闭合模型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosureKind {
    /// WA-2017 RANS
    WrayAgarwal2017,
    /// WA-2017m，第二耗散项有界
    WrayAgarwal2017m,
    /// WA-2017 DES
    Wa2017Des,
    /// WA-2017 DES，强制 LES（衰减各向同性湍流）
    Wa2017DesDit,
}

impl ClosureKind {
    /// 全部种类
    pub const ALL: [ClosureKind; 4] = [
        ClosureKind::WrayAgarwal2017,
        ClosureKind::WrayAgarwal2017m,
        ClosureKind::Wa2017Des,
        ClosureKind::Wa2017DesDit,
    ];

    /// 类型名
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::WrayAgarwal2017 => "WrayAgarwal2017",
            Self::WrayAgarwal2017m => "WrayAgarwal2017m",
            Self::Wa2017Des => "WA2017DES",
            Self::Wa2017DesDit => "WA2017DESDIT",
        }
    }

    /// 系数块名 `<type>Coeffs`
    pub fn coeffs_dict_name(&self) -> String {
        format!("{}Coeffs", self.type_name())
    }

    /// 是否为 RANS/LES 混合模型
    pub fn is_hybrid(&self) -> bool {
        matches!(self, Self::Wa2017Des | Self::Wa2017DesDit)
    }

    /// 可用类型名
    pub fn type_names() -> Vec<&'static str> {
        Self::ALL.iter().map(ClosureKind::type_name).collect()
    }
}

impl fmt::Display for ClosureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ClosureKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.type_name() == s)
            .ok_or_else(|| ConfigError::UnknownModel {
                name: s.to_string(),
                valid: Self::type_names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all() {
        for kind in ClosureKind::ALL {
            assert_eq!(kind.type_name().parse::<ClosureKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown() {
        let err = "kEpsilon".parse::<ClosureKind>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownModel { .. }));
    }

    #[test]
    fn test_names() {
        assert_eq!(ClosureKind::Wa2017Des.coeffs_dict_name(), "WA2017DESCoeffs");
        assert!(ClosureKind::Wa2017DesDit.is_hybrid());
        assert!(!ClosureKind::WrayAgarwal2017m.is_hybrid());
    }
}
