// crates/wa_physics/src/turbulence/coeffs.rs

//! Wray-Agarwal 模型系数
//!
//! # 默认参数（NASA TMR WA-2017）
//!
//! | 参数 | 值 |
//! |------|-----|
//! | κ | 0.41 |
//! | C_w | 8.54 |
//! | C1ke | 0.1127 |
//! | C1kw | 0.0829 |
//! | σke | 1.0 |
//! | σkw | 0.72 |
//! | C2ke | C1ke/κ² + σke ≈ 1.6704 |
//! | C2kw | C1kw/κ² + σkw ≈ 1.2132 |
//!
//! 有界变体额外使用 `Cm = 8.0`，DES 变体使用 `CDES = 0.41` 与
//! `maxDeltaxyzCoeffs.deltaCoeff = 2`。

use serde::{Deserialize, Serialize};

use wa_config::{ConfigError, Dictionary};
use wa_foundation::sqr;

/// 有界耗散系数默认值
pub const DEFAULT_CM: f64 = 8.0;

/// 基础系数组
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WrayAgarwalCoeffs {
    /// von Kármán 常数
    pub kappa: f64,
    /// 阻尼函数系数
    pub cw: f64,
    /// k-ε 分支产生项系数
    pub c1ke: f64,
    /// k-ω 分支产生项系数
    pub c1kw: f64,
    /// k-ε 分支扩散系数
    pub sigmake: f64,
    /// k-ω 分支扩散系数
    pub sigmakw: f64,
}

impl Default for WrayAgarwalCoeffs {
    fn default() -> Self {
        Self {
            kappa: 0.41,
            cw: 8.54,
            c1ke: 0.1127,
            c1kw: 0.0829,
            sigmake: 1.0,
            sigmakw: 0.72,
        }
    }
}

impl WrayAgarwalCoeffs {
    /// C2ke = C1ke/κ² + σke
    #[inline]
    pub fn c2ke(&self) -> f64 {
        self.c1ke / sqr(self.kappa) + self.sigmake
    }

    /// C2kw = C1kw/κ² + σkw
    #[inline]
    pub fn c2kw(&self) -> f64 {
        self.c1kw / sqr(self.kappa) + self.sigmakw
    }

    /// 从系数块读取，缺失项取默认值
    pub fn from_dict(dict: &Dictionary) -> Result<Self, ConfigError> {
        let d = Self::default();
        Ok(Self {
            kappa: dict.get_positive_scalar_or("kappa", d.kappa)?,
            cw: dict.get_positive_scalar_or("Cw", d.cw)?,
            c1ke: dict.get_positive_scalar_or("C1ke", d.c1ke)?,
            c1kw: dict.get_positive_scalar_or("C1kw", d.c1kw)?,
            sigmake: dict.get_positive_scalar_or("sigmake", d.sigmake)?,
            sigmakw: dict.get_positive_scalar_or("sigmakw", d.sigmakw)?,
        })
    }

    /// 写入系数块
    pub fn write_into(&self, dict: &mut Dictionary) {
        dict.set("kappa", self.kappa)
            .set("Cw", self.cw)
            .set("C1ke", self.c1ke)
            .set("C1kw", self.c1kw)
            .set("sigmake", self.sigmake)
            .set("sigmakw", self.sigmakw);
    }
}

/// DES 系数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesCoeffs {
    /// DES 常数
    pub cdes: f64,
    /// 滤波尺度系数 Δ = deltaCoeff · maxDeltaxyz
    pub delta_coeff: f64,
}

impl Default for DesCoeffs {
    fn default() -> Self {
        Self {
            cdes: 0.41,
            delta_coeff: 2.0,
        }
    }
}

impl DesCoeffs {
    /// 从模型系数块与滤波尺度系数块读取
    pub fn from_dicts(coeffs: &Dictionary, delta_coeffs: &Dictionary) -> Result<Self, ConfigError> {
        let d = Self::default();
        Ok(Self {
            cdes: coeffs.get_positive_scalar_or("CDES", d.cdes)?,
            delta_coeff: delta_coeffs.get_positive_scalar_or("deltaCoeff", d.delta_coeff)?,
        })
    }
}
