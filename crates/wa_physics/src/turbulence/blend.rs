// crates/wa_physics/src/turbulence/blend.rs

//! 混合函数 f1
//!
//! WA-2017 的 k-ω / k-ε 切换函数：
//!
//! ```text
//! arg1 = (1 + d √(R S) / ν) / (1 + (max(d √(R S), 1.5 R) / (20 ν))²)
//! f1   = min(tanh(arg1⁴), 0.9)
//! ```
//!
//! 近壁（d → 0）arg1 → 1，f1 取 k-ω 侧的大值；远场 arg1 → 0，f1 → 0。

use wa_foundation::{clamp_valid, safe_div, safe_sqrt, sqr, SMALL, VSMALL};

/// f1 上限
pub const F1_MAX: f64 = 0.9;

/// 单元 f1
///
/// `rnu` 截断为非负，`strain` 下限为 `SMALL`，`nu` 下限为 `VSMALL`，
/// 非有限的壁面距离按远场处理。
/// 任何输入都返回 [0, F1_MAX] 内的有限值。
pub fn blend_f1(rnu: f64, strain: f64, wall_distance: f64, nu: f64) -> f64 {
    let r = clamp_valid(rnu, 0.0, f64::MAX, 0.0);
    let s = clamp_valid(strain, SMALL, f64::MAX, SMALL);
    let d = clamp_valid(wall_distance, 0.0, f64::MAX, f64::MAX);
    let nu = nu.max(VSMALL);

    let d_rs = d * safe_sqrt(r * s);
    let numerator = 1.0 + safe_div(d_rs, nu, f64::MAX);
    let denominator = 1.0 + sqr(safe_div(d_rs.max(1.5 * r), 20.0 * nu, f64::MAX));
    let arg1 = safe_div(numerator, denominator, 0.0);
    clamp_valid(arg1.powi(4).tanh(), 0.0, F1_MAX, F1_MAX)
}

/// 按 f1 线性混合两组系数：`f1 (kw - ke) + ke`
#[inline]
pub fn blend(f1: f64, kw: f64, ke: f64) -> f64 {
    f1 * (kw - ke) + ke
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_limit() {
        // d = 0 且 R 很小: arg1 → 1
        let f1 = blend_f1(1e-8, 10.0, 0.0, 1e-5);
        assert!((f1 - 1.0f64.tanh()).abs() < 1e-6);

        // 近壁第一层单元达到上限
        let f1 = blend_f1(1e-6, 1e3, 1e-3, 1e-5);
        assert!((f1 - F1_MAX).abs() < 1e-12);
    }

    #[test]
    fn test_far_field_small() {
        let f1 = blend_f1(1e-2, 10.0, 1.0, 1e-5);
        assert!(f1 < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs_finite() {
        let cases = [
            (0.0, 0.0, 0.0, 0.0),
            (f64::NAN, 1.0, 1.0, 1e-5),
            (1.0, f64::INFINITY, 1.0, 1e-5),
            (-1.0, -1.0, -1.0, -1.0),
            (1e300, 1e300, 1e300, 1e-300),
            (1.0, 1.0, f64::INFINITY, 0.0),
        ];
        for (r, s, d, nu) in cases {
            let f1 = blend_f1(r, s, d, nu);
            assert!(f1.is_finite() && (0.0..=1.0).contains(&f1), "{r} {s} {d} {nu} -> {f1}");
        }
    }

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend(1.0, 0.0829, 0.1127), 0.0829);
        assert_eq!(blend(0.0, 0.0829, 0.1127), 0.1127);
    }
}
