// crates/wa_foundation/src/float.rs

//! 数值下限常量和安全运算
//!
//! 湍流闭合中大量出现 `a / b` 形式的比值（应变率、长度尺度、混合函数参数），
//! 分母可能恰好为零。本模块提供统一的下限常量和保护函数，
//! 保证任何退化输入都得到有限结果。

/// 小量，用于分母下限（与 OpenFOAM `SMALL` 同量级）
pub const SMALL: f64 = 1e-15;

/// 极小量，用于几乎不会触发的保护
pub const VSMALL: f64 = 1e-300;

/// 大量
pub const GREAT: f64 = 1e15;

/// 安全除法
///
/// 分母绝对值小于 [`VSMALL`] 或结果非有限时返回 `fallback`。
#[inline]
pub fn safe_div(a: f64, b: f64, fallback: f64) -> f64 {
    if b.abs() < VSMALL {
        fallback
    } else {
        let result = a / b;
        if result.is_finite() {
            result
        } else {
            fallback
        }
    }
}

/// 安全平方根（负数截断为 0）
#[inline]
pub fn safe_sqrt(x: f64) -> f64 {
    x.max(0.0).sqrt()
}

/// 平方
#[inline]
pub fn sqr(x: f64) -> f64 {
    x * x
}

/// 限制值到有效范围，非有限值返回 `fallback`
#[inline]
pub fn clamp_valid(x: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if x.is_finite() {
        x.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(1.0, 2.0, 0.0), 0.5);
        assert_eq!(safe_div(1.0, 0.0, 7.0), 7.0);
        assert_eq!(safe_div(f64::MAX, 1e-200, 3.0), 3.0);
    }

    #[test]
    fn test_safe_sqrt() {
        assert_eq!(safe_sqrt(-4.0), 0.0);
        assert!((safe_sqrt(4.0) - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_clamp_valid() {
        assert_eq!(clamp_valid(f64::NAN, 0.0, 1.0, 0.5), 0.5);
        assert_eq!(clamp_valid(2.0, 0.0, 1.0, 0.5), 1.0);
    }
}
