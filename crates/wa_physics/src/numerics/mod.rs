// crates/wa_physics/src/numerics/mod.rs

//! 数值方法
//!
//! - [`gradient`]: Green-Gauss 梯度与应变率
//! - [`linear_algebra`]: CSR 矩阵、预条件器、BiCGStab
//! - [`transport`]: 标量输运方程的隐式组装与求解

use rayon::prelude::*;

pub mod gradient;
pub mod linear_algebra;
pub mod transport;

pub use gradient::{green_gauss_scalar, green_gauss_vector, strain_rate_field, strain_rate_magnitude};
pub use transport::{BoundaryCoeffs, ScalarTransportMatrix};

/// 超过该单元数时逐单元计算并行执行
pub const PARALLEL_THRESHOLD: usize = 1000;

/// 逐单元映射，单元数超过 [`PARALLEL_THRESHOLD`] 时使用 rayon
///
/// 结果与串行执行完全一致。
pub fn map_cells<T, F>(n_cells: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if n_cells > PARALLEL_THRESHOLD {
        (0..n_cells).into_par_iter().map(f).collect()
    } else {
        (0..n_cells).map(f).collect()
    }
}
