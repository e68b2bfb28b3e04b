// crates/wa_physics/src/numerics/linear_algebra/solver.rs

//! 迭代线性求解器
//!
//! [`BiCgStabSolver`]: 预条件双共轭梯度稳定法，适用于对流项带来的非对称矩阵。
//!
//! ```
//! use wa_physics::numerics::linear_algebra::{
//!     BiCgStabSolver, CsrBuilder, JacobiPreconditioner, SolverConfig,
//! };
//!
//! let mut builder = CsrBuilder::new_square(2);
//! builder.set(0, 0, 4.0);
//! builder.set(0, 1, 1.0);
//! builder.set(1, 1, 3.0);
//! let matrix = builder.build();
//!
//! let precond = JacobiPreconditioner::from_matrix(&matrix);
//! let mut solver = BiCgStabSolver::new(SolverConfig::default());
//! let mut x = vec![0.0; 2];
//! let result = solver.solve(&matrix, &[5.0, 3.0], &mut x, &precond);
//! assert!(result.is_converged());
//! assert!((x[0] - 1.0).abs() < 1e-8 && (x[1] - 1.0).abs() < 1e-8);
//! ```

use serde::{Deserialize, Serialize};

use super::csr::CsrMatrix;
use super::preconditioner::Preconditioner;
use super::vector_ops::{axpy, copy, dot, norm2};

/// 求解器配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 相对收敛容差
    pub rtol: f64,
    /// 绝对收敛容差
    pub atol: f64,
    /// 最大迭代次数
    pub max_iter: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-14,
            max_iter: 1000,
        }
    }
}

impl SolverConfig {
    /// 创建求解器配置
    pub fn new(rtol: f64, max_iter: usize) -> Self {
        Self {
            rtol,
            max_iter,
            ..Default::default()
        }
    }

    /// 设置绝对容差
    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }
}

/// 求解器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// 收敛
    Converged,
    /// 达到最大迭代次数
    MaxIterationsReached,
    /// 停滞（内积退化）
    Stagnated,
}

/// 求解器结果
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// 求解状态
    pub status: SolverStatus,
    /// 迭代次数
    pub iterations: usize,
    /// 最终残差范数
    pub residual_norm: f64,
    /// 初始残差范数
    pub initial_residual_norm: f64,
}

impl SolverResult {
    /// 是否收敛
    pub fn is_converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }

    fn new(status: SolverStatus, iterations: usize, residual: f64, initial: f64) -> Self {
        Self {
            status,
            iterations,
            residual_norm: residual,
            initial_residual_norm: initial,
        }
    }
}

/// 双共轭梯度稳定法求解器
#[derive(Debug, Clone)]
pub struct BiCgStabSolver {
    config: SolverConfig,
    r: Vec<f64>,
    r0: Vec<f64>,
    p: Vec<f64>,
    v: Vec<f64>,
    s: Vec<f64>,
    t: Vec<f64>,
    z: Vec<f64>,
}

impl BiCgStabSolver {
    /// 创建求解器
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            r: Vec::new(),
            r0: Vec::new(),
            p: Vec::new(),
            v: Vec::new(),
            s: Vec::new(),
            t: Vec::new(),
            z: Vec::new(),
        }
    }

    /// 配置
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn ensure_workspace(&mut self, n: usize) {
        if self.r.len() != n {
            self.r = vec![0.0; n];
            self.r0 = vec![0.0; n];
            self.p = vec![0.0; n];
            self.v = vec![0.0; n];
            self.s = vec![0.0; n];
            self.t = vec![0.0; n];
            self.z = vec![0.0; n];
        }
    }

    /// 求解 A x = b，x 为初值并原地更新
    pub fn solve<P: Preconditioner>(
        &mut self,
        matrix: &CsrMatrix,
        b: &[f64],
        x: &mut [f64],
        precond: &P,
    ) -> SolverResult {
        let n = b.len();
        self.ensure_workspace(n);
        let stag_tol = 1e-300;

        // r = b - A x
        matrix.mul_vec(x, &mut self.r);
        for (ri, bi) in self.r.iter_mut().zip(b) {
            *ri = bi - *ri;
        }

        let initial_norm = norm2(&self.r);
        let target = (self.config.rtol * norm2(b)).max(self.config.atol);
        if initial_norm <= target {
            return SolverResult::new(SolverStatus::Converged, 0, initial_norm, initial_norm);
        }

        // 影子残差固定为初始残差
        copy(&self.r, &mut self.r0);

        let mut rho_old = 1.0;
        let mut alpha = 1.0;
        let mut omega = 1.0;
        self.v.fill(0.0);
        self.p.fill(0.0);

        for iter in 0..self.config.max_iter {
            let rho = dot(&self.r0, &self.r);
            if rho.abs() < stag_tol {
                return SolverResult::new(SolverStatus::Stagnated, iter, norm2(&self.r), initial_norm);
            }

            let beta = if iter == 0 {
                0.0
            } else {
                (rho / rho_old) * (alpha / omega)
            };
            rho_old = rho;

            // p = r + β (p - ω v)
            for i in 0..n {
                self.p[i] = self.r[i] + beta * (self.p[i] - omega * self.v[i]);
            }

            precond.apply(&self.p, &mut self.z);
            matrix.mul_vec(&self.z, &mut self.v);

            let r0v = dot(&self.r0, &self.v);
            if r0v.abs() < stag_tol {
                return SolverResult::new(SolverStatus::Stagnated, iter, norm2(&self.r), initial_norm);
            }
            alpha = rho / r0v;

            // x += α z，s = r - α v
            axpy(alpha, &self.z, x);
            for i in 0..n {
                self.s[i] = self.r[i] - alpha * self.v[i];
            }

            let s_norm = norm2(&self.s);
            if s_norm <= target {
                log::trace!("BiCGStab 收敛: {} 次迭代, 残差 {s_norm:.3e}", iter + 1);
                return SolverResult::new(SolverStatus::Converged, iter + 1, s_norm, initial_norm);
            }

            precond.apply(&self.s, &mut self.z);
            matrix.mul_vec(&self.z, &mut self.t);

            let tt = dot(&self.t, &self.t);
            omega = if tt < stag_tol { 1.0 } else { dot(&self.t, &self.s) / tt };

            // x += ω z，r = s - ω t
            axpy(omega, &self.z, x);
            for i in 0..n {
                self.r[i] = self.s[i] - omega * self.t[i];
            }

            let r_norm = norm2(&self.r);
            if r_norm <= target {
                log::trace!("BiCGStab 收敛: {} 次迭代, 残差 {r_norm:.3e}", iter + 1);
                return SolverResult::new(SolverStatus::Converged, iter + 1, r_norm, initial_norm);
            }
            if omega.abs() < stag_tol {
                return SolverResult::new(SolverStatus::Stagnated, iter + 1, r_norm, initial_norm);
            }
        }

        SolverResult::new(
            SolverStatus::MaxIterationsReached,
            self.config.max_iter,
            norm2(&self.r),
            initial_norm,
        )
    }
}
