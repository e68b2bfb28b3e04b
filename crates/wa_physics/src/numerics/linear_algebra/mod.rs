// crates/wa_physics/src/numerics/linear_algebra/mod.rs

//! 线性代数
//!
//! - [`csr`]: CSR 稀疏矩阵与构建器
//! - [`vector_ops`]: 向量运算
//! - [`preconditioner`]: 预条件器
//! - [`solver`]: BiCGStab 迭代求解器

pub mod csr;
pub mod preconditioner;
pub mod solver;
pub mod vector_ops;

pub use csr::{CsrBuilder, CsrMatrix};
pub use preconditioner::{IdentityPreconditioner, JacobiPreconditioner, Preconditioner};
pub use solver::{BiCgStabSolver, SolverConfig, SolverResult, SolverStatus};
