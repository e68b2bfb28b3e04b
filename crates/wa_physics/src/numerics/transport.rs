// crates/wa_physics/src/numerics/transport.rs

//! 标量输运方程的隐式离散
//!
//! [`ScalarTransportMatrix`] 以 LDU 形式存储 `A ψ = b`：
//!
//! - `diag[c]`: 单元对角系数
//! - `upper[f]`: 内部面 f 上 owner 行的 neighbour 系数
//! - `lower[f]`: 内部面 f 上 neighbour 行的 owner 系数
//! - `source[c]`: 右端项
//!
//! 各算子按"方程左端"的约定累加：
//!
//! ```text
//! ddt(ψ) + div(φ, ψ) - laplacian(Γ, ψ) = sp(c)·ψ + su(s) + su_sp(c)·ψ
//! ```
//!
//! 边界面通过 [`BoundaryCoeffs`] 给出的线性化关系参与组装：
//! 面值 `ψ_b = vi·ψ_P + vb`，法向梯度 `∂ψ/∂n = gi·ψ_P + gb`。

use wa_foundation::{WaError, WaResult};

use super::linear_algebra::{BiCgStabSolver, CsrBuilder, CsrMatrix, JacobiPreconditioner, SolverConfig, SolverResult};
use crate::fields::SurfaceScalarField;
use crate::mesh::FvMesh;

// ============================================================
// 边界系数
// ============================================================

/// 单个 patch 的线性化边界系数（逐面）
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCoeffs {
    /// 面值对内部值的系数
    pub value_internal: Vec<f64>,
    /// 面值常数项
    pub value_boundary: Vec<f64>,
    /// 法向梯度对内部值的系数
    pub gradient_internal: Vec<f64>,
    /// 法向梯度常数项
    pub gradient_boundary: Vec<f64>,
}

impl BoundaryCoeffs {
    /// 零梯度
    pub fn zero_gradient(n_faces: usize) -> Self {
        Self {
            value_internal: vec![1.0; n_faces],
            value_boundary: vec![0.0; n_faces],
            gradient_internal: vec![0.0; n_faces],
            gradient_boundary: vec![0.0; n_faces],
        }
    }

    /// 固定值
    pub fn fixed_value(values: &[f64], delta_coeffs: &[f64]) -> Self {
        Self {
            value_internal: vec![0.0; values.len()],
            value_boundary: values.to_vec(),
            gradient_internal: delta_coeffs.iter().map(|d| -d).collect(),
            gradient_boundary: values.iter().zip(delta_coeffs).map(|(v, d)| v * d).collect(),
        }
    }

    /// 固定梯度
    pub fn fixed_gradient(gradients: &[f64], delta_coeffs: &[f64]) -> Self {
        Self {
            value_internal: vec![1.0; gradients.len()],
            value_boundary: gradients.iter().zip(delta_coeffs).map(|(g, d)| g / d).collect(),
            gradient_internal: vec![0.0; gradients.len()],
            gradient_boundary: gradients.to_vec(),
        }
    }

    /// 面数
    #[inline]
    pub fn len(&self) -> usize {
        self.value_internal.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value_internal.is_empty()
    }
}

// ============================================================
// 输运矩阵
// ============================================================

/// 单元标量输运方程矩阵
#[derive(Debug, Clone)]
pub struct ScalarTransportMatrix<'m> {
    mesh: &'m FvMesh,
    diag: Vec<f64>,
    upper: Vec<f64>,
    lower: Vec<f64>,
    source: Vec<f64>,
}

impl<'m> ScalarTransportMatrix<'m> {
    /// 空矩阵
    pub fn new(mesh: &'m FvMesh) -> Self {
        Self {
            mesh,
            diag: vec![0.0; mesh.n_cells()],
            upper: vec![0.0; mesh.n_internal_faces()],
            lower: vec![0.0; mesh.n_internal_faces()],
            source: vec![0.0; mesh.n_cells()],
        }
    }

    fn check_cells(&self, name: &'static str, len: usize) -> WaResult<()> {
        if len != self.mesh.n_cells() {
            return Err(WaError::size_mismatch(name, self.mesh.n_cells(), len));
        }
        Ok(())
    }

    fn check_patches(&self, bcs: &[BoundaryCoeffs]) -> WaResult<()> {
        if bcs.len() != self.mesh.n_patches() {
            return Err(WaError::size_mismatch("boundary coeffs", self.mesh.n_patches(), bcs.len()));
        }
        for (p, bc) in bcs.iter().enumerate() {
            if bc.len() != self.mesh.patch(p).size {
                return Err(WaError::size_mismatch("patch coeffs", self.mesh.patch(p).size, bc.len()));
            }
        }
        Ok(())
    }

    /// 隐式 Euler 时间项 `(ψ - ψ⁰) / Δt`
    pub fn ddt_euler(&mut self, dt: f64, old: &[f64]) -> WaResult<&mut Self> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(WaError::invalid_input(format!("时间步长必须为正: {dt}")));
        }
        self.check_cells("old field", old.len())?;
        for (c, &psi0) in old.iter().enumerate() {
            let rdt_v = self.mesh.cell_volume(c) / dt;
            self.diag[c] += rdt_v;
            self.source[c] += rdt_v * psi0;
        }
        Ok(self)
    }

    /// 迎风对流项 `∇·(φ ψ)`，φ 为面体积通量（owner → neighbour 为正）
    pub fn div_upwind(&mut self, phi: &SurfaceScalarField, bcs: &[BoundaryCoeffs]) -> WaResult<&mut Self> {
        if phi.values().len() != self.mesh.n_faces() {
            return Err(WaError::size_mismatch("flux", self.mesh.n_faces(), phi.values().len()));
        }
        self.check_patches(bcs)?;

        for f in 0..self.mesh.n_internal_faces() {
            let flux = phi.value(f);
            let own = self.mesh.face_owner(f);
            let Some(nei) = self.mesh.face_neighbour(f) else {
                continue;
            };
            if flux >= 0.0 {
                self.diag[own] += flux;
                self.lower[f] -= flux;
            } else {
                self.upper[f] += flux;
                self.diag[nei] -= flux;
            }
        }

        for (p, bc) in bcs.iter().enumerate() {
            for (local, face) in self.mesh.patch(p).faces().enumerate() {
                let flux = phi.value(face);
                let own = self.mesh.face_owner(face);
                if flux >= 0.0 {
                    self.diag[own] += flux;
                } else {
                    self.diag[own] += flux * bc.value_internal[local];
                    self.source[own] -= flux * bc.value_boundary[local];
                }
            }
        }
        Ok(self)
    }

    /// 扩散项 `-∇·(Γ ∇ψ)`，`gamma` 为逐面扩散系数
    pub fn laplacian(&mut self, gamma: &[f64], bcs: &[BoundaryCoeffs]) -> WaResult<&mut Self> {
        if gamma.len() != self.mesh.n_faces() {
            return Err(WaError::size_mismatch("face diffusivity", self.mesh.n_faces(), gamma.len()));
        }
        self.check_patches(bcs)?;

        for f in 0..self.mesh.n_internal_faces() {
            let own = self.mesh.face_owner(f);
            let Some(nei) = self.mesh.face_neighbour(f) else {
                continue;
            };
            let g = gamma[f] * self.mesh.face_area(f) * self.mesh.delta_coeff(f);
            self.diag[own] += g;
            self.diag[nei] += g;
            self.upper[f] -= g;
            self.lower[f] -= g;
        }

        for (p, bc) in bcs.iter().enumerate() {
            for (local, face) in self.mesh.patch(p).faces().enumerate() {
                let own = self.mesh.face_owner(face);
                let g = gamma[face] * self.mesh.face_area(face);
                self.diag[own] -= g * bc.gradient_internal[local];
                self.source[own] += g * bc.gradient_boundary[local];
            }
        }
        Ok(self)
    }

    /// 隐式源项：右端 `c ψ`
    pub fn sp(&mut self, coeff: &[f64]) -> WaResult<&mut Self> {
        self.check_cells("Sp coeff", coeff.len())?;
        for (c, &sp) in coeff.iter().enumerate() {
            self.diag[c] -= sp * self.mesh.cell_volume(c);
        }
        Ok(self)
    }

    /// 显式源项：右端 `s`
    pub fn su(&mut self, s: &[f64]) -> WaResult<&mut Self> {
        self.check_cells("Su", s.len())?;
        for (c, &su) in s.iter().enumerate() {
            self.source[c] += su * self.mesh.cell_volume(c);
        }
        Ok(self)
    }

    /// 按符号处理的源项：右端 `c ψ`
    ///
    /// `c > 0` 时以当前值 `psi` 显式处理，否则隐式处理以保持对角占优。
    pub fn su_sp(&mut self, coeff: &[f64], psi: &[f64]) -> WaResult<&mut Self> {
        self.check_cells("SuSp coeff", coeff.len())?;
        self.check_cells("SuSp field", psi.len())?;
        for (c, (&k, &value)) in coeff.iter().zip(psi).enumerate() {
            let v = self.mesh.cell_volume(c);
            if k > 0.0 {
                self.source[c] += k * v * value;
            } else {
                self.diag[c] -= k * v;
            }
        }
        Ok(self)
    }

    /// 对角系数
    #[inline]
    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    /// 上三角系数
    #[inline]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// 下三角系数
    #[inline]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// 右端项
    #[inline]
    pub fn source(&self) -> &[f64] {
        &self.source
    }

    /// 转为 CSR 矩阵
    pub fn to_csr(&self) -> CsrMatrix {
        let n = self.mesh.n_cells();
        let mut builder = CsrBuilder::new_square(n);
        for (c, &d) in self.diag.iter().enumerate() {
            builder.add(c, c, d);
        }
        for f in 0..self.mesh.n_internal_faces() {
            let own = self.mesh.face_owner(f);
            if let Some(nei) = self.mesh.face_neighbour(f) {
                builder.add(own, nei, self.upper[f]);
                builder.add(nei, own, self.lower[f]);
            }
        }
        builder.build()
    }

    /// 残差 `b - A ψ`
    pub fn residual(&self, psi: &[f64]) -> Vec<f64> {
        let mut ax = vec![0.0; psi.len()];
        self.to_csr().mul_vec(psi, &mut ax);
        self.source.iter().zip(&ax).map(|(b, a)| b - a).collect()
    }

    /// Jacobi 预条件 BiCGStab 求解，`psi` 为初值并原地更新
    ///
    /// 未收敛只记录警告，返回求解结果供调用方判断。
    pub fn solve(&self, psi: &mut [f64], config: SolverConfig, name: &str) -> WaResult<SolverResult> {
        self.check_cells("solution", psi.len())?;
        let matrix = self.to_csr();
        let precond = JacobiPreconditioner::from_matrix(&matrix);
        let mut solver = BiCgStabSolver::new(config);
        let result = solver.solve(&matrix, &self.source, psi, &precond);
        if result.is_converged() {
            log::debug!(
                "{name}: BiCGStab 初始残差 {:.3e}, 最终残差 {:.3e}, {} 次迭代",
                result.initial_residual_norm,
                result.residual_norm,
                result.iterations
            );
        } else {
            log::warn!(
                "{name}: 线性求解未收敛 ({:?}), 残差 {:.3e}",
                result.status,
                result.residual_norm
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PatchKind;
    use glam::DVec3;

    fn line(n: usize) -> FvMesh {
        FvMesh::cartesian_box([n, 1, 1], DVec3::new(1.0, 0.1, 0.1), [PatchKind::Patch; 6]).unwrap()
    }

    fn zero_gradient_all(mesh: &FvMesh) -> Vec<BoundaryCoeffs> {
        mesh.patches().iter().map(|p| BoundaryCoeffs::zero_gradient(p.size)).collect()
    }

    #[test]
    fn test_pure_diffusion_linear_profile() {
        let mesh = line(10);
        let mut bcs = zero_gradient_all(&mesh);
        let xmin = mesh.patch_index("xMin").unwrap();
        let xmax = mesh.patch_index("xMax").unwrap();
        bcs[xmin] = BoundaryCoeffs::fixed_value(&[0.0], &mesh.patch_delta_coeffs(xmin));
        bcs[xmax] = BoundaryCoeffs::fixed_value(&[1.0], &mesh.patch_delta_coeffs(xmax));

        let gamma = vec![1.0; mesh.n_faces()];
        let mut eqn = ScalarTransportMatrix::new(&mesh);
        eqn.laplacian(&gamma, &bcs).unwrap();

        let mut psi = vec![0.0; mesh.n_cells()];
        let result = eqn.solve(&mut psi, SolverConfig::new(1e-12, 200), "T").unwrap();
        assert!(result.is_converged());
        for c in 0..mesh.n_cells() {
            let x = mesh.cell_centre(c).x;
            assert!((psi[c] - x).abs() < 1e-8, "cell {c}: {} vs {x}", psi[c]);
        }
    }

    #[test]
    fn test_ddt_steady_state_unchanged() {
        let mesh = line(5);
        let old = vec![2.0; mesh.n_cells()];
        let mut eqn = ScalarTransportMatrix::new(&mesh);
        eqn.ddt_euler(0.1, &old).unwrap();
        eqn.laplacian(&vec![0.5; mesh.n_faces()], &zero_gradient_all(&mesh)).unwrap();
        let mut psi = old.clone();
        eqn.solve(&mut psi, SolverConfig::default(), "T").unwrap();
        for v in psi {
            assert!((v - 2.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_upwind_conserves_uniform_field() {
        let mesh = line(6);
        let u = crate::fields::VolField::uniform("U", &mesh, DVec3::X);
        let phi = SurfaceScalarField::flux("phi", &mesh, &u);
        let mut bcs = zero_gradient_all(&mesh);
        let xmin = mesh.patch_index("xMin").unwrap();
        bcs[xmin] = BoundaryCoeffs::fixed_value(&[1.0], &mesh.patch_delta_coeffs(xmin));

        let old = vec![1.0; mesh.n_cells()];
        let mut eqn = ScalarTransportMatrix::new(&mesh);
        eqn.ddt_euler(0.05, &old).unwrap().div_upwind(&phi, &bcs).unwrap();
        let residual = eqn.residual(&old);
        assert!(residual.iter().all(|r| r.abs() < 1e-12));
    }

    #[test]
    fn test_su_sp_sign_split() {
        let mesh = line(2);
        let mut eqn = ScalarTransportMatrix::new(&mesh);
        eqn.su_sp(&[2.0, -3.0], &[1.0, 1.0]).unwrap();
        let v0 = mesh.cell_volume(0);
        let v1 = mesh.cell_volume(1);
        assert!((eqn.source()[0] - 2.0 * v0).abs() < 1e-15);
        assert_eq!(eqn.diag()[0], 0.0);
        assert!((eqn.diag()[1] - 3.0 * v1).abs() < 1e-15);
        assert_eq!(eqn.source()[1], 0.0);
    }

    #[test]
    fn test_sp_and_su() {
        let mesh = line(2);
        let mut eqn = ScalarTransportMatrix::new(&mesh);
        eqn.sp(&[-1.0, -1.0]).unwrap().su(&[4.0, 4.0]).unwrap();
        let mut psi = vec![0.0; 2];
        eqn.solve(&mut psi, SolverConfig::default(), "T").unwrap();
        assert!((psi[0] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_size_checks() {
        let mesh = line(3);
        let mut eqn = ScalarTransportMatrix::new(&mesh);
        assert!(eqn.su(&[1.0]).is_err());
        assert!(eqn.ddt_euler(0.0, &[0.0; 3]).is_err());
        assert!(eqn.laplacian(&[1.0; 2], &zero_gradient_all(&mesh)).is_err());
    }

    #[test]
    fn test_fixed_gradient_coeffs() {
        let bc = BoundaryCoeffs::fixed_gradient(&[2.0], &[4.0]);
        assert_eq!(bc.value_boundary, vec![0.5]);
        assert_eq!(bc.gradient_boundary, vec![2.0]);
        assert_eq!(bc.gradient_internal, vec![0.0]);
    }
}
