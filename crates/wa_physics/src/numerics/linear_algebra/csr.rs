// crates/wa_physics/src/numerics/linear_algebra/csr.rs

//! 压缩稀疏行（CSR）矩阵格式
//!
//! CSR 使用三个数组存储：
//! - `row_ptr`: 行指针，长度 n_rows + 1，row_ptr[i] 是第 i 行第一个非零元的索引
//! - `col_idx`: 列索引，与非零元一一对应，每行内升序
//! - `values`: 非零元值
//!
//! 矩阵通过 [`CsrBuilder`] 逐项累加构建。

use std::collections::BTreeMap;

use rayon::prelude::*;

/// 超过该行数时 SpMV 并行执行
const PARALLEL_ROWS: usize = 2048;

/// CSR 稀疏矩阵
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// 单位矩阵
    pub fn identity(n: usize) -> Self {
        Self::diagonal(&vec![1.0; n])
    }

    /// 对角矩阵
    pub fn diagonal(diag: &[f64]) -> Self {
        let n = diag.len();
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: diag.to_vec(),
        }
    }

    /// 行数
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// 列数
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// 非零元数量
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// 行指针
    #[inline]
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// 列索引
    #[inline]
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// 非零元值
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn find_index(&self, row: usize, col: usize) -> Option<usize> {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_idx[start..end]
            .binary_search(&col)
            .ok()
            .map(|offset| start + offset)
    }

    /// 获取元素（不存在时为 0）
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.find_index(row, col).map_or(0.0, |i| self.values[i])
    }

    /// 提取对角线
    pub fn extract_diagonal(&self) -> Vec<f64> {
        (0..self.n_rows).map(|i| self.get(i, i)).collect()
    }

    fn row_dot(&self, row: usize, x: &[f64]) -> f64 {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&j, &a)| a * x[j])
            .sum()
    }

    /// 矩阵-向量乘法 y = A x
    pub fn mul_vec(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.n_cols);
        debug_assert_eq!(y.len(), self.n_rows);
        if self.n_rows > PARALLEL_ROWS {
            y.par_iter_mut()
                .enumerate()
                .for_each(|(i, yi)| *yi = self.row_dot(i, x));
        } else {
            for (i, yi) in y.iter_mut().enumerate() {
                *yi = self.row_dot(i, x);
            }
        }
    }

    /// 是否对称（容差 tol）
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if self.n_rows != self.n_cols {
            return false;
        }
        (0..self.n_rows).all(|i| {
            let start = self.row_ptr[i];
            let end = self.row_ptr[i + 1];
            (start..end).all(|k| (self.values[k] - self.get(self.col_idx[k], i)).abs() <= tol)
        })
    }
}

/// CSR 矩阵构建器
///
/// 重复写入同一位置时 [`CsrBuilder::add`] 累加，[`CsrBuilder::set`] 覆盖。
#[derive(Debug, Clone)]
pub struct CsrBuilder {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<BTreeMap<usize, f64>>,
}

impl CsrBuilder {
    /// 方阵构建器
    pub fn new_square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// 一般矩阵构建器
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: vec![BTreeMap::new(); n_rows],
        }
    }

    /// 设置元素
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(col < self.n_cols);
        self.rows[row].insert(col, value);
    }

    /// 累加元素
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(col < self.n_cols);
        *self.rows[row].entry(col).or_insert(0.0) += value;
    }

    /// 非零元数量
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(BTreeMap::len).sum()
    }

    /// 构建矩阵
    pub fn build(self) -> CsrMatrix {
        let mut row_ptr = Vec::with_capacity(self.n_rows + 1);
        let nnz = self.nnz();
        let mut col_idx = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        row_ptr.push(0);
        for row in self.rows {
            for (col, value) in row {
                col_idx.push(col);
                values.push(value);
            }
            row_ptr.push(col_idx.len());
        }
        CsrMatrix {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiag() -> CsrMatrix {
        let mut builder = CsrBuilder::new_square(3);
        builder.set(0, 0, 4.0);
        builder.set(0, 1, -1.0);
        builder.set(1, 0, -1.0);
        builder.set(1, 1, 4.0);
        builder.set(1, 2, -1.0);
        builder.set(2, 1, -1.0);
        builder.set(2, 2, 4.0);
        builder.build()
    }

    #[test]
    fn test_build_and_get() {
        let m = tridiag();
        assert_eq!(m.nnz(), 7);
        assert_eq!(m.get(1, 2), -1.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.extract_diagonal(), vec![4.0; 3]);
        assert!(m.is_symmetric(1e-14));
    }

    #[test]
    fn test_add_accumulates() {
        let mut builder = CsrBuilder::new_square(2);
        builder.add(0, 0, 1.0);
        builder.add(0, 0, 2.5);
        builder.add(1, 0, 1.0);
        let m = builder.build();
        assert_eq!(m.get(0, 0), 3.5);
        assert!(!m.is_symmetric(1e-14));
    }

    #[test]
    fn test_mul_vec() {
        let m = tridiag();
        let x = vec![1.0, 2.0, 3.0];
        let mut y = vec![0.0; 3];
        m.mul_vec(&x, &mut y);
        assert_eq!(y, vec![2.0, 4.0, 10.0]);
    }

    #[test]
    fn test_identity() {
        let m = CsrMatrix::identity(4);
        let x = vec![1.0, -2.0, 3.0, 0.5];
        let mut y = vec![0.0; 4];
        m.mul_vec(&x, &mut y);
        assert_eq!(x, y);
    }
}
