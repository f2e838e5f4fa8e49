//! Jacobi-preconditioned conjugate-gradient solver for small dense symmetric systems.

use thiserror::Error;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

/// Default relative residual tolerance, `‖r‖ / ‖b‖`.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    #[error("matrix is {rows}x{cols} but right-hand side has {rhs} entries")]
    DimensionMismatch { rows: usize, cols: usize, rhs: usize },
    #[error("zero pivot at iteration {iteration}")]
    ZeroPivot { iteration: usize },
    #[error("matrix is not positive definite (pᵀAp = {curvature} at iteration {iteration})")]
    NotPositiveDefinite { iteration: usize, curvature: f64 },
}

/// Row-major dense square matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Cyclic tridiagonal matrix with `(lower, diagonal, upper)` on every row.
    ///
    /// Row `j` has `lower` at column `j − 1` and `upper` at column `j + 1`,
    /// both taken modulo `size`.
    #[must_use]
    pub fn cyclic_tridiagonal(size: usize, lower: f64, diagonal: f64, upper: f64) -> Self {
        let mut matrix = Self::zeros(size);
        for row in 0..size {
            let prev = (row + size - 1) % size;
            let next = (row + 1) % size;
            matrix.add(row, prev, lower);
            matrix.add(row, next, upper);
            matrix.add(row, row, diagonal);
        }
        matrix
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.size + col] = value;
    }

    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.size + col] += value;
    }

    fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.size..(row + 1) * self.size]
    }

    #[must_use]
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.size).map(|row| dot(self.row(row), v)).collect()
    }
}

/// Outcome of a solve that did not hit a breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CgSolution {
    pub x: Vec<f64>,
    pub iterations: usize,
    /// Final `‖r‖ / ‖b‖`.
    pub relative_residual: f64,
    /// `false` when the iteration cap was reached first.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConjugateGradient {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ConjugateGradient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Solves `A·x = b` starting from `x = 0`.
    ///
    /// At most `min(max_iterations, n)` iterations are taken. Reaching that
    /// cap is not an error; the current iterate is returned with
    /// `converged == false`.
    ///
    /// # Errors
    /// [`SolveError::ZeroPivot`] when the previous `ρ` is exactly zero and
    /// [`SolveError::NotPositiveDefinite`] when a search direction has
    /// non-positive curvature.
    pub fn solve(&self, a: &DenseMatrix, b: &[f64]) -> Result<CgSolution, SolveError> {
        let n = a.size();
        if b.len() != n {
            return Err(SolveError::DimensionMismatch {
                rows: n,
                cols: n,
                rhs: b.len(),
            });
        }

        let mut x = vec![0.0; n];
        let bnorm2 = dot(b, b);
        if bnorm2 == 0.0 {
            return Ok(CgSolution {
                x,
                iterations: 0,
                relative_residual: 0.0,
                converged: true,
            });
        }

        let preconditioner: Vec<f64> = (0..n)
            .map(|j| {
                let diag = a.get(j, j);
                if diag == 0.0 { 0.0 } else { 1.0 / diag }
            })
            .collect();

        let mut r = b.to_vec();
        let mut p = vec![0.0; n];
        let mut rho_prev = 1.0;
        let mut relative_residual = 1.0;
        let limit = self.max_iterations.min(n);

        for iteration in 0..limit {
            let z: Vec<f64> = preconditioner.iter().zip(&r).map(|(c, r)| c * r).collect();
            let rho = dot(&r, &z);
            if rho_prev == 0.0 {
                return Err(SolveError::ZeroPivot { iteration });
            }
            let beta = rho / rho_prev;
            for (pj, zj) in p.iter_mut().zip(&z) {
                *pj = zj + beta * *pj;
            }

            let q = a.mul_vec(&p);
            let curvature = dot(&p, &q);
            if curvature <= 0.0 {
                return Err(SolveError::NotPositiveDefinite {
                    iteration,
                    curvature,
                });
            }

            let alpha = rho / curvature;
            for j in 0..n {
                x[j] += alpha * p[j];
                r[j] -= alpha * q[j];
            }
            rho_prev = rho;

            relative_residual = (dot(&r, &r) / bnorm2).sqrt();
            if relative_residual <= self.tolerance {
                return Ok(CgSolution {
                    x,
                    iterations: iteration + 1,
                    relative_residual,
                    converged: true,
                });
            }
        }

        log::debug!(
            "conjugate gradient stopped after {limit} iterations, residual {relative_residual:e}"
        );
        Ok(CgSolution {
            x,
            iterations: limit,
            relative_residual,
            converged: false,
        })
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}
