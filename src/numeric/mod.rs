//! Numeric building blocks shared by the outline pipelines.

pub mod conjugate_gradient;
pub mod fft;

pub use conjugate_gradient::{CgSolution, ConjugateGradient, DenseMatrix, SolveError};
pub use fft::{fft, fft_real, ifft, is_transform_length};
