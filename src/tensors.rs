//! Dense matrices and linear system solvers over fields.

pub mod matrix;
