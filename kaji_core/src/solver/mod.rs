//! ADMM guidance solver

mod linalg;
mod operator;
mod proj;
mod grid;
mod solver_error;
mod solver;

pub use linalg::*;
pub use operator::*;
pub use proj::*;
pub use grid::*;
pub use solver_error::*;
pub use solver::*;
