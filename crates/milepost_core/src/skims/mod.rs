pub mod skim_matrix;
pub mod skim_runner;
