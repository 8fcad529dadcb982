pub mod backend;
pub mod csv_export;
pub mod extractor;
pub mod solver;
pub mod solver_params;
