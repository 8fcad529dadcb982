pub mod constraints;
pub mod dinner_model;
pub mod linear;
pub mod objective;
pub mod variables;
