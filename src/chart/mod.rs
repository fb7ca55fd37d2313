pub mod aff;
pub mod model;
