pub mod generator;
pub mod instance;
pub mod registry;
