pub mod brand;
pub mod config;
pub mod session;
