pub mod bag;
pub mod schema;
pub mod value;
