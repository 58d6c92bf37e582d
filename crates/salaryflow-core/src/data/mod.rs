pub mod loader;
pub mod records;
