// File: src/repositories/mod.rs

pub mod file;
pub mod memory;
pub mod postgres;

pub use file::JsonFileContentStore;
pub use memory::InMemoryContentStore;
pub use postgres::PostgresContentStore;
