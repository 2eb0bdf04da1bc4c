pub mod content;

pub use content::PostgresContentStore;
