pub mod repository;
pub mod store;

pub use repository::JsonFileRepository;
pub use store::*;
