pub mod database;
pub mod models;
pub mod todo_repository;

pub use database::*;
pub use models::*;
pub use todo_repository::*;
