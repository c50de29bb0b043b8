pub mod errors;
pub mod input;
pub mod repository;
pub mod service;
pub mod todo;

pub use errors::*;
pub use input::*;
pub use repository::*;
pub use service::*;
pub use todo::*;
