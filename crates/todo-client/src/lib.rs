pub mod board;
pub mod client;
pub mod error;
pub mod transport;

pub use board::*;
pub use client::*;
pub use error::*;
pub use transport::*;
