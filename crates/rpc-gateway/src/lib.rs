pub mod gateway;
pub mod lambda;
pub mod procedure;

pub use gateway::*;
pub use lambda::*;
pub use procedure::*;
