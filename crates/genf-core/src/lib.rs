pub mod config;
pub mod error;
pub mod types;

pub use error::{GenfError, GenfResult};
pub use types::Direction;
