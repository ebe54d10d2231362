pub mod error;
pub mod math;
pub mod types;

pub use error::{Result, RouterError};
pub use types::*;
