//! Client command types and parsing.

mod parse;
mod types;

pub use parse::is_valid_id;
pub use types::{Command, Usage};
