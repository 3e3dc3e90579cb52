pub mod parser;
pub mod types;
pub mod validator;

pub use parser::parse;
pub use types::{Action, Command, DEFAULT_SCROLL_AMOUNT};
pub use validator::{validate, Limits};
