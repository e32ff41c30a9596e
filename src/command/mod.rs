pub mod parser;

pub use parser::parse;
pub use parser::Command;
