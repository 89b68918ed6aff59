mod model;
mod parser;

pub use model::RunOutcome;
pub use parser::{parse_log_file, parse_log_source};
