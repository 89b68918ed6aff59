mod model;
mod parser;

pub use model::{GridRecord, FIELD_NAMES};
pub use parser::{parse_grid_file, parse_grid_source, GridParseError};
