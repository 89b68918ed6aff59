use super::model::{FIELD_NAMES, GridRecord};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Parses a structured-grid result file: a `Coordinates` block holding the
/// cell-boundary positions and a `CellData` block holding named value
/// arrays. Field names are matched exactly and case-sensitively against
/// `h`, `hu`, `b`; array contents are whitespace-separated decimal tokens.
pub fn parse_grid_file(path: impl AsRef<Path>) -> Result<GridRecord, GridParseError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| GridParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_grid_source(&source)
}

pub fn parse_grid_source(source: &str) -> Result<GridRecord, GridParseError> {
    let document = roxmltree::Document::parse(source).map_err(GridParseError::Xml)?;
    let root = document.root_element();

    let coordinates = root
        .descendants()
        .find(|node| node.has_tag_name("Coordinates"))
        .and_then(|block| {
            block
                .children()
                .find(|child| child.has_tag_name("DataArray"))
        })
        .map(|array| parse_value_tokens("coordinates", array.text().unwrap_or_default()))
        .transpose()?;

    let mut record = GridRecord {
        coordinates,
        ..GridRecord::default()
    };

    if let Some(cell_data) = root
        .descendants()
        .find(|node| node.has_tag_name("CellData"))
    {
        for array in cell_data
            .children()
            .filter(|child| child.has_tag_name("DataArray"))
        {
            let Some(name) = array.attribute("Name") else {
                continue;
            };
            if !FIELD_NAMES.contains(&name) {
                continue;
            }
            let values = parse_value_tokens(name, array.text().unwrap_or_default())?;
            match name {
                "h" => record.h = Some(values),
                "hu" => record.hu = Some(values),
                "b" => record.b = Some(values),
                _ => unreachable!("FIELD_NAMES is exhaustive"),
            }
        }
    }

    Ok(record)
}

fn parse_value_tokens(array_name: &str, text: &str) -> Result<Vec<f64>, GridParseError> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| GridParseError::BadToken {
                array: array_name.to_string(),
                token: token.to_string(),
            })
        })
        .collect()
}

#[derive(Debug)]
pub enum GridParseError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Xml(roxmltree::Error),
    BadToken {
        array: String,
        token: String,
    },
}

impl Display for GridParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(
                    f,
                    "failed to read result file '{}': {}",
                    path.display(),
                    source
                )
            }
            Self::Xml(source) => write!(f, "malformed result container: {}", source),
            Self::BadToken { array, token } => {
                write!(f, "array '{}' holds non-numeric token '{}'", array, token)
            }
        }
    }
}

impl Error for GridParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Xml(source) => Some(source),
            Self::BadToken { .. } => None,
        }
    }
}
