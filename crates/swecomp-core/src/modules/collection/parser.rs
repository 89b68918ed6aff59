use super::model::CollectionEntry;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Parses a collection manifest: an ordered list of `DataSet` records under
/// a `Collection` element, each carrying `timestep` and `file` attributes.
///
/// A missing or non-finite timestep falls back to the record's position
/// index; a missing file attribute falls back to `unknown_<i>.vtr`. The
/// manifest itself failing to read or parse is a hard error: there is
/// nothing to iterate.
pub fn parse_collection_file(
    path: impl AsRef<Path>,
) -> Result<Vec<CollectionEntry>, CollectionParseError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| CollectionParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_collection_source(&source)
}

pub fn parse_collection_source(
    source: &str,
) -> Result<Vec<CollectionEntry>, CollectionParseError> {
    let document = roxmltree::Document::parse(source).map_err(CollectionParseError::Xml)?;
    let collection = document
        .root_element()
        .children()
        .find(|node| node.has_tag_name("Collection"))
        .ok_or(CollectionParseError::MissingCollection)?;

    let entries = collection
        .children()
        .filter(|node| node.has_tag_name("DataSet"))
        .enumerate()
        .map(|(index, dataset)| {
            let timestep = dataset
                .attribute("timestep")
                .and_then(|raw| raw.parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .unwrap_or(index as f64);
            let file = dataset
                .attribute("file")
                .map(str::to_string)
                .unwrap_or_else(|| format!("unknown_{}.vtr", index));
            CollectionEntry { timestep, file }
        })
        .collect();

    Ok(entries)
}

#[derive(Debug)]
pub enum CollectionParseError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Xml(roxmltree::Error),
    MissingCollection,
}

impl Display for CollectionParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(
                    f,
                    "failed to read collection manifest '{}': {}",
                    path.display(),
                    source
                )
            }
            Self::Xml(source) => write!(f, "malformed collection manifest: {}", source),
            Self::MissingCollection => {
                write!(f, "manifest does not contain a Collection element")
            }
        }
    }
}

impl Error for CollectionParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Xml(source) => Some(source),
            Self::MissingCollection => None,
        }
    }
}

impl From<CollectionParseError> for crate::domain::CompareError {
    fn from(error: CollectionParseError) -> Self {
        let message = error.to_string();
        match error {
            CollectionParseError::Read { .. } => Self::io_system("IO.COLLECTION_READ", message),
            CollectionParseError::Xml(_) | CollectionParseError::MissingCollection => {
                Self::parse("PARSE.COLLECTION_MANIFEST", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_collection_file, parse_collection_source, CollectionParseError};

    #[test]
    fn parses_ordered_timestep_file_pairs() {
        let entries = parse_collection_source(
            r#"
            <VTKFile type="Collection">
              <Collection>
                <DataSet timestep="0.0" file="wave_0.vtr"/>
                <DataSet timestep="0.5" file="wave_1.vtr"/>
                <DataSet timestep="1.0" file="wave_2.vtr"/>
              </Collection>
            </VTKFile>
            "#,
        )
        .expect("manifest should parse");

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].timestep, 0.5);
        assert_eq!(entries[2].file, "wave_2.vtr");
    }

    #[test]
    fn bad_or_missing_timestep_falls_back_to_position() {
        let entries = parse_collection_source(
            r#"
            <VTKFile>
              <Collection>
                <DataSet timestep="oops" file="a.vtr"/>
                <DataSet file="b.vtr"/>
                <DataSet timestep="inf" file="c.vtr"/>
              </Collection>
            </VTKFile>
            "#,
        )
        .expect("manifest should parse");

        assert_eq!(entries[0].timestep, 0.0);
        assert_eq!(entries[1].timestep, 1.0);
        assert_eq!(entries[2].timestep, 2.0);
    }

    #[test]
    fn missing_file_attribute_falls_back_to_placeholder_name() {
        let entries = parse_collection_source(
            "<VTKFile><Collection><DataSet timestep=\"1\"/></Collection></VTKFile>",
        )
        .expect("manifest should parse");
        assert_eq!(entries[0].file, "unknown_0.vtr");
    }

    #[test]
    fn manifest_without_collection_element_is_rejected() {
        assert!(matches!(
            parse_collection_source("<VTKFile></VTKFile>"),
            Err(CollectionParseError::MissingCollection)
        ));
    }

    #[test]
    fn missing_manifest_is_a_hard_error() {
        assert!(matches!(
            parse_collection_file("/nonexistent/SWE1D.vtp"),
            Err(CollectionParseError::Read { .. })
        ));
    }
}
