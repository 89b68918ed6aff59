/// Field names extracted from a result file, in display order.
pub const FIELD_NAMES: [&str; 3] = ["h", "hu", "b"];

/// Parsed contents of one structured-grid result file.
///
/// Any of the named fields may be absent (schemes do not all emit the same
/// fields) and arrays are not required to share a length with each other or
/// with the coordinate array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridRecord {
    pub coordinates: Option<Vec<f64>>,
    pub h: Option<Vec<f64>>,
    pub hu: Option<Vec<f64>>,
    pub b: Option<Vec<f64>>,
}

impl GridRecord {
    pub fn field(&self, name: &str) -> Option<&[f64]> {
        match name {
            "h" => self.h.as_deref(),
            "hu" => self.hu.as_deref(),
            "b" => self.b.as_deref(),
            _ => None,
        }
    }

    pub fn has_any_field(&self) -> bool {
        FIELD_NAMES.iter().any(|name| self.field(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::GridRecord;

    #[test]
    fn field_lookup_is_exact_and_case_sensitive() {
        let record = GridRecord {
            h: Some(vec![1.0]),
            ..GridRecord::default()
        };
        assert!(record.field("h").is_some());
        assert!(record.field("H").is_none());
        assert!(record.field("hu").is_none());
    }

    #[test]
    fn field_presence_ignores_a_bare_coordinate_array() {
        let record = GridRecord {
            coordinates: Some(vec![0.0, 1.0, 2.0, 3.0]),
            b: Some(vec![0.0, 0.0]),
            ..GridRecord::default()
        };
        assert!(record.has_any_field());

        let coords_only = GridRecord {
            coordinates: Some(vec![0.0, 1.0]),
            ..GridRecord::default()
        };
        assert!(!coords_only.has_any_field());
        assert!(!GridRecord::default().has_any_field());
    }
}
