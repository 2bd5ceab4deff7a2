use std::{
    fs::File,
    io::{BufRead as _, BufReader, Read},
    path::Path,
};

/// Substituted when a class index cannot be resolved to a label.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("cannot open label file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot read label file: {0}")]
    Read(#[from] std::io::Error),
}

/// Ordered class-id to description mapping, one label per line of a text
/// file. The line index is the class id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LabelError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, LabelError> {
        let labels = BufReader::new(reader)
            .lines()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, class: usize) -> Option<&str> {
        self.labels.get(class).map(String::as_str)
    }

    /// Resolve a class index to its label, falling back to
    /// [`UNKNOWN_LABEL`] when the index is outside the table.
    ///
    /// `class_index_limit` reproduces the historical behavior of checking
    /// against a fixed constant instead of the table length: any index at
    /// or beyond the limit is unknown even if the table could resolve it.
    pub fn describe(&self, class: usize, class_index_limit: Option<usize>) -> &str {
        if let Some(limit) = class_index_limit {
            if class >= limit {
                return UNKNOWN_LABEL;
            }
        }
        self.get(class).unwrap_or(UNKNOWN_LABEL)
    }
}

impl FromIterator<String> for LabelTable {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(labels: &[&str]) -> LabelTable {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reads_one_label_per_line() {
        let input = "tabby cat\ngolden retriever\ntoaster\n";
        let table = LabelTable::from_reader(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some("tabby cat"));
        assert_eq!(table.get(1), Some("golden retriever"));
        assert_eq!(table.get(2), Some("toaster"));
    }

    #[test]
    fn no_trailing_newline() {
        let table = LabelTable::from_reader("a\nb".as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = LabelTable::load("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, LabelError::Open { .. }));
    }

    #[test]
    fn out_of_range_is_unknown() {
        let table = table(&["a", "b"]);
        assert_eq!(table.describe(1, None), "b");
        assert_eq!(table.describe(2, None), UNKNOWN_LABEL);
    }

    #[test]
    fn index_limit_masks_resolvable_labels() {
        let table = table(&["a", "b", "c"]);
        assert_eq!(table.describe(2, Some(2)), UNKNOWN_LABEL);
        assert_eq!(table.describe(1, Some(2)), "b");
    }
}
