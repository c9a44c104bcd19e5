//! Corpus Loading
//!
//! Reads text collections from plain files, one text per line.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::KernelError;

/// Load texts from `path`.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
pub fn load_texts(path: impl AsRef<Path>) -> Result<Vec<String>, KernelError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| KernelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let texts = parse_texts(&content);
    debug!(path = %path.display(), texts = texts.len(), "Loaded corpus");
    Ok(texts)
}

/// Split file content into texts
pub fn parse_texts(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_texts() {
        let texts = parse_texts("# Psalm 23\nThe Lord is my shepherd\n\n  I shall not want  \n");
        assert_eq!(texts, vec!["The Lord is my shepherd", "I shall not want"]);
    }

    #[test]
    fn test_load_texts() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "God is love").unwrap();
        writeln!(file, "Love is patient").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "The sky is blue").unwrap();

        let texts = load_texts(file.path()).unwrap();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[2], "The sky is blue");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let err = load_texts(&missing).unwrap_err();
        assert!(matches!(err, KernelError::Io { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }
}
