//! Input file loading for tag sets and popularity counts

use crate::data::{parquet, Dataset, PopularityMap, TagSet};
use crate::error::{AnalyzerError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Json,
    Parquet,
}

fn detect_format(path: &Path) -> Result<InputFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(InputFormat::Json),
        Some(ext) if ext.eq_ignore_ascii_case("parquet") => Ok(InputFormat::Parquet),
        _ => Err(AnalyzerError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load tag sets and popularity from JSON or Parquet files (chosen by extension)
pub fn load_dataset(tags_path: &Path, popularity_path: &Path) -> Result<Dataset> {
    let tag_sets = load_tag_sets(tags_path)?;
    let popularity = load_popularity(popularity_path)?;

    log::info!(
        "Loaded {} tag sets and popularity for {} tags",
        tag_sets.len(),
        popularity.len()
    );

    Ok(Dataset::new(tag_sets, popularity))
}

/// Load tag sets: a JSON array of string arrays, or a long-format Parquet file
pub fn load_tag_sets(path: &Path) -> Result<Vec<TagSet>> {
    match detect_format(path)? {
        InputFormat::Json => {
            log::info!("Reading tag sets from JSON file: {}", path.display());
            let file = File::open(path).map_err(|e| AnalyzerError::io(e, path))?;
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
        InputFormat::Parquet => parquet::load_tag_sets(path),
    }
}

/// Load popularity: a JSON object of tag to count, or a Parquet file
pub fn load_popularity(path: &Path) -> Result<PopularityMap> {
    match detect_format(path)? {
        InputFormat::Json => {
            log::info!("Reading tag popularity from JSON file: {}", path.display());
            let file = File::open(path).map_err(|e| AnalyzerError::io(e, path))?;
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
        InputFormat::Parquet => parquet::load_popularity(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_json_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let tags_path = dir.path().join("questions.json");
        let pop_path = dir.path().join("tags.json");

        let mut tags_file = File::create(&tags_path).unwrap();
        write!(tags_file, r#"[["python", "django"], ["rust"]]"#).unwrap();
        let mut pop_file = File::create(&pop_path).unwrap();
        write!(pop_file, r#"{{"python": 10, "django": 4, "rust": 7}}"#).unwrap();

        let dataset = load_dataset(&tags_path, &pop_path).unwrap();
        assert_eq!(dataset.tag_sets.len(), 2);
        assert_eq!(dataset.tag_sets[0], vec!["python", "django"]);
        assert_eq!(dataset.popularity["rust"], 7);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = load_tag_sets(Path::new("questions.xml"));
        assert!(matches!(result, Err(AnalyzerError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = load_popularity(Path::new("/nonexistent/tags.json"));
        match result {
            Err(AnalyzerError::Io { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/tags.json"))
            }
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
