//! Parquet file handling for question tag data

use crate::data::{PopularityMap, TagSet};
use crate::error::{AnalyzerError, Result};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

fn scan(path: &Path) -> Result<DataFrame> {
    log::info!("Reading parquet file: {}", path.display());

    if !path.exists() {
        return Err(AnalyzerError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            path,
        ));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;
    log::debug!("File schema: {:?}", df.schema());

    Ok(df)
}

/// Load tag sets from a long-format file with `QuestionId` and `Tag` columns.
///
/// Rows sharing a question id form one tag set, so repeated questions
/// collapse into a single set. Sets come back in first-seen question order.
pub fn load_tag_sets(path: &Path) -> Result<Vec<TagSet>> {
    let df = scan(path)?;

    let question_col = df.column("QuestionId")?.cast(&DataType::String)?;
    let question_ids = question_col.str()?;
    let tags = df.column("Tag")?.str()?;

    let row_count = df.height();
    log::info!("Processing {} question/tag rows", row_count);

    let mut index_of: HashMap<&str, usize> = HashMap::new();
    let mut tag_sets: Vec<TagSet> = Vec::new();

    for i in 0..row_count {
        let (Some(question), Some(tag)) = (question_ids.get(i), tags.get(i)) else {
            continue;
        };

        let idx = *index_of.entry(question).or_insert_with(|| {
            tag_sets.push(Vec::new());
            tag_sets.len() - 1
        });
        tag_sets[idx].push(tag.to_string());
    }

    log::info!("Loaded {} questions", tag_sets.len());

    Ok(tag_sets)
}

/// Load tag popularity from a file with `Tag` and `Count` columns
pub fn load_popularity(path: &Path) -> Result<PopularityMap> {
    let df = scan(path)?;

    let tags = df.column("Tag")?.str()?;
    let count_col = df.column("Count")?.cast(&DataType::UInt64)?;
    let counts = count_col.u64()?;

    let mut popularity = PopularityMap::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(tag), Some(count)) = (tags.get(i), counts.get(i)) {
            popularity.insert(tag.to_string(), count);
        }
    }

    log::info!("Loaded popularity for {} tags", popularity.len());

    Ok(popularity)
}
