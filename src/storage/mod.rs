//! Results persistence module

pub mod graphml;
pub mod repository;

use crate::cluster::Community;
use crate::error::{AnalyzerError, Result};
use crate::graph::TagGraph;
use crate::pipeline::PipelineOutput;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Paths of the files written by [`save_results`]
#[derive(Debug, Clone, Default)]
pub struct SavedFiles {
    pub map: PathBuf,
    pub induced: Option<PathBuf>,
    pub top: Option<PathBuf>,
    pub summary: PathBuf,
}

/// Save analysis results to the specified directory, named after `site`
pub fn save_results(output: &PipelineOutput, output_dir: &Path, site: &str) -> Result<SavedFiles> {
    log::info!("Saving results to {}", output_dir.display());

    fs::create_dir_all(output_dir).map_err(|e| AnalyzerError::io(e, output_dir))?;

    let mut saved = SavedFiles {
        map: output_dir.join(format!("map-{}.graphml", site)),
        summary: output_dir.join(format!("summary-{}.json", site)),
        ..SavedFiles::default()
    };

    write_file(&saved.map, |out| graphml::write_tag_graph(output.graph(), out))?;

    if let PipelineOutput::WithCommunities(analysis) = output {
        let induced = output_dir.join(format!("induced-{}.graphml", site));
        write_file(&induced, |out| graphml::write_induced_graph(&analysis.induced, out))?;
        saved.induced = Some(induced);

        let top = output_dir.join(format!("top-{}.csv", site));
        write_file(&top, |out| write_top_tags(&analysis.communities, out))?;
        saved.top = Some(top);
    }

    save_summary(output, &saved.summary)?;

    log::info!("Results saved successfully");

    Ok(saved)
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| AnalyzerError::io(e, path))?;
    let mut out = BufWriter::new(file);
    write(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| AnalyzerError::io(e, path))
}

/// Quote a CSV field when it holds a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One row per community listing its representative tags
pub fn write_top_tags<W: Write>(communities: &[Community], out: &mut W) -> std::io::Result<()> {
    for community in communities {
        let row: Vec<String> = community.top_tags.iter().map(|t| csv_field(t)).collect();
        writeln!(out, "{}", row.join(","))?;
    }
    Ok(())
}

fn graph_stats(graph: &TagGraph) -> serde_json::Value {
    let node_count = graph.node_count();
    let mut top_central: Vec<(&str, f64)> =
        graph.nodes().map(|n| (n.tag.as_str(), n.centrality)).collect();
    top_central.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    top_central.truncate(10);

    let avg_degree = if node_count == 0 {
        0.0
    } else {
        2.0 * graph.edge_count() as f64 / node_count as f64
    };

    json!({
        "node_count": node_count,
        "edge_count": graph.edge_count(),
        "avg_degree": avg_degree,
        "most_central": top_central
            .iter()
            .map(|(tag, score)| json!({ "tag": tag, "centrality": score }))
            .collect::<Vec<_>>(),
    })
}

/// Save summary information
fn save_summary(output: &PipelineOutput, path: &Path) -> Result<()> {
    log::info!("Saving summary information");

    let summary = match output {
        PipelineOutput::GraphOnly(graph) => json!({
            "graph_stats": graph_stats(graph),
        }),
        PipelineOutput::WithCommunities(analysis) => json!({
            "graph_stats": graph_stats(&analysis.graph),
            "community_stats": {
                "community_count": analysis.detection.community_count,
                "modularity": analysis.detection.modularity,
                "first_pass_modularity": analysis.detection.first_pass_modularity,
                "trivial": analysis.detection.is_trivial(),
                "levels": analysis.detection.levels,
                "largest_community_size": analysis.communities.iter().map(|c| c.size).max().unwrap_or(0),
            },
            "communities": analysis.communities.iter().map(|c| json!({
                "id": c.id,
                "size": c.size,
                "density": c.density,
                "popularity": c.popularity,
                "top_tags": c.top_tags,
            })).collect::<Vec<_>>(),
        }),
    };

    let mut file = File::create(path).map_err(|e| AnalyzerError::io(e, path))?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())
        .map_err(|e| AnalyzerError::io(e, path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community(id: usize, tags: &[&str]) -> Community {
        let tags: Vec<String> = tags.iter().map(|s| s.to_string()).collect();
        Community {
            id,
            size: tags.len(),
            density: 1.0,
            popularity: 0,
            top_tags: tags.clone(),
            members: tags,
        }
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("rust"), "rust");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_top_tags_rows() {
        let communities = vec![community(0, &["python", "django"]), community(1, &["c#", ".net"])];
        let mut out = Vec::new();
        write_top_tags(&communities, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "python,django\nc#,.net\n");
    }

    #[test]
    fn test_graph_only_writes_map_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = TagGraph::new();
        graph.add_edge("a", "b", 1.0);

        let saved = save_results(&PipelineOutput::GraphOnly(graph), dir.path(), "example.com").unwrap();
        assert!(saved.map.ends_with("map-example.com.graphml"));
        assert!(saved.map.exists());
        assert!(saved.summary.exists());
        assert!(saved.induced.is_none());
        assert!(saved.top.is_none());

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&saved.summary).unwrap()).unwrap();
        assert_eq!(summary["graph_stats"]["node_count"], 2);
    }
}
