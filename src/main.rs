use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use tag_network_analyzer::config::Config;
use tag_network_analyzer::data::input::load_dataset;
use tag_network_analyzer::data::Dataset;
use tag_network_analyzer::pipeline::{self, PipelineOutput};
use tag_network_analyzer::storage;
use tag_network_analyzer::storage::repository::{FileRepository, Repository};

#[derive(Parser, Debug)]
#[clap(
    name = "tag-network-analyzer",
    about = "Tag co-occurrence network and community analysis"
)]
struct Cli {
    /// Question tag sets (.json or .parquet)
    #[clap(long)]
    tags: PathBuf,

    /// Tag popularity counts (.json or .parquet)
    #[clap(long)]
    popularity: PathBuf,

    /// Output directory for results
    #[clap(long, default_value = "results")]
    output_dir: PathBuf,

    /// Site name used in output file names
    #[clap(long, default_value = "stackoverflow.com")]
    site: String,

    /// Cache parsed inputs in this directory
    #[clap(long)]
    cache_dir: Option<PathBuf>,

    /// JSON configuration file (replaces the threshold flags below)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Minimum co-occurrence count for an edge
    #[clap(long, default_value = "6")]
    edge_threshold: usize,

    /// Minimum degree for a node when the graph is over the node limit
    #[clap(long, default_value = "8")]
    node_threshold: usize,

    /// Soft cap on the number of nodes
    #[clap(long, default_value = "1000")]
    node_limit: usize,

    /// Never apply the degree filter
    #[clap(long)]
    no_node_limit: bool,

    /// Representative tags per community
    #[clap(long, default_value = "5")]
    top_howmany: usize,

    /// Representative tags used in induced graph labels
    #[clap(long, default_value = "2")]
    top_labels: usize,

    /// Build the tag graph only
    #[clap(long)]
    skip_communities: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config {
                edge_slicing_threshold: self.edge_threshold,
                node_slicing_threshold: self.node_threshold,
                node_limit: (!self.no_node_limit).then_some(self.node_limit),
                top_howmany: self.top_howmany,
                top_labels: self.top_labels,
                ..Config::default()
            },
        };
        if self.skip_communities {
            config.detect_communities = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_cached<R: Repository>(repo: &R, key: &str, tags: &Path, popularity: &Path) -> Result<Dataset> {
    Ok(repo.fetch_or_compute(key, || load_dataset(tags, popularity))?)
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Validate before any work starts
    let config = args.to_config()?;

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting tag network analysis for {}", args.site);
    log::info!("Output: {}", args.output_dir.display());

    // 1. Load data
    let dataset = match &args.cache_dir {
        Some(dir) => {
            let repo = FileRepository::new(dir);
            load_cached(&repo, &format!("data-{}", args.site), &args.tags, &args.popularity)?
        }
        None => load_dataset(&args.tags, &args.popularity)?,
    };

    // 2. Build the graph and, if enabled, its communities
    let output = pipeline::run(&dataset, &config)?;

    log::info!(
        "Tag graph has {} nodes and {} edges",
        output.graph().node_count(),
        output.graph().edge_count()
    );
    if let PipelineOutput::WithCommunities(analysis) = &output {
        log::info!("Found {} communities", analysis.communities.len());
    }

    // 3. Save results
    let saved = storage::save_results(&output, &args.output_dir, &args.site)?;

    log::info!("Analysis complete. Graph saved to {}", saved.map.display());

    Ok(())
}
