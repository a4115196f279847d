//! streamwalk CLI - temporal random walks over an edge list.
//!
//! # Usage
//!
//! ```bash
//! # Split fb-forum chronologically, print graph stats and one linear walk
//! streamwalk data/fb-forum.edges --delimiter , --strategy linear --length 20
//!
//! # SocioPatterns contact file (t i j), uniform policy, 5 walks
//! streamwalk data/tij_SFHH.dat_ --time-first --strategy uniform --walks 5
//!
//! # Whole stream as one graph, no chronological split
//! streamwalk data/ia-contacts_hypertext2009.edges --delimiter , --no-split
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::fmt::Display;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use streamwalk::source::{
    force_undirected, read_edge_list, reindex_nodes, train_test_split, ColumnOrder, Delimiter,
    EdgeListFormat,
};
use streamwalk::{generate_temporal_walks, StreamGraph, Strategy, Timestamp, WalkConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "streamwalk")]
#[command(about = "Temporal random walks on stream graphs", long_about = None)]
struct Cli {
    /// Dataset: path to an edge list (one `src dst t` record per line)
    dataset: PathBuf,

    /// Sampling strategy: uniform, linear or exponential
    #[arg(short, long, default_value = "linear")]
    strategy: Strategy,

    /// Walk length in nodes (>= 2)
    #[arg(short, long, default_value = "20")]
    length: usize,

    /// Proportion of distinct times held out as the test graph, in (0, 1)
    /// (ignored with --no-split)
    #[arg(long, default_value = "0.1")]
    test_size: f64,

    /// Build one graph from every edge instead of a train/test pair
    #[arg(long)]
    no_split: bool,

    /// Add the mirrored (v, u, t) of every edge before building
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    undirected: bool,

    /// Number of walks to sample from the test graph (or the whole graph)
    #[arg(short, long, default_value = "1")]
    walks: usize,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Field delimiter (single character); whitespace when omitted
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Records are `t src dst` instead of `src dst t`
    #[arg(long)]
    time_first: bool,

    /// Parse times as floating point instead of integers
    #[arg(long)]
    float_time: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.float_time {
        run::<f64>(&cli)
    } else {
        run::<i64>(&cli)
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run<T>(cli: &Cli) -> Result<()>
where
    T: Timestamp + FromStr,
{
    let format = EdgeListFormat {
        delimiter: cli.delimiter.map_or(Delimiter::Whitespace, Delimiter::Char),
        columns: if cli.time_first {
            ColumnOrder::TimeSourceDestination
        } else {
            ColumnOrder::SourceDestinationTime
        },
    };

    // ------ Load & preprocess ------
    let start = Instant::now();
    let file = File::open(&cli.dataset)
        .with_context(|| format!("Failed to open {}", cli.dataset.display()))?;
    let raw = read_edge_list::<_, T>(file, format)
        .with_context(|| format!("Failed to parse {}", cli.dataset.display()))?;
    let (mut edges, labels) = reindex_nodes(&raw);
    if cli.undirected {
        edges = force_undirected(edges);
    }
    info!(
        edges = edges.len(),
        nodes = labels.len(),
        elapsed = ?start.elapsed(),
        "loaded {}",
        cli.dataset.display()
    );

    // ------ Stream graphs ------
    let graph = if cli.no_split {
        let graph = StreamGraph::build(edges).context("Failed to build graph")?;
        print_stats("Graph", &graph);
        graph
    } else {
        let (train_edges, test_edges) =
            train_test_split(&edges, cli.test_size).context("Failed to split edges")?;
        let train = StreamGraph::build(train_edges).context("Failed to build train graph")?;
        let test = StreamGraph::build(test_edges).context("Failed to build test graph")?;
        print_stats("Train graph", &train);
        print_stats("Test graph", &test);
        test
    };

    // ------ Temporal random walks ------
    let config = WalkConfig {
        length: cli.length,
        strategy: cli.strategy,
        num_walks: cli.walks,
        seed: cli.seed,
    };
    let walks = generate_temporal_walks(&graph, config).context("Failed to generate walks")?;

    for walk in &walks {
        let nodes: Vec<String> = walk.nodes.iter().map(|n| n.to_string()).collect();
        println!();
        println!("Start edge: {}", format_edge(&walk.nodes, &walk.times));
        println!("Temporal random walk: [{}]", nodes.join(", "));
        if walk.terminated_early() {
            println!(
                "  stopped after {} of {} nodes: {:?}",
                walk.len(),
                cli.length,
                walk.termination
            );
        }
    }
    Ok(())
}

fn print_stats<T: Timestamp>(name: &str, graph: &StreamGraph<T>) {
    println!();
    println!("{name}");
    println!("# nodes : {}", graph.number_of_nodes());
    println!("# edges : {}", graph.number_of_edges());
}

fn format_edge<T: Display>(nodes: &[usize], times: &[T]) -> String {
    match (nodes, times.first()) {
        ([u, v, ..], Some(t)) => format!("({u}, {v}, {t})"),
        _ => "-".to_string(),
    }
}
