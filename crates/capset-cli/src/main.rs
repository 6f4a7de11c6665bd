//! Command-line front end for the cap enumeration engine and its
//! Monte-Carlo satellite.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use capset_core::dimension::Dimension;
use capset_engine::{EngineContext, EngineOpts, OutputSink};
use capset_graph::{IncidenceGraph, PointId};
use capset_sym::RefinementOracle;

/// Enumerate, or sample, maximal caps in AF(n, 3) up to affine symmetry.
#[derive(Debug, Parser)]
#[command(name = "capset-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the exhaustive orderly-generation engine for a fixed dimension.
    Enumerate {
        #[arg(long)]
        dimension: usize,
        #[arg(long)]
        no_alpha_prune: bool,
        #[arg(long)]
        no_symmetry_prune: bool,
        #[arg(long)]
        quiet: bool,
    },
    /// Run the greedy Monte-Carlo satellite sampler.
    Sample {
        #[arg(long)]
        dimension: usize,
        #[arg(long)]
        trials: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Discards every progress event; used under `--quiet`.
struct NullSink;

impl OutputSink for NullSink {
    fn enter(&mut self, _depth: usize, _point: PointId) {}
    fn leave(&mut self, _depth: usize) {}
    fn maximal(&mut self, _depth: usize, _cap: &[PointId]) {}
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Enumerate {
            dimension,
            no_alpha_prune,
            no_symmetry_prune,
            quiet,
        } => run_enumerate(dimension, !no_alpha_prune, !no_symmetry_prune, quiet),
        Command::Sample {
            dimension,
            trials,
            seed,
            out,
        } => run_sample(dimension, trials, seed, out),
    }
}

fn run_enumerate(dimension: usize, alpha_prune: bool, symmetry_prune: bool, quiet: bool) {
    let dim = match Dimension::new(dimension) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let graph = IncidenceGraph::build(dim).expect("incidence graph construction is infallible for a valid Dimension");
    let oracle = RefinementOracle::default();
    let opts = EngineOpts {
        alpha_prune,
        symmetry_prune,
    };
    let mut ctx = EngineContext::new(&graph, &oracle, opts);

    let started = Instant::now();
    if quiet {
        let mut sink = NullSink;
        ctx.run(&mut sink);
    } else {
        let mut sink = capset_engine::StdoutSink;
        ctx.run(&mut sink);
    }
    let elapsed = started.elapsed();

    println!("elapsed: {:.3}s", elapsed.as_secs_f64());
    println!("{:>3} | {:>12} | {:>12} | {:>10}", "N", "Cap(s)", "Case(s)", "Complete");
    for l in 0..=dim.max_depth() {
        let tots = &ctx.counters.tots[l];
        let cases = &ctx.counters.cases[l];
        let comps = &ctx.counters.comps[l];
        if tots.to_string() == "0" && comps.to_string() == "0" {
            continue;
        }
        println!("{:>3} | {:>12} | {:>12} | {:>10}", l, tots, cases, comps);
    }
}

fn run_sample(dimension: usize, trials: u64, seed: u64, out: Option<PathBuf>) {
    let config = capset_mcmc::SampleConfig {
        dimension,
        trials,
        seed,
    };
    let summary = match capset_mcmc::run_trials(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    println!("{}", summary.histogram.render_lines());

    if let Some(dir) = out {
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("error creating output directory: {e}");
            std::process::exit(1);
        }
        let stem = format!("n{dimension}_t{trials}");
        let hist_path = dir.join(format!("{stem}.txt"));
        let json_path = dir.join(format!("{stem}.json"));
        if let Err(e) = fs::write(&hist_path, summary.histogram.render_lines()) {
            eprintln!("error writing histogram: {e}");
            std::process::exit(1);
        }
        let json = serde_json::to_string_pretty(&summary).expect("SampleSummary always serializes");
        if let Err(e) = fs::write(&json_path, json) {
            eprintln!("error writing summary json: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_sample_writes_histogram_and_summary_files() {
        let dir = tempfile::tempdir().unwrap();
        run_sample(2, 25, 7, Some(dir.path().to_path_buf()));

        let hist_path = dir.path().join("n2_t25.txt");
        let json_path = dir.path().join("n2_t25.json");
        assert!(hist_path.exists());
        assert!(json_path.exists());

        let hist = fs::read_to_string(&hist_path).unwrap();
        assert!(!hist.is_empty());
    }
}
