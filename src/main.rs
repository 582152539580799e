use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use progchain::graph::{self, Graph, ParamSet, Projection};
use progchain::render::{self, Format};
use progchain::{Result, model, spec};

#[derive(Parser)]
#[command(name = "progchain")]
#[command(about = "Chain tool descriptors into a producer/consumer graph", long_about = None)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the program graph and render it.
    Graph {
        /// Directory scanned recursively for *.json descriptors.
        #[arg(long, default_value = "./templates/")]
        templates: PathBuf,

        /// Starting parameters; keeps only programs reachable from them.
        #[arg(long, value_delimiter = ',', conflicts_with = "program")]
        seed: Vec<String>,

        /// Show a single program and the programs it feeds.
        #[arg(long)]
        program: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Dot)]
        format: Format,

        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.cmd {
        Commands::Graph {
            templates,
            seed,
            program,
            format,
            out,
        } => {
            // 1) Load + validate descriptors.
            let programs = spec::load_templates(&templates)?;

            let seed: ParamSet = seed
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();

            // 2) Build + converge, then pick the slice to show.
            let (graph, subgraph, convergence) = if !seed.is_empty() {
                let projected = graph::project(programs, &seed)?;
                match projected.projection {
                    Projection::Reachable(sub) => (projected.graph, sub, projected.convergence),
                    Projection::NoApplicablePrograms => {
                        let names: Vec<&str> = seed.iter().map(String::as_str).collect();
                        println!("No applicable programs for seed {{{}}}", names.join(", "));
                        return Ok(());
                    }
                }
            } else {
                let (graph, convergence) = Graph::resolve(programs)?;
                let sub = match &program {
                    Some(name) => graph.focus(name)?,
                    None => graph.whole(),
                };
                (graph, sub, convergence)
            };

            // 3) Render.
            let view = model::build_graph_view(&graph, &subgraph, &convergence);
            let rendered = render::render(&view, format)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", rendered),
            }
        }
    }

    Ok(())
}
