use std::process::ExitCode;

use clap::Parser;

use objviz::{ObjvizOptions, RenderArgs, run_main};
use objviz_core::Result;

#[derive(Parser, Debug)]
#[command(
    name = "objviz",
    about = "objviz: draw object graphs as Graphviz diagrams",
    version
)]
pub struct Cli {
    /// JSON heap snapshot to draw ('-' reads stdin)
    #[arg(value_name = "SNAPSHOT")]
    input: String,

    /// TOML diagram config; flags below override its keys
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<String>,

    #[command(flatten)]
    render: RenderArgs,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,
}

pub fn run(args: Cli) -> Result<()> {
    let opts = ObjvizOptions {
        input: args.input,
        config: args.config,
        render: args.render,
    };

    let output = run_main(&opts)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, &output)?;
            tracing::info!(path = %path, "output written");
        }
        None => print!("{output}"),
    }
    Ok(())
}

pub fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "execution failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
