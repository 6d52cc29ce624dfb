//! objviz command-line interface.
//!
//! Loads a JSON heap snapshot, layers command-line flags over an optional
//! TOML config, and renders the snapshot's roots as DOT.
pub mod options;
pub mod snapshot;

use std::time::Instant;

use tracing::info;

use objviz_core::Result;
use objviz_dot::{Diagram, DiagramConfig};

pub use options::RenderArgs;
pub use snapshot::Snapshot;

/// Options for running objviz.
#[derive(Debug, Clone, Default)]
pub struct ObjvizOptions {
    /// Snapshot path, or `-` for stdin.
    pub input: String,
    /// Optional TOML diagram config.
    pub config: Option<String>,
    pub render: RenderArgs,
}

/// Resolve the effective diagram config for `opts`.
pub fn load_config(opts: &ObjvizOptions) -> Result<DiagramConfig> {
    let mut config = match &opts.config {
        Some(path) => DiagramConfig::load(path)?,
        None => DiagramConfig::default(),
    };
    opts.render.apply(&mut config)?;
    Ok(config)
}

/// Main entry point
pub fn run_main(opts: &ObjvizOptions) -> Result<String> {
    let start = Instant::now();
    let config = load_config(opts)?;

    let snapshot = Snapshot::load(&opts.input)?;
    let roots = snapshot.instantiate()?;
    info!(
        objects = snapshot.object_count(),
        roots = roots.len(),
        "snapshot loaded"
    );

    let dot = Diagram::from_config(config).draw(&roots)?;
    info!(
        bytes = dot.len(),
        secs = start.elapsed().as_secs_f64(),
        "render complete"
    );
    Ok(dot)
}
