//! Cross-compile one target of the project.
//!
//! The run is a fixed pipeline: check the source tree, validate settings,
//! render the toolchain and install templates, then configure, make,
//! install and compress. The first failing step ends the run.

pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod sh;
pub mod stage;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::{Layout, SourceTree};
use crate::sh::Executor;

/// Run the whole pipeline with the given executor.
///
/// The source tree is checked before the arguments, and both before any
/// file is written.
pub fn run<E: Executor + ?Sized>(cli: &Cli, exec: &mut E) -> Result<Layout> {
    let tree = SourceTree::locate(&cli.source_dir)?;
    let config = cli.target_config()?;
    let base = cli.sh_options()?;

    if let Some(compress) = &cli.compress {
        log::warn!("--compress {compress:?} is ignored; archives are always created with tar --xz");
    }

    let layout = generate::generate_target(&tree, &config, &cli.work_dir)?;
    log::debug!("layout: {layout:?}");

    stage::run_all(exec, &base, &config, &layout)
        .with_context(|| format!("building {}", layout.dest_folder_name))?;

    Ok(layout)
}
