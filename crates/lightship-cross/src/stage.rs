use std::fmt;

use crate::config::{Layout, TargetConfig};
use crate::error::StageError;
use crate::sh::{CommandLine, Executor, ShOptions};

/// The build stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    Make,
    Install,
    Compress,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Configure, Stage::Make, Stage::Install, Stage::Compress];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::Make => "make",
            Stage::Install => "install",
            Stage::Compress => "compress",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Stage::Configure => "Configure phase failed",
            Stage::Make => "Compile phase failed",
            Stage::Install => "Install failed",
            Stage::Compress => "Compress phase failed",
        }
    }

    pub fn command(self, config: &TargetConfig, layout: &Layout) -> Result<CommandLine, StageError> {
        match self {
            Stage::Configure => Ok(CommandLine::new("cmake")
                .arg(format!(
                    "-DCMAKE_TOOLCHAIN_FILE={}",
                    layout.toolchain_file.display()
                ))
                .arg("-DCMAKE_BUILD_TYPE=Release")
                .arg(format!(
                    "-DCMAKE_INSTALL_PREFIX={}",
                    layout.install_prefix.display()
                ))
                .args(config.cmake_args.iter().cloned())
                .arg(layout.source_dir.to_string_lossy())),
            Stage::Make => {
                CommandLine::split(&config.make).ok_or(StageError::EmptyCommand { stage: self })
            }
            Stage::Install => {
                CommandLine::split(&config.install).ok_or(StageError::EmptyCommand { stage: self })
            }
            Stage::Compress => Ok(CommandLine::new("tar")
                .args(["--xz", "-cf"])
                .arg(layout.archive_name())
                .arg(layout.dest_folder_name.as_str())),
        }
    }

    /// `base` with the working directory this stage runs in.
    pub fn options(self, base: &ShOptions, layout: &Layout) -> ShOptions {
        let cwd = match self {
            Stage::Compress => layout.archive_dir().to_path_buf(),
            _ => layout.binary_path.clone(),
        };
        ShOptions {
            cwd: Some(cwd),
            ..base.clone()
        }
    }

    /// Run this stage and wait for it. Any non-zero exit is an error.
    pub fn run<E: Executor + ?Sized>(
        self,
        exec: &mut E,
        base: &ShOptions,
        config: &TargetConfig,
        layout: &Layout,
    ) -> Result<(), StageError> {
        let cmd = self.command(config, layout)?;
        let status = exec
            .execute(&cmd, &self.options(base, layout))
            .map_err(|source| StageError::Spawn {
                stage: self,
                program: cmd.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(StageError::Failed {
                stage: self,
                status,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run every stage in order, stopping at the first failure. Nothing is
/// cleaned up on failure; the build tree is left for inspection.
pub fn run_all<E: Executor + ?Sized>(
    exec: &mut E,
    base: &ShOptions,
    config: &TargetConfig,
    layout: &Layout,
) -> Result<(), StageError> {
    let total = Stage::ALL.len();
    for (i, stage) in Stage::ALL.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, total, stage);
        stage.run(exec, base, config, layout)?;
    }
    Ok(())
}
