use std::path::PathBuf;
use std::process::ExitStatus;

use crate::stage::Stage;

/// Problems with how the tool was invoked. Reported before anything is
/// written or spawned.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Please execute this tool from the source directory ({} has no scripts/cmake)", .0.display())]
    WrongDirectory(PathBuf),

    #[error("{0}")]
    Missing(Field),
}

/// Required settings, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Target,
    Triplet,
    CCompiler,
    CompilerRoot,
    Make,
    Install,
}

impl Field {
    pub fn flag(self) -> &'static str {
        match self {
            Field::Target => "--target",
            Field::Triplet => "--triplet",
            Field::CCompiler => "--c-compiler",
            Field::CompilerRoot => "--compiler-root",
            Field::Make => "--make",
            Field::Install => "--install",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Field::Target => "Please specify at least one platform",
            Field::Triplet => "Please specify a target triplet",
            Field::CCompiler => "Please specify a C compiler",
            Field::CompilerRoot => "Please specify the compiler root",
            Field::Make => "Please specify a command to make",
            Field::Install => "Please specify a command to install",
        };
        write!(f, "{msg} ({})", self.flag())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("{} ({status})", .stage.failure_message())]
    Failed { stage: Stage, status: ExitStatus },

    #[error("{}: could not spawn `{program}`", .stage.failure_message())]
    Spawn {
        stage: Stage,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: the {} command is empty", .stage.failure_message(), .stage)]
    EmptyCommand { stage: Stage },
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Failed { stage, .. }
            | StageError::Spawn { stage, .. }
            | StageError::EmptyCommand { stage } => *stage,
        }
    }
}
