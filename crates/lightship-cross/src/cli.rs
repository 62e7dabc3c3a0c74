use std::path::PathBuf;

use clap::Parser;

use crate::config::{TargetConfig, DEFAULT_WORK_DIR};
use crate::error::{Field, ValidationError};
use crate::sh::{ShOptions, ShOptionsBuilder, ShOptionsBuilderError, StreamMode};

/// Cross-compile one target: render toolchain templates, then configure,
/// build, install and archive it.
#[derive(Parser, Debug)]
#[command(name = "lightship-cross", version, about = "Assists in cross compiling")]
pub struct Cli {
    /// The name of the platform to compile for. Ends up in CMAKE_SYSTEM_NAME
    #[arg(long, env = "LIGHTSHIP_TARGET")]
    pub target: Option<String>,

    /// Target triplet to cross compile for, e.g. "x86_64-pc-linux-gnu"
    #[arg(long, env = "LIGHTSHIP_TRIPLET")]
    pub triplet: Option<String>,

    /// Sets the version string, e.g. "0.5.2-beta"
    #[arg(long = "set-version", env = "LIGHTSHIP_VERSION")]
    pub set_version: Option<String>,

    /// Full path to the C compiler
    #[arg(long, env = "LIGHTSHIP_C_COMPILER")]
    pub c_compiler: Option<String>,

    /// Full path to the Windows resource compiler, when compiling for Windows
    #[arg(long, env = "LIGHTSHIP_RC_COMPILER")]
    pub rc_compiler: Option<String>,

    /// The root path of the compiler
    #[arg(long, env = "LIGHTSHIP_COMPILER_ROOT")]
    pub compiler_root: Option<String>,

    /// Additional options to pass to CMake (repeatable)
    #[arg(long = "cmake", allow_hyphen_values = true)]
    pub cmake: Vec<String>,

    /// The command used to build the target, e.g. "make -j4" or "nmake"
    #[arg(long, env = "LIGHTSHIP_MAKE")]
    pub make: Option<String>,

    /// The command used to install the target
    #[arg(long, env = "LIGHTSHIP_INSTALL")]
    pub install: Option<String>,

    /// Ignored: the archive is always created with `tar --xz`
    #[arg(long, env = "LIGHTSHIP_COMPRESS")]
    pub compress: Option<String>,

    /// Project source directory (must contain scripts/cmake)
    #[arg(long, env = "LIGHTSHIP_SOURCE_DIR", default_value = ".")]
    pub source_dir: PathBuf,

    /// Working area for build and dist trees, relative to the source directory
    #[arg(long, env = "LIGHTSHIP_WORK_DIR", default_value = DEFAULT_WORK_DIR)]
    pub work_dir: PathBuf,

    /// Render templates and print stage commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Discard the standard output of build commands
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check required settings in a fixed order and report the first one
    /// missing. Optional settings default to empty.
    pub fn target_config(&self) -> Result<TargetConfig, ValidationError> {
        let required = |value: &Option<String>, field: Field| {
            value.clone().ok_or(ValidationError::Missing(field))
        };

        let target = required(&self.target, Field::Target)?;
        let triplet = required(&self.triplet, Field::Triplet)?;
        let c_compiler = required(&self.c_compiler, Field::CCompiler)?;
        let compiler_root = required(&self.compiler_root, Field::CompilerRoot)?;
        let make = required(&self.make, Field::Make)?;
        let install = required(&self.install, Field::Install)?;

        Ok(TargetConfig {
            target,
            triplet,
            version: self.set_version.clone().unwrap_or_default(),
            c_compiler,
            rc_compiler: self.rc_compiler.clone().unwrap_or_default(),
            compiler_root,
            cmake_args: self
                .cmake
                .iter()
                .flat_map(|a| a.split_whitespace())
                .map(str::to_string)
                .collect(),
            make,
            install,
        })
    }

    /// Stream settings shared by every stage.
    pub fn sh_options(&self) -> Result<ShOptions, ShOptionsBuilderError> {
        let mut builder = ShOptionsBuilder::default();
        if self.quiet {
            builder.stdout(StreamMode::Null);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    const FULL: &[&str] = &[
        "lightship-cross",
        "--target",
        "Windows",
        "--triplet",
        "x86_64-w64-mingw32",
        "--c-compiler",
        "/usr/bin/x86_64-w64-mingw32-gcc",
        "--compiler-root",
        "/usr/x86_64-w64-mingw32",
        "--make",
        "make -j4",
        "--install",
        "make install",
    ];

    /// Parse `args` ignoring any `LIGHTSHIP_*` variables in the environment.
    fn parse(args: &[&str]) -> Cli {
        let matches = Cli::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(args)
            .unwrap();
        Cli::from_arg_matches(&matches).unwrap()
    }

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_set_version_and_version_flag() {
        let cli = parse(&[FULL, &["--set-version", "0.5.2-beta"][..]].concat());
        assert_eq!(cli.target_config().unwrap().version, "0.5.2-beta");

        let err = Cli::try_parse_from(["lightship-cross", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_quiet_discards_stdout() {
        let quiet = parse(&[FULL, &["--quiet"][..]].concat()).sh_options().unwrap();
        assert_eq!(quiet.stdout, StreamMode::Null);
        assert_eq!(quiet.stderr, StreamMode::Inherit);

        let loud = parse(FULL).sh_options().unwrap();
        assert_eq!(loud.stdout, StreamMode::Inherit);
        assert_eq!(loud.cwd, None);
    }

    fn without(flag: &str) -> Vec<&'static str> {
        let mut out = Vec::new();
        let mut skip = false;
        for arg in FULL {
            if skip {
                skip = false;
                continue;
            }
            if *arg == flag {
                skip = true;
                continue;
            }
            out.push(*arg);
        }
        out
    }

    #[test]
    fn test_complete_arguments() {
        let config = parse(FULL).target_config().unwrap();
        assert_eq!(config.target, "Windows");
        assert_eq!(config.triplet, "x86_64-w64-mingw32");
        assert_eq!(config.make, "make -j4");
        assert_eq!(config.version, "");
        assert_eq!(config.rc_compiler, "");
        assert!(config.cmake_args.is_empty());
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in [
            Field::Target,
            Field::Triplet,
            Field::CCompiler,
            Field::CompilerRoot,
            Field::Make,
            Field::Install,
        ] {
            let err = parse(&without(field.flag())).target_config().unwrap_err();
            match &err {
                ValidationError::Missing(missing) => assert_eq!(*missing, field),
                other => panic!("unexpected error: {other}"),
            }
            assert!(err.to_string().contains(field.flag()));
        }
    }

    #[test]
    fn test_first_missing_field_wins() {
        let err = parse(&["lightship-cross", "--make", "make"])
            .target_config()
            .unwrap_err();
        assert!(matches!(err, ValidationError::Missing(Field::Target)));

        let err = parse(&["lightship-cross", "--target", "Linux", "--install", "x"])
            .target_config()
            .unwrap_err();
        assert!(matches!(err, ValidationError::Missing(Field::Triplet)));
    }

    #[test]
    fn test_cmake_args_are_split_and_accumulated() {
        let mut args = FULL.to_vec();
        args.extend([
            "--cmake",
            "-DFOO=1 -DBAR=2",
            "--cmake",
            "-G Ninja",
            "--set-version",
            "1.0",
        ]);
        let config = parse(&args).target_config().unwrap();
        assert_eq!(config.cmake_args, vec!["-DFOO=1", "-DBAR=2", "-G", "Ninja"]);
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_defaults() {
        let cli = parse(FULL);
        assert_eq!(cli.source_dir, PathBuf::from("."));
        assert_eq!(cli.work_dir, PathBuf::from("cross-build"));
        assert!(!cli.dry_run);
        assert!(!cli.quiet);
        assert!(cli.compress.is_none());
    }
}
