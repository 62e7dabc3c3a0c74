use std::path::{Path, PathBuf};

use crate::error::ValidationError;

/// Name every archive and build folder starts with.
pub const PRODUCT: &str = "lightship";

/// Default working area, relative to the source tree.
pub const DEFAULT_WORK_DIR: &str = "cross-build";

/// Settings for one cross-compilation target, as given by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Platform name, written to `CMAKE_SYSTEM_NAME`.
    pub target: String,
    /// e.g. `x86_64-w64-mingw32`
    pub triplet: String,
    /// Empty if not given.
    pub version: String,
    pub c_compiler: String,
    /// Windows resource compiler. Empty if not given.
    pub rc_compiler: String,
    pub compiler_root: String,
    /// Extra arguments for the configure step, already split into words.
    pub cmake_args: Vec<String>,
    pub make: String,
    pub install: String,
}

impl TargetConfig {
    /// `lightship-<version>-<triplet>`
    pub fn dest_folder_name(&self) -> String {
        format!("{PRODUCT}-{}-{}", self.version, self.triplet)
    }
}

/// The project source directory. Must contain `scripts/cmake`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    root: PathBuf,
}

impl SourceTree {
    pub fn locate(dir: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let dir = dir.as_ref();
        if !dir.join("scripts/cmake").is_dir() {
            return Err(ValidationError::WrongDirectory(dir.to_path_buf()));
        }
        let root = dir
            .canonicalize()
            .map_err(|_| ValidationError::WrongDirectory(dir.to_path_buf()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the `*.cmake.in` templates live.
    pub fn cmake_dir(&self) -> PathBuf {
        self.root.join("scripts/cmake")
    }

    /// Generated toolchain files; ignored by version control.
    pub fn toolchains_dir(&self) -> PathBuf {
        self.cmake_dir().join("toolchains")
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }
}

/// Absolute paths derived from a [`TargetConfig`] and a [`SourceTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub source_dir: PathBuf,
    pub dest_folder_name: String,
    /// CMake binary directory; every build stage runs here.
    pub binary_path: PathBuf,
    pub install_prefix: PathBuf,
    pub toolchain_file: PathBuf,
}

impl Layout {
    /// `work_dir` is taken relative to the source tree unless absolute.
    pub fn new(tree: &SourceTree, config: &TargetConfig, work_dir: impl AsRef<Path>) -> Self {
        let work = tree.resolve(work_dir);
        let folder = config.dest_folder_name();
        Self {
            source_dir: tree.root().to_path_buf(),
            binary_path: work.join("build").join(&folder),
            install_prefix: work.join("dist").join(&folder),
            toolchain_file: tree
                .toolchains_dir()
                .join(format!("toolchain-{}.cmake", config.triplet)),
            dest_folder_name: folder,
        }
    }

    /// Directory the archive is created in: the parent of the install prefix.
    pub fn archive_dir(&self) -> &Path {
        self.install_prefix
            .parent()
            .unwrap_or(self.install_prefix.as_path())
    }

    pub fn archive_name(&self) -> String {
        format!("{}.tar.xz", self.dest_folder_name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.archive_dir().join(self.archive_name())
    }
}
