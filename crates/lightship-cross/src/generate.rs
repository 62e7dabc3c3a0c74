use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mini_template::{ensure_dir, TemplateProcessor};

use crate::config::{Layout, SourceTree, TargetConfig};

pub const INSTALL_TEMPLATE: &str = "install-arch.cmake.in";
pub const TOOLCHAIN_TEMPLATE: &str = "toolchain-arch.cmake.in";

/// Derive the target's paths, create the build and install directories and
/// render the install script and toolchain file.
pub fn generate_target(
    tree: &SourceTree,
    config: &TargetConfig,
    work_dir: impl AsRef<Path>,
) -> Result<Layout> {
    let layout = Layout::new(tree, config, work_dir);

    ensure_dir(&layout.binary_path)?;
    ensure_dir(&layout.install_prefix)?;

    let written = processor(tree, config, &layout)
        .process_all()
        .with_context(|| format!("rendering templates for {}", config.triplet))?;
    for path in &written {
        log::info!("generated {}", path.display());
    }

    Ok(layout)
}

/// Output path of the rendered install script.
pub fn install_script(layout: &Layout) -> PathBuf {
    layout.binary_path.join("install-arch.cmake")
}

fn processor(tree: &SourceTree, config: &TargetConfig, layout: &Layout) -> TemplateProcessor {
    let mut t = TemplateProcessor::new();

    // Templates come from scripts/cmake; outputs are absolute, except that
    // relative ones land in the source tree.
    t.set_source_root(tree.cmake_dir())
        .set_destination_root(tree.root())
        .add_template(INSTALL_TEMPLATE, install_script(layout))
        .add_template(TOOLCHAIN_TEMPLATE, &layout.toolchain_file);

    t.add_substitution("ARCH_NAME", config.target.as_str())
        .add_substitution("BUILD_DIR", layout.binary_path.to_string_lossy())
        .add_substitution("C_COMPILER", config.c_compiler.as_str())
        .add_substitution("RC_COMPILER", config.rc_compiler.as_str())
        .add_substitution("ROOT_PATH", config.compiler_root.as_str())
        .add_substitution(
            format!("{}_INSTALL_PREFIX", config.triplet),
            layout.install_prefix.to_string_lossy(),
        );
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{sample_config, source_tree};
    use std::fs;

    const TOOLCHAIN: &str = "\
set(CMAKE_SYSTEM_NAME ARCH_NAME)
set(cross_cc \"C_COMPILER\")
set(cross_rc \"RC_COMPILER\")
set(cross_root \"ROOT_PATH\")
";

    const INSTALL: &str = "\
file(INSTALL BUILD_DIR/bin DESTINATION x86_64-w64-mingw32_INSTALL_PREFIX)
";

    fn write_templates(tree: &SourceTree) {
        fs::write(tree.cmake_dir().join(TOOLCHAIN_TEMPLATE), TOOLCHAIN).unwrap();
        fs::write(tree.cmake_dir().join(INSTALL_TEMPLATE), INSTALL).unwrap();
    }

    #[test]
    fn test_generate_renders_both_templates() {
        let (_tmp, tree) = source_tree();
        write_templates(&tree);
        let config = sample_config();

        let layout = generate_target(&tree, &config, "cross-build").unwrap();

        assert!(layout.binary_path.is_dir());
        assert!(layout.install_prefix.is_dir());

        let toolchain = fs::read_to_string(&layout.toolchain_file).unwrap();
        assert_eq!(
            toolchain,
            "\
set(CMAKE_SYSTEM_NAME Windows)
set(cross_cc \"/opt/mingw/bin/x86_64-w64-mingw32-gcc\")
set(cross_rc \"/opt/mingw/bin/x86_64-w64-mingw32-windres\")
set(cross_root \"/opt/mingw\")
"
        );

        let install = fs::read_to_string(install_script(&layout)).unwrap();
        assert_eq!(
            install,
            format!(
                "file(INSTALL {}/bin DESTINATION {})\n",
                layout.binary_path.display(),
                layout.install_prefix.display()
            )
        );
    }

    #[test]
    fn test_generate_is_repeatable() {
        let (_tmp, tree) = source_tree();
        write_templates(&tree);
        let config = sample_config();

        let first = generate_target(&tree, &config, "cross-build").unwrap();
        let second = generate_target(&tree, &config, "cross-build").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_fails_without_templates() {
        let (_tmp, tree) = source_tree();
        let err = generate_target(&tree, &sample_config(), "cross-build").unwrap_err();
        assert!(err.downcast_ref::<mini_template::Error>().is_some());
    }

    #[test]
    fn test_generate_creates_missing_toolchains_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("scripts/cmake")).unwrap();
        let tree = SourceTree::locate(tmp.path()).unwrap();
        write_templates(&tree);

        let layout = generate_target(&tree, &sample_config(), "cross-build").unwrap();
        assert!(layout.toolchain_file.is_file());
    }
}
