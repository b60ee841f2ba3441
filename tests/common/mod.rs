//! Shared fixtures for the integration tests: a throwaway template root and a harness wired to a
//! [`RecordingRunner`].

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use toolbelt::harness::{Harness, HarnessConfig, RecordingRunner};
use toolbelt_core::Platform;
use toolbelt_core::tools::DEFAULT_BINARY_NAME;

pub const EMBED_ONE: &str = "alpha\n\nbeta\n";
pub const EMBED_TWO: &str = "gamma\n";
/// Helper module staged into every fixture from the shared directory.
pub const HELPER_MODULE: &str = "toolbelt.cmake";

/// A repository-like layout: minimal fixture projects under `test_data/` and helper modules under `src/`.
///
/// Each template already contains the fixture binary, standing in for what a real build would produce.
pub struct Templates {
    pub dir: TempDir,
}

impl Templates {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("src"), HELPER_MODULE, "function(toolbelt_enum)\nendfunction()\n");
        let root = dir.path().join("test_data");
        for fixture in ["add_dep", "check_includes", "check_symbol", "enum", "required", "setup_gtest"] {
            write(&root.join(fixture), "CMakeLists.txt", "project(fixture)\n");
            write(&root.join(fixture), DEFAULT_BINARY_NAME, "");
        }
        let embed = root.join("embed");
        write(&embed, "CMakeLists.txt", "project(embed)\n");
        write(&embed, DEFAULT_BINARY_NAME, "");
        write(&embed, "embed_one.txt", EMBED_ONE);
        write(&embed, "embed_two.txt", EMBED_TWO);

        write(&root.join("no_binary"), "CMakeLists.txt", "project(no_binary)\n");
        Self { dir }
    }

    /// Template root.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("test_data")
    }

    /// Shared helper directory.
    pub fn shared(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::default()
            .with_template_root(self.path())
            .with_shared_dirs([self.shared()])
    }
}

pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Harness on Linux conventions that records instead of spawning.
pub fn harness<'r>(templates: &Templates, runner: &'r RecordingRunner) -> Harness<'r> {
    Harness::with_runner(templates.config(), runner).with_platform(Platform::Linux)
}
