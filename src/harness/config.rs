//! Harness configuration (`toolbelt.toml`).
//!
//! ```toml
//! template_root = "tests/test_data"
//! shared = ["src"]
//! binary = "cmake_toolbelt_test"
//!
//! [tools]
//! cmake = "/opt/cmake/bin/cmake"
//! ```
//!
//! Every key is optional; `shared` defaults to `["src"]`. Relative paths are resolved against the directory
//! holding the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toolbelt_core::tools::{self, ToolId};

use super::{HarnessError, HarnessResult};

/// File name looked up in the current directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "toolbelt.toml";

/// Helper module directory staged with every fixture unless `shared` says otherwise.
pub const DEFAULT_SHARED_DIR: &str = "src";

/// Root harness configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Directory containing one subdirectory per fixture template.
    pub template_root: PathBuf,

    /// Directories whose contents are copied into every staged fixture (the helper modules under test).
    /// Defaults to `src`.
    pub shared: Vec<PathBuf>,

    /// Name of the executable every fixture builds.
    pub binary: String,

    /// Executables for the external tools.
    pub tools: ToolsConfig,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Executable names or paths for the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub cmake: String,
    pub ctest: String,
    pub conan: String,
    pub valgrind: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            cmake: tools::as_str(ToolId::Cmake).to_string(),
            ctest: tools::as_str(ToolId::Ctest).to_string(),
            conan: tools::as_str(ToolId::Conan).to_string(),
            valgrind: tools::as_str(ToolId::Valgrind).to_string(),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            template_root: PathBuf::from("tests/test_data"),
            shared: vec![PathBuf::from(DEFAULT_SHARED_DIR)],
            binary: tools::DEFAULT_BINARY_NAME.to_string(),
            tools: ToolsConfig::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HarnessError::io(format!("failed to read config {}", path.display()), e))?;
        let mut config = Self::from_toml(&content).map_err(|source| HarnessError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string. Relative paths resolve against `.`.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `toolbelt.toml` from `dir` if it exists, otherwise return defaults rooted at `dir`.
    pub fn discover(dir: &Path) -> HarnessResult<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::from_file(&candidate);
        }
        tracing::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
        Ok(Self {
            base_dir: dir.to_path_buf(),
            ..Self::default()
        })
    }

    /// Override the template root (already resolved by the caller).
    pub fn with_template_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.template_root = root.into();
        self
    }

    /// Append a shared helper directory.
    pub fn with_shared(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shared.push(dir.into());
        self
    }

    /// Replace the shared helper directories.
    pub fn with_shared_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.shared = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_binary(mut self, name: impl Into<String>) -> Self {
        self.binary = name.into();
        self
    }

    /// Resolve a configured path against [`base_dir`](Self::base_dir).
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Absolute (or base-relative) template root.
    pub fn template_root(&self) -> PathBuf {
        self.resolve(&self.template_root)
    }

    /// Resolved shared helper directories, in configuration order.
    pub fn shared_dirs(&self) -> Vec<PathBuf> {
        self.shared.iter().map(|p| self.resolve(p)).collect()
    }

    /// Configured executable for a tool. The fixture binary is resolved separately.
    pub fn program(&self, tool: ToolId) -> &str {
        match tool {
            ToolId::Cmake => &self.tools.cmake,
            ToolId::Ctest => &self.tools.ctest,
            ToolId::Conan => &self.tools.conan,
            ToolId::Valgrind => &self.tools.valgrind,
            ToolId::Binary => &self.binary,
        }
    }

    fn validate(&self) -> HarnessResult<()> {
        if self.binary.trim().is_empty() {
            return Err(HarnessError::Config("`binary` must not be empty".to_string()));
        }
        if self.binary.contains(['/', '\\']) {
            return Err(HarnessError::Config(format!(
                "`binary` must be a file name, not a path: {}",
                self.binary
            )));
        }
        for (key, program) in [
            ("cmake", &self.tools.cmake),
            ("ctest", &self.tools.ctest),
            ("conan", &self.tools.conan),
            ("valgrind", &self.tools.valgrind),
        ] {
            if program.trim().is_empty() {
                return Err(HarnessError::Config(format!("`tools.{}` must not be empty", key)));
            }
        }
        Ok(())
    }
}
