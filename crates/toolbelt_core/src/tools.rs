//! External tool vocabulary.
//!
//! The harness treats every tool as an opaque executable. This module centralizes the default executable
//! names and the fixed argument spellings so command lines are assembled from one place.

/// Stable identifier for external tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// Build-configuration tool (also drives builds via `--build`).
    Cmake,
    /// Test-running tool.
    Ctest,
    /// Package-resolution tool.
    Conan,
    /// Memory-checking wrapper.
    Valgrind,
    /// The fixture's own compiled test binary.
    Binary,
}

/// Metadata entry for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolInfo {
    pub id: ToolId,
    /// Label used in diagnostics and configuration keys.
    pub canonical: &'static str,
    /// Default executable looked up on `PATH`.
    pub default_program: &'static str,
}

/// Registry of external tools.
pub const TOOLS: &[ToolInfo] = &[
    ToolInfo {
        id: ToolId::Cmake,
        canonical: "cmake",
        default_program: "cmake",
    },
    ToolInfo {
        id: ToolId::Ctest,
        canonical: "ctest",
        default_program: "ctest",
    },
    ToolInfo {
        id: ToolId::Conan,
        canonical: "conan",
        default_program: "conan",
    },
    ToolInfo {
        id: ToolId::Valgrind,
        canonical: "valgrind",
        default_program: "valgrind",
    },
    ToolInfo {
        id: ToolId::Binary,
        canonical: "binary",
        default_program: DEFAULT_BINARY_NAME,
    },
];

/// Resolve a tool label to its id.
pub fn from_str(name: &str) -> Option<ToolId> {
    TOOLS.iter().find(|t| t.canonical == name).map(|t| t.id)
}

/// Return the label for a tool.
pub fn as_str(id: ToolId) -> &'static str {
    match id {
        ToolId::Cmake => "cmake",
        ToolId::Ctest => "ctest",
        ToolId::Conan => "conan",
        ToolId::Valgrind => "valgrind",
        ToolId::Binary => "binary",
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(as_str(*self))
    }
}

/// Name of the executable every fixture project builds.
pub const DEFAULT_BINARY_NAME: &str = "cmake_toolbelt_test";

/// Binary name used by fixture projects before the toolbelt rename.
pub const LEGACY_BINARY_NAME: &str = "cmake_helpers_test";

/// Subdirectory preferred by multi-config generators.
pub const RELEASE_DIR: &str = "Release";

/// Fallback subdirectory for multi-config generators.
pub const DEBUG_DIR: &str = "Debug";

/// Source directory argument passed to the configuration and build tools.
pub const PROJECT_DIR_ARG: &str = ".";

/// `cmake --build`.
pub const BUILD_FLAG: &str = "--build";

/// `--preset <name>` for both configure and build presets.
pub const PRESET_FLAG: &str = "--preset";

/// Prefix of a cache-variable override (`-D<key>=<value>`).
pub const DEFINE_PREFIX: &str = "-D";

/// Environment variable relocating the package tool's cache.
pub const CONAN_HOME_ENV: &str = "CONAN_HOME";

/// `conan profile detect --force`.
pub const CONAN_PROFILE_DETECT_ARGS: &[&str] = &["profile", "detect", "--force"];

/// `conan install . --build=missing`.
pub const CONAN_INSTALL_ARGS: &[&str] = &["install", ".", "--build=missing"];

/// Format one override flag.
pub fn define_flag(key: &str, value: &str) -> String {
    format!("{DEFINE_PREFIX}{key}={value}")
}
