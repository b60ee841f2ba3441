//! Provide the shared, pure vocabulary of the toolbelt harness.
//!
//! This crate is intentionally small and dependency-free. It holds the canonical spellings that both the
//! harness library and its CLI rely on:
//! - the registry of known fixture projects ([`fixtures`]),
//! - the external tools the harness drives ([`tools`]),
//! - Conan preset names ([`presets`]) and memcheck options ([`memcheck`]),
//! - the diagnostic prefixes emitted by the CMake helper functions ([`messages`]).
//!
//! ## Notes
//!
//! - **No IO** and no global state. Filesystem and process work lives in the `toolbelt` crate.
//! - Platform-dependent choices take an explicit [`Platform`] so they stay testable on any host.

pub mod fixtures;
pub mod memcheck;
pub mod messages;
pub mod presets;
pub mod tools;

/// Operating-system family the harness is running against.
///
/// Only Windows changes behavior: multi-config generators place binaries under `Release`/`Debug` with an
/// `.exe` suffix, and Conan names its configure preset differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// Whether build tools emit configuration-named output subdirectories (`Release`, `Debug`).
    pub fn uses_config_subdirs(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Executable suffix, including the dot, or `""`.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            _ => "",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Other => "other",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
