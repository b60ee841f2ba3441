//! Diagnostic prefixes printed by the CMake helper functions.
//!
//! Fixture assertions match these strings literally, so wording must not drift. Two lineages exist: the
//! current `cmake-toolbelt` naming with `toolbelt_` function prefixes, and the legacy `cmake-helpers`
//! naming with `helpers_` prefixes. The current lineage is authoritative; the legacy one is kept only so
//! old fixture variants can still be described. The two are never mapped onto each other.

/// Naming lineage of the helper functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lineage {
    Toolbelt,
    Helpers,
}

impl Lineage {
    /// Project tag that starts every message, e.g. `cmake-toolbelt`.
    pub fn project(self) -> &'static str {
        match self {
            Lineage::Toolbelt => "cmake-toolbelt",
            Lineage::Helpers => "cmake-helpers",
        }
    }

    /// Prefix of helper function names, e.g. `toolbelt_`.
    pub fn function_prefix(self) -> &'static str {
        match self {
            Lineage::Toolbelt => "toolbelt_",
            Lineage::Helpers => "helpers_",
        }
    }
}

/// Lineage used by the built-in scenarios.
pub const CURRENT: Lineage = Lineage::Toolbelt;

/// Format a helper message as emitted by CMake's `message(STATUS ...)`, without the `-- ` status marker.
///
/// `message(CURRENT, "add_dep", "found ZLIB with components")` yields
/// `cmake-toolbelt: toolbelt_add_dep - found ZLIB with components`.
pub fn message(lineage: Lineage, function: &str, text: &str) -> String {
    format!(
        "{}: {}{} - {}",
        lineage.project(),
        lineage.function_prefix(),
        function,
        text
    )
}

/// Format a detail line that a helper prints under its own message.
///
/// Detail lines carry only the project tag, padded so the text lines up with the text of
/// [`message`]: `detail(CURRENT, "add_dep", "version = 1.3")` yields
/// `cmake-toolbelt:                    version = 1.3`.
pub fn detail(lineage: Lineage, function: &str, text: &str) -> String {
    let indent = lineage.function_prefix().len() + function.len() + " - ".len();
    format!("{}:{:width$}{}", lineage.project(), "", text, width = indent + 1)
}

/// Status marker CMake prepends to `STATUS` messages.
pub const STATUS_MARKER: &str = "-- ";
