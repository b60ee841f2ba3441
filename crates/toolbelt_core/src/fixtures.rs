//! Fixture project registry.
//!
//! Each fixture is a CMake project template exercising one helper function. The registry records what the
//! harness needs to know to drive it without reading the template itself.

/// Stable identifier for registered fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureId {
    AddDep,
    CheckIncludes,
    CheckSymbol,
    Embed,
    Enum,
    Required,
    SetupGtest,
}

/// Metadata for one fixture project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureInfo {
    pub id: FixtureId,
    /// Template directory name under the template root.
    pub canonical: &'static str,
    /// Whether the fixture resolves packages through Conan before configuring.
    pub needs_install: bool,
    /// Whether the fixture is verified through the test runner instead of running its binary.
    pub runs_test_tool: bool,
    pub summary: &'static str,
}

const fn info(
    id: FixtureId,
    canonical: &'static str,
    needs_install: bool,
    runs_test_tool: bool,
    summary: &'static str,
) -> FixtureInfo {
    FixtureInfo {
        id,
        canonical,
        needs_install,
        runs_test_tool,
        summary,
    }
}

/// Registry of known fixtures, in sweep order.
pub const FIXTURES: &[FixtureInfo] = &[
    info(
        FixtureId::AddDep,
        "add_dep",
        true,
        false,
        "Find a package and link its components to the test target.",
    ),
    info(
        FixtureId::CheckIncludes,
        "check_includes",
        false,
        false,
        "Check that headers can be included.",
    ),
    info(
        FixtureId::CheckSymbol,
        "check_symbol",
        false,
        false,
        "Check that a symbol exists.",
    ),
    info(
        FixtureId::Embed,
        "embed",
        false,
        false,
        "Embed file contents into generated headers.",
    ),
    info(
        FixtureId::Enum,
        "enum",
        false,
        false,
        "Validate a variable against an allowed set of values.",
    ),
    info(
        FixtureId::Required,
        "required",
        false,
        false,
        "Require that variables are defined.",
    ),
    info(
        FixtureId::SetupGtest,
        "setup_gtest",
        true,
        true,
        "Link GoogleTest and register tests with CTest.",
    ),
];

/// Resolve a fixture name to its stable id.
pub fn from_str(name: &str) -> Option<FixtureId> {
    FIXTURES.iter().find(|f| f.canonical == name).map(|f| f.id)
}

/// Return the canonical template name for a fixture.
pub fn as_str(id: FixtureId) -> &'static str {
    info_for(id).canonical
}

/// Return the registry entry for a fixture.
pub fn info_for(id: FixtureId) -> &'static FixtureInfo {
    // Table order is pinned by the registry guardrail tests.
    let index = match id {
        FixtureId::AddDep => 0,
        FixtureId::CheckIncludes => 1,
        FixtureId::CheckSymbol => 2,
        FixtureId::Embed => 3,
        FixtureId::Enum => 4,
        FixtureId::Required => 5,
        FixtureId::SetupGtest => 6,
    };
    &FIXTURES[index]
}

/// Look up registry metadata by template name.
pub fn lookup(name: &str) -> Option<&'static FixtureInfo> {
    FIXTURES.iter().find(|f| f.canonical == name)
}
