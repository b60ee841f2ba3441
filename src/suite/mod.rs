//! Scenario suite: declarative fixture runs loaded from TOML.
//!
//! A manifest is a list of `[[scenario]]` tables:
//!
//! ```toml
//! [[scenario]]
//! name = "add_dep_version"
//! fixture = "add_dep"
//! variables = { version = "1.3" }
//! contains = ["version = 1.3"]
//! not_contains = ["visibility ="]
//! ```
//!
//! The built-in suite (`scenarios/builtin.toml`) covers every registered fixture.
//!
//! ## Modules
//!
//! - `report` - The [`Reporter`] trait with console and JSON-lines implementations
//! - `runner` - Executing scenarios against a [`Harness`](crate::harness::Harness)

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod report;
pub mod runner;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use toolbelt_core::{Platform, fixtures, messages, presets};

use crate::harness::{AssertionSet, HarnessError, HarnessResult, InvocationConfig, RunOutputExpectation, Verification};

pub use report::{ConsoleReporter, JsonReporter, Reporter};
pub use runner::{ScenarioResult, SuiteOptions, SuiteSummary, execute_scenario, run_scenario, run_scenario_in, run_suite};

const BUILTIN_MANIFEST: &str = include_str!("../../scenarios/builtin.toml");

/// One fixture run with its expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    pub fixture: String,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub build_preset: Option<String>,
    /// Cache-variable overrides, passed as `-D<key>=<value>` in this order.
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub not_contains: Vec<String>,
    #[serde(default)]
    pub run_output: Option<RunOutputExpectation>,
    /// The cycle must fail in a tool.
    #[serde(default)]
    pub expect_failure: bool,
    /// Verify through the test runner. Defaults to the fixture registry.
    #[serde(default)]
    pub ctest: Option<bool>,
    /// Install packages before configuring. Defaults to the fixture registry.
    #[serde(default)]
    pub install: Option<bool>,
    #[serde(default)]
    pub memcheck: bool,
    /// Skip with this reason.
    #[serde(default)]
    pub skip: Option<String>,
    #[serde(default)]
    pub linux_only: bool,
}

impl Scenario {
    pub fn new(name: impl Into<String>, fixture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixture: fixture.into(),
            preset: None,
            build_preset: None,
            variables: IndexMap::new(),
            contains: Vec::new(),
            not_contains: Vec::new(),
            run_output: None,
            expect_failure: false,
            ctest: None,
            install: None,
            memcheck: false,
            skip: None,
            linux_only: false,
        }
    }

    pub fn needs_install(&self) -> bool {
        self.install
            .unwrap_or_else(|| fixtures::lookup(&self.fixture).is_some_and(|info| info.needs_install))
    }

    pub fn runs_test_tool(&self) -> bool {
        self.ctest
            .unwrap_or_else(|| fixtures::lookup(&self.fixture).is_some_and(|info| info.runs_test_tool))
    }

    pub fn assertions(&self) -> AssertionSet {
        AssertionSet {
            contains: self.contains.clone(),
            not_contains: self.not_contains.clone(),
        }
    }

    /// Why the scenario should not run on `platform`, if it shouldn't.
    pub fn skip_reason(&self, platform: Platform) -> Option<String> {
        if let Some(reason) = &self.skip {
            return Some(reason.clone());
        }
        if self.linux_only && platform != Platform::Linux {
            return Some(format!("linux only (running on {platform})"));
        }
        None
    }

    /// Resolve presets and the verification mode for `platform`.
    ///
    /// Presets set on the scenario are used as given. Otherwise a fixture that installs packages gets the
    /// presets the Conan toolchain generates, and any other fixture configures without one.
    pub fn invocation(&self, platform: Platform) -> InvocationConfig {
        let install = self.needs_install();
        let preset = self
            .preset
            .clone()
            .or_else(|| install.then(|| presets::conan_configure_preset(platform).to_string()));
        let build_preset = self
            .build_preset
            .clone()
            .or_else(|| install.then(|| presets::conan_build_preset(platform).to_string()));

        InvocationConfig::builder()
            .maybe_preset(preset)
            .maybe_build_preset(build_preset)
            .variables(self.variables.iter())
            .verification(Verification::from_flags(self.runs_test_tool(), self.memcheck))
            .build()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default, rename = "scenario")]
    scenarios: Vec<Scenario>,
}

/// An ordered collection of uniquely named scenarios.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suite {
    scenarios: Vec<Scenario>,
}

impl Suite {
    pub fn new(scenarios: Vec<Scenario>) -> HarnessResult<Self> {
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if scenario.name.is_empty() {
                return Err(HarnessError::Config("scenario with an empty name".to_string()));
            }
            if !seen.insert(scenario.name.as_str()) {
                return Err(HarnessError::Config(format!("duplicate scenario name '{}'", scenario.name)));
            }
            warn_on_legacy_messages(scenario);
        }
        Ok(Self { scenarios })
    }

    /// Scenarios for every registered fixture.
    pub fn builtin() -> HarnessResult<Self> {
        Self::from_toml(BUILTIN_MANIFEST, Path::new("<builtin>"))
    }

    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| HarnessError::io(format!("reading {}", path.display()), e))?;
        Self::from_toml(&content, path)
    }

    /// Parse a manifest; `origin` only labels parse errors.
    pub fn from_toml(content: &str, origin: &Path) -> HarnessResult<Self> {
        let manifest: Manifest = toml::from_str(content).map_err(|source| HarnessError::ParseToml {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::new(manifest.scenarios)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Scenarios whose name contains `keyword`, or all of them.
    pub fn filtered<'s>(&'s self, keyword: Option<&'s str>) -> impl Iterator<Item = &'s Scenario> + 's {
        self.scenarios
            .iter()
            .filter(move |s| keyword.is_none_or(|k| s.name.contains(k)))
    }
}

/// Helpers of the current lineage never print the legacy project tag, so such an assertion can only pass
/// against an old checkout.
fn warn_on_legacy_messages(scenario: &Scenario) {
    let legacy = messages::Lineage::Helpers.project();
    if scenario
        .contains
        .iter()
        .chain(&scenario.not_contains)
        .any(|needle| needle.contains(legacy))
    {
        tracing::warn!(
            scenario = %scenario.name,
            "assertion mentions `{}`; current helpers print `{}`",
            legacy,
            messages::CURRENT.project()
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::harness::{CapturedOutput, Phase};

    #[test]
    fn test_builtin_suite_loads() {
        let suite = Suite::builtin().unwrap();
        assert!(!suite.is_empty());
        for info in fixtures::FIXTURES {
            assert!(
                suite.scenarios().iter().any(|s| s.fixture == info.canonical),
                "no scenario for fixture {}",
                info.canonical
            );
        }
    }

    #[test]
    fn test_builtin_messages_use_current_lineage() {
        let suite = Suite::builtin().unwrap();
        let current = messages::CURRENT.project();
        let legacy = messages::Lineage::Helpers.project();
        for scenario in suite.scenarios() {
            for needle in scenario.contains.iter().chain(&scenario.not_contains) {
                assert!(!needle.contains(legacy), "{}: {}", scenario.name, needle);
                if needle.contains("cmake-") {
                    assert!(needle.contains(current), "{}: {}", scenario.name, needle);
                }
            }
        }
    }

    #[test]
    fn test_builtin_add_dep_details_are_anchored() {
        let suite = Suite::builtin().unwrap();
        let version = messages::detail(messages::CURRENT, "add_dep", "version =");
        let visibility = messages::detail(messages::CURRENT, "add_dep", "visibility =");

        let plain = suite.get("add_dep").unwrap();
        assert_eq!(plain.not_contains, vec![visibility.clone(), version.clone()]);

        let versioned = suite.get("add_dep_version").unwrap();
        assert!(versioned.contains.contains(&format!("{version} 1.3")));
        assert_eq!(versioned.not_contains, vec![visibility]);

        // Unrelated toolchain output must not trip the check.
        let toolchain = CapturedOutput::new(Phase::Configure, "-- Conan toolchain: version = 1.3.1\n");
        assert!(!toolchain.contains(&version));
    }

    #[test]
    fn test_builtin_embed_expectation() {
        let suite = Suite::builtin().unwrap();
        let embed = suite.get("embed").unwrap();
        let expectation = embed.run_output.as_ref().unwrap();
        assert_eq!(expectation.segments.len(), 2);
        assert_eq!(expectation.segments[0].files, vec!["embed_one.txt"]);
        assert_eq!(expectation.segments[0].repeat, 7);
        assert_eq!(expectation.segments[1].files, vec!["embed_one.txt", "embed_two.txt"]);
        assert_eq!(expectation.segments[1].repeat, 4);
    }

    #[test]
    fn test_installer_fixture_gets_conan_presets() {
        let scenario = Scenario::new("s", "add_dep");
        let linux = scenario.invocation(Platform::Linux);
        assert_eq!(linux.preset(), Some("conan-release"));
        assert_eq!(linux.build_preset(), Some("conan-release"));

        let windows = scenario.invocation(Platform::Windows);
        assert_eq!(windows.preset(), Some("conan-default"));
        assert_eq!(windows.build_preset(), Some("conan-release"));
    }

    #[test]
    fn test_explicit_presets_win() {
        let mut scenario = Scenario::new("s", "add_dep");
        scenario.preset = Some("custom".to_string());
        let invocation = scenario.invocation(Platform::Windows);
        assert_eq!(invocation.preset(), Some("custom"));
        assert_eq!(invocation.build_preset(), Some("conan-release"));
    }

    #[test]
    fn test_plain_fixture_has_no_presets() {
        let invocation = Scenario::new("s", "enum").invocation(Platform::Linux);
        assert_eq!(invocation.preset(), None);
        assert_eq!(invocation.build_preset(), None);
        assert_eq!(invocation.verification(), Verification::DirectRun);
    }

    #[test]
    fn test_registry_defaults_verification() {
        let gtest = Scenario::new("s", "setup_gtest");
        assert!(gtest.needs_install());
        assert_eq!(gtest.invocation(Platform::Linux).verification(), Verification::ToolRun);

        let mut memcheck = Scenario::new("s", "enum");
        memcheck.memcheck = true;
        assert_eq!(
            memcheck.invocation(Platform::Linux).verification(),
            Verification::DirectRunWithMemcheck
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let manifest = r#"
[[scenario]]
name = "a"
fixture = "enum"

[[scenario]]
name = "a"
fixture = "required"
"#;
        let err = Suite::from_toml(manifest, Path::new("dup.toml")).unwrap_err();
        assert!(err.to_string().contains("duplicate scenario name 'a'"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let manifest = "[[scenario]]\nname = \"a\"\nfixture = \"enum\"\nexpect_fail = true\n";
        assert!(matches!(
            Suite::from_toml(manifest, Path::new("bad.toml")),
            Err(HarnessError::ParseToml { .. })
        ));
    }

    #[test]
    fn test_skip_reasons() {
        let mut scenario = Scenario::new("s", "enum");
        assert_eq!(scenario.skip_reason(Platform::Linux), None);

        scenario.linux_only = true;
        assert_eq!(scenario.skip_reason(Platform::Linux), None);
        assert!(scenario.skip_reason(Platform::MacOs).unwrap().contains("linux only"));

        scenario.skip = Some("flaky".to_string());
        assert_eq!(scenario.skip_reason(Platform::Linux).as_deref(), Some("flaky"));
    }
}
