//! Assertion layer: substring checks over captured tool output.
//!
//! Checks run on the exact captured text. The only normalisation offered is [`normalise_lines`], which
//! drops empty lines and is used where a fixture prints generated file contents.

use serde::{Deserialize, Serialize};

use super::error::AssertionFailure;
use super::stage::Workspace;
use super::{HarnessError, HarnessResult};

/// Which phase produced a [`CapturedOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configure,
    Verify,
}

/// Text printed by one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    phase: Phase,
    text: String,
}

impl CapturedOutput {
    pub fn new(phase: Phase, text: impl Into<String>) -> Self {
        Self {
            phase,
            text: text.into(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

/// Substrings that must, and must not, appear in captured output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssertionSet {
    pub contains: Vec<String>,
    pub not_contains: Vec<String>,
}

impl AssertionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        self.contains.push(needle.into());
        self
    }

    pub fn not_contains(mut self, needle: impl Into<String>) -> Self {
        self.not_contains.push(needle.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.contains.is_empty() && self.not_contains.is_empty()
    }

    /// Check `output`, reporting the first missing substring, else the first unexpected one.
    pub fn check(&self, output: &CapturedOutput) -> Result<(), AssertionFailure> {
        if let Some(missing) = self.contains.iter().find(|n| !output.contains(n)) {
            return Err(AssertionFailure::Missing(missing.clone()));
        }
        if let Some(unexpected) = self.not_contains.iter().find(|n| output.contains(n)) {
            return Err(AssertionFailure::Unexpected(unexpected.clone()));
        }
        Ok(())
    }
}

/// Split into lines and drop the empty ones.
pub fn normalise_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.is_empty()).collect()
}

/// Compare two texts line by line after [`normalise_lines`].
pub fn assert_lines_eq(expected: &str, actual: &str) -> Result<(), AssertionFailure> {
    let expected_lines = normalise_lines(expected);
    let actual_lines = normalise_lines(actual);
    if expected_lines == actual_lines {
        return Ok(());
    }
    Err(AssertionFailure::LinesMismatch {
        expected: expected_lines.into_iter().map(str::to_string).collect(),
        actual: actual_lines.into_iter().map(str::to_string).collect(),
    })
}

/// Turn "a tool was expected to fail" into a result.
///
/// A tool failure satisfies the expectation and yields its captured text. Success becomes
/// [`HarnessError::UnexpectedSuccess`]. Any other error (a missing fixture, an assertion) is returned
/// unchanged, since it did not come from the tool under test.
pub fn expect_failure<T>(result: HarnessResult<T>) -> HarnessResult<String> {
    match result {
        Ok(_) => Err(HarnessError::UnexpectedSuccess),
        Err(HarnessError::ToolFailed { output, .. }) => Ok(output),
        Err(other) => Err(other),
    }
}

/// One repeated block of the expected run output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    /// Files, relative to the project root, concatenated in order.
    pub files: Vec<String>,
    /// How many times the concatenation repeats.
    pub repeat: usize,
}

/// Expected verify-phase output assembled from fixture files.
///
/// The embed fixture, for instance, prints `embed_one.txt` seven times and then `embed_one.txt` +
/// `embed_two.txt` four times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunOutputExpectation {
    pub segments: Vec<Segment>,
}

impl RunOutputExpectation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment<I, S>(mut self, files: I, repeat: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.push(Segment {
            files: files.into_iter().map(Into::into).collect(),
            repeat,
        });
        self
    }

    /// Assemble the expected text from the staged project files.
    pub fn expected_text(&self, workspace: &Workspace) -> HarnessResult<String> {
        let mut text = String::new();
        for segment in &self.segments {
            let mut block = String::new();
            for file in &segment.files {
                block.push_str(&workspace.read_to_string(file)?);
            }
            text.push_str(&block.repeat(segment.repeat));
        }
        Ok(text)
    }

    /// Compare the verify-phase output against the assembled expectation, ignoring blank lines.
    pub fn check(&self, workspace: &Workspace, output: &CapturedOutput) -> HarnessResult<()> {
        let expected = self.expected_text(workspace)?;
        assert_lines_eq(&expected, output.text())?;
        Ok(())
    }
}
