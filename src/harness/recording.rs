//! A [`ToolRunner`] that records invocations instead of spawning processes.
//!
//! Responses are scripted per tool (first in, first out) or per argument; anything unscripted succeeds
//! with empty output. Used to exercise command-line assembly and phase ordering without CMake installed.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use toolbelt_core::tools::ToolId;

use super::process::{ToolInvocation, ToolOutput, ToolRunner};
use super::HarnessResult;

#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<ToolInvocation>>,
    queued: RefCell<HashMap<ToolId, VecDeque<ToolOutput>>>,
    by_arg: Vec<(String, ToolOutput)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output of the next call to `tool`.
    pub fn respond(self, tool: ToolId, output: ToolOutput) -> Self {
        self.queued.borrow_mut().entry(tool).or_default().push_back(output);
        self
    }

    /// Answer every call carrying `arg` with `output`. Takes precedence over queued responses.
    pub fn respond_to_arg(mut self, arg: impl Into<String>, output: ToolOutput) -> Self {
        self.by_arg.push((arg.into(), output));
        self
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.borrow().clone()
    }

    /// Rendered command lines, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToolInvocation::command_line).collect()
    }

    /// Invocations of one tool, in order.
    pub fn calls_to(&self, tool: ToolId) -> Vec<ToolInvocation> {
        self.calls.borrow().iter().filter(|c| c.tool == tool).cloned().collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &ToolInvocation) -> HarnessResult<ToolOutput> {
        self.calls.borrow_mut().push(invocation.clone());

        if let Some((_, output)) = self.by_arg.iter().find(|(arg, _)| invocation.args.contains(arg)) {
            return Ok(output.clone());
        }

        let queued = self
            .queued
            .borrow_mut()
            .get_mut(&invocation.tool)
            .and_then(VecDeque::pop_front);
        Ok(queued.unwrap_or_else(|| ToolOutput::ok("")))
    }
}
