//! [`RecordingInvoker`]: an [`Invoker`] that records commands instead of
//! running them.
//!
//! Realism level: **FAKE**: no process is ever spawned. Use it to assert
//! which commands a handler would run, in what order, and what it does with
//! a scripted outcome.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use gitgate_exec::{Invocation, Invoker};

/// One recorded `invoke` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: Vec<String>,
    pub working_dir: PathBuf,
}

/// Scripted fake. Queued responses are returned in order; once the queue is
/// empty every call gets the fallback (a silent success by default).
pub struct RecordingInvoker {
    calls: Mutex<Vec<RecordedCall>>,
    queued: Mutex<VecDeque<Invocation>>,
    fallback: Invocation,
}

impl Default for RecordingInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingInvoker {
    /// Every call succeeds with empty output.
    pub fn new() -> Self {
        Self::with_fallback(Invocation::completed(0, "", ""))
    }

    /// Every call succeeds with `stdout`.
    pub fn succeeding(stdout: &str) -> Self {
        Self::with_fallback(Invocation::completed(0, stdout, ""))
    }

    /// Every unscripted call returns `fallback`.
    pub fn with_fallback(fallback: Invocation) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            queued: Mutex::new(VecDeque::new()),
            fallback,
        }
    }

    /// Queue the outcome of the next unanswered call.
    pub fn push_response(&self, invocation: Invocation) -> &Self {
        self.queued.lock().unwrap().push_back(invocation);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Just the command lines, in call order.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Invoker for RecordingInvoker {
    async fn invoke(&self, command: &[String], working_dir: &Path) -> Invocation {
        self.calls.lock().unwrap().push(RecordedCall {
            command: command.to_vec(),
            working_dir: working_dir.to_path_buf(),
        });
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
