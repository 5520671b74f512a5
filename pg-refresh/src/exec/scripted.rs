//! Scriptable stand-in for external tools.

use super::{CommandOutput, CommandRunner, Invocation};
use crate::utils::{RefreshError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued outputs in order and records every invocation it receives.
///
/// Running with an empty queue fails with a `Spawn` error, which makes an
/// unexpected extra command visible in tests.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<CommandOutput>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output for the next invocation
    pub fn push(&self, output: CommandOutput) -> &Self {
        lock(&self.responses).push_back(output);
        self
    }

    /// Invocations seen so far, in order
    pub fn calls(&self) -> Vec<Invocation> {
        lock(&self.calls).clone()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        lock(&self.calls).push(invocation.clone());
        lock(&self.responses)
            .pop_front()
            .ok_or_else(|| RefreshError::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no scripted response left",
                ),
            })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
