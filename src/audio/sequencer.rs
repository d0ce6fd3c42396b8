/*!
 * Sequential audio playback.
 *
 * Entries play strictly one at a time. A finished entry is followed by a
 * short gap before the next one starts; a failed entry is skipped at once.
 * After the last entry the sequence stops for good: no looping and no
 * retry of failed entries.
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

use super::plan::PlaybackPlan;
use crate::errors::PlaybackFailure;

/// Pause between a finished entry and the next one
pub const DEFAULT_ENTRY_GAP: Duration = Duration::from_millis(200);

/// Position of a playback run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing(usize),
    Done,
}

/// Inputs that move the playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Start,
    EntryFinished,
    EntryFailed,
}

/// What the driver must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    /// Start entry `index` after `delay`
    Play { index: usize, delay: Duration },
    /// The sequence is over
    Stop,
    /// The event does not apply in the current state
    Ignore,
}

/// Transition table for one playback run
#[derive(Debug, Clone)]
pub struct PlaybackMachine {
    len: usize,
    gap: Duration,
    state: PlaybackState,
}

impl PlaybackMachine {
    pub fn new(len: usize, gap: Duration) -> Self {
        Self {
            len,
            gap,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Apply an event and return the resulting action
    pub fn handle(&mut self, event: PlaybackEvent) -> PlaybackAction {
        let (next, action) = match (self.state, event) {
            (PlaybackState::Idle, PlaybackEvent::Start) => self.advance(0, Duration::ZERO),
            (PlaybackState::Playing(index), PlaybackEvent::EntryFinished) => {
                self.advance(index + 1, self.gap)
            }
            (PlaybackState::Playing(index), PlaybackEvent::EntryFailed) => {
                self.advance(index + 1, Duration::ZERO)
            }
            (state, _) => (state, PlaybackAction::Ignore),
        };

        self.state = next;
        action
    }

    fn advance(&self, index: usize, delay: Duration) -> (PlaybackState, PlaybackAction) {
        if index < self.len {
            (PlaybackState::Playing(index), PlaybackAction::Play { index, delay })
        } else {
            (PlaybackState::Done, PlaybackAction::Stop)
        }
    }
}

/// Something that can play one audio reference to completion
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Play `reference`, resolving once playback has finished
    async fn play(&self, reference: &str) -> Result<(), PlaybackFailure>;
}

/// Outcome of a playback run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// References that played to completion, in order
    pub played: Vec<String>,
    /// Entries that were skipped
    pub failed: Vec<PlaybackFailure>,
}

/// Drives a [`PlaybackMachine`] against an [`AudioSink`]
#[derive(Debug, Clone)]
pub struct AudioSequencer {
    gap: Duration,
}

impl Default for AudioSequencer {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_GAP)
    }
}

impl AudioSequencer {
    pub fn new(gap: Duration) -> Self {
        Self { gap }
    }

    /// Play every entry of `plan` in order
    ///
    /// Failures are logged and skipped; they never abort the run.
    pub async fn play(&self, plan: &PlaybackPlan, sink: &dyn AudioSink) -> PlaybackReport {
        let mut report = PlaybackReport::default();
        let mut machine = PlaybackMachine::new(plan.len(), self.gap);
        let mut action = machine.handle(PlaybackEvent::Start);

        while let PlaybackAction::Play { index, delay } = action {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let Some(reference) = plan.get(index) else {
                break;
            };

            debug!("Playing audio entry {} of {}: {}", index + 1, plan.len(), reference);
            let event = match sink.play(reference).await {
                Ok(()) => {
                    report.played.push(reference.to_string());
                    PlaybackEvent::EntryFinished
                }
                Err(failure) => {
                    warn!("Skipping audio entry: {}", failure);
                    report.failed.push(failure);
                    PlaybackEvent::EntryFailed
                }
            };

            action = machine.handle(event);
        }

        report
    }
}

/// Plays references with an external command-line player
///
/// Relative references are resolved against `base_dir`.
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
    base_dir: Option<PathBuf>,
    timeout: Duration,
}

impl CommandSink {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            base_dir: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a reference to the argument handed to the player
    ///
    /// The result never starts with `-`, so a stored reference cannot be
    /// read as a player option.
    pub fn resolve(&self, reference: &str) -> String {
        let is_remote = reference.contains("://");
        let target = match &self.base_dir {
            Some(base) if !is_remote && !std::path::Path::new(reference).is_absolute() => {
                base.join(reference).to_string_lossy().into_owned()
            }
            _ => reference.to_string(),
        };

        if target.starts_with('-') {
            format!("./{}", target)
        } else {
            target
        }
    }
}

#[async_trait]
impl AudioSink for CommandSink {
    async fn play(&self, reference: &str) -> Result<(), PlaybackFailure> {
        let target = self.resolve(reference);
        let failure = |reason: String| PlaybackFailure {
            reference: reference.to_string(),
            reason,
        };

        let player = Command::new(&self.program)
            .args(&self.args)
            .arg(&target)
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            result = player => result.map_err(|e| failure(format!("failed to run {}: {}", self.program, e)))?,
            _ = tokio::time::sleep(self.timeout) => {
                return Err(failure(format!("timed out after {:?}", self.timeout)));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!("player exited with {}: {}", output.status, stderr.trim())));
        }

        Ok(())
    }
}
