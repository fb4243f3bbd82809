//! Mode scheduler
//!
//! Drives one mode to completion, one emulated frame at a time. Each loop
//! iteration advances exactly one frame, checks whether a battle just
//! started and then resumes the mode exactly once. A battle is dispatched
//! between two resumptions and never moves the mode's own position. The
//! start signal is only raised once, so a battle whose opponent cannot be
//! read yet stays pending and is retried before every later resumption.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::backend::{BattleSubsystem, Catalog, Emulator, PathFinder};
use crate::context::GameContext;
use crate::error::SchedulerError;
use crate::modes::Mode;
use crate::movement::{Step, StepContext};

/// Lifecycle of the mode being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Ready,
    Running,
    Suspended,
    /// A battle is being dispatched between two resumptions.
    Interrupted,
    Completed,
    Failed,
    Aborted,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Aborted)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Suspended => "suspended",
            Self::Interrupted => "interrupted",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Aborted,
}

/// Shared stop flag, checked before every frame.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives modes against an emulator.
pub struct Scheduler<'a, E: Emulator, B: BattleSubsystem> {
    ctx: &'a GameContext,
    emulator: &'a mut E,
    battle: &'a mut B,
    catalog: &'a dyn Catalog,
    paths: &'a dyn PathFinder,
    cancel: CancelToken,
    state: TaskState,
    frames: u64,
    pending_battle: bool,
}

impl<'a, E: Emulator, B: BattleSubsystem> Scheduler<'a, E, B> {
    pub fn new(
        ctx: &'a GameContext,
        emulator: &'a mut E,
        battle: &'a mut B,
        catalog: &'a dyn Catalog,
        paths: &'a dyn PathFinder,
    ) -> Self {
        Self {
            ctx,
            emulator,
            battle,
            catalog,
            paths,
            cancel: CancelToken::new(),
            state: TaskState::Ready,
            frames: 0,
            pending_battle: false,
        }
    }

    /// Use a token shared with the caller instead of a private one.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Frames advanced by the most recent run.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run `mode` until it finishes, fails or is cancelled.
    ///
    /// Precondition failures raised by the mode come back as
    /// [`SchedulerError::Mode`] with their message untouched.
    pub fn run(&mut self, mode: &mut dyn Mode) -> Result<RunOutcome, SchedulerError> {
        self.state = TaskState::Ready;
        self.frames = 0;
        self.pending_battle = false;
        info!("Starting mode '{}'", mode.name());

        let result = self.run_loop(mode);
        match &result {
            Ok(RunOutcome::Completed) => {
                self.state = TaskState::Completed;
                info!("Mode '{}' completed after {} frames", mode.name(), self.frames);
            }
            Ok(RunOutcome::Aborted) => {
                self.state = TaskState::Aborted;
                info!("Mode '{}' aborted after {} frames", mode.name(), self.frames);
            }
            Err(e) => {
                self.state = TaskState::Failed;
                warn!("Mode '{}' failed after {} frames: {}", mode.name(), self.frames, e);
            }
        }
        result
    }

    fn run_loop(&mut self, mode: &mut dyn Mode) -> Result<RunOutcome, SchedulerError> {
        let log_interval = self.ctx.config.scheduler.log_interval_frames;

        loop {
            if self.cancel.is_cancelled() {
                return Ok(RunOutcome::Aborted);
            }

            self.emulator
                .advance_frame()
                .map_err(SchedulerError::Backend)?;
            self.frames += 1;
            if log_interval > 0 && self.frames % log_interval == 0 {
                info!("Mode '{}' still running, {} frames", mode.name(), self.frames);
            }

            if self.emulator.battle_started() {
                self.pending_battle = true;
            }
            if self.pending_battle {
                self.state = TaskState::Interrupted;
                self.pending_battle = !self.dispatch_battle(mode);
            }

            self.state = TaskState::Running;
            let step = {
                let env = StepContext {
                    game: &*self.emulator,
                    ctx: self.ctx,
                    catalog: self.catalog,
                    paths: self.paths,
                };
                mode.step(&env)?
            };

            if let Step::Press(button) = step {
                self.emulator
                    .press_button(button)
                    .map_err(SchedulerError::Backend)?;
            }
            if step == Step::Done {
                if self.pending_battle {
                    warn!("Mode '{}' finished with a battle still undispatched", mode.name());
                }
                return Ok(RunOutcome::Completed);
            }
            self.state = if self.pending_battle {
                TaskState::Interrupted
            } else {
                TaskState::Suspended
            };
        }
    }

    /// Hand the current battle to the mode or the battle subsystem.
    /// Returns `false` if the opponent cannot be read yet.
    fn dispatch_battle(&mut self, mode: &mut dyn Mode) -> bool {
        let Some(opponent) = self.emulator.opponent() else {
            debug!("Battle pending on frame {}, opponent not readable yet", self.frames);
            return false;
        };

        let action = match mode.on_battle_started(self.ctx, &opponent) {
            Some(action) => action,
            None => {
                debug!("Mode '{}' has no battle handler", mode.name());
                self.battle.unhandled_battle(&opponent)
            }
        };
        debug!(
            "Battle against {} on frame {}: {:?}",
            opponent.species_name, self.frames, action
        );
        self.battle.handle(action, &opponent);
        true
    }
}
