use std::fmt;

use autoplay_shared::Button;

use super::{Routine, Step, StepContext};
use crate::backend::LiveState;
use crate::error::ModeError;

/// Something the engine reports as running or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Script(String),
    Task(String),
}

impl EngineEvent {
    fn is_running(&self, game: &dyn LiveState) -> bool {
        match self {
            Self::Script(name) => game.is_script_running(name),
            Self::Task(name) => game.is_task_running(name),
        }
    }
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script(name) => write!(f, "script '{}'", name),
            Self::Task(name) => write!(f, "task '{}'", name),
        }
    }
}

/// Waits until an engine event has been observed running and then stopped.
///
/// An event that already stopped before the first observation is never
/// seen, and the routine keeps waiting.
pub struct WaitForEngineEvent {
    event: EngineEvent,
    button: Option<Button>,
    started: bool,
}

impl WaitForEngineEvent {
    pub fn new(event: EngineEvent, button: Option<Button>) -> Self {
        Self {
            event,
            button,
            started: false,
        }
    }
}

impl Routine for WaitForEngineEvent {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        let running = self.event.is_running(env.game);
        if !self.started && running {
            tracing::trace!("{} started", self.event);
            self.started = true;
        }
        if self.started && !running {
            tracing::trace!("{} finished", self.event);
            return Ok(Step::Done);
        }
        Ok(match self.button {
            Some(button) => Step::Press(button),
            None => Step::Suspend,
        })
    }
}
