//! Routine combinators.

use std::collections::VecDeque;

use autoplay_shared::Button;

use super::{Routine, Step, StepContext};
use crate::error::ModeError;

/// Runs routines one after another.
///
/// A child finishing does not cost a frame: the next child is resumed
/// immediately, as if the parent had delegated to it directly.
#[derive(Default)]
pub struct Sequence {
    routines: VecDeque<Box<dyn Routine>>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, routine: Box<dyn Routine>) -> Self {
        self.routines.push_back(routine);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

impl FromIterator<Box<dyn Routine>> for Sequence {
    fn from_iter<I: IntoIterator<Item = Box<dyn Routine>>>(iter: I) -> Self {
        Self {
            routines: iter.into_iter().collect(),
        }
    }
}

impl Routine for Sequence {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        while let Some(current) = self.routines.front_mut() {
            match current.step(env)? {
                Step::Done => {
                    self.routines.pop_front();
                }
                step => return Ok(step),
            }
        }
        Ok(Step::Done)
    }
}

/// Rebuilds and runs a routine forever.
///
/// A pass that finishes without suspending still yields one frame, so an
/// empty body cannot spin the scheduler.
pub struct Repeat {
    factory: Box<dyn FnMut() -> Box<dyn Routine>>,
    current: Option<Box<dyn Routine>>,
    suspended_this_pass: bool,
    passes: u64,
}

impl Repeat {
    pub fn new(factory: impl FnMut() -> Box<dyn Routine> + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            current: None,
            suspended_this_pass: false,
            passes: 0,
        }
    }

    /// Completed passes so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

impl Routine for Repeat {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        loop {
            let current = self.current.get_or_insert_with(|| (self.factory)());
            match current.step(env)? {
                Step::Done => {
                    self.current = None;
                    self.passes += 1;
                    tracing::trace!("Repeat finished pass {}", self.passes);
                    if !std::mem::take(&mut self.suspended_this_pass) {
                        return Ok(Step::Suspend);
                    }
                }
                step => {
                    self.suspended_this_pass = true;
                    return Ok(step);
                }
            }
        }
    }
}

/// Presses a button for one frame.
pub struct Press {
    button: Button,
    pressed: bool,
}

impl Press {
    pub fn new(button: Button) -> Self {
        Self {
            button,
            pressed: false,
        }
    }
}

impl Routine for Press {
    fn step(&mut self, _env: &StepContext<'_>) -> Result<Step, ModeError> {
        if std::mem::replace(&mut self.pressed, true) {
            Ok(Step::Done)
        } else {
            Ok(Step::Press(self.button))
        }
    }
}

/// Presses a button every frame until a condition holds.
///
/// Used to clear an NPC interaction (`A` until only the player is left)
/// or to mash through text until the player regains control (`B`).
pub struct PressUntil {
    button: Button,
    condition: Box<dyn Fn(&StepContext<'_>) -> bool>,
}

impl PressUntil {
    pub fn new(button: Button, condition: impl Fn(&StepContext<'_>) -> bool + 'static) -> Self {
        Self {
            button,
            condition: Box::new(condition),
        }
    }
}

impl Routine for PressUntil {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        if (self.condition)(env) {
            Ok(Step::Done)
        } else {
            Ok(Step::Press(self.button))
        }
    }
}
