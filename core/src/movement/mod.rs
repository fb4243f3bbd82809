//! Movement primitives
//!
//! Small resumable routines that mode bodies are composed from. A routine
//! is an explicit state machine: the scheduler calls [`Routine::step`] once
//! per emulated frame and the routine answers with what it wants next.
//! Composition is by delegation ([`Sequence`], [`Repeat`]), so a composed
//! body still suspends exactly where its innermost routine does.
//!
//! Routines poll engine-exposed state on every step and never cache decoded
//! values across a suspension. None of them time out: a target that never
//! becomes reachable keeps the routine suspended until the driver cancels.

mod combinators;
mod path;
mod wait;
mod walk;

pub use combinators::{Press, PressUntil, Repeat, Sequence};
pub use path::{FollowPath, NavigateTo};
pub use wait::{EngineEvent, WaitForEngineEvent};
pub use walk::WalkOneTile;

use autoplay_shared::{Button, Coords, Direction};

use crate::backend::{Catalog, LiveState, PathFinder};
use crate::context::GameContext;
use crate::decoder::{ObjectFlags, live_player_object, map_objects};
use crate::error::ModeError;

/// What a routine asks of the scheduler after one resumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Advance one frame and resume me.
    Suspend,
    /// Hold this button for the next frame, then resume me.
    Press(Button),
    /// Finished.
    Done,
}

/// Everything a routine may consult while stepping. Read-only.
pub struct StepContext<'a> {
    pub game: &'a dyn LiveState,
    pub ctx: &'a GameContext,
    pub catalog: &'a dyn Catalog,
    pub paths: &'a dyn PathFinder,
}

/// A resumable unit of automation logic.
pub trait Routine {
    /// Resume until the next suspension point.
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError>;
}

impl Routine for Box<dyn Routine> {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        (**self).step(env)
    }
}

/// True once the player object has no single-tile movement in flight.
pub(crate) fn player_settled(game: &dyn LiveState) -> bool {
    live_player_object(game)
        .is_none_or(|player| !player.flags.contains(ObjectFlags::SINGLE_MOVEMENT_ACTIVE))
}

// ============================================================================
// Constructors
// ============================================================================

pub fn walk_one_tile(direction: Direction) -> Box<dyn Routine> {
    Box::new(WalkOneTile::new(direction))
}

pub fn follow_path(waypoints: impl IntoIterator<Item = (i16, i16)>) -> Box<dyn Routine> {
    Box::new(FollowPath::new(waypoints.into_iter().map(Coords::from)))
}

pub fn navigate_to(x: i16, y: i16) -> Box<dyn Routine> {
    Box::new(NavigateTo::new(Coords::new(x, y)))
}

pub fn press(button: Button) -> Box<dyn Routine> {
    Box::new(Press::new(button))
}

/// Wait for the named event script to start and then finish, pressing
/// `button` on every frame in between if given.
pub fn wait_for_script_to_start_and_finish(name: &str, button: Option<Button>) -> Box<dyn Routine> {
    Box::new(WaitForEngineEvent::new(EngineEvent::Script(name.to_string()), button))
}

/// Wait for the named engine task to start and then finish, pressing
/// `button` on every frame in between if given.
pub fn wait_for_task_to_start_and_finish(name: &str, button: Option<Button>) -> Box<dyn Routine> {
    Box::new(WaitForEngineEvent::new(EngineEvent::Task(name.to_string()), button))
}

/// Press A until the player is the only live object left, dismissing
/// whatever NPC interaction is in progress.
pub fn clear_interactions() -> Box<dyn Routine> {
    Box::new(PressUntil::new(Button::A, |env| map_objects(env.game).len() <= 1))
}

/// Press B until the first live object (the player) has held movement
/// active again, i.e. the player can be controlled.
pub fn await_control() -> Box<dyn Routine> {
    Box::new(PressUntil::new(Button::B, |env| {
        map_objects(env.game)
            .first()
            .is_some_and(|object| object.flags.contains(ObjectFlags::HELD_MOVEMENT_ACTIVE))
    }))
}

#[cfg(test)]
mod tests;
