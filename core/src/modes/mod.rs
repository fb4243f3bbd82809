//! Automation modes
//!
//! A mode is a named, resumable recipe. It is constructed when selected,
//! driven by the [`Scheduler`](crate::scheduler::Scheduler) until it
//! finishes, fails or is cancelled, and then discarded.

mod static_run_away;

pub use static_run_away::StaticRunAway;

use crate::backend::{BattleAction, Creature, LiveState};
use crate::context::GameContext;
use crate::movement::Routine;

/// A selectable automation task.
pub trait Mode: Routine {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Whether the mode can start from the current game state.
    fn is_selectable(ctx: &GameContext, live: &dyn LiveState) -> bool
    where
        Self: Sized;

    /// Called when a battle starts while the mode is running.
    ///
    /// `None` means the mode has no opinion and the battle subsystem's
    /// own policy applies.
    fn on_battle_started(&mut self, _ctx: &GameContext, _opponent: &Creature) -> Option<BattleAction> {
        None
    }
}

/// Registry entry for one mode.
pub struct ModeEntry {
    pub name: &'static str,
    is_selectable: fn(&GameContext, &dyn LiveState) -> bool,
    create: fn() -> Box<dyn Mode>,
}

impl ModeEntry {
    pub fn of<M: Mode + Default + 'static>() -> Self {
        Self {
            name: M::default().name(),
            is_selectable: M::is_selectable,
            create: || -> Box<dyn Mode> { Box::new(M::default()) },
        }
    }

    pub fn is_selectable(&self, ctx: &GameContext, live: &dyn LiveState) -> bool {
        (self.is_selectable)(ctx, live)
    }

    pub fn create(&self) -> Box<dyn Mode> {
        (self.create)()
    }
}

/// Every mode the engine knows.
pub struct ModeRegistry {
    entries: Vec<ModeEntry>,
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self {
            entries: vec![ModeEntry::of::<StaticRunAway>()],
        }
    }
}

impl ModeRegistry {
    pub fn entries(&self) -> &[ModeEntry] {
        &self.entries
    }

    /// Modes that can start right now.
    pub fn selectable<'a>(
        &'a self,
        ctx: &'a GameContext,
        live: &'a dyn LiveState,
    ) -> impl Iterator<Item = &'a ModeEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.is_selectable(ctx, live))
    }

    /// Build a fresh instance of the mode with this name.
    pub fn create(&self, name: &str) -> Option<Box<dyn Mode>> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(ModeEntry::create)
    }
}
