//! Autoplay Core - Cooperative automation engine
//!
//! This crate drives long-running automation modes against an emulated game
//! one frame at a time, and validates live and saved game state before and
//! during those runs.
//!
//! # Architecture
//!
//! - [`Scheduler`] - Frame loop that resumes one [`Mode`] per frame and
//!   forwards battle interrupts
//! - [`movement`] - Resumable walking and waiting routines modes are built from
//! - [`assertions`] - Precondition checks raising [`ModeError`]
//! - [`decoder`] - Version-aware decoding of map object records
//! - [`files`] - Per-profile persisted state with atomic writes
//!
//! The emulator, static catalogs, path-finding and battle logic are external
//! collaborators, see [`backend`].

pub mod assertions;
pub mod backend;
pub mod config;
pub mod context;
pub mod decoder;
pub mod error;
pub mod files;
pub mod modes;
pub mod movement;
pub mod scheduler;
#[cfg(test)]
pub mod test_utils;

pub use autoplay_shared::{Button, Coords, Direction, GameVersion, MapFamily, MapId};

// Re-export collaborator interfaces
pub use backend::{
    BattleAction, BattleSubsystem, Catalog, Creature, Emulator, Item, ItemBag, ItemSlot, LiveState,
    Move, PathFinder, PlayerAvatar,
};

pub use config::AutomationConfig;
pub use context::{GameContext, Profile};
pub use decoder::{ObjectFlags, ObjectRecord, SaveData};
pub use error::{ModeError, SchedulerError};
pub use modes::{Mode, ModeEntry, ModeRegistry, StaticRunAway};
pub use movement::{Routine, Step, StepContext};
pub use scheduler::{CancelToken, RunOutcome, Scheduler, TaskState};
