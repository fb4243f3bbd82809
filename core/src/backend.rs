//! Collaborator interfaces
//!
//! The engine drives an external emulator and consults static catalogs,
//! a path-finder and the battle subsystem. None of those live in this
//! crate; they are reached only through the traits below, so a real
//! emulator binding and the in-crate test fakes are interchangeable.

use anyhow::Result;
use autoplay_shared::{Button, Coords, Direction, MapId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Records
// ============================================================================

/// Where the player avatar currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAvatar {
    pub map: MapId,
    pub local_coordinates: Coords,
    pub facing: Direction,
}

/// Canonical item catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub index: u16,
    pub name: String,
}

/// Canonical move catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub index: u16,
    pub name: String,
}

/// A creature as decoded by the emulator backend (party member or opponent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creature {
    pub species_name: String,
    pub national_dex_number: u16,
    /// Nickname, or the species name when none was given.
    pub name: String,
    pub nature: String,
    pub is_shiny: bool,
    pub is_egg: bool,
    /// True for an unused party slot.
    pub is_empty: bool,
    /// Sum of the six individual values.
    pub iv_sum: u16,
    pub personality_value: u32,
    /// Up to four learned moves; `None` marks an empty move slot.
    pub moves: [Option<Move>; 4],
    /// The raw fixed-format record, written out unmodified on export.
    pub data: Vec<u8>,
}

/// One stack of items in a bag pocket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSlot {
    pub item: Item,
    pub quantity: u16,
}

/// The player's item bag (all pockets flattened).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemBag {
    pub slots: Vec<ItemSlot>,
}

impl ItemBag {
    pub fn new(slots: Vec<ItemSlot>) -> Self {
        Self { slots }
    }

    /// Total quantity of `item` across every slot holding it.
    pub fn quantity_of(&self, item: &Item) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.item.index == item.index)
            .map(|slot| u32::from(slot.quantity))
            .sum()
    }
}

/// What the battle subsystem should do with a battle that just started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleAction {
    Fight,
    RunAway,
    Catch,
    /// Free-form instruction understood by the battle subsystem.
    Custom(String),
    /// Leave the battle to the battle subsystem's own logic.
    Defer,
}

// ============================================================================
// Emulator
// ============================================================================

/// Read-only view of the emulated game.
///
/// Every call observes the state of the current frame. Callers must not
/// keep derived values across a frame advance.
pub trait LiveState {
    /// Map, tile and facing of the player avatar.
    fn player_avatar(&self) -> PlayerAvatar;
    /// Raw bytes of a named region of live memory (e.g. `gObjectEvents`).
    fn read_symbol(&self, symbol: &str) -> Option<Vec<u8>>;
    /// Whether the named event script is currently executing.
    fn is_script_running(&self, name: &str) -> bool;
    /// Whether the named engine task is currently scheduled.
    fn is_task_running(&self, name: &str) -> bool;
    /// Value of a named event flag.
    fn event_flag(&self, name: &str) -> bool;
    /// Party members in slot order.
    fn party(&self) -> Vec<Creature>;
    /// The live item bag.
    fn item_bag(&self) -> ItemBag;
    /// Item registered to the Select button, if any.
    fn registered_item(&self) -> Option<Item>;
    /// Ordered sections of the most recent save, `None` if the game was never saved.
    fn read_save_sections(&self) -> Option<Vec<Vec<u8>>>;
    /// The item bag as it was when the game was last saved.
    fn saved_item_bag(&self) -> Option<ItemBag>;
}

/// The emulation backend driven by the scheduler.
pub trait Emulator: LiveState {
    /// Advance the emulation by exactly one frame.
    fn advance_frame(&mut self) -> Result<()>;
    /// Hold `button` for the next frame.
    fn press_button(&mut self, button: Button) -> Result<()>;
    /// True exactly once, on the frame a battle begins.
    fn battle_started(&mut self) -> bool;
    /// The current battle opponent, if a battle is active.
    fn opponent(&self) -> Option<Creature>;
}

// ============================================================================
// Static data and subsystems
// ============================================================================

/// Static game databases.
pub trait Catalog {
    /// Resolve an item name (any spelling the catalog accepts) to its entry.
    fn item_by_name(&self, name: &str) -> Option<Item>;
    /// Resolve a move name to its entry.
    fn move_by_name(&self, name: &str) -> Option<Move>;
}

/// Tile-graph path-finding over a map.
pub trait PathFinder {
    /// Waypoints from `from` to `to`, excluding `from`. `None` if unreachable.
    fn find_path(&self, map: MapId, from: Coords, to: Coords) -> Option<Vec<Coords>>;
}

/// The battle subsystem. Fire-and-forget from the engine's perspective.
pub trait BattleSubsystem {
    /// Carry out `action` against `opponent`.
    fn handle(&mut self, action: BattleAction, opponent: &Creature);

    /// Policy for a battle that starts while the running task registered no
    /// interrupt handler. Supplied by the surrounding application.
    fn unhandled_battle(&mut self, opponent: &Creature) -> BattleAction;
}
