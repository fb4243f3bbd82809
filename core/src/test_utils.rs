//! Shared test utilities for unit tests
//!
//! A scripted emulator fake with just enough overworld simulation to drive
//! movement primitives, plus byte builders for save sections and map
//! object tables.

use anyhow::Result;
use autoplay_shared::{Button, Coords, Direction, GameVersion, MapId};
use hashbrown::{HashMap, HashSet};

use crate::backend::{
    BattleAction, BattleSubsystem, Catalog, Creature, Emulator, Item, ItemBag, LiveState, Move,
    PathFinder, PlayerAvatar,
};
use crate::context::{GameContext, Profile};
use crate::config::AutomationConfig;
use crate::decoder::{
    LIVE_OBJECT_TABLE_SYMBOL, OBJECT_RECORD_SIZE, OBJECT_SLOT_COUNT, ObjectFlags,
    SAVE_BLOCK_1_SECTION, object_slot_offset, saved_object_table_offset,
};

// ============================================================================
// Byte builders
// ============================================================================

/// Encode one map object record.
pub fn object_bytes(
    flags: ObjectFlags,
    facing: Option<Direction>,
    map: MapId,
    coords: Coords,
) -> [u8; OBJECT_RECORD_SIZE] {
    let mut bytes = [0u8; OBJECT_RECORD_SIZE];
    bytes[0..4].copy_from_slice(&flags.bits().to_le_bytes());
    bytes[0x09] = map.number;
    bytes[0x0A] = map.group;
    bytes[0x10..0x12].copy_from_slice(&coords.x.to_le_bytes());
    bytes[0x12..0x14].copy_from_slice(&coords.y.to_le_bytes());
    bytes[0x18] = facing.map_or(0, Direction::engine_code);
    bytes
}

/// Save sections for a game saved on `map` at `coords`.
///
/// `objects` lists `(slot, record)` pairs placed at the version's table offset.
pub fn save_sections(
    version: GameVersion,
    map: MapId,
    coords: Coords,
    objects: &[(usize, [u8; OBJECT_RECORD_SIZE])],
) -> Vec<Vec<u8>> {
    let mut block = vec![0u8; 0xF80];
    block[0..2].copy_from_slice(&coords.x.to_le_bytes());
    block[2..4].copy_from_slice(&coords.y.to_le_bytes());
    block[4] = map.group;
    block[5] = map.number;

    let base = saved_object_table_offset(version);
    for (slot, record) in objects {
        let offset = object_slot_offset(base, *slot);
        block[offset..offset + OBJECT_RECORD_SIZE].copy_from_slice(record);
    }

    let mut sections = vec![vec![0u8; 0xF80]; 14];
    sections[SAVE_BLOCK_1_SECTION] = block;
    sections
}

/// Save sections with the player object in slot 0 facing `facing`.
pub fn player_save(version: GameVersion, map: MapId, coords: Coords, facing: Direction) -> Vec<Vec<u8>> {
    let player = object_bytes(
        ObjectFlags::ACTIVE | ObjectFlags::IS_PLAYER,
        Some(facing),
        map,
        coords,
    );
    save_sections(version, map, coords, &[(0, player)])
}

pub fn item(index: u16, name: &str) -> Item {
    Item {
        index,
        name: name.to_string(),
    }
}

pub fn creature(species: &str, dex: u16) -> Creature {
    Creature {
        species_name: species.to_string(),
        national_dex_number: dex,
        name: species.to_uppercase(),
        nature: "Timid".to_string(),
        is_shiny: false,
        is_egg: false,
        is_empty: false,
        iv_sum: 93,
        personality_value: 0x00C0_FFEE,
        moves: [None, None, None, None],
        data: vec![0xAB; 100],
    }
}

pub fn test_context(version: GameVersion) -> GameContext {
    GameContext::new(version, AutomationConfig::default(), Profile::at("unused-profile"))
}

// ============================================================================
// Fake emulator
// ============================================================================

/// Scripted emulator.
///
/// Direction presses move the avatar one tile on the following frame
/// (turning first if it faces elsewhere). Scripts, tasks and battles are
/// scheduled by frame number.
pub struct FakeEmulator {
    pub frame: u64,
    pub avatar: PlayerAvatar,
    /// Player object flags reported in the live object table
    pub player_flags: ObjectFlags,
    /// Extra live objects (NPCs) on the avatar's map
    pub npcs: Vec<Coords>,
    /// Frame at which the NPCs leave
    pub npc_leaves_at: Option<u64>,
    /// Frame on which the player regains control (held movement active)
    pub control_returns_at: Option<u64>,
    pub scripts: Vec<(String, u64, u64)>,
    pub tasks: Vec<(String, u64, u64)>,
    pub flags: HashSet<String>,
    pub party: Vec<Creature>,
    pub bag: ItemBag,
    pub saved_bag: Option<ItemBag>,
    pub registered: Option<Item>,
    pub save: Option<Vec<Vec<u8>>>,
    pub battle_frames: HashSet<u64>,
    pub opponent: Option<Creature>,
    /// First frame on which `opponent` can be read
    pub opponent_readable_from: u64,
    /// Tiles the avatar cannot enter
    pub walls: HashSet<Coords>,
    /// Every `(frame, button)` pressed
    pub pressed: Vec<(u64, Button)>,
    held: Option<Button>,
    pub fail_on_frame: Option<u64>,
}

impl FakeEmulator {
    pub fn new(map: MapId, coords: Coords) -> Self {
        Self {
            frame: 0,
            avatar: PlayerAvatar {
                map,
                local_coordinates: coords,
                facing: Direction::Down,
            },
            player_flags: ObjectFlags::ACTIVE
                | ObjectFlags::IS_PLAYER
                | ObjectFlags::HELD_MOVEMENT_ACTIVE,
            npcs: Vec::new(),
            npc_leaves_at: None,
            control_returns_at: None,
            scripts: Vec::new(),
            tasks: Vec::new(),
            flags: HashSet::new(),
            party: Vec::new(),
            bag: ItemBag::default(),
            saved_bag: None,
            registered: None,
            save: None,
            battle_frames: HashSet::new(),
            opponent: None,
            opponent_readable_from: 0,
            walls: HashSet::new(),
            pressed: Vec::new(),
            held: None,
            fail_on_frame: None,
        }
    }

    pub fn presses_of(&self, button: Button) -> usize {
        self.pressed.iter().filter(|(_, b)| *b == button).count()
    }

    fn running(schedule: &[(String, u64, u64)], name: &str, frame: u64) -> bool {
        schedule
            .iter()
            .any(|(n, start, end)| n == name && (*start..*end).contains(&frame))
    }
}

impl LiveState for FakeEmulator {
    fn player_avatar(&self) -> PlayerAvatar {
        self.avatar
    }

    fn read_symbol(&self, symbol: &str) -> Option<Vec<u8>> {
        if symbol != LIVE_OBJECT_TABLE_SYMBOL {
            return None;
        }
        let mut table = vec![0u8; OBJECT_SLOT_COUNT * OBJECT_RECORD_SIZE];
        let player = object_bytes(
            self.player_flags,
            Some(self.avatar.facing),
            self.avatar.map,
            self.avatar.local_coordinates,
        );
        table[..OBJECT_RECORD_SIZE].copy_from_slice(&player);
        for (i, coords) in self.npcs.iter().enumerate() {
            let npc = object_bytes(ObjectFlags::ACTIVE, Some(Direction::Down), self.avatar.map, *coords);
            let offset = object_slot_offset(0, i + 1);
            table[offset..offset + OBJECT_RECORD_SIZE].copy_from_slice(&npc);
        }
        Some(table)
    }

    fn is_script_running(&self, name: &str) -> bool {
        Self::running(&self.scripts, name, self.frame)
    }

    fn is_task_running(&self, name: &str) -> bool {
        Self::running(&self.tasks, name, self.frame)
    }

    fn event_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    fn party(&self) -> Vec<Creature> {
        self.party.clone()
    }

    fn item_bag(&self) -> ItemBag {
        self.bag.clone()
    }

    fn registered_item(&self) -> Option<Item> {
        self.registered.clone()
    }

    fn read_save_sections(&self) -> Option<Vec<Vec<u8>>> {
        self.save.clone()
    }

    fn saved_item_bag(&self) -> Option<ItemBag> {
        self.saved_bag.clone()
    }
}

impl Emulator for FakeEmulator {
    fn advance_frame(&mut self) -> Result<()> {
        if self.fail_on_frame == Some(self.frame) {
            anyhow::bail!("emulator crashed on frame {}", self.frame);
        }

        if let Some(button) = self.held.take() {
            let direction = match button {
                Button::Up => Some(Direction::Up),
                Button::Down => Some(Direction::Down),
                Button::Left => Some(Direction::Left),
                Button::Right => Some(Direction::Right),
                _ => None,
            };
            if let Some(direction) = direction {
                if self.avatar.facing != direction {
                    self.avatar.facing = direction;
                } else {
                    let next = direction.step(self.avatar.local_coordinates);
                    if !self.walls.contains(&next) {
                        self.avatar.local_coordinates = next;
                    }
                }
            }
        }

        self.frame += 1;

        if self.npc_leaves_at.is_some_and(|f| self.frame >= f) {
            self.npcs.clear();
        }
        if let Some(at) = self.control_returns_at {
            if self.frame >= at {
                self.player_flags.insert(ObjectFlags::HELD_MOVEMENT_ACTIVE);
            } else {
                self.player_flags.remove(ObjectFlags::HELD_MOVEMENT_ACTIVE);
            }
        }
        Ok(())
    }

    fn press_button(&mut self, button: Button) -> Result<()> {
        self.pressed.push((self.frame, button));
        self.held = Some(button);
        Ok(())
    }

    fn battle_started(&mut self) -> bool {
        self.battle_frames.remove(&self.frame)
    }

    fn opponent(&self) -> Option<Creature> {
        if self.frame < self.opponent_readable_from {
            return None;
        }
        self.opponent.clone()
    }
}

// ============================================================================
// Catalog, path-finder and battle fakes
// ============================================================================

/// Catalog resolving names case-insensitively, accepting "Poké" for "Poke".
#[derive(Default)]
pub struct FakeCatalog {
    pub items: HashMap<String, Item>,
    pub moves: HashMap<String, Move>,
}

impl FakeCatalog {
    pub fn standard() -> Self {
        let mut catalog = Self::default();
        let items = [
            (1, "Master Ball"),
            (2, "Ultra Ball"),
            (3, "Great Ball"),
            (4, "Poke Ball"),
            (259, "Mach Bike"),
        ];
        for (index, name) in items {
            catalog.items.insert(name.to_lowercase(), item(index, name));
        }
        for (index, name) in [(57, "Surf"), (19, "Fly"), (148, "Flash"), (91, "Dig")] {
            catalog.moves.insert(
                name.to_lowercase(),
                Move {
                    index,
                    name: name.to_string(),
                },
            );
        }
        catalog
    }

    fn key(name: &str) -> String {
        name.to_lowercase().replace('é', "e")
    }
}

impl Catalog for FakeCatalog {
    fn item_by_name(&self, name: &str) -> Option<Item> {
        self.items.get(&Self::key(name)).cloned()
    }

    fn move_by_name(&self, name: &str) -> Option<Move> {
        self.moves.get(&Self::key(name)).cloned()
    }
}

/// Open-field path-finder: one L-shaped path, horizontal leg first.
pub struct OpenField;

impl PathFinder for OpenField {
    fn find_path(&self, _map: MapId, from: Coords, to: Coords) -> Option<Vec<Coords>> {
        let corner = Coords::new(to.x, from.y);
        let mut path = Vec::new();
        if corner != from {
            path.push(corner);
        }
        if corner != to {
            path.push(to);
        }
        Some(path)
    }
}

/// Path-finder that never finds a path.
pub struct Blocked;

impl PathFinder for Blocked {
    fn find_path(&self, _map: MapId, _from: Coords, _to: Coords) -> Option<Vec<Coords>> {
        None
    }
}

/// Battle subsystem that records what it was told.
pub struct RecordingBattle {
    pub default_action: BattleAction,
    pub handled: Vec<(BattleAction, String)>,
    pub unhandled_calls: usize,
}

impl RecordingBattle {
    pub fn new(default_action: BattleAction) -> Self {
        Self {
            default_action,
            handled: Vec::new(),
            unhandled_calls: 0,
        }
    }
}

impl BattleSubsystem for RecordingBattle {
    fn handle(&mut self, action: BattleAction, opponent: &Creature) {
        self.handled.push((action, opponent.species_name.clone()));
    }

    fn unhandled_battle(&mut self, _opponent: &Creature) -> BattleAction {
        self.unhandled_calls += 1;
        self.default_action.clone()
    }
}
