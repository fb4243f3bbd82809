//! Fixed-layout record decoding
//!
//! Map objects ("object events") are stored as a table of 16 records of
//! 0x24 bytes each, both in live memory and inside the first section of the
//! save. The table's offset within that section differs between game
//! versions; the record layout itself does not.
//!
//! Decoding never validates content beyond bounds: foreign bytes produce
//! nonsensical but well-typed records. Callers corroborate (for example by
//! looking for the slot flagged as the player).

mod save;

pub use save::{SAVE_BLOCK_1_SECTION, SaveData};

use autoplay_shared::{Coords, Direction, GameVersion, MapId};
use byteorder::{ByteOrder, LittleEndian};

use crate::backend::LiveState;

/// Number of map object slots in the table
pub const OBJECT_SLOT_COUNT: usize = 16;

/// Size of one map object record in bytes
pub const OBJECT_RECORD_SIZE: usize = 0x24;

/// Live memory symbol holding the map object table
pub const LIVE_OBJECT_TABLE_SYMBOL: &str = "gObjectEvents";

// Field offsets within one record.
const FLAGS_OFFSET: usize = 0x00;
const LOCAL_ID_OFFSET: usize = 0x08;
const MAP_NUMBER_OFFSET: usize = 0x09;
const MAP_GROUP_OFFSET: usize = 0x0A;
const CURRENT_COORDS_OFFSET: usize = 0x10;
const DIRECTION_OFFSET: usize = 0x18;

/// Offset of the map object table inside save section 1 for `version`.
pub fn saved_object_table_offset(version: GameVersion) -> usize {
    match version {
        GameVersion::FireRedLeafGreen => 0x6A0,
        GameVersion::Emerald => 0xA30,
        GameVersion::RubySapphire => 0x9E0,
    }
}

/// Byte offset of `slot` in a table starting at `base`.
pub fn object_slot_offset(base: usize, slot: usize) -> usize {
    base + slot * OBJECT_RECORD_SIZE
}

bitflags::bitflags! {
    /// Map object state bits (first 32-bit word of the record).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u32 {
        const ACTIVE = 1 << 0;
        const SINGLE_MOVEMENT_ACTIVE = 1 << 1;
        const TRIGGER_GROUND_EFFECTS_ON_MOVE = 1 << 2;
        const TRIGGER_GROUND_EFFECTS_ON_STOP = 1 << 3;
        const DISABLE_COVERING_GROUND_EFFECTS = 1 << 4;
        const LANDING_JUMP = 1 << 5;
        const HELD_MOVEMENT_ACTIVE = 1 << 6;
        const HELD_MOVEMENT_FINISHED = 1 << 7;
        const FROZEN = 1 << 8;
        const FACING_DIRECTION_LOCKED = 1 << 9;
        const DISABLE_ANIM = 1 << 10;
        const ENABLE_ANIM = 1 << 11;
        const INANIMATE = 1 << 12;
        const INVISIBLE = 1 << 13;
        const OFF_SCREEN = 1 << 14;
        const TRACKED_BY_CAMERA = 1 << 15;
        const IS_PLAYER = 1 << 16;
        const HAS_REFLECTION = 1 << 17;
        const IN_SHORT_GRASS = 1 << 18;
        const IN_SHALLOW_FLOWING_WATER = 1 << 19;
        const IN_SAND_PILE = 1 << 20;
        const IN_HOT_SPRINGS = 1 << 21;
        const HAS_SHADOW = 1 << 22;
        const SPRITE_ANIM_PAUSED_BACKUP = 1 << 23;
        const SPRITE_AFFINE_ANIM_PAUSED_BACKUP = 1 << 24;
        const DISABLE_JUMP_LANDING_GROUND_EFFECT = 1 << 25;
        const FIXED_PRIORITY = 1 << 26;
        const HIDE_REFLECTION = 1 << 27;
    }
}

/// One decoded map object.
///
/// Only valid for the frame its bytes were read on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Slot index within the table
    pub slot: usize,
    pub flags: ObjectFlags,
    /// `None` for `DIR_NONE` or an out-of-range direction code
    pub facing: Option<Direction>,
    pub local_id: u8,
    pub map: MapId,
    pub current_coords: Coords,
}

impl ObjectRecord {
    /// Decode one record. Returns `None` if `bytes` is shorter than a record.
    pub fn decode(slot: usize, bytes: &[u8]) -> Option<Self> {
        let record = bytes.get(..OBJECT_RECORD_SIZE)?;
        let flags = ObjectFlags::from_bits_truncate(LittleEndian::read_u32(
            &record[FLAGS_OFFSET..FLAGS_OFFSET + 4],
        ));
        // Low nibble is the facing direction, high nibble the movement direction.
        let facing = Direction::from_engine_code(record[DIRECTION_OFFSET] & 0x0F);
        let current_coords = Coords::new(
            LittleEndian::read_i16(&record[CURRENT_COORDS_OFFSET..CURRENT_COORDS_OFFSET + 2]),
            LittleEndian::read_i16(&record[CURRENT_COORDS_OFFSET + 2..CURRENT_COORDS_OFFSET + 4]),
        );

        Some(Self {
            slot,
            flags,
            facing,
            local_id: record[LOCAL_ID_OFFSET],
            map: MapId::new(record[MAP_GROUP_OFFSET], record[MAP_NUMBER_OFFSET]),
            current_coords,
        })
    }

    pub fn is_player(&self) -> bool {
        self.flags.contains(ObjectFlags::IS_PLAYER)
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(ObjectFlags::ACTIVE)
    }
}

/// Decode every slot of a table starting at `base`.
///
/// Slots that run past the end of `bytes` are skipped.
pub fn decode_object_table(bytes: &[u8], base: usize) -> Vec<ObjectRecord> {
    (0..OBJECT_SLOT_COUNT)
        .filter_map(|slot| {
            let offset = object_slot_offset(base, slot);
            ObjectRecord::decode(slot, bytes.get(offset..)?)
        })
        .collect()
}

/// First slot in the table flagged as the player.
pub fn find_player_object(bytes: &[u8], base: usize) -> Option<ObjectRecord> {
    let players: Vec<ObjectRecord> = decode_object_table(bytes, base)
        .into_iter()
        .filter(ObjectRecord::is_player)
        .collect();
    if players.len() > 1 {
        tracing::debug!(
            "{} object slots claim to be the player; using slot {}",
            players.len(),
            players[0].slot
        );
    }
    players.first().copied()
}

/// Active map objects on the current frame, player first.
///
/// Empty if the backend does not expose the live object table.
pub fn map_objects(live: &dyn LiveState) -> Vec<ObjectRecord> {
    let Some(bytes) = live.read_symbol(LIVE_OBJECT_TABLE_SYMBOL) else {
        return Vec::new();
    };
    let mut objects: Vec<ObjectRecord> = decode_object_table(&bytes, 0)
        .into_iter()
        .filter(ObjectRecord::is_active)
        .collect();
    objects.sort_by_key(|object| !object.is_player());
    objects
}

/// The live player object, if any.
pub fn live_player_object(live: &dyn LiveState) -> Option<ObjectRecord> {
    map_objects(live).into_iter().find(ObjectRecord::is_player)
}
