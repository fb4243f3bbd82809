//! Persisted save data
//!
//! The backend hands over the save as an ordered list of sections. Section 1
//! starts the first save block: the player position, the current map and
//! (further in, at a version-dependent offset) the map object table.

use autoplay_shared::{Coords, GameVersion, MapId};
use byteorder::{ByteOrder, LittleEndian};

use crate::backend::LiveState;

use super::{ObjectRecord, find_player_object, saved_object_table_offset};

/// Index of the section holding the player's position and map objects
pub const SAVE_BLOCK_1_SECTION: usize = 1;

const POSITION_OFFSET: usize = 0x00;
const MAP_GROUP_OFFSET: usize = 0x04;
const MAP_NUMBER_OFFSET: usize = 0x05;

/// Ordered save sections as read from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveData {
    sections: Vec<Vec<u8>>,
}

impl SaveData {
    pub fn from_sections(sections: Vec<Vec<u8>>) -> Self {
        Self { sections }
    }

    /// Read the most recent save, `None` if the game has never been saved.
    pub fn load(live: &dyn LiveState) -> Option<Self> {
        live.read_save_sections().map(Self::from_sections)
    }

    pub fn section(&self, index: usize) -> Option<&[u8]> {
        self.sections.get(index).map(Vec::as_slice)
    }

    /// Map the game was saved on.
    pub fn map_id(&self) -> Option<MapId> {
        let section = self.section(SAVE_BLOCK_1_SECTION)?;
        Some(MapId::new(
            *section.get(MAP_GROUP_OFFSET)?,
            *section.get(MAP_NUMBER_OFFSET)?,
        ))
    }

    /// Local tile the player was standing on when saving.
    pub fn local_coordinates(&self) -> Option<Coords> {
        let position = self
            .section(SAVE_BLOCK_1_SECTION)?
            .get(POSITION_OFFSET..POSITION_OFFSET + 4)?;
        Some(Coords::new(
            LittleEndian::read_i16(&position[0..2]),
            LittleEndian::read_i16(&position[2..4]),
        ))
    }

    /// The saved map object flagged as the player.
    pub fn player_object(&self, version: GameVersion) -> Option<ObjectRecord> {
        let section = self.section(SAVE_BLOCK_1_SECTION)?;
        find_player_object(section, saved_object_table_offset(version))
    }
}
