//! Named map identifiers used by the bundled modes.
//!
//! Values are `(group, number)` pairs from each region's map group table.
//! Only the maps the engine refers to by name are listed; everything else is
//! addressed through [`MapId::new`].

/// Hoenn maps (Ruby, Sapphire and Emerald share one table).
pub mod hoenn {
    use crate::MapId;

    pub const LITTLEROOT_TOWN: MapId = MapId::new(0, 9);
    pub const DESERT_RUINS: MapId = MapId::new(24, 6);
    pub const ISLAND_CAVE: MapId = MapId::new(24, 67);
    pub const ANCIENT_TOMB: MapId = MapId::new(24, 68);
    pub const SKY_PILLAR_TOP: MapId = MapId::new(24, 85);
    pub const MARINE_CAVE_END: MapId = MapId::new(24, 103);
    pub const TERRA_CAVE_END: MapId = MapId::new(24, 105);
    pub const SOUTHERN_ISLAND_INTERIOR: MapId = MapId::new(26, 10);
    pub const FARAWAY_ISLAND_ENTRANCE: MapId = MapId::new(26, 56);
    pub const NAVEL_ROCK_TOP: MapId = MapId::new(26, 85);
    pub const NAVEL_ROCK_BOTTOM: MapId = MapId::new(26, 86);
}

/// Kanto and Sevii Islands maps (FireRed and LeafGreen).
pub mod kanto {
    use crate::MapId;

    pub const PALLET_TOWN: MapId = MapId::new(3, 0);
    pub const NAVEL_ROCK_SUMMIT: MapId = MapId::new(2, 62);
    pub const NAVEL_ROCK_BASE: MapId = MapId::new(2, 63);
}
