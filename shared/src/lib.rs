//! Shared value types for the autoplay automation engine.
//!
//! Everything here is plain data: game variants, map identifiers, tile
//! coordinates, directions and buttons. The engine crate, emulator backends
//! and static catalogs all speak in these types.

mod game;
mod ids;
mod input;
mod map;
pub mod maps;

pub use game::{GameVersion, MapFamily, UnknownGameVersion};
pub use ids::is_safe_profile_name;
pub use input::Button;
pub use map::{Coords, Direction, MapId};
