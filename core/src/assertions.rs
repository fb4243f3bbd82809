//! Precondition checks
//!
//! Side-effect-free guards that modes run before (or partway through) an
//! automated sequence. Each check either returns `Ok(())` or a
//! [`ModeError::Precondition`] carrying the caller's message unchanged.

use autoplay_shared::{Coords, MapId};

use crate::backend::{Catalog, LiveState};
use crate::context::GameContext;
use crate::decoder::SaveData;
use crate::error::ModeError;

type Check = Result<(), ModeError>;

fn ensure(condition: bool, error_message: &str) -> Check {
    if condition {
        Ok(())
    } else {
        Err(ModeError::precondition(error_message))
    }
}

/// Fails if auto-battle is enabled, i.e. requires that the battle
/// subsystem runs from every opponent instead of fighting.
pub fn assert_no_auto_battle(ctx: &GameContext, error_message: &str) -> Check {
    ensure(!ctx.config.battle.battle, error_message)
}

/// Fails if auto-pickup is enabled (it interferes with scripted encounters).
pub fn assert_no_auto_pickup(ctx: &GameContext, error_message: &str) -> Check {
    ensure(!ctx.config.battle.pickup, error_message)
}

/// Fails if the game has never been saved.
pub fn assert_save_game_exists(live: &dyn LiveState, error_message: &str) -> Check {
    ensure(SaveData::load(live).is_some(), error_message)
}

/// A place the game is expected to have been saved at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedLocation {
    pub map: MapId,
    /// When `None`, only the map is compared.
    pub local_coordinates: Option<Coords>,
    /// Compare `local_coordinates` against the tile the player was facing
    /// instead of the tile they stood on.
    pub facing: bool,
}

impl ExpectedLocation {
    /// Anywhere on `map`.
    pub fn map(map: MapId) -> Self {
        Self {
            map,
            local_coordinates: None,
            facing: false,
        }
    }

    /// Standing on `coords`.
    pub fn standing_on(map: MapId, coords: Coords) -> Self {
        Self {
            map,
            local_coordinates: Some(coords),
            facing: false,
        }
    }

    /// Facing towards `coords`.
    pub fn facing(map: MapId, coords: Coords) -> Self {
        Self {
            map,
            local_coordinates: Some(coords),
            facing: true,
        }
    }

    fn matches(&self, ctx: &GameContext, save: &SaveData) -> bool {
        if save.map_id() != Some(self.map) {
            return false;
        }
        let Some(expected) = self.local_coordinates else {
            return true;
        };
        let Some(saved) = save.local_coordinates() else {
            return false;
        };
        if !self.facing {
            return expected == saved;
        }
        save.player_object(ctx.version)
            .and_then(|player| player.facing)
            .is_some_and(|direction| direction.step(saved) == expected)
    }
}

/// Fails unless the game was saved at one of `expected_locations`.
///
/// The list is a logical OR; its order does not matter.
pub fn assert_saved_on_map(
    ctx: &GameContext,
    live: &dyn LiveState,
    expected_locations: &[ExpectedLocation],
    error_message: &str,
) -> Check {
    let Some(save) = SaveData::load(live) else {
        return Err(ModeError::precondition(error_message));
    };
    ensure(
        expected_locations.iter().any(|loc| loc.matches(ctx, &save)),
        error_message,
    )
}

/// Fails unless the item registered to the Select button is one of `expected_items`.
///
/// Names are resolved through the catalog and compared by item index.
pub fn assert_registered_item(
    live: &dyn LiveState,
    catalog: &dyn Catalog,
    expected_items: &[&str],
    error_message: &str,
) -> Check {
    let Some(registered) = live.registered_item() else {
        return Err(ModeError::precondition(error_message));
    };
    let listed = expected_items.iter().any(|name| match catalog.item_by_name(name) {
        Some(item) => item.index == registered.index,
        None => {
            tracing::warn!("Item '{}' is not in the catalog", name);
            false
        }
    });
    ensure(listed, error_message)
}

/// Fails unless a non-egg party member knows `move_name`.
pub fn assert_has_pokemon_with_move(
    live: &dyn LiveState,
    catalog: &dyn Catalog,
    move_name: &str,
    error_message: &str,
) -> Check {
    let Some(wanted) = catalog.move_by_name(move_name) else {
        tracing::warn!("Move '{}' is not in the catalog", move_name);
        return Err(ModeError::precondition(error_message));
    };
    let known = live
        .party()
        .iter()
        .filter(|member| !member.is_egg && !member.is_empty)
        .flat_map(|member| member.moves.iter().flatten())
        .any(|learned| learned.index == wanted.index);
    ensure(known, error_message)
}

/// Fails unless the bag holds a non-zero total of `expected_items`.
///
/// Any of the items, in any amount, satisfies the check. With
/// `check_in_saved_game` the bag as last saved is inspected instead of the
/// live one; a game that was never saved has an empty bag.
pub fn assert_item_exists_in_bag(
    live: &dyn LiveState,
    catalog: &dyn Catalog,
    expected_items: &[&str],
    error_message: &str,
    check_in_saved_game: bool,
) -> Check {
    let bag = if check_in_saved_game {
        live.saved_item_bag().unwrap_or_default()
    } else {
        live.item_bag()
    };

    let total: u32 = expected_items
        .iter()
        .filter_map(|name| {
            let item = catalog.item_by_name(name);
            if item.is_none() {
                tracing::warn!("Item '{}' is not in the catalog", name);
            }
            item
        })
        .map(|item| bag.quantity_of(&item))
        .sum();
    ensure(total > 0, error_message)
}
