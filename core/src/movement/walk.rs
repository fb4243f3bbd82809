use autoplay_shared::{Coords, Direction, MapId};

use super::{Routine, Step, StepContext, player_settled};
use crate::error::ModeError;

/// Steps one tile in a direction.
///
/// The target tile is fixed on the first step. Holding the direction first
/// turns the avatar if it faces elsewhere, then moves it. Leaving the map
/// (a warp tile, a door) counts as arrival.
pub struct WalkOneTile {
    direction: Direction,
    target: Option<(MapId, Coords)>,
}

impl WalkOneTile {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            target: None,
        }
    }
}

impl Routine for WalkOneTile {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        let avatar = env.game.player_avatar();
        let direction = self.direction;
        let (map, tile) = *self
            .target
            .get_or_insert_with(|| (avatar.map, direction.step(avatar.local_coordinates)));

        let arrived = avatar.map != map || avatar.local_coordinates == tile;
        if !arrived {
            return Ok(Step::Press(direction.into()));
        }
        if player_settled(env.game) {
            Ok(Step::Done)
        } else {
            Ok(Step::Suspend)
        }
    }
}
