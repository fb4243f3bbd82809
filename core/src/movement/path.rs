use autoplay_shared::{Coords, Direction, MapId};
use smallvec::SmallVec;

use super::{Routine, Step, StepContext, player_settled};
use crate::error::ModeError;

type Waypoints = SmallVec<[Coords; 8]>;

/// Walks through a list of waypoints on the current map.
///
/// Each waypoint is approached horizontally first, then vertically. A
/// waypoint the avatar already stands on is skipped. The routine ends early
/// if the avatar leaves the map it started on.
pub struct FollowPath {
    waypoints: Waypoints,
    next: usize,
    map: Option<MapId>,
}

impl FollowPath {
    pub fn new(waypoints: impl IntoIterator<Item = Coords>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
            next: 0,
            map: None,
        }
    }

    pub fn remaining(&self) -> &[Coords] {
        &self.waypoints[self.next..]
    }
}

impl Routine for FollowPath {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        let avatar = env.game.player_avatar();
        let map = *self.map.get_or_insert(avatar.map);
        if avatar.map != map {
            tracing::debug!("Left map {} while following a path, stopping", map);
            return Ok(Step::Done);
        }

        while self.waypoints.get(self.next) == Some(&avatar.local_coordinates) {
            self.next += 1;
        }

        match self.waypoints.get(self.next) {
            Some(&waypoint) => match Direction::towards(avatar.local_coordinates, waypoint) {
                Some(direction) => Ok(Step::Press(direction.into())),
                None => Ok(Step::Suspend),
            },
            None if player_settled(env.game) => Ok(Step::Done),
            None => Ok(Step::Suspend),
        }
    }
}

/// Walks to a tile on the current map using the external path finder.
///
/// The path is computed once, from wherever the avatar stands on the first
/// step. Having no path at all is a precondition failure.
pub struct NavigateTo {
    target: Coords,
    path: Option<FollowPath>,
}

impl NavigateTo {
    pub fn new(target: Coords) -> Self {
        Self { target, path: None }
    }
}

impl Routine for NavigateTo {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        if self.path.is_none() {
            let avatar = env.game.player_avatar();
            let waypoints = env
                .paths
                .find_path(avatar.map, avatar.local_coordinates, self.target)
                .ok_or_else(|| {
                    ModeError::precondition(format!(
                        "Cannot find a path from {} to {} on map {}.",
                        avatar.local_coordinates, self.target, avatar.map
                    ))
                })?;
            tracing::debug!(
                "Navigating to {} via {} waypoint(s)",
                self.target,
                waypoints.len()
            );
            self.path = Some(FollowPath::new(waypoints));
        }

        match self.path.as_mut() {
            Some(path) => path.step(env),
            None => Ok(Step::Done),
        }
    }
}
