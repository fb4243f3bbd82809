//! Static Run Away
//!
//! Walks up to a stationary legendary, starts the encounter, runs from it
//! and repeats until a shiny appears. Each supported location is one table
//! entry holding the path that re-triggers the encounter.

use std::sync::LazyLock;

use autoplay_shared::{Button, Direction, MapFamily, MapId, maps};
use hashbrown::HashMap;

use crate::backend::{BattleAction, Creature, LiveState};
use crate::context::GameContext;
use crate::error::ModeError;
use crate::modes::Mode;
use crate::movement::{
    Repeat, Routine, Sequence, Step, StepContext, await_control, clear_interactions, follow_path,
    navigate_to, press, wait_for_script_to_start_and_finish, wait_for_task_to_start_and_finish,
    walk_one_tile,
};

const LEGENDARY_FLEW_AWAY_SCRIPT: &str = "Common_EventScript_LegendaryFlewAway";
const FADE_TASK: &str = "Task_WaitForFadeAndEnableScriptCtx";

/// Instruction handed to the battle subsystem for a shiny opponent.
pub const MANUAL_CONTROL: &str = "manual";

struct Encounter {
    pokemon_name: &'static str,
    completion_flag: &'static str,
    path: fn() -> Sequence,
}

static ENCOUNTERS: LazyLock<HashMap<(MapFamily, MapId), Encounter>> = LazyLock::new(|| {
    use maps::{hoenn, kanto};

    #[rustfmt::skip]
    let entries: [(MapFamily, MapId, &str, &str, fn() -> Sequence); 12] = [
        (MapFamily::Hoenn, hoenn::NAVEL_ROCK_BOTTOM, "Lugia", "CAUGHT_LUGIA", navel_rock_bottom),
        (MapFamily::Kanto, kanto::NAVEL_ROCK_BASE, "Lugia", "CAUGHT_LUGIA", navel_rock_base),
        (MapFamily::Hoenn, hoenn::NAVEL_ROCK_TOP, "Ho-Oh", "CAUGHT_HO_OH", navel_rock_top),
        (MapFamily::Kanto, kanto::NAVEL_ROCK_SUMMIT, "Ho-Oh", "CAUGHT_HO_OH", navel_rock_summit),
        (MapFamily::Hoenn, hoenn::ISLAND_CAVE, "Regice", "DEFEATED_REGICE", regi_chamber),
        (MapFamily::Hoenn, hoenn::ANCIENT_TOMB, "Registeel", "DEFEATED_REGISTEEL", regi_chamber),
        (MapFamily::Hoenn, hoenn::DESERT_RUINS, "Regirock", "DEFEATED_REGIROCK", regi_chamber),
        (MapFamily::Hoenn, hoenn::SOUTHERN_ISLAND_INTERIOR, "Lati@s", "DEFEATED_LATIAS_OR_LATIOS", southern_island),
        (MapFamily::Hoenn, hoenn::MARINE_CAVE_END, "Kyogre", "DEFEATED_KYOGRE", marine_cave),
        (MapFamily::Hoenn, hoenn::TERRA_CAVE_END, "Groudon", "DEFEATED_GROUDON", terra_cave),
        (MapFamily::Hoenn, hoenn::SKY_PILLAR_TOP, "Rayquaza", "DEFEATED_RAYQUAZA", sky_pillar),
        (MapFamily::Hoenn, hoenn::FARAWAY_ISLAND_ENTRANCE, "Mew", "DEFEATED_MEW", faraway_island),
    ];

    entries
        .into_iter()
        .map(|(family, map, pokemon_name, completion_flag, path)| {
            let encounter = Encounter {
                pokemon_name,
                completion_flag,
                path,
            };
            ((family, map), encounter)
        })
        .collect()
});

fn encounter_at(ctx: &GameContext, map: MapId) -> Option<&'static Encounter> {
    ENCOUNTERS.get(&(ctx.version.map_family(), map))
}

// ============================================================================
// Paths
// ============================================================================

/// Step back and forth on a trigger tile, then walk up to the legendary.
fn pace_then_approach(start: (i16, i16), pace: &[Direction], approach: (i16, i16)) -> Sequence {
    let mut path = Sequence::new().then(navigate_to(start.0, start.1));
    for &direction in pace {
        path = path.then(walk_one_tile(direction));
    }
    path.then(navigate_to(approach.0, approach.1))
}

const RIGHT_LEFT_RIGHT: &[Direction] = &[Direction::Right, Direction::Left, Direction::Right];
const DOWN_UP: &[Direction] = &[Direction::Down, Direction::Up];

fn navel_rock_bottom() -> Sequence {
    pace_then_approach((13, 19), RIGHT_LEFT_RIGHT, (11, 14))
}

fn navel_rock_base() -> Sequence {
    pace_then_approach((12, 20), RIGHT_LEFT_RIGHT, (10, 16))
}

fn navel_rock_top() -> Sequence {
    pace_then_approach((12, 20), RIGHT_LEFT_RIGHT, (12, 10))
}

fn navel_rock_summit() -> Sequence {
    pace_then_approach((9, 18), RIGHT_LEFT_RIGHT, (9, 12))
}

fn regi_chamber() -> Sequence {
    pace_then_approach((8, 11), DOWN_UP, (8, 8))
}

fn southern_island() -> Sequence {
    pace_then_approach((13, 18), DOWN_UP, (13, 12))
        .then(press(Button::A))
        .then(wait_for_script_to_start_and_finish(LEGENDARY_FLEW_AWAY_SCRIPT, Some(Button::B)))
}

fn marine_cave() -> Sequence {
    pace_then_approach((20, 4), DOWN_UP, (9, 26))
}

fn terra_cave() -> Sequence {
    pace_then_approach((5, 4), DOWN_UP, (17, 26))
}

fn sky_pillar() -> Sequence {
    pace_then_approach((16, 15), &[Direction::Up, Direction::Up], (14, 7))
}

fn faraway_island() -> Sequence {
    Sequence::new()
        .then(walk_one_tile(Direction::Up))
        .then(follow_path([(12, 16), (16, 16), (16, 13)]))
        .then(press(Button::A))
        .then(wait_for_task_to_start_and_finish(FADE_TASK, Some(Button::B)))
        .then(wait_for_script_to_start_and_finish(LEGENDARY_FLEW_AWAY_SCRIPT, Some(Button::B)))
        .then(walk_one_tile(Direction::Down))
        .then(follow_path([(16, 16), (12, 16), (12, 19)]))
        .then(walk_one_tile(Direction::Down))
}

/// One encounter cycle: walk the path, then get the player back in control.
fn cycle(path: fn() -> Sequence) -> Box<dyn Routine> {
    Box::new(path().then(clear_interactions()).then(await_control()))
}

// ============================================================================
// Mode
// ============================================================================

#[derive(Default)]
pub struct StaticRunAway {
    body: Option<Repeat>,
}

impl StaticRunAway {
    fn start(env: &StepContext<'_>) -> Result<Repeat, ModeError> {
        let map = env.game.player_avatar().map;
        let encounter = encounter_at(env.ctx, map)
            .ok_or_else(|| ModeError::precondition("You are not on the right map."))?;

        if env.game.event_flag(encounter.completion_flag) {
            return Err(ModeError::precondition(format!(
                "{} has already been caught.",
                encounter.pokemon_name
            )));
        }

        tracing::info!(
            "Resetting {} on map {} until a shiny appears",
            encounter.pokemon_name,
            map
        );
        let path = encounter.path;
        Ok(Repeat::new(move || cycle(path)))
    }
}

impl Routine for StaticRunAway {
    fn step(&mut self, env: &StepContext<'_>) -> Result<Step, ModeError> {
        if self.body.is_none() {
            self.body = Some(Self::start(env)?);
        }
        match self.body.as_mut() {
            Some(body) => body.step(env),
            None => Ok(Step::Done),
        }
    }
}

impl Mode for StaticRunAway {
    fn name(&self) -> &'static str {
        "Static Run Away"
    }

    fn is_selectable(ctx: &GameContext, live: &dyn LiveState) -> bool {
        encounter_at(ctx, live.player_avatar().map).is_some()
    }

    fn on_battle_started(&mut self, _ctx: &GameContext, opponent: &Creature) -> Option<BattleAction> {
        if opponent.is_shiny {
            tracing::info!("Shiny {} found, handing over", opponent.species_name);
            Some(BattleAction::Custom(MANUAL_CONTROL.to_string()))
        } else {
            tracing::debug!("Running from {}", opponent.species_name);
            Some(BattleAction::RunAway)
        }
    }
}
