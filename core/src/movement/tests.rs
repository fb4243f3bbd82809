use autoplay_shared::{Button, Coords, Direction, GameVersion, MapId};

use super::*;
use crate::backend::Emulator;
use crate::test_utils::{Blocked, FakeCatalog, FakeEmulator, OpenField, test_context};

const MAP: MapId = MapId::new(24, 6);

/// Drives a routine the way the scheduler does: advance, then resume.
/// Returns the frame it finished on, or `None` if it was still running.
fn drive(
    routine: &mut dyn Routine,
    emulator: &mut FakeEmulator,
    paths: &dyn PathFinder,
    max_frames: u64,
) -> Result<Option<u64>, ModeError> {
    let ctx = test_context(GameVersion::Emerald);
    let catalog = FakeCatalog::standard();
    for _ in 0..max_frames {
        emulator.advance_frame().unwrap();
        let step = {
            let env = StepContext {
                game: &*emulator,
                ctx: &ctx,
                catalog: &catalog,
                paths,
            };
            routine.step(&env)?
        };
        match step {
            Step::Suspend => {}
            Step::Press(button) => emulator.press_button(button).unwrap(),
            Step::Done => return Ok(Some(emulator.frame)),
        }
    }
    Ok(None)
}

fn emulator_at(x: i16, y: i16, facing: Direction) -> FakeEmulator {
    let mut emulator = FakeEmulator::new(MAP, Coords::new(x, y));
    emulator.avatar.facing = facing;
    emulator
}

// ============================================================================
// Walking
// ============================================================================

#[test]
fn test_walk_turns_then_moves() {
    let mut emulator = emulator_at(5, 5, Direction::Down);
    let mut walk = WalkOneTile::new(Direction::Right);

    let finished = drive(&mut walk, &mut emulator, &OpenField, 10).unwrap();

    assert_eq!(finished, Some(3));
    assert_eq!(emulator.avatar.local_coordinates, Coords::new(6, 5));
    assert_eq!(emulator.avatar.facing, Direction::Right);
    assert_eq!(emulator.presses_of(Button::Right), 2);
}

#[test]
fn test_walk_already_facing_takes_one_press() {
    let mut emulator = emulator_at(5, 5, Direction::Up);
    let mut walk = WalkOneTile::new(Direction::Up);

    drive(&mut walk, &mut emulator, &OpenField, 10).unwrap();

    assert_eq!(emulator.avatar.local_coordinates, Coords::new(5, 4));
    assert_eq!(emulator.presses_of(Button::Up), 1);
}

#[test]
fn test_walk_into_wall_never_finishes() {
    let mut emulator = emulator_at(5, 5, Direction::Left);
    emulator.walls.insert(Coords::new(4, 5));
    let mut walk = WalkOneTile::new(Direction::Left);

    let finished = drive(&mut walk, &mut emulator, &OpenField, 50).unwrap();

    assert_eq!(finished, None);
    assert_eq!(emulator.presses_of(Button::Left), 50);
}

#[test]
fn test_walk_waits_for_movement_to_settle() {
    let mut emulator = emulator_at(5, 5, Direction::Up);
    emulator.player_flags.insert(ObjectFlags::SINGLE_MOVEMENT_ACTIVE);
    let mut walk = WalkOneTile::new(Direction::Up);

    assert_eq!(drive(&mut walk, &mut emulator, &OpenField, 10).unwrap(), None);
    assert_eq!(emulator.avatar.local_coordinates, Coords::new(5, 4));

    emulator.player_flags.remove(ObjectFlags::SINGLE_MOVEMENT_ACTIVE);
    assert!(drive(&mut walk, &mut emulator, &OpenField, 1).unwrap().is_some());
    assert_eq!(emulator.presses_of(Button::Up), 1);
}

#[test]
fn test_walk_off_map_counts_as_arrival() {
    let mut emulator = emulator_at(5, 5, Direction::Down);
    let mut walk = WalkOneTile::new(Direction::Down);
    assert_eq!(drive(&mut walk, &mut emulator, &OpenField, 1).unwrap(), None);

    emulator.avatar.map = MapId::new(0, 9);
    emulator.avatar.local_coordinates = Coords::new(1, 1);

    assert!(drive(&mut walk, &mut emulator, &OpenField, 1).unwrap().is_some());
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_follow_path_reaches_every_waypoint() {
    let mut emulator = emulator_at(0, 0, Direction::Right);
    let mut path = FollowPath::new([Coords::new(2, 0), Coords::new(2, 2), Coords::new(0, 2)]);

    let finished = drive(&mut path, &mut emulator, &OpenField, 50).unwrap();

    assert!(finished.is_some());
    assert_eq!(emulator.avatar.local_coordinates, Coords::new(0, 2));
    assert!(path.remaining().is_empty());
}

#[test]
fn test_follow_path_skips_current_tile() {
    let mut emulator = emulator_at(0, 0, Direction::Right);
    let mut path = FollowPath::new([Coords::new(0, 0), Coords::new(1, 0)]);

    drive(&mut path, &mut emulator, &OpenField, 10).unwrap();

    assert_eq!(emulator.avatar.local_coordinates, Coords::new(1, 0));
    assert_eq!(emulator.presses_of(Button::Right), 1);
}

#[test]
fn test_follow_path_moves_horizontally_first() {
    let mut emulator = emulator_at(0, 0, Direction::Right);
    let mut path = FollowPath::new([Coords::new(2, 2)]);

    drive(&mut path, &mut emulator, &OpenField, 50).unwrap();

    let buttons: Vec<Button> = emulator.pressed.iter().map(|(_, b)| *b).collect();
    let last_right = buttons.iter().rposition(|b| *b == Button::Right).unwrap();
    let first_down = buttons.iter().position(|b| *b == Button::Down).unwrap();
    assert!(last_right < first_down);
    assert_eq!(emulator.avatar.local_coordinates, Coords::new(2, 2));
}

#[test]
fn test_follow_path_stops_when_map_changes() {
    let mut emulator = emulator_at(0, 0, Direction::Right);
    let mut path = FollowPath::new([Coords::new(5, 0)]);
    assert_eq!(drive(&mut path, &mut emulator, &OpenField, 2).unwrap(), None);

    emulator.avatar.map = MapId::new(0, 9);

    assert!(drive(&mut path, &mut emulator, &OpenField, 1).unwrap().is_some());
}

#[test]
fn test_navigate_to_uses_path_finder() {
    let mut emulator = emulator_at(3, 3, Direction::Down);
    let mut navigate = NavigateTo::new(Coords::new(6, 1));

    let finished = drive(&mut navigate, &mut emulator, &OpenField, 50).unwrap();

    assert!(finished.is_some());
    assert_eq!(emulator.avatar.local_coordinates, Coords::new(6, 1));
}

#[test]
fn test_navigate_to_current_tile_finishes_at_once() {
    let mut emulator = emulator_at(3, 3, Direction::Down);
    let mut navigate = NavigateTo::new(Coords::new(3, 3));

    assert_eq!(drive(&mut navigate, &mut emulator, &OpenField, 5).unwrap(), Some(1));
    assert!(emulator.pressed.is_empty());
}

#[test]
fn test_navigate_without_path_is_precondition_failure() {
    let mut emulator = emulator_at(3, 3, Direction::Down);
    let mut navigate = NavigateTo::new(Coords::new(9, 9));

    let err = drive(&mut navigate, &mut emulator, &Blocked, 5).unwrap_err();

    assert!(err.message().contains("Cannot find a path"));
    assert!(emulator.pressed.is_empty());
}

// ============================================================================
// Waiting
// ============================================================================

#[test]
fn test_wait_for_script_start_and_finish() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    emulator.scripts.push(("EventScript_Legend".to_string(), 3, 6));
    let mut wait = wait_for_script_to_start_and_finish("EventScript_Legend", Some(Button::B));

    let finished = drive(&mut wait, &mut emulator, &OpenField, 20).unwrap();

    assert_eq!(finished, Some(6));
    assert_eq!(emulator.presses_of(Button::B), 5);
}

#[test]
fn test_wait_for_script_missed_start_keeps_waiting() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    emulator.scripts.push(("EventScript_Legend".to_string(), 0, 1));
    let mut wait = wait_for_script_to_start_and_finish("EventScript_Legend", None);

    assert_eq!(drive(&mut wait, &mut emulator, &OpenField, 20).unwrap(), None);
}

#[test]
fn test_wait_for_task_without_button_presses_nothing() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    emulator.tasks.push(("Task_Fade".to_string(), 2, 4));
    let mut wait = wait_for_task_to_start_and_finish("Task_Fade", None);

    assert_eq!(drive(&mut wait, &mut emulator, &OpenField, 20).unwrap(), Some(4));
    assert!(emulator.pressed.is_empty());
}

#[test]
fn test_wait_ignores_other_scripts() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    emulator.scripts.push(("Other".to_string(), 1, 3));
    let mut wait = wait_for_script_to_start_and_finish("EventScript_Legend", None);

    assert_eq!(drive(&mut wait, &mut emulator, &OpenField, 10).unwrap(), None);
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn test_sequence_runs_children_back_to_back() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    let mut sequence = Sequence::new().then(press(Button::A)).then(press(Button::B));

    let finished = drive(&mut sequence, &mut emulator, &OpenField, 10).unwrap();

    assert_eq!(finished, Some(3));
    assert_eq!(emulator.pressed, vec![(1, Button::A), (2, Button::B)]);
}

#[test]
fn test_empty_sequence_is_done() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    let mut sequence = Sequence::new();
    assert!(sequence.is_empty());

    assert_eq!(drive(&mut sequence, &mut emulator, &OpenField, 3).unwrap(), Some(1));
}

#[test]
fn test_sequence_propagates_failure() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    let mut sequence: Sequence = [press(Button::A), navigate_to(4, 4), press(Button::B)]
        .into_iter()
        .collect();

    assert!(drive(&mut sequence, &mut emulator, &Blocked, 10).is_err());
    assert_eq!(emulator.presses_of(Button::B), 0);
}

#[test]
fn test_repeat_reruns_body() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    let mut repeat = Repeat::new(|| press(Button::A));

    assert_eq!(drive(&mut repeat, &mut emulator, &OpenField, 4).unwrap(), None);

    assert_eq!(emulator.presses_of(Button::A), 4);
    assert_eq!(repeat.passes(), 3);
}

#[test]
fn test_repeat_of_empty_body_still_yields() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    let mut repeat = Repeat::new(|| Box::new(Sequence::new()));

    assert_eq!(drive(&mut repeat, &mut emulator, &OpenField, 5).unwrap(), None);

    assert_eq!(repeat.passes(), 5);
    assert_eq!(emulator.frame, 5);
}

#[test]
fn test_clear_interactions_presses_a_until_npc_leaves() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    emulator.npcs.push(Coords::new(0, 1));
    emulator.npc_leaves_at = Some(4);
    let mut clear = clear_interactions();

    assert_eq!(drive(&mut clear, &mut emulator, &OpenField, 10).unwrap(), Some(4));
    assert_eq!(emulator.presses_of(Button::A), 3);
}

#[test]
fn test_press_until_already_true_presses_nothing() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    let mut clear = PressUntil::new(Button::B, |_| true);

    assert_eq!(drive(&mut clear, &mut emulator, &OpenField, 10).unwrap(), Some(1));
    assert!(emulator.pressed.is_empty());
}

#[test]
fn test_await_control_presses_b_until_held_movement() {
    let mut emulator = emulator_at(0, 0, Direction::Down);
    emulator.control_returns_at = Some(3);
    emulator.player_flags.remove(ObjectFlags::HELD_MOVEMENT_ACTIVE);
    let mut control = await_control();

    assert_eq!(drive(&mut control, &mut emulator, &OpenField, 10).unwrap(), Some(3));
    assert_eq!(emulator.presses_of(Button::B), 2);
}
