//! End-to-end level scenarios driven through `World::step`.

use arcade_core::game_trait::GameEvent;
use arcade_core::input::{Action, ActionSet, ActionState, ActionTracker};
use arcade_core::test_helpers::{holding, pressing};
use arcade_platformer::config::PlatformerConfig;
use arcade_platformer::level::Level;
use arcade_platformer::world::World;
use glam::{IVec2, Vec2};

const DT: f32 = 1.0 / 60.0;

fn world(rows: &[&str]) -> World {
    World::new(Level::parse(rows), &PlatformerConfig::default())
}

fn idle() -> ActionState {
    ActionState::default()
}

#[test]
fn idle_player_settles_on_floor() {
    let mut w = world(&["....", "..@.", "....", "XXXX"]);
    for _ in 0..120 {
        w.step(DT, &idle());
    }
    let p = w.player();
    assert_eq!(p.rect.bottom(), 3 * 48);
    assert_eq!(p.vel, Vec2::ZERO);
    assert!(p.on_ground);

    let rest = p.rect;
    for _ in 0..120 {
        w.step(DT, &idle());
        assert_eq!(w.player().rect, rest);
        assert_eq!(w.player().vel.y, 0.0);
    }
}

#[test]
fn early_press_jumps_on_landing() {
    let mut w = world(&["@...", "....", "....", "XXXX"]);
    // fall until a few frames from touching down
    while w.player().rect.bottom() < 3 * 48 - 14 {
        w.step(DT, &idle());
    }
    assert!(!w.player().on_ground);
    w.step(DT, &pressing(&[Action::Jump]));
    let mut launched = false;
    for _ in 0..8 {
        w.step(DT, &holding(&[Action::Jump]));
        if w.player().vel.y < -300.0 {
            launched = true;
            break;
        }
    }
    assert!(launched, "buffered jump should fire after landing");
}

#[test]
fn late_press_after_ledge_still_jumps() {
    let mut w = world(&["@.....", "XX....", "......", "......"]);
    for _ in 0..30 {
        w.step(DT, &idle());
    }
    let right = holding(&[Action::MoveRight]);
    while w.player().on_ground {
        w.step(DT, &right);
    }
    // a few frames after walking off the edge is still inside the grace window
    w.step(DT, &right);
    w.step(DT, &right);
    let state = ActionState {
        held: ActionSet::EMPTY.with(Action::MoveRight).with(Action::Jump),
        pressed: ActionSet::EMPTY.with(Action::Jump),
        released: ActionSet::EMPTY,
    };
    w.step(DT, &state);
    assert!(w.player().vel.y < -300.0);
}

#[test]
fn each_coin_counts_once() {
    let mut w = world(&["@.c.c.c...", "XXXXXXXXXX"]);
    let mut tracker = ActionTracker::new();
    let right = ActionSet::EMPTY.with(Action::MoveRight);
    let left = ActionSet::EMPTY.with(Action::MoveLeft);

    // run over the coins, back, and over them again
    let mut score_events = 0;
    for held in std::iter::repeat_n(right, 120)
        .chain(std::iter::repeat_n(left, 120))
        .chain(std::iter::repeat_n(right, 120))
    {
        let state = tracker.advance(held);
        score_events += w
            .step(DT, &state)
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ScoreUpdate { .. }))
            .count();
    }
    assert_eq!(w.player().coins, 3);
    assert_eq!(score_events, 3);
    assert_eq!(w.coins_left(), 0);
}

#[test]
fn platform_carries_standing_player() {
    let mut w = world(&["@.........", "..........", "....=....."]);
    {
        let p = w.player_mut();
        p.rect.x = 4 * 48 + 8;
        p.rect.set_bottom(2 * 48);
    }
    for _ in 0..90 {
        let before = w.player().rect.x;
        w.step(DT, &idle());
        let delta = w.view().platforms[0].delta();
        assert_eq!(w.player().rect.x - before, delta.x);
        assert_eq!(w.player().rect.bottom(), w.view().platforms[0].rect().top());
    }
}

#[test]
fn spike_resets_to_spawn_and_keeps_coins() {
    let mut w = world(&[
        "............",
        "............",
        "@...c....^..",
        "XXXXXXXXXXXX",
    ]);
    let spawn = IVec2::new(0, 2 * 48 - 12);
    let right = holding(&[Action::MoveRight]);
    let mut died = false;
    for _ in 0..240 {
        let r = w.step(DT, &right);
        if r.events.contains(&GameEvent::PlayerDied) {
            died = true;
            assert_eq!(w.player().rect.position(), spawn);
            assert_eq!(w.player().vel, Vec2::ZERO);
            assert_eq!(w.player().coins, 1);
            break;
        }
    }
    assert!(died, "walking right must hit the spike");
}

#[test]
fn checkpoint_becomes_respawn_point() {
    let mut w = world(&[
        "..............",
        "@....!....^...",
        "XXXXXXXXXXXXXX",
    ]);
    let right = holding(&[Action::MoveRight]);
    let mut checkpoint_events = 0;
    let mut respawned_at = None;
    for _ in 0..300 {
        let r = w.step(DT, &right);
        checkpoint_events += r
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CheckpointReached))
            .count();
        if r.events.contains(&GameEvent::PlayerDied) {
            respawned_at = Some(w.player().rect.position());
            break;
        }
    }
    assert_eq!(checkpoint_events, 1);
    assert_eq!(respawned_at, Some(IVec2::new(5 * 48, 48 - 42 - 6)));
}

#[test]
fn enemy_patrol_is_deadly() {
    let mut w = world(&["X.........X", "X@.....E..X", "XXXXXXXXXXX"]);
    let mut died = false;
    for _ in 0..600 {
        if w.step(DT, &idle()).events.contains(&GameEvent::PlayerDied) {
            died = true;
            break;
        }
    }
    assert!(died, "the patrolling enemy must eventually reach the idle player");
}

#[test]
fn goal_wins_exactly_once() {
    let mut w = world(&["@.....G", "XXXXXXX"]);
    let right = holding(&[Action::MoveRight]);
    let mut wins = 0;
    for _ in 0..240 {
        wins += usize::from(w.step(DT, &right).win);
    }
    assert_eq!(wins, 1);
    assert!(w.is_won());
}

#[test]
fn walking_over_rising_lifts_never_pushes_back() {
    let mut w = world(&["@.........", "..........", "||||||||.."]);
    {
        let p = w.player_mut();
        p.rect.x = 8;
        p.rect.set_bottom(2 * 48);
    }
    for _ in 0..400 {
        w.step(DT, &idle());
        if w.view().platforms[0].delta().y < 0 {
            break;
        }
    }
    for _ in 0..60 {
        w.step(DT, &idle());
    }
    assert!(w.view().platforms[0].delta().y < 0, "lifts are rising");
    assert_eq!(w.player().rect.bottom(), w.view().platforms[0].rect().top());

    let start = w.player().rect.x;
    let right = holding(&[Action::MoveRight]);
    for frame in 0..30 {
        let before = w.player().rect.x;
        w.step(DT, &right);
        let p = w.player();
        assert!(p.rect.x >= before, "frame {frame}: x went {before} -> {}", p.rect.x);
        assert!(p.on_ground, "frame {frame}: fell off");
        assert_eq!(p.rect.bottom(), w.view().platforms[0].rect().top());
    }
    assert!(w.player().rect.x > start + 40);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn held_from(bits: u8) -> ActionSet {
        let mut held = ActionSet::EMPTY;
        if bits & 1 != 0 {
            held.insert(Action::MoveLeft);
        }
        if bits & 2 != 0 {
            held.insert(Action::MoveRight);
        }
        if bits & 4 != 0 {
            held.insert(Action::Jump);
        }
        held
    }

    proptest! {
        #[test]
        fn coins_are_never_double_counted(inputs in proptest::collection::vec(0u8..8, 30..300)) {
            let mut w = world(&["..........", "@.c.c.c.c.", "XXXXXXXXXX"]);
            let total = w.coins_left();
            let mut tracker = ActionTracker::new();
            let mut last = 0;
            for bits in inputs {
                let state = tracker.advance(held_from(bits));
                for event in w.step(DT, &state).events {
                    if let GameEvent::ScoreUpdate { score } = event {
                        prop_assert!(score > last, "score went {} -> {}", last, score);
                        last = score;
                    }
                }
                let coins = w.player().coins as usize;
                prop_assert!(coins <= total);
                prop_assert_eq!(coins + w.coins_left(), total);
            }
        }
    }
}
