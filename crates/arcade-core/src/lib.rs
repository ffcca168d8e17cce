pub mod game_registry;
pub mod game_trait;
pub mod input;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{ArcadeGame, GameEvent};
    use crate::input::{Action, ActionSet, ActionState, ActionTracker};

    /// Held set from a list of actions.
    pub fn held(actions: &[Action]) -> ActionSet {
        actions.iter().copied().collect()
    }

    /// Frame state with `actions` held and nothing changing this frame.
    pub fn holding(actions: &[Action]) -> ActionState {
        ActionState {
            held: held(actions),
            ..Default::default()
        }
    }

    /// Frame state where `actions` were just pressed (and are held).
    pub fn pressing(actions: &[Action]) -> ActionState {
        let set = held(actions);
        ActionState {
            held: set,
            pressed: set,
            released: ActionSet::EMPTY,
        }
    }

    /// Frame state where `actions` were just released.
    pub fn releasing(actions: &[Action]) -> ActionState {
        ActionState {
            held: ActionSet::EMPTY,
            pressed: ActionSet::EMPTY,
            released: held(actions),
        }
    }

    /// Feed held samples through a fresh tracker into the game, one per frame,
    /// returning all accumulated events.
    pub fn run_frames(
        game: &mut dyn ArcadeGame,
        frames: impl IntoIterator<Item = ActionSet>,
        dt: f32,
    ) -> Vec<GameEvent> {
        let mut tracker = ActionTracker::new();
        let mut all_events = Vec::new();
        for held in frames {
            let state = tracker.advance(held);
            all_events.extend(game.update(dt, &state));
        }
        all_events
    }

    /// Run `n` frames with nothing held.
    pub fn run_idle(game: &mut dyn ArcadeGame, n: usize, dt: f32) -> Vec<GameEvent> {
        run_frames(game, std::iter::repeat_n(ActionSet::EMPTY, n), dt)
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every ArcadeGame implementation must pass. Game crates
    // call them from their own tests with a concrete game instance.

    /// pause() must freeze updates, resume() must unfreeze them.
    pub fn contract_pause_stops_updates(game: &mut dyn ArcadeGame, moving: ActionSet) {
        game.pause();
        assert!(game.is_paused(), "is_paused must be true after pause()");
        let score = game.score();
        let events = run_frames(game, std::iter::repeat_n(moving, 30), 1.0 / 60.0);
        assert!(events.is_empty(), "no events may be emitted while paused");
        assert_eq!(score, game.score(), "score must not change while paused");

        game.resume();
        assert!(!game.is_paused(), "is_paused must be false after resume()");
    }

    /// Every ScoreUpdate must report the score the game exposes afterwards,
    /// and scores never decrease.
    pub fn contract_score_updates_are_monotonic(game: &mut dyn ArcadeGame, frames: &[ActionSet]) {
        let events = run_frames(game, frames.iter().copied(), 1.0 / 60.0);
        let mut last = 0;
        for event in &events {
            if let GameEvent::ScoreUpdate { score } = event {
                assert!(*score >= last, "score went backwards: {last} -> {score}");
                last = *score;
            }
        }
        if last > 0 {
            assert_eq!(last, game.score(), "last ScoreUpdate must match score()");
        }
    }

    /// Once complete, LevelComplete has been reported exactly once and further
    /// updates emit nothing.
    pub fn contract_completion_reported_once(
        game: &mut dyn ArcadeGame,
        frames: impl IntoIterator<Item = ActionSet>,
    ) {
        let mut events = run_frames(game, frames, 1.0 / 60.0);
        assert!(game.is_complete(), "game must be complete after the scripted run");
        events.extend(run_idle(game, 30, 1.0 / 60.0));
        let completions = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete))
            .count();
        assert_eq!(completions, 1, "LevelComplete must be reported exactly once");
        assert!(
            run_idle(game, 5, 1.0 / 60.0).is_empty(),
            "a completed game must not emit events"
        );
    }
}
