use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Logical actions shared by every arcade game and the launcher.
///
/// Devices (keyboard, gamepad) are mapped onto these by the client; games
/// never see raw keys or buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Back,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Back,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::MoveLeft => "LEFT",
            Action::MoveRight => "RIGHT",
            Action::Jump => "JUMP",
            Action::Back => "BACK",
        }
    }
}

/// Compact set of actions, used for one frame's held sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const EMPTY: ActionSet = ActionSet(0);

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    /// Builder-style insert.
    pub fn with(mut self, action: Action) -> Self {
        self.insert(action);
        self
    }

    pub fn union(self, other: ActionSet) -> Self {
        ActionSet(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    fn difference(self, other: ActionSet) -> Self {
        ActionSet(self.0 & !other.0)
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}

/// Input snapshot for a single frame.
///
/// `held` is level-triggered; `pressed` and `released` are edges relative to
/// the previous frame's held sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    pub held: ActionSet,
    pub pressed: ActionSet,
    pub released: ActionSet,
}

impl ActionState {
    pub fn held(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.pressed.contains(action)
    }

    pub fn released(&self, action: Action) -> bool {
        self.released.contains(action)
    }
}

/// Derives per-frame edges from successive held samples.
#[derive(Debug, Clone, Default)]
pub struct ActionTracker {
    previous: ActionSet,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's held sample and get the full frame state.
    pub fn advance(&mut self, held: ActionSet) -> ActionState {
        let state = ActionState {
            held,
            pressed: held.difference(self.previous),
            released: self.previous.difference(held),
        };
        for action in state.pressed.iter() {
            tracing::debug!("ACTION {} PRESSED", action.name());
        }
        for action in state.released.iter() {
            tracing::debug!("ACTION {} RELEASED", action.name());
        }
        self.previous = held;
        state
    }

    /// Forget the previous sample, e.g. after the input device was re-created.
    pub fn reset(&mut self) {
        self.previous = ActionSet::EMPTY;
    }
}

/// A device-independent producer of held action samples.
///
/// Implementations must degrade to "nothing held" when their device is
/// missing instead of failing.
pub trait InputSource {
    fn poll(&mut self) -> ActionSet;
}

/// Input source for when no device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> ActionSet {
        ActionSet::EMPTY
    }
}

/// Replays a fixed sequence of held samples, then reports nothing held.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    frames: VecDeque<ActionSet>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = ActionSet>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Append `count` frames holding `held`.
    pub fn hold(mut self, held: ActionSet, count: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(held, count));
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> ActionSet {
        self.frames.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edge_fires_once() {
        let mut tracker = ActionTracker::new();
        let jump = ActionSet::EMPTY.with(Action::Jump);

        let first = tracker.advance(jump);
        assert!(first.pressed(Action::Jump));
        assert!(first.held(Action::Jump));

        let second = tracker.advance(jump);
        assert!(!second.pressed(Action::Jump));
        assert!(second.held(Action::Jump));
    }

    #[test]
    fn release_edge_fires_after_press() {
        let mut tracker = ActionTracker::new();
        tracker.advance(ActionSet::EMPTY.with(Action::Jump));
        let state = tracker.advance(ActionSet::EMPTY);
        assert!(state.released(Action::Jump));
        assert!(!state.held(Action::Jump));
        assert!(!state.pressed(Action::Jump));
    }

    #[test]
    fn reset_makes_held_action_press_again() {
        let mut tracker = ActionTracker::new();
        let back = ActionSet::EMPTY.with(Action::Back);
        tracker.advance(back);
        tracker.reset();
        assert!(tracker.advance(back).pressed(Action::Back));
    }

    #[test]
    fn set_operations() {
        let mut set: ActionSet = [Action::MoveLeft, Action::Jump].into_iter().collect();
        assert!(set.contains(Action::MoveLeft));
        assert!(!set.contains(Action::MoveRight));
        set.remove(Action::MoveLeft);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Action::Jump]);
        let both = set.union(ActionSet::EMPTY.with(Action::Back));
        assert!(both.contains(Action::Back) && both.contains(Action::Jump));
        assert!(ActionSet::EMPTY.is_empty());
    }

    #[test]
    fn scripted_input_runs_dry() {
        let right = ActionSet::EMPTY.with(Action::MoveRight);
        let mut input = ScriptedInput::default().hold(right, 2);
        assert_eq!(input.poll(), right);
        assert_eq!(input.poll(), right);
        assert_eq!(input.remaining(), 0);
        assert_eq!(input.poll(), ActionSet::EMPTY);
        assert_eq!(NoInput.poll(), ActionSet::EMPTY);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn edges_are_consistent_with_held(samples in proptest::collection::vec(0u8..16, 1..64)) {
                let mut tracker = ActionTracker::new();
                let mut previous = ActionSet::EMPTY;
                for bits in samples {
                    let held = ActionSet(bits);
                    let state = tracker.advance(held);
                    for action in Action::ALL {
                        prop_assert!(!(state.pressed(action) && state.released(action)));
                        prop_assert_eq!(state.pressed(action), held.contains(action) && !previous.contains(action));
                        prop_assert_eq!(state.released(action), !held.contains(action) && previous.contains(action));
                    }
                    previous = held;
                }
            }
        }
    }
}
