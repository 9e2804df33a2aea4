//! Refresh lifecycle as a pure transition function.
//!
//! ```text
//!   Idle ⇄ Pulling ──release ≥ h──▶ Committed ──loading──▶ Refreshing
//!     ▲                                                    │
//!     └──────── settle delay ──────── Done ◀──loading off──┘
//! ```
//!
//! [`transition`] never touches offsets or callbacks itself; it returns the
//! [`Effect`]s the owner must carry out.

use crate::animation::Channel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of one refresh wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPhase {
    /// Nothing pulled.
    #[default]
    Idle,
    /// The indicator is being dragged out.
    Pulling,
    /// Threshold crossed; refresh requested, waiting for loading to start.
    Committed,
    /// The caller reports loading.
    Refreshing,
    /// Loading finished; waiting out the settle delay.
    Done,
}

impl RefreshPhase {
    /// Phases in which drag updates are ignored.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Committed | Self::Refreshing)
    }

    /// Phases in which the content is held open at the refresh height.
    #[must_use]
    pub const fn holds_content(self) -> bool {
        matches!(self, Self::Committed | Self::Refreshing)
    }

    /// Status line shown above the indicator ring.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle | Self::Pulling => "Swipe down to refresh",
            Self::Committed | Self::Refreshing => "Refreshing...",
            Self::Done => "Refreshing Done",
        }
    }
}

impl fmt::Display for RefreshPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Pulling => "pulling",
            Self::Committed => "committed",
            Self::Refreshing => "refreshing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Inputs to the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseEvent {
    /// An admitted drag moved the offset.
    PullMoved {
        /// Offset after the move
        offset: f32,
    },
    /// The finger lifted.
    Released {
        /// Offset at release
        offset: f32,
    },
    /// The caller's loading flag changed edge.
    LoadingChanged(bool),
    /// The settle timer fired.
    SettleElapsed,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Call the caller's refresh callback once.
    InvokeRefresh,
    /// Drive the pull offset.
    AnimateOffset(Channel),
    /// Show or hide the indicator.
    SetIndicatorActive(bool),
    /// Start the done → idle timer.
    ScheduleSettle,
    /// Drop a pending settle timer.
    CancelSettle,
}

/// Static parameters the transition function depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineConfig {
    /// Pull distance that commits a refresh
    pub refresh_height: f32,
    /// Whether loading alone drives the indicator
    pub managed_loading: bool,
}

/// Outcome of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Phase after the event
    pub phase: RefreshPhase,
    /// Effects to perform, in order
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(phase: RefreshPhase) -> Self {
        Self {
            phase,
            effects: Vec::new(),
        }
    }

    fn to(phase: RefreshPhase, effects: Vec<Effect>) -> Self {
        Self { phase, effects }
    }

    /// Whether the phase changed from `from`.
    #[must_use]
    pub fn changed_from(&self, from: RefreshPhase) -> bool {
        self.phase != from
    }
}

/// Compute the next phase and its effects.
#[must_use]
pub fn transition(phase: RefreshPhase, event: PhaseEvent, config: &MachineConfig) -> Transition {
    use RefreshPhase::{Committed, Done, Idle, Pulling, Refreshing};

    match (phase, event) {
        (Idle | Pulling, PhaseEvent::PullMoved { offset }) => {
            Transition::stay(if offset > 0.0 { Pulling } else { Idle })
        }

        (Idle | Pulling, PhaseEvent::Released { offset }) if offset >= config.refresh_height => {
            Transition::to(
                Committed,
                vec![Effect::SetIndicatorActive(true), Effect::InvokeRefresh],
            )
        }
        (Idle | Pulling, PhaseEvent::Released { .. }) => Transition::to(
            Idle,
            vec![
                Effect::SetIndicatorActive(false),
                Effect::AnimateOffset(Channel::timing(0.0)),
            ],
        ),

        // Settling: the offset follows the finger but a release never commits.
        (Done, PhaseEvent::Released { .. }) => Transition::to(
            Done,
            vec![
                Effect::SetIndicatorActive(false),
                Effect::AnimateOffset(Channel::timing(0.0)),
            ],
        ),

        (Committed, PhaseEvent::LoadingChanged(true)) => Transition::stay(Refreshing),
        (Idle | Pulling | Done, PhaseEvent::LoadingChanged(true)) => {
            let mut effects = Vec::new();
            if phase == Done {
                effects.push(Effect::CancelSettle);
            }
            if config.managed_loading {
                effects.push(Effect::SetIndicatorActive(true));
                effects.push(Effect::AnimateOffset(Channel::timing(config.refresh_height)));
            }
            Transition::to(Refreshing, effects)
        }

        (Refreshing, PhaseEvent::LoadingChanged(false)) => Transition::to(
            Done,
            vec![
                Effect::SetIndicatorActive(false),
                Effect::AnimateOffset(Channel::timing(0.0)),
                Effect::ScheduleSettle,
            ],
        ),

        (Done, PhaseEvent::SettleElapsed) => Transition::stay(Idle),

        _ => Transition::stay(phase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use RefreshPhase::{Committed, Done, Idle, Pulling, Refreshing};

    const CONFIG: MachineConfig = MachineConfig {
        refresh_height: 100.0,
        managed_loading: false,
    };

    const MANAGED: MachineConfig = MachineConfig {
        refresh_height: 100.0,
        managed_loading: true,
    };

    #[test]
    fn test_pull_moves_between_idle_and_pulling() {
        assert_eq!(transition(Idle, PhaseEvent::PullMoved { offset: 5.0 }, &CONFIG).phase, Pulling);
        assert_eq!(transition(Pulling, PhaseEvent::PullMoved { offset: 0.0 }, &CONFIG).phase, Idle);
        assert_eq!(transition(Pulling, PhaseEvent::PullMoved { offset: -3.0 }, &CONFIG).phase, Idle);
    }

    #[test]
    fn test_release_at_threshold_commits_once() {
        let t = transition(Pulling, PhaseEvent::Released { offset: 100.0 }, &CONFIG);
        assert_eq!(t.phase, Committed);
        assert_eq!(
            t.effects,
            vec![Effect::SetIndicatorActive(true), Effect::InvokeRefresh]
        );
    }

    #[test]
    fn test_release_short_returns_home() {
        let t = transition(Pulling, PhaseEvent::Released { offset: 40.0 }, &CONFIG);
        assert_eq!(t.phase, Idle);
        assert!(t.effects.contains(&Effect::AnimateOffset(Channel::timing(0.0))));
        assert!(!t.effects.contains(&Effect::InvokeRefresh));
    }

    #[test]
    fn test_locked_phases_ignore_gestures() {
        for phase in [Committed, Refreshing] {
            let t = transition(phase, PhaseEvent::Released { offset: 500.0 }, &CONFIG);
            assert_eq!(t, Transition::stay(phase));
            let t = transition(phase, PhaseEvent::PullMoved { offset: 500.0 }, &CONFIG);
            assert_eq!(t, Transition::stay(phase));
        }
    }

    #[test]
    fn test_release_while_settling_returns_home_without_commit() {
        assert!(!Done.is_locked());
        let t = transition(Done, PhaseEvent::Released { offset: 500.0 }, &CONFIG);
        assert_eq!(t.phase, Done);
        assert_eq!(
            t.effects,
            vec![
                Effect::SetIndicatorActive(false),
                Effect::AnimateOffset(Channel::timing(0.0))
            ]
        );
        let t = transition(Done, PhaseEvent::PullMoved { offset: 40.0 }, &CONFIG);
        assert_eq!(t, Transition::stay(Done));
    }

    #[test]
    fn test_committed_enters_refreshing_on_loading() {
        let t = transition(Committed, PhaseEvent::LoadingChanged(true), &CONFIG);
        assert_eq!(t.phase, Refreshing);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_committed_waits_without_loading_edge() {
        let t = transition(Committed, PhaseEvent::LoadingChanged(false), &CONFIG);
        assert_eq!(t.phase, Committed);
    }

    #[test]
    fn test_managed_loading_forces_refreshing() {
        let t = transition(Idle, PhaseEvent::LoadingChanged(true), &MANAGED);
        assert_eq!(t.phase, Refreshing);
        assert_eq!(
            t.effects,
            vec![
                Effect::SetIndicatorActive(true),
                Effect::AnimateOffset(Channel::timing(100.0))
            ]
        );
    }

    #[test]
    fn test_unmanaged_external_loading_locks_without_animation() {
        let t = transition(Idle, PhaseEvent::LoadingChanged(true), &CONFIG);
        assert_eq!(t.phase, Refreshing);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_loading_off_completes_and_schedules_settle() {
        let t = transition(Refreshing, PhaseEvent::LoadingChanged(false), &CONFIG);
        assert_eq!(t.phase, Done);
        assert!(t.effects.contains(&Effect::ScheduleSettle));
        assert!(t.effects.contains(&Effect::AnimateOffset(Channel::timing(0.0))));
    }

    #[test]
    fn test_settle_returns_to_idle() {
        assert_eq!(transition(Done, PhaseEvent::SettleElapsed, &CONFIG).phase, Idle);
    }

    #[test]
    fn test_stale_settle_is_ignored() {
        for phase in [Idle, Pulling, Committed, Refreshing] {
            assert_eq!(transition(phase, PhaseEvent::SettleElapsed, &CONFIG).phase, phase);
        }
    }

    #[test]
    fn test_loading_during_done_cancels_settle() {
        let t = transition(Done, PhaseEvent::LoadingChanged(true), &MANAGED);
        assert_eq!(t.phase, Refreshing);
        assert_eq!(t.effects[0], Effect::CancelSettle);
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Idle.label(), "Swipe down to refresh");
        assert_eq!(Refreshing.label(), "Refreshing...");
        assert_eq!(Done.label(), "Refreshing Done");
        assert_eq!(Committed.to_string(), "committed");
    }

    fn any_event() -> impl Strategy<Value = PhaseEvent> {
        prop_oneof![
            (-50.0f32..250.0).prop_map(|offset| PhaseEvent::PullMoved { offset }),
            (-50.0f32..250.0).prop_map(|offset| PhaseEvent::Released { offset }),
            any::<bool>().prop_map(PhaseEvent::LoadingChanged),
            Just(PhaseEvent::SettleElapsed),
        ]
    }

    proptest! {
        #[test]
        fn prop_refresh_only_invoked_from_unlocked_phase(
            events in proptest::collection::vec(any_event(), 1..60),
            managed in any::<bool>(),
        ) {
            let config = MachineConfig { refresh_height: 100.0, managed_loading: managed };
            let mut phase = Idle;
            for event in events {
                let t = transition(phase, event, &config);
                if t.effects.contains(&Effect::InvokeRefresh) {
                    prop_assert!(matches!(phase, Idle | Pulling), "committed from {:?}", phase);
                    prop_assert_eq!(t.phase, Committed);
                }
                phase = t.phase;
            }
        }

        #[test]
        fn prop_no_second_commit_until_idle(
            events in proptest::collection::vec(any_event(), 1..60),
        ) {
            let mut phase = Idle;
            let mut commits_since_idle = 0;
            for event in events {
                let t = transition(phase, event, &CONFIG);
                if t.effects.contains(&Effect::InvokeRefresh) {
                    commits_since_idle += 1;
                }
                prop_assert!(commits_since_idle <= 1);
                if matches!(t.phase, Idle | Pulling) {
                    commits_since_idle = 0;
                }
                phase = t.phase;
            }
        }
    }
}
