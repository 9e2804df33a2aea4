//! The single owned state object behind one refresh wrapper.
//!
//! All mutation goes through [`RefreshController::handle`],
//! [`RefreshController::set_loading`] and [`RefreshController::advance`].
//! Each call drains its input, runs the refresh transition, carries out the
//! returned effects and re-evaluates the indicator presentation.

use crate::animation::Oscillator;
use crate::binding::ContentOffset;
use crate::config::RefreshConfig;
use crate::gesture::PanEvent;
use crate::machine::{transition, Effect, PhaseEvent, RefreshPhase};
use crate::presentation::{present, IndicatorAnimator, IndicatorState, PresentationInput};
use crate::tracker::{EventQueue, InputEvent, PullTracker, Release};
use tracing::{debug, info};

/// Spinner oscillation bounds; the rotation is `spinner * 4π`.
const SPINNER_RANGE: (f64, f64) = (0.0, 0.5);

/// A phase change observed during one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// Phase before the call
    pub from: RefreshPhase,
    /// Phase after the call
    pub to: RefreshPhase,
}

/// What a controller call produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The refresh callback must be invoked (exactly once).
    pub refresh_requested: bool,
    /// The phase changed.
    pub phase_change: Option<PhaseChange>,
}

impl Outcome {
    fn merge(&mut self, other: Self) {
        self.refresh_requested |= other.refresh_requested;
        self.phase_change = match (self.phase_change, other.phase_change) {
            (Some(first), Some(last)) if first.from == last.to => None,
            (Some(first), Some(last)) => Some(PhaseChange {
                from: first.from,
                to: last.to,
            }),
            (first, None) => first,
            (None, last) => last,
        };
    }
}

/// Pull-to-refresh state for one wrapper.
#[derive(Debug)]
pub struct RefreshController {
    config: RefreshConfig,
    tracker: PullTracker,
    queue: EventQueue,
    phase: RefreshPhase,
    loading: bool,
    settle_remaining_ms: Option<f64>,
    animator: IndicatorAnimator,
    spinner: Oscillator,
    content_offset: Option<ContentOffset>,
    mounted: bool,
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new(RefreshConfig::default())
    }
}

impl RefreshController {
    /// Create a controller at rest.
    #[must_use]
    pub fn new(config: RefreshConfig) -> Self {
        let spinner = Oscillator::new(SPINNER_RANGE.0, SPINNER_RANGE.1, config.motion.spring);
        let mut controller = Self {
            config,
            tracker: PullTracker::new(),
            queue: EventQueue::new(),
            phase: RefreshPhase::Idle,
            loading: false,
            settle_remaining_ms: None,
            animator: IndicatorAnimator::new(),
            spinner,
            content_offset: None,
            mounted: true,
        };
        controller.sync_presentation();
        controller
    }

    /// Mirror the pull offset into `offset` on every tick.
    #[must_use]
    pub fn with_content_offset(mut self, offset: ContentOffset) -> Self {
        self.set_content_offset(offset);
        self
    }

    /// Start mirroring the pull offset into `offset`, replacing any previous
    /// mirror.
    pub fn set_content_offset(&mut self, offset: ContentOffset) {
        offset.set(self.tracker.pull_offset());
        self.content_offset = Some(offset);
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> RefreshPhase {
        self.phase
    }

    /// Current pull offset.
    #[must_use]
    pub fn pull_offset(&self) -> f32 {
        self.tracker.pull_offset()
    }

    /// Last scroll position reported by the wrapped list.
    #[must_use]
    pub const fn list_offset(&self) -> f32 {
        self.tracker.list_offset()
    }

    /// Whether the indicator is out.
    #[must_use]
    pub const fn indicator_active(&self) -> bool {
        self.tracker.indicator_active()
    }

    /// Last loading flag pushed by the caller.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a done → idle settle is pending.
    #[must_use]
    pub const fn settle_pending(&self) -> bool {
        self.settle_remaining_ms.is_some()
    }

    /// Whether [`Self::unmount`] has not been called.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether any offset or indicator animation is still running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.tracker.is_animating() || self.animator.is_animating()
    }

    /// Animated indicator values for painting.
    #[must_use]
    pub fn indicator(&self) -> IndicatorState {
        self.animator.state()
    }

    /// Queue an input without processing it.
    pub fn enqueue(&mut self, event: InputEvent) {
        if self.mounted {
            self.queue.push(event);
        }
    }

    /// Handle one input after anything already queued.
    pub fn handle(&mut self, event: InputEvent) -> Outcome {
        self.enqueue(event);
        self.process_pending()
    }

    /// Drain the input queue in arrival order.
    pub fn process_pending(&mut self) -> Outcome {
        let mut outcome = Outcome::default();
        while let Some(event) = self.queue.pop() {
            outcome.merge(self.process(event));
        }
        self.sync_presentation();
        outcome
    }

    /// Push the caller's loading flag. Repeats of the last value are ignored.
    pub fn set_loading(&mut self, loading: bool) -> Outcome {
        if !self.mounted || loading == self.loading {
            return Outcome::default();
        }
        self.loading = loading;
        if !loading {
            self.spinner = Oscillator::new(
                SPINNER_RANGE.0,
                SPINNER_RANGE.1,
                self.config.motion.spring,
            );
        }
        let outcome = self.step(PhaseEvent::LoadingChanged(loading));
        self.sync_presentation();
        outcome
    }

    /// Advance animations and the settle timer by `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f64) -> Outcome {
        if !self.mounted {
            return Outcome::default();
        }
        let dt = dt_ms.max(0.0) / 1000.0;
        self.tracker.advance(dt);
        if self.loading {
            self.spinner.update(dt);
        }

        let mut outcome = Outcome::default();
        if let Some(remaining) = self.settle_remaining_ms.as_mut() {
            *remaining -= dt_ms.max(0.0);
            if *remaining <= 0.0 {
                self.settle_remaining_ms = None;
                outcome = self.step(PhaseEvent::SettleElapsed);
            }
        }

        self.sync_presentation();
        self.animator.update(dt);
        outcome
    }

    /// Tear down: drop queued input and pending timers. Every later call is
    /// a no-op.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        debug!(phase = %self.phase, "refresh controller unmounted");
        self.mounted = false;
        self.queue.clear();
        self.settle_remaining_ms = None;
    }

    fn process(&mut self, event: InputEvent) -> Outcome {
        let locked = self.phase.is_locked();
        match event {
            InputEvent::Scroll { offset_y } => {
                self.tracker.on_scroll(offset_y);
                Outcome::default()
            }
            InputEvent::Pan(PanEvent::Update {
                translation_y,
                velocity_y,
            }) => {
                if self.tracker.on_drag_update(translation_y, velocity_y, locked) {
                    let offset = self.tracker.pull_offset();
                    self.step(PhaseEvent::PullMoved { offset })
                } else {
                    Outcome::default()
                }
            }
            InputEvent::Pan(PanEvent::End) => {
                match self.tracker.on_drag_end(self.config.refresh_height, locked) {
                    Release::Locked => Outcome::default(),
                    Release::Commit { offset } | Release::Cancelled { offset } => {
                        self.step(PhaseEvent::Released { offset })
                    }
                }
            }
        }
    }

    fn step(&mut self, event: PhaseEvent) -> Outcome {
        let from = self.phase;
        let next = transition(from, event, &self.config.machine());
        let mut outcome = Outcome::default();

        for effect in &next.effects {
            match *effect {
                Effect::InvokeRefresh => {
                    info!(offset = self.tracker.pull_offset(), "refresh committed");
                    outcome.refresh_requested = true;
                }
                Effect::AnimateOffset(channel) => {
                    self.tracker.animate_offset(channel, &self.config.motion);
                }
                Effect::SetIndicatorActive(active) => self.tracker.set_indicator_active(active),
                Effect::ScheduleSettle => {
                    self.settle_remaining_ms = Some(self.config.settle_delay_ms as f64);
                }
                Effect::CancelSettle => self.settle_remaining_ms = None,
            }
        }

        if next.changed_from(from) {
            debug!(%from, to = %next.phase, ?event, "refresh phase changed");
            outcome.phase_change = Some(PhaseChange {
                from,
                to: next.phase,
            });
        }
        self.phase = next.phase;
        outcome
    }

    fn sync_presentation(&mut self) {
        let input = PresentationInput {
            phase: self.phase,
            pull_offset: self.tracker.pull_offset(),
            is_loading: self.loading,
            indicator_active: self.tracker.indicator_active(),
            spinner: self.spinner.value() as f32,
        };
        let frame = present(&input, &self.config.presentation());
        self.animator.apply(&frame, &self.config.motion);
        if let Some(mirror) = &self.content_offset {
            mirror.set(input.pull_offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn drag(controller: &mut RefreshController, translations: &[f32]) -> Outcome {
        let mut outcome = Outcome::default();
        for &translation_y in translations {
            outcome.merge(controller.handle(InputEvent::Pan(PanEvent::Update {
                translation_y,
                velocity_y: 100.0,
            })));
        }
        outcome
    }

    fn release(controller: &mut RefreshController) -> Outcome {
        controller.handle(InputEvent::Pan(PanEvent::End))
    }

    fn run_for(controller: &mut RefreshController, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            controller.advance(FRAME_MS);
            elapsed += FRAME_MS;
        }
    }

    #[test]
    fn test_commit_past_threshold() {
        let mut controller = RefreshController::default();
        drag(&mut controller, &[20.0, 60.0, 110.0]);
        assert_eq!(controller.phase(), RefreshPhase::Pulling);

        let outcome = release(&mut controller);
        assert!(outcome.refresh_requested);
        assert_eq!(
            outcome.phase_change,
            Some(PhaseChange {
                from: RefreshPhase::Pulling,
                to: RefreshPhase::Committed
            })
        );
        assert_eq!(controller.pull_offset(), 110.0);
    }

    #[test]
    fn test_short_pull_returns_home() {
        let mut controller = RefreshController::default();
        drag(&mut controller, &[20.0, 60.0]);
        controller.handle(InputEvent::Pan(PanEvent::Update {
            translation_y: 40.0,
            velocity_y: -100.0,
        }));
        let outcome = release(&mut controller);
        assert!(!outcome.refresh_requested);
        assert_eq!(controller.phase(), RefreshPhase::Idle);
        assert!(controller.is_animating());

        run_for(&mut controller, 400.0);
        assert_eq!(controller.pull_offset(), 0.0);
        assert!(!controller.indicator_active());
    }

    #[test]
    fn test_no_second_commit_while_refreshing() {
        let mut controller = RefreshController::default();
        drag(&mut controller, &[50.0, 120.0]);
        assert!(release(&mut controller).refresh_requested);
        controller.set_loading(true);
        assert_eq!(controller.phase(), RefreshPhase::Refreshing);

        let outcome = drag(&mut controller, &[10.0, 200.0]);
        assert_eq!(outcome, Outcome::default());
        assert!(!release(&mut controller).refresh_requested);
        assert_eq!(controller.pull_offset(), 120.0);
    }

    #[test]
    fn test_loading_cycle_returns_to_idle_after_settle() {
        let mut controller = RefreshController::default();
        drag(&mut controller, &[50.0, 120.0]);
        release(&mut controller);
        controller.set_loading(true);

        let outcome = controller.set_loading(false);
        assert_eq!(
            outcome.phase_change,
            Some(PhaseChange {
                from: RefreshPhase::Refreshing,
                to: RefreshPhase::Done
            })
        );
        assert!(controller.settle_pending());
        assert_eq!(controller.indicator().label, "Refreshing Done");

        run_for(&mut controller, 450.0);
        assert_eq!(controller.phase(), RefreshPhase::Done);
        assert_eq!(controller.pull_offset(), 0.0);

        let outcome = controller.advance(100.0);
        assert_eq!(
            outcome.phase_change,
            Some(PhaseChange {
                from: RefreshPhase::Done,
                to: RefreshPhase::Idle
            })
        );
        assert_eq!(controller.indicator().label, "Swipe down to refresh");
    }

    #[test]
    fn test_managed_loading_without_drag() {
        let config = RefreshConfig::default().with_managed_loading(true);
        let mut controller = RefreshController::new(config);
        let outcome = controller.set_loading(true);
        assert!(!outcome.refresh_requested);
        assert_eq!(controller.phase(), RefreshPhase::Refreshing);
        assert!(controller.indicator_active());

        run_for(&mut controller, 400.0);
        assert!((controller.pull_offset() - 100.0).abs() < 1e-3);
        let indicator = controller.indicator();
        assert!((indicator.content_translate_y - 100.0).abs() < 1e-3);
        assert_eq!(indicator.label, "Refreshing...");
    }

    #[test]
    fn test_unmanaged_external_loading_locks_gestures() {
        let mut controller = RefreshController::default();
        controller.set_loading(true);
        assert_eq!(controller.phase(), RefreshPhase::Refreshing);
        assert!(!controller.indicator_active());
        drag(&mut controller, &[150.0]);
        assert_eq!(controller.pull_offset(), 0.0);
    }

    #[test]
    fn test_repeated_loading_value_is_ignored() {
        let mut controller = RefreshController::default();
        assert_eq!(controller.set_loading(false), Outcome::default());
        controller.set_loading(true);
        assert_eq!(controller.set_loading(true), Outcome::default());
    }

    #[test]
    fn test_scrolled_list_blocks_pull() {
        let mut controller = RefreshController::default();
        controller.handle(InputEvent::Scroll { offset_y: 300.0 });
        drag(&mut controller, &[40.0, 90.0, 140.0]);
        assert_eq!(controller.pull_offset(), 0.0);
        assert!(!release(&mut controller).refresh_requested);
    }

    #[test]
    fn test_queue_preserves_arrival_order() {
        let mut controller = RefreshController::default();
        controller.enqueue(InputEvent::Scroll { offset_y: 80.0 });
        controller.enqueue(InputEvent::Scroll { offset_y: 0.0 });
        controller.enqueue(InputEvent::Pan(PanEvent::Update {
            translation_y: 30.0,
            velocity_y: 50.0,
        }));
        let outcome = controller.process_pending();
        assert_eq!(controller.pull_offset(), 30.0);
        assert_eq!(outcome.phase_change.map(|c| c.to), Some(RefreshPhase::Pulling));
    }

    #[test]
    fn test_unmount_suppresses_settle() {
        let mut controller = RefreshController::default();
        drag(&mut controller, &[50.0, 120.0]);
        release(&mut controller);
        controller.set_loading(true);
        controller.set_loading(false);
        controller.unmount();
        assert!(!controller.settle_pending());

        run_for(&mut controller, 1000.0);
        assert_eq!(controller.phase(), RefreshPhase::Done);
        assert_eq!(controller.set_loading(true), Outcome::default());
        assert_eq!(drag(&mut controller, &[10.0]), Outcome::default());
    }

    #[test]
    fn test_loading_during_settle_cancels_it() {
        let config = RefreshConfig::default().with_managed_loading(true);
        let mut controller = RefreshController::new(config);
        controller.set_loading(true);
        controller.set_loading(false);
        controller.advance(200.0);
        controller.set_loading(true);
        assert!(!controller.settle_pending());
        run_for(&mut controller, 1000.0);
        assert_eq!(controller.phase(), RefreshPhase::Refreshing);
    }

    #[test]
    fn test_content_offset_mirror() {
        let mirror = ContentOffset::default();
        let mut controller = RefreshController::default().with_content_offset(mirror.clone());
        drag(&mut controller, &[20.0, 45.0]);
        assert_eq!(mirror.get(), 45.0);
        release(&mut controller);
        run_for(&mut controller, 400.0);
        assert_eq!(mirror.get(), 0.0);
    }

    #[test]
    fn test_spinner_rotates_only_while_loading() {
        let config = RefreshConfig::default().with_managed_loading(true);
        let mut controller = RefreshController::new(config);
        run_for(&mut controller, 100.0);
        assert_eq!(controller.indicator().rotation, 0.0);

        controller.set_loading(true);
        run_for(&mut controller, 100.0);
        assert!(controller.indicator().rotation > 0.0);

        controller.set_loading(false);
        assert_eq!(controller.indicator().rotation, 0.0);
    }

    #[test]
    fn test_settle_delay_is_configurable() {
        let config = RefreshConfig::default()
            .with_managed_loading(true)
            .with_settle_delay_ms(1000);
        let mut controller = RefreshController::new(config);
        controller.set_loading(true);
        controller.set_loading(false);
        run_for(&mut controller, 600.0);
        assert_eq!(controller.phase(), RefreshPhase::Done);
        run_for(&mut controller, 450.0);
        assert_eq!(controller.phase(), RefreshPhase::Idle);
    }

    #[test]
    fn test_drag_while_settling_moves_offset_without_commit() {
        let config = RefreshConfig::default().with_managed_loading(true);
        let mut controller = RefreshController::new(config);
        controller.set_loading(true);
        run_for(&mut controller, 400.0);
        controller.set_loading(false);
        assert_eq!(controller.phase(), RefreshPhase::Done);

        drag(&mut controller, &[40.0, 140.0]);
        assert_eq!(controller.pull_offset(), 140.0);
        assert_eq!(controller.phase(), RefreshPhase::Done);

        let outcome = release(&mut controller);
        assert!(!outcome.refresh_requested);
        assert_eq!(outcome.phase_change, None);
        assert!(!controller.indicator_active());
        assert!(controller.settle_pending());
    }

    #[test]
    fn test_touch_while_settling_leaves_indicator_at_rest() {
        let config = RefreshConfig::default()
            .with_managed_loading(true)
            .with_default_animation(true);
        let mut controller = RefreshController::new(config);
        controller.set_loading(true);
        run_for(&mut controller, 400.0);
        controller.set_loading(false);

        drag(&mut controller, &[5.0, 30.0]);
        release(&mut controller);
        run_for(&mut controller, 80.0 * FRAME_MS);

        assert_eq!(controller.phase(), RefreshPhase::Idle);
        assert_eq!(controller.pull_offset(), 0.0);
        assert!(!controller.indicator_active());
        let indicator = controller.indicator();
        assert!(indicator.loader_scale < 0.05);
        assert!(indicator.content_translate_y.abs() < 1e-3);
    }

    #[test]
    fn test_locked_drag_does_not_touch_indicator() {
        let mut controller = RefreshController::default();
        drag(&mut controller, &[50.0, 120.0]);
        release(&mut controller);
        controller.set_loading(true);
        controller.set_loading(false);
        controller.set_loading(true);
        assert_eq!(controller.phase(), RefreshPhase::Refreshing);
        assert!(controller.pull_offset() > 0.0);
        assert!(!controller.indicator_active());

        drag(&mut controller, &[60.0, 80.0]);
        assert!(!controller.indicator_active());
    }

    fn any_input() -> impl Strategy<Value = InputEvent> {
        prop_oneof![
            (-50.0f32..400.0).prop_map(|offset_y| InputEvent::Scroll { offset_y }),
            ((-200.0f32..300.0), (-2000.0f32..2000.0)).prop_map(|(translation_y, velocity_y)| {
                InputEvent::Pan(PanEvent::Update {
                    translation_y,
                    velocity_y,
                })
            }),
            Just(InputEvent::Pan(PanEvent::End)),
        ]
    }

    proptest! {
        #[test]
        fn prop_short_pulls_never_refresh(
            translations in proptest::collection::vec(0.0f32..99.0, 1..30),
        ) {
            let mut controller = RefreshController::default();
            for translation_y in translations {
                let outcome = controller.handle(InputEvent::Pan(PanEvent::Update {
                    translation_y,
                    velocity_y: 10.0,
                }));
                prop_assert!(!outcome.refresh_requested);
            }
            prop_assert!(!release(&mut controller).refresh_requested);
        }

        #[test]
        fn prop_reaching_threshold_refreshes_once(
            mut translations in proptest::collection::vec(0.0f32..300.0, 0..20),
            last in 100.0f32..400.0,
        ) {
            translations.push(last);
            let mut controller = RefreshController::default();
            let mut refreshes = usize::from(drag(&mut controller, &translations).refresh_requested);
            refreshes += usize::from(release(&mut controller).refresh_requested);
            prop_assert_eq!(refreshes, 1);
            prop_assert_eq!(controller.phase(), RefreshPhase::Committed);
        }

        #[test]
        fn prop_refreshing_blocks_further_refresh(
            inputs in proptest::collection::vec(any_input(), 1..60),
        ) {
            let config = RefreshConfig::default().with_managed_loading(true);
            let mut controller = RefreshController::new(config);
            controller.set_loading(true);
            for input in inputs {
                let outcome = controller.handle(input);
                prop_assert!(!outcome.refresh_requested);
                prop_assert_eq!(controller.phase(), RefreshPhase::Refreshing);
            }
        }

        #[test]
        fn prop_indicator_matches_offset_once_settled(
            steps in proptest::collection::vec(
                prop_oneof![
                    any_input().prop_map(Some),
                    Just(None),
                ],
                0..60,
            ),
            loading_flips in proptest::collection::vec(any::<bool>(), 0..6),
            managed in any::<bool>(),
        ) {
            let config = RefreshConfig::default().with_managed_loading(managed);
            let mut controller = RefreshController::new(config);
            let mut flips = loading_flips.into_iter();
            for step in steps {
                match step {
                    Some(input) => {
                        controller.handle(input);
                    }
                    None => {
                        if let Some(loading) = flips.next() {
                            controller.set_loading(loading);
                        }
                        controller.advance(FRAME_MS * 4.0);
                    }
                }
            }

            release(&mut controller);
            controller.set_loading(true);
            controller.set_loading(false);
            run_for(&mut controller, 2000.0);

            prop_assert_eq!(controller.phase(), RefreshPhase::Idle);
            prop_assert_eq!(controller.indicator_active(), controller.pull_offset() > 0.0);
            prop_assert!(!controller.indicator_active());
        }

        #[test]
        fn prop_completion_settles_to_idle(
            inputs in proptest::collection::vec(any_input(), 0..30),
            settle_ms in 0u64..1500,
        ) {
            let config = RefreshConfig::default()
                .with_managed_loading(true)
                .with_settle_delay_ms(settle_ms);
            let mut controller = RefreshController::new(config);
            controller.set_loading(true);
            for input in inputs {
                controller.handle(input);
            }
            controller.set_loading(false);
            prop_assert_eq!(controller.phase(), RefreshPhase::Done);
            run_for(&mut controller, settle_ms as f64 + 400.0);
            prop_assert_eq!(controller.phase(), RefreshPhase::Idle);
            prop_assert_eq!(controller.pull_offset(), 0.0);
        }
    }
}
