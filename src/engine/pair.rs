//! Work/break cycle over two timers.
//!
//! This module provides the pair state machine:
//! - Work → Break → Work hand-off on completion, forever until stopped
//! - Side effects on each hand-off (styling, window focus, alert sound)
//! - Validated duration updates that restart the cycle
//! - Work-only pause/resume for presence changes

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::collaborators::Collaborators;
use super::error::{ValidationError, INVALID_DELAY_MESSAGE};
use super::events::EventEmitter;
use super::timer::{Timer, TimerEvent};
use crate::types::{parse_positive_int, Durations, PairId, Phase, TimerId};

// ============================================================================
// PairPhase / PairEvent
// ============================================================================

/// Which of the pair's timers is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairPhase {
    /// Neither timer is counting
    #[default]
    Idle,
    /// The work timer is running or paused
    WorkRunning,
    /// The break timer is running or paused
    BreakRunning,
}

impl PairPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            PairPhase::Idle => "idle",
            PairPhase::WorkRunning => "work",
            PairPhase::BreakRunning => "break",
        }
    }
}

/// Events emitted by a [`TimerPair`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairEvent {
    /// The pair moved to another phase
    PhaseChanged { pair: PairId, phase: PairPhase },
    /// New durations were accepted
    SettingsChanged { pair: PairId, durations: Durations },
}

// ============================================================================
// TimerPair
// ============================================================================

/// A work timer and a break timer running one after the other.
///
/// At most one of the two timers is active at any time.
#[derive(Debug)]
pub struct TimerPair {
    id: PairId,
    durations: Durations,
    work_timer: Timer,
    break_timer: Timer,
    collaborators: Collaborators,
    alert_sound: usize,
    phase: PairPhase,
    events: EventEmitter<PairEvent>,
}

impl TimerPair {
    /// Creates an idle pair. `durations` are trusted as given.
    pub fn new(durations: Durations, clock: Arc<Clock>, collaborators: Collaborators) -> Self {
        Self {
            id: PairId::next(),
            durations,
            work_timer: Timer::new(Arc::clone(&clock)),
            break_timer: Timer::new(clock),
            collaborators,
            alert_sound: 0,
            phase: PairPhase::Idle,
            events: EventEmitter::new(),
        }
    }

    /// Selects the alert played when a break ends.
    pub fn with_alert_sound(mut self, sound_index: usize) -> Self {
        self.alert_sound = sound_index;
        self
    }

    pub fn id(&self) -> PairId {
        self.id
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn phase(&self) -> PairPhase {
        self.phase
    }

    pub fn work_timer(&self) -> &Timer {
        &self.work_timer
    }

    pub fn break_timer(&self) -> &Timer {
        &self.break_timer
    }

    /// Returns true if `timer` is one of this pair's timers.
    pub fn owns(&self, timer: TimerId) -> bool {
        timer == self.work_timer.id() || timer == self.break_timer.id()
    }

    /// Remaining time of the active timer, zero when idle.
    pub fn remaining(&self) -> Duration {
        match self.phase {
            PairPhase::WorkRunning => self.work_timer.remaining(),
            PairPhase::BreakRunning => self.break_timer.remaining(),
            PairPhase::Idle => Duration::ZERO,
        }
    }

    /// Subscribes to phase and settings changes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PairEvent> {
        self.events.subscribe()
    }

    /// Starts a fresh work phase.
    pub fn begin(&mut self) {
        self.ensure_consistent();
        if self.break_timer.is_active() {
            let event = self.break_timer.stop();
            self.handle_event(event);
        }
        self.collaborators
            .renderer
            .set_visual_phase(self.id, Phase::Work);
        self.start_work();
    }

    /// Delivers one clock tick to `timer`.
    ///
    /// Returns false if the timer does not belong to this pair.
    pub fn tick(&mut self, timer: TimerId) -> bool {
        if !self.owns(timer) {
            return false;
        }
        if !self.ensure_consistent() {
            return true;
        }

        let event = if timer == self.work_timer.id() {
            self.work_timer.tick()
        } else {
            self.break_timer.tick()
        };
        if let Some(event) = event {
            self.handle_event(event);
        }
        self.refresh_phase();
        true
    }

    /// Stops both timers.
    pub fn stop_all(&mut self) {
        let event = self.work_timer.stop();
        self.handle_event(event);
        let event = self.break_timer.stop();
        self.handle_event(event);
        self.refresh_phase();
    }

    /// Applies new durations and starts a fresh work phase.
    ///
    /// Rejected values are reported to the renderer per field and leave the
    /// pair untouched.
    pub fn update_durations(
        &mut self,
        work_duration: Duration,
        break_duration: Duration,
    ) -> Result<(), ValidationError> {
        let candidate = Durations::new(work_duration, break_duration);
        let invalid = candidate.invalid_fields();
        if !invalid.is_empty() {
            for field in &invalid {
                self.collaborators
                    .renderer
                    .render_validation_error(INVALID_DELAY_MESSAGE, *field);
            }
            warn!(pair = %self.id, fields = ?invalid, "Rejected timer settings");
            return Err(ValidationError::NonPositive { fields: invalid });
        }

        self.durations = candidate;
        self.stop_all();
        self.start_work();

        info!(
            pair = %self.id,
            work_ms = work_duration.as_millis() as u64,
            break_ms = break_duration.as_millis() as u64,
            "Timer settings updated"
        );
        self.events.emit(&PairEvent::SettingsChanged {
            pair: self.id,
            durations: candidate,
        });
        Ok(())
    }

    /// Applies durations typed by the user, in whole seconds.
    pub fn update_from_input(
        &mut self,
        work_secs: &str,
        break_secs: &str,
    ) -> Result<(), ValidationError> {
        self.update_durations(
            Duration::from_secs(parse_positive_int(work_secs)),
            Duration::from_secs(parse_positive_int(break_secs)),
        )
    }

    /// Freezes the work timer. The break timer is never paused.
    pub fn pause_work(&mut self) -> bool {
        match self.work_timer.pause() {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Unfreezes the work timer.
    pub fn resume_work(&mut self) -> bool {
        match self.work_timer.resume() {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    fn start_work(&mut self) {
        let event = self.work_timer.set(self.durations.work_duration);
        self.handle_event(event);
        self.refresh_phase();
    }

    fn start_break(&mut self) {
        let event = self.break_timer.set(self.durations.break_duration);
        self.handle_event(event);
        self.refresh_phase();
    }

    fn handle_event(&mut self, event: TimerEvent) {
        let renderer = &self.collaborators.renderer;
        match event {
            TimerEvent::Started { id, remaining }
            | TimerEvent::Progressed { id, remaining }
            | TimerEvent::Paused { id, remaining }
            | TimerEvent::Resumed { id, remaining } => {
                renderer.render_remaining(id, remaining);
                renderer.render_progress(self.id, self.timer(id).progress_percent());
            }
            TimerEvent::Completed { id } if id == self.work_timer.id() => {
                self.on_work_completed();
            }
            TimerEvent::Completed { .. } => self.on_break_completed(),
            TimerEvent::Stopped { id } => {
                renderer.set_visual_phase(self.id, Phase::Work);
                renderer.render_remaining(id, Duration::ZERO);
                renderer.render_progress(self.id, 0);
            }
        }
    }

    fn on_work_completed(&mut self) {
        info!(pair = %self.id, "Work phase completed, starting break");
        let renderer = &self.collaborators.renderer;
        renderer.set_visual_phase(self.id, Phase::Break);
        self.collaborators.window.bring_to_front();
        renderer.render_remaining(self.work_timer.id(), Duration::ZERO);
        self.start_break();
    }

    fn on_break_completed(&mut self) {
        info!(pair = %self.id, "Break completed, back to work");
        if let Err(e) = self.collaborators.alert.play_alert(self.alert_sound) {
            warn!(pair = %self.id, error = %e, "Alert playback failed");
        }
        let renderer = &self.collaborators.renderer;
        renderer.set_visual_phase(self.id, Phase::Work);
        renderer.render_remaining(self.break_timer.id(), Duration::ZERO);
        self.start_work();
    }

    /// Stops both timers if both are active. Returns false if it had to.
    fn ensure_consistent(&mut self) -> bool {
        if self.work_timer.is_active() && self.break_timer.is_active() {
            warn!(pair = %self.id, "Work and break timers both active, stopping both");
            self.stop_all();
            return false;
        }
        true
    }

    fn refresh_phase(&mut self) {
        let phase = if self.work_timer.is_active() {
            PairPhase::WorkRunning
        } else if self.break_timer.is_active() {
            PairPhase::BreakRunning
        } else {
            PairPhase::Idle
        };

        if phase != self.phase {
            debug!(pair = %self.id, from = self.phase.as_str(), to = phase.as_str(), "Pair phase changed");
            self.phase = phase;
            self.events.emit(&PairEvent::PhaseChanged {
                pair: self.id,
                phase,
            });
        }
    }

    fn timer(&self, id: TimerId) -> &Timer {
        if id == self.work_timer.id() {
            &self.work_timer
        } else {
            &self.break_timer
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MockRenderer, RenderCall};
    use crate::sound::MockAlertPlayer;
    use crate::types::Field;
    use crate::window::MockWindowController;

    struct Fixture {
        clock: Arc<Clock>,
        pair: TimerPair,
        renderer: Arc<MockRenderer>,
        alert: Arc<MockAlertPlayer>,
        window: Arc<MockWindowController>,
    }

    fn create_pair(work_ms: u64, break_ms: u64) -> Fixture {
        let clock = Clock::shared(Duration::from_millis(1000));
        clock.start();
        let (collaborators, renderer, alert, window) = Collaborators::mocked();
        let pair = TimerPair::new(
            Durations::new(Duration::from_millis(work_ms), Duration::from_millis(break_ms)),
            Arc::clone(&clock),
            collaborators,
        );
        Fixture {
            clock,
            pair,
            renderer,
            alert,
            window,
        }
    }

    /// Delivers one firing of the clock to the pair.
    fn fire(f: &mut Fixture) {
        for id in f.clock.fire() {
            if f.clock.is_subscribed(id) {
                f.pair.tick(id);
            }
        }
    }

    fn assert_at_most_one_active(pair: &TimerPair) {
        assert!(
            !(pair.work_timer().is_active() && pair.break_timer().is_active()),
            "both timers active"
        );
    }

    // ------------------------------------------------------------------------
    // Cycle Tests
    // ------------------------------------------------------------------------

    mod cycle_tests {
        use super::*;

        #[test]
        fn test_new_pair_is_idle() {
            let f = create_pair(3000, 2000);
            assert_eq!(f.pair.phase(), PairPhase::Idle);
            assert_eq!(f.pair.remaining(), Duration::ZERO);
            assert_eq!(f.clock.subscriber_count(), 0);
        }

        #[test]
        fn test_begin_starts_work() {
            let mut f = create_pair(3000, 2000);
            f.pair.begin();

            assert_eq!(f.pair.phase(), PairPhase::WorkRunning);
            assert_eq!(f.pair.remaining(), Duration::from_millis(3000));
            assert_eq!(
                f.renderer.last_remaining(f.pair.work_timer().id()),
                Some(Duration::from_millis(3000))
            );
            assert_eq!(f.renderer.last_phase(f.pair.id()), Some(Phase::Work));
        }

        #[test]
        fn test_work_completion_starts_break() {
            let mut f = create_pair(2000, 3000);
            f.pair.begin();

            fire(&mut f);
            fire(&mut f);

            assert_eq!(f.pair.phase(), PairPhase::BreakRunning);
            assert_eq!(f.pair.break_timer().remaining(), Duration::from_millis(3000));
            assert!(!f.pair.work_timer().is_active());
            assert_eq!(f.window.raise_count(), 1);
            assert_eq!(f.alert.play_count(), 0);
            assert_eq!(f.renderer.last_phase(f.pair.id()), Some(Phase::Break));
            assert_eq!(
                f.renderer.last_remaining(f.pair.work_timer().id()),
                Some(Duration::ZERO)
            );
        }

        #[test]
        fn test_break_completion_restarts_work() {
            let mut f = create_pair(1000, 2000);
            f.pair.begin();

            fire(&mut f); // work done
            fire(&mut f);
            fire(&mut f); // break done

            assert_eq!(f.pair.phase(), PairPhase::WorkRunning);
            assert_eq!(f.pair.work_timer().remaining(), Duration::from_millis(1000));
            assert_eq!(f.alert.played(), vec![0]);
            assert_eq!(f.renderer.last_phase(f.pair.id()), Some(Phase::Work));
        }

        #[test]
        fn test_cycle_repeats_and_never_overlaps() {
            let mut f = create_pair(2000, 1000);
            f.pair.begin();

            for _ in 0..30 {
                fire(&mut f);
                assert_at_most_one_active(&f.pair);
            }

            // 30 ticks = 10 full cycles of 3 ticks
            assert_eq!(f.window.raise_count(), 10);
            assert_eq!(f.alert.play_count(), 10);
            assert_eq!(f.pair.phase(), PairPhase::WorkRunning);
        }

        #[test]
        fn test_new_break_timer_waits_for_next_firing() {
            let mut f = create_pair(1000, 1000);
            f.pair.begin();

            fire(&mut f);

            // The break timer subscribed mid-firing and was not ticked yet
            assert_eq!(f.pair.break_timer().remaining(), Duration::from_millis(1000));
        }

        #[test]
        fn test_alert_failure_keeps_cycling() {
            let mut f = create_pair(1000, 1000);
            f.alert.set_should_fail(true);
            f.pair.begin();

            fire(&mut f);
            fire(&mut f);

            assert_eq!(f.pair.phase(), PairPhase::WorkRunning);
        }

        #[test]
        fn test_custom_alert_sound() {
            let clock = Clock::shared(Duration::from_millis(1000));
            clock.start();
            let (collaborators, _renderer, alert, _window) = Collaborators::mocked();
            let mut pair = TimerPair::new(Durations::from_secs(1, 1), Arc::clone(&clock), collaborators)
                .with_alert_sound(2);
            pair.begin();

            for _ in 0..2 {
                for id in clock.fire() {
                    pair.tick(id);
                }
            }

            assert_eq!(alert.played(), vec![2]);
        }

        #[test]
        fn test_tick_for_foreign_timer() {
            let mut f = create_pair(1000, 1000);
            assert!(!f.pair.tick(TimerId::next()));
        }

        #[test]
        fn test_progress_rendered() {
            let mut f = create_pair(4000, 1000);
            f.pair.begin();
            fire(&mut f);

            let pair_id = f.pair.id();
            let last_progress = f.renderer.calls().into_iter().rev().find_map(|c| match c {
                RenderCall::Progress { pair, percent } if pair == pair_id => Some(percent),
                _ => None,
            });
            assert_eq!(last_progress, Some(75));
        }
    }

    // ------------------------------------------------------------------------
    // Stop / Update Tests
    // ------------------------------------------------------------------------

    mod control_tests {
        use super::*;

        #[test]
        fn test_stop_all_goes_idle() {
            let mut f = create_pair(2000, 1000);
            f.pair.begin();
            fire(&mut f);
            fire(&mut f);
            assert_eq!(f.pair.phase(), PairPhase::BreakRunning);

            f.pair.stop_all();

            assert_eq!(f.pair.phase(), PairPhase::Idle);
            assert_eq!(f.clock.subscriber_count(), 0);
            assert_eq!(f.renderer.last_phase(f.pair.id()), Some(Phase::Work));
            assert_eq!(
                f.renderer.last_remaining(f.pair.break_timer().id()),
                Some(Duration::ZERO)
            );
        }

        #[test]
        fn test_no_ticks_after_stop() {
            let mut f = create_pair(5000, 1000);
            f.pair.begin();
            f.pair.stop_all();

            for _ in 0..10 {
                fire(&mut f);
            }

            assert_eq!(f.pair.phase(), PairPhase::Idle);
            assert_eq!(f.window.raise_count(), 0);
        }

        #[test]
        fn test_phase_events() {
            let mut f = create_pair(1000, 1000);
            let mut rx = f.pair.subscribe();
            f.pair.begin();
            fire(&mut f);
            f.pair.stop_all();

            let phases: Vec<PairPhase> = std::iter::from_fn(|| rx.try_recv().ok())
                .filter_map(|e| match e {
                    PairEvent::PhaseChanged { phase, .. } => Some(phase),
                    PairEvent::SettingsChanged { .. } => None,
                })
                .collect();
            assert_eq!(
                phases,
                vec![
                    PairPhase::WorkRunning,
                    PairPhase::BreakRunning,
                    PairPhase::Idle
                ]
            );
        }

        #[test]
        fn test_update_durations_restarts_work() {
            let mut f = create_pair(5000, 1000);
            let mut rx = f.pair.subscribe();
            f.pair.begin();
            fire(&mut f);

            f.pair
                .update_durations(Duration::from_millis(8000), Duration::from_millis(2000))
                .unwrap();

            assert_eq!(f.pair.durations(), Durations::from_secs(8, 2));
            assert_eq!(f.pair.phase(), PairPhase::WorkRunning);
            assert_eq!(f.pair.work_timer().remaining(), Duration::from_millis(8000));
            let settings_events = std::iter::from_fn(|| rx.try_recv().ok())
                .filter(|e| matches!(e, PairEvent::SettingsChanged { .. }))
                .count();
            assert_eq!(settings_events, 1);
        }

        #[test]
        fn test_update_durations_rejects_zero() {
            let mut f = create_pair(5000, 1000);
            f.pair.begin();
            fire(&mut f);
            let remaining = f.pair.work_timer().remaining();

            let err = f
                .pair
                .update_durations(Duration::ZERO, Duration::from_millis(1000))
                .unwrap_err();

            assert_eq!(err.fields(), &[Field::WorkDelay]);
            assert_eq!(f.pair.durations(), Durations::from_secs(5, 1));
            assert_eq!(f.pair.work_timer().remaining(), remaining);
            assert_eq!(
                f.renderer.validation_errors(),
                vec![(INVALID_DELAY_MESSAGE.to_string(), Field::WorkDelay)]
            );
        }

        #[test]
        fn test_update_from_negative_input_rejected() {
            let mut f = create_pair(5000, 1000);

            let err = f.pair.update_from_input("-5", "1000").unwrap_err();

            assert_eq!(err.fields(), &[Field::WorkDelay]);
            assert_eq!(f.pair.durations(), Durations::from_secs(5, 1));
            assert_eq!(f.pair.phase(), PairPhase::Idle);
            assert_eq!(f.clock.subscriber_count(), 0);
        }

        #[test]
        fn test_update_from_input_reports_both_fields() {
            let mut f = create_pair(5000, 1000);
            let err = f.pair.update_from_input("abc", "0").unwrap_err();
            assert_eq!(err.fields(), &[Field::WorkDelay, Field::BreakDelay]);
            assert_eq!(f.renderer.validation_errors().len(), 2);
        }

        #[test]
        fn test_update_from_input_seconds() {
            let mut f = create_pair(5000, 1000);
            f.pair.update_from_input("90", "30s").unwrap();
            assert_eq!(f.pair.durations(), Durations::from_secs(90, 30));
        }

        #[test]
        fn test_begin_during_break_switches_to_work() {
            let mut f = create_pair(1000, 5000);
            f.pair.begin();
            fire(&mut f);
            assert_eq!(f.pair.phase(), PairPhase::BreakRunning);

            f.pair.begin();

            assert_eq!(f.pair.phase(), PairPhase::WorkRunning);
            assert!(!f.pair.break_timer().is_active());
        }

        #[test]
        fn test_inconsistent_state_is_corrected() {
            let mut f = create_pair(5000, 5000);
            f.pair.begin();
            f.pair.break_timer.set(Duration::from_millis(5000));

            let work_id = f.pair.work_timer().id();
            assert!(f.pair.tick(work_id));

            assert_eq!(f.pair.phase(), PairPhase::Idle);
            assert!(!f.pair.work_timer().is_active());
            assert!(!f.pair.break_timer().is_active());
        }
    }

    // ------------------------------------------------------------------------
    // Presence Tests
    // ------------------------------------------------------------------------

    mod presence_tests {
        use super::*;

        #[test]
        fn test_pause_work_freezes_countdown() {
            let mut f = create_pair(5000, 1000);
            f.pair.begin();
            fire(&mut f);

            assert!(f.pair.pause_work());
            for _ in 0..5 {
                fire(&mut f);
            }
            assert_eq!(f.pair.work_timer().remaining(), Duration::from_millis(4000));

            assert!(f.pair.resume_work());
            fire(&mut f);
            assert_eq!(f.pair.work_timer().remaining(), Duration::from_millis(3000));
        }

        #[test]
        fn test_pause_work_does_not_touch_break() {
            let mut f = create_pair(1000, 5000);
            f.pair.begin();
            fire(&mut f);
            assert_eq!(f.pair.phase(), PairPhase::BreakRunning);

            assert!(!f.pair.pause_work());
            fire(&mut f);

            assert!(f.pair.break_timer().is_running());
            assert_eq!(f.pair.break_timer().remaining(), Duration::from_millis(4000));
        }
    }
}
