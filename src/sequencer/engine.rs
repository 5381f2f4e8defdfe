//! The presentation sequencer.
//!
//! One [`Sequencer`] drives one session along
//! `Loading → Welcome → Showcasing → Redirecting` and then navigates away.
//! All state changes happen in `&mut self` methods called from a single
//! task; timers and views only send messages back through channels.
//!
//! Entering a phase is one synchronous step: release the previous phase's
//! scope, unmount its view, open a scope for the new phase, arm its timer,
//! attach its key listener, and mount its view. Anything still in flight
//! from the old phase carries the old epoch and is dropped on arrival.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PresentationConfig;
use crate::navigator::Navigator;
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics;
use crate::view::{MountContext, ViewHost};

use super::phase::Phase;
use super::scope::{Deadline, PhaseScope};
use super::signal::{Input, ProceedSignal, SequencerHandle};
use super::state::{PhaseTransition, SequencerState, Trigger};

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The navigator was asked to open the destination.
    Navigated {
        /// Destination URL
        url: String,
    },
    /// The session was torn down before navigating.
    Abandoned {
        /// Phase active at teardown
        phase: Phase,
    },
}

impl std::fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Navigated { url } => write!(f, "navigated to {url}"),
            Self::Abandoned { phase } => write!(f, "abandoned during {phase}"),
        }
    }
}

/// Result of one [`Sequencer::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The session is still live; carries the transition applied, if any.
    Continue(Option<PhaseTransition>),
    /// The session is over.
    Finished(SessionOutcome),
}

/// Drives one presentation session.
pub struct Sequencer {
    config: Arc<PresentationConfig>,
    state: SequencerState,
    scope: Option<PhaseScope>,
    views: Box<dyn ViewHost>,
    mounted: Option<Phase>,
    navigator: Arc<dyn Navigator>,
    events: Arc<EventEmitter>,
    input_tx: mpsc::UnboundedSender<Input>,
    input_rx: mpsc::UnboundedReceiver<Input>,
    deadline_tx: mpsc::UnboundedSender<Deadline>,
    deadline_rx: mpsc::UnboundedReceiver<Deadline>,
    started_at: Option<Instant>,
    outcome: Option<SessionOutcome>,
}

impl Sequencer {
    /// Creates a sequencer positioned before `Loading`.
    ///
    /// Nothing is mounted or armed until [`start`](Self::start).
    #[must_use]
    pub fn new(
        config: Arc<PresentationConfig>,
        views: Box<dyn ViewHost>,
        navigator: Arc<dyn Navigator>,
        events: Arc<EventEmitter>,
    ) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (deadline_tx, deadline_rx) = mpsc::unbounded_channel();
        Self {
            config,
            state: SequencerState::new(),
            scope: None,
            views,
            mounted: None,
            navigator,
            events,
            input_tx,
            input_rx,
            deadline_tx,
            deadline_rx,
            started_at: None,
            outcome: None,
        }
    }

    /// Returns a sender for keys and pointer presses.
    #[must_use]
    pub fn handle(&self) -> SequencerHandle {
        SequencerHandle::new(self.input_tx.clone())
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Epoch of the active phase instance, `0` before start.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.state.epoch()
    }

    /// Timers armed by the active phase that have not fired yet.
    #[must_use]
    pub fn armed_timers(&self) -> usize {
        self.scope.as_ref().map_or(0, PhaseScope::armed_timers)
    }

    /// Whether designated keys are currently listened for.
    #[must_use]
    pub fn is_listening_for_keys(&self) -> bool {
        self.scope
            .as_ref()
            .is_some_and(|s| s.key_listener().is_some())
    }

    /// Whether the session has navigated away or been torn down.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Outcome of a finished session.
    #[must_use]
    pub const fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    /// Identifier stamped on this session's events.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.events.session_id()
    }

    /// Enters `Loading`. Calling it again has no effect.
    pub fn start(&mut self) -> Option<PhaseTransition> {
        if !self.state.begin() {
            return None;
        }
        self.started_at = Some(Instant::now());
        info!(
            session_id = %self.session_id(),
            destination = %self.config.presentation.destination_url,
            "presentation session started"
        );
        self.events.emit(&Event::SessionStarted {
            timestamp: Utc::now(),
            session_id: self.session_id(),
            destination_url: self.config.presentation.destination_url.clone(),
        });
        Some(self.enter(None, Trigger::SessionStart))
    }

    /// Applies one input.
    ///
    /// Returns the transition it caused, or `None` if it was ignored or
    /// only routed to the mounted view.
    pub fn dispatch(&mut self, input: Input) -> Option<PhaseTransition> {
        if !self.state.is_started() || self.state.is_completed() {
            return self.ignore(&input, "session is not running");
        }
        let phase = self.state.phase();

        match input {
            Input::Key(code) => {
                let accepted = self
                    .scope
                    .as_ref()
                    .and_then(PhaseScope::key_listener)
                    .map(|listener| listener.matches(&code));
                match accepted {
                    Some(true) => {
                        metrics::record_input("key", true);
                        self.advance(Trigger::Key(code))
                    }
                    Some(false) => self.ignore(&Input::Key(code), "not a designated key"),
                    None => self.ignore(&Input::Key(code), "no key listener in this phase"),
                }
            }
            Input::Pointer => {
                debug!(%phase, "routing pointer press to mounted view");
                metrics::record_input("pointer", true);
                self.views.pointer_down(phase);
                None
            }
            Input::Proceed { source, epoch } => {
                if epoch != self.state.epoch() {
                    return self.ignore(&input, "stale proceed signal");
                }
                if phase.proceed_source() != Some(source) {
                    return self.ignore(&input, "source does not belong to the active phase");
                }
                metrics::record_input("proceed", true);
                self.advance(Trigger::Proceed(source))
            }
        }
    }

    /// Waits for the next deadline or input and applies it.
    ///
    /// Starts the session first if needed. Deadlines are handled before
    /// inputs that are ready at the same time. Cancel safe.
    pub async fn step(&mut self) -> Step {
        if let Some(outcome) = &self.outcome {
            return Step::Finished(outcome.clone());
        }
        if !self.state.is_started() {
            return Step::Continue(self.start());
        }
        tokio::select! {
            biased;
            Some(deadline) = self.deadline_rx.recv() => self.on_deadline(deadline),
            Some(input) = self.input_rx.recv() => Step::Continue(self.dispatch(input)),
            else => Step::Continue(None),
        }
    }

    /// Runs the session until it navigates or `shutdown` is cancelled.
    pub async fn run(&mut self, shutdown: CancellationToken) -> SessionOutcome {
        self.start();
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    info!(phase = %self.state.phase(), "shutdown requested");
                    return self.teardown();
                }
                step = self.step() => {
                    if let Step::Finished(outcome) = step {
                        return outcome;
                    }
                }
            }
        }
    }

    /// Ends the session where it stands.
    ///
    /// Cancels pending timers, releases the key listener and unmounts the
    /// active view. Returns the existing outcome if already finished.
    pub fn teardown(&mut self) -> SessionOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        let phase = self.state.phase();
        self.release_scope();
        self.unmount_view();
        info!(%phase, "presentation session torn down");
        self.finish(SessionOutcome::Abandoned { phase })
    }

    fn on_deadline(&mut self, deadline: Deadline) -> Step {
        if self.state.is_completed()
            || deadline.epoch != self.state.epoch()
            || deadline.phase != self.state.phase()
        {
            debug!(
                phase = %deadline.phase,
                epoch = deadline.epoch,
                current_epoch = self.state.epoch(),
                "dropping stale deadline"
            );
            return Step::Continue(None);
        }
        if deadline.phase == Phase::Redirecting {
            return Step::Finished(self.navigate());
        }
        Step::Continue(self.advance(Trigger::DelayElapsed(deadline.delay)))
    }

    fn advance(&mut self, trigger: Trigger) -> Option<PhaseTransition> {
        let from = self.state.phase();
        let to = from.next()?;
        if !self.state.try_advance(from, to) {
            return None;
        }
        Some(self.enter(Some(from), trigger))
    }

    /// Swaps the old phase's resources for the current phase's.
    fn enter(&mut self, from: Option<Phase>, trigger: Trigger) -> PhaseTransition {
        self.release_scope();
        self.unmount_view();

        let phase = self.state.phase();
        let epoch = self.state.epoch();
        let mut scope = PhaseScope::open(phase, epoch);

        if let Some(delay) = phase.delay(&self.config.timings) {
            scope.arm(
                self.state.phase_entered_at() + delay,
                delay,
                self.deadline_tx.clone(),
            );
            metrics::record_timer_armed(phase);
            self.events.emit(&Event::TimerArmed {
                timestamp: Utc::now(),
                phase,
                delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            });
        }
        if phase.listens_for_keys() {
            scope.listen_for_keys(&self.config.input.proceed_keys);
        }
        self.scope = Some(scope);

        let proceed = phase
            .proceed_source()
            .map(|source| ProceedSignal::new(source, epoch, self.input_tx.clone()));
        self.views.mount(MountContext {
            phase,
            epoch,
            proceed,
        });
        self.mounted = Some(phase);

        info!(from = ?from, to = %phase, epoch, trigger = %trigger, "phase entered");
        metrics::record_phase_transition(from, phase, trigger.label());
        metrics::set_current_phase(phase, from);
        self.events.emit(&Event::PhaseEntered {
            timestamp: Utc::now(),
            phase,
            phase_index: phase.index(),
            epoch,
            from,
            trigger: trigger.to_string(),
        });

        PhaseTransition {
            from,
            to: phase,
            trigger,
            epoch,
        }
    }

    fn navigate(&mut self) -> SessionOutcome {
        let url = self.config.presentation.destination_url.clone();
        self.release_scope();

        let success = match self.navigator.redirect(&url) {
            Ok(()) => {
                info!(%url, "navigated to destination");
                true
            }
            Err(e) => {
                warn!(%url, error = %e, "navigation failed");
                false
            }
        };
        metrics::record_redirect(success);
        self.events.emit(&Event::NavigationIssued {
            timestamp: Utc::now(),
            url: url.clone(),
            success,
        });

        self.unmount_view();
        self.finish(SessionOutcome::Navigated { url })
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionOutcome {
        self.state.complete();
        metrics::clear_current_phase(self.state.phase());
        let elapsed = self
            .started_at
            .map(|t| t.elapsed())
            .unwrap_or_default();
        metrics::record_session_duration(elapsed);
        self.events.emit(&Event::SessionEnded {
            timestamp: Utc::now(),
            outcome: outcome.clone(),
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn release_scope(&mut self) {
        let Some(scope) = self.scope.take() else {
            return;
        };
        let phase = scope.phase();
        let cancelled = scope.release();
        if cancelled > 0 {
            debug!(%phase, cancelled, "cancelled pending phase timers");
            metrics::record_timers_cancelled(phase, cancelled);
            self.events.emit(&Event::TimersCancelled {
                timestamp: Utc::now(),
                phase,
                count: cancelled,
            });
        }
    }

    fn unmount_view(&mut self) {
        if let Some(phase) = self.mounted.take() {
            self.views.unmount(phase);
        }
    }

    fn ignore(&self, input: &Input, reason: &str) -> Option<PhaseTransition> {
        let phase = self.state.phase();
        debug!(%phase, %input, reason, "input ignored");
        metrics::record_input(input.kind(), false);
        self.events.emit(&Event::InputIgnored {
            timestamp: Utc::now(),
            phase,
            input: input.to_string(),
            reason: reason.to_owned(),
        });
        None
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        if self.state.is_started() && self.outcome.is_none() {
            self.teardown();
        }
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("phase", &self.state.phase())
            .field("epoch", &self.state.epoch())
            .field("scope", &self.scope)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::error::NavigationError;
    use crate::sequencer::{KeyCode, ProceedSource};

    #[derive(Clone, Default)]
    struct RecordingViews {
        calls: Arc<Mutex<Vec<String>>>,
        proceed: Arc<Mutex<Option<(Phase, ProceedSignal)>>>,
    }

    impl RecordingViews {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ViewHost for RecordingViews {
        fn mount(&mut self, ctx: MountContext) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("mount {}", ctx.phase));
            *self.proceed.lock().unwrap() = ctx.proceed.map(|p| (ctx.phase, p));
        }

        fn unmount(&mut self, phase: Phase) {
            self.calls.lock().unwrap().push(format!("unmount {phase}"));
        }

        fn pointer_down(&mut self, phase: Phase) {
            if let Some((mounted, proceed)) = self.proceed.lock().unwrap().as_ref() {
                if *mounted == phase {
                    proceed.emit();
                }
            }
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        urls: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&self, url: &str) -> Result<(), NavigationError> {
            self.urls.lock().unwrap().push(url.to_owned());
            Ok(())
        }
    }

    struct FailingNavigator;

    impl Navigator for FailingNavigator {
        fn redirect(&self, _url: &str) -> Result<(), NavigationError> {
            Err(NavigationError::Io(std::io::Error::other("no display")))
        }
    }

    fn sequencer() -> (Sequencer, RecordingViews, Arc<RecordingNavigator>) {
        let views = RecordingViews::default();
        let navigator = Arc::new(RecordingNavigator::default());
        let seq = Sequencer::new(
            Arc::new(PresentationConfig::default()),
            Box::new(views.clone()),
            Arc::clone(&navigator) as Arc<dyn Navigator>,
            Arc::new(EventEmitter::noop()),
        );
        (seq, views, navigator)
    }

    async fn reach_welcome(seq: &mut Sequencer) {
        seq.start();
        let step = seq.step().await;
        assert!(matches!(step, Step::Continue(Some(ref t)) if t.to == Phase::Welcome));
    }

    fn enter() -> Input {
        Input::Key(KeyCode::new("Enter"))
    }

    #[tokio::test(start_paused = true)]
    async fn start_mounts_loading_and_arms_one_timer() {
        let (mut seq, views, _) = sequencer();
        assert_eq!(seq.epoch(), 0);
        let transition = seq.start().unwrap();
        assert_eq!(transition.from, None);
        assert_eq!(transition.to, Phase::Loading);
        assert_eq!(transition.trigger, Trigger::SessionStart);
        assert_eq!(seq.armed_timers(), 1);
        assert!(!seq.is_listening_for_keys());
        assert_eq!(views.calls(), ["mount loading"]);

        assert!(seq.start().is_none());
        assert_eq!(seq.armed_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_advances_after_exactly_three_seconds() {
        let (mut seq, views, _) = sequencer();
        seq.start();
        let started = Instant::now();

        let step = seq.step().await;

        assert_eq!(started.elapsed(), Duration::from_millis(3000));
        let Step::Continue(Some(transition)) = step else {
            panic!("expected a transition, got {step:?}");
        };
        assert_eq!(transition.from, Some(Phase::Loading));
        assert_eq!(transition.to, Phase::Welcome);
        assert_eq!(
            transition.trigger,
            Trigger::DelayElapsed(Duration::from_millis(3000))
        );
        assert_eq!(seq.armed_timers(), 0);
        assert!(seq.is_listening_for_keys());
        assert_eq!(
            views.calls(),
            ["mount loading", "unmount loading", "mount welcome"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn early_proceed_cancels_loading_timer() {
        let (mut seq, _, _) = sequencer();
        seq.start();
        let started = Instant::now();

        assert!(seq.dispatch(Input::Pointer).is_none());
        let step = seq.step().await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(matches!(
            step,
            Step::Continue(Some(PhaseTransition {
                to: Phase::Welcome,
                trigger: Trigger::Proceed(ProceedSource::LoadingView),
                ..
            }))
        ));
        assert_eq!(seq.armed_timers(), 0);

        // The loading timer must not fire into Welcome later
        let waited = tokio::time::timeout(Duration::from_secs(10), seq.step()).await;
        assert!(waited.is_err());
        assert_eq!(seq.phase(), Phase::Welcome);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_ignored_outside_welcome() {
        let (mut seq, _, _) = sequencer();
        seq.start();
        assert!(seq.dispatch(enter()).is_none());
        assert!(seq.dispatch(Input::Key(KeyCode::new("Space"))).is_none());
        assert_eq!(seq.phase(), Phase::Loading);

        let mut step = tokio_test::task::spawn(seq.step());
        tokio_test::assert_pending!(step.poll());
        drop(step);
        assert_eq!(seq.armed_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn enter_in_welcome_starts_showcase_with_one_timer() {
        let (mut seq, _, _) = sequencer();
        reach_welcome(&mut seq).await;

        let transition = seq.dispatch(enter()).unwrap();
        assert_eq!(transition.to, Phase::Showcasing);
        assert_eq!(transition.trigger, Trigger::Key(KeyCode::new("Enter")));
        assert_eq!(seq.armed_timers(), 1);
        assert!(!seq.is_listening_for_keys());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_triggers_in_welcome_fire_once() {
        let (mut seq, _, _) = sequencer();
        reach_welcome(&mut seq).await;

        assert!(seq.dispatch(enter()).is_some());
        assert!(seq.dispatch(enter()).is_none());
        assert!(seq.dispatch(Input::Key(KeyCode::new("Space"))).is_none());
        assert_eq!(seq.phase(), Phase::Showcasing);
        assert_eq!(seq.armed_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn undesignated_key_is_ignored_in_welcome() {
        let (mut seq, _, _) = sequencer();
        reach_welcome(&mut seq).await;
        assert!(seq.dispatch(Input::Key(KeyCode::new("Escape"))).is_none());
        assert_eq!(seq.phase(), Phase::Welcome);
        assert!(seq.is_listening_for_keys());
    }

    #[tokio::test(start_paused = true)]
    async fn touch_in_welcome_starts_showcase() {
        let (mut seq, _, _) = sequencer();
        reach_welcome(&mut seq).await;

        seq.dispatch(Input::Pointer);
        seq.dispatch(Input::Pointer);
        let step = seq.step().await;
        assert!(matches!(
            step,
            Step::Continue(Some(PhaseTransition {
                to: Phase::Showcasing,
                ..
            }))
        ));
        // Second press carried the Welcome epoch and is now stale
        let step = seq.step().await;
        assert_eq!(step, Step::Continue(None));
        assert_eq!(seq.phase(), Phase::Showcasing);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_or_foreign_proceed_is_ignored() {
        let (mut seq, _, _) = sequencer();
        reach_welcome(&mut seq).await;
        assert_eq!(seq.epoch(), 2);

        let stale = Input::Proceed {
            source: ProceedSource::WelcomeView,
            epoch: 1,
        };
        let foreign = Input::Proceed {
            source: ProceedSource::LoadingView,
            epoch: 2,
        };
        assert!(seq.dispatch(stale).is_none());
        assert!(seq.dispatch(foreign).is_none());
        assert_eq!(seq.phase(), Phase::Welcome);

        let current = Input::Proceed {
            source: ProceedSource::WelcomeView,
            epoch: 2,
        };
        assert!(seq.dispatch(current).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_deadline_is_dropped() {
        let (mut seq, _, _) = sequencer();
        reach_welcome(&mut seq).await;
        let step = seq.on_deadline(Deadline {
            phase: Phase::Loading,
            epoch: 1,
            delay: Duration::from_millis(3000),
        });
        assert_eq!(step, Step::Continue(None));
        assert_eq!(seq.phase(), Phase::Welcome);
    }

    #[tokio::test(start_paused = true)]
    async fn enter_during_showcase_changes_nothing() {
        let (mut seq, _, _) = sequencer();
        reach_welcome(&mut seq).await;
        seq.dispatch(enter());

        assert!(seq.dispatch(enter()).is_none());
        assert_eq!(seq.phase(), Phase::Showcasing);
        assert_eq!(seq.armed_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn showcase_then_redirect_navigates_once() {
        let (mut seq, views, navigator) = sequencer();
        reach_welcome(&mut seq).await;
        seq.dispatch(enter());

        let showcase_started = Instant::now();
        let step = seq.step().await;
        assert_eq!(showcase_started.elapsed(), Duration::from_millis(15_000));
        assert!(matches!(
            step,
            Step::Continue(Some(PhaseTransition {
                to: Phase::Redirecting,
                ..
            }))
        ));
        assert!(navigator.urls.lock().unwrap().is_empty());

        let redirect_started = Instant::now();
        let step = seq.step().await;
        assert_eq!(redirect_started.elapsed(), Duration::from_millis(2000));
        assert_eq!(
            step,
            Step::Finished(SessionOutcome::Navigated {
                url: "https://greenthicks.live".to_owned()
            })
        );
        assert_eq!(
            *navigator.urls.lock().unwrap(),
            ["https://greenthicks.live"]
        );
        assert!(seq.is_completed());
        assert_eq!(seq.armed_timers(), 0);
        assert_eq!(views.calls().last().unwrap(), "unmount redirecting");

        // Finished sessions stay finished
        assert!(matches!(seq.step().await, Step::Finished(_)));
        assert_eq!(navigator.urls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_failure_still_ends_session() {
        let mut seq = Sequencer::new(
            Arc::new(PresentationConfig::default()),
            Box::new(RecordingViews::default()),
            Arc::new(FailingNavigator),
            Arc::new(EventEmitter::noop()),
        );
        reach_welcome(&mut seq).await;
        seq.dispatch(enter());
        seq.step().await;
        let step = seq.step().await;
        assert!(matches!(step, Step::Finished(SessionOutcome::Navigated { .. })));
        assert!(seq.is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_timer_and_unmounts() {
        let (mut seq, views, navigator) = sequencer();
        seq.start();
        assert_eq!(seq.armed_timers(), 1);

        let outcome = seq.teardown();
        assert_eq!(
            outcome,
            SessionOutcome::Abandoned {
                phase: Phase::Loading
            }
        );
        assert_eq!(seq.armed_timers(), 0);
        assert!(seq.is_completed());
        assert_eq!(views.calls(), ["mount loading", "unmount loading"]);

        assert!(seq.dispatch(Input::Pointer).is_none());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(matches!(seq.step().await, Step::Finished(_)));
        assert!(navigator.urls.lock().unwrap().is_empty());
        assert_eq!(seq.teardown(), outcome);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_sequencer_unmounts_view() {
        let (mut seq, views, _) = sequencer();
        seq.start();
        drop(seq);
        assert_eq!(views.calls(), ["mount loading", "unmount loading"]);
    }

    #[tokio::test(start_paused = true)]
    async fn run_completes_full_session() {
        let (mut seq, _, navigator) = sequencer();
        let handle = seq.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            handle.key("Enter");
        });

        let started = Instant::now();
        let outcome = seq.run(CancellationToken::new()).await;

        assert_eq!(
            outcome,
            SessionOutcome::Navigated {
                url: "https://greenthicks.live".to_owned()
            }
        );
        assert_eq!(started.elapsed(), Duration::from_millis(3500 + 15_000 + 2000));
        assert_eq!(navigator.urls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let (mut seq, _, navigator) = sequencer();
        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let outcome = seq.run(shutdown).await;
        assert_eq!(
            outcome,
            SessionOutcome::Abandoned {
                phase: Phase::Loading
            }
        );
        assert!(navigator.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(SessionOutcome::Abandoned {
            phase: Phase::Welcome,
        })
        .unwrap();
        assert_eq!(json["status"], "abandoned");
        assert_eq!(json["phase"], "welcome");
    }
}
