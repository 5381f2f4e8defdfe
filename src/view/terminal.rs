//! Views drawn as text screens.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use crate::config::PresentationConfig;
use crate::sequencer::{Phase, ProceedSignal};

use super::{BEGIN_LABEL, LoadingProgress, MountContext, Screen, ViewHost};

const RULE: &str = "========================================";

/// The view currently on screen and everything it started.
struct ActiveView {
    phase: Phase,
    proceed: Option<ProceedSignal>,
    ready: Arc<AtomicBool>,
    _tasks: DropGuard,
}

/// Renders each phase as a block of text on a writer.
///
/// The loading view animates its progress bar and the showcase reveals its
/// beats from background tasks; both stop when the view is unmounted.
pub struct TerminalViews {
    config: Arc<PresentationConfig>,
    screen: Screen,
    active: Option<ActiveView>,
}

impl TerminalViews {
    /// Creates a host drawing to `writer`.
    #[must_use]
    pub fn new(config: Arc<PresentationConfig>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            config,
            screen: Screen::new(writer),
            active: None,
        }
    }

    /// Creates a host drawing to stdout.
    #[must_use]
    pub fn stdout(config: Arc<PresentationConfig>) -> Self {
        Self::new(config, Box::new(std::io::stdout()))
    }

    fn show_loading(&self, token: CancellationToken, ready: Arc<AtomicBool>) {
        let screen = self.screen.clone();
        let name = self.config.presentation.name.clone();
        let step = self.config.loading.progress_step;
        let interval = self.config.loading.progress_interval;

        screen.line(RULE);
        screen.line(&format!("  {name}"));
        screen.line(RULE);

        let mut progress = LoadingProgress::new(step);
        screen.overwrite(&format!("  {} {:>3}%", progress.bar(), progress.percent()));
        if interval.is_zero() || step == 0 {
            return;
        }

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = token.cancelled() => return,
                    _ = ticks.tick() => {}
                }
                let percent = progress.advance();
                screen.overwrite(&format!("  {} {percent:>3}%", progress.bar()));
                if progress.is_complete() {
                    screen.line("");
                    screen.line(&format!("  [ {BEGIN_LABEL} ]"));
                    ready.store(true, Ordering::SeqCst);
                    return;
                }
            }
        });
    }

    fn show_welcome(&self) {
        let presentation = &self.config.presentation;
        let keys: Vec<&str> = self
            .config
            .input
            .proceed_keys
            .iter()
            .map(|k| k.as_str())
            .collect();
        self.screen.line(RULE);
        self.screen.line(&format!("  {}", presentation.name));
        self.screen.line(&format!("  {}", presentation.tagline));
        self.screen.line("");
        self.screen.line(&format!(
            "  Press {} or tap anywhere to begin",
            keys.join(" / ").to_uppercase()
        ));
        self.screen.line(RULE);
    }

    fn show_showcase(&self, token: CancellationToken) {
        let screen = self.screen.clone();
        let beats = self.config.showcase.beats.clone();
        let started = Instant::now();
        tokio::spawn(async move {
            for beat in beats {
                tokio::select! {
                    () = token.cancelled() => return,
                    () = tokio::time::sleep_until(started + beat.at) => {}
                }
                screen.line(&format!("  {}", beat.text));
            }
        });
    }

    fn show_redirect(&self) {
        let host = self.config.presentation.destination_host().to_uppercase();
        self.screen.line(RULE);
        self.screen.line(&format!("  LAUNCHING {host}"));
        self.screen
            .line(&format!("  Opening {}", self.config.presentation.destination_url));
        self.screen.line(RULE);
    }
}

impl ViewHost for TerminalViews {
    fn mount(&mut self, ctx: MountContext) {
        self.active = None;
        let token = CancellationToken::new();
        let ready = Arc::new(AtomicBool::new(ctx.phase != Phase::Loading));

        match ctx.phase {
            Phase::Loading => self.show_loading(token.clone(), Arc::clone(&ready)),
            Phase::Welcome => self.show_welcome(),
            Phase::Showcasing => self.show_showcase(token.clone()),
            Phase::Redirecting => self.show_redirect(),
        }
        debug!(phase = %ctx.phase, epoch = ctx.epoch, "terminal view mounted");

        self.active = Some(ActiveView {
            phase: ctx.phase,
            proceed: ctx.proceed,
            ready,
            _tasks: token.drop_guard(),
        });
    }

    fn unmount(&mut self, phase: Phase) {
        if self.active.as_ref().is_some_and(|v| v.phase == phase) {
            self.active = None;
            self.screen.line("");
            debug!(%phase, "terminal view unmounted");
        }
    }

    fn pointer_down(&mut self, phase: Phase) {
        let Some(view) = self.active.as_ref().filter(|v| v.phase == phase) else {
            return;
        };
        if !view.ready.load(Ordering::SeqCst) {
            debug!(%phase, "pointer ignored, view not ready");
            return;
        }
        if let Some(proceed) = &view.proceed {
            proceed.emit();
        }
    }
}

impl std::fmt::Debug for TerminalViews {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalViews")
            .field("active", &self.active.as_ref().map(|v| v.phase))
            .finish_non_exhaustive()
    }
}
