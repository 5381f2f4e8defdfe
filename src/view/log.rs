//! Headless views that only report through `tracing`.
//!
//! Used for kiosks driven by another front end and for scripted runs. The
//! loading view has no progress animation here, so its proceed is always
//! available.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PresentationConfig;
use crate::sequencer::{Phase, ProceedSignal};

use super::{MountContext, ViewHost};

/// View host that logs mounts, unmounts and pointer presses.
#[derive(Debug)]
pub struct LogViews {
    config: Arc<PresentationConfig>,
    mounted: Option<(Phase, Option<ProceedSignal>)>,
}

impl LogViews {
    /// Creates a logging host.
    #[must_use]
    pub const fn new(config: Arc<PresentationConfig>) -> Self {
        Self {
            config,
            mounted: None,
        }
    }
}

impl ViewHost for LogViews {
    fn mount(&mut self, ctx: MountContext) {
        let presentation = &self.config.presentation;
        match ctx.phase {
            Phase::Loading => info!(name = %presentation.name, "loading view mounted"),
            Phase::Welcome => info!(
                name = %presentation.name,
                tagline = %presentation.tagline,
                "welcome view mounted"
            ),
            Phase::Showcasing => {
                info!(beats = self.config.showcase.beats.len(), "animation view mounted");
                for beat in &self.config.showcase.beats {
                    debug!(at = ?beat.at, text = %beat.text, "showcase beat scheduled");
                }
            }
            Phase::Redirecting => info!(
                host = %presentation.destination_host(),
                "redirect overlay mounted"
            ),
        }
        self.mounted = Some((ctx.phase, ctx.proceed));
    }

    fn unmount(&mut self, phase: Phase) {
        if self.mounted.as_ref().is_some_and(|(p, _)| *p == phase) {
            self.mounted = None;
            debug!(%phase, "view unmounted");
        }
    }

    fn pointer_down(&mut self, phase: Phase) {
        match &self.mounted {
            Some((mounted, Some(proceed))) if *mounted == phase => {
                debug!(%phase, "pointer press forwarded as proceed");
                proceed.emit();
            }
            _ => debug!(%phase, "pointer press has no effect"),
        }
    }
}
