//! Phase sequencing for a launch presentation.
//!
//! A session moves through [`Phase::Loading`], [`Phase::Welcome`],
//! [`Phase::Showcasing`] and [`Phase::Redirecting`], then hands the fixed
//! destination to a [`Navigator`](crate::navigator::Navigator). Each phase
//! owns its timers and listeners through a [`PhaseScope`], which is released
//! before the next phase acquires anything.

pub mod engine;
pub mod phase;
pub mod scope;
pub mod signal;
pub mod state;

pub use engine::{Sequencer, SessionOutcome, Step};
pub use phase::Phase;
pub use scope::{Deadline, KeyListener, PhaseScope};
pub use signal::{Input, KeyCode, ProceedSignal, ProceedSource, SequencerHandle};
pub use state::{PhaseTransition, SequencerState, Trigger};
