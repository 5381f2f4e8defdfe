//! `launchseq` - timed full-screen launch presentation
//!
//! A presentation session walks a fixed path of phases (loading, welcome,
//! showcase, redirect) driven by timers and presenter input, then hands the
//! audience off to a fixed destination URL.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod navigator;
pub mod observability;
pub mod sequencer;
pub mod view;
