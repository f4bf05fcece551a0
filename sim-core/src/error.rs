//! Error types for the automaton core.

use thiserror::Error;

use crate::types::{SiteIndex, State};

/// Rejected configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("num_states must be at least {min}, got {got}")]
    TooFewStates { min: State, got: State },

    #[error("canvas must have a finite positive size, got {width}x{height}")]
    EmptyCanvas { width: f32, height: f32 },

    #[error("min_distance must be finite and non-negative, got {0}")]
    InvalidMinDistance(f32),

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidLength { name: &'static str, value: f32 },

    #[error("island radius range must be finite with min <= max, got [{min}, {max})")]
    InvalidIslandRadius { min: f32, max: f32 },

    #[error("target_count must be at most {max}, got {got}")]
    TooManySites { max: usize, got: usize },

    #[error("tick_every must be in [{min}, {max}], got {got}")]
    TickOutOfRange { min: u32, max: u32, got: u32 },
}

/// Errors raised when building a [`crate::state_field::StateField`] from explicit states.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("site {site} has state {state}, outside [0, {num_states})")]
    StateOutOfRange {
        site: SiteIndex,
        state: State,
        num_states: State,
    },

    #[error("num_states must be at least {min}, got {got}")]
    TooFewStates { min: State, got: State },
}

/// Errors raised by [`crate::stepper::AutomatonStepper::step`].
///
/// A failed step never commits: the previous generation stays authoritative.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("graph has {sites} sites but the state field has {states}")]
    SizeMismatch { sites: usize, states: usize },
}

/// Errors raised while (re)initializing an [`crate::automaton::Automaton`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Field(#[from] FieldError),
}
