//! Cellular automaton over an irregular 2-D neighbor graph.
//!
//! Main components:
//! - [`site_graph`] — min-distance site sampling and k-nearest-neighbor graph.
//! - [`state_field`] — double-buffered categorical states and band/island seeding.
//! - [`rules`] — the two local update rules.
//! - [`stepper`] — whole-generation stepping with a single commit point.
//! - [`automaton`] — driver-owned run state: cadence, pause, reseed.
//! - [`render`] — per-site views for renderers (radius, accent, tile style).
//! - [`config`] — configuration for sampling, seeding and stepping.
//! - [`error`] — error types.
//! - [`types`] — shared type aliases and IDs.

pub mod automaton;
pub mod config;
pub mod error;
pub mod render;
pub mod rules;
pub mod site_graph;
pub mod state_field;
pub mod stepper;
pub mod types;
