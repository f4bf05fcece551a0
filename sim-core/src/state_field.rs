//! Double-buffered per-site automaton states.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::{
    config::SeedConfig,
    error::FieldError,
    site_graph::SiteGraph,
    types::{SiteIndex, State},
};

/// Per-site categorical states, with a scratch buffer for the next generation.
///
/// Only `current` is ever visible outside the crate. `next` is written by the
/// stepper during a generation and becomes `current` in a single swap.
#[derive(Debug, Clone)]
pub struct StateField {
    current: Vec<State>,
    next: Vec<State>,
    num_states: State,
}

impl StateField {
    /// Alphabet size needed by [`StateField::seed`]: islands draw from `[2, num_states)`.
    pub const MIN_SEED_STATES: State = 3;

    /// Creates a field of `len` sites, all in state `0`.
    pub fn zeroed(len: usize, num_states: State) -> Self {
        Self {
            current: vec![0; len],
            next: vec![0; len],
            num_states,
        }
    }

    /// Builds a field from explicit states.
    ///
    /// ### Errors
    /// - [`FieldError::TooFewStates`] if `num_states` is `0`.
    /// - [`FieldError::StateOutOfRange`] for the first state `>= num_states`.
    pub fn from_states(states: Vec<State>, num_states: State) -> Result<Self, FieldError> {
        if num_states == 0 {
            return Err(FieldError::TooFewStates {
                min: 1,
                got: num_states,
            });
        }
        if let Some((site, &state)) = states.iter().enumerate().find(|(_, s)| **s >= num_states) {
            return Err(FieldError::StateOutOfRange {
                site,
                state,
                num_states,
            });
        }

        let next = vec![0; states.len()];
        Ok(Self {
            current: states,
            next,
            num_states,
        })
    }

    /// Seeds a fresh field over `graph` with oriented bands and round islands.
    ///
    /// 1. Every site starts at state `0`.
    /// 2. Each band gets a random angle, a random offset in
    ///    `[-0.2 * width, 0.2 * width)` and a random state in `[1, num_states)`.
    ///    Sites whose projection on the band normal, shifted by the offset,
    ///    is within `cfg.band_half_width` take that state.
    /// 3. Each island gets a random center (the canvas grown by
    ///    `cfg.island_overscan`), a random radius in `cfg.island_radius` and a
    ///    random state in `[2, num_states)`. Sites strictly inside take that state.
    ///
    /// Later bands overwrite earlier ones, and islands overwrite bands.
    ///
    /// ### Parameters
    /// - `graph` - Site positions to seed over.
    /// - `canvas` - Canvas size, used for band offsets and island centers.
    /// - `cfg` - Band and island counts and shapes.
    /// - `num_states` - Alphabet size.
    /// - `rng` - The only source of randomness.
    ///
    /// ### Errors
    /// [`FieldError::TooFewStates`] if `num_states < 3`.
    pub fn seed(
        graph: &SiteGraph,
        canvas: Vec2,
        cfg: &SeedConfig,
        num_states: State,
        rng: &mut impl Rng,
    ) -> Result<Self, FieldError> {
        if num_states < Self::MIN_SEED_STATES {
            return Err(FieldError::TooFewStates {
                min: Self::MIN_SEED_STATES,
                got: num_states,
            });
        }

        let mut field = Self::zeroed(graph.len(), num_states);
        let states = &mut field.current;

        let max_offset = canvas.x * 0.2;
        for _ in 0..cfg.band_count {
            let angle = rng.random_range(0.0..TAU);
            let offset = if max_offset.is_finite() && max_offset > 0.0 {
                rng.random_range(-max_offset..max_offset)
            } else {
                0.0
            };
            let band_state = rng.random_range(1..num_states);
            let normal = Vec2::from_angle(angle);

            for (state, s) in states.iter_mut().zip(graph.sites()) {
                if (s.dot(normal) + offset).abs() < cfg.band_half_width {
                    *state = band_state;
                }
            }
        }

        let (min_r, max_r) = cfg.island_radius;
        let lo = Vec2::splat(-cfg.island_overscan);
        let hi = canvas + Vec2::splat(cfg.island_overscan);
        for _ in 0..cfg.island_count {
            let center = Vec2::new(
                sample_span(rng, lo.x, hi.x),
                sample_span(rng, lo.y, hi.y),
            );
            let radius = if min_r.is_finite() && max_r.is_finite() && max_r > min_r {
                rng.random_range(min_r..max_r)
            } else {
                min_r
            };
            let island_state = rng.random_range(2..num_states);

            for (state, s) in states.iter_mut().zip(graph.sites()) {
                if s.distance(center) < radius {
                    *state = island_state;
                }
            }
        }

        debug!(
            sites = graph.len(),
            bands = cfg.band_count,
            islands = cfg.island_count,
            "seeded state field"
        );
        Ok(field)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn num_states(&self) -> State {
        self.num_states
    }

    /// The committed generation.
    pub fn current(&self) -> &[State] {
        &self.current
    }

    #[inline]
    pub fn state(&self, id: SiteIndex) -> State {
        self.current[id]
    }

    /// Number of sites in each state, indexed by state.
    pub fn histogram(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_states as usize];
        for &s in &self.current {
            counts[s as usize] += 1;
        }
        counts
    }

    /// Read-only view of `current` alongside the writable scratch buffer.
    pub(crate) fn buffers_mut(&mut self) -> (&[State], &mut [State]) {
        (&self.current, &mut self.next)
    }

    /// Makes the scratch buffer the committed generation.
    pub(crate) fn commit(&mut self) {
        debug_assert!(
            self.next.iter().all(|&s| s < self.num_states),
            "next generation holds a state outside [0, {})",
            self.num_states
        );
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

/// Uniform in `[lo, hi]`; an inverted or non-finite span collapses to its midpoint.
fn sample_span(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if lo.is_finite() && hi.is_finite() && lo <= hi {
        rng.random_range(lo..=hi)
    } else {
        let mid = (lo + hi) * 0.5;
        if mid.is_finite() { mid } else { 0.0 }
    }
}
