//! Local update rules.
//!
//! Each rule maps a site's current state and its neighbors' current states to
//! the site's next state. Rules only ever read the committed generation, so
//! the order in which sites are visited does not matter.

use crate::{
    site_graph::{NeighborEdge, SiteGraph},
    types::State,
};

/// Exponent applied to neighbor distances by [`Rule::Consensus`].
pub const DISTANCE_EXPONENT: f32 = 1.25;
/// Distances below this are clamped before weighting.
pub const MIN_WEIGHT_DISTANCE: f32 = 1e-3;
/// Contrast ratio above which [`Rule::Contrast`] advances a state.
pub const CONTRAST_FORWARD: f32 = 0.65;
/// Contrast ratio below which [`Rule::Contrast`] rewinds a state.
pub const CONTRAST_BACKWARD: f32 = 0.2;

/// The two interchangeable update rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Rule A: distance-weighted drift with an anti-majority kick.
    Consensus,
    /// Rule B: drift driven by how many neighbors disagree.
    #[default]
    Contrast,
}

impl Rule {
    pub const ALL: [Rule; 2] = [Rule::Consensus, Rule::Contrast];

    /// Single-letter name used in the viewer.
    pub fn label(self) -> &'static str {
        match self {
            Rule::Consensus => "A",
            Rule::Contrast => "B",
        }
    }

    /// Next state of one site.
    #[inline]
    pub fn next_state(
        self,
        state: State,
        neighbors: &[NeighborEdge],
        current: &[State],
        num_states: State,
    ) -> State {
        match self {
            Rule::Consensus => consensus(state, neighbors, current, num_states),
            Rule::Contrast => contrast(state, neighbors, current, num_states),
        }
    }

    /// Computes a whole generation from `current` into `next`.
    ///
    /// ### Panics
    /// Panics if `current`, `next` and `graph` disagree on the site count.
    pub fn apply(self, graph: &SiteGraph, current: &[State], next: &mut [State], num_states: State) {
        assert_eq!(current.len(), graph.len());
        assert_eq!(next.len(), graph.len());

        for (i, out) in next.iter_mut().enumerate() {
            *out = self.next_state(current[i], graph.neighbors(i), current, num_states);
        }
    }

    /// Allocating form of [`Rule::apply`].
    pub fn next_states(self, graph: &SiteGraph, current: &[State], num_states: State) -> Vec<State> {
        let mut next = vec![0; current.len()];
        self.apply(graph, current, &mut next, num_states);
        next
    }
}

/// Rule A.
///
/// The tentative next state adds the floor of the distance-weighted mean
/// neighbor state to the current one, modulo `num_states`. If one state holds
/// at least `neighbors - 1` votes the site is instead pushed to
/// `dominant + 2`, which keeps uniform plateaus from freezing.
fn consensus(state: State, neighbors: &[NeighborEdge], current: &[State], num_states: State) -> State {
    if neighbors.is_empty() {
        return state;
    }

    // Accumulated in f64: the floor below is sensitive to the last ulp.
    let mut weighted = 0.0f64;
    let mut total_w = 0.0f64;
    let mut votes = vec![0usize; num_states as usize];

    for e in neighbors {
        let s = current[e.target];
        debug_assert!(s < num_states, "neighbor state {s} out of range");
        let d = f64::from(e.distance.max(MIN_WEIGHT_DISTANCE));
        let w = 1.0 / d.powf(f64::from(DISTANCE_EXPONENT));
        weighted += w * f64::from(s);
        total_w += w;
        votes[s as usize] += 1;
    }

    // First maximum wins, so ties resolve to the lowest state.
    let mut dominant = 0;
    for (s, &count) in votes.iter().enumerate() {
        if count > votes[dominant] {
            dominant = s;
        }
    }

    let n = num_states as usize;
    if votes[dominant] + 1 >= neighbors.len() {
        return ((dominant + 2) % n) as State;
    }

    let drift = (weighted / total_w).floor() as usize;
    ((state as usize + drift) % n) as State
}

/// Rule B.
///
/// Strictly more than 65% disagreeing neighbors advance the state by one,
/// strictly fewer than 20% rewind it by one, anything else keeps it.
fn contrast(state: State, neighbors: &[NeighborEdge], current: &[State], num_states: State) -> State {
    if neighbors.is_empty() {
        return state;
    }

    let differing = neighbors
        .iter()
        .filter(|e| current[e.target] != state)
        .count();
    let ratio = differing as f32 / neighbors.len() as f32;

    let n = num_states as usize;
    if ratio > CONTRAST_FORWARD {
        ((state as usize + 1) % n) as State
    } else if ratio < CONTRAST_BACKWARD {
        ((state as usize + n - 1) % n) as State
    } else {
        state
    }
}
