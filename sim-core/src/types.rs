/// Identifier for a site in a [`crate::site_graph::SiteGraph`].
///
/// This is an index into `SiteGraph::sites`, and is only meaningful within
/// the lifetime of a given `SiteGraph` instance (until the next reseed).
pub type SiteIndex = usize;

/// Categorical automaton state of a single site.
///
/// Values live in `[0, num_states)`; the alphabet size is carried by
/// [`crate::state_field::StateField`].
pub type State = u8;
