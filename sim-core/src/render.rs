//! Read-only per-site view handed to renderers.

use glam::Vec2;

use crate::{
    site_graph::SiteGraph,
    state_field::StateField,
    types::{SiteIndex, State},
};

/// Number of differing neighbors at which a site is accented.
pub const ACCENT_CONTRAST: usize = 5;

/// Tile pattern, picked from a site's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileStyle {
    Solid,
    HorizontalHatch,
    VerticalHatch,
    DiagonalUp,
    DiagonalDown,
    Dots,
    OrientedBand,
    Ring,
    Knockout,
}

impl TileStyle {
    pub const ALL: [TileStyle; 9] = [
        TileStyle::Solid,
        TileStyle::HorizontalHatch,
        TileStyle::VerticalHatch,
        TileStyle::DiagonalUp,
        TileStyle::DiagonalDown,
        TileStyle::Dots,
        TileStyle::OrientedBand,
        TileStyle::Ring,
        TileStyle::Knockout,
    ];

    /// States cycle through the styles.
    pub fn from_state(state: State) -> Self {
        Self::ALL[state as usize % Self::ALL.len()]
    }
}

/// Everything a renderer needs to draw one site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileView {
    pub site: SiteIndex,
    pub pos: Vec2,
    pub radius: f32,
    pub state: State,
    pub accent: bool,
    pub style: TileStyle,
}

/// Whether a site should be drawn with the accent ink.
///
/// True for the highest state, or when at least [`ACCENT_CONTRAST`]
/// neighbors currently hold a different state.
pub fn is_accent(graph: &SiteGraph, field: &StateField, id: SiteIndex) -> bool {
    let state = field.state(id);
    if state + 1 == field.num_states() {
        return true;
    }
    let differing = graph
        .neighbors(id)
        .iter()
        .filter(|e| field.state(e.target) != state)
        .count();
    differing >= ACCENT_CONTRAST
}

/// One [`TileView`] per site, in site order.
pub fn tiles<'a>(
    graph: &'a SiteGraph,
    field: &'a StateField,
) -> impl Iterator<Item = TileView> + 'a {
    (0..graph.len().min(field.len())).map(move |site| {
        let state = field.state(site);
        TileView {
            site,
            pos: graph.position(site),
            radius: graph.radius(site),
            state,
            accent: is_accent(graph, field, site),
            style: TileStyle::from_state(state),
        }
    })
}
