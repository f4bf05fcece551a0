//! Irregular site layout and its k-nearest-neighbor graph.

use glam::Vec2;
use rand::Rng;
use tracing::{debug, warn};

use crate::{
    config::{GraphConfig, MAX_SITES},
    types::SiteIndex,
};

/// Fraction of the nearest-neighbor distance used as a site's tile radius.
pub const RADIUS_FACTOR: f32 = 0.48;

/// Directed edge from a site to one of its nearest neighbors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborEdge {
    pub target: SiteIndex,
    pub distance: f32,
}

/// Fixed set of sites plus, for each site, its nearest neighbors and tile radius.
///
/// All three arrays are indexed by [`SiteIndex`] and never change after
/// construction; a reseed builds a new graph.
#[derive(Debug, Clone)]
pub struct SiteGraph {
    sites: Vec<Vec2>,
    neighbors: Vec<Vec<NeighborEdge>>,
    radii: Vec<f32>,
}

impl SiteGraph {
    /// Samples sites under `cfg.min_distance` and links each to its `cfg.k`
    /// nearest neighbors.
    ///
    /// Sampling is dart throwing with a budget of `2 * cfg.target_count`
    /// attempts, so a crowded canvas yields fewer sites than requested.
    /// Always read back [`SiteGraph::len`].
    pub fn construct(cfg: &GraphConfig, rng: &mut impl Rng) -> Self {
        let sites = Self::sample_sites(cfg, rng);

        if sites.len() < cfg.target_count {
            warn!(
                requested = cfg.target_count,
                realized = sites.len(),
                min_distance = cfg.min_distance,
                "site packing saturated before reaching the requested count"
            );
        } else {
            debug!(realized = sites.len(), "sampled sites");
        }

        Self::from_sites(sites, cfg.k, cfg.min_distance)
    }

    /// Builds the neighbor graph for explicit site positions.
    ///
    /// This is O(N²) in the number of sites: every pair is measured and
    /// every list is fully sorted. Fine for a few hundred sites; a spatial
    /// index would be needed for much larger layouts.
    ///
    /// `fallback_distance` sets the radius of a site that has no other site
    /// to measure against.
    pub fn from_sites(sites: Vec<Vec2>, k: usize, fallback_distance: f32) -> Self {
        let n = sites.len();
        let mut neighbors = Vec::with_capacity(n);
        let mut radii = Vec::with_capacity(n);

        for (i, &p) in sites.iter().enumerate() {
            let mut dist_list: Vec<NeighborEdge> = sites
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, &q)| NeighborEdge {
                    target: j,
                    distance: (q - p).length(),
                })
                .collect();

            // Stable sort: equal distances keep ascending index order.
            dist_list.sort_by(|a, b| a.distance.total_cmp(&b.distance));

            let nearest = dist_list
                .first()
                .map_or(fallback_distance, |e| e.distance);
            radii.push(nearest * RADIUS_FACTOR);

            dist_list.truncate(k);
            neighbors.push(dist_list);
        }

        Self {
            sites,
            neighbors,
            radii,
        }
    }

    fn sample_sites(cfg: &GraphConfig, rng: &mut impl Rng) -> Vec<Vec2> {
        let lo = Vec2::splat(cfg.margin);
        let hi = cfg.canvas - Vec2::splat(cfg.margin);
        // Written so that NaN bounds also bail out.
        if !(lo.is_finite() && hi.is_finite() && hi.x >= lo.x && hi.y >= lo.y) {
            warn!(canvas = ?cfg.canvas, margin = cfg.margin, "no room left inside the margins");
            return Vec::new();
        }

        let min_d2 = cfg.min_distance * cfg.min_distance;
        let max_attempts = cfg.target_count.saturating_mul(2);
        let mut sites: Vec<Vec2> = Vec::with_capacity(cfg.target_count.min(MAX_SITES));

        let mut attempts = 0;
        while sites.len() < cfg.target_count && attempts < max_attempts {
            let candidate = Vec2::new(
                rng.random_range(lo.x..=hi.x),
                rng.random_range(lo.y..=hi.y),
            );
            if sites
                .iter()
                .all(|s| (*s - candidate).length_squared() >= min_d2)
            {
                sites.push(candidate);
            }
            attempts += 1;
        }

        sites
    }

    /// Number of realized sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &[Vec2] {
        &self.sites
    }

    #[inline]
    pub fn position(&self, id: SiteIndex) -> Vec2 {
        self.sites[id]
    }

    /// Neighbors of `id`, nearest first.
    #[inline]
    pub fn neighbors(&self, id: SiteIndex) -> &[NeighborEdge] {
        &self.neighbors[id]
    }

    #[inline]
    pub fn radius(&self, id: SiteIndex) -> f32 {
        self.radii[id]
    }

    /// Returns the site closest to `pos` and the squared distance to it.
    pub fn find_nearest_site(&self, pos: Vec2) -> Option<(SiteIndex, f32)> {
        let mut best = None;
        let mut best_d2 = f32::MAX;
        for (id, s) in self.sites.iter().enumerate() {
            let d2 = (*s - pos).length_squared();
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(id);
            }
        }
        best.map(|id| (id, best_d2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn small_cfg() -> GraphConfig {
        GraphConfig {
            canvas: Vec2::new(300.0, 300.0),
            target_count: 80,
            min_distance: 24.0,
            k: 6,
            margin: 10.0,
        }
    }

    #[test]
    fn construct_respects_count_and_min_distance_over_many_seeds() {
        let cfg = small_cfg();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let graph = SiteGraph::construct(&cfg, &mut rng);

            assert!(graph.len() <= cfg.target_count);
            assert!(!graph.is_empty());

            let sites = graph.sites();
            for i in 0..sites.len() {
                for j in (i + 1)..sites.len() {
                    let d = (sites[i] - sites[j]).length();
                    assert!(
                        d >= cfg.min_distance,
                        "seed {seed}: sites {i} and {j} are {d} apart"
                    );
                }
            }
        }
    }

    #[test]
    fn sites_stay_inside_margins() {
        let cfg = small_cfg();
        let mut rng = StdRng::seed_from_u64(7);
        let graph = SiteGraph::construct(&cfg, &mut rng);

        for s in graph.sites() {
            assert!(s.x >= cfg.margin && s.x <= cfg.canvas.x - cfg.margin);
            assert!(s.y >= cfg.margin && s.y <= cfg.canvas.y - cfg.margin);
        }
    }

    #[test]
    fn neighbor_lists_are_sorted_sized_and_exclude_self() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut cfg = small_cfg();
            cfg.target_count = 12;
            cfg.k = 6 + (seed as usize % 10);
            let graph = SiteGraph::construct(&cfg, &mut rng);
            let n = graph.len();

            for i in 0..n {
                let edges = graph.neighbors(i);
                assert_eq!(edges.len(), cfg.k.min(n.saturating_sub(1)));
                assert!(edges.iter().all(|e| e.target != i && e.target < n));
                assert!(edges.windows(2).all(|w| w[0].distance <= w[1].distance));
            }
        }
    }

    #[test]
    fn from_sites_computes_distances_and_radius() {
        let graph = SiteGraph::from_sites(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(0.0, 30.0),
            ],
            1,
            24.0,
        );

        assert_eq!(
            graph.neighbors(0),
            &[NeighborEdge {
                target: 1,
                distance: 10.0
            }]
        );
        assert_eq!(graph.neighbors(2)[0].target, 0);
        assert_eq!(graph.radius(0), 10.0 * RADIUS_FACTOR);
        assert_eq!(graph.radius(2), 30.0 * RADIUS_FACTOR);
    }

    #[test]
    fn equal_distances_keep_index_order() {
        let graph = SiteGraph::from_sites(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(5.0, 0.0),
                Vec2::new(-5.0, 0.0),
                Vec2::new(0.0, 5.0),
            ],
            3,
            1.0,
        );
        let targets: Vec<SiteIndex> = graph.neighbors(0).iter().map(|e| e.target).collect();
        assert_eq!(targets, vec![1, 2, 3]);
    }

    #[test]
    fn zero_k_still_derives_radius_from_nearest_site() {
        let graph =
            SiteGraph::from_sites(vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 20.0)], 0, 24.0);
        assert!(graph.neighbors(0).is_empty());
        assert_eq!(graph.radius(0), 20.0 * RADIUS_FACTOR);
    }

    #[test]
    fn isolated_site_uses_fallback_radius() {
        let mut cfg = small_cfg();
        cfg.min_distance = 1.0e6;
        let mut rng = StdRng::seed_from_u64(3);
        let graph = SiteGraph::construct(&cfg, &mut rng);

        // The first dart always lands; nothing else fits next to it.
        assert_eq!(graph.len(), 1);
        assert!(graph.neighbors(0).is_empty());
        assert_eq!(graph.radius(0), cfg.min_distance * RADIUS_FACTOR);
    }

    #[test]
    fn zero_target_and_oversized_margin_give_empty_graphs() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut cfg = small_cfg();
        cfg.target_count = 0;
        assert!(SiteGraph::construct(&cfg, &mut rng).is_empty());

        let mut cfg = small_cfg();
        cfg.margin = 200.0;
        assert!(SiteGraph::construct(&cfg, &mut rng).is_empty());
    }

    #[test]
    fn non_finite_bounds_give_empty_graphs() {
        let mut rng = StdRng::seed_from_u64(2);

        let mut cfg = small_cfg();
        cfg.margin = f32::NAN;
        assert!(SiteGraph::construct(&cfg, &mut rng).is_empty());

        let mut cfg = small_cfg();
        cfg.canvas.x = f32::INFINITY;
        assert!(SiteGraph::construct(&cfg, &mut rng).is_empty());
    }

    #[test]
    fn find_nearest_site_picks_closest_and_handles_empty() {
        let graph = SiteGraph::from_sites(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
            1,
            1.0,
        );
        assert_eq!(graph.find_nearest_site(Vec2::new(8.0, 0.0)), Some((1, 4.0)));

        let empty = SiteGraph::from_sites(Vec::new(), 6, 1.0);
        assert_eq!(empty.find_nearest_site(Vec2::ZERO), None);
    }
}
