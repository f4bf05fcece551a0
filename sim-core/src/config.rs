use glam::Vec2;

use crate::{error::ConfigError, rules::Rule, types::State};

/// Slowest allowed cadence, in frames per generation.
pub const MAX_TICK_EVERY: u32 = 12;
/// Fastest allowed cadence, in frames per generation.
pub const MIN_TICK_EVERY: u32 = 1;
/// Upper bound on requested sites; neighbor building is quadratic.
pub const MAX_SITES: usize = 100_000;

/// Parameters for [`crate::site_graph::SiteGraph::construct`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphConfig {
    /// Canvas size in canvas units.
    pub canvas: Vec2,
    /// Requested number of sites; the realized count may be lower.
    pub target_count: usize,
    /// Minimum distance between two accepted sites.
    pub min_distance: f32,
    /// Number of nearest neighbors kept per site.
    pub k: usize,
    /// Distance kept clear along every canvas edge while sampling.
    pub margin: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            canvas: Vec2::new(540.0, 675.0),
            target_count: 520,
            min_distance: 24.0,
            k: 6,
            margin: 10.0,
        }
    }
}

/// Parameters for [`crate::state_field::StateField::seed`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedConfig {
    pub band_count: usize,
    pub island_count: usize,
    /// Half-width of each band, measured along the band normal.
    pub band_half_width: f32,
    /// Island radii are drawn from `[min, max)`.
    pub island_radius: (f32, f32),
    /// How far island centers may fall outside the canvas on every side.
    pub island_overscan: f32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            band_count: 3,
            island_count: 3,
            band_half_width: 50.0,
            island_radius: (20.0, 200.0),
            island_overscan: 0.0,
        }
    }
}

/// Full configuration of an [`crate::automaton::Automaton`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub graph: GraphConfig,
    pub seed: SeedConfig,
    /// Size of the state alphabet.
    pub num_states: State,
    pub rule: Rule,
    /// Frames between two generations while running.
    pub tick_every: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            seed: SeedConfig::default(),
            num_states: 12,
            rule: Rule::Contrast,
            tick_every: MAX_TICK_EVERY,
        }
    }
}

impl Config {
    /// Smallest alphabet the seeding can work with: islands draw from `[2, num_states)`.
    pub const MIN_STATES: State = 3;

    /// Checks the values the automaton cannot run with.
    ///
    /// Degenerate but valid inputs (zero sites, `k` larger than the site count)
    /// are accepted; they simply produce a small or empty graph.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_states < Self::MIN_STATES {
            return Err(ConfigError::TooFewStates {
                min: Self::MIN_STATES,
                got: self.num_states,
            });
        }

        let canvas = self.graph.canvas;
        if !(canvas.is_finite() && canvas.x > 0.0 && canvas.y > 0.0) {
            return Err(ConfigError::EmptyCanvas {
                width: canvas.x,
                height: canvas.y,
            });
        }

        let d = self.graph.min_distance;
        if !is_length(d) {
            return Err(ConfigError::InvalidMinDistance(d));
        }

        if self.graph.target_count > MAX_SITES {
            return Err(ConfigError::TooManySites {
                max: MAX_SITES,
                got: self.graph.target_count,
            });
        }

        for (name, value) in [
            ("margin", self.graph.margin),
            ("band_half_width", self.seed.band_half_width),
            ("island_overscan", self.seed.island_overscan),
        ] {
            if !is_length(value) {
                return Err(ConfigError::InvalidLength { name, value });
            }
        }

        let (min, max) = self.seed.island_radius;
        if !(is_length(min) && max.is_finite() && min <= max) {
            return Err(ConfigError::InvalidIslandRadius { min, max });
        }

        if !(MIN_TICK_EVERY..=MAX_TICK_EVERY).contains(&self.tick_every) {
            return Err(ConfigError::TickOutOfRange {
                min: MIN_TICK_EVERY,
                max: MAX_TICK_EVERY,
                got: self.tick_every,
            });
        }

        Ok(())
    }
}

/// Finite and non-negative; rejects NaN.
fn is_length(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_small_alphabet() {
        let cfg = Config {
            num_states: 2,
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TooFewStates { min: 3, got: 2 })
        );
    }

    #[test]
    fn validate_rejects_empty_canvas_and_bad_distance() {
        let mut cfg = Config::default();
        cfg.graph.canvas = Vec2::new(0.0, 100.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyCanvas { .. })
        ));

        let mut cfg = Config::default();
        cfg.graph.min_distance = f32::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidMinDistance(_))
        ));
    }

    #[test]
    fn validate_rejects_tick_outside_bounds() {
        let cfg = Config {
            tick_every: 0,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TickOutOfRange { got: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_non_finite_canvas() {
        let mut cfg = Config::default();
        cfg.graph.canvas.x = f32::INFINITY;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyCanvas { .. })
        ));

        cfg.graph.canvas = Vec2::new(540.0, f32::NAN);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyCanvas { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_margin() {
        let mut cfg = Config::default();
        cfg.graph.margin = f32::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidLength { name: "margin", .. })
        ));

        cfg.graph.margin = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidLength { name: "margin", .. })
        ));
    }

    #[test]
    fn validate_rejects_negative_overscan_and_band_width() {
        let mut cfg = Config::default();
        cfg.seed.island_overscan = -400.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidLength {
                name: "island_overscan",
                value: -400.0
            })
        );

        let mut cfg = Config::default();
        cfg.seed.band_half_width = f32::INFINITY;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidLength {
                name: "band_half_width",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_inverted_or_infinite_island_radius() {
        let mut cfg = Config::default();
        cfg.seed.island_radius = (50.0, 10.0);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidIslandRadius {
                min: 50.0,
                max: 10.0
            })
        );

        cfg.seed.island_radius = (20.0, f32::INFINITY);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidIslandRadius { .. })
        ));

        // A degenerate but ordered range is fine.
        cfg.seed.island_radius = (30.0, 30.0);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_oversized_target_count() {
        let mut cfg = Config::default();
        cfg.graph.target_count = usize::MAX;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TooManySites {
                max: MAX_SITES,
                got: usize::MAX
            })
        );
    }

    #[test]
    fn huge_min_distance_is_still_valid() {
        let mut cfg = Config::default();
        cfg.graph.min_distance = 1.0e6;
        assert_eq!(cfg.validate(), Ok(()));
    }
}
