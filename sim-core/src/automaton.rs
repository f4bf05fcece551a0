//! Driver-facing automaton state.
//!
//! [`Automaton`] owns one run: the site graph, the state field, the stepper
//! and the frame cadence. A reseed replaces graph and field together.

use rand::Rng;
use tracing::{debug, info};

use crate::{
    config::{Config, MAX_TICK_EVERY, MIN_TICK_EVERY},
    error::{FieldError, InitError, StepError},
    render::{self, TileView},
    rules::Rule,
    site_graph::SiteGraph,
    state_field::StateField,
    stepper::AutomatonStepper,
};

/// One running automaton plus the frame-driven cadence around it.
///
/// Steps take `&mut self`, so two generations can never be in flight at once.
#[derive(Debug, Clone)]
pub struct Automaton {
    cfg: Config,
    graph: SiteGraph,
    field: StateField,
    stepper: AutomatonStepper,

    running: bool,
    frame_counter: u32,
    step_count: u64,
}

impl Automaton {
    /// Validates `cfg`, samples a graph and seeds a field. Starts running.
    pub fn new(cfg: Config, rng: &mut impl Rng) -> Result<Self, InitError> {
        cfg.validate()?;
        let (graph, field) = Self::build(&cfg, rng)?;

        Ok(Self {
            stepper: AutomatonStepper::new(cfg.rule),
            cfg,
            graph,
            field,
            running: true,
            frame_counter: 0,
            step_count: 0,
        })
    }

    fn build(cfg: &Config, rng: &mut impl Rng) -> Result<(SiteGraph, StateField), FieldError> {
        let graph = SiteGraph::construct(&cfg.graph, rng);
        let field = StateField::seed(&graph, cfg.graph.canvas, &cfg.seed, cfg.num_states, rng)?;
        info!(
            requested = cfg.graph.target_count,
            sites = graph.len(),
            "automaton seeded"
        );
        Ok((graph, field))
    }

    /// Rebuilds graph and field from the current config and resets the counters.
    ///
    /// The run/pause flag and the selected rule are kept.
    pub fn reseed(&mut self, rng: &mut impl Rng) -> Result<(), InitError> {
        let (graph, field) = Self::build(&self.cfg, rng)?;
        self.graph = graph;
        self.field = field;
        self.frame_counter = 0;
        self.step_count = 0;
        Ok(())
    }

    /// Replaces the config and reseeds with it.
    ///
    /// On error the previous config, graph and field stay in place.
    pub fn reconfigure(&mut self, cfg: Config, rng: &mut impl Rng) -> Result<(), InitError> {
        cfg.validate()?;
        let (graph, field) = Self::build(&cfg, rng)?;
        self.stepper.rule = cfg.rule;
        self.cfg = cfg;
        self.graph = graph;
        self.field = field;
        self.frame_counter = 0;
        self.step_count = 0;
        Ok(())
    }

    /// Called once per rendered frame.
    ///
    /// While running, every `tick_every`-th call advances one generation.
    /// Returns `true` if a generation was committed.
    pub fn advance_frame(&mut self) -> Result<bool, StepError> {
        if !self.running {
            return Ok(false);
        }

        self.frame_counter += 1;
        if self.frame_counter < self.cfg.tick_every {
            return Ok(false);
        }

        self.frame_counter = 0;
        self.step_once()?;
        Ok(true)
    }

    /// Advances one generation immediately, regardless of the run flag.
    pub fn step_once(&mut self) -> Result<(), StepError> {
        self.stepper.step(&self.graph, &mut self.field)?;
        self.step_count += 1;
        debug!(step = self.step_count, rule = self.stepper.rule.label(), "stepped");
        Ok(())
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn set_rule(&mut self, rule: Rule) {
        self.stepper.rule = rule;
        self.cfg.rule = rule;
    }

    /// One frame fewer between generations, down to [`MIN_TICK_EVERY`].
    pub fn speed_up(&mut self) {
        self.cfg.tick_every = self.cfg.tick_every.saturating_sub(1).max(MIN_TICK_EVERY);
    }

    /// One frame more between generations, up to [`MAX_TICK_EVERY`].
    pub fn slow_down(&mut self) {
        self.cfg.tick_every = (self.cfg.tick_every + 1).min(MAX_TICK_EVERY);
    }

    /// Sets the cadence, clamped to `[MIN_TICK_EVERY, MAX_TICK_EVERY]`.
    pub fn set_tick_every(&mut self, tick_every: u32) {
        self.cfg.tick_every = tick_every.clamp(MIN_TICK_EVERY, MAX_TICK_EVERY);
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn graph(&self) -> &SiteGraph {
        &self.graph
    }

    pub fn field(&self) -> &StateField {
        &self.field
    }

    pub fn rule(&self) -> Rule {
        self.stepper.rule
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_every(&self) -> u32 {
        self.cfg.tick_every
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Per-site views of the committed generation.
    pub fn tiles(&self) -> impl Iterator<Item = TileView> + '_ {
        render::tiles(&self.graph, &self.field)
    }
}
