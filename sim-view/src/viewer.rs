//! Interactive viewer for the site automaton built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns an [`Automaton`] and a draft
//! [`Config`], and implements [`eframe::App`] to drive the automaton on a
//! fixed frame cadence and draw each site as a stylized tile.

use eframe::App;
use glam::Vec2;
use rand::rng;
use sim_core::{
    automaton::Automaton,
    config::{Config, MAX_TICK_EVERY, MIN_TICK_EVERY},
    error::InitError,
    render::{TileStyle, TileView},
    rules::Rule,
};

const PAPER: egui::Color32 = egui::Color32::from_rgb(0xF5, 0xF1, 0xE8);
const INK: egui::Color32 = egui::Color32::from_rgb(0x0F, 0x0F, 0x0F);
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0xE9, 0x4F, 0x37);

/// Seconds per automaton frame; the cadence counts these frames, not repaints.
const FRAME_INTERVAL: f64 = 1.0 / 24.0;
/// Once the frame clock falls this far behind, it restarts at the current time.
const MAX_FRAME_LAG: f64 = 4.0 * FRAME_INTERVAL;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The automaton core: [`Automaton`] (graph, states, stepper, cadence).
/// - A draft [`Config`] edited in the side panel and applied on reseed.
/// - Camera state (pan/zoom) and eframe/egui callbacks.
///
/// The typical per-frame update is:
/// 1. Handle keyboard shortcuts and panel interactions.
/// 2. Feed elapsed automaton frames to [`Automaton::advance_frame`].
/// 3. Draw every tile of the committed generation.
pub struct Viewer {
    automaton: Automaton,
    draft: Config,
    last_error: Option<String>,

    rng: rand::rngs::ThreadRng,

    zoom: f32,
    pan: egui::Vec2,
    hovered: Option<TileView>,

    last_frame_time: f64,
}

impl Viewer {
    /// Creates a viewer around a freshly seeded automaton with [`Config::default`].
    ///
    /// ### Errors
    /// Propagates [`InitError`] from [`Automaton::new`].
    pub fn new() -> Result<Self, InitError> {
        let mut rng = rng();
        let cfg = Config::default();
        let automaton = Automaton::new(cfg, &mut rng)?;

        Ok(Self {
            automaton,
            draft: cfg,
            last_error: None,
            rng,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            hovered: None,
            last_frame_time: 0.0,
        })
    }

    /// Discards the current sites and states and builds new ones.
    fn reseed(&mut self) {
        if let Err(e) = self.automaton.reseed(&mut self.rng) {
            tracing::error!(error = %e, "reseed failed");
            self.last_error = Some(e.to_string());
        }
        self.hovered = None;
    }

    /// Applies the draft config; the running automaton is untouched on error.
    fn apply_draft(&mut self) {
        match self.automaton.reconfigure(self.draft, &mut self.rng) {
            Ok(()) => self.last_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "rejected config");
                self.last_error = Some(e.to_string());
            }
        }
        self.hovered = None;
    }

    /// Advances one generation by hand.
    fn step_once(&mut self) {
        if let Err(e) = self.automaton.step_once() {
            tracing::error!(error = %e, "step failed");
            self.automaton.set_running(false);
        }
    }

    /// Feeds the automaton one frame per elapsed [`FRAME_INTERVAL`].
    ///
    /// The clock advances by whole intervals, so repaints that do not line up
    /// with the frame rate carry their remainder over. After a stall (or the
    /// first repaint) it restarts instead of replaying the missed frames.
    fn tick(&mut self, now: f64) {
        let behind = now - self.last_frame_time;
        if behind < FRAME_INTERVAL {
            return;
        }
        self.last_frame_time = if behind > MAX_FRAME_LAG {
            now
        } else {
            self.last_frame_time + FRAME_INTERVAL
        };
        if let Err(e) = self.automaton.advance_frame() {
            tracing::error!(error = %e, "step failed, pausing");
            self.automaton.set_running(false);
        }
    }

    /// Converts a canvas position to screen-space.
    ///
    /// The canvas center maps to the center of `rect`, scaled by `zoom` and
    /// offset by `pan`. Canvas y grows downward like screen y.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let half = self.automaton.config().graph.canvas * 0.5;
        egui::pos2(
            center.x + (p.x - half.x) * self.zoom + self.pan.x,
            center.y + (p.y - half.y) * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let half = self.automaton.config().graph.canvas * 0.5;
        let x = (p.x - center.x - self.pan.x) / self.zoom + half.x;
        let y = (p.y - center.y - self.pan.y) / self.zoom + half.y;
        Vec2::new(x, y)
    }

    /// Helper to draw a labeled numeric [`egui::DragValue`].
    fn labeled_drag<N: egui::emath::Numeric>(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut N,
        range: std::ops::RangeInclusive<N>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Handles the sketch shortcuts: Space, R, 1, 2, +, -.
    ///
    /// Ignored while a text field (e.g. a [`egui::DragValue`] being typed into)
    /// has keyboard focus.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (pause, reseed, rule_a, rule_b, faster, slower) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::Num1),
                i.key_pressed(egui::Key::Num2),
                i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals),
                i.key_pressed(egui::Key::Minus),
            )
        });

        if pause {
            self.automaton.toggle_running();
        }
        if reseed {
            self.reseed();
        }
        if rule_a {
            self.automaton.set_rule(Rule::Consensus);
        }
        if rule_b {
            self.automaton.set_rule(Rule::Contrast);
        }
        if faster {
            self.automaton.speed_up();
        }
        if slower {
            self.automaton.slow_down();
        }
    }

    /// Builds the top panel UI (run controls, rule, cadence, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let running = self.automaton.is_running();
                if ui.button(if running { "⏸ Pause" } else { "▶ Run" }).clicked() {
                    self.automaton.toggle_running();
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Reseed").clicked() {
                    self.reseed();
                }

                ui.separator();
                for rule in Rule::ALL {
                    if ui
                        .selectable_label(self.automaton.rule() == rule, format!("Rule {}", rule.label()))
                        .clicked()
                    {
                        self.automaton.set_rule(rule);
                    }
                }

                ui.separator();
                let mut tick_every = self.automaton.tick_every();
                let changed = ui
                    .add(
                        egui::DragValue::new(&mut tick_every)
                            .prefix("frames/step = ")
                            .range(MIN_TICK_EVERY..=MAX_TICK_EVERY)
                            .speed(0.1),
                    )
                    .changed();
                if changed {
                    self.automaton.set_tick_every(tick_every);
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (rule, step, site count, run state, hover).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(if self.automaton.is_running() {
                    "RUN"
                } else {
                    "PAUSED"
                });
                ui.label(format!("sites = {}", self.automaton.graph().len()));
                ui.label(format!("step = {}", self.automaton.step_count()));
                ui.label(format!("rule = {}", self.automaton.rule().label()));
                if let Some(tile) = self.hovered {
                    ui.separator();
                    ui.label(format!(
                        "site {} state {}{}",
                        tile.site,
                        tile.state,
                        if tile.accent { " (accent)" } else { "" }
                    ));
                }
            });
        });
    }

    /// Builds the right-hand panel where the draft config is edited.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Sites");
                Self::labeled_drag(
                    ui,
                    "target_count:",
                    &mut self.draft.graph.target_count,
                    0..=4000,
                    1.0,
                );
                Self::labeled_drag(
                    ui,
                    "min_distance:",
                    &mut self.draft.graph.min_distance,
                    0.0..=200.0,
                    0.5,
                );
                Self::labeled_drag(ui, "k:", &mut self.draft.graph.k, 0..=16, 0.1);

                ui.separator();
                ui.label("States");
                Self::labeled_drag(ui, "num_states:", &mut self.draft.num_states, 3..=64, 0.1);

                ui.separator();
                ui.label("Seeding");
                Self::labeled_drag(ui, "bands:", &mut self.draft.seed.band_count, 0..=16, 0.1);
                Self::labeled_drag(
                    ui,
                    "band_half_width:",
                    &mut self.draft.seed.band_half_width,
                    0.0..=500.0,
                    0.5,
                );
                Self::labeled_drag(
                    ui,
                    "islands:",
                    &mut self.draft.seed.island_count,
                    0..=16,
                    0.1,
                );
                Self::labeled_drag(
                    ui,
                    "island_overscan:",
                    &mut self.draft.seed.island_overscan,
                    0.0..=500.0,
                    1.0,
                );

                ui.separator();
                if ui.button("Apply & reseed").clicked() {
                    self.draft.rule = self.automaton.rule();
                    self.draft.tick_every = self.automaton.tick_every();
                    self.apply_draft();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.draft = Config::default();
                }

                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, err.as_str());
                }
            });
    }

    /// Draws one tile in its style.
    fn draw_tile(&self, painter: &egui::Painter, rect: egui::Rect, tile: &TileView) {
        let c = self.world_to_screen(tile.pos, rect);
        let r = tile.radius * self.zoom;
        let ink = if tile.accent { ACCENT } else { INK };
        let line = egui::Stroke::new(r * 0.22, ink);

        painter.circle_filled(c, r * 1.025, PAPER);

        match tile.style {
            TileStyle::Solid => {
                painter.circle_filled(c, r, ink);
            }
            TileStyle::HorizontalHatch => chords(painter, c, r, Vec2::X, r * 0.8, line),
            TileStyle::VerticalHatch => chords(painter, c, r, Vec2::Y, r * 0.8, line),
            TileStyle::DiagonalUp => {
                chords(painter, c, r, Vec2::new(1.0, -1.0).normalize(), r * 0.64, line)
            }
            TileStyle::DiagonalDown => {
                chords(painter, c, r, Vec2::new(1.0, 1.0).normalize(), r * 0.64, line)
            }
            TileStyle::Dots => {
                let spacing = r * 0.95;
                let mut y = -r;
                while y <= r {
                    let mut x = -r;
                    while x <= r {
                        if x * x + y * y <= r * r {
                            painter.circle_filled(c + egui::vec2(x, y), r * 0.175, ink);
                        }
                        x += spacing;
                    }
                    y += spacing;
                }
            }
            TileStyle::OrientedBand => {
                // Bands point away from the canvas center.
                let canvas_center = self.automaton.config().graph.canvas * 0.5;
                let along = (tile.pos - canvas_center).normalize_or(Vec2::X);
                let across = along.perp();
                let half_len = r;
                let half_w = r * 0.275;
                let corners = [
                    along * half_len + across * half_w,
                    along * half_len - across * half_w,
                    -along * half_len - across * half_w,
                    -along * half_len + across * half_w,
                ];
                let points = corners
                    .iter()
                    .map(|v| c + egui::vec2(v.x, v.y))
                    .collect();
                painter.add(egui::Shape::convex_polygon(points, ink, egui::Stroke::NONE));
            }
            TileStyle::Ring => {
                painter.circle_stroke(c, r * 0.9, line);
            }
            TileStyle::Knockout => {}
        }
    }

    /// Builds the central panel where the canvas and its tiles are drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            self.hovered = response.hover_pos().and_then(|p| {
                let world = self.screen_to_world(p, rect);
                let graph = self.automaton.graph();
                let (id, d2) = graph.find_nearest_site(world)?;
                let r = graph.radius(id);
                if d2 <= r * r {
                    self.automaton.tiles().nth(id)
                } else {
                    None
                }
            });

            // Canvas background.
            let canvas = self.automaton.config().graph.canvas;
            painter.rect_filled(
                egui::Rect::from_two_pos(
                    self.world_to_screen(Vec2::ZERO, rect),
                    self.world_to_screen(canvas, rect),
                ),
                0.0,
                PAPER,
            );

            for tile in self.automaton.tiles() {
                self.draw_tile(&painter, rect, &tile);
            }

            if self.automaton.is_running() {
                let now = ctx.input(|i| i.time);
                self.tick(now);
                ctx.request_repaint();
            }
        });
    }
}

/// Draws parallel chords of a circle, running along `dir`, `spacing` apart.
fn chords(
    painter: &egui::Painter,
    center: egui::Pos2,
    r: f32,
    dir: Vec2,
    spacing: f32,
    stroke: egui::Stroke,
) {
    if spacing <= 0.0 {
        return;
    }
    let normal = dir.perp();
    let mut t = -r + spacing * 0.5;
    while t < r {
        let half = (r * r - t * t).max(0.0).sqrt();
        let a = normal * t - dir * half;
        let b = normal * t + dir * half;
        painter.line_segment(
            [center + egui::vec2(a.x, a.y), center + egui::vec2(b.x, b.y)],
            stroke,
        );
        t += spacing;
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
