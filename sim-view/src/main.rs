//! Application entry point for the site automaton viewer.
//!
//! This binary sets up logging and eframe/egui, and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use viewer::Viewer;

/// Starts the native eframe application.
///
/// Log output is controlled by `RUST_LOG`; automaton events are shown at
/// `info` by default.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop, or the
///   automaton cannot be initialized.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sim_core=info")),
        )
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Site Automaton",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()?))),
    )
}
