//! ProjShelf — desktop project organiser.
//!
//! Thin binary entry point. All logic lives in the `projshelf-core`
//! and `projshelf-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("ProjShelf starting");

    let icon = projshelf_gui::icon::generate_icon(64);

    // Build application state *before* opening the window so the first
    // rendered frame arrives immediately — config load, workspace open,
    // and the initial scan kick-off all happen here.
    let state = projshelf_gui::ProjShelfState::build()?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("ProjShelf -- Project Organiser")
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([700.0, 450.0])
            .with_icon(icon)
            .with_transparent(true),
        ..Default::default()
    };

    eframe::run_native(
        "ProjShelf",
        options,
        Box::new(|cc| {
            Ok(Box::new(projshelf_gui::ProjShelfApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
