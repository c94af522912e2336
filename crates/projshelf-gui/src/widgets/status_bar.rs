/// Bottom status bar — last operation outcome and scan statistics.
use crate::state::{AppPhase, AppState};
use crate::theme::ShelfTheme;
use projshelf_core::model::size::{format_count, format_size};
use egui::Ui;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    let theme = ShelfTheme::current(ui);
    let color_accent = ui.visuals().hyperlink_color;
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| {
        match state.phase {
            AppPhase::Idle => {
                ui.label(egui::RichText::new("Ready").size(12.0).color(color_weak));
            }
            AppPhase::Scanning => {
                ui.spinner();

                let display_path = truncate_path(&state.scan_current_path, 60);
                ui.label(
                    egui::RichText::new(format!("Scanning {display_path}..."))
                        .size(12.0)
                        .color(color_normal),
                );

                ui.separator();

                ui.label(
                    egui::RichText::new(format!("{} files", format_count(state.scan_files_found)))
                        .size(12.0)
                        .color(color_normal),
                );

                ui.separator();

                ui.label(
                    egui::RichText::new(format_size(state.scan_total_size))
                        .size(12.0)
                        .color(color_accent),
                );
            }
            AppPhase::Ready => {
                ui.label(
                    egui::RichText::new(&state.status)
                        .size(12.0)
                        .color(theme.success),
                );

                if let Some(ref tree) = state.tree {
                    ui.separator();

                    ui.label(
                        egui::RichText::new(format!(
                            "{} projects",
                            format_count(tree.roots.len() as u64)
                        ))
                        .size(12.0)
                        .color(color_normal),
                    );

                    ui.separator();

                    let file_count =
                        tree.nodes.iter().filter(|n| !n.is_dir()).count() as u64;
                    ui.label(
                        egui::RichText::new(format!("{} files", format_count(file_count)))
                            .size(12.0)
                            .color(color_normal),
                    );

                    ui.separator();

                    ui.label(
                        egui::RichText::new(format_size(tree.total_size))
                            .size(12.0)
                            .color(color_accent),
                    );

                    if let Some(duration) = state.scan_duration {
                        ui.separator();
                        ui.label(
                            egui::RichText::new(format!("{:.1}s", duration.as_secs_f64()))
                                .size(12.0)
                                .color(color_weak),
                        );
                    }

                    if state.scan_error_count > 0 {
                        ui.separator();
                        ui.label(
                            egui::RichText::new(format!(
                                "{} skipped",
                                format_count(state.scan_error_count)
                            ))
                            .size(12.0)
                            .color(theme.warning),
                        );
                    }
                }
            }
        }

        // Workspace root, right-aligned.
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(truncate_path(
                    &state.workspace.root().display().to_string(),
                    48,
                ))
                .size(11.0)
                .color(color_weak),
            );
        });
    });
}

/// Truncate a path string to fit within `max_len` characters, replacing
/// the middle with "..." if needed.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }
    let half = (max_len - 3) / 2;
    let head: String = path.chars().take(half).collect();
    let tail_start = path.chars().count() - half;
    let tail: String = path.chars().skip(tail_start).collect();
    format!("{head}...{tail}")
}
