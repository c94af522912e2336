/// Details panel — information about the currently selected item.
///
/// Directories show the roll-up from `analysis::summarize`: file count,
/// total size, and the distinct extensions beneath them. PDF files get a
/// button that opens the text viewer.
use crate::dialogs::reveal_in_file_manager;
use crate::state::AppState;
use crate::theme::ShelfTheme;
use projshelf_core::analysis::summarize;
use projshelf_core::model::size::{format_count, format_size};
use projshelf_core::model::NodeKind;
use projshelf_core::pdf;
use egui::Ui;
use std::path::PathBuf;

/// Draw the details panel for the currently selected item.
pub fn details_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = ShelfTheme::current(ui);
    let color_muted = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_accent = ui.visuals().hyperlink_color;

    // Deferred while the tree is borrowed below.
    let mut pdf_request: Option<PathBuf> = None;

    'draw: {
        let Some(selected) = state.selected_node else {
            ui.label(
                egui::RichText::new("Select an item to see details")
                    .color(color_muted)
                    .italics(),
            );
            break 'draw;
        };
        let Some(tree) = state.tree.as_ref() else {
            break 'draw;
        };
        // Guard against stale indices pointing beyond the current tree.
        if selected.idx() >= tree.len() {
            break 'draw;
        }

        let node = tree.node(selected);
        let relative = tree.relative_path(selected);
        let full_path = state.workspace.resolve(&relative);

        let icon = if node.is_error {
            "⚠"
        } else {
            match node.kind {
                NodeKind::Project => "📂",
                NodeKind::Folder => "📁",
                NodeKind::File => "📄",
            }
        };
        ui.heading(egui::RichText::new(icon).size(16.0));
        ui.add_space(2.0);

        if node.is_error {
            ui.label(
                egui::RichText::new("Could not be read — contents may be incomplete")
                    .size(11.0)
                    .color(theme.warning)
                    .italics(),
            );
            ui.add_space(2.0);
        }

        ui.label(
            egui::RichText::new(node.name.as_str())
                .size(14.0)
                .strong()
                .color(color_normal),
        );

        ui.add_space(4.0);

        ui.label(
            egui::RichText::new(relative.display().to_string())
                .size(11.0)
                .color(color_muted),
        );

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(4.0);

        let summary = node.is_dir().then(|| summarize(tree, selected));

        egui::Grid::new("details_grid")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Type:").color(color_muted));
                ui.label(egui::RichText::new(node.kind.label()).color(color_normal));
                ui.end_row();

                ui.label(egui::RichText::new("Size:").color(color_muted));
                ui.label(
                    egui::RichText::new(format_size(node.size))
                        .color(color_accent)
                        .strong(),
                );
                ui.end_row();

                if let Some(ref summary) = summary {
                    ui.label(egui::RichText::new("Files:").color(color_muted));
                    ui.label(
                        egui::RichText::new(format_count(summary.file_count)).color(color_normal),
                    );
                    ui.end_row();

                    if !summary.extensions.is_empty() {
                        let types = summary
                            .extensions
                            .iter()
                            .map(String::as_str)
                            .collect::<Vec<_>>()
                            .join(", ");
                        ui.label(egui::RichText::new("File types:").color(color_muted));
                        ui.label(egui::RichText::new(types).color(color_normal));
                        ui.end_row();
                    }
                }

                if let Some(modified) = node.modified {
                    let stamp = chrono::DateTime::<chrono::Local>::from(modified)
                        .format("%Y-%m-%d %H:%M")
                        .to_string();
                    ui.label(egui::RichText::new("Modified:").color(color_muted));
                    ui.label(egui::RichText::new(stamp).color(color_normal));
                    ui.end_row();
                }
            });

        ui.add_space(8.0);

        // Action buttons.
        ui.horizontal_wrapped(|ui| {
            if ui.button("📂 Open in File Manager").clicked() {
                let dir = if node.is_dir() {
                    full_path.clone()
                } else {
                    full_path
                        .parent()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| full_path.clone())
                };
                reveal_in_file_manager(&dir);
            }

            if ui.button("📋 Copy Path").clicked() {
                ui.ctx().copy_text(full_path.display().to_string());
            }
        });

        if node.kind == NodeKind::File && pdf::is_pdf(&full_path) {
            ui.add_space(4.0);
            if ui
                .button("📄 View PDF Text")
                .on_hover_text("Extract and display the document text")
                .clicked()
            {
                pdf_request = Some(full_path);
            }
        }
    }

    // Tree borrow has ended — apply deferred actions.
    if let Some(path) = pdf_request {
        state.open_pdf(path);
    }
}
