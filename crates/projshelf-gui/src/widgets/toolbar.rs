/// Top action bar — the workspace operation buttons, theme toggle, and
/// branding.
use crate::state::{AppPhase, AppState};
use egui::Ui;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    let busy = state.phase == AppPhase::Scanning;
    let have_dir_target = state.selected_dir_path().is_some();
    let have_file = state.selected_file_path().is_some();
    let have_selection = state.selected_info().is_some();

    ui.horizontal(|ui| {
        // App title — uses the egui accent/hyperlink colour so it adapts
        // to dark and light mode automatically.
        ui.label(
            egui::RichText::new("📂 ProjShelf")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        if ui
            .add_enabled(!busy, egui::Button::new("Create Project"))
            .on_hover_text("Create a new project directory under the workspace root")
            .clicked()
        {
            state.request_create_project();
        }

        if ui
            .add_enabled(!busy && have_dir_target, egui::Button::new("Add Folder"))
            .on_hover_text(if have_dir_target {
                "Create a folder under the selected item"
            } else {
                "Select a project or folder first"
            })
            .clicked()
        {
            state.request_create_folder();
        }

        if ui
            .add_enabled(!busy && have_dir_target, egui::Button::new("📄 Add File"))
            .on_hover_text("Copy an external file into the selected item")
            .clicked()
        {
            state.add_file();
        }

        if ui
            .add_enabled(!busy && have_dir_target, egui::Button::new("📁 Add Directory"))
            .on_hover_text("Copy an external directory into the selected item")
            .clicked()
        {
            state.add_directory();
        }

        if ui
            .add_enabled(!busy && have_file, egui::Button::new("📤 Retrieve File"))
            .on_hover_text(if have_file {
                "Copy the selected file out to a directory of your choice"
            } else {
                "Select a file first"
            })
            .clicked()
        {
            state.retrieve_file();
        }

        ui.separator();

        if ui
            .add_enabled(!busy, egui::Button::new("🔄 Refresh Tree"))
            .on_hover_text("Re-walk the workspace from scratch")
            .clicked()
        {
            state.refresh();
        }

        if busy {
            if ui
                .button("⏹ Stop")
                .on_hover_text("Cancel the running refresh")
                .clicked()
            {
                state.cancel_scan();
            }
        }

        if ui
            .add_enabled(!busy && have_selection, egui::Button::new("Delete Project"))
            .on_hover_text(if have_selection {
                "Delete the selected item from disk"
            } else {
                "Select an item first"
            })
            .clicked()
        {
            state.request_delete_selected();
        }

        // Right-aligned controls.
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("ℹ").on_hover_text("About ProjShelf").clicked() {
                state.show_about = true;
            }

            // ── Theme toggle (☀ light / 🌙 dark) ──────────────────
            let theme_label = if state.dark_mode { "☀" } else { "🌙" };
            let theme_tip = if state.dark_mode {
                "Switch to light mode"
            } else {
                "Switch to dark mode"
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.toggle_dark_mode();
            }

            ui.separator();

            let can_export = state.tree.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("📤 Export CSV"))
                .on_hover_text(if can_export {
                    "Write the tree to a CSV file"
                } else {
                    "Refresh the tree first to enable export"
                })
                .clicked()
            {
                state.export_tree_csv();
            }
        });
    });
}
