/// Main `eframe::App` implementation for ProjShelf.
///
/// Top-level UI layout composing the toolbar, tree panel, details panel,
/// status bar, and the modal dialog windows (name input, delete
/// confirmation, error, PDF viewer, About).
use crate::panels;
use crate::state::{AppState, Modal, NameTarget};
use crate::theme::ShelfTheme;
use crate::widgets;
use projshelf_core::config;
use projshelf_core::workspace::Workspace;

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so that the
/// setup work (config load, workspace open, initial scan kick-off)
/// completes before the OS window is created and the first rendered frame
/// arrives immediately.
pub struct ProjShelfState {
    pub(crate) inner: AppState,
}

impl ProjShelfState {
    /// Load preferences, open the workspace, and start the initial scan.
    /// Call this before `eframe::run_native`.
    pub fn build() -> anyhow::Result<Self> {
        let config = config::load_config();
        let root = config.resolve_root();
        let workspace = Workspace::open(root)?;

        let mut state = AppState::new(workspace, config);
        state.refresh();
        Ok(Self { inner: state })
    }
}

/// The ProjShelf application.
pub struct ProjShelfApp {
    state: AppState,
}

impl ProjShelfApp {
    /// Create a new application instance from pre-built state.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: ProjShelfState) -> Self {
        ShelfTheme::for_dark_mode(state.inner.dark_mode).apply(&cc.egui_ctx);
        Self { state: state.inner }
    }
}

impl eframe::App for ProjShelfApp {
    /// Override the GPU clear colour to match the active theme background,
    /// preventing a colour mismatch flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        // Called every frame so that toggling dark_mode takes effect
        // immediately on the next rendered frame.
        ShelfTheme::for_dark_mode(self.state.dark_mode).apply(ctx);

        // ── Process scanner messages ──────────────────────────────────────
        let _data_changed = self.state.process_scan_messages();

        // Request continuous repaint while a scan is running.
        if self.state.phase == crate::state::AppPhase::Scanning {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── Modal dialogs ─────────────────────────────────────────────────
        draw_modal(ctx, &mut self.state);
        draw_about(ctx, &mut self.state);

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state);
                ui.add_space(2.0);
            });

        // ── Right details panel ───────────────────────────────────────────
        egui::SidePanel::right("details_panel")
            .default_width(260.0)
            .min_width(200.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::details_panel::details_panel(ui, &mut self.state);
                });
            });

        // ── Central panel (tree) ──────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tree_panel::tree_panel(ui, &mut self.state);
        });
    }
}

/// Render the currently open modal dialog, if any.
///
/// The `Modal` value is taken out of the state for the frame and put back
/// unless the dialog was resolved, which keeps the borrow checker out of
/// the button handlers.
fn draw_modal(ctx: &egui::Context, state: &mut AppState) {
    let Some(modal) = state.modal.take() else {
        return;
    };

    match modal {
        Modal::NameInput { target, mut buffer } => {
            let title = match target {
                NameTarget::Project => "Create Project",
                NameTarget::Folder { .. } => "Add Folder",
            };
            let mut submit = false;
            let mut cancel = false;

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .fixed_size([300.0, 0.0])
                .show(ctx, |ui| {
                    ui.label("Enter name:");
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut buffer).desired_width(f32::INFINITY),
                    );
                    if !edit.has_focus() {
                        edit.request_focus();
                    }
                    if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            submit = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancel = true;
                        }
                    });
                });

            if ui_escape_pressed(ctx) {
                cancel = true;
            }
            if submit {
                state.modal = Some(Modal::NameInput { target, buffer });
                state.submit_name_input();
            } else if !cancel {
                state.modal = Some(Modal::NameInput { target, buffer });
            }
        }
        Modal::ConfirmDelete { path, is_dir } => {
            let mut confirm = false;
            let mut cancel = false;
            let what = if is_dir {
                "and everything inside it will be deleted"
            } else {
                "will be deleted"
            };

            egui::Window::new("Delete Item")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .fixed_size([360.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!("'{}' {what}.", path.display()));
                    ui.label("This cannot be undone.");
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        if ui.button("Delete").clicked() {
                            confirm = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancel = true;
                        }
                    });
                });

            if ui_escape_pressed(ctx) {
                cancel = true;
            }
            if confirm {
                state.modal = Some(Modal::ConfirmDelete { path, is_dir });
                state.confirm_delete();
            } else if !cancel {
                state.modal = Some(Modal::ConfirmDelete { path, is_dir });
            }
        }
        Modal::Error { title, message } => {
            let mut close = false;

            egui::Window::new(&title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .fixed_size([380.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new("⚠")
                            .size(20.0)
                            .color(ShelfTheme::current(ui).warning),
                    );
                    ui.add_space(4.0);
                    ui.label(&message);
                    ui.add_space(6.0);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });

            if !close && !ui_escape_pressed(ctx) {
                state.modal = Some(Modal::Error { title, message });
            }
        }
        Modal::PdfView { title, content } => {
            let mut open = true;
            let mut close = false;

            egui::Window::new(format!("PDF Content: {title}"))
                .open(&mut open)
                .default_size([520.0, 420.0])
                .resizable(true)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&content).size(12.0).monospace(),
                            );
                        });
                    ui.separator();
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });

            if open && !close {
                state.modal = Some(Modal::PdfView { title, content });
            }
        }
    }
}

/// Render the About window.
fn draw_about(ctx: &egui::Context, state: &mut AppState) {
    let mut show_about = state.show_about;
    egui::Window::new("About ProjShelf")
        .open(&mut show_about)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 0.0])
        .show(ctx, |ui| {
            let accent = ui.visuals().hyperlink_color;
            let muted = ui.visuals().weak_text_color();
            let normal = ui.visuals().text_color();

            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("📂 ProjShelf")
                        .size(24.0)
                        .strong()
                        .color(accent),
                );
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                        .size(13.0)
                        .color(muted),
                );
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(
                        "A desktop project organiser.\n\
                         Manage project folders through a tree view\n\
                         bound directly to the filesystem.",
                    )
                    .size(12.0)
                    .color(normal),
                );
                ui.add_space(12.0);
                ui.separator();
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("MIT License")
                        .size(11.0)
                        .color(muted),
                );
                ui.add_space(2.0);
                ui.label(
                    egui::RichText::new("Built with Rust & egui")
                        .size(11.0)
                        .color(muted),
                );
                ui.add_space(8.0);
            });
        });
    state.show_about = show_about;
}

/// Whether Escape was pressed this frame.
fn ui_escape_pressed(ctx: &egui::Context) -> bool {
    ctx.input(|i| i.key_pressed(egui::Key::Escape))
}
