/// Virtualised tree view — the core UI component.
///
/// Only renders rows visible in the viewport, giving O(1) rendering cost
/// regardless of tree size. Uses the flat `visible_rows` list maintained
/// by `AppState`.
///
/// During scanning, reads from the shared `LiveTree` via a read lock so
/// the user can watch the tree populate.
use crate::dialogs::reveal_in_file_manager;
use crate::state::{AppPhase, AppState};
use crate::theme::ShelfTheme;
use projshelf_core::model::size::format_size;
use projshelf_core::model::{NodeKind, ProjectTree};
use egui::{Rect, Sense, Ui, Vec2};
use std::path::PathBuf;

/// Height of each row in pixels.
const ROW_HEIGHT: f32 = 24.0;

/// Indentation per depth level in pixels.
const INDENT_PX: f32 = 20.0;

/// Width reserved on the right for the Type and Size columns.
pub const RIGHT_COLUMNS_WIDTH: f32 = 220.0;

/// Deferred mutations collected while the tree is borrowed for rendering.
enum MenuAction {
    Reveal(PathBuf),
    Retrieve,
    Delete,
}

/// Draw the virtualised tree view.
pub fn tree_view(ui: &mut Ui, state: &mut AppState) {
    let have_final_tree = state.tree.is_some();
    let have_live_tree = state
        .live_tree
        .as_ref()
        .is_some_and(|lt| !lt.read().is_empty());

    if !have_final_tree && !have_live_tree {
        let message = match state.phase {
            AppPhase::Scanning => "Scanning workspace...",
            _ => "No projects yet. Click Create Project to get started.",
        };
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new(message).color(ui.visuals().weak_text_color()));
        });
        return;
    }

    if state.phase == AppPhase::Scanning {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                egui::RichText::new(format!(
                    " Scanning... {} files found",
                    projshelf_core::model::size::format_count(state.scan_files_found)
                ))
                .color(ui.visuals().weak_text_color())
                .size(12.0),
            );
        });
        ui.add_space(2.0);
    }

    // ── Render the tree and collect deferred actions ────────────
    // Scoped so that tree references (including any RwLockReadGuard) are
    // dropped before we mutate state.
    let (toggle_row, new_selection, menu_action) = if let Some(ref t) = state.tree {
        render_tree_rows(ui, state, t)
    } else if let Some(ref lt) = state.live_tree {
        let guard = lt.read();
        render_tree_rows(ui, state, &guard)
    } else {
        return;
    };
    // tree / guard dropped here — safe to mutate state.

    if let Some(row_idx) = new_selection {
        if row_idx < state.visible_rows.len() {
            state.selected_node = Some(state.visible_rows[row_idx].node_index);
        }
    }
    if let Some(row_idx) = toggle_row {
        state.toggle_expand(row_idx);
    }
    match menu_action {
        Some(MenuAction::Reveal(dir)) => reveal_in_file_manager(&dir),
        Some(MenuAction::Retrieve) => state.retrieve_file(),
        Some(MenuAction::Delete) => state.request_delete_selected(),
        None => {}
    }
}

/// Render the virtualised tree rows. Returns deferred actions
/// `(toggle_row, new_selection, menu_action)` for application after the
/// tree borrow ends.
fn render_tree_rows(
    ui: &mut Ui,
    state: &AppState,
    tree: &ProjectTree,
) -> (Option<usize>, Option<usize>, Option<MenuAction>) {
    let theme = ShelfTheme::current(ui);
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_selection = ui.visuals().selection.bg_fill;

    let total_rows = state.visible_rows.len();
    let total_height = total_rows as f32 * ROW_HEIGHT;

    let mut toggle_row: Option<usize> = None;
    let mut new_selection: Option<usize> = None;
    let mut menu_action: Option<MenuAction> = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Reserve the full virtual height so the scrollbar is correct.
            let (response, mut painter) = ui.allocate_painter(
                Vec2::new(ui.available_width(), total_height),
                Sense::click(),
            );

            let viewport = ui.clip_rect();
            let top_y = response.rect.top();

            let first_visible = ((viewport.top() - top_y) / ROW_HEIGHT).floor().max(0.0) as usize;
            let last_visible = ((viewport.bottom() - top_y) / ROW_HEIGHT)
                .ceil()
                .min(total_rows as f32) as usize;

            for row_idx in first_visible..last_visible {
                if row_idx >= state.visible_rows.len() {
                    break;
                }

                let row = &state.visible_rows[row_idx];
                let node = tree.node(row.node_index);

                let row_rect = Rect::from_min_size(
                    egui::pos2(response.rect.left(), top_y + row_idx as f32 * ROW_HEIGHT),
                    Vec2::new(response.rect.width(), ROW_HEIGHT),
                );

                if !viewport.intersects(row_rect) {
                    continue;
                }

                // Selection highlight.
                let is_selected = state.selected_node == Some(row.node_index);
                if is_selected {
                    painter.rect_filled(row_rect, 0.0, color_selection);
                }

                let row_response = ui.interact(
                    row_rect,
                    ui.id().with(("tree_row", row_idx)),
                    Sense::click(),
                );

                if row_response.hovered() && !is_selected {
                    painter.rect_filled(row_rect, 0.0, theme.surface_hover);
                }

                // Left or right click selects; double-click toggles dirs.
                if row_response.clicked() || row_response.secondary_clicked() {
                    new_selection = Some(row_idx);
                }
                if row_response.double_clicked() && node.is_dir() {
                    toggle_row = Some(row_idx);
                }

                // Context menu.
                row_response.context_menu(|ui| {
                    if let Some(action) =
                        context_menu(ui, state, tree, row.node_index)
                    {
                        menu_action = Some(action);
                    }
                });

                // Tooltip with full name (useful for truncated names).
                if row_response.hovered() {
                    let tip_text = if node.is_error {
                        format!("{}\n⚠ Could not be read", node.name)
                    } else {
                        format!("{}\n{}", node.name, format_size(node.size))
                    };
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        ui.id().with(("tree_tip", row_idx)),
                        |ui| {
                            ui.label(tip_text);
                        },
                    );
                }

                // Draw row content.
                let indent = INDENT_PX * row.depth as f32;
                let text_x = row_rect.left() + indent + 4.0;
                let text_y = row_rect.center().y;

                // Expand/collapse arrow for directories.
                if node.is_dir() {
                    let arrow_text = if row.is_expanded { "▼" } else { "▶" };
                    let arrow_rect = Rect::from_min_size(
                        egui::pos2(row_rect.left() + indent - 14.0, row_rect.top()),
                        Vec2::new(16.0, ROW_HEIGHT),
                    );
                    let arrow_response =
                        ui.interact(arrow_rect, ui.id().with(("arrow", row_idx)), Sense::click());
                    if arrow_response.clicked() {
                        toggle_row = Some(row_idx);
                    }
                    painter.text(
                        egui::pos2(row_rect.left() + indent - 12.0, text_y),
                        egui::Align2::LEFT_CENTER,
                        arrow_text,
                        egui::FontId::proportional(11.0),
                        color_weak,
                    );
                }

                // Icon — error nodes get a warning icon.
                let (icon, icon_color) = if node.is_error {
                    ("⚠", theme.warning)
                } else {
                    match node.kind {
                        NodeKind::Project => ("📂", theme.project_icon),
                        NodeKind::Folder => ("📁", theme.folder_icon),
                        NodeKind::File => ("📄", theme.file_icon),
                    }
                };
                painter.text(
                    egui::pos2(text_x, text_y),
                    egui::Align2::LEFT_CENTER,
                    icon,
                    egui::FontId::proportional(13.0),
                    icon_color,
                );

                // Name — clipped with an ellipsis when too long.
                let name_x = text_x + 20.0;
                let right_area_start = row_rect.right() - RIGHT_COLUMNS_WIDTH;
                let max_name_w = (right_area_start - name_x - 4.0).max(20.0);

                let name_font = egui::FontId::proportional(13.0);
                let name_color = if node.is_error { color_weak } else { color_normal };
                let name_galley =
                    painter.layout_no_wrap(node.name.to_string(), name_font, name_color);

                if name_galley.size().x <= max_name_w {
                    painter.galley(
                        egui::pos2(name_x, text_y - name_galley.size().y / 2.0),
                        name_galley,
                        name_color,
                    );
                } else {
                    let clip = Rect::from_min_size(
                        egui::pos2(name_x, row_rect.top()),
                        Vec2::new(max_name_w - 12.0, ROW_HEIGHT),
                    );
                    let prev_clip = painter.clip_rect();
                    painter.set_clip_rect(prev_clip.intersect(clip));
                    painter.galley(
                        egui::pos2(name_x, text_y - name_galley.size().y / 2.0),
                        name_galley,
                        name_color,
                    );
                    painter.set_clip_rect(prev_clip);

                    painter.text(
                        egui::pos2(name_x + max_name_w - 12.0, text_y),
                        egui::Align2::LEFT_CENTER,
                        "…",
                        egui::FontId::proportional(13.0),
                        color_weak,
                    );
                }

                // Type column.
                painter.text(
                    egui::pos2(right_area_start, text_y),
                    egui::Align2::LEFT_CENTER,
                    node.kind.label(),
                    egui::FontId::proportional(12.0),
                    color_weak,
                );

                // Size column.
                painter.text(
                    egui::pos2(right_area_start + 110.0, text_y),
                    egui::Align2::LEFT_CENTER,
                    format_size(node.size),
                    egui::FontId::proportional(12.0),
                    color_weak,
                );
            }
        });

    (toggle_row, new_selection, menu_action)
}

/// Right-click context menu for a tree node. Returns a deferred action.
fn context_menu(
    ui: &mut Ui,
    state: &AppState,
    tree: &ProjectTree,
    node_index: projshelf_core::model::NodeIndex,
) -> Option<MenuAction> {
    let node = tree.node(node_index);
    let full_path = state.workspace.resolve(&tree.relative_path(node_index));
    let mut action = None;

    if ui.button("📂 Open in File Manager").clicked() {
        // For directories: open the folder itself. For files: open the
        // parent folder.
        let dir = if node.is_dir() {
            full_path.clone()
        } else {
            full_path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| full_path.clone())
        };
        action = Some(MenuAction::Reveal(dir));
        ui.close_menu();
    }

    if ui.button("📋 Copy Path").clicked() {
        ui.ctx().copy_text(full_path.display().to_string());
        ui.close_menu();
    }

    ui.separator();

    if !node.is_dir() && ui.button("📤 Retrieve File").clicked() {
        action = Some(MenuAction::Retrieve);
        ui.close_menu();
    }

    if ui.button("Delete…").clicked() {
        action = Some(MenuAction::Delete);
        ui.close_menu();
    }

    ui.separator();

    ui.label(format!("Size: {}", format_size(node.size)));
    if node.is_dir() {
        ui.label(format!(
            "Files: {}",
            projshelf_core::model::size::format_count(node.file_count)
        ));
    }

    action
}
