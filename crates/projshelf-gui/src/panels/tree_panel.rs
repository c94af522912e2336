/// Main tree panel — column headers plus the virtualised tree view.
use crate::state::AppState;
use crate::theme::ShelfTheme;
use crate::widgets;
use crate::widgets::tree_view::RIGHT_COLUMNS_WIDTH;
use egui::Ui;

/// Draw the tree panel (central content area).
pub fn tree_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = ShelfTheme::current(ui);

    // Column headers.
    ui.horizontal(|ui| {
        let header_height = 20.0;
        let rect = egui::Rect::from_min_size(
            ui.cursor().min,
            egui::vec2(ui.available_width(), header_height),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, theme.header_bg);

        ui.allocate_exact_size(
            egui::vec2(ui.available_width(), header_height),
            egui::Sense::hover(),
        );

        let muted = theme.text_muted;
        painter.text(
            egui::pos2(rect.left() + 8.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            "Name",
            egui::FontId::proportional(12.0),
            muted,
        );

        let right_start = rect.right() - RIGHT_COLUMNS_WIDTH;
        painter.text(
            egui::pos2(right_start, rect.center().y),
            egui::Align2::LEFT_CENTER,
            "Type",
            egui::FontId::proportional(12.0),
            muted,
        );

        painter.text(
            egui::pos2(right_start + 110.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            "Size",
            egui::FontId::proportional(12.0),
            muted,
        );
    });

    ui.separator();

    widgets::tree_view::tree_view(ui, state);
}
