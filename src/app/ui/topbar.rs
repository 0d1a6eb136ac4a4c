// src/app/ui/topbar.rs
use std::path::PathBuf;

use eframe::egui as eg;

use super::UiAction;

impl crate::app::PickerApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ui: &mut eg::Ui, actions: &mut Vec<UiAction>) {
        let (min_scale, max_scale) = self.pipeline.layout().bounds();
        let (zoom_out, zoom_in) = self.pipeline.surface().zoom_enabled();

        ui.horizontal(|ui| {
            ui.label(format!("Choose {}", self.pipeline.category().as_str().replace('_', " ")));
            ui.separator();

            // Zoom
            if ui.add_enabled(zoom_out, eg::Button::new("−")).clicked() {
                actions.push(UiAction::ZoomOut);
            }
            let mut scale = self.pipeline.layout().scale();
            if ui
                .add(eg::Slider::new(&mut scale, min_scale..=max_scale).show_value(false))
                .changed()
            {
                actions.push(UiAction::SetScale(scale));
            }
            if ui.add_enabled(zoom_in, eg::Button::new("+")).clicked() {
                actions.push(UiAction::ZoomIn);
            }

            ui.separator();

            // Local file
            let resp = ui.add(
                eg::TextEdit::singleline(&mut self.local_path_input)
                    .hint_text("Local image (.jpg/.png)…")
                    .desired_width(260.0),
            );
            let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter));
            if (ui.button("Choose").clicked() || submitted) && !self.local_path_input.trim().is_empty()
            {
                actions.push(UiAction::ChooseLocal(PathBuf::from(self.local_path_input.trim())));
            }

            if self.pipeline.surface().loading() {
                ui.separator();
                ui.add(eg::Spinner::new().size(14.0));
                ui.label("Loading…");
            }

            ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    actions.push(UiAction::Close);
                }
            });
        });

        if !self.status.is_empty() {
            ui.small(self.status.as_str());
        }
    }
}
