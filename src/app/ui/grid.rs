// src/app/ui/grid.rs
use egui as eg;
use image::RgbaImage;

use super::UiAction;
use crate::app::gfx;
use crate::app::layout::GUTTER;
use crate::app::surface::RenderSurface;
use crate::app::types::{Resolution, SlotId};

const V_SPACING: f32 = 10.0;
const LABEL_H: f32 = 18.0;
const IMAGE_PAD: f32 = 5.0;
const MIN_ROW_H: f32 = 40.0;

struct Cell {
    pending: Option<RgbaImage>, // waiting for upload on the UI thread
    tex: Option<eg::TextureHandle>,
    size: Option<eg::Vec2>,
    resolution: Option<Resolution>,
}

impl Cell {
    fn new(image: Option<&RgbaImage>, resolution: Option<Resolution>) -> Self {
        Self {
            pending: image.cloned(),
            tex: None,
            size: image.map(|i| eg::vec2(i.width() as f32, i.height() as f32)),
            resolution,
        }
    }

    fn height(&self) -> f32 {
        self.size.map_or(0.0, |s| s.y + 2.0 * IMAGE_PAD) + LABEL_H
    }
}

/// egui-backed grid. Textures are uploaded lazily while painting.
#[derive(Default)]
pub struct EguiSurface {
    width: i32,
    columns: usize,
    column_width: u32,
    rows: Vec<Vec<Option<Cell>>>,
    row_heights: Vec<f32>,
    empty_visible: bool,
    loading: bool,
    zoom_out_enabled: bool,
    zoom_in_enabled: bool,
    generation: u64,
}

impl EguiSurface {
    pub const fn loading(&self) -> bool {
        self.loading
    }

    pub const fn zoom_enabled(&self) -> (bool, bool) {
        (self.zoom_out_enabled, self.zoom_in_enabled)
    }

    fn cell_mut(&mut self, slot: SlotId) -> Option<&mut Cell> {
        self.rows
            .get_mut(slot.row)
            .and_then(|r| r.get_mut(slot.col))
            .and_then(Option::as_mut)
    }

    pub(crate) fn show(&mut self, ui: &mut eg::Ui, actions: &mut Vec<UiAction>) {
        let avail = ui.available_width().floor() as i32;
        if avail != self.width {
            self.width = avail;
            actions.push(UiAction::Resized);
        }

        if self.empty_visible {
            ui.add_space(10.0);
            ui.label("No images found");
            return;
        }

        let card_w = self.column_width as f32;
        let generation = self.generation;
        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing = eg::vec2(GUTTER as f32, V_SPACING);
                for (r, row) in self.rows.iter_mut().enumerate() {
                    let row_h = self.row_heights.get(r).copied().unwrap_or(MIN_ROW_H);
                    ui.horizontal(|ui| {
                        for (c, cell) in row.iter_mut().enumerate() {
                            let (rect, resp) =
                                ui.allocate_exact_size(eg::vec2(card_w, row_h), eg::Sense::click());
                            let Some(cell) = cell else {
                                continue;
                            };
                            if resp.clicked() {
                                actions.push(UiAction::CellClicked(SlotId { row: r, col: c }));
                            }
                            paint_cell(ui, rect, cell, (generation, r, c));
                            if resp.hovered() {
                                ui.painter().rect_stroke(
                                    rect.shrink(1.0),
                                    4.0,
                                    eg::Stroke::new(2.0, eg::Color32::YELLOW),
                                );
                            }
                        }
                    });
                }
            });
    }
}

fn paint_cell(ui: &eg::Ui, rect: eg::Rect, cell: &mut Cell, key: (u64, usize, usize)) {
    // opportunistic upload
    if let Some(img) = cell.pending.take() {
        let name = format!("thumb_{}_{}_{}", key.0, key.1, key.2);
        cell.tex = Some(gfx::upload_rgba(ui.ctx(), &img, &name));
    }

    let p = ui.painter();
    match (&cell.tex, cell.size) {
        (Some(tex), Some(size)) => {
            let img_rect = eg::Rect::from_min_size(
                eg::pos2(rect.center().x - size.x * 0.5, rect.top() + IMAGE_PAD),
                size,
            );
            p.image(
                tex.id(),
                img_rect,
                eg::Rect::from_min_max(eg::pos2(0.0, 0.0), eg::pos2(1.0, 1.0)),
                eg::Color32::WHITE,
            );
        }
        _ => {
            p.rect_filled(
                eg::Rect::from_min_max(rect.min, eg::pos2(rect.max.x, rect.max.y - LABEL_H)),
                4.0,
                eg::Color32::from_gray(40),
            );
        }
    }

    if let Some(res) = cell.resolution {
        p.text(
            eg::pos2(rect.center().x, rect.bottom() - LABEL_H * 0.5),
            eg::Align2::CENTER_CENTER,
            format!("{}x{}", res.width, res.height),
            eg::FontId::proportional(12.0),
            ui.visuals().weak_text_color(),
        );
    }
}

impl RenderSurface for EguiSurface {
    fn available_width(&self) -> i32 {
        self.width
    }

    fn reset(&mut self, columns: usize, column_width: u32) {
        self.rows.clear();
        self.row_heights.clear();
        self.columns = columns;
        self.column_width = column_width;
        self.generation += 1;
    }

    fn bind_cell(&mut self, slot: SlotId, image: Option<&RgbaImage>, resolution: Option<Resolution>) {
        let cols = self.columns.max(slot.col + 1);
        while self.rows.len() <= slot.row {
            self.rows.push((0..cols).map(|_| None).collect());
        }
        let row = &mut self.rows[slot.row];
        if row.len() <= slot.col {
            row.resize_with(slot.col + 1, || None);
        }
        row[slot.col] = Some(Cell::new(image, resolution));
    }

    fn update_cell(&mut self, slot: SlotId, image: &RgbaImage, resolution: Option<Resolution>) {
        if let Some(cell) = self.cell_mut(slot) {
            *cell = Cell::new(Some(image), resolution);
        }
    }

    fn fit_rows(&mut self) {
        self.row_heights = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .flatten()
                    .map(Cell::height)
                    .fold(MIN_ROW_H, f32::max)
            })
            .collect();
    }

    fn set_empty_state(&mut self, visible: bool) {
        self.empty_visible = visible;
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_zoom_enabled(&mut self, zoom_out: bool, zoom_in: bool) {
        self.zoom_out_enabled = zoom_out;
        self.zoom_in_enabled = zoom_in;
    }
}
