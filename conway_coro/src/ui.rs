// ui.rs - egui screen: controls row plus the clickable board

use std::time::Duration;

use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2, pos2};

use crate::GameOfLife;

impl eframe::App for GameOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let Some(snapshot) = self.simulation().map(|sim| sim.snapshot()) else {
            return;
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Conway's Game of Life");
            });
            ui.separator();

            // Draw the board: grid lines on the dead background, then only the live cells
            let size = self.cell_size();
            let board_size = Vec2::new(self.board_width(), self.board_height());
            let (response, painter) = ui.allocate_painter(board_size, egui::Sense::click());
            let origin = response.rect.min;

            painter.rect_filled(response.rect, 0.0, self.dead_color);

            let step = size.get() as f32;
            let grid = Stroke::new(1.0, self.grid_color);
            for col in 0..=snapshot.cols {
                let x = origin.x + col as f32 * step;
                painter.line_segment([pos2(x, origin.y), pos2(x, origin.y + board_size.y)], grid);
            }
            for row in 0..=snapshot.rows {
                let y = origin.y + row as f32 * step;
                painter.line_segment([pos2(origin.x, y), pos2(origin.x + board_size.x, y)], grid);
            }

            for &cell in &snapshot.live_cells {
                let px = size.cell_rect(cell);
                let rect = Rect::from_min_size(
                    pos2(origin.x + px.left as f32, origin.y + px.top as f32),
                    Vec2::new(px.width as f32, px.height as f32),
                );
                painter.rect_filled(rect, 0.0, self.live_color);
            }

            // Clicking only edits the board while stopped
            if !snapshot.running && response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let offset = pos - origin;
                    if let Some(cell) = size.cell_at(offset.x, offset.y, snapshot.rows, snapshot.cols) {
                        self.toggle_cell(cell.x, cell.y);
                    }
                }
            }

            ui.add_space(8.0);

            // Controls
            ui.horizontal(|ui| {
                let (label, color) = if snapshot.running {
                    ("Stop", Color32::from_rgb(0xdc, 0x26, 0x26))
                } else {
                    ("Start", Color32::from_rgb(0x16, 0xa3, 0x4a))
                };
                if ui.add(egui::Button::new(label).fill(color)).clicked() {
                    self.start_stop(snapshot.running);
                }

                if ui.add(egui::Button::new("Clear").fill(Color32::from_rgb(0x3b, 0x82, 0xf6))).clicked() {
                    self.clear();
                }

                if ui.add(egui::Button::new("Randomize").fill(Color32::from_rgb(0xea, 0xb3, 0x08))).clicked() {
                    self.randomize();
                }

                ui.separator();

                ui.label("Update every");
                let speed = ui.add(egui::TextEdit::singleline(&mut self.speed_text).desired_width(60.0));
                ui.label("msec");
                if speed.changed() {
                    self.apply_speed_text();
                }

                ui.separator();

                ui.label(format!("Generation: {}", snapshot.generation));
                ui.label(format!("Live cells: {}", snapshot.population()));
            });

            if let Some(status) = &self.status {
                ui.colored_label(Color32::from_rgb(0xdc, 0x26, 0x26), status.as_str());
            }
        });

        // Keep polling for new generations while the clock runs
        if snapshot.running {
            ctx.request_repaint_after(snapshot.interval.min(Duration::from_millis(16)));
        }
    }
}
