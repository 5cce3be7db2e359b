// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! UI components for the blog viewer.
//!
//! Each module draws one part of the window from state owned by the app.

pub mod compose;
pub mod diagnostic_panel;
pub mod login;
pub mod pages;
pub mod relay_banner;

use egui::Color32;
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};

use crate::router::Route;

pub const ACCENT: Color32 = Color32::from_rgb(100, 180, 220);
pub const MUTED: Color32 = Color32::from_rgb(130, 130, 130);
pub const TEXT: Color32 = Color32::from_rgb(200, 200, 200);
pub const SUCCESS: Color32 = Color32::from_rgb(100, 255, 100);
pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);

const NAV_ITEMS: [(&str, Route); 4] = [
    ("About", Route::About),
    ("Blog", Route::Blog),
    ("Notes", Route::Notes),
    ("CV", Route::Cv),
];

/// Top navigation. Returns the route the user picked, if any.
pub fn nav_bar(ui: &mut egui::Ui, current: &Route, title: &str) -> Option<Route> {
    let mut selected = None;

    ui.horizontal(|ui| {
        if ui
            .add(egui::Label::new(egui::RichText::new(title).color(ACCENT).size(16.0).strong()).sense(egui::Sense::click()))
            .clicked()
        {
            selected = Some(Route::About);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            for (label, route) in NAV_ITEMS.iter().rev() {
                let active = current == route;
                if ui.selectable_label(active, *label).clicked() && !active {
                    selected = Some(route.clone());
                }
            }
        });
    });

    selected
}

/// Centered placeholder used while content loads or when it is missing.
pub fn placeholder(ui: &mut egui::Ui, text: &str, color: Color32) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(text).color(color).italics());
    });
}

/// Render an article or draft body written in markdown.
pub fn markdown(ui: &mut egui::Ui, cache: &mut CommonMarkCache, source: &str) {
    CommonMarkViewer::new().show(ui, cache, source);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_headless(source: &str) -> egui::FullOutput {
        let ctx = egui::Context::default();
        let mut cache = CommonMarkCache::default();
        ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| markdown(ui, &mut cache, source));
        })
    }

    #[test]
    fn test_markdown_renders_inline_and_block_markup() {
        let output = render_headless(
            "# Title\n\nSome **bold**, *italic* and `code` with a [link](https://example.com).\n\n\
             - one\n- two\n\n> quoted\n\n```rust\nfn main() {}\n```\n\n---\n",
        );
        assert!(!output.shapes.is_empty());
    }

    #[test]
    fn test_markdown_tolerates_unclosed_fence() {
        let output = render_headless("```\nno closing fence");
        assert!(!output.shapes.is_empty());
    }
}
