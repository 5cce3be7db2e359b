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

use chrono::Local;
use egui::{Color32, RichText};
use nostr_feed::{DiagnosticEntry, DiagnosticLog, Severity};

use super::{ACCENT, ERROR, MUTED, SUCCESS, TEXT};

const NPUB_LINK_BASE: &str = "https://njump.me/";

fn severity_style(severity: Severity) -> (&'static str, Color32) {
    match severity {
        Severity::Info => ("ℹ", Color32::from_rgb(100, 180, 255)),
        Severity::Success => ("✔", SUCCESS),
        Severity::Error => ("✕", ERROR),
    }
}

/// Footer panel: author npub followed by the latest activity.
///
/// Expanding it lists every entry still held by the log.
#[derive(Debug)]
pub struct DiagnosticPanel {
    pub expanded: bool,
}

impl DiagnosticPanel {
    pub fn new() -> Self {
        Self { expanded: false }
    }

    pub fn render(&mut self, ui: &mut egui::Ui, npub: &str, log: &DiagnosticLog) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("npub").color(MUTED).size(9.0));
            ui.hyperlink_to(
                RichText::new(shorten(npub)).color(ACCENT).size(9.0).monospace(),
                format!("{NPUB_LINK_BASE}{npub}"),
            );

            ui.separator();
            match log.latest() {
                Some(entry) => entry_row(ui, entry),
                None => {
                    ui.label(RichText::new("waiting...").color(MUTED).size(9.0).italics());
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let toggle = if self.expanded { "▼" } else { "▲" };
                if ui
                    .button(RichText::new(toggle).size(9.0))
                    .on_hover_text(if self.expanded { "Hide activity" } else { "Show activity" })
                    .clicked()
                {
                    self.expanded = !self.expanded;
                }
            });
        });

        if self.expanded {
            ui.separator();
            for entry in log.iter() {
                ui.horizontal(|ui| entry_row(ui, entry));
            }
        }
    }
}

fn entry_row(ui: &mut egui::Ui, entry: &DiagnosticEntry) {
    let (icon, color) = severity_style(entry.severity);
    let time_str = entry.timestamp.with_timezone(&Local).format("%H:%M").to_string();

    ui.label(RichText::new(icon).color(color).size(9.0));
    ui.label(RichText::new(time_str).color(MUTED).size(8.0).monospace());
    ui.label(RichText::new(&entry.message).color(TEXT).size(9.0));
}

/// `npub1abcdefgh...wxyz` style abbreviation.
fn shorten(npub: &str) -> String {
    if npub.len() <= 20 {
        return npub.to_string();
    }
    format!("{}...{}", &npub[..12], &npub[npub.len() - 6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten() {
        assert_eq!(
            shorten("npub17pdf8saz8fflz3dqyst8rhfzav4s922yv0truw85nr02jxyxqr3shkl0gr"),
            "npub17pdf8sa...hkl0gr"
        );
        assert_eq!(shorten("npub1short"), "npub1short");
    }
}
