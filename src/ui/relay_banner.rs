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

use egui::{Color32, RichText};
use nostr_feed::{RelayState, RelayStatus};

use super::{ERROR, MUTED, SUCCESS, WARNING};

fn indicator(state: RelayState) -> (&'static str, Color32) {
    match state {
        RelayState::Connected => ("●", SUCCESS),
        RelayState::Connecting => ("◐", WARNING),
        RelayState::Error => ("✕", ERROR),
    }
}

/// One row with a coloured dot, host and latency per relay.
pub fn render(ui: &mut egui::Ui, statuses: &[RelayStatus]) {
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new("RELAYS").color(MUTED).size(9.0).strong());

        for status in statuses {
            let (icon, color) = indicator(status.state);
            ui.add_space(8.0);
            ui.label(RichText::new(icon).color(color).size(10.0));
            ui.label(RichText::new(status.display_host()).size(10.0).monospace())
                .on_hover_text(&status.url);
            ui.label(RichText::new(status.latency_label()).color(color).size(9.0).monospace());
        }
    });
}
