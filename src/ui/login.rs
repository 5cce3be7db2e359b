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

use egui::RichText;
use log::info;
use nostr_feed::AuthorSession;

use super::{ERROR, MUTED, SUCCESS};

/// Author login card. The secret key never leaves this form and the session.
#[derive(Default)]
pub struct LoginForm {
    secret: String,
    error: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    /// Try the entered key against the session. The field is cleared either way.
    pub fn submit(&mut self, session: &mut AuthorSession) {
        let secret = std::mem::take(&mut self.secret);
        match session.login(secret.trim()) {
            Ok(()) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn render(&mut self, ui: &mut egui::Ui, session: &mut AuthorSession) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            if session.is_author() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("●").color(SUCCESS).size(10.0));
                    ui.label(RichText::new("Logged in as author").size(11.0));
                    if ui.small_button("Log out").clicked() {
                        session.logout();
                        info!("Author logged out");
                    }
                });
                return;
            }

            ui.label(RichText::new("AUTHOR LOGIN").color(MUTED).size(9.0).strong());
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.secret)
                        .password(true)
                        .hint_text("nsec1...")
                        .desired_width(260.0),
                );
                let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (ui.button("Log in").clicked() || entered) && !self.secret.trim().is_empty() {
                    self.submit(session);
                }
            });

            if let Some(error) = &self.error {
                ui.label(RichText::new(error).color(ERROR).size(10.0));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_feed::auth::ACCESS_DENIED;
    use nostr_feed::Keys;

    #[test]
    fn test_submit_author_key() {
        let keys = Keys::generate();
        let mut session = AuthorSession::new(keys.public_key().to_hex());
        let mut form = LoginForm {
            secret: keys.secret_key().to_secret_hex(),
            error: None,
        };

        form.submit(&mut session);
        assert!(session.is_author());
        assert!(form.secret.is_empty());
        assert!(form.error.is_none());
    }

    #[test]
    fn test_submit_other_key_is_denied() {
        let author = Keys::generate();
        let intruder = Keys::generate();
        let mut session = AuthorSession::new(author.public_key().to_hex());
        let mut form = LoginForm {
            secret: intruder.secret_key().to_secret_hex(),
            error: None,
        };

        form.submit(&mut session);
        assert!(!session.is_author());
        assert_eq!(form.error.as_deref(), Some(ACCESS_DENIED));
    }
}
