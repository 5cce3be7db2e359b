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

//! Author-only compose forms for notes and long-form articles.

use egui::RichText;
use egui_commonmark::CommonMarkCache;
use nostr_feed::nip19::KIND_LONG_FORM;
use nostr_feed::{ArticleDraft, FeedResult, NoteDraft, NostrEvent, UnsignedContent};

use super::{markdown, ERROR, MUTED, SUCCESS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Write,
    Preview,
}

/// Form state shared by both compose forms.
#[derive(Debug, Default)]
struct FormStatus {
    publishing: bool,
    error: Option<String>,
    published: Option<String>,
}

impl FormStatus {
    fn begin(&mut self, built: FeedResult<UnsignedContent>) -> Option<UnsignedContent> {
        self.published = None;
        match built {
            Ok(content) => {
                self.publishing = true;
                self.error = None;
                Some(content)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Returns true when the form should be cleared.
    fn finish(&mut self, result: &FeedResult<NostrEvent>, success: &str) -> bool {
        self.publishing = false;
        match result {
            Ok(_) => {
                self.error = None;
                self.published = Some(success.to_string());
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    fn show(&self, ui: &mut egui::Ui) {
        if self.publishing {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Publishing...").color(MUTED).size(10.0));
            });
        }
        if let Some(error) = &self.error {
            ui.label(RichText::new(error).color(ERROR).size(10.0));
        }
        if let Some(done) = &self.published {
            ui.label(RichText::new(done).color(SUCCESS).size(10.0));
        }
    }
}

#[derive(Debug, Default)]
pub struct NoteForm {
    draft: NoteDraft,
    status: FormStatus,
}

impl NoteForm {
    pub fn submit(&mut self) -> Option<UnsignedContent> {
        self.status.begin(self.draft.to_unsigned())
    }

    pub fn finish(&mut self, result: &FeedResult<NostrEvent>) {
        if self.status.finish(result, "Note published!") {
            self.draft = NoteDraft::default();
        }
    }

    /// Draw the form. Returns content to publish when the button is pressed.
    pub fn render(&mut self, ui: &mut egui::Ui) -> Option<UnsignedContent> {
        let mut submitted = None;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(RichText::new("NEW NOTE").color(MUTED).size(9.0).strong());
            ui.add(
                egui::TextEdit::multiline(&mut self.draft.content)
                    .hint_text("What's on your mind?")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            ui.add(
                egui::TextEdit::singleline(&mut self.draft.image_url)
                    .hint_text("Image URL (optional)")
                    .desired_width(f32::INFINITY),
            );

            ui.horizontal(|ui| {
                let enabled = !self.status.publishing && self.draft.is_publishable();
                if ui.add_enabled(enabled, egui::Button::new("Publish note")).clicked() {
                    submitted = self.submit();
                }
            });
            self.status.show(ui);
        });

        submitted
    }
}

#[derive(Debug, Default)]
pub struct ArticleForm {
    draft: ArticleDraft,
    status: FormStatus,
    tab: Tab,
}

impl ArticleForm {
    pub fn submit(&mut self) -> Option<UnsignedContent> {
        self.status.begin(self.draft.to_unsigned())
    }

    pub fn finish(&mut self, result: &FeedResult<NostrEvent>) {
        if self.status.finish(result, "Article published!") {
            self.draft = ArticleDraft::default();
            self.tab = Tab::Write;
        }
    }

    pub fn render(&mut self, ui: &mut egui::Ui, cache: &mut CommonMarkCache) -> Option<UnsignedContent> {
        let mut submitted = None;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(RichText::new("NEW ARTICLE").color(MUTED).size(9.0).strong());

            egui::Grid::new("article_form").num_columns(2).spacing([8.0, 4.0]).show(ui, |ui| {
                ui.label("Title");
                ui.text_edit_singleline(&mut self.draft.title);
                ui.end_row();

                ui.label("Summary");
                ui.text_edit_singleline(&mut self.draft.summary);
                ui.end_row();

                ui.label("Image URL");
                ui.text_edit_singleline(&mut self.draft.image_url);
                ui.end_row();

                ui.label("Identifier");
                let identifier_hint = self.draft.resolved_identifier();
                ui.add(egui::TextEdit::singleline(&mut self.draft.identifier).hint_text(identifier_hint));
                ui.end_row();
            });

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Write, "Write");
                ui.selectable_value(&mut self.tab, Tab::Preview, "Preview");
            });

            match self.tab {
                Tab::Write => {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.draft.content)
                            .hint_text("Markdown content")
                            .desired_rows(12)
                            .desired_width(f32::INFINITY)
                            .code_editor(),
                    );
                }
                Tab::Preview => {
                    if self.draft.content.trim().is_empty() {
                        ui.label(RichText::new("Nothing to preview").color(MUTED).italics());
                    } else {
                        markdown(ui, cache, &self.draft.content);
                    }
                }
            }

            let enabled = !self.status.publishing && self.draft.is_publishable();
            if ui
                .add_enabled(enabled, egui::Button::new("Publish article"))
                .on_hover_text(format!("Publishes a kind {KIND_LONG_FORM} event"))
                .clicked()
            {
                submitted = self.submit();
            }
            self.status.show(ui);
        });

        submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_feed::FeedError;

    fn published() -> FeedResult<NostrEvent> {
        Ok(NostrEvent {
            id: "id".to_string(),
            pubkey: "pk".to_string(),
            created_at: 0,
            kind: 1,
            tags: Vec::new(),
            content: "hi".to_string(),
        })
    }

    #[test]
    fn test_empty_note_shows_validation_error() {
        let mut form = NoteForm::default();
        assert!(form.submit().is_none());
        assert_eq!(form.status.error.as_deref(), Some("Please write some content before publishing."));
        assert!(!form.status.publishing);
    }

    #[test]
    fn test_successful_publish_clears_note() {
        let mut form = NoteForm::default();
        form.draft.content = "gm".to_string();
        assert!(form.submit().is_some());
        assert!(form.status.publishing);

        form.finish(&published());
        assert!(form.draft.content.is_empty());
        assert_eq!(form.status.published.as_deref(), Some("Note published!"));
    }

    #[test]
    fn test_failed_publish_keeps_article() {
        let mut form = ArticleForm::default();
        form.draft.title = "Hello".to_string();
        form.draft.content = "Body".to_string();
        assert!(form.submit().is_some());

        form.finish(&Err(FeedError::Relay("no relay accepted".to_string())));
        assert_eq!(form.draft.title, "Hello");
        assert!(form.status.error.is_some());
        assert!(!form.status.publishing);
    }
}
