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

//! Page bodies. Functions that contain internal links return the route
//! the user clicked.

use egui::RichText;
use egui_commonmark::CommonMarkCache;
use log::warn;
use nostr_feed::{ArticleMeta, AuthorProfile, NostrEvent};

use super::{markdown, placeholder, ACCENT, ERROR, MUTED, SUCCESS, TEXT};
use crate::app::Loadable;
use crate::content::{self, PageTitle, Segment};
use crate::router::Route;

fn page_title(ui: &mut egui::Ui, page: &PageTitle) {
    ui.add_space(12.0);
    ui.label(RichText::new(page.title).size(26.0).strong());
    if !page.subtitle.is_empty() {
        ui.label(RichText::new(page.subtitle).color(MUTED).size(13.0));
    }
    ui.add_space(12.0);
}

fn paragraph(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT).size(14.0));
    ui.add_space(8.0);
}

/// Paragraph with `{placeholder}` links. Internal targets become routes.
fn linked_paragraph(ui: &mut egui::Ui, text: &str, links: &[(&str, &str)]) -> Option<Route> {
    let mut clicked = None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for segment in content::segments(text, links) {
            match segment {
                Segment::Text(text) => {
                    ui.label(RichText::new(text).color(TEXT).size(14.0));
                }
                Segment::Link { label, target } if target.starts_with('/') => {
                    if ui.link(RichText::new(label).color(ACCENT).size(14.0)).clicked() {
                        clicked = Some(Route::parse(target));
                    }
                }
                Segment::Link { label, target } => {
                    ui.hyperlink_to(RichText::new(label).color(ACCENT).size(14.0), target);
                }
            }
        }
    });
    ui.add_space(8.0);

    clicked
}

fn loading_state<T>(ui: &mut egui::Ui, state: &Loadable<T>, what: &str) -> bool {
    match state {
        Loadable::Idle | Loadable::Loading => {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.label(RichText::new(format!("Loading {what}...")).color(MUTED).size(11.0));
            });
            true
        }
        Loadable::Missing => {
            placeholder(ui, &format!("No {what} found"), MUTED);
            true
        }
        Loadable::Failed(e) => {
            placeholder(ui, &format!("Failed to load {what}: {e}"), ERROR);
            true
        }
        Loadable::Ready(_) => false,
    }
}

pub fn about(ui: &mut egui::Ui, profile: &Loadable<AuthorProfile>, nip05_verified: Option<bool>) -> Option<Route> {
    ui.add_space(12.0);

    if let Loadable::Ready(profile) = profile {
        if let Some(metadata) = &profile.metadata {
            ui.horizontal(|ui| {
                if let Some(picture) = &metadata.picture {
                    ui.add(egui::Image::new(picture.as_str()).fit_to_exact_size(egui::vec2(72.0, 72.0)).corner_radius(36.0));
                }
                ui.vertical(|ui| {
                    ui.label(RichText::new(metadata.display().unwrap_or("Anonymous")).size(24.0).strong());
                    if let Some(nip05) = &metadata.nip05 {
                        let (badge, color) = match nip05_verified {
                            Some(true) => ("✔", SUCCESS),
                            Some(false) => ("✕", ERROR),
                            None => ("…", MUTED),
                        };
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(nip05).color(MUTED).size(11.0));
                            ui.label(RichText::new(badge).color(color).size(11.0));
                        });
                    }
                    if let Some(website) = &metadata.website {
                        ui.hyperlink_to(RichText::new(website).color(ACCENT).size(11.0), website);
                    }
                });
            });
            if let Some(about) = &metadata.about {
                ui.add_space(8.0);
                paragraph(ui, about);
            }
            ui.separator();
        }
    } else {
        loading_state(ui, profile, "profile");
    }

    let mut clicked = None;
    for para in content::ABOUT_PARAGRAPHS {
        if let Some(route) = linked_paragraph(ui, para.text, para.links) {
            clicked = Some(route);
        }
    }
    clicked
}

pub fn how_it_works(ui: &mut egui::Ui) {
    page_title(ui, &content::HOW_IT_WORKS_PAGE);
    for text in content::HOW_IT_WORKS_PARAGRAPHS {
        paragraph(ui, text);
    }

    ui.add_space(8.0);
    ui.label(RichText::new(content::WHY_NOT_SELF_HOST_HEADING).size(18.0).strong());
    ui.add_space(6.0);
    for text in content::WHY_NOT_SELF_HOST_PARAGRAPHS {
        paragraph(ui, text);
    }
    for bullet in content::WHY_NOT_SELF_HOST_BULLETS {
        ui.horizontal_wrapped(|ui| {
            ui.label("•");
            ui.label(RichText::new(*bullet).color(TEXT).size(14.0));
        });
    }

    ui.add_space(12.0);
    ui.hyperlink_to(
        RichText::new("Read the same content in another client").color(ACCENT),
        content::OTHER_CLIENT_LINK,
    );
}

pub fn cv(ui: &mut egui::Ui, cv_location: &str) {
    page_title(ui, &content::CV_PAGE);

    ui.label(RichText::new(cv_location).color(MUTED).monospace().size(11.0));
    ui.add_space(8.0);
    if ui.button("Open CV").clicked() {
        if let Err(e) = webbrowser::open(cv_location) {
            warn!("Failed to open CV at {cv_location}: {e}");
        }
    }
}

/// Article cards linking to each article's address.
pub fn blog(ui: &mut egui::Ui, articles: &Loadable<Vec<NostrEvent>>) -> Option<Route> {
    page_title(ui, &content::BLOG_PAGE);
    if loading_state(ui, articles, "articles") {
        return None;
    }
    let Loadable::Ready(articles) = articles else {
        return None;
    };
    if articles.is_empty() {
        placeholder(ui, "No articles yet.", MUTED);
        return None;
    }

    let mut clicked = None;
    for event in articles {
        let meta = ArticleMeta::from_event(event);
        let response = egui::Frame::group(ui.style())
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    if let Some(image) = &meta.image {
                        ui.add(egui::Image::new(image.as_str()).fit_to_exact_size(egui::vec2(96.0, 64.0)));
                    }
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&meta.title).size(17.0).strong());
                        ui.label(RichText::new(meta.formatted_date()).color(MUTED).size(10.0));
                        if let Some(summary) = &meta.summary {
                            ui.label(RichText::new(summary).color(TEXT).size(12.0));
                        }
                    });
                });
            })
            .response
            .interact(egui::Sense::click());

        if response.clicked() {
            clicked = meta.address(event).map(Route::Article);
        }
        ui.add_space(6.0);
    }
    clicked
}

pub fn notes(ui: &mut egui::Ui, notes: &Loadable<Vec<NostrEvent>>) {
    page_title(ui, &content::NOTES_PAGE);
    if loading_state(ui, notes, "notes") {
        return;
    }
    let Loadable::Ready(notes) = notes else {
        return;
    };
    if notes.is_empty() {
        placeholder(ui, "No notes yet.", MUTED);
        return;
    }

    for note in notes {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new(nostr_feed::event::format_long_date(note.created_at_utc()))
                    .color(MUTED)
                    .size(10.0),
            );
            ui.label(RichText::new(&note.content).color(TEXT).size(13.0));
        });
        ui.add_space(6.0);
    }
}

pub fn article(ui: &mut egui::Ui, state: &Loadable<NostrEvent>, cache: &mut CommonMarkCache) {
    match state {
        Loadable::Missing => placeholder(ui, "Article not found", MUTED),
        Loadable::Ready(event) => {
            let meta = ArticleMeta::from_event(event);
            ui.add_space(12.0);
            ui.label(RichText::new(&meta.title).size(28.0).strong());
            ui.label(RichText::new(meta.formatted_date()).color(MUTED).size(11.0));
            if let Some(image) = &meta.image {
                ui.add_space(8.0);
                ui.add(egui::Image::new(image.as_str()).max_width(ui.available_width()));
            }
            if let Some(summary) = &meta.summary {
                ui.add_space(6.0);
                ui.label(RichText::new(summary).italics().color(MUTED).size(13.0));
            }
            ui.separator();
            markdown(ui, cache, &event.content);
        }
        other => {
            loading_state(ui, other, "article");
        }
    }
}

pub fn not_found(ui: &mut egui::Ui, path: &str) -> Option<Route> {
    ui.add_space(48.0);
    let mut clicked = None;
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("404").size(40.0).strong());
        ui.label(RichText::new(format!("Nothing lives at {path}")).color(MUTED));
        ui.add_space(8.0);
        if ui.link(RichText::new("Return to Home").color(ACCENT)).clicked() {
            clicked = Some(Route::About);
        }
    });
    clicked
}
