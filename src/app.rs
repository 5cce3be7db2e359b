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

use egui_commonmark::CommonMarkCache;
use log::{info, warn};
use nostr_feed::{
    ArticleAddress, AuthorProfile, AuthorSession, DiagnosticEntry, DiagnosticLog, FeedError, FeedResult, NostrEvent,
};
use tokio::sync::broadcast;

use crate::backend::{Backend, BackendEvent};
use crate::config::AppConfig;
use crate::router::Route;
use crate::ui::compose::{ArticleForm, NoteForm};
use crate::ui::diagnostic_panel::DiagnosticPanel;
use crate::ui::login::LoginForm;
use crate::ui::{self, pages, relay_banner};

/// Environment variable holding the author's secret key for unattended login.
pub const SECRET_KEY_ENV: &str = "NOSTR_BLOG_NSEC";

/// Request state of a piece of remote content.
#[derive(Debug, Clone, Default)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Missing,
    Failed(String),
}

impl<T> Loadable<T> {
    fn from_result(result: FeedResult<T>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(FeedError::NotFound(_)) => Loadable::Missing,
            Err(e) => Loadable::Failed(e.to_string()),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Loadable::Idle)
    }
}

pub struct BlogApp {
    config: AppConfig,
    backend: Backend,
    author_hex: String,
    author_npub: String,

    route: Route,
    history: Vec<Route>,

    profile: Loadable<AuthorProfile>,
    nip05_verified: Option<bool>,
    articles: Loadable<Vec<NostrEvent>>,
    notes: Loadable<Vec<NostrEvent>>,
    article: Option<(ArticleAddress, Loadable<NostrEvent>)>,

    diagnostics: DiagnosticLog,
    diagnostics_rx: broadcast::Receiver<DiagnosticEntry>,
    diagnostic_panel: DiagnosticPanel,

    session: AuthorSession,
    login_form: LoginForm,
    note_form: NoteForm,
    article_form: ArticleForm,
    markdown_cache: CommonMarkCache,
}

impl std::fmt::Debug for BlogApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogApp")
            .field("route", &self.route)
            .field("author", &self.author_npub)
            .finish_non_exhaustive()
    }
}

impl BlogApp {
    pub fn new(config: AppConfig, backend: Backend, author_hex: String, author_npub: String, route: Route) -> Self {
        let diagnostics_rx = backend.subscribe_diagnostics();
        let mut session = AuthorSession::new(author_hex.clone());

        if let Ok(secret) = std::env::var(SECRET_KEY_ENV) {
            match session.login(&secret) {
                Ok(()) => info!("Logged in from {SECRET_KEY_ENV}"),
                Err(e) => warn!("Ignoring {SECRET_KEY_ENV}: {e}"),
            }
        }

        let mut app = Self {
            config,
            backend,
            author_hex,
            author_npub,
            route,
            history: Vec::new(),
            profile: Loadable::Loading,
            nip05_verified: None,
            articles: Loadable::Idle,
            notes: Loadable::Idle,
            article: None,
            diagnostics: DiagnosticLog::ready(),
            diagnostics_rx,
            diagnostic_panel: DiagnosticPanel::new(),
            session,
            login_form: LoginForm::default(),
            note_form: NoteForm::default(),
            article_form: ArticleForm::default(),
            markdown_cache: CommonMarkCache::default(),
        };

        app.backend.fetch_profile(&app.author_hex);
        app.load_route();
        app
    }

    fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        info!("Navigating to {}", route.path());
        let previous = std::mem::replace(&mut self.route, route);
        self.history.push(previous);
        self.load_route();
    }

    fn back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.route = previous;
            self.load_route();
        }
    }

    /// Start any fetch the current route needs and has not made yet.
    fn load_route(&mut self) {
        match &self.route {
            Route::Blog if self.articles.is_idle() => {
                self.articles = Loadable::Loading;
                self.backend.fetch_articles(&self.author_hex);
            }
            Route::Notes if self.notes.is_idle() => {
                self.notes = Loadable::Loading;
                self.backend.fetch_notes(&self.author_hex);
            }
            Route::Article(address) => {
                let cached = matches!(&self.article, Some((current, state)) if current == address && !matches!(state, Loadable::Failed(_)));
                if !cached {
                    self.article = Some((address.clone(), Loadable::Loading));
                    self.backend.fetch_article(address.clone());
                }
            }
            _ => {}
        }
    }

    fn refresh(&mut self) {
        match self.route {
            Route::Blog => self.articles = Loadable::Idle,
            Route::Notes => self.notes = Loadable::Idle,
            Route::Article(_) => self.article = None,
            _ => {
                self.profile = Loadable::Loading;
                self.nip05_verified = None;
                self.backend.fetch_profile(&self.author_hex);
            }
        }
        self.load_route();
    }

    fn handle_backend_events(&mut self) {
        for event in self.backend.poll() {
            match event {
                BackendEvent::Profile(result) => {
                    if let Ok(profile) = &result {
                        if let Some(nip05) = profile.metadata.as_ref().and_then(|m| m.nip05.as_deref()) {
                            self.backend.verify_nip05(nip05, &profile.event.pubkey);
                        }
                    }
                    self.profile = Loadable::from_result(result);
                }
                BackendEvent::Articles(result) => self.articles = Loadable::from_result(result),
                BackendEvent::Notes(result) => self.notes = Loadable::from_result(result),
                BackendEvent::Article { address, result } => {
                    // Ignore late replies for an article the user already left
                    if matches!(&self.article, Some((current, _)) if *current == address) {
                        self.article = Some((address, Loadable::from_result(result)));
                    }
                }
                BackendEvent::Published { kind, result } => {
                    if kind == nostr_feed::nip19::KIND_LONG_FORM {
                        self.article_form.finish(&result);
                        if result.is_ok() {
                            self.articles = Loadable::Idle;
                        }
                    } else {
                        self.note_form.finish(&result);
                        if result.is_ok() {
                            self.notes = Loadable::Idle;
                        }
                    }
                    self.load_route();
                }
                BackendEvent::Nip05Verified(verified) => self.nip05_verified = Some(verified),
            }
        }
    }

    fn compose(&mut self, ui: &mut egui::Ui) {
        let submitted = match self.route {
            Route::Blog => self.article_form.render(ui, &mut self.markdown_cache),
            Route::Notes => self.note_form.render(ui),
            _ => None,
        };

        if let Some(content) = submitted {
            match self.session.keys() {
                Some(keys) => self.backend.publish(keys.clone(), content),
                None => warn!("Publish requested without an author session"),
            }
        }
        ui.add_space(12.0);
    }

    fn page(&mut self, ui: &mut egui::Ui) -> Option<Route> {
        match &self.route {
            Route::About => pages::about(ui, &self.profile, self.nip05_verified),
            Route::HowItWorks => {
                pages::how_it_works(ui);
                None
            }
            Route::Cv => {
                pages::cv(ui, &self.config.cv_location);
                None
            }
            Route::Blog => pages::blog(ui, &self.articles),
            Route::Notes => {
                pages::notes(ui, &self.notes);
                None
            }
            Route::Article(_) => {
                let state = self.article.as_ref().map_or(&Loadable::Loading, |(_, state)| state);
                pages::article(ui, state, &mut self.markdown_cache);
                None
            }
            Route::NotFound(path) => pages::not_found(ui, path),
        }
    }
}

impl eframe::App for BlogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.diagnostics.drain(&mut self.diagnostics_rx);
        self.handle_backend_events();

        let mut next_route = None;
        let title = self
            .profile_name()
            .unwrap_or("Nostr Blog")
            .to_string();

        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.add_space(4.0);
            next_route = ui::nav_bar(ui, &self.route, &title);
            ui.add_space(2.0);
            relay_banner::render(ui, &self.backend.relay_statuses());
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("diagnostics").show(ctx, |ui| {
            ui.add_space(2.0);
            self.diagnostic_panel.render(ui, &self.author_npub, &self.diagnostics);
            ui.add_space(2.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.add_enabled(!self.history.is_empty(), egui::Button::new("◀ Back")).clicked() {
                    self.back();
                }
                if ui.button("⟳ Refresh").clicked() {
                    self.refresh();
                }
                ui.label(egui::RichText::new(self.route.path()).color(ui::MUTED).monospace().size(10.0));
            });
            ui.separator();

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.set_max_width(760.0);

                if matches!(self.route, Route::Blog | Route::Notes) {
                    self.login_form.render(ui, &mut self.session);
                    ui.add_space(8.0);
                    if self.session.is_author() {
                        self.compose(ui);
                    }
                }

                if let Some(route) = self.page(ui) {
                    next_route = Some(route);
                }
            });
        });

        if let Some(route) = next_route {
            self.navigate(route);
        }
    }
}

impl BlogApp {
    fn profile_name(&self) -> Option<&str> {
        match &self.profile {
            Loadable::Ready(profile) => profile.metadata.as_ref().and_then(|m| m.display()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_missing() {
        let state: Loadable<()> = Loadable::from_result(Err(FeedError::NotFound("article")));
        assert!(matches!(state, Loadable::Missing));
    }

    #[test]
    fn test_other_errors_keep_message() {
        let state: Loadable<()> = Loadable::from_result(Err(FeedError::Relay("boom".to_string())));
        match state {
            Loadable::Failed(message) => assert_eq!(message, "relay error: boom"),
            other => panic!("unexpected state {other:?}"),
        }
    }
}
