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

mod app;
mod backend;
mod config;
mod content;
mod router;
mod ui;

use clap::Parser;
use eframe::egui;
use log::{error, info, warn};
use mimalloc::MiMalloc;
use nostr_feed::nip19;

use app::BlogApp;
use backend::Backend;
use config::AppConfig;
use router::Route;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Desktop reader for a single author's Nostr articles and notes
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Relay URL to use instead of the configured list (repeatable)
    #[arg(long = "relay", value_name = "URL")]
    relays: Vec<String>,

    /// Author to show (npub or hex public key)
    #[arg(long)]
    author: Option<String>,

    /// Route to open on start, e.g. /blog or /naddr1...
    #[arg(long, value_name = "ROUTE", default_value = "/")]
    open: String,

    /// Print the configuration file path and exit
    #[arg(long)]
    print_config_path: bool,
}

/// Resolve the configured author to (hex, npub), falling back to the default author.
fn resolve_author(author: &str) -> (String, String) {
    let resolved = nip19::pubkey_hex(author).and_then(|hex| nip19::npub(&hex).map(|npub| (hex, npub)));
    match resolved {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Invalid author '{author}' ({e}), using default author");
            let hex = nip19::pubkey_hex(config::DEFAULT_AUTHOR_NPUB).unwrap_or_default();
            (hex, config::DEFAULT_AUTHOR_NPUB.to_string())
        }
    }
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.print_config_path {
        match AppConfig::get_config_path() {
            Ok(path) => println!("{}", path.display()),
            Err(e) => eprintln!("Could not determine config path: {e}"),
        }
        return Ok(());
    }

    info!("Starting Nostr Blog Desktop...");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        error!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });
    if !args.relays.is_empty() {
        config.set_relays(&args.relays);
    }
    if let Some(author) = args.author {
        config.author = author;
    }

    let (author_hex, author_npub) = resolve_author(&config.author);
    let route = Route::parse(&args.open);
    info!("Showing {author_npub} via {} relays", config.relays.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([480.0, 360.0])
            .with_title("Nostr Blog"),
        ..Default::default()
    };

    eframe::run_native(
        "Nostr Blog Desktop",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            let backend = Backend::start(&config, cc.egui_ctx.clone())?;
            Ok(Box::new(BlogApp::new(config, backend, author_hex, author_npub, route)))
        }),
    )
}
