//! Tonearm - a lightweight terminal client for a cloud music library.
//!
//! Tonearm browses a catalog of songs, hands the selected song's URL to an
//! external playback surface, and uploads new songs to a two-service
//! backend: the audio file goes to the stream service, the metadata record
//! to the catalog service.

mod api;
mod app;
mod catalog;
mod config;
mod error;
mod media;
mod models;
mod player;
mod uploader;

use std::io::Write;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::App;
use crate::config::LogFormat;
use crate::models::{CatalogState, Song};

/// Initialize the tracing/logging subsystem.
fn init_tracing(config: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => {
            subscriber
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}

const HELP: &str = "\
Commands:
  list                 show the catalog
  play <n>             select song n for playback
  now                  show the current selection
  title <text>         set the draft title
  artist <text>        set the draft artist
  file <path>          attach an audio file to the draft
  draft                show the draft
  upload               submit the draft
  refresh              re-read the catalog
  help                 show this help
  quit                 exit";

fn print_song(song: &Song) {
    println!("Now playing: {} - {}", song.title, song.artist);
    println!("  {}", song.url);
}

fn print_catalog(app: &App) {
    match app.catalog() {
        CatalogState::NotLoaded => println!("Catalog not loaded yet. Try `refresh`."),
        CatalogState::Loaded(songs) if songs.is_empty() => {
            println!("No songs yet. Upload one!");
        }
        CatalogState::Loaded(songs) => {
            for (i, song) in songs.iter().enumerate() {
                println!("{:>3}. {} - {}", i + 1, song.title, song.artist);
            }
        }
    }
}

fn print_draft(app: &App) {
    let draft = app.draft();
    let file = draft
        .file
        .as_ref()
        .map(|f| format!("{} ({} bytes)", f.name, f.size()))
        .unwrap_or_else(|| "none".to_string());

    println!("Draft:");
    println!("  title:  {}", draft.title);
    println!("  artist: {}", draft.artist);
    println!("  file:   {file}");

    if app.uploader.in_flight() {
        println!("An upload is in progress.");
    }
}

/// Dispatch one shell line. Returns `false` when the session should end.
async fn handle_command(app: &App, line: &str) -> bool {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "list" | "ls" => print_catalog(app),
        "play" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => match app.play(n - 1) {
                Some(song) => print_song(&song),
                None => println!("No song number {n}."),
            },
            _ => println!("Usage: play <number>"),
        },
        "now" => match app.player.current() {
            Some(song) => print_song(&song),
            None => println!("Nothing selected. Pick a song with `play <n>`."),
        },
        "title" => app.set_title(rest),
        "artist" => app.set_artist(rest),
        "file" => match media::load_draft_file(Path::new(rest)) {
            Ok((file, hints)) => {
                println!("Attached {} ({} bytes).", file.name, file.size());
                app.attach_file(file, hints);
            }
            Err(error) => println!("Could not attach file: {error}"),
        },
        "draft" => print_draft(app),
        "upload" => match app.submit_draft().await {
            Ok(()) => {
                println!("Upload complete.");
                print_catalog(app);
            }
            Err(error) => println!("Upload failed: {error}"),
        },
        "refresh" => {
            app.reader.fetch_all().await;
            print_catalog(app);
        }
        "help" => println!("{HELP}"),
        "quit" | "exit" => return false,
        "" => {}
        other => println!("Unknown command `{other}`. Try `help`."),
    }

    true
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize configuration
    let config = config::init();

    // Initialize logging
    init_tracing(config);

    // Validate configuration
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Configuration validation failed");
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            e.to_string(),
        ));
    }

    tracing::info!(
        catalog = %config.catalog_base(),
        stream = %config.stream_base(),
        "Starting tonearm"
    );

    let app = App::new(config);
    app.start().await;

    print_catalog(&app);
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !handle_command(&app, line.trim()).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
