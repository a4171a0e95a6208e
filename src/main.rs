mod config;
mod db;
mod replay;
mod services;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use canvas::doc::{Note, NoteId, PartialNote};
use canvas::engine::EngineCore;
use canvas::input::Focus;
use canvas::notes::ZDirection;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::services::clipboard::{ClipboardError, ClipboardItem};
use crate::services::persistence::{spawn_autosave, spawn_writer};
use crate::services::repository::{MemoryNoteRepository, NoteRepository, SqliteNoteRepository, StoreError};
use crate::services::settings::{BoardSettings, MemoryKvStore, Settings, SqliteKvStore};
use crate::services::transfer::TransferError;
use crate::state::{AppState, created_id};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Replay(#[from] replay::ReplayError),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no note with id {0}")]
    NoteNotFound(NoteId),
    #[error("no note was created")]
    NothingCreated,
}

#[derive(Parser, Debug)]
#[command(name = "noteboard", about = "Sticky-note board: notes, camera, gestures and storage")]
struct Cli {
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Fix note placement jitter and colors.
    #[arg(long)]
    seed: Option<u64>,

    /// Dry run: start from an empty board and keep nothing.
    #[arg(long, default_value_t = false)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print notes in draw order.
    List,
    /// Add a note at the center of the saved view.
    Add {
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Add an image note from a file.
    AddImage { path: PathBuf },
    /// Paste a file's bytes as one clipboard item of the given type.
    Paste {
        #[arg(long)]
        mime: String,
        path: PathBuf,
    },
    Export { path: PathBuf },
    /// Replace the board with an export file.
    Import { path: PathBuf },
    /// Feed a JSON-lines input script through the engine.
    Replay { path: PathBuf },
    Delete { id: NoteId },
    /// Move a note one layer up.
    Raise { id: NoteId },
    /// Move a note one layer down.
    Lower { id: NoteId },
    /// Edit a note's text.
    Edit { id: NoteId, text: String },
    /// Change a note's background color.
    Color { id: NoteId, color: String },
    /// Lock or unlock decor notes against toggling.
    LockDecor {
        #[arg(action = ArgAction::Set)]
        locked: bool,
    },
    /// Show or change board settings.
    Settings {
        #[arg(long)]
        bg_color: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("noteboard=info,canvas=warn")))
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "failed to read .env");
        }
    }

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let pool = if cli.memory { None } else { Some(db::init_pool(&config.database_url, config.db_max_connections).await?) };
    let (repo, settings): (Arc<dyn NoteRepository>, Settings) = match &pool {
        Some(pool) => (
            Arc::new(SqliteNoteRepository::new(pool.clone())) as Arc<dyn NoteRepository>,
            Settings::new(Arc::new(SqliteKvStore::new(pool.clone()))),
        ),
        None => (Arc::new(MemoryNoteRepository::new()) as Arc<dyn NoteRepository>, Settings::new(Arc::new(MemoryKvStore::new()))),
    };
    let (persist_tx, writer) = spawn_writer(repo.clone(), config.persist_queue_capacity);

    let mut engine = match cli.seed {
        Some(seed) => EngineCore::with_seed(config.engine(), seed),
        None => EngineCore::with_config(config.engine()),
    };
    engine.set_viewport(config.viewport_width, config.viewport_height);

    let state = AppState::new(engine, repo, settings, Some(persist_tx));
    let autosave = spawn_autosave(state.clone(), Duration::from_secs(config.autosave_interval_secs));
    let loaded = state.load().await;
    info!(
        notes = loaded.notes,
        guide_added = loaded.guide_added,
        memory = cli.memory,
        database = %config.database_url,
        "noteboard ready"
    );

    let result = run(&state, cli.command).await;

    // Shutdown: stop autosave, close the queue, let the writer drain.
    autosave.abort();
    if let Err(e) = autosave.await {
        if !e.is_cancelled() {
            error!(error = %e, "autosave task failed");
        }
    }
    drop(state);
    if let Err(e) = writer.await {
        error!(error = %e, "note writer task failed");
    }
    if let Some(pool) = pool {
        pool.close().await;
    }

    result
}

async fn run(state: &AppState, command: Command) -> Result<(), CliError> {
    match command {
        Command::List => {
            let engine = state.engine.read().await;
            for note in engine.draw_order() {
                println!("{}", describe(note, engine.active()));
            }
            Ok(())
        }
        Command::Add { text, width, height, color } => {
            let draft = PartialNote { content: text, width, height, color, ..PartialNote::default() };
            let actions = state.drive(|engine| engine.add_note(draft)).await;
            print_created(created_id(&actions))
        }
        Command::AddImage { path } => {
            let id = state.add_image(&path, Focus::Board).await?;
            print_created(id)
        }
        Command::Paste { mime, path } => {
            let data = tokio::fs::read(&path).await?;
            let id = state.paste(&[ClipboardItem::new(mime, data)], Focus::Board).await;
            print_created(id)
        }
        Command::Export { path } => {
            let count = state.export(&path).await?;
            println!("exported {count} notes to {}", path.display());
            Ok(())
        }
        Command::Import { path } => {
            let count = state.import(&path).await?;
            println!("imported {count} notes from {}", path.display());
            Ok(())
        }
        Command::Replay { path } => {
            let summary = replay::run_file(state, &path).await?;
            println!(
                "{} events: {} created, {} updated, {} deleted, {} camera changes",
                summary.events, summary.created, summary.updated, summary.deleted, summary.camera_changes
            );
            Ok(())
        }
        Command::Delete { id } => {
            require_note(state, id).await?;
            state.drive(|engine| engine.delete_note(id)).await;
            println!("deleted {id}");
            Ok(())
        }
        Command::Raise { id } => change_layer(state, id, ZDirection::Up).await,
        Command::Lower { id } => change_layer(state, id, ZDirection::Down).await,
        Command::Edit { id, text } => {
            require_note(state, id).await?;
            state.drive(|engine| engine.set_content(id, &text)).await;
            Ok(())
        }
        Command::Color { id, color } => {
            require_note(state, id).await?;
            state.drive(|engine| engine.set_color(id, &color)).await;
            Ok(())
        }
        Command::LockDecor { locked } => {
            state.set_lock_decor(locked).await?;
            println!("decor lock {}", if locked { "on" } else { "off" });
            Ok(())
        }
        Command::Settings { bg_color } => {
            let mut board = state.settings.load_board().await;
            if let Some(bg_color) = bg_color {
                board = BoardSettings { bg_color };
                state.settings.save_board(&board).await?;
            }
            let camera = state.engine.read().await.camera();
            println!("bg-color: {}", board.bg_color);
            println!("pan: ({}, {}) scale: {}", camera.pan_x, camera.pan_y, camera.zoom);
            println!("decor lock: {}", state.settings.load_lock_decor().await);
            Ok(())
        }
    }
}

async fn require_note(state: &AppState, id: NoteId) -> Result<(), CliError> {
    if state.engine.read().await.note(&id).is_some() { Ok(()) } else { Err(CliError::NoteNotFound(id)) }
}

async fn change_layer(state: &AppState, id: NoteId, direction: ZDirection) -> Result<(), CliError> {
    require_note(state, id).await?;
    let actions = state.drive(|engine| engine.change_z_order(id, direction)).await;
    for action in actions {
        if let canvas::engine::Action::Notify(message) = action {
            println!("{message}");
        }
    }
    Ok(())
}

fn print_created(id: Option<NoteId>) -> Result<(), CliError> {
    let id = id.ok_or(CliError::NothingCreated)?;
    println!("{id}");
    Ok(())
}

fn describe(note: &Note, active: Option<NoteId>) -> String {
    let summary = if note.is_image() {
        "[image]".to_owned()
    } else {
        note.content.lines().next().unwrap_or_default().chars().take(40).collect()
    };
    let marker = if active == Some(note.id) { "*" } else { " " };
    let decor = if note.decor_mode { " decor" } else { "" };
    let z = note.effective_z_index(active);
    format!(
        "{marker}{} z={z} at ({:.0}, {:.0}) {:.0}x{:.0} rot={:.0}{decor}  {summary}",
        note.id, note.x, note.y, note.width, note.height, note.rotation
    )
}
