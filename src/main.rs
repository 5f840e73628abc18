// SPDX-License-Identifier: MIT
//
// ansiform — preview a full-screen editor theme on the local terminal.
//
// Wires the crates together for one local session:
//
//   af-term → stdout transport, decoded keys
//   af-art  → theme art, MCI placeholders
//   af-form → region controllers, the editor's mode machine
//
// There is no raw keyboard decoding here. Each line on stdin is one
// decoded key by name ("esc", "enter", "tab", "bs", ...) or literal text
// typed character by character. "quit" or end of input leaves the editor.
//
//   ansiform theme.yaml [--user NAME] [--view]
//
// Logs go to stderr so they never land in the painted screen.

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use af_art::ThemeRenderer;
use af_form::{
    ConfigError, Dispatch, EditorError, EditorMode, EditorOptions, FullScreenEditor, MenuContext,
    ThemeConfig,
};
use af_term::{KeyCode, KeyEvent, StdoutTransport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: ansiform <theme.yaml> [--user NAME] [--view]";

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
struct Args {
    theme: PathBuf,
    user: String,
    mode: EditorMode,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut theme = None;
    let mut user = env::var("USER").unwrap_or_else(|_| "sysop".to_string());
    let mut mode = EditorMode::Edit;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--user" => {
                user = iter
                    .next()
                    .cloned()
                    .ok_or_else(|| "--user needs a name".to_string())?;
            }
            "--view" => mode = EditorMode::View,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            path if theme.is_none() => theme = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }

    Ok(Args {
        theme: theme.ok_or_else(|| USAGE.to_string())?,
        user,
        mode,
    })
}

/// The keys one input line stands for.
fn keys_for_line(line: &str) -> Vec<KeyEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    KeyCode::from_name(line).map_or_else(
        || line.chars().map(KeyEvent::char).collect(),
        |code| vec![KeyEvent::new(code)],
    )
}

// ─── Session ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),
}

async fn run(args: Args) -> Result<(), AppError> {
    let theme = ThemeConfig::from_path(&args.theme)?;
    let renderer = ThemeRenderer::new(theme.art_library()?);

    let mut editor = FullScreenEditor::new(
        Box::new(StdoutTransport::new()),
        Arc::new(renderer),
        Arc::new(theme.menu_loader()),
        Arc::new(args.user),
        EditorOptions {
            mode: args.mode,
            font: theme.font.clone(),
            calling_menu: MenuContext::new("preview"),
            ..EditorOptions::default()
        },
    );
    editor.enter_session().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "quit" {
            break;
        }
        for key in keys_for_line(&line) {
            match editor.handle_key(key).await {
                Ok(Dispatch::MenuCommand(submission)) => {
                    info!(field_id = submission.field_id, values = ?submission.values, "menu command");
                }
                Ok(Dispatch::ModeChanged(mode)) => info!(%mode, "mode changed"),
                Ok(_) => {}
                Err(err) if err.is_expected() => warn!(error = %err, %key, "key rejected"),
                Err(err) => return Err(err.into()),
            }
        }
    }

    editor.leave().await?;
    info!(modified = editor.is_modified(), "session finished");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("ansiform: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(args).await {
        error!(error = %e, "session aborted");
        eprintln!("ansiform: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

// ─── Tests ──────────────────────────────────────────────────────────────────
