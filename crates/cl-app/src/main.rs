use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use cl_core::config::{LabConfig, load_config};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};

pub mod app;
pub mod cli;
pub mod commands;
pub mod hotreload;

use cli::{Cli, Command};

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let config = resolve_config(&cli.config)?;

    let stdout = std::io::stdout();
    match cli.command {
        Command::Mix {
            color_a,
            color_b,
            mode,
            json,
        } => commands::mix(&config, &color_a, &color_b, mode, json, &mut stdout.lock()),
        Command::Marker {
            hue,
            value,
            radius,
            kind,
            json,
        } => commands::marker(&config, hue, value, radius, kind, json, &mut stdout.lock()),
        Command::Render {
            target,
            output,
            palette,
            hue,
            mode,
            frames,
            marks,
        } => {
            let opts = commands::RenderOptions {
                palette,
                hue,
                mode,
                frames,
                marks,
            };
            commands::render(&config, target, &opts, &output)
        }
        Command::Solid { kind, output } => commands::solid(&config, kind, output.as_deref(), &mut stdout.lock()),
        Command::Explore => explore(config, &cli.config),
    }
}

/// Config introuvable : défauts. Config invalide : erreur.
fn resolve_config(path: &Path) -> Result<LabConfig> {
    if path.exists() {
        load_config(path)
    } else {
        log::warn!("Config introuvable : {}. Utilisation des défauts.", path.display());
        Ok(LabConfig::default())
    }
}

fn explore(config: LabConfig, config_path: &Path) -> Result<()> {
    let config = Arc::new(ArcSwap::from_pointee(config));

    // Hot-reload seulement si le fichier existe
    let _watcher = if config_path.exists() {
        Some(hotreload::spawn_config_watcher(config_path, &config)?)
    } else {
        None
    };

    let mut app_instance = app::App::new(config)?;

    let terminal = ratatui::init();
    let result = crossterm::execute!(std::io::stdout(), EnableMouseCapture)
        .map_err(anyhow::Error::from)
        .and_then(|()| app_instance.run(terminal));

    // Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    if let Err(e) = crossterm::execute!(std::io::stdout(), DisableMouseCapture) {
        log::warn!("Impossible de désactiver la souris : {e}");
    }
    ratatui::restore();

    result
}
