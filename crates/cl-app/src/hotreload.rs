use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use cl_core::config::{LabConfig, load_config};
use notify::{Event, EventKind, RecursiveMode, Watcher};

/// Recharge `path` dans `config`. Garde l'ancienne config si le fichier est rejeté.
///
/// Returns whether a new config was stored.
pub fn reload(path: &Path, config: &ArcSwap<LabConfig>) -> bool {
    match load_config(path) {
        Ok(new_config) => {
            config.store(Arc::new(new_config));
            log::info!("Config rechargée depuis {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("Erreur de rechargement config : {e:#}");
            false
        }
    }
}

/// Lance un watcher qui surveille le fichier config et met à jour l'ArcSwap.
///
/// Retourne le Watcher (doit rester vivant tant que l'explorateur tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(config_path: &Path, config: &Arc<ArcSwap<LabConfig>>) -> Result<impl Watcher + use<>> {
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        {
            reload(&path, &config);
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
