//! Build the static site

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::new_debouncer;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Site;

/// Quiet period after the last file event before a rebuild starts
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Load all content and generate the site
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let store = ContentLoader::new(site)?.load()?;
    tracing::info!("Loaded {} content entries", store.len());

    let generator = Generator::new(site)?;
    generator.generate(&store)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Paths that trigger a rebuild when they change
pub fn watched_paths(site: &Site) -> Vec<(PathBuf, RecursiveMode)> {
    let mut paths = Vec::new();
    for dir in [&site.content_dir, &site.static_dir] {
        if dir.exists() {
            paths.push((dir.clone(), RecursiveMode::Recursive));
        }
    }
    for name in ["_config.yml", "_config.yaml", "_config.toml"] {
        let config = site.base_dir.join(name);
        if config.exists() {
            paths.push((config, RecursiveMode::NonRecursive));
        }
    }
    paths
}

/// Watch for file changes and rebuild until the watcher shuts down
pub fn watch(site: &Site) -> Result<()> {
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");
    watch_with(site, || {})
}

/// Rebuild after every debounced batch of relevant changes, calling
/// `on_rebuild` after each successful build
pub fn watch_with(site: &Site, mut on_rebuild: impl FnMut()) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;

    for (path, mode) in watched_paths(site) {
        debouncer.watcher().watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    while let Ok(result) = rx.recv() {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
        if changed.is_empty() {
            continue;
        }
        for event in &changed {
            tracing::info!("File changed: {}", event.path.display());
        }

        match reload(site).and_then(|site| run(&site)) {
            Ok(()) => on_rebuild(),
            Err(e) => tracing::error!("Build failed: {:#}", e),
        }
    }

    Ok(())
}

/// Editor swap files and VCS metadata never trigger a rebuild
fn is_relevant(path: &Path) -> bool {
    !path.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        name == ".git" || name == ".DS_Store" || name.ends_with('~') || name.ends_with(".swp")
    })
}

/// Re-read the config so edits to it apply to the next build
pub fn reload(site: &Site) -> Result<Site> {
    Site::new(&site.base_dir)
}
