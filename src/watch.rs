//! File system watcher for live rebuilds.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Event Loop                          │
//! │                                                          │
//! │  ┌──────────┐    ┌──────────┐    ┌────────────────────┐  │
//! │  │ notify   │───▶│ Debouncer│───▶│  handle_changes()  │  │
//! │  │ events   │    │ (300ms)  │    │                    │  │
//! │  └──────────┘    └──────────┘    │  config changed?   │  │
//! │                                  │   └─ reload config │  │
//! │                                  │  full build cycle  │  │
//! │                                  └────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rebuild is a complete cycle: the store is cleared and refilled.
//! A failed rebuild is reported and the watcher keeps running.

use crate::{
    build::build_site,
    cli::Cli,
    config::SiteConfig,
    log,
    logger::WatchStatus,
    site::Store,
    walker::IgnoreSet,
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// `/proj/blog/post.md` → `blog/post.md`
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

/// Which changed paths can affect the next cycle.
struct ChangeFilter {
    config_path: PathBuf,
    ignore: IgnoreSet,
}

impl ChangeFilter {
    fn new(config: &SiteConfig) -> Self {
        Self {
            config_path: config.config_path.clone(),
            ignore: config.ignore_set(),
        }
    }

    fn is_config(&self, path: &Path) -> bool {
        path == self.config_path
    }

    /// Config file, or a project file outside the output and ignore globs.
    fn accepts(&self, path: &Path) -> bool {
        self.is_config(path) || (!is_temp_file(path) && !self.ignore.is_ignored(path))
    }
}

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    /// Batches are held back for a short while after each rebuild.
    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event, filter: &ChangeFilter) {
        let before = self.pending.len();
        self.pending
            .extend(event.paths.into_iter().filter(|p| filter.accepts(p)));
        if self.pending.len() > before {
            self.last_event = Some(Instant::now());
        }
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && !self.in_cooldown()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

/// State carried across rebuilds.
struct Session<'a, W> {
    cli: &'a Cli,
    watcher: W,
    config: SiteConfig,
    filter: ChangeFilter,
    store: &'a Store,
    status: WatchStatus,
}

impl<W: Watcher> Session<'_, W> {
    /// Rebuild after a batch of changes.
    fn handle_changes(&mut self, paths: &[PathBuf]) {
        let Some((first, rest)) = paths.split_first() else {
            return;
        };

        if paths.iter().any(|p| self.filter.is_config(p)) {
            self.reload_config();
        }

        let first = rel_path(first, self.config.get_root());
        let trigger = if rest.is_empty() {
            first
        } else {
            format!("{first} (+{} more)", rest.len())
        };

        match build_site(&self.config, self.store) {
            Ok(built) => self
                .status
                .success(&format!("rebuilt {} pages ({trigger})", built.pages)),
            Err(e) => self
                .status
                .error(&format!("build failed ({trigger})"), &format!("{e:#}")),
        }
    }

    /// Re-read the config file; keep the previous config if it is invalid.
    fn reload_config(&mut self) {
        let loaded = SiteConfig::load(self.cli).and_then(|config| {
            config.validate()?;
            Ok(config)
        });

        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                log!("error"; "config reload failed, keeping previous: {e}");
                return;
            }
        };

        let (old_root, new_root) = (self.config.get_root(), config.get_root());
        if old_root != new_root {
            if let Err(e) = rewatch(&mut self.watcher, old_root, new_root) {
                log!("error"; "cannot watch {}, keeping previous config: {e}", new_root.display());
                return;
            }
            log!("watch"; "watching {}", new_root.display());
        }

        log!("watch"; "config changed, reloaded");
        self.filter = ChangeFilter::new(&config);
        self.config = config;
    }
}

/// Move a recursive watch from `old` to `new`. `old` stays watched if `new`
/// cannot be.
fn rewatch(watcher: &mut impl Watcher, old: &Path, new: &Path) -> notify::Result<()> {
    watcher.watch(new, RecursiveMode::Recursive)?;
    if let Err(e) = watcher.unwatch(old) {
        log!("watch"; "failed to unwatch {}: {e}", old.display());
    }
    Ok(())
}

/// Start blocking file watcher with debouncing and live rebuild.
///
/// Runs one build up front. Returns only if the watcher channel closes.
pub fn watch_for_changes_blocking(cli: &Cli, config: SiteConfig, store: &Store) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;

    let root = config.get_root().to_path_buf();
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", root.display()))?;
    log!("watch"; "watching {}", root.display());

    let mut session = Session {
        cli,
        watcher,
        filter: ChangeFilter::new(&config),
        config,
        store,
        status: WatchStatus::new(),
    };

    if let Err(e) = build_site(&session.config, store) {
        session.status.error("initial build failed", &format!("{e:#}"));
    }

    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) => {
                debouncer.add(event, &session.filter);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) if debouncer.ready() => {
                session.handle_changes(&debouncer.take());
                debouncer.mark_rebuild();
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            // Other cases: irrelevant events, timeout without ready, etc.
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    fn filter() -> ChangeFilter {
        ChangeFilter {
            config_path: PathBuf::from("/site/sitematter.toml"),
            ignore: IgnoreSet::new(Path::new("/site"), ["drafts/**"])
                .exclude_dir(Path::new("/site/public")),
        }
    }

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |e, p| e.add_path(PathBuf::from(p)))
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("/site/post.md~")));
        assert!(is_temp_file(Path::new("/site/.post.md.swp")));
        assert!(is_temp_file(Path::new("/site/post.bak")));
        assert!(!is_temp_file(Path::new("/site/post.md")));
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(&Event::new(EventKind::Create(CreateKind::File))));
        assert!(is_relevant(&Event::new(EventKind::Modify(ModifyKind::Any))));
        assert!(!is_relevant(&Event::new(EventKind::Access(
            notify::event::AccessKind::Any
        ))));
    }

    #[test]
    fn test_filter_accepts() {
        let filter = filter();

        assert!(filter.accepts(Path::new("/site/blog/post.md")));
        assert!(filter.accepts(Path::new("/site/sitematter.toml")));
        assert!(!filter.accepts(Path::new("/site/public/blog/post.html")));
        assert!(!filter.accepts(Path::new("/site/drafts/wip.md")));
        assert!(!filter.accepts(Path::new("/site/blog/post.md~")));
    }

    #[test]
    fn test_debouncer_batches_and_filters() {
        let filter = filter();
        let mut debouncer = Debouncer::new();

        debouncer.add(
            event(
                EventKind::Modify(ModifyKind::Any),
                &["/site/b.md", "/site/public/b.html", "/site/a.md"],
            ),
            &filter,
        );
        debouncer.add(event(EventKind::Create(CreateKind::File), &["/site/a.md"]), &filter);

        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS + 20));
        assert!(debouncer.ready());
        assert_eq!(
            debouncer.take(),
            [PathBuf::from("/site/a.md"), PathBuf::from("/site/b.md")]
        );
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_debouncer_output_only_events_do_nothing() {
        let filter = filter();
        let mut debouncer = Debouncer::new();

        debouncer.add(
            event(EventKind::Modify(ModifyKind::Any), &["/site/public/site.json"]),
            &filter,
        );

        assert!(debouncer.last_event.is_none());
        assert!(!debouncer.ready());
    }

    #[test]
    fn test_debouncer_cooldown() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.in_cooldown());
        debouncer.mark_rebuild();
        assert!(debouncer.in_cooldown());
    }

    #[test]
    fn test_edit_during_cooldown_is_kept() {
        let filter = filter();
        let mut debouncer = Debouncer::new();
        debouncer.mark_rebuild();

        std::thread::sleep(Duration::from_millis(200));
        debouncer.add(
            event(EventKind::Modify(ModifyKind::Any), &["/site/blog/post.md"]),
            &filter,
        );

        // held back while cooling down, but not dropped
        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS + 20));
        assert!(debouncer.in_cooldown());
        assert!(!debouncer.ready());

        std::thread::sleep(Duration::from_millis(REBUILD_COOLDOWN_MS));
        assert!(debouncer.ready());
        assert_eq!(debouncer.take(), [PathBuf::from("/site/blog/post.md")]);
    }

    #[test]
    fn test_rewatch_moves_watch_to_new_root() {
        let old = tempfile::TempDir::new().unwrap();
        let new = tempfile::TempDir::new().unwrap();
        let mut watcher = notify::recommended_watcher(|_: notify::Result<Event>| {}).unwrap();
        watcher.watch(old.path(), RecursiveMode::Recursive).unwrap();

        rewatch(&mut watcher, old.path(), new.path()).unwrap();

        assert!(watcher.unwatch(new.path()).is_ok());
        assert!(watcher.unwatch(old.path()).is_err());
    }

    #[test]
    fn test_rewatch_missing_root_keeps_old_watch() {
        let old = tempfile::TempDir::new().unwrap();
        let mut watcher = notify::recommended_watcher(|_: notify::Result<Event>| {}).unwrap();
        watcher.watch(old.path(), RecursiveMode::Recursive).unwrap();

        assert!(rewatch(&mut watcher, old.path(), &old.path().join("missing")).is_err());
        assert!(watcher.unwatch(old.path()).is_ok());
    }

    #[test]
    fn test_rel_path() {
        let root = Path::new("/site");
        assert_eq!(rel_path(Path::new("/site/blog/post.md"), root), "blog/post.md");
        assert_eq!(rel_path(Path::new("/elsewhere/x.md"), root), "/elsewhere/x.md");
    }
}
