use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::app::{App, DynTarget};
use crate::document::{ComrakHtmlRenderer, ComrakParser};
use crate::preview::{FileSource, PreviewUpdater, Tick};
use crate::ticker::{Ticker, TickerHandle};
use crate::watcher::{DEFAULT_DEBOUNCE, FileWatcher};

/// How often the main thread drains watcher events in `--watch` mode.
const WATCH_POLL: Duration = Duration::from_millis(50);

type AppUpdater = PreviewUpdater<FileSource, DynTarget, ComrakParser, ComrakHtmlRenderer>;

/// A started preview: the ticker thread plus the optional file watcher.
#[derive(Debug)]
pub struct Running {
    ticker: TickerHandle,
    watcher: Option<FileWatcher>,
}

impl Running {
    /// Fire a tick now.
    pub fn wake(&self) {
        self.ticker.wake();
    }

    pub const fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Block until the ticker ends, forwarding watcher events as wake-ups.
    ///
    /// Without a watcher this only returns if the ticker thread dies.
    pub fn wait(mut self) -> u64 {
        if let Some(watcher) = self.watcher.as_mut() {
            while !self.ticker.is_finished() {
                if watcher.take_change_ready() {
                    self.ticker.wake();
                }
                thread::sleep(WATCH_POLL);
            }
        }
        self.ticker.join()
    }

    /// Stop ticking and return how many ticks fired.
    pub fn stop(self) -> u64 {
        self.ticker.stop()
    }
}

impl App {
    /// Render the source once and return.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or the output cannot be
    /// written.
    pub fn render_once(&self) -> Result<()> {
        self.updater(self.once_target()).map(drop)
    }

    /// Render now, then keep re-rendering on every changed tick until the
    /// process ends.
    ///
    /// # Errors
    /// Returns an error if no output file is configured or the initial render
    /// fails.
    pub fn run(&self) -> Result<()> {
        let ticks = self.start()?.wait();
        warn!(ticks, "preview ticker exited");
        Ok(())
    }

    /// Render now and start ticking in the background.
    ///
    /// # Errors
    /// Returns an error if no output file is configured, the initial render
    /// fails, or the ticker thread cannot be spawned.
    pub fn start(&self) -> Result<Running> {
        self.start_with_target(self.live_target()?)
    }

    /// Like [`App::start`], writing to `target` instead of the configured
    /// output.
    ///
    /// # Errors
    /// See [`App::start`].
    pub fn start_with_target(&self, target: DynTarget) -> Result<Running> {
        let mut updater = self.updater(target)?;
        info!(
            source = %self.source_path.display(),
            interval = ?self.interval,
            "preview started"
        );

        let watcher = if self.watch_enabled {
            match FileWatcher::new(&self.source_path, DEFAULT_DEBOUNCE) {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    warn!(error = %err, "file watching unavailable, polling only");
                    None
                }
            }
        } else {
            None
        };

        let ticker = Ticker::new(self.interval)
            .spawn(move || {
                match updater.poll() {
                    Ok(Tick::Rendered) => info!(bytes = updater.last_seen().len(), "preview updated"),
                    Ok(Tick::Unchanged) => {}
                    Err(err) => error!(error = %err, "preview tick failed"),
                }
                ControlFlow::Continue(())
            })
            .context("Failed to start preview ticker")?;

        Ok(Running { ticker, watcher })
    }

    fn updater(&self, target: DynTarget) -> Result<AppUpdater> {
        PreviewUpdater::new(
            FileSource::new(&self.source_path),
            target,
            ComrakParser::default(),
            self.renderer(),
        )
        .with_context(|| format!("Failed to preview {}", self.source_path.display()))
    }
}
