//! weekly-preview - live markdown-to-HTML preview.
//!
//! # Usage
//!
//! ```bash
//! weekly-preview notes.md -o preview.html      # re-rendered on change
//! weekly-preview notes.md -o preview.html --standalone -w
//! weekly-preview --once notes.md               # HTML to stdout
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use weekly_preview::app::App;
use weekly_preview::config::{
    clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags, ConfigFlags,
};
use weekly_preview::perf;
use weekly_preview::ticker::DEFAULT_INTERVAL;

/// Re-render a markdown file to HTML whenever it changes
#[derive(Parser, Debug)]
#[command(name = "weekly-preview", version, about, long_about = None)]
struct Cli {
    /// Markdown file to preview
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Write HTML to this file (required unless --once)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Polling interval in milliseconds
    #[arg(short, long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Render once and exit
    #[arg(long)]
    once: bool,

    /// Also re-render as soon as the file changes on disk
    #[arg(short, long)]
    watch: bool,

    /// Wrap output in a complete HTML page
    #[arg(long)]
    standalone: bool,

    /// Syntax-highlight fenced code blocks
    #[arg(long)]
    highlight: bool,

    /// Print render timings to stderr
    #[arg(long)]
    perf: bool,

    /// Write render debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    /// Flags given on this command line, in config form.
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            watch: self.watch,
            once: self.once,
            standalone: self.standalone,
            highlight: self.highlight,
            perf: self.perf,
            interval_ms: self.interval,
            render_debug_log: self.render_debug_log.clone(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("WEEKLY_PREVIEW_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?render_debug_log_path,
            error = %err,
            "failed to open render debug log"
        );
    }

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let interval = effective
        .interval_ms
        .filter(|ms| *ms > 0)
        .map_or(DEFAULT_INTERVAL, Duration::from_millis);

    let app = App::new(cli.file)
        .with_output(cli.output)
        .with_interval(interval)
        .with_watch(effective.watch)
        .with_standalone(effective.standalone)
        .with_highlight(effective.highlight);

    if effective.once {
        return app.render_once().context("Render failed");
    }
    app.run().context("Preview error")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(args: &[&str]) -> ConfigFlags {
        Cli::try_parse_from(args.iter().copied()).unwrap().flags()
    }

    #[test]
    fn test_attached_short_interval() {
        assert_eq!(flags(&["weekly-preview", "-i50", "a.md"]).interval_ms, Some(50));
        assert_eq!(flags(&["weekly-preview", "-i=50", "a.md"]).interval_ms, Some(50));
    }

    #[test]
    fn test_clustered_short_flags() {
        let parsed = flags(&["weekly-preview", "-wi", "50", "a.md"]);
        assert!(parsed.watch);
        assert_eq!(parsed.interval_ms, Some(50));
    }

    #[test]
    fn test_long_flags_map_to_config() {
        let parsed = flags(&[
            "weekly-preview",
            "--interval=250",
            "--standalone",
            "--highlight",
            "--once",
            "--render-debug-log",
            "render.log",
            "a.md",
        ]);
        assert_eq!(parsed.interval_ms, Some(250));
        assert!(parsed.standalone && parsed.highlight && parsed.once);
        assert!(!parsed.watch);
        assert_eq!(parsed.render_debug_log, Some(PathBuf::from("render.log")));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(Cli::try_parse_from(["weekly-preview", "-i", "0", "a.md"]).is_err());
    }

    #[test]
    fn test_cli_interval_overrides_saved_default() {
        let saved = ConfigFlags {
            interval_ms: Some(1000),
            watch: true,
            ..ConfigFlags::default()
        };
        let merged = saved.union(&flags(&["weekly-preview", "-i50", "a.md"]));
        assert_eq!(merged.interval_ms, Some(50));
        assert!(merged.watch);
    }
}
