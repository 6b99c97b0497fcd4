//! Saved defaults for command-line flags.
//!
//! Config files hold the same flags the CLI accepts, one or more per line,
//! with `#` comments. Values from the command line win over file values;
//! boolean switches are OR-ed together.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR: &str = "weekly-preview";
const LOCAL_FILE: &str = ".weeklypreviewrc";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub once: bool,
    pub standalone: bool,
    pub highlight: bool,
    pub perf: bool,
    pub interval_ms: Option<u64>,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            once: self.once || other.once,
            standalone: self.standalone || other.standalone,
            highlight: self.highlight || other.highlight,
            perf: self.perf || other.perf,
            interval_ms: other.interval_ms.or(self.interval_ms),
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR).join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR)
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR).join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join(APP_DIR).join("config");
        }
    }

    PathBuf::from(LOCAL_FILE)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

/// Read flags from `path`; a missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` to `path`, creating the parent directory.
///
/// `--once` is never persisted: a saved default that exits immediately would
/// make the watcher unusable.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# weekly-preview defaults (saved with --save)".to_string()];
    let switches = [
        (flags.watch, "--watch"),
        (flags.standalone, "--standalone"),
        (flags.highlight, "--highlight"),
        (flags.perf, "--perf"),
    ];
    lines.extend(
        switches
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| (*flag).to_string()),
    );
    if let Some(ms) = flags.interval_ms {
        lines.push(format!("--interval {ms}"));
    }
    if let Some(log) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", log.display()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove the config file at `path` if present.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from rc-file tokens; everything else is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let mut value_for = |short: Option<&str>, long: &str| -> Option<String> {
            if token == long || short == Some(token) {
                let next = tokens.get(i + 1).cloned();
                if next.is_some() {
                    i += 1;
                }
                return next;
            }
            token
                .strip_prefix(long)
                .and_then(|rest| rest.strip_prefix('='))
                .map(ToOwned::to_owned)
        };

        if let Some(value) = value_for(Some("-i"), "--interval") {
            flags.interval_ms = value.parse().ok();
        } else if let Some(value) = value_for(None, "--render-debug-log") {
            flags.render_debug_log = Some(PathBuf::from(value));
        } else {
            match token {
                "--watch" | "-w" => flags.watch = true,
                "--once" => flags.once = true,
                "--standalone" => flags.standalone = true,
                "--highlight" => flags.highlight = true,
                "--perf" => flags.perf = true,
                _ => {}
            }
        }
        i += 1;
    }
    flags
}
