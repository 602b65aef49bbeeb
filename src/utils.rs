//! Supporting helpers: colored stderr prefixes and path display.

use owo_colors::OwoColorize;
use std::path::Path;

/// Colors are off for machine output and when `NO_COLOR` is set.
pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix(output: &str) -> String {
    if use_colors(output) {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix(output: &str) -> String {
    if use_colors(output) {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix(output: &str) -> String {
    if use_colors(output) {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// `path` relative to the working directory when it lies below it,
/// otherwise as given.
pub fn rel_to_wd(path: &Path) -> String {
    let shown = std::env::current_dir()
        .ok()
        .and_then(|wd| {
            let abs = if path.is_absolute() {
                path.to_path_buf()
            } else {
                wd.join(path)
            };
            pathdiff::diff_paths(abs, &wd)
        })
        .filter(|rel| !rel.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf());
    shown.to_string_lossy().to_string()
}
