use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const WORKFLOW_DIR: &str = ".github/workflows";
pub const TENDER_DIR: &str = ".tender";
pub const CONFIG_FILE: &str = ".tender/config.yaml";

/// Suffix given to newly created workflow documents.
pub const WORKFLOW_EXT: &str = ".yml";

/// Every suffix a managed workflow document may carry.
pub const WORKFLOW_SUFFIXES: [&str; 2] = [".yml", ".yaml"];

/// Upper bound (exclusive) on the numeric suffix tried for new filenames.
pub const MAX_FILENAME_SUFFIX: u32 = 1000;

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn workflow_dir(root: &Path) -> PathBuf {
    root.join(WORKFLOW_DIR)
}

pub fn workflow_path(root: &Path, file: &str) -> PathBuf {
    workflow_dir(root).join(file)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn has_workflow_suffix(file: &str) -> bool {
    WORKFLOW_SUFFIXES.iter().any(|s| file.ends_with(s))
}

/// Normalize a caller-supplied storage key into a bare workflow filename.
///
/// Directory components are dropped and `.yml` is appended when neither
/// accepted suffix is present. Empty input falls back to the slug of `name`.
pub fn workflow_file_name(file: &str, name: &str) -> String {
    let trimmed = file.trim();
    let mut out = if trimmed.is_empty() {
        slugify(name)
    } else {
        trimmed.to_string()
    };
    if !has_workflow_suffix(&out) {
        out.push_str(WORKFLOW_EXT);
    }
    Path::new(&out)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or(out)
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Derive a filename-safe slug from a display name.
///
/// Keeps lowercase ASCII letters and digits; runs of `-`, `_` and spaces
/// collapse to a single dash. Everything else is dropped.
pub fn slugify(name: &str) -> String {
    let mut out = String::new();
    for c in name.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if matches!(c, '-' | '_' | ' ') && !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let slug = out.trim_matches('-');
    if slug.is_empty() {
        "tender".to_string()
    } else {
        slug.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
