//! Directory-backed persistence. The workflow directory is the database:
//! every managed document is one record, recovered by scanning and parsing.

use crate::error::{Result, TenderError};
use crate::paths;
use crate::tender::{self, Tender};
use crate::workflow;
use std::path::{Path, PathBuf};

pub fn ensure_workflow_dir(root: &Path) -> Result<()> {
    crate::io::ensure_dir(&paths::workflow_dir(root))
}

/// Load every managed tender, sorted by name then storage key.
///
/// A missing directory yields an empty list. Documents that do not parse as
/// tenders are skipped; read failures abort the whole scan.
pub fn load_tenders(root: &Path) -> Result<Vec<Tender>> {
    let dir = paths::workflow_dir(root);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let file = entry.file_name().to_string_lossy().into_owned();
        if !paths::has_workflow_suffix(&file) {
            continue;
        }
        let content = match String::from_utf8(std::fs::read(entry.path())?) {
            Ok(content) => content,
            Err(_) => {
                tracing::debug!(file = %file, "skipping non-utf8 workflow");
                continue;
            }
        };
        match workflow::parse(&content) {
            Some(mut t) => {
                t.workflow_file = file;
                out.push(t);
            }
            None => tracing::debug!(file = %file, "skipping unmanaged workflow"),
        }
    }

    tender::sort_tenders(&mut out);
    Ok(out)
}

pub fn find_tender(root: &Path, name: &str) -> Result<Tender> {
    let tenders = load_tenders(root)?;
    tender::find_index(&tenders, name)
        .map(|i| tenders[i].clone())
        .ok_or_else(|| TenderError::TenderNotFound(name.trim().to_string()))
}

/// Validate and write `t` under its storage key (derived from the name when
/// empty). Returns the record exactly as persisted.
pub fn save_tender(root: &Path, t: &Tender) -> Result<Tender> {
    t.validate()?;
    ensure_workflow_dir(root)?;

    let mut saved = t.normalized();
    saved.workflow_file = paths::workflow_file_name(&saved.workflow_file, &saved.name);
    let path = paths::workflow_path(root, &saved.workflow_file);
    crate::io::atomic_write(&path, workflow::render(&saved).as_bytes())?;
    tracing::info!(file = %saved.workflow_file, name = %saved.name, "saved tender workflow");
    Ok(saved)
}

/// Create a new record, assigning a fresh storage key from the name slug.
pub fn create_tender(root: &Path, t: Tender) -> Result<Tender> {
    t.validate()?;
    let current = load_tenders(root)?;
    if tender::find_index(&current, &t.name).is_some() {
        return Err(TenderError::TenderExists(t.name.trim().to_string()));
    }
    let file = unused_workflow_file(root, &t.name)?;
    save_tender(
        root,
        &Tender {
            workflow_file: file,
            ..t
        },
    )
}

/// Overwrite the record currently named `old_name`. The storage key is kept
/// even when the name changes.
pub fn update_tender(root: &Path, old_name: &str, updated: Tender) -> Result<Tender> {
    let current = load_tenders(root)?;
    let idx = tender::find_index(&current, old_name)
        .ok_or_else(|| TenderError::TenderNotFound(old_name.trim().to_string()))?;
    let clash = current
        .iter()
        .enumerate()
        .any(|(i, t)| i != idx && t.matches_name(&updated.name));
    if clash {
        return Err(TenderError::TenderExists(updated.name.trim().to_string()));
    }
    save_tender(
        root,
        &Tender {
            workflow_file: current[idx].workflow_file.clone(),
            ..updated
        },
    )
}

/// Delete the document backing `name`. Returns the removed record.
pub fn remove_tender(root: &Path, name: &str) -> Result<Tender> {
    let t = find_tender(root, name)?;
    std::fs::remove_file(paths::workflow_path(root, &t.workflow_file))?;
    tracing::info!(file = %t.workflow_file, "removed tender workflow");
    Ok(t)
}

pub fn managed_workflow_path(root: &Path, name: &str) -> Result<PathBuf> {
    let t = find_tender(root, name)?;
    Ok(paths::workflow_path(root, &t.workflow_file))
}

/// First free `<slug>.yml`, then `<slug>-2.yml`, `<slug>-3.yml`, ...
pub fn unused_workflow_file(root: &Path, name: &str) -> Result<String> {
    ensure_workflow_dir(root)?;
    let base = paths::slugify(name);
    let taken = |file: &str| paths::workflow_path(root, file).exists();

    let candidate = format!("{base}{}", paths::WORKFLOW_EXT);
    if !taken(&candidate) {
        return Ok(candidate);
    }
    for i in 2..paths::MAX_FILENAME_SUFFIX {
        let candidate = format!("{base}-{i}{}", paths::WORKFLOW_EXT);
        if !taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(TenderError::NoWorkflowFileAvailable(base))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
