use std::collections::BTreeMap;

use tracing::info;

use crate::commit::build_commit;
use crate::errors::DiffError;
use crate::fs::FileSystem;
use crate::parser::{BEGIN_SENTINEL, identify_files_added, identify_files_needed, parse_patch};
use crate::types::{Commit, FileChange};

/// Perform the write/delete/rename side effects described by a commit.
///
/// Changes land one file at a time, in map order, with no transaction
/// guarantee: a failure partway through leaves the changes already
/// applied in place. A rename is realized as a write to the new path
/// followed by removal of the old one.
pub fn apply_commit(commit: &Commit, fs: &dyn FileSystem) -> Result<(), DiffError> {
    for (path, change) in &commit.changes {
        match change {
            FileChange::Delete { .. } => {
                fs.remove(path)?;
                info!(path, "deleted file");
            }
            FileChange::Add { new_content } => {
                fs.write(path, new_content)?;
                info!(path, "added file");
            }
            FileChange::Update {
                new_content,
                move_path,
                ..
            } => {
                let target = move_path.as_deref().unwrap_or(path);
                fs.write(target, new_content)?;
                if move_path.is_some() {
                    fs.remove(path)?;
                    info!(from = path, to = target, "updated and renamed file");
                } else {
                    info!(path, "updated file");
                }
            }
        }
    }
    Ok(())
}

/// Load the current content of every given path through the injected
/// filesystem.
pub fn load_files(
    paths: &[String],
    fs: &dyn FileSystem,
) -> Result<BTreeMap<String, String>, DiffError> {
    let mut files = BTreeMap::new();
    for path in paths {
        files.insert(path.clone(), fs.read(path)?);
    }
    Ok(files)
}

/// Snapshot every path a patch touches. Update and delete targets are
/// required reads; add targets are only probed, so that re-adding a
/// file that already exists fails at parse time instead of silently
/// overwriting it.
pub fn load_current_files(
    text: &str,
    fs: &dyn FileSystem,
) -> Result<BTreeMap<String, String>, DiffError> {
    let mut files = load_files(&identify_files_needed(text), fs)?;
    for path in identify_files_added(text) {
        if let Ok(content) = fs.read(&path) {
            files.insert(path, content);
        }
    }
    Ok(files)
}

/// End-to-end entry point: parse, resolve, and apply a patch in one
/// call, returning `"Done!"` on success.
///
/// The opening sentinel is validated before any file is read, so a
/// malformed patch never triggers I/O.
pub fn process_patch(text: &str, fs: &dyn FileSystem) -> Result<String, DiffError> {
    if !text.starts_with(BEGIN_SENTINEL) {
        return Err(DiffError::Patch(
            "patch text must start with '*** Begin Patch'".to_string(),
        ));
    }
    let originals = load_current_files(text, fs)?;
    let (patch, _fuzz) = parse_patch(text, &originals)?;
    let commit = build_commit(&patch, &originals)?;
    apply_commit(&commit, fs)?;
    Ok("Done!".to_string())
}
