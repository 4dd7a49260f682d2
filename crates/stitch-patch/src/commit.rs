use std::collections::BTreeMap;

use crate::errors::DiffError;
use crate::types::{Chunk, Commit, FileChange, Patch, PatchAction};

/// Resolve a patch against the same content snapshot it was parsed
/// with, producing a commit with concrete final content per path.
/// Purely computational; no I/O.
pub fn build_commit(
    patch: &Patch,
    originals: &BTreeMap<String, String>,
) -> Result<Commit, DiffError> {
    let mut commit = Commit::default();
    for (path, action) in &patch.actions {
        let change = match action {
            PatchAction::AddFile { new_file } => FileChange::Add {
                new_content: new_file.clone(),
            },
            PatchAction::DeleteFile => {
                let old_content = snapshot_content(originals, path)?;
                FileChange::Delete { old_content }
            }
            PatchAction::UpdateFile { chunks, move_path } => {
                let old_content = snapshot_content(originals, path)?;
                let new_content = rebuild(&old_content, chunks, path)?;
                FileChange::Update {
                    old_content,
                    new_content,
                    move_path: move_path.clone(),
                }
            }
        };
        commit.changes.insert(path.clone(), change);
    }
    Ok(commit)
}

fn snapshot_content(
    originals: &BTreeMap<String, String>,
    path: &str,
) -> Result<String, DiffError> {
    originals.get(path).cloned().ok_or_else(|| {
        DiffError::Patch(format!("no snapshot content for file: '{path}'"))
    })
}

/// Replay an update's chunks against the original content.
///
/// Copies original lines up to each chunk's start, substitutes the
/// insert lines for the delete lines, and copies the tail. Chunk
/// starts beyond the file or behind the running cursor fail; the
/// parser never produces either, but a hand-constructed patch can.
pub(crate) fn rebuild(original: &str, chunks: &[Chunk], path: &str) -> Result<String, DiffError> {
    let orig_lines: Vec<&str> = original.split('\n').collect();
    let mut dest_lines: Vec<&str> = Vec::new();
    let mut orig_index = 0usize;

    for chunk in chunks {
        if chunk.orig_index > orig_lines.len() {
            return Err(DiffError::Patch(format!(
                "{path}: chunk start {} exceeds file length {}",
                chunk.orig_index,
                orig_lines.len()
            )));
        }
        if orig_index > chunk.orig_index {
            return Err(DiffError::Patch(format!(
                "{path}: overlapping chunks at {orig_index} > {}",
                chunk.orig_index
            )));
        }
        dest_lines.extend(&orig_lines[orig_index..chunk.orig_index]);
        dest_lines.extend(chunk.ins_lines.iter().map(String::as_str));
        orig_index = chunk.orig_index + chunk.del_lines.len();
    }

    dest_lines.extend(&orig_lines[orig_index.min(orig_lines.len())..]);
    Ok(dest_lines.join("\n"))
}
