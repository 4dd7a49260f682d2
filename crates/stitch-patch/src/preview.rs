use std::collections::BTreeMap;

use similar::TextDiff;

use crate::commit::rebuild;
use crate::errors::DiffError;
use crate::types::{Patch, PatchAction};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Render a colorized preview of what a patch will do, computed purely
/// from the patch and the content snapshot. The applier is never
/// involved, so previewing has no side effects by construction.
pub fn render_preview(
    patch: &Patch,
    originals: &BTreeMap<String, String>,
) -> Result<String, DiffError> {
    let mut out = String::new();
    for (path, action) in &patch.actions {
        match action {
            PatchAction::AddFile { new_file } => {
                out.push_str(&format!("add file: {path}\n"));
                for (number, line) in new_file.split('\n').enumerate() {
                    out.push_str(&format!("{GREEN}+{:3}: {line}{RESET}\n", number + 1));
                }
            }
            PatchAction::DeleteFile => {
                out.push_str(&format!("delete file: {path}\n"));
                if let Some(old) = originals.get(path) {
                    for (number, line) in old.split('\n').enumerate() {
                        out.push_str(&format!("{RED}-{:3}: {line}{RESET}\n", number + 1));
                    }
                }
            }
            PatchAction::UpdateFile { chunks, move_path } => {
                out.push_str(&format!("update file: {path}\n"));
                if let Some(target) = move_path {
                    out.push_str(&format!("move to: {target}\n"));
                }
                let old = originals.get(path).ok_or_else(|| {
                    DiffError::Patch(format!("no snapshot content for file: '{path}'"))
                })?;
                let new = rebuild(old, chunks, path)?;
                out.push_str(&render_unified_diff(old, &new));
            }
        }
        out.push('\n');
    }
    Ok(out)
}

/// Independently re-diff old vs. computed new content for display.
fn render_unified_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let unified = diff.unified_diff().context_radius(3).to_string();

    let mut out = String::new();
    for line in unified.lines() {
        let color = if line.starts_with("@@") {
            CYAN
        } else if line.starts_with('+') {
            GREEN
        } else if line.starts_with('-') {
            RED
        } else {
            ""
        };
        if color.is_empty() {
            out.push_str(line);
            out.push('\n');
        } else {
            out.push_str(&format!("{color}{line}{RESET}\n"));
        }
    }
    out
}
