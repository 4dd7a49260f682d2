use std::collections::BTreeMap;

use tracing::debug;

use crate::errors::DiffError;
use crate::matching::{FUZZ_RTRIM, find_context};
use crate::scanner::scan_section;
use crate::types::{Chunk, Patch, PatchAction};

pub(crate) const BEGIN_SENTINEL: &str = "*** Begin Patch";
pub(crate) const END_SENTINEL: &str = "*** End Patch";

const UPDATE_FILE_PREFIX: &str = "*** Update File: ";
const DELETE_FILE_PREFIX: &str = "*** Delete File: ";
const ADD_FILE_PREFIX: &str = "*** Add File: ";
const MOVE_TO_PREFIX: &str = "*** Move to: ";

const DIRECTIVE_BOUNDARIES: [&str; 4] = [
    END_SENTINEL,
    "*** Update File:",
    "*** Delete File:",
    "*** Add File:",
];

const UPDATE_BOUNDARIES: [&str; 5] = [
    END_SENTINEL,
    "*** Update File:",
    "*** Delete File:",
    "*** Add File:",
    "*** End of File",
];

/// Scanning cursor over the patch lines: position plus accumulated
/// fuzz. All line access goes through this narrow API so the directive
/// and hunk loops never touch raw indices.
struct ParseSession<'a> {
    lines: Vec<&'a str>,
    index: usize,
    fuzz: u64,
}

impl<'a> ParseSession<'a> {
    fn new(lines: Vec<&'a str>) -> Self {
        // Index 1: the begin sentinel is validated before the session
        // starts scanning.
        Self {
            lines,
            index: 1,
            fuzz: 0,
        }
    }

    fn cur_line(&self) -> Result<&'a str, DiffError> {
        self.lines.get(self.index).copied().ok_or_else(|| {
            DiffError::Patch("unexpected end of input while parsing patch".to_string())
        })
    }

    /// True once the cursor ran out of lines or sits on one of the
    /// given boundary prefixes.
    fn is_done(&self, boundaries: &[&str]) -> bool {
        match self.lines.get(self.index) {
            None => true,
            Some(line) => boundaries.iter().any(|boundary| line.starts_with(boundary)),
        }
    }

    /// Consume the current line if it starts with `prefix`, returning
    /// the text after the prefix.
    fn read_str(&mut self, prefix: &str) -> Result<Option<&'a str>, DiffError> {
        match self.cur_line()?.strip_prefix(prefix) {
            Some(rest) => {
                self.index += 1;
                Ok(Some(rest))
            }
            None => Ok(None),
        }
    }

    /// Return the current line and advance past it.
    fn read_line(&mut self) -> Result<&'a str, DiffError> {
        let line = self.cur_line()?;
        self.index += 1;
        Ok(line)
    }
}

/// Parse patch text against a snapshot of current file contents.
///
/// Returns the structured patch plus the cumulative fuzz spent on
/// relaxed context matching. Purely computational; nothing here touches
/// the filesystem. CRLF input parses because line splitting strips the
/// trailing carriage return.
pub fn parse_patch(
    text: &str,
    current_files: &BTreeMap<String, String>,
) -> Result<(Patch, u64), DiffError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2
        || !lines
            .first()
            .is_some_and(|line| line.starts_with(BEGIN_SENTINEL))
        || lines.last().copied() != Some(END_SENTINEL)
    {
        return Err(DiffError::Patch(
            "invalid patch text: missing begin/end sentinels".to_string(),
        ));
    }

    let mut session = ParseSession::new(lines);
    let mut patch = Patch::default();

    while !session.is_done(&[END_SENTINEL]) {
        if let Some(path) = session.read_str(UPDATE_FILE_PREFIX)? {
            if patch.actions.contains_key(path) {
                return Err(DiffError::Patch(format!(
                    "duplicate update for file: '{path}'"
                )));
            }
            let move_path = session.read_str(MOVE_TO_PREFIX)?.map(str::to_string);
            let Some(original) = current_files.get(path) else {
                return Err(DiffError::Patch(format!(
                    "cannot update missing file: '{path}'"
                )));
            };
            let chunks = parse_update_hunks(&mut session, original, path)?;
            patch
                .actions
                .insert(path.to_string(), PatchAction::UpdateFile { chunks, move_path });
            continue;
        }

        if let Some(path) = session.read_str(DELETE_FILE_PREFIX)? {
            if patch.actions.contains_key(path) {
                return Err(DiffError::Patch(format!(
                    "duplicate delete for file: '{path}'"
                )));
            }
            if !current_files.contains_key(path) {
                return Err(DiffError::Patch(format!(
                    "cannot delete missing file: '{path}'"
                )));
            }
            patch
                .actions
                .insert(path.to_string(), PatchAction::DeleteFile);
            continue;
        }

        if let Some(path) = session.read_str(ADD_FILE_PREFIX)? {
            if patch.actions.contains_key(path) {
                return Err(DiffError::Patch(format!("duplicate add for file: '{path}'")));
            }
            if current_files.contains_key(path) {
                return Err(DiffError::Patch(format!(
                    "cannot add file that already exists: '{path}'"
                )));
            }
            let action = parse_add_file(&mut session)?;
            patch.actions.insert(path.to_string(), action);
            continue;
        }

        return Err(DiffError::Patch(format!(
            "unknown line while parsing: '{}'",
            session.cur_line()?
        )));
    }

    if !session.cur_line()?.starts_with(END_SENTINEL) {
        return Err(DiffError::Patch(
            "missing '*** End Patch' sentinel".to_string(),
        ));
    }

    Ok((patch, session.fuzz))
}

/// Parse the hunks of one update directive, locating each context
/// window in the original file and rebasing chunk offsets onto the
/// match position.
fn parse_update_hunks(
    session: &mut ParseSession<'_>,
    original: &str,
    path: &str,
) -> Result<Vec<Chunk>, DiffError> {
    let file_lines: Vec<String> = original.split('\n').map(str::to_string).collect();
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut file_index = 0usize;

    while !session.is_done(&UPDATE_BOUNDARIES) {
        let label = session.read_str("@@ ")?;
        let mut bare_marker = false;
        if label.is_none() && session.cur_line()? == "@@" {
            session.read_line()?;
            bare_marker = true;
        }
        if label.is_none() && !bare_marker && file_index != 0 {
            return Err(DiffError::Patch(format!(
                "invalid line in update section for '{path}': '{}'",
                session.cur_line()?
            )));
        }

        if let Some(label) = label.filter(|label| !label.trim().is_empty()) {
            let (next_index, fuzz) = resolve_label(&file_lines, label, file_index, path)?;
            if fuzz > 0 {
                debug!(path, label, fuzz, "hunk label matched after relaxation");
            }
            file_index = next_index;
            session.fuzz += fuzz;
        }

        let section = scan_section(&session.lines, session.index)?;
        let (found, fuzz) = find_context(&file_lines, &section.context, file_index, section.eof);
        let Some(match_index) = found else {
            return Err(DiffError::Patch(format!(
                "cannot find {}context in '{path}' from line {file_index}:\n{}",
                if section.eof { "end-of-file " } else { "" },
                section.context.join("\n"),
            )));
        };
        if fuzz > 0 {
            debug!(path, fuzz, line = match_index, "context matched after relaxation");
        }
        session.fuzz += fuzz;

        for mut chunk in section.chunks {
            chunk.orig_index += match_index;
            chunks.push(chunk);
        }
        file_index = match_index + section.context.len();
        session.index = section.next_index;
    }

    Ok(chunks)
}

/// Advance the file cursor to just past the line named by a `@@` label.
///
/// An exact forward match wins; a whitespace-trimmed forward match
/// costs one fuzz. A label that already occurred behind the cursor is
/// accepted without moving it, so repeated labels cannot drag the
/// search backwards. A label found nowhere fails the parse.
fn resolve_label(
    file_lines: &[String],
    label: &str,
    index: usize,
    path: &str,
) -> Result<(usize, u64), DiffError> {
    let seen_exact = file_lines[..index].iter().any(|line| line == label);
    if !seen_exact {
        if let Some(pos) = file_lines[index..].iter().position(|line| line == label) {
            return Ok((index + pos + 1, 0));
        }
    }

    let trimmed = label.trim();
    let seen_trimmed = file_lines[..index].iter().any(|line| line.trim() == trimmed);
    if !seen_exact && !seen_trimmed {
        if let Some(pos) = file_lines[index..]
            .iter()
            .position(|line| line.trim() == trimmed)
        {
            return Ok((index + pos + 1, FUZZ_RTRIM));
        }
    }

    if seen_exact || seen_trimmed {
        return Ok((index, 0));
    }
    Err(DiffError::Patch(format!(
        "cannot locate hunk label in '{path}': '@@ {label}'"
    )))
}

/// Parse the `+`-prefixed body of an add directive into file content.
fn parse_add_file(session: &mut ParseSession<'_>) -> Result<PatchAction, DiffError> {
    let mut added: Vec<&str> = Vec::new();
    while !session.is_done(&DIRECTIVE_BOUNDARIES) {
        let line = session.read_line()?;
        let Some(content) = line.strip_prefix('+') else {
            return Err(DiffError::Patch(format!(
                "invalid add-file line (missing '+'): '{line}'"
            )));
        };
        added.push(content);
    }
    Ok(PatchAction::AddFile {
        new_file: added.join("\n"),
    })
}

/// Paths whose current content a patch needs: every update and delete
/// target. Computable from raw text, before parsing proper.
pub fn identify_files_needed(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            line.strip_prefix(UPDATE_FILE_PREFIX)
                .or_else(|| line.strip_prefix(DELETE_FILE_PREFIX))
        })
        .map(str::to_string)
        .collect()
}

/// Paths a patch creates: every add target.
pub fn identify_files_added(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.strip_prefix(ADD_FILE_PREFIX))
        .map(str::to_string)
        .collect()
}
