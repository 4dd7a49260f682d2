use crate::errors::DiffError;
use crate::types::Chunk;

/// Tokenized form of one hunk: the context window it anchors to, the
/// edits inside it, the patch-line index scanning stopped at, and
/// whether the hunk was marked as applying at end of file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Section {
    pub(crate) context: Vec<String>,
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) next_index: usize,
    pub(crate) eof: bool,
}

const SECTION_BOUNDARIES: [&str; 6] = [
    "@@",
    "*** End Patch",
    "*** Update File:",
    "*** Delete File:",
    "*** Add File:",
    "*** End of File",
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum LineMode {
    Keep,
    Delete,
    Add,
}

/// Consume one hunk's lines starting at `start`, classifying each by
/// its leading marker: `+` insert, `-` delete, space keep. A fully
/// blank patch line stands for a keep of the empty string. The running
/// `old` sequence collects every context and delete line; a chunk
/// closes whenever a keep line follows a non-keep line.
pub(crate) fn scan_section(lines: &[&str], start: usize) -> Result<Section, DiffError> {
    let mut old: Vec<String> = Vec::new();
    let mut del_lines: Vec<String> = Vec::new();
    let mut ins_lines: Vec<String> = Vec::new();
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut mode = LineMode::Keep;
    let mut index = start;

    while index < lines.len() {
        let raw = lines[index];
        if SECTION_BOUNDARIES
            .iter()
            .any(|boundary| raw.starts_with(boundary))
        {
            break;
        }
        if raw == "***" {
            break;
        }
        if raw.starts_with("***") {
            return Err(DiffError::Patch(format!("invalid line in hunk: '{raw}'")));
        }
        index += 1;

        let last_mode = mode;
        let line = if raw.is_empty() { " " } else { raw };
        mode = match line.as_bytes()[0] {
            b'+' => LineMode::Add,
            b'-' => LineMode::Delete,
            b' ' => LineMode::Keep,
            _ => {
                return Err(DiffError::Patch(format!("invalid line in hunk: '{raw}'")));
            }
        };
        let content = line[1..].to_string();

        if mode == LineMode::Keep && last_mode != mode {
            close_chunk(&old, &mut del_lines, &mut ins_lines, &mut chunks);
        }

        match mode {
            LineMode::Delete => {
                del_lines.push(content.clone());
                old.push(content);
            }
            LineMode::Add => ins_lines.push(content),
            LineMode::Keep => old.push(content),
        }
    }

    close_chunk(&old, &mut del_lines, &mut ins_lines, &mut chunks);

    if index < lines.len() && lines[index] == "*** End of File" {
        return Ok(Section {
            context: old,
            chunks,
            next_index: index + 1,
            eof: true,
        });
    }

    if index == start {
        return Err(DiffError::Patch(
            "nothing to scan in hunk section".to_string(),
        ));
    }

    Ok(Section {
        context: old,
        chunks,
        next_index: index,
        eof: false,
    })
}

fn close_chunk(
    old: &[String],
    del_lines: &mut Vec<String>,
    ins_lines: &mut Vec<String>,
    chunks: &mut Vec<Chunk>,
) {
    if del_lines.is_empty() && ins_lines.is_empty() {
        return;
    }
    chunks.push(Chunk {
        orig_index: old.len() - del_lines.len(),
        del_lines: std::mem::take(del_lines),
        ins_lines: std::mem::take(ins_lines),
    });
}

#[cfg(test)]
mod tests {
    use super::scan_section;

    #[test]
    fn scan_section_splits_context_and_edits() {
        let lines = vec![" before", "-old", "+new", " after", "*** End Patch"];
        let section = scan_section(&lines, 0).expect("section should scan");

        assert_eq!(section.context, vec!["before", "old", "after"]);
        assert_eq!(section.chunks.len(), 1);
        assert_eq!(section.chunks[0].orig_index, 1);
        assert_eq!(section.chunks[0].del_lines, vec!["old"]);
        assert_eq!(section.chunks[0].ins_lines, vec!["new"]);
        assert_eq!(section.next_index, 4);
        assert!(!section.eof);
    }

    #[test]
    fn scan_section_closes_chunk_per_keep_boundary() {
        let lines = vec!["-a", "+b", " keep", "-c", "+d"];
        let section = scan_section(&lines, 0).expect("section should scan");

        assert_eq!(section.chunks.len(), 2);
        assert_eq!(section.chunks[0].orig_index, 0);
        assert_eq!(section.chunks[1].orig_index, 2);
        assert_eq!(section.context, vec!["a", "keep", "c"]);
    }

    #[test]
    fn scan_section_consumes_end_of_file_sentinel() {
        let lines = vec!["-last", "+final", "*** End of File", "*** End Patch"];
        let section = scan_section(&lines, 0).expect("section should scan");

        assert!(section.eof);
        assert_eq!(section.next_index, 3);
    }

    #[test]
    fn scan_section_blank_line_counts_as_empty_context() {
        let lines = vec![" a", "", " b"];
        let section = scan_section(&lines, 0).expect("section should scan");

        assert_eq!(section.context, vec!["a", "", "b"]);
        assert!(section.chunks.is_empty());
    }

    #[test]
    fn scan_section_rejects_unclassifiable_line() {
        let lines = vec!["?what"];
        let err = scan_section(&lines, 0).expect_err("scan should fail");
        assert!(err.to_string().contains("invalid line in hunk"));
    }

    #[test]
    fn scan_section_rejects_stray_directive_marker() {
        let lines = vec!["*** Move to: b.txt"];
        let err = scan_section(&lines, 0).expect_err("scan should fail");
        assert!(err.to_string().contains("invalid line in hunk"));
    }

    #[test]
    fn scan_section_errors_when_cursor_does_not_advance() {
        let lines = vec!["@@ label"];
        let err = scan_section(&lines, 0).expect_err("scan should fail");
        assert!(err.to_string().contains("nothing to scan"));
    }
}
