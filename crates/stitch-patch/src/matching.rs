/// Fuzz cost of a hunk matched only after right-trimming each line.
pub(crate) const FUZZ_RTRIM: u64 = 1;
/// Fuzz cost of a hunk matched only after fully trimming each line.
pub(crate) const FUZZ_TRIM: u64 = 100;
/// Fuzz cost of an EOF-anchored hunk that fell back to an unanchored
/// search.
pub(crate) const FUZZ_EOF_FALLBACK: u64 = 10_000;

/// Locate `context` in `lines`, searching forward from `start`.
///
/// Comparators are tried in order of strictness: exact equality, then
/// equality after right-stripping each line, then after fully stripping
/// each line, costing 0, 1, and 100 fuzz respectively. An empty context
/// trivially matches at `start` (pure insertions need no anchor).
///
/// EOF-anchored hunks first search anchored at the end of the file; on
/// a miss they retry unanchored from `start` with a 10,000 penalty
/// instead of failing, so a mis-marked end-of-file still applies and
/// only the fuzz score records the mismatch.
pub(crate) fn find_context(
    lines: &[String],
    context: &[String],
    start: usize,
    eof: bool,
) -> (Option<usize>, u64) {
    if eof {
        let anchor = lines.len().saturating_sub(context.len());
        let (found, fuzz) = find_context_core(lines, context, anchor);
        if found.is_some() {
            return (found, fuzz);
        }
        let (found, fuzz) = find_context_core(lines, context, start);
        return (found, fuzz + FUZZ_EOF_FALLBACK);
    }
    find_context_core(lines, context, start)
}

fn find_context_core(lines: &[String], context: &[String], start: usize) -> (Option<usize>, u64) {
    if context.is_empty() {
        return (Some(start), 0);
    }
    if lines.len() < context.len() {
        return (None, 0);
    }

    let passes: [(fn(&str) -> &str, u64); 3] = [
        (keep_verbatim, 0),
        (str::trim_end, FUZZ_RTRIM),
        (str::trim, FUZZ_TRIM),
    ];
    let last = lines.len() - context.len();
    for (normalize, fuzz) in passes {
        for i in start..=last {
            let matched = lines[i..i + context.len()]
                .iter()
                .zip(context)
                .all(|(line, wanted)| normalize(line) == normalize(wanted));
            if matched {
                return (Some(i), fuzz);
            }
        }
    }
    (None, 0)
}

fn keep_verbatim(line: &str) -> &str {
    line
}
