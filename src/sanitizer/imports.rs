use tracing::debug;

/// HTML attribute spellings rewritten to their JSX form.
const ATTRIBUTE_FIXES: &[(&str, &str)] = &[
    (" class=", " className="),
    ("\"class\"", "\"className\""),
    ("'class'", "'className'"),
];

/// Rewrite `class` attribute spellings to `className`. Idempotent.
pub fn fix_attributes(code: &str) -> String {
    let mut out = code.to_string();
    for (from, to) in ATTRIBUTE_FIXES {
        out = out.replace(from, to);
    }
    out
}

/// Drop every line mentioning `import` together with a denylisted library.
/// Returns the kept text and the dropped lines.
///
/// Matching is plain substring matching, so a comment such as
/// `// import nothing from antd` is dropped as well.
pub fn filter_imports<S: AsRef<str>>(code: &str, denylist: &[S]) -> (String, Vec<String>) {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for line in code.lines() {
        let denied = line.contains("import") && denylist.iter().any(|d| line.contains(d.as_ref()));
        if denied {
            debug!("Dropping import: {}", line.trim());
            dropped.push(line.to_string());
        } else {
            kept.push(line);
        }
    }

    (kept.join("\n"), dropped)
}

/// Attribute fixes followed by the import filter.
pub fn sanitize_code<S: AsRef<str>>(code: &str, denylist: &[S]) -> (String, Vec<String>) {
    if code.is_empty() {
        return (String::new(), Vec::new());
    }
    filter_imports(&fix_attributes(code), denylist)
}

// ── Tests ──
