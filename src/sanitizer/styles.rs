use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::baseline::BASELINE_CSS;

// Selector lines
static SEMIS_BEFORE_BRACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";+\s*\{").unwrap());
static COMMA_SEMI_SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*;\s*").unwrap());
static TRAILING_SEMI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";\s*$").unwrap());

// Declaration lines
static SEMI_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";{2,}").unwrap());
static COMMA_SEMI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",[ \t]*;").unwrap());
static PROPERTY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-{0,2}[A-Za-z_][\w-]*)[ \t]*:[ \t]*").unwrap());

// Whole-text safety net
static UNTERMINATED_LAST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*-{0,2}[A-Za-z_][\w-]*[ \t]*:[^;{}\n]*[^;{}\s,])[ \t]*\z").unwrap()
});
static SEMI_BEFORE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";+[ \t]*\{").unwrap());

const INDENT: &str = "  ";

/// Which kind of block the line pass is inside, taken from the outermost opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Outside,
    InRule,
    InAtRule,
    InKeyframes,
}

/// Brace tracking for the line pass. Depth never goes below zero, and the
/// scope is `Outside` exactly when depth is zero.
#[derive(Debug, Clone, Copy)]
pub struct ScopeTracker {
    scope: Scope,
    depth: usize,
}

impl Default for ScopeTracker {
    fn default() -> Self {
        Self {
            scope: Scope::Outside,
            depth: 0,
        }
    }
}

impl ScopeTracker {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn open(&mut self, selector: &str) {
        if self.depth == 0 {
            self.scope = classify_opener(selector);
        }
        self.depth += 1;
    }

    /// Extra closing braces are absorbed at depth zero.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.scope = Scope::Outside;
        }
    }

    fn inside(&self) -> bool {
        self.scope != Scope::Outside
    }
}

fn classify_opener(selector: &str) -> Scope {
    if selector.starts_with('@') {
        if selector.contains("keyframes") {
            Scope::InKeyframes
        } else {
            Scope::InAtRule
        }
    } else {
        Scope::InRule
    }
}

/// Repair common stylesheet damage in model output.
///
/// Empty input stays empty. Anything else, blank lines included, the text is broken into one
/// declaration per line, repaired line by line, passed through a whole-text
/// cleanup, and given the baseline tokens when it has no `:root` block.
pub fn sanitize_style(css: &str, inject_baseline: bool) -> String {
    if css.is_empty() {
        return String::new();
    }

    let lines = split_rules(css);
    let repaired = repair_lines(&lines);
    let cleaned = cleanup_text(&repaired);

    if inject_baseline && !has_root_scope(&cleaned) {
        debug!("No :root scope, prepending baseline tokens");
        format!("{}\n\n{}", BASELINE_CSS.trim_end(), cleaned)
    } else {
        cleaned
    }
}

pub fn has_root_scope(css: &str) -> bool {
    css.contains(":root")
}

// ── Pre-pass: one-line rules ──

/// Break every line that carries a structural brace into one piece per
/// selector, declaration, and closing brace.
fn split_rules(css: &str) -> Vec<String> {
    let mut splitter = LineSplitter::default();
    css.lines().flat_map(|line| splitter.split(line)).collect()
}

#[derive(Default)]
struct LineSplitter {
    in_comment: bool,
}

impl LineSplitter {
    fn split(&mut self, line: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;
        let mut parens = 0usize;
        let mut opened = 0usize;
        let mut structural = false;
        let mut chars = line.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            current.push(c);

            if self.in_comment {
                if c == '*' && chars.peek().is_some_and(|&(_, n)| n == '/') {
                    current.push('/');
                    chars.next();
                    self.in_comment = false;
                }
                continue;
            }
            if let Some(q) = quote {
                if c == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        current.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
                continue;
            }

            match c {
                '"' | '\'' => quote = Some(c),
                '/' if chars.peek().is_some_and(|&(_, n)| n == '*') => {
                    current.push('*');
                    chars.next();
                    self.in_comment = true;
                }
                '(' => parens += 1,
                ')' => parens = parens.saturating_sub(1),
                '{' => {
                    structural = true;
                    opened += 1;
                    flush(&mut pieces, &mut current);
                }
                '}' => {
                    structural = true;
                    opened = opened.saturating_sub(1);
                    current.pop();
                    flush(&mut pieces, &mut current);
                    pieces.push("}".to_string());
                }
                ';' if parens == 0 && opened > 0 => {
                    while chars.peek().is_some_and(|&(_, n)| n == ';') {
                        current.push(';');
                        chars.next();
                    }
                    let next = chars.peek().map_or(line.len(), |&(j, _)| j);
                    if !line[next..].trim_start().starts_with('{') {
                        flush(&mut pieces, &mut current);
                    }
                }
                _ => {}
            }
        }
        flush(&mut pieces, &mut current);

        if !structural || (pieces.len() == 1 && pieces[0] == line.trim()) {
            return vec![line.to_string()];
        }
        pieces
    }
}

fn flush(pieces: &mut Vec<String>, current: &mut String) {
    let piece = current.trim();
    if !piece.is_empty() && !piece.chars().all(|c| c == ';') {
        pieces.push(piece.to_string());
    }
    current.clear();
}

// ── Line pass ──

fn repair_lines(lines: &[String]) -> String {
    let mut tracker = ScopeTracker::default();
    let mut in_comment = false;
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if in_comment {
            in_comment = match trimmed.rfind("*/") {
                Some(end) => opens_comment(&trimmed[end + 2..]),
                None => true,
            };
            out.push(line.clone());
            continue;
        }
        in_comment = opens_comment(trimmed);

        if trimmed.is_empty() {
            out.push(String::new());
            continue;
        }

        if trimmed == "}" {
            tracker.close();
            out.push(format!("{}}}", INDENT.repeat(tracker.depth())));
            continue;
        }

        if trimmed.ends_with('{') {
            let selector = repair_selector(trimmed);
            out.push(format!("{}{}", INDENT.repeat(tracker.depth()), selector));
            tracker.open(&selector);
            continue;
        }

        if looks_like_property(trimmed) && !next_opens_block(lines, i) {
            let guarded = !tracker.inside() && (trimmed.starts_with('@') || trimmed.ends_with(','));
            if !guarded {
                let level = tracker.depth().max(1);
                out.push(format!("{}{}", INDENT.repeat(level), repair_declaration(trimmed)));
                continue;
            }
        }

        out.push(line.clone());
    }

    out.join("\n")
}

/// `.a;; {` → `.a {`, `h1,; h2 {` → `h1, h2 {`.
fn repair_selector(line: &str) -> String {
    let line = SEMIS_BEFORE_BRACE_RE.replace_all(line, " {");
    let line = COMMA_SEMI_SELECTOR_RE.replace_all(&line, ", ");
    let head = line.trim_end_matches('{');
    let head = TRAILING_SEMI_RE.replace(head, "");
    let head = head.trim_end();
    if head.is_empty() {
        "{".to_string()
    } else {
        format!("{} {{", head)
    }
}

/// `color:red;;` → `color: red;`, `font-family: a, b,` → `font-family: a, b;`.
fn repair_declaration(line: &str) -> String {
    let mut decl = line.to_string();
    if !decl.ends_with(';') {
        decl.push(';');
    }
    let decl = SEMI_RUN_RE.replace_all(&decl, ";");
    let decl = COMMA_SEMI_RE.replace_all(&decl, ";");
    PROPERTY_NAME_RE.replace(&decl, "$1: ").into_owned()
}

fn looks_like_property(trimmed: &str) -> bool {
    trimmed.contains(':') && !is_comment(trimmed)
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with("/*") || trimmed.starts_with('*') || trimmed.starts_with("//")
}

/// True when the line leaves a `/*` comment open.
fn opens_comment(text: &str) -> bool {
    match (text.rfind("/*"), text.rfind("*/")) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// A selector whose brace sits alone on the following line, e.g. `a:hover` / `{`.
fn next_opens_block(lines: &[String], i: usize) -> bool {
    lines[i + 1..]
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .is_some_and(|l| l.starts_with('{'))
}

// ── Whole-text safety net ──

fn cleanup_text(css: &str) -> String {
    let css = UNTERMINATED_LAST_RE.replace(css, "$1;");
    let css = SEMI_BEFORE_OPEN_RE.replace_all(&css, " {");
    let css = COMMA_SEMI_RE.replace_all(&css, ";");
    SEMI_RUN_RE.replace_all(&css, ";").into_owned()
}

// ── Tests ──
