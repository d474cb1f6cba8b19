use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::artifacts::ArtifactPair;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([A-Za-z0-9_+-]*)[ \t]*\r?\n([\s\S]*?)```").unwrap());
static FIRST_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:[A-Za-z0-9_+-]+[ \t]*\r?\n)?([\s\S]*?)```").unwrap());

/// A fenced region: normalized language tag (possibly empty) and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    pub tag: String,
    pub body: String,
}

/// All complete fence pairs in order of appearance. An opening fence without
/// a closing one is ignored.
pub fn scan_fences(text: &str) -> Vec<FencedBlock> {
    FENCE_RE
        .captures_iter(text)
        .map(|caps| FencedBlock {
            tag: caps[1].trim().to_lowercase(),
            body: caps[2].to_string(),
        })
        .collect()
}

/// Pick the code and style blocks out of a response.
///
/// The last block tagged with a code tag wins, likewise for style. With no
/// code-tagged block, the first untagged block stands in as code.
pub fn extract_pair<S: AsRef<str>>(text: &str, code_tags: &[S], style_tags: &[S]) -> ArtifactPair {
    let blocks = scan_fences(text);
    let has_tag = |tags: &[S], tag: &str| tags.iter().any(|t| t.as_ref() == tag);

    let mut code: Option<&str> = None;
    let mut style: Option<&str> = None;
    for block in &blocks {
        if has_tag(code_tags, &block.tag) {
            code = Some(&block.body);
        } else if has_tag(style_tags, &block.tag) {
            style = Some(&block.body);
        }
    }

    if code.is_none() {
        code = blocks.iter().find(|b| b.tag.is_empty()).map(|b| b.body.as_str());
    }

    if code.is_none() {
        debug!("No code block among {} fenced blocks", blocks.len());
    }
    if style.is_none() {
        debug!("No style block among {} fenced blocks", blocks.len());
    }

    ArtifactPair {
        code: code.map(|c| c.trim().to_string()).unwrap_or_default(),
        style: style.map(|s| s.trim().to_string()).unwrap_or_default(),
    }
}

/// Body of the first fenced block of any tag, or the whole text when no
/// fence is present.
pub fn extract_single_block(text: &str) -> String {
    match FIRST_FENCE_RE.captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None => text.trim().to_string(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CODE_TAGS, STYLE_TAGS};

    fn pair(text: &str) -> ArtifactPair {
        extract_pair(text, CODE_TAGS, STYLE_TAGS)
    }

    #[test]
    fn scan_keeps_order_and_normalizes_tags() {
        let blocks = scan_fences("```JSX \na\n```\ntext\n```\nb\n```\n```Css\nc\n```");
        let tags: Vec<&str> = blocks.iter().map(|b| b.tag.as_str()).collect();
        assert_eq!(tags, ["jsx", "", "css"]);
        assert_eq!(blocks[0].body, "a\n");
    }

    #[test]
    fn unterminated_fence_ignored() {
        assert!(scan_fences("```jsx\nconst a = 1;\n").is_empty());
    }

    #[test]
    fn no_fences_gives_empty_pair() {
        assert_eq!(pair("Sorry, I cannot help with that."), ArtifactPair::default());
        assert_eq!(pair(""), ArtifactPair::default());
    }

    #[test]
    fn single_code_block() {
        let p = pair("Sure!\n```tsx\n  export default function A() {}\n```\nEnjoy.");
        assert_eq!(p.code, "export default function A() {}");
        assert_eq!(p.style, "");
    }

    #[test]
    fn untagged_block_is_code() {
        let p = pair("```\nconst x = 1;\n```");
        assert_eq!(p.code, "const x = 1;");
    }

    #[test]
    fn tagged_code_beats_untagged() {
        let p = pair("```\nuntagged\n```\n```react\ntagged\n```");
        assert_eq!(p.code, "tagged");
    }

    #[test]
    fn first_untagged_wins_fallback() {
        let p = pair("```\nfirst\n```\n```\nsecond\n```");
        assert_eq!(p.code, "first");
    }

    #[test]
    fn last_code_block_wins() {
        let p = pair("```jsx\nfirst\n```\nActually, here is a fix:\n```jsx\nsecond\n```");
        assert_eq!(p.code, "second");
    }

    #[test]
    fn last_style_block_wins() {
        let p = pair("```css\n.a {}\n```\n```scss\n.b {}\n```");
        assert_eq!(p.style, ".b {}");
        assert_eq!(p.code, "");
    }

    #[test]
    fn unknown_tags_ignored() {
        let p = pair("```bash\nnpm install\n```\n```html\n<div></div>\n```");
        assert_eq!(p, ArtifactPair::default());
    }

    #[test]
    fn custom_tag_sets() {
        let p = extract_pair("```vue\n<template/>\n```\n```stylus\na\n```", &["vue"], &["stylus"]);
        assert_eq!(p.code, "<template/>");
        assert_eq!(p.style, "a");
    }

    #[test]
    fn single_block_any_tag() {
        assert_eq!(extract_single_block("x\n```svg\n<svg/>\n```\n```js\ny\n```"), "<svg/>");
        assert_eq!(extract_single_block("```\n  plain  \n```"), "plain");
    }

    #[test]
    fn single_block_falls_back_to_text() {
        assert_eq!(extract_single_block("  <svg></svg>\n"), "<svg></svg>");
        assert_eq!(extract_single_block(""), "");
    }

    #[test]
    fn hero_fixture() {
        let md = std::fs::read_to_string("tests/fixtures/hero_component.md").unwrap();
        let p = pair(&md);
        assert!(p.code.starts_with("import React"));
        assert!(p.code.ends_with("export default Hero;"));
        assert!(p.style.starts_with(".hero"));
    }

    #[test]
    fn repeated_fixture_takes_revision() {
        let md = std::fs::read_to_string("tests/fixtures/repeated_blocks.md").unwrap();
        let p = pair(&md);
        assert!(p.code.contains("Revised"), "got: {}", p.code);
        assert!(p.style.contains("--revised"), "got: {}", p.style);
    }
}
