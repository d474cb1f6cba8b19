pub mod baseline;
pub mod fences;
pub mod imports;
pub mod styles;

use std::sync::LazyLock;

use crate::artifacts::{ArtifactPair, ExtractedArtifact, RawArtifact, SanitizedArtifact};
use crate::config::SanitizerConfig;

static DEFAULT_SANITIZER: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::default);

/// Two-stage pipeline: response text → fenced blocks → repaired pair.
///
/// Holds no state beyond its config; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    config: SanitizerConfig,
}

impl Sanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn extract_pair(&self, text: &str) -> ArtifactPair {
        fences::extract_pair(text, self.config.code_tags.as_slice(), self.config.style_tags.as_slice())
    }

    pub fn sanitize_code(&self, code: &str) -> String {
        imports::sanitize_code(code, self.config.denied_imports.as_slice()).0
    }

    pub fn sanitize_style(&self, style: &str) -> String {
        styles::sanitize_style(style, self.config.inject_baseline)
    }

    pub fn extract(&self, raw: &RawArtifact) -> ExtractedArtifact {
        ExtractedArtifact {
            name: raw.name.clone(),
            kind: raw.kind,
            pair: self.extract_pair(&raw.text),
        }
    }

    pub fn normalize(&self, extracted: ExtractedArtifact) -> SanitizedArtifact {
        let ExtractedArtifact { name, kind, pair } = extracted;
        let (code, dropped_imports) = imports::sanitize_code(&pair.code, self.config.denied_imports.as_slice());
        let style = self.sanitize_style(&pair.style);

        SanitizedArtifact {
            name,
            kind,
            code_missing: code.trim().is_empty(),
            style_missing: style.is_empty(),
            pair: ArtifactPair { code, style },
            dropped_imports,
        }
    }

    pub fn sanitize(&self, raw: &RawArtifact) -> SanitizedArtifact {
        self.normalize(self.extract(raw))
    }

    /// Extract then normalize, without the per-artifact bookkeeping.
    pub fn sanitize_response(&self, text: &str) -> ArtifactPair {
        let pair = self.extract_pair(text);
        ArtifactPair {
            code: self.sanitize_code(&pair.code),
            style: self.sanitize_style(&pair.style),
        }
    }
}

pub fn extract_artifact_pair(text: &str) -> ArtifactPair {
    DEFAULT_SANITIZER.extract_pair(text)
}

pub fn extract_single_block(text: &str) -> String {
    fences::extract_single_block(text)
}

pub fn sanitize_code(code: &str) -> String {
    DEFAULT_SANITIZER.sanitize_code(code)
}

pub fn sanitize_style(style: &str) -> String {
    DEFAULT_SANITIZER.sanitize_style(style)
}

pub fn sanitize_response(text: &str) -> ArtifactPair {
    DEFAULT_SANITIZER.sanitize_response(text)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactKind;

    const SCENARIO: &str = "Here you go:\n```jsx\nconst X = () => <div class=\"a\">hi</div>;\n```\n```css\n.a { color:red;; }\n```";

    #[test]
    fn end_to_end_scenario() {
        let pair = sanitize_response(SCENARIO);
        assert_eq!(pair.code, "const X = () => <div className=\"a\">hi</div>;");
        assert!(pair.style.contains(".a {\n  color: red;\n}"));
        assert!(pair.style.starts_with(":root {"));
    }

    #[test]
    fn extraction_is_raw() {
        let pair = extract_artifact_pair(SCENARIO);
        assert_eq!(pair.code, "const X = () => <div class=\"a\">hi</div>;");
        assert_eq!(pair.style, ".a { color:red;; }");
    }

    #[test]
    fn denied_import_scenario() {
        let code = sanitize_code("import { Icon } from '@heroicons/react';\nexport default function X(){}");
        assert_eq!(code, "export default function X(){}");
    }

    #[test]
    fn prose_only_response() {
        let md = std::fs::read_to_string("tests/fixtures/prose_only.md").unwrap();
        assert!(extract_artifact_pair(&md).is_empty());
        assert_eq!(sanitize_response(&md), ArtifactPair::default());
        assert_eq!(extract_single_block(&md), md.trim());
    }

    #[test]
    fn sanitize_reports_misses_and_drops() {
        let raw = RawArtifact {
            name: "Navbar".into(),
            kind: ArtifactKind::Component,
            text: "```jsx\nimport { Menu } from '@headlessui/react';\nexport default function Navbar() { return null; }\n```"
                .into(),
        };
        let out = Sanitizer::default().sanitize(&raw);
        assert_eq!(out.name, "Navbar");
        assert!(!out.code_missing);
        assert!(out.style_missing);
        assert_eq!(out.dropped_imports, ["import { Menu } from '@headlessui/react';"]);
        assert_eq!(out.pair.style, "");
    }

    #[test]
    fn config_drives_every_stage() {
        let config = SanitizerConfig {
            code_tags: vec!["vue".into()],
            style_tags: vec!["css".into()],
            denied_imports: vec!["vuetify".into()],
            inject_baseline: false,
        };
        let sanitizer = Sanitizer::new(config);
        let text = "```jsx\nignored\n```\n```vue\nimport V from 'vuetify';\n<p class=\"x\"/>\n```\n```css\n.x{color:red}\n```";
        let pair = sanitizer.sanitize_response(text);
        assert_eq!(pair.code, "<p className=\"x\"/>");
        assert_eq!(pair.style, ".x {\n  color: red;\n}");
    }

    #[test]
    fn landing_page_fixture() {
        let md = std::fs::read_to_string("tests/fixtures/landing_page.md").unwrap();
        let raw = RawArtifact {
            name: "Landing".into(),
            kind: ArtifactKind::Page,
            text: md,
        };
        let out = Sanitizer::default().sanitize(&raw);
        assert_eq!(out.dropped_imports.len(), 2);
        assert!(out.pair.code.contains("className=\"landing\""));
        assert!(out.pair.code.contains("import React from 'react';"));
        assert!(out.pair.style.contains(":root {\n  --brand: #0f172a;\n}"));
        assert_eq!(out.pair.style.matches(":root").count(), 1);
    }
}
