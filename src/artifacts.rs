use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a generated artifact becomes in the React project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Component,
    Page,
}

impl ArtifactKind {
    /// Directory under `src/` the artifact is written to.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactKind::Component => "components",
            ArtifactKind::Page => "pages",
        }
    }
}

/// Code and stylesheet text for one artifact. Either half may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactPair {
    pub code: String,
    pub style: String,
}

impl ArtifactPair {
    pub fn new(code: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            style: style.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.style.is_empty()
    }
}

/// One model response, before anything has been pulled out of it.
#[derive(Debug, Clone)]
pub struct RawArtifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub text: String,
}

/// Fenced blocks selected out of a response, not yet repaired.
#[derive(Debug, Clone)]
pub struct ExtractedArtifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub pair: ArtifactPair,
}

/// Final per-artifact output plus what the normalizer did to it.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedArtifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub pair: ArtifactPair,
    pub dropped_imports: Vec<String>,
    pub code_missing: bool,
    pub style_missing: bool,
}

/// Artifacts of one generation run, keyed by name within each kind.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    pub components: BTreeMap<String, ArtifactPair>,
    pub pages: BTreeMap<String, ArtifactPair>,
}

impl ArtifactSet {
    /// Insert a pair, returning the one it replaced.
    pub fn insert(&mut self, kind: ArtifactKind, name: &str, pair: ArtifactPair) -> Option<ArtifactPair> {
        self.map_mut(kind).insert(name.to_string(), pair)
    }

    pub fn get(&self, kind: ArtifactKind, name: &str) -> Option<&ArtifactPair> {
        self.map(kind).get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len() + self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Components first, then pages, each in name order.
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &str, &ArtifactPair)> {
        let components = self
            .components
            .iter()
            .map(|(name, pair)| (ArtifactKind::Component, name.as_str(), pair));
        let pages = self
            .pages
            .iter()
            .map(|(name, pair)| (ArtifactKind::Page, name.as_str(), pair));
        components.chain(pages)
    }

    fn map(&self, kind: ArtifactKind) -> &BTreeMap<String, ArtifactPair> {
        match kind {
            ArtifactKind::Component => &self.components,
            ArtifactKind::Page => &self.pages,
        }
    }

    fn map_mut(&mut self, kind: ArtifactKind) -> &mut BTreeMap<String, ArtifactPair> {
        match kind {
            ArtifactKind::Component => &mut self.components,
            ArtifactKind::Page => &mut self.pages,
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_kept_apart() {
        let mut set = ArtifactSet::default();
        set.insert(ArtifactKind::Component, "Hero", ArtifactPair::new("a", ""));
        set.insert(ArtifactKind::Page, "Hero", ArtifactPair::new("b", ""));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(ArtifactKind::Component, "Hero").unwrap().code, "a");
        assert_eq!(set.get(ArtifactKind::Page, "Hero").unwrap().code, "b");
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut set = ArtifactSet::default();
        set.insert(ArtifactKind::Page, "Main", ArtifactPair::new("old", ""));
        let prev = set.insert(ArtifactKind::Page, "Main", ArtifactPair::new("new", ""));
        assert_eq!(prev.map(|p| p.code).as_deref(), Some("old"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn iter_orders_components_before_pages() {
        let mut set = ArtifactSet::default();
        set.insert(ArtifactKind::Page, "Checkout", ArtifactPair::default());
        set.insert(ArtifactKind::Component, "Navbar", ArtifactPair::default());
        set.insert(ArtifactKind::Component, "Footer", ArtifactPair::default());
        let names: Vec<_> = set.iter().map(|(_, name, _)| name).collect();
        assert_eq!(names, ["Footer", "Navbar", "Checkout"]);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&ArtifactKind::Component).unwrap();
        assert_eq!(json, "\"component\"");
    }
}
