use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::artifacts::{ArtifactKind, ArtifactSet, RawArtifact, SanitizedArtifact};
use crate::sanitizer::Sanitizer;

pub const MANIFEST_FILE: &str = "manifest.json";

const RESPONSE_EXTENSIONS: &[&str] = &["md", "txt"];
const CHUNK_SIZE: usize = 64;

/// Counters over one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub components: usize,
    pub pages: usize,
    pub code_missing: usize,
    pub style_missing: usize,
    pub dropped_imports: usize,
}

impl BatchStats {
    pub fn tally(artifacts: &[SanitizedArtifact]) -> Self {
        let mut stats = BatchStats::default();
        for a in artifacts {
            stats.total += 1;
            match a.kind {
                ArtifactKind::Component => stats.components += 1,
                ArtifactKind::Page => stats.pages += 1,
            }
            stats.code_missing += a.code_missing as usize;
            stats.style_missing += a.style_missing as usize;
            stats.dropped_imports += a.dropped_imports.len();
        }
        stats
    }

    pub fn print(&self) {
        println!(
            "Sanitized {} artifacts ({} components, {} pages): {} without code, {} without CSS, {} imports dropped.",
            self.total, self.components, self.pages, self.code_missing, self.style_missing, self.dropped_imports,
        );
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub artifacts: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub kind: ArtifactKind,
    pub code_bytes: usize,
    pub style_bytes: usize,
    pub code_missing: bool,
    pub style_missing: bool,
    pub dropped_imports: Vec<String>,
}

/// Load saved model responses from `dir`.
///
/// Files in `components/` and `pages/` take that kind; files directly in
/// `dir` are components. The artifact name is the file stem.
pub fn load_responses(dir: &Path, limit: Option<usize>) -> Result<Vec<RawArtifact>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let mut raws = Vec::new();
    read_responses(dir, ArtifactKind::Component, &mut raws)?;
    for kind in [ArtifactKind::Component, ArtifactKind::Page] {
        let sub = dir.join(kind.dir_name());
        if sub.is_dir() {
            read_responses(&sub, kind, &mut raws)?;
        }
    }

    raws.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
    if let Some(n) = limit {
        raws.truncate(n);
    }
    info!("Loaded {} responses from {}", raws.len(), dir.display());
    Ok(raws)
}

fn read_responses(dir: &Path, kind: ArtifactKind, out: &mut Vec<RawArtifact>) -> Result<()> {
    let entries = std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || !is_response_file(&path) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        out.push(RawArtifact {
            name: name.to_string(),
            kind,
            text,
        });
    }
    Ok(())
}

fn is_response_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RESPONSE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Sanitize every response, in parallel within each chunk.
pub fn sanitize_all(sanitizer: &Sanitizer, raws: &[RawArtifact], pb: &ProgressBar) -> Vec<SanitizedArtifact> {
    let mut out = Vec::with_capacity(raws.len());
    for chunk in raws.chunks(CHUNK_SIZE) {
        let results: Vec<_> = chunk.par_iter().map(|raw| sanitizer.sanitize(raw)).collect();
        for a in &results {
            if a.code_missing {
                warn!("No code extracted for {:?} {}", a.kind, a.name);
            }
        }
        out.extend(results);
        pb.inc(chunk.len() as u64);
    }
    out
}

pub fn collect_set(artifacts: &[SanitizedArtifact]) -> ArtifactSet {
    let mut set = ArtifactSet::default();
    for a in artifacts {
        if set.insert(a.kind, &a.name, a.pair.clone()).is_some() {
            warn!("Duplicate {:?} {}, keeping the later one", a.kind, a.name);
        }
    }
    set
}

/// Write `src/<kind>/<Name>.jsx` and `.css` under `out`. Empty halves are
/// skipped. Returns the number of files written.
pub fn write_set(out: &Path, set: &ArtifactSet) -> Result<usize> {
    let mut written = 0;
    for (kind, name, pair) in set.iter() {
        let dir = out.join("src").join(kind.dir_name());
        std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        for (ext, body) in [("jsx", &pair.code), ("css", &pair.style)] {
            if body.is_empty() {
                continue;
            }
            let path = dir.join(format!("{}.{}", name, ext));
            std::fs::write(&path, format!("{}\n", body))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written += 1;
        }
    }
    info!("Wrote {} files under {}", written, out.display());
    Ok(written)
}

pub fn build_manifest(artifacts: &[SanitizedArtifact]) -> Manifest {
    Manifest {
        generated_at: Utc::now(),
        artifacts: artifacts
            .iter()
            .map(|a| ManifestEntry {
                name: a.name.clone(),
                kind: a.kind,
                code_bytes: a.pair.code.len(),
                style_bytes: a.pair.style.len(),
                code_missing: a.code_missing,
                style_missing: a.style_missing,
                dropped_imports: a.dropped_imports.clone(),
            })
            .collect(),
    }
}

pub fn write_manifest(out: &Path, manifest: &Manifest) -> Result<PathBuf> {
    std::fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;
    let path = out.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

// ── Tests ──
