//! `run.json`: what produced a set of exported morphologies.

use crate::error::Result;
use crate::serialization::{read_json_file, write_json_file};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "run.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub seed: u64,
    pub steps: u64,
    /// Hash of the growth-relevant configuration.
    pub fingerprint: String,
    /// RFC 3339, UTC.
    pub created_at: String,
    pub soma_count: usize,
    pub segment_count: usize,
    /// File names relative to the manifest's directory.
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

impl RunManifest {
    #[must_use]
    pub fn new(seed: u64, steps: u64, fingerprint: String) -> Self {
        Self {
            seed,
            steps,
            fingerprint,
            created_at: chrono::Utc::now().to_rfc3339(),
            soma_count: 0,
            segment_count: 0,
            files: Vec::new(),
            snapshot: None,
        }
    }

    /// Records exported files by name.
    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.files = files
            .into_iter()
            .filter_map(|p| {
                p.as_ref()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .collect();
        self
    }

    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        write_json_file(self, &path)?;
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self> {
        read_json_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_file_names() {
        let manifest = RunManifest::new(8794, 500, "abc".into())
            .with_files(["out/cell0_seed8794.swc", "out/cell1_seed8794.swc"]);
        assert_eq!(manifest.files, vec!["cell0_seed8794.swc", "cell1_seed8794.swc"]);
        assert!(chrono::DateTime::parse_from_rfc3339(&manifest.created_at).is_ok());
    }

    #[test]
    fn test_manifest_write_read() {
        let dir = std::env::temp_dir().join(format!("dendra-manifest-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut manifest = RunManifest::new(1, 2, "f00d".into());
        manifest.segment_count = 12;
        let path = manifest.write(&dir).unwrap();
        assert_eq!(RunManifest::read(&path).unwrap(), manifest);

        std::fs::remove_dir_all(&dir).ok();
    }
}
