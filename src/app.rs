//! Drives one run: seed cells, step, export.

use crate::model::config::AppConfig;
use crate::model::metrics::Metrics;
use crate::model::{Simulation, StepReport};
use anyhow::Context;
use dendra_io::{
    export_all, parse_swc, validate_records, write_json_file, RunManifest, MANIFEST_FILE,
};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE: &str = "arbor.json";

pub struct App {
    pub config: AppConfig,
    pub simulation: Simulation,
    pub metrics: Metrics,
}

impl App {
    /// Binds fields and rules and seeds the cells.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let simulation = Simulation::from_config(&config)?;
        let metrics = Metrics::new(config.world.log_interval);
        tracing::info!(
            seed = config.world.seed,
            cells = simulation.arbor.somas.len(),
            fingerprint = %config.fingerprint(),
            "Simulation ready"
        );
        Ok(Self {
            config,
            simulation,
            metrics,
        })
    }

    pub fn run(&mut self, steps: u64) -> StepReport {
        let report = self.simulation.run(steps, &self.metrics);
        tracing::info!(
            steps = self.simulation.current_step(),
            segments = self.simulation.arbor.len(),
            branches = self.metrics.branch_count(),
            bifurcations = self.metrics.bifurcation_count(),
            elapsed_ms = self.metrics.elapsed().as_millis() as u64,
            "Run finished"
        );
        report
    }

    /// Writes one SWC per soma, the optional arbor snapshot and `run.json`.
    pub fn export(&self, dir: &Path) -> anyhow::Result<RunManifest> {
        let arbor = &self.simulation.arbor;
        let files = export_all(
            arbor,
            dir,
            &self.config.export.file_prefix,
            self.simulation.seed(),
        )
        .with_context(|| format!("exporting morphologies to {}", dir.display()))?;

        let mut manifest = RunManifest::new(
            self.simulation.seed(),
            self.simulation.current_step(),
            self.config.fingerprint(),
        )
        .with_files(&files);
        manifest.soma_count = arbor.somas.len();
        manifest.segment_count = arbor.len();

        if self.config.export.snapshot {
            write_json_file(arbor, dir.join(SNAPSHOT_FILE))?;
            manifest.snapshot = Some(SNAPSHOT_FILE.to_string());
        }
        manifest.write(dir)?;
        tracing::info!(dir = %dir.display(), files = manifest.files.len(), "Export complete");
        Ok(manifest)
    }
}

/// Parses and validates an SWC file, or every `.swc` file of a directory.
/// Returns the number of files checked.
pub fn check(input: &Path) -> anyhow::Result<usize> {
    let files: Vec<PathBuf> = if input.is_dir() {
        let mut files = std::fs::read_dir(input)
            .with_context(|| format!("listing {}", input.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "swc"))
            .collect::<Vec<_>>();
        files.sort();
        files
    } else {
        vec![input.to_path_buf()]
    };
    anyhow::ensure!(!files.is_empty(), "No SWC files under {}", input.display());

    for path in &files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let records = parse_swc(&text).with_context(|| format!("parsing {}", path.display()))?;
        validate_records(&records).with_context(|| format!("validating {}", path.display()))?;
        tracing::info!(path = %path.display(), records = records.len(), "SWC valid");
    }

    let manifest = if input.is_dir() {
        input.join(MANIFEST_FILE)
    } else {
        input.with_file_name(MANIFEST_FILE)
    };
    if manifest.exists() {
        let run = RunManifest::read(&manifest)?;
        tracing::info!(seed = run.seed, steps = run.steps, "Manifest found");
    }
    Ok(files.len())
}
