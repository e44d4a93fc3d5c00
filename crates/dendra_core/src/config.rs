//! Configuration management for simulation parameters.
//!
//! Strongly-typed structures mapping to `config.toml`. Every section has a
//! `Default` reproducing the reference pyramidal-cell model, and every
//! section is `#[serde(default)]`, so a file only needs the keys it changes.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in the `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. CLI flags (`--seed`, `--steps`, `--output`)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! seed = 8794
//! steps = 500
//!
//! [apical.branch]
//! probability = 0.033
//! daughter_diameter = "inherit"
//!
//! [basal.bifurcation]
//! diameter_penalty = 0.0
//! ```

use crate::field::Axis;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Run-level parameters: seed, duration and the simulation box.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    pub steps: u64,
    pub min_bound: f64,
    pub max_bound: f64,
    /// Steps between progress log lines.
    pub log_interval: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 8794,
            steps: 500,
            min_bound: -250.0,
            max_bound: 250.0,
            log_interval: 100,
        }
    }
}

/// Initial cells: how many somas and which neurites they start with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CellsConfig {
    pub count: usize,
    pub soma_diameter: f64,
    pub apical_direction: [f64; 3],
    pub basal_directions: Vec<[f64; 3]>,
}

impl Default for CellsConfig {
    fn default() -> Self {
        Self {
            count: 4,
            soma_diameter: 10.0,
            apical_direction: [0.0, 0.0, 1.0],
            basal_directions: vec![[0.0, 0.0, -1.0], [0.6, 0.0, -0.4], [-0.6, 0.0, -0.4]],
        }
    }
}

/// Neurite geometry shared by every growth rule.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GeometryConfig {
    /// Integration step; elongation moves `speed * time_step` per call.
    pub time_step: f64,
    /// Length of freshly extended, branched or bifurcated segments.
    pub neurite_default_length: f64,
    pub neurite_default_diameter: f64,
    /// Terminal segments longer than this are discretised.
    pub neurite_max_length: f64,
    /// Angle between the two daughters of a bifurcation, in radians.
    pub bifurcation_angle: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            neurite_default_length: 1.0,
            neurite_default_diameter: 1.0,
            neurite_max_length: 15.0,
            bifurcation_angle: std::f64::consts::FRAC_PI_3,
        }
    }
}

/// How the guidance fields are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldModel {
    /// Closed-form Gaussian band, exact gradient everywhere.
    #[default]
    Analytic,
    /// Band sampled on a voxel grid with finite-difference gradients.
    Voxel,
}

/// A Gaussian concentration band along one axis.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    pub mean: f64,
    pub sigma: f64,
    pub axis: Axis,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SubstancesConfig {
    pub model: FieldModel,
    /// Voxel boxes per axis when `model = "voxel"`.
    pub resolution: usize,
    pub apical: BandConfig,
    pub basal: BandConfig,
}

impl Default for SubstancesConfig {
    fn default() -> Self {
        Self {
            model: FieldModel::Analytic,
            resolution: 50,
            apical: BandConfig {
                mean: 250.0,
                sigma: 200.0,
                axis: Axis::Z,
            },
            basal: BandConfig {
                mean: -250.0,
                sigma: 200.0,
                axis: Axis::Z,
            },
        }
    }
}

/// Persistence, guidance and taper constants of one rule variant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GrowthParams {
    /// The rule is a no-op once the diameter is no longer above this.
    pub threshold: f64,
    pub old_direction_weight: f64,
    pub gradient_weight: f64,
    pub randomness_weight: f64,
    /// Elongation speed handed to the segment per step.
    pub speed: f64,
    pub diameter_decrement: f64,
}

/// Diameter given to a side branch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BranchDiameter {
    Fixed(f64),
    /// Copy the parent's diameter after this step's taper.
    Inherit,
}

impl BranchDiameter {
    #[must_use]
    pub fn resolve(self, parent_diameter: f64) -> f64 {
        match self {
            BranchDiameter::Fixed(d) => d,
            BranchDiameter::Inherit => parent_diameter,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BranchConfig {
    pub threshold: f64,
    pub probability: f64,
    /// Half-width of the per-component noise added to the axis.
    pub noise: f64,
    pub daughter_diameter: BranchDiameter,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BifurcationConfig {
    pub threshold: f64,
    pub probability: f64,
    /// Extra diameter loss applied right before the split.
    pub diameter_penalty: f64,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.55,
            probability: 0.030,
            noise: 0.1,
            daughter_diameter: BranchDiameter::Fixed(0.65),
        }
    }
}

impl Default for BifurcationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            probability: 0.006,
            diameter_penalty: 0.01,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ApicalConfig {
    pub growth: GrowthParams,
    pub branch: BranchConfig,
}

impl Default for ApicalConfig {
    fn default() -> Self {
        Self {
            growth: GrowthParams {
                threshold: 0.5,
                old_direction_weight: 4.0,
                gradient_weight: 0.06,
                randomness_weight: 0.3,
                speed: 100.0,
                diameter_decrement: 0.00071,
            },
            branch: BranchConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BasalConfig {
    pub growth: GrowthParams,
    pub bifurcation: BifurcationConfig,
}

impl Default for BasalConfig {
    fn default() -> Self {
        Self {
            growth: GrowthParams {
                threshold: 0.7,
                old_direction_weight: 6.0,
                gradient_weight: 0.03,
                randomness_weight: 0.4,
                speed: 50.0,
                diameter_decrement: 0.00085,
            },
            bifurcation: BifurcationConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: String,
    pub file_prefix: String,
    /// Also write the whole arbor as a JSON snapshot.
    pub snapshot: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            file_prefix: "cell".to_string(),
            snapshot: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub cells: CellsConfig,
    pub geometry: GeometryConfig,
    pub substances: SubstancesConfig,
    pub apical: ApicalConfig,
    pub basal: BasalConfig,
    pub export: ExportConfig,
}

fn ensure_probability(p: f64, name: &str) -> anyhow::Result<()> {
    anyhow::ensure!((0.0..=1.0).contains(&p), "{name} must be in [0.0, 1.0]");
    Ok(())
}

fn ensure_direction(dir: [f64; 3], name: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        glam::DVec3::from_array(dir).try_normalize().is_some(),
        "{name} must be a finite non-zero vector"
    );
    Ok(())
}

fn ensure_growth(growth: &GrowthParams, rule: &str) -> anyhow::Result<()> {
    anyhow::ensure!(growth.speed > 0.0, "{rule} speed must be positive");
    anyhow::ensure!(
        growth.diameter_decrement >= 0.0,
        "{rule} diameter decrement must be non-negative"
    );
    anyhow::ensure!(
        growth.old_direction_weight.is_finite()
            && growth.gradient_weight.is_finite()
            && growth.randomness_weight.is_finite(),
        "{rule} direction weights must be finite"
    );
    Ok(())
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// # Validation Rules
    /// - The simulation box must be non-empty
    /// - Time step, lengths and diameters must be positive
    /// - Root neurite directions must be finite and non-zero
    /// - Voxel resolution is capped at 512
    /// - Probabilities must be in [0.0, 1.0]
    /// - Decrements and penalties must be non-negative (diameters never grow)
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.world.min_bound < self.world.max_bound,
            "World min_bound must be below max_bound"
        );
        anyhow::ensure!(self.world.log_interval > 0, "Log interval must be positive");

        anyhow::ensure!(
            self.cells.soma_diameter > 0.0,
            "Soma diameter must be positive"
        );
        anyhow::ensure!(
            self.cells.count <= 10000,
            "Cell count too large (max 10000)"
        );
        ensure_direction(self.cells.apical_direction, "Apical direction")?;
        for dir in &self.cells.basal_directions {
            ensure_direction(*dir, "Basal direction")?;
        }

        anyhow::ensure!(self.geometry.time_step > 0.0, "Time step must be positive");
        anyhow::ensure!(
            self.geometry.neurite_default_length > 0.0,
            "Default neurite length must be positive"
        );
        anyhow::ensure!(
            self.geometry.neurite_default_diameter > 0.0,
            "Default neurite diameter must be positive"
        );
        anyhow::ensure!(
            self.geometry.neurite_max_length > self.geometry.neurite_default_length,
            "Max neurite length must exceed the default length"
        );

        anyhow::ensure!(
            self.substances.resolution > 0 && self.substances.resolution <= 512,
            "Voxel resolution must be in 1..=512"
        );
        anyhow::ensure!(
            self.substances.apical.sigma > 0.0 && self.substances.basal.sigma > 0.0,
            "Substance sigma must be positive"
        );

        ensure_growth(&self.apical.growth, "Apical")?;
        ensure_probability(self.apical.branch.probability, "Apical branch probability")?;
        anyhow::ensure!(
            self.apical.branch.noise >= 0.0,
            "Apical branch noise must be non-negative"
        );
        if let BranchDiameter::Fixed(d) = self.apical.branch.daughter_diameter {
            anyhow::ensure!(d > 0.0, "Fixed branch diameter must be positive");
        }

        ensure_growth(&self.basal.growth, "Basal")?;
        ensure_probability(
            self.basal.bifurcation.probability,
            "Basal bifurcation probability",
        )?;
        anyhow::ensure!(
            self.basal.bifurcation.diameter_penalty >= 0.0,
            "Basal bifurcation penalty must be non-negative"
        );

        anyhow::ensure!(
            !self.export.file_prefix.is_empty(),
            "Export file prefix must not be empty"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, falling back to defaults when the
    /// file does not exist. A file that exists but does not parse is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Hash of everything that changes a run's trajectories.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.cells).as_bytes());
        hasher.update(format!("{:?}", self.geometry).as_bytes());
        hasher.update(format!("{:?}", self.substances).as_bytes());
        hasher.update(format!("{:?}", self.apical).as_bytes());
        hasher.update(format!("{:?}", self.basal).as_bytes());
        hex::encode(hasher.finalize())
    }
}
