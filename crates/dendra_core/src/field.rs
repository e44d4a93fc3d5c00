//! Guidance fields for diffusible substances.
//!
//! The reaction–diffusion solver itself lives outside this crate; growth
//! rules only need a read-only snapshot answering "which way is uphill
//! here?". Gradients are returned normalised (unit length, or zero where the
//! field is flat), the same convention a diffusion grid uses.

use crate::config::{BandConfig, FieldModel, SubstancesConfig, WorldConfig};
use dendra_data::SubstanceId;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Read-only view of one substance's concentration.
pub trait GradientField: Send + Sync + fmt::Debug {
    fn concentration(&self, position: DVec3) -> f64;
    fn gradient(&self, position: DVec3) -> DVec3;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    #[inline]
    #[must_use]
    pub fn component(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    #[inline]
    #[must_use]
    pub fn unit(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }
}

/// Concentration following a normal distribution along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBand {
    pub mean: f64,
    pub sigma: f64,
    pub axis: Axis,
}

impl GaussianBand {
    #[must_use]
    pub fn new(mean: f64, sigma: f64, axis: Axis) -> Self {
        Self { mean, sigma, axis }
    }
}

impl From<BandConfig> for GaussianBand {
    fn from(cfg: BandConfig) -> Self {
        Self::new(cfg.mean, cfg.sigma, cfg.axis)
    }
}

impl GradientField for GaussianBand {
    fn concentration(&self, position: DVec3) -> f64 {
        let z = (self.axis.component(position) - self.mean) / self.sigma;
        (-0.5 * z * z).exp() / (self.sigma * (2.0 * std::f64::consts::PI).sqrt())
    }

    fn gradient(&self, position: DVec3) -> DVec3 {
        let offset = self.mean - self.axis.component(position);
        if offset == 0.0 {
            DVec3::ZERO
        } else {
            self.axis.unit() * offset.signum()
        }
    }
}

/// Same gradient everywhere; concentration rises linearly along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantGradient(pub DVec3);

impl GradientField for ConstantGradient {
    fn concentration(&self, position: DVec3) -> f64 {
        self.0.dot(position)
    }

    fn gradient(&self, _position: DVec3) -> DVec3 {
        self.0
    }
}

/// Concentration sampled on a cubic voxel grid.
///
/// Gradients are precomputed per box by central differences (one-sided on
/// the faces) and normalised when their norm exceeds `1e-10`. Positions
/// outside the grid read the nearest box.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelField {
    min_bound: f64,
    box_length: f64,
    resolution: usize,
    concentrations: Vec<f64>,
    gradients: Vec<DVec3>,
}

impl VoxelField {
    /// Samples `profile` at every box centre of `[min_bound, max_bound]³`.
    pub fn from_profile(
        min_bound: f64,
        max_bound: f64,
        resolution: usize,
        profile: &dyn GradientField,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(resolution > 0, "Voxel resolution must be positive");
        anyhow::ensure!(min_bound < max_bound, "Voxel bounds are empty");

        let box_length = (max_bound - min_bound) / resolution as f64;
        let centre = |i: usize| min_bound + (i as f64 + 0.5) * box_length;

        let mut concentrations = Vec::with_capacity(resolution.pow(3));
        for k in 0..resolution {
            for j in 0..resolution {
                for i in 0..resolution {
                    let p = DVec3::new(centre(i), centre(j), centre(k));
                    concentrations.push(profile.concentration(p));
                }
            }
        }

        let mut field = Self {
            min_bound,
            box_length,
            resolution,
            concentrations,
            gradients: Vec::new(),
        };
        field.gradients = field.compute_gradients();
        Ok(field)
    }

    #[inline]
    fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.resolution + k * self.resolution * self.resolution
    }

    fn box_of(&self, position: DVec3) -> (usize, usize, usize) {
        let last = (self.resolution - 1) as f64;
        let coord = |v: f64| ((v - self.min_bound) / self.box_length).floor().clamp(0.0, last) as usize;
        (coord(position.x), coord(position.y), coord(position.z))
    }

    fn difference(&self, lo: usize, hi: usize, span: f64) -> f64 {
        (self.concentrations[hi] - self.concentrations[lo]) / span
    }

    fn compute_gradients(&self) -> Vec<DVec3> {
        let n = self.resolution;
        let h = self.box_length;
        let mut gradients = Vec::with_capacity(self.concentrations.len());

        let partial = |c: usize, lo: Option<usize>, hi: Option<usize>| -> f64 {
            match (lo, hi) {
                (Some(lo), Some(hi)) => self.difference(lo, hi, 2.0 * h),
                (None, Some(hi)) => self.difference(c, hi, h),
                (Some(lo), None) => self.difference(lo, c, h),
                (None, None) => 0.0,
            }
        };

        for k in 0..n {
            for j in 0..n {
                for i in 0..n {
                    let c = self.index(i, j, k);
                    let gx = partial(
                        c,
                        i.checked_sub(1).map(|i| self.index(i, j, k)),
                        (i + 1 < n).then(|| self.index(i + 1, j, k)),
                    );
                    let gy = partial(
                        c,
                        j.checked_sub(1).map(|j| self.index(i, j, k)),
                        (j + 1 < n).then(|| self.index(i, j + 1, k)),
                    );
                    let gz = partial(
                        c,
                        k.checked_sub(1).map(|k| self.index(i, j, k)),
                        (k + 1 < n).then(|| self.index(i, j, k + 1)),
                    );
                    let g = DVec3::new(gx, gy, gz);
                    let norm = g.length();
                    gradients.push(if norm > 1e-10 { g / norm } else { DVec3::ZERO });
                }
            }
        }
        gradients
    }

    #[must_use]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[must_use]
    pub fn box_length(&self) -> f64 {
        self.box_length
    }
}

impl GradientField for VoxelField {
    fn concentration(&self, position: DVec3) -> f64 {
        let (i, j, k) = self.box_of(position);
        self.concentrations[self.index(i, j, k)]
    }

    fn gradient(&self, position: DVec3) -> DVec3 {
        let (i, j, k) = self.box_of(position);
        self.gradients[self.index(i, j, k)]
    }
}

/// Substance id to field lookup, resolved once when rules are bound.
#[derive(Debug, Default, Clone)]
pub struct FieldRegistry {
    fields: BTreeMap<SubstanceId, Arc<dyn GradientField>>,
}

impl FieldRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the apical and basal guidance fields described by the config.
    pub fn from_config(
        substances: &SubstancesConfig,
        world: &WorldConfig,
    ) -> anyhow::Result<Self> {
        let mut registry = Self::new();
        for (id, band) in [
            (SubstanceId::Apical, substances.apical),
            (SubstanceId::Basal, substances.basal),
        ] {
            let band = GaussianBand::from(band);
            let field: Arc<dyn GradientField> = match substances.model {
                FieldModel::Analytic => Arc::new(band),
                FieldModel::Voxel => Arc::new(VoxelField::from_profile(
                    world.min_bound,
                    world.max_bound,
                    substances.resolution,
                    &band,
                )?),
            };
            tracing::debug!(substance = %id, model = ?substances.model, "Substance field ready");
            registry.insert(id, field);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, id: SubstanceId, field: Arc<dyn GradientField>) {
        self.fields.insert(id, field);
    }

    /// Field for `id`; a missing substance is a configuration error.
    pub fn get(&self, id: SubstanceId) -> anyhow::Result<Arc<dyn GradientField>> {
        match self.fields.get(&id) {
            Some(field) => Ok(Arc::clone(field)),
            None => anyhow::bail!("No diffusion field registered for {id}"),
        }
    }

    #[must_use]
    pub fn contains(&self, id: SubstanceId) -> bool {
        self.fields.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_gradient_points_to_mean() {
        let band = GaussianBand::new(250.0, 200.0, Axis::Z);
        assert_eq!(band.gradient(DVec3::new(3.0, -1.0, 0.0)), DVec3::Z);
        assert_eq!(band.gradient(DVec3::new(0.0, 0.0, 300.0)), -DVec3::Z);
        assert_eq!(band.gradient(DVec3::new(9.0, 9.0, 250.0)), DVec3::ZERO);
    }

    #[test]
    fn test_band_concentration_peaks_at_mean() {
        let band = GaussianBand::new(-250.0, 200.0, Axis::Z);
        let peak = band.concentration(DVec3::new(0.0, 0.0, -250.0));
        assert!(peak > band.concentration(DVec3::ZERO));
        assert!(peak > band.concentration(DVec3::new(0.0, 0.0, -400.0)));
    }

    #[test]
    fn test_constant_gradient() {
        let field = ConstantGradient(DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(field.gradient(DVec3::splat(17.0)), DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(field.concentration(DVec3::new(1.0, 3.0, 5.0)), 6.0);
    }

    #[test]
    fn test_voxel_field_matches_band_direction() {
        let band = GaussianBand::new(250.0, 200.0, Axis::Z);
        let voxel = VoxelField::from_profile(-250.0, 250.0, 10, &band).unwrap();
        assert_eq!(voxel.resolution(), 10);
        assert_eq!(voxel.box_length(), 50.0);

        let g = voxel.gradient(DVec3::new(10.0, -30.0, 0.0));
        assert!((g - DVec3::Z).length() < 1e-9, "got {g:?}");
        // Outside the grid reads the nearest box.
        let outside = voxel.gradient(DVec3::new(0.0, 0.0, -10_000.0));
        assert!((outside - DVec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_voxel_field_flat_profile_has_zero_gradient() {
        let flat = ConstantGradient(DVec3::ZERO);
        let voxel = VoxelField::from_profile(0.0, 1.0, 3, &flat).unwrap();
        assert_eq!(voxel.gradient(DVec3::splat(0.5)), DVec3::ZERO);
    }

    #[test]
    fn test_voxel_field_rejects_zero_resolution() {
        let flat = ConstantGradient(DVec3::ZERO);
        assert!(VoxelField::from_profile(0.0, 1.0, 0, &flat).is_err());
    }

    #[test]
    fn test_registry_lookup() {
        let registry =
            FieldRegistry::from_config(&SubstancesConfig::default(), &WorldConfig::default())
                .unwrap();
        assert!(registry.contains(SubstanceId::Apical));
        let basal = registry.get(SubstanceId::Basal).unwrap();
        assert_eq!(basal.gradient(DVec3::ZERO), -DVec3::Z);
    }

    #[test]
    fn test_registry_missing_substance_is_error() {
        let registry = FieldRegistry::new();
        let err = registry.get(SubstanceId::Apical).unwrap_err();
        assert!(err.to_string().contains("substance_apical"));
    }
}
