use anyhow::{bail, Result};
use tracing::info;

use crate::{
    geojson::{FeatureCollection, PointProperties},
    weights::WeightTriple,
};

pub const DEFAULT_DELTA_NDVI: f64 = 0.2;

/// Min-max scales `values` into [0, 1]. A constant column maps to all zeros.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}

struct NormalizedColumns {
    temp: Vec<f64>,
    ndvi: Vec<f64>,
    bld_density: Vec<f64>,
}

impl NormalizedColumns {
    fn from_collection(collection: &FeatureCollection) -> Result<Self> {
        if collection.features.is_empty() {
            bail!("feature collection has no features");
        }
        let column = |f: fn(&PointProperties) -> f64| -> Vec<f64> {
            collection
                .features
                .iter()
                .map(|feature| f(&feature.properties))
                .collect()
        };
        Ok(Self {
            temp: normalize(&column(|p| p.temp)),
            ndvi: normalize(&column(|p| p.ndvi)),
            bld_density: normalize(&column(|p| p.bld_density)),
        })
    }
}

/// Sets `vulnerability` on every feature.
pub fn apply_scores(collection: &mut FeatureCollection, weights: &WeightTriple) -> Result<()> {
    let columns = NormalizedColumns::from_collection(collection)?;
    for (i, feature) in collection.features.iter_mut().enumerate() {
        let score = weights.score(columns.temp[i], columns.ndvi[i], columns.bld_density[i]);
        feature.properties.vulnerability = Some(score);
    }
    info!(features = collection.features.len(), %weights, "vulnerability scored");
    Ok(())
}

/// Sets `plantPriority`: how much raising normalized NDVI by `delta_ndvi` lowers the score.
pub fn apply_plant_priority(
    collection: &mut FeatureCollection,
    weights: &WeightTriple,
    delta_ndvi: f64,
) -> Result<()> {
    let columns = NormalizedColumns::from_collection(collection)?;
    for (i, feature) in collection.features.iter_mut().enumerate() {
        let (n_temp, n_ndvi, n_bld) = (columns.temp[i], columns.ndvi[i], columns.bld_density[i]);
        let before = feature
            .properties
            .vulnerability
            .unwrap_or_else(|| weights.score(n_temp, n_ndvi, n_bld));
        let greened = (n_ndvi + delta_ndvi).min(1.0);
        let after = weights.score(n_temp, greened, n_bld);
        feature.properties.plant_priority = Some(before - after);
    }
    info!(
        features = collection.features.len(),
        delta_ndvi, "planting priority computed"
    );
    Ok(())
}
