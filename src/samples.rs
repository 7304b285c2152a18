use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Feature values sampled for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    pub temp: f64,
    pub ndvi: f64,
    #[serde(rename = "bldDensity")]
    pub bld_density: f64,
    /// Score under unit weights, when the sampler recorded it.
    #[serde(rename = "currentV", default, skip_serializing_if = "Option::is_none")]
    pub current_v: Option<f64>,
}

impl Sample {
    pub fn new(temp: f64, ndvi: f64, bld_density: f64) -> Self {
        Self {
            id: None,
            lon: None,
            lat: None,
            temp,
            ndvi,
            bld_density,
            current_v: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn at(mut self, lon: f64, lat: f64) -> Self {
        self.lon = Some(lon);
        self.lat = Some(lat);
        self
    }
}

pub struct SampleLoader {
    base_dir: PathBuf,
}

impl SampleLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Vec<Sample>> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read samples file {}", path.display()))?;
        let samples: Vec<Sample> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let json = serde_json::to_string(&Sample::new(31.5, 0.12, 0.4)).unwrap();
        assert_eq!(json, r#"{"temp":31.5,"ndvi":0.12,"bldDensity":0.4}"#);
    }

    #[test]
    fn missing_feature_is_rejected() {
        let err = serde_json::from_str::<Sample>(r#"{"temp":30.0,"ndvi":0.2}"#).unwrap_err();
        assert!(err.to_string().contains("bldDensity"));
    }
}
