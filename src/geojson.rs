use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: PointProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

/// Per-point measurements plus whatever scores have been attached so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointProperties {
    pub temp: f64,
    pub ndvi: f64,
    #[serde(rename = "bldDensity")]
    pub bld_density: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability: Option<f64>,
    #[serde(
        rename = "plantPriority",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub plant_priority: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read GeoJSON file {}", path.display()))?;
        let collection: FeatureCollection = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(collection)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl Feature {
    pub fn point(lon: f64, lat: f64, temp: f64, ndvi: f64, bld_density: f64) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Geometry {
                kind: "Point".to_string(),
                coordinates: vec![lon, lat],
            },
            properties: PointProperties {
                temp,
                ndvi,
                bld_density,
                vulnerability: None,
                plant_priority: None,
                extra: Map::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_properties_survive_a_rewrite() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[-79.38,43.65]},
             "properties":{"temp":33.1,"ndvi":0.2,"bldDensity":0.4,"ward":"Spadina"}}]}"#;
        let collection: FeatureCollection = serde_json::from_str(text).unwrap();
        let props = &collection.features[0].properties;
        assert_eq!(props.extra.get("ward"), Some(&Value::from("Spadina")));
        assert!(props.vulnerability.is_none());

        let rewritten = serde_json::to_value(&collection).unwrap();
        assert_eq!(rewritten["features"][0]["properties"]["ward"], "Spadina");
        assert!(rewritten["features"][0]["properties"]
            .get("plantPriority")
            .is_none());
    }
}
