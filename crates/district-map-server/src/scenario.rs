//! # Scenario Files
//!
//! Locates and loads the GeoJSON inputs of a scenario folder.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use district_map_domain::{BoundingBox, LayerId};
use geojson::FeatureCollection;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// NETWORKS
// =============================================================================

/// Thermal network variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    /// District heating
    Dh,
    /// District cooling
    Dc,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dh => "DH",
            Self::Dc => "DC",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DH" => Ok(Self::Dh),
            "DC" => Ok(Self::Dc),
            other => Err(ApiError::InvalidInput(format!(
                "unknown network type '{other}', expected DH or DC"
            ))),
        }
    }
}

// =============================================================================
// LOCATOR
// =============================================================================

/// Input file layout of one scenario folder
#[derive(Debug, Clone)]
pub struct Scenario {
    root: PathBuf,
}

impl Scenario {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn inputs(&self) -> PathBuf {
        self.root.join("inputs")
    }

    pub fn streets_path(&self) -> PathBuf {
        self.inputs().join("networks").join("streets.geojson")
    }

    /// Edge and node files of a network, in merge order
    pub fn network_paths(&self, network: NetworkType) -> [PathBuf; 2] {
        let dir = self.inputs().join("networks").join(network.as_str());
        [dir.join("edges.geojson"), dir.join("nodes.geojson")]
    }

    pub fn building_geometry_path(&self, layer: LayerId) -> PathBuf {
        self.inputs()
            .join("building-geometry")
            .join(format!("{}.geojson", layer.as_str()))
    }

    pub async fn streets(&self) -> ApiResult<FeatureCollection> {
        let path = self.streets_path();
        read_collection(&path)
            .await?
            .ok_or_else(|| ApiError::NotFound("streets".to_string()))
    }

    /// Edges followed by nodes. Either file may be absent, not both.
    pub async fn network(&self, network: NetworkType) -> ApiResult<FeatureCollection> {
        let [edges_path, nodes_path] = self.network_paths(network);
        let edges = read_collection(&edges_path).await?;
        let nodes = read_collection(&nodes_path).await?;

        if edges.is_none() && nodes.is_none() {
            return Err(ApiError::NotFound(format!("{network} network")));
        }
        Ok(merge(edges.into_iter().chain(nodes)))
    }

    /// Building footprints of the zone or district, with a bounding box.
    pub async fn buildings(&self, layer: LayerId) -> ApiResult<FeatureCollection> {
        if !layer.is_building() {
            return Err(ApiError::NotFound(format!("{layer} building geometry")));
        }

        let path = self.building_geometry_path(layer);
        let collection = read_collection(&path)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("{layer} building geometry")))?;
        Ok(with_bbox(layer, collection))
    }
}

// =============================================================================
// LOADING
// =============================================================================

/// Read a FeatureCollection; a missing file is `None`.
pub async fn read_collection(path: &Path) -> ApiResult<Option<FeatureCollection>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "GeoJSON file not found");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let collection = text
        .parse::<FeatureCollection>()
        .map_err(|source| ApiError::GeoJson {
            path: path.display().to_string(),
            source,
        })?;

    tracing::debug!(
        path = %path.display(),
        features = collection.features.len(),
        "Loaded GeoJSON"
    );
    Ok(Some(collection))
}

/// Concatenate the features of several collections, keeping their order.
pub fn merge(collections: impl IntoIterator<Item = FeatureCollection>) -> FeatureCollection {
    let features = collections
        .into_iter()
        .flat_map(|collection| collection.features)
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Fill in `bbox` from the geometry when the file has none.
pub fn with_bbox(layer: LayerId, mut collection: FeatureCollection) -> FeatureCollection {
    if collection.bbox.is_some() {
        return collection;
    }

    match BoundingBox::of_collection(layer, &collection) {
        Ok(bbox) => collection.bbox = Some(bbox.to_geojson_bbox()),
        Err(err) => tracing::warn!(layer = %layer, error = %err, "Leaving bbox unset"),
    }
    collection
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"Name":"PIPE0"},"geometry":{"type":"LineString","coordinates":[[8.5,47.3],[8.51,47.3]]}}
    ]}"#;

    const NODES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"Name":"NODE0","Type":"PLANT"},"geometry":{"type":"Point","coordinates":[8.5,47.3]}},
        {"type":"Feature","properties":{"Name":"NODE1","Type":"CONSUMER"},"geometry":{"type":"Point","coordinates":[8.51,47.3]}}
    ]}"#;

    const ZONE: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"Name":"B1001","height_ag":12.0},"geometry":{"type":"Polygon","coordinates":[[[8.5,47.3],[8.6,47.3],[8.6,47.4],[8.5,47.4],[8.5,47.3]]]}}
    ]}"#;

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_network_type_parse() {
        assert_eq!("DH".parse::<NetworkType>().unwrap(), NetworkType::Dh);
        assert_eq!("DC".parse::<NetworkType>().unwrap(), NetworkType::Dc);
        assert!(matches!(
            "dh".parse::<NetworkType>(),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_paths() {
        let scenario = Scenario::new("/scenario");
        assert_eq!(
            scenario.streets_path(),
            PathBuf::from("/scenario/inputs/networks/streets.geojson")
        );
        assert_eq!(
            scenario.network_paths(NetworkType::Dc)[1],
            PathBuf::from("/scenario/inputs/networks/DC/nodes.geojson")
        );
        assert_eq!(
            scenario.building_geometry_path(LayerId::District),
            PathBuf::from("/scenario/inputs/building-geometry/district.geojson")
        );
    }

    #[tokio::test]
    async fn test_network_merges_edges_then_nodes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "inputs/networks/DH/nodes.geojson", NODES);
        write(dir.path(), "inputs/networks/DH/edges.geojson", EDGES);

        let merged = Scenario::new(dir.path())
            .network(NetworkType::Dh)
            .await
            .unwrap();

        let names: Vec<_> = merged
            .features
            .iter()
            .map(|f| f.property("Name").and_then(|v| v.as_str()).unwrap())
            .collect();
        assert_eq!(names, vec!["PIPE0", "NODE0", "NODE1"]);
    }

    #[tokio::test]
    async fn test_network_with_only_nodes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "inputs/networks/DC/nodes.geojson", NODES);

        let merged = Scenario::new(dir.path())
            .network(NetworkType::Dc)
            .await
            .unwrap();
        assert_eq!(merged.features.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_network_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Scenario::new(dir.path()).network(NetworkType::Dh).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_buildings_get_bbox() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "inputs/building-geometry/zone.geojson", ZONE);

        let zone = Scenario::new(dir.path())
            .buildings(LayerId::Zone)
            .await
            .unwrap();
        assert_eq!(zone.bbox, Some(vec![8.5, 47.3, 8.6, 47.4]));
    }

    #[tokio::test]
    async fn test_non_building_layer_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = Scenario::new(dir.path()).buildings(LayerId::Streets).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_geojson() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "inputs/networks/streets.geojson", "{not json");

        let result = Scenario::new(dir.path()).streets().await;
        assert!(matches!(result, Err(ApiError::GeoJson { .. })));
    }
}
