use crate::model::{KPath, KPointMap, LatticeMatrix, VisualizationConfig};
use serde::{Deserialize, Serialize};

/// Body of `POST /generate_plot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub lattice_vectors: LatticeMatrix,
    pub kpoints: KPointMap,
    pub path: KPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<VisualizationConfig>,
}

impl PlotRequest {
    pub fn new(
        lattice_vectors: LatticeMatrix,
        kpoints: KPointMap,
        path: KPath,
        config: Option<VisualizationConfig>,
    ) -> Self {
        Self {
            lattice_vectors,
            kpoints,
            path,
            config,
        }
    }

    /// Path labels the server will not find among the k-points.
    pub fn unresolved_labels(&self) -> Vec<&str> {
        self.path.unresolved(&self.kpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_omits_absent_config() {
        let request = PlotRequest::new(
            LatticeMatrix::default(),
            KPointMap::default(),
            KPath(vec!["GAMMA".into()]),
            None,
        );
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("config").is_none());
        assert_eq!(value["path"], json!(["GAMMA"]));
        assert_eq!(value["kpoints"], json!({}));
    }
}
