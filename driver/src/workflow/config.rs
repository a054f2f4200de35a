use anyhow::Context;
use bzcore::builder::{LatticeInput, RequestForm};
use bzcore::model::VisualizationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A saved form: the same JSON text fields the UI edits, plus where to send them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub base_url: Option<String>,
    pub lattice: String,
    pub kpoints: String,
    pub path: String,
    pub config: VisualizationConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let form = RequestForm::default();
        Self {
            base_url: None,
            lattice: form.lattice.text,
            kpoints: form.kpoints,
            path: form.path,
            config: form.config,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn to_form(&self) -> RequestForm {
        RequestForm {
            lattice: LatticeInput::from_text(self.lattice.clone()),
            kpoints: self.kpoints.clone(),
            path: self.path.clone(),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_matches_form_defaults() {
        let cfg = WorkflowConfig::default();
        assert_eq!(cfg.to_form(), RequestForm::default());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"base_url: http://localhost:8000\n\
path: '[\"GAMMA\", \"X\"]'\n\
config:\n  SHOW_AXES: false\n  EDGE_WIDTH: 1.5\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(cfg.path, r#"["GAMMA", "X"]"#);
        assert_eq!(cfg.config.show_axes, Some(false));
        assert_eq!(cfg.config.edge_width, Some(1.5));
        assert_eq!(cfg.config.show_faces, None);
        assert_eq!(cfg.kpoints, RequestForm::default().kpoints);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = WorkflowConfig::load("/nonexistent/bz.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bz.yaml"));
    }
}
