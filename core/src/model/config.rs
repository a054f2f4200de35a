use serde::{Deserialize, Serialize};

/// Display options forwarded to the plot service.
///
/// Every field is optional on the wire; absent fields are left out of the
/// request body so the server falls back to its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VisualizationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_faces: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_path: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_points: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_offset_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_axes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orthographic: Option<bool>,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            show_faces: Some(true),
            face_color: Some("#add8e6".into()),
            face_opacity: Some(0.3),
            edge_color: Some("#000000".into()),
            edge_width: Some(3.0),
            show_path: Some(true),
            path_color: Some("#ff0000".into()),
            path_width: Some(5.0),
            show_points: Some(true),
            show_text: Some(true),
            point_color: Some("#ff0000".into()),
            point_size: Some(6.0),
            text_size: Some(22.0),
            text_offset_factor: Some(1.0),
            show_axes: Some(true),
            axes_factor: Some(0.5),
            orthographic: Some(true),
        }
    }
}

impl VisualizationConfig {
    /// Config with every field absent.
    pub fn empty() -> Self {
        Self {
            show_faces: None,
            face_color: None,
            face_opacity: None,
            edge_color: None,
            edge_width: None,
            show_path: None,
            path_color: None,
            path_width: None,
            show_points: None,
            show_text: None,
            point_color: None,
            point_size: None,
            text_size: None,
            text_offset_factor: None,
            show_axes: None,
            axes_factor: None,
            orthographic: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Reads a flag, treating an absent value as `fallback`.
    pub fn flag(value: Option<bool>, fallback: bool) -> bool {
        value.unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_serializes_to_empty_object() {
        let value = serde_json::to_value(VisualizationConfig::empty()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn keys_use_upper_snake_case() {
        let config = VisualizationConfig {
            text_offset_factor: Some(1.5),
            orthographic: Some(false),
            ..VisualizationConfig::empty()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({"TEXT_OFFSET_FACTOR": 1.5, "ORTHOGRAPHIC": false}));
    }

    #[test]
    fn json_round_trip_keeps_types() {
        let config = VisualizationConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["SHOW_FACES"].is_boolean());
        assert!(value["FACE_OPACITY"].is_f64());
        assert!(value["FACE_COLOR"].is_string());
        let back: VisualizationConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn string_booleans_are_rejected() {
        let parsed: Result<VisualizationConfig, _> =
            serde_json::from_value(json!({"SHOW_AXES": "true"}));
        assert!(parsed.is_err());
    }
}
