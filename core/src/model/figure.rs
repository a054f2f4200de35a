use crate::prelude::{ApiError, ApiResult, INVALID_PLOT_DATA};
use serde_json::{Map, Value};

/// Figure returned by the plot service.
///
/// The JSON is kept exactly as received; construction only checks that a
/// `data` array and a `layout` object are present.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotResponse {
    raw: Value,
}

impl PlotResponse {
    pub fn from_value(raw: Value) -> ApiResult<Self> {
        Self::check_shape(&raw)?;
        Ok(Self { raw })
    }

    /// Shape check shared by the view state and the renderer.
    pub fn check_shape(raw: &Value) -> ApiResult<()> {
        let has_data = raw.get("data").map(Value::is_array).unwrap_or(false);
        let has_layout = raw.get("layout").map(Value::is_object).unwrap_or(false);
        if has_data && has_layout {
            Ok(())
        } else {
            let missing = match (has_data, has_layout) {
                (false, false) => "data and layout",
                (false, true) => "data",
                _ => "layout",
            };
            log::debug!("figure rejected, missing {missing}");
            Err(ApiError::InvalidShape(INVALID_PLOT_DATA.into()))
        }
    }

    pub fn data(&self) -> &[Value] {
        self.raw
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn layout(&self) -> &Map<String, Value> {
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
        self.raw
            .get("layout")
            .and_then(Value::as_object)
            .unwrap_or_else(|| EMPTY.get_or_init(Map::new))
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_extra_keys_untouched() {
        let raw = json!({"data": [{"type": "scatter3d"}], "layout": {}, "frames": []});
        let plot = PlotResponse::from_value(raw.clone()).unwrap();
        assert_eq!(plot.as_value(), &raw);
        assert_eq!(plot.data().len(), 1);
    }

    #[test]
    fn missing_layout_is_invalid_shape() {
        let err = PlotResponse::from_value(json!({"data": []})).unwrap_err();
        assert_eq!(err.user_message(), INVALID_PLOT_DATA);
    }

    #[test]
    fn data_must_be_a_list() {
        assert!(PlotResponse::from_value(json!({"data": {}, "layout": {}})).is_err());
        assert!(PlotResponse::from_value(json!(null)).is_err());
    }
}
