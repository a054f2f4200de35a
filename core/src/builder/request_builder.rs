use crate::builder::form::{LatticeInput, LatticeMode, RequestForm};
use crate::model::{KPath, KPointMap, LatticeMatrix, PlotRequest, VisualizationConfig};
use crate::prelude::{BuildError, BuildResult, FormField};
use crate::telemetry::log::LogManager;

/// Turns raw form text into a [`PlotRequest`], all fields or nothing.
pub struct RequestBuilder {
    logger: LogManager,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }

    pub fn build(&self, form: &RequestForm) -> BuildResult<PlotRequest> {
        let lattice = parse_lattice(&form.lattice)?;
        let kpoints = parse_kpoints(&form.kpoints)?;
        let path = parse_path(&form.path)?;
        let config = check_config(&form.config)?;

        let request = PlotRequest::new(lattice, kpoints, path, config);
        let unresolved = request.unresolved_labels();
        if !unresolved.is_empty() {
            self.logger.unresolved_labels(&unresolved);
        }
        Ok(request)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_lattice(input: &LatticeInput) -> BuildResult<LatticeMatrix> {
    match input.mode {
        LatticeMode::Text => serde_json::from_str(input.text.trim())
            .map_err(|e| {
                BuildError::new(
                    FormField::Lattice,
                    format!("expected a 3x3 numeric array ({e})"),
                )
            }),
        LatticeMode::Grid => Ok(coerce_grid(&input.grid)),
    }
}

/// Grid cells never fail: anything that is not a finite number becomes 0.
pub fn coerce_grid(grid: &[[String; 3]; 3]) -> LatticeMatrix {
    LatticeMatrix::new(grid.each_ref().map(|row| row.each_ref().map(|cell| coerce_cell(cell))))
}

fn coerce_cell(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

pub fn parse_kpoints(text: &str) -> BuildResult<KPointMap> {
    serde_json::from_str(text.trim()).map_err(|e| {
        BuildError::new(
            FormField::KPoints,
            format!("expected an object of label -> [x, y, z] ({e})"),
        )
    })
}

pub fn parse_path(text: &str) -> BuildResult<KPath> {
    serde_json::from_str(text.trim())
        .map_err(|e| BuildError::new(FormField::Path, format!("expected an array of labels ({e})")))
}

fn check_config(config: &VisualizationConfig) -> BuildResult<Option<VisualizationConfig>> {
    if let Some(opacity) = config.face_opacity {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(BuildError::new(
                FormField::Config,
                format!("FACE_OPACITY must be within 0..1, got {opacity}"),
            ));
        }
    }
    if config.is_empty() {
        Ok(None)
    } else {
        Ok(Some(config.clone()))
    }
}
