use crate::model::{LatticeMatrix, VisualizationConfig};
use serde::{Deserialize, Serialize};

const DEFAULT_LATTICE: &str = "[[0, 0.5, 0.5], [0.5, 0, 0.5], [0.5, 0.5, 0]]";
const DEFAULT_KPOINTS: &str = r#"{"GAMMA": [0, 0, 0], "X": [0.5, 0, 0.5], "L": [0.5, 0.5, 0.5], "W": [0.5, 0.25, 0.75], "K": [0.375, 0.375, 0.75]}"#;
const DEFAULT_PATH: &str = r#"["GAMMA", "X", "W", "L", "GAMMA", "K"]"#;

/// How the lattice is being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatticeMode {
    #[default]
    Text,
    Grid,
}

/// Raw lattice input: either a JSON text or nine cell strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeInput {
    pub mode: LatticeMode,
    pub text: String,
    pub grid: [[String; 3]; 3],
}

impl Default for LatticeInput {
    fn default() -> Self {
        Self {
            mode: LatticeMode::Text,
            text: DEFAULT_LATTICE.into(),
            grid: grid_from_matrix(&LatticeMatrix::default()),
        }
    }
}

impl LatticeInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn from_grid(grid: [[String; 3]; 3]) -> Self {
        Self {
            mode: LatticeMode::Grid,
            grid,
            ..Self::default()
        }
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        if let Some(cell) = self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// Changes mode, carrying the current value across when it can be read.
    pub fn switch_mode(&mut self, mode: LatticeMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            LatticeMode::Grid => {
                if let Ok(matrix) = serde_json::from_str::<LatticeMatrix>(&self.text) {
                    self.grid = grid_from_matrix(&matrix);
                }
            }
            LatticeMode::Text => {
                let matrix = super::request_builder::coerce_grid(&self.grid);
                if let Ok(text) = serde_json::to_string(&matrix) {
                    self.text = text;
                }
            }
        }
        self.mode = mode;
    }
}

fn grid_from_matrix(matrix: &LatticeMatrix) -> [[String; 3]; 3] {
    matrix.0.map(|row| row.map(|value| value.to_string()))
}

/// Everything the user can type before pressing Generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestForm {
    pub lattice: LatticeInput,
    pub kpoints: String,
    pub path: String,
    pub config: VisualizationConfig,
}

impl Default for RequestForm {
    fn default() -> Self {
        Self {
            lattice: LatticeInput::default(),
            kpoints: DEFAULT_KPOINTS.into(),
            path: DEFAULT_PATH.into(),
            config: VisualizationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_to_grid_copies_parsed_text() {
        let mut input = LatticeInput::from_text("[[1, 2, 3], [4, 5, 6], [7, 8, 9]]");
        input.switch_mode(LatticeMode::Grid);
        assert_eq!(input.mode, LatticeMode::Grid);
        assert_eq!(input.grid[1][2], "6");
    }

    #[test]
    fn unreadable_text_leaves_grid_alone() {
        let mut input = LatticeInput::from_text("not json");
        let before = input.grid.clone();
        input.switch_mode(LatticeMode::Grid);
        assert_eq!(input.grid, before);
    }

    #[test]
    fn switching_back_to_text_serializes_grid() {
        let mut input = LatticeInput::default();
        input.switch_mode(LatticeMode::Grid);
        input.set_cell(0, 0, "2".into());
        input.switch_mode(LatticeMode::Text);
        let matrix: LatticeMatrix = serde_json::from_str(&input.text).unwrap();
        assert_eq!(matrix.rows()[0][0], 2.0);
    }
}
