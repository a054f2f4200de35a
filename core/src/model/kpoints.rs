use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// High-symmetry points keyed by label, in fractional reciprocal coordinates.
///
/// Labels keep the order they were typed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KPointMap(pub IndexMap<String, [f64; 3]>);

impl KPointMap {
    pub fn get(&self, label: &str) -> Option<&[f64; 3]> {
        self.0.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &[f64; 3])> {
        self.0.iter()
    }
}

impl FromIterator<(String, [f64; 3])> for KPointMap {
    fn from_iter<I: IntoIterator<Item = (String, [f64; 3])>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ordered traversal through labelled k-points.
///
/// Labels are not checked against a [`KPointMap`] before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KPath(pub Vec<String>);

impl KPath {
    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels in the path that have no entry in `kpoints`, first occurrence only.
    pub fn unresolved<'a>(&'a self, kpoints: &KPointMap) -> Vec<&'a str> {
        let mut missing: Vec<&str> = Vec::new();
        for label in &self.0 {
            if !kpoints.contains(label) && !missing.contains(&label.as_str()) {
                missing.push(label);
            }
        }
        missing
    }
}
