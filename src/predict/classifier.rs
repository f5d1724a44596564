use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::Outcome;

// ---------------------------------------------------------------------------
// Model artifact errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("reading model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed model artifact: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Artifact structure
// ---------------------------------------------------------------------------

/// One node of a decision tree. A split sends the sample left when
/// `feature <= threshold`, otherwise right; a leaf carries the class vote.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Walk from the root to a leaf. Child links are validated as
    /// forward-only at load time, so this always terminates.
    fn vote(&self, features: &[f64]) -> u8 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ForestClassifier – the pre-trained binary classifier
// ---------------------------------------------------------------------------

/// Pre-trained random-forest classifier, loaded once at startup from a JSON
/// artifact and consumed through a single inference call.
#[derive(Debug, Clone, Deserialize)]
pub struct ForestClassifier {
    n_features: usize,
    trees: Vec<Tree>,
}

impl ForestClassifier {
    /// Load and structurally validate an artifact file.
    pub fn load(path: &Path) -> Result<ForestClassifier, ModelError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate an artifact from its JSON text.
    pub fn from_json(text: &str) -> Result<ForestClassifier, ModelError> {
        let model: ForestClassifier = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    /// Number of features the model expects.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Classify a feature vector. Infallible after a valid load.
    ///
    /// Each tree votes for a class; the majority wins, with ties going to
    /// class 0 (no failure).
    pub fn predict(&self, features: &[f64]) -> Outcome {
        let ones = self
            .trees
            .iter()
            .filter(|tree| tree.vote(features) == 1)
            .count();
        Outcome::from_class(u8::from(ones * 2 > self.trees.len()))
    }

    /// Reject artifacts that could panic or loop during inference: empty
    /// forests, out-of-range feature indices, non-binary leaf classes, and
    /// child links that don't point strictly forward.
    fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("forest has no trees".into()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Malformed(format!("tree {t} has no nodes")));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Leaf { class } => {
                        if *class > 1 {
                            return Err(ModelError::Malformed(format!(
                                "tree {t} node {n}: class {class} is not binary"
                            )));
                        }
                    }
                    Node::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= self.n_features {
                            return Err(ModelError::Malformed(format!(
                                "tree {t} node {n}: feature index {feature} out of range"
                            )));
                        }
                        if *left <= n || *right <= n || *left >= tree.nodes.len()
                            || *right >= tree.nodes.len()
                        {
                            return Err(ModelError::Malformed(format!(
                                "tree {t} node {n}: invalid child link"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Two stumps splitting on tool wear plus one constant no-failure tree.
    const FOREST: &str = r#"{
        "n_features": 6,
        "trees": [
            { "nodes": [
                { "feature": 5, "threshold": 200.0, "left": 1, "right": 2 },
                { "class": 0 },
                { "class": 1 }
            ]},
            { "nodes": [
                { "feature": 5, "threshold": 180.0, "left": 1, "right": 2 },
                { "class": 0 },
                { "class": 1 }
            ]},
            { "nodes": [ { "class": 0 } ]}
        ]
    }"#;

    fn features(tool_wear: f64) -> [f64; 6] {
        [1.0, 299.5, 308.7, 1500.0, 40.0, tool_wear]
    }

    #[test]
    fn majority_vote_decides_the_label() {
        let model = ForestClassifier::from_json(FOREST).unwrap();
        assert_eq!(model.n_features(), 6);
        // both stumps vote failure, constant tree votes no failure: 2 of 3
        assert_eq!(model.predict(&features(230.0)), Outcome::Failure);
        // only one stump votes failure: 1 of 3
        assert_eq!(model.predict(&features(190.0)), Outcome::NoFailure);
        assert_eq!(model.predict(&features(10.0)), Outcome::NoFailure);
    }

    #[test]
    fn split_threshold_is_inclusive_on_the_left() {
        let model = ForestClassifier::from_json(FOREST).unwrap();
        // exactly at both thresholds both stumps send the sample left
        assert_eq!(model.predict(&features(180.0)), Outcome::NoFailure);
    }

    #[test]
    fn tie_goes_to_no_failure() {
        let model = ForestClassifier::from_json(
            r#"{
                "n_features": 1,
                "trees": [
                    { "nodes": [ { "class": 1 } ]},
                    { "nodes": [ { "class": 0 } ]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(model.predict(&[0.0]), Outcome::NoFailure);
    }

    #[test]
    fn load_reads_an_artifact_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{FOREST}").unwrap();
        file.flush().unwrap();

        let model = ForestClassifier::load(file.path()).unwrap();
        assert_eq!(model.predict(&features(230.0)), Outcome::Failure);
    }

    #[test]
    fn empty_forest_is_rejected() {
        let err = ForestClassifier::from_json(r#"{ "n_features": 6, "trees": [] }"#).unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn out_of_range_feature_is_rejected() {
        let err = ForestClassifier::from_json(
            r#"{
                "n_features": 2,
                "trees": [
                    { "nodes": [
                        { "feature": 7, "threshold": 0.0, "left": 1, "right": 2 },
                        { "class": 0 },
                        { "class": 1 }
                    ]}
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn backward_child_link_is_rejected() {
        let err = ForestClassifier::from_json(
            r#"{
                "n_features": 2,
                "trees": [
                    { "nodes": [
                        { "feature": 0, "threshold": 0.0, "left": 0, "right": 1 },
                        { "class": 1 }
                    ]}
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn garbage_json_is_a_parse_error() {
        let err = ForestClassifier::from_json("not a model").unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }
}
