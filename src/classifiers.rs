//! Binary classifiers deserialized from JSON artifacts.

use serde::Deserialize;

use crate::artifacts::Classifier;
use crate::errors::PipelineError;

/// Marks a leaf in `children_left` / `children_right`.
const TREE_LEAF: i64 = -1;

/// Serialized classifier, tagged by `"kind"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl ClassifierArtifact {
    /// Structural checks run once at load time.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ClassifierArtifact::LogisticRegression(m) => m.validate(),
            ClassifierArtifact::DecisionTree(m) => m.validate(),
            ClassifierArtifact::RandomForest(m) => m.validate(),
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn predict(&self, row: &[f64]) -> Result<i64, PipelineError> {
        match self {
            ClassifierArtifact::LogisticRegression(m) => m.predict(row),
            ClassifierArtifact::DecisionTree(m) => m.predict(row),
            ClassifierArtifact::RandomForest(m) => m.predict(row),
        }
    }
}

/// Linear model; predicts `classes[1]` when `coef · x + intercept > 0`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
    pub classes: Vec<i64>,
}

impl LogisticRegression {
    fn validate(&self) -> Result<(), String> {
        if self.coef.is_empty() {
            return Err("logistic regression has no coefficients".to_string());
        }
        if self.classes.len() != 2 {
            return Err(format!(
                "logistic regression needs exactly 2 classes, found {}",
                self.classes.len()
            ));
        }
        Ok(())
    }

    fn decision_function(&self, row: &[f64]) -> f64 {
        self.coef.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + self.intercept
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, row: &[f64]) -> Result<i64, PipelineError> {
        check_width(self.coef.len(), row)?;
        let positive = self.decision_function(row) > 0.0;
        Ok(self.classes[usize::from(positive)])
    }
}

/// Node arrays of one fitted tree, stored depth-first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeNodes {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions), one entry per class.
    pub value: Vec<Vec<f64>>,
}

impl TreeNodes {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("tree node arrays differ in length".to_string());
        }

        for node in 0..n {
            if self.value[node].len() != n_classes {
                return Err(format!(
                    "node {} has {} class weights, expected {}",
                    node,
                    self.value[node].len(),
                    n_classes
                ));
            }
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF {
                continue;
            }
            // Children always follow their parent, so traversal terminates.
            let in_range = |child: i64| child > node as i64 && (child as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(format!("node {} has out-of-range children", node));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!(
                    "node {} splits on feature {} of {}",
                    node, feature, n_features
                ));
            }
        }
        Ok(())
    }

    /// Class weights of the leaf `row` falls into, normalized to sum to 1.
    fn leaf_distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            weights.clone()
        }
    }
}

/// A single decision tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub tree: TreeNodes,
}

impl DecisionTree {
    fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("decision tree has no classes".to_string());
        }
        self.tree.validate(self.n_features, self.classes.len())
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, row: &[f64]) -> Result<i64, PipelineError> {
        check_width(self.n_features, row)?;
        let distribution = self.tree.leaf_distribution(row);
        Ok(self.classes[argmax(&distribution)])
    }
}

/// An ensemble of trees voting by summed class probabilities.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub estimators: Vec<TreeNodes>,
}

impl RandomForest {
    fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("random forest has no classes".to_string());
        }
        if self.estimators.is_empty() {
            return Err("random forest has no estimators".to_string());
        }
        for (i, tree) in self.estimators.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| format!("estimator {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn predict(&self, row: &[f64]) -> Result<i64, PipelineError> {
        check_width(self.n_features, row)?;

        let mut votes = vec![0.0; self.classes.len()];
        for tree in &self.estimators {
            for (vote, p) in votes.iter_mut().zip(tree.leaf_distribution(row)) {
                *vote += p;
            }
        }
        Ok(self.classes[argmax(&votes)])
    }
}

/// Index of the largest value; ties go to the lowest index.
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, v)| if *v > values[best] { i } else { best })
}

fn check_width(expected: usize, row: &[f64]) -> Result<(), PipelineError> {
    if row.len() != expected {
        return Err(PipelineError::PredictionError(format!(
            "X has {} features, but the model is expecting {} features as input",
            row.len(),
            expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits on feature 0 at 0.5: left leaf says class 0, right leaf class 1.
    fn stump() -> TreeNodes {
        TreeNodes {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![5.0, 5.0], vec![4.0, 1.0], vec![1.0, 4.0]],
        }
    }

    #[test]
    fn logistic_regression_thresholds_decision_function() {
        let model = LogisticRegression {
            coef: vec![1.0, -2.0],
            intercept: 0.5,
            classes: vec![0, 1],
        };
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[0.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn logistic_regression_checks_width() {
        let model = LogisticRegression {
            coef: vec![1.0, -2.0],
            intercept: 0.0,
            classes: vec![0, 1],
        };
        assert!(matches!(
            model.predict(&[1.0]),
            Err(PipelineError::PredictionError(_))
        ));
    }

    #[test]
    fn decision_tree_routes_on_threshold() {
        let model = DecisionTree {
            n_features: 1,
            classes: vec![0, 1],
            tree: stump(),
        };
        assert!(model.validate().is_ok());
        assert_eq!(model.predict(&[0.5]).unwrap(), 0);
        assert_eq!(model.predict(&[0.51]).unwrap(), 1);
    }

    #[test]
    fn random_forest_sums_probabilities() {
        let mut leaning_zero = stump();
        leaning_zero.value[2] = vec![3.0, 2.0];
        let model = RandomForest {
            n_features: 1,
            classes: vec![0, 1],
            // Right leaf: 0.2 + 0.6 for class 0 vs 0.8 + 0.4 for class 1.
            estimators: vec![stump(), leaning_zero],
        };
        assert_eq!(model.predict(&[1.0]).unwrap(), 1);
        assert_eq!(model.predict(&[0.0]).unwrap(), 0);
    }

    #[test]
    fn validate_rejects_backward_children() {
        let mut nodes = stump();
        nodes.children_left[0] = 0;
        let model = DecisionTree {
            n_features: 1,
            classes: vec![0, 1],
            tree: nodes,
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_feature() {
        let model = DecisionTree {
            n_features: 0,
            classes: vec![0, 1],
            tree: stump(),
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn deserializes_tagged_artifact() {
        let json = r#"{
            "kind": "logistic_regression",
            "coef": [0.5],
            "intercept": -1.0,
            "classes": [0, 1]
        }"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        assert!(artifact.validate().is_ok());
        assert_eq!(artifact.predict(&[4.0]).unwrap(), 1);
    }

    #[test]
    fn argmax_prefers_first_on_tie() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.1, 0.9]), 1);
    }
}
