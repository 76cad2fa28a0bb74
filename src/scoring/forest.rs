//! Random forest classifier artifact
//!
//! A forest is stored as JSON: the ordered feature names it was trained on,
//! the class labels, and the flattened node arrays of every tree. Node 0 is
//! the root of each tree; a node whose children are both `-1` is a leaf whose
//! `value` holds per-class weights.

use serde::Deserialize;

use crate::error::{Result, RiskServiceError};

/// Child index marking a leaf
pub const LEAF: i64 = -1;

/// Index of the positive class in `predict_proba` output
pub const POSITIVE_CLASS: usize = 1;

/// A single node of a decision tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeNode {
    /// Feature index tested by a split node
    #[serde(default)]
    pub feature: Option<usize>,
    /// Samples with `x[feature] <= threshold` go left
    #[serde(default)]
    pub threshold: f64,
    pub left: i64,
    pub right: i64,
    /// Per-class weights; only read at leaves
    #[serde(default)]
    pub value: Vec<f64>,
}

impl TreeNode {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.left == LEAF && self.right == LEAF
    }
}

/// A binary decision tree in flattened form
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// An ensemble of decision trees averaged into class probabilities
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RandomForest {
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Parse a forest from its JSON artifact
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RiskServiceError::Scoring(format!("Invalid model artifact: {e}")))
    }

    /// Check the forest is usable with the given feature order
    pub fn validate(&self, expected_features: &[&str]) -> Result<()> {
        if self.feature_names.len() != expected_features.len()
            || self
                .feature_names
                .iter()
                .zip(expected_features)
                .any(|(actual, expected)| actual != expected)
        {
            return Err(RiskServiceError::Scoring(format!(
                "Model features {:?} do not match expected order {:?}",
                self.feature_names, expected_features
            )));
        }

        if self.classes.len() != 2 {
            return Err(RiskServiceError::Scoring(format!(
                "Expected a binary classifier, model has {} classes",
                self.classes.len()
            )));
        }

        if self.trees.is_empty() {
            return Err(RiskServiceError::Scoring("Model has no trees".to_string()));
        }

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            self.validate_tree(tree_idx, tree)?;
        }

        Ok(())
    }

    fn validate_tree(&self, tree_idx: usize, tree: &DecisionTree) -> Result<()> {
        let invalid = |node_idx: usize, msg: &str| {
            RiskServiceError::Scoring(format!("Tree {tree_idx} node {node_idx}: {msg}"))
        };

        if tree.nodes.is_empty() {
            return Err(RiskServiceError::Scoring(format!(
                "Tree {tree_idx} has no nodes"
            )));
        }

        let node_count = tree.nodes.len() as i64;
        for (node_idx, node) in tree.nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.value.len() != self.classes.len() {
                    return Err(invalid(node_idx, "leaf value does not match class count"));
                }
                if node.value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(invalid(node_idx, "leaf weights must be finite and non-negative"));
                }
                if node.value.iter().sum::<f64>() <= 0.0 {
                    return Err(invalid(node_idx, "leaf weights sum to zero"));
                }
                continue;
            }

            match node.feature {
                Some(feature) if feature < self.feature_names.len() => {}
                _ => return Err(invalid(node_idx, "split feature out of range")),
            }
            if !node.threshold.is_finite() {
                return Err(invalid(node_idx, "split threshold is not finite"));
            }
            // Children must come after their parent, which also rules out cycles
            for child in [node.left, node.right] {
                if child <= node_idx as i64 || child >= node_count {
                    return Err(invalid(node_idx, "child index out of range"));
                }
            }
        }

        Ok(())
    }

    /// Class probabilities for one input row
    ///
    /// Each tree contributes its leaf weights normalised to sum 1; the forest
    /// output is the mean over trees. The forest must have passed `validate`.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.feature_names.len() {
            return Err(RiskServiceError::Scoring(format!(
                "Expected {} features, got {}",
                self.feature_names.len(),
                row.len()
            )));
        }
        if row.iter().any(|x| !x.is_finite()) {
            return Err(RiskServiceError::Scoring(
                "Feature vector contains non-finite values".to_string(),
            ));
        }

        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = Self::find_leaf(tree, row)?;
            let weight: f64 = leaf.value.iter().sum();
            for (total, w) in totals.iter_mut().zip(&leaf.value) {
                *total += w / weight;
            }
        }

        let tree_count = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / tree_count).collect())
    }

    /// Probability of the positive class for one input row
    pub fn positive_probability(&self, row: &[f64]) -> Result<f64> {
        let proba = self.predict_proba(row)?;
        proba.get(POSITIVE_CLASS).copied().ok_or_else(|| {
            RiskServiceError::Scoring("Model produced no positive-class probability".to_string())
        })
    }

    fn find_leaf<'a>(tree: &'a DecisionTree, row: &[f64]) -> Result<&'a TreeNode> {
        let mut idx = 0usize;
        // A validated tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..tree.nodes.len() {
            let node = tree
                .nodes
                .get(idx)
                .ok_or_else(|| RiskServiceError::Scoring(format!("Node {idx} out of range")))?;
            if node.is_leaf() {
                return Ok(node);
            }
            let feature = node.feature.ok_or_else(|| {
                RiskServiceError::Scoring(format!("Split node {idx} has no feature"))
            })?;
            let value = row.get(feature).copied().ok_or_else(|| {
                RiskServiceError::Scoring(format!("Feature {feature} out of range"))
            })?;
            let next = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            idx = usize::try_from(next)
                .map_err(|_| RiskServiceError::Scoring(format!("Invalid child index {next}")))?;
        }

        Err(RiskServiceError::Scoring(
            "Tree traversal did not reach a leaf".to_string(),
        ))
    }
}
