//! Random forest classifier
//!
//! Evaluates an already-trained ensemble of decision trees. Every tree
//! votes for one class and the forest returns the majority.

use crate::core::{batch_dim, ClassId, Classifier, ClassifierError, FeatureVector, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of a flattened decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node: samples with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Leaf node with its class prediction
    Leaf { class_id: ClassId },
}

/// Decision tree stored as a node array, root at index 0
///
/// A tree is only evaluated once a [`RandomForest`] has validated it
/// against the model's feature count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Check that the tree is non-empty, children point forward and in range,
    /// and split features are below `n_features`.
    ///
    /// Forward-only children rule out cycles.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ClassifierError::InvalidModel("empty decision tree".to_string()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= n_features {
                    return Err(ClassifierError::InvalidModel(format!(
                        "node {idx} splits on feature {feature}, model has {n_features}"
                    )));
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(ClassifierError::InvalidModel(format!(
                            "node {idx} has invalid child {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf
    ///
    /// Requires a validated tree and `x.len() >= n_features`.
    pub(crate) fn predict_sample(&self, x: &[f64]) -> ClassId {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { class_id } => return class_id,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Depth of a validated tree; a single leaf has depth 0
    pub(crate) fn depth(&self) -> usize {
        fn depth_at(nodes: &[TreeNode], idx: usize) -> usize {
            match nodes[idx] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => {
                    1 + depth_at(nodes, left).max(depth_at(nodes, right))
                }
            }
        }
        depth_at(&self.nodes, 0)
    }
}

/// Majority-vote ensemble of decision trees
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Create a forest, validating every tree against `n_features`
    pub fn new(trees: Vec<DecisionTree>, n_features: usize) -> Result<Self> {
        if trees.is_empty() {
            return Err(ClassifierError::InvalidModel(
                "random forest has no trees".to_string(),
            ));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| ClassifierError::InvalidModel(format!("tree {i}: {e}")))?;
        }
        Ok(Self { trees, n_features })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Depth of the deepest tree
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
    }

    fn predict_sample(&self, x: &[f64]) -> ClassId {
        let mut votes: BTreeMap<ClassId, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict_sample(x)).or_insert(0) += 1;
        }

        // Ascending iteration: the smallest class wins a tied vote
        let mut winner = (0, 0);
        for (class_id, count) in votes {
            if count > winner.1 {
                winner = (class_id, count);
            }
        }
        winner.0
    }
}

impl Classifier for RandomForest {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<ClassId>> {
        if let Some(actual) = batch_dim(batch)? {
            if actual != self.n_features {
                return Err(ClassifierError::ShapeMismatch {
                    expected: self.n_features,
                    actual,
                });
            }
        }
        Ok(batch.iter().map(|x| self.predict_sample(&x.values)).collect())
    }

    fn name(&self) -> &str {
        "random-forest"
    }
}
