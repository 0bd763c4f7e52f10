use serde::Deserialize;

use crate::model::{Classifier, PredictionError};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let n_nodes = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} (n_features={})",
                            idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    // Children must point forward so traversal terminates.
                    for child in [*left, *right] {
                        if child <= idx || child >= n_nodes {
                            return Err(format!(
                                "node {} has child {} outside {}..{}",
                                idx,
                                child,
                                idx + 1,
                                n_nodes
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {} has {} class weights, expected {}",
                            idx,
                            value.len(),
                            n_classes
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("leaf {} has a negative or non-finite weight", idx));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {} has zero total weight", idx));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_for(&self, features: &[f64]) -> &[f64] {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
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
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("random forest declares zero features".to_string());
        }
        if self.n_classes < 2 {
            return Err(format!(
                "random forest declares {} classes, at least 2 required",
                self.n_classes
            ));
        }
        if self.trees.is_empty() {
            return Err("random forest has no trees".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(format!(
                    "{} feature names for n_features={}",
                    names.len(),
                    self.n_features
                ));
            }
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|e| format!("tree {}: {}", t, e))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    // Mean of per-tree normalized leaf distributions.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        self.check_features(features)?;
        let mut proba = vec![0.0f64; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_for(features);
            let total: f64 = leaf.iter().sum();
            for (acc, v) in proba.iter_mut().zip(leaf) {
                *acc += v / total;
            }
        }
        let n_trees = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n_trees;
        }
        Ok(proba)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/forest.rs"]
mod tests;
