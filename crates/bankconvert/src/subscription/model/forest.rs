use serde::Deserialize;

use super::{Classifier, ModelError};
use crate::subscription::domain::SubscriptionLabel;

/// Child index marking a leaf in the exported node arrays.
const LEAF: i64 = -1;

/// Exported ensemble: parallel node arrays per tree, as the fitted estimators store them.
#[derive(Debug, Clone, Deserialize)]
pub struct ForestParams {
    pub n_features: usize,
    pub trees: Vec<TreeParams>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeParams {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    #[serde(deserialize_with = "node_values")]
    pub value: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueShape {
    PerClass(Vec<Vec<f64>>),
    PerOutput(Vec<Vec<Vec<f64>>>),
}

fn node_values<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Vec<f64>>, D::Error> {
    match ValueShape::deserialize(deserializer)? {
        ValueShape::PerClass(values) => Ok(values),
        ValueShape::PerOutput(values) => values
            .into_iter()
            .map(|mut outputs| {
                if outputs.len() == 1 {
                    Ok(outputs.remove(0))
                } else {
                    Err(serde::de::Error::custom("forest must have a single output"))
                }
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        positive: f64,
    },
}

/// One validated tree; traversal always moves to a higher node index, so it terminates.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn from_params(params: TreeParams, n_features: usize, tree: usize) -> Result<Self, ModelError> {
        let invalid = |message: String| ModelError::Invalid(format!("tree {tree}: {message}"));
        let len = params.children_left.len();
        if len == 0 {
            return Err(invalid("has no nodes".into()));
        }
        if [
            params.children_right.len(),
            params.feature.len(),
            params.threshold.len(),
            params.value.len(),
        ]
        .iter()
        .any(|other| *other != len)
        {
            return Err(invalid("node arrays differ in length".into()));
        }

        let child = |node: usize, index: i64| -> Result<usize, ModelError> {
            usize::try_from(index)
                .ok()
                .filter(|child| *child > node && *child < len)
                .ok_or_else(|| invalid(format!("node {node} has invalid child {index}")))
        };

        let mut nodes = Vec::with_capacity(len);
        for node in 0..len {
            let left = params.children_left[node];
            let right = params.children_right[node];
            if left == LEAF && right == LEAF {
                nodes.push(Node::Leaf {
                    positive: positive_fraction(&params.value[node])
                        .ok_or_else(|| invalid(format!("leaf {node} has invalid class values")))?,
                });
                continue;
            }

            let feature = usize::try_from(params.feature[node])
                .ok()
                .filter(|feature| *feature < n_features)
                .ok_or_else(|| invalid(format!("node {node} splits on unknown feature")))?;
            let threshold = params.threshold[node];
            if !threshold.is_finite() {
                return Err(invalid(format!("node {node} has non-finite threshold")));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(node, left)?,
                right: child(node, right)?,
            });
        }

        Ok(Self { nodes })
    }

    /// Class-1 fraction at the leaf reached by `features`.
    ///
    /// Inputs are narrowed to `f32` before each comparison, as the fitted trees saw them;
    /// thresholds stay `f64` midpoints between `f32` training values.
    pub fn positive_fraction(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { positive } => return positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(feature).copied().unwrap_or(0.0) as f32;
                    index = if f64::from(value) <= threshold { left } else { right };
                }
            }
        }
    }
}

fn positive_fraction(values: &[f64]) -> Option<f64> {
    let [negative, positive] = values else {
        return None;
    };
    let total = negative + positive;
    if *negative < 0.0 || *positive < 0.0 || !total.is_finite() || total <= 0.0 {
        return None;
    }
    Some(positive / total)
}

/// Averages per-tree leaf class fractions; the label is the class with the larger mean.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Result<Self, ModelError> {
        if params.n_features == 0 {
            return Err(ModelError::Invalid("forest declares zero features".into()));
        }
        if params.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".into()));
        }

        let n_features = params.n_features;
        let trees = params
            .trees
            .into_iter()
            .enumerate()
            .map(|(index, tree)| DecisionTree::from_params(tree, n_features, index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { n_features, trees })
    }

    fn mean_positive(&self, features: &[f64]) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| tree.positive_fraction(features))
            .sum();
        total / self.trees.len() as f64
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> SubscriptionLabel {
        let positive = self.mean_positive(features);
        // Ties resolve to the first class.
        if positive > 1.0 - positive {
            SubscriptionLabel::Likely
        } else {
            SubscriptionLabel::Unlikely
        }
    }

    fn predict_proba(&self, features: &[f64]) -> Option<f64> {
        Some(self.mean_positive(features))
    }
}
