//! Random forest regression: bagged variance-reduction CART trees.
//!
//! Trees are stored as a flat node arena so the serialized artifact is a
//! plain vector of nodes per tree. Bootstrap sampling runs on a seeded RNG,
//! which keeps repeated training runs bit-identical.

use std::cmp::Ordering;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 12,
            min_samples_split: 4,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn predict_one(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, params: &ForestParams) -> Self {
        let n = x.nrows();
        assert!(n > 0, "cannot fit a forest on an empty matrix");
        assert!(params.n_trees > 0, "forest needs at least one tree");
        assert_eq!(n, y.len(), "feature rows and targets must have equal lengths");

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        for _ in 0..params.n_trees {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut builder = TreeBuilder {
                x,
                y,
                max_depth: params.max_depth,
                min_samples_split: params.min_samples_split.max(2),
                nodes: Vec::new(),
            };
            builder.build_node(bootstrap, 0);
            trees.push(DecisionTree {
                nodes: builder.nodes,
            });
        }
        Self {
            trees,
            n_features: x.ncols(),
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean prediction over all trees.
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_one(features)).sum();
        sum / self.trees.len() as f64
    }
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    max_depth: usize,
    min_samples_split: usize,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow a subtree over `indices`, returning its node id.
    fn build_node(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let n = indices.len() as f64;
        let mean = indices.iter().map(|&i| self.y[i]).sum::<f64>() / n;

        if depth >= self.max_depth || indices.len() < self.min_samples_split {
            return self.push_leaf(mean);
        }
        let Some((feature, threshold)) = self.best_split(&indices) else {
            return self.push_leaf(mean);
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.x[[i, feature]] <= threshold);
        if left.is_empty() || right.is_empty() {
            return self.push_leaf(mean);
        }

        // Reserve the slot before recursing so child ids land after it.
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });
        let left_id = self.build_node(left, depth + 1);
        let right_id = self.build_node(right, depth + 1);
        self.nodes[node_id] = Node::Split {
            feature,
            threshold,
            left: left_id,
            right: right_id,
        };
        node_id
    }

    fn push_leaf(&mut self, value: f64) -> usize {
        self.nodes.push(Node::Leaf { value });
        self.nodes.len() - 1
    }

    /// Best (feature, threshold) by variance reduction, or None when no split
    /// improves on the parent node.
    ///
    /// For a candidate split, minimizing SSE_left + SSE_right is equivalent to
    /// maximizing sum_left^2/n_left + sum_right^2/n_right.
    fn best_split(&self, indices: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len() as f64;
        let total_sum: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let parent_score = total_sum * total_sum / n;

        let mut best: Option<(usize, f64, f64)> = None;
        for feature in 0..self.x.ncols() {
            let mut pairs: Vec<(f64, f64)> = indices
                .iter()
                .map(|&i| (self.x[[i, feature]], self.y[i]))
                .collect();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut sum_left = 0.0;
            for i in 0..pairs.len() - 1 {
                sum_left += pairs[i].1;
                if pairs[i].0 == pairs[i + 1].0 {
                    continue;
                }
                let n_left = (i + 1) as f64;
                let n_right = n - n_left;
                let sum_right = total_sum - sum_left;
                let score = sum_left * sum_left / n_left + sum_right * sum_right / n_right;
                if score > best.map_or(parent_score, |(_, _, s)| s) {
                    let threshold = (pairs[i].0 + pairs[i + 1].0) / 2.0;
                    best = Some((feature, threshold, score));
                }
            }
        }
        best.filter(|&(_, _, score)| score > parent_score + 1e-12)
            .map(|(feature, threshold, _)| (feature, threshold))
    }
}
