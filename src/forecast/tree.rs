//! Single-feature CART regression tree.
//!
//! Splits minimize the summed squared error of the two children. Candidate
//! thresholds are midpoints between consecutive distinct feature values, so a
//! fully grown tree reproduces the training means exactly.

/// Growth limits for a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub min_samples_leaf: usize,
    pub max_depth: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            min_samples_leaf: 1,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf { value: f64 },
    Split { threshold: f64, left: usize, right: usize },
}

/// A fitted regression tree over one numeric feature.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit on `(x, y)` samples. Returns `None` for an empty sample.
    pub fn fit(samples: &[(f64, f64)], params: TreeParams) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let params = TreeParams {
            min_samples_leaf: params.min_samples_leaf.max(1),
            ..params
        };

        let mut tree = RegressionTree { nodes: Vec::new() };
        tree.grow(&sorted, 0, params);
        Some(tree)
    }

    /// Predict the response at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split { threshold, left, right } => {
                    idx = if x <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    /// Append the subtree for `samples` (sorted by x) and return its node index.
    fn grow(&mut self, samples: &[(f64, f64)], depth: usize, params: TreeParams) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: mean_y(samples),
        });

        let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
        if depth_reached {
            return idx;
        }

        let Some((split_at, threshold)) = best_split(samples, params.min_samples_leaf) else {
            return idx;
        };

        let left = self.grow(&samples[..split_at], depth + 1, params);
        let right = self.grow(&samples[split_at..], depth + 1, params);
        self.nodes[idx] = Node::Split { threshold, left, right };
        idx
    }
}

fn mean_y(samples: &[(f64, f64)]) -> f64 {
    samples.iter().map(|s| s.1).sum::<f64>() / samples.len() as f64
}

/// Best split position in a sorted sample: `(first index of the right child, threshold)`.
///
/// Returns `None` when the node is pure or no split respects `min_leaf`.
fn best_split(samples: &[(f64, f64)], min_leaf: usize) -> Option<(usize, f64)> {
    let n = samples.len();
    if n < 2 * min_leaf {
        return None;
    }

    let total_sum: f64 = samples.iter().map(|s| s.1).sum();
    let total_sq: f64 = samples.iter().map(|s| s.1 * s.1).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;
    if parent_sse <= 1e-12 * total_sq.max(1.0) {
        return None;
    }

    let mut best: Option<(usize, f64, f64)> = None;
    let mut left_sum = 0.0;
    let mut left_sq = 0.0;

    for i in 1..n {
        let y = samples[i - 1].1;
        left_sum += y;
        left_sq += y * y;

        if i < min_leaf || n - i < min_leaf {
            continue;
        }
        let (x_prev, x_next) = (samples[i - 1].0, samples[i].0);
        if x_prev == x_next {
            continue;
        }

        let n_left = i as f64;
        let n_right = (n - i) as f64;
        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let sse = (left_sq - left_sum * left_sum / n_left) + (right_sq - right_sum * right_sum / n_right);

        // Strict improvement keeps the leftmost split on ties.
        if best.is_none_or(|(_, _, best_sse)| sse < best_sse) {
            best = Some((i, 0.5 * (x_prev + x_next), sse));
        }
    }

    best.map(|(i, threshold, _)| (i, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_grown_tree_reproduces_training_means() {
        let samples = [(1.0, 10.0), (2.0, 20.0), (3.0, 15.0), (3.0, 17.0)];
        let tree = RegressionTree::fit(&samples, TreeParams::default()).unwrap();
        assert_eq!(tree.predict(1.0), 10.0);
        assert_eq!(tree.predict(2.0), 20.0);
        assert_eq!(tree.predict(3.0), 16.0);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn extrapolates_with_the_rightmost_leaf() {
        let samples = [(1.0, 5.0), (2.0, 6.0), (3.0, 9.0)];
        let tree = RegressionTree::fit(&samples, TreeParams::default()).unwrap();
        assert_eq!(tree.predict(10.0), 9.0);
        assert_eq!(tree.predict(-10.0), 5.0);
    }

    #[test]
    fn pure_node_is_a_single_leaf() {
        let samples = [(1.0, 4.0), (2.0, 4.0), (3.0, 4.0)];
        let tree = RegressionTree::fit(&samples, TreeParams::default()).unwrap();
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.predict(7.0), 4.0);
    }

    #[test]
    fn depth_limit_caps_growth() {
        let samples: Vec<(f64, f64)> = (0..16).map(|i| (i as f64, (i * i) as f64)).collect();
        let stump = RegressionTree::fit(
            &samples,
            TreeParams {
                min_samples_leaf: 1,
                max_depth: Some(1),
            },
        )
        .unwrap();
        assert_eq!(stump.leaf_count(), 2);
    }

    #[test]
    fn min_leaf_size_is_respected() {
        let samples = [(1.0, 1.0), (2.0, 100.0), (3.0, 1.0), (4.0, 1.0)];
        let tree = RegressionTree::fit(
            &samples,
            TreeParams {
                min_samples_leaf: 2,
                max_depth: None,
            },
        )
        .unwrap();
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn empty_sample_has_no_tree() {
        assert!(RegressionTree::fit(&[], TreeParams::default()).is_none());
    }
}
