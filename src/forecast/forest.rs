//! Bagged ensemble of regression trees.
//!
//! Each tree is fit on a bootstrap resample drawn from its own `StdRng`,
//! seeded from the forest seed and the tree's position. Trees are fit in
//! parallel, but the per-tree seeds make the ensemble (and its predictions)
//! identical across runs and thread counts.

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::forecast::tree::{RegressionTree, TreeParams};

/// Ensemble settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub trees: usize,
    pub seed: u64,
    pub tree: TreeParams,
}

/// A fitted random forest regressor over one numeric feature.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `params.trees` trees. Returns `None` if there are no samples or no trees.
    pub fn fit(samples: &[(f64, f64)], params: ForestParams) -> Option<Self> {
        if samples.is_empty() || params.trees == 0 {
            return None;
        }

        let trees: Vec<RegressionTree> = (0..params.trees)
            .into_par_iter()
            .filter_map(|t| {
                let mut rng = StdRng::seed_from_u64(tree_seed(params.seed, t));
                let bag = bootstrap(samples, &mut rng);
                RegressionTree::fit(&bag, params.tree)
            })
            .collect();

        Some(Self { trees })
    }

    /// Mean of the per-tree predictions.
    pub fn predict(&self, x: f64) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        sum / self.trees.len() as f64
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

fn tree_seed(seed: u64, tree: usize) -> u64 {
    seed ^ (tree as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn bootstrap(samples: &[(f64, f64)], rng: &mut StdRng) -> Vec<(f64, f64)> {
    let n = samples.len();
    (0..n).map(|_| samples[rng.gen_range(0..n)]).collect()
}
