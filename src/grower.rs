//! Grower
//!
//! Recursive induction of the tree: each call either stops with a leaf or
//! splits its dataset on the attribute with the best gain ratio and grows
//! one subtree per observed value.
use crate::config::GrowConfig;
use crate::dataset::Dataset;
use crate::errors::TreeError;
use crate::node::{Branch, InternalNode, Node};
use crate::value::Value;
use log::{debug, warn};
use rayon::prelude::*;
use std::fmt;

/// Why a call of the grower produced a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every record has the same class value.
    PureClass,
    /// No feature attributes are left to split on.
    NoAttributes,
    /// The subset is smaller than the configured fraction of the root.
    SizePruned,
    /// No attribute was good enough to split on.
    GainPruned,
    /// The branch received no records.
    EmptyBranch,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            StopReason::PureClass => "pure class",
            StopReason::NoAttributes => "no attributes left",
            StopReason::SizePruned => "size pruned",
            StopReason::GainPruned => "gain pruned",
            StopReason::EmptyBranch => "empty branch",
        };
        f.write_str(s)
    }
}

/// Grow the subtree for `dataset`.
///
/// * `dataset` - The records reaching this node. Owned, so sibling calls never share state.
/// * `total_size` - Size of the root dataset, used by size pruning.
/// * `cfg` - Thresholds, passed unchanged to every recursive call.
pub fn grow(dataset: Dataset, total_size: f64, cfg: &GrowConfig) -> Result<Node, TreeError> {
    let malformed = dataset.check_dimensions();
    if !malformed.is_empty() {
        for m in &malformed {
            warn!("Malformed record: {}", m);
        }
        return Err(TreeError::MalformedRecords(malformed));
    }

    if let Some(class_value) = dataset.common_class_value() {
        return Ok(leaf(class_value.clone(), StopReason::PureClass, &dataset));
    }

    if dataset.attributes().is_empty() {
        return majority_leaf(&dataset, StopReason::NoAttributes);
    }

    if (dataset.size() as f64) < cfg.size_threshold * total_size {
        return majority_leaf(&dataset, StopReason::SizePruned);
    }

    let best = if cfg.skip_numeric_attributes {
        dataset.best_attribute_where(cfg.gain_ratio_prune_threshold, |a| a.is_discrete())?
    } else {
        dataset.best_attribute_by_gain_ratio(cfg.gain_ratio_prune_threshold)?
    };
    let Some(best) = best else {
        return majority_leaf(&dataset, StopReason::GainPruned);
    };
    debug!(
        "Splitting {} records on {} (gain ratio {:.6}, gain {:.6}).",
        dataset.size(),
        best.attribute,
        best.gain_ratio,
        best.gain
    );

    let majority = majority_value(&dataset)?;
    let partitions = dataset.split_by_attribute(&best.attribute)?;
    let grow_branch = |(value, subset): (Value, Dataset)| -> Result<(Branch, Node), TreeError> {
        let child = if subset.is_empty() {
            leaf(majority.clone(), StopReason::EmptyBranch, &subset)
        } else {
            grow(subset, total_size, cfg)?
        };
        Ok((Branch::new(value), child))
    };
    let children: Vec<(Branch, Node)> = if cfg.parallel {
        partitions.into_par_iter().map(grow_branch).collect::<Result<_, _>>()?
    } else {
        partitions.into_iter().map(grow_branch).collect::<Result<_, _>>()?
    };

    let mut node = InternalNode::new(best.attribute);
    for (branch, child) in children {
        node.add_child(branch, child);
    }
    Ok(Node::Internal(node))
}

fn leaf(class_value: Value, reason: StopReason, dataset: &Dataset) -> Node {
    debug!("Leaf {} for {} records ({}).", class_value, dataset.size(), reason);
    Node::leaf(class_value)
}

fn majority_value(dataset: &Dataset) -> Result<Value, TreeError> {
    dataset.majority_class_value().cloned().ok_or(TreeError::EmptyDataset)
}

fn majority_leaf(dataset: &Dataset, reason: StopReason) -> Result<Node, TreeError> {
    Ok(leaf(majority_value(dataset)?, reason, dataset))
}
