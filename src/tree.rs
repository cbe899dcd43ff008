//! Decision Tree
//!
//! The entry point of induction, and the fitted tree handed to consumers.
use crate::attribute::Attributelist;
use crate::config::GrowConfig;
use crate::dataset::Dataset;
use crate::errors::TreeError;
use crate::grower::grow;
use crate::node::Node;
use crate::record::Record;
use crate::value::Value;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::fs;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DecisionTree {
    pub root: Node,
    /// The attribute list of the training data, used to locate record values
    /// when predicting.
    pub attributes: Attributelist,
    pub config: GrowConfig,
    pub n_leaves: usize,
    pub depth: usize,
}

impl DecisionTree {
    /// Induce a tree from `dataset`.
    ///
    /// The whole build fails, and no tree is returned, if any record is
    /// malformed or a numeric attribute would have to be split.
    pub fn fit(dataset: Dataset, config: GrowConfig) -> Result<Self, TreeError> {
        config.validate()?;
        if dataset.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        info!(
            "Growing tree on {} records with {} attributes.",
            dataset.size(),
            dataset.attribute_count()
        );
        let attributes = dataset.attributes().clone();
        let total_size = dataset.size() as f64;
        let root = grow(dataset, total_size, &config)?;
        let n_leaves = root.n_leaves();
        let depth = root.depth();
        info!("Finished growing tree with {} leaves and depth {}.", n_leaves, depth);
        Ok(DecisionTree {
            root,
            attributes,
            config,
            n_leaves,
            depth,
        })
    }

    /// Predicted class of a record laid out like the training records.
    ///
    /// Returns `None` when the record reaches a branch value never seen
    /// during training, or lacks a value the tree needs.
    pub fn predict(&self, record: &Record) -> Option<&Value> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(leaf) => return Some(&leaf.class_value),
                Node::Internal(internal) => {
                    let idx = self.attributes.position(&internal.attribute.name)?;
                    node = internal.child(record.value_at(idx)?)?;
                }
            }
        }
    }

    /// Predict every record, in order.
    pub fn predict_all<'a>(&'a self, records: &[Record]) -> Vec<Option<&'a Value>> {
        records.iter().map(|r| self.predict(r)).collect()
    }

    /// Save a tree as a json object to a file.
    ///
    /// * `path` - Path to save tree.
    pub fn save_tree(&self, path: &str) -> Result<(), TreeError> {
        let model = self.json_dump()?;
        match fs::write(path, model) {
            Err(e) => Err(TreeError::UnableToWrite(e.to_string())),
            Ok(_) => Ok(()),
        }
    }

    /// Dump a tree as a json object
    pub fn json_dump(&self) -> Result<String, TreeError> {
        match serde_json::to_string(self) {
            Ok(s) => Ok(s),
            Err(e) => Err(TreeError::UnableToWrite(e.to_string())),
        }
    }

    /// Load a tree from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    pub fn from_json(json_str: &str) -> Result<Self, TreeError> {
        let model = serde_json::from_str::<DecisionTree>(json_str);
        match model {
            Ok(m) => Ok(m),
            Err(e) => Err(TreeError::UnableToRead(e.to_string())),
        }
    }

    /// Load a tree from a path to a json tree object.
    ///
    /// * `path` - Path to load tree from.
    pub fn load_tree(path: &str) -> Result<Self, TreeError> {
        let json_str = match fs::read_to_string(path) {
            Ok(s) => Ok(s),
            Err(e) => Err(TreeError::UnableToRead(e.to_string())),
        }?;
        Self::from_json(&json_str)
    }
}

impl Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
