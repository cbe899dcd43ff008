//! Errors
//!
//! Custom error types used throughout the `ratiotree` crate.
use std::fmt;
use thiserror::Error;

/// A record whose dimensionality disagrees with its attribute list.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    /// Position of the record in the dataset.
    pub index: usize,
    /// Number of values the attribute list expects (features + class).
    pub expected: usize,
    /// Number of values the record actually holds.
    pub found: usize,
    /// Rendering of the offending record.
    pub record: String,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "record {} has {} values, expected {}: {}",
            self.index, self.found, self.expected, self.record
        )
    }
}

fn join_malformed(records: &[MalformedRecord]) -> String {
    records.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("; ")
}

/// Errors that can occur while inducing a decision tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Entropy was requested for a dataset with no records.
    #[error("Entropy is undefined for an empty dataset.")]
    EmptyDataset,
    /// One or more records do not match the attribute list dimensionality.
    #[error("{} malformed record(s): {}", .0.len(), join_malformed(.0))]
    MalformedRecords(Vec<MalformedRecord>),
    /// Partitioning is not supported for this attribute.
    #[error("Splitting on numeric attribute {0} is not supported.")]
    UnsupportedSplit(String),
    /// The attribute is not part of the attribute list.
    #[error("Attribute {0} is not present in the attribute list.")]
    UnknownAttribute(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to write model to file.
    #[error("Unable to write model to file: {0}")]
    UnableToWrite(String),
    /// Unable to read model from file.
    #[error("Unable to read model from a file {0}")]
    UnableToRead(String),
}
