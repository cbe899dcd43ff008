// Modules
pub mod attribute;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod errors;
pub mod grower;
pub mod node;
pub mod record;
pub mod tree;
pub mod value;

// Individual classes, and functions
pub use attribute::{Attribute, AttributeKind, Attributelist};
pub use config::GrowConfig;
pub use dataset::Dataset;
pub use errors::TreeError;
pub use node::Node;
pub use record::Record;
pub use tree::DecisionTree;
pub use value::Value;
