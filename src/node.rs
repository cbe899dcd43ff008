use crate::attribute::Attribute;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The edge of an internal node, labelled with one attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub value: Value,
}

impl Branch {
    pub fn new(value: Value) -> Self {
        Branch { value }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    pub class_value: Value,
}

/// A split on one attribute, with one child per observed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalNode {
    pub attribute: Attribute,
    pub children: Vec<(Branch, Node)>,
}

impl InternalNode {
    pub fn new(attribute: Attribute) -> Self {
        InternalNode {
            attribute,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, branch: Branch, node: Node) {
        self.children.push((branch, node));
    }

    /// The child reached by following the branch labelled `value`.
    pub fn child(&self, value: &Value) -> Option<&Node> {
        self.children.iter().find(|(b, _)| &b.value == value).map(|(_, n)| n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Internal(InternalNode),
    Leaf(LeafNode),
}

impl Node {
    pub fn leaf(class_value: Value) -> Self {
        Node::Leaf(LeafNode { class_value })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// The predicted class, if this is a leaf.
    pub fn class_value(&self) -> Option<&Value> {
        match self {
            Node::Leaf(leaf) => Some(&leaf.class_value),
            Node::Internal(_) => None,
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(node) => node.children.iter().map(|(_, c)| c.n_leaves()).sum(),
        }
    }

    /// Number of internal nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Internal(node) => 1 + node.children.iter().map(|(_, c)| c.depth()).max().unwrap_or(0),
        }
    }

    pub(crate) fn write_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => writeln!(f, "{}{}", "      ".repeat(depth), leaf.class_value),
            Node::Internal(node) => {
                for (branch, child) in &node.children {
                    match child {
                        Node::Leaf(leaf) => writeln!(
                            f,
                            "{}{} = {}: {}",
                            "      ".repeat(depth),
                            node.attribute,
                            branch,
                            leaf.class_value
                        )?,
                        Node::Internal(_) => {
                            writeln!(f, "{}{} = {}", "      ".repeat(depth), node.attribute, branch)?;
                            child.write_indented(f, depth + 1)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
