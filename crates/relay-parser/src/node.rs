//! Composed YAML tree with start positions

use crate::location::Mark;

/// A node of the composed document
#[derive(Debug, Clone, PartialEq)]
pub enum YamlNode {
    /// Key/value pairs in declaration order
    Mapping {
        mark: Mark,
        entries: Vec<(YamlNode, YamlNode)>,
    },

    /// Elements in declaration order
    Sequence { mark: Mark, items: Vec<YamlNode> },

    /// Leaf value as written in the source
    Scalar {
        mark: Mark,
        value: String,
        /// False for quoted, block or `!!str` scalars, which always stay strings
        plain: bool,
    },
}

impl YamlNode {
    pub fn mark(&self) -> Mark {
        match self {
            YamlNode::Mapping { mark, .. }
            | YamlNode::Sequence { mark, .. }
            | YamlNode::Scalar { mark, .. } => *mark,
        }
    }

    /// Text of a scalar node, `None` for collections
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            YamlNode::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Copy of this node starting at `mark`; children keep their positions
    pub(crate) fn remarked(&self, mark: Mark) -> YamlNode {
        let mut node = self.clone();
        match &mut node {
            YamlNode::Mapping { mark: m, .. }
            | YamlNode::Sequence { mark: m, .. }
            | YamlNode::Scalar { mark: m, .. } => *m = mark,
        }
        node
    }
}
