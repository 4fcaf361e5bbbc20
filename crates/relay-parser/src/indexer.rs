//! Builds the field path → location index of a composed document.

use crate::error::StructureViolation;
use crate::location::{index_path, key_path, LocationIndex};
use crate::node::YamlNode;

/// Index every node reachable from `root`, depth-first in declaration order
pub(crate) fn index_locations(root: &YamlNode) -> Result<LocationIndex, StructureViolation> {
    let mut index = LocationIndex::new();
    visit(root, "", &mut index)?;
    Ok(index)
}

fn visit(node: &YamlNode, path: &str, index: &mut LocationIndex) -> Result<(), StructureViolation> {
    index.record(path, node.mark());

    match node {
        YamlNode::Mapping { entries, .. } => {
            for (key, value) in entries {
                let key = key
                    .as_scalar()
                    .ok_or(StructureViolation::NonScalarKey { mark: key.mark() })?;
                visit(value, &key_path(path, key), index)?;
            }
        }
        YamlNode::Sequence { items, .. } => {
            for (i, item) in items.iter().enumerate() {
                visit(item, &index_path(path, i), index)?;
            }
        }
        YamlNode::Scalar { .. } => {}
    }

    Ok(())
}
