//! Interchange writers
//!
//! Both formats walk the tree in pre-order and emit one record per node, plus the
//! incoming joint of every non-root node. Node GUIDs are pre-order positions, so
//! the two formats agree on numbering for the same tree.

mod json;
mod legacy;

pub use json::{
    JSON_VERSION, NodeJson, RobotJson, export_json, robot_json, to_json_string, write_json,
};
pub use legacy::{
    LegacyExport, SKELETON_FILE, SKELETON_VERSION, export_legacy, skeleton_string, write_skeleton,
};

use std::collections::HashMap;

use crate::joint::JointError;
use crate::mesh::MeshError;
use crate::tree::{NodeId, RigidNode, RobotTree};
use crate::xml::XmlError;

/// Export errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Joint(#[from] JointError),
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("Failed to write mesh for node '{node}': {source}")]
    Mesh { node: String, source: MeshError },
    #[error("IO error: {0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
}

/// A node as seen by the writers
pub(crate) struct NodeRecord<'a> {
    pub guid: usize,
    /// GUID of the parent, -1 at the root
    pub parent_guid: i64,
    pub node: &'a RigidNode,
}

impl NodeRecord<'_> {
    pub fn model_file_name(&self) -> String {
        format!("node_{}.bxda", self.guid)
    }
}

/// Number the tree in pre-order and pair every node with its parent's number
pub(crate) fn node_records(tree: &RobotTree) -> Vec<NodeRecord<'_>> {
    let guids: HashMap<NodeId, usize> = tree
        .traverse()
        .enumerate()
        .map(|(guid, (id, _))| (id, guid))
        .collect();

    tree.traverse()
        .enumerate()
        .map(|(guid, (_, node))| NodeRecord {
            guid,
            parent_guid: node
                .parent()
                .and_then(|p| guids.get(&p))
                .map_or(-1, |&g| g as i64),
            node,
        })
        .collect()
}
