//! Rigid-node tree for an exported robot
//!
//! Nodes live in an arena owned by [`RobotTree`]; a node refers to its parent
//! and children by [`NodeId`]. The first node is the root (base body) and is the
//! only node without an incoming joint.

use serde::{Deserialize, Serialize};

use crate::config::ConfigData;
use crate::joint::{Joint, JointError};
use crate::matcher::unmatched_keys;
use crate::math::Vector3;
use crate::mesh::Mesh;

/// Index of a node inside its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One rigid body of the assembly
#[derive(Debug, Clone, PartialEq)]
pub struct RigidNode {
    pub name: String,
    pub mesh: Mesh,
    /// Origin of the node's local frame
    pub base_point: Vector3,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    joint: Option<Joint>,
}

impl RigidNode {
    pub fn new(name: impl Into<String>, mesh: Mesh, base_point: Vector3) -> Self {
        Self {
            name: name.into(),
            mesh,
            base_point,
            parent: None,
            children: Vec::new(),
            joint: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Joint connecting this node to its parent, `None` at the root
    pub fn joint(&self) -> Option<&Joint> {
        self.joint.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Tree errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum TreeError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),
}

/// Totals of one configuration pass over the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigSummary {
    pub joints: usize,
    pub matched: usize,
    pub drivers: usize,
    pub sensors: usize,
    pub sensors_dropped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RobotTree {
    pub name: String,
    nodes: Vec<RigidNode>,
}

impl RobotTree {
    /// Create a tree from its base body
    pub fn new(name: impl Into<String>, mut root: RigidNode) -> Self {
        root.parent = None;
        root.children.clear();
        root.joint = None;
        Self {
            name: name.into(),
            nodes: vec![root],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&RigidNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(RigidNode::parent)
    }

    pub fn joint_mut(&mut self, id: NodeId) -> Option<&mut Joint> {
        self.nodes.get_mut(id.0).and_then(|n| n.joint.as_mut())
    }

    /// Attach `node` under `parent` through `joint`, appending it after any
    /// existing children.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        mut node: RigidNode,
        joint: Joint,
    ) -> Result<NodeId, TreeError> {
        if parent.0 >= self.nodes.len() {
            return Err(TreeError::NodeNotFound(parent));
        }

        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        node.joint = Some(joint);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Depth-first, parent-before-children walk from the root
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            tree: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Names of all joints in traversal order
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.traverse()
            .filter_map(|(_, node)| node.joint().map(|j| j.name.as_str()))
    }

    /// Run the configuration pass over every joint in the tree
    pub fn apply_config(&mut self, config: &ConfigData) -> Result<ConfigSummary, JointError> {
        let mut summary = ConfigSummary::default();

        for node in &mut self.nodes {
            let RigidNode { joint, mesh, .. } = node;
            let Some(joint) = joint else {
                continue;
            };

            let applied = joint.apply_config(config, mesh)?;
            summary.joints += 1;
            summary.matched += usize::from(applied.matched);
            summary.drivers += usize::from(applied.driver_attached);
            summary.sensors += applied.sensors_attached;
            summary.sensors_dropped += applied.sensors_dropped;
        }

        for key in unmatched_keys(config, self.joint_names()) {
            tracing::warn!("Configuration entry '{}' matches no joint", key);
        }

        tracing::info!(
            "Configured {}/{} joint(s): {} driver(s), {} sensor(s), {} sensor(s) dropped",
            summary.matched,
            summary.joints,
            summary.drivers,
            summary.sensors,
            summary.sensors_dropped
        );
        Ok(summary)
    }
}

/// Pre-order iterator over a [`RobotTree`]
pub struct Traverse<'a> {
    tree: &'a RobotTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = (NodeId, &'a RigidNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}
