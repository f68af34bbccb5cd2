//! File-based robot description
//!
//! A flat list of bodies, each naming its parent and the joint that connects
//! them. This is how models reach the exporter outside of a CAD session;
//! [`RobotDescription::into_tree`] turns it into a [`RobotTree`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, load_file};
use crate::joint::{Joint, JointKind, RangeLimits, RotationalMotion, SlidingMotion};
use crate::math::Vector3;
use crate::mesh::{Mesh, MeshError, load_stl};
use crate::tree::{NodeId, RigidNode, RobotTree, TreeError};

/// Where a body's geometry comes from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum MeshSource {
    #[default]
    Empty,
    /// STL file, relative paths resolved against the description's directory
    Stl(PathBuf),
    Inline(Mesh),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JointSpec {
    Rotational {
        axis: Vector3,
        #[serde(default)]
        angle: f32,
        #[serde(default)]
        min: Option<f32>,
        #[serde(default)]
        max: Option<f32>,
    },
    Sliding {
        axis: Vector3,
        #[serde(default)]
        offset: f32,
        #[serde(default)]
        min: Option<f32>,
        #[serde(default)]
        max: Option<f32>,
    },
    Fixed,
}

impl JointSpec {
    fn into_kind(self) -> JointKind {
        match self {
            JointSpec::Rotational {
                axis,
                angle,
                min,
                max,
            } => JointKind::Rotational(RotationalMotion {
                axis,
                angle,
                limits: RangeLimits { min, max },
            }),
            JointSpec::Sliding {
                axis,
                offset,
                min,
                max,
            } => JointKind::Sliding(SlidingMotion {
                axis,
                offset,
                limits: RangeLimits { min, max },
            }),
            JointSpec::Fixed => JointKind::Fixed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointDescription {
    /// Configuration key; defaults to the child body's name
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults to the child body's base point
    #[serde(default)]
    pub base_point: Option<Vector3>,
    pub kind: JointSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default)]
    pub mesh: MeshSource,
    #[serde(default)]
    pub base_point: Vector3,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub joint: Option<JointDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotDescription {
    pub name: String,
    pub nodes: Vec<NodeDescription>,
}

/// Errors turning a description into a tree
#[derive(Debug, Clone, thiserror::Error)]
pub enum DescriptionError {
    #[error(transparent)]
    Load(#[from] ConfigError),
    #[error("Robot has no root body (every body names a parent)")]
    NoRoot,
    #[error("Robot has more than one root body: '{0}' and '{1}'")]
    MultipleRoots(String, String),
    #[error("Duplicate body name: {0}")]
    DuplicateName(String),
    #[error("Body '{node}' names unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },
    #[error("Body '{0}' has a parent but no joint")]
    MissingJoint(String),
    #[error("Root body '{0}' cannot have a joint")]
    RootJoint(String),
    #[error("Body '{0}' is not connected to the root")]
    Unreachable(String),
    #[error("Failed to load mesh {path:?}: {source}")]
    Mesh { path: PathBuf, source: MeshError },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl RobotDescription {
    /// Load a `.ron` or `.json` description
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptionError> {
        Ok(load_file(path.as_ref())?)
    }

    /// Build the rigid-node tree, loading meshes relative to `base_dir`.
    ///
    /// Children keep the order in which they are listed.
    pub fn into_tree(self, base_dir: &Path) -> Result<RobotTree, DescriptionError> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut root: Option<usize> = None;
        for (i, node) in self.nodes.iter().enumerate() {
            if index.insert(node.name.clone(), i).is_some() {
                return Err(DescriptionError::DuplicateName(node.name.clone()));
            }
            if node.parent.is_none() {
                if let Some(first) = root {
                    return Err(DescriptionError::MultipleRoots(
                        self.nodes[first].name.clone(),
                        node.name.clone(),
                    ));
                }
                if node.joint.is_some() {
                    return Err(DescriptionError::RootJoint(node.name.clone()));
                }
                root = Some(i);
            }
        }
        let root = root.ok_or(DescriptionError::NoRoot)?;

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            let Some(parent) = &node.parent else {
                continue;
            };
            let parent_index =
                *index
                    .get(parent)
                    .ok_or_else(|| DescriptionError::UnknownParent {
                        node: node.name.clone(),
                        parent: parent.clone(),
                    })?;
            if node.joint.is_none() {
                return Err(DescriptionError::MissingJoint(node.name.clone()));
            }
            children[parent_index].push(i);
        }

        let mut slots: Vec<Option<NodeDescription>> = self.nodes.into_iter().map(Some).collect();
        let mut take = |i: usize| slots[i].take();

        let Some(root_desc) = take(root) else {
            return Err(DescriptionError::NoRoot);
        };
        let root_node = build_node(&root_desc, base_dir)?;
        let mut tree = RobotTree::new(self.name, root_node);

        let mut added = HashSet::from([root]);
        let mut pending: Vec<(usize, NodeId)> = children[root]
            .iter()
            .rev()
            .map(|&c| (c, tree.root()))
            .collect();

        while let Some((i, parent_id)) = pending.pop() {
            let Some(desc) = take(i) else {
                continue;
            };
            let node = build_node(&desc, base_dir)?;
            let joint = match desc.joint {
                Some(joint) => Joint::new(
                    joint.name.unwrap_or_else(|| desc.name.clone()),
                    joint.base_point.unwrap_or(desc.base_point),
                    joint.kind.into_kind(),
                ),
                None => return Err(DescriptionError::MissingJoint(desc.name)),
            };

            let id = tree.add_child(parent_id, node, joint)?;
            added.insert(i);
            pending.extend(children[i].iter().rev().map(|&c| (c, id)));
        }

        if let Some(i) = (0..children.len()).find(|i| !added.contains(i)) {
            let name = slots[i]
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_default();
            return Err(DescriptionError::Unreachable(name));
        }

        tracing::debug!("Built tree '{}' with {} node(s)", tree.name, tree.len());
        Ok(tree)
    }
}

fn build_node(desc: &NodeDescription, base_dir: &Path) -> Result<RigidNode, DescriptionError> {
    let mesh = match &desc.mesh {
        MeshSource::Empty => Mesh::default(),
        MeshSource::Inline(mesh) => mesh.clone(),
        MeshSource::Stl(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                base_dir.join(path)
            };
            load_stl(&path).map_err(|source| DescriptionError::Mesh { path, source })?
        }
    };
    Ok(RigidNode::new(desc.name.clone(), mesh, desc.base_point))
}
