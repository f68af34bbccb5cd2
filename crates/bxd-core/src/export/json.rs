//! Current format: a single JSON document describing the node tree

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::{ExportError, node_records};
use crate::joint::JointJson;
use crate::tree::RobotTree;

pub const JSON_VERSION: &str = "4.0.0";

#[derive(Debug, Clone, Serialize)]
pub struct NodeJson<'a> {
    #[serde(rename = "$type")]
    pub type_tag: &'static str,
    #[serde(rename = "GUID")]
    pub guid: usize,
    #[serde(rename = "ParentID")]
    pub parent_id: i64,
    #[serde(rename = "ModelFileName")]
    pub model_file_name: String,
    #[serde(rename = "ModelID")]
    pub model_id: &'a str,
    pub joint: Option<JointJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RobotJson<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "Version")]
    pub version: &'static str,
    #[serde(rename = "Nodes")]
    pub nodes: Vec<NodeJson<'a>>,
}

/// Build the JSON document for `tree`
pub fn robot_json(tree: &RobotTree) -> Result<RobotJson<'_>, ExportError> {
    let nodes = node_records(tree)
        .into_iter()
        .map(|record| {
            Ok(NodeJson {
                type_tag: "RigidNode, RobotExportAPI",
                guid: record.guid,
                parent_id: record.parent_guid,
                model_file_name: record.model_file_name(),
                model_id: &record.node.name,
                joint: record.node.joint().map(|j| j.to_json()).transpose()?,
            })
        })
        .collect::<Result<Vec<_>, ExportError>>()?;

    Ok(RobotJson {
        name: &tree.name,
        version: JSON_VERSION,
        nodes,
    })
}

pub fn to_json_string(tree: &RobotTree, pretty: bool) -> Result<String, ExportError> {
    let document = robot_json(tree)?;
    let result = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    result.map_err(|e| ExportError::Json(e.to_string()))
}

pub fn write_json<W: Write>(tree: &RobotTree, output: W, pretty: bool) -> Result<(), ExportError> {
    let document = robot_json(tree)?;
    let result = if pretty {
        serde_json::to_writer_pretty(output, &document)
    } else {
        serde_json::to_writer(output, &document)
    };
    result.map_err(|e| ExportError::Json(e.to_string()))
}

/// Write the JSON document to `path`
pub fn export_json(tree: &RobotTree, path: &Path, pretty: bool) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExportError::Io(e.to_string()))?;
    }
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io(e.to_string()))?;
    let mut writer = std::io::BufWriter::new(file);
    write_json(tree, &mut writer, pretty)?;
    writer.flush().map_err(|e| ExportError::Io(e.to_string()))?;

    tracing::info!("Exported '{}' as JSON to {}", tree.name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::Joint;
    use crate::math::Vector3;
    use crate::mesh::Mesh;
    use crate::tree::RigidNode;

    fn tree() -> RobotTree {
        let node = |name: &str| RigidNode::new(name, Mesh::default(), Vector3::ZERO);
        let mut tree = RobotTree::new("bot", node("base"));
        tree.add_child(
            tree.root(),
            node("arm"),
            Joint::builder("shoulder")
                .rotational(Vector3::Z)
                .limits_range(-1.0, 1.0)
                .build(),
        )
        .unwrap();
        tree.add_child(tree.root(), node("weld"), Joint::builder("w").build())
            .unwrap();
        tree
    }

    #[test]
    fn test_document_shape() {
        let value = serde_json::to_value(robot_json(&tree()).unwrap()).unwrap();

        assert_eq!(value["Name"], "bot");
        assert_eq!(value["Version"], JSON_VERSION);
        let nodes = value["Nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);

        assert_eq!(nodes[0]["ParentID"], -1);
        assert!(nodes[0]["joint"].is_null());

        assert_eq!(nodes[1]["GUID"], 1);
        assert_eq!(nodes[1]["ModelID"], "arm");
        assert_eq!(nodes[1]["joint"]["typeSave"], "ROTATIONAL");

        assert_eq!(nodes[2]["joint"]["typeSave"], "FIXED");
        assert!(nodes[2]["joint"].get("axis").is_none());
    }

    #[test]
    fn test_export_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("robot.json");

        export_json(&tree(), &path, true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["Nodes"][1]["joint"]["angularLimitHigh"], 1.0);
        assert!(content.contains('\n'));
        assert!(!to_json_string(&tree(), false).unwrap().contains('\n'));
    }

    #[test]
    fn test_write_json_matches_string() {
        let mut buffer = Vec::new();
        write_json(&tree(), &mut buffer, false).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            to_json_string(&tree(), false).unwrap()
        );
    }
}
