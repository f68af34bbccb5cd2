//! Legacy format: one binary mesh per node plus a BXDJ skeleton document

use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ExportError, node_records};
use crate::mesh::MeshWriter;
use crate::tree::RobotTree;
use crate::xml::XmlWriter;

pub const SKELETON_VERSION: &str = "3.0.0";
pub const SKELETON_FILE: &str = "skeleton.bxdj";

/// Files produced by [`export_legacy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyExport {
    pub skeleton: PathBuf,
    /// Mesh files in node GUID order
    pub meshes: Vec<PathBuf>,
}

/// Write the skeleton document for `tree`
pub fn write_skeleton<W: Write>(
    tree: &RobotTree,
    output: &mut XmlWriter<W>,
) -> Result<(), ExportError> {
    output.write_declaration()?;
    output.start_element("BXDJ")?;
    output.write_attribute("Version", SKELETON_VERSION)?;
    output.write_element("Name", &tree.name)?;
    output.start_element("Nodes")?;

    for record in node_records(tree) {
        output.start_element("Node")?;
        output.write_attribute("GUID", &record.guid.to_string())?;
        output.write_element("ParentID", &record.parent_guid.to_string())?;
        output.write_element("ModelFileName", &record.model_file_name())?;
        output.write_element("ModelID", &record.node.name)?;
        if let Some(joint) = record.node.joint() {
            joint.write_xml(output)?;
        }
        output.end_element()?;
    }

    output.end_element()?;
    output.end_element()?;
    Ok(())
}

/// Render the skeleton document to a string
pub fn skeleton_string(tree: &RobotTree) -> Result<String, ExportError> {
    let mut output = XmlWriter::new(Vec::new());
    write_skeleton(tree, &mut output)?;
    let bytes = output.finish()?;
    String::from_utf8(bytes).map_err(|e| ExportError::Io(e.to_string()))
}

/// Export every node mesh through `mesh_writer` and the skeleton into `dir`.
///
/// Stops at the first failure; files already written are left in place.
pub fn export_legacy<M: MeshWriter>(
    tree: &RobotTree,
    dir: &Path,
    mesh_writer: &mut M,
) -> Result<LegacyExport, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io(e.to_string()))?;

    let mut meshes = Vec::new();
    for record in node_records(tree) {
        let path = dir.join(record.model_file_name());
        mesh_writer
            .write_mesh(&record.node.mesh, &path)
            .map_err(|source| ExportError::Mesh {
                node: record.node.name.clone(),
                source,
            })?;
        meshes.push(path);
    }

    let skeleton = dir.join(SKELETON_FILE);
    std::fs::write(&skeleton, skeleton_string(tree)?)
        .map_err(|e| ExportError::Io(e.to_string()))?;

    tracing::info!(
        "Exported '{}' ({} node(s)) to {}",
        tree.name,
        meshes.len(),
        dir.display()
    );
    Ok(LegacyExport { skeleton, meshes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::Joint;
    use crate::math::Vector3;
    use crate::mesh::{Mesh, MeshError};
    use crate::tree::RigidNode;

    /// Records destinations instead of writing files
    #[derive(Default)]
    struct RecordingWriter {
        written: Vec<PathBuf>,
        fail_on: Option<usize>,
    }

    impl MeshWriter for RecordingWriter {
        fn write_mesh(&mut self, _mesh: &Mesh, dest: &Path) -> Result<(), MeshError> {
            if self.fail_on == Some(self.written.len()) {
                return Err(MeshError::Write("disk full".into()));
            }
            self.written.push(dest.to_path_buf());
            Ok(())
        }
    }

    fn tree() -> RobotTree {
        let node = |name: &str| RigidNode::new(name, Mesh::default(), Vector3::ZERO);
        let mut tree = RobotTree::new("bot", node("base"));
        let arm = tree
            .add_child(
                tree.root(),
                node("arm"),
                Joint::builder("shoulder").rotational(Vector3::Z).build(),
            )
            .unwrap();
        tree.add_child(
            arm,
            node("slide"),
            Joint::builder("rail").sliding(Vector3::X).build(),
        )
        .unwrap();
        tree
    }

    #[test]
    fn test_skeleton_structure() {
        let xml = skeleton_string(&tree()).unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<BXDJ Version="3.0.0">"#));
        assert!(xml.contains("<Name>bot</Name>"));
        assert!(xml.contains(r#"<Node GUID="0">"#));
        assert!(xml.contains("<ParentID>-1</ParentID>"));
        assert!(xml.contains("<ModelFileName>node_2.bxda</ModelFileName>"));
        assert_eq!(xml.matches("<Node ").count(), 3);
        assert_eq!(xml.matches("</Node>").count(), 3);
        assert_eq!(xml.matches("<RotationalJoint>").count(), 1);
        assert_eq!(xml.matches("<LinearJoint>").count(), 1);
        assert!(xml.trim_end().ends_with("</BXDJ>"));
    }

    #[test]
    fn test_export_legacy_writes_all_meshes() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RecordingWriter::default();

        let export = export_legacy(&tree(), dir.path(), &mut writer).unwrap();

        assert_eq!(writer.written, export.meshes);
        assert_eq!(export.meshes.len(), 3);
        assert!(export.meshes[1].ends_with("node_1.bxda"));
        let skeleton = std::fs::read_to_string(&export.skeleton).unwrap();
        assert!(skeleton.contains("<ModelID>slide</ModelID>"));
    }

    #[test]
    fn test_mesh_failure_aborts_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RecordingWriter {
            fail_on: Some(1),
            ..Default::default()
        };

        let result = export_legacy(&tree(), dir.path(), &mut writer);

        assert!(matches!(result, Err(ExportError::Mesh { ref node, .. }) if node.as_str() == "arm"));
        assert!(!dir.path().join(SKELETON_FILE).exists());
    }

    #[test]
    fn test_malformed_axis_aborts_skeleton() {
        let mut tree = tree();
        tree.add_child(
            tree.root(),
            RigidNode::new("broken", Mesh::default(), Vector3::ZERO),
            Joint::builder("bad").rotational(Vector3::ZERO).build(),
        )
        .unwrap();

        assert!(matches!(
            skeleton_string(&tree),
            Err(ExportError::Joint(_))
        ));
    }
}
