//! I/O operations for triangle meshes
//!
//! This crate provides functionality to read and write Wavefront OBJ files,
//! the exchange format consumed and produced by the simplifier.

pub mod obj;

pub use obj::{ObjReader, ObjWriter};

use meshpare_core::{Result, TriangleMesh};
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") => ObjReader::read_mesh(path),
        _ => Err(meshpare_core::Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") => ObjWriter::write_mesh(mesh, path),
        _ => Err(meshpare_core::Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpare_core::Point3f;
    use std::fs;

    #[test]
    fn test_obj_mesh_roundtrip() {
        let temp_file = "test_roundtrip.obj";

        let vertices = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        let mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);

        ObjWriter::write_mesh(&mesh, temp_file).unwrap();
        let loaded = ObjReader::read_mesh(temp_file).unwrap();

        assert_eq!(mesh.vertex_count(), loaded.vertex_count());
        assert_eq!(mesh.face_count(), loaded.face_count());
        for (original, read) in mesh.vertices.iter().zip(loaded.vertices.iter()) {
            assert_eq!(original, read);
        }
        assert_eq!(mesh.faces, loaded.faces);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_obj_reader_corner_forms() {
        let temp_file = "test_corner_forms.obj";

        // All four corner token forms reference the same triangle
        let obj_content = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.5 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1 2 3
f 1/1 2/1 3/1
f 1//1 2//1 3//1
f 1/1/1 2/1/1 3/1/1
";
        fs::write(temp_file, obj_content).unwrap();

        let mesh = ObjReader::read_mesh(temp_file).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 4);
        for face in &mesh.faces {
            assert_eq!(*face, [0, 1, 2]);
        }

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_obj_reader_skips_unparseable_lines() {
        let temp_file = "test_skip_lines.obj";

        let obj_content = "\
# comment line
mtllib ignored.mtl
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v not a number here
v 0.5 1.0 0.0
g some_group
f 1 2 3
f 1 2 3 4
f 1 bogus 3
s off
";
        fs::write(temp_file, obj_content).unwrap();

        // Only the three well-formed vertices and the one triangle survive
        let mesh = ObjReader::read_mesh(temp_file).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.faces[0], [0, 1, 2]);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_obj_reader_drops_out_of_range_faces() {
        let temp_file = "test_out_of_range.obj";

        let obj_content = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.5 1.0 0.0
f 1 2 3
f 1 2 9
f 0 1 2
f 1 1 2
";
        fs::write(temp_file, obj_content).unwrap();

        let mesh = ObjReader::read_mesh(temp_file).unwrap();
        assert_eq!(mesh.face_count(), 1);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_obj_writer_format() {
        let temp_file = "test_writer_format.obj";

        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.5, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        ObjWriter::write_mesh(&mesh, temp_file).unwrap();

        let content = fs::read_to_string(temp_file).unwrap();
        assert!(content.contains("v 0 0 0"));
        assert!(content.contains("v 1 0 0"));
        assert!(content.contains("v 0.5 1 0"));
        assert!(content.contains("f 1 2 3"));

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_read_missing_file() {
        let result = ObjReader::read_mesh("definitely_not_here.obj");
        assert!(result.is_err());
    }

    #[test]
    fn test_unsupported_format() {
        assert!(read_mesh("test.stl").is_err());
        let mesh = TriangleMesh::new();
        assert!(write_mesh(&mesh, "test.ply").is_err());
    }
}
