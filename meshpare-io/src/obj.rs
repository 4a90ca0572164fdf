//! OBJ format support
//!
//! Reads the position/triangle subset of Wavefront OBJ: `v x y z` lines and
//! `f` lines with three corners in any of the `i`, `i/t`, `i//n`, `i/t/n`
//! forms (only the leading vertex index is used). Every other directive, and
//! any line that fails to parse as a vertex or triangle record, is skipped
//! silently: OBJ files routinely carry comments, materials, and attributes
//! this pipeline does not consume.

use crate::{MeshReader, MeshWriter};
use meshpare_core::{Point3f, Result, TriangleMesh};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub struct ObjReader;
pub struct ObjWriter;

/// Parse one face corner token, returning the 0-based vertex index.
///
/// The token is `i`, `i/t`, `i//n`, or `i/t/n`; only the integer before the
/// first `/` matters. Indices in the file are 1-based.
fn parse_corner(token: &str) -> Option<usize> {
    let index_part = token.split('/').next()?;
    let index: usize = index_part.parse().ok()?;
    index.checked_sub(1)
}

fn parse_vertex_line(tokens: &mut std::str::SplitWhitespace<'_>) -> Option<Point3f> {
    let x: f32 = tokens.next()?.parse().ok()?;
    let y: f32 = tokens.next()?.parse().ok()?;
    let z: f32 = tokens.next()?.parse().ok()?;
    Some(Point3f::new(x, y, z))
}

fn parse_face_line(tokens: &mut std::str::SplitWhitespace<'_>) -> Option<[usize; 3]> {
    let a = parse_corner(tokens.next()?)?;
    let b = parse_corner(tokens.next()?)?;
    let c = parse_corner(tokens.next()?)?;
    // Polygons with more than three corners are not supported
    if tokens.next().is_some() {
        return None;
    }
    Some([a, b, c])
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut vertices: Vec<Point3f> = Vec::new();
        let mut faces: Vec<[usize; 3]> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    if let Some(vertex) = parse_vertex_line(&mut tokens) {
                        vertices.push(vertex);
                    }
                }
                Some("f") => {
                    if let Some(face) = parse_face_line(&mut tokens) {
                        faces.push(face);
                    }
                }
                _ => {}
            }
        }

        // Faces may legally reference vertices declared later in the file, so
        // index bounds are only checkable once the whole file has been read.
        // A face with repeated corners is as unusable as one pointing past the
        // vertex list; both are dropped like any other malformed record.
        faces.retain(|f| {
            f.iter().all(|&v| v < vertices.len()) && f[0] != f[1] && f[1] != f[2] && f[2] != f[0]
        });

        Ok(TriangleMesh::from_vertices_and_faces(vertices, faces))
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for v in &mesh.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for f in &mesh.faces {
            // OBJ face indices are 1-based
            writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
        }

        writer.flush()?;
        Ok(())
    }
}
