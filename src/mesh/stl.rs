use super::{Mesh, Triangle};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const HEADER: &[u8] = b"key2stl - extruded key outline";

/// Encode triangles as binary STL
///
/// Binary STL format:
/// - 80 byte header
/// - 4 byte u32 triangle count (little endian)
/// - For each triangle:
///   - 3 x f32 normal (12 bytes)
///   - 3 x 3 x f32 vertices (36 bytes)
///   - 2 byte attribute (usually 0)
pub fn encode_binary<W: Write>(writer: &mut W, triangles: &[Triangle]) -> std::io::Result<()> {
    let mut header = [b' '; 80];
    header[..HEADER.len()].copy_from_slice(HEADER);
    writer.write_all(&header)?;

    let count = triangles.len() as u32;
    writer.write_all(&count.to_le_bytes())?;

    for tri in triangles {
        for &n in &tri.normal {
            writer.write_all(&n.to_le_bytes())?;
        }

        for vertex in &tri.vertices {
            for &coord in vertex {
                writer.write_all(&coord.to_le_bytes())?;
            }
        }

        writer.write_all(&[0u8, 0u8])?;
    }

    Ok(())
}

/// Encode triangles as ASCII STL under the given solid name
pub fn encode_ascii<W: Write>(
    writer: &mut W,
    name: &str,
    triangles: &[Triangle],
) -> std::io::Result<()> {
    writeln!(writer, "solid {}", name)?;
    for tri in triangles {
        let [nx, ny, nz] = tri.normal;
        writeln!(writer, "  facet normal {:.6} {:.6} {:.6}", nx, ny, nz)?;
        writeln!(writer, "    outer loop")?;
        for [x, y, z] in tri.vertices {
            writeln!(writer, "      vertex {:.6} {:.6} {:.6}", x, y, z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {}", name)?;
    Ok(())
}

/// Write triangles to a binary STL file
pub fn write_stl(path: &Path, triangles: &[Triangle]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    encode_binary(&mut writer, triangles)
        .with_context(|| format!("Failed to write STL file: {}", path.display()))?;
    writer.flush()?;

    Ok(())
}

/// Write triangles to an ASCII STL file
pub fn write_stl_ascii(path: &Path, name: &str, triangles: &[Triangle]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    encode_ascii(&mut writer, name, triangles)
        .with_context(|| format!("Failed to write STL file: {}", path.display()))?;
    writer.flush()?;

    Ok(())
}

/// Read an STL file (binary or ASCII) back into an indexed mesh
///
/// Coincident corners are merged by the reader, so a watertight export
/// comes back as a closed mesh.
pub fn read_back(path: &Path) -> Result<Mesh> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open STL file: {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let indexed = stl_io::read_stl(&mut reader)
        .with_context(|| format!("Failed to parse STL file: {}", path.display()))?;

    let vertices = indexed
        .vertices
        .iter()
        .map(|v| [v[0] as f64, v[1] as f64, v[2] as f64])
        .collect();
    let faces = indexed.faces.iter().map(|f| f.vertices).collect();

    Ok(Mesh::new(vertices, faces))
}

/// Get the file size of a binary STL with the given number of triangles
pub fn estimate_stl_size(triangle_count: usize) -> usize {
    // 80 (header) + 4 (count) + triangles * (12 normal + 36 vertices + 2 attribute)
    80 + 4 + triangle_count * 50
}
