//! Wavefront OBJ text output.

use crate::primitives::Shape;
use std::io::{self, Write};

/// Writes `shape` as OBJ: a two-line comment header, `v` records with six
/// decimals, a blank line, then 1-based `f` records.
pub fn write_obj<W: Write>(out: &mut W, shape: &Shape, title: &str) -> io::Result<()> {
    writeln!(out, "# {title}")?;
    writeln!(
        out,
        "# {} vertices, {} faces",
        shape.vertices.len(),
        shape.faces.len()
    )?;
    writeln!(out)?;

    for v in &shape.vertices {
        writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    writeln!(out)?;

    for face in &shape.faces {
        out.write_all(b"f")?;
        for i in face {
            write!(out, " {}", i + 1)?;
        }
        writeln!(out)?;
    }

    Ok(())
}
