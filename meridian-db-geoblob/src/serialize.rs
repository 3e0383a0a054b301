//! Encoder: geometry tree to serialized blob.
//!
//! Encoding is two passes over the tree: the size oracle computes the exact
//! body size, then the writer fills a single allocation. A disagreement
//! between the two is a [`BlobError::SizeMismatch`] and means a codec bug,
//! not bad input.
//!
//! Node layout is `[u32 type][u32 count]` followed by the payload; polygon
//! ring tables get a 4-byte pad word when the ring count is odd so vertex
//! data stays 8-byte aligned relative to the body.

use crate::bbox::write_gbox;
use crate::error::{BlobError, Result};
use crate::header::{pack_srid, GeoBlob, HEADER_SIZE};
use meridian_db_geom::{GBox, GFlags, Geom, GeomType, PointArray, Shape};

/// Largest encodable blob: the size word stores `length << 2` in a `u32`.
const MAX_BLOB_SIZE: usize = (u32::MAX >> 2) as usize;

/// Serialize a geometry tree.
///
/// A bounding box is computed and cached when the tree does not already
/// carry one, [`Shape::needs_bbox`] asks for one, and the geometry is not
/// empty. The SRID is clamped into the wire range.
pub fn serialize(geom: &Geom<'_>) -> Result<GeoBlob> {
    let bbox = match geom.bbox {
        Some(b) => Some(b),
        None if geom.shape.needs_bbox() && !geom.shape.is_empty() => geom.shape.calculate_gbox(),
        None => None,
    };

    let mut flags = geom.flags();
    flags.set_bbox(bbox.is_some());

    let box_size = if bbox.is_some() {
        GBox::serialized_size(flags)
    } else {
        0
    };
    let expected = HEADER_SIZE + box_size + shape_size(&geom.shape);
    if expected > MAX_BLOB_SIZE {
        return Err(BlobError::TooLarge(expected));
    }

    let mut buf = Vec::with_capacity(expected);
    buf.extend_from_slice(&[0u8; 4]); // size word, stamped below
    buf.extend_from_slice(&pack_srid(geom.srid));
    buf.push(flags.as_byte());

    if let Some(b) = bbox {
        // The packed axis set follows the blob flags, whatever the box
        // carried before.
        let mut b = b;
        b.flags = flags;
        write_gbox(&b, &mut buf);
    }

    write_shape(&geom.shape, flags, &mut buf)?;

    if buf.len() != expected {
        return Err(BlobError::SizeMismatch {
            expected,
            written: buf.len(),
        });
    }
    let size_word = (buf.len() as u32) << 2;
    buf[0..4].copy_from_slice(&size_word.to_le_bytes());

    tracing::trace!(
        size = buf.len(),
        geom_type = geom.geom_type().name(),
        cached_bbox = bbox.is_some(),
        "serialized geometry"
    );
    Ok(GeoBlob::from_vec(buf))
}

/// Exact body size for a shape, in bytes.
pub(crate) fn shape_size(shape: &Shape<'_>) -> usize {
    match shape {
        Shape::Point(p) => 8 + p.vertices.byte_len(),
        Shape::Line(l) => 8 + l.points.byte_len(),
        Shape::CircularString(c) => 8 + c.points.byte_len(),
        Shape::Triangle(t) => 8 + t.points.byte_len(),
        Shape::Polygon(p) => {
            let pad = if p.rings.len() % 2 == 1 { 4 } else { 0 };
            8 + pad
                + p.rings
                    .iter()
                    .map(|ring| 4 + ring.byte_len())
                    .sum::<usize>()
        }
        Shape::Collection(c) => {
            8 + c
                .geoms
                .iter()
                .map(|child| shape_size(&child.shape))
                .sum::<usize>()
        }
    }
}

fn write_node_header(out: &mut Vec<u8>, gtype: GeomType, count: u32) {
    out.extend_from_slice(&gtype.as_u32().to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
}

fn check_dims(pa: &PointArray<'_>, flags: GFlags, what: &'static str) -> Result<()> {
    if pa.zm() != flags.zm() {
        return Err(BlobError::DimensionMismatch(what));
    }
    Ok(())
}

fn write_shape(shape: &Shape<'_>, flags: GFlags, out: &mut Vec<u8>) -> Result<()> {
    match shape {
        Shape::Point(p) => {
            check_dims(&p.vertices, flags, "point")?;
            write_node_header(out, GeomType::Point, p.vertices.npoints());
            p.vertices.write_ordinates(out);
        }
        Shape::Line(l) => {
            check_dims(&l.points, flags, "linestring")?;
            write_node_header(out, GeomType::Line, l.points.npoints());
            l.points.write_ordinates(out);
        }
        Shape::CircularString(c) => {
            check_dims(&c.points, flags, "circularstring")?;
            write_node_header(out, GeomType::CircularString, c.points.npoints());
            c.points.write_ordinates(out);
        }
        Shape::Triangle(t) => {
            check_dims(&t.points, flags, "triangle")?;
            write_node_header(out, GeomType::Triangle, t.points.npoints());
            t.points.write_ordinates(out);
        }
        Shape::Polygon(p) => {
            write_node_header(out, GeomType::Polygon, p.rings.len() as u32);
            for ring in &p.rings {
                out.extend_from_slice(&ring.npoints().to_le_bytes());
            }
            // Keep the vertex blocks double-aligned.
            if p.rings.len() % 2 == 1 {
                out.extend_from_slice(&[0u8; 4]);
            }
            for ring in &p.rings {
                check_dims(ring, flags, "polygon")?;
                ring.write_ordinates(out);
            }
        }
        Shape::Collection(c) => {
            write_node_header(out, c.kind, c.geoms.len() as u32);
            for child in &c.geoms {
                if !child.flags().same_zm(flags) {
                    return Err(BlobError::DimensionMismatch("collection"));
                }
                // Sub-geometries never carry their own cached box.
                write_shape(&child.shape, child.flags(), out)?;
            }
        }
    }
    Ok(())
}
