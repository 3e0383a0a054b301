//! Decoder: serialized blob to geometry tree.
//!
//! The decoder consumes exactly the bytes the size oracle predicts, walking
//! the body with a bounds-checked cursor. Every collection child is
//! validated against the subtype compatibility table before recursion.
//!
//! With `zero_copy` set, vertex arrays borrow the blob's body bytes and the
//! returned tree shares the blob's lifetime; otherwise ordinates are copied
//! into owned arrays.

use crate::error::{BlobError, Result};
use crate::header::GeoBlobRef;
use meridian_db_geom::{
    CircularString, Collection, GFlags, Geom, GeomType, Line, Point, PointArray, Polygon, Shape,
    Triangle,
};

/// Decode a blob into a geometry tree.
///
/// The cached bounding box is reattached when present; otherwise one is
/// computed for shapes that would carry one ([`Shape::needs_bbox`]).
pub fn deserialize(blob: GeoBlobRef<'_>, zero_copy: bool) -> Result<Geom<'_>> {
    // In the tree, the cached box lives on `Geom::bbox`; the in-flags bit
    // is a header concern and is re-derived at encode time.
    let mut flags = blob.flags();
    flags.set_bbox(false);

    let mut cur = Cursor::new(blob.body());
    let shape = read_shape(&mut cur, flags, zero_copy)?;

    let mut geom = Geom::with_srid(shape, blob.srid());
    if let Some(cached) = blob.read_gbox() {
        geom.bbox = Some(cached);
    } else if geom.shape.needs_bbox() {
        geom.bbox = geom.shape.calculate_gbox();
    }

    tracing::trace!(
        geom_type = geom.geom_type().name(),
        zero_copy,
        "deserialized geometry"
    );
    Ok(geom)
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let have = self.buf.len() - self.pos;
        if n > have {
            return Err(BlobError::Truncated {
                at: self.pos,
                need: n,
                have,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn peek_u32(&self) -> Result<u32> {
        let have = self.buf.len() - self.pos;
        if have < 4 {
            return Err(BlobError::Truncated {
                at: self.pos,
                need: 4,
                have,
            });
        }
        Ok(u32::from_le_bytes(
            self.buf[self.pos..self.pos + 4].try_into().unwrap(),
        ))
    }
}

fn read_point_array<'a>(
    cur: &mut Cursor<'a>,
    npoints: u32,
    flags: GFlags,
    zero_copy: bool,
) -> Result<PointArray<'a>> {
    let nbytes = npoints as usize * flags.ndims() as usize * std::mem::size_of::<f64>();
    let bytes = cur.take(nbytes)?;
    let pa = if zero_copy {
        PointArray::borrowed(bytes, npoints, flags.has_z(), flags.has_m())?
    } else {
        PointArray::owned_from_le_bytes(bytes, npoints, flags.has_z(), flags.has_m())?
    };
    Ok(pa)
}

fn read_shape<'a>(cur: &mut Cursor<'a>, flags: GFlags, zero_copy: bool) -> Result<Shape<'a>> {
    let code = cur.read_u32()?;
    let gtype = GeomType::from_wire(code).ok_or(BlobError::UnknownType(code))?;
    let count = cur.read_u32()?;

    let shape = match gtype {
        GeomType::Point => Shape::Point(Point {
            flags,
            vertices: read_point_array(cur, count, flags, zero_copy)?,
        }),
        GeomType::Line => Shape::Line(Line {
            flags,
            points: read_point_array(cur, count, flags, zero_copy)?,
        }),
        GeomType::CircularString => Shape::CircularString(CircularString {
            flags,
            points: read_point_array(cur, count, flags, zero_copy)?,
        }),
        GeomType::Triangle => Shape::Triangle(Triangle {
            flags,
            points: read_point_array(cur, count, flags, zero_copy)?,
        }),
        GeomType::Polygon => {
            let nrings = count as usize;
            let mut ring_counts = Vec::with_capacity(nrings.min(1024));
            for _ in 0..nrings {
                ring_counts.push(cur.read_u32()?);
            }
            // Skip the alignment pad after an odd ring table.
            if nrings % 2 == 1 {
                cur.take(4)?;
            }
            let mut rings = Vec::with_capacity(nrings.min(1024));
            for npoints in ring_counts {
                rings.push(read_point_array(cur, npoints, flags, zero_copy)?);
            }
            Shape::Polygon(Polygon { flags, rings })
        }
        _ => {
            let mut geoms = Vec::with_capacity((count as usize).min(1024));
            for _ in 0..count {
                let sub_code = cur.peek_u32()?;
                let sub = GeomType::from_wire(sub_code).ok_or(BlobError::UnknownType(sub_code))?;
                if !gtype.allows_subtype(sub) {
                    return Err(BlobError::InvalidSubtype {
                        parent: gtype.name(),
                        child: sub.name(),
                    });
                }
                let child = read_shape(cur, flags, zero_copy)?;
                geoms.push(Geom::new(child));
            }
            Shape::Collection(Collection {
                kind: gtype,
                flags,
                geoms,
            })
        }
    };
    Ok(shape)
}
