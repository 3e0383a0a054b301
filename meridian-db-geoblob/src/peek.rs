//! Metadata reads that never materialize the tree.
//!
//! Everything here works on raw body bytes: type and counts for
//! [`GeoBlobRef::geom_type`] and [`GeoBlobRef::is_empty`], and — for a
//! small family of shapes — a tight bounding box straight off the vertex
//! words ([`GeoBlobRef::peek_gbox`]).
//!
//! [`GeoBlobRef::get_gbox`] is the unified accessor and degrades in order:
//! cached box, peeked box, full decode.

use crate::bbox::read_gbox;
use crate::deserialize::deserialize;
use crate::error::{BlobError, Result};
use crate::header::GeoBlobRef;
use meridian_db_geom::{to_wkt, GBox, GeomType, Point4};

/// Significant digits used by [`GeoBlobRef::to_debug_string`].
const DEBUG_WKT_PRECISION: usize = 12;

impl<'a> GeoBlobRef<'a> {
    /// The root type code, read from just past the optional box.
    pub fn geom_type(&self) -> Result<GeomType> {
        let code = self.type_code();
        GeomType::from_wire(code).ok_or(BlobError::UnknownType(code))
    }

    /// Structural emptiness: only type and count words are read, never
    /// vertex data.
    pub fn is_empty(&self) -> Result<bool> {
        let (_, empty) = is_empty_walk(self.body(), 0)?;
        Ok(empty)
    }

    /// The cached bounding box, if the blob carries one. No rounding is
    /// applied: the stored `f32` values are exact in `f64`.
    pub fn read_gbox(&self) -> Option<GBox> {
        let bytes = self.box_slice()?;
        // The view guarantees the box region is in bounds.
        Some(read_gbox(bytes, self.flags()).expect("box region validated at construction"))
    }

    /// Compute a tight box from the body without decoding.
    ///
    /// Succeeds only for cartesian, box-less blobs of a few cheap shapes: a
    /// non-empty point, a two-vertex line, and their single-entry multi
    /// wrappers. The result is rounded outward to `f32` precision, matching
    /// the stored form.
    pub fn peek_gbox(&self) -> Option<GBox> {
        let flags = self.flags();
        // A cached box is already there; geodetic boxes are geocentric and
        // cannot be read off lon/lat vertices.
        if flags.is_geodetic() || flags.has_bbox() {
            return None;
        }
        let gtype = GeomType::from_wire(self.type_code())?;
        let body = self.body();
        let ndims = flags.ndims() as usize;

        // Byte offsets of the first and (for lines) second vertex.
        let (first, second) = match gtype {
            GeomType::Point => {
                if read_u32(body, 4)? == 0 {
                    return None;
                }
                (8, None)
            }
            GeomType::Line => {
                if read_u32(body, 4)? != 2 {
                    return None;
                }
                (8, Some(8 + ndims * 8))
            }
            GeomType::MultiPoint => {
                if read_u32(body, 4)? != 1 {
                    return None;
                }
                // A single child that is an empty point still has no box.
                if read_u32(body, 12)? != 1 {
                    return None;
                }
                (16, None)
            }
            GeomType::MultiLine => {
                if read_u32(body, 4)? != 1 {
                    return None;
                }
                if read_u32(body, 12)? != 2 {
                    return None;
                }
                (16, Some(16 + ndims * 8))
            }
            _ => return None,
        };

        let a = read_vertex(body, first, flags)?;
        let mut gbox = GBox::from_point(flags, &a);
        if let Some(second) = second {
            gbox.merge_point(&read_vertex(body, second, flags)?);
        }
        gbox.float_round();
        Some(gbox)
    }

    /// First vertex of a point blob, without decoding. Only `Point` blobs
    /// are supported; every other shape (and the empty point) returns
    /// `None`.
    pub fn peek_first_point(&self) -> Option<Point4> {
        if GeomType::from_wire(self.type_code()) != Some(GeomType::Point) {
            return None;
        }
        let body = self.body();
        if read_u32(body, 4)? == 0 {
            return None;
        }
        read_vertex(body, 8, self.flags())
    }

    /// The unified box accessor: cached, else peeked, else computed from a
    /// decoded tree. `None` means the geometry is empty (or undecodable).
    pub fn get_gbox(&self) -> Option<GBox> {
        if let Some(gbox) = self.read_gbox() {
            return Some(gbox);
        }
        if let Some(gbox) = self.peek_gbox() {
            return Some(gbox);
        }
        match deserialize(*self, true) {
            Ok(geom) => geom.shape.calculate_gbox().map(|mut gbox| {
                gbox.float_round();
                gbox
            }),
            Err(err) => {
                tracing::debug!(%err, "bounding box fallback decode failed");
                None
            }
        }
    }

    /// WKT rendering at 12 significant digits, for logs and error messages.
    pub fn to_debug_string(&self) -> Result<String> {
        let geom = deserialize(*self, true)?;
        Ok(to_wkt(&geom, DEBUG_WKT_PRECISION))
    }
}

fn read_u32(body: &[u8], at: usize) -> Option<u32> {
    let bytes = body.get(at..at + 4)?;
    Some(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_f64(body: &[u8], at: usize) -> Option<f64> {
    let bytes = body.get(at..at + 8)?;
    Some(f64::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_vertex(body: &[u8], at: usize, flags: meridian_db_geom::GFlags) -> Option<Point4> {
    let mut p = Point4::xy(read_f64(body, at)?, read_f64(body, at + 8)?);
    let mut off = at + 16;
    if flags.has_z() {
        p.z = read_f64(body, off)?;
        off += 8;
    }
    if flags.has_m() {
        p.m = read_f64(body, off)?;
    }
    Some(p)
}

/// Walk one node at `at`, returning `(consumed, empty)`.
///
/// Simple nodes are empty iff their count is zero and always occupy 8
/// header bytes as far as this walk cares; a collection recurses and stops
/// at the first non-empty child.
fn is_empty_walk(body: &[u8], at: usize) -> Result<(usize, bool)> {
    let need = |n: usize| -> Result<()> {
        if at + n > body.len() {
            return Err(BlobError::Truncated {
                at,
                need: n,
                have: body.len().saturating_sub(at),
            });
        }
        Ok(())
    };
    need(8)?;
    let code = read_u32(body, at).unwrap();
    let count = read_u32(body, at + 4).unwrap();

    let is_collection = GeomType::from_wire(code).is_some_and(|t| t.is_collection());
    if is_collection {
        let mut consumed = 8;
        for _ in 0..count {
            let (sub, empty) = is_empty_walk(body, at + consumed)?;
            consumed += sub;
            if !empty {
                return Ok((consumed, false));
            }
        }
        Ok((consumed, true))
    } else {
        Ok((8, count == 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::serialize;
    use meridian_db_geom::{Collection, GFlags, Geom, Line, Point, PointArray, Shape};

    fn line_geom(coords: Vec<f64>, n: u32) -> Geom<'static> {
        Geom::new(Shape::Line(Line {
            flags: GFlags::default(),
            points: PointArray::owned(coords, n, false, false).unwrap(),
        }))
    }

    #[test]
    fn test_geom_type_skips_cached_box() {
        let blob = serialize(&line_geom(vec![0.0, 0.0, 1.0, 1.0, 2.0, 0.0], 3)).unwrap();
        assert!(blob.view().has_bbox());
        assert_eq!(blob.view().geom_type().unwrap(), GeomType::Line);
    }

    #[test]
    fn test_is_empty() {
        let empty = serialize(&Geom::new(Shape::Point(Point::empty(GFlags::default())))).unwrap();
        assert!(empty.view().is_empty().unwrap());

        let full = serialize(&Geom::point_xy(1.0, 2.0)).unwrap();
        assert!(!full.view().is_empty().unwrap());
    }

    #[test]
    fn test_collection_of_empties_is_empty() {
        let flags = GFlags::default();
        let col = Shape::Collection(Collection {
            kind: GeomType::Collection,
            flags,
            geoms: vec![
                Geom::new(Shape::Point(Point::empty(flags))),
                Geom::new(Shape::Line(Line {
                    flags,
                    points: PointArray::empty(false, false),
                })),
            ],
        });
        let blob = serialize(&Geom::new(col)).unwrap();
        assert!(blob.view().is_empty().unwrap());
    }

    #[test]
    fn test_peek_point() {
        let blob = serialize(&Geom::point_xy(1.0, 2.0)).unwrap();
        let gbox = blob.view().peek_gbox().unwrap();
        assert_eq!((gbox.xmin, gbox.xmax), (1.0, 1.0));
        assert_eq!((gbox.ymin, gbox.ymax), (2.0, 2.0));
    }

    #[test]
    fn test_peek_empty_point_fails() {
        let blob = serialize(&Geom::new(Shape::Point(Point::empty(GFlags::default())))).unwrap();
        assert!(blob.view().peek_gbox().is_none());
        assert!(blob.view().get_gbox().is_none());
    }

    #[test]
    fn test_peek_two_point_line() {
        let blob = serialize(&line_geom(vec![3.0, 1.0, -2.0, 5.0], 2)).unwrap();
        assert!(!blob.view().has_bbox());
        let gbox = blob.view().peek_gbox().unwrap();
        assert_eq!((gbox.xmin, gbox.xmax), (-2.0, 3.0));
        assert_eq!((gbox.ymin, gbox.ymax), (1.0, 5.0));
    }

    #[test]
    fn test_peek_declines_cached_box() {
        let blob = serialize(&line_geom(vec![0.0, 0.0, 1.0, 1.0, 2.0, 0.0], 3)).unwrap();
        assert!(blob.view().peek_gbox().is_none());
        // But the unified accessor still answers, from the cache.
        assert!(blob.view().get_gbox().is_some());
    }

    #[test]
    fn test_peek_single_multipoint() {
        let flags = GFlags::default();
        let mp = Shape::Collection(Collection {
            kind: GeomType::MultiPoint,
            flags,
            geoms: vec![Geom::point_xy(7.0, -3.0)],
        });
        let blob = serialize(&Geom::new(mp)).unwrap();
        assert!(!blob.view().has_bbox());
        let gbox = blob.view().peek_gbox().unwrap();
        assert_eq!((gbox.xmin, gbox.ymin), (7.0, -3.0));
    }

    #[test]
    fn test_peek_single_empty_multipoint_fails() {
        let flags = GFlags::default();
        let mp = Shape::Collection(Collection {
            kind: GeomType::MultiPoint,
            flags,
            geoms: vec![Geom::new(Shape::Point(Point::empty(flags)))],
        });
        let blob = serialize(&Geom::new(mp)).unwrap();
        assert!(blob.view().peek_gbox().is_none());
    }

    #[test]
    fn test_get_gbox_falls_back_to_decode() {
        // A two-point GEOMETRYCOLLECTION normally carries a cached box;
        // strip the header down to a boxless blob so the unified accessor
        // has to decode.
        let flags = GFlags::default();
        let gc = Shape::Collection(Collection {
            kind: GeomType::Collection,
            flags,
            geoms: vec![Geom::point_xy(1.0, 4.0), Geom::point_xy(3.0, 2.0)],
        });
        let blob = serialize(&Geom::new(gc)).unwrap();
        assert!(blob.view().has_bbox());

        let mut bytes = vec![0u8; 4];
        bytes.extend_from_slice(&[0, 0, 0]); // srid
        bytes.push(0); // flags: no box
        bytes.extend_from_slice(&blob.as_bytes()[blob.view().header_size()..]);
        let size = (bytes.len() as u32) << 2;
        bytes[0..4].copy_from_slice(&size.to_le_bytes());

        let view = GeoBlobRef::new(&bytes).unwrap();
        assert!(view.read_gbox().is_none());
        assert!(view.peek_gbox().is_none());
        let gbox = view.get_gbox().unwrap();
        assert_eq!((gbox.xmin, gbox.xmax), (1.0, 3.0));
        assert_eq!((gbox.ymin, gbox.ymax), (2.0, 4.0));
    }

    #[test]
    fn test_peek_first_point() {
        let blob = serialize(&Geom::point_xy(1.5, 2.5)).unwrap();
        let p = blob.view().peek_first_point().unwrap();
        assert_eq!((p.x, p.y), (1.5, 2.5));

        // Unsupported shapes fail recoverably.
        let blob = serialize(&line_geom(vec![0.0, 0.0, 1.0, 1.0], 2)).unwrap();
        assert!(blob.view().peek_first_point().is_none());
    }

    #[test]
    fn test_debug_string() {
        let blob = serialize(&Geom::point_xy(1.0, 2.0)).unwrap();
        assert_eq!(blob.view().to_debug_string().unwrap(), "POINT(1 2)");

        let blob = serialize(&Geom::new(Shape::Point(Point::empty(GFlags::default())))).unwrap();
        assert_eq!(blob.view().to_debug_string().unwrap(), "POINT EMPTY");
    }
}
