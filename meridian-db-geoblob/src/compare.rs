//! Total-order comparator over serialized geometries.
//!
//! The order is built for B-tree indexing, not for spatial meaning: it is
//! deterministic, total, and clusters nearby geometries within a quadrant
//! via the Z-order hash of their box centroids. The ladder:
//!
//! 1. Point fast path: two box-less non-empty points hash straight off
//!    their first two ordinates.
//! 2. Empty sorts before non-empty.
//! 3. Byte-equal bodies with equal length and SRID compare equal.
//! 4. Z-order centroid hash.
//! 5. Box minima, then maxima.
//! 6. A body that prefixes a longer one sorts first.
//! 7. SRID bytes (only reachable for equal bodies with different SRIDs).
//! 8. Sign of the body byte comparison.

use crate::bbox::{interleave_u32, sortable_hash};
use crate::header::GeoBlobRef;
use meridian_db_geom::GeomType;
use std::cmp::Ordering;

/// Blob size of an empty point; anything larger carries coordinates.
const EMPTY_POINT_SIZE: usize = 16;

/// Compare two serialized geometries. See the module docs for the order's
/// guarantees.
pub fn cmp(g1: GeoBlobRef<'_>, g2: GeoBlobRef<'_>) -> Ordering {
    let srid_eq = g1.srid_bytes() == g2.srid_bytes();

    // For two non-same points we can skip a lot of machinery.
    if srid_eq
        && g1.size() > EMPTY_POINT_SIZE
        && g2.size() > EMPTY_POINT_SIZE
        && !g1.has_bbox()
        && !g2.has_bbox()
        && g1.type_code() == GeomType::Point.as_u32()
        && g2.type_code() == GeomType::Point.as_u32()
    {
        if let (Some(h1), Some(h2)) = (point_hash(g1), point_hash(g2)) {
            if h1 != h2 {
                return h1.cmp(&h2);
            }
            // Equal hashes fall through to the full comparison.
        }
    }

    let b1 = g1.body();
    let b2 = g2.body();
    let shared = b1.len().min(b2.len());

    let box1 = g1.get_gbox();
    let box2 = g2.get_gbox();

    // Empty < non-empty.
    match (&box1, &box2) {
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        _ => {}
    }

    // Equality only for perfect equality.
    let body_cmp = b1[..shared].cmp(&b2[..shared]);
    if b1.len() == b2.len() && srid_eq && body_cmp == Ordering::Equal {
        return Ordering::Equal;
    }

    if let (Some(box1), Some(box2)) = (&box1, &box2) {
        let h1 = sortable_hash(box1);
        let h2 = sortable_hash(box2);
        if h1 != h2 {
            return h1.cmp(&h2);
        }

        // Same hash? Sort on the box minima, then the maxima.
        for (a, b) in [
            (box1.xmin, box2.xmin),
            (box1.ymin, box2.ymin),
            (box1.xmax, box2.xmax),
            (box1.ymax, box2.ymax),
        ] {
            match a.partial_cmp(&b) {
                Some(Ordering::Equal) | None => {}
                Some(order) => return order,
            }
        }
    }

    // A shared prefix puts the shorter body first.
    if body_cmp == Ordering::Equal {
        if b1.len() != b2.len() {
            return b1.len().cmp(&b2.len());
        }
        // Identical bodies, different SRIDs: order on the packed SRID so
        // the relation stays antisymmetric.
        return g1.srid_bytes().cmp(&g2.srid_bytes());
    }
    body_cmp
}

/// Z-order key straight off a point body: doubling the ordinates stands in
/// for `min + max` of the degenerate box.
fn point_hash(g: GeoBlobRef<'_>) -> Option<u64> {
    let body = g.body();
    let x = f64::from_le_bytes(body.get(8..16)?.try_into().unwrap());
    let y = f64::from_le_bytes(body.get(16..24)?.try_into().unwrap());
    let xf = (2.0 * x) as f32;
    let yf = (2.0 * y) as f32;
    Some(interleave_u32(xf.to_bits(), yf.to_bits()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::serialize;
    use meridian_db_geom::{GFlags, Geom, Line, Point, PointArray, Shape};

    fn point_blob(x: f64, y: f64) -> crate::GeoBlob {
        serialize(&Geom::point_xy(x, y)).unwrap()
    }

    #[test]
    fn test_point_fast_path_orders_by_x() {
        let a = point_blob(0.0, 0.0);
        let b = point_blob(1.0, 0.0);
        assert_eq!(cmp(a.view(), b.view()), Ordering::Less);
        assert_eq!(cmp(b.view(), a.view()), Ordering::Greater);
    }

    #[test]
    fn test_equal_blobs_compare_equal() {
        let g = Geom::point_xy(3.25, -8.5);
        let a = serialize(&g).unwrap();
        let b = serialize(&g).unwrap();
        assert_eq!(cmp(a.view(), b.view()), Ordering::Equal);
    }

    #[test]
    fn test_empty_sorts_before_any_point() {
        let empty = serialize(&Geom::new(Shape::Point(Point::empty(GFlags::default())))).unwrap();
        for (x, y) in [(0.0, 0.0), (-100.0, -100.0), (1e6, 1e6)] {
            let full = point_blob(x, y);
            assert_eq!(cmp(empty.view(), full.view()), Ordering::Less);
            assert_eq!(cmp(full.view(), empty.view()), Ordering::Greater);
        }
    }

    #[test]
    fn test_fast_path_agrees_with_full_path() {
        // Strip the fast path's preconditions by attaching a cached box to
        // one operand: the ladder must produce the same sign.
        let pairs = [
            ((0.5, 0.5), (2.0, 2.0)),
            ((10.0, 1.0), (1.0, 10.0)),
            ((3.0, 4.0), (3.0, 5.0)),
        ];
        for ((x1, y1), (x2, y2)) in pairs {
            let a = point_blob(x1, y1);
            let b = point_blob(x2, y2);
            let fast = cmp(a.view(), b.view());

            let boxed_a = {
                let mut g = Geom::point_xy(x1, y1);
                g.bbox = g.shape.calculate_gbox();
                serialize(&g).unwrap()
            };
            assert!(boxed_a.view().has_bbox());
            let full = cmp(boxed_a.view(), b.view());
            assert_eq!(fast, full, "paths disagree for ({x1},{y1}) vs ({x2},{y2})");
        }
    }

    #[test]
    fn test_different_srid_breaks_equality() {
        let mut a = point_blob(1.0, 2.0);
        let mut b = point_blob(1.0, 2.0);
        a.set_srid(4326);
        b.set_srid(3857);
        let ab = cmp(a.view(), b.view());
        let ba = cmp(b.view(), a.view());
        assert_ne!(ab, Ordering::Equal);
        assert_eq!(ab, ba.reverse());
    }

    #[test]
    fn test_two_empties_order_by_body_bytes() {
        let flags = GFlags::default();
        let empty_point = serialize(&Geom::new(Shape::Point(Point::empty(flags)))).unwrap();
        let empty_line = serialize(&Geom::new(Shape::Line(Line {
            flags,
            points: PointArray::empty(false, false),
        })))
        .unwrap();
        // Neither has a box; the type words differ, so the memcmp arm
        // decides: point (1) before linestring (2).
        assert_eq!(cmp(empty_point.view(), empty_line.view()), Ordering::Less);
        assert_eq!(cmp(empty_line.view(), empty_point.view()), Ordering::Greater);
    }

    #[test]
    fn test_prefix_body_sorts_first() {
        // Equal bodies up to the shorter length can only come from
        // hand-built buffers; the rule still has to hold. Append a spare
        // word to an empty-point body.
        let short = serialize(&Geom::new(Shape::Point(Point::empty(GFlags::default())))).unwrap();
        let mut bytes = short.as_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 4]);
        let size = (bytes.len() as u32) << 2;
        bytes[0..4].copy_from_slice(&size.to_le_bytes());
        let long = crate::GeoBlob::from_bytes(bytes).unwrap();

        assert_eq!(cmp(short.view(), long.view()), Ordering::Less);
        assert_eq!(cmp(long.view(), short.view()), Ordering::Greater);
    }

    #[test]
    fn test_total_order_on_sample_set() {
        let flags = GFlags::default();
        let mut blobs = vec![
            serialize(&Geom::new(Shape::Point(Point::empty(flags)))).unwrap(),
            point_blob(0.0, 0.0),
            point_blob(1.0, 0.0),
            point_blob(0.0, 1.0),
            point_blob(-5.0, 3.0),
            serialize(&Geom::new(Shape::Line(Line {
                flags,
                points: PointArray::owned(vec![0.0, 0.0, 1.0, 1.0], 2, false, false).unwrap(),
            })))
            .unwrap(),
            serialize(&Geom::new(Shape::Line(Line {
                flags,
                points: PointArray::owned(vec![0.0, 0.0, 1.0, 1.0, 2.0, 0.0], 3, false, false)
                    .unwrap(),
            })))
            .unwrap(),
        ];

        // Antisymmetry across every pair.
        for a in &blobs {
            for b in &blobs {
                let ab = cmp(a.view(), b.view());
                let ba = cmp(b.view(), a.view());
                assert_eq!(ab, ba.reverse());
            }
        }
        // Reflexivity.
        for a in &blobs {
            assert_eq!(cmp(a.view(), a.view()), Ordering::Equal);
        }
        // Sorting must not panic and must be stable under re-sort.
        blobs.sort_by(|a, b| cmp(a.view(), b.view()));
        let order1: Vec<Vec<u8>> = blobs.iter().map(|b| b.as_bytes().to_vec()).collect();
        blobs.reverse();
        blobs.sort_by(|a, b| cmp(a.view(), b.view()));
        let order2: Vec<Vec<u8>> = blobs.iter().map(|b| b.as_bytes().to_vec()).collect();
        assert_eq!(order1, order2);
    }
}
