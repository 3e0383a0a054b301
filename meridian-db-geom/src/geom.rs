//! The in-memory geometry tree.
//!
//! [`Geom`] is the root handle: SRID, optional bounding box, and a recursive
//! [`Shape`]. Shapes hold their own flag byte so a subtree can be moved
//! between containers without consulting the root.
//!
//! Trees built by a zero-copy decode borrow vertex bytes from the source
//! blob; the `'a` lifetime ties the tree to it. Trees built by hand or by a
//! copying decode are `Geom<'static>`.

use crate::flags::GFlags;
use crate::gbox::GBox;
use crate::geodetic::geocentric_from_degrees;
use crate::point::{Point4, PointArray};
use crate::srid::SRID_UNKNOWN;
use crate::types::GeomType;

/// A geometry: reference system, cached envelope, shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Geom<'a> {
    pub srid: i32,
    pub bbox: Option<GBox>,
    pub shape: Shape<'a>,
}

impl<'a> Geom<'a> {
    pub fn new(shape: Shape<'a>) -> Self {
        Geom {
            srid: SRID_UNKNOWN,
            bbox: None,
            shape,
        }
    }

    pub fn with_srid(shape: Shape<'a>, srid: i32) -> Self {
        Geom {
            srid,
            bbox: None,
            shape,
        }
    }

    /// A 2D cartesian point, mostly for tests and literals.
    pub fn point_xy(x: f64, y: f64) -> Geom<'static> {
        Geom::new(Shape::Point(Point::from_point4(
            GFlags::default(),
            Point4::xy(x, y),
        )))
    }

    #[inline]
    pub fn flags(&self) -> GFlags {
        self.shape.flags()
    }

    #[inline]
    pub fn geom_type(&self) -> GeomType {
        self.shape.geom_type()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }
}

/// Recursive sum of the supported node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    Point(Point<'a>),
    Line(Line<'a>),
    CircularString(CircularString<'a>),
    Triangle(Triangle<'a>),
    Polygon(Polygon<'a>),
    Collection(Collection<'a>),
}

/// 0 (empty) or 1 vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<'a> {
    pub flags: GFlags,
    pub vertices: PointArray<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    pub flags: GFlags,
    pub points: PointArray<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircularString<'a> {
    pub flags: GFlags,
    pub points: PointArray<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle<'a> {
    pub flags: GFlags,
    pub points: PointArray<'a>,
}

/// Ring 0 is the outer boundary, the rest are holes. Ring closure
/// (first vertex == last vertex) is preserved, not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<'a> {
    pub flags: GFlags,
    pub rings: Vec<PointArray<'a>>,
}

/// A typed container: multipoint, multilinestring, compound curve, TIN, and
/// the rest of the collection family. `kind` must satisfy
/// [`GeomType::is_collection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<'a> {
    pub kind: GeomType,
    pub flags: GFlags,
    pub geoms: Vec<Geom<'a>>,
}

impl<'a> Point<'a> {
    pub fn empty(flags: GFlags) -> Self {
        Point {
            flags,
            vertices: PointArray::empty(flags.has_z(), flags.has_m()),
        }
    }

    /// Single-vertex point taking the ordinates `flags` implies from `p`.
    pub fn from_point4(flags: GFlags, p: Point4) -> Point<'static> {
        let mut ordinates = vec![p.x, p.y];
        if flags.has_z() {
            ordinates.push(p.z);
        }
        if flags.has_m() {
            ordinates.push(p.m);
        }
        Point {
            flags,
            vertices: PointArray::owned(ordinates, 1, flags.has_z(), flags.has_m())
                .expect("ordinate count derived from flags"),
        }
    }
}

impl<'a> Shape<'a> {
    pub fn geom_type(&self) -> GeomType {
        match self {
            Shape::Point(_) => GeomType::Point,
            Shape::Line(_) => GeomType::Line,
            Shape::CircularString(_) => GeomType::CircularString,
            Shape::Triangle(_) => GeomType::Triangle,
            Shape::Polygon(_) => GeomType::Polygon,
            Shape::Collection(c) => c.kind,
        }
    }

    pub fn flags(&self) -> GFlags {
        match self {
            Shape::Point(p) => p.flags,
            Shape::Line(l) => l.flags,
            Shape::CircularString(c) => c.flags,
            Shape::Triangle(t) => t.flags,
            Shape::Polygon(p) => p.flags,
            Shape::Collection(c) => c.flags,
        }
    }

    /// Structural emptiness: a zero count at a simple node, recursively
    /// empty children at a collection.
    pub fn is_empty(&self) -> bool {
        match self {
            Shape::Point(p) => p.vertices.is_empty(),
            Shape::Line(l) => l.points.is_empty(),
            Shape::CircularString(c) => c.points.is_empty(),
            Shape::Triangle(t) => t.points.is_empty(),
            Shape::Polygon(p) => p.rings.is_empty(),
            Shape::Collection(c) => c.geoms.iter().all(|g| g.shape.is_empty()),
        }
    }

    /// Total vertex count across the subtree.
    pub fn count_vertices(&self) -> u32 {
        match self {
            Shape::Point(p) => p.vertices.npoints(),
            Shape::Line(l) => l.points.npoints(),
            Shape::CircularString(c) => c.points.npoints(),
            Shape::Triangle(t) => t.points.npoints(),
            Shape::Polygon(p) => p.rings.iter().map(|r| r.npoints()).sum(),
            Shape::Collection(c) => c.geoms.iter().map(|g| g.shape.count_vertices()).sum(),
        }
    }

    /// Should a serializer cache a bounding box for this shape?
    ///
    /// Shapes whose box is trivially derivable from the body (single points,
    /// two-vertex lines, and their single-entry multi wrappers) don't earn
    /// the extra header bytes.
    pub fn needs_bbox(&self) -> bool {
        match self {
            Shape::Point(_) => false,
            Shape::Line(l) => l.points.npoints() > 2,
            Shape::Collection(c) if c.kind == GeomType::MultiPoint => c.geoms.len() != 1,
            Shape::Collection(c) if c.kind == GeomType::MultiLine => {
                !(c.geoms.len() == 1 && self.count_vertices() <= 2)
            }
            _ => true,
        }
    }

    /// Compute a tight bounding box from the vertex data, or `None` when
    /// the shape is empty.
    ///
    /// Geodetic boxes fold the per-vertex geocentric coordinates; cartesian
    /// boxes fold the raw ordinates (circular arcs are treated as their
    /// chords).
    pub fn calculate_gbox(&self) -> Option<GBox> {
        let flags = self.flags();
        let mut acc = None;
        self.fold_gbox(flags, &mut acc);
        acc
    }

    fn fold_gbox(&self, flags: GFlags, acc: &mut Option<GBox>) {
        match self {
            Shape::Point(p) => fold_point_array(&p.vertices, flags, acc),
            Shape::Line(l) => fold_point_array(&l.points, flags, acc),
            Shape::CircularString(c) => fold_point_array(&c.points, flags, acc),
            Shape::Triangle(t) => fold_point_array(&t.points, flags, acc),
            // Holes lie inside the outer boundary; ring 0 determines the box.
            Shape::Polygon(p) => {
                if let Some(outer) = p.rings.first() {
                    fold_point_array(outer, flags, acc);
                }
            }
            Shape::Collection(c) => {
                for child in &c.geoms {
                    child.shape.fold_gbox(flags, acc);
                }
            }
        }
    }
}

fn fold_point_array(pa: &PointArray<'_>, flags: GFlags, acc: &mut Option<GBox>) {
    for p in pa.iter() {
        let p = if flags.is_geodetic() {
            let c = geocentric_from_degrees(p.x, p.y);
            Point4::new(c.x, c.y, c.z, 0.0)
        } else {
            p
        };
        match acc {
            None => *acc = Some(GBox::from_point(flags, &p)),
            Some(b) => b.merge_point(&p),
        }
    }
}
