//! Geometry type codes and collection compatibility.
//!
//! The wire type codes are shared between the blob format and the tree:
//!
//! | Code | Type              | Code | Type              |
//! |------|-------------------|------|-------------------|
//! | 1    | Point             | 9    | CompoundCurve     |
//! | 2    | LineString        | 10   | CurvePolygon      |
//! | 3    | Polygon           | 11   | MultiCurve        |
//! | 4    | MultiPoint        | 12   | MultiSurface      |
//! | 5    | MultiLineString   | 13   | PolyhedralSurface |
//! | 6    | MultiPolygon      | 14   | Triangle          |
//! | 7    | GeometryCollection| 15   | Tin               |
//! | 8    | CircularString    |      |                   |

use serde::{Deserialize, Serialize};

/// Wire type code for a geometry node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum GeomType {
    Point = 1,
    Line = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLine = 5,
    MultiPolygon = 6,
    Collection = 7,
    CircularString = 8,
    CompoundCurve = 9,
    CurvePolygon = 10,
    MultiCurve = 11,
    MultiSurface = 12,
    PolyhedralSurface = 13,
    Triangle = 14,
    Tin = 15,
}

impl GeomType {
    /// Parse a wire type code. Returns `None` for codes outside 1..=15.
    pub fn from_wire(code: u32) -> Option<Self> {
        match code {
            1 => Some(GeomType::Point),
            2 => Some(GeomType::Line),
            3 => Some(GeomType::Polygon),
            4 => Some(GeomType::MultiPoint),
            5 => Some(GeomType::MultiLine),
            6 => Some(GeomType::MultiPolygon),
            7 => Some(GeomType::Collection),
            8 => Some(GeomType::CircularString),
            9 => Some(GeomType::CompoundCurve),
            10 => Some(GeomType::CurvePolygon),
            11 => Some(GeomType::MultiCurve),
            12 => Some(GeomType::MultiSurface),
            13 => Some(GeomType::PolyhedralSurface),
            14 => Some(GeomType::Triangle),
            15 => Some(GeomType::Tin),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Display name, also used as the WKT tag stem.
    pub fn name(self) -> &'static str {
        match self {
            GeomType::Point => "Point",
            GeomType::Line => "LineString",
            GeomType::Polygon => "Polygon",
            GeomType::MultiPoint => "MultiPoint",
            GeomType::MultiLine => "MultiLineString",
            GeomType::MultiPolygon => "MultiPolygon",
            GeomType::Collection => "GeometryCollection",
            GeomType::CircularString => "CircularString",
            GeomType::CompoundCurve => "CompoundCurve",
            GeomType::CurvePolygon => "CurvePolygon",
            GeomType::MultiCurve => "MultiCurve",
            GeomType::MultiSurface => "MultiSurface",
            GeomType::PolyhedralSurface => "PolyhedralSurface",
            GeomType::Triangle => "Triangle",
            GeomType::Tin => "Tin",
        }
    }

    /// Is this a container node (its count field is a geometry count)?
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            GeomType::MultiPoint
                | GeomType::MultiLine
                | GeomType::MultiPolygon
                | GeomType::Collection
                | GeomType::CompoundCurve
                | GeomType::CurvePolygon
                | GeomType::MultiCurve
                | GeomType::MultiSurface
                | GeomType::PolyhedralSurface
                | GeomType::Tin
        )
    }

    /// May a collection of type `self` directly contain a child of type
    /// `sub`? A generic `Collection` accepts everything, including nested
    /// collections.
    pub fn allows_subtype(self, sub: GeomType) -> bool {
        use GeomType::*;
        match self {
            Collection => true,
            MultiPoint => sub == Point,
            MultiLine => sub == Line,
            MultiPolygon => sub == Polygon,
            CompoundCurve => matches!(sub, Line | CircularString),
            CurvePolygon | MultiCurve => matches!(sub, Line | CircularString | CompoundCurve),
            MultiSurface => matches!(sub, Polygon | CurvePolygon),
            PolyhedralSurface => sub == Polygon,
            Tin => sub == Triangle,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        for code in 1u32..=15 {
            let t = GeomType::from_wire(code).unwrap();
            assert_eq!(t.as_u32(), code);
        }
        assert_eq!(GeomType::from_wire(0), None);
        assert_eq!(GeomType::from_wire(16), None);
        assert_eq!(GeomType::from_wire(u32::MAX), None);
    }

    #[test]
    fn test_is_collection() {
        assert!(!GeomType::Point.is_collection());
        assert!(!GeomType::Line.is_collection());
        assert!(!GeomType::Polygon.is_collection());
        assert!(!GeomType::Triangle.is_collection());
        assert!(!GeomType::CircularString.is_collection());
        assert!(GeomType::MultiPoint.is_collection());
        assert!(GeomType::CompoundCurve.is_collection());
        assert!(GeomType::Tin.is_collection());
        assert!(GeomType::Collection.is_collection());
    }

    #[test]
    fn test_subtype_table() {
        use GeomType::*;
        assert!(MultiPoint.allows_subtype(Point));
        assert!(!MultiPoint.allows_subtype(Line));
        assert!(MultiLine.allows_subtype(Line));
        assert!(!MultiLine.allows_subtype(CircularString));
        assert!(CompoundCurve.allows_subtype(CircularString));
        assert!(CompoundCurve.allows_subtype(Line));
        assert!(!CompoundCurve.allows_subtype(CompoundCurve));
        assert!(CurvePolygon.allows_subtype(CompoundCurve));
        assert!(MultiCurve.allows_subtype(CircularString));
        assert!(MultiSurface.allows_subtype(CurvePolygon));
        assert!(!MultiSurface.allows_subtype(Line));
        assert!(PolyhedralSurface.allows_subtype(Polygon));
        assert!(!PolyhedralSurface.allows_subtype(Triangle));
        assert!(Tin.allows_subtype(Triangle));
        assert!(Collection.allows_subtype(Collection));
        assert!(Collection.allows_subtype(Tin));
        assert!(!Point.allows_subtype(Point));
    }
}
