//! ISO WKT rendering.
//!
//! Renders a [`Geom`] as ISO WKT with `Z`/`M`/`ZM` qualifiers and `EMPTY`
//! markers. Numbers print with a caller-chosen count of significant digits,
//! trailing zeros trimmed (`%g` style).

use crate::geom::{Geom, Shape};
use crate::point::PointArray;
use crate::types::GeomType;

/// Render `geom` as ISO WKT with `precision` significant digits.
pub fn to_wkt(geom: &Geom<'_>, precision: usize) -> String {
    let mut out = String::new();
    write_tagged(&mut out, &geom.shape, precision);
    out
}

fn write_tagged(out: &mut String, shape: &Shape<'_>, prec: usize) {
    let flags = shape.flags();
    out.push_str(&shape.geom_type().name().to_ascii_uppercase());
    match (flags.has_z(), flags.has_m()) {
        (true, true) => out.push_str(" ZM"),
        (true, false) => out.push_str(" Z"),
        (false, true) => out.push_str(" M"),
        (false, false) => {}
    }
    if shape.is_empty() {
        out.push_str(" EMPTY");
        return;
    }
    if flags.has_z() || flags.has_m() {
        out.push(' ');
    }
    write_body(out, shape, prec);
}

/// The parenthesized part, without tag or qualifier. `EMPTY` when a nested
/// shape has nothing to show.
fn write_body(out: &mut String, shape: &Shape<'_>, prec: usize) {
    if shape.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    match shape {
        Shape::Point(p) => {
            out.push('(');
            write_coords(out, &p.vertices, prec);
            out.push(')');
        }
        Shape::Line(l) => {
            out.push('(');
            write_coords(out, &l.points, prec);
            out.push(')');
        }
        Shape::CircularString(c) => {
            out.push('(');
            write_coords(out, &c.points, prec);
            out.push(')');
        }
        Shape::Triangle(t) => {
            out.push_str("((");
            write_coords(out, &t.points, prec);
            out.push_str("))");
        }
        Shape::Polygon(p) => {
            out.push('(');
            for (i, ring) in p.rings.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('(');
                write_coords(out, ring, prec);
                out.push(')');
            }
            out.push(')');
        }
        Shape::Collection(c) => {
            out.push('(');
            for (i, child) in c.geoms.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_member(out, c.kind, &child.shape, prec);
            }
            out.push(')');
        }
    }
}

/// A collection member: bare body when the container implies the member
/// type, tagged otherwise (curve components, mixed surfaces, generic
/// collections).
fn write_member(out: &mut String, parent: GeomType, child: &Shape<'_>, prec: usize) {
    let bare = match parent {
        GeomType::Collection => false,
        GeomType::MultiPoint => matches!(child, Shape::Point(_)),
        GeomType::MultiLine => matches!(child, Shape::Line(_)),
        GeomType::MultiPolygon | GeomType::PolyhedralSurface => matches!(child, Shape::Polygon(_)),
        GeomType::Tin => matches!(child, Shape::Triangle(_)),
        // Curve containers spell out everything but a plain linestring.
        GeomType::CompoundCurve | GeomType::CurvePolygon | GeomType::MultiCurve => {
            matches!(child, Shape::Line(_))
        }
        GeomType::MultiSurface => matches!(child, Shape::Polygon(_)),
        _ => false,
    };
    if bare {
        match child {
            // Bare multipoint members print without their own parentheses.
            Shape::Point(p) if !p.vertices.is_empty() => write_coords(out, &p.vertices, prec),
            _ => write_body(out, child, prec),
        }
    } else {
        write_tagged(out, child, prec);
    }
}

fn write_coords(out: &mut String, pa: &PointArray<'_>, prec: usize) {
    for (i, p) in pa.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_number(out, p.x, prec);
        out.push(' ');
        write_number(out, p.y, prec);
        if pa.has_z() {
            out.push(' ');
            write_number(out, p.z, prec);
        }
        if pa.has_m() {
            out.push(' ');
            write_number(out, p.m, prec);
        }
    }
}

/// `%.*g`-style: `sig` significant digits, trailing zeros trimmed,
/// scientific notation outside [1e-4, 10^sig).
fn write_number(out: &mut String, v: f64, sig: usize) {
    if v == 0.0 {
        out.push('0');
        return;
    }
    if !v.is_finite() {
        out.push_str(&v.to_string());
        return;
    }
    let sig = sig.max(1);
    let exp = v.abs().log10().floor() as i32;
    if exp < -4 || exp >= sig as i32 {
        let s = format!("{:.*e}", sig - 1, v);
        // Trim trailing zeros in the mantissa: "1.2000e7" -> "1.2e7".
        if let Some(epos) = s.find('e') {
            let (mant, tail) = s.split_at(epos);
            let mant = mant.trim_end_matches('0').trim_end_matches('.');
            out.push_str(mant);
            out.push_str(tail);
        } else {
            out.push_str(&s);
        }
    } else {
        let decimals = (sig as i32 - 1 - exp).max(0) as usize;
        let s = format!("{:.*}", decimals, v);
        let trimmed = if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.')
        } else {
            s.as_str()
        };
        out.push_str(trimmed);
    }
}
