//! Packed bounding box codec and the sortable centroid hash.
//!
//! The cached box is a run of little-endian `f32` pairs, one `(min, max)`
//! pair per packed axis:
//!
//! ```text
//! xmin xmax ymin ymax                    cartesian 2D
//! xmin xmax ymin ymax zmin zmax          geodetic (geocentric Z), or 3DZ
//! xmin xmax ymin ymax mmin mmax          3DM
//! xmin xmax ymin ymax zmin zmax mmin mmax  4D
//! ```
//!
//! Every `min` is rounded toward −∞ and every `max` toward +∞ on write, so
//! the packed envelope conservatively covers the exact `f64` one.

use crate::error::{BlobError, Result};
use meridian_db_geom::geodetic::{cart2geog, normalize, Point3};
use meridian_db_geom::{next_float_down, next_float_up, GBox, GFlags};

/// Append the packed form of `gbox` to `out`, rounding outward. The axis
/// set follows `gbox.flags`.
pub(crate) fn write_gbox(gbox: &GBox, out: &mut Vec<u8>) {
    let mut push = |f: f32| out.extend_from_slice(&f.to_le_bytes());

    push(next_float_down(gbox.xmin));
    push(next_float_up(gbox.xmax));
    push(next_float_down(gbox.ymin));
    push(next_float_up(gbox.ymax));

    if gbox.flags.is_geodetic() {
        push(next_float_down(gbox.zmin));
        push(next_float_up(gbox.zmax));
        return;
    }
    if gbox.flags.has_z() {
        push(next_float_down(gbox.zmin));
        push(next_float_up(gbox.zmax));
    }
    if gbox.flags.has_m() {
        push(next_float_down(gbox.mmin));
        push(next_float_up(gbox.mmax));
    }
}

/// Read a packed box back into a `GBox` carrying `flags`.
pub(crate) fn read_gbox(bytes: &[u8], flags: GFlags) -> Result<GBox> {
    let expected = GBox::serialized_size(flags);
    if bytes.len() < expected {
        return Err(BlobError::Truncated {
            at: 0,
            need: expected,
            have: bytes.len(),
        });
    }
    let mut at = 0;
    let mut next = || {
        let f = f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap());
        at += 4;
        f as f64
    };

    let mut gbox = GBox::new(flags);
    gbox.xmin = next();
    gbox.xmax = next();
    gbox.ymin = next();
    gbox.ymax = next();
    if flags.is_geodetic() {
        gbox.zmin = next();
        gbox.zmax = next();
        return Ok(gbox);
    }
    if flags.has_z() {
        gbox.zmin = next();
        gbox.zmax = next();
    }
    if flags.has_m() {
        gbox.mmin = next();
        gbox.mmax = next();
    }
    Ok(gbox)
}

/// Sortable 64-bit key for a bounding box.
///
/// The bit pattern of a non-negative IEEE float is monotone (exponent above
/// mantissa), so interleaving the raw bits of two `f32` ordinates yields a
/// Z-order key that clusters well within a quadrant. Locality across the
/// sign boundaries is poor; the comparator tolerates that.
pub fn sortable_hash(gbox: &GBox) -> u64 {
    let (x, y): (f32, f32) = if gbox.flags.is_geodetic() {
        // Geocentric box centroid, back onto the sphere, then to lon/lat.
        let mut p = Point3::new(
            (gbox.xmax + gbox.xmin) / 2.0,
            (gbox.ymax + gbox.ymin) / 2.0,
            (gbox.zmax + gbox.zmin) / 2.0,
        );
        normalize(&mut p);
        let (lon, lat) = cart2geog(&p);
        (lon as f32, lat as f32)
    } else {
        // The sum stands in for the centroid: omitting the division by two
        // only shifts the exponent and preserves ordering.
        ((gbox.xmax + gbox.xmin) as f32, (gbox.ymax + gbox.ymin) as f32)
    };
    interleave_u32(x.to_bits(), y.to_bits())
}

/// Morton (Z-order) interleave: bit `i` of `x` lands at bit `2i`, bit `i`
/// of `y` at bit `2i + 1`.
pub(crate) fn interleave_u32(x: u32, y: u32) -> u64 {
    const B: [u64; 5] = [
        0x5555_5555_5555_5555,
        0x3333_3333_3333_3333,
        0x0F0F_0F0F_0F0F_0F0F,
        0x00FF_00FF_00FF_00FF,
        0x0000_FFFF_0000_FFFF,
    ];
    const S: [u32; 5] = [1, 2, 4, 8, 16];

    let mut x = x as u64;
    let mut y = y as u64;
    for i in (0..5).rev() {
        x = (x | (x << S[i])) & B[i];
        y = (y | (y << S[i])) & B[i];
    }
    x | (y << 1)
}
