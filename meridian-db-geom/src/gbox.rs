//! Axis-aligned bounding boxes.
//!
//! A [`GBox`] is a hyper-rectangle over the ordinates a geometry carries.
//! For geodetic geometries the box is held in 3D geocentric coordinates, so
//! an envelope never straddles the antimeridian.
//!
//! Boxes destined for a serialized blob are stored as `f32` pairs rounded
//! *outward* (min toward −∞, max toward +∞), so the stored envelope is a
//! conservative cover of the exact `f64` one. [`next_float_down`] /
//! [`next_float_up`] implement that rounding and [`GBox::float_round`]
//! applies it in place.

use crate::flags::GFlags;
use crate::point::Point4;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box. Only the axes implied by `flags` are
/// meaningful; the rest stay at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GBox {
    pub flags: GFlags,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
    pub mmin: f64,
    pub mmax: f64,
}

impl GBox {
    /// An all-zero box carrying `flags`.
    pub fn new(flags: GFlags) -> Self {
        GBox {
            flags,
            ..Default::default()
        }
    }

    /// A degenerate box covering a single vertex.
    pub fn from_point(flags: GFlags, p: &Point4) -> Self {
        GBox {
            flags,
            xmin: p.x,
            xmax: p.x,
            ymin: p.y,
            ymax: p.y,
            zmin: if flags.has_z() || flags.is_geodetic() { p.z } else { 0.0 },
            zmax: if flags.has_z() || flags.is_geodetic() { p.z } else { 0.0 },
            mmin: if flags.has_m() { p.m } else { 0.0 },
            mmax: if flags.has_m() { p.m } else { 0.0 },
        }
    }

    /// Grow the box to cover a vertex. Axes not carried by `self.flags`
    /// are ignored.
    pub fn merge_point(&mut self, p: &Point4) {
        self.xmin = self.xmin.min(p.x);
        self.xmax = self.xmax.max(p.x);
        self.ymin = self.ymin.min(p.y);
        self.ymax = self.ymax.max(p.y);
        if self.flags.has_z() || self.flags.is_geodetic() {
            self.zmin = self.zmin.min(p.z);
            self.zmax = self.zmax.max(p.z);
        }
        if self.flags.has_m() {
            self.mmin = self.mmin.min(p.m);
            self.mmax = self.mmax.max(p.m);
        }
    }

    /// Grow the box to cover another box of the same dimensionality.
    pub fn merge(&mut self, other: &GBox) {
        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);
        if self.flags.has_z() || self.flags.is_geodetic() {
            self.zmin = self.zmin.min(other.zmin);
            self.zmax = self.zmax.max(other.zmax);
        }
        if self.flags.has_m() {
            self.mmin = self.mmin.min(other.mmin);
            self.mmax = self.mmax.max(other.mmax);
        }
    }

    /// Size in bytes of the packed form for a given flag set: `f32` pairs
    /// for X and Y, plus geocentric Z when geodetic, else Z and/or M when
    /// present.
    pub fn serialized_size(flags: GFlags) -> usize {
        if flags.is_geodetic() {
            6 * std::mem::size_of::<f32>()
        } else {
            2 * flags.ndims() as usize * std::mem::size_of::<f32>()
        }
    }

    /// Round every carried ordinate outward to `f32` precision, in place.
    ///
    /// Cached boxes are stored as `f32`; applying the same rounding to a
    /// freshly computed `f64` box keeps the two representations comparable
    /// bit-for-bit.
    pub fn float_round(&mut self) {
        self.xmin = next_float_down(self.xmin) as f64;
        self.xmax = next_float_up(self.xmax) as f64;
        self.ymin = next_float_down(self.ymin) as f64;
        self.ymax = next_float_up(self.ymax) as f64;
        if self.flags.has_z() || self.flags.is_geodetic() {
            self.zmin = next_float_down(self.zmin) as f64;
            self.zmax = next_float_up(self.zmax) as f64;
        }
        if self.flags.has_m() {
            self.mmin = next_float_down(self.mmin) as f64;
            self.mmax = next_float_up(self.mmax) as f64;
        }
    }
}

/// The largest `f32` that is `<= d`. ±∞ and NaN pass through.
pub fn next_float_down(d: f64) -> f32 {
    let f = d as f32;
    if (f as f64) <= d {
        return f;
    }
    step_down(f)
}

/// The smallest `f32` that is `>= d`. ±∞ and NaN pass through.
pub fn next_float_up(d: f64) -> f32 {
    let f = d as f32;
    if (f as f64) >= d {
        return f;
    }
    step_up(f)
}

fn step_down(f: f32) -> f32 {
    if f.is_nan() || f == f32::NEG_INFINITY {
        return f;
    }
    if f == 0.0 {
        // Smallest-magnitude negative subnormal.
        return f32::from_bits(0x8000_0001);
    }
    let bits = f.to_bits();
    if bits & 0x8000_0000 == 0 {
        f32::from_bits(bits - 1)
    } else {
        f32::from_bits(bits + 1)
    }
}

fn step_up(f: f32) -> f32 {
    if f.is_nan() || f == f32::INFINITY {
        return f;
    }
    if f == 0.0 {
        return f32::from_bits(0x0000_0001);
    }
    let bits = f.to_bits();
    if bits & 0x8000_0000 == 0 {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}
