//! Geometry flag byte.
//!
//! A single byte shared by the in-memory tree and the serialized blob header.
//! The bit assignments are part of the wire format and must never change:
//!
//! ```text
//! bit 0  (0x01)  has_z      vertices carry a Z ordinate
//! bit 1  (0x02)  has_m      vertices carry an M ordinate
//! bit 2  (0x04)  has_bbox   a cached bounding box precedes the body
//! bit 3  (0x08)  geodetic   coordinates are lon/lat on a sphere
//! bit 4  (0x10)  read_only  advisory; ignored by the decoder
//! bit 5  (0x20)  solid      reserved; carried transparently
//! ```

use serde::{Deserialize, Serialize};

const FLAG_Z: u8 = 0x01;
const FLAG_M: u8 = 0x02;
const FLAG_BBOX: u8 = 0x04;
const FLAG_GEODETIC: u8 = 0x08;
const FLAG_READ_ONLY: u8 = 0x10;
const FLAG_SOLID: u8 = 0x20;

/// The one-byte geometry flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct GFlags(u8);

impl GFlags {
    /// Build a flag set from the dimensionality bits. All other bits start
    /// cleared.
    pub fn new(has_z: bool, has_m: bool, geodetic: bool) -> Self {
        let mut f = GFlags(0);
        f.set_z(has_z);
        f.set_m(has_m);
        f.set_geodetic(geodetic);
        f
    }

    /// Wrap a raw flag byte. Unknown bits are carried transparently.
    #[inline]
    pub fn from_byte(b: u8) -> Self {
        GFlags(b)
    }

    #[inline]
    pub fn as_byte(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn has_z(self) -> bool {
        self.0 & FLAG_Z != 0
    }

    #[inline]
    pub fn has_m(self) -> bool {
        self.0 & FLAG_M != 0
    }

    #[inline]
    pub fn has_bbox(self) -> bool {
        self.0 & FLAG_BBOX != 0
    }

    #[inline]
    pub fn is_geodetic(self) -> bool {
        self.0 & FLAG_GEODETIC != 0
    }

    #[inline]
    pub fn is_read_only(self) -> bool {
        self.0 & FLAG_READ_ONLY != 0
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.0 & FLAG_SOLID != 0
    }

    pub fn set_z(&mut self, v: bool) {
        self.set(FLAG_Z, v);
    }

    pub fn set_m(&mut self, v: bool) {
        self.set(FLAG_M, v);
    }

    pub fn set_bbox(&mut self, v: bool) {
        self.set(FLAG_BBOX, v);
    }

    pub fn set_geodetic(&mut self, v: bool) {
        self.set(FLAG_GEODETIC, v);
    }

    pub fn set_read_only(&mut self, v: bool) {
        self.set(FLAG_READ_ONLY, v);
    }

    pub fn set_solid(&mut self, v: bool) {
        self.set(FLAG_SOLID, v);
    }

    #[inline]
    fn set(&mut self, mask: u8, v: bool) {
        if v {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    /// Number of ordinates per vertex: 2, 3, or 4.
    #[inline]
    pub fn ndims(self) -> u8 {
        2 + self.has_z() as u8 + self.has_m() as u8
    }

    /// Z/M discriminant: `2 * has_z + has_m`. Two flag sets describe the
    /// same vertex layout iff their discriminants match.
    #[inline]
    pub fn zm(self) -> u8 {
        2 * self.has_z() as u8 + self.has_m() as u8
    }

    /// Do `self` and `other` agree on vertex dimensionality?
    #[inline]
    pub fn same_zm(self, other: GFlags) -> bool {
        self.zm() == other.zm()
    }
}
