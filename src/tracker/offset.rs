//! Bit-packed relative offset record
//!
//! ```text
//!  15  14      10 9       5 4       0
//! ┌───┬──────────┬─────────┬─────────┐
//! │ V │ delta_z  │ delta_y │ delta_x │
//! └───┴──────────┴─────────┴─────────┘
//! ```
//!
//! Each delta is a 5-bit two's-complement count of `ACCURACY` units
//! (-16..=15). `V` marks the record as holding data.

use nalgebra::Vector3;

use super::ACCURACY;

const VALID_BIT: u16 = 1 << 15;
const FIELD_MASK: u16 = 0x1F;
const SHIFT_X: u16 = 0;
const SHIFT_Y: u16 = 5;
const SHIFT_Z: u16 = 10;

/// Smallest per-axis delta a record can hold
pub const MIN_DELTA: i32 = -16;
/// Largest per-axis delta a record can hold
pub const MAX_DELTA: i32 = 15;

/// Offset of one path point from its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelativeOffset(u16);

impl RelativeOffset {
    /// Unused slot
    pub const EMPTY: Self = Self(0);

    /// Oldest record of a path: non-empty, no direction
    pub const SENTINEL: Self = Self(VALID_BIT);

    /// Pack a per-axis delta in accuracy units, `None` if any axis is out of range
    pub fn encode(dx: i32, dy: i32, dz: i32) -> Option<Self> {
        let in_range = |d: i32| (MIN_DELTA..=MAX_DELTA).contains(&d);
        if !(in_range(dx) && in_range(dy) && in_range(dz)) {
            return None;
        }

        let field = |d: i32, shift: u16| ((d as u16) & FIELD_MASK) << shift;
        Some(Self(
            VALID_BIT | field(dx, SHIFT_X) | field(dy, SHIFT_Y) | field(dz, SHIFT_Z),
        ))
    }

    /// Unpacked `[dx, dy, dz]` in accuracy units
    pub fn delta(&self) -> [i8; 3] {
        [
            self.field(SHIFT_X),
            self.field(SHIFT_Y),
            self.field(SHIFT_Z),
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.0 & VALID_BIT != 0
    }

    /// Delta in meters (local frame)
    pub fn to_local(&self) -> Vector3<f32> {
        let [dx, dy, dz] = self.delta();
        Vector3::new(dx as f32, dy as f32, dz as f32) * ACCURACY
    }

    /// Raw packed representation
    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    fn field(&self, shift: u16) -> i8 {
        let raw = ((self.0 >> shift) & FIELD_MASK) as u8;
        // Sign-extend from 5 bits
        ((raw << 3) as i8) >> 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_extremes() {
        let offset = RelativeOffset::encode(-16, 15, 0).unwrap();
        assert!(offset.is_valid());
        assert_eq!(offset.delta(), [-16, 15, 0]);

        let offset = RelativeOffset::encode(-1, 1, -7).unwrap();
        assert_eq!(offset.delta(), [-1, 1, -7]);
    }

    #[test]
    fn test_bit_layout() {
        let offset = RelativeOffset::encode(1, 2, 3).unwrap();
        assert_eq!(offset.bits(), 0x8000 | 1 | (2 << 5) | (3 << 10));

        let offset = RelativeOffset::encode(-1, 0, 0).unwrap();
        assert_eq!(offset.bits(), 0x8000 | 0x1F);
    }

    #[test]
    fn test_encode_out_of_range() {
        assert!(RelativeOffset::encode(16, 0, 0).is_none());
        assert!(RelativeOffset::encode(0, -17, 0).is_none());
        assert!(RelativeOffset::encode(0, 0, 100).is_none());
    }

    #[test]
    fn test_sentinel_and_empty() {
        assert!(RelativeOffset::SENTINEL.is_valid());
        assert_eq!(RelativeOffset::SENTINEL.delta(), [0, 0, 0]);
        assert!(!RelativeOffset::EMPTY.is_valid());
        assert_eq!(RelativeOffset::default(), RelativeOffset::EMPTY);
    }

    #[test]
    fn test_to_local_scales_by_accuracy() {
        let local = RelativeOffset::encode(3, -2, 1).unwrap().to_local();
        assert!((local.x - 3.0 * ACCURACY).abs() < 1e-6);
        assert!((local.y + 2.0 * ACCURACY).abs() < 1e-6);
        assert!((local.z - ACCURACY).abs() < 1e-6);
    }
}
