//! Spatial reference system identifiers.
//!
//! The serialized header stores the SRID in 21 bits, so values outside the
//! representable range are clamped before storage. Clamping is idempotent.

/// The unknown SRID. Encodes to 0 on the wire.
pub const SRID_UNKNOWN: i32 = 0;

/// Highest SRID representable on the wire.
pub const SRID_MAXIMUM: i32 = 999_999;

/// Upper end of the user-assignable range; values above `SRID_MAXIMUM` are
/// folded into `SRID_USER_MAXIMUM + 1 ..= SRID_MAXIMUM - 1`.
pub const SRID_USER_MAXIMUM: i32 = 998_999;

/// Clamp an SRID into the storable range.
///
/// Non-positive values (other than [`SRID_UNKNOWN`] itself) become
/// [`SRID_UNKNOWN`]; values above [`SRID_MAXIMUM`] are folded into the user
/// range. Both adjustments emit a warning.
pub fn clamp_srid(srid: i32) -> i32 {
    if srid <= 0 {
        if srid != SRID_UNKNOWN {
            tracing::warn!(srid, "SRID converted to the unknown SRID value 0");
            return SRID_UNKNOWN;
        }
        srid
    } else if srid > SRID_MAXIMUM {
        // The -1 reduces the likelihood of fold collisions at the range edge.
        let folded = SRID_USER_MAXIMUM + 1 + (srid % (SRID_MAXIMUM - SRID_USER_MAXIMUM - 1));
        tracing::warn!(srid, folded, "SRID beyond SRID_MAXIMUM folded into user range");
        folded
    } else {
        srid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_unchanged() {
        assert_eq!(clamp_srid(4326), 4326);
        assert_eq!(clamp_srid(1), 1);
        assert_eq!(clamp_srid(SRID_MAXIMUM), SRID_MAXIMUM);
        assert_eq!(clamp_srid(SRID_UNKNOWN), SRID_UNKNOWN);
    }

    #[test]
    fn test_negative_becomes_unknown() {
        assert_eq!(clamp_srid(-1), SRID_UNKNOWN);
        assert_eq!(clamp_srid(i32::MIN), SRID_UNKNOWN);
    }

    #[test]
    fn test_overflow_folds_into_user_range() {
        let folded = clamp_srid(SRID_MAXIMUM + 5);
        assert!(folded > SRID_USER_MAXIMUM);
        assert!(folded < SRID_MAXIMUM);
    }

    #[test]
    fn test_idempotent() {
        for srid in [-7, 0, 1, 4326, SRID_MAXIMUM, SRID_MAXIMUM + 5, i32::MAX] {
            let once = clamp_srid(srid);
            assert_eq!(clamp_srid(once), once);
        }
    }
}
