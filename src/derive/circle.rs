//! Circle derivation: diameter normalization.

use crate::error::DeriveError;
use crate::model::GeometryRecord;

/// Fill in `Var1` (the diameter) from either `radius` or `diam`.
pub fn derive_circle(record: &mut GeometryRecord) -> Result<(), DeriveError> {
    if let Some(radius) = record.number("radius") {
        record.set_number("Var1", 2.0 * radius);
    } else if let Some(diam) = record.number("diam") {
        record.set_number("Var1", diam);
    } else {
        return Err(DeriveError::Underdetermined {
            subject: "circle diameter",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::test_support::empty_record;

    #[test]
    fn test_radius_is_doubled() {
        let mut record = empty_record("CIR");
        record.set_number("radius", 5.0);
        derive_circle(&mut record).unwrap();
        assert_eq!(record.number("Var1"), Some(10.0));
    }

    #[test]
    fn test_diameter_passes_through() {
        let mut record = empty_record("CIR");
        record.set_number("diam", 7.0);
        derive_circle(&mut record).unwrap();
        assert_eq!(record.number("Var1"), Some(7.0));
    }

    #[test]
    fn test_radius_wins_over_diameter() {
        let mut record = empty_record("CIR");
        record.set_number("radius", 5.0);
        record.set_number("diam", 7.0);
        derive_circle(&mut record).unwrap();
        assert_eq!(record.number("Var1"), Some(10.0));
    }

    #[test]
    fn test_neither_radius_nor_diameter_fails() {
        let mut record = empty_record("CIR");
        let err = derive_circle(&mut record).unwrap_err();
        assert!(matches!(err, DeriveError::Underdetermined { .. }));
    }
}
