//! Cone derivation: multi-case apex/height reconstruction.
//!
//! A cone is fully determined by an apex, a half-angle, an orientation
//! and one length: either `h1` (measured from the apex) or the radius
//! `r2` at the far end, from which a height is back-solved through the
//! half-angle. The two input modes are mutually exclusive; anything
//! else is rejected rather than guessed.

use crate::error::DeriveError;
use crate::model::GeometryRecord;

use super::{parse_nonblank, required_number};

/// Tangents below this magnitude cannot back-solve a height.
const TANGENT_EPS: f64 = 1e-12;

/// Derive the cone's output attributes.
pub fn derive_cone(record: &mut GeometryRecord) -> Result<(), DeriveError> {
    let x = required_number(record, "X")?;
    let y = required_number(record, "Y")?;
    let z = required_number(record, "Z")?;
    let i = required_number(record, "i")?;
    let j = required_number(record, "j")?;
    let k = required_number(record, "k")?;

    let half_angle = if let Some(half) = record.number("halfangle") {
        record.set_number("Var1", 2.0 * half);
        half
    } else if let Some(angle) = record.number("angle") {
        record.set_number("Var1", angle);
        // back-fill for later calculations
        record.set_number("halfangle", 0.5 * angle);
        0.5 * angle
    } else {
        return Err(DeriveError::Underdetermined {
            subject: "cone angle",
        });
    };

    // h1 takes priority; a blank or unparsable h1 falls through to r2.
    if let Some(h1) = parse_nonblank(record.text("h1")) {
        // h1, the half-angle, the orientation and the apex position define
        // a distinct cone. The opposite end cannot be derived without a
        // relation between h1 & h2 or r1 & r2, so position and orientation
        // stay untouched.
        record.set_number("Attr1", h1);
        return Ok(());
    }

    let Some(r2) = parse_nonblank(record.text("r2")) else {
        return Err(DeriveError::Underdetermined { subject: "cone" });
    };

    // r = h * tan(halfangle)
    let tan_half = half_angle.to_radians().tan();
    if !tan_half.is_finite() || tan_half.abs() < TANGENT_EPS {
        return Err(DeriveError::InvalidAngle);
    }
    let h2 = r2 / tan_half;
    record.set_number("Var2", h2);

    // The input may not be normed.
    let norm = (i * i + j * j + k * k).sqrt();
    if !norm.is_finite() || norm == 0.0 {
        return Err(DeriveError::DegenerateOrientation);
    }

    // cone top = position + h2 along the normed bottom -> top direction
    record.set_number("X", x + h2 * i / norm);
    record.set_number("Y", y + h2 * j / norm);
    record.set_number("Z", z + h2 * k / norm);

    // orientation has to be inverted to top -> bottom
    record.set_number("i", -i);
    record.set_number("j", -j);
    record.set_number("k", -k);

    Ok(())
}
