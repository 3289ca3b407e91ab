/// Map a raw channel count onto the `[0, 1]` range spanned by the black and
/// white reference points.
///
/// Readings at or below `black` saturate to `0.0`, readings at or above
/// `white` to `1.0`. The calibration ordering is not checked here, see
/// [`Calibration::validate`](crate::Calibration::validate).
#[inline]
pub fn normalize(raw: u16, black: u16, white: u16) -> f32 {
    if raw <= black {
        return 0.0;
    }
    if raw >= white {
        return 1.0;
    }
    f32::from(raw - black) / f32::from(white - black)
}

/// Scale a fraction to a byte, truncating (no gamma)
#[inline]
pub fn fraction_to_byte(fraction: f32) -> u8 {
    (fraction.clamp(0.0, 1.0) * 255.0) as u8
}
