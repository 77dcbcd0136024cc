//! Common helpers for proximo_core.

/// Scale a float color channel in [0, 1] to an 8-bit value, truncating.
/// Out-of-range and non-finite inputs clamp to the domain first.
#[inline]
pub fn channel_to_u8(c: f32) -> u8 {
    let c = if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 };
    (c * 255.0) as u8
}

/// Scale an RGB triple of floats in [0, 1] to 8-bit channels.
#[inline]
pub fn color_to_rgb8(color: [f32; 3]) -> [u8; 3] {
    [
        channel_to_u8(color[0]),
        channel_to_u8(color[1]),
        channel_to_u8(color[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_scaling_truncates() {
        assert_eq!(channel_to_u8(0.0), 0);
        assert_eq!(channel_to_u8(1.0), 255);
        // 0.5 * 255 = 127.5 -> truncates to 127
        assert_eq!(channel_to_u8(0.5), 127);
        assert_eq!(channel_to_u8(-1.0), 0);
        assert_eq!(channel_to_u8(2.0), 255);
        assert_eq!(channel_to_u8(f32::NAN), 0);
    }

    #[test]
    fn color_scaling_maps_each_channel() {
        assert_eq!(color_to_rgb8([1.0, 0.0, 0.5]), [255, 0, 127]);
    }
}
