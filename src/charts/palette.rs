//! Chart colors shared by the interactive and the static renderer.

use crate::data::Status;

pub type Rgb = (u8, u8, u8);

pub const BROWN: Rgb = (0x8B, 0x6F, 0x47);
pub const TAN: Rgb = (0xC1, 0x9A, 0x6B);
pub const CREAM: Rgb = (0xF5, 0xE9, 0xDA);
pub const SAND: Rgb = (0xE8, 0xDC, 0xC8);
pub const UNDEFINED: Rgb = (200, 200, 200);

/// Yellow-orange-brown sequential scale used by the correlation heatmap.
pub const YL_OR_BR: [Rgb; 9] = [
    (0xFF, 0xFF, 0xE5),
    (0xFF, 0xF7, 0xBC),
    (0xFE, 0xE3, 0x91),
    (0xFE, 0xC4, 0x4F),
    (0xFE, 0x99, 0x29),
    (0xEC, 0x70, 0x14),
    (0xCC, 0x4C, 0x02),
    (0x99, 0x34, 0x04),
    (0x66, 0x25, 0x06),
];

pub fn status_color(status: Status) -> Rgb {
    match status {
        Status::NotCanceled => TAN,
        Status::Canceled => BROWN,
    }
}

/// Linear interpolation across evenly spaced color stops, `t` clamped to [0, 1].
pub fn ramp(stops: &[Rgb], t: f64) -> Rgb {
    match stops.len() {
        0 => UNDEFINED,
        1 => stops[0],
        n => {
            let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
            let pos = t * (n - 1) as f64;
            let i = (pos.floor() as usize).min(n - 2);
            let frac = pos - i as f64;
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
            let (a, b) = (stops[i], stops[i + 1]);
            (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
    }
}

/// Bar color for a country's cancellation percentage relative to the highest one.
pub fn country_color(pct: f64, max_pct: f64) -> Rgb {
    if pct.is_nan() || !(max_pct > 0.0) {
        return UNDEFINED;
    }
    ramp(&[CREAM, TAN, BROWN], pct / max_pct)
}

/// Heatmap cell color for `r`, with the ramp stretched over the matrix range `[lo, hi]`.
pub fn heat_color(r: f64, (lo, hi): (f64, f64)) -> Rgb {
    if r.is_nan() {
        return UNDEFINED;
    }
    let t = if hi > lo { (r - lo) / (hi - lo) } else { 0.5 };
    ramp(&YL_OR_BR, t)
}

/// Black or white, whichever reads better on `background`.
pub fn text_color_on(background: Rgb) -> Rgb {
    let (r, g, b) = background;
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance > 140.0 {
        (0, 0, 0)
    } else {
        (255, 255, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_hits_endpoints() {
        assert_eq!(ramp(&YL_OR_BR, 0.0), YL_OR_BR[0]);
        assert_eq!(ramp(&YL_OR_BR, 1.0), YL_OR_BR[8]);
        assert_eq!(ramp(&YL_OR_BR, 7.0), YL_OR_BR[8]);
    }

    #[test]
    fn ramp_interpolates_midpoint() {
        assert_eq!(ramp(&[(0, 0, 0), (200, 100, 50)], 0.5), (100, 50, 25));
    }

    #[test]
    fn heat_color_maps_extremes() {
        assert_eq!(heat_color(-1.0, (-1.0, 1.0)), YL_OR_BR[0]);
        assert_eq!(heat_color(1.0, (-1.0, 1.0)), YL_OR_BR[8]);
        assert_eq!(heat_color(f64::NAN, (-1.0, 1.0)), UNDEFINED);
    }

    #[test]
    fn heat_color_stretches_to_observed_range() {
        // Weak correlations still span the whole scale
        assert_eq!(heat_color(0.1, (0.1, 1.0)), YL_OR_BR[0]);
        assert_eq!(heat_color(1.0, (0.1, 1.0)), YL_OR_BR[8]);
        assert_ne!(heat_color(0.2, (0.1, 1.0)), heat_color(0.2, (-1.0, 1.0)));
        assert_eq!(heat_color(0.3, (0.3, 0.3)), ramp(&YL_OR_BR, 0.5));
    }

    #[test]
    fn text_contrast() {
        assert_eq!(text_color_on(YL_OR_BR[0]), (0, 0, 0));
        assert_eq!(text_color_on(YL_OR_BR[8]), (255, 255, 255));
    }
}
