//! Colours shared by the SVG charts and the terminal viewer.

use plotters::style::RGBColor;

/// Per-country line colours (matplotlib's default cycle).
pub const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Cell colour for undefined coefficients.
pub const NAN_COLOR: RGBColor = RGBColor(200, 200, 200);

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

pub fn series_color(idx: usize) -> RGBColor {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

/// Diverging blue-white-red scale over `[-1, 1]`; `NaN` maps to grey.
pub fn coolwarm(v: f64) -> RGBColor {
    if v.is_nan() {
        return NAN_COLOR;
    }
    let v = v.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 { (COOL, MID, v + 1.0) } else { (MID, WARM, v) };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(7.0), coolwarm(1.0));
        assert_eq!(coolwarm(f64::NAN), NAN_COLOR);
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), series_color(SERIES_COLORS.len()));
    }
}
