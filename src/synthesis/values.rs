//! Parsing and conversion of raw computed-style values.
//!
//! Every parser here returns `None` for input it does not understand; a value
//! that cannot be parsed simply contributes nothing downstream.

use palette::{convert::FromColorUnclamped, Hsl, Srgb};
use std::fmt;

/// Saturation below which a color counts as neutral.
pub const NEUTRAL_SATURATION: f64 = 0.18;

/// An sRGB color with straight alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 0.999
    }
}

/// `rgb(R, G, B)` for opaque colors, `rgba(R, G, B, A)` with A rounded to three
/// decimals otherwise.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                format_decimal(self.a, 3)
            )
        }
    }
}

pub fn color_to_string(color: &Rgba) -> String {
    color.to_string()
}

/// Round to `places` decimals and print in shortest form (`0.5`, `0.125`, `1.0`).
pub fn format_decimal(value: f64, places: i32) -> String {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    format!("{:?}", rounded)
}

/// Round to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Parse `rgb()`/`rgba()` with comma-separated channels or 3/4/6/8-digit hex.
///
/// `transparent`, `none` and anything else unrecognized yield `None`.
pub fn parse_color(raw: &str) -> Option<Rgba> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || value == "transparent" || value == "none" {
        return None;
    }

    if value.starts_with("rgb") {
        return parse_rgb_function(&value);
    }
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    None
}

fn parse_rgb_function(value: &str) -> Option<Rgba> {
    let open = value.find('(')?;
    let head = &value[..open];
    if head != "rgb" && head != "rgba" {
        return None;
    }
    let close = value[open..].find(')')? + open;
    let parts: Vec<&str> = value[open + 1..close].split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }

    let channel = |part: &str| -> Option<u8> {
        let v: f64 = part.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        Some(v.trunc().clamp(0.0, 255.0) as u8)
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(alpha) => alpha.parse::<f64>().ok().filter(|a| a.is_finite())?,
        None => 1.0,
    };
    Some(Rgba { r, g, b, a })
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    let doubled = |c: char| byte(&format!("{c}{c}"));
    let chars: Vec<char> = hex.chars().collect();

    match chars.len() {
        3 | 4 => {
            let r = doubled(chars[0])?;
            let g = doubled(chars[1])?;
            let b = doubled(chars[2])?;
            let a = match chars.get(3) {
                Some(c) => f64::from(doubled(*c)?) / 255.0,
                None => 1.0,
            };
            Some(Rgba { r, g, b, a })
        }
        6 | 8 => {
            let r = byte(&hex[0..2])?;
            let g = byte(&hex[2..4])?;
            let b = byte(&hex[4..6])?;
            let a = if hex.len() == 8 {
                f64::from(byte(&hex[6..8])?) / 255.0
            } else {
                1.0
            };
            Some(Rgba { r, g, b, a })
        }
        _ => None,
    }
}

/// Convert 8-bit RGB to HSL: hue in degrees `[0, 360)`, saturation and
/// lightness in `[0, 1]`. Achromatic input yields `h = 0, s = 0`.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    if r == g && g == b {
        return (0.0, 0.0, f64::from(r) / 255.0);
    }
    let srgb: Srgb<f64> = Srgb::new(r, g, b).into_format();
    let hsl: Hsl<palette::encoding::Srgb, f64> = Hsl::from_color_unclamped(srgb);
    (
        hsl.hue.into_positive_degrees(),
        hsl.saturation,
        hsl.lightness,
    )
}

/// Low-chroma colors, including all grays, are neutral regardless of hue.
pub fn is_neutral(color: &Rgba) -> bool {
    is_neutral_with(color, NEUTRAL_SATURATION)
}

pub fn is_neutral_with(color: &Rgba, saturation_threshold: f64) -> bool {
    let (_, s, _) = rgb_to_hsl(color.r, color.g, color.b);
    s < saturation_threshold
}

/// Parse a CSS length into pixels.
///
/// `px` and bare numbers are taken as-is, `rem`/`em` scale by
/// `root_font_size`. Keywords and percentages have no context-free pixel value.
pub fn parse_length(raw: &str, root_font_size: f64) -> Option<f64> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || matches!(value.as_str(), "auto" | "normal" | "none") {
        return None;
    }
    if value.ends_with('%') {
        return None;
    }
    if let Some(num) = value.strip_suffix("px") {
        return parse_finite(num);
    }
    if let Some(num) = value.strip_suffix("rem") {
        return parse_finite(num).map(|v| v * root_font_size);
    }
    if let Some(num) = value.strip_suffix("em") {
        return parse_finite(num).map(|v| v * root_font_size);
    }
    parse_finite(&value)
}

/// Parse a CSS time into milliseconds.
pub fn parse_duration(raw: &str) -> Option<f64> {
    let value = raw.trim().to_ascii_lowercase();
    if let Some(num) = value.strip_suffix("ms") {
        return parse_finite(num);
    }
    if let Some(num) = value.strip_suffix('s') {
        return parse_finite(num).map(|v| v * 1000.0);
    }
    None
}

fn parse_finite(num: &str) -> Option<f64> {
    num.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn relative_luminance(rgb: [u8; 3]) -> f64 {
    let channel = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(rgb[0]) + 0.7152 * channel(rgb[1]) + 0.0722 * channel(rgb[2])
}

/// WCAG contrast ratio between two opaque colors, in `[1, 21]`.
pub fn contrast_ratio(fg: [u8; 3], bg: [u8; 3]) -> f64 {
    let lum_fg = relative_luminance(fg);
    let lum_bg = relative_luminance(bg);
    let lighter = lum_fg.max(lum_bg);
    let darker = lum_fg.min(lum_bg);
    (lighter + 0.05) / (darker + 0.05)
}

/// Collapse whitespace runs, trim, and keep at most `limit` characters.
pub fn normalize_text(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_rgb_and_rgba_functions() {
        assert_eq!(
            parse_color("rgb(255, 0, 10)"),
            Some(Rgba {
                r: 255,
                g: 0,
                b: 10,
                a: 1.0
            })
        );
        let translucent = parse_color("rgba(0, 0, 0, 0.5)").unwrap();
        assert_eq!(translucent.rgb(), [0, 0, 0]);
        assert!((translucent.a - 0.5).abs() < f64::EPSILON);
        assert_eq!(parse_color("RGB(12.7, 3, 4)").map(|c| c.r), Some(12));
    }

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(parse_color("#fff").map(|c| c.rgb()), Some([255, 255, 255]));
        let short_alpha = parse_color("#0008").unwrap();
        assert_eq!(short_alpha.rgb(), [0, 0, 0]);
        assert!((short_alpha.a - 136.0 / 255.0).abs() < 1e-9);
        assert_eq!(parse_color("#1a2B3c").map(|c| c.rgb()), Some([26, 43, 60]));
        let long_alpha = parse_color("#ff000080").unwrap();
        assert!((long_alpha.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn unparseable_colors_are_none() {
        for raw in [
            "",
            "transparent",
            "none",
            "NONE",
            "red",
            "#12345",
            "#ggg",
            "rgb(1, 2)",
            "rgb(0 0 0 / 50%)",
            "hsl(10, 20%, 30%)",
            "rgba(1, 2, 3, 50%)",
        ] {
            assert!(parse_color(raw).is_none(), "expected None for {raw:?}");
        }
    }

    #[test]
    fn color_strings_keep_alpha_only_when_translucent() {
        let opaque = parse_color("#0a0b0c").unwrap();
        assert_eq!(color_to_string(&opaque), "rgb(10, 11, 12)");
        let translucent = parse_color("rgba(1, 2, 3, 0.12345)").unwrap();
        assert_eq!(translucent.to_string(), "rgba(1, 2, 3, 0.123)");
        assert_eq!(format_decimal(0.5, 3), "0.5");
        assert_eq!(format_decimal(1.0, 3), "1.0");
    }

    #[test]
    fn hsl_handles_gray_and_primary_colors() {
        assert_eq!(rgb_to_hsl(128, 128, 128).0, 0.0);
        assert_eq!(rgb_to_hsl(128, 128, 128).1, 0.0);
        let (h, s, l) = rgb_to_hsl(255, 0, 0);
        assert!(h.abs() < 1e-6);
        assert!((s - 1.0).abs() < 1e-6);
        assert!((l - 0.5).abs() < 1e-6);
        let (h, _, _) = rgb_to_hsl(0, 0, 255);
        assert!((h - 240.0).abs() < 1e-6);
    }

    #[test]
    fn neutrality_uses_saturation_only() {
        assert!(is_neutral(&parse_color("#777777").unwrap()));
        assert!(is_neutral(&parse_color("rgb(100, 104, 110)").unwrap()));
        assert!(!is_neutral(&parse_color("#3366ff").unwrap()));
    }

    #[test]
    fn lengths_resolve_to_pixels() {
        assert_eq!(parse_length("1.5rem", 16.0), Some(24.0));
        assert_eq!(parse_length("2em", 10.0), Some(20.0));
        assert_eq!(parse_length("12px", 16.0), Some(12.0));
        assert_eq!(parse_length(" 7 ", 16.0), Some(7.0));
        assert_eq!(parse_length("-4px", 16.0), Some(-4.0));
        for raw in ["50%", "auto", "normal", "none", "", "calc(1px + 2px)", "px"] {
            assert_eq!(parse_length(raw, 16.0), None, "expected None for {raw:?}");
        }
    }

    #[test]
    fn durations_resolve_to_milliseconds() {
        assert_eq!(parse_duration("200ms"), Some(200.0));
        assert_eq!(parse_duration("0.3s"), Some(300.0));
        assert_eq!(parse_duration("0.2s, 0.4s"), None);
        assert_eq!(parse_duration("fast"), None);
        assert_eq!(parse_duration("12"), None);
    }

    #[test]
    fn contrast_of_black_on_white_is_21() {
        let ratio = contrast_ratio([0, 0, 0], [255, 255, 255]);
        assert!((ratio - 21.0).abs() < 1e-9);
        assert_eq!(
            contrast_ratio([255, 255, 255], [0, 0, 0]),
            contrast_ratio([0, 0, 0], [255, 255, 255])
        );
    }

    #[test]
    fn text_is_collapsed_and_truncated() {
        assert_eq!(normalize_text("  Get \n  Started\t", 140), "Get Started");
        assert_eq!(normalize_text("abcdef", 3), "abc");
    }

    proptest! {
        #[test]
        fn six_digit_hex_round_trips_to_rgb(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let hex = format!("#{:02X}{:02X}{:02X}", r, g, b);
            let parsed = parse_color(&hex).expect("valid hex");
            prop_assert_eq!(color_to_string(&parsed), format!("rgb({}, {}, {})", r, g, b));
        }

        #[test]
        fn contrast_against_itself_is_one(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let ratio = contrast_ratio([r, g, b], [r, g, b]);
            prop_assert!((ratio - 1.0).abs() < 1e-12);
        }

        #[test]
        fn hsl_components_stay_in_range(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            prop_assert!((0.0..=360.0).contains(&h));
            prop_assert!((0.0..=1.0 + 1e-9).contains(&s));
            prop_assert!((0.0..=1.0 + 1e-9).contains(&l));
        }
    }
}
