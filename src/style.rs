use hsl::HSL;
use plotters::style::RGBColor;

/// An sRGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Same hue, with lightness moved `amount` of the way towards white.
    pub fn lighten(self, amount: f64) -> Self {
        let mut hsl = HSL::from_rgb(&[self.0, self.1, self.2]);
        hsl.l += (1.0 - hsl.l) * amount.clamp(0.0, 1.0);
        let (r, g, b) = hsl.to_rgb();
        Color(r, g, b)
    }
}

impl From<Color> for RGBColor {
    fn from(c: Color) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Case-insensitive substring rule.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    needle: String,
    pub color: Color,
}

impl StyleRule {
    pub fn new(needle: &str, color: Color) -> Self {
        StyleRule {
            needle: needle.to_lowercase(),
            color,
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        label.to_lowercase().contains(&self.needle)
    }
}

const SERIAL_GRAY: Color = Color(0xB0, 0xB0, 0xB0);
const OPENMP_BLUE: Color = Color(0x1f, 0x77, 0xb4);
const MPI_GREEN: Color = Color(0x2c, 0xa0, 0x2c);
const CUDA_RED: Color = Color(0xd6, 0x27, 0x28);
const NEUTRAL_GRAY: Color = Color(0x7f, 0x7f, 0x7f);

/// Label to color mapping: exact labels first, then the ordered substring
/// rules (first match wins), then the default.
///
/// The policy is a plain value; nothing is cached between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct StylePolicy {
    exact: Vec<(String, Color)>,
    rules: Vec<StyleRule>,
    default: Color,
    baseline: Color,
}

impl Default for StylePolicy {
    fn default() -> Self {
        StylePolicy::new(NEUTRAL_GRAY, SERIAL_GRAY)
            .with_exact("Serial", SERIAL_GRAY)
            .with_exact("OpenMP (8 threads)", OPENMP_BLUE)
            .with_exact("MPI (8 processes)", MPI_GREEN)
            .with_exact("CUDA (256 blocks)", CUDA_RED)
            .with_rule("serial", SERIAL_GRAY)
            .with_rule("openmp", OPENMP_BLUE)
            .with_rule("mpi", MPI_GREEN)
            .with_rule("cuda", CUDA_RED)
    }
}

impl StylePolicy {
    /// An empty policy: everything resolves to `default`, a leading serial row to `baseline`.
    pub fn new(default: Color, baseline: Color) -> Self {
        StylePolicy {
            exact: Vec::new(),
            rules: Vec::new(),
            default,
            baseline,
        }
    }

    pub fn with_exact(mut self, label: &str, color: Color) -> Self {
        self.exact.push((label.to_string(), color));
        self
    }

    /// Append a substring rule. Rules are evaluated in insertion order.
    pub fn with_rule(mut self, needle: &str, color: Color) -> Self {
        self.rules.push(StyleRule::new(needle, color));
        self
    }

    pub fn default_color(&self) -> Color {
        self.default
    }

    pub fn baseline_color(&self) -> Color {
        self.baseline
    }

    /// Color for `label` sitting at chart position `index`.
    pub fn resolve(&self, label: &str, index: usize) -> Color {
        if index == 0 && label.to_lowercase().contains(crate::baseline::BASELINE_LABEL) {
            return self.baseline;
        }
        self.exact
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
            .or_else(|| self.rules.iter().find(|r| r.matches(label)).map(|r| r.color))
            .unwrap_or(self.default)
    }

    /// Colors for a whole category axis, in order.
    pub fn resolve_all<S: AsRef<str>>(&self, labels: &[S]) -> Vec<Color> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| self.resolve(l.as_ref(), i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(Color::from_hex("#1f77b4"), Some(OPENMP_BLUE));
        assert_eq!(OPENMP_BLUE.to_hex(), "#1f77b4");
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
    }

    #[test]
    fn lighten_moves_towards_white() {
        let light = CUDA_RED.lighten(0.6);
        assert!(light.0 >= CUDA_RED.0 && light.1 > CUDA_RED.1 && light.2 > CUDA_RED.2);
        assert_eq!(Color(0xff, 0xff, 0xff).lighten(0.5), Color(0xff, 0xff, 0xff));
    }
}
