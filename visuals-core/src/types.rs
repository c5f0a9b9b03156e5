use serde::Deserialize;

/// Identifier for a trajectory in a [`crate::presets::lorenz::LorenzSystem`].
///
/// This is an index into the trajectory and trail arrays, and is only
/// meaningful within the lifetime of a given preset instance.
pub type TrajectoryId = usize;

/// A drawing color as accepted by the preset configuration.
///
/// Mirrors the three shapes a creative-coding host usually accepts: a single
/// gray level, an RGB triple, or an RGBA quadruple. Deserializes from either
/// a bare integer or an array, so scene files can write `background_color = 0`
/// or `line_color = [255, 128, 0]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Gray(u8),
    Rgb([u8; 3]),
    Rgba([u8; 4]),
}

impl Color {
    pub const BLACK: Color = Color::Gray(0);
    pub const WHITE: Color = Color::Gray(255);

    /// Returns the color as `[r, g, b, a]`, with alpha 255 unless specified.
    pub fn to_rgba(self) -> [u8; 4] {
        match self {
            Color::Gray(v) => [v, v, v, 255],
            Color::Rgb([r, g, b]) => [r, g, b, 255],
            Color::Rgba(c) => c,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    pub fn with_alpha(self, alpha: u8) -> Color {
        let [r, g, b, _] = self.to_rgba();
        Color::Rgba([r, g, b, alpha])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_expands_to_opaque_rgba() {
        assert_eq!(Color::Gray(40).to_rgba(), [40, 40, 40, 255]);
        assert_eq!(Color::Rgb([1, 2, 3]).to_rgba(), [1, 2, 3, 255]);
    }

    #[test]
    fn with_alpha_keeps_channels() {
        assert_eq!(Color::Gray(10).with_alpha(50), Color::Rgba([10, 10, 10, 50]));
        assert_eq!(
            Color::Rgba([9, 8, 7, 6]).with_alpha(200),
            Color::Rgba([9, 8, 7, 200])
        );
    }

    #[test]
    fn deserializes_from_number_or_array() {
        #[derive(Deserialize)]
        struct Holder {
            a: Color,
            b: Color,
            c: Color,
        }

        let h: Holder = toml::from_str("a = 12\nb = [1, 2, 3]\nc = [1, 2, 3, 4]").unwrap();
        assert_eq!(h.a, Color::Gray(12));
        assert_eq!(h.b, Color::Rgb([1, 2, 3]));
        assert_eq!(h.c, Color::Rgba([1, 2, 3, 4]));
    }
}
