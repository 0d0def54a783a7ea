//! Tunable thresholds for every pipeline stage.
//!
//! All pixel distances assume the photo has been fitted to the
//! [`VIEWPORT_WIDTH`]x[`VIEWPORT_HEIGHT`] viewport first. Values can be
//! overridden from `SET_*` environment variables via [`PipelineConfig::from_env`].

use crate::models::CARD_COUNT;

/// Gray level above which a pixel belongs to a card
pub const BINARY_THRESHOLD: u8 = 180;
/// Viewport the photo is fitted into before analysis
pub const VIEWPORT_WIDTH: u32 = 800;
/// Viewport the photo is fitted into before analysis
pub const VIEWPORT_HEIGHT: u32 = 600;

/// Fitted rectangles must exceed this on both sides
pub const MIN_CARD_SIDE: f32 = 100.0;

/// Erosion side of the stripe-filling opening
pub const FILL_EROSION_SIZE: usize = 9;
/// Dilation side of the stripe-filling opening
pub const FILL_DILATION_SIZE: usize = 7;
/// Count scan stops this far above the card's lower edge
pub const COUNT_EDGE_MARGIN: usize = 10;
/// First-to-second transition distance separating solid from hollow
pub const COUNT_SOLID_GAP: usize = 10;

/// Half-length of each texture sample strip
pub const TEXTURE_STRIP_HALF_LENGTH: usize = 8;
/// Vertical offset of the two strips on a two-symbol card
pub const TEXTURE_PAIR_OFFSET: usize = 20;
/// Mean below this reads as solid, otherwise outline
pub const TEXTURE_MEAN_THRESHOLD: f64 = 127.0;

/// Color strip is trimmed by this much at each end
pub const COLOR_STRIP_MARGIN: usize = 10;

/// Card crop is trimmed by this much on each side
pub const SHAPE_CROP_MARGIN: usize = 10;
/// Speckle-removal opening side
pub const SHAPE_DESPECKLE_SIZE: usize = 3;
/// Hough accumulator votes needed for a candidate line
pub const LINE_VOTE_THRESHOLD: u32 = 30;
/// Shortest accepted line segment
pub const LINE_MIN_LENGTH: usize = 30;
/// Largest gap bridged inside one segment
pub const LINE_MAX_GAP: usize = 5;
/// Contours with this many points or fewer are noise
pub const CONTOUR_MIN_POINTS: usize = 50;
/// Mean circularity above this reads as an ellipse
pub const CIRCULARITY_THRESHOLD: f64 = 0.65;

/// Closed hue/saturation/value box on byte-scaled HSV
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvRange {
    /// Inclusive hue interval
    pub hue: (u8, u8),
    /// Inclusive saturation interval
    pub saturation: (u8, u8),
    /// Inclusive value interval
    pub value: (u8, u8),
}

impl HsvRange {
    /// Whether an HSV sample falls inside the box
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        (self.hue.0..=self.hue.1).contains(&h)
            && (self.saturation.0..=self.saturation.1).contains(&s)
            && (self.value.0..=self.value.1).contains(&v)
    }
}

/// How the localizer turns the mask into card rectangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocateStrategy {
    /// External contours fitted with minimum-area rectangles
    #[default]
    Contours,
    /// Bounding boxes of labeled connected components
    Components,
}

/// Card localizer settings
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    /// Rectangle extraction method
    pub strategy: LocateStrategy,
    /// Both rectangle sides must exceed this
    pub min_side: f32,
    /// Number of cards the layout must contain
    pub expected_cards: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            strategy: LocateStrategy::Contours,
            min_side: MIN_CARD_SIDE,
            expected_cards: CARD_COUNT,
        }
    }
}

/// Count classifier settings
#[derive(Debug, Clone, PartialEq)]
pub struct CountConfig {
    /// Erosion side of the stripe-filling opening
    pub erosion_size: usize,
    /// Dilation side of the stripe-filling opening
    pub dilation_size: usize,
    /// Scan stops this far above the lower edge
    pub edge_margin: usize,
    /// Two-transition gap above this means two solid symbols
    pub solid_gap: usize,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            erosion_size: FILL_EROSION_SIZE,
            dilation_size: FILL_DILATION_SIZE,
            edge_margin: COUNT_EDGE_MARGIN,
            solid_gap: COUNT_SOLID_GAP,
        }
    }
}

/// Texture classifier settings
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    /// Half-length of each horizontal strip
    pub strip_half_length: usize,
    /// Vertical offset of the strips on two-symbol cards
    pub pair_offset: usize,
    /// Mean threshold separating solid from outline
    pub mean_threshold: f64,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            strip_half_length: TEXTURE_STRIP_HALF_LENGTH,
            pair_offset: TEXTURE_PAIR_OFFSET,
            mean_threshold: TEXTURE_MEAN_THRESHOLD,
        }
    }
}

/// Color classifier settings
#[derive(Debug, Clone, PartialEq)]
pub struct ColorConfig {
    /// Strip trim at each end
    pub strip_margin: usize,
    /// Red box (evaluated as two hue bands)
    pub red: [HsvRange; 2],
    /// Green box
    pub green: HsvRange,
    /// Purple box
    pub purple: HsvRange,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            strip_margin: COLOR_STRIP_MARGIN,
            red: [
                HsvRange {
                    hue: (0, 10),
                    saturation: (50, 255),
                    value: (50, 255),
                },
                HsvRange {
                    hue: (245, 255),
                    saturation: (50, 255),
                    value: (50, 255),
                },
            ],
            green: HsvRange {
                hue: (64, 106),
                saturation: (50, 255),
                value: (50, 255),
            },
            purple: HsvRange {
                hue: (180, 230),
                saturation: (10, 255),
                value: (10, 200),
            },
        }
    }
}

/// Shape classifier settings
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeConfig {
    /// Erosion side of the stripe-filling opening
    pub erosion_size: usize,
    /// Dilation side of the stripe-filling opening
    pub dilation_size: usize,
    /// Crop trim on each side
    pub crop_margin: usize,
    /// Speckle-removal opening side
    pub despeckle_size: usize,
    /// Line segment detector settings
    pub lines: LineConfig,
    /// Contours must have more points than this
    pub contour_min_points: usize,
    /// Mean circularity above this reads as an ellipse
    pub circularity_threshold: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            erosion_size: FILL_EROSION_SIZE,
            dilation_size: FILL_DILATION_SIZE,
            crop_margin: SHAPE_CROP_MARGIN,
            despeckle_size: SHAPE_DESPECKLE_SIZE,
            lines: LineConfig::default(),
            contour_min_points: CONTOUR_MIN_POINTS,
            circularity_threshold: CIRCULARITY_THRESHOLD,
        }
    }
}

/// Line segment detector settings (rho is 1 px and theta 1 degree)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineConfig {
    /// Accumulator votes for a candidate line
    pub vote_threshold: u32,
    /// Non-maximum suppression radius in the accumulator
    pub suppression_radius: u32,
    /// Shortest accepted segment
    pub min_length: usize,
    /// Largest bridged gap
    pub max_gap: usize,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            vote_threshold: LINE_VOTE_THRESHOLD,
            suppression_radius: 8,
            min_length: LINE_MIN_LENGTH,
            max_gap: LINE_MAX_GAP,
        }
    }
}

/// Settings for a full analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Gray level above which a pixel is foreground
    pub binary_threshold: u8,
    /// Card localizer
    pub locator: LocatorConfig,
    /// Count classifier
    pub count: CountConfig,
    /// Texture classifier
    pub texture: TextureConfig,
    /// Color classifier
    pub color: ColorConfig,
    /// Shape classifier
    pub shape: ShapeConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            binary_threshold: BINARY_THRESHOLD,
            locator: LocatorConfig::default(),
            count: CountConfig::default(),
            texture: TextureConfig::default(),
            color: ColorConfig::default(),
            shape: ShapeConfig::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
}

impl PipelineConfig {
    /// Defaults with `SET_*` environment overrides applied.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = parse_env::<u8>("SET_BINARY_THRESHOLD") {
            config.binary_threshold = v;
        }
        if let Some(v) = parse_env::<f32>("SET_MIN_CARD_SIDE") {
            config.locator.min_side = v;
        }
        if let Some(v) = parse_env::<String>("SET_LOCATE_STRATEGY") {
            match v.to_ascii_lowercase().as_str() {
                "components" => config.locator.strategy = LocateStrategy::Components,
                "contours" => config.locator.strategy = LocateStrategy::Contours,
                _ => {}
            }
        }
        if let Some(v) = parse_env::<usize>("SET_COUNT_SOLID_GAP") {
            config.count.solid_gap = v;
        }
        if let Some(v) = parse_env::<f64>("SET_TEXTURE_MEAN_THRESHOLD") {
            config.texture.mean_threshold = v;
        }
        if let Some(v) = parse_env::<u32>("SET_LINE_VOTE_THRESHOLD") {
            config.shape.lines.vote_threshold = v;
        }
        if let Some(v) = parse_env::<usize>("SET_LINE_MIN_LENGTH") {
            config.shape.lines.min_length = v;
        }
        if let Some(v) = parse_env::<f64>("SET_CIRCULARITY_THRESHOLD") {
            config.shape.circularity_threshold = v;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_range_bounds_are_inclusive() {
        let green = ColorConfig::default().green;
        assert!(green.contains(64, 50, 50));
        assert!(green.contains(106, 255, 255));
        assert!(!green.contains(63, 200, 200));
        assert!(!green.contains(80, 49, 200));
    }

    #[test]
    fn test_defaults_match_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.binary_threshold, 180);
        assert_eq!(config.locator.expected_cards, 12);
        assert_eq!(config.shape.lines.min_length, 30);
        assert_eq!(config.locator.strategy, LocateStrategy::Contours);
    }
}
