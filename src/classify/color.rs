use super::{check_index, classify_grid, window};
use crate::config::ColorConfig;
use crate::error::{Result, SetVisionError};
use crate::models::{CardBox, CardGrid, Color, Grid};
use crate::utils::hsv::HsvImage;
use tracing::trace;

/// Color whose HSV box contains the sample, red checked first
pub fn match_color(h: u8, s: u8, v: u8, config: &ColorConfig) -> Option<Color> {
    if config.red.iter().any(|range| range.contains(h, s, v)) {
        Some(Color::Red)
    } else if config.green.contains(h, s, v) {
        Some(Color::Green)
    } else if config.purple.contains(h, s, v) {
        Some(Color::Purple)
    } else {
        None
    }
}

/// First colored sample walking down the card's center column.
///
/// The strip runs from `strip_margin` below the top edge to `strip_margin`
/// above the bottom edge. `None` when no sample falls in any color box.
pub fn classify_card(hsv: &HsvImage, card: &CardBox, config: &ColorConfig) -> Result<Option<Color>> {
    check_index(card.center_col, hsv.width(), "color column")?;
    let reach = card.half_height().saturating_sub(config.strip_margin);
    let rows = window(card.center_row, reach, reach, hsv.height(), "color strip")?;
    let col = card.center_col;
    Ok(rows
        .map(|y| hsv.get(col, y))
        .find_map(|(h, s, v)| match_color(h, s, v, config)))
}

/// Classify ink colors; a card without any colored sample is ambiguous
pub fn classify(hsv: &HsvImage, cards: &CardGrid, config: &ColorConfig) -> Result<Grid<Color>> {
    classify_grid(cards, |pos, card| {
        let color = classify_card(hsv, card, config)?;
        trace!(%pos, ?color, "color strip");
        color.ok_or_else(|| SetVisionError::ClassificationAmbiguity {
            classifier: "color",
            pos,
            detail: "no sample on the center column matched a color".to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hsv::rgb_to_hsv;

    const WIDTH: usize = 20;
    const HEIGHT: usize = 100;

    fn card() -> CardBox {
        CardBox {
            center_row: 50,
            center_col: 10,
            width: 15,
            height: 80,
        }
    }

    /// White column with colored rows
    fn image(painted: &[(usize, [u8; 3])]) -> HsvImage {
        let mut rgb = vec![255u8; WIDTH * HEIGHT * 3];
        for &(y, color) in painted {
            let i = (y * WIDTH + 10) * 3;
            rgb[i..i + 3].copy_from_slice(&color);
        }
        rgb_to_hsv(&rgb, WIDTH, HEIGHT).unwrap()
    }

    #[test]
    fn test_match_color_boxes() {
        let config = ColorConfig::default();
        assert_eq!(match_color(0, 255, 255, &config), Some(Color::Red));
        assert_eq!(match_color(250, 200, 200, &config), Some(Color::Red));
        assert_eq!(match_color(85, 255, 200, &config), Some(Color::Green));
        assert_eq!(match_color(212, 255, 128, &config), Some(Color::Purple));
        // Bright purple exceeds the value ceiling
        assert_eq!(match_color(212, 255, 230, &config), None);
        assert_eq!(match_color(0, 0, 255, &config), None);
        assert_eq!(match_color(150, 255, 255, &config), None);
    }

    #[test]
    fn test_first_colored_sample_wins() {
        let config = ColorConfig::default();
        let hsv = image(&[(30, [0, 200, 0]), (60, [255, 0, 0])]);
        assert_eq!(classify_card(&hsv, &card(), &config), Ok(Some(Color::Green)));
        let hsv = image(&[(45, [128, 0, 128])]);
        assert_eq!(classify_card(&hsv, &card(), &config), Ok(Some(Color::Purple)));
    }

    #[test]
    fn test_margin_is_skipped() {
        // Strip is rows 20..80; row 15 lies in the trimmed margin
        let config = ColorConfig::default();
        let hsv = image(&[(15, [255, 0, 0])]);
        assert_eq!(classify_card(&hsv, &card(), &config), Ok(None));
        let hsv = image(&[(79, [255, 0, 0])]);
        assert_eq!(classify_card(&hsv, &card(), &config), Ok(Some(Color::Red)));
    }

    #[test]
    fn test_uncolored_card_is_ambiguous() {
        let cards = Grid::from_fn(|_| card());
        let hsv = image(&[]);
        let err = classify(&hsv, &cards, &ColorConfig::default());
        assert!(matches!(
            err,
            Err(SetVisionError::ClassificationAmbiguity {
                classifier: "color",
                ..
            })
        ));
    }

    #[test]
    fn test_strip_outside_image() {
        let tall = CardBox {
            height: 140,
            ..card()
        };
        let hsv = image(&[]);
        assert!(matches!(
            classify_card(&hsv, &tall, &ColorConfig::default()),
            Err(SetVisionError::InputShape { .. })
        ));
    }
}
