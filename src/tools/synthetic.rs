//! Synthetic 3x4 card layouts with known attributes.
//!
//! Cards are 120x160 white rectangles on a dark backdrop, laid out with 20 px
//! gaps. Symbols are drawn from signed depth functions (distance inside the
//! shape), so outlines, stripes and solid fills share one geometry.

use crate::models::{
    AttributeGrid, Attributes, CardBox, Color, Count, GRID_COLS, GRID_ROWS, Grid, GridPos, Shape,
    Texture,
};
use image::{Rgb, RgbImage};
use rand::Rng;
use rand::seq::SliceRandom;

/// Rendered card width in pixels
pub const CARD_WIDTH: u32 = 120;
/// Rendered card height in pixels
pub const CARD_HEIGHT: u32 = 160;
/// Gap between cards and around the layout
pub const CARD_GAP: u32 = 20;
/// Width of a rendered layout
pub const LAYOUT_WIDTH: u32 = CARD_GAP + GRID_COLS as u32 * (CARD_WIDTH + CARD_GAP);
/// Height of a rendered layout
pub const LAYOUT_HEIGHT: u32 = CARD_GAP + GRID_ROWS as u32 * (CARD_HEIGHT + CARD_GAP);

const BACKDROP: [u8; 3] = [40, 40, 40];
const CARD_FACE: [u8; 3] = [255, 255, 255];

/// Outline stroke width
const STROKE: f32 = 3.0;
/// Stripe period along x; the first half of each period is inked
const STRIPE_PERIOD: i32 = 4;

/// Top-left pixel of the card at `pos`
pub fn card_origin(pos: GridPos) -> (u32, u32) {
    (
        CARD_GAP + pos.col as u32 * (CARD_WIDTH + CARD_GAP),
        CARD_GAP + pos.row as u32 * (CARD_HEIGHT + CARD_GAP),
    )
}

/// The box the localizer reports for the card at `pos`
pub fn card_box(pos: GridPos) -> CardBox {
    let (x0, y0) = card_origin(pos);
    CardBox {
        center_row: (y0 + (CARD_HEIGHT - 1) / 2) as usize,
        center_col: (x0 + (CARD_WIDTH - 1) / 2) as usize,
        width: (CARD_WIDTH - 1) as usize,
        height: (CARD_HEIGHT - 1) as usize,
    }
}

fn ink(color: Color) -> [u8; 3] {
    match color {
        Color::Red => [255, 0, 0],
        Color::Green => [0, 200, 0],
        Color::Purple => [128, 0, 128],
    }
}

/// Vertical symbol offsets from the card center
fn symbol_offsets(count: Count) -> &'static [i32] {
    match count {
        Count::One => &[0],
        Count::Two => &[-20, 20],
        Count::Three => &[-40, 0, 40],
    }
}

/// Signed distance inside the symbol (negative outside)
fn depth(shape: Shape, dx: f32, dy: f32) -> f32 {
    match shape {
        Shape::Diamond => {
            let (a, b) = (45.0f32, 14.0f32);
            (1.0 - dx.abs() / a - dy.abs() / b) * a * b / a.hypot(b)
        }
        Shape::Ellipse => 14.0 - (dx.abs() - 16.0).max(0.0).hypot(dy),
        Shape::Wave => {
            let crest = 5.0 * (std::f32::consts::TAU * dx / 30.0).sin();
            (9.0 - (dy - crest).abs()).min(45.0 - dx.abs())
        }
    }
}

fn inked(texture: Texture, depth: f32, dx: i32) -> bool {
    if depth < 0.0 {
        return false;
    }
    match texture {
        Texture::Solid => true,
        Texture::Outline => depth < STROKE,
        Texture::Striped => depth < STROKE || dx.rem_euclid(STRIPE_PERIOD) < STRIPE_PERIOD / 2,
    }
}

fn draw_card(image: &mut RgbImage, pos: GridPos, attrs: &Attributes) {
    let (x0, y0) = card_origin(pos);
    let center = card_box(pos);
    let color = Rgb(ink(attrs.color));
    for y in y0..y0 + CARD_HEIGHT {
        for x in x0..x0 + CARD_WIDTH {
            let dx = x as i32 - center.center_col as i32;
            let painted = symbol_offsets(attrs.count).iter().any(|&offset| {
                let dy = y as i32 - center.center_row as i32 - offset;
                inked(attrs.texture, depth(attrs.shape, dx as f32, dy as f32), dx)
            });
            let pixel = if painted { color } else { Rgb(CARD_FACE) };
            image.put_pixel(x, y, pixel);
        }
    }
}

/// Render the layout for `attributes`, one card per grid cell
pub fn render_layout(attributes: &AttributeGrid) -> RgbImage {
    let mut image = RgbImage::from_pixel(LAYOUT_WIDTH, LAYOUT_HEIGHT, Rgb(BACKDROP));
    for (pos, attrs) in attributes.iter() {
        draw_card(&mut image, pos, attrs);
    }
    image
}

/// Twelve distinct cards drawn from the full 81-card deck
pub fn random_layout<R: Rng>(rng: &mut R) -> AttributeGrid {
    let mut deck: Vec<Attributes> = Vec::new();
    for count in Count::ALL {
        for texture in Texture::ALL {
            for color in Color::ALL {
                for shape in Shape::ALL {
                    deck.push(Attributes::new(count, texture, color, shape));
                }
            }
        }
    }
    deck.shuffle(rng);
    Grid::from_fn(|pos| deck[pos.index()])
}
