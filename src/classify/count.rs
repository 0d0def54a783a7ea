use super::{check_index, classify_grid, window};
use crate::config::CountConfig;
use crate::error::{Result, SetVisionError};
use crate::models::{CardBox, CardGrid, Count, Grid, GridPos, Raster};
use tracing::trace;

/// Rows where the center column of the card changes value, scanning down
/// from just below the card center to `edge_margin` above its lower edge.
pub fn transitions(filled: &Raster, card: &CardBox, edge_margin: usize) -> Result<Vec<usize>> {
    check_index(card.center_col, filled.width(), "count column")?;
    let below = card.half_height().checked_sub(edge_margin).ok_or_else(|| {
        SetVisionError::InputShape {
            detail: format!(
                "card height {} leaves no room for a {edge_margin} px margin",
                card.height
            ),
        }
    })?;
    let rows = window(card.center_row, 0, below, filled.height(), "count scan")?;
    let col = card.center_col;
    Ok(rows
        .skip(1)
        .filter(|&y| filled.get(col, y) != filled.get(col, y - 1))
        .collect())
}

/// Map a transition pattern to a symbol count.
///
/// Solid symbols give one transition per boundary crossed below the center,
/// hollow ones two. Two transitions are two solid symbols when they are far
/// apart, otherwise the two walls of one hollow symbol.
pub fn count_from_transitions(rows: &[usize], solid_gap: usize) -> Option<Count> {
    match rows.len() {
        3 | 6 => Some(Count::Three),
        4 => Some(Count::Two),
        1 => Some(Count::One),
        2 if rows[1] - rows[0] > solid_gap => Some(Count::Two),
        2 => Some(Count::One),
        _ => None,
    }
}

/// Count the symbols on one card from its downward transition scan
pub fn classify_card(
    filled: &Raster,
    card: &CardBox,
    pos: GridPos,
    config: &CountConfig,
) -> Result<Count> {
    let rows = transitions(filled, card, config.edge_margin)?;
    trace!(%pos, transitions = rows.len(), ?rows, "count scan");
    count_from_transitions(&rows, config.solid_gap).ok_or_else(|| {
        SetVisionError::ClassificationAmbiguity {
            classifier: "count",
            pos,
            detail: format!("{} transitions at rows {rows:?}", rows.len()),
        }
    })
}

/// Count symbols on every card. `filled` is the stripe-filled mask.
pub fn classify(filled: &Raster, cards: &CardGrid, config: &CountConfig) -> Result<Grid<Count>> {
    classify_grid(cards, |pos, card| classify_card(filled, card, pos, config))
}
