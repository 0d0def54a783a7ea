//! Card detection modules
//!
//! This module contains the logic for finding cards and symbol outlines:
//! - Two-pass connected component labeling
//! - External contours, fitted rectangles and circularity
//! - Straight edge segments (Hough candidates split into runs)
//! - Card localization into the 3x4 grid

/// Two-pass connected component labeling with an equivalence table
pub mod connected_components;
/// Outer contours, minimum-area rectangles and shape measures
pub mod contour;
/// Straight segment detection on edge masks
pub mod lines;
/// Card rectangle extraction and grid ordering
pub mod localizer;
