//! Straight segment detection on a binary edge mask.
//!
//! Candidate lines come from a standard Hough transform (1 px by 1 degree
//! accumulator). Each candidate is then walked pixel by pixel across the mask
//! and split into runs of edge hits whose gaps do not exceed the configured
//! maximum. Only runs at least as long as the minimum length are reported, so
//! a line that merely collects votes from many short arcs yields nothing.

use crate::config::LineConfig;
use crate::models::{Point, Raster};
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use tracing::trace;

/// Detected straight segment between two image points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// First edge hit of the run
    pub start: Point,
    /// Last edge hit of the run
    pub end: Point,
}

impl LineSegment {
    /// Euclidean length in pixels
    pub fn length(&self) -> f32 {
        self.start.distance(&self.end)
    }
}

/// Find every edge segment of at least `config.min_length` pixels.
pub fn detect_segments(edges: &Raster, config: &LineConfig) -> Vec<LineSegment> {
    if edges.width() == 0 || edges.height() == 0 {
        return Vec::new();
    }
    let options = LineDetectionOptions {
        vote_threshold: config.vote_threshold,
        suppression_radius: config.suppression_radius,
    };
    let candidates = detect_lines(&edges.to_gray_image(), options);

    let segments: Vec<LineSegment> = candidates
        .iter()
        .flat_map(|line| walk_line(edges, line, config.max_gap))
        .filter(|s| s.length() >= config.min_length as f32)
        .collect();

    trace!(
        candidates = candidates.len(),
        segments = segments.len(),
        "line segments"
    );
    segments
}

/// Edge pixel on the line or one step to either side of it.
///
/// Accumulator distances are quantized to whole pixels, so a true edge can sit
/// up to one pixel off the reported line.
fn hits_edge(edges: &Raster, p: (f32, f32), normal: (f32, f32)) -> bool {
    [-1.0f32, 0.0, 1.0].iter().any(|&off| {
        let x = (p.0 + off * normal.0).round();
        let y = (p.1 + off * normal.1).round();
        x >= 0.0
            && y >= 0.0
            && (x as usize) < edges.width()
            && (y as usize) < edges.height()
            && edges.get(x as usize, y as usize) != 0
    })
}

/// Split one infinite line into runs of edge hits
fn walk_line(edges: &Raster, line: &PolarLine, max_gap: usize) -> Vec<LineSegment> {
    let theta = (line.angle_in_degrees as f32).to_radians();
    let normal = (theta.cos(), theta.sin());
    let dir = (-normal.1, normal.0);
    let origin = (line.r * normal.0, line.r * normal.1);
    let at = |t: i32| (origin.0 + t as f32 * dir.0, origin.1 + t as f32 * dir.1);

    let reach = (edges.width() + edges.height()) as i32;
    let mut segments = Vec::new();
    let mut run: Option<(i32, i32)> = None;

    let close = |run: (i32, i32), segments: &mut Vec<LineSegment>| {
        let (a, b) = (at(run.0), at(run.1));
        segments.push(LineSegment {
            start: Point::new(a.0, a.1),
            end: Point::new(b.0, b.1),
        });
    };

    for t in -reach..=reach {
        if !hits_edge(edges, at(t), normal) {
            continue;
        }
        run = match run {
            Some((start, last)) if (t - last) as usize <= max_gap + 1 => Some((start, t)),
            Some(prev) => {
                close(prev, &mut segments);
                Some((t, t))
            }
            None => Some((t, t)),
        };
    }
    if let Some(prev) = run {
        close(prev, &mut segments);
    }
    segments
}
