//! Two-pass connected component labeling for card isolation
//! Scans in raster order against the already-visited W, NW, N and NE
//! neighbors and resolves provisional labels through a flat equivalence table

use crate::error::Result;
use crate::models::Raster;
use crate::morphology::{self, StructuringElement};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Label stored for pixels that do not (yet) belong to a component
pub const UNLABELED: i32 = -1;

/// Opening applied before labeling for visualization
const VISUALIZE_OPENING_SIZE: usize = 5;

/// Equivalence table indexed by provisional label.
///
/// `parent[l] <= l` always holds, so following parents reaches a root in
/// finitely many steps. Lookups compress the path they walk.
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    /// Create an empty table
    pub fn new() -> Self {
        Self { parent: Vec::new() }
    }

    /// Allocate a fresh label that is its own root
    pub fn make_label(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    /// Number of provisional labels allocated so far
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True before the first label is allocated
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `x`'s class
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Merge the class of `label` into the root `min_root`.
    ///
    /// `min_root` must be a root no larger than the root of `label`.
    pub fn union_into(&mut self, label: u32, min_root: u32) {
        let root = self.find(label);
        if root != min_root {
            self.parent[root as usize] = min_root;
        }
    }
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounding box of one labeled component (inclusive corners)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentBox {
    /// Final label of the component
    pub label: u32,
    /// Leftmost column
    pub min_x: usize,
    /// Topmost row
    pub min_y: usize,
    /// Rightmost column
    pub max_x: usize,
    /// Bottom row
    pub max_y: usize,
    /// Pixel count
    pub area: usize,
}

impl ComponentBox {
    /// Box width in pixels
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Box height in pixels
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

/// Result of one labeling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeling {
    width: usize,
    height: usize,
    labels: Vec<i32>,
    num_labels: usize,
    provisional_labels: usize,
    orphan_merges: usize,
}

impl Labeling {
    /// Width of the labeled mask
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the labeled mask
    pub fn height(&self) -> usize {
        self.height
    }

    /// Final label at (x, y), `None` for background or out of bounds
    pub fn label(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let label = self.labels[y * self.width + x];
        (label != UNLABELED).then_some(label as u32)
    }

    /// Row-major label map; background holds [`UNLABELED`]
    pub fn as_slice(&self) -> &[i32] {
        &self.labels
    }

    /// Number of components. Labels are dense in `0..num_labels`.
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    /// Labels allocated during the first pass, before equivalence resolution
    pub fn provisional_labels(&self) -> usize {
        self.provisional_labels
    }

    /// Times a pixel with foreground neighbors found none of them labeled.
    ///
    /// Raster-order visitation labels every foreground neighbor before it is
    /// inspected, so this stays zero; a non-zero value means the scan order or
    /// neighbor set is broken.
    pub fn orphan_merges(&self) -> usize {
        self.orphan_merges
    }

    /// Bounding boxes and areas indexed by label
    pub fn bounding_boxes(&self) -> Vec<ComponentBox> {
        let mut boxes: Vec<Option<ComponentBox>> = vec![None; self.num_labels];
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(label) = self.label(x, y) else {
                    continue;
                };
                let entry = boxes[label as usize].get_or_insert(ComponentBox {
                    label,
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    area: 0,
                });
                entry.min_x = entry.min_x.min(x);
                entry.min_y = entry.min_y.min(y);
                entry.max_x = entry.max_x.max(x);
                entry.max_y = entry.max_y.max(y);
                entry.area += 1;
            }
        }
        boxes.into_iter().flatten().collect()
    }

    /// Paint each component with a random color; background stays black
    pub fn colorize<R: Rng>(&self, rng: &mut R) -> RgbImage {
        let palette: Vec<[u8; 3]> = (0..self.num_labels)
            .map(|_| [rng.r#gen(), rng.r#gen(), rng.r#gen()])
            .collect();
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            match self.label(x as usize, y as usize) {
                Some(label) => Rgb(palette[label as usize]),
                None => Rgb([0, 0, 0]),
            }
        })
    }
}

/// Label every 8-connected foreground (255) blob of `mask`.
pub fn label_components(mask: &Raster) -> Labeling {
    let width = mask.width();
    let height = mask.height();
    let pw = width + 2;
    let ph = height + 2;

    // One pixel of background on every side removes bounds checks
    let mut fg = vec![false; pw * ph];
    for y in 0..height {
        for x in 0..width {
            fg[(y + 1) * pw + x + 1] = mask.get(x, y) == 255;
        }
    }
    let mut labels = vec![UNLABELED; pw * ph];
    let mut table = UnionFind::new();
    let mut orphan_merges = 0usize;

    // First pass: provisional labels
    for i in 1..ph.saturating_sub(1) {
        for j in 1..pw - 1 {
            let idx = i * pw + j;
            if !fg[idx] {
                continue;
            }

            // West, northwest, north, northeast
            let neighbors = [idx - 1, idx - pw - 1, idx - pw, idx - pw + 1];

            if !neighbors.iter().any(|&n| fg[n]) {
                labels[idx] = table.make_label() as i32;
            } else if neighbors.iter().all(|&n| labels[n] == UNLABELED) {
                orphan_merges += 1;
                let fresh = table.make_label() as i32;
                labels[idx] = fresh;
                for &n in &neighbors {
                    labels[n] = if fg[n] { fresh } else { UNLABELED };
                }
            } else {
                let mut roots = [0u32; 4];
                let mut count = 0;
                for &n in &neighbors {
                    if labels[n] != UNLABELED {
                        roots[count] = table.find(labels[n] as u32);
                        count += 1;
                    }
                }
                let roots = &roots[..count];
                let min_root = roots.iter().copied().min().unwrap_or_default();

                labels[idx] = min_root as i32;
                for &n in &neighbors {
                    if labels[n] == UNLABELED && fg[n] {
                        labels[n] = min_root as i32;
                    }
                }
                for &root in roots {
                    table.union_into(root, min_root);
                }
            }
        }
    }

    if orphan_merges > 0 {
        warn!(orphan_merges, "foreground neighbors found without labels");
    }

    // Second pass: resolve to roots, renumber densely and strip the padding
    let mut dense: Vec<i32> = vec![UNLABELED; table.len()];
    let mut num_labels = 0usize;
    let mut out = vec![UNLABELED; width * height];
    for y in 0..height {
        for x in 0..width {
            let idx = (y + 1) * pw + x + 1;
            if !fg[idx] {
                continue;
            }
            let root = table.find(labels[idx] as u32) as usize;
            if dense[root] == UNLABELED {
                dense[root] = num_labels as i32;
                num_labels += 1;
            }
            out[y * width + x] = dense[root];
        }
    }

    debug!(
        provisional = table.len(),
        components = num_labels,
        "labeled connected components"
    );

    Labeling {
        width,
        height,
        labels: out,
        num_labels,
        provisional_labels: table.len(),
        orphan_merges,
    }
}

/// Find connected foreground regions and return their bounding boxes
pub fn find_foreground_regions(mask: &Raster) -> Vec<ComponentBox> {
    label_components(mask).bounding_boxes()
}

/// Set every background pixel that cannot reach the raster border.
///
/// Background regions are the components of the inverted mask; those whose
/// bounding box stays off the border are enclosed and become foreground.
pub fn fill_holes(mask: &Raster) -> Raster {
    let (width, height) = (mask.width(), mask.height());
    let background = label_components(&mask.inverted());

    let mut enclosed = vec![false; background.num_labels()];
    for b in background.bounding_boxes() {
        enclosed[b.label as usize] =
            b.min_x > 0 && b.min_y > 0 && b.max_x + 1 < width && b.max_y + 1 < height;
    }

    let mut filled = mask.clone();
    for y in 0..height {
        for x in 0..width {
            if let Some(label) = background.label(x, y) {
                if enclosed[label as usize] {
                    filled.set(x, y, 255);
                }
            }
        }
    }
    filled
}

/// Open the mask with 5x5 elements, label it and paint the labels.
///
/// The same `seed` always yields the same palette.
pub fn label_and_colorize(mask: &Raster, seed: u64) -> Result<(Labeling, RgbImage)> {
    let se = StructuringElement::square(VISUALIZE_OPENING_SIZE)?;
    let opened = morphology::opening(mask, se, se);
    let labeling = label_components(&opened);
    let mut rng = StdRng::seed_from_u64(seed);
    let image = labeling.colorize(&mut rng);
    Ok((labeling, image))
}
