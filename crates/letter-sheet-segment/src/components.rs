//! External connected components and their bounding boxes.
//!
//! Ink is labeled with the configured connectivity and the background with
//! the dual one (8-connected ink pairs with 4-connected background and vice
//! versa), so that a thin diagonal ring still encloses its hole. A component
//! is *external* when it touches the image border or the background region
//! reachable from outside the image. Components sitting inside another
//! component's hole are not external.

use letter_sheet_core::{BinaryMask, Rect};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Pixel adjacency used for labeling ink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Edge neighbours only.
    Four,
    /// Edge and corner neighbours.
    #[default]
    Eight,
}

impl Connectivity {
    fn offsets(self) -> &'static [(isize, isize)] {
        const FOUR: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        const EIGHT: [(isize, isize); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        match self {
            Connectivity::Four => &FOUR,
            Connectivity::Eight => &EIGHT,
        }
    }

    fn dual(self) -> Connectivity {
        match self {
            Connectivity::Four => Connectivity::Eight,
            Connectivity::Eight => Connectivity::Four,
        }
    }
}

/// Component detection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentParams {
    pub connectivity: Connectivity,
    /// Boxes with `w * h <= min_box_area` are treated as noise.
    pub min_box_area: u64,
}

impl Default for ComponentParams {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Eight,
            min_box_area: 50,
        }
    }
}

/// One labeled ink component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Component {
    pub rect: Rect,
    pub pixel_count: u32,
    pub external: bool,
}

/// Counters from a detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStats {
    pub labeled: usize,
    pub nested: usize,
    pub noise: usize,
    pub kept: usize,
}

struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    #[inline]
    fn neighbour(&self, idx: usize, (dx, dy): (isize, isize)) -> Option<usize> {
        let x = (idx % self.width) as isize + dx;
        let y = (idx / self.width) as isize + dy;
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    #[inline]
    fn on_border(&self, idx: usize) -> bool {
        let (x, y) = (idx % self.width, idx / self.width);
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }
}

/// Background pixels reachable from outside the image.
fn outer_background(mask: &BinaryMask, grid: &Grid, connectivity: Connectivity) -> Vec<bool> {
    let data = mask.data();
    let mut outer = vec![false; data.len()];
    let mut stack: Vec<usize> = (0..data.len())
        .filter(|&i| grid.on_border(i) && data[i] == letter_sheet_core::BACKGROUND)
        .collect();
    for &i in &stack {
        outer[i] = true;
    }
    while let Some(idx) = stack.pop() {
        for &off in connectivity.offsets() {
            if let Some(n) = grid.neighbour(idx, off) {
                if !outer[n] && data[n] == letter_sheet_core::BACKGROUND {
                    outer[n] = true;
                    stack.push(n);
                }
            }
        }
    }
    outer
}

/// Label every ink component in raster order of its first pixel.
pub fn label_components(mask: &BinaryMask, connectivity: Connectivity) -> Vec<Component> {
    let grid = Grid {
        width: mask.width(),
        height: mask.height(),
    };
    if grid.width == 0 || grid.height == 0 {
        return Vec::new();
    }
    let data = mask.data();
    let dual = connectivity.dual();
    let outer = outer_background(mask, &grid, dual);

    let mut visited = vec![false; data.len()];
    let mut stack = Vec::new();
    let mut components = Vec::new();

    for seed in 0..data.len() {
        if visited[seed] || data[seed] == letter_sheet_core::BACKGROUND {
            continue;
        }
        visited[seed] = true;
        stack.push(seed);

        let (mut x0, mut y0) = (usize::MAX, usize::MAX);
        let (mut x1, mut y1) = (0usize, 0usize);
        let mut count = 0u32;
        let mut external = false;

        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % grid.width, idx / grid.width);
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
            count += 1;

            if !external {
                external = grid.on_border(idx)
                    || dual
                        .offsets()
                        .iter()
                        .any(|&off| grid.neighbour(idx, off).is_some_and(|n| outer[n]));
            }

            for &off in connectivity.offsets() {
                if let Some(n) = grid.neighbour(idx, off) {
                    if !visited[n] && data[n] != letter_sheet_core::BACKGROUND {
                        visited[n] = true;
                        stack.push(n);
                    }
                }
            }
        }

        components.push(Component {
            rect: Rect::from_corners(x0 as u32, y0 as u32, x1 as u32 + 1, y1 as u32 + 1),
            pixel_count: count,
            external,
        });
    }

    components
}

/// Bounding boxes of the external components that clear the noise floor.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask, params), fields(width = mask.width(), height = mask.height()))
)]
pub fn detect_boxes(mask: &BinaryMask, params: &ComponentParams) -> (Vec<Rect>, ComponentStats) {
    let components = label_components(mask, params.connectivity);
    let mut stats = ComponentStats {
        labeled: components.len(),
        ..ComponentStats::default()
    };

    let mut boxes = Vec::with_capacity(components.len());
    for c in components {
        if !c.external {
            stats.nested += 1;
        } else if c.rect.area() <= params.min_box_area {
            stats.noise += 1;
        } else {
            boxes.push(c.rect);
        }
    }
    stats.kept = boxes.len();
    log::debug!(
        "components: labeled={} nested={} noise={} kept={}",
        stats.labeled,
        stats.nested,
        stats.noise,
        stats.kept
    );
    (boxes, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint(mask: &mut BinaryMask, r: Rect) {
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                mask.set_ink(x as usize, y as usize, true);
            }
        }
    }

    #[test]
    fn single_blob_yields_its_tight_box() {
        let mut mask = BinaryMask::new(50, 40);
        paint(&mut mask, Rect::new(10, 5, 8, 12));
        paint(&mut mask, Rect::new(14, 17, 3, 6));

        let (boxes, stats) = detect_boxes(&mask, &ComponentParams::default());
        assert_eq!(boxes, vec![Rect::new(10, 5, 8, 18)]);
        assert_eq!(stats.kept, 1);
    }

    #[test]
    fn noise_floor_is_inclusive() {
        let mut mask = BinaryMask::new(40, 40);
        paint(&mut mask, Rect::new(2, 2, 10, 5)); // area 50 -> noise
        paint(&mut mask, Rect::new(20, 20, 17, 3)); // area 51 -> kept
        let (boxes, stats) = detect_boxes(&mask, &ComponentParams::default());
        assert_eq!(boxes, vec![Rect::new(20, 20, 17, 3)]);
        assert_eq!(stats.noise, 1);
    }

    #[test]
    fn blobs_inside_holes_are_ignored() {
        let mut mask = BinaryMask::new(60, 60);
        // Ring with a 30x30 hole, and a dot inside the hole.
        paint(&mut mask, Rect::new(10, 10, 40, 5));
        paint(&mut mask, Rect::new(10, 45, 40, 5));
        paint(&mut mask, Rect::new(10, 10, 5, 40));
        paint(&mut mask, Rect::new(45, 10, 5, 40));
        paint(&mut mask, Rect::new(25, 25, 10, 10));

        let (boxes, stats) = detect_boxes(&mask, &ComponentParams::default());
        assert_eq!(boxes, vec![Rect::new(10, 10, 40, 40)]);
        assert_eq!(stats.labeled, 2);
        assert_eq!(stats.nested, 1);
    }

    #[test]
    fn diagonal_touch_depends_on_connectivity() {
        let mut mask = BinaryMask::new(30, 30);
        paint(&mut mask, Rect::new(2, 2, 8, 8));
        paint(&mut mask, Rect::new(10, 10, 8, 8));

        let eight = label_components(&mask, Connectivity::Eight);
        assert_eq!(eight.len(), 1);
        assert_eq!(eight[0].rect, Rect::new(2, 2, 16, 16));

        let four = label_components(&mask, Connectivity::Four);
        assert_eq!(four.len(), 2);
        assert!(four.iter().all(|c| c.external));
    }

    #[test]
    fn components_touching_the_border_are_external() {
        let mut mask = BinaryMask::new(20, 20);
        paint(&mut mask, Rect::new(0, 0, 20, 20));
        let comps = label_components(&mask, Connectivity::Eight);
        assert_eq!(comps.len(), 1);
        assert!(comps[0].external);
    }
}
