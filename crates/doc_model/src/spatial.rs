//! Uniform-grid spatial index over component bounding boxes

use crate::ComponentId;
use geometry::Rect2;
use std::collections::{HashMap, HashSet};

/// Boxes spanning more cells than this are kept in a separate list that every
/// query scans
const MAX_CELLS_PER_ENTRY: i64 = 1024;

type Cell = (i64, i64);

#[derive(Debug, Clone)]
enum Placement {
    Cells { min: Cell, max: Cell },
    Oversized,
}

/// Maps grid cells to the components whose bounding boxes overlap them.
///
/// Query results are candidates: callers still filter them against exact
/// bounding boxes.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<Cell, HashSet<ComponentId>>,
    oversized: HashSet<ComponentId>,
    placements: HashMap<ComponentId, Placement>,
}

impl SpatialIndex {
    pub const DEFAULT_CELL_SIZE: f64 = 256.0;

    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            Self::DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: HashSet::new(),
            placements: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    fn cell_range(&self, rect: &Rect2) -> Option<(Cell, Cell)> {
        let to_cell = |v: f64| (v / self.cell_size).floor();
        let bounds = [
            to_cell(rect.x()),
            to_cell(rect.y()),
            to_cell(rect.x() + rect.width()),
            to_cell(rect.y() + rect.height()),
        ];
        if bounds.iter().any(|b| !b.is_finite() || b.abs() > i64::MAX as f64 / 4.0) {
            return None;
        }
        let [x0, y0, x1, y1] = bounds.map(|b| b as i64);
        Some(((x0, y0), (x1, y1)))
    }

    fn placement_for(&self, rect: &Rect2) -> Placement {
        match self.cell_range(rect) {
            Some((min, max)) if cell_count(min, max) <= MAX_CELLS_PER_ENTRY => {
                Placement::Cells { min, max }
            }
            _ => Placement::Oversized,
        }
    }

    /// Index `id` under `bbox`, replacing any previous entry for it
    pub fn insert(&mut self, id: ComponentId, bbox: Rect2) {
        self.remove(&id);
        let placement = self.placement_for(&bbox);
        match &placement {
            Placement::Cells { min, max } => {
                for cx in min.0..=max.0 {
                    for cy in min.1..=max.1 {
                        self.cells.entry((cx, cy)).or_default().insert(id.clone());
                    }
                }
            }
            Placement::Oversized => {
                self.oversized.insert(id.clone());
            }
        }
        self.placements.insert(id, placement);
    }

    /// Returns false if `id` was not indexed
    pub fn remove(&mut self, id: &ComponentId) -> bool {
        let Some(placement) = self.placements.remove(id) else {
            return false;
        };
        match placement {
            Placement::Cells { min, max } => {
                for cx in min.0..=max.0 {
                    for cy in min.1..=max.1 {
                        if let Some(bucket) = self.cells.get_mut(&(cx, cy)) {
                            bucket.remove(id);
                            if bucket.is_empty() {
                                self.cells.remove(&(cx, cy));
                            }
                        }
                    }
                }
            }
            Placement::Oversized => {
                self.oversized.remove(id);
            }
        }
        true
    }

    /// Ids whose cells overlap `region`
    pub fn candidates(&self, region: &Rect2) -> HashSet<ComponentId> {
        let mut found: HashSet<ComponentId> = self.oversized.clone();
        match self.cell_range(region) {
            Some((min, max)) if cell_count(min, max) <= self.cells.len() as i64 => {
                for cx in min.0..=max.0 {
                    for cy in min.1..=max.1 {
                        if let Some(bucket) = self.cells.get(&(cx, cy)) {
                            found.extend(bucket.iter().cloned());
                        }
                    }
                }
            }
            // Huge query regions: walking the occupied cells is cheaper
            _ => {
                for (cell, bucket) in &self.cells {
                    let inside = match self.cell_range(region) {
                        Some((min, max)) => {
                            (min.0..=max.0).contains(&cell.0) && (min.1..=max.1).contains(&cell.1)
                        }
                        None => true,
                    };
                    if inside {
                        found.extend(bucket.iter().cloned());
                    }
                }
            }
        }
        found
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
        self.placements.clear();
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CELL_SIZE)
    }
}

/// Number of cells in the inclusive range `min..=max`
fn cell_count(min: (i64, i64), max: (i64, i64)) -> i64 {
    (max.0 - min.0 + 1).saturating_mul(max.1 - min.1 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_query_remove() {
        let mut index = SpatialIndex::new(10.0);
        let a = ComponentId::from("a");
        let b = ComponentId::from("b");
        index.insert(a.clone(), Rect2::new(0.0, 0.0, 5.0, 5.0));
        index.insert(b.clone(), Rect2::new(100.0, 100.0, 5.0, 5.0));

        let near_a = index.candidates(&Rect2::new(1.0, 1.0, 1.0, 1.0));
        assert!(near_a.contains(&a));
        assert!(!near_a.contains(&b));

        assert!(index.remove(&a));
        assert!(!index.remove(&a));
        assert!(index.candidates(&Rect2::new(1.0, 1.0, 1.0, 1.0)).is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_reinsert_moves_entry() {
        let mut index = SpatialIndex::new(10.0);
        let a = ComponentId::from("a");
        index.insert(a.clone(), Rect2::new(0.0, 0.0, 5.0, 5.0));
        index.insert(a.clone(), Rect2::new(50.0, 50.0, 5.0, 5.0));
        assert!(index.candidates(&Rect2::new(0.0, 0.0, 5.0, 5.0)).is_empty());
        assert!(index.candidates(&Rect2::new(50.0, 50.0, 1.0, 1.0)).contains(&a));
    }

    #[test]
    fn test_oversized_entries_always_returned() {
        let mut index = SpatialIndex::new(1.0);
        let huge = ComponentId::from("huge");
        index.insert(huge.clone(), Rect2::new(-1e6, -1e6, 2e6, 2e6));
        assert!(index.candidates(&Rect2::new(3.0, 3.0, 1.0, 1.0)).contains(&huge));
    }

    #[test]
    fn test_large_query_region() {
        let mut index = SpatialIndex::new(1.0);
        let a = ComponentId::from("a");
        index.insert(a.clone(), Rect2::new(2.0, 2.0, 1.0, 1.0));
        assert!(index.candidates(&Rect2::new(-1e9, -1e9, 2e9, 2e9)).contains(&a));
        assert!(!index.candidates(&Rect2::new(1e6, 1e6, 1e7, 1e7)).contains(&a));
    }
}
