use crate::location::Location;
use rand::Rng;

/// Relative neighbor offsets in row-major scan order.
const ADJACENT_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Rectangular grid recording at most one occupant per cell.
///
/// Occupants are roster slots owned by the simulator; the field tracks
/// placement only and never animal lifetime. Callers moving an occupant must
/// clear its previous cell themselves (`place` overwrites silently).
#[derive(Clone, Debug)]
pub struct Field {
    depth: usize,
    width: usize,
    cells: Vec<Option<u32>>,
}

impl Field {
    pub fn new(depth: usize, width: usize) -> Self {
        Self {
            depth,
            width,
            cells: vec![None; depth * width],
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn index(&self, location: Location) -> usize {
        debug_assert!(location.row < self.depth && location.col < self.width);
        location.row * self.width + location.col
    }

    /// Record `slot` as the occupant of `location`, overwriting any previous
    /// record there.
    pub fn place(&mut self, slot: u32, location: Location) {
        let idx = self.index(location);
        self.cells[idx] = Some(slot);
    }

    /// Remove whatever occupant is recorded at `location`. No-op if empty.
    pub fn clear(&mut self, location: Location) {
        let idx = self.index(location);
        self.cells[idx] = None;
    }

    pub fn occupant_at(&self, location: Location) -> Option<u32> {
        self.cells[self.index(location)]
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// The up-to-8 in-bounds neighbors of `location`, in a fixed relative
    /// order but starting at a random offset so repeated calls carry no
    /// directional bias. Grid boundaries clip; they never wrap.
    pub fn adjacent_locations<R: Rng>(&self, location: Location, rng: &mut R) -> Vec<Location> {
        let mut neighbors = Vec::with_capacity(ADJACENT_OFFSETS.len());
        for (dr, dc) in ADJACENT_OFFSETS {
            let row = location.row.checked_add_signed(dr);
            let col = location.col.checked_add_signed(dc);
            if let (Some(row), Some(col)) = (row, col) {
                if row < self.depth && col < self.width {
                    neighbors.push(Location::new(row, col));
                }
            }
        }
        if neighbors.len() > 1 {
            let start = rng.random_range(0..neighbors.len());
            neighbors.rotate_left(start);
        }
        neighbors
    }

    /// All currently unoccupied neighbors of `location`, in the same rotated
    /// enumeration order as `adjacent_locations`.
    pub fn free_adjacent_locations<R: Rng>(
        &self,
        location: Location,
        rng: &mut R,
    ) -> Vec<Location> {
        self.adjacent_locations(location, rng)
            .into_iter()
            .filter(|loc| self.occupant_at(*loc).is_none())
            .collect()
    }

    /// One unoccupied neighbor of `location`, or `None` if every neighbor is
    /// occupied (the overcrowding condition).
    pub fn free_adjacent_location<R: Rng>(
        &self,
        location: Location,
        rng: &mut R,
    ) -> Option<Location> {
        self.adjacent_locations(location, rng)
            .into_iter()
            .find(|loc| self.occupant_at(*loc).is_none())
    }
}
