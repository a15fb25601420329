use thiserror::Error;

/// Side length of the square battlefield
pub const BOARD_SIZE: usize = 10;

/// Ship lengths of the standard fleet, largest first:
/// one 4-decker, two 3-deckers, three 2-deckers and four 1-deckers
pub const STANDARD_FLEET: [usize; 10] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A ship anchored at its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ship {
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub orientation: Orientation,
}

impl Ship {
    pub fn new(row: usize, col: usize, length: usize, orientation: Orientation) -> Self {
        Self {
            row,
            col,
            length,
            orientation,
        }
    }

    /// Cells covered by the ship, from the anchor outwards
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(move |i| match self.orientation {
            Orientation::Horizontal => (self.row, self.col + i),
            Orientation::Vertical => (self.row + i, self.col),
        })
    }

    /// Last row and column covered by the ship
    fn far_corner(&self) -> (usize, usize) {
        let tail = self.length.saturating_sub(1);
        match self.orientation {
            Orientation::Horizontal => (self.row, self.col + tail),
            Orientation::Vertical => (self.row + tail, self.col),
        }
    }

    fn fits_within(&self, size: usize) -> bool {
        let (last_row, last_col) = self.far_corner();
        self.length > 0 && last_row < size && last_col < size
    }
}

/// Reasons a ship layout breaks the placement rules
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("ship at ({row}, {col}) does not fit on a {size}x{size} battlefield")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("ship at ({row}, {col}) overlaps or touches another ship")]
    Collision { row: usize, col: usize },
    #[error("battlefield is {found}x{found}, expected {expected}x{expected}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("fleet mismatch: expected ship lengths {expected:?}, found {found:?}")]
    FleetMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

/// Ship layout for one player.
///
/// Ships never overlap and never touch each other, diagonals included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battlefield {
    size: usize,
    ships: Vec<Ship>,
    occupied: Vec<bool>,
}

impl Battlefield {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            ships: Vec::new(),
            occupied: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    /// Returns true if a ship segment occupies the cell
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.occupied[row * self.size + col]
    }

    /// Occupancy as rows of cells
    pub fn occupancy(&self) -> Vec<Vec<bool>> {
        (0..self.size)
            .map(|row| (0..self.size).map(|col| self.is_occupied(row, col)).collect())
            .collect()
    }

    /// Two battlefields share a layout when the same cells are occupied
    pub fn same_layout(&self, other: &Battlefield) -> bool {
        self.size == other.size && self.occupied == other.occupied
    }

    /// Check whether `ship` could be added without breaking the placement rules
    pub fn check_placement(&self, ship: &Ship) -> Result<(), LayoutError> {
        if !ship.fits_within(self.size) {
            return Err(LayoutError::OutOfBounds {
                row: ship.row,
                col: ship.col,
                size: self.size,
            });
        }

        // Scan the ship's bounding box grown by one cell in every direction
        let (last_row, last_col) = ship.far_corner();
        let rows = ship.row.saturating_sub(1)..=(last_row + 1).min(self.size - 1);
        for row in rows {
            let cols = ship.col.saturating_sub(1)..=(last_col + 1).min(self.size - 1);
            for col in cols {
                if self.occupied[row * self.size + col] {
                    return Err(LayoutError::Collision {
                        row: ship.row,
                        col: ship.col,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn place(&mut self, ship: Ship) -> Result<(), LayoutError> {
        self.check_placement(&ship)?;
        for (row, col) in ship.cells() {
            self.occupied[row * self.size + col] = true;
        }
        self.ships.push(ship);
        Ok(())
    }

    /// Verify every placement rule from scratch and that the ships match `fleet`
    pub fn validate(&self, fleet: &[usize]) -> Result<(), LayoutError> {
        let mut replay = Battlefield::empty(self.size);
        for ship in &self.ships {
            replay.place(*ship)?;
        }

        let mut expected = fleet.to_vec();
        let mut found: Vec<usize> = self.ships.iter().map(|ship| ship.length).collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        found.sort_unstable_by(|a, b| b.cmp(a));
        if expected != found {
            return Err(LayoutError::FleetMismatch { expected, found });
        }

        Ok(())
    }
}
