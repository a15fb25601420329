use rand::Rng;

use crate::{
    error::GameError,
    game::battlefield::{
        Battlefield, LayoutError, Orientation, Ship, BOARD_SIZE, STANDARD_FLEET,
    },
};

/// Random positions tried for a single ship before the layout is abandoned
const ATTEMPTS_PER_SHIP: usize = 200;
/// Full layouts started before giving up
const MAX_LAYOUT_ATTEMPTS: usize = 50;
/// Re-rolls allowed when a regenerated layout matches the previous one
const MAX_REROLLS: usize = 16;

/// Produces random, rule-valid ship layouts
#[derive(Debug, Clone)]
pub struct BattlefieldGenerator {
    size: usize,
    fleet: Vec<usize>,
}

impl Default for BattlefieldGenerator {
    fn default() -> Self {
        Self::new(BOARD_SIZE, &STANDARD_FLEET)
    }
}

impl BattlefieldGenerator {
    pub fn new(size: usize, fleet: &[usize]) -> Self {
        let mut fleet = fleet.to_vec();
        // Largest ships first leaves the most room for the rest
        fleet.sort_unstable_by(|a, b| b.cmp(a));
        Self { size, fleet }
    }

    pub fn fleet(&self) -> &[usize] {
        &self.fleet
    }

    /// Generate a new layout using the thread-local RNG
    pub fn generate(&self) -> Result<Battlefield, GameError> {
        self.generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Battlefield, GameError> {
        for attempt in 1..=MAX_LAYOUT_ATTEMPTS {
            if let Some(field) = self.try_layout(rng) {
                self.check(&field)?;
                return Ok(field);
            }
            tracing::debug!("Battlefield layout attempt {} failed, restarting", attempt);
        }

        tracing::error!(
            "Unable to place fleet {:?} on a {}x{} battlefield",
            self.fleet,
            self.size,
            self.size
        );
        Err(GameError::PlacementFailed {
            attempts: MAX_LAYOUT_ATTEMPTS,
        })
    }

    /// Verify that `field` holds exactly this generator's fleet under the placement rules
    pub fn check(&self, field: &Battlefield) -> Result<(), GameError> {
        if field.size() != self.size {
            return Err(LayoutError::SizeMismatch {
                expected: self.size,
                found: field.size(),
            }
            .into());
        }
        field.validate(self.fleet())?;
        Ok(())
    }

    /// Generate a layout that differs from `previous`
    pub fn regenerate(&self, previous: &Battlefield) -> Result<Battlefield, GameError> {
        self.regenerate_with(&mut rand::rng(), previous)
    }

    pub fn regenerate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        previous: &Battlefield,
    ) -> Result<Battlefield, GameError> {
        let mut candidate = self.generate_with(rng)?;
        for _ in 0..MAX_REROLLS {
            if !candidate.same_layout(previous) {
                return Ok(candidate);
            }
            tracing::debug!("Regenerated battlefield matches the previous one, rolling again");
            candidate = self.generate_with(rng)?;
        }

        // Only reachable when the fleet admits a single layout
        tracing::warn!("Could not produce a distinct battlefield after {} re-rolls", MAX_REROLLS);
        Ok(candidate)
    }

    fn try_layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Battlefield> {
        let mut field = Battlefield::empty(self.size);

        for &length in &self.fleet {
            if length == 0 || length > self.size {
                return None;
            }

            let placed = (0..ATTEMPTS_PER_SHIP)
                .map(|_| self.random_ship(rng, length))
                .find(|ship| field.check_placement(ship).is_ok())?;
            field.place(placed).ok()?;
        }

        Some(field)
    }

    fn random_ship<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> Ship {
        let orientation = if rng.random_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };

        let (max_row, max_col) = match orientation {
            Orientation::Horizontal => (self.size - 1, self.size - length),
            Orientation::Vertical => (self.size - length, self.size - 1),
        };

        Ship::new(
            rng.random_range(0..=max_row),
            rng.random_range(0..=max_col),
            length,
            orientation,
        )
    }
}
