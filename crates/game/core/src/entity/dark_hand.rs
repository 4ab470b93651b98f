//! Branching hazard spawned by the dark hand ability.

use std::collections::BTreeSet;

use crate::grid::Grid;
use crate::rng::GameRng;
use crate::state::{Direction, Position};

const INITIAL_BRANCH_LENGTH: u32 = 2;
const MIN_SPLIT_LENGTH: u32 = 3;

/// A straight arm of the hand: `length` tiles starting at `origin`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Branch {
    pub origin: Position,
    pub direction: Direction,
    pub length: u32,
}

impl Branch {
    fn new(origin: Position, direction: Direction) -> Self {
        Self {
            origin,
            direction,
            length: INITIAL_BRANCH_LENGTH,
        }
    }

    fn tile(&self, step: u32) -> Position {
        let (dx, dy) = self.direction.delta();
        Position::new(
            self.origin.x + dx * step as i32,
            self.origin.y + dy * step as i32,
        )
    }

    pub fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.length).map(|step| self.tile(step))
    }
}

/// Growth state of one dark hand.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DarkHand {
    branches: Vec<Branch>,
}

impl DarkHand {
    /// Two arms from `origin`: one along `direction`, one opposite.
    pub fn new(origin: Position, direction: Direction) -> Self {
        Self {
            branches: vec![
                Branch::new(origin, direction),
                Branch::new(origin, direction.opposite()),
            ],
        }
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Distinct tiles covered by any branch, in sorted order.
    pub fn tiles(&self) -> BTreeSet<Position> {
        self.branches.iter().flat_map(Branch::tiles).collect()
    }

    pub fn covers(&self, position: Position) -> bool {
        self.branches
            .iter()
            .any(|branch| branch.tiles().any(|tile| tile == position))
    }

    /// One growth step. Branches split off this step are visited in the
    /// same step, and the branch count in the odds is re-read every time.
    pub fn grow(&mut self, grid: &Grid, rng: &mut GameRng) {
        let mut index = 0;
        while index < self.branches.len() {
            let count = self.branches.len() as f64;
            let crowding = count * count;
            let branch = &self.branches[index];
            let length = branch.length as f64;

            if rng.chance(3.0 / length / crowding) {
                if grid.is_walkable(branch.tile(branch.length)) {
                    self.branches[index].length += 1;
                }
            } else if branch.length > MIN_SPLIT_LENGTH && rng.chance(0.2 * length / crowding) {
                let fork = branch.tile(rng.range(2, branch.length as i32 - 1) as u32);
                let side_a = branch.direction.clockwise();
                let side_b = branch.direction.counter_clockwise();
                if grid.is_walkable(fork.offset(side_a)) && grid.is_walkable(fork.offset(side_b)) {
                    self.branches.push(Branch::new(fork, side_a));
                    self.branches.push(Branch::new(fork, side_b));
                }
            }
            index += 1;
        }
    }
}
