//! Reachability over the 4-connected grid
//!
//! A step may enter an empty tile or a tile held by a friendly unit other
//! than the mover; enemy tiles block. Only empty tiles are destinations.

use crate::board::{Board, Occupant, Position};
use std::collections::VecDeque;

/// Steps a unit may take in a single move
pub const MOVE_RANGE: u32 = 2;

impl Board {
    fn passable_for(&self, mover: Occupant, pos: Position) -> bool {
        match self.tile(pos) {
            Ok(tile) => match tile.occupant {
                None => true,
                Some(occ) => occ.owner == mover.owner && occ.unit != mover.unit,
            },
            Err(_) => false,
        }
    }

    /// Empty tiles reachable from `origin` in 1..=`max_steps` steps, with the
    /// fewest steps needed, in breadth-first order
    pub fn reachable_tiles(&self, mover: Occupant, origin: Position, max_steps: u32) -> Vec<(Position, u32)> {
        let mut visited = vec![origin];
        let mut frontier = VecDeque::from([(origin, 0u32)]);
        let mut found = Vec::new();

        while let Some((pos, steps)) = frontier.pop_front() {
            if steps == max_steps {
                continue;
            }
            for next in pos.orthogonal_neighbours() {
                if visited.contains(&next) || !self.passable_for(mover, next) {
                    continue;
                }
                visited.push(next);
                if self.is_empty_tile(next) {
                    found.push((next, steps + 1));
                }
                frontier.push_back((next, steps + 1));
            }
        }
        found
    }

    /// Whether `mover` standing on `origin` can end a move on `destination`
    /// within `max_steps` orthogonal steps
    pub fn can_be_reached(&self, mover: Occupant, origin: Position, destination: Position, max_steps: u32) -> bool {
        self.steps_to(mover, origin, destination, max_steps).is_some()
    }

    /// Fewest steps to `destination`, if it is reachable within `max_steps`
    pub fn steps_to(&self, mover: Occupant, origin: Position, destination: Position, max_steps: u32) -> Option<u32> {
        if origin == destination || !self.is_empty_tile(destination) {
            return None;
        }
        if origin.manhattan(destination) > max_steps as i32 {
            return None;
        }
        self.reachable_tiles(mover, origin, max_steps)
            .into_iter()
            .find(|(pos, _)| *pos == destination)
            .map(|(_, steps)| steps)
    }
}
