use std::collections::HashSet;

use super::grid::Grid;
use super::session_rng::SessionRng;
use super::types::Point;

const RANDOM_DRAW_ATTEMPTS: u32 = 50;

/// Finds a free cell: up to 50 uniform random draws, then an exhaustive
/// row-major scan (y outer, x inner) with a uniform pick among the free
/// cells found. `None` means the board is full.
///
/// Used for food placement and for externally triggered obstacles alike;
/// only the occupied set differs.
pub fn spawn_free_cell(grid: Grid, occupied: &HashSet<Point>, rng: &mut SessionRng) -> Option<Point> {
    for _ in 0..RANDOM_DRAW_ATTEMPTS {
        let p = Point::new(rng.random_range(0..grid.size()), rng.random_range(0..grid.size()));
        if !occupied.contains(&p) {
            return Some(p);
        }
    }

    let mut free = Vec::new();
    for y in 0..grid.size() {
        for x in 0..grid.size() {
            let p = Point::new(x, y);
            if !occupied.contains(&p) {
                free.push(p);
            }
        }
    }

    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

/// Food variant: a full board yields the `Point::NONE` sentinel instead of
/// an absent value, matching the state model's "no food placed" encoding.
pub fn spawn_food(grid: Grid, occupied: &HashSet<Point>, rng: &mut SessionRng) -> Point {
    spawn_free_cell(grid, occupied, rng).unwrap_or(Point::NONE)
}
