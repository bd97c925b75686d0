use std::collections::{HashSet, VecDeque};

use super::grid::Grid;
use super::types::Point;

/// Breadth-first shortest path from `start` to `target` over `grid`, never
/// entering a blocked or out-of-bounds cell. Returns the path excluding
/// `start` and including `target`, or `None` when no path exists.
///
/// Neighbors expand in the grid's fixed order, so among equally short paths
/// the one returned is deterministic for a given input. `start` itself is
/// not checked against `blocked`.
pub fn shortest_path(
    grid: Grid,
    start: Point,
    target: Point,
    blocked: &HashSet<Point>,
) -> Option<Vec<Point>> {
    let mut visited = vec![false; grid.cell_count()];
    let mut came_from: Vec<Option<Point>> = vec![None; grid.cell_count()];
    let mut queue = VecDeque::new();

    visited[grid.cell_index(start)] = true;
    queue.push_back(start);

    while let Some(p) = queue.pop_front() {
        if p == target {
            return Some(reconstruct(grid, &came_from, start, target));
        }

        for n in grid.neighbors(p) {
            if !grid.in_bounds(n) || blocked.contains(&n) {
                continue;
            }
            let idx = grid.cell_index(n);
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            came_from[idx] = Some(p);
            queue.push_back(n);
        }
    }

    None
}

fn reconstruct(grid: Grid, came_from: &[Option<Point>], start: Point, target: Point) -> Vec<Point> {
    let mut path = Vec::new();
    let mut current = target;
    while current != start {
        path.push(current);
        current = came_from[grid.cell_index(current)]
            .expect("every visited cell except the start has a predecessor");
    }
    path.reverse();
    path
}

/// Flood fill from `start` counting reachable cells, `start` included.
/// Stops once `limit` cells have been counted; the limit bounds work, it
/// does not change which cells are reachable.
pub fn reachable_count(grid: Grid, start: Point, blocked: &HashSet<Point>, limit: usize) -> usize {
    let mut visited = vec![false; grid.cell_count()];
    let mut queue = VecDeque::new();
    let mut count = 0;

    visited[grid.cell_index(start)] = true;
    queue.push_back(start);

    while count < limit {
        let Some(p) = queue.pop_front() else { break };
        count += 1;

        for n in grid.neighbors(p) {
            if !grid.in_bounds(n) || blocked.contains(&n) {
                continue;
            }
            let idx = grid.cell_index(n);
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            queue.push_back(n);
        }
    }

    count
}
