use std::collections::HashSet;

use super::grid::Grid;
use super::pathfind::{reachable_count, shortest_path};
use super::snake::Snake;
use super::types::{Direction, Point};

/// Picks the snake's next direction from the current board. Pure: two calls
/// with identical inputs return identical output.
///
/// Three strategies, strictly ordered: a safe shortest path to food, then
/// tail-chasing to stall, then whichever direction keeps the most area
/// reachable. Ties always keep the first candidate in the fixed UP, DOWN,
/// LEFT, RIGHT order.
pub fn plan_move(grid: Grid, snake: &Snake, food: Point, obstacles: &[Point]) -> Option<Direction> {
    let head = snake.head();
    let tail = snake.tail();

    // The tail vacates its cell this tick (absent eating), so candidate
    // moves and stall paths treat it as free.
    let mut vacated_blocked: HashSet<Point> = snake.segments().collect();
    vacated_blocked.remove(&tail);
    vacated_blocked.extend(obstacles.iter().copied());

    let candidates: Vec<(Direction, Point)> = Direction::ALL
        .iter()
        .map(|&dir| (dir, head.step(dir)))
        .filter(|&(_, cell)| grid.in_bounds(cell) && !vacated_blocked.contains(&cell))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    // Strategy 1: shortest path to food, accepted only if the current tail
    // cell is still reachable from the food once the whole path is committed.
    let mut full_blocked: HashSet<Point> = snake.segments().collect();
    full_blocked.extend(obstacles.iter().copied());

    let mut best_food: Option<(Direction, usize)> = None;
    for &(dir, cell) in &candidates {
        let Some(path) = shortest_path(grid, cell, food, &full_blocked) else {
            continue;
        };
        let mut projected = full_blocked.clone();
        projected.extend(path.iter().copied());
        projected.remove(&food); // where the head ends up
        projected.remove(&tail); // vacated by the time the food is reached
        if shortest_path(grid, food, tail, &projected).is_none() {
            continue;
        }
        if best_food.is_none_or(|(_, len)| path.len() < len) {
            best_food = Some((dir, path.len()));
        }
    }
    if let Some((dir, _)) = best_food {
        return Some(dir);
    }

    // Strategy 2: no safe route to food; chase the tail, preferring the
    // longest path to buy as many ticks as possible.
    let mut best_stall: Option<(Direction, usize)> = None;
    for &(dir, cell) in &candidates {
        let Some(path) = shortest_path(grid, cell, tail, &vacated_blocked) else {
            continue;
        };
        if best_stall.is_none_or(|(_, len)| path.len() > len) {
            best_stall = Some((dir, path.len()));
        }
    }
    if let Some((dir, _)) = best_stall {
        return Some(dir);
    }

    // Strategy 3: cornered; take the direction with the most room left.
    let limit = snake.len() * 2;
    let mut best_area: Option<(Direction, usize)> = None;
    for &(dir, cell) in &candidates {
        let area = reachable_count(grid, cell, &vacated_blocked, limit);
        if best_area.is_none_or(|(_, a)| area > a) {
            best_area = Some((dir, area));
        }
    }
    if let Some((dir, _)) = best_area {
        return Some(dir);
    }

    candidates.first().map(|&(dir, _)| dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_from(points: &[(i32, i32)]) -> Snake {
        Snake::from_segments(points.iter().map(|&(x, y)| Point::new(x, y)))
    }

    #[test]
    fn test_open_row_goes_straight_for_food() {
        let grid = Grid::new(10);
        let snake = snake_from(&[(5, 5), (4, 5), (3, 5), (2, 5)]);
        let food = Point::new(9, 5);
        assert_eq!(plan_move(grid, &snake, food, &[]), Some(Direction::Right));
    }

    #[test]
    fn test_identical_inputs_give_identical_output() {
        let grid = Grid::new(10);
        let snake = snake_from(&[(5, 5), (5, 6), (5, 7), (4, 7), (3, 7), (3, 6), (3, 5), (4, 5)]);
        let food = Point::new(6, 5);
        let first = plan_move(grid, &snake, food, &[]);
        let second = plan_move(grid, &snake, food, &[]);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_corner_food_tie_keeps_first_neighbor_order() {
        // Up and Left both reach the corner food in one step; the fixed
        // neighbor order keeps Up.
        let grid = Grid::new(10);
        let snake = snake_from(&[(1, 1), (1, 2), (1, 3), (2, 3), (3, 3)]);
        let food = Point::new(0, 0);
        assert_eq!(plan_move(grid, &snake, food, &[]), Some(Direction::Up));
    }

    #[test]
    fn test_obstacle_blocks_direct_route() {
        let grid = Grid::new(10);
        let snake = snake_from(&[(5, 5), (4, 5), (3, 5), (2, 5)]);
        let food = Point::new(9, 5);
        let obstacles = [Point::new(6, 5)];
        // Right is no longer a valid candidate; Up and Down tie at distance
        // five and Up comes first.
        assert_eq!(plan_move(grid, &snake, food, &obstacles), Some(Direction::Up));
    }

    #[test]
    fn test_sealed_food_falls_back_to_longest_tail_chase() {
        // Food in the corner sealed off by the snake's own body, tail out in
        // the open: no safe food route exists, so the stall strategy takes
        // the longest path to the tail (Right, length 5, over Down/Left at
        // length 3).
        let grid = Grid::new(7);
        let snake = snake_from(&[(3, 1), (3, 0), (2, 0), (1, 0), (1, 1), (0, 1), (0, 2)]);
        let food = Point::new(0, 0);
        assert_eq!(plan_move(grid, &snake, food, &[]), Some(Direction::Right));
    }

    #[test]
    fn test_cornered_snake_picks_larger_chamber() {
        // The body walls off the board: food and tail are both sealed, so
        // neither the food nor the stall strategy applies. Left leads into a
        // 3-cell pocket, Right into a 9-cell one; the area strategy must
        // pick Right, not give up.
        let grid = Grid::new(7);
        let snake = snake_from(&[
            (3, 2),
            (3, 1),
            (3, 0),
            (2, 0),
            (1, 0),
            (1, 1),
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 3),
            (2, 3),
            (3, 3),
            (4, 3),
            (5, 3),
            (6, 3),
            (6, 4),
            (6, 5),
            (5, 5),
            (5, 6),
            (6, 6),
        ]);
        let food = Point::new(0, 0);
        assert_eq!(plan_move(grid, &snake, food, &[]), Some(Direction::Right));
    }

    #[test]
    fn test_no_valid_candidate_returns_none() {
        // Head boxed into the corner by its own body; the tail is too far
        // away to vacate anything useful.
        let grid = Grid::new(10);
        let snake = snake_from(&[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2), (1, 2)]);
        let food = Point::new(5, 5);
        assert_eq!(plan_move(grid, &snake, food, &[]), None);
    }

    #[test]
    fn test_safe_move_never_enters_body_or_walls() {
        let grid = Grid::new(10);
        let scenarios = [
            snake_from(&[(5, 5), (4, 5), (3, 5), (2, 5)]),
            snake_from(&[(0, 0), (0, 1), (0, 2), (1, 2)]),
            snake_from(&[(9, 9), (8, 9), (7, 9), (7, 8)]),
            snake_from(&[(5, 5), (5, 6), (5, 7), (4, 7), (3, 7), (3, 6), (3, 5), (4, 5)]),
        ];
        let food = Point::new(6, 2);
        for snake in &scenarios {
            let dir = plan_move(grid, snake, food, &[]).expect("a safe move exists");
            let cell = snake.head().step(dir);
            assert!(grid.in_bounds(cell));
            assert!(!snake.contains(cell) || cell == snake.tail());
        }
    }
}
