use std::collections::HashSet;

use crate::config::GameConfig;
use crate::log;
use super::grid::Grid;
use super::session_rng::SessionRng;
use super::snake::Snake;
use super::spawn::spawn_food;
use super::types::{Direction, Point};

/// Full board state for one round. `step` never mutates in place: each tick
/// produces a fresh value the host publishes as a whole, so readers never
/// see a half-applied transition.
#[derive(Clone, Debug)]
pub struct GameState {
    pub snake: Snake,
    pub food: Point,
    pub score: u32,
    pub game_over: bool,
    pub grid: Grid,
    pub direction: Direction,
    pub obstacles: Vec<Point>,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            snake: Snake::from_segments(config.initial_snake.iter().copied()),
            food: config.initial_food,
            score: 0,
            game_over: false,
            grid: Grid::new(config.grid_size),
            direction: config.initial_direction,
            obstacles: Vec::new(),
        }
    }

    /// Applies one tick: moves the head along `direction`, resolving
    /// collision, growth and food respawn. The result carries `direction`
    /// regardless of outcome; on collision only `game_over` changes beyond
    /// that.
    pub fn step(&self, direction: Direction, rng: &mut SessionRng) -> GameState {
        let mut next = self.clone();
        next.direction = direction;
        if self.game_over {
            return next;
        }

        let new_head = self.snake.head().step(direction);
        // Decided before the collision check: an eating move keeps the tail
        // in place, which changes what counts as a body hit.
        let will_eat = new_head == self.food;

        if self.collides(new_head, will_eat) {
            next.game_over = true;
            return next;
        }

        if will_eat {
            next.snake.grow_head(new_head);
            next.score += 1;
            log!("food eaten at ({}, {}), score {}", new_head.x, new_head.y, next.score);

            let mut occupied: HashSet<Point> = next.snake.segments().collect();
            occupied.extend(next.obstacles.iter().copied());
            next.food = spawn_food(next.grid, &occupied, rng);
            if next.food == Point::NONE {
                log!("board full, no cell left for food");
            }
        } else {
            next.snake.advance(new_head);
        }

        next
    }

    fn collides(&self, head: Point, will_eat: bool) -> bool {
        if !self.grid.in_bounds(head) {
            return true;
        }
        if self.obstacles.contains(&head) {
            return true;
        }
        // The tail cell only counts as a hit when eating keeps it occupied.
        self.snake.contains(head) && (will_eat || head != self.snake.tail())
    }
}
