mod grid;
mod pathfind;
mod planner;
mod session_rng;
mod snake;
mod spawn;
mod state;
mod types;

pub use grid::Grid;
pub use pathfind::{reachable_count, shortest_path};
pub use planner::plan_move;
pub use session_rng::SessionRng;
pub use snake::Snake;
pub use spawn::{spawn_food, spawn_free_cell};
pub use state::GameState;
pub use types::{Direction, Point};
