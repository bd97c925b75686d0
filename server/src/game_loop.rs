use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};

use common::game::{plan_move, spawn_food, spawn_free_cell, Direction, GameState, Point, SessionRng};
use common::{log, GameConfig};

use crate::commentary::{commentary_line, Commentator};

/// Mutation requests from collaborators. Applied between ticks, never
/// mid-tick: the select loop serializes command handling with stepping.
#[derive(Debug)]
pub enum LoopCommand {
    Pause,
    Resume,
    Reset,
    SpawnObstacles(u32),
    SpeedBoost { factor: u32, duration: Duration },
    SetTickInterval(Duration),
}

#[derive(Clone)]
pub struct LoopHandle {
    tx: mpsc::Sender<LoopCommand>,
}

impl LoopHandle {
    pub fn new(tx: mpsc::Sender<LoopCommand>) -> Self {
        Self { tx }
    }

    pub async fn send(&self, command: LoopCommand) {
        if self.tx.send(command).await.is_err() {
            log!("game loop is gone, command dropped");
        }
    }
}

/// Read-only view published after every committed transition. Render
/// collaborators consume this; they never touch the live state.
#[derive(Clone, Debug, Serialize)]
pub struct StateSnapshot {
    pub tick: u64,
    pub grid_size: i32,
    pub snake: Vec<Point>,
    pub food: Point,
    pub obstacles: Vec<Point>,
    pub direction: Direction,
    pub score: u32,
    pub game_over: bool,
    pub paused: bool,
}

/// At most one speed multiplier is in effect; further requests wait their
/// turn in FIFO order and never stack.
struct BoostSchedule {
    active: Option<ActiveBoost>,
    queued: VecDeque<QueuedBoost>,
}

struct ActiveBoost {
    factor: u32,
    expires_at: Instant,
}

struct QueuedBoost {
    factor: u32,
    duration: Duration,
}

impl BoostSchedule {
    fn new() -> Self {
        Self { active: None, queued: VecDeque::new() }
    }

    fn request(&mut self, factor: u32, duration: Duration) {
        self.queued.push_back(QueuedBoost { factor, duration });
    }

    /// Expires a lapsed multiplier and promotes the next queued one. The
    /// promoted boost's clock starts at `now`, not at request time.
    fn refresh(&mut self, now: Instant) {
        if let Some(active) = &self.active
            && now >= active.expires_at
        {
            log!("speed boost x{} expired", active.factor);
            self.active = None;
        }
        if self.active.is_none()
            && let Some(next) = self.queued.pop_front()
        {
            log!("speed boost x{} active for {}ms", next.factor, next.duration.as_millis());
            self.active = Some(ActiveBoost {
                factor: next.factor,
                expires_at: now + next.duration,
            });
        }
    }

    fn factor(&self) -> u32 {
        self.active.as_ref().map_or(1, |active| active.factor)
    }

    fn clear(&mut self) {
        self.active = None;
        self.queued.clear();
    }
}

/// Drives the round: one planner + transition invocation per elapsed
/// interval, strictly serialized. Owns the single current-state value and
/// threads it through the pure `plan_move`/`step` calls.
pub struct GameLoop {
    config: GameConfig,
    state: GameState,
    rng: SessionRng,
    snapshots: watch::Sender<StateSnapshot>,
    commentator: Box<dyn Commentator>,
    base_interval: Duration,
    boosts: BoostSchedule,
    paused: bool,
    tick: u64,
}

impl GameLoop {
    pub fn new(
        config: GameConfig,
        rng: SessionRng,
        commentator: Box<dyn Commentator>,
    ) -> (Self, watch::Receiver<StateSnapshot>) {
        let state = GameState::new(&config);
        let base_interval = config.tick_interval();
        let snapshots = watch::Sender::new(snapshot_of(&state, 0, false));
        let snapshot_rx = snapshots.subscribe();

        let game_loop = Self {
            config,
            state,
            rng,
            snapshots,
            commentator,
            base_interval,
            boosts: BoostSchedule::new(),
            paused: false,
            tick: 0,
        };
        (game_loop, snapshot_rx)
    }

    pub async fn run(mut self, mut commands: mpsc::Receiver<LoopCommand>) {
        let mut next_tick = Instant::now() + self.current_interval();
        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        // Every handle dropped: the host is shutting down.
                        None => break,
                    }
                }
                _ = sleep_until(next_tick) => {
                    self.boosts.refresh(Instant::now());
                    if !self.paused && !self.state.game_over {
                        self.advance();
                    }
                    // Rescheduling from now: a stalled loop fires one tick
                    // when it wakes, never a catch-up burst.
                    next_tick = Instant::now() + self.current_interval();
                }
            }
        }
    }

    fn current_interval(&self) -> Duration {
        self.base_interval / self.boosts.factor().max(1)
    }

    fn advance(&mut self) {
        let planned =
            plan_move(self.state.grid, &self.state.snake, self.state.food, &self.state.obstacles);
        // No plan means no safe cell exists; keep heading and let the
        // transition record the collision.
        let direction = planned.unwrap_or(self.state.direction);

        let next = self.state.step(direction, &mut self.rng);
        let ended = next.game_over && !self.state.game_over;
        self.state = next;
        self.tick += 1;
        self.publish();

        if ended {
            log!(
                "game over: score {}, {} obstacles on the board",
                self.state.score,
                self.state.obstacles.len()
            );
            if let Some(line) = commentary_line(self.commentator.as_ref(), &self.snapshot()) {
                log!("commentary [{}]: {}", line.mood, line.text);
            }
        }
    }

    fn handle_command(&mut self, command: LoopCommand) {
        match command {
            LoopCommand::Pause => {
                if !self.paused {
                    self.paused = true;
                    log!("paused");
                    self.publish();
                }
            }
            LoopCommand::Resume => {
                if self.paused {
                    self.paused = false;
                    log!("resumed");
                    self.publish();
                }
            }
            LoopCommand::Reset => self.reset_round(),
            LoopCommand::SpawnObstacles(count) => self.spawn_obstacles(count),
            LoopCommand::SpeedBoost { factor, duration } => {
                log!("speed boost x{} queued for {}ms", factor, duration.as_millis());
                self.boosts.request(factor, duration);
            }
            LoopCommand::SetTickInterval(interval) => {
                log!("tick interval set to {}ms", interval.as_millis());
                self.base_interval = interval;
            }
        }
    }

    /// Discards the round wholesale: timers, queued boosts and obstacles go
    /// with it, and a fresh state takes over before the next tick.
    fn reset_round(&mut self) {
        let mut state = GameState::new(&self.config);
        let occupied: HashSet<Point> = state.snake.segments().collect();
        state.food = spawn_food(state.grid, &occupied, &mut self.rng);
        self.state = state;
        self.boosts.clear();
        self.paused = false;
        self.tick = 0;
        self.publish();
        log!("round reset");
    }

    fn spawn_obstacles(&mut self, count: u32) {
        for _ in 0..count {
            let mut occupied: HashSet<Point> = self.state.snake.segments().collect();
            occupied.extend(self.state.obstacles.iter().copied());
            if self.state.food != Point::NONE {
                occupied.insert(self.state.food);
            }
            match spawn_free_cell(self.state.grid, &occupied, &mut self.rng) {
                Some(cell) => {
                    log!("obstacle spawned at ({}, {})", cell.x, cell.y);
                    self.state.obstacles.push(cell);
                }
                None => {
                    log!("board full, obstacle dropped");
                    break;
                }
            }
        }
        self.publish();
    }

    fn snapshot(&self) -> StateSnapshot {
        snapshot_of(&self.state, self.tick, self.paused)
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

fn snapshot_of(state: &GameState, tick: u64, paused: bool) -> StateSnapshot {
    StateSnapshot {
        tick,
        grid_size: state.grid.size(),
        snake: state.snake.segments().collect(),
        food: state.food,
        obstacles: state.obstacles.clone(),
        direction: state.direction,
        score: state.score,
        game_over: state.game_over,
        paused,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::NoCommentary;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn default_loop() -> (GameLoop, watch::Receiver<StateSnapshot>) {
        GameLoop::new(GameConfig::default(), SessionRng::new(42), Box::new(NoCommentary))
    }

    #[test]
    fn test_advance_publishes_the_next_state() {
        let (mut game_loop, snapshots) = default_loop();
        game_loop.advance();

        let snapshot = snapshots.borrow();
        assert_eq!(snapshot.tick, 1);
        assert!(!snapshot.game_over);
        assert_eq!(snapshot.snake.len(), 3);
    }

    #[test]
    fn test_obstacle_command_places_free_cells() {
        let (mut game_loop, snapshots) = default_loop();
        game_loop.handle_command(LoopCommand::SpawnObstacles(3));

        let snapshot = snapshots.borrow();
        assert_eq!(snapshot.obstacles.len(), 3);
        for obstacle in &snapshot.obstacles {
            assert!(!snapshot.snake.contains(obstacle));
            assert_ne!(*obstacle, snapshot.food);
        }
    }

    #[test]
    fn test_reset_clears_obstacles_and_boosts() {
        let (mut game_loop, snapshots) = default_loop();
        game_loop.handle_command(LoopCommand::SpawnObstacles(2));
        game_loop.handle_command(LoopCommand::SpeedBoost { factor: 4, duration: ms(2000) });
        game_loop.handle_command(LoopCommand::Pause);
        game_loop.boosts.refresh(Instant::now());
        assert_eq!(game_loop.boosts.factor(), 4);

        game_loop.handle_command(LoopCommand::Reset);
        assert_eq!(game_loop.boosts.factor(), 1);
        assert_eq!(game_loop.current_interval(), game_loop.base_interval);

        let snapshot = snapshots.borrow();
        assert!(snapshot.obstacles.is_empty());
        assert!(!snapshot.paused);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.score, 0);
    }

    #[test]
    fn test_boosts_are_exclusive_and_fifo() {
        let mut schedule = BoostSchedule::new();
        let t0 = Instant::now();

        schedule.request(2, ms(2000));
        schedule.request(4, ms(2000));

        schedule.refresh(t0);
        assert_eq!(schedule.factor(), 2);

        // The queued x4 must not stack onto the running x2.
        schedule.refresh(t0 + ms(1000));
        assert_eq!(schedule.factor(), 2);

        // x2 lapses, x4 takes over with a fresh clock.
        schedule.refresh(t0 + ms(2000));
        assert_eq!(schedule.factor(), 4);

        schedule.refresh(t0 + ms(3999));
        assert_eq!(schedule.factor(), 4);

        schedule.refresh(t0 + ms(4000));
        assert_eq!(schedule.factor(), 1);
    }

    #[test]
    fn test_boost_clock_starts_at_activation() {
        let mut schedule = BoostSchedule::new();
        let t0 = Instant::now();

        schedule.request(2, ms(500));
        // Requested long ago, first refreshed now: still runs its full span.
        schedule.refresh(t0 + ms(10_000));
        assert_eq!(schedule.factor(), 2);
        schedule.refresh(t0 + ms(10_499));
        assert_eq!(schedule.factor(), 2);
        schedule.refresh(t0 + ms(10_500));
        assert_eq!(schedule.factor(), 1);
    }

    #[test]
    fn test_clear_drops_active_and_queue() {
        let mut schedule = BoostSchedule::new();
        let t0 = Instant::now();

        schedule.request(2, ms(2000));
        schedule.request(4, ms(2000));
        schedule.refresh(t0);
        assert_eq!(schedule.factor(), 2);

        schedule.clear();
        assert_eq!(schedule.factor(), 1);
        schedule.refresh(t0 + ms(1));
        assert_eq!(schedule.factor(), 1);
    }
}
