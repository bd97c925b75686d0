use std::time::Duration;

use super::RelayEvent;

/// One obstacle per full hundred likes crossed.
pub const LIKES_PER_OBSTACLE: u64 = 100;
/// Accumulated diamonds convert to obstacles at this exchange rate.
pub const POINTS_PER_OBSTACLE: u64 = 5;
/// Fixed span of a tier-granted speed boost.
pub const BOOST_DURATION: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayEffect {
    SpawnObstacles(u32),
    SpeedBoost { factor: u32, duration: Duration },
}

/// Converts canonical relay events into game effects. Pure accounting: no
/// knowledge of the loop or the board, so every rule is testable in
/// isolation.
#[derive(Debug, Default)]
pub struct EventPolicy {
    last_like_total: Option<u64>,
    diamond_points: u64,
}

impl EventPolicy {
    pub fn apply(&mut self, event: &RelayEvent) -> Vec<RelayEffect> {
        match *event {
            RelayEvent::Like { total_like_count } => self.apply_like_total(total_like_count),
            RelayEvent::Gift { diamonds: Some(diamonds), .. } => self.apply_diamonds(diamonds),
            RelayEvent::Gift { diamonds: None, tier: Some(tier) } => Self::apply_tier(tier),
            RelayEvent::Gift { diamonds: None, tier: None } => Vec::new(),
        }
    }

    /// One obstacle per full hundred crossed since the last observed total.
    /// The first observation only sets the baseline; history before it does
    /// not spawn anything retroactively.
    fn apply_like_total(&mut self, reported: u64) -> Vec<RelayEffect> {
        let Some(last) = self.last_like_total else {
            self.last_like_total = Some(reported);
            return Vec::new();
        };
        // The total is monotonic: a source reporting a lower number cannot
        // re-cross a threshold later.
        let total = reported.max(last);
        self.last_like_total = Some(total);

        let crossed = total / LIKES_PER_OBSTACLE - last / LIKES_PER_OBSTACLE;
        if crossed == 0 {
            return Vec::new();
        }
        vec![RelayEffect::SpawnObstacles(crossed as u32)]
    }

    fn apply_diamonds(&mut self, diamonds: u64) -> Vec<RelayEffect> {
        self.diamond_points += diamonds;
        let spawned = self.diamond_points / POINTS_PER_OBSTACLE;
        self.diamond_points %= POINTS_PER_OBSTACLE;
        if spawned == 0 {
            return Vec::new();
        }
        vec![RelayEffect::SpawnObstacles(spawned as u32)]
    }

    /// Coarse fallback for gifts without diamond data.
    fn apply_tier(tier: u32) -> Vec<RelayEffect> {
        match tier {
            1 => vec![RelayEffect::SpeedBoost { factor: 2, duration: BOOST_DURATION }],
            2 => vec![RelayEffect::SpeedBoost { factor: 4, duration: BOOST_DURATION }],
            3 => vec![RelayEffect::SpawnObstacles(1)],
            4 => vec![RelayEffect::SpawnObstacles(3)],
            5 => vec![RelayEffect::SpawnObstacles(5)],
            _ => Vec::new(),
        }
    }
}
