use std::fmt;

use common::log;

use crate::game_loop::StateSnapshot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commentary {
    pub text: String,
    pub mood: Mood,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mood {
    Hype,
    Tense,
    Analytical,
    Funny,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mood::Hype => "hype",
            Mood::Tense => "tense",
            Mood::Analytical => "analytical",
            Mood::Funny => "funny",
        };
        write!(f, "{}", name)
    }
}

/// External text-generation collaborator. Given a snapshot it may return a
/// short line with a mood tag; it has no way to influence game state.
pub trait Commentator: Send {
    fn commentary_for(&self, snapshot: &StateSnapshot) -> Result<Option<Commentary>, String>;
}

/// Default collaborator: commentary disabled.
pub struct NoCommentary;

impl Commentator for NoCommentary {
    fn commentary_for(&self, _snapshot: &StateSnapshot) -> Result<Option<Commentary>, String> {
        Ok(None)
    }
}

/// A broken collaborator degrades to silence; the error only hits the log.
pub fn commentary_line(
    commentator: &dyn Commentator,
    snapshot: &StateSnapshot,
) -> Option<Commentary> {
    match commentator.commentary_for(snapshot) {
        Ok(line) => line,
        Err(e) => {
            log!("commentary unavailable: {}", e);
            None
        }
    }
}
