//! Data structures for the bracket tournament: teams, matchups, matches.

mod game;
mod matchup;
mod player;
mod team;
mod tournament;

pub use game::{games_total, sets_winner, GameMatch, MatchCategory, MatchStatus, SetScore, Side};
pub use matchup::{Matchup, MatchupSide, MatchupStatus, Origin, OriginParseError, Phase};
pub use player::{Gender, Player, PlayerStats};
pub use team::{StatsDelta, Team, TeamSize, TeamStats};
pub use tournament::{
    MatchId, MatchupId, PlayerId, StageId, TeamId, TournamentError, TournamentResult,
    ValidationError,
};
