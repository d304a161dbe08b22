//! Team bracket tournaments: round-robin groups followed by a knockout bracket,
//! for teams fielding 4 or 6 players.

pub mod config;
pub mod engine;
pub mod logic;
pub mod models;
pub mod store;

pub use config::TournamentConfig;
pub use engine::{BatchOutcome, BracketEngine};
pub use logic::{
    classify, elimination_templates, fill_elimination_slots, generate_groups_and_bracket,
    record_match_result, round_robin, snake_draft, BracketLayout, FillSummary,
    GenerationSummary, ResultOutcome,
};
pub use models::{
    Gender, GameMatch, MatchCategory, MatchId, MatchStatus, Matchup, MatchupId, MatchupSide,
    MatchupStatus, Origin, Phase, Player, PlayerId, PlayerStats, SetScore, Side, StageId,
    StatsDelta, Team, TeamId, TeamSize, TeamStats, TournamentError, TournamentResult,
    ValidationError,
};
pub use store::{InMemoryStore, StoreError, TournamentStore};
