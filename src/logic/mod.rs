//! Tournament business logic: scheduling, brackets, standings, results.

pub mod classification;
pub mod groups;
pub mod lineup;
pub mod results;
pub mod round_robin;
mod setup;
mod slots;
pub mod templates;

pub use classification::{classify, compare_teams, group_standings, rank_teams};
pub use groups::{group_count_for, group_label, snake_draft};
pub use results::{
    decided_winner, generate_decider_if_needed, needs_decider, record_match_result,
    ResultOutcome,
};
pub use round_robin::{circle_schedule, round_robin, Pairing};
pub use setup::{generate_groups_and_bracket, GenerationSummary};
pub use slots::{fill_elimination_slots, FillSummary};
pub use templates::{elimination_templates, BracketLayout, MatchupTemplate, TemplateSlot};
