//! Knockout bracket templates for 2 to 8 groups.
//!
//! Every supported group count has a fixed first-round pairing table. The rounds
//! after it always pair consecutive winners. Templates are built deepest round
//! first (final, semis, quarters, round of 16) so each matchup can point at the
//! already-created matchup its winner advances to. References are indices into
//! the returned batch; ids are assigned when the batch is persisted.

use crate::models::Phase;

/// A first-round slot in a pairing table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Seed {
    /// Winner of the group with this index.
    First(u8),
    /// Runner-up of the group with this index.
    Second(u8),
    Bye,
}

use Seed::{Bye, First, Second};

/// Side of a template matchup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TemplateSlot {
    Group { rank: u8, group: String },
    /// Winner of the template at this index.
    WinnerOf(usize),
    Bye,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchupTemplate {
    pub phase: Phase,
    /// 1-based position within its round, top of the bracket first.
    pub sequence: u32,
    pub side_1: TemplateSlot,
    pub side_2: TemplateSlot,
    /// Index of the template the winner advances to.
    pub next: Option<usize>,
    pub is_bye: bool,
}

const TWO_GROUPS: [(Seed, Seed); 2] = [(First(0), Second(1)), (First(1), Second(0))];

const THREE_GROUPS: [(Seed, Seed); 4] = [
    (First(0), Bye),
    (First(2), Second(1)),
    (First(1), Bye),
    (Second(0), Second(2)),
];

const FOUR_GROUPS: [(Seed, Seed); 4] = [
    (First(0), Second(1)),
    (First(2), Second(3)),
    (First(1), Second(0)),
    (First(3), Second(2)),
];

const FIVE_GROUPS: [(Seed, Seed); 8] = [
    (First(0), Bye),
    (Second(2), Second(3)),
    (First(4), Bye),
    (Second(1), Bye),
    (First(1), Bye),
    (Second(0), Second(4)),
    (First(2), Bye),
    (First(3), Bye),
];

const SIX_GROUPS: [(Seed, Seed); 8] = [
    (First(0), Bye),
    (First(5), Second(4)),
    (First(2), Bye),
    (Second(1), Second(3)),
    (First(1), Bye),
    (First(4), Second(5)),
    (First(3), Bye),
    (Second(0), Second(2)),
];

const SEVEN_GROUPS: [(Seed, Seed); 8] = [
    (First(0), Bye),
    (First(2), Second(3)),
    (First(4), Second(5)),
    (First(6), Second(1)),
    (First(1), Bye),
    (First(3), Second(2)),
    (First(5), Second(4)),
    (Second(0), Second(6)),
];

const EIGHT_GROUPS: [(Seed, Seed); 8] = [
    (First(0), Second(1)),
    (First(2), Second(3)),
    (First(4), Second(5)),
    (First(6), Second(7)),
    (First(1), Second(0)),
    (First(3), Second(2)),
    (First(5), Second(4)),
    (First(7), Second(6)),
];

/// The supported bracket topologies, one per group count.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BracketLayout {
    TwoGroups,
    ThreeGroups,
    FourGroups,
    FiveGroups,
    SixGroups,
    SevenGroups,
    EightGroups,
}

const LAYOUTS: [BracketLayout; 7] = [
    BracketLayout::TwoGroups,
    BracketLayout::ThreeGroups,
    BracketLayout::FourGroups,
    BracketLayout::FiveGroups,
    BracketLayout::SixGroups,
    BracketLayout::SevenGroups,
    BracketLayout::EightGroups,
];

/// Largest group count with a knockout bracket.
pub const MAX_BRACKET_GROUPS: usize = 8;

impl BracketLayout {
    /// Registry lookup. None below 2 groups (round robin only) and above 8.
    pub fn for_group_count(groups: usize) -> Option<Self> {
        LAYOUTS.iter().copied().find(|l| l.group_count() == groups)
    }

    pub fn group_count(self) -> usize {
        match self {
            BracketLayout::TwoGroups => 2,
            BracketLayout::ThreeGroups => 3,
            BracketLayout::FourGroups => 4,
            BracketLayout::FiveGroups => 5,
            BracketLayout::SixGroups => 6,
            BracketLayout::SevenGroups => 7,
            BracketLayout::EightGroups => 8,
        }
    }

    pub fn first_round(self) -> &'static [(Seed, Seed)] {
        match self {
            BracketLayout::TwoGroups => &TWO_GROUPS,
            BracketLayout::ThreeGroups => &THREE_GROUPS,
            BracketLayout::FourGroups => &FOUR_GROUPS,
            BracketLayout::FiveGroups => &FIVE_GROUPS,
            BracketLayout::SixGroups => &SIX_GROUPS,
            BracketLayout::SevenGroups => &SEVEN_GROUPS,
            BracketLayout::EightGroups => &EIGHT_GROUPS,
        }
    }

    pub fn bye_count(self) -> usize {
        self.first_round()
            .iter()
            .filter(|(a, b)| *a == Bye || *b == Bye)
            .count()
    }

    /// Rounds from the final back to the first round.
    fn rounds(self) -> &'static [Phase] {
        const ALL: [Phase; 4] = [
            Phase::Final,
            Phase::Semifinal,
            Phase::Quarterfinal,
            Phase::RoundOf16,
        ];
        match self.first_round().len() {
            2 => &ALL[..2],
            4 => &ALL[..3],
            _ => &ALL,
        }
    }

    /// Build the whole bracket for these group labels (sorted, one per group).
    /// None when the label count does not match the layout.
    pub fn generate(self, groups: &[String]) -> Option<Vec<MatchupTemplate>> {
        if groups.len() != self.group_count() {
            return None;
        }
        let slot = |seed: Seed| match seed {
            First(g) => TemplateSlot::Group {
                rank: 1,
                group: groups[g as usize].clone(),
            },
            Second(g) => TemplateSlot::Group {
                rank: 2,
                group: groups[g as usize].clone(),
            },
            Bye => TemplateSlot::Bye,
        };

        let mut templates: Vec<MatchupTemplate> = Vec::new();
        let mut rounds: Vec<Vec<usize>> = Vec::new();
        for (depth, phase) in self.rounds().iter().enumerate() {
            let round: Vec<usize> = (0..1usize << depth)
                .map(|k| {
                    let next = rounds.last().map(|parent: &Vec<usize>| parent[k / 2]);
                    templates.push(MatchupTemplate {
                        phase: *phase,
                        sequence: k as u32 + 1,
                        side_1: TemplateSlot::Bye,
                        side_2: TemplateSlot::Bye,
                        next,
                        is_bye: false,
                    });
                    templates.len() - 1
                })
                .collect();
            rounds.push(round);
        }

        // Later rounds take the winners of consecutive matchups one round deeper.
        for pair in rounds.windows(2) {
            let (round, feeders) = (&pair[0], &pair[1]);
            for (k, &idx) in round.iter().enumerate() {
                templates[idx].side_1 = TemplateSlot::WinnerOf(feeders[2 * k]);
                templates[idx].side_2 = TemplateSlot::WinnerOf(feeders[2 * k + 1]);
            }
        }

        if let Some(first) = rounds.last() {
            for (&idx, &(a, b)) in first.iter().zip(self.first_round()) {
                let t = &mut templates[idx];
                t.side_1 = slot(a);
                t.side_2 = slot(b);
                t.is_bye = b == Bye;
            }
        }
        Some(templates)
    }
}

/// Knockout templates for the given group labels, or None when the stage has no
/// elimination phase. More than 8 groups is accepted with a warning.
pub fn elimination_templates(groups: &[String]) -> Option<Vec<MatchupTemplate>> {
    let mut sorted = groups.to_vec();
    sorted.sort();
    match BracketLayout::for_group_count(sorted.len()) {
        Some(layout) => layout.generate(&sorted),
        None if sorted.len() > MAX_BRACKET_GROUPS => {
            log::warn!(
                "{} groups exceed the largest bracket ({}); no elimination phase generated",
                sorted.len(),
                MAX_BRACKET_GROUPS
            );
            None
        }
        None => None,
    }
}
