//! Round-robin schedules by the circle method.

use crate::models::TeamId;

/// One pairing of a round-robin schedule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pairing {
    /// 1-based round.
    pub round: u32,
    /// 1-based position across the whole schedule.
    pub sequence: u32,
    pub home: TeamId,
    pub away: TeamId,
    pub group: Option<String>,
}

/// Index pairs `(round, i, j)` covering every unordered pair of `0..n` exactly once.
///
/// Odd `n` gets a virtual bye slot; index 0 stays fixed and the rest rotate one
/// position per round. Pairs touching the bye are dropped.
pub fn circle_schedule(n: usize) -> Vec<(u32, usize, usize)> {
    if n < 2 {
        return Vec::new();
    }
    let mut slots: Vec<Option<usize>> = (0..n).map(Some).collect();
    if n % 2 == 1 {
        slots.push(None);
    }
    let m = slots.len();
    let mut out = Vec::with_capacity(n * (n - 1) / 2);
    for round in 1..m as u32 {
        for i in 0..m / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[m - 1 - i]) {
                out.push((round, a, b));
            }
        }
        slots[1..].rotate_right(1);
    }
    out
}

/// Pair the given teams (in seeding order) once each.
pub fn round_robin(teams: &[TeamId], group: Option<&str>) -> Vec<Pairing> {
    circle_schedule(teams.len())
        .into_iter()
        .enumerate()
        .map(|(i, (round, a, b))| Pairing {
            round,
            sequence: i as u32 + 1,
            home: teams[a],
            away: teams[b],
            group: group.map(str::to_string),
        })
        .collect()
}
