//! Group draw: how many groups, their labels, and the snake draft.

/// Groups exist from this many teams on.
pub const MIN_TEAMS_FOR_GROUPS: usize = 6;

/// Largest group the draw produces.
pub const MAX_GROUP_SIZE: usize = 4;

/// Group count derived from the team count: groups of 3, the remainder
/// absorbed into groups of 4. Below 6 teams everybody plays one round robin.
pub fn group_count_for(team_count: usize) -> usize {
    if team_count < MIN_TEAMS_FOR_GROUPS {
        1
    } else {
        team_count / 3
    }
}

/// "A", "B", ... "Z", then "AA", "AB", ...
pub fn group_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut i = index;
    loop {
        label.push(b'A' + (i % 26) as u8);
        if i < 26 {
            break;
        }
        i = i / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// Boustrophedon group index for the team at seeding position `index`.
pub fn snake_group_index(index: usize, group_count: usize) -> usize {
    let round = index / group_count;
    let pos = index % group_count;
    if round % 2 == 0 {
        pos
    } else {
        group_count - 1 - pos
    }
}

/// Group label per team, in the order given.
pub fn snake_draft<T: Copy>(teams: &[T], group_count: usize) -> Vec<(T, String)> {
    if group_count == 0 {
        return Vec::new();
    }
    teams
        .iter()
        .enumerate()
        .map(|(i, t)| (*t, group_label(snake_group_index(i, group_count))))
        .collect()
}
