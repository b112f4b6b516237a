use crate::domain::model::{Fixture, Group, Legs, Participant, TimeSlot};
use crate::utils::error::{CupError, Result};
use crate::utils::validation::validate_strictly_ascending;
use std::collections::BTreeMap;

/// Number of distinct playing rounds one leg needs. Odd groups are padded
/// with a bye, so 3 and 4 members both need 3 gameweeks.
pub fn required_slots(member_count: usize) -> usize {
    if member_count < 2 {
        return 0;
    }
    member_count + member_count % 2 - 1
}

/// 圓圈法排出整組賽程，第二循環主客對調。
///
/// Round `r` is played in `selected_slots[r % required_slots]`, so the return
/// leg reuses the gameweeks of the first leg. Fails before emitting anything
/// when fewer gameweeks are selected than one leg needs.
pub fn generate_schedule(
    group: &Group,
    legs: Legs,
    selected_slots: &[TimeSlot],
) -> Result<Vec<Fixture>> {
    validate_strictly_ascending("gameweeks", selected_slots)
        .map_err(|e| CupError::validation(e.to_string()))?;

    let required = required_slots(group.len());
    if selected_slots.len() < required {
        return Err(CupError::InsufficientSlotsError {
            group: group.name.clone(),
            required,
            available: selected_slots.len(),
        });
    }
    if required == 0 {
        tracing::debug!("{} has a single member, no fixtures to schedule", group.name);
        return Ok(Vec::new());
    }

    let rounds = circle_rounds(&group.members);
    let mut fixtures = Vec::with_capacity(legs.count() * rounds.iter().map(Vec::len).sum::<usize>());

    for leg in 0..legs.count() {
        for (index, pairings) in rounds.iter().enumerate() {
            let round_index = leg * rounds.len() + index;
            let slot = selected_slots[round_index % required];
            for &(home, away) in pairings {
                let (home, away) = if leg == 0 { (home, away) } else { (away, home) };
                fixtures.push(Fixture {
                    group: group.name.clone(),
                    round: round_index + 1,
                    slot,
                    home: home.clone(),
                    away: away.clone(),
                });
            }
        }
    }

    tracing::debug!(
        "{}: {} fixtures over {} rounds",
        group.name,
        fixtures.len(),
        rounds.len() * legs.count()
    );
    Ok(fixtures)
}

/// One leg of pairings. `None` is the bye and never leaves this function.
fn circle_rounds(members: &[Participant]) -> Vec<Vec<(&Participant, &Participant)>> {
    let mut working: Vec<Option<&Participant>> = members.iter().map(Some).collect();
    if working.len() % 2 == 1 {
        working.push(None);
    }

    let n = working.len();
    let mut rounds = Vec::with_capacity(n - 1);
    for round in 0..n - 1 {
        let mut pairings = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (Some(first), Some(second)) = (working[i], working[n - 1 - i]) else {
                continue;
            };
            // 固定位置的隊伍永遠主場，其餘依輪次奇偶交替
            if i == 0 || round % 2 == 0 {
                pairings.push((first, second));
            } else {
                pairings.push((second, first));
            }
        }
        rounds.push(pairings);
        working[1..].rotate_right(1);
    }
    rounds
}

/// 依比賽週分組，方便逐週顯示
pub fn fixtures_by_slot(fixtures: &[Fixture]) -> BTreeMap<TimeSlot, Vec<&Fixture>> {
    let mut by_slot: BTreeMap<TimeSlot, Vec<&Fixture>> = BTreeMap::new();
    for fixture in fixtures {
        by_slot.entry(fixture.slot).or_default().push(fixture);
    }
    by_slot
}
