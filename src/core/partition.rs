use crate::domain::model::{Group, Participant, ParticipantId};
use crate::utils::error::{CupError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashSet};

pub const MIN_GROUPS: usize = 2;
pub const MAX_GROUPS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionMode {
    /// 依序分配 `i mod G`；有 seed 時先以該 seed 洗牌，沒有則視為已洗好的名單
    Balanced { seed: Option<u64> },
    /// 參賽者 -> 組名
    Manual(BTreeMap<ParticipantId, String>),
}

/// "Group A", "Group B", ...
pub fn group_names(group_count: usize) -> Vec<String> {
    (b'A'..)
        .take(group_count)
        .map(|letter| format!("Group {}", letter as char))
        .collect()
}

pub fn partition_groups(
    participants: &[Participant],
    group_count: usize,
    mode: &PartitionMode,
) -> Result<Vec<Group>> {
    if !(MIN_GROUPS..=MAX_GROUPS).contains(&group_count) {
        return Err(CupError::validation(format!(
            "group count must be between {} and {}, got {}",
            MIN_GROUPS, MAX_GROUPS, group_count
        )));
    }
    ensure_unique(participants)?;

    let names = group_names(group_count);
    let buckets = match mode {
        PartitionMode::Balanced { seed } => balanced(participants, group_count, *seed),
        PartitionMode::Manual(assignments) => manual(participants, &names, assignments)?,
    };

    let groups = names
        .into_iter()
        .zip(buckets)
        .map(|(name, members)| Group::new(name, members))
        .collect::<Result<Vec<_>>>()?;

    for group in &groups {
        tracing::debug!("{} has {} members", group.name, group.len());
    }
    Ok(groups)
}

fn ensure_unique(participants: &[Participant]) -> Result<()> {
    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.id) {
            return Err(CupError::validation(format!(
                "participant {} ({}) appears more than once",
                participant.id, participant.name
            )));
        }
    }
    Ok(())
}

fn balanced(
    participants: &[Participant],
    group_count: usize,
    seed: Option<u64>,
) -> Vec<Vec<Participant>> {
    let mut order = participants.to_vec();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
    }

    let mut buckets = vec![Vec::new(); group_count];
    for (index, participant) in order.into_iter().enumerate() {
        buckets[index % group_count].push(participant);
    }
    buckets
}

fn manual(
    participants: &[Participant],
    names: &[String],
    assignments: &BTreeMap<ParticipantId, String>,
) -> Result<Vec<Vec<Participant>>> {
    let known: HashSet<ParticipantId> = participants.iter().map(|p| p.id).collect();
    if let Some(stray) = assignments.keys().find(|id| !known.contains(id)) {
        return Err(CupError::validation(format!(
            "participant {} is assigned to a group but is not in the roster",
            stray
        )));
    }

    let mut buckets = vec![Vec::new(); names.len()];
    for participant in participants {
        let group_name = assignments.get(&participant.id).ok_or_else(|| {
            CupError::validation(format!(
                "participant {} ({}) is not assigned to any group",
                participant.id, participant.name
            ))
        })?;
        let index = names
            .iter()
            .position(|name| name == group_name)
            .ok_or_else(|| {
                CupError::validation(format!(
                    "participant {} is assigned to undeclared group '{}'",
                    participant.id, group_name
                ))
            })?;
        buckets[index].push(participant.clone());
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(count: u64) -> Vec<Participant> {
        (1..=count)
            .map(|id| Participant::new(id, format!("Team {}", id), format!("Manager {}", id)))
            .collect()
    }

    fn ids(group: &Group) -> Vec<u64> {
        group.members.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn test_group_names() {
        assert_eq!(group_names(3), vec!["Group A", "Group B", "Group C"]);
    }

    #[test]
    fn test_balanced_without_seed_keeps_input_order() {
        let groups =
            partition_groups(&roster(7), 3, &PartitionMode::Balanced { seed: None }).unwrap();
        assert_eq!(ids(&groups[0]), vec![1, 4, 7]);
        assert_eq!(ids(&groups[1]), vec![2, 5]);
        assert_eq!(ids(&groups[2]), vec![3, 6]);
    }

    #[test]
    fn test_balanced_sizes_differ_by_at_most_one() {
        for count in 8..=30 {
            for group_count in MIN_GROUPS..=MAX_GROUPS {
                let groups = partition_groups(
                    &roster(count),
                    group_count,
                    &PartitionMode::Balanced { seed: Some(42) },
                )
                .unwrap();
                let sizes: Vec<usize> = groups.iter().map(Group::len).collect();
                let max = sizes.iter().max().unwrap();
                let min = sizes.iter().min().unwrap();
                assert!(max - min <= 1, "sizes {:?}", sizes);
                assert_eq!(sizes.iter().sum::<usize>(), count as usize);
            }
        }
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let mode = PartitionMode::Balanced { seed: Some(2024) };
        let first = partition_groups(&roster(12), 4, &mode).unwrap();
        let second = partition_groups(&roster(12), 4, &mode).unwrap();
        assert_eq!(first, second);

        let mut all: Vec<u64> = first.iter().flat_map(ids).collect();
        all.sort_unstable();
        assert_eq!(all, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_group_count_bounds() {
        let mode = PartitionMode::Balanced { seed: None };
        assert!(partition_groups(&roster(10), 1, &mode).is_err());
        assert!(partition_groups(&roster(10), 9, &mode).is_err());
    }

    #[test]
    fn test_too_few_participants_for_groups() {
        let result = partition_groups(&roster(3), 4, &PartitionMode::Balanced { seed: None });
        assert!(matches!(result, Err(CupError::ValidationError { .. })));
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let mut participants = roster(4);
        participants.push(Participant::new(2, "Copy", "Copy"));
        let result = partition_groups(&participants, 2, &PartitionMode::Balanced { seed: None });
        assert!(matches!(result, Err(CupError::ValidationError { .. })));
    }

    #[test]
    fn test_manual_assignment() {
        let assignments: BTreeMap<ParticipantId, String> = [
            (ParticipantId(1), "Group B"),
            (ParticipantId(2), "Group A"),
            (ParticipantId(3), "Group B"),
            (ParticipantId(4), "Group A"),
        ]
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect();

        let groups = partition_groups(&roster(4), 2, &PartitionMode::Manual(assignments)).unwrap();
        assert_eq!(groups[0].name, "Group A");
        assert_eq!(ids(&groups[0]), vec![2, 4]);
        assert_eq!(ids(&groups[1]), vec![1, 3]);
    }

    #[test]
    fn test_manual_unassigned_participant() {
        let assignments: BTreeMap<ParticipantId, String> = [
            (ParticipantId(1), "Group A".to_string()),
            (ParticipantId(2), "Group B".to_string()),
        ]
        .into_iter()
        .collect();
        let result = partition_groups(&roster(3), 2, &PartitionMode::Manual(assignments));
        assert!(matches!(result, Err(CupError::ValidationError { .. })));
    }

    #[test]
    fn test_manual_undeclared_group() {
        let assignments: BTreeMap<ParticipantId, String> = [
            (ParticipantId(1), "Group A".to_string()),
            (ParticipantId(2), "Group C".to_string()),
        ]
        .into_iter()
        .collect();
        let result = partition_groups(&roster(2), 2, &PartitionMode::Manual(assignments));
        assert!(matches!(result, Err(CupError::ValidationError { .. })));
    }

    #[test]
    fn test_manual_unknown_participant() {
        let assignments: BTreeMap<ParticipantId, String> = [
            (ParticipantId(1), "Group A".to_string()),
            (ParticipantId(2), "Group B".to_string()),
            (ParticipantId(99), "Group B".to_string()),
        ]
        .into_iter()
        .collect();
        let result = partition_groups(&roster(2), 2, &PartitionMode::Manual(assignments));
        assert!(matches!(result, Err(CupError::ValidationError { .. })));
    }

    #[test]
    fn test_manual_empty_group_rejected() {
        let assignments: BTreeMap<ParticipantId, String> = [
            (ParticipantId(1), "Group A".to_string()),
            (ParticipantId(2), "Group A".to_string()),
        ]
        .into_iter()
        .collect();
        let result = partition_groups(&roster(2), 2, &PartitionMode::Manual(assignments));
        assert!(matches!(result, Err(CupError::ValidationError { .. })));
    }
}
