use crate::domain::model::Participant;

/// A timezone group: participants sharing one resolved UTC offset, with
/// unknown offsets collected under `None`.
pub type TimezoneGroup<'a> = (Option<f64>, Vec<&'a Participant>);

/// Phase 1: partitions the pool by UTC offset.
///
/// Group order follows the offset's first appearance in the pool and input
/// order is preserved inside each group, so later phases inherit a
/// deterministic iteration order.
pub fn cluster_by_timezone(pool: &[Participant]) -> Vec<TimezoneGroup<'_>> {
    let mut groups: Vec<TimezoneGroup<'_>> = Vec::new();

    for participant in pool {
        let offset = participant.timezone_offset;
        match groups.iter_mut().find(|(key, _)| *key == offset) {
            Some((_, members)) => members.push(participant),
            None => groups.push((offset, vec![participant])),
        }
    }

    tracing::info!("Phase 1: found {} distinct timezone groups", groups.len());
    groups
}
