use livewatch_common::models::LiveStream;

/// Picks the one stream to feature.
///
/// Owner streams win over any non-owner regardless of priority; within the
/// chosen group the highest priority wins and ties go to the earlier entry.
/// Dismissed entries must be filtered out by the caller.
pub fn select_primary(streams: &[LiveStream]) -> Option<&LiveStream> {
    let owners: Vec<&LiveStream> = streams.iter().filter(|s| s.is_owner).collect();
    let mut candidates: Vec<&LiveStream> = if owners.is_empty() {
        streams.iter().collect()
    } else {
        owners
    };
    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
    candidates.into_iter().next()
}
