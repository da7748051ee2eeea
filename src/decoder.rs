use crate::models::Decision;

/// Trained label set of the classifier.
const DECISIONS: [(i64, Decision); 2] = [(1, Decision::Approved), (0, Decision::Rejected)];

/// Maps a classifier label to its decision; labels outside the trained set
/// decode to [`Decision::Unknown`].
pub fn decode(label: i64) -> Decision {
    DECISIONS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, decision)| *decision)
        .unwrap_or(Decision::Unknown)
}
