use crate::core::ids::RelateId;
use crate::core::scoring::Score;
use std::collections::BTreeSet;

/// Relationships compatible with a query, ordered by specificity.
///
/// Entries are `(score, id)` pairs held in an ordered set, so two distinct
/// relationships with the same score are both kept. Among equal scores the
/// most recently registered relationship (the larger id) ranks first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelateIdMap {
    entries: BTreeSet<(Score, RelateId)>,
}

impl RelateIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, score: Score, id: RelateId) {
        self.entries.insert((score, id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: RelateId) -> bool {
        self.entries.iter().any(|&(_, candidate)| candidate == id)
    }

    pub fn score_of(&self, id: RelateId) -> Option<Score> {
        self.entries
            .iter()
            .find(|&&(_, candidate)| candidate == id)
            .map(|&(score, _)| score)
    }

    /// Lowest score first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Score, RelateId)> + '_ {
        self.entries.iter().copied()
    }

    /// Highest score first; the order the resolver walks candidates in.
    pub fn iter_best_first(&self) -> impl Iterator<Item = (Score, RelateId)> + '_ {
        self.iter().rev()
    }

    pub fn best(&self) -> Option<(Score, RelateId)> {
        self.entries.last().copied()
    }
}

impl FromIterator<(Score, RelateId)> for RelateIdMap {
    fn from_iter<I: IntoIterator<Item = (Score, RelateId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(Score, RelateId)> for RelateIdMap {
    fn extend<I: IntoIterator<Item = (Score, RelateId)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u64, id: u32) -> (Score, RelateId) {
        (Score::from(score), RelateId::new(id))
    }

    #[test]
    fn equal_scores_do_not_overwrite_each_other() {
        let map: RelateIdMap = [entry(100, 1), entry(100, 2)].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert!(map.contains(RelateId::new(1)));
        assert!(map.contains(RelateId::new(2)));
    }

    #[test]
    fn best_first_orders_by_score_then_newest_id() {
        let map: RelateIdMap = [entry(50, 9), entry(100, 1), entry(100, 4)]
            .into_iter()
            .collect();
        let order: Vec<_> = map.iter_best_first().map(|(_, id)| id.get()).collect();
        assert_eq!(order, vec![4, 1, 9]);
        assert_eq!(map.best(), Some(entry(100, 4)));
    }

    #[test]
    fn iter_is_ascending() {
        let map: RelateIdMap = [entry(3, 1), entry(1, 2), entry(2, 3)].into_iter().collect();
        let scores: Vec<_> = map.iter().map(|(score, _)| score.value()).collect();
        assert_eq!(scores, vec![1, 2, 3]);
    }

    #[test]
    fn score_of_reports_inserted_score() {
        let mut map = RelateIdMap::new();
        map.insert(Score::from(7), RelateId::new(2));
        assert_eq!(map.score_of(RelateId::new(2)), Some(Score::from(7)));
        assert_eq!(map.score_of(RelateId::new(3)), None);
        assert!(RelateIdMap::new().is_empty());
    }
}
