/// Per-category record accumulation
use crate::annotation::{FeatureCategory, FeatureRecord};

/// Six append-only record sequences, one per [`FeatureCategory`], in file order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryStore {
    records: [Vec<FeatureRecord>; 6],
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the end of its category's sequence.
    pub fn push(&mut self, record: FeatureRecord) {
        self.records[record.category.index()].push(record);
    }

    /// Records of one category, in the order they were pushed.
    pub fn records(&self, category: FeatureCategory) -> &[FeatureRecord] {
        &self.records[category.index()]
    }

    /// Number of records held for `category`.
    pub fn len(&self, category: FeatureCategory) -> usize {
        self.records[category.index()].len()
    }

    /// Total records across all categories.
    pub fn total(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate `(category, records)` in [`FeatureCategory::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureCategory, &[FeatureRecord])> {
        FeatureCategory::ALL
            .into_iter()
            .map(move |category| (category, self.records(category)))
    }
}

#[cfg(test)]
impl Extend<FeatureRecord> for CategoryStore {
    fn extend<I: IntoIterator<Item = FeatureRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

#[cfg(test)]
impl FromIterator<FeatureRecord> for CategoryStore {
    fn from_iter<I: IntoIterator<Item = FeatureRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
