//! Time index over the selected members of an archive.
//!
//! Entries keep archive-listing order. "First" and "last" therefore refer
//! to enumeration order, not to the numeric minimum and maximum time: an
//! archive that lists a later snapshot before an earlier one reports its
//! time range in that order.

use crate::archive::ArchiveMember;

use super::HeaderRecord;

/// One indexed snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeEntry {
    /// Header parsed from the snapshot payload.
    pub header: HeaderRecord,
    /// Member holding the snapshot.
    pub member: ArchiveMember,
}

impl TimeEntry {
    /// Lookup key of this snapshot.
    #[inline]
    pub fn time(&self) -> f64 {
        self.header.time
    }
}

/// Ordered `(time, member)` pairs, rebuilt wholesale on every re-index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeIndex {
    entries: Vec<TimeEntry>,
}

impl TimeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; only the index builder grows an index.
    pub(crate) fn push(&mut self, header: HeaderRecord, member: ArchiveMember) {
        self.entries.push(TimeEntry { header, member });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in archive-listing order.
    #[inline]
    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimeEntry> {
        self.entries.get(index)
    }

    /// Timestep markers in archive-listing order.
    pub fn times(&self) -> Vec<f64> {
        self.entries.iter().map(TimeEntry::time).collect()
    }

    /// Time of the first listed snapshot.
    pub fn first(&self) -> Option<f64> {
        self.entries.first().map(TimeEntry::time)
    }

    /// Time of the last listed snapshot.
    pub fn last(&self) -> Option<f64> {
        self.entries.last().map(TimeEntry::time)
    }

    /// `(first, last)` by listing order; `None` for an empty index.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((self.first()?, self.last()?))
    }

    /// Position of the first entry whose time equals `time` exactly.
    pub fn position(&self, time: f64) -> Option<usize> {
        self.entries.iter().position(|e| e.time() == time)
    }

    /// First entry whose time equals `time` exactly.
    pub fn find(&self, time: f64) -> Option<&TimeEntry> {
        self.position(time).map(|i| &self.entries[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a TimeIndex {
    type Item = &'a TimeEntry;
    type IntoIter = std::slice::Iter<'a, TimeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, time: f64) -> (HeaderRecord, ArchiveMember) {
        (
            HeaderRecord {
                variable_name: "ham".into(),
                level_tag: "0".into(),
                time,
            },
            ArchiveMember {
                index,
                name: format!("box_{:04}_a.zst", index),
                data_pos: 512 * (index as u64 + 1),
                size: 100,
            },
        )
    }

    fn index_of(times: &[f64]) -> TimeIndex {
        let mut index = TimeIndex::new();
        for (i, &t) in times.iter().enumerate() {
            let (h, m) = entry(i, t);
            index.push(h, m);
        }
        index
    }

    #[test]
    fn test_range_follows_listing_order() {
        let index = index_of(&[2.0, 0.5, 1.0]);
        assert_eq!(index.times(), vec![2.0, 0.5, 1.0]);
        assert_eq!(index.time_range(), Some((2.0, 1.0)));
    }

    #[test]
    fn test_exact_lookup() {
        let index = index_of(&[0.0, 1.5, 1.5]);
        assert_eq!(index.position(1.5), Some(1));
        assert_eq!(index.find(1.5).unwrap().member.name, "box_0001_a.zst");
        assert_eq!(index.position(1.5000001), None);
        assert_eq!(index.position(f64::NAN), None);
    }

    #[test]
    fn test_empty_index() {
        let index = TimeIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.time_range(), None);
        assert_eq!(index.first(), None);
    }
}
