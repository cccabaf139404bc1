//! Ranked prefix/substring search over the Directory.
//!
//! Linear scans over precomputed lower-cased strings are fast enough for the
//! few hundred councils in England; there is no tokenization or fuzzy
//! matching, so ranking is predictable.

use super::council::CouncilRecord;
use super::directory::Directory;

#[derive(Debug)]
struct Entry {
    /// Lower-cased name, type name, display name and id
    blob: String,
    name: String,
    /// Raw name length in chars, shorter names rank first among prefix matches
    name_len: usize,
}

#[derive(Debug)]
pub struct SearchIndex<'a> {
    directory: &'a Directory,
    entries: Vec<Entry>,
    /// Directory positions ordered by name, the default (empty query) view
    by_name: Vec<usize>,
}

impl<'a> SearchIndex<'a> {
    pub fn new(directory: &'a Directory) -> Self {
        let entries: Vec<Entry> = directory
            .councils()
            .iter()
            .map(|c| Entry {
                blob: format!(
                    "{} {} {} {}",
                    c.name,
                    c.type_name(),
                    c.display_name(),
                    c.id
                )
                .to_lowercase(),
                name: c.name.to_lowercase(),
                name_len: c.name.chars().count(),
            })
            .collect();

        let councils = directory.councils();
        let mut by_name: Vec<usize> = (0..entries.len()).collect();
        by_name.sort_by(|&a, &b| {
            entries[a]
                .name
                .cmp(&entries[b].name)
                .then_with(|| councils[a].id.cmp(&councils[b].id))
        });

        log::debug!("Built search index over {} councils", entries.len());

        SearchIndex {
            directory,
            entries,
            by_name,
        }
    }

    /// Prefix matches on the name (shortest first), then substring matches
    /// anywhere in the search blob, truncated to `limit`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&'a CouncilRecord> {
        let councils = self.directory.councils();
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return self
                .by_name
                .iter()
                .take(limit)
                .map(|&idx| &councils[idx])
                .collect();
        }
        if limit == 0 {
            return Vec::new();
        }

        let mut is_prefix = vec![false; self.entries.len()];
        let mut prefix: Vec<usize> = Vec::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.name.starts_with(&query) {
                is_prefix[idx] = true;
                prefix.push(idx);
                if prefix.len() == limit {
                    break;
                }
            }
        }
        prefix.sort_by_key(|&idx| self.entries[idx].name_len);

        let remaining = limit - prefix.len();
        let contains = self
            .entries
            .iter()
            .enumerate()
            .filter(|(idx, entry)| !is_prefix[*idx] && entry.blob.contains(&query))
            .map(|(idx, _)| idx)
            .take(remaining);

        let results: Vec<_> = prefix
            .iter()
            .copied()
            .chain(contains)
            .map(|idx| &councils[idx])
            .collect();

        log::debug!("Search '{}' matched {} councils", query, results.len());
        results
    }
}
