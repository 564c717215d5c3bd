use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a GitHub repository, kept as its decimal text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    /// Wraps an id given in its text form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for RepoId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RepoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal description of a repository returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSummary {
    /// Repository name without the owner.
    pub name: String,
    /// Login of the owning user or organization.
    pub owner: String,
    /// Stargazer count.
    pub stars: u64,
}

/// An insertion-ordered map from repository id to summary with unique keys.
///
/// Serialized as a list of `[id, summary]` pairs. When deserializing, the first
/// occurrence of a duplicated id wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(RepoId, RepoSummary)>", into = "Vec<(RepoId, RepoSummary)>")]
pub struct RepoMap {
    entries: Vec<(RepoId, RepoSummary)>,
}

/// The result of one completed search.
pub type SearchResultSet = RepoMap;

/// The user's persisted favorites, in the order they were added.
pub type FavoritesSet = RepoMap;

impl RepoMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a repository. Returns `false` and leaves the map untouched if the id
    /// is already present.
    pub fn insert(&mut self, id: RepoId, summary: RepoSummary) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.entries.push((id, summary));
        true
    }

    /// Removes a repository, returning its summary if it was present.
    pub fn remove(&mut self, id: &RepoId) -> Option<RepoSummary> {
        let position = self.entries.iter().position(|(key, _)| key == id)?;
        Some(self.entries.remove(position).1)
    }

    /// Returns the summary stored under `id`.
    pub fn get(&self, id: &RepoId) -> Option<&RepoSummary> {
        self.entries.iter().find(|(key, _)| key == id).map(|(_, summary)| summary)
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &RepoId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&RepoId, &RepoSummary)> {
        self.entries.iter().map(|(id, summary)| (id, summary))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<(RepoId, RepoSummary)>> for RepoMap {
    fn from(pairs: Vec<(RepoId, RepoSummary)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<RepoMap> for Vec<(RepoId, RepoSummary)> {
    fn from(map: RepoMap) -> Self {
        map.entries
    }
}

impl FromIterator<(RepoId, RepoSummary)> for RepoMap {
    fn from_iter<I: IntoIterator<Item = (RepoId, RepoSummary)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, summary) in iter {
            map.insert(id, summary);
        }
        map
    }
}
