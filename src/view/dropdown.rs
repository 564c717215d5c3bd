use crate::storage::{RepoId, SearchResultSet};

/// One selectable search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    /// Id of the repository this option selects.
    pub value: RepoId,
    /// Repository name shown to the user.
    pub label: String,
}

/// The rendered results list together with its visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownList {
    /// Options in result order.
    pub options: Vec<DropdownOption>,
    /// Number of visible rows, one per option.
    pub size: usize,
    /// Whether the list is hidden.
    pub hidden: bool,
}

impl DropdownList {
    /// An empty, hidden list.
    pub fn empty() -> Self {
        Self { options: Vec::new(), size: 0, hidden: true }
    }
}

/// Build one option per search result, valued by id and labelled by name.
pub fn build_dropdown(results: &SearchResultSet) -> DropdownList {
    let options: Vec<DropdownOption> = results
        .iter()
        .map(|(id, repo)| DropdownOption { value: id.clone(), label: repo.name.clone() })
        .collect();

    let size = options.len();
    DropdownList { options, size, hidden: size == 0 }
}
