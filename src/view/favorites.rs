use crate::storage::{RepoId, RepoSummary};

/// A favorite repository as displayed, with a removal control bound to its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteCard {
    /// Id of the favorite repository.
    pub id: RepoId,
    /// Text lines of the card body.
    pub lines: Vec<String>,
}

impl FavoriteCard {
    /// The action that removes this card.
    pub fn remove_action(&self) -> String {
        format!("/remove {}", self.id)
    }
}

/// Build the card of a favorite: its name, owner and star count.
pub fn render_favorite(id: &RepoId, repo: &RepoSummary) -> FavoriteCard {
    FavoriteCard {
        id: id.clone(),
        lines: vec![
            format!("Name: {}", repo.name),
            format!("Owner: {}", repo.owner),
            format!("Stars: {}", repo.stars),
        ],
    }
}
