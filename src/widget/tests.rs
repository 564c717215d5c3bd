use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::predicate::eq;
use reqwest::StatusCode;

use super::*;
use crate::{
    github::{GithubClient, GithubError, MockGithubClient},
    search::{DefaultSearchService, MockSearchService},
    storage::{
        FAVORITES_KEY, KeyValueStorage, RepoSummary, SearchResultSet,
        memory_storage::InMemoryStorage,
    },
    view::{DropdownList, DropdownOption, MockWidgetView},
};

fn abc_repo() -> RepoSummary {
    RepoSummary { name: "abc-repo".to_string(), owner: "u".to_string(), stars: 42 }
}

fn abc_results() -> SearchResultSet {
    let mut results = SearchResultSet::new();
    results.insert(RepoId::from(1), abc_repo());
    results
}

fn create_widget(
    search_service: impl SearchService + 'static,
    view: MockWidgetView,
    storage: Arc<InMemoryStorage>,
) -> RepoWidget {
    RepoWidget::new(Arc::new(search_service), FavoritesStore::new(storage), Arc::new(view))
}

async fn storage_with_abc_favorite() -> Arc<InMemoryStorage> {
    let storage = Arc::new(InMemoryStorage::new());
    storage
        .set_item(FAVORITES_KEY, r#"[["1",{"name":"abc-repo","owner":"u","stars":42}]]"#)
        .await
        .unwrap();
    storage
}

#[tokio::test]
async fn test_start_renders_stored_favorites_in_order() {
    // Arrange
    let storage = Arc::new(InMemoryStorage::new());
    storage
        .set_item(
            FAVORITES_KEY,
            r#"[["7",{"name":"b","owner":"o","stars":1}],["3",{"name":"a","owner":"o","stars":2}]]"#,
        )
        .await
        .unwrap();
    let mut mock_view = MockWidgetView::new();
    let mut seq = mockall::Sequence::new();
    mock_view
        .expect_append_favorite()
        .withf(|card| card.id == RepoId::from(7))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    mock_view
        .expect_append_favorite()
        .withf(|card| card.id == RepoId::from(3))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    let widget = create_widget(MockSearchService::new(), mock_view, storage);

    // Act
    widget.start().await.unwrap();

    // Assert
    assert_eq!(widget.favorites().await.len(), 2);
    assert_eq!(widget.state(), WidgetState::Idle);
}

#[tokio::test]
async fn test_input_settled_shows_results() {
    // Arrange
    let mut mock_search_service = MockSearchService::new();
    mock_search_service
        .expect_search()
        .withf(|query, _| query == "abc")
        .times(1)
        .returning(|_, _| Ok(abc_results()));
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_hide_dropdown().times(1).returning(|| Ok(()));
    mock_view
        .expect_render_dropdown()
        .with(eq(DropdownList {
            options: vec![DropdownOption {
                value: RepoId::from("1"),
                label: "abc-repo".to_string(),
            }],
            size: 1,
            hidden: false,
        }))
        .times(1)
        .returning(|_| Ok(()));
    let widget = create_widget(mock_search_service, mock_view, Arc::new(InMemoryStorage::new()));

    // Act
    let result = widget.input_settled("abc").await;

    // Assert
    assert!(result.is_ok());
    assert_eq!(widget.state(), WidgetState::ResultsShown);
}

#[tokio::test]
async fn test_input_settled_empty_value_skips_search() {
    // Arrange
    let mut mock_search_service = MockSearchService::new();
    mock_search_service.expect_search().times(0);
    mock_search_service.expect_clear().with(eq(1)).times(1).returning(|_| ());
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_hide_dropdown().times(1).returning(|| Ok(()));
    mock_view.expect_render_dropdown().times(0);
    let widget = create_widget(mock_search_service, mock_view, Arc::new(InMemoryStorage::new()));
    widget.mark_typing();

    // Act
    let result = widget.input_settled("").await;

    // Assert
    assert!(result.is_ok());
    assert_eq!(widget.state(), WidgetState::Idle);
}

#[tokio::test]
async fn test_input_settled_no_results_stays_hidden() {
    // Arrange
    let mut mock_search_service = MockSearchService::new();
    mock_search_service.expect_search().returning(|_, _| Ok(SearchResultSet::new()));
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_hide_dropdown().returning(|| Ok(()));
    mock_view
        .expect_render_dropdown()
        .withf(|list| list.hidden && list.options.is_empty() && list.size == 0)
        .times(1)
        .returning(|_| Ok(()));
    let widget = create_widget(mock_search_service, mock_view, Arc::new(InMemoryStorage::new()));

    // Act
    widget.input_settled("nothing-matches").await.unwrap();

    // Assert
    assert_eq!(widget.state(), WidgetState::Idle);
}

#[tokio::test]
async fn test_input_settled_request_error_alerts_user() {
    // Arrange
    let storage = storage_with_abc_favorite().await;
    let mut mock_search_service = MockSearchService::new();
    mock_search_service.expect_search().returning(|_, _| {
        Err(SearchError::Github(GithubError::RequestError {
            status: StatusCode::FORBIDDEN,
            body: r#"{"message":"API rate limit exceeded"}"#.to_string(),
        }))
    });
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_append_favorite().times(1).returning(|_| Ok(()));
    mock_view.expect_hide_dropdown().times(1).returning(|| Ok(()));
    mock_view.expect_render_dropdown().times(0);
    mock_view
        .expect_alert()
        .withf(|message| message.contains("403"))
        .times(1)
        .returning(|_| Ok(()));
    let widget = create_widget(mock_search_service, mock_view, storage.clone());
    widget.start().await.unwrap();

    // Act
    let result = widget.input_settled("abc").await;

    // Assert
    assert!(result.is_ok());
    assert_eq!(widget.state(), WidgetState::Idle);
    assert_eq!(widget.favorites().await.len(), 1);
    assert_eq!(
        storage.get_item(FAVORITES_KEY).await.unwrap().unwrap(),
        r#"[["1",{"name":"abc-repo","owner":"u","stars":42}]]"#
    );
}

#[tokio::test]
async fn test_input_settled_malformed_response_propagates() {
    // Arrange
    let mut mock_search_service = MockSearchService::new();
    mock_search_service.expect_search().returning(|_, _| {
        Err(SearchError::Github(GithubError::MalformedResponse(
            serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        )))
    });
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_hide_dropdown().returning(|| Ok(()));
    mock_view.expect_alert().times(0);
    let widget = create_widget(mock_search_service, mock_view, Arc::new(InMemoryStorage::new()));

    // Act
    let result = widget.input_settled("abc").await;

    // Assert
    assert!(matches!(result, Err(WidgetError::Search(_))));
    assert_eq!(widget.state(), WidgetState::Idle);
}

#[tokio::test]
async fn test_select_adds_and_persists_favorite() {
    // Arrange
    let storage = Arc::new(InMemoryStorage::new());
    let mut mock_search_service = MockSearchService::new();
    mock_search_service
        .expect_lookup()
        .with(eq(RepoId::from(1)))
        .returning(|_| Some(abc_repo()));
    let mut mock_view = MockWidgetView::new();
    mock_view
        .expect_append_favorite()
        .withf(|card| {
            card.id == RepoId::from(1)
                && card.lines == vec!["Name: abc-repo", "Owner: u", "Stars: 42"]
        })
        .times(1)
        .returning(|_| Ok(()));
    mock_view.expect_clear_input().times(1).returning(|| Ok(()));
    mock_view.expect_hide_dropdown().times(1).returning(|| Ok(()));
    let widget = create_widget(mock_search_service, mock_view, storage.clone());

    // Act
    let result = widget.select(&RepoId::from("1")).await;

    // Assert
    assert!(result.is_ok());
    assert_eq!(widget.favorites().await.get(&RepoId::from(1)), Some(&abc_repo()));
    assert_eq!(
        storage.get_item(FAVORITES_KEY).await.unwrap().unwrap(),
        r#"[["1",{"name":"abc-repo","owner":"u","stars":42}]]"#
    );
    assert_eq!(widget.state(), WidgetState::Idle);
}

#[tokio::test]
async fn test_select_existing_favorite_is_noop() {
    // Arrange
    let storage = storage_with_abc_favorite().await;
    let mut mock_search_service = MockSearchService::new();
    mock_search_service.expect_lookup().times(0);
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_append_favorite().times(1).returning(|_| Ok(()));
    let widget = create_widget(mock_search_service, mock_view, storage.clone());
    widget.start().await.unwrap();
    let stored_before = storage.get_item(FAVORITES_KEY).await.unwrap();

    // Act
    let result = widget.select(&RepoId::from(1)).await;

    // Assert
    assert!(result.is_ok());
    assert_eq!(widget.favorites().await.len(), 1);
    assert_eq!(storage.get_item(FAVORITES_KEY).await.unwrap(), stored_before);
}

#[tokio::test]
async fn test_select_unknown_id_is_ignored() {
    // Arrange
    let storage = Arc::new(InMemoryStorage::new());
    let mut mock_search_service = MockSearchService::new();
    mock_search_service.expect_lookup().returning(|_| None);
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_append_favorite().times(0);
    let widget = create_widget(mock_search_service, mock_view, storage.clone());

    // Act
    let result = widget.select(&RepoId::from(99)).await;

    // Assert
    assert!(result.is_ok());
    assert!(widget.favorites().await.is_empty());
    assert_eq!(storage.get_item(FAVORITES_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_remove_favorite() {
    // Arrange
    let storage = storage_with_abc_favorite().await;
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_append_favorite().times(1).returning(|_| Ok(()));
    mock_view
        .expect_remove_favorite()
        .with(eq(RepoId::from(1)))
        .times(1)
        .returning(|_| Ok(()));
    let widget = create_widget(MockSearchService::new(), mock_view, storage.clone());
    widget.start().await.unwrap();

    // Act
    let result = widget.remove(&RepoId::from(1)).await;

    // Assert
    assert!(result.is_ok());
    assert!(!widget.favorites().await.contains(&RepoId::from(1)));
    assert_eq!(storage.get_item(FAVORITES_KEY).await.unwrap().unwrap(), "[]");
}

#[tokio::test]
async fn test_remove_absent_favorite_is_noop() {
    // Arrange
    let storage = storage_with_abc_favorite().await;
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_append_favorite().times(1).returning(|_| Ok(()));
    mock_view.expect_remove_favorite().times(0);
    let widget = create_widget(MockSearchService::new(), mock_view, storage.clone());
    widget.start().await.unwrap();
    let stored_before = storage.get_item(FAVORITES_KEY).await.unwrap();

    // Act
    let result = widget.remove(&RepoId::from(2)).await;

    // Assert
    assert!(result.is_ok());
    assert_eq!(widget.favorites().await.len(), 1);
    assert_eq!(storage.get_item(FAVORITES_KEY).await.unwrap(), stored_before);
}

#[tokio::test]
async fn test_clear_results_hides_dropdown() {
    let mut mock_search_service = MockSearchService::new();
    mock_search_service.expect_clear().times(1).returning(|_| ());
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_hide_dropdown().times(1).returning(|| Ok(()));
    let widget = create_widget(mock_search_service, mock_view, Arc::new(InMemoryStorage::new()));
    widget.mark_typing();

    widget.clear_results().await.unwrap();

    assert_eq!(widget.state(), WidgetState::Idle);
}

/// Answers after a per-query delay so responses can arrive out of order.
struct DelayedGithubClient;

#[async_trait]
impl GithubClient for DelayedGithubClient {
    async fn search_repositories(
        &self,
        query: &str,
    ) -> std::result::Result<SearchResultSet, GithubError> {
        let delay = if query == "abc" { 2_000 } else { 100 };
        tokio::time::sleep(Duration::from_millis(delay)).await;

        let mut results = SearchResultSet::new();
        results.insert(
            RepoId::from(query.len() as u64),
            RepoSummary { name: format!("{query}-repo"), owner: "u".to_string(), stars: 1 },
        );
        Ok(results)
    }
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded_and_shown_option_selectable() {
    // Arrange
    let storage = Arc::new(InMemoryStorage::new());
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_hide_dropdown().returning(|| Ok(()));
    mock_view
        .expect_render_dropdown()
        .withf(|list| list.options.len() == 1 && list.options[0].label == "abcd-repo")
        .times(1)
        .returning(|_| Ok(()));
    mock_view
        .expect_append_favorite()
        .withf(|card| card.id == RepoId::from(4))
        .times(1)
        .returning(|_| Ok(()));
    mock_view.expect_clear_input().times(1).returning(|| Ok(()));
    let widget = create_widget(
        DefaultSearchService::new(Arc::new(DelayedGithubClient)),
        mock_view,
        storage.clone(),
    );

    // Act
    let (slow, fast) = tokio::join!(widget.input_settled("abc"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        widget.input_settled("abcd").await
    });
    let selected = widget.select(&RepoId::from(4)).await;

    // Assert
    assert!(slow.is_ok());
    assert!(fast.is_ok());
    assert!(selected.is_ok());
    let favorites = widget.favorites().await;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites.get(&RepoId::from(4)).map(|repo| repo.name.as_str()), Some("abcd-repo"));
    assert!(storage.get_item(FAVORITES_KEY).await.unwrap().unwrap().contains("abcd-repo"));
}

#[tokio::test(start_paused = true)]
async fn test_stale_results_cannot_be_selected() {
    // Arrange
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_hide_dropdown().returning(|| Ok(()));
    mock_view.expect_render_dropdown().returning(|_| Ok(()));
    mock_view.expect_append_favorite().times(0);
    let widget = create_widget(
        DefaultSearchService::new(Arc::new(DelayedGithubClient)),
        mock_view,
        Arc::new(InMemoryStorage::new()),
    );

    // Act
    let _ = tokio::join!(widget.input_settled("abc"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        widget.input_settled("abcd").await
    });
    let selected = widget.select(&RepoId::from(3)).await;

    // Assert
    assert!(selected.is_ok());
    assert!(widget.favorites().await.is_empty());
}

#[tokio::test]
async fn test_empty_input_forgets_results() {
    // Arrange
    let mut mock_github_client = MockGithubClient::new();
    mock_github_client.expect_search_repositories().returning(|_| Ok(abc_results()));
    let mut mock_view = MockWidgetView::new();
    mock_view.expect_hide_dropdown().returning(|| Ok(()));
    mock_view.expect_render_dropdown().returning(|_| Ok(()));
    mock_view.expect_append_favorite().times(0);
    let widget = create_widget(
        DefaultSearchService::new(Arc::new(mock_github_client)),
        mock_view,
        Arc::new(InMemoryStorage::new()),
    );

    // Act
    widget.input_settled("abc").await.unwrap();
    widget.input_settled("").await.unwrap();
    let selected = widget.select(&RepoId::from(1)).await;

    // Assert
    assert!(selected.is_ok());
    assert!(widget.favorites().await.is_empty());
}
