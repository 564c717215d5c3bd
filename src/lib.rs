#![warn(missing_docs)]
//! A repository picker for GitHub.
//!
//! Type a repository name to search GitHub, pick results from a dropdown and
//! keep them in a persisted list of favorites.

/// The configuration for the application.
pub mod config;
/// A helper for delaying actions until input settles.
pub mod debounce;
/// The dispatcher for routing user events to the widget.
pub mod dispatcher;
/// The client for the GitHub repository search API.
pub mod github;
/// The search service remembering the last results.
pub mod search;
/// The storage layer for persisting favorites.
pub mod storage;
/// The rendering surface of the widget.
pub mod view;
/// The widget tying search, dropdown and favorites together.
pub mod widget;

use std::{sync::Arc, time::Duration};

use crate::{
    config::Config, dispatcher::WidgetDispatcher, github::DefaultGithubClient,
    search::DefaultSearchService, storage::FavoritesStore, storage::sqlite::SqliteStorage,
    view::terminal::TerminalView, widget::RepoWidget,
};

/// Runs the picker on the terminal.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    let storage = Arc::new(SqliteStorage::new(&config.database_url).await?);
    let github_client = Arc::new(DefaultGithubClient::new(&config.github_search_url)?);
    let search_service = Arc::new(DefaultSearchService::new(github_client));

    let widget = Arc::new(RepoWidget::new(
        search_service,
        FavoritesStore::new(storage),
        Arc::new(TerminalView::stdout()),
    ));
    widget.start().await?;
    tracing::debug!("Widget started.");

    let dispatcher =
        WidgetDispatcher::new(widget, Duration::from_millis(config.debounce_ms));
    dispatcher.run(tokio::io::stdin()).await;

    Ok(())
}
