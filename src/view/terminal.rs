use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt, Stdout},
    sync::Mutex,
};

use crate::{
    storage::RepoId,
    view::{DropdownList, FavoriteCard, ViewResult, WidgetView},
};

/// Renders the widget as plain text lines on a writer, usually stdout.
///
/// Hiding the dropdown prints a notice only when results are on screen.
pub struct TerminalView<W> {
    out: Mutex<W>,
    dropdown_shown: AtomicBool,
}

impl TerminalView<Stdout> {
    /// A view writing to the process stdout.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin + Send> TerminalView<W> {
    /// A view writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out), dropdown_shown: AtomicBool::new(false) }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    async fn write(&self, text: &str) -> ViewResult<()> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }

    fn format_dropdown(list: &DropdownList) -> String {
        if list.hidden {
            return String::new();
        }

        let mut text = format!("Results ({}):\n", list.size);
        for option in &list.options {
            text.push_str(&format!("  [{}] {}\n", option.value, option.label));
        }
        text.push_str("Pick one with /pick <id>\n");
        text
    }

    fn format_card(card: &FavoriteCard) -> String {
        let mut text = format!("* Favorite {}\n", card.id);
        for line in &card.lines {
            text.push_str(&format!("  {line}\n"));
        }
        text.push_str(&format!("  [x] {}\n", card.remove_action()));
        text
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> WidgetView for TerminalView<W> {
    async fn render_dropdown(&self, list: DropdownList) -> ViewResult<()> {
        self.dropdown_shown.store(!list.hidden, Ordering::SeqCst);
        self.write(&Self::format_dropdown(&list)).await
    }

    async fn hide_dropdown(&self) -> ViewResult<()> {
        if !self.dropdown_shown.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.write("Results cleared\n").await
    }

    async fn clear_input(&self) -> ViewResult<()> {
        self.write("Input cleared\n").await
    }

    async fn append_favorite(&self, card: FavoriteCard) -> ViewResult<()> {
        self.write(&Self::format_card(&card)).await
    }

    async fn remove_favorite(&self, id: &RepoId) -> ViewResult<()> {
        self.write(&format!("Removed favorite {id}\n")).await
    }

    async fn alert(&self, message: &str) -> ViewResult<()> {
        self.write(&format!("!! {message}\n")).await
    }
}
