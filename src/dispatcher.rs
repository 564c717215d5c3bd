use std::{sync::Arc, time::Duration};

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};

use crate::{
    debounce::Debouncer,
    storage::RepoId,
    widget::{RepoWidget, WidgetError},
};

/// A user interaction with the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The input now holds this value.
    Input(String),
    /// A dropdown option was clicked.
    Select(RepoId),
    /// The removal control of a favorite card was clicked.
    Remove(RepoId),
    /// Stop reading events.
    Quit,
}

impl WidgetEvent {
    /// Parse one line of terminal input. Anything that is not a command is the
    /// new value of the search input.
    pub fn from_line(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed == "/quit" {
            return WidgetEvent::Quit;
        }
        if let Some(id) = trimmed.strip_prefix("/pick ") {
            return WidgetEvent::Select(RepoId::new(id.trim()));
        }
        if let Some(id) = trimmed.strip_prefix("/remove ") {
            return WidgetEvent::Remove(RepoId::new(id.trim()));
        }
        WidgetEvent::Input(line.to_string())
    }
}

/// Routes events to the widget, debouncing input before it triggers a search.
pub struct WidgetDispatcher {
    widget: Arc<RepoWidget>,
    debouncer: Debouncer<String>,
}

impl WidgetDispatcher {
    /// Creates a dispatcher searching once the input stayed unchanged for
    /// `debounce_delay`.
    pub fn new(widget: Arc<RepoWidget>, debounce_delay: Duration) -> Self {
        let handler = widget.clone();
        let debouncer = Debouncer::new(debounce_delay, move |value: String| {
            let widget = handler.clone();
            async move {
                if let Err(e) = widget.input_settled(&value).await {
                    tracing::error!("Error handling input {value:?}: {e}");
                }
            }
        });
        Self { widget, debouncer }
    }

    /// Handle a single event.
    pub async fn dispatch(&self, event: WidgetEvent) -> Result<(), WidgetError> {
        match event {
            WidgetEvent::Input(value) if value.is_empty() => {
                self.debouncer.cancel();
                self.widget.clear_results().await
            }
            WidgetEvent::Input(value) => {
                self.widget.mark_typing();
                self.debouncer.call(value);
                Ok(())
            }
            WidgetEvent::Select(id) => self.widget.select(&id).await,
            WidgetEvent::Remove(id) => self.widget.remove(&id).await,
            WidgetEvent::Quit => Ok(()),
        }
    }

    /// Read events line by line from `reader` until it ends or `/quit` arrives.
    ///
    /// A failing event is logged and does not stop the loop.
    pub async fn run<R: AsyncRead + Unpin>(&self, reader: R) {
        tracing::info!(
            "Type a repository name to search, /pick <id> to add a favorite, /remove <id> to \
             remove one, /quit to exit."
        );

        let mut lines = FramedRead::new(reader, LinesCodec::new());
        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Failed to read input line: {e}");
                    continue;
                }
            };

            let event = WidgetEvent::from_line(&line);
            if event == WidgetEvent::Quit {
                break;
            }
            if let Err(e) = self.dispatch(event).await {
                tracing::error!("Error handling event: {e}");
            }
        }

        self.debouncer.cancel();
        tracing::debug!("Event loop stopped");
    }
}
