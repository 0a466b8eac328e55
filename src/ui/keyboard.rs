//! Key sequence matching for the reader's shortcuts.

use super::action::Action;
use crate::config::SHORTCUT_SEQUENCE_LEN;
use crate::entries::Direction;

/// One `keydown` as the host reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    /// The event target is an input, textarea or other editable element.
    pub in_text_field: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Self::default() }
    }

    pub fn in_text_field(mut self) -> Self {
        self.in_text_field = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    fn is_ignored(&self) -> bool {
        self.in_text_field || self.ctrl || self.alt || self.meta
    }
}

/// Matches incoming keys against single keys (`"j"`) and space separated
/// sequences (`"g u"`).
#[derive(Debug, Clone, Default)]
pub struct KeyboardHandler {
    queue: Vec<String>,
    bindings: Vec<(Vec<String>, Action)>,
}

impl KeyboardHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, combination: &str, action: Action) -> &mut Self {
        let keys = combination.split_whitespace().map(str::to_string).collect();
        self.bindings.push((keys, action));
        self
    }

    pub fn pending(&self) -> &[String] {
        &self.queue
    }

    /// Feeds one key. A complete sequence wins over a single-key binding for
    /// the last key; the queue resets on a match or once it is full.
    pub fn on_key(&mut self, event: &KeyEvent) -> Option<Action> {
        if event.is_ignored() {
            return None;
        }
        self.queue.push(event.key.clone());

        let matched = self
            .bindings
            .iter()
            .find(|(keys, _)| keys.len() > 1 && *keys == self.queue)
            .or_else(|| {
                self.bindings
                    .iter()
                    .find(|(keys, _)| keys.len() == 1 && keys[0] == event.key)
            })
            .map(|(_, action)| *action);

        if matched.is_some() || self.queue.len() >= SHORTCUT_SEQUENCE_LEN {
            self.queue.clear();
        }
        if let Some(action) = matched {
            tracing::trace!(key = %event.key, ?action, "Shortcut matched");
        }
        matched
    }
}

/// The reader's standard shortcut table.
pub fn default_bindings() -> KeyboardHandler {
    let mut handler = KeyboardHandler::new();
    handler
        .on("g u", Action::GoToPage("unread"))
        .on("g b", Action::GoToPage("starred"))
        .on("g h", Action::GoToPage("history"))
        .on("g f", Action::GoToFeedOrFeeds)
        .on("g c", Action::GoToPage("categories"))
        .on("g s", Action::GoToPage("settings"))
        .on("ArrowLeft", Action::GoToPrevious)
        .on("ArrowRight", Action::GoToNext)
        .on("k", Action::GoToPrevious)
        .on("p", Action::GoToPrevious)
        .on("j", Action::GoToNext)
        .on("n", Action::GoToNext)
        .on("h", Action::GoToPage("previous"))
        .on("l", Action::GoToPage("next"))
        .on("z t", Action::ScrollToCurrentItem)
        .on("o", Action::OpenSelectedItem)
        .on("v", Action::OpenOriginalLink { current_tab: false })
        .on("V", Action::OpenOriginalLink { current_tab: true })
        .on("c", Action::OpenCommentLink { current_tab: false })
        .on("C", Action::OpenCommentLink { current_tab: true })
        .on("m", Action::ToggleEntryStatus(Direction::Next))
        .on("M", Action::ToggleEntryStatus(Direction::Previous))
        .on("A", Action::MarkPageAsRead)
        .on("s", Action::SaveEntry)
        .on("d", Action::FetchOriginalContent)
        .on("f", Action::ToggleBookmark)
        .on("F", Action::GoToFeed)
        .on("R", Action::RefreshAllFeeds)
        .on("?", Action::ShowKeyboardShortcuts)
        .on("+", Action::GoToAddSubscription)
        .on("#", Action::UnsubscribeFromFeed)
        .on("/", Action::FocusSearch);
    handler
}
