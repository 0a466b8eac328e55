//! Routes shortcuts and clicks to the controllers.

use super::{forms, menu};
use crate::entries::{Direction, EntryController};
use crate::error::Result;
use crate::http::Transport;
use crate::page::{NodeId, PageContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Follow the `a[data-page=...]` link of that name.
    GoToPage(&'static str),
    GoToPrevious,
    GoToNext,
    GoToFeed,
    GoToFeedOrFeeds,
    GoToAddSubscription,
    ScrollToCurrentItem,
    OpenSelectedItem,
    OpenOriginalLink { current_tab: bool },
    OpenCommentLink { current_tab: bool },
    ToggleEntryStatus(Direction),
    MarkEntryAsRead,
    MarkPageAsRead,
    SaveEntry,
    ToggleBookmark,
    FetchOriginalContent,
    RefreshAllFeeds,
    UnsubscribeFromFeed,
    ShowKeyboardShortcuts,
    FocusSearch,
    ToggleMainMenu,
    MainMenuItem,
    SubmitForm,
}

/// Click targets in the order they are tried.
pub const CLICK_BINDINGS: &[(&str, Action)] = &[
    ("a[data-save-entry]", Action::SaveEntry),
    ("a[data-toggle-bookmark]", Action::ToggleBookmark),
    ("a[data-fetch-content-entry]", Action::FetchOriginalContent),
    ("a[data-action=search]", Action::FocusSearch),
    ("a[data-action=markPageAsRead]", Action::MarkPageAsRead),
    ("a[data-toggle-status]", Action::ToggleEntryStatus(Direction::Next)),
    ("a[data-original-link]", Action::MarkEntryAsRead),
    ("a[data-action=refreshAllFeeds]", Action::RefreshAllFeeds),
    (".logo", Action::ToggleMainMenu),
    (".header nav li", Action::MainMenuItem),
    ("form", Action::SubmitForm),
];

/// The click binding for `target` or its nearest bound ancestor.
pub fn click_action<P: PageContext>(page: &P, target: NodeId) -> Option<(Action, NodeId)> {
    let mut current = Some(target);
    while let Some(node) = current {
        let bound = CLICK_BINDINGS
            .iter()
            .find(|(selector, _)| page.query_all(selector).contains(&node));
        if let Some((_, action)) = bound {
            return Some((*action, node));
        }
        current = page.parent(node);
    }
    None
}

/// Runs `action`. `target` is the clicked element, `None` for shortcuts.
pub async fn dispatch<P, T>(page: &mut P, transport: &T, action: Action, target: Option<NodeId>) -> Result<()>
where
    P: PageContext,
    T: Transport,
{
    tracing::debug!(?action, clicked = target.is_some(), "Dispatching");
    let mut entries = EntryController::new(&mut *page, transport);
    match action {
        Action::GoToPage(name) => entries.go_to_page(name, false),
        Action::GoToPrevious => entries.go_to_previous(),
        Action::GoToNext => entries.go_to_next(),
        Action::GoToFeed => entries.go_to_feed(),
        Action::GoToFeedOrFeeds => entries.go_to_feed_or_feeds(),
        Action::GoToAddSubscription => entries.go_to_add_subscription()?,
        Action::ScrollToCurrentItem => entries.scroll_to_current_item(),
        Action::OpenSelectedItem => entries.open_selected_item(),
        Action::OpenOriginalLink { current_tab } => entries.open_original_link(current_tab).await?,
        Action::OpenCommentLink { current_tab } => entries.open_comment_link(current_tab),
        Action::ToggleEntryStatus(direction) => {
            entries.handle_entry_status(Some(direction), target, false).await?
        }
        Action::MarkEntryAsRead => {
            if let Some(item) = target.and_then(|t| entries.page().closest_with_class(t, "item")) {
                entries.mark_entry_as_read(item).await?;
            }
        }
        Action::MarkPageAsRead => entries.mark_page_as_read().await?,
        Action::SaveEntry => entries.handle_save_entry(target).await?,
        Action::ToggleBookmark => entries.handle_bookmark(target).await?,
        Action::FetchOriginalContent => entries.fetch_original_content().await?,
        Action::RefreshAllFeeds => entries.refresh_all_feeds().await?,
        Action::UnsubscribeFromFeed => entries.unsubscribe_from_feed().await?,
        Action::ShowKeyboardShortcuts => menu::show_keyboard_shortcuts(page),
        Action::FocusSearch => menu::set_focus_to_search_input(page),
        Action::ToggleMainMenu => menu::toggle_main_menu(page),
        Action::MainMenuItem => {
            if let Some(node) = target {
                menu::on_main_menu_item_click(page, node);
            }
        }
        Action::SubmitForm => {
            if let Some(form) = target {
                forms::mark_submitting(page, form);
            }
        }
    }
    Ok(())
}
