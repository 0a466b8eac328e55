use super::{CURRENT_ITEM_CLASS, EntryController, EntryError, ITEM_SELECTOR};
use crate::http::Transport;
use crate::page::{NodeId, PageContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn offset(&self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

impl<'a, P, T> EntryController<'a, P, T>
where
    P: PageContext,
    T: Transport,
{
    /// Moves the current-item mark `offset` positions through the visible
    /// items, wrapping at both ends. Without a current item the first one is
    /// selected.
    pub fn go_to_list_item(&mut self, offset: isize) -> Option<NodeId> {
        let items = self.page.visible_elements(ITEM_SELECTOR);
        if items.is_empty() {
            return None;
        }

        let position = items.iter().position(|item| self.page.has_class(*item, CURRENT_ITEM_CLASS));
        for node in self.page.query_all(&format!(".{CURRENT_ITEM_CLASS}")) {
            self.page.remove_class(node, CURRENT_ITEM_CLASS);
        }

        let len = items.len() as isize;
        let target = match position {
            None => items[0],
            Some(i) => items[(i as isize + offset).rem_euclid(len) as usize],
        };
        self.page.add_class(target, CURRENT_ITEM_CLASS);
        if position.is_some() {
            self.page.scroll_to(target, false);
        }
        if let Some(link) = self.page.query_in(target, ".item-header a") {
            self.page.focus(link);
        }
        Some(target)
    }

    /// Follows the `a[data-page={page}]` link, or reloads when it is absent
    /// and `fallback_self` is set.
    pub fn go_to_page(&mut self, page: &str, fallback_self: bool) {
        let href = self
            .page
            .query(&format!("a[data-page={page}]"))
            .and_then(|link| self.page.attribute(link, "href"));
        match href {
            Some(href) => self.page.navigate(&href),
            None if fallback_self => self.page.reload(),
            None => tracing::debug!(page, "No pagination link"),
        }
    }

    pub fn go_to_previous(&mut self) {
        if self.is_list_view() {
            self.go_to_list_item(-1);
        } else {
            self.go_to_page("previous", false);
        }
    }

    pub fn go_to_next(&mut self) {
        if self.is_list_view() {
            self.go_to_list_item(1);
        } else {
            self.go_to_page("next", false);
        }
    }

    pub fn go_to_feed_or_feeds(&mut self) {
        if self.is_entry() {
            self.go_to_feed();
        } else {
            self.go_to_page("feeds", false);
        }
    }

    /// Opens the feed of the displayed entry or of the current item.
    pub fn go_to_feed(&mut self) {
        let selector = if self.is_entry() {
            "span.entry-website a"
        } else {
            ".current-item a[data-feed-link]"
        };
        self.follow(selector);
    }

    /// Opens the original article. From a list the current item opens in a
    /// new tab, is marked read, and the selection advances unless the page
    /// lists starred items.
    pub async fn open_original_link(&mut self, in_current_tab: bool) -> Result<(), EntryError> {
        if let Some(href) = self.href_of(".entry h1 a") {
            if in_current_tab {
                self.page.navigate(&href);
            } else {
                self.page.open_new_tab(&href);
            }
            return Ok(());
        }

        let Some(href) = self.href_of(".current-item a[data-original-link]") else {
            return Ok(());
        };
        self.page.open_new_tab(&href);

        let Some(current) = self.page.query(&format!(".{CURRENT_ITEM_CLASS}")) else {
            return Ok(());
        };
        let on_starred = self
            .href_of("a[data-page=starred]")
            .is_some_and(|starred| self.page.location() == starred);
        if !on_starred {
            self.go_to_list_item(1);
        }
        self.mark_entry_as_read(current).await
    }

    pub fn open_comment_link(&mut self, in_current_tab: bool) {
        if self.is_list_view() {
            if let Some(href) = self.href_of(".current-item a[data-comments-link]") {
                self.page.open_new_tab(&href);
            }
        } else if let Some(href) = self.href_of("a[data-comments-link]") {
            if in_current_tab {
                self.page.navigate(&href);
            } else {
                self.page.open_new_tab(&href);
            }
        }
    }

    pub fn open_selected_item(&mut self) {
        self.follow(".current-item .item-title a");
    }

    pub fn scroll_to_current_item(&mut self) {
        if let Some(current) = self.page.query(&format!(".{CURRENT_ITEM_CLASS}")) {
            self.page.scroll_to(current, true);
        }
    }

    pub fn go_to_add_subscription(&mut self) -> Result<(), EntryError> {
        let url = self.body_url("add-subscription-url")?;
        self.page.navigate(&url);
        Ok(())
    }

    fn href_of(&self, selector: &str) -> Option<String> {
        self.page
            .query(selector)
            .and_then(|link| self.page.attribute(link, "href"))
    }

    fn follow(&mut self, selector: &str) {
        if let Some(href) = self.href_of(selector) {
            self.page.navigate(&href);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryController;
    use crate::http::MemoryTransport;
    use crate::page::{Display, MemoryPage, Navigation};

    fn list(count: usize) -> (MemoryPage, Vec<NodeId>) {
        let mut page = MemoryPage::new("http://reader.example/unread");
        let root = page.root();
        let items = page.append_element(root, "div", &[("class", "items")]);
        let nodes = (0..count)
            .map(|i| {
                let id = (i + 1).to_string();
                let item = page.append_element(items, "article", &[("class", "item item-status-unread"), ("data-id", &id)]);
                let header = page.append_element(item, "div", &[("class", "item-header")]);
                page.append_element(header, "a", &[("href", &format!("/entry/{id}"))]);
                item
            })
            .collect();
        (page, nodes)
    }

    #[test]
    fn test_first_move_selects_first_item() {
        let (mut page, items) = list(3);
        let transport = MemoryTransport::new();
        let mut controller = EntryController::new(&mut page, &transport);
        assert_eq!(controller.go_to_list_item(-1), Some(items[0]));
        assert!(page.has_class(items[0], CURRENT_ITEM_CLASS));
        assert!(page.focused().is_some());
    }

    #[test]
    fn test_wraps_in_both_directions() {
        let (mut page, items) = list(3);
        let transport = MemoryTransport::new();
        let mut controller = EntryController::new(&mut page, &transport);
        controller.go_to_list_item(1);
        assert_eq!(controller.go_to_list_item(-1), Some(items[2]));
        assert_eq!(controller.go_to_list_item(1), Some(items[0]));
        assert_eq!(page.query_all(".current-item"), vec![items[0]]);
    }

    #[test]
    fn test_hidden_items_are_skipped() {
        let (mut page, items) = list(3);
        page.set_display(items[1], Display::None);
        let transport = MemoryTransport::new();
        let mut controller = EntryController::new(&mut page, &transport);
        controller.go_to_list_item(1);
        assert_eq!(controller.go_to_list_item(1), Some(items[2]));
    }

    #[test]
    fn test_go_to_page_fallback() {
        let mut page = MemoryPage::default();
        let transport = MemoryTransport::new();
        EntryController::new(&mut page, &transport).go_to_page("next", false);
        assert!(page.navigations().is_empty());

        EntryController::new(&mut page, &transport).go_to_page("next", true);
        assert_eq!(page.last_navigation(), Some(&Navigation::Reload));

        let root = page.root();
        page.append_element(root, "a", &[("data-page", "next"), ("href", "/unread?offset=100")]);
        EntryController::new(&mut page, &transport).go_to_page("next", true);
        assert_eq!(page.last_navigation(), Some(&Navigation::Assign("/unread?offset=100".into())));
    }

    #[test]
    fn test_next_outside_list_follows_pagination() {
        let mut page = MemoryPage::default();
        let root = page.root();
        page.append_element(root, "section", &[("class", "entry")]);
        page.append_element(root, "a", &[("data-page", "next"), ("href", "/entry/9")]);
        let transport = MemoryTransport::new();
        EntryController::new(&mut page, &transport).go_to_next();
        assert_eq!(page.last_navigation(), Some(&Navigation::Assign("/entry/9".into())));
    }

    #[test]
    fn test_comment_link_from_list_opens_tab() {
        let (mut page, items) = list(2);
        page.add_class(items[1], CURRENT_ITEM_CLASS);
        page.append_element(items[1], "a", &[("data-comments-link", "true"), ("href", "https://news.example/1")]);
        let transport = MemoryTransport::new();
        EntryController::new(&mut page, &transport).open_comment_link(true);
        assert_eq!(page.last_navigation(), Some(&Navigation::NewTab("https://news.example/1".into())));
    }
}
