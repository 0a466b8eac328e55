use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::{Direction, EntryController, EntryError, EntryStatus, ITEM_SELECTOR};
use crate::http::Transport;
use crate::page::{NodeId, PageContext, PageError};
use crate::ui::toast::{icon_html, icon_label_html, show_toast};

static TITLE_COUNTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("valid counter pattern"));

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    entry_ids: &'a [i64],
    status: EntryStatus,
}

/// Moves every unread counter on the page by `delta`, including the `(N)` in
/// the title of the unread listing.
pub fn update_unread_counter<P: PageContext + ?Sized>(page: &mut P, delta: i64) {
    for node in page.query_all("span.unread-counter") {
        match page.text_content(node).trim().parse::<i64>() {
            Ok(value) => page.set_inner_html(node, &value.saturating_add(delta).to_string()),
            Err(_) => tracing::debug!("Skipping non-numeric unread counter"),
        }
    }

    if page.location().ends_with("/unread") {
        let title = page.title();
        match TITLE_COUNTER.captures(&title).map(|caps| caps[1].parse::<i64>()) {
            Some(Ok(value)) => {
                let updated = TITLE_COUNTER.replacen(&title, 1, format!("({})", value.saturating_add(delta)));
                page.set_title(&updated);
            }
            Some(Err(_)) => tracing::debug!("Skipping out of range title counter"),
            None => {}
        }
    }
}

impl<'a, P, T> EntryController<'a, P, T>
where
    P: PageContext,
    T: Transport,
{
    /// Sends one status change for `entry_ids` and applies the number of
    /// entries the server actually changed to the unread counters.
    pub async fn update_entries_status(
        &mut self,
        entry_ids: &[i64],
        status: EntryStatus,
    ) -> Result<i64, EntryError> {
        let url = self.body_url("entries-status-url")?;
        let request = self
            .post(url)
            .with_body(&StatusBody { entry_ids, status })?
            .build();
        let response = self.send(request).await?;
        let count: i64 = response.json()?;
        tracing::debug!(entries = entry_ids.len(), status = status.as_str(), count, "Entries status updated");

        let delta = match status {
            EntryStatus::Read => -count,
            EntryStatus::Unread => count,
        };
        update_unread_counter(&mut *self.page, delta);
        Ok(count)
    }

    /// Flips an entry between read and unread. The link shows its loading
    /// label until the server answers and is restored if the change fails.
    pub async fn toggle_entry_status(&mut self, entry: NodeId, toasting: bool) -> Result<EntryStatus, EntryError> {
        let entry_id = self.entry_id(entry)?;
        let link = self
            .page
            .query_in(entry, "a[data-toggle-status]")
            .ok_or_else(|| PageError::MissingElement("a[data-toggle-status]".into()))?;

        let current = EntryStatus::parse(&self.page.data(link, "value").unwrap_or_default());
        let next = current.toggled();

        let previous_html = self.set_loading_label(link);
        if let Err(e) = self.update_entries_status(&[entry_id], next).await {
            self.page.set_inner_html(link, &previous_html);
            return Err(e);
        }

        let (icon_name, label, toast) = match current {
            EntryStatus::Read => ("read", "label-read", "toast-unread"),
            EntryStatus::Unread => ("unread", "label-unread", "toast-read"),
        };
        let icon = icon_html(&*self.page, icon_name).unwrap_or_default();
        let label = self.page.data(link, label).unwrap_or_default();
        self.page.set_inner_html(link, &icon_label_html(&icon, &label));
        self.page.set_data(link, "value", next.as_str());

        if self.page.has_class(entry, &current.class()) {
            self.page.remove_class(entry, &current.class());
            self.page.add_class(entry, &next.class());
        }

        if toasting {
            let message = self.page.data(link, toast);
            show_toast(&mut *self.page, message.as_deref(), Some(icon.as_str())).await;
        }
        Ok(next)
    }

    /// Toggles the entry around `target` (or the current one) and moves the
    /// list focus. With `set_to_read` an entry already read is left alone.
    pub async fn handle_entry_status(
        &mut self,
        direction: Option<Direction>,
        target: Option<NodeId>,
        set_to_read: bool,
    ) -> Result<(), EntryError> {
        let toasting = target.is_none();
        let Some(entry) = self.find_entry(target) else {
            return Ok(());
        };

        let is_unread = self
            .page
            .query_in(entry, "a[data-toggle-status]")
            .and_then(|link| self.page.data(link, "value"))
            .is_some_and(|v| v == EntryStatus::Unread.as_str());
        if !set_to_read || is_unread {
            self.toggle_entry_status(entry, toasting).await?;
        }

        if self.is_list_view() && self.page.has_class(entry, super::CURRENT_ITEM_CLASS) {
            if let Some(direction) = direction {
                self.go_to_list_item(direction.offset());
            }
        }
        Ok(())
    }

    pub async fn mark_entry_as_read(&mut self, entry: NodeId) -> Result<(), EntryError> {
        let unread = EntryStatus::Unread.class();
        if !self.page.has_class(entry, &unread) {
            return Ok(());
        }
        self.page.remove_class(entry, &unread);
        self.page.add_class(entry, &EntryStatus::Read.class());

        let entry_id = self.entry_id(entry)?;
        self.update_entries_status(&[entry_id], EntryStatus::Read).await?;
        Ok(())
    }

    /// Marks every visible item read, then reloads (when only unread items
    /// are listed) or moves on to the next page.
    pub async fn mark_page_as_read(&mut self) -> Result<(), EntryError> {
        let items = self.page.visible_elements(ITEM_SELECTOR);
        if items.is_empty() {
            return Ok(());
        }
        let entry_ids = items
            .iter()
            .map(|&item| self.entry_id(item))
            .collect::<Result<Vec<_>, _>>()?;
        for &item in &items {
            self.page.remove_class(item, &EntryStatus::Unread.class());
            self.page.add_class(item, &EntryStatus::Read.class());
        }

        self.update_entries_status(&entry_ids, EntryStatus::Read).await?;

        let show_only_unread = self
            .page
            .query("a[data-action=markPageAsRead]")
            .and_then(|link| self.page.data(link, "show-only-unread"))
            .is_some_and(|v| !v.is_empty());
        if show_only_unread {
            self.page.reload();
        } else {
            self.go_to_page("next", true);
        }
        Ok(())
    }
}
