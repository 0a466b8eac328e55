use serde::Deserialize;

use super::{EntryController, EntryError};
use crate::http::{Method, Transport};
use crate::page::{NodeId, PageContext, PageError};
use crate::ui::toast::{icon_html, icon_label_html, show_toast};

#[derive(Debug, Deserialize)]
struct OriginalContent {
    content: Option<String>,
    reading_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarStatus {
    Star,
    Unstar,
}

impl StarStatus {
    fn parse(value: &str) -> Self {
        if value == "star" { Self::Star } else { Self::Unstar }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Unstar => "unstar",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Star => Self::Unstar,
            Self::Unstar => Self::Star,
        }
    }
}

impl<'a, P, T> EntryController<'a, P, T>
where
    P: PageContext,
    T: Transport,
{
    pub async fn handle_save_entry(&mut self, target: Option<NodeId>) -> Result<(), EntryError> {
        let toasting = target.is_none();
        let Some(entry) = self.find_entry(target) else {
            return Ok(());
        };
        match self.page.query_in(entry, "a[data-save-entry]") {
            Some(link) => self.save_entry(link, toasting).await,
            None => Ok(()),
        }
    }

    /// Posts to the link's `data-save-url` once; later calls are ignored.
    pub async fn save_entry(&mut self, link: NodeId, toasting: bool) -> Result<(), EntryError> {
        if self.page.data(link, "completed").is_some() {
            return Ok(());
        }
        let url = self.link_url(link, "save-url")?;

        let previous = self.set_loading_label(link);
        let result = self.send(self.post(url).build()).await;
        self.page.set_inner_html(link, &previous);
        result?;

        self.page.set_data(link, "completed", "true");
        if toasting {
            let icon = icon_html(&*self.page, "save");
            let message = self.page.data(link, "toast-done");
            show_toast(&mut *self.page, message.as_deref(), icon.as_deref()).await;
        }
        Ok(())
    }

    pub async fn handle_bookmark(&mut self, target: Option<NodeId>) -> Result<(), EntryError> {
        let toasting = target.is_none();
        match self.find_entry(target) {
            Some(entry) => self.toggle_bookmark(entry, toasting).await.map(|_| ()),
            None => Ok(()),
        }
    }

    /// Stars or unstars `entry` and swaps the link's icon and label.
    pub async fn toggle_bookmark(&mut self, entry: NodeId, toasting: bool) -> Result<Option<StarStatus>, EntryError> {
        let Some(link) = self.page.query_in(entry, "a[data-toggle-bookmark]") else {
            return Ok(None);
        };
        let url = self.link_url(link, "bookmark-url")?;

        let previous = self.set_loading_label(link);
        if let Err(e) = self.send(self.post(url).build()).await {
            self.page.set_inner_html(link, &previous);
            return Err(e);
        }

        let current = StarStatus::parse(&self.page.data(link, "value").unwrap_or_default());
        let (icon_name, label, toast) = match current {
            StarStatus::Star => ("star", "label-star", "toast-unstar"),
            StarStatus::Unstar => ("unstar", "label-unstar", "toast-star"),
        };
        let icon = icon_html(&*self.page, icon_name).unwrap_or_default();
        let label = self.page.data(link, label).unwrap_or_default();
        self.page.set_inner_html(link, &icon_label_html(&icon, &label));
        let next = current.toggled();
        self.page.set_data(link, "value", next.as_str());

        if toasting {
            let message = self.page.data(link, toast);
            show_toast(&mut *self.page, message.as_deref(), Some(icon.as_str())).await;
        }
        Ok(Some(next))
    }

    /// Downloads the original article into `.entry-content`. Only applies to
    /// a single entry view.
    pub async fn fetch_original_content(&mut self) -> Result<(), EntryError> {
        if self.is_list_view() {
            return Ok(());
        }
        let Some(link) = self.page.query("a[data-fetch-content-entry]") else {
            return Ok(());
        };
        let url = self.link_url(link, "fetch-content-url")?;

        let previous = self.set_loading_label(link);
        let result = self.send(self.post(url).build()).await;
        self.page.set_inner_html(link, &previous);
        let fetched: OriginalContent = result?.json()?;

        if let (Some(content), Some(reading_time)) = (fetched.content, fetched.reading_time) {
            if let Some(node) = self.page.query(".entry-content") {
                self.page.set_inner_html(node, &content);
            }
            if let Some(node) = self.page.query(".entry-reading-time") {
                self.page.set_inner_html(node, &reading_time);
            }
        }
        Ok(())
    }

    /// Asks the server to refresh every feed, then reloads.
    pub async fn refresh_all_feeds(&mut self) -> Result<(), EntryError> {
        let url = self.body_url("refresh-all-feeds-url")?;
        let request = self.post(url).with_method(Method::Get).build();
        self.send(request).await?;
        self.page.reload();
        Ok(())
    }

    /// Removes the feed when the page shows exactly one unsubscribe link.
    pub async fn unsubscribe_from_feed(&mut self) -> Result<(), EntryError> {
        let links = self.page.query_all("[data-action=remove-feed]");
        let &[link] = links.as_slice() else {
            return Ok(());
        };
        let url = self.link_url(link, "url")?;
        self.send(self.post(url).build()).await?;

        match self.page.data(link, "redirect-url").filter(|u| !u.is_empty()) {
            Some(redirect) => self.page.navigate(&redirect),
            None => self.page.reload(),
        }
        Ok(())
    }

    fn link_url(&self, link: NodeId, name: &str) -> Result<String, EntryError> {
        self.page.data(link, name).ok_or_else(|| {
            EntryError::Page(PageError::MissingAttribute {
                selector: self.page.tag_name(link).to_ascii_lowercase(),
                attribute: format!("data-{name}"),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MemoryTransport, Response, TransportError};
    use crate::page::{MemoryPage, Navigation};

    fn entry_page() -> (MemoryPage, NodeId, NodeId) {
        let mut page = MemoryPage::new("http://reader.example/entry/4");
        let root = page.root();
        page.set_attribute(root, "data-csrf-token", "tok");
        let entry = page.append_element(root, "section", &[("class", "entry"), ("data-id", "4")]);
        let link = page.append_element(
            entry,
            "a",
            &[
                ("data-toggle-bookmark", "true"),
                ("data-bookmark-url", "/entry/4/bookmark"),
                ("data-value", "unstar"),
                ("data-label-loading", "Saving..."),
                ("data-label-star", "Star"),
                ("data-label-unstar", "Unstar"),
            ],
        );
        page.set_inner_html(link, "Star");
        let icon = page.append_element(root, "template", &[("id", "icon-unstar")]);
        page.set_inner_html(icon, "<svg/>");
        (page, entry, link)
    }

    #[tokio::test]
    async fn test_toggle_bookmark_swaps_label() {
        let (mut page, entry, link) = entry_page();
        let transport = MemoryTransport::new();
        transport.push_response(Response::new(200, "OK"));

        let status = EntryController::new(&mut page, &transport)
            .toggle_bookmark(entry, false)
            .await
            .unwrap();
        assert_eq!(status, Some(StarStatus::Star));
        assert_eq!(page.data(link, "value").as_deref(), Some("star"));
        assert_eq!(page.inner_html(link), "<svg/><span class=\"icon-label\">Unstar</span>");
        assert_eq!(transport.requests()[0].url, "/entry/4/bookmark");
    }

    #[tokio::test]
    async fn test_bookmark_failure_restores_link() {
        let (mut page, entry, link) = entry_page();
        let transport = MemoryTransport::new();
        transport.push_error(TransportError::Network("offline".into()));

        let result = EntryController::new(&mut page, &transport)
            .toggle_bookmark(entry, false)
            .await;
        assert!(matches!(result, Err(EntryError::Transport(_))));
        assert_eq!(page.inner_html(link), "Star");
        assert_eq!(page.data(link, "value").as_deref(), Some("unstar"));
    }

    #[tokio::test]
    async fn test_save_entry_only_once() {
        let (mut page, entry, _) = entry_page();
        let save = page.append_element(
            entry,
            "a",
            &[("data-save-entry", "true"), ("data-save-url", "/entry/4/save"), ("data-label-loading", "Saving...")],
        );
        page.set_inner_html(save, "Save");
        let transport = MemoryTransport::new();
        transport.push_response(Response::new(201, ""));

        let mut controller = EntryController::new(&mut page, &transport);
        controller.handle_save_entry(Some(save)).await.unwrap();
        controller.handle_save_entry(Some(save)).await.unwrap();

        assert_eq!(transport.request_count(), 1);
        assert_eq!(page.inner_html(save), "Save");
        assert_eq!(page.data(save, "completed").as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_fetch_original_content() {
        let (mut page, entry, _) = entry_page();
        let fetch = page.append_element(
            entry,
            "a",
            &[("data-fetch-content-entry", "true"), ("data-fetch-content-url", "/entry/4/fetch")],
        );
        let content = page.append_element(entry, "div", &[("class", "entry-content")]);
        let reading = page.append_element(entry, "span", &[("class", "entry-reading-time")]);
        let transport = MemoryTransport::new();
        transport.push_response(Response::json_body(
            200,
            &serde_json::json!({"content": "<p>full</p>", "reading_time": "3 min"}),
        ));

        EntryController::new(&mut page, &transport)
            .fetch_original_content()
            .await
            .unwrap();
        assert_eq!(page.inner_html(content), "<p>full</p>");
        assert_eq!(page.inner_html(reading), "3 min");
        assert_eq!(page.inner_html(fetch), "");
    }

    #[tokio::test]
    async fn test_refresh_all_feeds_uses_get() {
        let mut page = MemoryPage::default();
        let root = page.root();
        page.set_attribute(root, "data-refresh-all-feeds-url", "/feeds/refresh");
        let transport = MemoryTransport::new();
        transport.push_response(Response::new(200, ""));

        EntryController::new(&mut page, &transport)
            .refresh_all_feeds()
            .await
            .unwrap();
        assert_eq!(transport.requests()[0].method, Method::Get);
        assert_eq!(page.last_navigation(), Some(&Navigation::Reload));
    }

    #[tokio::test]
    async fn test_unsubscribe_needs_single_link() {
        let mut page = MemoryPage::default();
        let root = page.root();
        for id in ["1", "2"] {
            page.append_element(root, "a", &[("data-action", "remove-feed"), ("data-url", &format!("/feed/{id}/remove"))]);
        }
        let transport = MemoryTransport::new();
        EntryController::new(&mut page, &transport)
            .unsubscribe_from_feed()
            .await
            .unwrap();
        assert_eq!(transport.request_count(), 0);
    }
}
