//! Inline "are you sure? yes, no" prompts replacing an action link.

use crate::http::{RequestBuilder, Transport, TransportError};
use crate::page::{Display, NodeId, PageContext};

/// An open prompt. The host routes clicks on `yes` / `no` to
/// [`ConfirmationPrompt::confirm`] / [`ConfirmationPrompt::cancel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub link: NodeId,
    pub container: NodeId,
    pub question: NodeId,
    pub yes: NodeId,
    pub no: NodeId,
}

/// Where the confirmed action goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedAction {
    pub url: Option<String>,
    pub redirect_url: Option<String>,
}

impl ConfirmationPrompt {
    /// Hides the clicked link and appends the prompt next to it. `target` may
    /// be the link or an element inside it.
    pub fn open<P: PageContext>(page: &mut P, target: NodeId) -> Option<Self> {
        let link = if page.tag_name(target).eq_ignore_ascii_case("a") {
            target
        } else {
            page.parent(target)?
        };
        let container = page.parent(link)?;
        page.set_display(link, Display::None);

        let label = |page: &P, name: &str| page.data(link, name).unwrap_or_default();

        let question = page.create_element("span");
        page.set_attribute(question, "class", "confirm");
        let text = format!("{} ", label(page, "label-question"));
        page.append_text(question, &text);

        let yes = page.create_element("a");
        page.set_attribute(yes, "href", "#");
        let yes_label = label(page, "label-yes");
        page.append_text(yes, &yes_label);
        page.append_child(question, yes);

        page.append_text(question, ", ");

        let no = page.create_element("a");
        page.set_attribute(no, "href", "#");
        let no_label = label(page, "label-no");
        page.append_text(no, &no_label);
        page.append_child(question, no);

        page.append_child(container, question);

        Some(Self { link, container, question, yes, no })
    }

    /// Swaps the prompt for a loading label and hands back the link's target.
    pub fn confirm<P: PageContext>(self, page: &mut P) -> ConfirmedAction {
        let loading = page.create_element("span");
        page.set_attribute(loading, "class", "loading");
        let label = page.data(self.link, "label-loading").unwrap_or_default();
        page.append_text(loading, &label);

        page.remove(self.question);
        page.append_child(self.container, loading);

        ConfirmedAction {
            url: page.data(self.link, "url"),
            redirect_url: page.data(self.link, "redirect-url"),
        }
    }

    /// Removes the prompt and shows the link again.
    pub fn cancel<P: PageContext>(self, page: &mut P) {
        page.set_display(self.link, Display::Inline);
        page.remove(self.question);
    }
}

/// Confirms `prompt`, posts to the link's URL, then follows its redirect or
/// reloads.
pub async fn confirm_and_submit<P, T>(
    prompt: ConfirmationPrompt,
    page: &mut P,
    transport: &T,
) -> Result<(), TransportError>
where
    P: PageContext,
    T: Transport,
{
    let action = prompt.confirm(page);
    let Some(url) = action.url else {
        tracing::warn!("Confirmed link has no data-url");
        return Ok(());
    };
    let request = RequestBuilder::for_page(&*page, url).build();
    transport.execute(request).await?;
    match action.redirect_url.filter(|u| !u.is_empty()) {
        Some(redirect) => page.navigate(&redirect),
        None => page.reload(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MemoryTransport, Method, Response};
    use crate::page::{MemoryPage, Navigation};

    fn remove_link_page() -> (MemoryPage, NodeId, NodeId) {
        let mut page = MemoryPage::default();
        let root = page.root();
        let li = page.append_element(root, "li", &[]);
        let link = page.append_element(
            li,
            "a",
            &[
                ("href", "#"),
                ("data-confirm", "true"),
                ("data-label-question", "Are you sure?"),
                ("data-label-yes", "yes"),
                ("data-label-no", "no"),
                ("data-label-loading", "In progress..."),
                ("data-url", "/credentials/7/remove"),
                ("data-redirect-url", "/credentials"),
            ],
        );
        (page, li, link)
    }

    #[test]
    fn test_open_hides_link_and_appends_prompt() {
        let (mut page, li, link) = remove_link_page();
        let prompt = ConfirmationPrompt::open(&mut page, link).unwrap();

        assert!(!page.is_visible(link));
        assert_eq!(prompt.container, li);
        assert_eq!(page.text_content(prompt.question), "Are you sure? yes, no");
        assert!(page.query("span.confirm").is_some());
    }

    #[test]
    fn test_open_from_inner_element() {
        let (mut page, _, link) = remove_link_page();
        let icon = page.append_element(link, "svg", &[]);
        let prompt = ConfirmationPrompt::open(&mut page, icon).unwrap();
        assert_eq!(prompt.link, link);
    }

    #[test]
    fn test_cancel_restores_link() {
        let (mut page, _, link) = remove_link_page();
        let prompt = ConfirmationPrompt::open(&mut page, link).unwrap();
        prompt.cancel(&mut page);

        assert!(page.is_visible(link));
        assert!(page.query("span.confirm").is_none());
    }

    #[tokio::test]
    async fn test_confirm_and_submit_redirects() {
        let (mut page, _, link) = remove_link_page();
        let transport = MemoryTransport::new();
        transport.push_response(Response::new(200, ""));

        let prompt = ConfirmationPrompt::open(&mut page, link).unwrap();
        confirm_and_submit(prompt, &mut page, &transport).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, "/credentials/7/remove");
        assert_eq!(page.last_navigation(), Some(&Navigation::Assign("/credentials".into())));
        let loading = page.query("span.loading").unwrap();
        assert_eq!(page.text_content(loading), "In progress...");
        assert!(page.query("span.confirm").is_none());
    }
}
