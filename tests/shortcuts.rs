use passfeed::http::{MemoryTransport, Response};
use passfeed::page::{MemoryPage, Navigation, NodeId, PageContext};
use passfeed::ui::{Action, KeyEvent, click_action, default_bindings, dispatch};

fn reader_page() -> (MemoryPage, Vec<NodeId>) {
    let mut page = MemoryPage::new("http://reader.example/unread");
    let body = page.root();
    page.set_attribute(body, "data-add-subscription-url", "/subscribe");
    page.set_attribute(body, "data-refresh-all-feeds-url", "/feeds/refresh");
    page.append_element(body, "a", &[("data-page", "starred"), ("href", "/starred")]);

    let list = page.append_element(body, "div", &[("class", "items")]);
    let items = (1..=3)
        .map(|i| {
            let item = page.append_element(list, "article", &[("class", "item item-status-unread"), ("data-id", &i.to_string())]);
            let header = page.append_element(item, "div", &[("class", "item-header")]);
            let title = page.append_element(header, "span", &[("class", "item-title")]);
            page.append_element(title, "a", &[("href", &format!("/unread/entry/{i}"))]);
            page.append_element(item, "a", &[("data-original-link", "true"), ("href", &format!("https://blog.example/{i}"))]);
            item
        })
        .collect();
    (page, items)
}

async fn press(page: &mut MemoryPage, transport: &MemoryTransport, keys: &[&str]) {
    let mut handler = default_bindings();
    for key in keys {
        if let Some(action) = handler.on_key(&KeyEvent::new(*key)) {
            dispatch(page, transport, action, None).await.unwrap();
        }
    }
}

#[tokio::test]
async fn test_j_k_walk_the_list() {
    let (mut page, items) = reader_page();
    let transport = MemoryTransport::new();

    press(&mut page, &transport, &["j", "j", "j"]).await;
    assert_eq!(page.query_all(".current-item"), vec![items[2]]);

    press(&mut page, &transport, &["j"]).await;
    assert_eq!(page.query_all(".current-item"), vec![items[0]]);

    press(&mut page, &transport, &["k"]).await;
    assert_eq!(page.query_all(".current-item"), vec![items[2]]);
    assert!(page.scrolled().contains(&items[2]));
}

#[tokio::test]
async fn test_open_selected_item() {
    let (mut page, _) = reader_page();
    let transport = MemoryTransport::new();

    press(&mut page, &transport, &["n", "o"]).await;
    assert_eq!(page.last_navigation(), Some(&Navigation::Assign("/unread/entry/1".into())));
}

#[tokio::test]
async fn test_go_sequence() {
    let (mut page, _) = reader_page();
    let transport = MemoryTransport::new();

    press(&mut page, &transport, &["g", "b"]).await;
    assert_eq!(page.last_navigation(), Some(&Navigation::Assign("/starred".into())));
}

#[tokio::test]
async fn test_open_original_marks_read_and_advances() {
    let (mut page, items) = reader_page();
    page.set_attribute(page.root(), "data-entries-status-url", "/entry/status");
    let transport = MemoryTransport::new();
    transport.push_response(Response::new(200, "1"));

    press(&mut page, &transport, &["j", "v"]).await;
    assert_eq!(page.navigations(), &[Navigation::NewTab("https://blog.example/1".into())]);
    assert!(page.has_class(items[0], "item-status-read"));
    assert!(page.has_class(items[1], "current-item"));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_add_subscription_and_refresh() {
    let (mut page, _) = reader_page();
    let transport = MemoryTransport::new();
    transport.push_response(Response::new(204, ""));

    press(&mut page, &transport, &["R", "+"]).await;
    assert_eq!(
        page.navigations(),
        &[Navigation::Reload, Navigation::Assign("/subscribe".into())]
    );
}

#[tokio::test]
async fn test_click_on_original_link_marks_item_read() {
    let (mut page, items) = reader_page();
    page.set_attribute(page.root(), "data-entries-status-url", "/entry/status");
    let transport = MemoryTransport::new();
    transport.push_response(Response::new(200, "1"));

    let link = page.query_in(items[1], "a[data-original-link]").unwrap();
    let (action, target) = click_action(&page, link).unwrap();
    assert_eq!(action, Action::MarkEntryAsRead);

    dispatch(&mut page, &transport, action, Some(target)).await.unwrap();
    assert!(page.has_class(items[1], "item-status-read"));
    assert!(page.has_class(items[0], "item-status-unread"));
}
