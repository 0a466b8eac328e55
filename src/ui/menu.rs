use crate::page::{Display, NodeId, PageContext};

fn toggle_display<P: PageContext>(page: &mut P, selector: &str) {
    if let Some(node) = page.query(selector) {
        let next = if page.is_visible(node) { Display::None } else { Display::Block };
        page.set_display(node, next);
    }
}

/// Shows or hides the main menu and search box on small screens.
pub fn toggle_main_menu<P: PageContext>(page: &mut P) {
    toggle_display(page, ".header nav ul");
    toggle_display(page, ".header .search");
}

/// Follows a main menu entry whether the `<li>` or its link was clicked.
pub fn on_main_menu_item_click<P: PageContext>(page: &mut P, target: NodeId) {
    let link = if page.tag_name(target).eq_ignore_ascii_case("a") {
        Some(target)
    } else {
        page.query_in(target, "a")
    };
    if let Some(href) = link.and_then(|l| page.attribute(l, "href")) {
        page.navigate(&href);
    }
}

pub fn set_focus_to_search_input<P: PageContext>(page: &mut P) {
    if let Some(toggle) = page.query(".search-toggle-switch") {
        page.set_display(toggle, Display::None);
    }
    if let Some(form) = page.query(".search-form") {
        page.set_display(form, Display::Block);
    }
    if let Some(input) = page.by_id("search-input") {
        page.focus(input);
        page.set_value(input, "");
    }
}

pub fn show_keyboard_shortcuts<P: PageContext>(page: &mut P) {
    if let Some(template) = page.by_id("keyboard-shortcuts") {
        let content = page.inner_html(template);
        page.open_modal(&content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, Navigation};

    #[test]
    fn test_toggle_main_menu() {
        let mut page = MemoryPage::default();
        let root = page.root();
        let header = page.append_element(root, "header", &[("class", "header")]);
        let nav = page.append_element(header, "nav", &[]);
        let ul = page.append_element(nav, "ul", &[]);
        let search = page.append_element(header, "div", &[("class", "search")]);

        toggle_main_menu(&mut page);
        assert!(!page.is_visible(ul));
        assert!(!page.is_visible(search));

        toggle_main_menu(&mut page);
        assert_eq!(page.display(ul), Some(Display::Block));
        assert!(page.is_visible(search));
    }

    #[test]
    fn test_menu_item_click_on_list_item() {
        let mut page = MemoryPage::default();
        let root = page.root();
        let li = page.append_element(root, "li", &[]);
        page.append_element(li, "a", &[("href", "/unread")]);

        on_main_menu_item_click(&mut page, li);
        assert_eq!(page.last_navigation(), Some(&Navigation::Assign("/unread".into())));
    }

    #[test]
    fn test_focus_search_input() {
        let mut page = MemoryPage::default();
        let root = page.root();
        let toggle = page.append_element(root, "div", &[("class", "search-toggle-switch")]);
        let form = page.append_element(root, "form", &[("class", "search-form")]);
        page.set_display(form, Display::None);
        let input = page.append_element(form, "input", &[("id", "search-input")]);
        page.set_value(input, "old query");

        set_focus_to_search_input(&mut page);
        assert!(!page.is_visible(toggle));
        assert!(page.is_visible(input));
        assert_eq!(page.focused(), Some(input));
        assert_eq!(page.value(input), "");
    }
}
