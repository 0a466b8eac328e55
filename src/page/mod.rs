//! The page capability every controller works through.
//!
//! Controllers never touch a browser document directly. They query and
//! mutate a [`PageContext`], which a browser host backs with the live DOM and
//! tests back with [`MemoryPage`].

pub mod memory;
pub mod selector;

pub use memory::{MemoryPage, Navigation};
pub use selector::Selector;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Unsupported selector: {0}")]
    Selector(String),
    #[error("Missing element: {0}")]
    MissingElement(String),
    #[error("Missing attribute {attribute} on {selector}")]
    MissingAttribute { selector: String, attribute: String },
}

/// Handle to an element owned by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// CSS `display` values the controllers toggle between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
    Inline,
}

pub trait PageContext {
    fn query(&self, selector: &str) -> Option<NodeId>;
    fn query_all(&self, selector: &str) -> Vec<NodeId>;
    /// First descendant of `scope` matching `selector`.
    fn query_in(&self, scope: NodeId, selector: &str) -> Option<NodeId>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn tag_name(&self, node: NodeId) -> String;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    fn inner_html(&self, node: NodeId) -> String;
    fn set_inner_html(&mut self, node: NodeId, html: &str);
    fn text_content(&self, node: NodeId) -> String;
    fn value(&self, node: NodeId) -> String;
    fn set_value(&mut self, node: NodeId, value: &str);
    fn set_disabled(&mut self, node: NodeId, disabled: bool);

    fn is_visible(&self, node: NodeId) -> bool;
    fn set_display(&mut self, node: NodeId, display: Display);
    fn focus(&mut self, node: NodeId);
    /// Scrolls `node` into view; `force` scrolls even when already on screen.
    fn scroll_to(&mut self, node: NodeId, force: bool);

    fn create_element(&mut self, tag: &str) -> NodeId;
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    fn append_text(&mut self, parent: NodeId, text: &str);
    fn remove(&mut self, node: NodeId);

    fn location(&self) -> String;
    fn navigate(&mut self, url: &str);
    fn reload(&mut self);
    fn open_new_tab(&mut self, url: &str);
    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);
    fn open_modal(&mut self, html: &str);

    fn body(&self) -> Option<NodeId> {
        self.query("body")
    }

    /// A `data-*` attribute on `<body>`.
    fn body_data(&self, name: &str) -> Option<String> {
        let body = self.body()?;
        self.attribute(body, &format!("data-{name}"))
    }

    /// A `data-*` attribute on `node`.
    fn data(&self, node: NodeId, name: &str) -> Option<String> {
        self.attribute(node, &format!("data-{name}"))
    }

    fn set_data(&mut self, node: NodeId, name: &str, value: &str) {
        self.set_attribute(node, &format!("data-{name}"), value);
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.query(&format!("#{id}"))
    }

    /// Nearest ancestor (or `node` itself) carrying `class`.
    fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.has_class(n, class) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    fn visible_elements(&self, selector: &str) -> Vec<NodeId> {
        self.query_all(selector)
            .into_iter()
            .filter(|n| self.is_visible(*n))
            .collect()
    }
}
