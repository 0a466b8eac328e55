use std::collections::BTreeMap;

use super::selector::{Compound, ElementView, Selector};
use super::{Display, NodeId, PageContext};

const TEXT_TAG: &str = "#text";

/// A navigation the page was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Assign(String),
    Reload,
    NewTab(String),
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    html: String,
    value: String,
    disabled: bool,
    display: Option<Display>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            html: String::new(),
            value: String::new(),
            disabled: false,
            display: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl ElementView for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// In-memory document backing [`PageContext`] outside a browser.
///
/// Elements are built with [`MemoryPage::append_element`]; markup assigned
/// through `set_inner_html` is stored verbatim and is not itself queryable.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
    location: String,
    title: String,
    focused: Option<NodeId>,
    scrolled: Vec<NodeId>,
    navigations: Vec<Navigation>,
    modals: Vec<String>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new("http://localhost/")
    }
}

impl MemoryPage {
    /// A page at `location` holding an empty `<body>`.
    pub fn new(location: &str) -> Self {
        Self {
            nodes: vec![Node::new("body")],
            location: location.to_string(),
            title: String::new(),
            focused: None,
            scrolled: Vec::new(),
            navigations: Vec::new(),
            modals: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a `tag` element under `parent`; a `class` entry is split on
    /// whitespace into the class list.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let node = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(node, name, value);
        }
        self.append_child(parent, node);
        node
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn scrolled(&self) -> &[NodeId] {
        &self.scrolled
    }

    pub fn navigations(&self) -> &[Navigation] {
        &self.navigations
    }

    pub fn last_navigation(&self) -> Option<&Navigation> {
        self.navigations.last()
    }

    pub fn modals(&self) -> &[String] {
        &self.modals
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.node(node).disabled
    }

    pub fn display(&self, node: NodeId) -> Option<Display> {
        self.node(node).display
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Attached elements in document order, text nodes excluded.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.tag == TEXT_TAG {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        if !selector.subject().matches(self.node(id)) {
            return false;
        }
        let mut cursor = self.node(id).parent;
        'outer: for compound in selector.ancestors() {
            while let Some(ancestor) = cursor {
                cursor = self.node(ancestor).parent;
                if compound_matches(self.node(ancestor), compound) {
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }

    fn select(&self, scope: NodeId, selector: &str, include_scope: bool) -> Vec<NodeId> {
        let selector = match Selector::parse(selector) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring query");
                return Vec::new();
            }
        };
        let mut candidates = Vec::new();
        if include_scope {
            candidates.push(scope);
        }
        candidates.extend(self.descendants(scope));
        candidates
            .into_iter()
            .filter(|id| self.matches(*id, &selector))
            .collect()
    }

    fn render(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        if node.tag == TEXT_TAG {
            out.push_str(&node.html);
            return;
        }
        out.push('<');
        out.push_str(&node.tag);
        if !node.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", node.classes.join(" ")));
        }
        for (name, value) in &node.attributes {
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        out.push('>');
        out.push_str(&self.inner_html(id));
        out.push_str(&format!("</{}>", node.tag));
    }
}

fn compound_matches(node: &Node, compound: &Compound) -> bool {
    compound.matches(node)
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

impl PageContext for MemoryPage {
    fn query(&self, selector: &str) -> Option<NodeId> {
        self.select(self.root(), selector, true).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(self.root(), selector, true)
    }

    fn query_in(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.select(scope, selector, false).into_iter().next()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.node(node).tag.to_ascii_uppercase()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let node = self.node(node);
        if name == "class" {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let node = self.node_mut(node);
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let node = self.node_mut(node);
        if name == "class" {
            node.classes.clear();
        } else {
            node.attributes.remove(name);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        ElementView::has_class(self.node(node), class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let node = self.node_mut(node);
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        self.node_mut(node).classes.retain(|c| c != class);
    }

    fn inner_html(&self, node: NodeId) -> String {
        let mut out = self.node(node).html.clone();
        for child in &self.node(node).children {
            self.render(*child, &mut out);
        }
        out
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        let children = std::mem::take(&mut self.node_mut(node).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
        self.node_mut(node).html = html.to_string();
    }

    fn text_content(&self, node: NodeId) -> String {
        let n = self.node(node);
        if n.tag == TEXT_TAG {
            return n.html.clone();
        }
        let mut out = strip_tags(&n.html);
        for child in &n.children {
            out.push_str(&self.text_content(*child));
        }
        out
    }

    fn value(&self, node: NodeId) -> String {
        self.node(node).value.clone()
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        self.node_mut(node).value = value.to_string();
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.node_mut(node).disabled = disabled;
    }

    fn is_visible(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.node(id).display == Some(Display::None) {
                return false;
            }
            current = self.node(id).parent;
        }
        true
    }

    fn set_display(&mut self, node: NodeId, display: Display) {
        self.node_mut(node).display = Some(display);
    }

    fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    fn scroll_to(&mut self, node: NodeId, _force: bool) {
        self.scrolled.push(node);
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.node(child).parent {
            self.node_mut(old).children.retain(|c| *c != child);
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        let node = self.create_element(TEXT_TAG);
        self.node_mut(node).html = text.to_string();
        self.append_child(parent, node);
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != node);
        }
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn navigate(&mut self, url: &str) {
        self.location = url.to_string();
        self.navigations.push(Navigation::Assign(url.to_string()));
    }

    fn reload(&mut self) {
        self.navigations.push(Navigation::Reload);
    }

    fn open_new_tab(&mut self, url: &str) {
        self.navigations.push(Navigation::NewTab(url.to_string()));
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn open_modal(&mut self, html: &str) {
        self.modals.push(html.to_string());
    }
}
