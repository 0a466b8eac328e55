use crate::config::TOAST_RESTART_DELAY;
use crate::page::PageContext;

pub const TOAST_ANIMATION_CLASS: &str = "toast-animate";

/// Markup of the `<template id="icon-{name}">` icon.
pub fn icon_html(page: &impl PageContext, name: &str) -> Option<String> {
    page.query(&format!("template#icon-{name}"))
        .map(|node| page.inner_html(node))
}

/// Icon followed by its label, the way action links render.
pub fn icon_label_html(icon: &str, label: &str) -> String {
    format!("{icon}<span class=\"icon-label\">{label}</span>")
}

/// Shows `label` with `icon` in the toast and restarts its animation.
/// Does nothing unless both are present.
pub async fn show_toast<P: PageContext>(page: &mut P, label: Option<&str>, icon: Option<&str>) {
    let (Some(label), Some(icon)) = (label, icon) else {
        return;
    };
    if label.is_empty() {
        return;
    }
    let Some(message) = page.by_id("toast-msg") else {
        return;
    };
    page.set_inner_html(message, &icon_label_html(icon, label));

    if let Some(wrapper) = page.by_id("toast-wrapper") {
        page.remove_class(wrapper, TOAST_ANIMATION_CLASS);
        tokio::time::sleep(TOAST_RESTART_DELAY).await;
        page.add_class(wrapper, TOAST_ANIMATION_CLASS);
    }
}
