use crate::page::{NodeId, PageContext};

const ORIGINAL_LABEL: &str = "label-original";

/// Puts the form's submit button into its loading state.
pub fn mark_submitting<P: PageContext + ?Sized>(page: &mut P, form: NodeId) {
    let Some(button) = page.query_in(form, "button") else {
        return;
    };
    let original = page.inner_html(button);
    page.set_data(button, ORIGINAL_LABEL, &original);
    if let Some(loading) = page.data(button, "label-loading") {
        page.set_inner_html(button, &loading);
    }
    page.set_disabled(button, true);
}

/// Undoes [`mark_submitting`].
pub fn restore_submit_button<P: PageContext + ?Sized>(page: &mut P, form: NodeId) {
    let Some(button) = page.query_in(form, "button") else {
        return;
    };
    if let Some(original) = page.data(button, ORIGINAL_LABEL) {
        page.set_inner_html(button, &original);
        page.remove_attribute(button, &format!("data-{ORIGINAL_LABEL}"));
    }
    page.set_disabled(button, false);
}
