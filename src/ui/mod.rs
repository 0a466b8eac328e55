//! Page glue shared by the controllers: toasts, inline confirmations, the
//! main menu, form buttons and keyboard shortcuts.

pub mod action;
pub mod confirm;
pub mod forms;
pub mod keyboard;
pub mod menu;
pub mod toast;

pub use action::{Action, click_action, dispatch};
pub use confirm::{ConfirmationPrompt, ConfirmedAction, confirm_and_submit};
pub use keyboard::{KeyEvent, KeyboardHandler, default_bindings};
pub use toast::show_toast;
