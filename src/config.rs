use std::path::PathBuf;
use std::time::Duration;

use crate::page::PageContext;

/// Delay before the toast animation class is re-added, so the animation
/// restarts.
pub const TOAST_RESTART_DELAY: Duration = Duration::from_millis(100);
/// Longest key sequence a shortcut may use (`g u`).
pub const SHORTCUT_SEQUENCE_LEN: usize = 2;

pub const CREDENTIAL_SAVE_PATH: &str = "/credentials/save";
pub const CREDENTIAL_LIST_PATH: &str = "/credentials";
pub const CREDENTIAL_CREATE_PATH: &str = "/credentials/create";

/// Credential endpoints, rooted at the application's base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub credential_save: String,
    pub credential_list: String,
    pub credential_create: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::with_base_path("")
    }
}

impl Endpoints {
    pub fn with_base_path(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            credential_save: format!("{base}{CREDENTIAL_SAVE_PATH}"),
            credential_list: format!("{base}{CREDENTIAL_LIST_PATH}"),
            credential_create: format!("{base}{CREDENTIAL_CREATE_PATH}"),
        }
    }

    /// Reads the base path from `<body data-base-path>`.
    pub fn from_page(page: &impl PageContext) -> Self {
        Self::with_base_path(&page.body_data("base-path").unwrap_or_default())
    }
}

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "passfeed", about = "Inspect passkey challenge material and page-embedded options")]
pub struct Config {
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Encode hex bytes as base64url text.
    Encode { hex: String },
    /// Decode base64url text into hex bytes.
    Decode { text: String },
    /// Parse and decode ceremony options saved from a page attribute.
    Inspect {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = OptionsKind::Registration)]
        kind: OptionsKind,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsKind {
    Registration,
    Authentication,
}
