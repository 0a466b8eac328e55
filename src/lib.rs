pub mod codec;
pub mod config;
pub mod entries;
pub mod error;
pub mod http;
pub mod inspect;
pub mod page;
pub mod ui;
pub mod webauthn;

pub use codec::ChallengeMaterial;
pub use error::{Error, Result};

pub async fn run(cfg: config::Config) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    let level = match cfg.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .init();

    match cfg.command {
        config::Command::Encode { hex } => {
            println!("{}", inspect::encode_hex(&hex)?);
        }
        config::Command::Decode { text } => {
            let decoded = inspect::decode_text(&text)
                .map_err(|e| anyhow::anyhow!("cannot decode {text:?}: {e}"))?;
            println!("{decoded}");
        }
        config::Command::Inspect { path, kind } => {
            tracing::info!(path = %path.display(), "Inspecting options file");
            let summary = inspect::inspect_file(&path, kind)
                .await
                .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
            print!("{summary}");
        }
    }
    Ok(())
}
