//! Offline helpers behind the `passfeed` subcommands.

use std::fmt::Write as _;
use std::path::Path;

use crate::codec::{self, ChallengeMaterial};
use crate::config::OptionsKind;
use crate::error::Result;
use crate::webauthn::options::{parse_authentication_options, parse_registration_options};

/// Hex bytes to base64url text.
pub fn encode_hex(input: &str) -> Result<String> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(cleaned.trim_start_matches("0x"))?;
    Ok(codec::bytes_to_text(&bytes))
}

/// Base64url text to lowercase hex.
pub fn decode_text(input: &str) -> Result<String> {
    let bytes = codec::text_to_bytes(input.trim())?;
    Ok(hex::encode(bytes))
}

fn describe(out: &mut String, label: &str, material: &ChallengeMaterial) {
    let _ = writeln!(out, "{label}: {} bytes ({})", material.len(), hex::encode(material.as_bytes()));
}

/// Parses the options stored at `path` (attribute-escaped or plain JSON) and
/// renders a summary of the decoded material.
pub async fn inspect_file(path: &Path, kind: OptionsKind) -> Result<String> {
    let raw = tokio::fs::read_to_string(path).await?;
    tracing::debug!(path = %path.display(), ?kind, bytes = raw.len(), "Inspecting options");

    let mut out = String::new();
    match kind {
        OptionsKind::Registration => {
            let options = parse_registration_options(raw.trim())?.public_key;
            let rp = options.rp.id.as_deref().unwrap_or(&options.rp.name);
            let _ = writeln!(out, "relying party: {rp}");
            let _ = writeln!(out, "user: {} ({})", options.user.name, options.user.display_name);
            describe(&mut out, "user id", &options.user.id);
            describe(&mut out, "challenge", &options.challenge);
            let algs: Vec<String> = options.pub_key_cred_params.iter().map(|p| p.alg.to_string()).collect();
            let _ = writeln!(out, "algorithms: {}", algs.join(", "));
            let excluded = options.exclude_credentials.as_ref().map_or(0, Vec::len);
            let _ = writeln!(out, "excluded credentials: {excluded}");
        }
        OptionsKind::Authentication => {
            let request = parse_authentication_options(raw.trim())?;
            let options = request.public_key;
            if let Some(rp_id) = &options.rp_id {
                let _ = writeln!(out, "relying party: {rp_id}");
            }
            describe(&mut out, "challenge", &options.challenge);
            let allowed = options.allow_credentials.as_ref().map_or(0, Vec::len);
            let _ = writeln!(out, "allowed credentials: {allowed}");
            if let Some(mediation) = request.mediation {
                let _ = writeln!(out, "mediation: {mediation:?}");
            }
        }
    }
    Ok(out)
}
