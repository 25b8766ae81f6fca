//! Credential resolution from the shared credentials file.
//!
//! Mirrors the profile lookup of the usual SDK chain for the two locations
//! this tool cares about: `$AWS_SHARED_CREDENTIALS_FILE` and
//! `~/.aws/credentials`. A missing file or profile is a valid, non-fatal
//! outcome; the caller decides whether to abort or continue.

use std::path::PathBuf;

use tracing::debug;

use krex_model::Credentials;

use crate::StoreError;

/// Resolve the named profile to a credential triple.
///
/// Returns `Ok(None)` when the credentials file or the profile does not
/// exist. A profile that exists but lacks the key pair is an error, since
/// silently proceeding with half a credential set would only fail later at
/// upload time with a much worse message.
pub fn resolve_profile(name: &str) -> Result<Option<Credentials>, StoreError> {
    let Some(path) = credentials_file_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "credentials file not found");
        return Ok(None);
    }

    let text = std::fs::read_to_string(&path)?;
    parse_profile(&text, name)
}

fn credentials_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".aws").join("credentials"))
}

/// Parse one profile section out of an INI-shaped credentials file.
fn parse_profile(text: &str, profile: &str) -> Result<Option<Credentials>, StoreError> {
    let mut in_section = false;
    let mut found = false;
    let mut access_key_id = None;
    let mut secret_access_key = None;
    let mut session_token = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = section.trim() == profile;
            found |= in_section;
            continue;
        }
        if !in_section {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(StoreError::Credential(format!(
                "malformed line in credentials file: '{line}'"
            )));
        };
        let value = value.trim().to_string();
        match key.trim().to_ascii_lowercase().as_str() {
            "aws_access_key_id" => access_key_id = Some(value),
            "aws_secret_access_key" => secret_access_key = Some(value),
            "aws_session_token" => session_token = Some(value),
            _ => {}
        }
    }

    if !found {
        debug!(profile, "profile not present in credentials file");
        return Ok(None);
    }

    match (access_key_id, secret_access_key) {
        (Some(access), Some(secret)) => Ok(Some(Credentials::new(access, secret, session_token))),
        _ => Err(StoreError::Credential(format!(
            "profile '{profile}' is missing aws_access_key_id or aws_secret_access_key"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_profile;

    const FILE: &str = "\
# shared credentials
[default]
aws_access_key_id = AKIADEFAULT
aws_secret_access_key = secret-default

[prod]
aws_access_key_id = AKIAPROD
aws_secret_access_key = secret-prod
aws_session_token = token-prod
";

    #[test]
    fn resolves_profile_with_session_token() {
        let creds = parse_profile(FILE, "prod").unwrap().unwrap();
        assert_eq!(creds.access_key_id, "AKIAPROD");
        assert_eq!(creds.secret_access_key, "secret-prod");
        assert_eq!(creds.session_token.as_deref(), Some("token-prod"));
    }

    #[test]
    fn resolves_profile_without_session_token() {
        let creds = parse_profile(FILE, "default").unwrap().unwrap();
        assert_eq!(creds.access_key_id, "AKIADEFAULT");
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn unknown_profile_is_none_not_error() {
        assert!(parse_profile(FILE, "staging").unwrap().is_none());
    }

    #[test]
    fn incomplete_profile_is_an_error() {
        let text = "[broken]\naws_access_key_id = AKIA\n";
        assert!(parse_profile(text, "broken").is_err());
    }

    #[test]
    fn malformed_line_is_an_error() {
        let text = "[p]\nthis is not a key value pair\n";
        assert!(parse_profile(text, "p").is_err());
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let text = "\n; comment\n# another\n[p]\naws_access_key_id = a\naws_secret_access_key = b\n\n";
        let creds = parse_profile(text, "p").unwrap().unwrap();
        assert_eq!(creds.access_key_id, "a");
        assert_eq!(creds.secret_access_key, "b");
    }
}
