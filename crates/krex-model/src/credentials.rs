use serde::{Deserialize, Serialize};

use crate::{EnvBinding, EnvBindings};

/// Environment variable carrying the access key id.
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable carrying the secret access key.
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable carrying the (optional) session token.
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Static object-storage credential triple.
///
/// Resolved from a named profile or from the ambient environment; lives for
/// the duration of a single export invocation and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create a credential triple.
    pub fn new<A, S>(access_key_id: A, secret_access_key: S, session_token: Option<String>) -> Self
    where
        A: Into<String>,
        S: Into<String>,
    {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }

    /// All three bindings, unconditionally.
    ///
    /// A missing session token is rendered as an empty string, matching the
    /// MongoDB export job which attaches every provided entry regardless of
    /// emptiness.
    pub fn env_bindings(&self) -> EnvBindings {
        EnvBindings(vec![
            EnvBinding::literal(ENV_ACCESS_KEY_ID, &self.access_key_id),
            EnvBinding::literal(ENV_SECRET_ACCESS_KEY, &self.secret_access_key),
            EnvBinding::literal(ENV_SESSION_TOKEN, self.session_token.as_deref().unwrap_or("")),
        ])
    }

    /// Only bindings whose value is non-empty.
    ///
    /// The Prometheus export job filters empty values out of its container
    /// environment; see the builders for where each variant applies.
    pub fn env_bindings_filtered(&self) -> EnvBindings {
        self.env_bindings()
            .iter()
            .filter(|b| !b.value().is_empty_literal())
            .cloned()
            .collect()
    }
}
