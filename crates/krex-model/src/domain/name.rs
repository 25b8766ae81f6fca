use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random suffix appended by [`JobName::generate`].
const SUFFIX_LEN: usize = 8;

/// Name of a job resource inside a namespace.
///
/// Names generated via [`JobName::generate`] carry a random hex suffix so
/// that concurrent exports in the same namespace never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobName(String);

impl JobName {
    /// Wrap an already-known name without modification.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Generate a unique name as `{prefix}-{8 hex chars}`.
    pub fn generate(prefix: &str) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{prefix}-{}", &suffix[..SUFFIX_LEN]))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{JobName, SUFFIX_LEN};

    #[test]
    fn generate_appends_hex_suffix_to_prefix() {
        let name = JobName::generate("mongo-export-taskdata");
        let rest = name
            .as_str()
            .strip_prefix("mongo-export-taskdata-")
            .expect("prefix must be preserved");

        assert_eq!(rest.len(), SUFFIX_LEN);
        assert!(rest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generate_is_unique_per_call() {
        let a = JobName::generate("prom-s3");
        let b = JobName::generate("prom-s3");
        assert_ne!(a, b);
    }

    #[test]
    fn display_matches_as_str() {
        let name = JobName::new("prom-s3-abcd1234");
        assert_eq!(name.to_string(), name.as_str());
    }
}
