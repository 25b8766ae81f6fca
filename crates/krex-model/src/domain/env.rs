use serde::{Deserialize, Serialize};

/// Where an environment binding's value comes from.
///
/// A binding either carries a literal string or references a key inside a
/// cluster-managed secret, so that sensitive values never appear in the job
/// description itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvValue {
    /// Plain string value embedded in the job description.
    Literal(String),
    /// Reference to a single key of a named secret, resolved by the cluster.
    SecretKey { secret: String, key: String },
}

impl EnvValue {
    /// Returns `true` for a literal value that is the empty string.
    ///
    /// Secret references are never considered empty: whether the referenced
    /// key holds an empty value is only known to the cluster.
    pub fn is_empty_literal(&self) -> bool {
        matches!(self, EnvValue::Literal(v) if v.is_empty())
    }
}

/// A single named environment binding of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvBinding {
    /// Name of the environment variable.
    name: String,
    /// Value or secret reference.
    value: EnvValue,
}

impl EnvBinding {
    /// Create a binding with a literal value.
    pub fn literal<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: EnvValue::Literal(value.into()),
        }
    }

    /// Create a binding referencing a key of a named secret.
    pub fn secret_key<N, S, K>(name: N, secret: S, key: K) -> Self
    where
        N: Into<String>,
        S: Into<String>,
        K: Into<String>,
    {
        Self {
            name: name.into(),
            value: EnvValue::SecretKey {
                secret: secret.into(),
                key: key.into(),
            },
        }
    }

    /// Get the variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value source.
    pub fn value(&self) -> &EnvValue {
        &self.value
    }
}

/// Ordered list of environment bindings attached to a container.
///
/// Serialized as a transparent array wrapper. Order is preserved as pushed;
/// duplicate names are allowed and resolved by the cluster (last one wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvBindings(pub Vec<EnvBinding>);

impl EnvBindings {
    /// Create an empty binding list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a literal binding.
    pub fn push_literal<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.0.push(EnvBinding::literal(name, value));
    }

    /// Append a secret-key binding.
    pub fn push_secret_key<N, S, K>(&mut self, name: N, secret: S, key: K)
    where
        N: Into<String>,
        S: Into<String>,
        K: Into<String>,
    {
        self.0.push(EnvBinding::secret_key(name, secret, key));
    }

    /// Iterate over all bindings.
    pub fn iter(&self) -> impl Iterator<Item = &EnvBinding> {
        self.0.iter()
    }

    /// Get the value for a name, returning the last matching entry.
    pub fn get(&self, name: &str) -> Option<&EnvValue> {
        self.0
            .iter()
            .rev()
            .find(|b| b.name() == name)
            .map(|b| b.value())
    }

    /// Concatenate two binding lists, entries from `other` appended last.
    pub fn extended(&self, other: &EnvBindings) -> EnvBindings {
        let mut out = self.0.clone();
        out.extend(other.0.clone());
        EnvBindings(out)
    }
}

impl FromIterator<EnvBinding> for EnvBindings {
    fn from_iter<I: IntoIterator<Item = EnvBinding>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
