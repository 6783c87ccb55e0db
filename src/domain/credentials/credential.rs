use serde::{Deserialize, Serialize};

/// Provider tier a credential belongs to
///
/// Primary credentials are always tried before secondary ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTier {
    Primary,
    Secondary,
}

impl std::fmt::Display for ProviderTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderTier::Primary => write!(f, "primary"),
            ProviderTier::Secondary => write!(f, "secondary"),
        }
    }
}

/// Secret bound to one provider tier
///
/// The position is the credential's index in its tier's ordered list and
/// doubles as a non-secret label for logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    tier: ProviderTier,
    position: usize,
    secret: String,
}

impl Credential {
    pub fn new(tier: ProviderTier, position: usize, secret: impl Into<String>) -> Self {
        Self {
            tier,
            position,
            secret: secret.into(),
        }
    }

    pub fn tier(&self) -> ProviderTier {
        self.tier
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Log-safe label, e.g. `primary#0`
    pub fn label(&self) -> String {
        format!("{}#{}", self.tier, self.position)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("tier", &self.tier)
            .field("position", &self.position)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
