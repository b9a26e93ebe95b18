/// Where a secret is loaded from
#[derive(Debug, Clone)]
pub enum SecretType {
    EnvVar { name: String },
}

impl SecretType {
    pub fn name(&self) -> &str {
        match self {
            SecretType::EnvVar { name } => name,
        }
    }
}

/// Loading rules for a single secret
#[derive(Debug, Clone)]
pub struct SecretConfig {
    pub secret_type: SecretType,
    /// Minimum length of a supplied value (None = no minimum)
    pub min_length: Option<usize>,
    /// Value used when the source is absent. Never length-checked.
    pub fallback: &'static str,
}

impl SecretConfig {
    pub fn new(secret_type: SecretType, fallback: &'static str) -> Self {
        Self {
            secret_type,
            min_length: None,
            fallback,
        }
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }
}
