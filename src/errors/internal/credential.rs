use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    /// The stored digest is not a parseable PHC string
    #[error("Stored password digest is malformed: {0}")]
    MalformedDigest(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
