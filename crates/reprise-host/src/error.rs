use thiserror::Error;

/// Input routing failures. Each names the target the way the caller did, so
/// a failing test prints the label it asked for.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host has no composed frame yet; call mount() first")]
    NotMounted,
    #[error("no widget labeled {0:?} in the current frame")]
    NoSuchTarget(String),
    #[error("widget {0:?} has no click handler")]
    NotClickable(String),
    #[error("widget {0:?} cannot take focus")]
    NotFocusable(String),
    #[error("no focused text field")]
    NoFocusedField,
}
