#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Cannot read {path}: {reason}")]
    Read { path: String, reason: String },
}
