pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid markup: {0}")]
    Markup(#[from] roxmltree::Error),

    #[error("Invalid sanitizer options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("Malformed document tree at node {node}: {message}")]
    Integrity { node: usize, message: String },
}
