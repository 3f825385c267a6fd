use crate::attr::Category;
use crate::scope::ScopeKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "{attribute} is a {category} attribute and is only valid on the outermost scope (found at depth {depth})"
    )]
    Placement {
        attribute: &'static str,
        category: Category,
        depth: usize,
    },

    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarViolation),

    #[error("the outermost scope has no Paper attribute to establish a drawing surface")]
    MissingBootstrap,

    #[error("scope #{found} exited out of LIFO order (innermost open scope: {innermost:?})")]
    ScopeOrdering { found: u64, innermost: Option<u64> },

    #[error("invalid color: {spec:?}")]
    InvalidColor { spec: String },

    #[error("invalid paper: {message}")]
    InvalidPaper { message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarViolation {
    #[error("`{action}` is not allowed directly inside a `with` scope")]
    ActionInWith { action: &'static str },

    #[error("a `{inner}` scope cannot be nested inside a `{outer}` scope")]
    ScopeInsidePath { outer: ScopeKind, inner: ScopeKind },
}

/// Failures reported by a rendering engine or backend.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("graphics state restored more times than it was saved")]
    StateUnderflow,

    #[error("unsupported output format: {0:?}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}
