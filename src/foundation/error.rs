pub type TextgenResult<T> = Result<T, TextgenError>;

#[derive(thiserror::Error, Debug)]
pub enum TextgenError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A required external resource is missing or misconfigured. Never isolated by the pipeline.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("effect error: {0}")]
    Effect(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TextgenError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn effect(msg: impl Into<String>) -> Self {
        Self::Effect(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
