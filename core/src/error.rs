use thiserror::Error;

#[derive(Debug, Error)]
pub enum LetterfallError {
    /// The font has not finished loading yet.
    #[error("font not ready")]
    FontNotReady,
    /// The font failed to load; lettering stays disabled for the session.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),
    #[error("invalid font data: {0}")]
    FontParse(#[from] ttf_parser::FaceParsingError),
    #[error("text tessellation failed: {0:?}")]
    Tessellation(lyon::tessellation::TessellationError),
}

impl From<lyon::tessellation::TessellationError> for LetterfallError {
    fn from(err: lyon::tessellation::TessellationError) -> Self {
        Self::Tessellation(err)
    }
}
