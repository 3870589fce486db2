pub type ViewlinkResult<T> = Result<T, ViewlinkError>;

#[derive(thiserror::Error, Debug)]
pub enum ViewlinkError {
    #[error("payload error: {0}")]
    Payload(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ViewlinkError {
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ViewlinkError::payload("x")
                .to_string()
                .contains("payload error:")
        );
        assert!(
            ViewlinkError::engine("x")
                .to_string()
                .contains("engine error:")
        );
        assert!(
            ViewlinkError::surface("x")
                .to_string()
                .contains("surface error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ViewlinkError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
