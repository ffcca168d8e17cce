#[derive(Debug)]
pub enum ClientError {
    Io(std::io::Error),
    Config(String),
    Launch(String),
    Terminal(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Config(m) => write!(f, "invalid configuration: {m}"),
            Self::Launch(m) => write!(f, "launch failed: {m}"),
            Self::Terminal(m) => write!(f, "terminal error: {m}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        let err = ClientError::Config("fps must be > 0".to_string());
        assert_eq!(err.to_string(), "invalid configuration: fps must be > 0");
        let io: ClientError = std::io::Error::other("boom").into();
        assert!(matches!(io, ClientError::Io(_)));
        assert!(std::error::Error::source(&io).is_some());
    }
}
