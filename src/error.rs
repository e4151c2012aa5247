use thiserror::Error;

pub type TwraResult<T> = Result<T, TwraError>;

#[derive(Error, Debug)]
pub enum TwraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid range reference: {0}")]
    InvalidRange(String),

    #[error("Range was supplied as text: {0}")]
    RangeAsText(String),

    #[error("No active sheet to fall back to")]
    NoActiveSheet,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Watch error: {0}")]
    Watch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TwraError::SheetNotFound("Molten Core".to_string());
        assert_eq!(err.to_string(), "Sheet not found: Molten Core");

        let err = TwraError::Decode("Invalid byte 33, offset 0.".to_string());
        assert!(err.to_string().starts_with("Decode error:"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.xlsx");
        let err: TwraError = io.into();
        assert!(matches!(err, TwraError::Io(_)));
        assert!(err.to_string().contains("missing.xlsx"));
    }
}
