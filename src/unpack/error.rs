use std::error::Error; 
use std::fmt; 
use std::io; 

/// Why an unpack call produced no descriptor. 
#[derive(Debug)] 
pub enum UnpackError {
    /// Neither a complete OAuth 1.0a field set nor a lone OAuth 2.0 token 
    /// was found. 
    UnknownAuthType, 
    /// The request is recognizable but not acceptable, e.g. a bearer token 
    /// over plain HTTP or a body longer than declared. 
    MalformedRequest(String), 
    /// Anything else, with the original cause attached. 
    Failed(Box<dyn Error + Send + Sync>), 
} 

impl UnpackError {
    pub fn malformed<T: Into<String>>(reason: T) -> Self {
        Self::MalformedRequest(reason.into()) 
    } 

    /// HTTP status a server would answer with. 
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownAuthType => 401, 
            Self::MalformedRequest(_) => 400, 
            Self::Failed(_) => 500, 
        } 
    } 

    /// Error code in the style of RFC 6750 section 3.1. 
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAuthType => "invalid_token", 
            Self::MalformedRequest(_) => "invalid_request", 
            Self::Failed(_) => "server_error", 
        } 
    } 
} 

impl fmt::Display for UnpackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAuthType => write!(f, "Unknown or incomplete OAuth credentials"), 
            Self::MalformedRequest(reason) => write!(f, "Malformed OAuth request: {}", reason), 
            Self::Failed(err) => write!(f, "Failed to unpack OAuth request: {}", err), 
        } 
    } 
} 

impl Error for UnpackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Failed(err) => Some(&**err), 
            _ => None, 
        } 
    } 
} 

impl From<io::Error> for UnpackError {
    fn from(err: io::Error) -> Self {
        Self::Failed(Box::new(err)) 
    } 
} 

impl From<regex::Error> for UnpackError {
    fn from(err: regex::Error) -> Self {
        Self::Failed(Box::new(err)) 
    } 
} 

pub type Result<T> = std::result::Result<T, UnpackError>; 

#[cfg(test)] 
mod tests {
    use super::*; 

    #[test]
    fn io_errors_keep_their_cause() {
        let err: UnpackError = io::Error::new(io::ErrorKind::UnexpectedEof, "short body").into(); 
        assert_eq!(err.status_code(), 500); 
        assert_eq!(err.source().map(|cause| cause.to_string()), Some("short body".to_string())); 
        assert!(err.to_string().contains("short body")); 
    }

    #[test]
    fn codes_per_kind() {
        assert_eq!(UnpackError::UnknownAuthType.error_code(), "invalid_token"); 
        assert_eq!(UnpackError::malformed("plain http").status_code(), 400); 
        assert!(UnpackError::UnknownAuthType.source().is_none()); 
    }
}
