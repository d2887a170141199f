//! Key-value tokenizing and the handlers that route each pair. 

pub mod handler; 
pub mod parser; 

pub use handler::{
    DuplicateKeyValueHandler, FnKeyValueHandler, KeyValueHandler, NotOAuthKeyValueHandler,
    OAuth2HeaderHandler, OAuthKeyValueHandler, QuotedValueHandler, handler_fn,
}; 
pub use parser::{ConstKeyValueParser, DelimitedKeyValueParser, KeyValueParser}; 
