//! OAuth credential unpacking for starberry. 
//! 
//! Reads the query string, a form-encoded POST body and the `Authorization` 
//! header of a request, merges the parameters they carry, and decides whether 
//! the request is an OAuth 1.0a signed request or an OAuth 2.0 bearer token 
//! request. Verification of either is left to the caller. 
//! 
//! ```
//! use starberry_oauth_unpack::{BufferedRequest, OAuthRequest, UnpackConfig, Unpacker}; 
//! 
//! let unpacker = Unpacker::new(UnpackConfig::new()).unwrap(); 
//! let mut request = BufferedRequest::get("/me")
//!     .with_scheme("https")
//!     .with_header("Authorization", "Bearer abc123"); 
//! match unpacker.unpack(&mut request, &mut []).unwrap() {
//!     OAuthRequest::OAuth2(oauth2) => assert_eq!(oauth2.token(), "abc123"), 
//!     OAuthRequest::OAuth1(_) => unreachable!(), 
//! } 
//! ```

pub mod kv; 
pub mod oauth; 
pub mod unpack; 

pub use kv::{KeyValueHandler, KeyValueParser, handler_fn}; 
pub use oauth::{OAuth1Request, OAuth2Request, OAuthParams, OAuthRequest, OAuthVersion}; 
pub use unpack::{BufferedRequest, DuplicatePolicy, RequestMeta, SchemeSource, UnpackConfig, UnpackError, UnpackRequest, Unpacker}; 
