pub mod params; 
pub mod request; 

pub use params::{AuthKind, OAuthField, OAuthParams}; 
pub use request::{OAuth1Request, OAuth1RequestBuilder, OAuth2Request, OAuthRequest, OAuthVersion, RequestMetadata}; 
