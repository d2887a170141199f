//! Immutable request descriptors handed to signature or token verification. 

use serde::{Deserialize, Serialize}; 
use starberry_lib::decode_form_owned; 

use super::params::{OAuthField, OAuthParams}; 
use crate::unpack::error::UnpackError; 

/// Which OAuth protocol a request was classified as. 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)] 
pub enum OAuthVersion {
    OAuth1, 
    OAuth2, 
} 

/// Request line details an OAuth 1.0a signature is computed over. 
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)] 
pub struct RequestMetadata {
    /// Upper-cased URI scheme, e.g. `HTTPS`. 
    pub scheme: String, 
    /// Upper-cased method, e.g. `POST`. 
    pub verb: String, 
    pub host: String, 
    pub port: u16, 
    pub path: String, 
} 

/// A signed OAuth 1.0a request. 
/// 
/// Values are kept exactly as they appeared on the wire (percent-encoded); 
/// only the surrounding quotes of header values are removed. 
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)] 
pub struct OAuth1Request {
    scheme: String, 
    verb: String, 
    host: String, 
    port: u16, 
    path: String, 
    params: Vec<(String, String)>, 
    consumer_key: String, 
    token: Option<String>, 
    signature_method: String, 
    signature: String, 
    timestamp: String, 
    nonce: String, 
    version: Option<String>, 
    callback: Option<String>, 
    verifier: Option<String>, 
} 

impl OAuth1Request {
    pub fn builder(meta: RequestMetadata) -> OAuth1RequestBuilder {
        OAuth1RequestBuilder::new(meta) 
    } 

    pub fn scheme(&self) -> &str { &self.scheme } 
    pub fn verb(&self) -> &str { &self.verb } 
    pub fn host(&self) -> &str { &self.host } 
    pub fn port(&self) -> u16 { self.port } 
    pub fn path(&self) -> &str { &self.path } 

    /// Non-OAuth parameters from the query string and form body. 
    pub fn params(&self) -> &[(String, String)] { &self.params } 

    pub fn consumer_key(&self) -> &str { &self.consumer_key } 
    pub fn token(&self) -> Option<&str> { self.token.as_deref() } 
    pub fn signature_method(&self) -> &str { &self.signature_method } 
    pub fn signature(&self) -> &str { &self.signature } 
    pub fn timestamp(&self) -> &str { &self.timestamp } 
    pub fn nonce(&self) -> &str { &self.nonce } 
    pub fn version(&self) -> Option<&str> { self.version.as_deref() } 
    pub fn callback(&self) -> Option<&str> { self.callback.as_deref() } 
    pub fn verifier(&self) -> Option<&str> { self.verifier.as_deref() } 

    /// Last value recorded for a non-OAuth parameter. 
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str()) 
    } 

    /// Non-OAuth parameters with keys and values form-decoded. 
    pub fn decoded_params(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (decode_form_owned(k), decode_form_owned(v)))
            .collect() 
    } 

    /// The OAuth fields that were present, as `(name, value)` pairs in 
    /// canonical order. 
    pub fn oauth_params(&self) -> Vec<(&'static str, &str)> {
        OAuthField::ALL
            .iter()
            .filter_map(|field| self.oauth_field(*field).map(|value| (field.as_str(), value)))
            .collect() 
    } 

    pub fn oauth_field(&self, field: OAuthField) -> Option<&str> {
        match field {
            OAuthField::ConsumerKey => Some(self.consumer_key.as_str()), 
            OAuthField::Token => self.token.as_deref(), 
            OAuthField::SignatureMethod => Some(self.signature_method.as_str()), 
            OAuthField::Signature => Some(self.signature.as_str()), 
            OAuthField::Timestamp => Some(self.timestamp.as_str()), 
            OAuthField::Nonce => Some(self.nonce.as_str()), 
            OAuthField::Version => self.version.as_deref(), 
            OAuthField::Callback => self.callback.as_deref(), 
            OAuthField::Verifier => self.verifier.as_deref(), 
        } 
    } 
} 

/// Assembles an [`OAuth1Request`] from request metadata and collected fields. 
#[derive(Debug, Clone)] 
pub struct OAuth1RequestBuilder {
    meta: RequestMetadata, 
    params: Vec<(String, String)>, 
    oauth: OAuthParams, 
} 

impl OAuth1RequestBuilder {
    pub fn new(meta: RequestMetadata) -> Self {
        Self { meta, params: Vec::new(), oauth: OAuthParams::new() } 
    } 

    /// Sets the non-OAuth parameters. 
    pub fn params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params; 
        self
    } 

    /// Sets the collected OAuth fields. 
    pub fn oauth(mut self, oauth: OAuthParams) -> Self {
        self.oauth = oauth; 
        self
    } 

    /// Fails with [`UnpackError::UnknownAuthType`] if a required OAuth 1.0a 
    /// field is missing. 
    pub fn build(self) -> Result<OAuth1Request, UnpackError> {
        let Self { meta, params, mut oauth } = self; 
        let mut required = |field| oauth.take(field).ok_or(UnpackError::UnknownAuthType); 
        let consumer_key = required(OAuthField::ConsumerKey)?; 
        let signature_method = required(OAuthField::SignatureMethod)?; 
        let signature = required(OAuthField::Signature)?; 
        let timestamp = required(OAuthField::Timestamp)?; 
        let nonce = required(OAuthField::Nonce)?; 
        Ok(OAuth1Request {
            scheme: meta.scheme, 
            verb: meta.verb, 
            host: meta.host, 
            port: meta.port, 
            path: meta.path, 
            params, 
            consumer_key, 
            token: oauth.take(OAuthField::Token), 
            signature_method, 
            signature, 
            timestamp, 
            nonce, 
            version: oauth.take(OAuthField::Version), 
            callback: oauth.take(OAuthField::Callback), 
            verifier: oauth.take(OAuthField::Verifier), 
        }) 
    } 
} 

/// An OAuth 2.0 bearer token request. 
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)] 
pub struct OAuth2Request {
    token: String, 
} 

impl OAuth2Request {
    pub fn new<T: Into<String>>(token: T) -> Self {
        Self { token: token.into() } 
    } 

    /// Builds from collected fields; fails with 
    /// [`UnpackError::UnknownAuthType`] unless the token is the only one set. 
    pub fn from_params(mut oauth: OAuthParams) -> Result<Self, UnpackError> {
        if !oauth.only_oauth_token_set() {
            return Err(UnpackError::UnknownAuthType); 
        } 
        oauth.take(OAuthField::Token).map(Self::new).ok_or(UnpackError::UnknownAuthType) 
    } 

    pub fn token(&self) -> &str {
        &self.token 
    } 
} 

/// Result of a successful unpack. 
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)] 
pub enum OAuthRequest {
    OAuth1(OAuth1Request), 
    OAuth2(OAuth2Request), 
} 

impl OAuthRequest {
    pub fn version(&self) -> OAuthVersion {
        match self {
            OAuthRequest::OAuth1(_) => OAuthVersion::OAuth1, 
            OAuthRequest::OAuth2(_) => OAuthVersion::OAuth2, 
        } 
    } 

    pub fn as_oauth1(&self) -> Option<&OAuth1Request> {
        match self {
            OAuthRequest::OAuth1(request) => Some(request), 
            OAuthRequest::OAuth2(_) => None, 
        } 
    } 

    pub fn as_oauth2(&self) -> Option<&OAuth2Request> {
        match self {
            OAuthRequest::OAuth2(request) => Some(request), 
            OAuthRequest::OAuth1(_) => None, 
        } 
    } 
} 

#[cfg(test)] 
mod tests {
    use super::*; 

    fn meta() -> RequestMetadata {
        RequestMetadata {
            scheme: "HTTP".into(), 
            verb: "GET".into(), 
            host: "photos.example.net".into(), 
            port: 80, 
            path: "/photos".into(), 
        } 
    } 

    fn complete() -> OAuthParams {
        let mut oauth = OAuthParams::new(); 
        oauth.set(OAuthField::ConsumerKey, "dpf43f3p2l4k3l03"); 
        oauth.set(OAuthField::SignatureMethod, "HMAC-SHA1"); 
        oauth.set(OAuthField::Signature, "tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D"); 
        oauth.set(OAuthField::Timestamp, "1191242096"); 
        oauth.set(OAuthField::Nonce, "kllo9940pd9333jh"); 
        oauth.set(OAuthField::Version, "1.0"); 
        oauth
    } 

    #[test]
    fn builder_fails_without_signature() {
        let mut oauth = complete(); 
        oauth.take(OAuthField::Signature); 
        let result = OAuth1Request::builder(meta()).oauth(oauth).build(); 
        assert!(matches!(result, Err(UnpackError::UnknownAuthType))); 
    }

    #[test]
    fn oauth_params_are_listed_in_canonical_order() {
        let request = OAuth1Request::builder(meta()).oauth(complete()).build().unwrap(); 
        let names: Vec<&str> = request.oauth_params().into_iter().map(|(name, _)| name).collect(); 
        assert_eq!(
            names, 
            vec![
                "oauth_consumer_key", 
                "oauth_signature_method", 
                "oauth_signature", 
                "oauth_timestamp", 
                "oauth_nonce", 
                "oauth_version", 
            ]
        ); 
        assert!(request.token().is_none()); 
    }

    #[test]
    fn params_are_decoded_on_request() {
        let request = OAuth1Request::builder(meta())
            .params(vec![("size".into(), "original".into()), ("file".into(), "vacation+2%2F3.jpg".into())])
            .oauth(complete())
            .build()
            .unwrap(); 
        assert_eq!(request.param("file"), Some("vacation+2%2F3.jpg")); 
        assert_eq!(request.decoded_params()[1], ("file".to_string(), "vacation 2/3.jpg".to_string())); 
    }

    #[test]
    fn oauth2_needs_a_lone_token() {
        let mut oauth = OAuthParams::new(); 
        assert!(OAuth2Request::from_params(oauth.clone()).is_err()); 
        oauth.set(OAuthField::Token, "abc123"); 
        assert_eq!(OAuth2Request::from_params(oauth).unwrap().token(), "abc123"); 
    }
}
