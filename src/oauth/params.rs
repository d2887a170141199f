//! Accumulator for OAuth fields gathered from every credential source of a 
//! single request. 

/// OAuth protocol parameters the accumulator understands. 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)] 
pub enum OAuthField {
    ConsumerKey, 
    Token, 
    SignatureMethod, 
    Signature, 
    Timestamp, 
    Nonce, 
    Version, 
    Callback, 
    Verifier, 
} 

impl OAuthField {
    /// Canonical order, used when listing fields. 
    pub const ALL: [OAuthField; 9] = [
        OAuthField::ConsumerKey, 
        OAuthField::Token, 
        OAuthField::SignatureMethod, 
        OAuthField::Signature, 
        OAuthField::Timestamp, 
        OAuthField::Nonce, 
        OAuthField::Version, 
        OAuthField::Callback, 
        OAuthField::Verifier, 
    ]; 

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthField::ConsumerKey => "oauth_consumer_key", 
            OAuthField::Token => "oauth_token", 
            OAuthField::SignatureMethod => "oauth_signature_method", 
            OAuthField::Signature => "oauth_signature", 
            OAuthField::Timestamp => "oauth_timestamp", 
            OAuthField::Nonce => "oauth_nonce", 
            OAuthField::Version => "oauth_version", 
            OAuthField::Callback => "oauth_callback", 
            OAuthField::Verifier => "oauth_verifier", 
        } 
    } 

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "oauth_consumer_key" => Some(OAuthField::ConsumerKey), 
            "oauth_token" => Some(OAuthField::Token), 
            "oauth_signature_method" => Some(OAuthField::SignatureMethod), 
            "oauth_signature" => Some(OAuthField::Signature), 
            "oauth_timestamp" => Some(OAuthField::Timestamp), 
            "oauth_nonce" => Some(OAuthField::Nonce), 
            "oauth_version" => Some(OAuthField::Version), 
            "oauth_callback" => Some(OAuthField::Callback), 
            "oauth_verifier" => Some(OAuthField::Verifier), 
            _ => None, 
        } 
    } 

    /// Fields that must all be present for an OAuth 1.0a signed request. 
    pub fn is_oauth1_required(&self) -> bool {
        matches!(
            self, 
            OAuthField::ConsumerKey
                | OAuthField::SignatureMethod
                | OAuthField::Signature
                | OAuthField::Timestamp
                | OAuthField::Nonce
        ) 
    } 
} 

impl std::fmt::Display for OAuthField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str()) 
    }
} 

/// What the collected fields amount to once every source has been read. 
#[derive(Debug, Clone, Copy, PartialEq, Eq)] 
pub enum AuthKind {
    OAuth1, 
    OAuth2, 
    Unknown, 
} 

/// Mutable record of OAuth fields. 
/// 
/// `token` doubles as the OAuth 1.0a token and the OAuth 2.0 access token: 
/// which one it is depends on what else was collected. 
#[derive(Debug, Clone, Default, PartialEq, Eq)] 
pub struct OAuthParams {
    consumer_key: Option<String>, 
    token: Option<String>, 
    signature_method: Option<String>, 
    signature: Option<String>, 
    timestamp: Option<String>, 
    nonce: Option<String>, 
    version: Option<String>, 
    callback: Option<String>, 
    verifier: Option<String>, 
} 

impl OAuthParams {
    pub fn new() -> Self {
        Self::default() 
    } 

    fn slot(&self, field: OAuthField) -> &Option<String> {
        match field {
            OAuthField::ConsumerKey => &self.consumer_key, 
            OAuthField::Token => &self.token, 
            OAuthField::SignatureMethod => &self.signature_method, 
            OAuthField::Signature => &self.signature, 
            OAuthField::Timestamp => &self.timestamp, 
            OAuthField::Nonce => &self.nonce, 
            OAuthField::Version => &self.version, 
            OAuthField::Callback => &self.callback, 
            OAuthField::Verifier => &self.verifier, 
        } 
    } 

    fn slot_mut(&mut self, field: OAuthField) -> &mut Option<String> {
        match field {
            OAuthField::ConsumerKey => &mut self.consumer_key, 
            OAuthField::Token => &mut self.token, 
            OAuthField::SignatureMethod => &mut self.signature_method, 
            OAuthField::Signature => &mut self.signature, 
            OAuthField::Timestamp => &mut self.timestamp, 
            OAuthField::Nonce => &mut self.nonce, 
            OAuthField::Version => &mut self.version, 
            OAuthField::Callback => &mut self.callback, 
            OAuthField::Verifier => &mut self.verifier, 
        } 
    } 

    /// Stores `value`, replacing anything previously stored for `field`. 
    pub fn set<V: Into<String>>(&mut self, field: OAuthField, value: V) {
        *self.slot_mut(field) = Some(value.into()); 
    } 

    pub fn get(&self, field: OAuthField) -> Option<&str> {
        self.slot(field).as_deref() 
    } 

    /// Moves a field out, leaving it unset. 
    pub fn take(&mut self, field: OAuthField) -> Option<String> {
        self.slot_mut(field).take() 
    } 

    pub fn is_set(&self, field: OAuthField) -> bool {
        self.slot(field).is_some() 
    } 

    pub fn consumer_key(&self) -> Option<&str> { self.get(OAuthField::ConsumerKey) } 
    pub fn token(&self) -> Option<&str> { self.get(OAuthField::Token) } 
    pub fn signature_method(&self) -> Option<&str> { self.get(OAuthField::SignatureMethod) } 
    pub fn signature(&self) -> Option<&str> { self.get(OAuthField::Signature) } 
    pub fn timestamp(&self) -> Option<&str> { self.get(OAuthField::Timestamp) } 
    pub fn nonce(&self) -> Option<&str> { self.get(OAuthField::Nonce) } 
    pub fn version(&self) -> Option<&str> { self.get(OAuthField::Version) } 
    pub fn callback(&self) -> Option<&str> { self.get(OAuthField::Callback) } 
    pub fn verifier(&self) -> Option<&str> { self.get(OAuthField::Verifier) } 

    /// Consumer key, signature method, signature, timestamp and nonce are all 
    /// present. The token is optional (two-legged requests omit it). 
    pub fn all_oauth1_fields_set(&self) -> bool {
        OAuthField::ALL
            .iter()
            .filter(|field| field.is_oauth1_required())
            .all(|field| self.is_set(*field)) 
    } 

    /// The token is present and nothing else is. 
    pub fn only_oauth_token_set(&self) -> bool {
        self.is_set(OAuthField::Token)
            && OAuthField::ALL
                .iter()
                .filter(|field| **field != OAuthField::Token)
                .all(|field| !self.is_set(*field)) 
    } 

    pub fn auth_kind(&self) -> AuthKind {
        if self.all_oauth1_fields_set() {
            AuthKind::OAuth1 
        } else if self.only_oauth_token_set() {
            AuthKind::OAuth2 
        } else {
            AuthKind::Unknown 
        } 
    } 
} 
