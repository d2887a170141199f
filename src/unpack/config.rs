use once_cell::sync::Lazy; 

use super::source::RequestMeta; 
use crate::kv::handler::fold_last_wins; 

// Defaults used when a parameter is left unset
const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;      // 1 MB
const DEFAULT_REQUIRE_HTTPS_FOR_OAUTH2: bool = true; 

static DEFAULT_OAUTH2_SCHEMES: Lazy<Vec<String>> =
    Lazy::new(|| vec!["bearer".to_string(), "oauth2".to_string()]); 

/// How repeated non-OAuth parameter keys end up in an OAuth 1.0a descriptor. 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)] 
pub enum DuplicatePolicy {
    /// One entry per key, at the key's first position, with its last value. 
    #[default]
    LastWins, 
    /// Every occurrence, in arrival order. 
    KeepAll, 
} 

impl DuplicatePolicy {
    pub fn apply(&self, pairs: Vec<(String, String)>) -> Vec<(String, String)> {
        match self {
            DuplicatePolicy::LastWins => fold_last_wins(pairs), 
            DuplicatePolicy::KeepAll => pairs, 
        } 
    } 
} 

/// Where the request scheme is read from. 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)] 
pub enum SchemeSource {
    /// The scheme the server saw. 
    #[default]
    Request, 
    /// First entry of `X-Forwarded-Proto`, falling back to the request 
    /// scheme. Only for deployments behind a trusted TLS terminating proxy. 
    ForwardedProto, 
} 

impl SchemeSource {
    pub fn resolve<M: RequestMeta + ?Sized>(&self, request: &M) -> String {
        match self {
            SchemeSource::Request => request.scheme().to_string(), 
            SchemeSource::ForwardedProto => request
                .header("x-forwarded-proto")
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|proto| !proto.is_empty())
                .unwrap_or(request.scheme())
                .to_string(), 
        } 
    } 
} 

/// Unpacker settings. 
/// 
/// Every value may be left unset, in which case the effective accessor 
/// returns the default. 
#[derive(Debug, Clone, Default)] 
pub struct UnpackConfig {
    /// Largest form body that will be read (None = use default) 
    max_body_size: Option<usize>, 

    /// Lower-case Authorization schemes treated as OAuth 2.0 (None = bearer, oauth2) 
    oauth2_schemes: Option<Vec<String>>, 

    /// Reject OAuth 2.0 tokens over plain HTTP (None = true) 
    require_https_for_oauth2: Option<bool>, 

    duplicate_policy: DuplicatePolicy, 

    scheme_source: SchemeSource, 
} 

impl UnpackConfig {
    /// Creates a config with every parameter unset. 
    /// 
    /// # Examples
    /// ```
    /// use starberry_oauth_unpack::UnpackConfig; 
    /// let config = UnpackConfig::new(); 
    /// assert!(config.max_body_size().is_none()); 
    /// assert_eq!(config.effective_max_body_size(), 1024 * 1024); 
    /// ```
    pub fn new() -> Self {
        Self::default() 
    } 

    // --------------------------------------------------
    // Body Size
    // --------------------------------------------------

    pub fn max_body_size(&self) -> Option<usize> {
        self.max_body_size 
    } 

    pub fn set_max_body_size(&mut self, size: Option<usize>) {
        self.max_body_size = size; 
    } 

    pub fn effective_max_body_size(&self) -> usize {
        self.max_body_size.unwrap_or(DEFAULT_MAX_BODY_SIZE) 
    } 

    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = Some(size); 
        self
    } 

    // --------------------------------------------------
    // OAuth 2.0 Schemes
    // --------------------------------------------------

    /// Effective list of OAuth 2.0 Authorization schemes. 
    pub fn oauth2_schemes(&self) -> &[String] {
        match &self.oauth2_schemes {
            Some(schemes) => schemes.as_slice(), 
            None => DEFAULT_OAUTH2_SCHEMES.as_slice(), 
        } 
    } 

    pub fn set_oauth2_schemes(&mut self, schemes: Option<Vec<String>>) {
        self.oauth2_schemes = schemes.map(|list| list.into_iter().map(|s| s.to_ascii_lowercase()).collect()); 
    } 

    pub fn with_oauth2_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>, 
        S: Into<String>, 
    {
        self.set_oauth2_schemes(Some(schemes.into_iter().map(Into::into).collect())); 
        self
    } 

    /// Case-insensitive membership check. 
    pub fn is_oauth2_scheme(&self, scheme: &str) -> bool {
        self.oauth2_schemes().iter().any(|known| known.eq_ignore_ascii_case(scheme)) 
    } 

    // --------------------------------------------------
    // Transport
    // --------------------------------------------------

    pub fn require_https_for_oauth2(&self) -> bool {
        self.require_https_for_oauth2.unwrap_or(DEFAULT_REQUIRE_HTTPS_FOR_OAUTH2) 
    } 

    pub fn set_require_https_for_oauth2(&mut self, require: Option<bool>) {
        self.require_https_for_oauth2 = require; 
    } 

    pub fn with_require_https_for_oauth2(mut self, require: bool) -> Self {
        self.require_https_for_oauth2 = Some(require); 
        self
    } 

    pub fn scheme_source(&self) -> SchemeSource {
        self.scheme_source 
    } 

    pub fn with_scheme_source(mut self, source: SchemeSource) -> Self {
        self.scheme_source = source; 
        self
    } 

    // --------------------------------------------------
    // Parameters
    // --------------------------------------------------

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy 
    } 

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy; 
        self
    } 
} 
