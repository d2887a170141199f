//! Single purpose key-value handlers. 
//! 
//! Wrapping handlers own their inner handler by value, so a pipeline is a 
//! concrete nested type built once per request, e.g. 
//! `QuotedValueHandler<OAuthKeyValueHandler<'_>>`. Only caller-supplied 
//! handlers go through `dyn`. 

use starberry_lib::is_b64token; 
use tracing::{debug, trace}; 

use crate::oauth::params::{OAuthField, OAuthParams}; 

/// Prefix reserved for OAuth protocol parameters. 
pub const OAUTH_PREFIX: &str = "oauth_"; 

/// Observes one key/value pair at a time. 
pub trait KeyValueHandler {
    fn handle(&mut self, key: &str, value: &str); 
} 

impl<H: KeyValueHandler + ?Sized> KeyValueHandler for &mut H {
    fn handle(&mut self, key: &str, value: &str) {
        (**self).handle(key, value) 
    } 
} 

impl<H: KeyValueHandler + ?Sized> KeyValueHandler for Box<H> {
    fn handle(&mut self, key: &str, value: &str) {
        (**self).handle(key, value) 
    } 
} 

/// Adapts a closure into a [`KeyValueHandler`]. 
pub struct FnKeyValueHandler<F>(F); 

impl<F: FnMut(&str, &str)> KeyValueHandler for FnKeyValueHandler<F> {
    fn handle(&mut self, key: &str, value: &str) {
        (self.0)(key, value) 
    } 
} 

/// Shorthand for [`FnKeyValueHandler`]. 
/// 
/// ```
/// use starberry_oauth_unpack::kv::{handler_fn, KeyValueHandler}; 
/// let mut seen = Vec::new(); 
/// let mut handler = handler_fn(|k: &str, v: &str| seen.push(format!("{k}={v}"))); 
/// handler.handle("a", "1"); 
/// drop(handler); 
/// assert_eq!(seen, vec!["a=1"]); 
/// ```
pub fn handler_fn<F: FnMut(&str, &str)>(f: F) -> FnKeyValueHandler<F> {
    FnKeyValueHandler(f) 
} 

/// Records every pair it sees, in arrival order. Repeated keys are kept; 
/// folding them is left to whoever reads the pairs. 
#[derive(Debug, Clone, Default)] 
pub struct DuplicateKeyValueHandler {
    pairs: Vec<(String, String)>, 
} 

impl DuplicateKeyValueHandler {
    pub fn new() -> Self {
        Self { pairs: Vec::new() } 
    } 

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs 
    } 

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs 
    } 
} 

impl KeyValueHandler for DuplicateKeyValueHandler {
    fn handle(&mut self, key: &str, value: &str) {
        self.pairs.push((key.to_string(), value.to_string())); 
    } 
} 

/// Folds repeated keys down to one entry each. The entry stays where the key 
/// first appeared and carries the value of its last appearance. 
pub fn fold_last_wins(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut folded: Vec<(String, String)> = Vec::with_capacity(pairs.len()); 
    for (key, value) in pairs {
        match folded.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value, 
            None => folded.push((key, value)), 
        } 
    } 
    folded 
} 

/// Forwards only pairs whose key is not reserved for OAuth. 
#[derive(Debug)] 
pub struct NotOAuthKeyValueHandler<H> {
    inner: H, 
} 

impl<H: KeyValueHandler> NotOAuthKeyValueHandler<H> {
    pub fn new(inner: H) -> Self {
        Self { inner } 
    } 
} 

impl<H: KeyValueHandler> KeyValueHandler for NotOAuthKeyValueHandler<H> {
    fn handle(&mut self, key: &str, value: &str) {
        if !key.starts_with(OAUTH_PREFIX) {
            self.inner.handle(key, value); 
        } 
    } 
} 

/// Writes recognized `oauth_*` pairs into an [`OAuthParams`]. Later writes 
/// to the same field replace earlier ones; unknown keys are ignored. 
#[derive(Debug)] 
pub struct OAuthKeyValueHandler<'a> {
    params: &'a mut OAuthParams, 
} 

impl<'a> OAuthKeyValueHandler<'a> {
    pub fn new(params: &'a mut OAuthParams) -> Self {
        Self { params } 
    } 
} 

impl KeyValueHandler for OAuthKeyValueHandler<'_> {
    fn handle(&mut self, key: &str, value: &str) {
        match OAuthField::from_key(key) {
            Some(field) => self.params.set(field, value.trim()), 
            None if key.starts_with(OAUTH_PREFIX) => trace!(key, "Ignoring unrecognized OAuth parameter"), 
            None => {} 
        } 
    } 
} 

/// Removes one pair of surrounding double quotes from the value, if both 
/// are present, before forwarding. 
#[derive(Debug)] 
pub struct QuotedValueHandler<H> {
    inner: H, 
} 

impl<H: KeyValueHandler> QuotedValueHandler<H> {
    pub fn new(inner: H) -> Self {
        Self { inner } 
    } 
} 

/// `"abc"` becomes `abc`; `"abc` and `abc` are left alone. 
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value) 
} 

impl<H: KeyValueHandler> KeyValueHandler for QuotedValueHandler<H> {
    fn handle(&mut self, key: &str, value: &str) {
        self.inner.handle(key, unquote(value)); 
    } 
} 

/// Turns the credential of an `Authorization: Bearer <token>` header into an 
/// `oauth_token` write on the inner handler. 
/// 
/// The token arrives as the key of a bare pair. Values that are not a valid 
/// RFC 6750 `b64token` are dropped. 
#[derive(Debug)] 
pub struct OAuth2HeaderHandler<H> {
    inner: H, 
} 

impl<H: KeyValueHandler> OAuth2HeaderHandler<H> {
    pub fn new(inner: H) -> Self {
        Self { inner } 
    } 
} 

impl<H: KeyValueHandler> KeyValueHandler for OAuth2HeaderHandler<H> {
    fn handle(&mut self, key: &str, value: &str) {
        let token = key.trim(); 
        if !value.is_empty() || !is_b64token(token) {
            debug!("Dropping bearer credential that is not a b64token"); 
            return; 
        } 
        self.inner.handle(OAuthField::Token.as_str(), token); 
    } 
} 

#[cfg(test)] 
mod tests {
    use super::*; 

    #[test]
    fn not_oauth_filter_drops_reserved_keys() {
        let mut collected = DuplicateKeyValueHandler::new(); 
        {
            let mut filter = NotOAuthKeyValueHandler::new(&mut collected); 
            filter.handle("oauth_token", "tk"); 
            filter.handle("oauth_whatever", "x"); 
            filter.handle("status", "hello"); 
            filter.handle("oauth", "kept"); 
        } 
        assert_eq!(
            collected.pairs(), 
            &[("status".to_string(), "hello".to_string()), ("oauth".to_string(), "kept".to_string())]
        ); 
    }

    #[test]
    fn oauth_collector_keeps_last_value() {
        let mut params = OAuthParams::new(); 
        let mut collector = OAuthKeyValueHandler::new(&mut params); 
        collector.handle("oauth_nonce", "first"); 
        collector.handle("oauth_nonce", " second "); 
        collector.handle("oauth_unknown", "x"); 
        collector.handle("status", "y"); 
        assert_eq!(params.nonce(), Some("second")); 
        assert!(params.consumer_key().is_none()); 
    }

    #[test]
    fn quotes_are_stripped_once() {
        assert_eq!(unquote("\"tk2\""), "tk2"); 
        assert_eq!(unquote("\"\"x\"\""), "\"x\""); 
        assert_eq!(unquote("\"open"), "\"open"); 
        assert_eq!(unquote("plain"), "plain"); 
        assert_eq!(unquote("\""), "\""); 
    }

    #[test]
    fn quoted_handler_forwards_unquoted_value() {
        let mut params = OAuthParams::new(); 
        let mut handler = QuotedValueHandler::new(OAuthKeyValueHandler::new(&mut params)); 
        handler.handle("oauth_signature", "\"x%3D\""); 
        assert_eq!(params.signature(), Some("x%3D")); 
    }

    #[test]
    fn bearer_adapter_writes_token() {
        let mut params = OAuthParams::new(); 
        let mut handler = OAuth2HeaderHandler::new(OAuthKeyValueHandler::new(&mut params)); 
        handler.handle("abc123==", ""); 
        assert_eq!(params.token(), Some("abc123==")); 
    }

    #[test]
    fn bearer_adapter_rejects_non_token_values() {
        let mut params = OAuthParams::new(); 
        let mut handler = OAuth2HeaderHandler::new(OAuthKeyValueHandler::new(&mut params)); 
        handler.handle("abc def", ""); 
        handler.handle("k", "v"); 
        assert!(params.token().is_none()); 
    }

    #[test]
    fn fold_keeps_first_position_and_last_value() {
        let folded = fold_last_wins(vec![
            ("a".into(), "1".into()), 
            ("b".into(), "2".into()), 
            ("a".into(), "3".into()), 
        ]); 
        assert_eq!(folded, vec![("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]); 
    }

    #[test]
    fn closures_can_be_handlers() {
        let mut count = 0; 
        {
            let mut handler = handler_fn(|_: &str, _: &str| count += 1); 
            handler.handle("a", "1"); 
            handler.handle("b", "2"); 
        } 
        assert_eq!(count, 2); 
    }
}
