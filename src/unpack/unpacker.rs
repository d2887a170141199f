//! Turns the credential material of one request into an [`OAuthRequest`]. 
//! 
//! Three sources are consulted in order: the query string, a form-encoded 
//! POST body, then the `Authorization` header. Each pair from the first two 
//! goes through the same fixed pipeline: 
//! 
//! 1. `NotOAuthKeyValueHandler<DuplicateKeyValueHandler>` collects plain params 
//! 2. `OAuthKeyValueHandler` fills the [`OAuthParams`] accumulator 
//! 3. caller handlers, each behind a `NotOAuthKeyValueHandler` 
//! 
//! The header only ever feeds the accumulator. 

use std::io::Read; 

use regex::Regex; 
use tokio::io::{AsyncRead, AsyncReadExt}; 
use tracing::{debug, warn}; 

use super::config::UnpackConfig; 
use super::error::{Result, UnpackError}; 
use super::source::{RequestMeta, UnpackRequest}; 
use crate::kv::handler::{
    DuplicateKeyValueHandler, KeyValueHandler, NotOAuthKeyValueHandler, OAuth2HeaderHandler,
    OAuthKeyValueHandler, QuotedValueHandler,
}; 
use crate::kv::parser::{ConstKeyValueParser, DelimitedKeyValueParser, KeyValueParser}; 
use crate::oauth::params::{AuthKind, OAuthParams}; 
use crate::oauth::request::{OAuth1Request, OAuth2Request, OAuthRequest, RequestMetadata}; 

pub const AUTHORIZATION: &str = "authorization"; 
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded"; 
const OAUTH1_SCHEME: &str = "oauth"; 

/// `<scheme-token> <whitespace> <rest>` 
const AUTHORIZATION_PATTERN: &str = r"^\s*(\S+)\s+(.*?)\s*$"; 

/// Stateless between calls; one instance can serve any number of requests 
/// from any number of threads. 
pub struct Unpacker {
    config: UnpackConfig, 
    query_parser: Box<dyn KeyValueParser>, 
    header_parser: Box<dyn KeyValueParser>, 
    authorization: Regex, 
} 

impl Unpacker {
    /// Builds an unpacker with the standard query and header grammars. 
    pub fn new(config: UnpackConfig) -> Result<Self> {
        Self::with_parsers(
            config, 
            Box::new(DelimitedKeyValueParser::query()?), 
            Box::new(DelimitedKeyValueParser::header()?), 
        ) 
    } 

    /// Builds an unpacker with caller-chosen tokenizers for the query/body 
    /// sources and for the `OAuth` header parameter list. 
    pub fn with_parsers(
        config: UnpackConfig, 
        query_parser: Box<dyn KeyValueParser>, 
        header_parser: Box<dyn KeyValueParser>, 
    ) -> Result<Self> {
        Ok(Self {
            config, 
            query_parser, 
            header_parser, 
            authorization: Regex::new(AUTHORIZATION_PATTERN)?, 
        }) 
    } 

    pub fn config(&self) -> &UnpackConfig {
        &self.config 
    } 

    /// Unpacks a request whose body is readable synchronously. 
    /// 
    /// `handlers` observe every non-OAuth pair of the query string and form 
    /// body. The body is read in full before anything is tokenized, so a 
    /// body failure leaves the handlers untouched. 
    pub fn unpack(
        &self, 
        request: &mut dyn UnpackRequest, 
        handlers: &mut [&mut dyn KeyValueHandler], 
    ) -> Result<OAuthRequest> {
        let outcome = self
            .read_form_body(request)
            .and_then(|body| self.unpack_parts(&*request, body.as_deref(), handlers)); 
        log_failure(outcome) 
    } 

    /// Same as [`Unpacker::unpack`], with the body taken from an async stream 
    /// that yields the request body only. 
    pub async fn unpack_async<R: AsyncRead + Unpin>(
        &self, 
        request: &dyn RequestMeta, 
        body: &mut R, 
        handlers: &mut [&mut dyn KeyValueHandler], 
    ) -> Result<OAuthRequest> {
        let outcome = match self.read_form_body_async(request, body).await {
            Ok(body) => self.unpack_parts(request, body.as_deref(), handlers), 
            Err(err) => Err(err), 
        }; 
        log_failure(outcome) 
    } 

    fn is_form_post<M: RequestMeta + ?Sized>(&self, request: &M) -> bool {
        request.method().eq_ignore_ascii_case("POST")
            && request.content_type().is_some_and(|content_type| {
                content_type
                    .get(..FORM_CONTENT_TYPE.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(FORM_CONTENT_TYPE))
            }) 
    } 

    /// How many bytes may be read: declared length, or the configured maximum 
    /// when nothing was declared. 
    fn body_limit(&self, declared: Option<usize>) -> Result<usize> {
        let max = self.config.effective_max_body_size(); 
        match declared {
            Some(length) if length > max => Err(UnpackError::malformed(format!(
                "declared content length {} exceeds the limit of {} bytes", 
                length, max
            ))), 
            Some(length) => Ok(length), 
            None => Ok(max), 
        } 
    } 

    /// Checks the number of bytes read against the limit. One byte past the 
    /// limit is attempted, so `read > limit` means the stream is longer. At 
    /// a saturated cap no buffer can outgrow the limit. 
    fn check_body(&self, declared: Option<usize>, limit: usize, buffer: Vec<u8>) -> Result<String> {
        if buffer.len() > limit {
            return Err(UnpackError::malformed(match declared {
                Some(length) => format!("body is longer than the declared content length of {} bytes", length), 
                None => format!("body exceeds the limit of {} bytes", limit), 
            })); 
        } 
        if let Some(length) = declared {
            if buffer.len() < length {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof, 
                    format!("body ended after {} of {} declared bytes", buffer.len(), length), 
                )
                .into()); 
            } 
        } 
        Ok(String::from_utf8_lossy(&buffer).into_owned()) 
    } 

    fn read_form_body(&self, request: &mut dyn UnpackRequest) -> Result<Option<String>> {
        if !self.is_form_post(&*request) {
            return Ok(None); 
        } 
        let declared = request.content_length(); 
        let limit = self.body_limit(declared)?; 
        let mut buffer = Vec::with_capacity(limit.min(8 * 1024)); 
        request.body().take(read_cap(limit)).read_to_end(&mut buffer)?; 
        self.check_body(declared, limit, buffer).map(Some) 
    } 

    async fn read_form_body_async<R: AsyncRead + Unpin>(
        &self, 
        request: &dyn RequestMeta, 
        body: &mut R, 
    ) -> Result<Option<String>> {
        if !self.is_form_post(request) {
            return Ok(None); 
        } 
        let declared = request.content_length(); 
        let limit = self.body_limit(declared)?; 
        let mut buffer = Vec::with_capacity(limit.min(8 * 1024)); 
        body.take(read_cap(limit)).read_to_end(&mut buffer).await?; 
        self.check_body(declared, limit, buffer).map(Some) 
    } 

    /// Runs the tokenizers over every source and classifies the result. 
    fn unpack_parts<M: RequestMeta + ?Sized>(
        &self, 
        request: &M, 
        body: Option<&str>, 
        handlers: &mut [&mut dyn KeyValueHandler], 
    ) -> Result<OAuthRequest> {
        let mut oauth = OAuthParams::new(); 
        let mut collected = DuplicateKeyValueHandler::new(); 
        {
            let mut plain = NotOAuthKeyValueHandler::new(&mut collected); 
            let mut collector = OAuthKeyValueHandler::new(&mut oauth); 
            let mut callers: Vec<_> = handlers
                .iter_mut()
                .map(|handler| NotOAuthKeyValueHandler::new(&mut **handler))
                .collect(); 
            let mut chain: Vec<&mut dyn KeyValueHandler> = Vec::with_capacity(2 + callers.len()); 
            chain.push(&mut plain); 
            chain.push(&mut collector); 
            for caller in callers.iter_mut() {
                chain.push(caller); 
            } 

            if let Some(query) = request.query_string() {
                debug!(source = "query", length = query.len(), "Parsing credential source"); 
                self.query_parser.parse(query, &mut chain); 
            } 
            if let Some(body) = body {
                debug!(source = "body", length = body.len(), "Parsing credential source"); 
                self.query_parser.parse(body, &mut chain); 
            } 
        } 
        if let Some(header) = request.header(AUTHORIZATION) {
            self.parse_authorization(header, &mut oauth); 
        } 
        self.build(request, collected.into_pairs(), oauth) 
    } 

    /// Dispatches on the Authorization scheme. Unknown schemes and values 
    /// without a `scheme rest` shape are ignored. 
    fn parse_authorization(&self, header: &str, oauth: &mut OAuthParams) {
        let Some(captures) = self.authorization.captures(header) else {
            debug!("Ignoring Authorization header without credentials"); 
            return; 
        }; 
        let (Some(scheme), Some(rest)) = (captures.get(1), captures.get(2)) else {
            return; 
        }; 
        let scheme = scheme.as_str().to_ascii_lowercase(); 
        let rest = rest.as_str(); 

        if scheme == OAUTH1_SCHEME {
            debug!(source = "header", scheme = %scheme, "Parsing credential source"); 
            let mut handler = QuotedValueHandler::new(OAuthKeyValueHandler::new(oauth)); 
            self.header_parser.parse(rest, &mut [&mut handler]); 
        } else if self.config.is_oauth2_scheme(&scheme) {
            debug!(source = "header", scheme = %scheme, "Parsing credential source"); 
            // A b64token may end in '=', so the credential skips the key=value grammar.
            let mut handler = OAuth2HeaderHandler::new(OAuthKeyValueHandler::new(oauth)); 
            ConstKeyValueParser::new(rest, "").parse(rest, &mut [&mut handler]); 
        } else {
            debug!(scheme = %scheme, "Ignoring Authorization header with unrelated scheme"); 
        } 
    } 

    fn build<M: RequestMeta + ?Sized>(
        &self, 
        request: &M, 
        params: Vec<(String, String)>, 
        oauth: OAuthParams, 
    ) -> Result<OAuthRequest> {
        let kind = oauth.auth_kind(); 
        debug!(kind = ?kind, "Classified OAuth credentials"); 
        let scheme = self.config.scheme_source().resolve(request); 
        match kind {
            AuthKind::OAuth1 => {
                let meta = RequestMetadata {
                    scheme: scheme.to_ascii_uppercase(), 
                    verb: request.method().to_ascii_uppercase(), 
                    host: request.server_name().to_string(), 
                    port: request.server_port(), 
                    path: request.path().to_string(), 
                }; 
                OAuth1Request::builder(meta)
                    .params(self.config.duplicate_policy().apply(params))
                    .oauth(oauth)
                    .build()
                    .map(OAuthRequest::OAuth1) 
            } 
            AuthKind::OAuth2 => {
                if self.config.require_https_for_oauth2() && !scheme.eq_ignore_ascii_case("https") {
                    return Err(UnpackError::malformed(format!(
                        "OAuth 2.0 token sent over {}, HTTPS is required", 
                        scheme
                    ))); 
                } 
                OAuth2Request::from_params(oauth).map(OAuthRequest::OAuth2) 
            } 
            AuthKind::Unknown => Err(UnpackError::UnknownAuthType), 
        } 
    } 
} 

/// One byte past `limit`, saturating when the limit already covers every 
/// length a buffer can hold. 
fn read_cap(limit: usize) -> u64 {
    (limit as u64).saturating_add(1) 
} 

fn log_failure(outcome: Result<OAuthRequest>) -> Result<OAuthRequest> {
    if let Err(err) = &outcome {
        warn!(error = ?err, error_code = err.error_code(), http_status = err.status_code(), "OAuth unpack failed"); 
    } 
    outcome 
} 
