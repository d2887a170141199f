//! What the unpacker needs to know about an incoming request. 

use std::collections::HashMap; 
use std::io::{Cursor, Read}; 

/// Read-only view of a request's metadata. 
pub trait RequestMeta {
    /// URI scheme as received, e.g. `http` or `https`. Compared 
    /// case-insensitively. 
    fn scheme(&self) -> &str; 
    fn method(&self) -> &str; 
    fn server_name(&self) -> &str; 
    fn server_port(&self) -> u16; 
    fn path(&self) -> &str; 
    /// Raw query string without the leading `?`. 
    fn query_string(&self) -> Option<&str>; 
    fn content_type(&self) -> Option<&str>; 
    /// Declared body length, `None` if the request did not declare one. 
    fn content_length(&self) -> Option<usize>; 
    /// Header lookup; names are case-insensitive. 
    fn header(&self, name: &str) -> Option<&str>; 
} 

/// A request whose body can be read synchronously. 
pub trait UnpackRequest: RequestMeta {
    /// The body stream. It must yield the request body only. 
    fn body(&mut self) -> &mut dyn Read; 
} 

/// Request held entirely in memory. 
/// 
/// # Example
/// ```
/// use starberry_oauth_unpack::{BufferedRequest, RequestMeta}; 
/// let request = BufferedRequest::post("/photos")
///     .with_scheme("https")
///     .with_host("photos.example.net", 443)
///     .with_form("size=original"); 
/// assert_eq!(request.content_length(), Some(13)); 
/// assert_eq!(request.content_type(), Some("application/x-www-form-urlencoded")); 
/// ```
#[derive(Debug, Clone)] 
pub struct BufferedRequest {
    scheme: String, 
    method: String, 
    host: String, 
    port: u16, 
    path: String, 
    query: Option<String>, 
    headers: HashMap<String, String>, 
    body: Cursor<Vec<u8>>, 
} 

impl BufferedRequest {
    pub fn new<M: Into<String>, P: Into<String>>(method: M, path: P) -> Self {
        Self {
            scheme: "http".to_string(), 
            method: method.into(), 
            host: "localhost".to_string(), 
            port: 80, 
            path: path.into(), 
            query: None, 
            headers: HashMap::new(), 
            body: Cursor::new(Vec::new()), 
        } 
    } 

    pub fn get<P: Into<String>>(path: P) -> Self {
        Self::new("GET", path) 
    } 

    pub fn post<P: Into<String>>(path: P) -> Self {
        Self::new("POST", path) 
    } 

    pub fn with_scheme<T: Into<String>>(mut self, scheme: T) -> Self {
        self.scheme = scheme.into(); 
        self
    } 

    pub fn with_host<T: Into<String>>(mut self, host: T, port: u16) -> Self {
        self.host = host.into(); 
        self.port = port; 
        self
    } 

    pub fn with_query<T: Into<String>>(mut self, query: T) -> Self {
        self.query = Some(query.into()); 
        self
    } 

    /// Adds a header, replacing any previous value under the same name. 
    pub fn with_header<K: AsRef<str>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into()); 
        self
    } 

    /// Sets the raw body without touching `Content-Length`. 
    pub fn with_body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = Cursor::new(body.into()); 
        self
    } 

    /// Sets a form-encoded body along with matching `Content-Type` and 
    /// `Content-Length` headers. 
    pub fn with_form<B: Into<Vec<u8>>>(self, body: B) -> Self {
        let body = body.into(); 
        let length = body.len(); 
        self.with_header("content-type", "application/x-www-form-urlencoded")
            .with_header("content-length", length.to_string())
            .with_body(body) 
    } 
} 

impl RequestMeta for BufferedRequest {
    fn scheme(&self) -> &str { &self.scheme } 
    fn method(&self) -> &str { &self.method } 
    fn server_name(&self) -> &str { &self.host } 
    fn server_port(&self) -> u16 { self.port } 
    fn path(&self) -> &str { &self.path } 

    fn query_string(&self) -> Option<&str> {
        self.query.as_deref() 
    } 

    fn content_type(&self) -> Option<&str> {
        self.header("content-type") 
    } 

    fn content_length(&self) -> Option<usize> {
        self.header("content-length").and_then(|value| value.trim().parse().ok()) 
    } 

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str) 
    } 
} 

impl UnpackRequest for BufferedRequest {
    fn body(&mut self) -> &mut dyn Read {
        &mut self.body 
    } 
} 
