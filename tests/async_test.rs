use starberry_oauth_unpack::{BufferedRequest, OAuthVersion, UnpackConfig, UnpackError, Unpacker}; 
use tokio::io::BufReader; 

const SIGNED_FORM: &str = "oauth_consumer_key=ck&oauth_signature_method=HMAC-SHA1&oauth_signature=sig&oauth_timestamp=123&oauth_nonce=abc&status=hi"; 

fn form_request(declared: usize) -> BufferedRequest {
    BufferedRequest::post("/statuses/update")
        .with_scheme("https")
        .with_host("api.example.com", 443)
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_header("Content-Length", declared.to_string())
}

#[tokio::test]
async fn test_async_form_body() {
    let unpacker = Unpacker::new(UnpackConfig::new()).unwrap(); 
    let request = form_request(SIGNED_FORM.len()); 
    let mut stream = BufReader::new(SIGNED_FORM.as_bytes()); 
    let result = unpacker.unpack_async(&request, &mut stream, &mut []).await.unwrap(); 
    assert_eq!(result.version(), OAuthVersion::OAuth1); 
    let oauth1 = result.as_oauth1().unwrap(); 
    assert_eq!(oauth1.host(), "api.example.com"); 
    assert_eq!(oauth1.port(), 443); 
    assert_eq!(oauth1.param("status"), Some("hi")); 
}

#[tokio::test]
async fn test_async_body_longer_than_declared() {
    let unpacker = Unpacker::new(UnpackConfig::new()).unwrap(); 
    let request = form_request(20); 
    let mut stream = BufReader::new(SIGNED_FORM.as_bytes()); 
    let err = unpacker.unpack_async(&request, &mut stream, &mut []).await.unwrap_err(); 
    assert!(matches!(err, UnpackError::MalformedRequest(_))); 
}

#[tokio::test]
async fn test_async_bearer_without_body() {
    let unpacker = Unpacker::new(UnpackConfig::new()).unwrap(); 
    let request = BufferedRequest::get("/me")
        .with_scheme("https")
        .with_header("Authorization", "Bearer abc123"); 
    let mut empty: &[u8] = &[]; 
    let result = unpacker.unpack_async(&request, &mut empty, &mut []).await.unwrap(); 
    assert_eq!(result.as_oauth2().unwrap().token(), "abc123"); 
}

#[tokio::test]
async fn test_async_unbounded_limit_without_declared_length() {
    let unpacker = Unpacker::new(UnpackConfig::new().with_max_body_size(usize::MAX)).unwrap(); 
    let request = BufferedRequest::post("/statuses/update")
        .with_header("Content-Type", "application/x-www-form-urlencoded"); 
    let mut stream = BufReader::new(SIGNED_FORM.as_bytes()); 
    let result = unpacker.unpack_async(&request, &mut stream, &mut []).await.unwrap(); 
    assert_eq!(result.as_oauth1().unwrap().param("status"), Some("hi")); 
}
