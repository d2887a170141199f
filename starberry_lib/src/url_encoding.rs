use percent_encoding::percent_decode; 

/// Decodes a percent-encoded string and returns an owned `String`.
///
/// Invalid UTF-8 after decoding is replaced lossily, so this never fails.
///
/// # Example
/// ```
/// use starberry_lib::url_encoding::decode_url_owned; 
/// assert_eq!(decode_url_owned("x%3D"), "x=");
/// assert_eq!(decode_url_owned("a+b"), "a+b");
/// ```
pub fn decode_url_owned(input: &str) -> String {
    percent_decode(input.as_bytes())
        .decode_utf8_lossy()
        .into_owned() 
}

/// Decodes an `application/x-www-form-urlencoded` value. 
/// 
/// Same as [`decode_url_owned`] except that `+` stands for a space, which is 
/// how browsers encode form bodies and query strings. 
///
/// # Example
/// ```
/// use starberry_lib::url_encoding::decode_form_owned; 
/// assert_eq!(decode_form_owned("Hello+World%21"), "Hello World!");
/// ```
pub fn decode_form_owned(input: &str) -> String {
    let plus_as_space = input.replace('+', " "); 
    decode_url_owned(&plus_as_space) 
} 

/// Checks whether a credential matches the `b64token` syntax of RFC 6750:
/// `1*( ALPHA / DIGIT / "-" / "." / "_" / "~" / "+" / "/" ) *"="`
///
/// # Example
/// ```
/// use starberry_lib::url_encoding::is_b64token; 
/// assert!(is_b64token("mF_9.B5f-4.1JqM"));
/// assert!(is_b64token("abc=="));
/// assert!(!is_b64token("abc def"));
/// assert!(!is_b64token("=abc"));
/// ```
pub fn is_b64token(input: &str) -> bool {
    let body = input.trim_end_matches('='); 
    !body.is_empty()
        && body.bytes().all(|b| {
            b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'+' | b'/')
        })
} 

#[cfg(test)] 
mod tests {
    use super::*; 

    #[test]
    fn decodes_percent_sequences() {
        assert_eq!(decode_url_owned("HMAC-SHA1"), "HMAC-SHA1"); 
        assert_eq!(decode_url_owned("a%20b%2Fc"), "a b/c"); 
    }

    #[test]
    fn form_decoding_turns_plus_into_space() {
        assert_eq!(decode_form_owned("a+b%2Bc"), "a b+c"); 
    }

    #[test]
    fn b64token_rejects_separators() {
        assert!(!is_b64token("")); 
        assert!(!is_b64token("===")); 
        assert!(!is_b64token("a,b")); 
        assert!(!is_b64token("a\"b")); 
        assert!(is_b64token("a/b+c~d")); 
    }
}
