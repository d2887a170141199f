#[cfg(feature = "url_encoding")] 
pub mod url_encoding; 

#[cfg(feature = "url_encoding")] 
pub use url_encoding::{decode_form_owned, decode_url_owned, is_b64token}; 
