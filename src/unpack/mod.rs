pub mod config; 
pub mod error; 
pub mod source; 
pub mod unpacker; 

pub use config::{DuplicatePolicy, SchemeSource, UnpackConfig}; 
pub use error::UnpackError; 
pub use source::{BufferedRequest, RequestMeta, UnpackRequest}; 
pub use unpacker::Unpacker; 
