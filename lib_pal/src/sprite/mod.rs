pub mod decoder;
pub mod encoder;
pub mod format;
pub mod validator;

pub use decoder::{unpack, UnpackError};
pub use encoder::pack;
pub use validator::{validate, ValidationError};
