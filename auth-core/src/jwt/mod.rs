pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Claims;
pub use claims::TokenSubject;
pub use codec::KeyPurpose;
pub use codec::TokenCodec;
pub use errors::JwtError;
