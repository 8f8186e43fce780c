pub mod factory;
pub mod principal;
pub mod token_codec;

#[cfg(test)]
pub mod testing;

pub use factory::{build_principal_lookup, build_token_codec};
pub use principal::{LookupError, Principal, PrincipalLookup};
pub use token_codec::{TokenCodec, TokenError};
