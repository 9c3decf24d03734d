//! Bencode tokenizer, decoder and canonical encoder.

pub mod bvalue;
pub mod decode;
pub mod encode;
pub mod error;
pub mod token;

pub use bvalue::BValue;   // re-export
pub use decode::decode_bencode;   // re-export
pub use encode::{bvalue_to_json, encode_bvalue};   // re-export
pub use error::BencodeError;
pub use token::{Token, Tokenizer};

#[cfg(test)]
mod tests;
