use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::error::BencodeError;
use super::token::{Token, Tokenizer};
use crate::bencode::bvalue::BValue;

/// Containers nested deeper than this are rejected instead of recursing further.
pub const MAX_DEPTH: usize = 64;

/// Decodes exactly one bencoded value from `input`.
///
/// Fails on empty input, malformed or truncated values, and on any bytes left
/// over after the first complete value.
pub fn decode_bencode(input: &[u8]) -> Result<BValue, BencodeError> {
	if input.is_empty() {
		return Err(BencodeError::syntax("empty input"));
	}

	let mut tokens = Tokenizer::new(input);
	let first = next(&mut tokens)?;
	let value = decode_item(&mut tokens, first, 0)?;

	let end = tokens.position();
	match tokens.next_token() {
		Ok(None) => Ok(value),
		_ => Err(BencodeError::syntax(format!("trailing data at byte {}", end))),
	}
}

// Running out of tokens is a syntax error like any other malformed input.
fn next<'a>(tokens: &mut Tokenizer<'a>) -> Result<Token<'a>, BencodeError> {
	tokens
		.next_token()?
		.ok_or_else(|| BencodeError::syntax("unexpected end of input"))
}

/// Decodes the item introduced by `token`, pulling the rest of it from `tokens`.
fn decode_item<'a>(
	tokens: &mut Tokenizer<'a>,
	token: Token<'a>,
	depth: usize,
) -> Result<BValue, BencodeError> {
	match token {
		Token::IntStart => {
			let digits = match next(tokens)? {
				Token::Number(digits) => digits,
				other => {
					return Err(BencodeError::syntax(format!(
						"expected integer digits, found {:?}",
						other
					)))
				}
			};
			let value = parse_integer(digits)?;
			match next(tokens)? {
				Token::End => Ok(BValue::Integer(value)),
				other => Err(BencodeError::syntax(format!(
					"expected 'e' after integer, found {:?}",
					other
				))),
			}
		}
		Token::Bytes(bytes) => Ok(BValue::ByteString(bytes.to_vec())),
		Token::ListStart | Token::DictStart => {
			if depth >= MAX_DEPTH {
				return Err(BencodeError::syntax(format!(
					"nesting deeper than {} levels",
					MAX_DEPTH
				)));
			}

			let mut items = Vec::new();
			let mut tok = next(tokens)?;
			while tok != Token::End {
				items.push(decode_item(tokens, tok, depth + 1)?);
				tok = next(tokens)?;
			}

			if token == Token::DictStart {
				build_dict(items)
			} else {
				Ok(BValue::List(items))
			}
		}
		Token::End | Token::Number(_) => Err(BencodeError::syntax(format!(
			"unexpected token {:?}",
			token
		))),
	}
}

/// Parses the body of `i...e`: `0`, or an optional `-` and digits without a
/// leading zero. `-0` is rejected.
fn parse_integer(digits: &[u8]) -> Result<i64, BencodeError> {
	let num_str = std::str::from_utf8(digits)
		.map_err(|_| BencodeError::syntax("non-ASCII integer"))?;

	let magnitude = num_str.strip_prefix('-').unwrap_or(num_str);
	if magnitude.starts_with('0') && (magnitude.len() > 1 || num_str.starts_with('-')) {
		return Err(BencodeError::syntax(format!(
			"non-canonical integer '{}'",
			num_str
		)));
	}

	num_str.parse::<i64>().map_err(|e| {
		BencodeError::syntax(format!("failed to parse integer '{}': {}", num_str, e))
	})
}

/// Pairs the flattened dictionary elements: even positions are keys, odd
/// positions their values. Keys must be byte strings and may not repeat.
fn build_dict(items: Vec<BValue>) -> Result<BValue, BencodeError> {
	if items.len() % 2 != 0 {
		return Err(BencodeError::syntax("dictionary key without a value"));
	}

	let mut map = HashMap::with_capacity(items.len() / 2);
	let mut items = items.into_iter();
	while let (Some(key), Some(value)) = (items.next(), items.next()) {
		let key = match key {
			BValue::ByteString(bytes) => bytes,
			other => {
				return Err(BencodeError::syntax(format!(
					"dictionary key must be a byte string, found {:?}",
					other
				)))
			}
		};

		match map.entry(key) {
			Entry::Occupied(entry) => {
				return Err(BencodeError::syntax(format!(
					"duplicate dictionary key '{}'",
					String::from_utf8_lossy(entry.key())
				)))
			}
			Entry::Vacant(entry) => {
				entry.insert(value);
			}
		}
	}

	Ok(BValue::Dict(map))
}
