use std::sync::OnceLock;

use regex::bytes::Regex;

use super::error::BencodeError;

/// Lexical tokens of a bencode buffer.
///
/// A string is never re-lexed: `Bytes` carries the payload the length prefix
/// pointed at. `Number` is the digit run inside `i...e`, checked again by the
/// decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
	IntStart,
	ListStart,
	DictStart,
	End,
	Bytes(&'a [u8]),
	Number(&'a [u8]),
}

// Alternatives are tried in order, so `12:` is a length prefix and never a number.
fn token_pattern() -> &'static Regex {
	static PATTERN: OnceLock<Regex> = OnceLock::new();
	PATTERN.get_or_init(|| {
		Regex::new(r"^(?:([idel])|([0-9]+):|(-?[0-9]+))").expect("token pattern compiles")
	})
}

/// Forward-only cursor over a byte buffer.
pub struct Tokenizer<'a> {
	buf: &'a [u8],
	pos: usize,
}

impl<'a> Tokenizer<'a> {
	pub fn new(buf: &'a [u8]) -> Self {
		Self::at(buf, 0)
	}

	/// Starts tokenizing at `offset` instead of the beginning of `buf`.
	pub fn at(buf: &'a [u8], offset: usize) -> Self {
		Tokenizer { buf, pos: offset.min(buf.len()) }
	}

	pub fn position(&self) -> usize {
		self.pos
	}

	/// Returns the next token, `Ok(None)` at end of input, or a lexical error
	/// when nothing matches at the cursor. Every successful match moves the
	/// cursor forward by at least one byte.
	pub fn next_token(&mut self) -> Result<Option<Token<'a>>, BencodeError> {
		let buf = self.buf;
		if self.pos >= buf.len() {
			return Ok(None);
		}

		let rest = &buf[self.pos..];
		let caps = token_pattern().captures(rest).ok_or_else(|| {
			BencodeError::lexical(self.pos, format!("unexpected byte 0x{:02x}", rest[0]))
		})?;
		let matched = caps.get(0).map_or(0, |m| m.end());

		if let Some(marker) = caps.get(1) {
			self.pos += matched;
			let token = match marker.as_bytes()[0] {
				b'i' => Token::IntStart,
				b'l' => Token::ListStart,
				b'd' => Token::DictStart,
				_ => Token::End,
			};
			return Ok(Some(token));
		}

		if let Some(prefix) = caps.get(2) {
			let length = parse_length(prefix.as_bytes()).ok_or_else(|| {
				BencodeError::lexical(self.pos, "malformed string length prefix")
			})?;
			let start = self.pos + matched;
			let end = start
				.checked_add(length)
				.filter(|&end| end <= buf.len())
				.ok_or_else(|| {
					BencodeError::lexical(
						self.pos,
						format!("string claims {} bytes, only {} remain", length, buf.len() - start),
					)
				})?;
			self.pos = end;
			return Ok(Some(Token::Bytes(&buf[start..end])));
		}

		match caps.get(3) {
			Some(number) => {
				self.pos += matched;
				Ok(Some(Token::Number(number.as_bytes())))
			}
			None => Err(BencodeError::lexical(self.pos, "no token matched")),
		}
	}
}

/// Length prefixes are plain decimals without leading zeros.
fn parse_length(digits: &[u8]) -> Option<usize> {
	if digits.len() > 1 && digits[0] == b'0' {
		return None;
	}
	std::str::from_utf8(digits).ok()?.parse().ok()
}

impl<'a> Iterator for Tokenizer<'a> {
	type Item = Result<Token<'a>, BencodeError>;

	fn next(&mut self) -> Option<Self::Item> {
		let item = self.next_token().transpose();
		if matches!(item, Some(Err(_))) {
			// stop after the first error
			self.pos = self.buf.len();
		}
		item
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(input: &[u8]) -> Result<Vec<Token<'_>>, BencodeError> {
		Tokenizer::new(input).collect()
	}

	#[test]
	fn test_structural_tokens() {
		assert_eq!(
			tokens(b"dlie").unwrap(),
			vec![Token::DictStart, Token::ListStart, Token::IntStart, Token::End]
		);
	}

	#[test]
	fn test_string_payload_is_extracted() {
		// the payload contains bytes that would otherwise be tokens
		assert_eq!(
			tokens(b"4:i1eel").unwrap(),
			vec![Token::Bytes(b"i1ee"), Token::ListStart]
		);
	}

	#[test]
	fn test_empty_string() {
		assert_eq!(tokens(b"0:").unwrap(), vec![Token::Bytes(b"")]);
	}

	#[test]
	fn test_integer_body() {
		assert_eq!(
			tokens(b"i-42e").unwrap(),
			vec![Token::IntStart, Token::Number(b"-42"), Token::End]
		);
	}

	#[test]
	fn test_binary_payload() {
		let input = [b'3', b':', 0x00, 0xff, 0x80];
		assert_eq!(tokens(&input).unwrap(), vec![Token::Bytes(&[0x00, 0xff, 0x80])]);
	}

	#[test]
	fn test_unterminated_string_claim() {
		let err = tokens(b"5:abc").unwrap_err();
		assert_eq!(err, BencodeError::lexical(0, "string claims 5 bytes, only 3 remain"));
	}

	#[test]
	fn test_stray_byte() {
		let err = tokens(b"ix").unwrap_err();
		assert!(err.is_lexical());
		assert!(matches!(err, BencodeError::Lexical { position: 1, .. }));
	}

	#[test]
	fn test_length_with_leading_zero() {
		assert!(tokens(b"03:abc").unwrap_err().is_lexical());
	}

	#[test]
	fn test_length_overflow() {
		assert!(tokens(b"99999999999999999999999:a").unwrap_err().is_lexical());
	}

	#[test]
	fn test_next_token_end_of_stream() {
		let mut tokenizer = Tokenizer::new(b"e");
		assert_eq!(tokenizer.next_token().unwrap(), Some(Token::End));
		assert_eq!(tokenizer.position(), 1);
		assert_eq!(tokenizer.next_token().unwrap(), None);
		assert_eq!(tokenizer.next_token().unwrap(), None);
	}

	#[test]
	fn test_start_at_offset() {
		let mut tokenizer = Tokenizer::at(b"xx4:spam", 2);
		assert_eq!(tokenizer.next_token().unwrap(), Some(Token::Bytes(b"spam")));
		assert_eq!(tokenizer.position(), 8);
	}

	#[test]
	fn test_iterator_stops_after_error() {
		let mut tokenizer = Tokenizer::new(b"l?e");
		assert_eq!(tokenizer.next(), Some(Ok(Token::ListStart)));
		assert!(matches!(tokenizer.next(), Some(Err(_))));
		assert_eq!(tokenizer.next(), None);
	}
}
