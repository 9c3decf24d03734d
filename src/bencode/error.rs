use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BencodeError {
	/// No token pattern matches at `position`.
	#[error("Lexical error at byte {position}: {reason}")]
	Lexical { position: usize, reason: String },

	#[error("Syntax error: {0}")]
	Syntax(String),
}

impl BencodeError {
	pub(crate) fn lexical(position: usize, reason: impl Into<String>) -> Self {
		BencodeError::Lexical { position, reason: reason.into() }
	}

	pub(crate) fn syntax(reason: impl Into<String>) -> Self {
		BencodeError::Syntax(reason.into())
	}

	pub fn is_lexical(&self) -> bool {
		matches!(self, BencodeError::Lexical { .. })
	}

	pub fn is_syntax(&self) -> bool {
		matches!(self, BencodeError::Syntax(_))
	}
}
