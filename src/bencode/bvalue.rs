use std::collections::HashMap;

/// A decoded bencode value.
///
/// Dictionary keys are raw byte strings. The map does not keep the order the
/// keys appeared in; `encode_bvalue` sorts them when writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes for any string
	Integer(i64),
	List(Vec<BValue>),
	Dict(HashMap<Vec<u8>, BValue>)
}

impl BValue {
	/// Builds a `ByteString` from UTF-8 text.
	pub fn string(s: &str) -> Self {
		BValue::ByteString(s.as_bytes().to_vec())
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b),
			_ => None,
		}
	}

	/// Returns the byte string as `&str` when it is valid UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn as_list(&self) -> Option<&Vec<BValue>> {
		match self {
			BValue::List(l) => Some(l),
			_ => None,
		}
	}

	pub fn as_list_mut(&mut self) -> Option<&mut Vec<BValue>> {
		match self {
			BValue::List(l) => Some(l),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&HashMap<Vec<u8>, BValue>> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	pub fn as_dict_mut(&mut self) -> Option<&mut HashMap<Vec<u8>, BValue>> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	/// Looks up `key` when this value is a dictionary.
	pub fn get(&self, key: &[u8]) -> Option<&BValue> {
		self.as_dict()?.get(key)
	}
}

impl From<i64> for BValue {
	fn from(i: i64) -> Self {
		BValue::Integer(i)
	}
}

impl From<&str> for BValue {
	fn from(s: &str) -> Self {
		BValue::string(s)
	}
}

impl From<Vec<u8>> for BValue {
	fn from(bytes: Vec<u8>) -> Self {
		BValue::ByteString(bytes)
	}
}

impl From<Vec<BValue>> for BValue {
	fn from(items: Vec<BValue>) -> Self {
		BValue::List(items)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_accessors() {
		let value = BValue::Integer(42);
		assert_eq!(value.as_integer(), Some(42));
		assert!(value.as_bytes().is_none());

		let value = BValue::string("test");
		assert_eq!(value.as_str(), Some("test"));
		assert!(value.as_integer().is_none());

		let value = BValue::ByteString(vec![0xff, 0xfe]);
		assert_eq!(value.as_bytes(), Some(&[0xff, 0xfe][..]));
		assert!(value.as_str().is_none());

		let value = BValue::List(vec![]);
		assert!(value.as_list().is_some());
		assert!(value.as_dict().is_none());
	}

	#[test]
	fn test_get_on_dict() {
		let mut map = HashMap::new();
		map.insert(b"name".to_vec(), BValue::from("a.iso"));
		let value = BValue::Dict(map);

		assert_eq!(value.get(b"name").and_then(BValue::as_str), Some("a.iso"));
		assert_eq!(value.get(b"missing"), None);
		assert_eq!(BValue::Integer(1).get(b"name"), None);
	}
}
