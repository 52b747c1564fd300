/// A lexical diagnostic with its source position.
///
/// The scanner records these and keeps going; no byte sequence is fatal to it.
#[derive(thiserror::Error, Debug)]
#[error("lexical error (line {line}, column {column}): {kind}")]
pub struct ScanError {
	/// The line number where the error occurred.
	line:   usize,
	/// The column number where the error occurred.
	column: usize,
	/// The kind of lexical error.
	kind:   ScanErrorKind,
}

impl ScanError {
	pub fn new(line: usize, column: usize, kind: ScanErrorKind) -> Self { Self { line, column, kind } }
}

/// Kinds of lexical errors.
#[derive(Debug)]
pub enum ScanErrorKind {
	/// A character no token class recognises.
	UnknownCharacter(char),
	/// A digit run that did not parse as a number literal.
	MalformedNumber(String),
}

impl std::fmt::Display for ScanErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ScanErrorKind::*;
		match self {
			UnknownCharacter(c) => {
				write!(f, "unknown character '{c}' (code {})", *c as u32)
			}
			MalformedNumber(text) => {
				write!(f, "malformed number literal '{text}'")
			}
		}
	}
}
