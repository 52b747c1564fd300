/// A single syntax diagnostic. The parser accumulates these and keeps
/// scanning; the program as a whole is rejected once any exist.
#[derive(thiserror::Error, Debug)]
#[error("line {line}: {kind}")]
pub struct ParseError {
	line: usize,
	kind: ParseErrorKind,
}

impl ParseError {
	pub fn new(line: usize, kind: ParseErrorKind) -> Self { Self { line, kind } }
}

#[derive(Debug)]
pub enum ParseErrorKind {
	/// An `expect` call failed: expected vs actual token kind.
	Expected { expected: &'static str, got: String },
	/// No rule for the token starting a statement.
	UnexpectedStatementToken { got: String },
	/// An identifier statement that is not an assignment.
	ExpectedAssignment { got: String },
	/// A primary expression was required.
	ExpectedExpression { got: String },
	/// A type keyword was required.
	ExpectedType { got: String },
	/// Tokens remained after the single top-level function.
	TrailingTokens { got: String },
}

impl std::fmt::Display for ParseErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorKind::*;
		match self {
			Expected { expected, got } => {
				write!(f, "expected {expected}, got {got}")
			}
			UnexpectedStatementToken { got } => {
				write!(f, "unexpected token in statement: {got}")
			}
			ExpectedAssignment { got } => {
				write!(f, "expected an assignment after identifier, got {got}")
			}
			ExpectedExpression { got } => {
				write!(f, "expected a number, a variable or '(', got {got}")
			}
			ExpectedType { got } => {
				write!(f, "expected a type keyword, got {got}")
			}
			TrailingTokens { got } => {
				write!(f, "extra tokens after the function body, starting at {got}")
			}
		}
	}
}
