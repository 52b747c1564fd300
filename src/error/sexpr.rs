/// Structural errors while reading the parenthesized AST text format.
///
/// Unlike the syntactic parser, the reader fails fast: the first mismatch
/// aborts the whole read and any partial tree is dropped.
#[derive(thiserror::Error, Debug)]
pub enum SexprError {
	#[error("line {line}, column {column}: unexpected end of input")]
	UnexpectedEnd { line: usize, column: usize },
	#[error("line {line}, column {column}: expected ')'")]
	ExpectedClosingParen { line: usize, column: usize },
	#[error("line {line}, column {column}: operator '{symbol}' must appear as '( {symbol} ... )'")]
	BareOperator { symbol: String, line: usize, column: usize },
	#[error("line {line}, column {column}: expected '(' or 'nil', got '{token}'")]
	UnexpectedToken { token: String, line: usize, column: usize },
	#[error("line {line}, column {column}: '{head}' node does not take a subtree in that position")]
	UnexpectedChild { head: String, line: usize, column: usize },
	#[error("line {line}, column {column}: '{head}' head must be followed by a name")]
	MissingName { head: String, line: usize, column: usize },
	#[error("line {line}, column {column}: unknown type keyword '{token}'")]
	UnknownType { token: String, line: usize, column: usize },
	#[error("input contains no tree")]
	EmptyTree,
}
