pub mod parser;
pub mod scanner;
pub mod sexpr;

pub type Result<T> = std::result::Result<T, PrikazError>;

/// PrikazError is the top-level error type for the compiler pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PrikazError {
	/// Internal compiler error, should never happen
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Syntax errors accumulated over one parse; the whole program is rejected
	#[error("parser reported {} error(s):\n{}", .0.len(), display_parse_errors(.0))]
	ParseErrors(Vec<parser::ParseError>),
	/// Structural error while reading the AST text format
	#[error("{0}")]
	SexprError(#[from] sexpr::SexprError),
	/// File or process I/O failure
	#[error("io error: {0}")]
	IoError(#[from] std::io::Error),
}

fn display_parse_errors(errors: &[parser::ParseError]) -> String {
	errors.iter().map(|e| format!("{e}")).collect::<Vec<String>>().join("\n")
}
