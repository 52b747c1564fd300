//! # The Prikaz language front end
//!
//! Prikaz is a toy language whose keywords are Russian military phrases: a
//! program is one function declared with `Здравия_желаю_товарищ`, assignment
//! is `Назначить`, `вольно` returns, and polite filler words (`Товарищ`,
//! `докладываю`, ...) are allowed anywhere and mean nothing.
//!
//! ``` text
//! Здравия_желаю_товарищ старшина Яйцов () {
//!     Товарищ старшина Хохлов Назначить 10 солдат_в_подчинение;
//!     вольно Хохлов;
//! }
//! ```
//!
//! The pipeline is classic single-pass front end:
//!
//! ## Scanning
//!
//! [`scanner`] turns characters into tokens. Keywords are whole
//! underscore-joined phrases, so they lex like identifiers and are resolved by
//! exact text against the keyword table; filler phrases and
//! `Для_служебного_пользования` line comments are dropped. Unknown characters
//! are collected as diagnostics, never fatal.
//!
//! ## Parsing
//!
//! [`parser`] builds the [`ast::Node`] tree by recursive descent with the
//! usual precedence ladder (comparison, additive, multiplicative, unary,
//! primary). Statements fold into right-leaning sequence nodes. Errors
//! accumulate; any of them rejects the whole program.
//!
//! ## Back ends
//!
//! The tree then feeds three independent consumers: [`sexpr`] writes and reads
//! a lossless parenthesized text format, [`dump`] draws Graphviz/HTML
//! visualizations, and [`codegen`] lowers the tree to text assembly for a
//! small stack machine.
//!
//! [`Compiler`] wires the stages together behind the command line in
//! [`cli`].

pub mod ast;
pub mod cli;
pub mod codegen;
mod compiler;
pub mod dump;
mod error;
pub mod parser;
pub mod scanner;
pub mod sexpr;

pub use compiler::{CompileOptions, Compiler};
pub use error::{
	PrikazError, Result,
	parser::{ParseError, ParseErrorKind},
	scanner::{ScanError, ScanErrorKind},
	sexpr::SexprError,
};
