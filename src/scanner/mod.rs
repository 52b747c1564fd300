//! Lexical analysis for the Prikaz language.
//!
//! Keywords here are whole Russian phrases joined by underscores, so they are
//! scanned exactly like identifiers and resolved afterwards against the
//! keyword table -- maximal munch, then an exact text match. The language also
//! defines a set of "filler" phrases that read like military politeness
//! (`товарищ`, `докладываю`, ...); they scan as identifiers and are discarded
//! without producing a token.
//!
//! The scanner is never fatal: an unrecognised character is recorded as a
//! [`ScanError`] with its line and column, the cursor steps past it and
//! scanning continues. Callers decide what to do with the diagnostics.

mod token;

use std::{collections::HashMap, iter::Peekable, str::CharIndices};

use TokenKind::*;
pub use token::*;

use crate::error::scanner::{ScanError, ScanErrorKind};

/// Keyword text of the line comment marker; the rest of the line is discarded.
const COMMENT_KEYWORD: &str = "Для_служебного_пользования";

/// Identifier-like phrases with no semantic content; discarded without a token.
const FILLER_PHRASES: &[&str] = &[
	"солдат_в_подчинение",
	"Солдат_в_подчинение",
	"по_приказу_вышепоставленных_органов",
	"По_приказу_вышепоставленных_органов",
	"Товарищ",
	"товарищ",
	"Докладываю",
	"докладываю",
	"Рапортую",
	"рапортую",
	"Доложил",
	"доложил",
	"что",
	"необходимо",
	"вас",
	"Вас",
	"Всех_солдат_что_у",
	"всех_солдат_что_у",
];

/// A scanner for Prikaz source code
pub struct Scanner<'a> {
	/// User input source code
	source:      &'a str,
	/// User input source code iterator
	source_iter: Peekable<CharIndices<'a>>,
	/// Byte offset just past the character last consumed
	cursor:      usize,
	/// Current source line, starting at 1
	line:        usize,
	/// Current source column, starting at 1; a tab advances it by 4
	column:      usize,
	/// Reserved keywords of the language
	keywords:    HashMap<&'static str, TokenKind>,
	/// Lexed tokens
	tokens:      Vec<Token>,
	/// Lexical diagnostics collected so far
	errors:      Vec<ScanError>,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let keywords = HashMap::from([
			("Здравия_желаю_товарищ", Declare),
			("старшина", TypeInt),
			("рядовой", TypeChar),
			("прапорщик", TypeDouble),
			("Приготовиться_к_исполнению_по_получении_приказа", If),
			("Исполнять_пока_не_получите_приказа", While),
			("вольно", Return),
			("Включить_в_состав", Plus),
			("Исключить_из_состава", Minus),
			("усилить", Multiply),
			("расформировать_до", Divide),
			("соответствует", Eq),
			("не_соответствует", Ne),
			("превосходит_норму", Gt),
			("не_превосходит_норму", Lt),
			("Назначить", Assign),
		]);
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, cursor: 0, line: 1, column: 1, keywords, tokens: vec![], errors: vec![] }
	}

	/// Scan the whole input into a token sequence terminated by `Eof`.
	///
	/// Always succeeds; lexical problems come back as the second element and
	/// the offending characters are simply skipped.
	pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
		while let Some(c) = self.peek() {
			if c.is_whitespace() {
				self.advance();
				continue;
			}
			if c.is_ascii_digit() {
				self.scan_number();
				continue;
			}
			if c.is_alphabetic() || c == '_' {
				self.scan_identifier();
				continue;
			}
			if let Some(kind) = Self::symbol_kind(c) {
				self.push_token(kind);
				self.advance();
				continue;
			}
			self.errors.push(ScanError::new(self.line, self.column, ScanErrorKind::UnknownCharacter(c)));
			self.advance();
		}

		self.push_token(Eof);
		(self.tokens, self.errors)
	}

	/// Single-character punctuation, mapped by direct lookup.
	fn symbol_kind(c: char) -> Option<TokenKind> {
		match c {
			';' => Some(Semicolon),
			'(' => Some(LeftParen),
			')' => Some(RightParen),
			'{' => Some(LeftBrace),
			'}' => Some(RightBrace),
			',' => Some(Comma),
			_ => None,
		}
	}

	/// Scan a number literal: integer part, then a fractional part only if a
	/// digit follows the dot. No sign, no exponent.
	fn scan_number(&mut self) {
		let (line, column) = (self.line, self.column);
		let start = self.offset();

		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}

		if self.peek() == Some('.') {
			let mut iter_clone = self.source_iter.clone();
			iter_clone.next();
			if iter_clone.peek().is_some_and(|(_, c)| c.is_ascii_digit()) {
				self.advance();
				while self.peek().is_some_and(|c| c.is_ascii_digit()) {
					self.advance();
				}
			}
		}

		let text = &self.source[start..self.cursor];
		match text.parse() {
			Ok(value) => self.tokens.push(Token::new(Number(value), line, column)),
			Err(_) => {
				self.errors.push(ScanError::new(line, column, ScanErrorKind::MalformedNumber(text.to_string())))
			}
		}
	}

	/// Scan an identifier, then decide what it really was: the comment
	/// marker, a filler phrase, a keyword, or an actual identifier.
	fn scan_identifier(&mut self) {
		let (line, column) = (self.line, self.column);
		let start = self.offset();

		self.advance();
		while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
			self.advance();
		}

		let text = &self.source[start..self.cursor];

		if text == COMMENT_KEYWORD {
			while self.peek().is_some_and(|c| c != '\n') {
				self.advance();
			}
			return;
		}

		if FILLER_PHRASES.contains(&text) {
			return;
		}

		let kind = self.keywords.get(text).cloned().unwrap_or_else(|| Identifier(text.to_string()));
		self.tokens.push(Token::new(kind, line, column));
	}

	fn push_token(&mut self, kind: TokenKind) { self.tokens.push(Token::new(kind, self.line, self.column)); }

	/// Byte offset of the next character to be consumed.
	fn offset(&mut self) -> usize {
		self.source_iter.peek().map(|&(i, _)| i).unwrap_or(self.source.len())
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Advance to the next character, keeping line/column bookkeeping.
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		match c {
			'\n' => {
				self.line += 1;
				self.column = 1;
			}
			'\t' => self.column += 4,
			_ => self.column += 1,
		}
		Some(c)
	}
}

/// Human-readable token table, printed to stdout. Debugging aid only; nothing
/// parses this.
pub fn print_token_table(tokens: &[Token]) {
	println!("=== lexical analysis: {} tokens ===", tokens.len());
	println!("{:<5} {:<12} {:<24} {}", "#", "kind", "value", "position");
	println!("-------------------------------------------------------");
	for (index, token) in tokens.iter().enumerate() {
		let value = match &token.kind {
			Number(n) => format!("{n}"),
			Identifier(name) => name.clone(),
			Eof => "END OF FILE".to_string(),
			_ => "—".to_string(),
		};
		println!("{index:<5} {:<12} {value:<24} line:{} col:{}", token.kind.name(), token.line, token.column);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scan(source: &str) -> (Vec<Token>, Vec<ScanError>) { Scanner::new(source).scan_tokens() }

	fn kinds(source: &str) -> Vec<TokenKind> {
		scan(source).0.into_iter().map(|token| token.kind).collect()
	}

	#[test]
	fn keywords_resolve_by_exact_text() {
		assert_eq!(kinds("Назначить"), vec![Assign, Eof]);
		assert_eq!(kinds("старшина рядовой прапорщик"), vec![TypeInt, TypeChar, TypeDouble, Eof]);
		assert_eq!(kinds("вольно ;"), vec![Return, Semicolon, Eof]);
		assert_eq!(kinds("Исполнять_пока_не_получите_приказа"), vec![While, Eof]);
	}

	#[test]
	fn near_miss_keyword_is_an_identifier() {
		assert_eq!(kinds("старшины"), vec![Identifier("старшины".to_string()), Eof]);
	}

	#[test]
	fn numbers_with_optional_fraction() {
		assert_eq!(kinds("42"), vec![Number(42.0), Eof]);
		assert_eq!(kinds("3.14"), vec![Number(3.14), Eof]);
		// A dot with no digit after it is not part of the number.
		let (tokens, errors) = scan("5.");
		assert_eq!(tokens[0].kind, Number(5.0));
		assert_eq!(errors.len(), 1); // the lone '.' is an unknown character
		assert_eq!(tokens.last().unwrap().kind, Eof);
	}

	#[test]
	fn filler_phrases_emit_nothing() {
		assert_eq!(kinds("Товарищ x Назначить 5 солдат_в_подчинение ;"), vec![
			Identifier("x".to_string()),
			Assign,
			Number(5.0),
			Semicolon,
			Eof
		]);
	}

	#[test]
	fn comment_discards_rest_of_line() {
		assert_eq!(kinds("Для_служебного_пользования всё что угодно ; { }\nвольно"), vec![Return, Eof]);
	}

	#[test]
	fn unknown_characters_are_recorded_not_fatal() {
		let (tokens, errors) = scan("@ # вольно $");
		assert_eq!(errors.len(), 3);
		assert_eq!(tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(), vec![Return, Eof]);
	}

	#[test]
	fn eof_is_always_appended() {
		let (tokens, _) = scan("");
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].kind, Eof);
	}

	#[test]
	fn line_and_column_bookkeeping() {
		let (tokens, _) = scan("вольно\n  5 ;");
		assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
		assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
		assert_eq!((tokens[2].line, tokens[2].column), (2, 5));
	}
}
