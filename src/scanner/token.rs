/// A token produced by the scanner
#[derive(Debug, Clone)]
pub struct Token {
	pub kind:   TokenKind,
	pub line:   usize,
	pub column: usize,
}

impl Token {
	pub fn new(kind: TokenKind, line: usize, column: usize) -> Self { Self { kind, line, column } }
}

/// The different kinds of tokens in the Prikaz language.
///
/// Only identifiers and number literals carry a payload; keyword tokens are
/// resolved against the keyword table by exact text match and keep nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
	/// Declaration keyword `Здравия_желаю_товарищ`.
	Declare,
	/// Type keyword `старшина` (int).
	TypeInt,
	/// Type keyword `рядовой` (char).
	TypeChar,
	/// Type keyword `прапорщик` (double).
	TypeDouble,
	/// If keyword `Приготовиться_к_исполнению_по_получении_приказа`.
	If,
	/// While keyword `Исполнять_пока_не_получите_приказа`.
	While,
	/// Return keyword `вольно`.
	Return,
	/// Addition `Включить_в_состав`.
	Plus,
	/// Subtraction `Исключить_из_состава`.
	Minus,
	/// Multiplication `усилить`.
	Multiply,
	/// Division `расформировать_до`.
	Divide,
	/// Equality `соответствует`.
	Eq,
	/// Inequality `не_соответствует`.
	Ne,
	/// Greater-than `превосходит_норму`.
	Gt,
	/// Less-than `не_превосходит_норму`.
	Lt,
	/// Assignment `Назначить`.
	Assign,
	/// Identifier, e.g. a variable or function name.
	Identifier(String),
	/// Number literal, e.g. `42` or `3.14`.
	Number(f64),
	/// Semicolon `;`.
	Semicolon,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Comma `,`.
	Comma,
	/// Line comment marker `Для_служебного_пользования`; never emitted, the
	/// scanner discards the rest of the line.
	Comment,
	/// End of input.
	Eof,
}

impl TokenKind {
	/// Short uppercase name used by diagnostics and the token table.
	pub fn name(&self) -> &'static str {
		use TokenKind::*;
		match self {
			Declare => "DECLARE",
			TypeInt => "TYPE_INT",
			TypeChar => "TYPE_CHAR",
			TypeDouble => "TYPE_DOUBLE",
			If => "IF",
			While => "WHILE",
			Return => "RETURN",
			Plus => "PLUS",
			Minus => "MINUS",
			Multiply => "MULTIPLY",
			Divide => "DIVIDE",
			Eq => "EQ",
			Ne => "NE",
			Gt => "GT",
			Lt => "LT",
			Assign => "ASSIGN",
			Identifier(_) => "IDENTIFIER",
			Number(_) => "NUMBER",
			Semicolon => "SEMICOLON",
			LeftParen => "LPAREN",
			RightParen => "RPAREN",
			LeftBrace => "LBRACE",
			RightBrace => "RBRACE",
			Comma => "COMMA",
			Comment => "COMMENT",
			Eof => "EOF",
		}
	}

	/// Kind equality that ignores identifier and number payloads.
	pub fn is_same_kind(&self, other: &TokenKind) -> bool {
		std::mem::discriminant(self) == std::mem::discriminant(other)
	}
}
