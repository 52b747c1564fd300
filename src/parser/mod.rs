//! Recursive-descent parser for the Prikaz grammar.
//!
//! One function per program:
//!
//! ``` BNF
//! program    → function EOF ;
//! function   → DECLARE type IDENTIFIER "(" ")" block ;
//! block      → "{" statement* "}" ;
//! statement  → var_decl | if | while | return | block | assignment ;
//! var_decl   → type IDENTIFIER ( "=" expression )? ";" ;
//! expression → comparison ;
//! comparison → term ( ( "==" | "!=" | ">" | "<" ) term )* ;
//! term       → factor ( ( "+" | "-" ) factor )* ;
//! factor     → unary ( ( "*" | "/" ) unary )* ;
//! unary      → ( "+" | "-" ) unary | primary ;
//! primary    → NUMBER | IDENTIFIER | IDENTIFIER "(" expression ")" | "(" expression ")" ;
//! ```
//!
//! Binary rules build left-associative trees; unary minus lowers to
//! `SUB(0, operand)`. Recovery discipline: a failed expectation records a
//! [`ParseError`] and the enclosing rule yields nothing, but sibling rules
//! still run best-effort. Once the pass ends, any recorded error rejects the
//! whole program — no partial tree escapes.

use crate::{
	ast::{BinaryOp, Node, VarType},
	error::parser::{ParseError, ParseErrorKind},
	scanner::{Token, TokenKind},
};

pub struct Parser {
	/// The tokens to parse.
	tokens: Vec<Token>,
	/// Index of the current token.
	pos:    usize,
	/// Syntax diagnostics accumulated over this parse.
	errors: Vec<ParseError>,
}

impl Parser {
	pub fn new(tokens: Vec<Token>) -> Self { Self { tokens, pos: 0, errors: vec![] } }

	/// Parse the whole token sequence into one function-declaration node.
	///
	/// Returns `Err` with every accumulated diagnostic if anything went
	/// wrong; the partially built tree is dropped in that case.
	pub fn parse_program(mut self) -> crate::Result<Node> {
		let function = self.function();

		if self.errors.is_empty() && !self.check(&TokenKind::Eof) {
			self.error(ParseErrorKind::TrailingTokens { got: self.describe() });
		}

		if !self.errors.is_empty() {
			return Err(crate::PrikazError::ParseErrors(self.errors));
		}

		function.ok_or_else(|| anyhow::anyhow!("parser produced no tree and no diagnostics").into())
	}

	/// `DECLARE type IDENTIFIER '(' ')' block`. Parameter lists are parsed as
	/// an empty placeholder on purpose.
	fn function(&mut self) -> Option<Node> {
		if !self.expect(&TokenKind::Declare, "the declaration keyword") {
			return None;
		}

		let ty = self.type_keyword()?;
		let name = self.identifier_name()?;

		if !self.expect(&TokenKind::LeftParen, "'(' after the function name") {
			return None;
		}
		if !self.expect(&TokenKind::RightParen, "')' after the parameter list") {
			return None;
		}

		let body = self.block()?;
		Some(Node::func_decl(name, ty, None, body))
	}

	fn block(&mut self) -> Option<Node> {
		self.expect(&TokenKind::LeftBrace, "'{'");
		let body = self.statements()?;
		self.expect(&TokenKind::RightBrace, "'}'");
		Some(body)
	}

	/// Zero or more statements, folded pairwise into right-leaning sequence
	/// nodes. Empty statements are discarded; an empty block yields the
	/// empty marker.
	fn statements(&mut self) -> Option<Node> {
		let mut first: Option<Node> = None;

		loop {
			match self.kind() {
				None | Some(TokenKind::RightBrace) | Some(TokenKind::Eof) => break,
				_ => {}
			}

			let statement = self.statement()?;
			if statement == Node::Empty {
				continue;
			}

			first = Some(match first {
				None => statement,
				Some(previous) => Node::sequence(previous, statement),
			});
		}

		Some(first.unwrap_or(Node::Empty))
	}

	fn statement(&mut self) -> Option<Node> {
		use TokenKind::*;
		match self.kind()? {
			TypeInt | TypeChar | TypeDouble => self.var_decl(),
			If => self.if_statement(),
			While => self.while_statement(),
			Return => self.return_statement(),
			LeftBrace => self.block(),
			Identifier(_) => {
				if matches!(self.kind_at(self.pos + 1), Some(Assign)) {
					self.assignment()
				} else {
					self.error(ParseErrorKind::ExpectedAssignment { got: self.describe() });
					None
				}
			}
			RightBrace => Some(Node::Empty),
			_ => {
				self.error(ParseErrorKind::UnexpectedStatementToken { got: self.describe() });
				None
			}
		}
	}

	/// `type IDENTIFIER ['=' expression] ';'`
	fn var_decl(&mut self) -> Option<Node> {
		let ty = self.type_keyword()?;
		let name = self.identifier_name()?;

		let init = if self.check(&TokenKind::Assign) {
			self.advance();
			Some(self.expression()?)
		} else {
			None
		};

		if !self.expect(&TokenKind::Semicolon, "';' after the variable declaration") {
			return None;
		}

		Some(Node::var_decl(name, ty, init))
	}

	fn assignment(&mut self) -> Option<Node> {
		let name = self.identifier_name()?;
		self.expect(&TokenKind::Assign, "'=' in the assignment");
		let value = self.expression()?;
		self.expect(&TokenKind::Semicolon, "';' after the assignment");
		Some(Node::assign(Node::variable(name), value))
	}

	fn if_statement(&mut self) -> Option<Node> {
		self.expect(&TokenKind::If, "the if keyword");
		self.expect(&TokenKind::LeftParen, "'(' after the if keyword");
		let condition = self.expression()?;
		self.expect(&TokenKind::RightParen, "')' after the condition");
		let body = self.statement()?;
		Some(Node::if_node(condition, body))
	}

	fn while_statement(&mut self) -> Option<Node> {
		self.expect(&TokenKind::While, "the while keyword");
		self.expect(&TokenKind::LeftParen, "'(' after the while keyword");
		let condition = self.expression()?;
		self.expect(&TokenKind::RightParen, "')' after the condition");
		let body = self.statement()?;
		Some(Node::while_node(condition, body))
	}

	fn return_statement(&mut self) -> Option<Node> {
		self.expect(&TokenKind::Return, "the return keyword");
		let expr = self.expression()?;
		self.expect(&TokenKind::Semicolon, "';' after the return expression");
		Some(Node::return_node(Some(expr)))
	}

	fn expression(&mut self) -> Option<Node> { self.comparison() }

	fn comparison(&mut self) -> Option<Node> {
		let mut node = self.term()?;

		loop {
			let op = match self.kind() {
				Some(TokenKind::Eq) => BinaryOp::Eq,
				Some(TokenKind::Ne) => BinaryOp::Ne,
				Some(TokenKind::Gt) => BinaryOp::Gt,
				Some(TokenKind::Lt) => BinaryOp::Lt,
				_ => break,
			};
			self.advance();
			let right = self.term()?;
			node = Node::binary(op, node, right);
		}

		Some(node)
	}

	fn term(&mut self) -> Option<Node> {
		let mut node = self.factor()?;

		loop {
			let op = match self.kind() {
				Some(TokenKind::Plus) => BinaryOp::Add,
				Some(TokenKind::Minus) => BinaryOp::Sub,
				_ => break,
			};
			self.advance();
			let right = self.factor()?;
			node = Node::binary(op, node, right);
		}

		Some(node)
	}

	fn factor(&mut self) -> Option<Node> {
		let mut node = self.unary()?;

		loop {
			let op = match self.kind() {
				Some(TokenKind::Multiply) => BinaryOp::Mul,
				Some(TokenKind::Divide) => BinaryOp::Div,
				_ => break,
			};
			self.advance();
			let right = self.unary()?;
			node = Node::binary(op, node, right);
		}

		Some(node)
	}

	/// Unary plus is dropped; unary minus lowers to `SUB(0, operand)`.
	fn unary(&mut self) -> Option<Node> {
		match self.kind() {
			Some(TokenKind::Plus) => {
				self.advance();
				self.unary()
			}
			Some(TokenKind::Minus) => {
				self.advance();
				let operand = self.unary()?;
				Some(Node::binary(BinaryOp::Sub, Node::number(0.0), operand))
			}
			_ => self.primary(),
		}
	}

	fn primary(&mut self) -> Option<Node> {
		match self.kind() {
			Some(TokenKind::Number(value)) => {
				let value = *value;
				self.advance();
				Some(Node::number(value))
			}
			Some(TokenKind::Identifier(name)) => {
				let name = name.clone();
				if matches!(self.kind_at(self.pos + 1), Some(TokenKind::LeftParen)) {
					self.advance(); // the function name
					self.advance(); // '('
					let args = self.expression();
					self.expect(&TokenKind::RightParen, "')' after the call argument");
					// Best-effort: the call node is built even if the
					// argument expression failed.
					Some(Node::func_call(name, args))
				} else {
					self.advance();
					Some(Node::variable(name))
				}
			}
			Some(TokenKind::LeftParen) => {
				self.advance();
				let expr = self.expression();
				self.expect(&TokenKind::RightParen, "')' after the expression");
				expr
			}
			_ => {
				self.error(ParseErrorKind::ExpectedExpression { got: self.describe() });
				None
			}
		}
	}

	/// One of the three type keywords, as a [`VarType`].
	fn type_keyword(&mut self) -> Option<VarType> {
		let ty = match self.kind() {
			Some(TokenKind::TypeInt) => VarType::Int,
			Some(TokenKind::TypeChar) => VarType::Char,
			Some(TokenKind::TypeDouble) => VarType::Double,
			_ => {
				self.error(ParseErrorKind::ExpectedType { got: self.describe() });
				return None;
			}
		};
		self.advance();
		Some(ty)
	}

	/// The current identifier's text, consuming the token.
	fn identifier_name(&mut self) -> Option<String> {
		if let Some(TokenKind::Identifier(name)) = self.kind() {
			let name = name.clone();
			self.advance();
			return Some(name);
		}
		self.error(ParseErrorKind::Expected { expected: "an identifier", got: self.describe() });
		None
	}

	fn peek(&self) -> Option<&Token> { self.tokens.get(self.pos) }

	fn kind(&self) -> Option<&TokenKind> { self.peek().map(|token| &token.kind) }

	fn kind_at(&self, pos: usize) -> Option<&TokenKind> { self.tokens.get(pos).map(|token| &token.kind) }

	fn advance(&mut self) {
		if self.pos < self.tokens.len() {
			self.pos += 1;
		}
	}

	/// Kind check ignoring identifier/number payloads.
	fn check(&self, kind: &TokenKind) -> bool {
		self.kind().is_some_and(|current| current.is_same_kind(kind))
	}

	/// Consume the expected token kind, or record a diagnostic and stay put.
	fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> bool {
		if self.check(kind) {
			self.advance();
			return true;
		}
		self.error(ParseErrorKind::Expected { expected, got: self.describe() });
		false
	}

	fn error(&mut self, kind: ParseErrorKind) { self.errors.push(ParseError::new(self.line(), kind)); }

	fn line(&self) -> usize {
		self.peek().or_else(|| self.tokens.last()).map(|token| token.line).unwrap_or(1)
	}

	/// Human-friendly description of the current token for diagnostics.
	fn describe(&self) -> String {
		match self.kind() {
			Some(TokenKind::Identifier(name)) => format!("IDENTIFIER '{name}'"),
			Some(TokenKind::Number(value)) => format!("NUMBER {value}"),
			Some(kind) => kind.name().to_string(),
			None => "EOF".to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{PrikazError, scanner::Scanner};

	fn parse_source(source: &str) -> crate::Result<Node> {
		let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
		assert!(scan_errors.is_empty(), "unexpected scan errors: {scan_errors:?}");
		Parser::new(tokens).parse_program()
	}

	/// Wrap a statement list into the mandatory single-function program.
	fn parse_body(body: &str) -> crate::Result<Node> {
		parse_source(&format!("Здравия_желаю_товарищ старшина f ( ) {{ {body} }}"))
	}

	fn body_of(program: Node) -> Node {
		match program {
			Node::FuncDecl { body, .. } => *body,
			other => panic!("expected a function declaration, got {other:?}"),
		}
	}

	#[test]
	fn end_to_end_function_shape() {
		let program =
			parse_source("Здравия_желаю_товарищ старшина f () { старшина x Назначить 5 ; вольно x ; }")
				.unwrap();
		let expected = Node::func_decl(
			"f",
			VarType::Int,
			None,
			Node::sequence(
				Node::var_decl("x", VarType::Int, Some(Node::number(5.0))),
				Node::return_node(Some(Node::variable("x"))),
			),
		);
		assert_eq!(program, expected);
	}

	#[test]
	fn multiplication_binds_tighter_than_addition() {
		let body =
			body_of(parse_body("вольно 2 Включить_в_состав 3 усилить 4 ;").unwrap());
		let expected = Node::return_node(Some(Node::binary(
			BinaryOp::Add,
			Node::number(2.0),
			Node::binary(BinaryOp::Mul, Node::number(3.0), Node::number(4.0)),
		)));
		assert_eq!(body, expected);
	}

	#[test]
	fn binary_operators_are_left_associative() {
		let body = body_of(
			parse_body("вольно 1 Исключить_из_состава 2 Исключить_из_состава 3 ;").unwrap(),
		);
		let expected = Node::return_node(Some(Node::binary(
			BinaryOp::Sub,
			Node::binary(BinaryOp::Sub, Node::number(1.0), Node::number(2.0)),
			Node::number(3.0),
		)));
		assert_eq!(body, expected);
	}

	#[test]
	fn unary_minus_lowers_to_sub_from_zero() {
		let body = body_of(parse_body("вольно Исключить_из_состава x ;").unwrap());
		let expected = Node::return_node(Some(Node::binary(
			BinaryOp::Sub,
			Node::number(0.0),
			Node::variable("x"),
		)));
		assert_eq!(body, expected);
	}

	#[test]
	fn if_and_while_take_parenthesised_conditions() {
		let body = body_of(
			parse_body(
				"Приготовиться_к_исполнению_по_получении_приказа ( x превосходит_норму 1 ) { x Назначить 0 ; }",
			)
			.unwrap(),
		);
		let expected = Node::if_node(
			Node::binary(BinaryOp::Gt, Node::variable("x"), Node::number(1.0)),
			Node::assign(Node::variable("x"), Node::number(0.0)),
		);
		assert_eq!(body, expected);

		let body = body_of(
			parse_body(
				"Исполнять_пока_не_получите_приказа ( x не_превосходит_норму 3 ) { x Назначить x Включить_в_состав 1 ; }",
			)
			.unwrap(),
		);
		assert!(matches!(body, Node::While { .. }));
	}

	#[test]
	fn call_requires_one_argument_expression() {
		let body = body_of(parse_body("вольно f ( 1 ) ;").unwrap());
		let expected = Node::return_node(Some(Node::func_call("f", Some(Node::number(1.0)))));
		assert_eq!(body, expected);
	}

	#[test]
	fn empty_block_yields_the_empty_marker() {
		let program = parse_body("").unwrap();
		assert_eq!(body_of(program), Node::Empty);
	}

	#[test]
	fn syntax_errors_reject_the_whole_program() {
		// Missing semicolon after the declaration.
		let result = parse_body("старшина x Назначить 5 вольно x ;");
		match result {
			Err(PrikazError::ParseErrors(errors)) => assert!(!errors.is_empty()),
			other => panic!("expected accumulated parse errors, got {other:?}"),
		}
	}

	#[test]
	fn trailing_tokens_are_an_error() {
		let result = parse_source("Здравия_желаю_товарищ старшина f ( ) { } 5");
		assert!(matches!(result, Err(PrikazError::ParseErrors(_))));
	}

	#[test]
	fn bare_identifier_statement_needs_an_assignment() {
		assert!(matches!(parse_body("x ;"), Err(PrikazError::ParseErrors(_))));
	}
}
