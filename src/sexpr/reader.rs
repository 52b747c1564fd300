//! Reader for the parenthesized AST text format.
//!
//! Tokens are `(`, `)` and whitespace-separated atoms. The reader dispatches
//! on each node's head token and rebuilds the tree in one pass. It fails fast
//! on the first structural problem, unlike the source-language parser.

use std::{iter::Peekable, str::Chars};

use crate::{
	ast::{BinaryOp, Node, VarType},
	error::sexpr::SexprError,
};

/// One atom or paren with its start position.
struct TextToken {
	text:   String,
	line:   usize,
	column: usize,
}

pub struct Reader<'a> {
	chars:  Peekable<Chars<'a>>,
	line:   usize,
	column: usize,
}

impl<'a> Reader<'a> {
	pub fn new(input: &'a str) -> Self { Self { chars: input.chars().peekable(), line: 1, column: 1 } }

	/// Read one complete tree.
	///
	/// Content after the first tree is ignored with a warning on stderr, so a
	/// file holding one tree plus trailing junk still loads.
	pub fn parse_tree(mut self) -> Result<Node, SexprError> {
		self.skip_spaces();
		if self.chars.peek().is_none() {
			return Err(SexprError::EmptyTree);
		}

		let node = self.parse_node()?.ok_or(SexprError::EmptyTree)?;

		self.skip_spaces();
		if self.chars.peek().is_some() {
			eprintln!("warning: line {}: content after the tree is ignored", self.line);
		}
		Ok(node)
	}

	/// Read one node: either the `nil` marker (`None`) or a `( head ... )`
	/// group dispatched on its head token.
	fn parse_node(&mut self) -> Result<Option<Node>, SexprError> {
		let token = self.next_token().ok_or(self.unexpected_end())?;

		if token.text == "nil" {
			return Ok(None);
		}
		if token.text != "(" {
			// An operator outside parentheses is the classic hand-editing
			// mistake; call it out specifically.
			if Self::is_operator(&token.text) {
				return Err(SexprError::BareOperator {
					symbol: token.text,
					line:   token.line,
					column: token.column,
				});
			}
			return Err(SexprError::UnexpectedToken {
				token:  token.text,
				line:   token.line,
				column: token.column,
			});
		}

		let head = self.next_token().ok_or(self.unexpected_end())?;
		let node = self.parse_body(&head)?;
		self.expect_close()?;
		Ok(Some(node))
	}

	/// Everything between a head token and its closing paren.
	fn parse_body(&mut self, head: &TextToken) -> Result<Node, SexprError> {
		Ok(match head.text.as_str() {
			"empty" => {
				self.no_child(head)?;
				self.no_child(head)?;
				Node::Empty
			}
			";" => {
				let first = self.required_child()?;
				let rest = self.required_child()?;
				Node::sequence(first, rest)
			}
			"=" => {
				let target = self.required_child()?;
				let value = self.required_child()?;
				Node::assign(target, value)
			}
			"if" => {
				let condition = self.required_child()?;
				let body = self.required_child()?;
				Node::if_node(condition, body)
			}
			"while" => {
				let condition = self.required_child()?;
				let body = self.required_child()?;
				Node::while_node(condition, body)
			}
			"ret" => {
				let expr = self.parse_node()?;
				self.no_child(head)?;
				Node::return_node(expr)
			}
			"decl" => {
				let ty = self.type_token()?;
				let name = self.name_token(head)?;
				let init = self.parse_node()?;
				self.no_child(head)?;
				Node::var_decl(name, ty, init)
			}
			"def" => {
				let ty = self.type_token()?;
				let name = self.name_token(head)?;
				let params = self.parse_node()?;
				let body = self.required_child()?;
				Node::func_decl(name, ty, params, body)
			}
			"call" => {
				let name = self.name_token(head)?;
				let args = self.parse_node()?;
				self.no_child(head)?;
				Node::func_call(name, args)
			}
			text => {
				if let Some(op) = BinaryOp::from_symbol(text) {
					let left = self.required_child()?;
					let right = self.required_child()?;
					Node::binary(op, left, right)
				} else {
					// Numbers and variables are leaves; both slots must be nil.
					let node = match text.parse::<f64>() {
						Ok(value) => Node::number(value),
						Err(_) => Node::variable(text),
					};
					self.no_child(head)?;
					self.no_child(head)?;
					node
				}
			}
		})
	}

	/// A child that the node kind cannot do without; a `nil` in that slot
	/// degrades to the empty marker rather than failing.
	fn required_child(&mut self) -> Result<Node, SexprError> {
		Ok(self.parse_node()?.unwrap_or(Node::Empty))
	}

	/// Insist the next child slot holds `nil`.
	fn no_child(&mut self, head: &TextToken) -> Result<(), SexprError> {
		let (line, column) = (self.line, self.column);
		if self.parse_node()?.is_some() {
			return Err(SexprError::UnexpectedChild { head: head.text.clone(), line, column });
		}
		Ok(())
	}

	/// A type keyword following a `decl` or `def` head.
	fn type_token(&mut self) -> Result<VarType, SexprError> {
		let token = self.next_token().ok_or(self.unexpected_end())?;
		match VarType::from_keyword(&token.text) {
			Some(ty) => Ok(ty),
			None => Err(SexprError::UnknownType {
				token:  token.text,
				line:   token.line,
				column: token.column,
			}),
		}
	}

	/// A bare name following a `decl`, `def` or `call` head.
	fn name_token(&mut self, head: &TextToken) -> Result<String, SexprError> {
		let token = self.next_token().ok_or(self.unexpected_end())?;
		if token.text == "(" || token.text == ")" || token.text == "nil" {
			return Err(SexprError::MissingName {
				head:   head.text.clone(),
				line:   token.line,
				column: token.column,
			});
		}
		Ok(token.text)
	}

	fn expect_close(&mut self) -> Result<(), SexprError> {
		match self.next_token() {
			Some(token) if token.text == ")" => Ok(()),
			Some(token) => {
				Err(SexprError::ExpectedClosingParen { line: token.line, column: token.column })
			}
			None => Err(self.unexpected_end()),
		}
	}

	fn is_operator(text: &str) -> bool {
		BinaryOp::from_symbol(text).is_some() || text == "=" || text == ";"
	}

	fn unexpected_end(&self) -> SexprError {
		SexprError::UnexpectedEnd { line: self.line, column: self.column }
	}

	fn next_token(&mut self) -> Option<TextToken> {
		self.skip_spaces();
		let (line, column) = (self.line, self.column);
		let first = *self.chars.peek()?;

		if first == '(' || first == ')' {
			self.advance();
			return Some(TextToken { text: first.to_string(), line, column });
		}

		let mut text = String::new();
		while let Some(&c) = self.chars.peek() {
			if c.is_whitespace() || c == '(' || c == ')' {
				break;
			}
			text.push(c);
			self.advance();
		}
		Some(TextToken { text, line, column })
	}

	fn skip_spaces(&mut self) {
		while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
			self.advance();
		}
	}

	fn advance(&mut self) {
		if let Some(c) = self.chars.next() {
			if c == '\n' {
				self.line += 1;
				self.column = 1;
			} else {
				self.column += 1;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn read(input: &str) -> Result<Node, SexprError> { Reader::new(input).parse_tree() }

	#[test]
	fn reads_a_one_line_leaf() {
		assert_eq!(read("( 5 nil nil )").unwrap(), Node::number(5.0));
		assert_eq!(read("( счётчик nil nil )").unwrap(), Node::variable("счётчик"));
	}

	#[test]
	fn reads_nested_operators() {
		let tree = read("( + ( 1 nil nil ) ( * ( 2 nil nil ) ( 3 nil nil ) ) )").unwrap();
		let expected = Node::binary(
			BinaryOp::Add,
			Node::number(1.0),
			Node::binary(BinaryOp::Mul, Node::number(2.0), Node::number(3.0)),
		);
		assert_eq!(tree, expected);
	}

	#[test]
	fn comparison_symbols_are_recognised() {
		assert!(matches!(
			read("( == ( a nil nil ) ( 1 nil nil ) )").unwrap(),
			Node::Binary { op: BinaryOp::Eq, .. }
		));
		assert!(matches!(
			read("( != ( a nil nil ) ( 1 nil nil ) )").unwrap(),
			Node::Binary { op: BinaryOp::Ne, .. }
		));
	}

	#[test]
	fn decl_head_restores_type_and_name() {
		let tree = read("( decl double эпсилон ( 0.5 nil nil ) nil )").unwrap();
		assert_eq!(tree, Node::var_decl("эпсилон", VarType::Double, Some(Node::number(0.5))));
	}

	#[test]
	fn bare_operator_is_a_dedicated_error() {
		assert!(matches!(read("+"), Err(SexprError::BareOperator { .. })));
		assert!(matches!(read("( + 1 ( 2 nil nil ) )"), Err(SexprError::BareOperator { .. })));
	}

	#[test]
	fn leaf_with_a_subtree_child_is_rejected() {
		let result = read("( 5 ( 1 nil nil ) nil )");
		assert!(matches!(result, Err(SexprError::UnexpectedChild { .. })));
	}

	#[test]
	fn unknown_type_keyword_is_rejected() {
		let result = read("( decl сержант x nil nil )");
		assert!(matches!(result, Err(SexprError::UnknownType { .. })));
	}

	#[test]
	fn missing_name_after_call_head() {
		let result = read("( call nil nil )");
		assert!(matches!(result, Err(SexprError::MissingName { .. })));
	}

	#[test]
	fn blank_input_is_an_empty_tree() {
		assert!(matches!(read("   \n  "), Err(SexprError::EmptyTree)));
		assert!(matches!(read("nil"), Err(SexprError::EmptyTree)));
	}

	#[test]
	fn unterminated_group_fails() {
		assert!(matches!(read("( + ( 1 nil nil ) ( 2 nil nil )"), Err(SexprError::UnexpectedEnd { .. })));
	}
}
