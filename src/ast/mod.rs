//! The abstract syntax tree shared by the parser, the text round-trip format,
//! the visualizer and the code generator.
//!
//! `Node` is a proper sum type: each kind carries exactly the fields it
//! needs, so invalid combinations (a number with a name, an empty marker with
//! children) cannot be built at all. The serializer and visualizer still want
//! the classic binary-tree view, so [`Node::left`] and [`Node::right`] map
//! each variant onto its two type-dependent child slots.

use std::fmt;

/// The three primitive type markers a declaration can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
	Int,
	Char,
	Double,
}

impl VarType {
	/// Fixed keyword used on the wire and in dumps.
	pub fn keyword(&self) -> &'static str {
		match self {
			VarType::Int => "int",
			VarType::Char => "char",
			VarType::Double => "double",
		}
	}

	pub fn from_keyword(text: &str) -> Option<Self> {
		match text {
			"int" => Some(VarType::Int),
			"char" => Some(VarType::Char),
			"double" => Some(VarType::Double),
			_ => None,
		}
	}
}

impl fmt::Display for VarType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.keyword()) }
}

/// Binary operators of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	Add,
	Sub,
	Mul,
	Div,
	Eq,
	Ne,
	Gt,
	Lt,
}

impl BinaryOp {
	/// Fixed symbol used on the wire.
	pub fn symbol(&self) -> &'static str {
		use BinaryOp::*;
		match self {
			Add => "+",
			Sub => "-",
			Mul => "*",
			Div => "/",
			Eq => "==",
			Ne => "!=",
			Gt => ">",
			Lt => "<",
		}
	}

	pub fn from_symbol(text: &str) -> Option<Self> {
		use BinaryOp::*;
		match text {
			"+" => Some(Add),
			"-" => Some(Sub),
			"*" => Some(Mul),
			"/" => Some(Div),
			"==" => Some(Eq),
			"!=" => Some(Ne),
			">" => Some(Gt),
			"<" => Some(Lt),
			_ => None,
		}
	}

	pub fn is_comparison(&self) -> bool {
		matches!(self, BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Gt | BinaryOp::Lt)
	}

	/// Display-only precedence class: 1 additive, 2 multiplicative, 3 comparison.
	pub fn priority(&self) -> u8 {
		use BinaryOp::*;
		match self {
			Add | Sub => 1,
			Mul | Div => 2,
			Eq | Ne | Gt | Lt => 3,
		}
	}
}

/// One AST node. Owns its children and any name; the tree is acyclic and
/// strictly owned top-down.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	/// Distinguished "no statement" marker; never has children.
	Empty,
	/// Two statements in order; statement lists fold left, so `first` is
	/// usually another sequence.
	Sequence { first: Box<Node>, rest: Box<Node> },
	Number(f64),
	Variable(String),
	Binary { op: BinaryOp, left: Box<Node>, right: Box<Node> },
	Assign { target: Box<Node>, value: Box<Node> },
	VarDecl { name: String, ty: VarType, init: Option<Box<Node>> },
	/// The single top-level function. `params` is a parsed-as-empty
	/// placeholder; parameter passing is out of scope.
	FuncDecl { name: String, ty: VarType, params: Option<Box<Node>>, body: Box<Node> },
	FuncCall { name: String, args: Option<Box<Node>> },
	If { condition: Box<Node>, body: Box<Node> },
	While { condition: Box<Node>, body: Box<Node> },
	Return(Option<Box<Node>>),
}

impl Node {
	pub fn number(value: f64) -> Self { Node::Number(value) }

	pub fn variable(name: impl Into<String>) -> Self { Node::Variable(name.into()) }

	pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
		Node::Binary { op, left: Box::new(left), right: Box::new(right) }
	}

	pub fn assign(target: Node, value: Node) -> Self {
		Node::Assign { target: Box::new(target), value: Box::new(value) }
	}

	pub fn sequence(first: Node, rest: Node) -> Self {
		Node::Sequence { first: Box::new(first), rest: Box::new(rest) }
	}

	pub fn var_decl(name: impl Into<String>, ty: VarType, init: Option<Node>) -> Self {
		Node::VarDecl { name: name.into(), ty, init: init.map(Box::new) }
	}

	pub fn func_decl(name: impl Into<String>, ty: VarType, params: Option<Node>, body: Node) -> Self {
		Node::FuncDecl { name: name.into(), ty, params: params.map(Box::new), body: Box::new(body) }
	}

	pub fn func_call(name: impl Into<String>, args: Option<Node>) -> Self {
		Node::FuncCall { name: name.into(), args: args.map(Box::new) }
	}

	pub fn if_node(condition: Node, body: Node) -> Self {
		Node::If { condition: Box::new(condition), body: Box::new(body) }
	}

	pub fn while_node(condition: Node, body: Node) -> Self {
		Node::While { condition: Box::new(condition), body: Box::new(body) }
	}

	pub fn return_node(expr: Option<Node>) -> Self { Node::Return(expr.map(Box::new)) }

	/// Left child in the binary-tree view (type-dependent slot).
	pub fn left(&self) -> Option<&Node> {
		match self {
			Node::Sequence { first, .. } => Some(first),
			Node::Binary { left, .. } => Some(left),
			Node::Assign { target, .. } => Some(target),
			Node::VarDecl { init, .. } => init.as_deref(),
			Node::FuncDecl { params, .. } => params.as_deref(),
			Node::FuncCall { args, .. } => args.as_deref(),
			Node::If { condition, .. } | Node::While { condition, .. } => Some(condition),
			Node::Return(expr) => expr.as_deref(),
			Node::Empty | Node::Number(_) | Node::Variable(_) => None,
		}
	}

	/// Right child in the binary-tree view (type-dependent slot).
	pub fn right(&self) -> Option<&Node> {
		match self {
			Node::Sequence { rest, .. } => Some(rest),
			Node::Binary { right, .. } => Some(right),
			Node::Assign { value, .. } => Some(value),
			Node::FuncDecl { body, .. } => Some(body),
			Node::If { body, .. } | Node::While { body, .. } => Some(body),
			Node::Empty
			| Node::Number(_)
			| Node::Variable(_)
			| Node::VarDecl { .. }
			| Node::FuncCall { .. }
			| Node::Return(_) => None,
		}
	}

	/// Display-only precedence class: 0 for leaves and statements, higher for
	/// operators, used by the visualizer.
	pub fn priority(&self) -> u8 {
		match self {
			Node::Binary { op, .. } => op.priority(),
			Node::Assign { .. } => 4,
			_ => 0,
		}
	}

	/// Uppercase kind name used by dumps and diagnostics.
	pub fn kind_name(&self) -> &'static str {
		use BinaryOp::*;
		match self {
			Node::Empty => "EMPTY",
			Node::Sequence { .. } => "SEQUENCE",
			Node::Number(_) => "NUMBER",
			Node::Variable(_) => "VARIABLE",
			Node::Binary { op: Add, .. } => "ADD",
			Node::Binary { op: Sub, .. } => "SUB",
			Node::Binary { op: Mul, .. } => "MUL",
			Node::Binary { op: Div, .. } => "DIV",
			Node::Binary { op: Eq, .. } => "EQ",
			Node::Binary { op: Ne, .. } => "NE",
			Node::Binary { op: Gt, .. } => "GT",
			Node::Binary { op: Lt, .. } => "LT",
			Node::Assign { .. } => "ASSIGNMENT",
			Node::VarDecl { .. } => "VAR_DECL",
			Node::FuncDecl { .. } => "FUNC_DECL",
			Node::FuncCall { .. } => "FUNC_CALL",
			Node::If { .. } => "IF",
			Node::While { .. } => "WHILE",
			Node::Return(_) => "RETURN",
		}
	}

	/// Render the tree as an indented console listing, one node per line.
	pub fn render_tree(&self) -> String {
		let mut out = String::new();
		self.write_tree(&mut out, 0);
		out
	}

	fn write_tree(&self, out: &mut String, depth: usize) {
		for _ in 0..depth {
			out.push_str("  ");
		}
		let line = match self {
			Node::Number(value) => format!("NUMBER: {value}"),
			Node::Variable(name) => format!("VAR: {name}"),
			Node::VarDecl { name, ty, .. } => format!("VAR_DECL: {name} (type: {ty})"),
			Node::FuncDecl { name, ty, .. } => format!("FUNC_DECL: {name} (type: {ty})"),
			Node::FuncCall { name, .. } => format!("FUNC_CALL: {name}"),
			other => other.kind_name().to_string(),
		};
		out.push_str(&line);
		out.push('\n');
		if let Some(left) = self.left() {
			left.write_tree(out, depth + 1);
		}
		if let Some(right) = self.right() {
			right.write_tree(out, depth + 1);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn priorities_match_precedence_classes() {
		let add = Node::binary(BinaryOp::Add, Node::number(1.0), Node::number(2.0));
		let mul = Node::binary(BinaryOp::Mul, Node::number(1.0), Node::number(2.0));
		let cmp = Node::binary(BinaryOp::Lt, Node::number(1.0), Node::number(2.0));
		let assign = Node::assign(Node::variable("x"), Node::number(1.0));
		assert_eq!(add.priority(), 1);
		assert_eq!(mul.priority(), 2);
		assert_eq!(cmp.priority(), 3);
		assert_eq!(assign.priority(), 4);
		assert_eq!(Node::number(5.0).priority(), 0);
		assert_eq!(Node::Empty.priority(), 0);
	}

	#[test]
	fn binary_tree_view_maps_slots() {
		let decl = Node::var_decl("x", VarType::Int, Some(Node::number(5.0)));
		assert_eq!(decl.left(), Some(&Node::Number(5.0)));
		assert_eq!(decl.right(), None);

		let func = Node::func_decl("f", VarType::Int, None, Node::Empty);
		assert_eq!(func.left(), None);
		assert_eq!(func.right(), Some(&Node::Empty));
	}

	#[test]
	fn render_tree_lists_nodes_in_order() {
		let tree = Node::sequence(
			Node::var_decl("x", VarType::Int, Some(Node::number(5.0))),
			Node::return_node(Some(Node::variable("x"))),
		);
		let listing = tree.render_tree();
		let lines: Vec<&str> = listing.lines().collect();
		assert_eq!(lines[0], "SEQUENCE");
		assert_eq!(lines[1], "  VAR_DECL: x (type: int)");
		assert_eq!(lines[2], "    NUMBER: 5");
		assert_eq!(lines[3], "  RETURN");
		assert_eq!(lines[4], "    VAR: x");
	}
}
