//! Parenthesized text round-trip format for the AST.
//!
//! Every node is written as `( head left right )` where an absent child is the
//! literal token `nil`. Leaves with no children collapse onto one line; an
//! interior node puts each child on its own line, indented by two spaces per
//! depth level. Heads are fixed per node kind:
//!
//! | node          | head                    |
//! |---------------|-------------------------|
//! | empty marker  | `empty`                 |
//! | sequence      | `;`                     |
//! | number        | its decimal value       |
//! | variable      | its name                |
//! | binary op     | `+ - * / == != > <`     |
//! | assignment    | `=`                     |
//! | var decl      | `decl <type> <name>`    |
//! | func decl     | `def <type> <name>`     |
//! | func call     | `call <name>`           |
//! | if            | `if`                    |
//! | while         | `while`                 |
//! | return        | `ret`                   |
//!
//! Declarations and calls carry their name (and type keyword) inside the head
//! so a saved tree reads back to exactly the tree that was written. Writing
//! never fails; reading fails fast with a [`SexprError`](crate::error::sexpr::SexprError).

mod reader;

pub use reader::Reader;

use crate::ast::Node;

/// Serialize a tree into the parenthesized text format.
pub fn write_tree(node: &Node) -> String {
	let mut out = String::new();
	write_node(node, 0, &mut out);
	out.push('\n');
	out
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
	let head = head_text(node);

	if node.left().is_none() && node.right().is_none() {
		out.push_str(&format!("( {head} nil nil )"));
		return;
	}

	out.push_str(&format!("( {head}\n"));
	write_child(node.left(), depth + 1, out);
	write_child(node.right(), depth + 1, out);
	indent(depth, out);
	out.push(')');
}

fn write_child(child: Option<&Node>, depth: usize, out: &mut String) {
	indent(depth, out);
	match child {
		Some(node) => write_node(node, depth, out),
		None => out.push_str("nil"),
	}
	out.push('\n');
}

fn indent(depth: usize, out: &mut String) {
	for _ in 0..depth {
		out.push_str("  ");
	}
}

/// The head token(s) identifying a node kind on the wire.
fn head_text(node: &Node) -> String {
	match node {
		Node::Empty => "empty".to_string(),
		Node::Sequence { .. } => ";".to_string(),
		Node::Number(value) => format!("{value}"),
		Node::Variable(name) => name.clone(),
		Node::Binary { op, .. } => op.symbol().to_string(),
		Node::Assign { .. } => "=".to_string(),
		Node::VarDecl { name, ty, .. } => format!("decl {} {name}", ty.keyword()),
		Node::FuncDecl { name, ty, .. } => format!("def {} {name}", ty.keyword()),
		Node::FuncCall { name, .. } => format!("call {name}"),
		Node::If { .. } => "if".to_string(),
		Node::While { .. } => "while".to_string(),
		Node::Return(_) => "ret".to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ast::{BinaryOp, VarType};

	fn round_trip(node: &Node) -> Node {
		let text = write_tree(node);
		Reader::new(&text).parse_tree().unwrap_or_else(|e| panic!("round trip failed on:\n{text}\n{e}"))
	}

	#[test]
	fn leaves_collapse_onto_one_line() {
		assert_eq!(write_tree(&Node::number(5.0)), "( 5 nil nil )\n");
		assert_eq!(write_tree(&Node::variable("x")), "( x nil nil )\n");
		assert_eq!(write_tree(&Node::Empty), "( empty nil nil )\n");
	}

	#[test]
	fn interior_nodes_indent_children() {
		let tree = Node::binary(BinaryOp::Add, Node::number(1.0), Node::number(2.0));
		assert_eq!(write_tree(&tree), "( +\n  ( 1 nil nil )\n  ( 2 nil nil )\n)\n");
	}

	#[test]
	fn declarations_carry_type_and_name_in_the_head() {
		let decl = Node::var_decl("x", VarType::Int, Some(Node::number(5.0)));
		assert_eq!(write_tree(&decl), "( decl int x\n  ( 5 nil nil )\n  nil\n)\n");
	}

	#[test]
	fn full_program_round_trips() {
		let program = Node::func_decl(
			"проверка",
			VarType::Int,
			None,
			Node::sequence(
				Node::var_decl("x", VarType::Int, Some(Node::number(5.0))),
				Node::sequence(
					Node::while_node(
						Node::binary(BinaryOp::Gt, Node::variable("x"), Node::number(0.0)),
						Node::assign(
							Node::variable("x"),
							Node::binary(BinaryOp::Sub, Node::variable("x"), Node::number(1.0)),
						),
					),
					Node::return_node(Some(Node::func_call("итог", Some(Node::variable("x"))))),
				),
			),
		);
		assert_eq!(round_trip(&program), program);
	}

	#[test]
	fn comparison_operators_round_trip() {
		for op in [BinaryOp::Eq, BinaryOp::Ne, BinaryOp::Gt, BinaryOp::Lt] {
			let tree = Node::binary(op, Node::variable("a"), Node::number(2.0));
			assert_eq!(round_trip(&tree), tree);
		}
	}

	#[test]
	fn empty_body_round_trips() {
		let tree = Node::func_decl("f", VarType::Double, None, Node::Empty);
		assert_eq!(round_trip(&tree), tree);
	}
}
