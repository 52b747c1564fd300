//! Stack-machine code generation.
//!
//! Walks the AST and emits text assembly for a small stack machine:
//! `PUSH`/`POPR`/`PUSHM`/`POPM` move values between the stack, the two
//! registers `RAX`/`RBX` and memory; `ADD`/`SUB`/`MUL`/`DIV` operate on the
//! top of the stack; `JE`/`JNE`/`JA`/`JB`/`JMP` target `:label_N` labels,
//! `CALL` targets `:func_N` entry points; `OUT` prints the top of the stack.
//!
//! Generation never fails. A node the generator has no lowering for, or a
//! call to an unknown function, degrades to a `; ...` comment line in the
//! output instead of an error, so a broken tree still yields inspectable
//! assembly.

use crate::ast::{BinaryOp, Node};

/// A named memory slot. Locals live at negative frame offsets, globals at
/// fixed addresses from 1000 upward.
struct VarSlot {
	name:    String,
	local:   bool,
	address: i64,
}

/// A function known to the generator, keyed by its entry label.
pub struct FuncSlot {
	pub name:            String,
	pub start_label:     usize,
	/// Reserved for frame-size accounting; tracked but not yet consumed.
	pub local_var_count: usize,
}

pub struct CodeGen {
	out:            String,
	label_counter:  usize,
	/// Next free global slot index; globals sit at `1000 + 4 * n`.
	global_counter: i64,
	/// Reserved for spilling intermediate values; no lowering uses it yet.
	pub temp_counter: usize,
	vars:           Vec<VarSlot>,
	funcs:          Vec<FuncSlot>,
	in_function:    bool,
}

impl Default for CodeGen {
	fn default() -> Self { Self::new() }
}

impl CodeGen {
	pub fn new() -> Self {
		Self {
			out:            String::new(),
			label_counter:  0,
			global_counter: 0,
			temp_counter:   0,
			vars:           vec![],
			funcs:          vec![],
			in_function:    false,
		}
	}

	/// Lower a whole tree and hand back the assembly text.
	pub fn generate(mut self, root: &Node) -> String {
		self.gen(root);
		self.out
	}

	/// Functions registered while generating, in declaration order.
	pub fn functions(&self) -> &[FuncSlot] { &self.funcs }

	fn gen(&mut self, node: &Node) {
		match node {
			Node::Empty => {}
			Node::Sequence { first, rest } => {
				self.gen(first);
				self.gen(rest);
			}
			Node::Number(_) | Node::Variable(_) | Node::Binary { .. } | Node::FuncCall { .. } => {
				self.gen_expression(node)
			}
			Node::Assign { target, value } => self.gen_assignment(target, value),
			Node::VarDecl { name, init, .. } => self.gen_var_decl(name, init.as_deref()),
			Node::FuncDecl { name, params, body, .. } => self.gen_func_decl(name, params.as_deref(), body),
			Node::If { condition, body } => self.gen_if(condition, body),
			Node::While { condition, body } => self.gen_while(condition, body),
			Node::Return(expr) => self.gen_return(expr.as_deref()),
		}
	}

	/// Lower an expression so that its value ends up on top of the stack.
	fn gen_expression(&mut self, node: &Node) {
		match node {
			Node::Number(value) => self.emit(&format!("PUSH {value}")),
			Node::Variable(name) => {
				let address = self.var_address(name);
				self.emit(&format!("PUSH {address}"));
				self.emit("POPR RAX");
				self.emit("PUSHM RAX");
			}
			Node::Binary { op, left, right } if !op.is_comparison() => {
				self.gen_expression(left);
				self.gen_expression(right);
				let mnemonic = match op {
					BinaryOp::Add => "ADD",
					BinaryOp::Sub => "SUB",
					BinaryOp::Mul => "MUL",
					BinaryOp::Div => "DIV",
					_ => unreachable!("comparisons are handled below"),
				};
				self.emit(mnemonic);
			}
			Node::Binary { op, left, right } => self.gen_comparison(*op, left, right),
			Node::FuncCall { name, .. } => self.gen_func_call(name),
			other => self.emit(&format!("; unsupported expression: {}", other.kind_name())),
		}
	}

	/// Lower `left op right` into a 0/1 value on the stack: subtract, compare
	/// the difference against zero and branch to push the boolean.
	fn gen_comparison(&mut self, op: BinaryOp, left: &Node, right: &Node) {
		self.gen_expression(left);
		self.gen_expression(right);
		self.emit("SUB");

		let jump = match op {
			BinaryOp::Eq => "JE",
			BinaryOp::Ne => "JNE",
			BinaryOp::Gt => "JA",
			BinaryOp::Lt => "JB",
			_ => {
				self.emit(&format!("; unsupported comparison: {}", op.symbol()));
				return;
			}
		};

		let true_label = self.new_label();
		let end_label = self.new_label();

		self.emit("PUSH 0");
		self.emit(&format!("{jump} :label_{true_label}"));
		self.emit("PUSH 0");
		self.emit(&format!("JMP :label_{end_label}"));
		self.emit(&format!(":label_{true_label}"));
		self.emit("PUSH 1");
		self.emit(&format!(":label_{end_label}"));
	}

	/// Store the top of the stack into the target variable's slot.
	fn gen_assignment(&mut self, target: &Node, value: &Node) {
		self.gen_expression(value);

		if let Node::Variable(name) = target {
			let address = self.var_address(name);
			self.store_to(address);
		} else {
			self.emit(&format!("; unsupported assignment target: {}", target.kind_name()));
		}
	}

	fn gen_var_decl(&mut self, name: &str, init: Option<&Node>) {
		let local = self.in_function;
		let address = self.add_variable(name, local);

		if let Some(init) = init {
			self.gen_expression(init);
			self.store_to(address);
		}
	}

	fn gen_if(&mut self, condition: &Node, body: &Node) {
		let false_label = self.new_label();
		let end_label = self.new_label();

		self.gen_expression(condition);
		self.emit("PUSH 0");
		self.emit(&format!("JE :label_{false_label}"));
		self.gen(body);
		self.emit(&format!("JMP :label_{end_label}"));
		self.emit(&format!(":label_{false_label}"));
		self.emit(&format!(":label_{end_label}"));
	}

	fn gen_while(&mut self, condition: &Node, body: &Node) {
		let start_label = self.new_label();
		let end_label = self.new_label();

		self.emit(&format!(":label_{start_label}"));
		self.gen_expression(condition);
		self.emit("PUSH 0");
		self.emit(&format!("JE :label_{end_label}"));
		self.gen(body);
		self.emit(&format!("JMP :label_{start_label}"));
		self.emit(&format!(":label_{end_label}"));
	}

	fn gen_func_decl(&mut self, name: &str, params: Option<&Node>, body: &Node) {
		let func_label = self.add_function(name);

		self.emit("");
		self.emit(&format!("; === function {name} ==="));
		self.emit(&format!(":func_{func_label}"));

		self.in_function = true;
		self.emit("; prologue");

		if params.is_some() {
			self.emit("; parameters:");
		}

		self.gen(body);

		// A body that falls off the end still returns.
		self.emit("RET");
		self.in_function = false;
	}

	fn gen_func_call(&mut self, name: &str) {
		let label = self.funcs.iter().find(|f| f.name == name).map(|f| f.start_label);
		match label {
			Some(label) => self.emit(&format!("CALL :func_{label}")),
			None => self.emit(&format!("; error: function '{name}' is not defined")),
		}
	}

	fn gen_return(&mut self, expr: Option<&Node>) {
		match expr {
			Some(expr) => self.gen_expression(expr),
			None => self.emit("PUSH 0"),
		}
		self.emit("OUT");
		self.emit("RET");
	}

	/// Pop the value on top of the stack into memory at `address`.
	fn store_to(&mut self, address: i64) {
		self.emit("POPR RBX");
		self.emit(&format!("PUSH {address}"));
		self.emit("POPR RAX");
		self.emit("POPM RAX");
	}

	fn emit(&mut self, line: &str) {
		self.out.push_str(line);
		self.out.push('\n');
	}

	fn new_label(&mut self) -> usize {
		let label = self.label_counter;
		self.label_counter += 1;
		label
	}

	/// Register a variable and return its address; re-declaring the same name
	/// in the same storage class reuses the existing slot.
	fn add_variable(&mut self, name: &str, local: bool) -> i64 {
		if let Some(slot) = self.vars.iter().find(|v| v.name == name && v.local == local) {
			return slot.address;
		}

		let address = if local {
			-((self.vars.len() as i64 + 1) * 4)
		} else {
			let address = 1000 + self.global_counter * 4;
			self.global_counter += 1;
			address
		};

		if local {
			if let Some(func) = self.funcs.last_mut() {
				func.local_var_count += 1;
			}
		}

		self.vars.push(VarSlot { name: name.to_string(), local, address });
		address
	}

	fn add_function(&mut self, name: &str) -> usize {
		if let Some(func) = self.funcs.iter().find(|f| f.name == name) {
			return func.start_label;
		}

		let start_label = self.new_label();
		self.funcs.push(FuncSlot { name: name.to_string(), start_label, local_var_count: 0 });
		start_label
	}

	/// Address of a variable reference. Locals shadow globals while inside a
	/// function; a name never declared becomes a fresh global slot.
	fn var_address(&mut self, name: &str) -> i64 {
		if self.in_function {
			if let Some(slot) = self.vars.iter().find(|v| v.name == name && v.local) {
				return slot.address;
			}
		}
		if let Some(slot) = self.vars.iter().find(|v| v.name == name && !v.local) {
			return slot.address;
		}
		self.add_variable(name, false)
	}
}

/// Lower a tree with a fresh generator.
pub fn generate(root: &Node) -> String { CodeGen::new().generate(root) }

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ast::VarType;

	fn lines(asm: &str) -> Vec<&str> { asm.lines().collect() }

	#[test]
	fn number_and_arithmetic_are_postfix() {
		let tree = Node::binary(
			BinaryOp::Add,
			Node::number(2.0),
			Node::binary(BinaryOp::Mul, Node::number(3.0), Node::number(4.0)),
		);
		assert_eq!(generate(&tree), "PUSH 2\nPUSH 3\nPUSH 4\nMUL\nADD\n");
	}

	#[test]
	fn comparison_emits_two_fresh_labels() {
		let tree = Node::binary(BinaryOp::Gt, Node::number(1.0), Node::number(2.0));
		let asm = generate(&tree);
		let expected = [
			"PUSH 1", "PUSH 2", "SUB", "PUSH 0", "JA :label_0", "PUSH 0", "JMP :label_1", ":label_0",
			"PUSH 1", ":label_1",
		];
		assert_eq!(lines(&asm), expected);
	}

	#[test]
	fn locals_get_negative_offsets_globals_start_at_1000() {
		let tree = Node::func_decl(
			"f",
			VarType::Int,
			None,
			Node::sequence(
				Node::var_decl("a", VarType::Int, Some(Node::number(1.0))),
				Node::var_decl("b", VarType::Int, Some(Node::number(2.0))),
			),
		);
		let asm = generate(&tree);
		assert!(asm.contains("PUSH -4\n"), "first local at -4:\n{asm}");
		assert!(asm.contains("PUSH -8\n"), "second local at -8:\n{asm}");

		let global = generate(&Node::var_decl("g", VarType::Int, Some(Node::number(0.0))));
		assert!(global.contains("PUSH 1000\n"), "first global at 1000:\n{global}");
	}

	#[test]
	fn redeclaring_a_name_reuses_its_slot() {
		let tree = Node::sequence(
			Node::var_decl("g", VarType::Int, Some(Node::number(1.0))),
			Node::var_decl("g", VarType::Int, Some(Node::number(2.0))),
		);
		let asm = generate(&tree);
		assert_eq!(asm.matches("PUSH 1000").count(), 2);
		assert!(!asm.contains("PUSH 1004"));
	}

	#[test]
	fn while_loop_jumps_back_to_its_start() {
		let tree = Node::while_node(
			Node::binary(BinaryOp::Gt, Node::variable("x"), Node::number(0.0)),
			Node::assign(
				Node::variable("x"),
				Node::binary(BinaryOp::Sub, Node::variable("x"), Node::number(1.0)),
			),
		);
		let asm = generate(&tree);
		assert!(asm.starts_with(":label_0\n"));
		assert!(asm.contains("JMP :label_0\n"));
		assert!(asm.contains("JE :label_1\n"));
		assert!(asm.ends_with(":label_1\n"));
	}

	#[test]
	fn call_to_unknown_function_degrades_to_a_comment() {
		let asm = generate(&Node::func_call("призрак", None));
		assert_eq!(asm, "; error: function 'призрак' is not defined\n");
	}

	#[test]
	fn function_body_gets_entry_label_and_trailing_ret() {
		let tree = Node::func_decl(
			"f",
			VarType::Int,
			None,
			Node::return_node(Some(Node::number(7.0))),
		);
		let asm = generate(&tree);
		assert!(asm.contains("; === function f ===\n:func_0\n; prologue\n"));
		assert!(asm.contains("PUSH 7\nOUT\nRET\n"));
		assert!(asm.ends_with("RET\n"));
	}

	#[test]
	fn return_without_expression_pushes_zero() {
		let asm = generate(&Node::return_node(None));
		assert_eq!(asm, "PUSH 0\nOUT\nRET\n");
	}
}
