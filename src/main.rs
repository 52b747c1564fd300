use clap::Parser;
use prikaz::{CompileOptions, Compiler, cli::*};

fn main() {
	let compiler = Compiler;

	match Cli::parse().mode {
		Mode::Compile { path, tokens, tree, ast, dot, render, report, asm } => {
			let options = CompileOptions {
				print_tokens: tokens,
				print_tree: tree,
				ast_out: ast,
				dot_out: dot,
				render,
				report,
				asm_out: asm,
			};
			if let Err(e) = compiler.compile_file(&path, &options) {
				eprintln!("Failed compile file: {e}");
			}
		}
		Mode::Load { path, asm } => {
			if let Err(e) = compiler.load_tree(&path, asm.as_deref()) {
				eprintln!("Failed load tree: {e}");
			}
		}
	}
}
