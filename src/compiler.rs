use std::{
	fs,
	fs::read_to_string,
	path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
	PrikazError,
	ast::Node,
	codegen,
	dump::{self, DumpSession},
	parser::Parser,
	scanner::{Scanner, print_token_table},
	sexpr,
	sexpr::Reader,
};

/// What to produce besides the generated assembly.
#[derive(Default)]
pub struct CompileOptions {
	/// Print the token table after scanning.
	pub print_tokens: bool,
	/// Print the parsed tree as an indented console listing.
	pub print_tree:   bool,
	/// Save the tree in its text format to this file.
	pub ast_out:      Option<PathBuf>,
	/// Write a Graphviz digraph of the tree to this file.
	pub dot_out:      Option<PathBuf>,
	/// Also render the digraph to SVG next to it.
	pub render:       bool,
	/// Append the tree to an HTML dump report at this path.
	pub report:       Option<PathBuf>,
	/// Write the generated assembly here instead of stdout.
	pub asm_out:      Option<PathBuf>,
}

/// Compiler is the pipeline driver: scan, parse, then emit whichever outputs
/// were asked for.
pub struct Compiler;

impl Compiler {
	pub fn compile_file<P: AsRef<Path>>(&self, path: P, options: &CompileOptions) -> crate::Result<()> {
		let source = read_to_string(path).context("Failed open source file")?;
		self.compile(&source, options)
	}

	/// Compile one source text.
	///
	/// Lexical diagnostics go to stderr and scanning continues. Syntax errors
	/// also go to stderr, reject the whole program and skip every back-end
	/// output, but still count as a normal run: the `Ok(())` keeps the exit
	/// code at zero, matching the front end's report-and-stop contract.
	pub fn compile(&self, source: &str, options: &CompileOptions) -> crate::Result<()> {
		let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
		for error in &scan_errors {
			eprintln!("{error}");
		}
		if options.print_tokens {
			print_token_table(&tokens);
		}

		let tree = match Parser::new(tokens).parse_program() {
			Ok(tree) => tree,
			Err(PrikazError::ParseErrors(errors)) => {
				for error in &errors {
					eprintln!("{error}");
				}
				eprintln!("parsing finished with {} error(s); nothing generated", errors.len());
				return Ok(());
			}
			Err(e) => return Err(e),
		};

		if options.print_tree {
			print!("{}", tree.render_tree());
		}

		if let Some(path) = &options.ast_out {
			fs::write(path, sexpr::write_tree(&tree))
				.with_context(|| format!("Failed write tree to {}", path.display()))?;
		}

		if let Some(path) = &options.dot_out {
			fs::write(path, dump::dot_graph(&tree))
				.with_context(|| format!("Failed write digraph to {}", path.display()))?;
			if options.render {
				dump::render_svg(path, &path.with_extension("svg"));
			}
		}

		if let Some(path) = &options.report {
			let mut session = DumpSession::open(path, Path::new("ast_images"))?;
			session.dump(&tree, "compiled tree")?;
			session.close()?;
		}

		self.emit_asm(&tree, options.asm_out.as_deref())
	}

	/// Load a tree saved in the text format and generate code from it,
	/// skipping the front end entirely.
	pub fn load_tree(&self, path: &Path, asm_out: Option<&Path>) -> crate::Result<()> {
		let text = read_to_string(path).context("Failed open tree file")?;
		let tree = Reader::new(&text).parse_tree()?;
		self.emit_asm(&tree, asm_out)
	}

	fn emit_asm(&self, tree: &Node, asm_out: Option<&Path>) -> crate::Result<()> {
		let asm = codegen::generate(tree);
		match asm_out {
			Some(path) => fs::write(path, asm)
				.with_context(|| format!("Failed write assembly to {}", path.display()))?,
			None => print!("{asm}"),
		}
		Ok(())
	}
}
