use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "prikaz", after_long_help = "Compiler front end for the Prikaz language.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Compile a source file
	Compile {
		path:   PathBuf,
		/// Print the token table after scanning
		#[arg(long)]
		tokens: bool,
		/// Print the parsed tree as a console listing
		#[arg(long)]
		tree:   bool,
		/// Save the tree in its text format to this file
		#[arg(long)]
		ast:    Option<PathBuf>,
		/// Write a Graphviz digraph of the tree to this file
		#[arg(long)]
		dot:    Option<PathBuf>,
		/// Also render the digraph to SVG (needs `dot` on PATH)
		#[arg(long, requires = "dot")]
		render: bool,
		/// Append the tree to an HTML dump report at this path
		#[arg(long)]
		report: Option<PathBuf>,
		/// Write the generated assembly here instead of stdout
		#[arg(long)]
		asm:    Option<PathBuf>,
	},
	/// Load a saved tree and generate code from it
	Load {
		path: PathBuf,
		/// Write the generated assembly here instead of stdout
		#[arg(long)]
		asm:  Option<PathBuf>,
	},
}
