//! Graphviz and HTML visualization of the AST.
//!
//! [`dot_graph`] renders a tree as Graphviz digraph text: one HTML-table node
//! per AST node (kind, id, priority, payload, child slots) on a dark
//! background, with LEFT edges in light blue and RIGHT edges in light red.
//! Node ids are assigned in preorder, so the output is deterministic for a
//! given tree.
//!
//! [`DumpSession`] collects several dumps into one self-contained HTML report:
//! each `dump` call writes a `.dot` file, shells out to `dot` for an SVG and
//! appends a section referencing it. A missing `dot` binary downgrades to a
//! stderr warning; the report still links the image it would have produced.

use std::{
	collections::HashMap,
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
	process::Command,
};

use anyhow::Context;

use crate::ast::Node;

/// Render a tree as Graphviz digraph text.
pub fn dot_graph(root: &Node) -> String {
	let mut out = String::new();
	out.push_str("digraph AST {\n");
	out.push_str("    bgcolor=\"#001f29\"\n");
	out.push_str("    rankdir = TB\n");
	out.push_str("    nodesep = 0.5;\n");
	out.push_str("    ranksep = 0.7;\n");
	out.push_str("    node [shape=plaintext, style=filled, fontname=\"Arial\"];\n");
	out.push_str("    edge [fontname=\"Arial\"];\n\n");

	let mut ids = HashMap::new();
	assign_ids(root, &mut ids);
	write_nodes(root, &ids, &mut out);
	write_edges(root, &ids, &mut out);

	out.push_str("}\n");
	out
}

/// Preorder id assignment, keyed by node address. Addresses are unique while
/// the borrow lasts, which is exactly the lifetime of one rendering.
fn assign_ids(node: &Node, ids: &mut HashMap<usize, usize>) {
	let key = node as *const Node as usize;
	let id = ids.len();
	ids.insert(key, id);
	if let Some(left) = node.left() {
		assign_ids(left, ids);
	}
	if let Some(right) = node.right() {
		assign_ids(right, ids);
	}
}

fn id_of(node: &Node, ids: &HashMap<usize, usize>) -> usize {
	ids.get(&(node as *const Node as usize)).copied().unwrap_or(0)
}

fn fill_color(node: &Node) -> &'static str {
	match node {
		Node::Number(_) => "#445c00",
		Node::Variable(_) | Node::VarDecl { .. } => "#2799a0",
		Node::FuncDecl { .. } | Node::FuncCall { .. } => "#5f3035",
		Node::If { .. } | Node::Return(_) => "#8a2be2",
		Node::Binary { .. } => "#9b59b6",
		Node::Sequence { .. } => "#3498db",
		Node::Empty => "#95a5a6",
		Node::Assign { .. } | Node::While { .. } => "#2c3e50",
	}
}

fn write_nodes(node: &Node, ids: &HashMap<usize, usize>, out: &mut String) {
	let id = id_of(node, ids);

	out.push_str(&format!(
		"    node{id} [label=<<TABLE BORDER='1' CELLBORDER='1' CELLSPACING='0'>\n"
	));
	out.push_str(&format!("        <TR><TD COLSPAN='2'><B>{}</B></TD></TR>\n", node.kind_name()));
	out.push_str(&format!("        <TR><TD COLSPAN='2'>id: {id}</TD></TR>\n"));

	if node.priority() > 0 {
		out.push_str(&format!("        <TR><TD COLSPAN='2'>priority: {}</TD></TR>\n", node.priority()));
	}

	match node {
		Node::Number(value) => {
			out.push_str(&format!("        <TR><TD COLSPAN='2'>value: {value}</TD></TR>\n"));
		}
		Node::Variable(name) | Node::FuncCall { name, .. } => {
			write_name_row(name, out);
		}
		Node::VarDecl { name, ty, .. } | Node::FuncDecl { name, ty, .. } => {
			write_name_row(name, out);
			out.push_str(&format!("        <TR><TD COLSPAN='2'>type: {ty}</TD></TR>\n"));
		}
		_ => {}
	}

	out.push_str("        <TR><TD>left</TD><TD>right</TD></TR>\n");
	out.push_str(&format!(
		"        <TR><TD PORT='left'>{}</TD><TD PORT='right'>{}</TD></TR>\n",
		child_cell(node.left(), ids),
		child_cell(node.right(), ids)
	));

	let fill = fill_color(node);
	out.push_str(&format!(
		"    </TABLE>>, fillcolor=\"{fill}\", color=\"#fdfdfd\", fontcolor=\"#fdfdfd\"];\n\n"
	));

	if let Some(left) = node.left() {
		write_nodes(left, ids, out);
	}
	if let Some(right) = node.right() {
		write_nodes(right, ids, out);
	}
}

fn write_name_row(name: &str, out: &mut String) {
	out.push_str(&format!(
		"        <TR><TD COLSPAN='2'>name: <FONT COLOR='yellow'>{}</FONT></TD></TR>\n",
		escape_html(name)
	));
}

fn child_cell(child: Option<&Node>, ids: &HashMap<usize, usize>) -> String {
	match child {
		Some(node) => format!("{}", id_of(node, ids)),
		None => "nil".to_string(),
	}
}

fn write_edges(node: &Node, ids: &HashMap<usize, usize>, out: &mut String) {
	let id = id_of(node, ids);

	if let Some(left) = node.left() {
		out.push_str(&format!(
			"    node{id}:left -> node{} [color=\"#adebff\", penwidth=2, label=\"LEFT\", \
			 fontcolor=\"#adebff\", fontsize=13, arrowsize=0.8];\n",
			id_of(left, ids)
		));
	}
	if let Some(right) = node.right() {
		out.push_str(&format!(
			"    node{id}:right -> node{} [color=\"#ffadb1\", penwidth=2, label=\"RIGHT\", \
			 fontcolor=\"#ffadb1\", fontsize=13, arrowsize=0.8];\n",
			id_of(right, ids)
		));
	}

	if let Some(left) = node.left() {
		write_edges(left, ids, out);
	}
	if let Some(right) = node.right() {
		write_edges(right, ids, out);
	}
}

fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'&' => out.push_str("&amp;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

/// Run `dot -Tsvg` over a written digraph file. A missing or failing `dot`
/// binary is reported on stderr and swallowed.
pub fn render_svg(dot_path: &Path, svg_path: &Path) {
	let status = Command::new("dot")
		.arg("-Tsvg")
		.arg(dot_path)
		.arg("-o")
		.arg(svg_path)
		.status();
	match status {
		Ok(status) if status.success() => {}
		Ok(status) => eprintln!("warning: dot exited with {status} for {}", dot_path.display()),
		Err(e) => eprintln!("warning: could not run dot: {e}"),
	}
}

/// An open HTML report accumulating AST dumps.
pub struct DumpSession {
	html:       File,
	images_dir: PathBuf,
	counter:    usize,
}

impl DumpSession {
	/// Create the report file and its image directory, and write the header.
	pub fn open(html_path: &Path, images_dir: &Path) -> crate::Result<Self> {
		fs::create_dir_all(images_dir)
			.with_context(|| format!("creating image directory {}", images_dir.display()))?;
		let mut html = File::create(html_path)
			.with_context(|| format!("creating dump report {}", html_path.display()))?;

		writeln!(html, "<!DOCTYPE html>")?;
		writeln!(html, "<html lang='ru'>")?;
		writeln!(html, "<head>")?;
		writeln!(html, "<meta charset='UTF-8'>")?;
		writeln!(html, "<title>AST Dumps</title>")?;
		writeln!(html, "<style>")?;
		writeln!(html, "  body {{ background-color: #001f29; color: #ffffff; }}")?;
		writeln!(html, "  .dump {{ border: 2px solid #0099cc; padding: 15px; margin: 10px; }}")?;
		writeln!(html, "  h1, h2, h3 {{ color: #00ccff; }}")?;
		writeln!(html, "  img {{ max-width: 100%; height: auto; margin: 10px; }}")?;
		writeln!(html, "</style>")?;
		writeln!(html, "</head>")?;
		writeln!(html, "<body>")?;
		writeln!(html, "<h1>AST Dumps</h1>")?;

		Ok(Self { html, images_dir: images_dir.to_path_buf(), counter: 1 })
	}

	/// Append one dump: digraph file, SVG render, report section.
	pub fn dump(&mut self, tree: &Node, reason: &str) -> crate::Result<()> {
		let dot_path = self.images_dir.join(format!("dump_{}.dot", self.counter));
		let svg_path = self.images_dir.join(format!("dump_{}.svg", self.counter));

		fs::write(&dot_path, dot_graph(tree))
			.with_context(|| format!("writing {}", dot_path.display()))?;
		render_svg(&dot_path, &svg_path);

		writeln!(self.html, "<div class='dump'>")?;
		writeln!(self.html, "<h2>Dump #{}</h2>", self.counter)?;
		writeln!(self.html, "<p><b>Reason:</b> {}</p>", escape_html(reason))?;
		writeln!(self.html, "<img src='{}' alt='AST Dump #{}'>", svg_path.display(), self.counter)?;
		writeln!(self.html, "</div>")?;
		self.html.flush()?;

		self.counter += 1;
		Ok(())
	}

	/// Write the footer and close the report.
	pub fn close(mut self) -> crate::Result<()> {
		writeln!(self.html, "</body>")?;
		writeln!(self.html, "</html>")?;
		Ok(())
	}
}
