use std::{fs, path::PathBuf};

use prikaz::{CompileOptions, Compiler, parser::Parser, scanner::Scanner, sexpr, sexpr::Reader};

fn sample_path() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("program.prz")
}

#[test]
fn compile_sample_program_end_to_end() {
	let out = std::env::temp_dir().join("prikaz_compile_test");
	fs::create_dir_all(&out).unwrap();
	let ast_path = out.join("tree.txt");
	let asm_path = out.join("program.asm");

	let options = CompileOptions {
		ast_out: Some(ast_path.clone()),
		asm_out: Some(asm_path.clone()),
		..Default::default()
	};
	Compiler.compile_file(sample_path(), &options).unwrap();

	let asm = fs::read_to_string(&asm_path).unwrap();
	assert!(asm.contains(":func_0"), "function entry label:\n{asm}");
	assert!(asm.contains("OUT\nRET\n"), "return lowering:\n{asm}");
	assert!(asm.contains("PUSH -4\n"), "first local slot:\n{asm}");

	// Generating from the saved tree must reproduce the same assembly.
	let asm2_path = out.join("program2.asm");
	Compiler.load_tree(&ast_path, Some(&asm2_path)).unwrap();
	assert_eq!(asm, fs::read_to_string(&asm2_path).unwrap());
}

#[test]
fn saved_tree_round_trips_exactly() {
	let source = fs::read_to_string(sample_path()).unwrap();
	let (tokens, scan_errors) = Scanner::new(&source).scan_tokens();
	assert!(scan_errors.is_empty(), "{scan_errors:?}");

	let tree = Parser::new(tokens).parse_program().unwrap();
	let text = sexpr::write_tree(&tree);
	assert_eq!(Reader::new(&text).parse_tree().unwrap(), tree);
}

#[test]
fn broken_program_reports_but_exits_cleanly() {
	// Missing semicolon; the driver prints the diagnostics and reports success.
	let source = "Здравия_желаю_товарищ старшина f ( ) { старшина x Назначить 5 }";
	let result = Compiler.compile(source, &CompileOptions::default());
	assert!(result.is_ok());
}
