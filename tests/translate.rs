//! Whole-program translations from the indented form to canonical form.

use indigo::formatter;
use indigo::parser::{parse_file, IMPORTS_ONLY, PACKAGE_CLAUSE_ONLY, PARSE_COMMENTS};
use indigo::token::FileSet;

fn translate(src: &str) -> String {
    let fset = FileSet::new();
    let (file, errors) = parse_file(&fset, "input.igo", src, PARSE_COMMENTS);
    assert!(errors.is_empty(), "parse errors: {errors}");
    formatter::format_file(&file.expect("file")).expect("formatting")
}

#[test]
fn hello_world() {
    let out = translate("package main\n\nimport \"fmt\"\n\nfunc main()\n\tfmt.Println(\"hello\")\n");
    assert_eq!(
        out,
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hello\")\n}\n"
    );
}

#[test]
fn control_flow() {
    let out = translate(
        "package main\n\nfunc sign(x int) int\n\tif x > 0: return 1\n\telse if x < 0: return -1\n\telse: return 0\n",
    );
    assert_eq!(
        out,
        "package main\n\nfunc sign(x int) int {\n\tif x > 0 {\n\t\treturn 1\n\t} else if x < 0 {\n\t\treturn -1\n\t} else {\n\t\treturn 0\n\t}\n}\n"
    );
}

#[test]
fn loops_and_labels() {
    let out = translate(
        "package main\n\nfunc first(xs []int) int\n\tloop: for i := 0; i < len(xs); i++\n\t\tif xs[i] > 0: break loop\n\treturn 0\n",
    );
    assert!(out.contains("loop:\n\tfor i := 0; i < len(xs); i++ {"), "{out}");
    assert!(out.contains("break loop"), "{out}");
}

#[test]
fn composite_types() {
    let out = translate(
        "package geometry\n\ntype Point struct: x, y int\n\ntype Circle struct\n\tcenter Point\n\tradius int\n\ntype Stringer interface\n\tString() string\n",
    );
    assert!(out.contains("type Point struct {\n\tx, y int\n}"), "{out}");
    assert!(
        out.contains("type Circle struct {\n\tcenter Point\n\tradius int\n}"),
        "{out}"
    );
    assert!(out.contains("type Stringer interface {\n\tString() string\n}"), "{out}");
}

#[test]
fn channels_and_select() {
    let out = translate(
        "package main\n\nfunc pump(in chan int, out chan<- int)\n\tfor\n\t\tselect\n\t\t\tcase v := <-in\n\t\t\t\tout <- v * 2\n\t\t\tdefault: return\n",
    );
    assert!(out.contains("select {"), "{out}");
    assert!(out.contains("case v := <-in:"), "{out}");
    assert!(out.contains("out <- v * 2"), "{out}");
    assert!(out.contains("default:"), "{out}");
}

#[test]
fn package_clause_only_mode() {
    let fset = FileSet::new();
    let (file, errors) = parse_file(
        &fset,
        "input.igo",
        "package tiny\n\nvar ignored = 1\n",
        PACKAGE_CLAUSE_ONLY,
    );
    assert!(errors.is_empty());
    let file = file.unwrap();
    assert_eq!(file.name.name, "tiny");
    assert!(file.decls.is_empty());
}

#[test]
fn imports_only_mode_skips_bodies() {
    let fset = FileSet::new();
    let src = "package p\n\nimport\n\t\"a\"\n\t\"b\"\n\nfunc broken(\n";
    let (file, errors) = parse_file(&fset, "input.igo", src, IMPORTS_ONLY);
    // the malformed function body is never reached
    assert!(errors.is_empty(), "unexpected errors: {errors}");
    assert_eq!(file.unwrap().imports().len(), 2);
}

#[test]
fn scan_errors_recover() {
    let fset = FileSet::new();
    let src = "package p\n\nvar a = \"unterminated\nvar b = 2\n";
    let (file, errors) = parse_file(&fset, "input.igo", src, 0);
    assert!(!errors.is_empty());
    // parsing continued past the bad literal
    let file = file.expect("partial file");
    assert!(file.decls.len() >= 2);
}
