//! The canonical-form emitter.
//!
//! Walks the same AST the indented-form printer consumes and emits
//! brace-and-semicolon source for the `compile` direction. It is
//! deliberately single-column: no elastic alignment, one statement per
//! line, doc comments above the declarations and fields they belong to.
//! Canonical-form style tooling owns anything fancier.

pub mod context;
mod expression;
mod statement;

pub use context::*;
pub(crate) use statement::{format_block, format_signature};

use crate::ast::{CommentGroup, SourceFile};

pub trait Format {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error>;
}

/// Emit `file` in canonical form, indented with tabs.
pub fn format_file(file: &SourceFile) -> Result<String, std::fmt::Error> {
    format_file_with(file, "\t")
}

/// Emit `file` in canonical form with the given indentation unit.
pub fn format_file_with(file: &SourceFile, indent_unit: &str) -> Result<String, std::fmt::Error> {
    let mut ctx = FormatterContext::with_indent(indent_unit);

    if let Some(doc) = &file.doc {
        format_comment_group(doc, &mut ctx)?;
    }
    ctx.write("package ")?;
    ctx.write(&file.name.name)?;
    ctx.write_newline()?;

    for decl in &file.decls {
        ctx.write_newline()?;
        decl.format(&mut ctx)?;
        ctx.write_newline()?;
    }

    Ok(ctx.output)
}

pub(crate) fn format_comment_group(
    group: &CommentGroup,
    ctx: &mut FormatterContext,
) -> Result<(), std::fmt::Error> {
    for comment in &group.list {
        ctx.write_indent()?;
        ctx.write(&comment.text)?;
        ctx.write_newline()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_file, PARSE_COMMENTS};
    use crate::token::FileSet;

    fn canonical(src: &str) -> String {
        let fset = FileSet::new();
        let (file, errors) = parse_file(&fset, "t.igo", src, PARSE_COMMENTS);
        assert!(errors.is_empty(), "parse errors: {errors}");
        format_file(&file.expect("file")).expect("formatting")
    }

    #[test]
    fn braces_and_lines() {
        let out = canonical("package main\n\nfunc main()\n\tx := 1\n\tprint(x)\n");
        assert_eq!(
            out,
            "package main\n\nfunc main() {\n\tx := 1\n\tprint(x)\n}\n"
        );
    }

    #[test]
    fn method_gets_receiver_parameter() {
        let out = canonical(
            "package p\n\ntype Counter struct: n int\n\nfunc *Counter.inc(): self.n++\n",
        );
        assert!(out.contains("func (self *Counter) inc() {"), "{out}");
        assert!(out.contains("type Counter struct {\n\tn int\n}"), "{out}");
    }

    #[test]
    fn do_sugar_flattens_to_argument() {
        let out = canonical("package p\n\nfunc g()\n\tf(1, 2) do (x int): return x * 2\n");
        assert!(out.contains("f(1, 2, func(x int) {\n\t\treturn x * 2\n\t})"), "{out}");
    }

    #[test]
    fn grouped_imports_get_parens() {
        let out = canonical("package p\n\nimport\n\t\"fmt\"\n\t\"os\"\n");
        assert!(out.contains("import (\n\t\"fmt\"\n\t\"os\"\n)"), "{out}");
    }

    #[test]
    fn doc_comments_survive() {
        let out = canonical("package p\n\n// Answer is the answer.\nconst Answer = 42\n");
        assert!(out.contains("// Answer is the answer.\nconst Answer = 42"), "{out}");
    }
}
