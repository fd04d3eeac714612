//! Canonical-form emission of declarations and statements.

use crate::ast::*;
use crate::token::TokenKind;

use super::{format_comment_group, Format, FormatterContext};

impl Format for Decl {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        match self {
            Decl::Bad(_) => ctx.write("/* bad declaration */"),
            Decl::Gen(decl) => decl.format(ctx),
            Decl::Func(decl) => decl.format(ctx),
        }
    }
}

impl Format for GenDecl {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        if let Some(doc) = &self.doc {
            format_comment_group(doc, ctx)?;
        }
        ctx.write_indent()?;
        ctx.write(self.tok.text())?;

        if self.is_group() {
            ctx.write(" (")?;
            ctx.write_newline()?;
            ctx.with_indent_block(|ctx| {
                for spec in &self.specs {
                    spec.format(ctx)?;
                }
                Ok(())
            })?;
            ctx.write_indent()?;
            ctx.write(")")
        } else if let Some(spec) = self.specs.first() {
            ctx.write(" ")?;
            format_spec_inline(spec, ctx)
        } else {
            Ok(())
        }
    }
}

impl Format for Spec {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        let (doc, comment) = match self {
            Spec::Import(s) => (&s.doc, &s.comment),
            Spec::Value(s) => (&s.doc, &s.comment),
            Spec::Type(s) => (&s.doc, &s.comment),
        };
        if let Some(doc) = doc {
            format_comment_group(doc, ctx)?;
        }
        ctx.write_indent()?;
        format_spec_inline(self, ctx)?;
        if let Some(comment) = comment {
            if let Some(first) = comment.list.first() {
                ctx.write(" ")?;
                ctx.write(&first.text)?;
            }
        }
        ctx.write_newline()
    }
}

fn format_spec_inline(spec: &Spec, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
    match spec {
        Spec::Import(s) => {
            if let Some(name) = &s.name {
                ctx.write(&name.name)?;
                ctx.write(" ")?;
            }
            ctx.write(&s.path.value)
        }
        Spec::Value(s) => {
            ctx.write_separated(&s.names, ", ", |ctx, name| ctx.write(&name.name))?;
            if let Some(typ) = &s.typ {
                ctx.write(" ")?;
                typ.format(ctx)?;
            }
            if !s.values.is_empty() {
                ctx.write(" = ")?;
                ctx.write_separated(&s.values, ", ", |ctx, value| value.format(ctx))?;
            }
            Ok(())
        }
        Spec::Type(s) => {
            ctx.write(&s.name.name)?;
            ctx.write(" ")?;
            s.typ.format(ctx)
        }
    }
}

impl Format for FuncDecl {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        if let Some(doc) = &self.doc {
            format_comment_group(doc, ctx)?;
        }
        ctx.write_indent()?;
        ctx.write("func ")?;

        if let Some(recv) = &self.recv {
            if let Some(field) = recv.list.first() {
                ctx.write("(")?;
                if let Some(name) = field.names.first() {
                    ctx.write(&name.name)?;
                    ctx.write(" ")?;
                }
                field.typ.format(ctx)?;
                ctx.write(") ")?;
            }
        }

        ctx.write(&self.name.name)?;
        format_signature(&self.typ.params, self.typ.results.as_ref(), ctx)?;

        match &self.body {
            Some(body) => {
                ctx.write(" ")?;
                format_block(body, ctx)
            }
            None => Ok(()),
        }
    }
}

pub(crate) fn format_signature(
    params: &FieldList,
    results: Option<&FieldList>,
    ctx: &mut FormatterContext,
) -> Result<(), std::fmt::Error> {
    ctx.write("(")?;
    ctx.write_separated(&params.list, ", ", |ctx, field| {
        if !field.names.is_empty() {
            ctx.write_separated(&field.names, ", ", |ctx, name| ctx.write(&name.name))?;
            ctx.write(" ")?;
        }
        field.typ.format(ctx)
    })?;
    ctx.write(")")?;

    if let Some(results) = results {
        ctx.write(" ")?;
        let unparenthesized =
            results.list.len() == 1 && results.list[0].names.is_empty() && !results.opening.is_valid();
        if unparenthesized {
            results.list[0].typ.format(ctx)?;
        } else {
            ctx.write("(")?;
            ctx.write_separated(&results.list, ", ", |ctx, field| {
                if !field.names.is_empty() {
                    ctx.write_separated(&field.names, ", ", |ctx, name| ctx.write(&name.name))?;
                    ctx.write(" ")?;
                }
                field.typ.format(ctx)
            })?;
            ctx.write(")")?;
        }
    }
    Ok(())
}

pub(crate) fn format_block(
    block: &BlockStmt,
    ctx: &mut FormatterContext,
) -> Result<(), std::fmt::Error> {
    if block.list.is_empty() {
        return ctx.write("{}");
    }
    ctx.write("{")?;
    ctx.write_newline()?;
    ctx.with_indent_block(|ctx| {
        for stmt in &block.list {
            format_stmt_line(stmt, ctx)?;
        }
        Ok(())
    })?;
    ctx.write_indent()?;
    ctx.write("}")
}

fn format_stmt_line(stmt: &Stmt, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
    if matches!(stmt, Stmt::Empty(_)) {
        return Ok(());
    }
    ctx.write_indent()?;
    stmt.format(ctx)?;
    ctx.write_newline()
}

impl Format for Stmt {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        match self {
            Stmt::Bad(_) => ctx.write("/* bad statement */"),
            Stmt::Decl(decl) => match decl.as_ref() {
                // declarations inside a block start at the current indent,
                // which the caller has already written
                Decl::Gen(gen) => format_gen_decl_inline(gen, ctx),
                other => other.format(ctx),
            },
            Stmt::Empty(_) => Ok(()),
            Stmt::Labeled(s) => {
                ctx.write(&s.label.name)?;
                ctx.write(":")?;
                ctx.write_newline()?;
                ctx.write_indent()?;
                s.stmt.format(ctx)
            }
            Stmt::Expr(s) => s.x.format(ctx),
            Stmt::Send(s) => {
                s.chan.format(ctx)?;
                ctx.write(" <- ")?;
                s.value.format(ctx)
            }
            Stmt::IncDec(s) => {
                s.x.format(ctx)?;
                ctx.write(s.tok.text())
            }
            Stmt::Assign(s) => {
                ctx.write_separated(&s.lhs, ", ", |ctx, x| x.format(ctx))?;
                ctx.write(" ")?;
                ctx.write(s.tok.text())?;
                ctx.write(" ")?;
                ctx.write_separated(&s.rhs, ", ", |ctx, x| x.format(ctx))
            }
            Stmt::Go(s) => {
                ctx.write("go ")?;
                s.call.format(ctx)
            }
            Stmt::Defer(s) => {
                ctx.write("defer ")?;
                s.call.format(ctx)
            }
            Stmt::Return(s) => {
                ctx.write("return")?;
                if !s.results.is_empty() {
                    ctx.write(" ")?;
                    ctx.write_separated(&s.results, ", ", |ctx, x| x.format(ctx))?;
                }
                Ok(())
            }
            Stmt::Branch(s) => {
                ctx.write(s.tok.text())?;
                if let Some(label) = &s.label {
                    ctx.write(" ")?;
                    ctx.write(&label.name)?;
                }
                Ok(())
            }
            Stmt::Block(s) => format_block(s, ctx),
            Stmt::If(s) => format_if(s, ctx),
            Stmt::Case(s) => format_case(s, ctx),
            Stmt::Switch(s) => {
                ctx.write("switch")?;
                if let Some(init) = &s.init {
                    ctx.write(" ")?;
                    init.format(ctx)?;
                    ctx.write(";")?;
                }
                if let Some(tag) = &s.tag {
                    ctx.write(" ")?;
                    tag.format(ctx)?;
                }
                ctx.write(" ")?;
                format_clause_block(&s.body, ctx)
            }
            Stmt::TypeSwitch(s) => {
                ctx.write("switch")?;
                if let Some(init) = &s.init {
                    ctx.write(" ")?;
                    init.format(ctx)?;
                    ctx.write(";")?;
                }
                ctx.write(" ")?;
                s.assign.format(ctx)?;
                ctx.write(" ")?;
                format_clause_block(&s.body, ctx)
            }
            Stmt::Comm(s) => format_comm(s, ctx),
            Stmt::Select(s) => {
                ctx.write("select ")?;
                format_clause_block(&s.body, ctx)
            }
            Stmt::For(s) => {
                ctx.write("for")?;
                if s.init.is_some() || s.post.is_some() {
                    ctx.write(" ")?;
                    if let Some(init) = &s.init {
                        init.format(ctx)?;
                    }
                    ctx.write("; ")?;
                    if let Some(cond) = &s.cond {
                        cond.format(ctx)?;
                    }
                    ctx.write(";")?;
                    if let Some(post) = &s.post {
                        ctx.write(" ")?;
                        post.format(ctx)?;
                    }
                } else if let Some(cond) = &s.cond {
                    ctx.write(" ")?;
                    cond.format(ctx)?;
                }
                ctx.write(" ")?;
                format_block(&s.body, ctx)
            }
            Stmt::Range(s) => {
                ctx.write("for ")?;
                if let Some(key) = &s.key {
                    key.format(ctx)?;
                    if let Some(value) = &s.value {
                        ctx.write(", ")?;
                        value.format(ctx)?;
                    }
                    ctx.write(" ")?;
                    if matches!(s.tok, TokenKind::Assign | TokenKind::Define) {
                        ctx.write(s.tok.text())?;
                        ctx.write(" ")?;
                    }
                }
                ctx.write("range ")?;
                s.x.format(ctx)?;
                ctx.write(" ")?;
                format_block(&s.body, ctx)
            }
        }
    }
}

/// Like `GenDecl::format` but without the leading indent, for statement
/// position.
fn format_gen_decl_inline(decl: &GenDecl, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
    ctx.write(decl.tok.text())?;
    if decl.is_group() {
        ctx.write(" (")?;
        ctx.write_newline()?;
        ctx.with_indent_block(|ctx| {
            for spec in &decl.specs {
                spec.format(ctx)?;
            }
            Ok(())
        })?;
        ctx.write_indent()?;
        ctx.write(")")
    } else if let Some(spec) = decl.specs.first() {
        ctx.write(" ")?;
        format_spec_inline(spec, ctx)
    } else {
        Ok(())
    }
}

fn format_if(s: &IfStmt, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
    ctx.write("if ")?;
    if let Some(init) = &s.init {
        init.format(ctx)?;
        ctx.write("; ")?;
    }
    s.cond.format(ctx)?;
    ctx.write(" ")?;
    format_block(&s.body, ctx)?;

    if let Some(els) = &s.els {
        ctx.write(" else ")?;
        match els {
            Stmt::Block(block) => format_block(block, ctx)?,
            other => other.format(ctx)?,
        }
    }
    Ok(())
}

fn format_clause_block(body: &BlockStmt, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
    if body.list.is_empty() {
        return ctx.write("{}");
    }
    ctx.write("{")?;
    ctx.write_newline()?;
    for clause in &body.list {
        ctx.write_indent()?;
        clause.format(ctx)?;
    }
    ctx.write_indent()?;
    ctx.write("}")
}

fn format_case(s: &CaseClause, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
    if s.list.is_empty() {
        ctx.write("default:")?;
    } else {
        ctx.write("case ")?;
        ctx.write_separated(&s.list, ", ", |ctx, x| x.format(ctx))?;
        ctx.write(":")?;
    }
    ctx.write_newline()?;
    ctx.with_indent_block(|ctx| {
        for stmt in &s.body {
            format_stmt_line(stmt, ctx)?;
        }
        Ok(())
    })
}

fn format_comm(s: &CommClause, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
    match &s.comm {
        Some(comm) => {
            ctx.write("case ")?;
            comm.format(ctx)?;
            ctx.write(":")?;
        }
        None => ctx.write("default:")?,
    }
    ctx.write_newline()?;
    ctx.with_indent_block(|ctx| {
        for stmt in &s.body {
            format_stmt_line(stmt, ctx)?;
        }
        Ok(())
    })
}
