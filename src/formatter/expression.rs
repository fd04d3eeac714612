//! Canonical-form emission of expressions and types.

use crate::ast::*;

use super::{format_block, format_signature, Format, FormatterContext};

/// Parenthesize `x` when its own binding is looser than `min_prec`.
fn format_operand(
    x: &Expr,
    min_prec: u8,
    ctx: &mut FormatterContext,
) -> Result<(), std::fmt::Error> {
    let needs_parens = matches!(x, Expr::Binary(b) if b.op.precedence() < min_prec);
    if needs_parens {
        ctx.write("(")?;
        x.format(ctx)?;
        ctx.write(")")
    } else {
        x.format(ctx)
    }
}

impl Format for Expr {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        match self {
            Expr::Bad(_) => ctx.write("/* bad expression */"),
            Expr::Ident(id) => ctx.write(&id.name),
            Expr::BasicLit(lit) => ctx.write(&lit.value),
            Expr::Ellipsis(e) => {
                ctx.write("...")?;
                match &e.elt {
                    Some(elt) => elt.format(ctx),
                    None => Ok(()),
                }
            }
            Expr::Binary(b) => {
                let prec = b.op.precedence();
                format_operand(&b.x, prec, ctx)?;
                ctx.write(" ")?;
                ctx.write(b.op.text())?;
                ctx.write(" ")?;
                format_operand(&b.y, prec + 1, ctx)
            }
            Expr::Unary(u) => {
                ctx.write(u.op.text())?;
                format_operand(&u.x, crate::token::UNARY_PREC, ctx)
            }
            Expr::Star(s) => {
                ctx.write("*")?;
                format_operand(&s.x, crate::token::UNARY_PREC, ctx)
            }
            Expr::Paren(p) => {
                ctx.write("(")?;
                p.x.format(ctx)?;
                ctx.write(")")
            }
            Expr::Selector(s) => {
                format_operand(&s.x, crate::token::HIGHEST_PREC, ctx)?;
                ctx.write(".")?;
                ctx.write(&s.sel.name)
            }
            Expr::TypeAssert(t) => {
                format_operand(&t.x, crate::token::HIGHEST_PREC, ctx)?;
                ctx.write(".(")?;
                match &t.typ {
                    Some(typ) => typ.format(ctx)?,
                    None => ctx.write("type")?,
                }
                ctx.write(")")
            }
            Expr::Index(i) => {
                format_operand(&i.x, crate::token::HIGHEST_PREC, ctx)?;
                ctx.write("[")?;
                i.index.format(ctx)?;
                ctx.write("]")
            }
            Expr::Slice(s) => {
                format_operand(&s.x, crate::token::HIGHEST_PREC, ctx)?;
                ctx.write("[")?;
                if let Some(low) = &s.low {
                    low.format(ctx)?;
                }
                ctx.write(":")?;
                if let Some(high) = &s.high {
                    high.format(ctx)?;
                }
                ctx.write("]")
            }
            Expr::Call(c) => {
                format_operand(&c.fun, crate::token::HIGHEST_PREC, ctx)?;
                ctx.write("(")?;
                ctx.write_separated(&c.args, ", ", |ctx, arg| arg.format(ctx))?;
                if c.ellipsis.is_valid() {
                    ctx.write("...")?;
                }
                ctx.write(")")
            }
            Expr::CompositeLit(c) => {
                if let Some(typ) = &c.typ {
                    typ.format(ctx)?;
                }
                ctx.write("{")?;
                ctx.write_separated(&c.elts, ", ", |ctx, elt| elt.format(ctx))?;
                ctx.write("}")
            }
            Expr::KeyValue(kv) => {
                kv.key.format(ctx)?;
                ctx.write(": ")?;
                kv.value.format(ctx)
            }
            Expr::FuncLit(f) => {
                ctx.write("func")?;
                format_signature(&f.typ.params, f.typ.results.as_ref(), ctx)?;
                ctx.write(" ")?;
                format_block(&f.body, ctx)
            }
            Expr::Func(f) => {
                ctx.write("func")?;
                format_signature(&f.typ.params, f.typ.results.as_ref(), ctx)
            }
            Expr::Array(a) => {
                ctx.write("[")?;
                if let Some(len) = &a.len {
                    len.format(ctx)?;
                }
                ctx.write("]")?;
                a.elt.format(ctx)
            }
            Expr::Struct(s) => format_field_block("struct", &s.fields, ctx),
            Expr::Interface(i) => format_field_block("interface", &i.methods, ctx),
            Expr::Map(m) => {
                ctx.write("map[")?;
                m.key.format(ctx)?;
                ctx.write("]")?;
                m.value.format(ctx)
            }
            Expr::Chan(c) => {
                match c.dir {
                    ChanDir::SendRecv => ctx.write("chan ")?,
                    ChanDir::Send => ctx.write("chan<- ")?,
                    ChanDir::Recv => ctx.write("<-chan ")?,
                }
                c.value.format(ctx)
            }
        }
    }
}

fn format_field_block(
    keyword: &str,
    fields: &FieldList,
    ctx: &mut FormatterContext,
) -> Result<(), std::fmt::Error> {
    if fields.list.is_empty() {
        ctx.write(keyword)?;
        return ctx.write("{}");
    }

    ctx.write(keyword)?;
    ctx.write(" {")?;
    ctx.write_newline()?;
    ctx.with_indent_block(|ctx| {
        for field in &fields.list {
            if let Some(doc) = &field.doc {
                super::format_comment_group(doc, ctx)?;
            }
            ctx.write_indent()?;
            field.format(ctx)?;
            if let Some(comment) = &field.comment {
                if let Some(first) = comment.list.first() {
                    ctx.write(" ")?;
                    ctx.write(&first.text)?;
                }
            }
            ctx.write_newline()?;
        }
        Ok(())
    })?;
    ctx.write_indent()?;
    ctx.write("}")
}

impl Format for Field {
    fn format(&self, ctx: &mut FormatterContext) -> Result<(), std::fmt::Error> {
        match (&self.typ, self.names.is_empty()) {
            // interface method: name(params) results
            (Expr::Func(f), false) => {
                ctx.write_separated(&self.names, ", ", |ctx, name| ctx.write(&name.name))?;
                format_signature(&f.typ.params, f.typ.results.as_ref(), ctx)
            }
            _ => {
                if !self.names.is_empty() {
                    ctx.write_separated(&self.names, ", ", |ctx, name| ctx.write(&name.name))?;
                    ctx.write(" ")?;
                }
                self.typ.format(ctx)?;
                if let Some(tag) = &self.tag {
                    ctx.write(" ")?;
                    ctx.write(&tag.value)?;
                }
                Ok(())
            }
        }
    }
}
