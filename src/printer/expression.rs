//! Expression printing: precedence-aware parenthesization and operator
//! spacing, composite type bodies, and the trailing-callback form.

use crate::ast::*;
use crate::token::{TokenKind, HIGHEST_PREC, LOWEST_PREC, UNARY_PREC};

use super::{Printer, ONE_LINE_FIELD};

/// Spacing analysis over a binary expression tree: whether precedence
/// levels 4 and 5 occur, and the highest precedence at which omitting
/// spaces would glue an operator onto the operand after it (`/*`, `&&`,
/// `&^`, `++`, `--`).
fn walk_binary(e: &BinaryExpr) -> (bool, bool, u8) {
    let prec = e.op.precedence();
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    if let Expr::Binary(l) = e.x.as_ref() {
        if l.op.precedence() >= prec {
            let (h4, h5, mp) = walk_binary(l);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
    }

    match e.y.as_ref() {
        Expr::Binary(r) => {
            if r.op.precedence() >= prec {
                let (h4, h5, mp) = walk_binary(r);
                has4 |= h4;
                has5 |= h5;
                max_problem = max_problem.max(mp);
            }
        }
        Expr::Star(_) => {
            if e.op == TokenKind::Quo {
                // x / *y would read as a comment opener
                max_problem = 5;
            }
        }
        Expr::Unary(u) => {
            let pair = format!("{}{}", e.op.text(), u.op.text());
            match pair.as_str() {
                "/*" | "&&" | "&^" => max_problem = 5,
                "++" | "--" => max_problem = max_problem.max(4),
                _ => {}
            }
        }
        _ => {}
    }

    (has4, has5, max_problem)
}

/// The precedence at and above which binary operators print without
/// surrounding spaces.
fn cutoff(e: &BinaryExpr, depth: usize) -> u8 {
    let (has4, has5, max_problem) = walk_binary(e);
    if max_problem > 0 {
        return max_problem + 1;
    }
    if has4 && has5 {
        if depth == 1 {
            return 5;
        }
        return 4;
    }
    if depth == 1 {
        return 6;
    }
    4
}

fn diff_prec(x: &Expr, prec: u8) -> usize {
    match x {
        Expr::Binary(b) if b.op.precedence() == prec => 0,
        _ => 1,
    }
}

fn reduce_depth(depth: usize) -> usize {
    depth.saturating_sub(1).max(1)
}

impl<'a> Printer<'a> {
    pub(crate) fn expr(&mut self, x: &Expr) {
        self.expr1(x, LOWEST_PREC, 1);
    }

    pub(crate) fn expr_list(&mut self, list: &[Expr]) {
        let tail = std::mem::take(&mut self.tail_do);
        for (i, x) in list.iter().enumerate() {
            if i > 0 {
                self.word(",");
                self.blank();
            }
            if tail && i + 1 == list.len() {
                self.tail_do = true;
            }
            self.expr(x);
            self.tail_do = false;
        }
    }

    pub(crate) fn ident(&mut self, id: &Ident) {
        self.set_pos(id.pos());
        let substitute = self.receiver.as_deref() == Some(id.name.as_str());
        if substitute {
            self.word("self");
        } else {
            self.word(&id.name);
        }
    }

    fn binary_expr(&mut self, x: &BinaryExpr, prec1: u8, depth: usize) {
        let prec = x.op.precedence();
        if prec < prec1 {
            self.word("(");
            self.expr1(&Expr::Binary(x.clone()), LOWEST_PREC, reduce_depth(depth));
            self.word(")");
            return;
        }

        let print_blank = prec < cutoff(x, depth);
        self.expr1(&x.x, prec, depth + diff_prec(&x.x, prec));
        if print_blank {
            self.blank();
        }
        self.set_pos(x.op_pos);
        self.word(x.op.text());
        if print_blank {
            self.blank();
        }
        self.expr1(&x.y, prec + 1, depth + 1);
    }

    pub(crate) fn expr1(&mut self, x: &Expr, prec1: u8, depth: usize) {
        let tail = std::mem::take(&mut self.tail_do);
        self.set_pos(x.pos());

        match x {
            Expr::Bad(_) => self.word("/* bad expression */"),
            Expr::Ident(id) => self.ident(id),
            Expr::BasicLit(lit) => self.word(&lit.value),
            Expr::Ellipsis(e) => {
                self.word("...");
                if let Some(elt) = &e.elt {
                    self.expr1(elt, HIGHEST_PREC, depth);
                }
            }
            Expr::Binary(b) => self.binary_expr(b, prec1, depth),
            Expr::Unary(u) => {
                if UNARY_PREC < prec1 {
                    self.word("(");
                    self.expr1(x, LOWEST_PREC, reduce_depth(depth));
                    self.word(")");
                } else {
                    self.set_pos(u.op_pos);
                    self.word(u.op.text());
                    if u.op == TokenKind::Range {
                        self.blank();
                    }
                    self.expr1(&u.x, UNARY_PREC, depth);
                }
            }
            Expr::Star(s) => {
                if UNARY_PREC < prec1 {
                    self.word("(");
                    self.word("*");
                    self.expr(&s.x);
                    self.word(")");
                } else {
                    self.word("*");
                    self.expr1(&s.x, UNARY_PREC, depth);
                }
            }
            Expr::Paren(p) => {
                if let Expr::Paren(_) = p.x.as_ref() {
                    // collapse doubled parentheses
                    self.expr1(&p.x, prec1, depth);
                } else {
                    self.word("(");
                    self.expr1(&p.x, LOWEST_PREC, reduce_depth(depth));
                    self.word(")");
                }
            }
            Expr::Selector(s) => {
                self.expr1(&s.x, HIGHEST_PREC, depth);
                self.word(".");
                self.ident(&s.sel);
            }
            Expr::TypeAssert(t) => {
                self.expr1(&t.x, HIGHEST_PREC, depth);
                self.word(".(");
                match &t.typ {
                    Some(typ) => self.expr(typ),
                    None => self.word("type"),
                }
                self.word(")");
            }
            Expr::Index(i) => {
                self.expr1(&i.x, HIGHEST_PREC, depth);
                self.word("[");
                self.expr1(&i.index, LOWEST_PREC, depth + 1);
                self.word("]");
            }
            Expr::Slice(s) => {
                self.expr1(&s.x, HIGHEST_PREC, depth);
                self.word("[");
                if let Some(low) = &s.low {
                    self.expr1(low, LOWEST_PREC, depth + 1);
                }
                self.word(":");
                if let Some(high) = &s.high {
                    self.expr1(high, LOWEST_PREC, depth + 1);
                }
                self.word("]");
            }
            Expr::Call(c) => self.call_expr(c, depth, tail),
            Expr::CompositeLit(c) => {
                if let Some(typ) = &c.typ {
                    self.expr1(typ, HIGHEST_PREC, depth);
                }
                self.word("{");
                for (i, elt) in c.elts.iter().enumerate() {
                    if i > 0 {
                        self.word(",");
                        self.blank();
                    }
                    self.expr1(elt, LOWEST_PREC, depth + 1);
                }
                self.word("}");
            }
            Expr::KeyValue(kv) => {
                self.expr1(&kv.key, LOWEST_PREC, depth);
                self.word(":");
                self.blank();
                self.expr1(&kv.value, LOWEST_PREC, depth);
            }
            Expr::FuncLit(f) => {
                self.word("func");
                self.signature(&f.typ.params, f.typ.results.as_ref());
                self.adj_block(&f.body);
            }
            Expr::Func(f) => {
                self.word("func");
                self.signature(&f.typ.params, f.typ.results.as_ref());
            }
            Expr::Array(a) => {
                self.word("[");
                if let Some(len) = &a.len {
                    self.expr(len);
                }
                self.word("]");
                self.expr1(&a.elt, HIGHEST_PREC, depth);
            }
            Expr::Struct(s) => {
                self.set_pos(s.struct_pos);
                self.word("struct");
                self.field_block(&s.fields);
            }
            Expr::Interface(i) => {
                self.set_pos(i.interface_pos);
                self.word("interface");
                self.field_block(&i.methods);
            }
            Expr::Map(m) => {
                self.word("map[");
                self.expr(&m.key);
                self.word("]");
                self.expr1(&m.value, HIGHEST_PREC, depth);
            }
            Expr::Chan(c) => {
                match c.dir {
                    ChanDir::SendRecv => self.word("chan"),
                    ChanDir::Send => self.word("chan<-"),
                    ChanDir::Recv => self.word("<-chan"),
                }
                self.blank();
                self.expr1(&c.value, HIGHEST_PREC, depth);
            }
        }
    }

    /// A call, possibly in the trailing-callback form: when the call is in
    /// tail position and its last argument is a function literal, the
    /// literal moves out of the parentheses behind a `do` keyword.
    fn call_expr(&mut self, c: &CallExpr, depth: usize, tail: bool) {
        self.expr1(&c.fun, HIGHEST_PREC, depth);

        let callback = if tail {
            match c.args.last() {
                Some(Expr::FuncLit(lit)) => Some(lit),
                _ => None,
            }
        } else {
            None
        };

        self.word("(");
        let plain_args = match callback {
            Some(_) => &c.args[..c.args.len() - 1],
            None => &c.args[..],
        };
        for (i, arg) in plain_args.iter().enumerate() {
            if i > 0 {
                self.word(",");
                self.blank();
            }
            self.expr1(arg, LOWEST_PREC, depth + 1);
        }
        if c.ellipsis.is_valid() {
            self.word("...");
        }
        self.word(")");

        if let Some(lit) = callback {
            self.blank();
            self.word("do");
            self.blank();
            self.signature(&lit.typ.params, lit.typ.results.as_ref());
            self.adj_block(&lit.body);
        }
    }

    // ----- struct and interface bodies ------------------------------------

    /// Print a field as it would appear on a single line, for sizing and for
    /// the one-line form.
    fn field_inline(&mut self, field: &Field) {
        match (&field.typ, field.names.is_empty()) {
            // methods carry their signature in the type: name(params) results
            (Expr::Func(f), false) => {
                self.ident_list(&field.names);
                self.signature(&f.typ.params, f.typ.results.as_ref());
            }
            _ => {
                if !field.names.is_empty() {
                    self.ident_list(&field.names);
                    self.blank();
                }
                self.expr(&field.typ);
                if let Some(tag) = &field.tag {
                    self.blank();
                    self.word(&tag.value);
                }
            }
        }
    }

    /// A struct or interface body: nothing for the empty form, `: field` for
    /// a single small uncommented field, an indented aligned list otherwise.
    pub(crate) fn field_block(&mut self, fields: &FieldList) {
        if fields.list.is_empty() {
            return;
        }

        if fields.list.len() == 1 {
            let field = &fields.list[0];
            let small = field.tag.is_none()
                && field.doc.is_none()
                && field.comment.is_none()
                && !self.comment_before(fields.end())
                && self.node_size(field, ONE_LINE_FIELD, |p, f| p.field_inline(f))
                    <= ONE_LINE_FIELD;
            if small {
                self.word(":");
                self.blank();
                self.field_inline(field);
                return;
            }
        }

        self.indent += 1;
        for field in &fields.list {
            self.flush_comments_before(field.pos());
            self.linebreak_to(self.source_line(field.pos()));
            self.field_aligned(field);
            self.print_trailing_comments();
        }
        self.indent -= 1;
        self.request_formfeed();
    }

    /// One field per line, with type and tag in vertical-tab columns.
    fn field_aligned(&mut self, field: &Field) {
        self.set_pos(field.pos());
        match (&field.typ, field.names.is_empty()) {
            (Expr::Func(f), false) => {
                // method spec: name(params) results
                self.ident_list(&field.names);
                self.signature(&f.typ.params, f.typ.results.as_ref());
            }
            _ => {
                if !field.names.is_empty() {
                    self.ident_list(&field.names);
                    self.vtab();
                }
                self.expr(&field.typ);
                if let Some(tag) = &field.tag {
                    self.vtab();
                    self.word(&tag.value);
                }
            }
        }
    }
}
