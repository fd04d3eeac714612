//! Declaration, spec, and signature printing.

use crate::ast::*;

use super::Printer;

impl<'a> Printer<'a> {
    pub(crate) fn decl(&mut self, d: &Decl) {
        match d {
            Decl::Bad(b) => {
                self.set_pos(b.from);
                self.word("/* bad declaration */");
            }
            Decl::Gen(d) => self.gen_decl(d),
            Decl::Func(d) => self.func_decl(d),
        }
    }

    fn gen_decl(&mut self, d: &GenDecl) {
        self.set_pos(d.tok_pos);
        self.word(d.tok.text());

        if d.is_group() {
            let keep_type = keep_type_column(&d.specs);
            self.indent += 1;
            for (i, spec) in d.specs.iter().enumerate() {
                self.flush_comments_before(spec.pos());
                self.linebreak_to(self.source_line(spec.pos()));
                self.spec(spec, true, keep_type[i]);
                self.print_trailing_comments();
            }
            self.indent -= 1;
            // close the alignment section with the group
            self.request_formfeed();
        } else if let Some(spec) = d.specs.first() {
            self.blank();
            self.spec(spec, false, false);
        }
    }

    fn spec(&mut self, spec: &Spec, group: bool, keep_type: bool) {
        match spec {
            Spec::Import(s) => self.import_spec(s),
            Spec::Value(s) => self.value_spec(s, group, keep_type),
            Spec::Type(s) => self.type_spec(s, group),
        }
    }

    fn import_spec(&mut self, s: &ImportSpec) {
        if let Some(name) = &s.name {
            self.ident(name);
            self.blank();
        }
        self.set_pos(s.path.pos());
        self.word(&s.path.value);
    }

    /// In a group, name/type/value columns are separated by vertical tabs so
    /// runs of specs align. `keep_type` forces an empty type cell so values
    /// stay in their column when other specs in the run carry a type.
    fn value_spec(&mut self, s: &ValueSpec, group: bool, keep_type: bool) {
        self.ident_list(&s.names);

        if group {
            if s.typ.is_some() || keep_type {
                self.vtab();
            }
            if let Some(typ) = &s.typ {
                self.expr(typ);
            }
            if !s.values.is_empty() {
                self.vtab();
                self.word("=");
                self.blank();
                self.expr_list(&s.values);
            }
        } else {
            if let Some(typ) = &s.typ {
                self.blank();
                self.expr(typ);
            }
            if !s.values.is_empty() {
                self.blank();
                self.word("=");
                self.blank();
                self.expr_list(&s.values);
            }
        }
    }

    fn type_spec(&mut self, s: &TypeSpec, group: bool) {
        self.ident(&s.name);
        if group {
            self.vtab();
        } else {
            self.blank();
        }
        self.expr(&s.typ);
    }

    fn func_decl(&mut self, d: &FuncDecl) {
        self.set_pos(d.typ.func_pos);
        self.word("func");
        self.blank();

        if let Some(recv) = &d.recv {
            if let Some(field) = recv.list.first() {
                self.expr(&field.typ);
                self.word(".");
            }
        }
        self.ident(&d.name);
        self.signature(&d.typ.params, d.typ.results.as_ref());

        if let Some(body) = &d.body {
            // inside the body, references to the receiver print as `self`
            self.receiver = d
                .recv
                .as_ref()
                .and_then(|r| r.list.first())
                .and_then(|f| f.names.first())
                .map(|n| n.name.clone());
            self.adj_block(body);
            self.receiver = None;
        }
    }

    pub(crate) fn signature(&mut self, params: &FieldList, results: Option<&FieldList>) {
        self.parameters(params);
        if let Some(results) = results {
            self.blank();
            let unparenthesized = results.list.len() == 1
                && results.list[0].names.is_empty()
                && !results.opening.is_valid();
            if unparenthesized {
                self.expr(&results.list[0].typ);
            } else {
                self.parameters(results);
            }
        }
    }

    pub(crate) fn parameters(&mut self, fields: &FieldList) {
        self.word("(");
        for (i, field) in fields.list.iter().enumerate() {
            if i > 0 {
                self.word(",");
                self.blank();
            }
            if !field.names.is_empty() {
                self.ident_list(&field.names);
                self.blank();
            }
            self.expr(&field.typ);
        }
        self.word(")");
    }

    pub(crate) fn ident_list(&mut self, names: &[std::rc::Rc<Ident>]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.word(",");
                self.blank();
            }
            self.ident(name);
        }
    }
}

/// For each spec of a grouped declaration, whether its (possibly empty) type
/// column must be kept so that value columns align across the surrounding
/// run. A run is a maximal stretch of specs that all carry values; the type
/// column is kept when any spec in the run declares an explicit type.
fn keep_type_column(specs: &[Spec]) -> Vec<bool> {
    let mut keep = vec![false; specs.len()];

    let mut run_start: Option<usize> = None;
    let mut keep_type = false;
    for (i, spec) in specs.iter().enumerate() {
        let Spec::Value(value) = spec else {
            if let Some(start) = run_start.take() {
                if keep_type {
                    keep[start..i].iter_mut().for_each(|k| *k = true);
                }
            }
            continue;
        };

        if !value.values.is_empty() {
            if run_start.is_none() {
                run_start = Some(i);
                keep_type = false;
            }
        } else if let Some(start) = run_start.take() {
            if keep_type {
                keep[start..i].iter_mut().for_each(|k| *k = true);
            }
        }
        if value.typ.is_some() {
            keep_type = true;
        }
    }
    if let Some(start) = run_start {
        if keep_type {
            keep[start..].iter_mut().for_each(|k| *k = true);
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BasicLit, Ident, ValueSpec};
    use crate::token::{Pos, TokenKind};

    fn value_spec(name: &str, typed: bool, valued: bool) -> Spec {
        Spec::Value(ValueSpec {
            doc: None,
            names: vec![Ident::new(Pos::from_u32(1), name)],
            typ: typed.then(|| Expr::Ident(Ident::new(Pos::from_u32(1), "int"))),
            values: if valued {
                vec![Expr::BasicLit(BasicLit {
                    value_pos: Pos::from_u32(1),
                    kind: TokenKind::Int,
                    value: "1".into(),
                })]
            } else {
                Vec::new()
            },
            comment: None,
        })
    }

    #[test]
    fn type_column_kept_only_in_mixed_runs() {
        // a = 1 / b int = 2 / c = 3: one run, one explicit type, keep all
        let specs = vec![
            value_spec("a", false, true),
            value_spec("b", true, true),
            value_spec("c", false, true),
        ];
        assert_eq!(keep_type_column(&specs), vec![true, true, true]);

        // untyped run keeps nothing
        let specs = vec![value_spec("a", false, true), value_spec("b", false, true)];
        assert_eq!(keep_type_column(&specs), vec![false, false]);

        // a valueless spec splits the runs
        let specs = vec![
            value_spec("a", false, true),
            value_spec("b", true, false),
            value_spec("c", false, true),
        ];
        assert_eq!(keep_type_column(&specs), vec![false, false, false]);
    }
}
