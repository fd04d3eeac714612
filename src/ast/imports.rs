//! Import sorting: lexicographic, stable, and blank-line-group aware.

use crate::token::{FileSet, TokenKind};

use super::{Decl, SourceFile, Spec};

/// Re-order every grouped import declaration of `file` into lexicographic
/// order by path. Blank lines delimit segments that are sorted
/// independently; comments attached to a spec travel with it. The operation
/// is idempotent.
pub fn sort_imports(fset: &FileSet, file: &mut SourceFile) {
    for decl in &mut file.decls {
        let Decl::Gen(gen) = decl else {
            continue;
        };
        if gen.tok != TokenKind::Import || !gen.is_group() {
            // a single-spec declaration is trivially sorted
            continue;
        }

        // identify segments delimited by blank lines
        let lines: Vec<(usize, usize)> = gen
            .specs
            .iter()
            .map(|spec| {
                let start = fset.position(spec.pos()).line;
                let end = fset.position(spec.end()).line;
                (start, end)
            })
            .collect();

        let mut start = 0;
        for i in 1..=gen.specs.len() {
            let boundary = i == gen.specs.len() || lines[i].0 > lines[i - 1].1 + 1;
            if boundary {
                sort_segment(&mut gen.specs[start..i]);
                start = i;
            }
        }
    }
}

fn sort_segment(specs: &mut [Spec]) {
    // the sorted specs take over the source slots they land in, so printers
    // keep line grouping intact
    let slots: Vec<crate::token::Pos> = specs
        .iter()
        .map(|s| match s {
            Spec::Import(i) => i.path.value_pos,
            _ => crate::token::Pos::NONE,
        })
        .collect();

    specs.sort_by(|a, b| path_of(a).cmp(path_of(b)));

    for (spec, slot) in specs.iter_mut().zip(slots) {
        if let Spec::Import(import) = spec {
            if slot.is_valid() {
                import.path.value_pos = slot;
            }
        }
    }
}

fn path_of(spec: &Spec) -> &str {
    match spec {
        Spec::Import(import) => &import.path.value,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BasicLit, GenDecl, ImportSpec, Scope};
    use crate::token::{FileSet, Pos};

    fn import(path: &str, pos: Pos) -> Spec {
        Spec::Import(ImportSpec {
            doc: None,
            name: None,
            path: BasicLit {
                value_pos: pos,
                kind: TokenKind::Str,
                value: format!("\"{path}\""),
            },
            comment: None,
        })
    }

    fn file_with(decl: GenDecl) -> SourceFile {
        SourceFile {
            doc: None,
            package_pos: Pos::from_u32(1),
            name: crate::ast::Ident::new(Pos::from_u32(9), "main"),
            decls: vec![Decl::Gen(decl)],
            scope: Scope::new(None),
            unresolved: Vec::new(),
            comments: Vec::new(),
        }
    }

    #[test]
    fn segments_sort_independently_and_idempotently() {
        // lay the specs out on known lines: 2, 3, then a blank line, then 5
        let fset = FileSet::new();
        let src = "import\n\t\"z\"\n\t\"a\"\n\n\t\"m\"\n";
        let f = fset.add_file("t.igo", None, src.len() as u32);
        for (off, ch) in src.char_indices() {
            if ch == '\n' {
                f.add_line(off as u32 + 1);
            }
        }

        let at = |line: usize| {
            // first column of the given 1-based line
            let offset = src
                .lines()
                .take(line - 1)
                .map(|l| l.len() + 1)
                .sum::<usize>();
            f.pos(offset as u32 + 1)
        };

        let decl = GenDecl {
            doc: None,
            tok_pos: f.pos(0),
            tok: TokenKind::Import,
            lparen: f.pos(7),
            specs: vec![import("z", at(2)), import("a", at(3)), import("m", at(5))],
            rparen: f.pos(src.len() as u32 - 1),
        };
        let mut file = file_with(decl);

        sort_imports(&fset, &mut file);
        let order = |file: &SourceFile| {
            file.imports()
                .iter()
                .map(|s| s.path.value.clone())
                .collect::<Vec<_>>()
        };
        // "m" stays in its own segment after the blank line
        assert_eq!(order(&file), ["\"a\"", "\"z\"", "\"m\""]);

        let once = order(&file);
        sort_imports(&fset, &mut file);
        assert_eq!(order(&file), once);
    }
}
