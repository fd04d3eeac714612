//! An elastic tab writer: aligns vertical-tab-separated cells across
//! adjacent lines, in the manner of elastic tabstops.
//!
//! The printer emits a control stream where `\v` separates alignment cells,
//! `\n` ends a line, and `\f` ends a line *and* closes the current
//! alignment section. Within a section, runs of adjacent lines that all
//! have a cell in a given column are padded to a common width; a line
//! without any cells (no `\v`) breaks every run, so ordinary code lines
//! never align across unrelated constructs.

/// Minimum padding between a cell's content and the next column.
const PADDING: usize = 1;

pub(crate) struct TabWriter {
    // buffered lines of the current section, split into cells; the last
    // element of each line is the unpadded tail
    lines: Vec<Vec<String>>,
    current: Vec<String>,
    cell: String,
    out: String,
}

impl TabWriter {
    pub(crate) fn new() -> TabWriter {
        TabWriter {
            lines: Vec::new(),
            current: Vec::new(),
            cell: String::new(),
            out: String::new(),
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\x0b' => {
                    let cell = std::mem::take(&mut self.cell);
                    self.current.push(cell);
                }
                '\n' => self.end_line(false),
                '\x0c' => self.end_line(true),
                _ => self.cell.push(ch),
            }
        }
    }

    fn end_line(&mut self, flush: bool) {
        let tail = std::mem::take(&mut self.cell);
        let mut line = std::mem::take(&mut self.current);
        line.push(tail);

        if line.len() == 1 {
            // no cells: this line can take part in no alignment run, so it
            // is safe to flush everything buffered so far
            self.flush_section();
            self.out.push_str(&line[0]);
            self.out.push('\n');
        } else {
            self.lines.push(line);
        }

        if flush {
            self.flush_section();
        }
    }

    fn flush_section(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.lines);

        // column widths over the whole section; runs are already separated
        // by cell-less lines, which flush eagerly
        let columns = lines.iter().map(|l| l.len() - 1).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for line in &lines {
            for (i, cell) in line[..line.len() - 1].iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count() + PADDING);
            }
        }

        for line in lines {
            let n = line.len();
            for (i, cell) in line.iter().enumerate() {
                self.out.push_str(cell);
                if i + 1 < n {
                    let pad = widths[i] - cell.chars().count();
                    for _ in 0..pad {
                        self.out.push(' ');
                    }
                }
            }
            // trailing spaces would linger after empty tail cells
            while self.out.ends_with(' ') {
                self.out.pop();
            }
            self.out.push('\n');
        }
    }

    pub(crate) fn finish(mut self) -> String {
        if !self.cell.is_empty() || !self.current.is_empty() {
            self.end_line(false);
        }
        self.flush_section();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> String {
        let mut w = TabWriter::new();
        w.write(input);
        w.finish()
    }

    #[test]
    fn aligns_adjacent_cells() {
        let out = render("a\x0b= 1\nlonger\x0b= 22\n");
        assert_eq!(out, "a      = 1\nlonger = 22\n");
    }

    #[test]
    fn plain_line_breaks_alignment() {
        let out = render("a\x0b= 1\nplain\nbbbb\x0b= 2\n");
        assert_eq!(out, "a = 1\nplain\nbbbb = 2\n");
    }

    #[test]
    fn formfeed_closes_section() {
        let out = render("a\x0b= 1\x0cbbbb\x0b= 2\n");
        assert_eq!(out, "a = 1\nbbbb = 2\n");
    }

    #[test]
    fn three_columns() {
        let out = render("x\x0bint\x0b// a\nlonger\x0bstring\x0b// b\n");
        assert_eq!(out, "x      int    // a\nlonger string // b\n");
    }
}
