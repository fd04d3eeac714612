//! Absolute source positions and the registry mapping them back to
//! (file, line, column).

use std::fmt::Display;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// A compact absolute offset into a [`FileSet`].
///
/// `Pos::NONE` (zero) is the invalid sentinel. All other values lie inside
/// the range reserved by exactly one registered file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(u32);

impl Pos {
    pub const NONE: Pos = Pos(0);

    pub fn from_u32(value: u32) -> Pos {
        Pos(value)
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Pos::NONE
    }

    /// The position `n` bytes further into the same file.
    pub fn add(self, n: u32) -> Pos {
        Pos(self.0 + n)
    }
}

/// A resolved position, ready for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub filename: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number (in bytes).
    pub column: usize,
    /// 0-based byte offset within the file.
    pub offset: usize,
}

impl Location {
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.filename.is_empty(), self.line) {
            (_, 0) => f.write_str("-"),
            (true, _) => write!(f, "{}:{}", self.line, self.column),
            (false, _) => write!(f, "{}:{}:{}", self.filename, self.line, self.column),
        }
    }
}

/// An alternative (filename, line) installed by a `//line` directive,
/// effective for all positions at or after `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInfo {
    pub offset: u32,
    pub filename: String,
    pub line: usize,
}

/// A single registered source file.
///
/// The line table is appended to monotonically by the owning scanner; all
/// other access is read-only, so the interior mutex is uncontended in
/// practice.
#[derive(Debug)]
pub struct File {
    name: String,
    base: u32,
    size: u32,
    lines: Mutex<Vec<u32>>,
    infos: Mutex<Vec<LineInfo>>,
}

impl File {
    fn new(name: String, base: u32, size: u32) -> File {
        File {
            name,
            base,
            size,
            lines: Mutex::new(vec![0]),
            infos: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn line_count(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    /// Record the byte offset of the start of a new line. Offsets must be
    /// added in increasing order; out-of-order offsets are ignored.
    pub fn add_line(&self, offset: u32) {
        let mut lines = self.lines.lock().unwrap();
        if offset <= self.size {
            if let Some(&last) = lines.last() {
                if offset <= last {
                    return;
                }
            }
            lines.push(offset);
        }
    }

    /// Install a `//line` override effective from `offset` on.
    pub fn add_line_info(&self, offset: u32, filename: String, line: usize) {
        let mut infos = self.infos.lock().unwrap();
        if let Some(last) = infos.last() {
            if offset <= last.offset {
                return;
            }
        }
        infos.push(LineInfo {
            offset,
            filename,
            line,
        });
    }

    /// The absolute position of the byte at `offset` within this file.
    pub fn pos(&self, offset: u32) -> Pos {
        debug_assert!(offset <= self.size, "offset out of file bounds");
        Pos(self.base + offset)
    }

    /// The byte offset within this file of the absolute position `pos`.
    pub fn offset(&self, pos: Pos) -> u32 {
        debug_assert!(
            pos.0 >= self.base && pos.0 <= self.base + self.size,
            "position out of file bounds"
        );
        pos.0 - self.base
    }

    /// The 1-based line of `pos`, ignoring `//line` overrides.
    pub fn line(&self, pos: Pos) -> usize {
        self.raw_location(self.offset(pos)).0
    }

    fn raw_location(&self, offset: u32) -> (usize, usize) {
        let lines = self.lines.lock().unwrap();
        let idx = match lines.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (idx + 1, (offset - lines[idx]) as usize + 1)
    }

    /// Resolve `pos` to a full location, honoring `//line` overrides.
    pub fn position(&self, pos: Pos) -> Location {
        if !pos.is_valid() {
            return Location::default();
        }

        let offset = self.offset(pos);
        let (mut line, column) = self.raw_location(offset);
        let mut filename = self.name.clone();

        let infos = self.infos.lock().unwrap();
        let idx = infos.partition_point(|info| info.offset <= offset);
        if idx > 0 {
            let info = &infos[idx - 1];
            let (info_line, _) = self.raw_location(info.offset);
            filename = info.filename.clone();
            line = info.line + line - info_line;
        }

        Location {
            filename,
            line,
            column,
            offset: offset as usize,
        }
    }

    fn record(&self) -> FileRecord {
        FileRecord {
            name: self.name.clone(),
            base: self.base,
            size: self.size,
            lines: self.lines.lock().unwrap().clone(),
            infos: self.infos.lock().unwrap().clone(),
        }
    }
}

#[derive(Debug, Default)]
struct FileSetState {
    base: u32,
    files: Vec<Arc<File>>,
    // most recently looked-up file, a cheap win for the common case of many
    // queries against one file
    last: Option<Arc<File>>,
}

/// A registry assigning disjoint position ranges to source files.
///
/// All access is serialized under an internal mutex; positions handed out
/// are plain integers and carry no lock.
#[derive(Debug)]
pub struct FileSet {
    state: Mutex<FileSetState>,
}

impl FileSet {
    pub fn new() -> FileSet {
        FileSet {
            state: Mutex::new(FileSetState {
                base: 1, // 0 is reserved for Pos::NONE
                files: Vec::new(),
                last: None,
            }),
        }
    }

    /// The base that the next added file will receive.
    pub fn base(&self) -> u32 {
        self.state.lock().unwrap().base
    }

    /// Register a file of `size` bytes, reserving `[base, base + size + 1]`.
    ///
    /// A `base` of `None` uses the next free base. An explicit base below the
    /// current cursor would overlap an existing file and is a programming
    /// error.
    pub fn add_file(&self, name: &str, base: Option<u32>, size: u32) -> Arc<File> {
        let mut state = self.state.lock().unwrap();
        let base = base.unwrap_or(state.base);
        assert!(base >= state.base, "file base overlaps existing file");

        let file = Arc::new(File::new(name.to_string(), base, size));
        // +1 so that EOF of this file and the first byte of the next stay
        // distinguishable
        state.base = base + size + 1;
        state.files.push(Arc::clone(&file));
        file
    }

    /// The file containing `pos`, if any.
    pub fn file(&self, pos: Pos) -> Option<Arc<File>> {
        if !pos.is_valid() {
            return None;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(last) = &state.last {
            if last.base <= pos.0 && pos.0 <= last.base + last.size {
                return Some(Arc::clone(last));
            }
        }

        let idx = state.files.partition_point(|f| f.base <= pos.0);
        if idx == 0 {
            return None;
        }
        let file = Arc::clone(&state.files[idx - 1]);
        if pos.0 > file.base + file.size {
            return None;
        }
        state.last = Some(Arc::clone(&file));
        Some(file)
    }

    /// Resolve `pos` against the owning file, or an invalid location.
    pub fn position(&self, pos: Pos) -> Location {
        match self.file(pos) {
            Some(file) => file.position(pos),
            None => Location::default(),
        }
    }

    /// Flatten into the serializable wire record.
    pub fn write(&self) -> FileSetRecord {
        let state = self.state.lock().unwrap();
        FileSetRecord {
            base: state.base,
            files: state.files.iter().map(|f| f.record()).collect(),
        }
    }

    /// Rebuild a registry from a wire record. The last-used cache of the
    /// original is deliberately not carried over.
    pub fn read(record: FileSetRecord) -> FileSet {
        let files = record
            .files
            .into_iter()
            .map(|f| {
                Arc::new(File {
                    name: f.name,
                    base: f.base,
                    size: f.size,
                    lines: Mutex::new(f.lines),
                    infos: Mutex::new(f.infos),
                })
            })
            .collect();

        FileSet {
            state: Mutex::new(FileSetState {
                base: record.base,
                files,
                last: None,
            }),
        }
    }
}

impl Default for FileSet {
    fn default() -> FileSet {
        FileSet::new()
    }
}

/// The flat wire form of a [`FileSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSetRecord {
    pub base: u32,
    pub files: Vec<FileRecord>,
}

/// The flat wire form of one [`File`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub base: u32,
    pub size: u32,
    pub lines: Vec<u32>,
    pub infos: Vec<LineInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_occupy_disjoint_ranges() {
        let fset = FileSet::new();
        let a = fset.add_file("a.igo", None, 10);
        let b = fset.add_file("b.igo", None, 20);

        assert_eq!(a.base(), 1);
        assert_eq!(b.base(), 12);
        assert!(a.base() + a.size() < b.base());

        let pos = a.pos(5);
        assert_eq!(fset.file(pos).unwrap().name(), "a.igo");
        assert_eq!(fset.file(b.pos(0)).unwrap().name(), "b.igo");
    }

    #[test]
    fn position_round_trip() {
        let fset = FileSet::new();
        let src = "one\ntwo\nthree\n";
        let file = fset.add_file("t.igo", None, src.len() as u32);
        for (off, ch) in src.char_indices() {
            if ch == '\n' {
                file.add_line(off as u32 + 1);
            }
        }

        let loc = fset.position(file.pos(4));
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
        assert_eq!(loc.to_string(), "t.igo:2:1");

        let loc = fset.position(file.pos(6));
        assert_eq!((loc.line, loc.column), (2, 3));

        assert_eq!(file.offset(file.pos(6)), 6);
        assert_eq!(fset.position(Pos::NONE).to_string(), "-");
    }

    #[test]
    fn line_info_overrides() {
        let fset = FileSet::new();
        let src = "a\nb\nc\nd\n";
        let file = fset.add_file("real.igo", None, src.len() as u32);
        for (off, ch) in src.char_indices() {
            if ch == '\n' {
                file.add_line(off as u32 + 1);
            }
        }

        // remap everything from line 3 on to generated.igo:10
        file.add_line_info(4, "generated.igo".into(), 10);

        let before = file.position(file.pos(2));
        assert_eq!((before.filename.as_str(), before.line), ("real.igo", 2));

        let after = file.position(file.pos(6));
        assert_eq!((after.filename.as_str(), after.line), ("generated.igo", 11));
    }

    #[test]
    fn record_round_trip() {
        let fset = FileSet::new();
        let file = fset.add_file("x.igo", None, 8);
        file.add_line(3);
        file.add_line(6);
        file.add_line_info(6, "y.igo".into(), 40);

        let record = fset.write();
        let rebuilt = FileSet::read(record.clone());
        assert_eq!(rebuilt.write(), record);

        let loc = rebuilt.position(Pos::from_u32(1 + 4));
        assert_eq!((loc.line, loc.column), (2, 2));
    }
}
