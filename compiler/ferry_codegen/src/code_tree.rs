//! Deferred text assembly.
//!
//! Emitters write into a [`CodeTree`] instead of a flat string so that text
//! can be produced out of order: a fork reserves a position now and is filled
//! later (hoisted statements, import lists), a hole reserves a single inline
//! fragment that must be written exactly once.
//!
//! ```text
//! let stmts = tree.fork(body);        // position before the assignment
//! let value = lower(expr, stmts);     // may push statements into `stmts`
//! tree.line(body, format!("x = {value}"));
//! ```
//!
//! The two kinds of deferred slot differ in how often they may be written.
//! A fork is a statement sink: any number of lines may be appended to it,
//! and one that receives nothing flattens to nothing (most hoisting points
//! stay empty). A hole stands for part of a line that must exist, so it is
//! write-once and flattening panics if it was never filled.
//!
//! Flattening walks the tree once, indenting each block body one level
//! deeper than its header.

/// Indentation unit for block bodies.
const INDENT: &str = "    ";

/// Handle to a node in a [`CodeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CodeId(u32);

/// Handle to a write-once inline slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct HoleId(u32);

enum Piece {
    Text(String),
    Newline,
    /// A forked child, substituted verbatim at this position.
    Fork(CodeId),
    Block {
        header: String,
        body: CodeId,
        footer: Option<String>,
    },
    Hole(HoleId),
}

/// Arena of text nodes plus the output files rooted in it.
#[derive(Default)]
pub struct CodeTree {
    nodes: Vec<Vec<Piece>>,
    holes: Vec<Option<String>>,
    files: Vec<(String, CodeId)>,
}

impl CodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> CodeId {
        let id = u32::try_from(self.nodes.len()).unwrap_or_else(|_| panic!("code tree overflow"));
        self.nodes.push(Vec::new());
        CodeId(id)
    }

    fn push(&mut self, id: CodeId, piece: Piece) {
        self.nodes[id.0 as usize].push(piece);
    }

    /// Start a new output file and return its root node.
    pub fn new_file(&mut self, name: impl Into<String>) -> CodeId {
        let root = self.alloc();
        self.files.push((name.into(), root));
        root
    }

    /// Append text to the current line of `id`.
    pub fn write(&mut self, id: CodeId, text: impl Into<String>) {
        let text = text.into();
        debug_assert!(!text.contains('\n'), "multi-line text fragment: {text:?}");
        self.push(id, Piece::Text(text));
    }

    /// Append text followed by a line break.
    pub fn line(&mut self, id: CodeId, text: impl Into<String>) {
        self.write(id, text);
        self.newline(id);
    }

    pub fn newline(&mut self, id: CodeId) {
        self.push(id, Piece::Newline);
    }

    /// Open an indented block: `header` ends the current line, the returned
    /// node holds the body, `footer` (if any) follows at the outer level.
    pub fn block(&mut self, id: CodeId, header: impl Into<String>, footer: Option<String>) -> CodeId {
        let body = self.alloc();
        self.push(
            id,
            Piece::Block {
                header: header.into(),
                body,
                footer,
            },
        );
        body
    }

    /// Reserve the current position of `id` for content written later.
    ///
    /// The fork accepts any number of appends; left empty it renders nothing.
    pub fn fork(&mut self, id: CodeId) -> CodeId {
        let child = self.alloc();
        self.push(id, Piece::Fork(child));
        child
    }

    /// Reserve an inline slot at the current position of `id`.
    pub fn hole(&mut self, id: CodeId) -> HoleId {
        let hole = HoleId(u32::try_from(self.holes.len()).unwrap_or_else(|_| panic!("code tree overflow")));
        self.holes.push(None);
        self.push(id, Piece::Hole(hole));
        hole
    }

    /// Fill a hole.
    ///
    /// # Panics
    /// Panics if the hole was already filled.
    pub fn fill(&mut self, hole: HoleId, text: impl Into<String>) {
        let slot = &mut self.holes[hole.0 as usize];
        assert!(slot.is_none(), "hole {hole:?} filled twice");
        *slot = Some(text.into());
    }

    /// Whether `id` has received any content.
    pub fn is_empty(&self, id: CodeId) -> bool {
        self.nodes[id.0 as usize].is_empty()
    }

    /// Render the subtree rooted at `id`.
    ///
    /// # Panics
    /// Panics if the subtree contains an unfilled hole.
    pub fn flatten(&self, id: CodeId) -> String {
        let mut flattener = Flattener {
            tree: self,
            out: String::new(),
            line: String::new(),
            line_indent: 0,
        };
        flattener.walk(id, 0);
        flattener.finish()
    }

    /// Render every file, in creation order.
    pub fn flatten_files(&self) -> Vec<(String, String)> {
        self.files
            .iter()
            .map(|(name, root)| (name.clone(), self.flatten(*root)))
            .collect()
    }
}

struct Flattener<'t> {
    tree: &'t CodeTree,
    out: String,
    line: String,
    line_indent: usize,
}

impl Flattener<'_> {
    fn text(&mut self, text: &str, indent: usize) {
        if self.line.is_empty() {
            self.line_indent = indent;
        }
        self.line.push_str(text);
    }

    fn end_line(&mut self) {
        if !self.line.is_empty() {
            for _ in 0..self.line_indent {
                self.out.push_str(INDENT);
            }
            self.out.push_str(&self.line);
            self.line.clear();
        }
        self.out.push('\n');
    }

    fn walk(&mut self, id: CodeId, indent: usize) {
        let tree = self.tree;
        for piece in &tree.nodes[id.0 as usize] {
            match piece {
                Piece::Text(text) => self.text(text, indent),
                Piece::Newline => self.end_line(),
                Piece::Fork(child) => self.walk(*child, indent),
                Piece::Block {
                    header,
                    body,
                    footer,
                } => {
                    self.text(header, indent);
                    self.end_line();
                    self.walk(*body, indent + 1);
                    if let Some(footer) = footer {
                        self.text(footer, indent);
                        self.end_line();
                    }
                }
                Piece::Hole(hole) => match &tree.holes[hole.0 as usize] {
                    Some(text) => self.text(text, indent),
                    None => panic!("flattening unfilled hole {hole:?}"),
                },
            }
        }
    }

    fn finish(mut self) -> String {
        if !self.line.is_empty() {
            self.end_line();
        }
        self.out
    }
}
