//! Tag forest built from ctags output
//!
//! Tags live in an arena: parent/child relations are `TagId` indices into
//! one `Vec<Tag>` per forest, so the parent back-references never form
//! owned cycles. Children are always pushed after their parent, so parent
//! indices only ever point backwards and every parent chain terminates at
//! a root.

use ahash::AHashSet;
use std::fmt;

/// Index of a tag within its forest's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId(u32);

/// A named source symbol with a line number and nesting scope.
#[derive(Debug, Clone)]
pub struct Tag {
    pub name: String,
    pub line: u32,
    pub parent: Option<TagId>,
    children: Vec<TagId>,
}

/// All tags extracted from one document. Rebuilt wholesale per extraction.
#[derive(Debug, Clone, Default)]
pub struct TagForest {
    arena: Vec<Tag>,
    roots: Vec<TagId>,
}

impl TagForest {
    pub fn get(&self, id: TagId) -> &Tag {
        &self.arena[id.0 as usize]
    }

    /// Root tags in discovery order.
    pub fn roots(&self) -> &[TagId] {
        &self.roots
    }

    pub fn children(&self, id: TagId) -> &[TagId] {
        &self.get(id).children
    }

    /// Total number of tags in the forest.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    fn push(&mut self, name: String, line: u32, parent: Option<TagId>) -> TagId {
        let id = TagId(self.arena.len() as u32);
        self.arena.push(Tag {
            name,
            line,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.arena[p.0 as usize].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Indented textual dump of the forest, one tag per line.
    pub fn format(&self) -> String {
        fn walk(forest: &TagForest, id: TagId, depth: usize, out: &mut String) {
            let tag = forest.get(id);
            if !out.is_empty() {
                out.push('\n');
            }
            for _ in 0..depth {
                out.push('\t');
            }
            out.push_str(&format!("{} {}", tag.line, tag.name));
            for &child in forest.children(id) {
                walk(forest, child, depth + 1, out);
            }
        }

        let mut out = String::new();
        for &root in &self.roots {
            walk(self, root, 0, &mut out);
        }
        out
    }
}

/// Malformed ctags output. The whole batch is rejected.
#[derive(Debug)]
pub enum ParseError {
    /// Record with a field count other than 5 or 6.
    FieldCount { record: String, count: usize },
    /// Line field whose final `:`-separated token is not a number.
    LineNumber { record: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::FieldCount { record, count } => {
                write!(f, "record has {} fields, expected 5 or 6: {:?}", count, record)
            }
            ParseError::LineNumber { record } => {
                write!(f, "record has no numeric line field: {:?}", record)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Tag kinds hidden from the navigator by default.
pub fn default_ignored_kinds() -> AHashSet<String> {
    let mut set = AHashSet::new();
    set.insert("variable".to_string());
    set
}

struct Record<'a> {
    name: &'a str,
    line: u32,
    kind: &'a str,
    scope: Option<&'a str>,
}

/// One tab-separated ctags record: `name, file, pattern, kind, line[:col]`
/// with an optional trailing `label:Outer.Inner` scope field. Only the text
/// after the final `.` of the scope path matters.
fn parse_record(line: &str) -> Result<Record<'_>, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    let (kind, line_text, scope_text) = match fields.len() {
        5 => (fields[3], fields[4], None),
        6 => (fields[3], fields[4], Some(fields[5])),
        count => {
            return Err(ParseError::FieldCount {
                record: line.to_string(),
                count,
            })
        }
    };

    // The numeric value sits after the final colon (`line:12`).
    let number = line_text
        .rsplit(':')
        .next()
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| ParseError::LineNumber {
            record: line.to_string(),
        })?;

    let scope = scope_text.map(|s| {
        let path = s.rsplit(':').next().unwrap_or(s);
        path.rsplit('.').next().unwrap_or(path)
    });

    Ok(Record {
        name: fields[0],
        line: number,
        kind,
        scope,
    })
}

/// Walk up the parent chain from `from`, looking for a tag named `scope`.
fn resolve_scope(forest: &TagForest, from: Option<TagId>, scope: &str) -> Option<TagId> {
    let mut cursor = from;
    while let Some(id) = cursor {
        if forest.get(id).name == scope {
            return Some(id);
        }
        cursor = forest.get(id).parent;
    }
    None
}

/// Parse raw ctags output into a forest, skipping ignored kinds.
///
/// An explicit fold: the accumulator is the forest built so far plus the
/// most recently attached tag, which anchors scope resolution for the next
/// record. Ignored records do not advance that anchor; every attached
/// record does, regardless of nesting depth.
pub fn parse_with_ignored(raw: &str, ignored: &AHashSet<String>) -> Result<TagForest, ParseError> {
    let mut forest = TagForest::default();
    let mut last: Option<TagId> = None;

    for line in raw.lines() {
        if line.is_empty() {
            continue;
        }
        let record = parse_record(line)?;
        if ignored.contains(record.kind) {
            continue;
        }
        let parent = record
            .scope
            .and_then(|scope| resolve_scope(&forest, last, scope));
        last = Some(forest.push(record.name.to_string(), record.line, parent));
    }

    Ok(forest)
}

/// Parse with the default ignored-kind set.
pub fn parse(raw: &str) -> Result<TagForest, ParseError> {
    parse_with_ignored(raw, &default_ignored_kinds())
}

/// Display projection over a [`TagForest`], sufficient to drive a generic
/// tree view: child counts, child/parent lookup and per-node labels.
/// Replacing the forest bumps `revision`, which the host watches to know
/// when a full view refresh is due.
#[derive(Debug, Clone, Default)]
pub struct TagModel {
    forest: TagForest,
    revision: u64,
}

impl TagModel {
    /// Replace all tags at once. Triggers a full view refresh.
    pub fn set_forest(&mut self, forest: TagForest) {
        self.forest = forest;
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.set_forest(TagForest::default());
    }

    pub fn forest(&self) -> &TagForest {
        &self.forest
    }

    /// Incremented on every `set_forest`/`clear`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of children under `node`; `None` is the invisible root.
    pub fn child_count(&self, node: Option<TagId>) -> usize {
        match node {
            Some(id) => self.forest.children(id).len(),
            None => self.forest.roots().len(),
        }
    }

    pub fn child_at(&self, node: Option<TagId>, index: usize) -> Option<TagId> {
        let children = match node {
            Some(id) => self.forest.children(id),
            None => self.forest.roots(),
        };
        children.get(index).copied()
    }

    pub fn parent_of(&self, id: TagId) -> Option<TagId> {
        self.forest.get(id).parent
    }

    pub fn label(&self, id: TagId) -> String {
        let tag = self.forest.get(id);
        format!("{} {}", tag.name, tag.line)
    }
}
