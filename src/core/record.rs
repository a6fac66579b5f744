use std::io::{self, Write};

use crate::utils::validation::is_valid_xref;

/// Line terminator used when writing records
pub const LINE_ENDING: &str = "\r\n";

/// Tags of continuation lines attached to free text
pub const CONTINUATION_TAGS: [&str; 2] = ["CONT", "CONC"];

/// One tagged line plus the lines nested beneath it.
///
/// The nesting level of a line is not stored: it is the depth of the node in
/// the tree and is recomputed when the record is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Cross-reference id including its `@` delimiters (level-0 lines only)
    pub xref: Option<String>,

    /// Line tag, e.g. `INDI`, `NAME`, `BIRT`
    pub tag: String,

    /// Everything after the tag and its separating space
    pub value: Option<String>,

    /// Nested lines in input order
    pub children: Vec<Record>,
}

impl Record {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            xref: None,
            tag: tag.into(),
            value: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_xref(mut self, xref: impl Into<String>) -> Self {
        self.xref = Some(xref.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Record) -> Self {
        self.children.push(child);
        self
    }

    /// Parse one line of the form `<level> <xref>? <TAG> <value>?`.
    ///
    /// Returns the level together with the childless record, or `None` when the
    /// level is not a number or the tag is missing.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<(usize, Self)> {
        let line = line.trim_start();
        let (level, rest) = line.split_once(' ')?;
        let level: usize = level.parse().ok()?;
        let rest = rest.trim_start_matches(' ');

        let (xref, rest) = match rest.split_once(' ') {
            Some((first, remainder)) if is_valid_xref(first) => {
                (Some(first.to_string()), remainder.trim_start_matches(' '))
            }
            _ => (None, rest),
        };

        let (tag, value) = match rest.split_once(' ') {
            Some((tag, value)) => (tag, Some(value.to_string())),
            None => (rest, None),
        };
        if tag.is_empty() {
            return None;
        }

        Some((
            level,
            Self {
                xref,
                tag: tag.to_string(),
                value,
                children: Vec::new(),
            },
        ))
    }

    /// The cross-reference id of this record, if any
    pub fn id(&self) -> Option<&str> {
        self.xref.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The value if it is a pointer to another record
    pub fn pointer(&self) -> Option<&str> {
        self.value().filter(|v| is_valid_xref(v))
    }

    /// First direct child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Record> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Record> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    /// All direct children with the given tag
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Value of the first direct child with the given tag
    pub fn child_value(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(Record::value)
    }

    /// Pointer value of the first direct child with the given tag
    pub fn child_pointer(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(Record::pointer)
    }

    pub fn push_child(&mut self, child: Record) {
        self.children.push(child);
    }

    /// Remove every direct child with the given tag, returning how many were removed
    pub fn remove_children(&mut self, tag: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|c| c.tag != tag);
        before - self.children.len()
    }

    /// Point the first child with `tag` at `value`, adding the child if missing
    pub fn set_child_value(&mut self, tag: &str, value: &str) {
        match self.child_mut(tag) {
            Some(child) => child.value = Some(value.to_string()),
            None => self.push_child(Record::new(tag).with_value(value)),
        }
    }

    /// Values of the continuation lines directly below this record
    pub fn continuation(&self) -> Vec<(&str, Option<&str>)> {
        self.children
            .iter()
            .filter(|c| CONTINUATION_TAGS.contains(&c.tag.as_str()))
            .map(|c| (c.tag.as_str(), c.value()))
            .collect()
    }

    /// Every pointer found below this record on lines tagged with one of `tags`,
    /// in depth-first order.
    pub fn pointers(&self, tags: &[&str]) -> Vec<(String, String)> {
        let mut found = Vec::new();
        let mut stack: Vec<&Record> = self.children.iter().rev().collect();
        while let Some(record) = stack.pop() {
            if tags.contains(&record.tag.as_str()) {
                if let Some(pointer) = record.pointer() {
                    found.push((record.tag.clone(), pointer.to_string()));
                }
            }
            stack.extend(record.children.iter().rev());
        }
        found
    }

    /// Rewrite every pointer below this record on lines tagged with one of `tags`.
    ///
    /// `rewrite` receives the tag and current pointer and returns the new pointer;
    /// returning `None` drops the line (and everything nested under it).
    pub fn rewrite_pointers<F>(&mut self, tags: &[&str], rewrite: &mut F)
    where
        F: FnMut(&str, &str) -> Option<String>,
    {
        self.children.retain_mut(|child| {
            if tags.contains(&child.tag.as_str()) {
                if let Some(pointer) = child.pointer() {
                    match rewrite(&child.tag, pointer) {
                        Some(new_pointer) => child.value = Some(new_pointer),
                        None => return false,
                    }
                }
            }
            true
        });
        for child in &mut self.children {
            child.rewrite_pointers(tags, rewrite);
        }
    }

    /// Same tag, value and nested content, ignoring the cross-reference id
    pub fn same_content(&self, other: &Record) -> bool {
        self.tag == other.tag && self.value == other.value && self.children == other.children
    }

    /// Render this line (without children) at the given level
    pub fn line(&self, level: usize) -> String {
        let mut line = level.to_string();
        if let Some(xref) = &self.xref {
            line.push(' ');
            line.push_str(xref);
        }
        line.push(' ');
        line.push_str(&self.tag);
        if let Some(value) = &self.value {
            line.push(' ');
            line.push_str(value);
        }
        line
    }

    /// Write this record and all nested lines, starting at `level`
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying writer.
    pub fn write_to<W: Write>(&self, level: usize, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.line(level).as_bytes())?;
        writer.write_all(LINE_ENDING.as_bytes())?;
        for child in &self.children {
            child.write_to(level + 1, writer)?;
        }
        Ok(())
    }
}
