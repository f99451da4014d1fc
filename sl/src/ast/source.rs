//! Source texts and line/column resolution

use super::Span;
use std::fmt;
use std::rc::Rc;

/// Index of a source inside a [`SourceMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceId(pub u32);

/// A named source text with precomputed line starts
#[derive(Debug)]
pub struct Source {
    name: String,
    text: String,
    line_starts: Vec<usize>,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Source {
            name: name.into(),
            text,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line and column of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.text[line_start..offset].chars().count() + 1;
        (line + 1, column)
    }
}

/// All sources loaded into one interpreter
#[derive(Debug, Default)]
pub struct SourceMap {
    sources: Vec<Rc<Source>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: Source) -> SourceId {
        let id = SourceId(self.sources.len() as u32);
        self.sources.push(Rc::new(source));
        id
    }

    pub fn get(&self, id: SourceId) -> Option<&Rc<Source>> {
        self.sources.get(id.0 as usize)
    }

    /// Remove the most recently added source. Only the newest source can
    /// be discarded so that every other id stays valid.
    pub fn discard(&mut self, id: SourceId) -> Option<Rc<Source>> {
        if id.0 as usize + 1 != self.sources.len() {
            return None;
        }
        self.sources.pop()
    }

    /// Resolve a location to name, line and column
    pub fn resolve(&self, location: Location) -> Option<ResolvedLocation<'_>> {
        let source = self.get(location.source)?;
        let (line, column) = source.line_col(location.span.start);
        Some(ResolvedLocation {
            name: source.name(),
            line,
            column,
        })
    }
}

/// A span inside a specific source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub source: SourceId,
    pub span: Span,
}

impl Location {
    pub fn new(source: SourceId, span: Span) -> Self {
        Location { source, span }
    }
}

/// A location ready for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocation<'a> {
    pub name: &'a str,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ResolvedLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {} col {}", self.name, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_first_line() {
        let source = Source::new("t.sl", "function main() {}");
        assert_eq!(source.line_col(0), (1, 1));
        assert_eq!(source.line_col(9), (1, 10));
    }

    #[test]
    fn test_line_col_after_newlines() {
        let source = Source::new("t.sl", "a\nbc\n\ndef");
        assert_eq!(source.line_col(2), (2, 1));
        assert_eq!(source.line_col(3), (2, 2));
        assert_eq!(source.line_col(5), (3, 1));
        assert_eq!(source.line_col(8), (4, 3));
    }

    #[test]
    fn test_line_col_clamps_past_end() {
        let source = Source::new("t.sl", "ab");
        assert_eq!(source.line_col(100), (1, 3));
    }

    #[test]
    fn test_source_map_resolve() {
        let mut sources = SourceMap::new();
        let first = sources.add(Source::new("a.sl", "x"));
        let second = sources.add(Source::new("b.sl", "\n  y"));
        assert_ne!(first, second);

        let resolved = sources
            .resolve(Location::new(second, Span::new(3, 4)))
            .unwrap();
        assert_eq!(resolved.to_string(), "b.sl line 2 col 3");
    }

    #[test]
    fn test_discard_only_newest_source() {
        let mut sources = SourceMap::new();
        let first = sources.add(Source::new("a.sl", "x"));
        let second = sources.add(Source::new("b.sl", "y"));
        assert!(sources.discard(first).is_none());
        assert_eq!(sources.discard(second).unwrap().name(), "b.sl");
        assert!(sources.get(second).is_none());
        assert_eq!(sources.add(Source::new("c.sl", "z")), second);
    }

    #[test]
    fn test_source_map_unknown_id() {
        let sources = SourceMap::new();
        assert!(sources.resolve(Location::new(SourceId(7), Span::new(0, 1))).is_none());
    }
}
