//! The input file, with line-start indexing and comment-line blanking.

use std::path::PathBuf;

/// The test-description file a generation run operates on.
///
/// Stores the file's content along with precomputed line-start offsets for
/// line/column resolution during diagnostic rendering. Lines whose trimmed
/// form starts with `#` are comments; [`blanked`](Self::blanked) produces a
/// copy with those lines replaced by spaces so that later stages can scan the
/// text without seeing comments while every byte offset still points at the
/// same location in the original.
pub struct SourceFile {
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts.
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            path: path.into(),
            content,
            line_starts,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns a substring of the file content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }

    /// Returns a copy of the content with every comment line blanked to spaces.
    ///
    /// The result has exactly the same byte length as the original, newlines
    /// included, so spans computed against it resolve correctly against the
    /// original content.
    pub fn blanked(&self) -> String {
        let mut bytes = self.content.clone().into_bytes();
        let mut line_start = 0;
        while line_start < bytes.len() {
            let line_end = bytes[line_start..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |p| line_start + p);
            let line = &bytes[line_start..line_end];
            let first = line.iter().position(|b| !b.is_ascii_whitespace());
            if first.is_some_and(|i| line[i] == b'#') {
                for b in &mut bytes[line_start..line_end] {
                    *b = b' ';
                }
            }
            line_start = line_end + 1;
        }
        // Comment lines become all-ASCII spaces, everything else is untouched.
        String::from_utf8(bytes).expect("blanking preserves UTF-8")
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new("test.txt", content.to_string())
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(4), (2, 1));
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn snippet_extraction() {
        let f = make_file("hello world");
        assert_eq!(f.snippet(0, 5), "hello");
        assert_eq!(f.snippet(6, 11), "world");
    }

    #[test]
    fn empty_file() {
        let f = make_file("");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.blanked(), "");
    }

    #[test]
    fn blank_comment_lines() {
        let f = make_file("meta {\n# a comment with } brackets\n}\n");
        let blanked = f.blanked();
        assert_eq!(blanked.len(), f.content.len());
        assert_eq!(blanked, "meta {\n                          \n}\n");
    }

    #[test]
    fn blank_indented_comment() {
        let f = make_file("a\n   # indented\nb");
        assert_eq!(f.blanked(), "a\n               \nb");
    }

    #[test]
    fn hash_mid_line_is_not_a_comment() {
        let f = make_file("a # b\n");
        assert_eq!(f.blanked(), "a # b\n");
    }

    #[test]
    fn blank_preserves_newlines() {
        let f = make_file("# one\n# two\nx");
        let blanked = f.blanked();
        assert_eq!(blanked.matches('\n').count(), 2);
        assert_eq!(&blanked[12..13], "x");
    }
}
