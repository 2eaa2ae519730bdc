//! File reference types shared by the AST and the query layer.

use serde::{Deserialize, Serialize};

/// Marker attached to a file reference inside a link list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMarker {
    /// `{TO-CREATE}` - the file does not exist yet.
    ToCreate,
    /// `{TO-MODIFY}` - the file exists and is expected to change.
    ToModify,
}

impl FileMarker {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "TO-CREATE" => Some(Self::ToCreate),
            "TO-MODIFY" => Some(Self::ToModify),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToCreate => "TO-CREATE",
            Self::ToModify => "TO-MODIFY",
        }
    }
}

/// A 1-based inclusive line range, as written `path:12-40`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

/// A file mention inside a link declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<FileMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_range: Option<LineRange>,
    pub is_glob: bool,
}

impl FileRef {
    pub fn plain(path: impl Into<String>) -> Self {
        let path = path.into();
        let is_glob = path_is_glob(&path);
        Self {
            path,
            marker: None,
            line_range: None,
            is_glob,
        }
    }
}

/// `true` iff the path contains a glob metacharacter. Triple-asterisk still
/// counts as a glob; the analyzer flags it separately.
pub fn path_is_glob(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('[')
}

/// An `->entryPoint{file:symbol:line}` target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_detection() {
        assert!(path_is_glob("src/**/*.ts"));
        assert!(path_is_glob("src/?.ts"));
        assert!(path_is_glob("src/[ab].ts"));
        assert!(!path_is_glob("src/a.ts"));
    }

    #[test]
    fn marker_parse_rejects_unknown() {
        assert_eq!(FileMarker::parse("TO-CREATE"), Some(FileMarker::ToCreate));
        assert_eq!(FileMarker::parse("TO-DELETE"), None);
    }
}
