//! Call stack capture.
//!
//! The walker never captures a stack itself; it asks a [`CallSites`]
//! implementation for the frames at the point of invocation. Embedders that
//! sit inside a JavaScript engine implement the trait over the engine's
//! native call sites. [`CapturedStack`] covers the common case of a stack that
//! is already available as V8 `Error.stack` text.

use crate::error::{Error, Result};
use knockknock_util::path::file_url_to_path;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

/// A single frame of a captured call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// File that made the call. Runtime-internal frames carry non-absolute
    /// specifiers such as `node:internal/modules/cjs/loader`.
    pub file: PathBuf,
    /// 1-based line number (0 when the runtime reported none).
    pub line: u32,
    /// 1-based column number (0 when the runtime reported none).
    pub column: u32,
    /// Name of the calling function, if it has one.
    pub function: Option<String>,
}

impl StackFrame {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            function: None,
        }
    }

    #[must_use]
    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.function = Some(name.into());
        self
    }
}

/// Source of call stacks.
///
/// `capture` must return frames ordered from the innermost call outwards,
/// starting with the frames of the lookup machinery itself.
pub trait CallSites: Send + Sync + std::fmt::Debug {
    fn capture(&self) -> Vec<StackFrame>;
}

/// A stack that was captured ahead of time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedStack {
    frames: Vec<StackFrame>,
}

impl CapturedStack {
    #[must_use]
    pub fn from_frames(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }

    /// Parse V8 `Error.stack` text. See [`parse_v8_stack`].
    pub fn parse(text: &str) -> Result<Self> {
        parse_v8_stack(text).map(Self::from_frames)
    }

    #[must_use]
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }
}

impl CallSites for CapturedStack {
    fn capture(&self) -> Vec<StackFrame> {
        self.frames.clone()
    }
}

fn frame_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*at\s+(?:(?P<name>.*?)\s+\((?P<loc>.*)\)|(?P<bare>.*?))\s*$")
            .expect("frame regex is valid")
    })
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<file>.*):(?P<line>\d+):(?P<col>\d+)$").expect("location regex is valid")
    })
}

/// Parse V8 `Error.stack` text into frames.
///
/// Recognised frame lines:
/// - `at name (location)`, including `async name` and `new Name`
/// - `at location` for anonymous top-level calls
///
/// `location` is `file:line:column`; `file` may be a `file://` URL, which is
/// converted to a path. Locations without a position (`native`,
/// `<anonymous>`) produce a frame with line and column 0. Lines that are not
/// frames, such as the leading `Error: message` header, are ignored.
///
/// # Errors
/// Returns [`Error::StackParse`] if a line or column number does not fit in
/// a `u32`.
pub fn parse_v8_stack(text: &str) -> Result<Vec<StackFrame>> {
    let mut frames = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let Some(caps) = frame_line_re().captures(line) else {
            continue;
        };

        let (name, location) = match (caps.name("loc"), caps.name("bare")) {
            (Some(loc), _) => (caps.name("name").map(|m| m.as_str()), loc.as_str()),
            (None, Some(bare)) => (None, bare.as_str()),
            (None, None) => continue,
        };

        let mut frame = parse_location(location, idx + 1)?;
        frame.function = name.and_then(clean_function_name);
        frames.push(frame);
    }

    Ok(frames)
}

fn parse_location(location: &str, line_no: usize) -> Result<StackFrame> {
    let Some(caps) = location_re().captures(location) else {
        return Ok(StackFrame::new(location, 0, 0));
    };

    let number = |key: &str| -> Result<u32> {
        caps[key]
            .parse()
            .map_err(|e| Error::stack_parse(line_no, format!("bad {key} number: {e}")))
    };

    let line = number("line")?;
    let column = number("col")?;
    let file = &caps["file"];
    let file = file_url_to_path(file).unwrap_or_else(|| PathBuf::from(file));

    Ok(StackFrame::new(file, line, column))
}

fn clean_function_name(raw: &str) -> Option<String> {
    let mut name = raw.trim();
    for prefix in ["async ", "new "] {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest.trim_start();
        }
    }
    // `obj.method [as alias]`
    if let Some(idx) = name.find(" [as ") {
        name = &name[..idx];
    }

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
