//! Frame extraction from segmented trace blocks.
//!
//! Each convention has its own frame line shape; lines that do not match
//! are skipped silently. Output order follows line order within the block.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Frame, StackTraceBlock, TraceConvention};

// ─────────────────────────────────────────────────────────────────────────────
// Regex Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// Matches Python frame lines: `File "app/main.py", line 10, in foo`
/// Captures: 1=file_path, 2=line, 3=function
static PYTHON_FRAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"File "([^"]+)", line (\d+), in (.+)"#).expect("Invalid PYTHON_FRAME_REGEX")
});

/// Matches Java frame lines: `at com.example.Main.run(Main.java:14)`
/// Captures: 1=function, 2=file, 3=line
static JAVA_FRAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"at\s+([\w$.<>]+)\(([^():]+):(\d+)\)").expect("Invalid JAVA_FRAME_REGEX")
});

/// Matches Node.js frame lines with a function name:
/// `at handler (/srv/app/routes.js:22:11)`
/// Captures: 1=function (optional), 2=file, 3=line, 4=column
static NODE_FRAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"at\s+(?:(\S+)\s+)?\((.+):(\d+):(\d+)\)").expect("Invalid NODE_FRAME_REGEX")
});

/// Matches anonymous Node.js frame lines: `at /srv/app/index.js:8:3`
/// Captures: 1=file, 2=line, 3=column
static NODE_BARE_FRAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"at\s+([^\s()]+):(\d+):(\d+)\s*$").expect("Invalid NODE_BARE_FRAME_REGEX")
});

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Extract structured frames from a trace block using its convention's
/// patterns. Non-matching lines are not an error.
pub fn extract_frames(block: &StackTraceBlock) -> Vec<Frame> {
    block
        .lines
        .iter()
        .filter_map(|line| parse_frame_line(line, block.convention))
        .collect()
}

/// Parse a single line under one convention's frame shape
pub fn parse_frame_line(line: &str, convention: TraceConvention) -> Option<Frame> {
    match convention {
        TraceConvention::Python => {
            let caps = PYTHON_FRAME_REGEX.captures(line)?;
            Some(Frame::new(
                &caps[1],
                caps[2].parse().ok()?,
                caps[3].trim(),
            ))
        }
        TraceConvention::Java => {
            let caps = JAVA_FRAME_REGEX.captures(line)?;
            Some(Frame::new(&caps[2], caps[3].parse().ok()?, &caps[1]))
        }
        TraceConvention::NodeJs => {
            // Column number is parsed by the pattern but not retained
            if let Some(caps) = NODE_FRAME_REGEX.captures(line) {
                let function = caps.get(1).map_or("", |m| m.as_str());
                return Some(Frame::new(&caps[2], caps[3].parse().ok()?, function));
            }
            let caps = NODE_BARE_FRAME_REGEX.captures(line)?;
            Some(Frame::new(&caps[1], caps[2].parse().ok()?, ""))
        }
    }
}
