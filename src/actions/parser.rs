//! Turns raw model output into a typed [`Action`].
//!
//! Expected response shape:
//!
//! ```text
//! Thought: <free-text reasoning>
//! Action: <command call>
//! ```
//!
//! The thought segment is optional; markers are matched case-insensitively.
//! The command segment is tried against the grammar in fixed order
//! (click, type, scroll, wait, press, finish, fail) and the first
//! structural match wins. Anything unrecognized yields `None`, a normal
//! outcome the loop handles rather than an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::actions::types::{Action, Command, DEFAULT_SCROLL_AMOUNT};

// The regex crate has no look-around, so the thought cannot be bounded by
// a look-ahead on the action marker. The action marker is located first
// and the thought pattern only sees the text before it.
static THOUGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)thought:\s*(.+)").expect("valid regex"));

static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)action:\s*([^\n]+)").expect("valid regex"));

pub fn parse(text: &str) -> Option<Action> {
    let marker = ACTION_RE.captures(text)?;
    let line = marker[1].trim().to_string();
    let action_start = marker.get(0).map_or(0, |m| m.start());

    let reasoning = THOUGHT_RE
        .captures(&text[..action_start])
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let command = parse_command(&line)?;
    Some(Action { command, reasoning })
}

type Builder = fn(&str) -> Option<Command>;

/// Grammar in enumeration order; ordering only matters for pathological
/// inputs since the keywords are mutually exclusive in practice.
const GRAMMAR: [(&str, Builder); 7] = [
    ("click", parse_click),
    ("type", parse_type),
    ("scroll", parse_scroll),
    ("wait", parse_wait),
    ("press", parse_press),
    ("finish", parse_finish),
    ("fail", parse_fail),
];

fn parse_command(line: &str) -> Option<Command> {
    for (keyword, build) in GRAMMAR {
        if let Some(command) = scan_keyword(line, keyword, build) {
            return Some(command);
        }
    }
    None
}

/// Tries the builder at every case-insensitive occurrence of
/// `<keyword>(` within the line, handing it the text after the paren.
fn scan_keyword(line: &str, keyword: &str, build: Builder) -> Option<Command> {
    let lower = line.to_ascii_lowercase();
    let mut from = 0;
    while let Some(rel) = lower[from..].find(keyword) {
        let at = from + rel;
        let after = at + keyword.len();
        if lower[after..].starts_with('(') {
            if let Some(command) = build(&line[after + 1..]) {
                return Some(command);
            }
        }
        from = at + 1;
    }
    None
}

fn parse_click(rest: &str) -> Option<Command> {
    let inner = &rest[..rest.find(')')?];
    let (x, y) = inner.split_once(',')?;
    Some(Command::Click {
        x: int_arg(x)?,
        y: int_arg(y)?,
    })
}

fn parse_type(rest: &str) -> Option<Command> {
    quoted_text(rest).map(|text| Command::Type { text })
}

fn parse_scroll(rest: &str) -> Option<Command> {
    let inner = &rest[..rest.find(')')?];
    let (direction, amount) = match inner.split_once(',') {
        Some((dir, amount)) => (dir, int_arg(amount)?),
        None => (inner, DEFAULT_SCROLL_AMOUNT),
    };
    let direction = direction.trim();
    if direction.is_empty() || !direction.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some(Command::Scroll {
        direction: direction.to_ascii_lowercase(),
        amount,
    })
}

fn parse_wait(rest: &str) -> Option<Command> {
    let inner = &rest[..rest.find(')')?];
    Some(Command::Wait {
        seconds: number_arg(inner)?,
    })
}

fn parse_press(rest: &str) -> Option<Command> {
    quoted_word(rest).map(|key| Command::Press { key })
}

fn parse_finish(rest: &str) -> Option<Command> {
    rest.trim_start().starts_with(')').then_some(Command::Finish)
}

fn parse_fail(rest: &str) -> Option<Command> {
    quoted_text(rest).map(|reason| Command::Fail { reason })
}

/// Unsigned integer argument, surrounding whitespace tolerated.
fn int_arg(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Integer or decimal number, e.g. `2` or `2.5`.
fn number_arg(s: &str) -> Option<f64> {
    let s = s.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (s, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    s.parse().ok()
}

/// Quoted free text. Either quote style opens, and the content runs to the
/// first quote that is followed by the closing paren, so quote characters
/// need not match and apostrophes inside the text survive.
fn quoted_text(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    if !rest.starts_with(['"', '\'']) {
        return None;
    }
    let inner = &rest[1..];
    let mut from = 0;
    while let Some(rel) = inner[from..].find(['"', '\'']) {
        let at = from + rel;
        if inner[at + 1..].trim_start().starts_with(')') {
            if at == 0 {
                return None;
            }
            return Some(inner[..at].to_string());
        }
        from = at + 1;
    }
    None
}

/// Quoted single word (key names like Enter, Tab, Escape).
fn quoted_word(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    if !rest.starts_with(['"', '\'']) {
        return None;
    }
    let inner = &rest[1..];
    let close = inner.find(['"', '\''])?;
    let word = &inner[..close];
    if word.is_empty() || !word.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    if !inner[close + 1..].trim_start().starts_with(')') {
        return None;
    }
    Some(word.to_string())
}
