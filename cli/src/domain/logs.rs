//! Log query validation and line selection.
//!
//! `--tail` bounds the merged output of all services (most recent last),
//! and the pattern filter runs after tailing, the way
//! `logs --tail N | grep PATTERN` behaves.

use std::collections::VecDeque;
use std::sync::LazyLock;
use std::time::Duration;

use regex::{Regex, RegexBuilder};

use crate::domain::error::LogError;

static DURATION_PART: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)([dhms])").ok());

/// Value of `--since`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Since {
    /// Relative window ending now.
    Relative(Duration),
    /// Timestamp passed through to the orchestrator unchanged.
    Absolute(String),
}

impl Since {
    /// Parse a relative duration (`30s`, `10m`, `1h30m`, `2d`), an RFC 3339
    /// timestamp, a date (`YYYY-MM-DD`) or Unix seconds.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidSince`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, LogError> {
        let value = raw.trim();
        if let Some(duration) = parse_relative(value) {
            return Ok(Since::Relative(duration));
        }
        let is_timestamp = chrono::DateTime::parse_from_rfc3339(value).is_ok()
            || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
            || is_unix_seconds(value);
        if is_timestamp {
            Ok(Since::Absolute(value.to_string()))
        } else {
            Err(LogError::InvalidSince(raw.to_string()))
        }
    }

    /// Render for `--since`. Relative windows use Go duration syntax, which
    /// has no day unit, so days are folded into hours.
    #[must_use]
    pub fn to_arg(&self) -> String {
        match self {
            Since::Absolute(ts) => ts.clone(),
            Since::Relative(d) => {
                let total = d.as_secs();
                let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
                if h > 0 {
                    format!("{h}h{m}m{s}s")
                } else if m > 0 {
                    format!("{m}m{s}s")
                } else {
                    format!("{s}s")
                }
            }
        }
    }
}

fn parse_relative(value: &str) -> Option<Duration> {
    let re = DURATION_PART.as_ref()?;
    let mut consumed = 0;
    let mut secs: u64 = 0;
    for cap in re.captures_iter(value) {
        let whole = cap.get(0)?;
        if whole.start() != consumed {
            return None;
        }
        consumed = whole.end();
        let n: u64 = cap.get(1)?.as_str().parse().ok()?;
        let unit = match cap.get(2)?.as_str() {
            "d" => 86_400,
            "h" => 3_600,
            "m" => 60,
            _ => 1,
        };
        secs = secs.checked_add(n.checked_mul(unit)?)?;
    }
    (consumed > 0 && consumed == value.len()).then(|| Duration::from_secs(secs))
}

fn is_unix_seconds(value: &str) -> bool {
    let (int, frac) = value.split_once('.').unwrap_or((value, "0"));
    !int.is_empty()
        && int.len() >= 9
        && int.chars().all(|c| c.is_ascii_digit())
        && frac.chars().all(|c| c.is_ascii_digit())
}

/// Compiled `--grep` pattern.
#[derive(Debug, Clone)]
pub struct LogFilter {
    regex: Regex,
}

impl LogFilter {
    /// Compile `pattern` as a regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str, ignore_case: bool) -> Result<Self, LogError> {
        RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()
            .map(|regex| Self { regex })
            .map_err(|source| LogError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// A validated log request.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// Logical service name; `None` means all services.
    pub service: Option<String>,
    /// Maximum number of lines (most recent last).
    pub tail: Option<usize>,
    /// Only lines newer than this.
    pub since: Option<Since>,
    /// Prefix each line with its timestamp.
    pub timestamps: bool,
    /// Keep streaming new lines.
    pub follow: bool,
    /// Only lines matching this pattern.
    pub filter: Option<LogFilter>,
}

impl LogQuery {
    /// Whether `line` passes the pattern filter.
    #[must_use]
    pub fn accepts(&self, line: &str) -> bool {
        self.filter.as_ref().is_none_or(|f| f.matches(line))
    }
}

/// Bounded buffer keeping the most recent `cap` lines.
#[derive(Debug)]
pub struct TailBuffer {
    cap: Option<usize>,
    lines: VecDeque<String>,
}

impl TailBuffer {
    #[must_use]
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            cap,
            lines: VecDeque::new(),
        }
    }

    pub fn push(&mut self, line: String) {
        if self.cap == Some(0) {
            return;
        }
        if let Some(cap) = self.cap
            && self.lines.len() == cap
        {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines.into()
    }
}

/// Apply `tail` then `filter` to a finite sequence of lines.
#[must_use]
pub fn select_lines<I>(lines: I, tail: Option<usize>, filter: Option<&LogFilter>) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut buf = TailBuffer::new(tail);
    for line in lines {
        buf.push(line);
    }
    buf.into_lines()
        .into_iter()
        .filter(|l| filter.is_none_or(|f| f.matches(l)))
        .collect()
}
