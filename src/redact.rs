//! PII redaction for log output.
//!
//! [`filter_datum`] rewrites `field=value<sep>` pairs in a message. The
//! [`RedactingFormat`] event formatter applies [`Redactor`] to every line
//! `tracing` writes.

use regex::{NoExpand, Regex};
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};

/// Fields treated as personally identifiable.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

pub const REDACTION: &str = "***";

/// Replace the value of each `field=...separator` with `redaction`.
#[must_use]
pub fn filter_datum<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: &str,
) -> String {
    let escaped_separator = regex::escape(separator);
    fields.iter().fold(message.to_string(), |message, field| {
        let field = field.as_ref();
        let Ok(pattern) = Regex::new(&format!(
            "{}=.*?{escaped_separator}",
            regex::escape(field)
        )) else {
            return message;
        };
        let replacement = format!("{field}={redaction}{separator}");
        pattern
            .replace_all(&message, NoExpand(&replacement))
            .into_owned()
    })
}

/// Precompiled redaction for `tracing` key/value output.
///
/// A quoted value runs to its closing quote, skipping `\"` escapes. An
/// unquoted value runs to `;`, `,`, the end of the line, or the whitespace in
/// front of the next `key=`, so values with spaces are covered whole.
#[derive(Clone, Debug)]
pub struct Redactor {
    fields: Option<Regex>,
    quoted: Option<Regex>,
    next_key: Option<Regex>,
    redaction: String,
}

impl Redactor {
    #[must_use]
    pub fn new<S: AsRef<str>>(fields: &[S], redaction: &str) -> Self {
        let alternatives: Vec<String> = fields
            .iter()
            .map(|field| regex::escape(field.as_ref()))
            .filter(|field| !field.is_empty())
            .collect();
        let fields = if alternatives.is_empty() {
            None
        } else {
            Regex::new(&format!(r"\b(?:{})=", alternatives.join("|"))).ok()
        };
        Self {
            fields,
            quoted: Regex::new(r#"^"(?:[^"\\]|\\.)*""#).ok(),
            next_key: Regex::new(r"\s+[A-Za-z_][\w.]*=").ok(),
            redaction: redaction.to_string(),
        }
    }

    #[must_use]
    pub fn redact(&self, line: &str) -> String {
        let Some(fields) = &self.fields else {
            return line.to_string();
        };

        let mut redacted = String::with_capacity(line.len());
        let mut cursor = 0;
        for key in fields.find_iter(line) {
            // keys inside an already redacted value
            if key.start() < cursor {
                continue;
            }
            redacted.push_str(&line[cursor..key.end()]);
            redacted.push_str(&self.redaction);
            cursor = key.end() + self.value_len(&line[key.end()..]);
        }
        redacted.push_str(&line[cursor..]);
        redacted
    }

    /// Byte length of the value at the start of `rest`.
    fn value_len(&self, rest: &str) -> usize {
        if let Some(quoted) = self.quoted.as_ref().and_then(|quoted| quoted.find(rest)) {
            return quoted.end();
        }

        let end = rest
            .find(|c: char| matches!(c, ';' | ',' | '\n' | '\r'))
            .unwrap_or(rest.len());
        self.next_key
            .as_ref()
            .and_then(|next_key| next_key.find(&rest[..end]))
            .map_or(end, |next_key| next_key.start())
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(&PII_FIELDS, REDACTION)
    }
}

/// Event formatter that redacts the output of an inner formatter.
#[derive(Debug)]
pub struct RedactingFormat<F> {
    inner: F,
    redactor: Redactor,
}

impl<F> RedactingFormat<F> {
    pub fn new(inner: F, redactor: Redactor) -> Self {
        Self { inner, redactor }
    }
}

impl<S, N, F> FormatEvent<S, N> for RedactingFormat<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut line = String::new();
        self.inner.format_event(ctx, Writer::new(&mut line), event)?;
        writer.write_str(&self.redactor.redact(&line))
    }
}
