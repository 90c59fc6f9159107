//! Command-line interpreter: `:`, `/` and `?` lines.
//!
//! Lines are parsed into an [`ExCommand`]. Searches, line jumps and
//! substitutions are built in; every other name is forwarded to a callback the
//! host registered in an [`ExCommandRegistry`]. The interpreter never touches
//! files itself.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, VimError};
use crate::host::TextHost;
use crate::position::{Position, Range};
use crate::search::{build_regex, LastSearch};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `/pattern` or `?pattern`. An empty pattern reuses the last search.
    Search { pattern: String, forward: bool },
    /// `:<digits>`
    GotoLine(usize),
    /// `:$`
    GotoLast,
    /// `:s/.../.../` or `:%s/.../.../`
    Substitute(Substitute),
    /// Anything else, looked up in the host's command table.
    Named { name: String, args: String },
    /// `:` with nothing after it.
    Empty,
}

impl ExCommand {
    /// Parse a command line including its leading `:`, `/` or `?`.
    pub fn parse(line: &str) -> Result<Self> {
        let mut chars = line.chars();
        let prefix = chars.next();
        let body = chars.as_str();

        match prefix {
            Some('/') => Ok(ExCommand::Search {
                pattern: body.to_string(),
                forward: true,
            }),
            Some('?') => Ok(ExCommand::Search {
                pattern: body.to_string(),
                forward: false,
            }),
            _ => Self::parse_ex(body.trim()),
        }
    }

    fn parse_ex(body: &str) -> Result<Self> {
        if body.is_empty() {
            return Ok(ExCommand::Empty);
        }
        if body == "$" {
            return Ok(ExCommand::GotoLast);
        }
        if body.chars().all(|c| c.is_ascii_digit()) {
            return Ok(ExCommand::GotoLine(body.parse().unwrap_or(usize::MAX)));
        }

        let (whole_buffer, rest) = match body.strip_prefix('%') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        if let Some(args) = rest.strip_prefix('s') {
            if args.chars().next().is_some_and(is_delimiter) {
                return Substitute::parse(args, whole_buffer).map(ExCommand::Substitute);
            }
        }

        let (name, args) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], body[idx..].trim()),
            None => (body, ""),
        };
        Ok(ExCommand::Named {
            name: name.to_string(),
            args: args.to_string(),
        })
    }
}

fn is_delimiter(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '\\' | '"' | '|')
}

/// A `:s` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitute {
    /// `%` range: every line instead of the cursor line.
    pub whole_buffer: bool,
    /// Regex source. Empty means the last search pattern.
    pub pattern: String,
    /// Replacement in `regex` expansion syntax.
    pub replacement: String,
    /// `g`: every match on a line, not just the first.
    pub global: bool,
    /// `i` or `I`; case-sensitive when neither is given.
    pub ignore_case: Option<bool>,
}

/// What a substitution changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstituteReport {
    pub substitutions: usize,
    pub lines: usize,
}

impl fmt::Display for SubstituteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} substitution{} on {} line{}",
            self.substitutions,
            if self.substitutions == 1 { "" } else { "s" },
            self.lines,
            if self.lines == 1 { "" } else { "s" },
        )
    }
}

impl Substitute {
    /// Parse the part after `s`, starting with the delimiter.
    fn parse(args: &str, whole_buffer: bool) -> Result<Self> {
        let mut chars = args.chars().peekable();
        let delimiter = chars.next().unwrap_or('/');

        let mut fields = vec![String::new()];
        while let Some(c) = chars.next() {
            let field = fields.len() - 1;
            if c == '\\' {
                match chars.peek() {
                    Some(&next) if next == delimiter => {
                        fields[field].push(next);
                        chars.next();
                    }
                    Some(&next) => {
                        fields[field].push('\\');
                        fields[field].push(next);
                        chars.next();
                    }
                    None => fields[field].push('\\'),
                }
            } else if c == delimiter && fields.len() < 3 {
                fields.push(String::new());
            } else {
                fields[field].push(c);
            }
        }

        let mut fields = fields.into_iter();
        let pattern = fields.next().unwrap_or_default();
        let replacement = translate_replacement(&fields.next().unwrap_or_default());
        let flags = fields.next().unwrap_or_default();

        let mut global = false;
        let mut ignore_case = None;
        for flag in flags.trim().chars() {
            match flag {
                'g' => global = true,
                'i' => ignore_case = Some(true),
                'I' => ignore_case = Some(false),
                _ => {
                    return Err(VimError::InvalidPattern {
                        pattern: flags.clone(),
                    })
                }
            }
        }

        Ok(Self {
            whole_buffer,
            pattern,
            replacement,
            global,
            ignore_case,
        })
    }

    /// Run the substitution as a single host edit.
    ///
    /// The cursor moves to the first non-blank of the last changed line.
    pub fn apply<H: TextHost + ?Sized>(
        &self,
        host: &mut H,
        last_search: Option<&LastSearch>,
    ) -> Result<SubstituteReport> {
        let pattern = if self.pattern.is_empty() {
            last_search
                .map(|s| s.pattern.as_str())
                .ok_or(VimError::NoPreviousSearch)?
        } else {
            self.pattern.as_str()
        };
        let regex = build_regex(pattern, self.ignore_case.unwrap_or(false))?;

        let (first, last) = if self.whole_buffer {
            (1, host.line_count())
        } else {
            let line = host.cursor().line;
            (line, line)
        };

        let mut changed: Vec<(usize, String)> = Vec::new();
        let mut substitutions = 0;
        for n in first..=last {
            let line = host.line(n);
            let hits = if self.global {
                regex.find_iter(&line).count()
            } else {
                usize::from(regex.is_match(&line))
            };
            if hits == 0 {
                continue;
            }
            let replaced = if self.global {
                regex.replace_all(&line, self.replacement.as_str())
            } else {
                regex.replace(&line, self.replacement.as_str())
            };
            substitutions += hits;
            changed.push((n, replaced.into_owned()));
        }

        let (Some(&(first_changed, _)), Some(&(last_changed, _))) = (changed.first(), changed.last())
        else {
            return Err(VimError::NotFound);
        };

        // Rebuild the span from the first to the last changed line.
        let mut replacements = changed.iter().peekable();
        let mut out = Vec::with_capacity(last_changed - first_changed + 1);
        let mut physical = 0;
        let mut cursor_line = first_changed;
        for n in first_changed..=last_changed {
            let text = match replacements.peek() {
                Some((line, text)) if *line == n => {
                    cursor_line = first_changed + physical;
                    let text = text.clone();
                    replacements.next();
                    text
                }
                _ => host.line(n),
            };
            physical += text.matches('\n').count() + 1;
            out.push(text);
        }

        let range = Range::new(
            Position::new(first_changed, 1),
            Position::new(last_changed, host.line_len(last_changed) + 1),
        );
        host.edit(range, &out.join("\n"));
        let column = host.first_non_blank(cursor_line);
        host.set_cursor(Position::new(cursor_line, column));

        Ok(SubstituteReport {
            substitutions,
            lines: changed.len(),
        })
    }
}

/// Convert vim replacement syntax to `regex` expansion syntax.
///
/// `\1`..`\9`, `&` and `$&` refer to groups, `\&` is a literal ampersand,
/// `\n` and `\t` are a line break and a tab, and a bare `$` is literal.
fn translate_replacement(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(d @ '1'..='9') => {
                    out.push_str("${");
                    out.push(d);
                    out.push('}');
                }
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('$') => out.push_str("$$"),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            '&' => out.push_str("${0}"),
            '$' if chars.peek() == Some(&'&') => {
                chars.next();
                out.push_str("${0}");
            }
            '$' => out.push_str("$$"),
            other => out.push(other),
        }
    }
    out
}

/// Callback for a host-registered ex command. Receives the argument text.
pub type ExCommandHandler = Box<dyn FnMut(&str) -> Result<()>>;

/// Named ex commands supplied by the embedding application (`w`, `q`, ...).
#[derive(Default)]
pub struct ExCommandRegistry {
    commands: HashMap<String, ExCommandHandler>,
}

impl ExCommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl FnMut(&str) -> Result<()> + 'static,
    ) {
        self.commands.insert(name.into(), Box::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invoke `name` with `args`.
    pub fn invoke(&mut self, name: &str, args: &str) -> Result<()> {
        let handler = self
            .commands
            .get_mut(name)
            .ok_or_else(|| VimError::UnknownCommand(name.to_string()))?;
        tracing::debug!(name, args, "invoking ex command");
        handler(args)
    }
}

impl fmt::Debug for ExCommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExCommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
