//! Step scripts produced by the analysis tool
//!
//! A [`StepScript`] is the ordered list of [`Command`]s in one tool output,
//! plus the optional size header. Each line is classified once when the
//! script is loaded; the replay engine then walks it by offset.

pub mod command;
pub mod lexer;

pub use command::{Command, Mutation};

/// Prefix of the optional size header on the first line
const HEADER_PREFIX: &str = "#!nsym=";

/// Capacity hint from the `#!nsym=N,nprod=M` header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptHeader {
    pub symbols: usize,
    pub productions: usize,
}

impl ScriptHeader {
    fn parse(line: &str) -> Option<ScriptHeader> {
        let rest = line.strip_prefix(HEADER_PREFIX)?;
        let (symbols, productions) = rest.split_once(',')?;
        let productions = productions.trim().strip_prefix("nprod=")?;
        Some(ScriptHeader {
            symbols: symbols.trim().parse().ok()?,
            productions: productions.trim().parse().ok()?,
        })
    }
}

/// One command with the text and 1-based line number it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub text: String,
    pub command: Command,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepScript {
    header: Option<ScriptHeader>,
    lines: Vec<ScriptLine>,
}

fn is_preamble(line: &str) -> bool {
    line.starts_with("from ") || line.starts_with("import ")
}

impl StepScript {
    /// Parse tool output. Blank and preamble lines are dropped and do not
    /// count towards offsets.
    pub fn parse(text: &str) -> StepScript {
        let mut header = None;
        let mut lines = Vec::new();
        let mut seen_content = false;

        for (number, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !seen_content {
                seen_content = true;
                if let Some(h) = ScriptHeader::parse(trimmed) {
                    header = Some(h);
                    continue;
                }
            }
            if is_preamble(trimmed) {
                continue;
            }
            lines.push(ScriptLine {
                line: number + 1,
                text: trimmed.to_string(),
                command: Command::parse(trimmed),
            });
        }

        log::debug!(
            "loaded step script: {} commands, header {:?}",
            lines.len(),
            header
        );
        StepScript { header, lines }
    }

    /// Build a script from individual command strings, one per offset
    pub fn from_lines<I, S>(lines: I) -> StepScript
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let text = text.as_ref().trim().to_string();
                ScriptLine {
                    line: i + 1,
                    command: Command::parse(&text),
                    text,
                }
            })
            .collect();
        StepScript {
            header: None,
            lines,
        }
    }

    pub fn header(&self) -> Option<ScriptHeader> {
        self.header
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, offset: usize) -> Option<&ScriptLine> {
        self.lines.get(offset)
    }

    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    /// Offset of the first section marker named `name` at or after `from`
    pub fn find_section(&self, name: &str, from: usize) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, l)| l.command.section_name() == Some(name))
            .map(|(i, _)| i)
    }

    /// Offset of the first section marker of any name at or after `from`
    pub fn find_section_marker(&self, from: usize) -> Option<usize> {
        self.lines
            .iter()
            .skip(from)
            .position(|l| l.command.is_section())
            .map(|i| i + from)
    }

    /// Lines that failed to parse, as `(offset, reason)`
    pub fn malformed(&self) -> Vec<(usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(i, l)| match &l.command {
                Command::Malformed(reason) => Some((i, reason.as_str())),
                _ => None,
            })
            .collect()
    }
}
