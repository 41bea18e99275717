//! Tagged step script commands
//!
//! Each script line is parsed once into a [`Command`]: a section marker, a
//! narration, a [`Mutation`] from a closed set, or a malformed line that
//! fails when (and only when) the engine tries to apply it.

use super::lexer::{Lexer, Token};
use crate::model::{Action, QueueEnd, QueueKind};

/// Prefix of a section marker line
pub const SECTION_PREFIX: &str = "#!";
/// Prefix of a narration line
pub const NARRATION_PREFIX: &str = "#";

/// One state mutation, dispatched by the replay engine
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    // Grammar definition
    AddSymbol {
        name: String,
        terminal: bool,
        start: Option<bool>,
    },
    SetSymbolName { symbol: usize, name: String },
    SetSymbolTerminal { symbol: usize, terminal: bool },
    SetSymbolStart { symbol: usize, start: bool },
    LinkProduction { symbol: usize, production: usize },
    AddProduction { head: usize, body: Vec<usize> },
    SetProductionHead { production: usize, head: usize },
    SetProductionBody { production: usize, body: Vec<usize> },

    // Attributes
    SetNullable { symbol: usize, nullable: bool },
    AddFirst { symbol: usize, member: usize },
    AddFollow { symbol: usize, member: usize },
    MergeFollow { dest: usize, src: usize },

    // Parse table
    AddAction {
        state: usize,
        symbol: usize,
        action: Action,
    },

    // Simulation queues
    Push {
        queue: QueueKind,
        end: QueueEnd,
        value: usize,
    },
    Pop { queue: QueueKind, end: QueueEnd },

    // Visualization
    Show(String),
    AddState { state: usize, description: String },
    UpdateState { state: usize, description: String },
    AddEdge { from: usize, to: usize, label: String },
    SetStart(usize),
    SetFinal(usize),
    AstAddNode { node: usize, label: String },
    AstSetParent { child: usize, parent: usize },
}

impl Mutation {
    /// Whether this mutation writes symbols, their attributes included
    pub fn writes_symbols(&self) -> bool {
        matches!(
            self,
            Mutation::AddSymbol { .. }
                | Mutation::SetSymbolName { .. }
                | Mutation::SetSymbolTerminal { .. }
                | Mutation::SetSymbolStart { .. }
                | Mutation::LinkProduction { .. }
                | Mutation::SetNullable { .. }
                | Mutation::AddFirst { .. }
                | Mutation::AddFollow { .. }
                | Mutation::MergeFollow { .. }
        )
    }

    /// Whether this mutation writes productions
    pub fn writes_productions(&self) -> bool {
        matches!(
            self,
            Mutation::AddProduction { .. }
                | Mutation::SetProductionHead { .. }
                | Mutation::SetProductionBody { .. }
        )
    }
}

/// A classified script line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Phase boundary, e.g. `#! Attributes` or `section('DFA')`
    Section(String),
    /// Status text, e.g. `# Apply shift rule.`
    Narration(String),
    Mutation(Mutation),
    /// A line that could not be parsed, with the reason
    Malformed(String),
}

impl Command {
    /// Classify and parse one (already trimmed, non-empty) line.
    pub fn parse(line: &str) -> Command {
        if let Some(rest) = line.strip_prefix(SECTION_PREFIX) {
            return Command::Section(rest.trim().to_string());
        }
        if let Some(rest) = line.strip_prefix(NARRATION_PREFIX) {
            return Command::Narration(rest.trim_start().to_string());
        }
        match parse_statement(line) {
            Ok(command) => command,
            Err(reason) => Command::Malformed(reason),
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Command::Section(_))
    }

    pub fn is_narration(&self) -> bool {
        matches!(self, Command::Narration(_))
    }

    /// Section markers and narrations are where single-stepping halts
    pub fn is_halt_point(&self) -> bool {
        self.is_section() || self.is_narration()
    }

    pub fn section_name(&self) -> Option<&str> {
        match self {
            Command::Section(name) => Some(name),
            _ => None,
        }
    }
}

// ========== Statement parser ==========

/// One accessor in an attribute chain such as `table[3][4].add('s1')`
#[derive(Debug, Clone, PartialEq)]
enum Segment<'a> {
    Name(&'a str),
    Index(i64),
    Call(Vec<Value<'a>>),
}

/// A literal or path argument
#[derive(Debug, Clone, PartialEq)]
enum Value<'a> {
    Int(i64),
    Str(String),
    Bool(bool),
    List(Vec<Value<'a>>),
    Path(Vec<Segment<'a>>),
}

/// Recursive descent parser over the tokens of one line
struct StatementParser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
}

fn parse_statement(line: &str) -> Result<Command, String> {
    let tokens = Lexer::new(line).tokenize().map_err(|e| e.to_string())?;
    let mut parser = StatementParser {
        tokens,
        position: 0,
    };
    let path = parser.parse_path()?;
    let assigned = if matches!(parser.peek(), Token::Eq(_)) {
        parser.advance();
        Some(parser.parse_value()?)
    } else {
        None
    };
    parser.expect_end()?;
    lower(&path, assigned.as_ref())
}

impl<'a> StatementParser<'a> {
    fn peek(&self) -> &Token<'a> {
        // tokenize() always ends with Eol, so the last token is a safe fallback
        self.tokens
            .get(self.position)
            .unwrap_or_else(|| &self.tokens[self.tokens.len() - 1])
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> String {
        let token = self.peek();
        format!(
            "column {}: expected {}, found {}",
            token.column(),
            expected,
            token
        )
    }

    fn expect_end(&self) -> Result<(), String> {
        match self.peek() {
            Token::Eol(_) => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    /// `ident { '[' int ']' | '.' ident | '(' args ')' }`
    fn parse_path(&mut self) -> Result<Vec<Segment<'a>>, String> {
        let mut segments = match self.advance() {
            Token::Ident(name, _) => vec![Segment::Name(name)],
            _ => {
                self.position = self.position.saturating_sub(1);
                return Err(self.unexpected("identifier"));
            }
        };

        loop {
            match self.peek() {
                Token::LBracket(_) => {
                    self.advance();
                    let index = match self.advance() {
                        Token::IntLiteral(n, _) => n,
                        _ => {
                            self.position -= 1;
                            return Err(self.unexpected("index"));
                        }
                    };
                    if !matches!(self.advance(), Token::RBracket(_)) {
                        self.position -= 1;
                        return Err(self.unexpected("']'"));
                    }
                    segments.push(Segment::Index(index));
                }
                Token::Dot(_) => {
                    self.advance();
                    match self.advance() {
                        Token::Ident(name, _) => segments.push(Segment::Name(name)),
                        _ => {
                            self.position -= 1;
                            return Err(self.unexpected("attribute name"));
                        }
                    }
                }
                Token::LParen(_) => {
                    self.advance();
                    let args = self.parse_list(|t| matches!(t, Token::RParen(_)), "')'")?;
                    segments.push(Segment::Call(args));
                }
                _ => break,
            }
        }

        Ok(segments)
    }

    /// Comma-separated values up to (and consuming) the closing token
    fn parse_list(
        &mut self,
        is_close: fn(&Token<'a>) -> bool,
        close_name: &str,
    ) -> Result<Vec<Value<'a>>, String> {
        let mut values = Vec::new();
        if is_close(self.peek()) {
            self.advance();
            return Ok(values);
        }
        loop {
            values.push(self.parse_value()?);
            match self.peek() {
                Token::Comma(_) => {
                    self.advance();
                    // Trailing comma
                    if is_close(self.peek()) {
                        self.advance();
                        return Ok(values);
                    }
                }
                t if is_close(t) => {
                    self.advance();
                    return Ok(values);
                }
                _ => return Err(self.unexpected(&format!("',' or {}", close_name))),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value<'a>, String> {
        match self.peek().clone() {
            Token::IntLiteral(n, _) => {
                self.advance();
                Ok(Value::Int(n))
            }
            Token::StringLiteral(s, _) => {
                self.advance();
                Ok(Value::Str(s))
            }
            Token::LBracket(_) => {
                self.advance();
                let items = self.parse_list(|t| matches!(t, Token::RBracket(_)), "']'")?;
                Ok(Value::List(items))
            }
            Token::Ident("True" | "true", _) => {
                self.advance();
                Ok(Value::Bool(true))
            }
            Token::Ident("False" | "false", _) => {
                self.advance();
                Ok(Value::Bool(false))
            }
            Token::Ident(_, _) => Ok(Value::Path(self.parse_path()?)),
            _ => Err(self.unexpected("value")),
        }
    }
}

// ========== Lowering into commands ==========

fn index(n: i64) -> Result<usize, String> {
    usize::try_from(n).map_err(|_| format!("negative index {}", n))
}

fn index_list(values: &[Value<'_>]) -> Result<Vec<usize>, String> {
    values
        .iter()
        .map(|v| match v {
            Value::Int(n) => index(*n),
            other => Err(format!("expected integer in list, found {:?}", other)),
        })
        .collect()
}

fn queue_end(method: &str) -> Option<(QueueEnd, bool)> {
    // (end, is_push)
    match method {
        "append" => Some((QueueEnd::Back, true)),
        "appendleft" => Some((QueueEnd::Front, true)),
        "pop" => Some((QueueEnd::Back, false)),
        "popleft" => Some((QueueEnd::Front, false)),
        _ => None,
    }
}

fn lower(path: &[Segment<'_>], assigned: Option<&Value<'_>>) -> Result<Command, String> {
    use Segment::{Call, Index, Name};

    match (path, assigned) {
        ([Name(func), Call(args)], None) => {
            if let Some(kind) = QueueKind::from_script_name(func) {
                return Err(format!("'{}' is not callable", kind.script_name()));
            }
            lower_call(func, args)
        }
        ([Name("symbol"), Index(i), rest @ ..], _) => lower_symbol(index(*i)?, rest, assigned),
        ([Name("production"), Index(i), rest @ ..], _) => {
            lower_production(index(*i)?, rest, assigned)
        }
        ([Name("table"), Index(state), Index(symbol), Name("add"), Call(args)], None) => {
            match args.as_slice() {
                [Value::Str(code)] => {
                    let action = code.parse::<Action>().map_err(|e| e.to_string())?;
                    Ok(Command::Mutation(Mutation::AddAction {
                        state: index(*state)?,
                        symbol: index(*symbol)?,
                        action,
                    }))
                }
                _ => Err("table add expects one action code string".to_string()),
            }
        }
        ([Name(queue), Name(method), Call(args)], None) => {
            let queue = QueueKind::from_script_name(queue)
                .ok_or_else(|| format!("unknown target '{}'", queue))?;
            let (end, is_push) =
                queue_end(method).ok_or_else(|| format!("unknown queue method '{}'", method))?;
            match (is_push, args.as_slice()) {
                (true, [Value::Int(v)]) => Ok(Command::Mutation(Mutation::Push {
                    queue,
                    end,
                    value: index(*v)?,
                })),
                (false, []) => Ok(Command::Mutation(Mutation::Pop { queue, end })),
                (true, _) => Err(format!("{} expects one integer", method)),
                (false, _) => Err(format!("{} takes no arguments", method)),
            }
        }
        _ => Err("unrecognized command".to_string()),
    }
}

fn lower_call(func: &str, args: &[Value<'_>]) -> Result<Command, String> {
    let mutation = match (func, args) {
        ("section", [Value::Str(name)]) => return Ok(Command::Section(name.clone())),
        ("show", [Value::Str(text)]) => Mutation::Show(text.clone()),
        ("addSymbol", [Value::Str(name), Value::Bool(terminal)]) => Mutation::AddSymbol {
            name: name.clone(),
            terminal: *terminal,
            start: None,
        },
        ("addSymbol", [Value::Str(name), Value::Bool(terminal), Value::Bool(start)]) => {
            Mutation::AddSymbol {
                name: name.clone(),
                terminal: *terminal,
                start: Some(*start),
            }
        }
        ("addProduction", [Value::Int(head), Value::List(body)]) => Mutation::AddProduction {
            head: index(*head)?,
            body: index_list(body)?,
        },
        ("addState", [Value::Int(state), Value::Str(description)]) => Mutation::AddState {
            state: index(*state)?,
            description: description.clone(),
        },
        ("updateState", [Value::Int(state), Value::Str(description)]) => Mutation::UpdateState {
            state: index(*state)?,
            description: description.clone(),
        },
        ("addEdge", [Value::Int(from), Value::Int(to), Value::Str(label)]) => Mutation::AddEdge {
            from: index(*from)?,
            to: index(*to)?,
            label: label.clone(),
        },
        ("setStart", [Value::Int(state)]) => Mutation::SetStart(index(*state)?),
        ("setFinal", [Value::Int(state)]) => Mutation::SetFinal(index(*state)?),
        ("astAddNode", [Value::Int(node), Value::Str(label)]) => Mutation::AstAddNode {
            node: index(*node)?,
            label: label.clone(),
        },
        ("astSetParent", [Value::Int(child), Value::Int(parent)]) => Mutation::AstSetParent {
            child: index(*child)?,
            parent: index(*parent)?,
        },
        (
            "section" | "show" | "addSymbol" | "addProduction" | "addState" | "updateState"
            | "addEdge" | "setStart" | "setFinal" | "astAddNode" | "astSetParent",
            _,
        ) => return Err(format!("wrong arguments for {}()", func)),
        _ => return Err(format!("unknown function '{}'", func)),
    };
    Ok(Command::Mutation(mutation))
}

fn lower_symbol(
    symbol: usize,
    rest: &[Segment<'_>],
    assigned: Option<&Value<'_>>,
) -> Result<Command, String> {
    use Segment::{Call, Name};

    let mutation = match (rest, assigned) {
        ([Name("name")], Some(Value::Str(name))) => Mutation::SetSymbolName {
            symbol,
            name: name.clone(),
        },
        ([Name("is_term")], Some(Value::Bool(terminal))) => Mutation::SetSymbolTerminal {
            symbol,
            terminal: *terminal,
        },
        ([Name("is_start")], Some(Value::Bool(start))) => Mutation::SetSymbolStart {
            symbol,
            start: *start,
        },
        ([Name("nullable")], Some(Value::Bool(nullable))) => Mutation::SetNullable {
            symbol,
            nullable: *nullable,
        },
        ([Name("productions"), Name("append"), Call(args)], None) => match args.as_slice() {
            [Value::Int(p)] => Mutation::LinkProduction {
                symbol,
                production: index(*p)?,
            },
            _ => return Err("productions.append expects one integer".to_string()),
        },
        ([Name(set @ ("first" | "follow")), Name("add"), Call(args)], None) => {
            let member = match args.as_slice() {
                [Value::Int(m)] => index(*m)?,
                _ => return Err(format!("{}.add expects one integer", set)),
            };
            if *set == "first" {
                Mutation::AddFirst { symbol, member }
            } else {
                Mutation::AddFollow { symbol, member }
            }
        }
        ([Name("follow"), Name("update"), Call(args)], None) => match args.as_slice() {
            [Value::Path(src)] => match src.as_slice() {
                [Name("symbol"), Segment::Index(s), Name("follow")] => Mutation::MergeFollow {
                    dest: symbol,
                    src: index(*s)?,
                },
                _ => return Err("follow.update expects symbol[i].follow".to_string()),
            },
            _ => return Err("follow.update expects symbol[i].follow".to_string()),
        },
        _ => return Err("unrecognized symbol command".to_string()),
    };
    Ok(Command::Mutation(mutation))
}

fn lower_production(
    production: usize,
    rest: &[Segment<'_>],
    assigned: Option<&Value<'_>>,
) -> Result<Command, String> {
    use Segment::Name;

    let mutation = match (rest, assigned) {
        ([Name("head")], Some(Value::Int(head))) => Mutation::SetProductionHead {
            production,
            head: index(*head)?,
        },
        ([Name("body")], Some(Value::List(body))) => Mutation::SetProductionBody {
            production,
            body: index_list(body)?,
        },
        _ => return Err("unrecognized production command".to_string()),
    };
    Ok(Command::Mutation(mutation))
}
