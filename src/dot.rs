//! Reading and writing transition systems in DOT (Graphviz) format.
//!
//! # Input
//!
//! A subset of the DOT language is accepted:
//!
//! ```text
//! digraph mutex {
//!     node [shape=circle];        // attribute statements are ignored
//!     0 [label="n1, n2"];         // state 0 with propositions n1 and n2
//!     1 [label="t1 n2"];          // commas and whitespace both separate propositions
//!     0 -> 1 -> 2;                // chains
//!     2 -> {0 3};                 // grouped targets
//! }
//! ```
//!
//! Node identifiers must be non-negative integers. Endpoints of edges are declared implicitly.
//!
//! # Output
//!
//! [`to_dot`] renders a system with a set of highlighted states (typically a satisfaction set),
//! which can be visualized with `dot -Tsvg result.dot -o result.svg`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::state::{State, StateSet};
use crate::transition::{TransitionSystem, TransitionSystemError};

/// Error type for DOT I/O.
#[derive(Debug)]
pub enum DotError {
    /// File I/O error.
    Io(io::Error),
    /// Parse error with the offending line (1-based).
    Parse { line: usize, message: String },
    /// The parsed graph does not form a valid transition system.
    System(TransitionSystemError),
}

impl From<io::Error> for DotError {
    fn from(e: io::Error) -> Self {
        DotError::Io(e)
    }
}

impl From<TransitionSystemError> for DotError {
    fn from(e: TransitionSystemError) -> Self {
        DotError::System(e)
    }
}

impl fmt::Display for DotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DotError::Io(e) => write!(f, "I/O error: {}", e),
            DotError::Parse { line, message } => write!(f, "Parse error at line {}: {}", line, message),
            DotError::System(e) => write!(f, "Invalid transition system: {}", e),
        }
    }
}

impl std::error::Error for DotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DotError::Io(e) => Some(e),
            DotError::Parse { .. } => None,
            DotError::System(e) => Some(e),
        }
    }
}

// ─── Reading ───

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Identifier or numeral.
    Id(String),
    /// Quoted string, without quotes.
    Str(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Eq,
    /// `->` or `--`
    Edge,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Id(s) => write!(f, "{}", s),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Semi => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Eq => write!(f, "="),
            Token::Edge => write!(f, "->"),
        }
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> DotError {
    DotError::Parse {
        line,
        message: message.into(),
    }
}

/// Split DOT source into tokens paired with their line numbers, dropping comments.
fn tokenize(content: &str) -> Result<Vec<(usize, Token)>, DotError> {
    let mut tokens = Vec::new();
    let mut chars = content.chars().peekable();
    let mut line = 1;
    let mut at_line_start = true;

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                line += 1;
                at_line_start = true;
                continue;
            }
            c if c.is_whitespace() => continue,
            // Preprocessor-style line
            '#' if at_line_start => {
                while chars.peek().is_some_and(|&c| c != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().is_some_and(|&c| c != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let start = line;
                let mut prev = '\0';
                loop {
                    match chars.next() {
                        Some('/') if prev == '*' => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            prev = c;
                        }
                        None => return Err(parse_error(start, "Unterminated comment")),
                    }
                }
            }
            '"' => {
                let start = line;
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('"') => s.push('"'),
                            Some('\n') => line += 1,
                            Some(c) => {
                                s.push('\\');
                                s.push(c);
                            }
                            None => return Err(parse_error(start, "Unterminated string")),
                        },
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            s.push(c);
                        }
                        None => return Err(parse_error(start, "Unterminated string")),
                    }
                }
                tokens.push((start, Token::Str(s)));
            }
            '{' => tokens.push((line, Token::LBrace)),
            '}' => tokens.push((line, Token::RBrace)),
            '[' => tokens.push((line, Token::LBracket)),
            ']' => tokens.push((line, Token::RBracket)),
            ';' => tokens.push((line, Token::Semi)),
            ',' => tokens.push((line, Token::Comma)),
            '=' => tokens.push((line, Token::Eq)),
            '-' if matches!(chars.peek(), Some(&'>') | Some(&'-')) => {
                chars.next();
                tokens.push((line, Token::Edge));
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' || c == '-' => {
                let mut s = String::from(c);
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        s.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((line, Token::Id(s)));
            }
            c => return Err(parse_error(line, format!("Unexpected character '{}'", c))),
        }
        at_line_start = false;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    states: StateSet,
    transitions: BTreeSet<(State, State)>,
    labels: BTreeMap<State, BTreeSet<String>>,
}

impl Parser {
    fn new(tokens: Vec<(usize, Token)>) -> Self {
        Parser {
            tokens,
            pos: 0,
            states: StateSet::new(),
            transitions: BTreeSet::new(),
            labels: BTreeMap::new(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |&(line, _)| line)
    }

    fn next(&mut self) -> Result<Token, DotError> {
        match self.tokens.get(self.pos) {
            Some((_, token)) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(parse_error(self.line(), "Unexpected end of input")),
        }
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), DotError> {
        let line = self.line();
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(parse_error(line, format!("Expected '{}', found '{}'", expected, token)))
        }
    }

    /// Parse an identifier or a quoted string.
    fn id(&mut self) -> Result<String, DotError> {
        let line = self.line();
        match self.next()? {
            Token::Id(s) | Token::Str(s) => Ok(s),
            token => Err(parse_error(line, format!("Expected identifier, found '{}'", token))),
        }
    }

    fn state(&mut self) -> Result<State, DotError> {
        let line = self.line();
        let id = self.id()?;
        let id: u32 = id
            .parse()
            .map_err(|_| parse_error(line, format!("Invalid node id '{}'", id)))?;
        let state = State::new(id);
        self.states.insert(state);
        Ok(state)
    }

    /// graph : [ strict ] (graph | digraph) [ ID ] '{' stmt_list '}'
    fn graph(&mut self) -> Result<(), DotError> {
        if matches!(self.peek(), Some(Token::Id(s)) if s.eq_ignore_ascii_case("strict")) {
            self.pos += 1;
        }
        let line = self.line();
        match self.id()? {
            kind if kind.eq_ignore_ascii_case("digraph") || kind.eq_ignore_ascii_case("graph") => {}
            kind => return Err(parse_error(line, format!("Expected 'digraph' or 'graph', found '{}'", kind))),
        }
        if !matches!(self.peek(), Some(Token::LBrace)) {
            self.id()?;
        }
        self.expect(Token::LBrace)?;
        while !self.eat(&Token::RBrace) {
            self.statement()?;
            self.eat(&Token::Semi);
        }
        if let Some(token) = self.peek() {
            return Err(parse_error(self.line(), format!("Unexpected '{}' after graph", token)));
        }
        Ok(())
    }

    fn statement(&mut self) -> Result<(), DotError> {
        let line = self.line();
        match self.peek() {
            Some(Token::Id(s))
                if ["graph", "node", "edge"].iter().any(|k| s.eq_ignore_ascii_case(k))
                    && matches!(self.tokens.get(self.pos + 1), Some((_, Token::LBracket))) =>
            {
                self.pos += 1;
                self.attributes()?;
                Ok(())
            }
            Some(Token::Id(_)) | Some(Token::Str(_))
                if matches!(self.tokens.get(self.pos + 1), Some((_, Token::Eq))) =>
            {
                // Graph attribute: ID '=' ID
                self.pos += 2;
                self.id()?;
                Ok(())
            }
            Some(Token::Id(_)) | Some(Token::Str(_)) | Some(Token::LBrace) => self.node_or_edges(),
            Some(token) => Err(parse_error(line, format!("Unexpected '{}'", token))),
            None => Err(parse_error(line, "Unexpected end of input")),
        }
    }

    /// A single endpoint or a `{ ... }` group of endpoints.
    fn endpoints(&mut self) -> Result<Vec<State>, DotError> {
        if !self.eat(&Token::LBrace) {
            return Ok(vec![self.state()?]);
        }
        let mut group = Vec::new();
        while !self.eat(&Token::RBrace) {
            group.push(self.state()?);
            self.eat(&Token::Semi);
            self.eat(&Token::Comma);
        }
        Ok(group)
    }

    fn node_or_edges(&mut self) -> Result<(), DotError> {
        let mut sources = self.endpoints()?;
        let mut is_edge = false;
        while self.eat(&Token::Edge) {
            is_edge = true;
            let targets = self.endpoints()?;
            for &source in sources.iter() {
                for &target in targets.iter() {
                    self.transitions.insert((source, target));
                }
            }
            sources = targets;
        }

        let attributes = self.attributes()?;
        if !is_edge {
            if let Some(label) = attributes.get("label") {
                let props: Vec<String> = label
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
                if !props.is_empty() {
                    for &state in sources.iter() {
                        self.labels.entry(state).or_default().extend(props.iter().cloned());
                    }
                }
            }
        }
        Ok(())
    }

    /// Zero or more `[ k = v, ... ]` lists.
    fn attributes(&mut self) -> Result<BTreeMap<String, String>, DotError> {
        let mut attributes = BTreeMap::new();
        while self.eat(&Token::LBracket) {
            while !self.eat(&Token::RBracket) {
                let key = self.id()?;
                let value = if self.eat(&Token::Eq) { self.id()? } else { String::from("true") };
                attributes.insert(key, value);
                if !self.eat(&Token::Comma) {
                    self.eat(&Token::Semi);
                }
            }
        }
        Ok(attributes)
    }

    fn finish(self) -> Result<TransitionSystem, DotError> {
        Ok(TransitionSystem::new(self.states, self.transitions, self.labels)?)
    }
}

/// Parses a transition system from DOT source.
///
/// # Example
///
/// ```
/// use ctl_rs::dot::parse_dot;
/// use ctl_rs::state::{states, State};
///
/// let ts = parse_dot("digraph { 0 [label=\"a\"]; 0 -> {1 2}; 2 -> 2 }").unwrap();
/// assert_eq!(ts.successors(State::new(0)), &states([1, 2]));
/// assert!(ts.labels(State::new(0)).contains("a"));
/// ```
pub fn parse_dot(content: &str) -> Result<TransitionSystem, DotError> {
    let tokens = tokenize(content)?;
    let mut parser = Parser::new(tokens);
    parser.graph()?;
    let ts = parser.finish()?;
    debug!(
        "parse_dot: {} states, {} transitions, {} propositions",
        ts.num_states(),
        ts.num_transitions(),
        ts.propositions().len()
    );
    Ok(ts)
}

/// Reads a transition system from a DOT file.
///
/// # Example
///
/// ```no_run
/// use ctl_rs::dot::load_dot;
///
/// let ts = load_dot("example.dot").unwrap();
/// ```
pub fn load_dot<P: AsRef<Path>>(path: P) -> Result<TransitionSystem, DotError> {
    let content = fs::read_to_string(path)?;
    parse_dot(&content)
}

// ─── Writing ───

/// Configuration options for DOT output generation.
///
/// Use `DotConfig::default()` for standard settings.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for state nodes (default: "circle")
    pub node_shape: &'static str,
    /// Fill color of highlighted states (default: "blue")
    pub highlight_fill: &'static str,
    /// Font color of highlighted states (default: "red")
    pub highlight_font: &'static str,
    /// Whether to append the state id to node labels (default: true)
    pub show_ids: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            highlight_fill: "blue",
            highlight_font: "red",
            show_ids: true,
        }
    }
}

/// Converts a transition system to DOT format, highlighting the given states.
///
/// # Example
///
/// ```
/// use ctl_rs::ctl::CtlFormula;
/// use ctl_rs::dot::to_dot;
/// use ctl_rs::transition::TransitionSystemBuilder;
///
/// let ts = TransitionSystemBuilder::new()
///     .add_states([0, 1])
///     .add_transition(0, 1)
///     .add_label(1, "p")
///     .build()
///     .unwrap();
///
/// let sat = CtlFormula::atom("p").ex().label(&ts);
/// let dot = to_dot(&ts, &sat).unwrap();
/// assert!(dot.contains("0 [label=\"(0)\", style=filled"));
/// ```
pub fn to_dot(ts: &TransitionSystem, highlighted: &StateSet) -> Result<String, fmt::Error> {
    to_dot_with_config(ts, highlighted, &DotConfig::default())
}

/// Converts a transition system to DOT format with custom configuration.
pub fn to_dot_with_config(ts: &TransitionSystem, highlighted: &StateSet, config: &DotConfig) -> Result<String, fmt::Error> {
    use std::fmt::Write as _;

    let mut dot = String::new();
    writeln!(dot, "digraph {{")?;
    writeln!(dot, "node [shape={}];", config.node_shape)?;

    for &state in ts.states() {
        let props: Vec<&str> = ts.labels(state).iter().map(|p| p.as_str()).collect();
        let mut label = props.join(", ");
        if config.show_ids {
            if !label.is_empty() {
                label.push(' ');
            }
            write!(label, "({})", state)?;
        }
        write!(dot, "{} [label=\"{}\"", state, label.replace('"', "\\\""))?;
        if highlighted.contains(&state) {
            write!(
                dot,
                ", style=filled, fillcolor={}, fontcolor={}",
                config.highlight_fill, config.highlight_font
            )?;
        }
        writeln!(dot, "];")?;
    }

    for (source, target) in ts.transitions() {
        writeln!(dot, "{} -> {};", source, target)?;
    }

    writeln!(dot, "}}")?;
    Ok(dot)
}
