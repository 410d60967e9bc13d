//! Line-oriented edit scripts.
//!
//! One command per line; blank lines and lines starting with `#` are
//! ignored. Tokens are separated by whitespace, `"..."` groups a token
//! (with `\"` and `\\` escapes), and quotes may appear inside a token
//! (`class="a b"`).
//!
//! ```text
//! replace each items item index=i
//! append expr item.name
//! first
//! after html "<hr>"
//! print
//! ```

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Attribute, AwaitBinding, EachBinding, ElementRequest, InsertPosition};

/// Cursor movement commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Next,
    Prev,
    Parent,
    FirstChild,
    LastChild,
    Root,
}

/// A parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Select(Motion),
    /// Re-tag the selected node, migrating its children
    Replace(ElementRequest),
    Insert(InsertPosition, ElementRequest),
    Remove,
    /// Emit the rendered markup
    Print,
    /// Emit the outline with the cursor
    Outline,
    /// Verify the tree invariants
    Check,
}

/// A command together with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: EditCommand,
}

/// Parses edit scripts into commands.
pub struct ScriptParser {
    token_regex: Regex,
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptParser {
    pub fn new() -> Self {
        Self {
            token_regex: Regex::new(r#"(?:[^\s"]+|"(?:[^"\\]|\\.)*")+"#)
                .expect("token pattern is valid"),
        }
    }

    #[instrument(level = "debug", skip(self, script))]
    pub fn parse(&self, script: &str) -> ApplicationResult<Vec<ScriptLine>> {
        let mut lines = Vec::new();
        for (i, text) in script.lines().enumerate() {
            let line = i + 1;
            if let Some(command) = self.parse_line(text, line)? {
                lines.push(ScriptLine { line, command });
            }
        }
        debug!(commands = lines.len(), "parsed script");
        Ok(lines)
    }

    /// Parses one line; `None` for blank and comment lines.
    pub fn parse_line(&self, text: &str, line: usize) -> ApplicationResult<Option<EditCommand>> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let tokens = self
            .tokenize(trimmed)
            .map_err(|message| ApplicationError::script(line, message))?;
        parse_command(&tokens)
            .map(Some)
            .map_err(|message| ApplicationError::script(line, message))
    }

    /// Splits a line into unquoted tokens.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>, String> {
        let mut tokens = Vec::new();
        let mut last_end = 0;
        for token in self.token_regex.find_iter(text) {
            if !text[last_end..token.start()].trim().is_empty() {
                return Err("unterminated quote".to_string());
            }
            tokens.push(unquote(token.as_str()));
            last_end = token.end();
        }
        if !text[last_end..].trim().is_empty() {
            return Err("unterminated quote".to_string());
        }
        Ok(tokens)
    }
}

fn unquote(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut quoted = false;
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '\\' if quoted => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn parse_command(tokens: &[String]) -> Result<EditCommand, String> {
    let (verb, args) = tokens
        .split_first()
        .ok_or_else(|| "empty command".to_string())?;
    let no_args = |command: EditCommand| {
        if args.is_empty() {
            Ok(command)
        } else {
            Err(format!("'{verb}' takes no arguments"))
        }
    };

    match verb.as_str() {
        "next" => no_args(EditCommand::Select(Motion::Next)),
        "prev" => no_args(EditCommand::Select(Motion::Prev)),
        "parent" => no_args(EditCommand::Select(Motion::Parent)),
        "first" => no_args(EditCommand::Select(Motion::FirstChild)),
        "last" => no_args(EditCommand::Select(Motion::LastChild)),
        "root" => no_args(EditCommand::Select(Motion::Root)),
        "remove" => no_args(EditCommand::Remove),
        "print" => no_args(EditCommand::Print),
        "outline" => no_args(EditCommand::Outline),
        "check" => no_args(EditCommand::Check),
        "replace" => {
            let request = parse_request(args)?;
            validate_replacement(&request)?;
            Ok(EditCommand::Replace(request))
        }
        "append" => Ok(EditCommand::Insert(InsertPosition::Append, parse_request(args)?)),
        "prepend" => Ok(EditCommand::Insert(InsertPosition::Prepend, parse_request(args)?)),
        "before" => Ok(EditCommand::Insert(InsertPosition::Before, parse_request(args)?)),
        "after" => Ok(EditCommand::Insert(InsertPosition::After, parse_request(args)?)),
        other => Err(format!("unknown command '{other}'")),
    }
}

/// Parses `<kind> <args>...` into a creation request.
fn parse_request(tokens: &[String]) -> Result<ElementRequest, String> {
    let (kind, args) = tokens
        .split_first()
        .ok_or_else(|| "missing element kind".to_string())?;

    match kind.as_str() {
        "element" => {
            let (tag_name, rest) = args
                .split_first()
                .ok_or_else(|| "element needs a tag name".to_string())?;
            Ok(ElementRequest::Markup {
                tag_name: tag_name.clone(),
                attributes: parse_attributes(rest)?,
            })
        }
        "component" => match args {
            [name, src, rest @ ..] => Ok(ElementRequest::Component {
                name: name.clone(),
                src: src.clone(),
                properties: parse_attributes(rest)?,
            }),
            _ => Err("component needs a name and a source".to_string()),
        },
        "if" => {
            let (conditions, with_else) = split_else_flag(args);
            if conditions.is_empty() {
                return Err("if needs at least one condition".to_string());
            }
            Ok(ElementRequest::If {
                conditions,
                with_else,
            })
        }
        "each" => {
            let (args, with_else) = split_else_flag(args);
            let [expression, binding, options @ ..] = args.as_slice() else {
                return Err("each needs an expression and a binding".to_string());
            };
            let mut binding = EachBinding::new(expression.as_str(), binding.as_str());
            for (name, value) in parse_attributes(options)? {
                match name.as_str() {
                    "index" => binding.index = Some(value),
                    "key" => binding.key = Some(value),
                    other => return Err(format!("unknown each option '{other}'")),
                }
            }
            Ok(ElementRequest::Each { binding, with_else })
        }
        "await" => match args {
            [expression, then_expression] => Ok(ElementRequest::Await(AwaitBinding {
                expression: expression.clone(),
                then_expression: then_expression.clone(),
                catch_expression: None,
            })),
            [expression, then_expression, catch_expression] => {
                Ok(ElementRequest::Await(AwaitBinding {
                    expression: expression.clone(),
                    then_expression: then_expression.clone(),
                    catch_expression: Some(catch_expression.clone()),
                }))
            }
            _ => Err("await needs an expression, a then binding and an optional catch binding"
                .to_string()),
        },
        "catch" => match args {
            [expression, catch_expression] => Ok(ElementRequest::AwaitCatch {
                expression: expression.clone(),
                catch_expression: catch_expression.clone(),
            }),
            _ => Err("catch needs an expression and a binding".to_string()),
        },
        "key" => Ok(ElementRequest::Key {
            expression: join_text(kind, args)?,
        }),
        "expr" => Ok(ElementRequest::Expression {
            expression: join_text(kind, args)?,
            html: false,
        }),
        "html" => Ok(ElementRequest::Expression {
            expression: join_text(kind, args)?,
            html: true,
        }),
        other => Err(format!("unknown element kind '{other}'")),
    }
}

/// Replacements build one `if` branch and carry over an existing else list,
/// so only a subset of requests are valid targets.
fn validate_replacement(request: &ElementRequest) -> Result<(), String> {
    match request {
        ElementRequest::If {
            conditions,
            with_else,
        } => {
            if conditions.len() != 1 || *with_else {
                return Err("replace if takes exactly one condition and no --else".to_string());
            }
            Ok(())
        }
        ElementRequest::Each { with_else, .. } => {
            if *with_else {
                return Err("replace each does not take --else".to_string());
            }
            Ok(())
        }
        ElementRequest::AwaitCatch { .. } => {
            Err("an await:catch block cannot be a replacement target".to_string())
        }
        ElementRequest::Markup { .. }
        | ElementRequest::Component { .. }
        | ElementRequest::Await(_)
        | ElementRequest::Key { .. }
        | ElementRequest::Expression { .. } => Ok(()),
    }
}

fn split_else_flag(args: &[String]) -> (Vec<String>, bool) {
    let with_else = args.iter().any(|arg| arg == "--else");
    let rest = args.iter().filter(|arg| *arg != "--else").cloned().collect();
    (rest, with_else)
}

fn parse_attributes(tokens: &[String]) -> Result<Vec<Attribute>, String> {
    tokens
        .iter()
        .map(|token| {
            token
                .split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| format!("expected name=value, got '{token}'"))
        })
        .collect()
}

fn join_text(kind: &str, args: &[String]) -> Result<String, String> {
    if args.is_empty() {
        return Err(format!("{kind} needs an expression"));
    }
    Ok(args.join(" "))
}
