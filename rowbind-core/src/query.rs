//! Statement assembly
//!
//! A [`Query`] is an ordered list of [`Token`]s rendered by joining each token
//! with a single space. Identifier lists render comma separated, nested
//! queries render recursively and integers render as decimals. Nothing is
//! quoted or validated, and argument values never enter the text; they travel
//! next to it as positional parameters.
//!
//! ```rust,ignore
//! use rowbind_core::query::select;
//!
//! let q = select(["name", "surname"]).from("users").where_("id=?").limit(1).offset(0);
//! assert_eq!(q.render(), "SELECT name, surname FROM users WHERE id=? LIMIT 1 OFFSET 0");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One renderable piece of a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Keyword or free text, rendered verbatim
    Text(String),
    /// Single identifier
    Ident(String),
    /// Identifier list, rendered as `a, b, c`
    List(Vec<String>),
    /// Sub-query, rendered in place
    Nested(Query),
    /// Integer literal
    Int(i64),
}

impl Token {
    fn write_to(&self, out: &mut String) {
        match self {
            Token::Text(text) | Token::Ident(text) => out.push_str(text),
            Token::List(items) => out.push_str(&items.join(", ")),
            Token::Nested(query) => query.write_to(out),
            Token::Int(value) => out.push_str(&value.to_string()),
        }
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Text(text.to_string())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::Text(text)
    }
}

impl From<i64> for Token {
    fn from(value: i64) -> Self {
        Token::Int(value)
    }
}

impl From<Vec<String>> for Token {
    fn from(items: Vec<String>) -> Self {
        Token::List(items)
    }
}

impl From<Query> for Token {
    fn from(query: Query) -> Self {
        Token::Nested(query)
    }
}

/// Tokens built from loosely typed input (e.g. a statement template stored
/// as JSON). Strings are text, integers are literals, string arrays are
/// identifier lists and other arrays are nested queries.
impl TryFrom<Value> for Token {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Token::Text(text)),
            Value::Number(number) if number.is_f64() => Err(Error::UnsupportedToken { kind: "float" }),
            Value::Number(number) => number
                .as_i64()
                .map(Token::Int)
                .ok_or(Error::UnsupportedToken { kind: "integer out of range" }),
            Value::Array(items) if items.iter().all(Value::is_string) => Ok(Token::List(
                items.into_iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
            )),
            Value::Array(items) => Ok(Token::Nested(Query::try_from(Value::Array(items))?)),
            Value::Bool(_) => Err(Error::UnsupportedToken { kind: "bool" }),
            Value::Null => Err(Error::UnsupportedToken { kind: "null" }),
            Value::Object(_) => Err(Error::UnsupportedToken { kind: "object" }),
        }
    }
}

/// Ordered token sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    tokens: Vec<Token>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append one token
    pub fn push(mut self, token: impl Into<Token>) -> Self {
        self.tokens.push(token.into());
        self
    }

    /// Append a token built from a loosely typed value
    pub fn push_value(mut self, value: Value) -> Result<Self> {
        self.tokens.push(Token::try_from(value)?);
        Ok(self)
    }

    /// Append another fragment as one nested token
    pub fn append(self, fragment: Query) -> Self {
        self.push(Token::Nested(fragment))
    }

    pub fn select(self, columns: impl IntoIdents) -> Self {
        self.append(select(columns))
    }

    pub fn from(self, tables: impl IntoIdents) -> Self {
        self.append(from(tables))
    }

    pub fn where_(self, conditions: impl IntoIdents) -> Self {
        self.append(where_(conditions))
    }

    pub fn limit(self, value: i64) -> Self {
        self.append(limit(value))
    }

    pub fn offset(self, value: i64) -> Self {
        self.append(offset(value))
    }

    pub fn update(self, table: &str, columns: impl IntoIdents) -> Self {
        self.append(update(table, columns))
    }

    pub fn insert_into(self, table: &str, columns: impl IntoIdents) -> Self {
        self.append(insert_into(table, columns))
    }

    pub fn insert_into_with(
        self,
        placeholder: &dyn Placeholder,
        table: &str,
        columns: impl IntoIdents,
    ) -> Self {
        self.append(insert_into_with(placeholder, table, columns))
    }

    /// Render the statement text
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            token.write_to(out);
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromIterator<Token> for Query {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self { tokens: iter.into_iter().collect() }
    }
}

impl TryFrom<Value> for Query {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.into_iter().map(Token::try_from).collect(),
            other => Ok(Query::new().push(Token::try_from(other)?)),
        }
    }
}

/// Identifier lists accepted by the builders
pub trait IntoIdents {
    fn into_idents(self) -> Vec<String>;
}

impl IntoIdents for &str {
    fn into_idents(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoIdents for String {
    fn into_idents(self) -> Vec<String> {
        vec![self]
    }
}

impl<S: AsRef<str>, const N: usize> IntoIdents for [S; N] {
    fn into_idents(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> IntoIdents for Vec<S> {
    fn into_idents(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> IntoIdents for &[S] {
    fn into_idents(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

/// Strategy producing positional parameter markers
pub trait Placeholder {
    fn placeholders(&self, count: usize) -> Vec<String>;
}

/// Built-in placeholder strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?, ?, ?`
    #[default]
    QuestionMark,
    /// `$1, $2, $3`
    Numbered,
}

impl Placeholder for PlaceholderStyle {
    fn placeholders(&self, count: usize) -> Vec<String> {
        match self {
            PlaceholderStyle::QuestionMark => vec!["?".to_string(); count],
            PlaceholderStyle::Numbered => (1..=count).map(|i| format!("${i}")).collect(),
        }
    }
}

impl std::str::FromStr for PlaceholderStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "?" | "question_mark" => Ok(PlaceholderStyle::QuestionMark),
            "$" | "numbered" => Ok(PlaceholderStyle::Numbered),
            other => Err(format!("unknown placeholder style '{other}'")),
        }
    }
}

fn keyword(text: &str) -> Token {
    Token::Text(text.to_string())
}

pub fn select(columns: impl IntoIdents) -> Query {
    Query { tokens: vec![keyword("SELECT"), Token::List(columns.into_idents())] }
}

pub fn from(tables: impl IntoIdents) -> Query {
    Query { tokens: vec![keyword("FROM"), Token::List(tables.into_idents())] }
}

pub fn where_(conditions: impl IntoIdents) -> Query {
    Query { tokens: vec![keyword("WHERE"), Token::List(conditions.into_idents())] }
}

pub fn limit(value: i64) -> Query {
    Query { tokens: vec![keyword("LIMIT"), Token::Int(value)] }
}

pub fn offset(value: i64) -> Query {
    Query { tokens: vec![keyword("OFFSET"), Token::Int(value)] }
}

/// `UPDATE table SET a, b` with assignments given as columns
pub fn update(table: &str, columns: impl IntoIdents) -> Query {
    Query {
        tokens: vec![
            keyword("UPDATE"),
            Token::Ident(table.to_string()),
            keyword("SET"),
            Token::List(columns.into_idents()),
        ],
    }
}

/// `INSERT INTO table ( a, b ) VALUES ( ?, ? )`
pub fn insert_into(table: &str, columns: impl IntoIdents) -> Query {
    insert_into_with(&PlaceholderStyle::QuestionMark, table, columns)
}

pub fn insert_into_with(
    placeholder: &dyn Placeholder,
    table: &str,
    columns: impl IntoIdents,
) -> Query {
    let columns = columns.into_idents();
    let markers = placeholder.placeholders(columns.len());
    Query {
        tokens: vec![
            keyword("INSERT INTO"),
            Token::Ident(table.to_string()),
            keyword("("),
            Token::List(columns),
            keyword(") VALUES ("),
            Token::List(markers),
            keyword(")"),
        ],
    }
}
