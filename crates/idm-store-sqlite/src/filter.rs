//! The filter dialect accepted by [`SqliteStore`](crate::SqliteStore) list
//! queries, and its translation to SQL.
//!
//! ```text
//! query   := [ clause { "and" clause } ] [ "sortBy" field [ "asc" | "desc" ] ]
//! clause  := "cql.allRecords=1" | field op value
//! op      := "==" exact | "=" case-insensitive substring | "<>" not equal
//! value   := "double-quoted" | bare-word
//! ```
//!
//! Keywords are case-insensitive; field names are not.

use idm_core::Error;
use rusqlite::types::Value;

/// Unicode-aware lowercase scalar function registered on every store
/// connection; SQLite's own `lower` and `LIKE` only fold ASCII.
pub const LOWER_FN: &str = "unicode_lower";

// ─── Fields ──────────────────────────────────────────────────────────────────

/// Filterable fields and the SQL expression each one reads.
const FIELDS: &[(&str, &str)] = &[
  ("id", "id"),
  ("status", "json_extract(jsonb, '$.status')"),
  ("beginDate", "json_extract(jsonb, '$.beginDate')"),
  ("endDate", "json_extract(jsonb, '$.endDate')"),
  ("uniLogin", "json_extract(jsonb, '$.uniLogin')"),
  ("libraryCard", "json_extract(jsonb, '$.libraryCard')"),
  ("comment", "json_extract(jsonb, '$.comment')"),
  ("personal.firstName", "json_extract(jsonb, '$.personal.firstName')"),
  ("personal.lastName", "json_extract(jsonb, '$.personal.lastName')"),
  ("personal.dateOfBirth", "json_extract(jsonb, '$.personal.dateOfBirth')"),
  ("personal.email", "json_extract(jsonb, '$.personal.email')"),
  ("personal.academicTitle", "json_extract(jsonb, '$.personal.academicTitle')"),
  (
    "personal.address.addressLine1",
    "json_extract(jsonb, '$.personal.address.addressLine1')",
  ),
  (
    "personal.address.addressLine2",
    "json_extract(jsonb, '$.personal.address.addressLine2')",
  ),
  ("personal.address.city", "json_extract(jsonb, '$.personal.address.city')"),
  ("personal.address.zipCode", "json_extract(jsonb, '$.personal.address.zipCode')"),
  ("personal.address.country", "json_extract(jsonb, '$.personal.address.country')"),
  ("metadata.createdDate", "json_extract(jsonb, '$.metadata.createdDate')"),
  ("metadata.updatedDate", "json_extract(jsonb, '$.metadata.updatedDate')"),
];

fn resolve_field(name: &str) -> Result<&'static str, Error> {
  FIELDS
    .iter()
    .find(|(n, _)| *n == name)
    .map(|(_, expr)| *expr)
    .ok_or_else(|| Error::Query(format!("unknown field {name:?}")))
}

// ─── AST ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
  Exact,
  Contains,
  NotEqual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Clause {
  column: &'static str,
  op:     Op,
  value:  String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Sort {
  column:     &'static str,
  descending: bool,
}

/// A parsed filter, ready to be rendered into SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
  clauses: Vec<Clause>,
  sort:    Option<Sort>,
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
  Word(String),
  Quoted(String),
  Op(Op),
}

fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
  let mut tokens = Vec::new();
  let mut chars = input.chars().peekable();

  while let Some(&c) = chars.peek() {
    match c {
      c if c.is_whitespace() => {
        chars.next();
      }
      '"' => {
        chars.next();
        let mut s = String::new();
        loop {
          match chars.next() {
            Some('"') => break,
            Some('\\') => match chars.next() {
              Some(escaped) => s.push(escaped),
              None => return Err(Error::Query("unterminated string".into())),
            },
            Some(other) => s.push(other),
            None => return Err(Error::Query("unterminated string".into())),
          }
        }
        tokens.push(Token::Quoted(s));
      }
      '=' => {
        chars.next();
        if chars.peek() == Some(&'=') {
          chars.next();
          tokens.push(Token::Op(Op::Exact));
        } else {
          tokens.push(Token::Op(Op::Contains));
        }
      }
      '<' => {
        chars.next();
        if chars.next() != Some('>') {
          return Err(Error::Query("expected '<>'".into()));
        }
        tokens.push(Token::Op(Op::NotEqual));
      }
      _ => {
        let mut s = String::new();
        while let Some(&c) = chars.peek() {
          if c.is_whitespace() || matches!(c, '=' | '<' | '>' | '"') {
            break;
          }
          s.push(c);
          chars.next();
        }
        if s.is_empty() {
          return Err(Error::Query(format!("unexpected character {c:?}")));
        }
        tokens.push(Token::Word(s));
      }
    }
  }

  Ok(tokens)
}

fn is_keyword(token: Option<&Token>, keyword: &str) -> bool {
  matches!(token, Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse a filter expression. Blank input yields a filter matching
/// everything.
pub fn parse(input: &str) -> Result<Filter, Error> {
  let tokens = tokenize(input)?;
  let mut iter = tokens.into_iter().peekable();
  let mut filter = Filter::default();

  if iter.peek().is_none() {
    return Ok(filter);
  }

  if !is_keyword(iter.peek(), "sortBy") {
    loop {
      let field = match iter.next() {
        Some(Token::Word(w)) => w,
        other => {
          return Err(Error::Query(format!("expected field name, found {other:?}")));
        }
      };
      let op = match iter.next() {
        Some(Token::Op(op)) => op,
        other => {
          return Err(Error::Query(format!(
            "expected operator after {field:?}, found {other:?}"
          )));
        }
      };
      let value = match iter.next() {
        Some(Token::Word(w) | Token::Quoted(w)) => w,
        other => {
          return Err(Error::Query(format!(
            "expected value after {field:?}, found {other:?}"
          )));
        }
      };

      if field.eq_ignore_ascii_case("cql.allRecords") {
        if op != Op::Contains || value != "1" {
          return Err(Error::Query("cql.allRecords only accepts =1".into()));
        }
      } else {
        let column = resolve_field(&field)?;
        let value = if column == "id" { value.to_ascii_lowercase() } else { value };
        filter.clauses.push(Clause { column, op, value });
      }

      if is_keyword(iter.peek(), "and") {
        iter.next();
        continue;
      }
      break;
    }
  }

  if is_keyword(iter.peek(), "sortBy") {
    iter.next();
    let column = match iter.next() {
      Some(Token::Word(w)) => resolve_field(&w)?,
      other => {
        return Err(Error::Query(format!("expected sort field, found {other:?}")));
      }
    };
    let descending = if is_keyword(iter.peek(), "desc") {
      iter.next();
      true
    } else {
      if is_keyword(iter.peek(), "asc") {
        iter.next();
      }
      false
    };
    filter.sort = Some(Sort { column, descending });
  }

  match iter.next() {
    None => Ok(filter),
    Some(t) => Err(Error::Query(format!("unexpected trailing token {t:?}"))),
  }
}

// ─── SQL rendering ───────────────────────────────────────────────────────────

impl Filter {
  /// `AND`-prefixed conditions to append after the tenant predicate, plus the
  /// positional (`?`) parameters they bind, in order.
  pub fn where_sql(&self) -> (String, Vec<Value>) {
    let mut sql = String::new();
    let mut params = Vec::with_capacity(self.clauses.len());

    for clause in &self.clauses {
      let col = clause.column;
      match clause.op {
        Op::Exact => {
          sql.push_str(&format!(" AND {col} = ?"));
          params.push(Value::Text(clause.value.clone()));
        }
        Op::Contains => {
          sql.push_str(&format!(" AND instr({LOWER_FN}({col}), {LOWER_FN}(?)) > 0"));
          params.push(Value::Text(clause.value.clone()));
        }
        Op::NotEqual => {
          sql.push_str(&format!(" AND IFNULL({col}, '') <> ?"));
          params.push(Value::Text(clause.value.clone()));
        }
      }
    }

    (sql, params)
  }

  /// The `ORDER BY` clause; insertion order unless a sort was requested.
  pub fn order_sql(&self) -> String {
    match &self.sort {
      Some(Sort { column, descending: true }) => format!("ORDER BY {column} DESC, rowid"),
      Some(Sort { column, descending: false }) => format!("ORDER BY {column} ASC, rowid"),
      None => "ORDER BY rowid".to_owned(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn query_err(input: &str) -> String {
    match parse(input) {
      Err(Error::Query(msg)) => msg,
      other => panic!("expected query error for {input:?}, got {other:?}"),
    }
  }

  #[test]
  fn blank_input_matches_everything() {
    assert_eq!(parse("").unwrap(), Filter::default());
    assert_eq!(parse("   ").unwrap(), Filter::default());
    assert_eq!(parse("cql.allRecords=1").unwrap(), Filter::default());
  }

  #[test]
  fn parses_conjunction_of_clauses() {
    let f = parse(r#"status=="pending" and personal.lastName=müller"#).unwrap();
    let (sql, params) = f.where_sql();
    assert_eq!(
      sql,
      " AND json_extract(jsonb, '$.status') = ? \
       AND instr(unicode_lower(json_extract(jsonb, '$.personal.lastName')), unicode_lower(?)) > 0"
    );
    assert_eq!(
      params,
      vec![Value::Text("pending".into()), Value::Text("müller".into())]
    );
  }

  #[test]
  fn quoted_values_keep_spaces_and_escapes() {
    let f = parse(r#"status == "transmission error" AND comment <> "say \"hi\"""#).unwrap();
    let (_, params) = f.where_sql();
    assert_eq!(
      params,
      vec![
        Value::Text("transmission error".into()),
        Value::Text("say \"hi\"".into()),
      ]
    );
  }

  #[test]
  fn substring_values_are_bound_verbatim() {
    let f = parse("uniLogin=a_b%").unwrap();
    let (_, params) = f.where_sql();
    assert_eq!(params, vec![Value::Text("a_b%".into())]);
  }

  #[test]
  fn sort_clause() {
    let f = parse("cql.allRecords=1 sortBy personal.lastName desc").unwrap();
    assert_eq!(
      f.order_sql(),
      "ORDER BY json_extract(jsonb, '$.personal.lastName') DESC, rowid"
    );
    assert_eq!(parse("sortby beginDate").unwrap().order_sql(),
      "ORDER BY json_extract(jsonb, '$.beginDate') ASC, rowid");
    assert_eq!(parse("status==draft").unwrap().order_sql(), "ORDER BY rowid");
  }

  #[test]
  fn id_values_are_lowercased() {
    let f = parse("id==ABCDEF").unwrap();
    let (sql, params) = f.where_sql();
    assert_eq!(sql, " AND id = ?");
    assert_eq!(params, vec![Value::Text("abcdef".into())]);
  }

  #[test]
  fn malformed_filters_are_rejected() {
    assert!(query_err("password==x").contains("unknown field"));
    assert!(query_err("status").contains("expected operator"));
    assert!(query_err("status==").contains("expected value"));
    assert!(query_err(r#"comment=="open"#).contains("unterminated"));
    assert!(query_err("status==a or status==b").contains("trailing"));
    assert!(query_err("status==a and").contains("expected field name"));
    assert!(query_err("status < a").contains("<>"));
    assert!(query_err("cql.allRecords=0").contains("allRecords"));
    assert!(query_err("sortBy").contains("sort field"));
  }
}
