//! Read-only structured query surface over discussions.
//!
//! A query document names one root field and optionally the discussion
//! fields to return:
//!
//! ```json
//! { "query": { "discussion": { "id": 1 } }, "fields": ["id", "text"] }
//! { "query": { "discussions": {} } }
//! ```
//!
//! Results come back as `{"data": {...}}`; a rejected document comes back as
//! `{"errors": [{"message": ...}]}`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::DiscussionLogic;
use crate::domain::discussion::Discussion;
use crate::domain::foundation::DiscussionId;

/// Root field of a query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Query {
    /// A single discussion, `null` when absent.
    Discussion { id: DiscussionId },
    /// Every discussion, ordered by id.
    Discussions {},
}

/// A query plus its field selection.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDocument {
    pub query: Query,

    /// Fields to return; every field when omitted.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

/// Selectable discussion field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Text,
}

impl Field {
    const ALL: [Field; 2] = [Field::Id, Field::Text];

    fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Text => "text",
        }
    }

    fn value_of(self, discussion: &Discussion) -> Value {
        match self {
            Field::Id => Value::from(discussion.id().as_i32()),
            Field::Text => Value::from(discussion.text()),
        }
    }
}

impl FromStr for Field {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| QueryError::UnknownField(s.to_string()))
    }
}

/// Why a query document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Field selection cannot be empty")]
    EmptySelection,

    #[error("Cannot query field '{0}' on type 'Discussion'")]
    UnknownField(String),
}

/// Parses a field selection. `None` selects every field.
pub fn parse_selection(fields: Option<&[String]>) -> Result<Vec<Field>, QueryError> {
    let Some(names) = fields else {
        return Ok(Field::ALL.to_vec());
    };
    if names.is_empty() {
        return Err(QueryError::EmptySelection);
    }

    let mut selection = Vec::with_capacity(names.len());
    for name in names {
        let field: Field = name.parse()?;
        if !selection.contains(&field) {
            selection.push(field);
        }
    }
    Ok(selection)
}

fn project(discussion: &Discussion, selection: &[Field]) -> Value {
    let object: Map<String, Value> = selection
        .iter()
        .map(|field| (field.name().to_string(), field.value_of(discussion)))
        .collect();
    Value::Object(object)
}

/// Resolves query documents through the discussion logic.
pub struct DiscussionQueryResolver<'a> {
    logic: &'a DiscussionLogic,
}

impl<'a> DiscussionQueryResolver<'a> {
    pub fn new(logic: &'a DiscussionLogic) -> Self {
        Self { logic }
    }

    /// Resolves a document into the `data` object of the response.
    ///
    /// The selection is checked before any lookup happens.
    pub async fn resolve(&self, document: &QueryDocument) -> Result<Value, QueryError> {
        let selection = parse_selection(document.fields.as_deref())?;

        let mut data = Map::new();
        match &document.query {
            Query::Discussion { id } => {
                let found = self
                    .logic
                    .get_discussion(*id)
                    .await
                    .map(|d| project(&d, &selection))
                    .unwrap_or(Value::Null);
                data.insert("discussion".to_string(), found);
            }
            Query::Discussions {} => {
                let all: Vec<Value> = self
                    .logic
                    .get_all_discussions()
                    .await
                    .iter()
                    .map(|d| project(d, &selection))
                    .collect();
                data.insert("discussions".to_string(), Value::Array(all));
            }
        }
        Ok(Value::Object(data))
    }
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryErrorMessage {
    pub message: String,
}

/// Envelope returned to query clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QueryErrorMessage>,
}

impl QueryResponse {
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![QueryErrorMessage {
                message: message.into(),
            }],
        }
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl From<Result<Value, QueryError>> for QueryResponse {
    fn from(result: Result<Value, QueryError>) -> Self {
        match result {
            Ok(data) => QueryResponse::data(data),
            Err(err) => QueryResponse::error(err.to_string()),
        }
    }
}
