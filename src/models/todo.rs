use std::fmt;

use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::repository::schema::todos;

/// A stored todo, mapped from a `todos` row by column order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: bool,
}

/// Body of `POST /todos`. Carries no id: the database assigns it.
#[derive(Deserialize, Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: bool,
}

/// Body of `PUT /todos/{id}`.
///
/// `status` is not optional: an update always rewrites it, and an omitted
/// value means `false`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: bool,
}

/// The SET clause of an update. `None` columns are left out of the statement.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = todos)]
pub struct TodoChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: bool,
}

impl From<TodoPatch> for TodoChangeset {
    fn from(value: TodoPatch) -> Self {
        Self {
            title: value.title.filter(|title| !title.is_empty()),
            description: value.description.filter(|description| !description.is_empty()),
            status: value.status,
        }
    }
}

/// A todo id taken from the request path. Only positive values are accepted.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "i64")]
pub struct TodoId(i32);

impl TodoId {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for TodoId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match i32::try_from(value) {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(format!("invalid todo id {}: must be a positive integer", value)),
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
