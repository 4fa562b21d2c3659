use std::cmp::Ordering;

/// Declared column type. Every column is one of these two; there is no
/// boolean or floating-point column type in this core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Int,
    Varchar,
}

impl SqlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Int => "INT",
            SqlType::Varchar => "VARCHAR",
        }
    }
}

/// Runtime row cell.
///
/// Examples:
/// - `Value::Int(42)`
/// - `Value::Text("alice".into())`
/// - `Value::Null`
///
/// There is no `Bool` variant: the column type model is restricted to
/// `INT | VARCHAR`, so nothing in this core ever produces one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Int(i32),
    Text(String),
    Null,
}

impl Value {
    pub fn sql_type(&self) -> Option<SqlType> {
        match self {
            Value::Int(_) => Some(SqlType::Int),
            Value::Text(_) => Some(SqlType::Varchar),
            Value::Null => None,
        }
    }

    pub fn cmp_same_type(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn eq_same_type(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.eq(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.eq(b)),
            _ => None,
        }
    }
}
