use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::document::{Document, Fields, Filter, Query};
use crate::error::StoreError;

pub fn insert_document(
    conn: &Connection,
    collection: &str,
    id: &str,
    data: &Fields,
    now: i64,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(data)?;
    conn.execute(
        "INSERT INTO documents (collection, id, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![collection, id, json, now],
    )?;
    Ok(())
}

pub fn get_document(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> Result<Option<Document>, StoreError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        Some(json) => Ok(Some(Document::new(id, parse_fields(&json)?))),
        None => Ok(None),
    }
}

/// Overwrite the stored object; returns the number of rows touched.
pub fn replace_document(
    conn: &Connection,
    collection: &str,
    id: &str,
    data: &Fields,
    now: i64,
) -> Result<usize, StoreError> {
    let json = serde_json::to_string(data)?;
    let changed = conn.execute(
        "UPDATE documents SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
        params![json, now, collection, id],
    )?;
    Ok(changed)
}

/// Full result set for a query, in insertion order.
pub fn query_documents(conn: &Connection, query: &Query) -> Result<Vec<Document>, StoreError> {
    let mut sql = String::from("SELECT id, data FROM documents WHERE collection = ?1");
    let mut bound: Vec<SqlValue> = vec![SqlValue::Text(query.collection.clone())];

    if let Filter::FieldEquals { field, value } = &query.filter {
        validate_field(field)?;
        let path = format!("$.{}", field);
        match to_sql_value(value)? {
            Some(sql_value) => {
                sql.push_str(" AND json_extract(data, ?2) = ?3");
                bound.push(SqlValue::Text(path));
                bound.push(sql_value);
            }
            None => {
                sql.push_str(" AND json_extract(data, ?2) IS NULL");
                bound.push(SqlValue::Text(path));
            }
        }
    }
    sql.push_str(" ORDER BY created_at, rowid");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(bound.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, json)| Ok(Document::new(id, parse_fields(&json)?)))
        .collect()
}

pub fn count_documents(conn: &Connection, collection: &str) -> Result<i64, StoreError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        [collection],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Changes whenever another connection commits to the database file.
pub fn data_version(conn: &Connection) -> Result<i64, StoreError> {
    Ok(conn.pragma_query_value(None, "data_version", |row| row.get(0))?)
}

fn parse_fields(json: &str) -> Result<Fields, StoreError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::InvalidQuery("stored document is not an object".to_string())),
    }
}

fn validate_field(field: &str) -> Result<(), StoreError> {
    let mut chars = field.chars();
    let valid_head = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if valid_head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(StoreError::InvalidQuery(format!("invalid field name '{}'", field)))
    }
}

// json_extract yields SQL scalars: booleans come back as 0/1.
fn to_sql_value(value: &Value) -> Result<Option<SqlValue>, StoreError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(SqlValue::Integer(i64::from(*b)))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(SqlValue::Integer(i)))
            } else if let Some(f) = n.as_f64() {
                Ok(Some(SqlValue::Real(f)))
            } else {
                Err(StoreError::InvalidQuery(format!("unsupported number {}", n)))
            }
        }
        Value::String(s) => Ok(Some(SqlValue::Text(s.clone()))),
        Value::Array(_) | Value::Object(_) => Err(StoreError::InvalidQuery(
            "equality filters only support scalar values".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::create_tables;
    use serde_json::json;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn fields(value: Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn filters_by_string_and_bool_fields() {
        let conn = setup();
        insert_document(&conn, "goals", "a", &fields(json!({"userId": "u1", "completed": true})), 1).unwrap();
        insert_document(&conn, "goals", "b", &fields(json!({"userId": "u2", "completed": false})), 2).unwrap();
        insert_document(&conn, "notes", "c", &fields(json!({"userId": "u1"})), 3).unwrap();

        let mine = query_documents(&conn, &Query::collection("goals").where_eq("userId", "u1")).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "a");

        let done = query_documents(&conn, &Query::collection("goals").where_eq("completed", true)).unwrap();
        assert_eq!(done.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["a"]);

        let all = query_documents(&conn, &Query::collection("goals")).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn null_filter_matches_missing_fields() {
        let conn = setup();
        insert_document(&conn, "goals", "a", &fields(json!({"completedAt": null})), 1).unwrap();
        insert_document(&conn, "goals", "b", &fields(json!({"completedAt": 5})), 2).unwrap();
        insert_document(&conn, "goals", "c", &fields(json!({})), 3).unwrap();

        let open = query_documents(&conn, &Query::collection("goals").where_eq("completedAt", Value::Null)).unwrap();
        assert_eq!(open.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn rejects_injection_in_field_names() {
        let conn = setup();
        let query = Query::collection("goals").where_eq("x') OR 1=1 --", "y");
        assert!(matches!(query_documents(&conn, &query), Err(StoreError::InvalidQuery(_))));
    }

    #[test]
    fn replace_reports_missing_rows() {
        let conn = setup();
        let changed = replace_document(&conn, "goals", "nope", &Fields::new(), 1).unwrap();
        assert_eq!(changed, 0);
        assert!(get_document(&conn, "goals", "nope").unwrap().is_none());
    }
}
