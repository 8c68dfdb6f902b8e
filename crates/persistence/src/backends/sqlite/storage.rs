//! CatalogStorage implementation for SQLite.

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::core::{CatalogStorage, ListQuery};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::name::{ParseOptions, ResourcePath};
use crate::types::Entity;

use super::SqliteBackend;
use super::transaction::SqliteTransaction;

/// Number of ancestor columns in the `resources` table.
pub(super) const MAX_ANCESTORS: usize = 2;

pub(super) fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

/// Column values derived from an entity.
pub(super) struct ResourceRow {
    pub name: String,
    pub ancestors: [String; MAX_ANCESTORS],
    pub resource_id: String,
    pub data: String,
    pub create_time: String,
    pub update_time: Option<String>,
}

impl ResourceRow {
    pub fn from_entity<E: Entity>(entity: &E) -> StorageResult<Self> {
        let path = ResourcePath::parse(entity.name(), E::COLLECTIONS, ParseOptions::strict())?;
        let ancestor_ids = path.ancestor_ids();
        if ancestor_ids.len() > MAX_ANCESTORS {
            return Err(internal_error(format!(
                "{} is nested too deeply to store",
                entity.name()
            )));
        }

        let mut ancestors: [String; MAX_ANCESTORS] = Default::default();
        for (slot, id) in ancestors.iter_mut().zip(ancestor_ids) {
            *slot = id.to_string();
        }

        Ok(Self {
            name: entity.name().to_string(),
            ancestors,
            resource_id: path.leaf_id().to_string(),
            data: serde_json::to_string(entity)?,
            create_time: entity.create_time().to_rfc3339(),
            update_time: entity.update_time().map(|t| t.to_rfc3339()),
        })
    }
}

/// Reads one entity by name on `conn`.
pub(super) fn select_by_name<E: Entity>(
    conn: &Connection,
    name: &str,
) -> StorageResult<Option<E>> {
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM resources WHERE resource_type = ?1 AND name = ?2",
            params![E::RESOURCE_TYPE, name],
            |row| row.get(0),
        )
        .optional()?;

    match data {
        Some(data) => Ok(Some(serde_json::from_str(&data)?)),
        None => Ok(None),
    }
}

/// Builds the listing SQL and its parameters.
fn list_statement(
    resource_type: &str,
    query: &ListQuery,
) -> StorageResult<(String, Vec<SqlValue>)> {
    if query.ancestors.len() > MAX_ANCESTORS {
        return Err(internal_error(format!(
            "list query has {} ancestors, at most {MAX_ANCESTORS} are supported",
            query.ancestors.len()
        )));
    }

    let mut sql = String::from("SELECT data FROM resources WHERE resource_type = ?1");
    let mut values = vec![SqlValue::Text(resource_type.to_string())];

    for (i, ancestor) in query.ancestors.iter().enumerate() {
        if let Some(id) = ancestor {
            values.push(SqlValue::Text(id.clone()));
            sql.push_str(&format!(" AND ancestor_{} = ?{}", i + 1, values.len()));
        }
    }

    sql.push_str(" ORDER BY ancestor_1, ancestor_2, resource_id");

    // A limit of -1 is unbounded in SQLite.
    let limit = if query.page_size == 0 {
        -1
    } else {
        i64::from(query.page_size)
    };
    let offset = i64::try_from(query.offset)
        .map_err(|_| internal_error(format!("offset {} out of range", query.offset)))?;
    values.push(SqlValue::Integer(limit));
    sql.push_str(&format!(" LIMIT ?{}", values.len()));
    values.push(SqlValue::Integer(offset));
    sql.push_str(&format!(" OFFSET ?{}", values.len()));

    Ok((sql, values))
}

#[async_trait]
impl CatalogStorage for SqliteBackend {
    type Transaction = SqliteTransaction;

    async fn begin(&self) -> StorageResult<Self::Transaction> {
        let conn = self.get_connection()?;
        SqliteTransaction::new(conn)
    }

    async fn get<E: Entity>(&self, name: &str) -> StorageResult<Option<E>> {
        let conn = self.get_connection()?;
        select_by_name(&conn, name)
    }

    async fn list<E: Entity>(&self, query: &ListQuery) -> StorageResult<Vec<E>> {
        let conn = self.get_connection()?;
        let (sql, values) = list_statement(E::RESOURCE_TYPE, query)?;

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))?;

        let mut entities = Vec::new();
        for row in rows {
            let data = row?;
            entities.push(serde_json::from_str(&data)?);
        }
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;
    use crate::types::{Location, Room};
    use chrono::Utc;

    fn create_test_backend() -> SqliteBackend {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();
        backend
    }

    fn location(account: &str, location: &str) -> Location {
        Location {
            name: format!("accounts/{account}/locations/{location}"),
            uid: String::new(),
            self_link: String::new(),
            display_name: location.to_string(),
            description: String::new(),
            create_time: Utc::now(),
            update_time: None,
        }
    }

    async fn insert_all(backend: &SqliteBackend, locations: &[Location]) {
        let mut tx = Box::new(backend.begin().await.unwrap());
        for location in locations {
            tx.insert(location).await.unwrap();
        }
        tx.commit().await.unwrap();
    }

    #[test]
    fn test_row_from_entity() {
        let row = ResourceRow::from_entity(&location("acme", "hq01")).unwrap();
        assert_eq!(row.ancestors, ["acme".to_string(), String::new()]);
        assert_eq!(row.resource_id, "hq01");
        assert!(row.update_time.is_none());
    }

    #[test]
    fn test_row_rejects_malformed_name() {
        let mut bad = location("acme", "hq01");
        bad.name = "accounts/acme".to_string();
        assert!(ResourceRow::from_entity(&bad).is_err());
    }

    #[test]
    fn test_list_statement_skips_wildcards() {
        let query = ListQuery {
            ancestors: vec![None, Some("hq01".to_string())],
            page_size: 10,
            offset: 5,
        };
        let (sql, values) = list_statement("Room", &query).unwrap();
        assert!(sql.contains("ancestor_2 = ?2"));
        assert!(!sql.contains("ancestor_1 ="));
        assert!(sql.ends_with("LIMIT ?3 OFFSET ?4"));
        assert_eq!(values.len(), 4);
    }

    #[tokio::test]
    async fn test_list_orders_and_scopes() {
        let backend = create_test_backend();
        insert_all(
            &backend,
            &[
                location("zeta", "aaaa"),
                location("acme", "west"),
                location("acme", "east"),
            ],
        )
        .await;

        let all: Vec<Location> = backend
            .list(&ListQuery {
                ancestors: vec![None],
                page_size: 10,
                offset: 0,
            })
            .await
            .unwrap();
        let names: Vec<_> = all.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "accounts/acme/locations/east",
                "accounts/acme/locations/west",
                "accounts/zeta/locations/aaaa",
            ]
        );

        let scoped: Vec<Location> = backend
            .list(&ListQuery {
                ancestors: vec![Some("zeta".to_string())],
                page_size: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_per_resource_type() {
        let backend = create_test_backend();
        insert_all(&backend, &[location("acme", "east")]).await;

        let rooms: Vec<Room> = backend.list(&ListQuery::default()).await.unwrap();
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let backend = create_test_backend();
        let found: Option<Location> = backend
            .get("accounts/acme/locations/east")
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
