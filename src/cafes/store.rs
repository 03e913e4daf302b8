use log::{debug, info};
use rusqlite::{params, Connection, Row};
use tokio::sync::Mutex;

use crate::cafes::model::{Cafe, NewCafe};
use crate::config::DatabaseLocation;
use crate::error::{CafeError, Result};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS cafe (
        id             INTEGER PRIMARY KEY,
        name           VARCHAR NOT NULL,
        map_url        VARCHAR NOT NULL,
        img_url        VARCHAR NOT NULL,
        location       VARCHAR NOT NULL,
        has_sockets    BOOLEAN NOT NULL,
        has_toilet     BOOLEAN NOT NULL,
        has_wifi       BOOLEAN NOT NULL,
        can_take_calls BOOLEAN NOT NULL,
        seats          VARCHAR NOT NULL,
        coffee_price   VARCHAR NOT NULL
    );
"#;

const SELECT_COLUMNS: &str = "SELECT id, name, map_url, img_url, location, has_sockets, \
     has_toilet, has_wifi, can_take_calls, seats, coffee_price FROM cafe";

/// SQLite-backed storage for cafe records
///
/// One connection is shared by all requests; every write is its own commit.
#[derive(Debug)]
pub struct CafeStore {
    conn: Mutex<Connection>,
}

impl CafeStore {
    /// Open the database at `location`, creating the cafe table if needed
    pub fn open(location: &DatabaseLocation) -> Result<Self> {
        let conn = match location {
            DatabaseLocation::Memory => Connection::open_in_memory()?,
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                Connection::open(path)?
            }
        };
        conn.execute_batch(CREATE_TABLE)?;
        info!("Opened cafe store at {:?}", location);
        Ok(Self { conn: Mutex::new(conn) })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&DatabaseLocation::Memory)
    }

    /// Every stored cafe, ascending by id
    pub async fn all(&self) -> Result<Vec<Cafe>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
        let cafes = stmt
            .query_map([], cafe_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Loaded {} cafes", cafes.len());
        Ok(cafes)
    }

    #[cfg(test)]
    pub async fn get(&self, id: i64) -> Result<Option<Cafe>> {
        let conn = self.conn.lock().await;
        find(&conn, id)
    }

    /// Insert a cafe and return it with its assigned id
    pub async fn insert(&self, cafe: &NewCafe) -> Result<Cafe> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO cafe (name, map_url, img_url, location, has_sockets, has_toilet, \
             has_wifi, can_take_calls, seats, coffee_price) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                cafe.name,
                cafe.map_url,
                cafe.img_url,
                cafe.location,
                cafe.has_sockets,
                cafe.has_toilet,
                cafe.has_wifi,
                cafe.can_take_calls,
                cafe.seats,
                cafe.coffee_price,
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!("Added cafe {} ({})", id, cafe.name);
        Ok(cafe.clone().with_id(id))
    }

    /// Delete the cafe with `id` and return it, failing with `NotFound` if there is none
    pub async fn delete(&self, id: i64) -> Result<Cafe> {
        let conn = self.conn.lock().await;
        let cafe = find(&conn, id)?.ok_or(CafeError::NotFound(id))?;
        conn.execute("DELETE FROM cafe WHERE id = ?1", params![id])?;
        info!("Deleted cafe {} ({})", id, cafe.name);
        Ok(cafe)
    }

    pub async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cafe", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn find(conn: &Connection, id: i64) -> Result<Option<Cafe>> {
    let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(cafe_from_row(row)?)),
        None => Ok(None),
    }
}

fn cafe_from_row(row: &Row<'_>) -> rusqlite::Result<Cafe> {
    Ok(Cafe {
        id: row.get(0)?,
        name: row.get(1)?,
        map_url: row.get(2)?,
        img_url: row.get(3)?,
        location: row.get(4)?,
        has_sockets: row.get(5)?,
        has_toilet: row.get(6)?,
        has_wifi: row.get(7)?,
        can_take_calls: row.get(8)?,
        seats: row.get(9)?,
        coffee_price: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> NewCafe {
        NewCafe {
            name: name.to_string(),
            map_url: "https://goo.gl/maps/example".to_string(),
            img_url: "https://example.com/cafe.jpg".to_string(),
            location: "Peckham".to_string(),
            has_sockets: true,
            has_toilet: false,
            has_wifi: true,
            can_take_calls: false,
            seats: "10-20".to_string(),
            coffee_price: "£2.75".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = CafeStore::open_in_memory().unwrap();
        let first = store.insert(&sample("Goswell Road Coffee")).await.unwrap();
        let second = store.insert(&sample("Mare Street Market")).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.get(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_all_returns_every_row_in_id_order() {
        let store = CafeStore::open_in_memory().unwrap();
        for name in ["A", "B", "C"] {
            store.insert(&sample(name)).await.unwrap();
        }

        let names: Vec<String> = store.all().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_booleans_round_trip() {
        let store = CafeStore::open_in_memory().unwrap();
        let stored = store.insert(&sample("Flags")).await.unwrap();
        let loaded = store.get(stored.id).await.unwrap().unwrap();

        assert!(loaded.has_sockets);
        assert!(!loaded.has_toilet);
        assert!(loaded.has_wifi);
        assert!(!loaded.can_take_calls);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let store = CafeStore::open_in_memory().unwrap();
        let keep = store.insert(&sample("Keep")).await.unwrap();
        let gone = store.insert(&sample("Gone")).await.unwrap();

        let removed = store.delete(gone.id).await.unwrap();
        assert_eq!(removed.name, "Gone");

        assert_eq!(store.all().await.unwrap(), vec![keep]);
        assert_eq!(store.get(gone.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = CafeStore::open_in_memory().unwrap();
        store.insert(&sample("Only")).await.unwrap();

        let err = store.delete(999).await.unwrap_err();
        assert!(matches!(err, CafeError::NotFound(999)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reopen_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let location = DatabaseLocation::File(dir.path().join("data").join("cafes.db"));

        {
            let store = CafeStore::open(&location).unwrap();
            store.insert(&sample("Persisted")).await.unwrap();
        }

        let store = CafeStore::open(&location).unwrap();
        let cafes = store.all().await.unwrap();
        assert_eq!(cafes.len(), 1);
        assert_eq!(cafes[0].name, "Persisted");
    }
}
