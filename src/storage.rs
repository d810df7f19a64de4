use crate::error::{Result, ScraperError};
use crate::types::EnrichedCity;
use rusqlite::{params, Connection, ErrorCode};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Read/write access to the stored cities.
///
/// The store is filled once at startup and only read afterwards.
pub trait CityRepository: Send + Sync {
    /// Inserts every city in one transaction; nothing is kept if one insert fails.
    fn insert_all(&self, cities: &[EnrichedCity]) -> Result<usize>;

    /// Cities of `departement` whose rent for `surface` m² stays within `max_rent`,
    /// best rated first (unrated last), then by name.
    fn search(&self, departement: &str, max_rent: i64, surface: f64) -> Result<Vec<EnrichedCity>>;

    fn count(&self) -> Result<usize>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

/// Accepts `sqlite:///relative.db`, `sqlite:////absolute.db`, `sqlite://file.db`,
/// `sqlite::memory:` or a bare path.
pub fn parse_database_url(url: &str) -> Result<DatabaseLocation> {
    let rest = match url.strip_prefix("sqlite:") {
        Some(rest) => rest
            .strip_prefix("///")
            .or_else(|| rest.strip_prefix("//"))
            .unwrap_or(rest),
        None if url.contains("://") => {
            return Err(ScraperError::Config(format!(
                "Unsupported database url '{url}', expected sqlite"
            )))
        }
        None => url,
    };

    match rest {
        "" | ":memory:" => Ok(DatabaseLocation::Memory),
        path => Ok(DatabaseLocation::File(PathBuf::from(path))),
    }
}

pub struct SqliteCityRepository {
    conn: Mutex<Connection>,
}

impl SqliteCityRepository {
    pub fn open(database_url: &str) -> Result<Self> {
        match parse_database_url(database_url)? {
            DatabaseLocation::Memory => Self::open_in_memory(),
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                let conn = Connection::open(&path)?;
                let _mode: String =
                    conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
                Self::with_connection(conn)
            }
        }
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cities (
                code_insee   TEXT PRIMARY KEY,
                nom          TEXT NOT NULL,
                loyer_moyen  REAL NOT NULL,
                note         REAL,
                population   INTEGER NOT NULL,
                code_postal  TEXT NOT NULL,
                departement  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_cities_departement ON cities (departement);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A panic mid-query leaves the connection itself usable
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CityRepository for SqliteCityRepository {
    fn insert_all(&self, cities: &[EnrichedCity]) -> Result<usize> {
        let mut conn = self.connection();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO cities (code_insee, nom, loyer_moyen, note, population, code_postal, departement)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for city in cities {
                stmt.execute(params![
                    city.code_insee,
                    city.name,
                    city.average_rent_per_sqm,
                    city.rating,
                    city.population,
                    city.postal_code,
                    city.departement,
                ])
                .map_err(|e| insert_error(e, &city.code_insee))?;
            }
        }
        tx.commit()?;
        debug!("Inserted {} cities", cities.len());
        Ok(cities.len())
    }

    fn search(&self, departement: &str, max_rent: i64, surface: f64) -> Result<Vec<EnrichedCity>> {
        let conn = self.connection();
        let mut stmt = conn.prepare(
            "SELECT nom, loyer_moyen, note, population, code_postal, departement, code_insee
             FROM cities
             WHERE departement = ?1 AND loyer_moyen * ?2 <= ?3
             ORDER BY note DESC, nom ASC",
        )?;
        let rows = stmt.query_map(params![departement, surface, max_rent], |row| {
            Ok(EnrichedCity {
                name: row.get(0)?,
                average_rent_per_sqm: row.get(1)?,
                rating: row.get(2)?,
                population: row.get(3)?,
                postal_code: row.get(4)?,
                departement: row.get(5)?,
                code_insee: row.get(6)?,
            })
        })?;

        let mut cities = Vec::new();
        for city in rows {
            cities.push(city?);
        }
        Ok(cities)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.connection();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cities", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn insert_error(err: rusqlite::Error, code_insee: &str) -> ScraperError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation
                && message.as_deref().is_some_and(|m| m.starts_with("UNIQUE")) =>
        {
            ScraperError::DuplicateCity(code_insee.to_string())
        }
        _ => ScraperError::Database(err),
    }
}
