use crate::model::{MonthlyRow, Parcel, PeriodRange, StorageError};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and applies the schema and additive migrations.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS parcels (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                owner TEXT NOT NULL DEFAULT '',
                crop_type TEXT,
                area_hectares REAL NOT NULL DEFAULT 0,
                active INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS monthly_indices (
                parcel_id INTEGER NOT NULL REFERENCES parcels(id),
                year INTEGER NOT NULL,
                month INTEGER NOT NULL,
                period_text TEXT,
                ndvi_mean REAL,
                ndmi_mean REAL,
                savi_mean REAL,
                temperature_mean REAL,
                precipitation_total REAL,
                PRIMARY KEY (parcel_id, year, month)
            );
            "
        )?;

        // Columns added after the first schema version
        Self::migrate_add_column_if_missing(&conn, "parcels", "centroid_lat", "REAL")?;
        Self::migrate_add_column_if_missing(&conn, "parcels", "centroid_lon", "REAL")?;
        Self::migrate_add_column_if_missing(&conn, "parcels", "monitoring_start", "TEXT")?;

        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::new(":memory:")
    }

    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    /// Inserts or replaces a parcel.
    pub fn save_parcel(&self, parcel: &Parcel) -> Result<(), StorageError> {
        let (lat, lon) = match parcel.centroid {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };
        self.conn.execute(
            "INSERT OR REPLACE INTO parcels (
                id, name, owner, crop_type, area_hectares, active,
                centroid_lat, centroid_lon, monitoring_start
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                parcel.id,
                &parcel.name,
                &parcel.owner,
                &parcel.crop_type,
                parcel.area_hectares,
                parcel.active,
                lat,
                lon,
                parcel.monitoring_start,
            ],
        )?;
        Ok(())
    }

    /// Inserts or replaces one month of aggregated measurements.
    pub fn save_monthly_index(&self, parcel_id: i64, row: &MonthlyRow) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO monthly_indices (
                parcel_id, year, month, period_text,
                ndvi_mean, ndmi_mean, savi_mean, temperature_mean, precipitation_total
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                parcel_id,
                row.year,
                row.month,
                &row.period_text,
                row.ndvi_mean,
                row.ndmi_mean,
                row.savi_mean,
                row.temperature_mean,
                row.precipitation_total,
            ],
        )?;
        Ok(())
    }

    /// Returns the parcel only when it exists and is active.
    pub fn find_active_parcel(&self, id: i64) -> Result<Option<Parcel>, StorageError> {
        let parcel = self
            .conn
            .query_row(
                "SELECT id, name, owner, crop_type, area_hectares, active,
                        centroid_lat, centroid_lon, monitoring_start
                 FROM parcels WHERE id = ?1 AND active = 1",
                params![id],
                Self::map_parcel,
            )
            .optional()?;
        Ok(parcel)
    }

    /// Monthly rows whose (year, month) lies inside the range, oldest first.
    pub fn monthly_indices(&self, parcel_id: i64, range: &PeriodRange) -> Result<Vec<MonthlyRow>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT year, month, period_text, ndvi_mean, ndmi_mean, savi_mean,
                    temperature_mean, precipitation_total
             FROM monthly_indices
             WHERE parcel_id = ?1 AND (year * 12 + month - 1) BETWEEN ?2 AND ?3
             ORDER BY year ASC, month ASC",
        )?;

        let rows = stmt.query_map(
            params![parcel_id, range.start_key().ordinal(), range.end_key().ordinal()],
            Self::map_monthly_row,
        )?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn map_parcel(row: &Row) -> Result<Parcel, rusqlite::Error> {
        let lat: Option<f64> = row.get(6)?;
        let lon: Option<f64> = row.get(7)?;
        Ok(Parcel {
            id: row.get(0)?,
            name: row.get(1)?,
            owner: row.get(2)?,
            crop_type: row.get(3)?,
            area_hectares: row.get(4)?,
            active: row.get(5)?,
            centroid: lat.zip(lon),
            monitoring_start: row.get(8)?,
        })
    }

    fn map_monthly_row(row: &Row) -> Result<MonthlyRow, rusqlite::Error> {
        Ok(MonthlyRow {
            year: row.get(0)?,
            month: row.get(1)?,
            period_text: row.get(2)?,
            ndvi_mean: row.get(3)?,
            ndmi_mean: row.get(4)?,
            savi_mean: row.get(5)?,
            temperature_mean: row.get(6)?,
            precipitation_total: row.get(7)?,
        })
    }
}
