use sqlx::SqlitePool;

use courtside_availability::{Booking, Court};

use crate::models::{BookingRow, CourtRow, NewBooking};

const COURT_SELECT: &str = "SELECT id, name, location, max_slots, price, status,
            unavailable_days, unavailable_hours, day_specific_unavailable_hours, unavailable_dates
     FROM courts";

pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    // WAL for concurrent readers
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )"
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, "001_init").await? {
        let migration_sql = include_str!("../migrations/001_init.sql");
        for statement in migration_sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(pool).await?;
            }
        }
        mark_applied(pool, "001_init").await?;
        tracing::info!("Applied migration: 001_init");
    }

    tracing::info!("Database migrations up to date");
    Ok(())
}

async fn is_applied(pool: &SqlitePool, name: &str) -> anyhow::Result<bool> {
    let applied: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(applied)
}

async fn mark_applied(pool: &SqlitePool, name: &str) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert the three demo courts once. Safe to call on every start.
pub async fn seed_demo_courts(pool: &SqlitePool) -> anyhow::Result<()> {
    if is_applied(pool, "seed_demo_courts").await? {
        return Ok(());
    }

    sqlx::query(
        "INSERT OR IGNORE INTO courts
            (id, name, location, max_slots, price, status,
             unavailable_days, unavailable_hours, day_specific_unavailable_hours, sort_order)
         VALUES
            ('1', 'Court 1', 'Main Building', 4, 25, 'active',
             '[\"saturday\",\"sunday\"]', '[\"12:00-13:00\"]', '{}', 1),
            ('2', 'Court 2', 'Outdoor Area', 5, 20, 'maintenance',
             '[]', '[]', '{}', 2),
            ('3', 'Court 3', 'Sports Complex', 6, 30, 'active',
             '[\"monday\",\"wednesday\"]', '[\"11:30-12:30\",\"16:00-17:00\"]', '{\"friday\":[\"20:00\",\"21:00\"]}', 3)"
    )
    .execute(pool)
    .await?;

    mark_applied(pool, "seed_demo_courts").await?;
    tracing::info!("Seeded demo courts");
    Ok(())
}

pub async fn list_courts(pool: &SqlitePool) -> Result<Vec<Court>, sqlx::Error> {
    let query = format!("{} ORDER BY sort_order ASC, id ASC", COURT_SELECT);
    let rows = sqlx::query_as::<_, CourtRow>(&query)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Court::from).collect())
}

pub async fn get_court(pool: &SqlitePool, id: &str) -> Result<Option<Court>, sqlx::Error> {
    let query = format!("{} WHERE id = ?", COURT_SELECT);
    let row = sqlx::query_as::<_, CourtRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Court::from))
}

/// Bookings of any status for one court between two dates, inclusive.
pub async fn bookings_between(
    pool: &SqlitePool,
    court_id: &str,
    from: &str,
    to: &str,
) -> Result<Vec<Booking>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BookingRow>(
        "SELECT court_id, date, times, status FROM bookings
         WHERE court_id = ? AND date >= ? AND date <= ?
         ORDER BY date ASC, id ASC",
    )
    .bind(court_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Booking::from).collect())
}

pub async fn bookings_on(
    pool: &SqlitePool,
    court_id: &str,
    date: &str,
) -> Result<Vec<Booking>, sqlx::Error> {
    bookings_between(pool, court_id, date, date).await
}

/// Store a booking request as `pending`. Returns the new id.
pub async fn insert_booking(pool: &SqlitePool, booking: &NewBooking) -> Result<i64, sqlx::Error> {
    let times = serde_json::to_string(&booking.times).unwrap_or_else(|_| "[]".into());
    let id = sqlx::query(
        "INSERT INTO bookings
            (court_id, date, times, status, full_name, email, phone, notes, total_price, created_at)
         VALUES (?, ?, ?, 'pending', ?, ?, ?, ?, ?, datetime('now'))",
    )
    .bind(&booking.court_id)
    .bind(&booking.date)
    .bind(&times)
    .bind(&booking.full_name)
    .bind(&booking.email)
    .bind(&booking.phone)
    .bind(&booking.notes)
    .bind(booking.total_price)
    .execute(pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use courtside_availability::{BookingStatus, CourtStatus, DayOfWeek};
    use sqlx::sqlite::SqlitePoolOptions;

    /// Single-connection in-memory pool with schema and demo courts.
    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        seed_demo_courts(&pool).await.unwrap();
        pool
    }

    fn new_booking(court_id: &str, date: &str, times: &[&str]) -> NewBooking {
        NewBooking {
            court_id: court_id.into(),
            date: date.into(),
            times: times.iter().map(|t| t.to_string()).collect(),
            full_name: "Test Player".into(),
            email: "player@example.com".into(),
            phone: String::new(),
            notes: String::new(),
            total_price: 25 * times.len() as i64,
        }
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = test_pool().await;
        run_migrations(&pool).await.unwrap();
        seed_demo_courts(&pool).await.unwrap();
        assert_eq!(list_courts(&pool).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_seeded_courts_decode() {
        let pool = test_pool().await;
        let courts = list_courts(&pool).await.unwrap();
        assert_eq!(
            courts.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "2", "3"]
        );

        let court3 = get_court(&pool, "3").await.unwrap().unwrap();
        assert_eq!(court3.unavailable_days, vec![DayOfWeek::Monday, DayOfWeek::Wednesday]);
        assert_eq!(court3.day_specific_unavailable_hours[DayOfWeek::Friday].len(), 2);

        let court2 = get_court(&pool, "2").await.unwrap().unwrap();
        assert_eq!(court2.status, CourtStatus::Maintenance);

        assert!(get_court(&pool, "99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_and_read_bookings() {
        let pool = test_pool().await;
        let id = insert_booking(&pool, &new_booking("1", "2025-12-01", &["14:00", "15:00"]))
            .await
            .unwrap();
        assert!(id > 0);
        insert_booking(&pool, &new_booking("1", "2025-12-03", &["09:00"]))
            .await
            .unwrap();
        insert_booking(&pool, &new_booking("3", "2025-12-01", &["10:00"]))
            .await
            .unwrap();

        let day = bookings_on(&pool, "1", "2025-12-01").await.unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].times, vec!["14:00", "15:00"]);
        assert_eq!(day[0].status, BookingStatus::Pending);

        let range = bookings_between(&pool, "1", "2025-12-01", "2025-12-31").await.unwrap();
        assert_eq!(range.len(), 2);
    }
}
