use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use courtside_availability::DayAvailability;
use dashmap::DashMap;

type DayKey = (String, NaiveDate);

/// Computed day boards keyed by (court id, date).
///
/// Entries go stale after `ttl` because bookings can be confirmed or cancelled
/// outside this process. Writes made through this server invalidate their key
/// right away.
#[derive(Debug, Clone)]
pub struct AvailabilityCache {
    ttl: Duration,
    days: Arc<DashMap<DayKey, (Instant, Arc<DayAvailability>)>>,
}

impl AvailabilityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            days: Arc::new(DashMap::new()),
        }
    }

    pub fn get(&self, court_id: &str, date: NaiveDate) -> Option<Arc<DayAvailability>> {
        let key = (court_id.to_string(), date);
        let entry = self.days.get(&key)?;
        let (stored_at, day) = entry.value();
        if stored_at.elapsed() < self.ttl {
            Some(Arc::clone(day))
        } else {
            drop(entry);
            self.days.remove(&key);
            None
        }
    }

    pub fn insert(&self, day: DayAvailability) -> Arc<DayAvailability> {
        let day = Arc::new(day);
        self.days.insert(
            (day.court_id().to_string(), day.date()),
            (Instant::now(), Arc::clone(&day)),
        );
        day
    }

    pub fn invalidate(&self, court_id: &str, date: NaiveDate) {
        self.days.remove(&(court_id.to_string(), date));
    }

    /// Drop expired entries. Called periodically from a background task.
    pub fn cleanup(&self) {
        let ttl = self.ttl;
        self.days.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }
}
