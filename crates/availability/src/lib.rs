//! Court time-slot availability.
//!
//! Given a court's recurring closures and the bookings already on file, works
//! out which hour slots on a date can be booked, keeps a user's multi-slot
//! pick as an immutable [`Selection`], and prices it.
//!
//! Nothing here does I/O or holds locks. Callers pass a snapshot of courts and
//! bookings; whatever staleness that snapshot has is theirs to deal with.

pub mod booking;
pub mod clock;
pub mod court;
pub mod engine;
pub mod error;
pub mod grid;
pub mod lenient;
pub mod request;
pub mod selection;
pub mod time;

pub use booking::{BlockingPolicy, Booking, BookingStatus};
pub use clock::{booking_window, Clock, FixedClock, SystemClock};
pub use court::{Court, CourtStatus};
pub use engine::{classify_slot, is_day_fully_booked, DayAvailability, Policy, SlotStatus, SlotView};
pub use error::AvailabilityError;
pub use grid::{generate_slot_grid, Slot};
pub use request::BookingRequest;
pub use selection::{summarize, toggle_slot, BookingScope, Selection, Summary};
pub use time::{parse_date, DayOfWeek, HourSet, SlotTime, WeekdayMap};
