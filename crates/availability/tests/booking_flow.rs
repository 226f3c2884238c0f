use chrono::{Datelike, NaiveDate};
use courtside_availability::{
    booking_window, classify_slot, generate_slot_grid, is_day_fully_booked, parse_date, summarize,
    toggle_slot, Booking, BookingRequest, BookingScope, Court, DayAvailability, DayOfWeek,
    FixedClock, Policy, Selection, SlotStatus, SlotTime,
};

fn slot(s: &str) -> SlotTime {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn court_json(json: &str) -> Court {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_unavailable_weekday_blocks_every_such_date() {
    let court = court_json(r#"{"id": "c1", "unavailableDays": ["saturday", "sunday"]}"#);
    // Confirmed bookings on a closed weekday change nothing
    let bookings: Vec<Booking> = serde_json::from_str(
        r#"[
            {"courtId": "c1", "date": "2025-10-04", "times": ["09:00", "10:00"], "status": "confirmed"},
            {"courtId": "c1", "date": "2025-10-05", "times": ["18:00"], "status": "confirmed"}
        ]"#,
    )
    .unwrap();

    let window = booking_window(&FixedClock(date("2025-10-01")));
    for day in window {
        let weekend = matches!(DayOfWeek::of(day), DayOfWeek::Saturday | DayOfWeek::Sunday);
        assert_eq!(
            is_day_fully_booked(Some(&court), day, &bookings),
            weekend,
            "{} ({:?})",
            day,
            day.weekday()
        );
        if weekend {
            for s in generate_slot_grid() {
                let status = classify_slot(Some(&court), day, &bookings, s.start).unwrap();
                assert!(!status.is_interactive(), "{} {} is {}", day, s.start, status);
            }
        }
    }
}

#[test]
fn test_noon_closed_regardless_of_config() {
    let courts = [
        court_json(r#"{"id": "c1"}"#),
        court_json(r#"{"id": "c2", "status": "maintenance"}"#),
        court_json(r#"{"id": "c3", "unavailableHours": ["12:00"]}"#),
    ];
    let bookings: Vec<Booking> = serde_json::from_str(
        r#"[{"courtId": "c1", "date": "2025-12-01", "times": ["12:00"], "status": "confirmed"}]"#,
    )
    .unwrap();
    for court in &courts {
        assert_eq!(
            classify_slot(Some(court), date("2025-12-01"), &bookings, slot("12:00")),
            Some(SlotStatus::ClosedByPolicy)
        );
    }
}

#[test]
fn test_unavailable_hour_on_tuesday() {
    let court = court_json(
        r#"{"id": "c1", "unavailableHours": ["09:00"], "daySpecificUnavailableHours": {}}"#,
    );
    // 2025-12-02 is a Tuesday
    let tuesday = date("2025-12-02");
    assert_eq!(tuesday.weekday(), chrono::Weekday::Tue);
    assert_eq!(
        classify_slot(Some(&court), tuesday, &[], slot("09:00")),
        Some(SlotStatus::UnavailableByCourtConfig)
    );
    assert_eq!(
        classify_slot(Some(&court), tuesday, &[], slot("10:00")),
        Some(SlotStatus::Bookable)
    );
}

#[test]
fn test_confirmed_booking_marks_slots_booked() {
    let court = court_json(r#"{"id": "c1"}"#);
    let bookings: Vec<Booking> = serde_json::from_str(
        r#"[{"courtId": "c1", "date": "2025-12-01", "times": ["14:00", "15:00"], "status": "confirmed"}]"#,
    )
    .unwrap();
    let day = date("2025-12-01");

    for s in generate_slot_grid() {
        let status = classify_slot(Some(&court), day, &bookings, s.start).unwrap();
        let expected = match s.start_24h().as_str() {
            "12:00" => SlotStatus::ClosedByPolicy,
            "14:00" | "15:00" => SlotStatus::Booked,
            _ => SlotStatus::Bookable,
        };
        assert_eq!(status, expected, "slot {}", s.start);
    }
}

#[test]
fn test_maintenance_court_is_unselectable() {
    let court = court_json(r#"{"id": "c1", "status": "maintenance"}"#);
    let day = date("2025-12-01");

    let bookings: Vec<Booking> = serde_json::from_str(
        r#"[{"courtId": "c1", "date": "2025-12-01", "times": ["14:00", "15:00"], "status": "confirmed"}]"#,
    )
    .unwrap();

    assert!(!court.is_selectable());
    for on_file in [&[][..], &bookings[..]] {
        assert!(is_day_fully_booked(Some(&court), day, on_file));
        for s in generate_slot_grid() {
            let status = classify_slot(Some(&court), day, on_file, s.start).unwrap();
            assert!(!status.is_interactive(), "slot {} is {}", s.start, status);
        }
    }
}

#[test]
fn test_toggle_round_trip_over_whole_grid() {
    let court = court_json(r#"{"id": "c1"}"#);
    let day = DayAvailability::compute(&Policy::default(), &court, date("2025-12-01"), &[]);
    let base = Selection::from_slots([slot("08:00"), slot("17:00")]);

    for s in generate_slot_grid() {
        let status = day.classify_selected(s.start, &base);
        let once = toggle_slot(&base, s.start, status);
        let twice = toggle_slot(&once, s.start, day.classify_selected(s.start, &once));
        assert_eq!(twice, base, "slot {}", s.start);
    }
}

#[test]
fn test_switching_court_clears_selection() {
    let court_a = court_json(r#"{"id": "A", "price": 25}"#);
    let day = date("2025-12-01");
    let avail = DayAvailability::compute(&Policy::default(), &court_a, day, &[]);

    let mut scope = BookingScope::new(day).select_court(&court_a.id);
    for t in ["09:00", "10:00"] {
        scope = scope.toggle(slot(t), avail.classify_selected(slot(t), scope.selection()));
    }
    assert_eq!(scope.selection().len(), 2);
    assert_eq!(summarize(scope.selection(), court_a.price).total_price, 50);

    let scope = scope.select_court("B");
    assert!(scope.selection().is_empty());
}

#[test]
fn test_selection_to_request_and_back() {
    let court = court_json(r#"{"id": 2, "price": 20}"#);
    let day = date("2025-11-03");
    let bookings: Vec<Booking> = serde_json::from_str(
        r#"[{"courtId": 2, "date": "2025-11-03", "times": ["14:00", "15:00"], "status": "confirmed"}]"#,
    )
    .unwrap();
    let avail = DayAvailability::compute(&Policy::default(), &court, day, &bookings);

    let mut scope = BookingScope::new(day).select_court(&court.id);
    for t in ["16:00", "14:00", "13:00"] {
        scope = scope.toggle(slot(t), avail.classify_selected(slot(t), scope.selection()));
    }
    // 14:00 is booked and never made it in
    assert_eq!(scope.selection().times(), vec!["13:00", "16:00"]);

    let summary = summarize(scope.selection(), court.price);
    assert_eq!(summary.total_price, 40);
    assert_eq!(summary.label, "2 slots");

    let request = scope.to_request().unwrap();
    let path = request.path();
    assert_eq!(path, "/booking-summary/2/2025-11-03/13:00,16:00");
    assert_eq!(BookingRequest::from_path(&path).unwrap(), request);
}
