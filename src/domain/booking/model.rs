//! Booking domain entity

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Holds its slot
    Confirmed,
    /// Released its slot
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalize a slot time to `HH:MM` so `"7:30"` and `"07:30"` share a slot.
pub fn normalize_time(raw: &str) -> DomainResult<String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| DomainError::Validation(format!("Invalid time '{}', expected HH:MM", raw)))
}

pub fn validate_party_size(number_of_people: i32) -> DomainResult<()> {
    if number_of_people < 1 {
        return Err(DomainError::Validation(
            "numberOfPeople must be at least 1".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i32,
    /// Absent for bookings whose user account was deleted
    pub user_id: Option<i32>,
    pub restaurant_id: i32,
    pub date: NaiveDate,
    /// `HH:MM`
    pub time: String,
    pub number_of_people: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn holds_slot(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Apply `changes` in place. Returns `true` when the result must be
    /// checked against other confirmed bookings, i.e. when the booking ends
    /// up confirmed and its slot or status changed.
    pub fn apply(&mut self, changes: BookingChanges) -> DomainResult<bool> {
        let before = (self.date, self.time.clone(), self.status);

        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(time) = changes.time {
            self.time = normalize_time(&time)?;
        }
        if let Some(n) = changes.number_of_people {
            validate_party_size(n)?;
            self.number_of_people = n;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }

        let after = (self.date, self.time.clone(), self.status);
        Ok(self.holds_slot() && before != after)
    }

    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Option<i32>,
    pub restaurant_id: i32,
    pub date: NaiveDate,
    pub time: String,
    pub number_of_people: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
}

/// Partial update of a booking. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub number_of_people: Option<i32>,
}

/// What the public availability view exposes about a booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOccupancy {
    pub time: String,
    pub number_of_people: i32,
    pub status: BookingStatus,
}

impl From<&Booking> for SlotOccupancy {
    fn from(b: &Booking) -> Self {
        Self {
            time: b.time.clone(),
            number_of_people: b.number_of_people,
            status: b.status,
        }
    }
}

/// A booking joined with the restaurant summary shown in "my bookings"
#[derive(Debug, Clone)]
pub struct BookingWithRestaurant {
    pub booking: Booking,
    pub restaurant_name: String,
    pub restaurant_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> Booking {
        Booking {
            id: 1,
            user_id: Some(7),
            restaurant_id: 3,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time: "19:00".into(),
            number_of_people: 2,
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: None,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn time_is_normalized() {
        assert_eq!(normalize_time("7:30").unwrap(), "07:30");
        assert_eq!(normalize_time(" 19:00 ").unwrap(), "19:00");
        assert_eq!(normalize_time("19:00:00").unwrap(), "19:00");
        assert!(normalize_time("25:00").is_err());
        assert!(normalize_time("evening").is_err());
    }

    #[test]
    fn party_size_must_be_positive() {
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(-3).is_err());
    }

    #[test]
    fn moving_a_confirmed_booking_needs_a_slot_check() {
        let mut b = sample_booking();
        let needs_check = b
            .apply(BookingChanges {
                time: Some("20:00".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(needs_check);
        assert_eq!(b.time, "20:00");
    }

    #[test]
    fn changing_party_size_keeps_the_slot() {
        let mut b = sample_booking();
        let needs_check = b
            .apply(BookingChanges {
                number_of_people: Some(4),
                ..Default::default()
            })
            .unwrap();
        assert!(!needs_check);
        assert_eq!(b.number_of_people, 4);
    }

    #[test]
    fn cancelling_never_needs_a_slot_check() {
        let mut b = sample_booking();
        let needs_check = b
            .apply(BookingChanges {
                status: Some(BookingStatus::Cancelled),
                time: Some("21:00".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(!needs_check);
        assert!(!b.holds_slot());
    }

    #[test]
    fn reconfirming_needs_a_slot_check() {
        let mut b = sample_booking();
        b.cancel();
        let needs_check = b
            .apply(BookingChanges {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            })
            .unwrap();
        assert!(needs_check);
    }

    #[test]
    fn invalid_changes_are_rejected() {
        let mut b = sample_booking();
        assert!(b
            .apply(BookingChanges {
                number_of_people: Some(0),
                ..Default::default()
            })
            .is_err());
        assert!(b
            .apply(BookingChanges {
                time: Some("noon".into()),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn status_strings() {
        assert_eq!(BookingStatus::from_str("confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::from_str("cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::from_str("pending"), None);
    }
}
