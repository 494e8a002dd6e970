//! Booking service
//!
//! A slot is the exact (restaurant, date, time) tuple. At most one confirmed
//! booking may hold it; the repository enforces that atomically and this
//! service maps the outcome to metrics and logs.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::booking::{normalize_time, validate_party_size};
use crate::domain::{
    Actor, Booking, BookingChanges, BookingWithRestaurant, DomainError, DomainResult, NewBooking,
    RepositoryProvider, SlotOccupancy,
};

/// A booking request as submitted by a diner
#[derive(Debug, Clone)]
pub struct BookingInput {
    pub restaurant_id: i32,
    pub date: NaiveDate,
    pub time: String,
    pub number_of_people: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Every booking of `restaurant_id` on `date`, reduced to what the
    /// public booking form needs
    pub async fn availability(
        &self,
        restaurant_id: i32,
        date: NaiveDate,
    ) -> DomainResult<Vec<SlotOccupancy>> {
        let bookings = self.repos.bookings().list_for_date(restaurant_id, date).await?;
        Ok(bookings.iter().map(SlotOccupancy::from).collect())
    }

    pub async fn create(&self, actor: &Actor, input: BookingInput) -> DomainResult<Booking> {
        let time = normalize_time(&input.time)?;
        validate_party_size(input.number_of_people)?;
        if input.customer_name.trim().is_empty() || input.customer_email.trim().is_empty() {
            return Err(DomainError::Validation(
                "customerName and customerEmail are required".into(),
            ));
        }

        let restaurant = self
            .repos
            .restaurants()
            .find_by_id(input.restaurant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", input.restaurant_id))?;
        if !restaurant.accepts_bookings() {
            return Err(DomainError::InvalidState(
                "Restaurant is not accepting bookings".into(),
            ));
        }

        let result = self
            .repos
            .bookings()
            .create_if_slot_free(NewBooking {
                user_id: Some(actor.user_id),
                restaurant_id: restaurant.id,
                date: input.date,
                time,
                number_of_people: input.number_of_people,
                customer_name: input.customer_name.trim().to_string(),
                customer_email: input.customer_email.trim().to_string(),
                customer_phone: input
                    .customer_phone
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty()),
            })
            .await;

        match result {
            Ok(booking) => {
                metrics::counter!("bookings_created_total").increment(1);
                info!(
                    booking_id = booking.id,
                    restaurant_id = booking.restaurant_id,
                    date = %booking.date,
                    time = %booking.time,
                    "Booking confirmed"
                );
                Ok(booking)
            }
            Err(e @ DomainError::SlotTaken { .. }) => {
                metrics::counter!("booking_conflicts_total").increment(1);
                warn!(restaurant_id = restaurant.id, date = %input.date, "Slot already booked");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Load a booking the actor may manage
    async fn load_managed(&self, actor: &Actor, id: i32) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", id))?;

        if !actor.owns_or_admin(booking.user_id) {
            return Err(DomainError::Forbidden(
                "You can only manage your own bookings".into(),
            ));
        }
        Ok(booking)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        changes: BookingChanges,
    ) -> DomainResult<Booking> {
        let mut booking = self.load_managed(actor, id).await?;
        let check_slot = booking.apply(changes)?;

        let saved = self.repos.bookings().save(booking, check_slot).await;
        if let Err(DomainError::SlotTaken { .. }) = saved {
            metrics::counter!("booking_conflicts_total").increment(1);
        }
        let saved = saved?;

        info!(booking_id = id, status = %saved.status, by = actor.user_id, "Booking updated");
        Ok(saved)
    }

    /// Cancel a booking. Cancelling twice is a no-op.
    pub async fn cancel(&self, actor: &Actor, id: i32) -> DomainResult<Booking> {
        let mut booking = self.load_managed(actor, id).await?;
        if !booking.holds_slot() {
            return Ok(booking);
        }

        booking.cancel();
        let saved = self.repos.bookings().save(booking, false).await?;
        info!(booking_id = id, by = actor.user_id, "Booking cancelled");
        Ok(saved)
    }

    pub async fn mine(&self, actor: &Actor) -> DomainResult<Vec<BookingWithRestaurant>> {
        self.repos.bookings().list_for_user(actor.user_id).await
    }

    /// Bookings of a restaurant, for its owner or an admin
    pub async fn for_restaurant(&self, actor: &Actor, restaurant_id: i32) -> DomainResult<Vec<Booking>> {
        let restaurant = self
            .repos
            .restaurants()
            .find_by_id(restaurant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", restaurant_id))?;

        if !actor.owns_or_admin(Some(restaurant.owner_id)) {
            return Err(DomainError::Forbidden(
                "You do not manage this restaurant".into(),
            ));
        }
        self.repos.bookings().list_for_restaurant(restaurant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::repos;
    use crate::domain::{BookingStatus, NewRestaurant, NewUser, RestaurantStatus, UserRole};

    struct Ctx {
        svc: BookingService,
        owner: Actor,
        diner: Actor,
        stranger: Actor,
        restaurant: i32,
        pending_restaurant: i32,
    }

    async fn ctx() -> Ctx {
        let repos = repos().await;
        let mut actors = Vec::new();
        for (email, role) in [
            ("owner@example.com", UserRole::BusinessOwner),
            ("diner@example.com", UserRole::User),
            ("stranger@example.com", UserRole::User),
        ] {
            let u = repos
                .users()
                .create(NewUser {
                    name: email.into(),
                    email: email.into(),
                    password_hash: "x".into(),
                    role,
                })
                .await
                .unwrap();
            actors.push(Actor::new(u.id, u.role));
        }

        let mut ids = Vec::new();
        for name in ["Open", "Waiting"] {
            let r = repos
                .restaurants()
                .create(NewRestaurant {
                    name: name.into(),
                    description: None,
                    address: "4 Dock Rd".into(),
                    zipcode: "60601".into(),
                    cuisine: "Thai".into(),
                    price_range: "$$".into(),
                    image_url: None,
                    owner_id: actors[0].user_id,
                })
                .await
                .unwrap();
            ids.push(r.id);
        }
        repos
            .restaurants()
            .set_status(ids[0], RestaurantStatus::Approved)
            .await
            .unwrap();

        Ctx {
            svc: BookingService::new(repos),
            owner: actors[0],
            diner: actors[1],
            stranger: actors[2],
            restaurant: ids[0],
            pending_restaurant: ids[1],
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 20).unwrap()
    }

    fn input(restaurant_id: i32, time: &str) -> BookingInput {
        BookingInput {
            restaurant_id,
            date: day(),
            time: time.into(),
            number_of_people: 4,
            customer_name: "Lin".into(),
            customer_email: "lin@example.com".into(),
            customer_phone: Some("  ".into()),
        }
    }

    #[tokio::test]
    async fn create_records_the_caller_and_normalizes_time() {
        let c = ctx().await;
        let b = c.svc.create(&c.diner, input(c.restaurant, "7:30")).await.unwrap();
        assert_eq!(b.user_id, Some(c.diner.user_id));
        assert_eq!(b.time, "07:30");
        assert_eq!(b.customer_phone, None);
        assert_eq!(b.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn double_booking_a_slot_fails() {
        let c = ctx().await;
        c.svc.create(&c.diner, input(c.restaurant, "19:00")).await.unwrap();
        let err = c
            .svc
            .create(&c.stranger, input(c.restaurant, "19:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotTaken { .. }));
        assert_eq!(err.to_string(), "This time slot is already booked");
    }

    #[tokio::test]
    async fn restaurant_must_exist_and_be_approved() {
        let c = ctx().await;
        assert!(matches!(
            c.svc.create(&c.diner, input(9999, "19:00")).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            c.svc.create(&c.diner, input(c.pending_restaurant, "19:00")).await,
            Err(DomainError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn invalid_requests_are_rejected() {
        let c = ctx().await;
        let mut bad = input(c.restaurant, "19:00");
        bad.number_of_people = 0;
        assert!(matches!(c.svc.create(&c.diner, bad).await, Err(DomainError::Validation(_))));

        let mut bad = input(c.restaurant, "dinner");
        bad.number_of_people = 2;
        assert!(matches!(c.svc.create(&c.diner, bad).await, Err(DomainError::Validation(_))));

        let mut bad = input(c.restaurant, "19:00");
        bad.customer_email = String::new();
        assert!(matches!(c.svc.create(&c.diner, bad).await, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn availability_lists_every_booking_of_the_day() {
        let c = ctx().await;
        c.svc.create(&c.diner, input(c.restaurant, "20:00")).await.unwrap();
        let early = c.svc.create(&c.diner, input(c.restaurant, "18:00")).await.unwrap();
        c.svc.cancel(&c.diner, early.id).await.unwrap();

        let slots = c.svc.availability(c.restaurant, day()).await.unwrap();
        assert_eq!(
            slots,
            vec![
                SlotOccupancy {
                    time: "18:00".into(),
                    number_of_people: 4,
                    status: BookingStatus::Cancelled,
                },
                SlotOccupancy {
                    time: "20:00".into(),
                    number_of_people: 4,
                    status: BookingStatus::Confirmed,
                },
            ]
        );
    }

    #[tokio::test]
    async fn only_the_booker_or_an_admin_may_update() {
        let c = ctx().await;
        let b = c.svc.create(&c.diner, input(c.restaurant, "19:00")).await.unwrap();
        let more_people = BookingChanges {
            number_of_people: Some(6),
            ..Default::default()
        };

        assert!(matches!(
            c.svc.update(&c.stranger, b.id, more_people.clone()).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            c.svc.update(&c.owner, b.id, more_people.clone()).await,
            Err(DomainError::Forbidden(_))
        ));

        let updated = c.svc.update(&c.diner, b.id, more_people).await.unwrap();
        assert_eq!(updated.number_of_people, 6);

        let admin = Actor::new(0, UserRole::Admin);
        let moved = c
            .svc
            .update(
                &admin,
                b.id,
                BookingChanges {
                    time: Some("21:15".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.time, "21:15");
    }

    #[tokio::test]
    async fn moving_into_a_taken_slot_fails() {
        let c = ctx().await;
        c.svc.create(&c.stranger, input(c.restaurant, "19:00")).await.unwrap();
        let mine = c.svc.create(&c.diner, input(c.restaurant, "20:00")).await.unwrap();

        let err = c
            .svc
            .update(
                &c.diner,
                mine.id,
                BookingChanges {
                    time: Some("19:00".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotTaken { .. }));
    }

    #[tokio::test]
    async fn reconfirming_into_a_rebooked_slot_fails() {
        let c = ctx().await;
        let mine = c.svc.create(&c.diner, input(c.restaurant, "19:00")).await.unwrap();
        c.svc.cancel(&c.diner, mine.id).await.unwrap();
        c.svc.create(&c.stranger, input(c.restaurant, "19:00")).await.unwrap();

        let err = c
            .svc
            .update(
                &c.diner,
                mine.id,
                BookingChanges {
                    status: Some(BookingStatus::Confirmed),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotTaken { .. }));
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_frees_the_slot() {
        let c = ctx().await;
        let b = c.svc.create(&c.diner, input(c.restaurant, "19:00")).await.unwrap();

        let first = c.svc.cancel(&c.diner, b.id).await.unwrap();
        let second = c.svc.cancel(&c.diner, b.id).await.unwrap();
        assert_eq!(first.status, BookingStatus::Cancelled);
        assert_eq!(second.status, BookingStatus::Cancelled);

        c.svc.create(&c.stranger, input(c.restaurant, "19:00")).await.unwrap();
    }

    #[tokio::test]
    async fn owner_sees_restaurant_bookings_diner_sees_own() {
        let c = ctx().await;
        c.svc.create(&c.diner, input(c.restaurant, "19:00")).await.unwrap();
        c.svc.create(&c.stranger, input(c.restaurant, "20:00")).await.unwrap();

        let all = c.svc.for_restaurant(&c.owner, c.restaurant).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(matches!(
            c.svc.for_restaurant(&c.diner, c.restaurant).await,
            Err(DomainError::Forbidden(_))
        ));

        let mine = c.svc.mine(&c.diner).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].restaurant_name, "Open");
        assert_eq!(mine[0].restaurant_address, "4 Dock Rd");
    }
}
