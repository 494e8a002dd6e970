//! SeaORM implementation of BookingRepository
//!
//! Every write transaction starts with the write itself. SQLite only waits
//! on a busy database while taking the first lock of a transaction, so a
//! deferred transaction that reads before writing fails with `SQLITE_BUSY`
//! under contention instead of queueing. Once the write lock is held the
//! slot check runs, and the partial unique index from the
//! `add_booking_slot_index` migration rejects any duplicate confirmed slot.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, Unchanged,
};

use super::is_unique_violation;
use crate::domain::{
    Booking, BookingRepository, BookingStatus, BookingWithRestaurant, DomainError, DomainResult,
    NewBooking,
};
use crate::infrastructure::database::entities::{booking, restaurant};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_domain(s: booking::Status) -> BookingStatus {
    match s {
        booking::Status::Confirmed => BookingStatus::Confirmed,
        booking::Status::Cancelled => BookingStatus::Cancelled,
    }
}

fn status_to_entity(s: BookingStatus) -> booking::Status {
    match s {
        BookingStatus::Confirmed => booking::Status::Confirmed,
        BookingStatus::Cancelled => booking::Status::Cancelled,
    }
}

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        user_id: m.user_id,
        restaurant_id: m.restaurant_id,
        date: m.date,
        time: m.time,
        number_of_people: m.number_of_people,
        customer_name: m.customer_name,
        customer_email: m.customer_email,
        customer_phone: m.customer_phone,
        status: status_to_domain(m.status),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn slot_taken(restaurant_id: i32, date: NaiveDate, time: &str) -> DomainError {
    DomainError::SlotTaken {
        restaurant_id,
        date,
        time: time.to_string(),
    }
}

fn write_err(err: DbErr, restaurant_id: i32, date: NaiveDate, time: &str) -> DomainError {
    if is_unique_violation(&err) {
        debug!(
            "Slot index rejected booking for restaurant {} at {} {}",
            restaurant_id, date, time
        );
        slot_taken(restaurant_id, date, time)
    } else {
        err.into()
    }
}

/// Whether another confirmed booking holds the slot
async fn slot_is_held<C: ConnectionTrait>(
    conn: &C,
    restaurant_id: i32,
    date: NaiveDate,
    time: &str,
    except_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = booking::Entity::find()
        .filter(booking::Column::RestaurantId.eq(restaurant_id))
        .filter(booking::Column::Date.eq(date))
        .filter(booking::Column::Time.eq(time))
        .filter(booking::Column::Status.eq(booking::Status::Confirmed));
    if let Some(id) = except_id {
        query = query.filter(booking::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn create_if_slot_free(&self, new: NewBooking) -> DomainResult<Booking> {
        debug!(
            "Booking restaurant {} at {} {} for {} people",
            new.restaurant_id, new.date, new.time, new.number_of_people
        );

        let (restaurant_id, date, time) = (new.restaurant_id, new.date, new.time.clone());
        let now = Utc::now();
        let model = booking::ActiveModel {
            user_id: Set(new.user_id),
            restaurant_id: Set(new.restaurant_id),
            date: Set(new.date),
            time: Set(new.time),
            number_of_people: Set(new.number_of_people),
            customer_name: Set(new.customer_name),
            customer_email: Set(new.customer_email),
            customer_phone: Set(new.customer_phone),
            status: Set(booking::Status::Confirmed),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let txn = self.db.begin().await?;
        let saved = model
            .insert(&txn)
            .await
            .map_err(|e| write_err(e, restaurant_id, date, &time))?;

        if slot_is_held(&txn, restaurant_id, date, &time, Some(saved.id)).await? {
            return Err(slot_taken(restaurant_id, date, &time));
        }
        txn.commit()
            .await
            .map_err(|e| write_err(e, restaurant_id, date, &time))?;

        Ok(model_to_domain(saved))
    }

    async fn save(&self, b: Booking, check_slot: bool) -> DomainResult<Booking> {
        debug!("Saving booking {} ({})", b.id, b.status);

        let active = booking::ActiveModel {
            id: Unchanged(b.id),
            date: Set(b.date),
            time: Set(b.time.clone()),
            number_of_people: Set(b.number_of_people),
            status: Set(status_to_entity(b.status)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        let txn = self.db.begin().await?;
        let saved = active.update(&txn).await.map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
                DomainError::not_found("Booking", b.id)
            }
            e => write_err(e, b.restaurant_id, b.date, &b.time),
        })?;

        if check_slot
            && b.holds_slot()
            && slot_is_held(&txn, b.restaurant_id, b.date, &b.time, Some(b.id)).await?
        {
            return Err(slot_taken(b.restaurant_id, b.date, &b.time));
        }
        txn.commit()
            .await
            .map_err(|e| write_err(e, b.restaurant_id, b.date, &b.time))?;

        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_date(
        &self,
        restaurant_id: i32,
        date: NaiveDate,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::RestaurantId.eq(restaurant_id))
            .filter(booking::Column::Date.eq(date))
            .order_by_asc(booking::Column::Time)
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<BookingWithRestaurant>> {
        let rows = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .find_also_related(restaurant::Entity)
            .order_by_asc(booking::Column::Date)
            .order_by_asc(booking::Column::Time)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(b, r)| {
                let (restaurant_name, restaurant_address) = r
                    .map(|r| (r.name, r.address))
                    .unwrap_or_default();
                BookingWithRestaurant {
                    booking: model_to_domain(b),
                    restaurant_name,
                    restaurant_address,
                }
            })
            .collect())
    }

    async fn list_for_restaurant(&self, restaurant_id: i32) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(booking::Column::Date)
            .order_by_asc(booking::Column::Time)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count(&self, status: Option<BookingStatus>) -> DomainResult<u64> {
        let mut query = booking::Entity::find();
        if let Some(status) = status {
            query = query.filter(booking::Column::Status.eq(status_to_entity(status)));
        }
        Ok(query.count(&self.db).await?)
    }

    async fn created_timestamps_since(
        &self,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<DateTime<Utc>>> {
        let models = booking::Entity::find()
            .filter(booking::Column::CreatedAt.gte(since))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.created_at).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::domain::{BookingChanges, RepositoryProvider, UserRole};
    use crate::infrastructure::database::{file_db, test_db, SeaOrmRepositoryProvider};
    use sea_orm::{ConnectionTrait, Statement};
    use std::sync::Arc;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn new_booking(user_id: Option<i32>, restaurant_id: i32, time: &str) -> NewBooking {
        NewBooking {
            user_id,
            restaurant_id,
            date: date(),
            time: time.to_string(),
            number_of_people: 2,
            customer_name: "Grace".into(),
            customer_email: "grace@example.com".into(),
            customer_phone: Some("555-0100".into()),
        }
    }

    async fn setup() -> (SeaOrmRepositoryProvider, i32, i32) {
        let repos = SeaOrmRepositoryProvider::new(test_db().await);
        let owner = fixtures::user(&repos, "owner@example.com", UserRole::BusinessOwner).await;
        let diner = fixtures::user(&repos, "diner@example.com", UserRole::User).await;
        let r = fixtures::approved_restaurant(&repos, owner.id, "Bistro").await;
        (repos, diner.id, r.id)
    }

    #[tokio::test]
    async fn second_booking_for_same_slot_is_rejected() {
        let (repos, diner, restaurant) = setup().await;

        let first = repos
            .bookings()
            .create_if_slot_free(new_booking(Some(diner), restaurant, "19:00"))
            .await
            .unwrap();
        assert_eq!(first.status, BookingStatus::Confirmed);

        let err = repos
            .bookings()
            .create_if_slot_free(new_booking(None, restaurant, "19:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotTaken { .. }));

        repos
            .bookings()
            .create_if_slot_free(new_booking(None, restaurant, "19:30"))
            .await
            .unwrap();
        assert_eq!(repos.bookings().count(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unique_index_backs_up_the_check() {
        let (repos, _, restaurant) = setup().await;
        repos
            .bookings()
            .create_if_slot_free(new_booking(None, restaurant, "20:00"))
            .await
            .unwrap();

        let db = repos.connection();
        let result = db
            .execute(Statement::from_string(
                db.get_database_backend(),
                format!(
                    "INSERT INTO bookings (restaurant_id, date, time, number_of_people, \
                     customer_name, customer_email, status, created_at, updated_at) \
                     VALUES ({}, '2025-07-14', '20:00', 2, 'x', 'x@example.com', 'confirmed', \
                     '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
                    restaurant
                ),
            ))
            .await;
        let err = result.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn cancelled_booking_frees_the_slot() {
        let (repos, diner, restaurant) = setup().await;
        let mut first = repos
            .bookings()
            .create_if_slot_free(new_booking(Some(diner), restaurant, "19:00"))
            .await
            .unwrap();

        first.cancel();
        repos.bookings().save(first, false).await.unwrap();

        let again = repos
            .bookings()
            .create_if_slot_free(new_booking(None, restaurant, "19:00"))
            .await
            .unwrap();
        assert_eq!(again.status, BookingStatus::Confirmed);
        assert_eq!(
            repos.bookings().count(Some(BookingStatus::Cancelled)).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn moving_into_a_held_slot_is_rejected() {
        let (repos, diner, restaurant) = setup().await;
        repos
            .bookings()
            .create_if_slot_free(new_booking(None, restaurant, "19:00"))
            .await
            .unwrap();
        let mut mine = repos
            .bookings()
            .create_if_slot_free(new_booking(Some(diner), restaurant, "21:00"))
            .await
            .unwrap();

        let needs_check = mine
            .apply(BookingChanges {
                time: Some("19:00".into()),
                ..Default::default()
            })
            .unwrap();
        let err = repos.bookings().save(mine.clone(), needs_check).await.unwrap_err();
        assert!(matches!(err, DomainError::SlotTaken { .. }));

        let stored = repos.bookings().find_by_id(mine.id).await.unwrap().unwrap();
        assert_eq!(stored.time, "21:00");
    }

    #[tokio::test]
    async fn saving_in_place_does_not_conflict_with_itself() {
        let (repos, diner, restaurant) = setup().await;
        let mut mine = repos
            .bookings()
            .create_if_slot_free(new_booking(Some(diner), restaurant, "19:00"))
            .await
            .unwrap();

        mine.number_of_people = 6;
        let saved = repos.bookings().save(mine, true).await.unwrap();
        assert_eq!(saved.number_of_people, 6);
    }

    #[tokio::test]
    async fn listings_are_ordered_and_joined() {
        let (repos, diner, restaurant) = setup().await;
        for time in ["21:00", "18:30"] {
            repos
                .bookings()
                .create_if_slot_free(new_booking(Some(diner), restaurant, time))
                .await
                .unwrap();
        }

        let day = repos.bookings().list_for_date(restaurant, date()).await.unwrap();
        let times: Vec<_> = day.iter().map(|b| b.time.as_str()).collect();
        assert_eq!(times, ["18:30", "21:00"]);

        let mine = repos.bookings().list_for_user(diner).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].booking.time, "18:30");
        assert_eq!(mine[0].restaurant_name, "Bistro");
        assert_eq!(mine[0].restaurant_address, "1 Main St");

        assert!(repos
            .bookings()
            .list_for_date(restaurant, date().succ_opt().unwrap())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(repos.bookings().list_for_restaurant(restaurant).await.unwrap().len(), 2);
    }

    async fn race(
        repos: &Arc<SeaOrmRepositoryProvider>,
        bookings: Vec<NewBooking>,
    ) -> Vec<DomainResult<Booking>> {
        let tasks: Vec<_> = bookings
            .into_iter()
            .map(|b| {
                let repos = repos.clone();
                tokio::spawn(async move { repos.bookings().create_if_slot_free(b).await })
            })
            .collect();
        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }
        results
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_bookings_for_one_slot_yield_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(file_db(dir.path(), 8).await));
        let owner = fixtures::user(&*repos, "owner@example.com", UserRole::BusinessOwner).await;
        let r = fixtures::approved_restaurant(&*repos, owner.id, "Bistro").await;

        let attempts = (0..8).map(|_| new_booking(None, r.id, "19:00")).collect();
        let results = race(&repos, attempts).await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, DomainError::SlotTaken { .. }), "{:?}", err);
        }
        assert_eq!(
            repos.bookings().count(Some(BookingStatus::Confirmed)).await.unwrap(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_bookings_for_distinct_slots_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(file_db(dir.path(), 8).await));
        let owner = fixtures::user(&*repos, "owner@example.com", UserRole::BusinessOwner).await;
        let r = fixtures::approved_restaurant(&*repos, owner.id, "Bistro").await;

        let attempts = (0..8)
            .map(|i| new_booking(None, r.id, &format!("1{}:00", i)))
            .collect();
        for result in race(&repos, attempts).await {
            result.unwrap();
        }
        assert_eq!(repos.bookings().count(None).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn saving_an_unknown_booking_is_not_found() {
        let (repos, diner, restaurant) = setup().await;
        let mut ghost = repos
            .bookings()
            .create_if_slot_free(new_booking(Some(diner), restaurant, "19:00"))
            .await
            .unwrap();
        ghost.id += 100;

        let err = repos.bookings().save(ghost, true).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }), "{:?}", err);
    }
}
