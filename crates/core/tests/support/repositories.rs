//! Mock port implementations for testing
//!
//! Provides in-memory mocks for the core ports, enabling deterministic unit
//! tests without database dependencies. The profile mocks count calls so
//! tests can assert "zero store calls" and "exactly one invalidation".

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fieldmachine_core::booking::ports::BookingRepository;
use fieldmachine_core::machine::ports::MachineRepository;
use fieldmachine_core::profile::ports::{
    MutationObserver, ProfileCache, ProfileRepository, SessionProvider,
};
use fieldmachine_core::review::ports::ReviewRepository;
use fieldmachine_domain::{
    AuthIdentity, Booking, BookingStatus, FieldMachineError, Machine, MachineFilters,
    MachineStatus, Result as DomainResult, Review, UserProfile,
};
use parking_lot::Mutex;

/// In-memory mock for `ProfileRepository`.
///
/// Upserts merge the way the SQL adapter does: an existing row keeps its id,
/// `created_at`, and aggregate counters; only the payload fields and
/// `updated_at` are replaced.
#[derive(Default)]
pub struct MockProfileRepository {
    profiles: Mutex<HashMap<String, UserProfile>>,
    upsert_calls: AtomicUsize,
    get_calls: AtomicUsize,
    fail_upserts: AtomicBool,
}

impl MockProfileRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent upsert fail with a database error.
    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Direct read of the stored record, bypassing call counters.
    pub fn stored(&self, identity: &AuthIdentity) -> Option<UserProfile> {
        self.profiles.lock().get(identity.as_str()).cloned()
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn get_by_identity(&self, identity: &AuthIdentity) -> DomainResult<Option<UserProfile>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.profiles.lock().get(identity.as_str()).cloned())
    }

    async fn upsert(&self, profile: UserProfile) -> DomainResult<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(FieldMachineError::Database("upsert rejected by store".into()));
        }

        let mut profiles = self.profiles.lock();
        match profiles.get_mut(&profile.auth_user_id) {
            Some(existing) => {
                existing.full_name = profile.full_name;
                existing.phone = profile.phone;
                existing.cpf_cnpj = profile.cpf_cnpj;
                existing.address = profile.address;
                existing.profile_image = profile.profile_image;
                existing.updated_at = profile.updated_at;
            }
            None => {
                profiles.insert(profile.auth_user_id.clone(), profile);
            }
        }
        Ok(())
    }
}

/// Recording mock for `ProfileCache`.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, UserProfile>>,
    invalidations: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Identities invalidated so far, in call order.
    pub fn invalidations(&self) -> Vec<String> {
        self.invalidations.lock().clone()
    }

    pub fn contains(&self, identity: &AuthIdentity) -> bool {
        self.entries.lock().contains_key(identity.as_str())
    }
}

impl ProfileCache for RecordingCache {
    fn get(&self, identity: &AuthIdentity) -> Option<UserProfile> {
        self.entries.lock().get(identity.as_str()).cloned()
    }

    fn insert(&self, identity: &AuthIdentity, profile: UserProfile) {
        self.entries.lock().insert(identity.as_str().to_owned(), profile);
    }

    fn invalidate(&self, identity: &AuthIdentity) {
        self.invalidations.lock().push(identity.as_str().to_owned());
        self.entries.lock().remove(identity.as_str());
    }
}

/// Session provider returning a fixed identity (or none).
pub struct StaticSessionProvider {
    identity: Option<AuthIdentity>,
}

impl StaticSessionProvider {
    pub fn authenticated(identity: &str) -> Self {
        Self { identity: Some(AuthIdentity::new(identity)) }
    }

    pub fn anonymous() -> Self {
        Self { identity: None }
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current_identity(&self) -> Option<AuthIdentity> {
        self.identity.clone()
    }
}

/// Observer recording every settled result.
#[derive(Default)]
pub struct RecordingObserver {
    settled: Mutex<Vec<bool>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Success flags of the settled mutations, in call order.
    pub fn settled(&self) -> Vec<bool> {
        self.settled.lock().clone()
    }
}

impl MutationObserver for RecordingObserver {
    fn on_settled(&self, result: &DomainResult<()>) {
        self.settled.lock().push(result.is_ok());
    }
}

/// In-memory mock for `MachineRepository`.
#[derive(Default)]
pub struct MockMachineRepository {
    machines: Mutex<HashMap<String, Machine>>,
}

impl MockMachineRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_machine(self: &Arc<Self>, machine: Machine) -> Arc<Self> {
        self.machines.lock().insert(machine.id.clone(), machine);
        Arc::clone(self)
    }
}

#[async_trait]
impl MachineRepository for MockMachineRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Machine>> {
        Ok(self.machines.lock().get(id).cloned())
    }

    async fn insert(&self, machine: Machine) -> DomainResult<()> {
        self.machines.lock().insert(machine.id.clone(), machine);
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Machine>> {
        let mut machines: Vec<Machine> = self
            .machines
            .lock()
            .values()
            .filter(|m| m.owner_id == owner_id)
            .cloned()
            .collect();
        machines.sort_by_key(|m| std::cmp::Reverse(m.created_at));
        Ok(machines)
    }

    async fn search(&self, filters: &MachineFilters) -> DomainResult<Vec<Machine>> {
        let query = filters.query.as_deref().map(str::to_lowercase);
        let mut machines: Vec<Machine> = self
            .machines
            .lock()
            .values()
            .filter(|m| m.status == MachineStatus::Active)
            .filter(|m| filters.category.as_deref().map_or(true, |c| m.category == c))
            .filter(|m| filters.city.as_deref().map_or(true, |c| m.city.as_deref() == Some(c)))
            .filter(|m| filters.state.as_deref().map_or(true, |s| m.state.as_deref() == Some(s)))
            .filter(|m| filters.max_price_day.map_or(true, |p| m.price_day <= p))
            .filter(|m| {
                query.as_deref().map_or(true, |q| {
                    m.name.to_lowercase().contains(q)
                        || m.brand.as_deref().is_some_and(|b| b.to_lowercase().contains(q))
                        || m.model.as_deref().is_some_and(|b| b.to_lowercase().contains(q))
                })
            })
            .cloned()
            .collect();
        machines.sort_by_key(|m| std::cmp::Reverse(m.created_at));
        Ok(machines)
    }

    async fn set_status(&self, id: &str, status: MachineStatus) -> DomainResult<()> {
        match self.machines.lock().get_mut(id) {
            Some(machine) => {
                machine.status = status;
                Ok(())
            }
            None => Err(FieldMachineError::NotFound(format!("machine {id}"))),
        }
    }
}

/// In-memory mock for `BookingRepository`.
#[derive(Default)]
pub struct MockBookingRepository {
    bookings: Mutex<HashMap<String, Booking>>,
}

impl MockBookingRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_booking(self: &Arc<Self>, booking: Booking) -> Arc<Self> {
        self.bookings.lock().insert(booking.id.clone(), booking);
        Arc::clone(self)
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.lock().get(id).cloned())
    }

    async fn insert(&self, booking: Booking) -> DomainResult<()> {
        self.bookings.lock().insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn set_status(
        &self,
        id: &str,
        status: BookingStatus,
        cancellation_reason: Option<&str>,
    ) -> DomainResult<()> {
        match self.bookings.lock().get_mut(id) {
            Some(booking) => {
                booking.status = status;
                booking.cancellation_reason = cancellation_reason.map(str::to_owned);
                Ok(())
            }
            None => Err(FieldMachineError::NotFound(format!("booking {id}"))),
        }
    }

    async fn count_overlapping(
        &self,
        machine_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<i64> {
        Ok(self
            .bookings
            .lock()
            .values()
            .filter(|b| b.machine_id == machine_id)
            .filter(|b| b.status.occupies_calendar())
            .filter(|b| b.start_date <= end_date && b.end_date >= start_date)
            .count() as i64)
    }

    async fn list_by_renter(&self, renter_id: &str) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .values()
            .filter(|b| b.renter_id == renter_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| std::cmp::Reverse(b.created_at));
        Ok(bookings)
    }

    async fn list_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| std::cmp::Reverse(b.created_at));
        Ok(bookings)
    }
}

/// In-memory mock for `ReviewRepository`.
#[derive(Default)]
pub struct MockReviewRepository {
    reviews: Mutex<Vec<Review>>,
}

impl MockReviewRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ReviewRepository for MockReviewRepository {
    async fn insert(&self, review: Review) -> DomainResult<()> {
        self.reviews.lock().push(review);
        Ok(())
    }

    async fn get_for_booking(
        &self,
        booking_id: &str,
        reviewer_id: &str,
    ) -> DomainResult<Option<Review>> {
        Ok(self
            .reviews
            .lock()
            .iter()
            .find(|r| r.booking_id == booking_id && r.reviewer_id == reviewer_id)
            .cloned())
    }

    async fn list_for_reviewed(&self, reviewed_id: &str) -> DomainResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .iter()
            .filter(|r| r.reviewed_id == reviewed_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(reviews)
    }

    async fn average_rating(&self, reviewed_id: &str) -> DomainResult<Option<f64>> {
        let reviews = self.reviews.lock();
        let ratings: Vec<i32> =
            reviews.iter().filter(|r| r.reviewed_id == reviewed_id).map(|r| r.rating).collect();
        if ratings.is_empty() {
            return Ok(None);
        }
        Ok(Some(f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64))
    }
}
