//! In-memory store of transient [`Quote`]s.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::domain::{mover_booking, user, Quote};

/// Store of [`Quote`]s issued to users and not confirmed yet.
///
/// A [`Quote`] is scoped to the [`user::Id`] it was issued to and becomes
/// unreachable once its TTL elapses. Taking a [`Quote`] removes it, so it can
/// be confirmed at most once.
#[derive(Clone, Debug)]
pub struct Quotes {
    /// Period after which a stored [`Quote`] expires.
    ttl: Duration,

    /// Stored [`Quote`]s, keyed by their ID.
    entries: Arc<Mutex<HashMap<mover_booking::QuoteId, Entry>>>,
}

/// Single entry of a [`Quotes`] store.
#[derive(Clone, Debug)]
struct Entry {
    /// [`user::Id`] the [`Quote`] was issued to.
    owner: user::Id,

    /// The stored [`Quote`] itself.
    quote: Quote,
}

impl Quotes {
    /// Creates a new empty [`Quotes`] store with the provided `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Stores the provided [`Quote`] for the given `owner`.
    pub async fn put(&self, owner: user::Id, quote: Quote) {
        drop(
            self.entries
                .lock()
                .await
                .insert(quote.id, Entry { owner, quote }),
        );
    }

    /// Takes the [`Quote`] with the provided ID out of this store, if it was
    /// issued to the given `owner` and has not expired yet.
    ///
    /// The [`Quote`] is removed whether it is returned or not reachable
    /// anymore, so a second take always returns [`None`].
    pub async fn take(
        &self,
        owner: user::Id,
        id: mover_booking::QuoteId,
    ) -> Option<Quote> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(&id)?;
        if entry.owner != owner {
            return None;
        }
        let entry = entries.remove(&id).expect("present");
        (!self.is_expired(&entry.quote)).then_some(entry.quote)
    }

    /// Removes every expired [`Quote`] from this store and returns the
    /// number of removed entries.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, e| !self.is_expired(&e.quote));
        before - entries.len()
    }

    /// Checks whether the provided [`Quote`]'s TTL has elapsed.
    fn is_expired(&self, quote: &Quote) -> bool {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let now = mover_booking::QuotationDateTime::now();
        quote
            .quoted_at
            .unix_timestamp()
            .saturating_add(ttl)
            <= now.unix_timestamp()
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{money::Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::domain::{mover, mover_booking, user, Quote};

    use super::Quotes;

    fn quote() -> Quote {
        let kes = |amount: i64| Money {
            amount: amount.into(),
            currency: Currency::Kes,
        };
        Quote {
            id: mover_booking::QuoteId::new(),
            booking_id: None,
            mover_id: mover::Id::new(),
            pickup: mover_booking::Address::new("Juja").unwrap(),
            dropoff: mover_booking::Address::new("Thika").unwrap(),
            distance_km: mover_booking::Distance::new(10.into()).unwrap(),
            base_rate: kes(1000),
            rate_per_km: kes(50),
            total_cost: kes(1500),
            rating_snapshot: Decimal::ZERO,
            quoted_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn take_is_consuming() {
        let store = Quotes::new(Duration::from_secs(600));
        let owner = user::Id::new();
        let q = quote();
        let id = q.id;
        store.put(owner, q).await;

        assert!(store.take(owner, id).await.is_some());
        assert!(store.take(owner, id).await.is_none());
    }

    #[tokio::test]
    async fn take_is_scoped_to_owner() {
        let store = Quotes::new(Duration::from_secs(600));
        let owner = user::Id::new();
        let q = quote();
        let id = q.id;
        store.put(owner, q).await;

        assert!(store.take(user::Id::new(), id).await.is_none());
        // A foreign take must not consume the entry.
        assert!(store.take(owner, id).await.is_some());
    }

    #[tokio::test]
    async fn expired_quotes_are_unreachable() {
        let store = Quotes::new(Duration::ZERO);
        let owner = user::Id::new();
        let q = quote();
        let id = q.id;
        store.put(owner, q).await;

        assert!(store.take(owner, id).await.is_none());
    }

    #[tokio::test]
    async fn purge_removes_expired_only() {
        let fresh = Quotes::new(Duration::from_secs(600));
        fresh.put(user::Id::new(), quote()).await;
        assert_eq!(fresh.purge_expired().await, 0);

        let stale = Quotes::new(Duration::ZERO);
        stale.put(user::Id::new(), quote()).await;
        assert_eq!(stale.purge_expired().await, 1);
    }
}
