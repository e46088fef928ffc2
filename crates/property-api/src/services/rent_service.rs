use crate::database::models::{NewRent, Rent, RentDetail, RentStatus, UpdateRent};
use crate::database::Repository;
use crate::utils::error::ApiError;
use crate::utils::pagination::{PaginatedResponse, Pagination};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Bounded retries for the payment compare-and-swap loop
const MAX_PAYMENT_ATTEMPTS: u32 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentStats {
    pub total_rent: Decimal,
    pub total_paid: Decimal,
    pub total_pending: Decimal,
    pub pending: i64,
    pub overdue: i64,
    pub paid: i64,
    pub collection_rate: Decimal,
}

/// Result of applying one payment to a rent, computed before the write
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaymentOutcome {
    pub amount_paid: Decimal,
    pub status: RentStatus,
    pub paid_date: Option<DateTime<Utc>>,
}

/// Payment state is a pure function of (expected, cumulative paid); no
/// hidden flags. `Overdue` is never produced here.
pub(crate) fn derive_status(amount: Decimal, amount_paid: Decimal) -> RentStatus {
    if amount_paid >= amount {
        RentStatus::Paid
    } else if amount_paid > Decimal::ZERO {
        RentStatus::Partial
    } else {
        RentStatus::Pending
    }
}

/// Payments accumulate; `paid_date` is stamped on the first transition to
/// `Paid` and kept as-is afterwards.
pub(crate) fn compute_payment(rent: &Rent, amount: Decimal, now: DateTime<Utc>) -> PaymentOutcome {
    let amount_paid = rent.amount_paid + amount;
    let status = derive_status(rent.amount, amount_paid);
    let paid_date = if status == RentStatus::Paid {
        rent.paid_date.or(Some(now))
    } else {
        rent.paid_date
    };

    PaymentOutcome {
        amount_paid,
        status,
        paid_date,
    }
}

pub(crate) fn build_rent_stats(rents: &[Rent]) -> RentStats {
    let total_rent: Decimal = rents.iter().map(|r| r.amount).sum();
    let total_paid: Decimal = rents.iter().map(|r| r.amount_paid).sum();
    let count_status = |status: RentStatus| -> i64 {
        rents.iter().filter(|r| r.status == status).count() as i64
    };

    RentStats {
        total_rent,
        total_paid,
        total_pending: total_rent - total_paid,
        pending: count_status(RentStatus::Pending),
        overdue: count_status(RentStatus::Overdue),
        paid: count_status(RentStatus::Paid),
        collection_rate: if total_rent > Decimal::ZERO {
            (total_paid * Decimal::ONE_HUNDRED / total_rent).round_dp(2)
        } else {
            Decimal::ZERO
        },
    }
}

pub struct RentService {
    repository: Arc<Repository>,
}

impl RentService {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, payload: &NewRent) -> Result<Rent, ApiError> {
        let rent = self
            .repository
            .create_rent(payload)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        info!("Created rent {} for tenant {}", rent.id, rent.tenant_id);
        Ok(rent)
    }

    pub async fn list(
        &self,
        property_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Rent>, ApiError> {
        let (rents, total) = tokio::try_join!(
            self.repository
                .list_rents(property_id, pagination.limit, pagination.offset),
            self.repository.count_rents(property_id),
        )
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(PaginatedResponse::new(rents, total, pagination))
    }

    pub async fn get(&self, id: Uuid) -> Result<RentDetail, ApiError> {
        self.repository
            .find_rent_detail(id)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?
            .ok_or_else(|| ApiError::NotFound(format!("Rent with ID {} not found", id)))
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateRent) -> Result<Rent, ApiError> {
        self.repository
            .update_rent(id, payload)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?
            .ok_or_else(|| ApiError::NotFound(format!("Rent with ID {} not found", id)))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        let deleted = self
            .repository
            .delete_rent(id)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        if !deleted {
            return Err(ApiError::NotFound(format!("Rent with ID {} not found", id)));
        }

        Ok(())
    }

    /// Record a (possibly partial) payment against a rent. The write is a
    /// compare-and-swap on `amount_paid`, so two concurrent payments both
    /// land instead of the later one overwriting the earlier.
    pub async fn record_payment(
        &self,
        id: Uuid,
        amount: Decimal,
        payment_method: &str,
        transaction_id: Option<String>,
    ) -> Result<RentDetail, ApiError> {
        if amount <= Decimal::ZERO {
            return Err(ApiError::BadRequest(
                "Payment amount must be positive".to_string(),
            ));
        }

        for attempt in 1..=MAX_PAYMENT_ATTEMPTS {
            let rent = self
                .repository
                .find_rent(id)
                .await
                .map_err(|e| ApiError::DatabaseError(e.to_string()))?
                .ok_or_else(|| ApiError::NotFound(format!("Rent with ID {} not found", id)))?;

            let outcome = compute_payment(&rent, amount, Utc::now());
            // transaction_id keeps its previous value when not supplied
            let transaction_id = transaction_id.clone().or(rent.transaction_id);

            let updated = self
                .repository
                .apply_payment(
                    id,
                    rent.amount_paid,
                    outcome.amount_paid,
                    outcome.status,
                    outcome.paid_date,
                    payment_method,
                    transaction_id,
                )
                .await
                .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

            if let Some(rent) = updated {
                info!(
                    "Recorded payment of {} against rent {} ({} of {} paid, now {:?})",
                    amount, rent.id, rent.amount_paid, rent.amount, rent.status
                );
                return self.get(id).await;
            }

            warn!(
                "Concurrent payment on rent {} invalidated attempt {}, retrying",
                id, attempt
            );
        }

        Err(ApiError::InternalError(format!(
            "Payment on rent {} kept losing races after {} attempts",
            id, MAX_PAYMENT_ATTEMPTS
        )))
    }

    /// Rents still waiting on money: pending, overdue or partially paid
    pub async fn pending(&self, property_id: Uuid) -> Result<Vec<Rent>, ApiError> {
        self.repository
            .pending_rents(property_id)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    pub async fn stats(&self, property_id: Uuid) -> Result<RentStats, ApiError> {
        let rents = self
            .repository
            .rents_by_property(property_id)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(build_rent_stats(&rents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_rent(amount: Decimal, amount_paid: Decimal, status: RentStatus) -> Rent {
        let now = Utc::now();
        Rent {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            amount,
            due_date: now,
            paid_date: None,
            status,
            amount_paid,
            payment_method: None,
            transaction_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_is_pure_function_of_amounts() {
        assert_eq!(derive_status(dec!(500), dec!(0)), RentStatus::Pending);
        assert_eq!(derive_status(dec!(500), dec!(0.01)), RentStatus::Partial);
        assert_eq!(derive_status(dec!(500), dec!(499.99)), RentStatus::Partial);
        assert_eq!(derive_status(dec!(500), dec!(500)), RentStatus::Paid);
        assert_eq!(derive_status(dec!(500), dec!(650)), RentStatus::Paid);
    }

    #[test]
    fn payments_accumulate() {
        let rent = sample_rent(dec!(1000), dec!(100), RentStatus::Partial);
        let outcome = compute_payment(&rent, dec!(250), Utc::now());

        assert_eq!(outcome.amount_paid, dec!(350));
        assert_eq!(outcome.status, RentStatus::Partial);
        assert_eq!(outcome.paid_date, None);
    }

    #[test]
    fn split_payment_equals_single_payment() {
        let now = Utc::now();
        let rent = sample_rent(dec!(800), dec!(0), RentStatus::Pending);

        let first = compute_payment(&rent, dec!(300), now);
        let mut after_first = rent.clone();
        after_first.amount_paid = first.amount_paid;
        after_first.status = first.status;
        after_first.paid_date = first.paid_date;
        let second = compute_payment(&after_first, dec!(500), now);

        let single = compute_payment(&rent, dec!(800), now);

        assert_eq!(second.amount_paid, single.amount_paid);
        assert_eq!(second.status, single.status);
        assert_eq!(second.status, RentStatus::Paid);
    }

    #[test]
    fn paid_date_stamped_once_on_settlement() {
        let now = Utc::now();
        let rent = sample_rent(dec!(400), dec!(100), RentStatus::Partial);

        let settled = compute_payment(&rent, dec!(300), now);
        assert_eq!(settled.status, RentStatus::Paid);
        assert_eq!(settled.paid_date, Some(now));

        // A later overpayment must not move the original paid date
        let mut paid_rent = rent.clone();
        paid_rent.amount_paid = settled.amount_paid;
        paid_rent.status = settled.status;
        paid_rent.paid_date = settled.paid_date;

        let later = now + chrono::Duration::days(3);
        let overpaid = compute_payment(&paid_rent, dec!(50), later);
        assert_eq!(overpaid.status, RentStatus::Paid);
        assert_eq!(overpaid.paid_date, Some(now));
    }

    #[test]
    fn zero_value_update_stays_pending() {
        let rent = sample_rent(dec!(500), dec!(0), RentStatus::Pending);
        let outcome = compute_payment(&rent, dec!(0), Utc::now());

        assert_eq!(outcome.amount_paid, dec!(0));
        assert_eq!(outcome.status, RentStatus::Pending);
        assert_eq!(outcome.paid_date, None);
    }

    #[test]
    fn stats_aggregate_amounts_and_statuses() {
        let rents = vec![
            sample_rent(dec!(500), dec!(500), RentStatus::Paid),
            sample_rent(dec!(500), dec!(250), RentStatus::Partial),
            sample_rent(dec!(500), dec!(0), RentStatus::Pending),
            sample_rent(dec!(500), dec!(0), RentStatus::Overdue),
        ];

        let stats = build_rent_stats(&rents);
        assert_eq!(stats.total_rent, dec!(2000));
        assert_eq!(stats.total_paid, dec!(750));
        assert_eq!(stats.total_pending, dec!(1250));
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.collection_rate, dec!(37.50));
    }

    #[test]
    fn stats_on_empty_property() {
        let stats = build_rent_stats(&[]);
        assert_eq!(stats.total_rent, Decimal::ZERO);
        assert_eq!(stats.collection_rate, Decimal::ZERO);
    }
}
