use crate::database::models::{
    Property, Rent, RentStatus, RentWithTenant, Room, RoomStatus, TenantStatus, TenantWithRoom,
};
use crate::database::Repository;
use crate::utils::error::ApiError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;
const MAX_ACTIVITY_LIMIT: usize = 50;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Null when the property id is unknown; the summary is still returned
    /// from whatever the other queries found (permissive aggregation).
    pub property: Option<Property>,
    pub summary: DashboardSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub vacant_rooms: i64,
    /// Percentage with a fixed two-decimal representation, "0.00" for an
    /// empty property
    pub occupancy_rate: String,
    pub active_tenants: i64,
    pub total_rent: Decimal,
    pub total_paid: Decimal,
    pub total_pending: Decimal,
    pub collection_rate: String,
    pub pending_rents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Tenant,
    Rent,
    Room,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Created,
    Paid,
    Updated,
}

/// Record behind an activity event, kept whole for the caller
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActivityData {
    Tenant(TenantWithRoom),
    Rent(RentWithTenant),
    Room(Room),
}

/// One entry of the merged activity feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub action: ActivityAction,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub data: ActivityData,
}

impl ActivityEvent {
    fn tenant_created(tenant: TenantWithRoom) -> Self {
        Self {
            kind: ActivityKind::Tenant,
            action: ActivityAction::Created,
            description: format!(
                "{} {} added",
                tenant.tenant.first_name, tenant.tenant.last_name
            ),
            timestamp: tenant.tenant.created_at,
            data: ActivityData::Tenant(tenant),
        }
    }

    fn rent_payment(rent: RentWithTenant) -> Self {
        let action = if rent.rent.status == RentStatus::Paid {
            ActivityAction::Paid
        } else {
            ActivityAction::Updated
        };

        Self {
            kind: ActivityKind::Rent,
            action,
            description: format!(
                "Rent payment of {}/{}",
                rent.rent.amount_paid, rent.rent.amount
            ),
            timestamp: rent.rent.paid_date.unwrap_or(rent.rent.updated_at),
            data: ActivityData::Rent(rent),
        }
    }

    fn room_updated(room: Room) -> Self {
        Self {
            kind: ActivityKind::Room,
            action: ActivityAction::Updated,
            description: format!("Room {} status changed to {}", room.room_number, room.status),
            timestamp: room.updated_at,
            data: ActivityData::Room(room),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFinancial {
    pub month: String,
    pub expected: Decimal,
    pub received: Decimal,
}

/// Two-decimal percentage of `part` in `whole`, "0.00" on an empty
/// denominator
fn percentage(part: Decimal, whole: Decimal) -> String {
    if whole > Decimal::ZERO {
        format!("{:.2}", (part * Decimal::ONE_HUNDRED / whole).round_dp(2))
    } else {
        "0.00".to_string()
    }
}

fn build_summary(
    total_rooms: i64,
    occupied_rooms: i64,
    active_tenants: i64,
    total_rent: Decimal,
    total_paid: Decimal,
    pending_rents: i64,
) -> DashboardSummary {
    DashboardSummary {
        total_rooms,
        occupied_rooms,
        vacant_rooms: total_rooms - occupied_rooms,
        occupancy_rate: percentage(Decimal::from(occupied_rooms), Decimal::from(total_rooms)),
        active_tenants,
        total_rent,
        total_paid,
        total_pending: total_rent - total_paid,
        collection_rate: percentage(total_paid, total_rent),
        pending_rents,
    }
}

/// K-way merge of per-source feeds that are already sorted by descending
/// timestamp; only the global top `limit` entries are materialized. Ties go
/// to the earlier source, so the merge is stable.
fn merge_recent(sources: Vec<Vec<ActivityEvent>>, limit: usize) -> Vec<ActivityEvent> {
    let mut iters: Vec<_> = sources
        .into_iter()
        .map(|source| source.into_iter().peekable())
        .collect();
    let mut merged = Vec::with_capacity(limit);

    while merged.len() < limit {
        let mut best: Option<(usize, DateTime<Utc>)> = None;
        for (index, iter) in iters.iter_mut().enumerate() {
            if let Some(event) = iter.peek() {
                if best.map_or(true, |(_, timestamp)| event.timestamp > timestamp) {
                    best = Some((index, event.timestamp));
                }
            }
        }

        let Some((index, _)) = best else {
            break;
        };
        if let Some(event) = iters[index].next() {
            merged.push(event);
        }
    }

    merged
}

/// Group rents by the calendar month of their due date; sparse (months
/// without rents are absent) and ascending, which for "YYYY-MM" keys is the
/// chronological order.
fn financial_by_month(rents: &[Rent]) -> Vec<MonthlyFinancial> {
    let mut months: BTreeMap<String, MonthlyFinancial> = BTreeMap::new();

    for rent in rents {
        let month = rent.due_date.format("%Y-%m").to_string();
        let entry = months.entry(month.clone()).or_insert_with(|| MonthlyFinancial {
            month,
            expected: Decimal::ZERO,
            received: Decimal::ZERO,
        });
        entry.expected += rent.amount;
        entry.received += rent.amount_paid;
    }

    months.into_values().collect()
}

/// Read-only aggregation over properties, rooms, tenants and rents.
/// Stateless per call; every operation issues its reads concurrently.
pub struct DashboardService {
    repository: Arc<Repository>,
}

impl DashboardService {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }

    pub async fn summary(&self, property_id: Uuid) -> Result<DashboardResponse, ApiError> {
        let (property, total_rooms, occupied_rooms, active_tenants, totals, pending_rents) =
            tokio::try_join!(
                self.repository.find_property(property_id),
                self.repository.count_rooms(property_id, None),
                self.repository
                    .count_rooms(property_id, Some(RoomStatus::Occupied)),
                self.repository
                    .count_tenants(property_id, TenantStatus::Active),
                self.repository.rent_totals(property_id),
                self.repository.count_open_rents(property_id),
            )
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let (total_rent, total_paid) = totals;

        Ok(DashboardResponse {
            property,
            summary: build_summary(
                total_rooms,
                occupied_rooms,
                active_tenants,
                total_rent,
                total_paid,
                pending_rents,
            ),
        })
    }

    pub async fn recent_activity(
        &self,
        property_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, ApiError> {
        let limit = limit.clamp(1, MAX_ACTIVITY_LIMIT);

        let (tenants, rents, rooms) = tokio::try_join!(
            self.repository.recent_tenants(property_id, limit as i64),
            self.repository.recent_rents(property_id, limit as i64),
            self.repository.recent_rooms(property_id, limit as i64),
        )
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let sources = vec![
            tenants
                .into_iter()
                .map(ActivityEvent::tenant_created)
                .collect(),
            rents.into_iter().map(ActivityEvent::rent_payment).collect(),
            rooms.into_iter().map(ActivityEvent::room_updated).collect(),
        ];

        Ok(merge_recent(sources, limit))
    }

    pub async fn financial_overview(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<MonthlyFinancial>, ApiError> {
        let rents = self
            .repository
            .rents_by_property(property_id)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(financial_by_month(&rents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_room(room_number: &str, updated_at: DateTime<Utc>) -> Room {
        Room {
            id: Uuid::new_v4(),
            room_number: room_number.to_string(),
            property_id: Uuid::new_v4(),
            floor: None,
            description: None,
            rent_amount: dec!(500),
            status: RoomStatus::Occupied,
            square_feet: None,
            bedrooms: None,
            bathrooms: None,
            current_tenant_id: None,
            deposit_amount: None,
            created_at: updated_at,
            updated_at,
        }
    }

    fn sample_rent(amount: Decimal, amount_paid: Decimal, due_date: DateTime<Utc>) -> Rent {
        Rent {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            amount,
            due_date,
            paid_date: None,
            status: RentStatus::Partial,
            amount_paid,
            payment_method: None,
            transaction_id: None,
            notes: None,
            created_at: due_date,
            updated_at: due_date,
        }
    }

    fn room_event(room_number: &str, timestamp: DateTime<Utc>) -> ActivityEvent {
        ActivityEvent::room_updated(sample_room(room_number, timestamp))
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn summary_rates_match_expected_precision() {
        let summary = build_summary(10, 4, 7, dec!(1000), dec!(250), 3);

        assert_eq!(summary.vacant_rooms, 6);
        assert_eq!(summary.occupancy_rate, "40.00");
        assert_eq!(summary.collection_rate, "25.00");
        assert_eq!(summary.total_pending, dec!(750));
        assert_eq!(summary.pending_rents, 3);
    }

    #[test]
    fn summary_guards_against_empty_denominators() {
        let summary = build_summary(0, 0, 0, dec!(0), dec!(0), 0);

        assert_eq!(summary.occupancy_rate, "0.00");
        assert_eq!(summary.collection_rate, "0.00");
        assert_eq!(summary.total_pending, dec!(0));
    }

    #[test]
    fn summary_rounds_repeating_rates() {
        let summary = build_summary(3, 1, 1, dec!(300), dec!(100), 2);
        assert_eq!(summary.occupancy_rate, "33.33");
        assert_eq!(summary.collection_rate, "33.33");
    }

    #[test]
    fn merge_orders_across_sources() {
        let sources = vec![
            vec![room_event("a1", at(500)), room_event("a2", at(100))],
            vec![room_event("b1", at(400)), room_event("b2", at(300))],
            vec![room_event("c1", at(200))],
        ];

        let merged = merge_recent(sources, 10);
        let timestamps: Vec<_> = merged.iter().map(|e| e.timestamp).collect();

        assert_eq!(timestamps, vec![at(500), at(400), at(300), at(200), at(100)]);
    }

    #[test]
    fn merge_truncates_to_limit() {
        let sources = vec![
            (0..8).rev().map(|i| room_event("x", at(i * 10))).collect(),
            (0..8).rev().map(|i| room_event("y", at(i * 10 + 5))).collect(),
            Vec::new(),
        ];

        let merged = merge_recent(sources, 5);
        assert_eq!(merged.len(), 5);
        for pair in merged.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn merge_handles_empty_sources() {
        assert!(merge_recent(vec![Vec::new(), Vec::new()], 10).is_empty());
    }

    #[test]
    fn rent_event_action_follows_status() {
        let mut rent = sample_rent(dec!(500), dec!(500), at(0));
        rent.status = RentStatus::Paid;
        rent.paid_date = Some(at(42));
        let event = ActivityEvent::rent_payment(RentWithTenant {
            rent,
            tenant_first_name: None,
            tenant_last_name: None,
        });

        assert_eq!(event.action, ActivityAction::Paid);
        assert_eq!(event.timestamp, at(42));
        assert_eq!(event.description, "Rent payment of 500/500");

        let partial = sample_rent(dec!(500), dec!(100), at(0));
        let event = ActivityEvent::rent_payment(RentWithTenant {
            rent: partial,
            tenant_first_name: None,
            tenant_last_name: None,
        });
        assert_eq!(event.action, ActivityAction::Updated);
        // No paid date yet, falls back to updated_at
        assert_eq!(event.timestamp, at(0));
    }

    #[test]
    fn event_serializes_with_uniform_shape() {
        let event = room_event("12B", at(60));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "room");
        assert_eq!(value["action"], "updated");
        assert_eq!(value["description"], "Room 12B status changed to occupied");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["data"]["roomNumber"], "12B");
    }

    #[test]
    fn financial_overview_groups_by_due_month() {
        let rents = vec![
            sample_rent(dec!(500), dec!(300), at(1704067200)), // 2024-01-01
            sample_rent(dec!(300), dec!(0), at(1705276800)),   // 2024-01-15
            sample_rent(dec!(200), dec!(200), at(1706745600)), // 2024-02-01
        ];

        let overview = financial_by_month(&rents);
        assert_eq!(
            overview,
            vec![
                MonthlyFinancial {
                    month: "2024-01".to_string(),
                    expected: dec!(800),
                    received: dec!(300),
                },
                MonthlyFinancial {
                    month: "2024-02".to_string(),
                    expected: dec!(200),
                    received: dec!(200),
                },
            ]
        );
    }

    #[test]
    fn financial_overview_empty_property() {
        assert!(financial_by_month(&[]).is_empty());
    }
}
