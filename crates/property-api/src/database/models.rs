use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Active,
    Inactive,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "room_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Vacant,
    Occupied,
    Maintenance,
    Reserved,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            RoomStatus::Vacant => "vacant",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
            RoomStatus::Reserved => "reserved",
        };
        f.write_str(status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tenant_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Inactive,
    Evicted,
}

/// Rent payment state. `Overdue` is only ever written by an external
/// process; the payment path derives `Pending`/`Partial`/`Paid` from the
/// cumulative amount paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "rent_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RentStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub total_rooms: Option<i32>,
    pub status: PropertyStatus,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub room_number: String,
    pub property_id: Uuid,
    pub floor: Option<i32>,
    pub description: Option<String>,
    pub rent_amount: Decimal,
    pub status: RoomStatus,
    pub square_feet: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub current_tenant_id: Option<Uuid>,
    pub deposit_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub room_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub id_number: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub status: TenantStatus,
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    pub deposit_paid: Option<Decimal>,
    pub rent_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One billing obligation tying a tenant, room and property to an expected
/// amount and its cumulative payment state.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rent {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub room_id: Uuid,
    pub property_id: Uuid,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
    pub status: RentStatus,
    pub amount_paid: Decimal,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rent with its related records resolved, returned by single-rent reads and
/// by the payment operation (read-after-write convenience for the caller).
#[derive(Debug, Clone, Serialize)]
pub struct RentDetail {
    #[serde(flatten)]
    pub rent: Rent,
    pub tenant: Option<Tenant>,
    pub room: Option<Room>,
    pub property: Option<Property>,
}

/// Tenant row with the number of its related room, for the activity feed.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantWithRoom {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tenant: Tenant,
    pub room_number: Option<String>,
}

/// Rent row with the related tenant's name, for the activity feed.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentWithTenant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub rent: Rent,
    pub tenant_first_name: Option<String>,
    pub tenant_last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub total_rooms: Option<i32>,
    pub status: Option<PropertyStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProperty {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub total_rooms: Option<i32>,
    pub status: Option<PropertyStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub room_number: String,
    pub property_id: Uuid,
    pub floor: Option<i32>,
    pub description: Option<String>,
    pub rent_amount: Decimal,
    pub status: Option<RoomStatus>,
    pub square_feet: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub current_tenant_id: Option<Uuid>,
    pub deposit_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    pub room_number: Option<String>,
    pub floor: Option<i32>,
    pub description: Option<String>,
    pub rent_amount: Option<Decimal>,
    pub status: Option<RoomStatus>,
    pub square_feet: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub current_tenant_id: Option<Uuid>,
    pub deposit_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub room_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub id_number: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub status: Option<TenantStatus>,
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    pub deposit_paid: Option<Decimal>,
    pub rent_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenant {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub room_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub id_number: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub status: Option<TenantStatus>,
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    pub deposit_paid: Option<Decimal>,
    pub rent_amount: Option<Decimal>,
}

/// New rent records always start out `pending` with nothing paid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRent {
    pub tenant_id: Uuid,
    pub room_id: Uuid,
    pub property_id: Uuid,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Administrative update; `amount_paid` is deliberately absent, it only
/// moves through the payment operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRent {
    pub amount: Option<Decimal>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<RentStatus>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}
