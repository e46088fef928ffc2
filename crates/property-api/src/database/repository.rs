use super::models::{
    NewProperty, NewRent, NewRoom, NewTenant, Property, PropertyStatus, Rent, RentDetail,
    RentStatus, RentWithTenant, Room, RoomStatus, Tenant, TenantStatus, TenantWithRoom,
    UpdateProperty, UpdateRent, UpdateRoom, UpdateTenant,
};
use super::DbPool;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

pub struct Repository {
    pub pool: DbPool,
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Ensure enum types, tables and indexes exist
    pub async fn ensure_schema(&self) -> Result<()> {
        let pool = self.pool.get_pool();

        for (type_name, variants) in [
            ("property_status", "'active', 'inactive', 'maintenance'"),
            ("room_status", "'vacant', 'occupied', 'maintenance', 'reserved'"),
            ("tenant_status", "'active', 'inactive', 'evicted'"),
            ("rent_status", "'pending', 'partial', 'paid', 'overdue'"),
        ] {
            sqlx::query(&format!(
                r#"DO $$ BEGIN
                    CREATE TYPE {} AS ENUM ({});
                EXCEPTION WHEN duplicate_object THEN NULL;
                END $$"#,
                type_name, variants
            ))
            .execute(pool)
            .await?;
        }

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS properties (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR(255) NOT NULL,
                description TEXT,
                address VARCHAR(255) NOT NULL,
                city VARCHAR(100),
                state VARCHAR(100),
                zip_code VARCHAR(20),
                country VARCHAR(100),
                total_rooms INT,
                status property_status NOT NULL DEFAULT 'active',
                owner_id UUID NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS rooms (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                room_number VARCHAR(50) NOT NULL,
                property_id UUID NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
                floor INT,
                description TEXT,
                rent_amount NUMERIC(10, 2) NOT NULL,
                status room_status NOT NULL DEFAULT 'vacant',
                square_feet DOUBLE PRECISION,
                bedrooms INT,
                bathrooms INT,
                current_tenant_id UUID,
                deposit_amount NUMERIC(10, 2),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS tenants (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                first_name VARCHAR(255) NOT NULL,
                last_name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL UNIQUE,
                phone_number VARCHAR(20) NOT NULL,
                room_id UUID REFERENCES rooms(id) ON DELETE SET NULL,
                property_id UUID REFERENCES properties(id) ON DELETE SET NULL,
                id_number VARCHAR(50),
                emergency_contact VARCHAR(255),
                emergency_phone VARCHAR(20),
                status tenant_status NOT NULL DEFAULT 'active',
                check_in_date TIMESTAMPTZ,
                check_out_date TIMESTAMPTZ,
                deposit_paid NUMERIC(10, 2),
                rent_amount NUMERIC(10, 2),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS rents (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
                room_id UUID NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
                property_id UUID NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
                amount NUMERIC(10, 2) NOT NULL,
                due_date TIMESTAMPTZ NOT NULL,
                paid_date TIMESTAMPTZ,
                status rent_status NOT NULL DEFAULT 'pending',
                amount_paid NUMERIC(10, 2) NOT NULL DEFAULT 0,
                payment_method VARCHAR(100),
                transaction_id VARCHAR(255),
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(pool)
        .await?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_rooms_property ON rooms(property_id)",
            "CREATE INDEX IF NOT EXISTS idx_tenants_property ON tenants(property_id)",
            "CREATE INDEX IF NOT EXISTS idx_rents_property ON rents(property_id)",
            "CREATE INDEX IF NOT EXISTS idx_rents_due_date ON rents(due_date)",
            "CREATE INDEX IF NOT EXISTS idx_rents_status ON rents(property_id, status)",
        ] {
            sqlx::query(index).execute(pool).await?;
        }

        debug!("Schema ensured");
        Ok(())
    }

    // ============ PROPERTIES ============

    pub async fn create_property(
        &self,
        owner_id: Uuid,
        payload: &NewProperty,
    ) -> Result<Property> {
        let property = sqlx::query_as::<_, Property>(
            r#"INSERT INTO properties
               (name, description, address, city, state, zip_code, country,
                total_rooms, status, owner_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING *"#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.address)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.zip_code)
        .bind(&payload.country)
        .bind(payload.total_rooms)
        .bind(payload.status.unwrap_or(PropertyStatus::Active))
        .bind(owner_id)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(property)
    }

    pub async fn list_properties(&self, owner_id: Uuid) -> Result<Vec<Property>> {
        let properties = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(properties)
    }

    pub async fn find_property(&self, id: Uuid) -> Result<Option<Property>> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        Ok(property)
    }

    pub async fn update_property(
        &self,
        id: Uuid,
        payload: &UpdateProperty,
    ) -> Result<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(
            r#"UPDATE properties SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                state = COALESCE($6, state),
                zip_code = COALESCE($7, zip_code),
                country = COALESCE($8, country),
                total_rooms = COALESCE($9, total_rooms),
                status = COALESCE($10, status),
                updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.address)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.zip_code)
        .bind(&payload.country)
        .bind(payload.total_rooms)
        .bind(payload.status)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(property)
    }

    pub async fn delete_property(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(self.pool.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============ ROOMS ============

    pub async fn create_room(&self, payload: &NewRoom) -> Result<Room> {
        let room = sqlx::query_as::<_, Room>(
            r#"INSERT INTO rooms
               (room_number, property_id, floor, description, rent_amount, status,
                square_feet, bedrooms, bathrooms, current_tenant_id, deposit_amount)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING *"#,
        )
        .bind(&payload.room_number)
        .bind(payload.property_id)
        .bind(payload.floor)
        .bind(&payload.description)
        .bind(payload.rent_amount)
        .bind(payload.status.unwrap_or(RoomStatus::Vacant))
        .bind(payload.square_feet)
        .bind(payload.bedrooms)
        .bind(payload.bathrooms)
        .bind(payload.current_tenant_id)
        .bind(payload.deposit_amount)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(room)
    }

    pub async fn list_rooms(&self, property_id: Option<Uuid>) -> Result<Vec<Room>> {
        let rooms = match property_id {
            Some(property_id) => {
                sqlx::query_as::<_, Room>(
                    "SELECT * FROM rooms WHERE property_id = $1 ORDER BY room_number",
                )
                .bind(property_id)
                .fetch_all(self.pool.get_pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY room_number")
                    .fetch_all(self.pool.get_pool())
                    .await?
            }
        };

        Ok(rooms)
    }

    pub async fn find_room(&self, id: Uuid) -> Result<Option<Room>> {
        let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        Ok(room)
    }

    pub async fn update_room(&self, id: Uuid, payload: &UpdateRoom) -> Result<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            r#"UPDATE rooms SET
                room_number = COALESCE($2, room_number),
                floor = COALESCE($3, floor),
                description = COALESCE($4, description),
                rent_amount = COALESCE($5, rent_amount),
                status = COALESCE($6, status),
                square_feet = COALESCE($7, square_feet),
                bedrooms = COALESCE($8, bedrooms),
                bathrooms = COALESCE($9, bathrooms),
                current_tenant_id = COALESCE($10, current_tenant_id),
                deposit_amount = COALESCE($11, deposit_amount),
                updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&payload.room_number)
        .bind(payload.floor)
        .bind(&payload.description)
        .bind(payload.rent_amount)
        .bind(payload.status)
        .bind(payload.square_feet)
        .bind(payload.bedrooms)
        .bind(payload.bathrooms)
        .bind(payload.current_tenant_id)
        .bind(payload.deposit_amount)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(room)
    }

    pub async fn delete_room(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(self.pool.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_rooms(
        &self,
        property_id: Uuid,
        status: Option<RoomStatus>,
    ) -> Result<i64> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM rooms WHERE property_id = $1 AND status = $2",
                )
                .bind(property_id)
                .bind(status)
                .fetch_one(self.pool.get_pool())
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms WHERE property_id = $1")
                    .bind(property_id)
                    .fetch_one(self.pool.get_pool())
                    .await?
            }
        };

        Ok(count)
    }

    /// Rooms most recently touched, for the activity feed
    pub async fn recent_rooms(&self, property_id: Uuid, limit: i64) -> Result<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms WHERE property_id = $1 ORDER BY updated_at DESC LIMIT $2",
        )
        .bind(property_id)
        .bind(limit)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(rooms)
    }

    // ============ TENANTS ============

    pub async fn create_tenant(&self, payload: &NewTenant) -> Result<Tenant> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"INSERT INTO tenants
               (first_name, last_name, email, phone_number, room_id, property_id,
                id_number, emergency_contact, emergency_phone, status,
                check_in_date, check_out_date, deposit_paid, rent_amount)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
               RETURNING *"#,
        )
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone_number)
        .bind(payload.room_id)
        .bind(payload.property_id)
        .bind(&payload.id_number)
        .bind(&payload.emergency_contact)
        .bind(&payload.emergency_phone)
        .bind(payload.status.unwrap_or(TenantStatus::Active))
        .bind(payload.check_in_date)
        .bind(payload.check_out_date)
        .bind(payload.deposit_paid)
        .bind(payload.rent_amount)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(tenant)
    }

    pub async fn list_tenants(&self, property_id: Option<Uuid>) -> Result<Vec<Tenant>> {
        let tenants = match property_id {
            Some(property_id) => {
                sqlx::query_as::<_, Tenant>(
                    "SELECT * FROM tenants WHERE property_id = $1 ORDER BY created_at DESC",
                )
                .bind(property_id)
                .fetch_all(self.pool.get_pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY created_at DESC")
                    .fetch_all(self.pool.get_pool())
                    .await?
            }
        };

        Ok(tenants)
    }

    pub async fn find_tenant(&self, id: Uuid) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        Ok(tenant)
    }

    pub async fn update_tenant(
        &self,
        id: Uuid,
        payload: &UpdateTenant,
    ) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"UPDATE tenants SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone_number = COALESCE($5, phone_number),
                room_id = COALESCE($6, room_id),
                property_id = COALESCE($7, property_id),
                id_number = COALESCE($8, id_number),
                emergency_contact = COALESCE($9, emergency_contact),
                emergency_phone = COALESCE($10, emergency_phone),
                status = COALESCE($11, status),
                check_in_date = COALESCE($12, check_in_date),
                check_out_date = COALESCE($13, check_out_date),
                deposit_paid = COALESCE($14, deposit_paid),
                rent_amount = COALESCE($15, rent_amount),
                updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone_number)
        .bind(payload.room_id)
        .bind(payload.property_id)
        .bind(&payload.id_number)
        .bind(&payload.emergency_contact)
        .bind(&payload.emergency_phone)
        .bind(payload.status)
        .bind(payload.check_in_date)
        .bind(payload.check_out_date)
        .bind(payload.deposit_paid)
        .bind(payload.rent_amount)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(tenant)
    }

    pub async fn delete_tenant(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(self.pool.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_tenant_check_in(
        &self,
        id: Uuid,
        check_in_date: DateTime<Utc>,
    ) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"UPDATE tenants
               SET check_in_date = $2, status = 'active', updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(check_in_date)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(tenant)
    }

    pub async fn set_tenant_check_out(
        &self,
        id: Uuid,
        check_out_date: DateTime<Utc>,
    ) -> Result<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"UPDATE tenants
               SET check_out_date = $2, status = 'inactive', updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(check_out_date)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(tenant)
    }

    pub async fn count_tenants(&self, property_id: Uuid, status: TenantStatus) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tenants WHERE property_id = $1 AND status = $2",
        )
        .bind(property_id)
        .bind(status)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(count)
    }

    /// Tenants most recently added, with their room number resolved
    pub async fn recent_tenants(
        &self,
        property_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TenantWithRoom>> {
        let tenants = sqlx::query_as::<_, TenantWithRoom>(
            r#"SELECT t.*, r.room_number AS room_number
               FROM tenants t
               LEFT JOIN rooms r ON r.id = t.room_id
               WHERE t.property_id = $1
               ORDER BY t.created_at DESC
               LIMIT $2"#,
        )
        .bind(property_id)
        .bind(limit)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(tenants)
    }

    // ============ RENTS ============

    pub async fn create_rent(&self, payload: &NewRent) -> Result<Rent> {
        let rent = sqlx::query_as::<_, Rent>(
            r#"INSERT INTO rents
               (tenant_id, room_id, property_id, amount, due_date, status,
                amount_paid, payment_method, notes)
               VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8)
               RETURNING *"#,
        )
        .bind(payload.tenant_id)
        .bind(payload.room_id)
        .bind(payload.property_id)
        .bind(payload.amount)
        .bind(payload.due_date)
        .bind(RentStatus::Pending)
        .bind(&payload.payment_method)
        .bind(&payload.notes)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(rent)
    }

    pub async fn list_rents(
        &self,
        property_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Rent>> {
        let rents = match property_id {
            Some(property_id) => {
                sqlx::query_as::<_, Rent>(
                    r#"SELECT * FROM rents WHERE property_id = $1
                       ORDER BY due_date DESC LIMIT $2 OFFSET $3"#,
                )
                .bind(property_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(self.pool.get_pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, Rent>(
                    "SELECT * FROM rents ORDER BY due_date DESC LIMIT $1 OFFSET $2",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(self.pool.get_pool())
                .await?
            }
        };

        Ok(rents)
    }

    pub async fn count_rents(&self, property_id: Option<Uuid>) -> Result<i64> {
        let count = match property_id {
            Some(property_id) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rents WHERE property_id = $1")
                    .bind(property_id)
                    .fetch_one(self.pool.get_pool())
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rents")
                    .fetch_one(self.pool.get_pool())
                    .await?
            }
        };

        Ok(count)
    }

    pub async fn find_rent(&self, id: Uuid) -> Result<Option<Rent>> {
        let rent = sqlx::query_as::<_, Rent>("SELECT * FROM rents WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        Ok(rent)
    }

    /// Rent with its related tenant, room and property resolved
    pub async fn find_rent_detail(&self, id: Uuid) -> Result<Option<RentDetail>> {
        let Some(rent) = self.find_rent(id).await? else {
            return Ok(None);
        };

        let (tenant, room, property) = tokio::try_join!(
            self.find_tenant(rent.tenant_id),
            self.find_room(rent.room_id),
            self.find_property(rent.property_id),
        )?;

        Ok(Some(RentDetail {
            rent,
            tenant,
            room,
            property,
        }))
    }

    pub async fn update_rent(&self, id: Uuid, payload: &UpdateRent) -> Result<Option<Rent>> {
        let rent = sqlx::query_as::<_, Rent>(
            r#"UPDATE rents SET
                amount = COALESCE($2, amount),
                due_date = COALESCE($3, due_date),
                status = COALESCE($4, status),
                payment_method = COALESCE($5, payment_method),
                transaction_id = COALESCE($6, transaction_id),
                notes = COALESCE($7, notes),
                updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(payload.amount)
        .bind(payload.due_date)
        .bind(payload.status)
        .bind(&payload.payment_method)
        .bind(&payload.transaction_id)
        .bind(&payload.notes)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(rent)
    }

    pub async fn delete_rent(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rents WHERE id = $1")
            .bind(id)
            .execute(self.pool.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Conditional payment write: only applies when `amount_paid` still holds
    /// the value the caller read. Returns None when the row is gone or a
    /// concurrent payment won the race.
    pub async fn apply_payment(
        &self,
        id: Uuid,
        expected_amount_paid: Decimal,
        new_amount_paid: Decimal,
        status: RentStatus,
        paid_date: Option<DateTime<Utc>>,
        payment_method: &str,
        transaction_id: Option<String>,
    ) -> Result<Option<Rent>> {
        let rent = sqlx::query_as::<_, Rent>(
            r#"UPDATE rents SET
                amount_paid = $3,
                status = $4,
                paid_date = $5,
                payment_method = $6,
                transaction_id = $7,
                updated_at = NOW()
               WHERE id = $1 AND amount_paid = $2
               RETURNING *"#,
        )
        .bind(id)
        .bind(expected_amount_paid)
        .bind(new_amount_paid)
        .bind(status)
        .bind(paid_date)
        .bind(payment_method)
        .bind(transaction_id)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(rent)
    }

    pub async fn pending_rents(&self, property_id: Uuid) -> Result<Vec<Rent>> {
        let rents = sqlx::query_as::<_, Rent>(
            r#"SELECT * FROM rents
               WHERE property_id = $1 AND status IN ('pending', 'overdue', 'partial')
               ORDER BY due_date ASC"#,
        )
        .bind(property_id)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(rents)
    }

    pub async fn rents_by_property(&self, property_id: Uuid) -> Result<Vec<Rent>> {
        let rents = sqlx::query_as::<_, Rent>("SELECT * FROM rents WHERE property_id = $1")
            .bind(property_id)
            .fetch_all(self.pool.get_pool())
            .await?;

        Ok(rents)
    }

    /// (total expected, total paid) across all rents of a property
    pub async fn rent_totals(&self, property_id: Uuid) -> Result<(Decimal, Decimal)> {
        let totals = sqlx::query_as::<_, (Decimal, Decimal)>(
            r#"SELECT COALESCE(SUM(amount), 0::numeric),
                      COALESCE(SUM(amount_paid), 0::numeric)
               FROM rents WHERE property_id = $1"#,
        )
        .bind(property_id)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(totals)
    }

    /// Rents still waiting on payment (pending or overdue)
    pub async fn count_open_rents(&self, property_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM rents
               WHERE property_id = $1 AND status IN ('pending', 'overdue')"#,
        )
        .bind(property_id)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(count)
    }

    /// Rents most recently paid (falling back to last update), with the
    /// tenant's name resolved, for the activity feed
    pub async fn recent_rents(
        &self,
        property_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RentWithTenant>> {
        let rents = sqlx::query_as::<_, RentWithTenant>(
            r#"SELECT r.*, t.first_name AS tenant_first_name, t.last_name AS tenant_last_name
               FROM rents r
               LEFT JOIN tenants t ON t.id = r.tenant_id
               WHERE r.property_id = $1
               ORDER BY COALESCE(r.paid_date, r.updated_at) DESC
               LIMIT $2"#,
        )
        .bind(property_id)
        .bind(limit)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(rents)
    }
}
