//! [`Booking`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, user, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `bookings` table, in [`booking_from_row`] order.
const COLUMNS: &str = "\
    id, tenant_id, house_id, \
    move_in_at, lease_months, \
    tenant_name, tenant_phone, tenant_email, message, \
    status, created_at, updated_at";

/// Reconstructs a [`Booking`] from the provided [`Row`].
fn booking_from_row(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        house_id: row.get("house_id"),
        move_in_at: row.get("move_in_at"),
        lease_months: u16::try_from(row.get::<_, i32>("lease_months"))
            .expect("`lease_months` overflow"),
        tenant_name: row.get("tenant_name"),
        tenant_phone: row.get("tenant_phone"),
        tenant_email: row.get("tenant_email"),
        message: row.get("message"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<booking::Id, Booking>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[booking::Id]>,
{
    type Ok = HashMap<booking::Id, Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<booking::Id, Booking>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[booking::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let booking = booking_from_row(row);
                (booking.id, booking)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<booking::Id, Booking>, [booking::Id; 1]>>,
        Ok = HashMap<booking::Id, Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            tenant_id,
            house_id,
            move_in_at,
            lease_months,
            tenant_name,
            tenant_phone,
            tenant_email,
            message,
            status,
            created_at,
            updated_at,
        } = booking;

        let lease_months = i32::from(lease_months);

        // No `ON CONFLICT` clause: a duplicate `(tenant_id, house_id)` pair
        // must surface as a unique violation.
        const SQL: &str = "\
            INSERT INTO bookings (\
                id, tenant_id, house_id, \
                move_in_at, lease_months, \
                tenant_name, tenant_phone, tenant_email, message, \
                status, created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::TIMESTAMPTZ, $5::INT4, \
                $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, $9::VARCHAR, \
                $10::INT2, \
                $11::TIMESTAMPTZ, $12::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &tenant_id,
                &house_id,
                &move_in_at,
                &lease_months,
                &tenant_name,
                &tenant_phone,
                &tenant_email,
                &message,
                &status,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            status,
            updated_at,
            ..
        } = booking;

        // Snapshot fields of a `Booking` are immutable once placed, so only
        // the workflow columns are written back.
        const SQL: &str = "\
            UPDATE bookings \
            SET status = $2::INT2, \
                updated_at = $3::TIMESTAMPTZ \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id, &status, &updated_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO bookings_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Booking>, read::booking::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, read::booking::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Filter {
            tenant_id,
            landlord_id,
            house_id,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let tenant_idx = tenant_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let landlord_idx = landlord_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let house_idx = house_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let sql = format!(
            "SELECT {columns} \
             FROM bookings b \
             WHERE true \
                   {tenant_filtering} \
                   {landlord_filtering} \
                   {house_filtering} \
             ORDER BY b.created_at DESC",
            columns = COLUMNS
                .split(", ")
                .format_with(", ", |c, f| f(&format_args!("b.{c}"))),
            tenant_filtering =
                tenant_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND b.tenant_id = ${idx}::UUID"))
                }),
            landlord_filtering =
                landlord_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND b.house_id IN (SELECT id \
                                            FROM houses \
                                            WHERE landlord_id = ${idx}::UUID)"
                    ))
                }),
            house_filtering = house_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND b.house_id = ${idx}::UUID"))
            }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(booking_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<read::booking::StatusCounts, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::booking::StatusCounts;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::booking::StatusCounts, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let tenant_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*) FILTER (WHERE status = $2::INT2)::INT8 \
                       AS pending, \
                   COUNT(*) FILTER (WHERE status = $3::INT2)::INT8 \
                       AS approved, \
                   COUNT(*) FILTER (WHERE status = $4::INT2)::INT8 \
                       AS rejected, \
                   COUNT(*) FILTER (WHERE status = $5::INT2)::INT8 \
                       AS cancelled \
            FROM bookings \
            WHERE tenant_id = $1::UUID";
        self.query_opt(
            SQL,
            &[
                &tenant_id,
                &booking::Status::Pending,
                &booking::Status::Approved,
                &booking::Status::Rejected,
                &booking::Status::Cancelled,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| {
            let row = row.expect("always exists");
            read::booking::StatusCounts {
                pending: row.get("pending"),
                approved: row.get("approved"),
                rejected: row.get("rejected"),
                cancelled: row.get("cancelled"),
            }
        })
    }
}
