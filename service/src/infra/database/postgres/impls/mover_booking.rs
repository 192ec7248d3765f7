//! [`MoverBooking`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{mover_booking, MoverBooking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `mover_bookings` table, in [`booking_from_row`] order.
const COLUMNS: &str = "\
    id, booking_id, mover_id, tenant_id, \
    pickup, dropoff, distance_km, \
    base_rate, base_rate_currency, \
    rate_per_km, rate_per_km_currency, \
    total_cost, total_cost_currency, \
    rating_snapshot, \
    status, created_at, updated_at";

/// Reconstructs a [`MoverBooking`] from the provided [`Row`].
fn booking_from_row(row: &Row) -> MoverBooking {
    MoverBooking {
        id: row.get("id"),
        booking_id: row.get("booking_id"),
        mover_id: row.get("mover_id"),
        tenant_id: row.get("tenant_id"),
        pickup: row.get("pickup"),
        dropoff: row.get("dropoff"),
        distance_km: row.get("distance_km"),
        base_rate: Money {
            amount: row.get("base_rate"),
            currency: row.get("base_rate_currency"),
        },
        rate_per_km: Money {
            amount: row.get("rate_per_km"),
            currency: row.get("rate_per_km_currency"),
        },
        total_cost: Money {
            amount: row.get("total_cost"),
            currency: row.get("total_cost_currency"),
        },
        rating_snapshot: row.get("rating_snapshot"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<mover_booking::Id, MoverBooking>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[mover_booking::Id]>,
{
    type Ok = HashMap<mover_booking::Id, MoverBooking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<mover_booking::Id, MoverBooking>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[mover_booking::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM mover_bookings \
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

impl<C> Database<Select<By<Option<MoverBooking>, mover_booking::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<
                HashMap<mover_booking::Id, MoverBooking>,
                [mover_booking::Id; 1],
            >,
        >,
        Ok = HashMap<mover_booking::Id, MoverBooking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<MoverBooking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<MoverBooking>, mover_booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<MoverBooking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<MoverBooking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<MoverBooking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<MoverBooking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<MoverBooking>,
    ) -> Result<Self::Ok, Self::Err> {
        let MoverBooking {
            id,
            booking_id,
            mover_id,
            tenant_id,
            pickup,
            dropoff,
            distance_km,
            base_rate,
            rate_per_km,
            total_cost,
            rating_snapshot,
            status,
            created_at,
            updated_at,
        } = booking;

        const SQL: &str = "\
            INSERT INTO mover_bookings (\
                id, booking_id, mover_id, tenant_id, \
                pickup, dropoff, distance_km, \
                base_rate, base_rate_currency, \
                rate_per_km, rate_per_km_currency, \
                total_cost, total_cost_currency, \
                rating_snapshot, \
                status, created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::VARCHAR, $6::VARCHAR, $7::NUMERIC, \
                $8::NUMERIC, $9::INT2, \
                $10::NUMERIC, $11::INT2, \
                $12::NUMERIC, $13::INT2, \
                $14::NUMERIC, \
                $15::INT2, \
                $16::TIMESTAMPTZ, $17::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET mover_id = EXCLUDED.mover_id, \
                distance_km = EXCLUDED.distance_km, \
                base_rate = EXCLUDED.base_rate, \
                base_rate_currency = EXCLUDED.base_rate_currency, \
                rate_per_km = EXCLUDED.rate_per_km, \
                rate_per_km_currency = EXCLUDED.rate_per_km_currency, \
                total_cost = EXCLUDED.total_cost, \
                total_cost_currency = EXCLUDED.total_cost_currency, \
                rating_snapshot = EXCLUDED.rating_snapshot, \
                status = EXCLUDED.status, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &booking_id,
                &mover_id,
                &tenant_id,
                &pickup,
                &dropoff,
                &distance_km,
                &base_rate.amount,
                &base_rate.currency,
                &rate_per_km.amount,
                &rate_per_km.currency,
                &total_cost.amount,
                &total_cost.currency,
                &rating_snapshot,
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

impl<C> Database<Lock<By<MoverBooking, mover_booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<MoverBooking, mover_booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: mover_booking::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO mover_bookings_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<MoverBooking>, read::mover_booking::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MoverBooking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<MoverBooking>, read::mover_booking::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::mover_booking::Filter {
            tenant_id,
            owner_id,
            mover_id,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let tenant_idx = tenant_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let owner_idx = owner_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let mover_idx = mover_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let sql = format!(
            "SELECT {columns} \
             FROM mover_bookings mb \
             WHERE true \
                   {tenant_filtering} \
                   {owner_filtering} \
                   {mover_filtering} \
             ORDER BY mb.created_at DESC",
            columns = COLUMNS
                .split(", ")
                .format_with(", ", |c, f| f(&format_args!("mb.{c}"))),
            tenant_filtering =
                tenant_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND mb.tenant_id = ${idx}::UUID"))
                }),
            owner_filtering =
                owner_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND mb.mover_id IN (SELECT id \
                                             FROM mover_services \
                                             WHERE owner_id = ${idx}::UUID)"
                    ))
                }),
            mover_filtering =
                mover_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND mb.mover_id = ${idx}::UUID"))
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
