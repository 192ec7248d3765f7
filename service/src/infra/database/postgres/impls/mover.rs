//! [`MoverService`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Select, Update, Upsert},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{mover, MoverRating, MoverService},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of the `mover_services` table, in [`service_from_row`] order.
const COLUMNS: &str = "\
    id, owner_id, name, description, \
    rate_per_km, rate_per_km_currency, \
    provides_cleaning, \
    contact_phone, contact_email, \
    created_at, updated_at";

/// Reconstructs a [`MoverService`] from the provided [`Row`].
fn service_from_row(row: &Row) -> MoverService {
    MoverService {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        description: row.get("description"),
        rate_per_km: Money {
            amount: row.get("rate_per_km"),
            currency: row.get("rate_per_km_currency"),
        },
        provides_cleaning: row.get("provides_cleaning"),
        contact_phone: row.get("contact_phone"),
        contact_email: row.get("contact_email"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<mover::Id, MoverService>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[mover::Id]>,
{
    type Ok = HashMap<mover::Id, MoverService>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<mover::Id, MoverService>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[mover::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM mover_services \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let service = service_from_row(row);
                (service.id, service)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<MoverService>, mover::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<mover::Id, MoverService>, [mover::Id; 1]>>,
        Ok = HashMap<mover::Id, MoverService>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<MoverService>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<MoverService>, mover::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<MoverService>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<MoverService>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(service): Insert<MoverService>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(service))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<MoverService>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(service): Update<MoverService>,
    ) -> Result<Self::Ok, Self::Err> {
        let MoverService {
            id,
            owner_id,
            name,
            description,
            rate_per_km,
            provides_cleaning,
            contact_phone,
            contact_email,
            created_at,
            updated_at,
        } = service;

        const SQL: &str = "\
            INSERT INTO mover_services (\
                id, owner_id, name, description, \
                rate_per_km, rate_per_km_currency, \
                provides_cleaning, \
                contact_phone, contact_email, \
                created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, \
                $5::NUMERIC, $6::INT2, \
                $7::BOOL, \
                $8::VARCHAR, $9::VARCHAR, \
                $10::TIMESTAMPTZ, $11::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                description = EXCLUDED.description, \
                rate_per_km = EXCLUDED.rate_per_km, \
                rate_per_km_currency = EXCLUDED.rate_per_km_currency, \
                provides_cleaning = EXCLUDED.provides_cleaning, \
                contact_phone = EXCLUDED.contact_phone, \
                contact_email = EXCLUDED.contact_email, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &name,
                &description,
                &rate_per_km.amount,
                &rate_per_km.currency,
                &provides_cleaning,
                &contact_phone,
                &contact_email,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<MoverService, mover::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<MoverService, mover::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: mover::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM mover_services \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<MoverService>, read::mover::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MoverService>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<MoverService>, read::mover::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::mover::Filter {
            owner_id,
            query,
            provides_cleaning,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let owner_idx = owner_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let query_pattern = query.as_deref().map(LikePattern::new);
        let query_idx = query_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let cleaning_idx = provides_cleaning.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM mover_services \
             WHERE true \
                   {owner_filtering} \
                   {query_filtering} \
                   {cleaning_filtering} \
             ORDER BY created_at DESC",
            owner_filtering =
                owner_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND owner_id = ${idx}::UUID"))
                }),
            query_filtering =
                query_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND (name ILIKE ${idx}::VARCHAR \
                              OR description ILIKE ${idx}::VARCHAR)"
                    ))
                }),
            cleaning_filtering =
                cleaning_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND provides_cleaning = ${idx}::BOOL"))
                }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(service_from_row)
            .collect())
    }
}

impl<C> Database<Upsert<MoverRating>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Upsert(rating): Upsert<MoverRating>,
    ) -> Result<Self::Ok, Self::Err> {
        let MoverRating {
            id,
            service_id,
            user_id,
            score,
            comment,
            created_at,
            updated_at,
        } = rating;

        // Keyed on `(service_id, user_id)`: resubmission replaces the
        // previous review in place, keeping its original `id`.
        const SQL: &str = "\
            INSERT INTO mover_ratings (\
                id, service_id, user_id, score, comment, \
                created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::INT2, $5::VARCHAR, \
                $6::TIMESTAMPTZ, $7::TIMESTAMPTZ \
            ) \
            ON CONFLICT (service_id, user_id) DO UPDATE \
            SET score = EXCLUDED.score, \
                comment = EXCLUDED.comment, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &service_id,
                &user_id,
                &score,
                &comment,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<MoverRating>, mover::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MoverRating>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<MoverRating>, mover::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let service_id: mover::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, service_id, user_id, score, comment, \
                   created_at, updated_at \
            FROM mover_ratings \
            WHERE service_id = $1::UUID \
            ORDER BY updated_at DESC";
        Ok(self
            .query(SQL, &[&service_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| MoverRating {
                id: row.get("id"),
                service_id: row.get("service_id"),
                user_id: row.get("user_id"),
                score: row.get("score"),
                comment: row.get("comment"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<read::mover::RatingSummary, mover::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::mover::RatingSummary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::mover::RatingSummary, mover::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let service_id: mover::Id = by.into_inner();

        const SQL: &str = "\
            SELECT ROUND(COALESCE(AVG(score), 0), 1)::NUMERIC AS average, \
                   COUNT(*)::INT8 AS count \
            FROM mover_ratings \
            WHERE service_id = $1::UUID";
        self.query_opt(SQL, &[&service_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                let row = row.expect("always exists");
                read::mover::RatingSummary {
                    average: row.get("average"),
                    count: row.get("count"),
                }
            })
    }
}
