//! DonationRepository - Repository per la gestione delle offerte

use super::{Create, Delete, Read, Update, ensure_affected};
use crate::dtos::{CreateDonationDTO, DonationQuery, DonationTypeTotalDTO, UpdateDonationDTO};
use crate::entities::{Donation, PaymentMethod};
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_DONATION: &str = r#"
    SELECT
        donation_id, member_id, family_id, amount, donation_type, payment_method, donated_on,
        note, recorded_by, created_at
    FROM donations
"#;

// DONATION REPOSITORY
pub struct DonationRepository {
    connection_pool: SqlitePool,
}

/// Aggiunge le condizioni WHERE comuni a lista e riepilogo
fn push_filters(query_builder: &mut QueryBuilder<'_, Sqlite>, filter: &DonationQuery) {
    query_builder.push(" WHERE 1 = 1");
    if let Some(member_id) = filter.member_id {
        query_builder.push(" AND member_id = ").push_bind(member_id);
    }
    if let Some(family_id) = filter.family_id {
        query_builder.push(" AND family_id = ").push_bind(family_id);
    }
    if let Some(donation_type) = filter.donation_type {
        query_builder.push(" AND donation_type = ").push_bind(donation_type);
    }
    if let Some(payment_method) = filter.payment_method {
        query_builder.push(" AND payment_method = ").push_bind(payment_method);
    }
    if let Some(from) = filter.from {
        query_builder.push(" AND donated_on >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        query_builder.push(" AND donated_on <= ").push_bind(to);
    }
}

impl DonationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Lista delle offerte filtrate, dalla più recente
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &DonationQuery) -> Result<Vec<Donation>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_DONATION);
        push_filters(&mut query_builder, filter);
        query_builder.push(" ORDER BY donated_on DESC, donation_id DESC");

        let donations = query_builder
            .build_query_as::<Donation>()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Found {} donations", donations.len());
        Ok(donations)
    }

    /// Totali raggruppati per tipo di offerta, con gli stessi filtri della lista
    #[instrument(skip(self))]
    pub async fn totals_by_type(
        &self,
        filter: &DonationQuery,
    ) -> Result<Vec<DonationTypeTotalDTO>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT donation_type, COALESCE(SUM(amount), 0) AS total_amount, COUNT(*) AS donation_count FROM donations",
        );
        push_filters(&mut query_builder, filter);
        query_builder.push(" GROUP BY donation_type ORDER BY total_amount DESC, donation_type");

        query_builder
            .build_query_as::<DonationTypeTotalDTO>()
            .fetch_all(&self.connection_pool)
            .await
    }
}

impl Create<Donation, CreateDonationDTO> for DonationRepository {
    #[instrument(skip(self, data), fields(amount = data.amount, donation_type = ?data.donation_type))]
    async fn create(&self, data: &CreateDonationDTO) -> Result<Donation, Error> {
        debug!("Recording new donation");
        let result = sqlx::query(
            r#"
            INSERT INTO donations (
                member_id, family_id, amount, donation_type, payment_method, donated_on, note,
                recorded_by, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.member_id)
        .bind(data.family_id)
        .bind(data.amount)
        .bind(data.donation_type)
        .bind(data.payment_method.unwrap_or(PaymentMethod::Cash))
        .bind(data.donated_on)
        .bind(data.note.as_deref())
        .bind(data.recorded_by)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();
        info!("Donation recorded with id {}", new_id);
        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Donation, i64> for DonationRepository {
    async fn read(&self, id: &i64) -> Result<Option<Donation>, Error> {
        sqlx::query_as::<_, Donation>(&format!("{} WHERE donation_id = ?", SELECT_DONATION))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Donation, UpdateDonationDTO, i64> for DonationRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i64, data: &UpdateDonationDTO) -> Result<Donation, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE donations SET ");
        let mut separated = query_builder.separated(", ");
        let mut changed = false;

        if let Some(member_id) = data.member_id {
            separated.push("member_id = ");
            separated.push_bind_unseparated(member_id);
            changed = true;
        }
        if let Some(family_id) = data.family_id {
            separated.push("family_id = ");
            separated.push_bind_unseparated(family_id);
            changed = true;
        }
        if let Some(amount) = data.amount {
            separated.push("amount = ");
            separated.push_bind_unseparated(amount);
            changed = true;
        }
        if let Some(donation_type) = data.donation_type {
            separated.push("donation_type = ");
            separated.push_bind_unseparated(donation_type);
            changed = true;
        }
        if let Some(payment_method) = data.payment_method {
            separated.push("payment_method = ");
            separated.push_bind_unseparated(payment_method);
            changed = true;
        }
        if let Some(donated_on) = data.donated_on {
            separated.push("donated_on = ");
            separated.push_bind_unseparated(donated_on);
            changed = true;
        }
        if let Some(ref note) = data.note {
            separated.push("note = ");
            separated.push_bind_unseparated(note.clone());
            changed = true;
        }

        // le offerte non hanno updated_at: senza campi da aggiornare non c'è query
        if !changed {
            return Ok(current);
        }

        query_builder.push(" WHERE donation_id = ");
        query_builder.push_bind(*id);
        query_builder.build().execute(&self.connection_pool).await?;

        info!("Donation {} updated", id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for DonationRepository {
    #[instrument(skip(self))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM donations WHERE donation_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Donation {} deleted", id);
        Ok(())
    }
}
