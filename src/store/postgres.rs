//! PostgreSQL-backed store.
//!
//! Queries are built at runtime (no compile-time checked macros) and cast columns explicitly so
//! older schemas with integer ids or untyped JSON columns still decode.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use tracing::{debug, info, warn};

use super::model::RankedCompany;
use super::{
    CompanyStore, IncentiveStore, LocationStore, MatchResult, ProgressReport, ResultStore,
    ReverseIndex, ScoredRanking, StoreError, StoreResult,
};
use crate::domain::{CompanyId, CompanyRecord, Incentive};
use crate::location::{LocationRecord, LocationStatus};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const PROCESSABLE_FILTER: &str = "sector IS NOT NULL \
     AND eligible_actions IS NOT NULL \
     AND geo_requirement IS NOT NULL \
     AND ai_description IS NOT NULL";

const SCHEMA_MIGRATIONS: &[&str] = &[
    "ALTER TABLE incentives ADD COLUMN IF NOT EXISTS top_5_companies JSONB",
    "ALTER TABLE incentives ADD COLUMN IF NOT EXISTS top_5_companies_scored JSONB",
    "ALTER TABLE companies ADD COLUMN IF NOT EXISTS location_lat DOUBLE PRECISION",
    "ALTER TABLE companies ADD COLUMN IF NOT EXISTS location_lon DOUBLE PRECISION",
    "ALTER TABLE companies ADD COLUMN IF NOT EXISTS location_address TEXT",
    "ALTER TABLE companies ADD COLUMN IF NOT EXISTS location_api_status TEXT",
    "ALTER TABLE companies ADD COLUMN IF NOT EXISTS location_updated_at TIMESTAMPTZ",
    "ALTER TABLE companies ADD COLUMN IF NOT EXISTS eligible_incentives JSONB",
];

#[derive(Debug, sqlx::FromRow)]
struct IncentiveRow {
    incentive_id: String,
    title: Option<String>,
    sector: Option<String>,
    geo_requirement: Option<String>,
    eligible_actions: Option<String>,
    ai_description: Option<String>,
}

impl From<IncentiveRow> for Incentive {
    fn from(row: IncentiveRow) -> Self {
        Incentive {
            id: row.incentive_id,
            title: row.title.unwrap_or_default(),
            sector: row.sector,
            geo_requirement: row.geo_requirement,
            eligible_actions: row.eligible_actions,
            description: row.ai_description,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    company_id: i64,
    company_name: Option<String>,
    cae_primary_label: Option<String>,
    trade_description_native: Option<String>,
    website: Option<String>,
}

impl From<CompanyRow> for CompanyRecord {
    fn from(row: CompanyRow) -> Self {
        CompanyRecord {
            id: row.company_id,
            name: row.company_name.unwrap_or_default(),
            category_label: row.cae_primary_label,
            activity: row.trade_description_native,
            website: row.website,
            address_hint: None,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    company_id: i64,
    location_lat: Option<f64>,
    location_lon: Option<f64>,
    location_address: Option<String>,
    location_api_status: String,
    location_updated_at: Option<DateTime<Utc>>,
}

impl From<LocationRow> for LocationRecord {
    fn from(row: LocationRow) -> Self {
        let status = LocationStatus::from_stored(&row.location_api_status);
        LocationRecord {
            company_id: row.company_id,
            latitude: row.location_lat,
            longitude: row.location_lon,
            formatted_address: row.location_address,
            status,
            origin_status: status,
            updated_at: row.location_updated_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ScoredRow {
    incentive_id: String,
    title: Option<String>,
    scored: Json<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StoredCompanies {
    #[serde(default)]
    companies: Vec<RankedCompany>,
}

/// Store over the `incentives` and `companies` tables.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Adds the matcher's columns when missing. Safe to run repeatedly.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA_MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!(statements = SCHEMA_MIGRATIONS.len(), "Schema ensured");
        Ok(())
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn fetch_companies(&self, ids: &[CompanyId]) -> StoreResult<Vec<CompanyRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CompanyRow>(
            "SELECT company_id::bigint AS company_id, company_name, cae_primary_label, \
                    trade_description_native, website \
             FROM companies WHERE company_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        debug!(requested = ids.len(), found = rows.len(), "Fetched companies");
        Ok(rows.into_iter().map(CompanyRecord::from).collect())
    }
}

#[async_trait]
impl LocationStore for PgStore {
    async fn load_location(&self, company_id: CompanyId) -> StoreResult<Option<LocationRecord>> {
        let row = sqlx::query_as::<_, LocationRow>(
            "SELECT company_id::bigint AS company_id, \
                    location_lat::float8 AS location_lat, \
                    location_lon::float8 AS location_lon, \
                    location_address, location_api_status, location_updated_at \
             FROM companies \
             WHERE company_id = $1 AND location_api_status IS NOT NULL",
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LocationRecord::from))
    }

    async fn save_location(&self, record: &LocationRecord) -> StoreResult<()> {
        sqlx::query(
            "UPDATE companies \
             SET location_lat = $1, location_lon = $2, location_address = $3, \
                 location_api_status = $4, location_updated_at = $5 \
             WHERE company_id = $6",
        )
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.formatted_address)
        .bind(record.origin_status.as_str())
        .bind(record.updated_at)
        .bind(record.company_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl IncentiveStore for PgStore {
    async fn fetch_incentive(&self, incentive_id: &str) -> StoreResult<Option<Incentive>> {
        let row = sqlx::query_as::<_, IncentiveRow>(
            "SELECT incentive_id::text AS incentive_id, title, sector, geo_requirement, \
                    eligible_actions, ai_description \
             FROM incentives WHERE incentive_id::text = $1",
        )
        .bind(incentive_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Incentive::from))
    }

    async fn pending_incentives(&self) -> StoreResult<Vec<Incentive>> {
        let query = format!(
            "SELECT incentive_id::text AS incentive_id, title, sector, geo_requirement, \
                    eligible_actions, ai_description \
             FROM incentives \
             WHERE {PROCESSABLE_FILTER} \
               AND (top_5_companies_scored IS NULL \
                    OR jsonb_array_length(COALESCE(top_5_companies_scored::jsonb -> 'companies', '[]'::jsonb)) = 0) \
             ORDER BY incentive_id"
        );

        let rows = sqlx::query_as::<_, IncentiveRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Incentive::from).collect())
    }

    async fn progress(&self) -> StoreResult<ProgressReport> {
        let query = format!(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE {PROCESSABLE_FILTER}) AS processable, \
                    COUNT(*) FILTER (WHERE top_5_companies IS NOT NULL) AS processed, \
                    COUNT(*) FILTER (WHERE top_5_companies IS NOT NULL \
                        AND (top_5_companies::jsonb ->> 'processed_at')::timestamptz \
                            > NOW() - INTERVAL '24 hours') AS recent, \
                    AVG((top_5_companies::jsonb ->> 'processing_time')::float8) AS average_secs \
             FROM incentives"
        );

        let (total, processable, processed, recent, average_secs): (
            i64,
            i64,
            i64,
            i64,
            Option<f64>,
        ) = sqlx::query_as(&query).fetch_one(&self.pool).await?;

        Ok(ProgressReport {
            total: total.max(0) as u64,
            processable: processable.max(0) as u64,
            processed: processed.max(0) as u64,
            processed_last_24h: recent.max(0) as u64,
            average_processing_secs: average_secs,
        })
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn save_match(&self, result: &MatchResult) -> StoreResult<()> {
        let semantic = Json(result.semantic_document());
        let scored = Json(result.scored_document());

        let outcome = sqlx::query(
            "UPDATE incentives \
             SET top_5_companies = $1, top_5_companies_scored = $2 \
             WHERE incentive_id::text = $3",
        )
        .bind(semantic)
        .bind(scored)
        .bind(&result.incentive_id)
        .execute(&self.pool)
        .await?;

        if outcome.rows_affected() == 0 {
            return Err(StoreError::IncentiveNotFound {
                incentive_id: result.incentive_id.clone(),
            });
        }

        debug!(
            incentive_id = %result.incentive_id,
            companies = result.semantic_ranking.len(),
            "Match result saved"
        );
        Ok(())
    }

    async fn scored_rankings(&self) -> StoreResult<Vec<ScoredRanking>> {
        let rows = sqlx::query_as::<_, ScoredRow>(
            "SELECT incentive_id::text AS incentive_id, title, \
                    top_5_companies_scored::jsonb AS scored \
             FROM incentives \
             WHERE top_5_companies_scored IS NOT NULL \
             ORDER BY incentive_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut rankings = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<StoredCompanies>(row.scored.0) {
                Ok(stored) => rankings.push(ScoredRanking {
                    incentive_id: row.incentive_id,
                    title: row.title.unwrap_or_default(),
                    companies: stored.companies,
                }),
                Err(e) => warn!(
                    incentive_id = %row.incentive_id,
                    error = %e,
                    "Skipping unreadable scored ranking"
                ),
            }
        }

        Ok(rankings)
    }

    async fn replace_reverse_index(&self, index: &ReverseIndex) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE companies SET eligible_incentives = NULL \
             WHERE eligible_incentives IS NOT NULL",
        )
        .execute(&mut *tx)
        .await?;

        for (company_id, entries) in index {
            sqlx::query("UPDATE companies SET eligible_incentives = $1 WHERE company_id = $2")
                .bind(Json(entries))
                .bind(company_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
