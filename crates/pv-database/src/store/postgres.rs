//! PostgreSQL report store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use pv_core::error::{AppError, ErrorKind};
use pv_core::result::AppResult;
use pv_core::types::id::ReportId;
use pv_core::types::pagination::{PageRequest, PageResponse};
use pv_entity::report::{
    FormData, NewReportVersion, Report, ReportPayload, ReportStats, ReportSummary, ReportVersion,
    VersionCreator,
};

use super::{
    DispatchOutcome, DispatchRecord, ReportFilter, ReportStore, SaveOutcome,
    with_inspection_document,
};

const SUMMARY_COLUMNS: &str = "id, created_at, updated_at, site_name, driver_emails, \
     company_email, responsible, supplier, equipment_type, reception_date, return_date, \
     status, inspection_date, inspection_document, last_sent_at, current_version";

const FILTER_CLAUSE: &str = "($1::report_status IS NULL OR status = $1) \
     AND ($2::text IS NULL OR site_name ILIKE $2 ESCAPE '\\' \
          OR equipment_type ILIKE $2 ESCAPE '\\' OR supplier ILIKE $2 ESCAPE '\\' \
          OR responsible ILIKE $2 ESCAPE '\\')";

/// Report store backed by the `reports` and `report_versions` tables.
#[derive(Debug, Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let unique = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
        if unique {
            AppError::with_source(ErrorKind::Conflict, format!("{context}: duplicate entry"), e)
        } else {
            AppError::with_source(ErrorKind::Database, context, e)
        }
    }
}

async fn lock_report(conn: &mut PgConnection, id: ReportId) -> AppResult<Option<Report>> {
    sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to lock report"))
}

/// Insert or overwrite the full row. `created_at` is never changed.
async fn write_report(conn: &mut PgConnection, report: &Report) -> AppResult<()> {
    let fields = &report.indexed;
    sqlx::query(
        "INSERT INTO reports (id, created_at, updated_at, site_name, driver_emails, \
             company_email, responsible, supplier, equipment_type, reception_date, return_date, \
             status, inspection_date, inspection_document, last_sent_at, current_version, payload) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
         ON CONFLICT (id) DO UPDATE SET \
             updated_at = EXCLUDED.updated_at, site_name = EXCLUDED.site_name, \
             driver_emails = EXCLUDED.driver_emails, company_email = EXCLUDED.company_email, \
             responsible = EXCLUDED.responsible, supplier = EXCLUDED.supplier, \
             equipment_type = EXCLUDED.equipment_type, reception_date = EXCLUDED.reception_date, \
             return_date = EXCLUDED.return_date, status = EXCLUDED.status, \
             inspection_date = EXCLUDED.inspection_date, \
             inspection_document = EXCLUDED.inspection_document, \
             last_sent_at = EXCLUDED.last_sent_at, current_version = EXCLUDED.current_version, \
             payload = EXCLUDED.payload",
    )
    .bind(report.id)
    .bind(report.created_at)
    .bind(report.updated_at)
    .bind(&fields.site_name)
    .bind(&fields.driver_emails)
    .bind(&fields.company_email)
    .bind(&fields.responsible)
    .bind(&fields.supplier)
    .bind(&fields.equipment_type)
    .bind(&fields.reception_date)
    .bind(&fields.return_date)
    .bind(fields.status)
    .bind(&fields.inspection_date)
    .bind(&fields.inspection_document)
    .bind(report.last_sent_at)
    .bind(report.current_version)
    .bind(&report.payload)
    .execute(&mut *conn)
    .await
    .map_err(db_error("Failed to write report"))?;
    Ok(())
}

async fn insert_version(
    conn: &mut PgConnection,
    snapshot: &NewReportVersion,
) -> AppResult<ReportVersion> {
    sqlx::query_as::<_, ReportVersion>(
        "INSERT INTO report_versions \
             (report_id, version_number, created_at, payload, created_by, comment) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(snapshot.report_id)
    .bind(snapshot.version_number)
    .bind(snapshot.created_at)
    .bind(sqlx::types::Json(&snapshot.payload))
    .bind(snapshot.created_by)
    .bind(&snapshot.comment)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error("Failed to archive report version"))
}

#[async_trait]
impl ReportStore for PgReportStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(db_error("Health check failed"))
    }

    async fn find_by_id(&self, id: ReportId) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find report"))
    }

    async fn list(
        &self,
        filter: &ReportFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ReportSummary>> {
        let pattern = filter.like_pattern();

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM reports WHERE {FILTER_CLAUSE}"))
                .bind(filter.status)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count reports"))?;

        let items = sqlx::query_as::<_, ReportSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM reports WHERE {FILTER_CLAUSE} \
             ORDER BY updated_at DESC, id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.status)
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list reports"))?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn upsert(
        &self,
        id: ReportId,
        form: FormData,
        now: DateTime<Utc>,
    ) -> AppResult<SaveOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let (payload, created) = match lock_report(&mut tx, id).await? {
            Some(existing) => (existing.payload.revise(form, now), false),
            None => (ReportPayload::new(id, form, now), true),
        };
        let report = Report::from_payload(payload);
        write_report(&mut tx, &report).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit report save"))?;

        debug!(report_id = %id, created, "Stored report");
        Ok(SaveOutcome { report, created })
    }

    async fn record_dispatch(
        &self,
        id: ReportId,
        form: FormData,
        dispatch: &DispatchRecord,
    ) -> AppResult<DispatchOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let (payload, archived) = match lock_report(&mut tx, id).await? {
            Some(current) => {
                let snapshot = NewReportVersion::archive_of(
                    &current,
                    VersionCreator::EmailSend,
                    Some(dispatch.archive_comment(&current)),
                    dispatch.sent_at,
                );
                let archived = insert_version(&mut tx, &snapshot).await?;
                let mut payload = current.payload.revise(form, dispatch.sent_at);
                payload.mark_sent(
                    current.current_version + 1,
                    dispatch.sent_at,
                    &dispatch.recipients,
                );
                (payload, Some(archived))
            }
            None => {
                let mut payload = ReportPayload::new(id, form, dispatch.sent_at);
                payload.mark_sent(1, dispatch.sent_at, &dispatch.recipients);
                (payload, None)
            }
        };

        let report = Report::from_payload(payload);
        write_report(&mut tx, &report).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit dispatch"))?;

        info!(
            report_id = %id,
            version = report.current_version,
            archived = archived.is_some(),
            "Recorded report dispatch"
        );
        Ok(DispatchOutcome { report, archived })
    }

    async fn delete(&self, id: ReportId) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>("DELETE FROM reports WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to delete report"))
    }

    async fn find_versions(&self, id: ReportId) -> AppResult<Vec<ReportVersion>> {
        sqlx::query_as::<_, ReportVersion>(
            "SELECT * FROM report_versions WHERE report_id = $1 ORDER BY version_number DESC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to find report versions"))
    }

    async fn find_version(&self, id: ReportId, number: i32) -> AppResult<Option<ReportVersion>> {
        sqlx::query_as::<_, ReportVersion>(
            "SELECT * FROM report_versions WHERE report_id = $1 AND version_number = $2",
        )
        .bind(id)
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find report version"))
    }

    async fn set_inspection_document(
        &self,
        id: ReportId,
        key: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Report>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let Some(current) = lock_report(&mut tx, id).await? else {
            return Ok(None);
        };
        let report = with_inspection_document(&current, key, now);
        write_report(&mut tx, &report).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit inspection document"))?;
        Ok(Some(report))
    }

    async fn stats(&self) -> AppResult<ReportStats> {
        sqlx::query_as::<_, ReportStats>(
            "SELECT \
                 COUNT(*) AS total, \
                 COUNT(*) FILTER (WHERE status = 'complete') AS complete, \
                 COUNT(*) FILTER (WHERE status = 'reception_only') AS reception_only, \
                 COUNT(*) FILTER (WHERE status = 'retour_only') AS retour_only, \
                 COUNT(*) FILTER (WHERE status = 'empty') AS empty, \
                 COUNT(*) FILTER (WHERE inspection_date IS NOT NULL) AS with_inspection, \
                 COUNT(*) FILTER (WHERE inspection_date IS NULL) AS without_inspection, \
                 COUNT(*) FILTER (WHERE current_version > 1) AS multi_version, \
                 (SELECT COUNT(*) FROM report_versions) AS archived_versions \
             FROM reports",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to compute report statistics"))
    }

    async fn inspection_dates(&self) -> AppResult<Vec<Option<String>>> {
        sqlx::query_scalar::<_, Option<String>>("SELECT inspection_date FROM reports")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load inspection dates"))
    }
}
