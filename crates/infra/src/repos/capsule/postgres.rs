use super::ICapsuleRepo;
use crate::repos::shared::query_structs::{DueCapsulesQuery, ReminderCandidatesQuery};
use capsule_scheduler_domain::{
    Capsule, CapsuleStatus, NotificationsSent, ReminderTimeframe, ID,
};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresCapsuleRepo {
    pool: PgPool,
}

impl PostgresCapsuleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CapsuleRaw {
    capsule_uid: Uuid,
    unique_link: String,
    content_type: String,
    delivery_ts: i64,
    status: String,
    notifications_sent: Vec<String>,
    creator_email: Option<String>,
    creator_phone: Option<String>,
    recipient_emails: Vec<String>,
    recipient_phones: Vec<String>,
    has_password: bool,
    delivered_ts: Option<i64>,
    failure_reason: Option<String>,
    created_ts: i64,
}

impl TryFrom<CapsuleRaw> for Capsule {
    type Error = anyhow::Error;

    fn try_from(e: CapsuleRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.capsule_uid.into(),
            unique_link: e.unique_link,
            content_type: e.content_type.parse()?,
            delivery_ts: e.delivery_ts,
            status: e.status.parse()?,
            notifications_sent: NotificationsSent::from_strings(&e.notifications_sent)?,
            creator_email: e.creator_email,
            creator_phone: e.creator_phone,
            recipient_emails: e.recipient_emails,
            recipient_phones: e.recipient_phones,
            has_password: e.has_password,
            delivered_ts: e.delivered_ts,
            failure_reason: e.failure_reason,
            created_ts: e.created_ts,
        })
    }
}

/// Malformed rows are logged and skipped so that they never block the rest of a batch
fn to_capsules(capsules_raw: Vec<CapsuleRaw>) -> Vec<Capsule> {
    capsules_raw
        .into_iter()
        .filter_map(|raw| {
            let capsule_id = raw.capsule_uid;
            Capsule::try_from(raw)
                .map_err(|e| error!("Stored capsule: {} is malformed: {:?}", capsule_id, e))
                .ok()
        })
        .collect()
}

#[async_trait::async_trait]
impl ICapsuleRepo for PostgresCapsuleRepo {
    async fn insert(&self, capsule: &Capsule) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO capsules
            (capsule_uid, unique_link, content_type, delivery_ts, status, notifications_sent,
            creator_email, creator_phone, recipient_emails, recipient_phones, has_password,
            delivered_ts, failure_reason, created_ts)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(capsule.id.inner_ref())
        .bind(&capsule.unique_link)
        .bind(capsule.content_type.as_str())
        .bind(capsule.delivery_ts)
        .bind(capsule.status.as_str())
        .bind(capsule.notifications_sent.to_strings())
        .bind(&capsule.creator_email)
        .bind(&capsule.creator_phone)
        .bind(&capsule.recipient_emails)
        .bind(&capsule.recipient_phones)
        .bind(capsule.has_password)
        .bind(capsule.delivered_ts)
        .bind(&capsule.failure_reason)
        .bind(capsule.created_ts)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert capsule: {:?}. DB returned error: {:?}",
                capsule, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, capsule_id: &ID) -> Option<Capsule> {
        let res: Option<CapsuleRaw> = sqlx::query_as(
            r#"
            SELECT * FROM capsules
            WHERE capsule_uid = $1
            "#,
        )
        .bind(capsule_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find capsule with id: {:?} failed. DB returned error: {:?}",
                capsule_id, e
            );
            e
        })
        .ok()?;

        res.and_then(|capsule| {
            Capsule::try_from(capsule)
                .map_err(|e| error!("Stored capsule: {} is malformed: {:?}", capsule_id, e))
                .ok()
        })
    }

    async fn find_due(&self, query: DueCapsulesQuery) -> anyhow::Result<Vec<Capsule>> {
        let capsules_raw: Vec<CapsuleRaw> = sqlx::query_as(
            r#"
            SELECT * FROM capsules
            WHERE status = $1 AND delivery_ts <= $2
            ORDER BY delivery_ts
            LIMIT $3
            "#,
        )
        .bind(query.status.as_str())
        .bind(query.due_before)
        .bind(query.limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find due capsules with query: {:?} failed. DB returned error: {:?}",
                query, e
            );
            e
        })?;

        Ok(to_capsules(capsules_raw))
    }

    async fn find_reminder_candidates(
        &self,
        query: ReminderCandidatesQuery,
    ) -> anyhow::Result<Vec<Capsule>> {
        let previous = query.timeframe.previous().map(|t| t.as_str());
        let capsules_raw: Vec<CapsuleRaw> = sqlx::query_as(
            r#"
            SELECT * FROM capsules
            WHERE status = $1
            AND delivery_ts > $2 AND delivery_ts <= $3
            AND NOT ($4 = ANY(notifications_sent))
            AND ($5::TEXT IS NULL OR $5 = ANY(notifications_sent))
            ORDER BY delivery_ts
            LIMIT $6
            "#,
        )
        .bind(CapsuleStatus::Scheduled.as_str())
        .bind(query.now)
        .bind(query.window_end())
        .bind(query.timeframe.as_str())
        .bind(previous)
        .bind(query.limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find reminder candidates with query: {:?} failed. DB returned error: {:?}",
                query, e
            );
            e
        })?;

        Ok(to_capsules(capsules_raw))
    }

    async fn mark_delivered(&self, capsule_id: &ID, delivered_ts: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE capsules
            SET status = $2,
            delivered_ts = $3,
            failure_reason = NULL
            WHERE capsule_uid = $1
            "#,
        )
        .bind(capsule_id.inner_ref())
        .bind(CapsuleStatus::Delivered.as_str())
        .bind(delivered_ts)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to mark capsule: {} as delivered. DB returned error: {:?}",
                capsule_id, e
            );
            e
        })?;
        Ok(())
    }

    async fn mark_failed(&self, capsule_id: &ID, reason: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE capsules
            SET status = $2,
            failure_reason = $3
            WHERE capsule_uid = $1
            "#,
        )
        .bind(capsule_id.inner_ref())
        .bind(CapsuleStatus::Failed.as_str())
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to mark capsule: {} as failed. DB returned error: {:?}",
                capsule_id, e
            );
            e
        })?;
        Ok(())
    }

    async fn add_notification_sent(
        &self,
        capsule_id: &ID,
        timeframe: ReminderTimeframe,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE capsules
            SET notifications_sent = array_append(notifications_sent, $2)
            WHERE capsule_uid = $1 AND NOT ($2 = ANY(notifications_sent))
            "#,
        )
        .bind(capsule_id.inner_ref())
        .bind(timeframe.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to add reminder marker: {} to capsule: {}. DB returned error: {:?}",
                timeframe, capsule_id, e
            );
            e
        })?;
        Ok(())
    }

    async fn count_by_status(&self, status: CapsuleStatus) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM capsules
            WHERE status = $1
            "#,
        )
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Count capsules with status: {} failed. DB returned error: {:?}",
                status, e
            );
            e
        })?;
        Ok(count)
    }

    async fn count_overdue(&self, now: i64) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM capsules
            WHERE status = $1 AND delivery_ts < $2
            "#,
        )
        .bind(CapsuleStatus::Scheduled.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Count overdue capsules failed. DB returned error: {:?}", e);
            e
        })?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_capsule(content_type: &str, notifications_sent: &[&str]) -> CapsuleRaw {
        CapsuleRaw {
            capsule_uid: Uuid::new_v4(),
            unique_link: Uuid::new_v4().to_string(),
            content_type: content_type.into(),
            delivery_ts: 1000,
            status: "scheduled".into(),
            notifications_sent: notifications_sent.iter().map(|m| m.to_string()).collect(),
            creator_email: Some("creator@example.com".into()),
            creator_phone: None,
            recipient_emails: vec![],
            recipient_phones: vec![],
            has_password: false,
            delivered_ts: None,
            failure_reason: None,
            created_ts: 0,
        }
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let valid = raw_capsule("text", &["1hour"]);
        let valid_id = valid.capsule_uid;
        let rows = vec![
            raw_capsule("hologram", &[]),
            raw_capsule("photo", &["5min"]),
            valid,
        ];

        let capsules = to_capsules(rows);
        assert_eq!(capsules.len(), 1);
        assert_eq!(capsules[0].id, ID::from(valid_id));
        assert!(capsules[0]
            .notifications_sent
            .contains(ReminderTimeframe::OneHour));
    }
}
