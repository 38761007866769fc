use chrono::{DateTime, Utc};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::system::tasks::aggregate::{SyncTask, SyncTaskId};
use contracts::system::tasks::progress::TaskRunStatus;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sys_sync_task")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: Option<String>,
    pub task_type: String,
    pub user_id: String,
    pub connection_id: String,
    pub priority: i32,
    pub status: String,
    pub schedule_cron: Option<String>,
    pub config_json: Option<String>,
    pub source: String,
    pub parent_task_id: Option<String>,
    pub iteration_count: i32,
    pub oldest_order_date: Option<chrono::DateTime<chrono::Utc>>,
    pub scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
    pub log_file: Option<String>,
    pub result_json: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SyncTask {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: true,
            version: 1,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        SyncTask {
            base: BaseAggregate::with_metadata(
                SyncTaskId(uuid),
                m.code,
                m.description.unwrap_or_default(),
                None,
                metadata,
            ),
            task_type: m.task_type,
            user_id: m.user_id,
            connection_id: m.connection_id,
            priority: m.priority,
            status: TaskRunStatus::from_code(&m.status).unwrap_or(TaskRunStatus::Queued),
            schedule_cron: m.schedule_cron,
            config_json: m.config_json.unwrap_or_default(),
            source: m.source,
            parent_task_id: m.parent_task_id,
            iteration_count: m.iteration_count,
            oldest_order_date: m.oldest_order_date,
            scheduled_at: m.scheduled_at,
            started_at: m.started_at,
            finished_at: m.finished_at,
            log_file: m.log_file,
            result_json: m.result_json,
        }
    }
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<SyncTask>, DbErr> {
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Code)
        .all(db)
        .await?;
    Ok(models.into_iter().map(SyncTask::from).collect())
}

/// Задания, готовые к выполнению: queued и scheduled_at уже наступил
/// (или не задан). Сортировка: приоритет, затем время постановки.
pub async fn list_due<C: ConnectionTrait>(
    db: &C,
    now: DateTime<Utc>,
) -> Result<Vec<SyncTask>, DbErr> {
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.eq(TaskRunStatus::Queued.as_str()))
        .filter(
            Condition::any()
                .add(Column::ScheduledAt.is_null())
                .add(Column::ScheduledAt.lte(now)),
        )
        .order_by_desc(Column::Priority)
        .order_by_asc(Column::ScheduledAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(SyncTask::from).collect())
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<SyncTask>, DbErr> {
    let model = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(SyncTask::from))
}

pub async fn save<C: ConnectionTrait>(db: &C, task: &SyncTask) -> Result<(), DbErr> {
    let id_str = task.base.id.0.to_string();

    let existing = Entity::find_by_id(&id_str).one(db).await?;

    let mut active: ActiveModel = match existing {
        Some(ref m) => m.clone().into(),
        None => ActiveModel {
            id: Set(id_str),
            created_at: Set(Some(task.base.metadata.created_at)),
            ..Default::default()
        },
    };

    active.code = Set(task.base.code.clone());
    active.description = Set(Some(task.base.description.clone()));
    active.task_type = Set(task.task_type.clone());
    active.user_id = Set(task.user_id.clone());
    active.connection_id = Set(task.connection_id.clone());
    active.priority = Set(task.priority);
    active.status = Set(task.status.as_str().to_string());
    active.schedule_cron = Set(task.schedule_cron.clone());
    active.config_json = Set(Some(task.config_json.clone()));
    active.source = Set(task.source.clone());
    active.parent_task_id = Set(task.parent_task_id.clone());
    active.iteration_count = Set(task.iteration_count);
    active.oldest_order_date = Set(task.oldest_order_date);
    active.scheduled_at = Set(task.scheduled_at);
    active.started_at = Set(task.started_at);
    active.finished_at = Set(task.finished_at);
    active.log_file = Set(task.log_file.clone());
    active.result_json = Set(task.result_json.clone());
    active.is_deleted = Set(task.base.metadata.is_deleted);
    active.updated_at = Set(Some(Utc::now()));

    if existing.is_some() {
        active.update(db).await?;
    } else {
        active.insert(db).await?;
    }

    Ok(())
}

