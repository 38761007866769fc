use contracts::domain::a002_sales_order::aggregate::SalesOrder;
use contracts::domain::common::AggregateId;
use sea_orm::{ConnectionTrait, DbErr};

use crate::domain::a002_sales_order::repository;

/// Найденный дубликат по натуральному ключу
#[derive(Debug, Clone)]
pub struct DuplicateMatch {
    /// ID существующей записи
    pub existing_id: String,
    /// Совпадение прошло по основному идентификатору (external_order_id
    /// кандидата против external_order_id записи). Совпадение только по
    /// второстепенному идентификатору — повод для warn: возможно ложное
    /// склеивание двух разных заказов.
    pub matched_via_primary: bool,
}

/// Шлюз дедупликации: решает по персистентному состоянию, новый это заказ
/// или уже известный. Выполняется на том же соединении (транзакции), что и
/// последующая вставка — иначе между проверкой и вставкой внутри одной
/// пачки возможна гонка.
pub async fn check<C: ConnectionTrait>(
    db: &C,
    candidate: &SalesOrder,
) -> Result<Option<DuplicateMatch>, DbErr> {
    let existing = repository::find_by_natural_key(
        db,
        candidate.platform_type,
        &candidate.user_id,
        candidate.external_order_id.as_deref(),
        candidate.order_number.as_deref(),
    )
    .await?;

    Ok(existing.map(|existing| {
        let matched_via_primary = match (&existing.external_order_id, &candidate.external_order_id)
        {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        DuplicateMatch {
            existing_id: existing.base.id.as_string(),
            matched_via_primary,
        }
    }))
}
