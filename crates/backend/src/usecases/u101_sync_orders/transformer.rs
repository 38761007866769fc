use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::domain::a001_platform_connection::aggregate::PlatformConnection;
use contracts::domain::a002_sales_order::aggregate::{
    OrderAddress, OrderCustomer, OrderItem, OrderSourceMeta, OrderStatus, SalesOrder,
};
use contracts::domain::common::AggregateId;
use contracts::enums::PlatformType;
use contracts::system::tasks::aggregate::SyncTask;
use serde_json::Value;

// ============================================================================
// Таблицы соответствия статусов
// ============================================================================

const TRENDYOL_STATUS_MAP: &[(&str, OrderStatus)] = &[
    ("Created", OrderStatus::New),
    ("Picking", OrderStatus::Processing),
    ("Invoiced", OrderStatus::Processing),
    ("Repack", OrderStatus::Processing),
    ("UnPacked", OrderStatus::Processing),
    ("Shipped", OrderStatus::Shipped),
    ("AtCollectionPoint", OrderStatus::Shipped),
    ("Delivered", OrderStatus::Delivered),
    ("Cancelled", OrderStatus::Cancelled),
    ("UnSupplied", OrderStatus::Cancelled),
    ("UnDelivered", OrderStatus::Returned),
    ("Returned", OrderStatus::Returned),
];

const HEPSIBURADA_STATUS_MAP: &[(&str, OrderStatus)] = &[
    ("Open", OrderStatus::New),
    ("PaymentCompleted", OrderStatus::New),
    ("Packaged", OrderStatus::Processing),
    ("ReadyToShip", OrderStatus::Processing),
    ("InTransit", OrderStatus::Shipped),
    ("Shipped", OrderStatus::Shipped),
    ("Delivered", OrderStatus::Delivered),
    ("CancelledByCustomer", OrderStatus::Cancelled),
    ("CancelledByMerchant", OrderStatus::Cancelled),
    ("CancelledBySap", OrderStatus::Cancelled),
    ("ClaimCreated", OrderStatus::Returned),
    ("Returned", OrderStatus::Returned),
];

const N11_STATUS_MAP: &[(&str, OrderStatus)] = &[
    ("New", OrderStatus::New),
    ("Approved", OrderStatus::Processing),
    ("Picking", OrderStatus::Processing),
    ("Invoiced", OrderStatus::Processing),
    ("Shipped", OrderStatus::Shipped),
    ("Delivered", OrderStatus::Delivered),
    ("Completed", OrderStatus::Delivered),
    ("Rejected", OrderStatus::Cancelled),
    ("Cancelled", OrderStatus::Cancelled),
    ("ClaimOpened", OrderStatus::Returned),
    ("Returned", OrderStatus::Returned),
];

/// Перевести строку статуса площадки в канонический статус.
/// Неизвестные строки дают `Unknown`, а не ошибку.
pub fn map_status(platform: PlatformType, raw_status: &str) -> OrderStatus {
    let table = match platform {
        PlatformType::Trendyol => TRENDYOL_STATUS_MAP,
        PlatformType::Hepsiburada => HEPSIBURADA_STATUS_MAP,
        PlatformType::N11 => N11_STATUS_MAP,
    };
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(raw_status))
        .map(|(_, status)| *status)
        .unwrap_or(OrderStatus::Unknown)
}

// ============================================================================
// Извлечение значений из сырого JSON
// ============================================================================

fn value_at<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = raw;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_at(raw: &Value, path: &str) -> Option<String> {
    value_at(raw, path).and_then(value_to_string)
}

/// Первое непустое строковое значение по цепочке путей
fn first_str(raw: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| str_at(raw, path))
}

fn f64_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        // Денежные поля некоторых API приходят объектом {"amount": ...}
        Value::Object(_) => value.get("amount").and_then(Value::as_f64),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn first_f64(raw: &Value, paths: &[&str]) -> Option<f64> {
    paths.iter().find_map(|path| value_at(raw, path).and_then(f64_of))
}

fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        // Epoch millis (Trendyol)
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
            })
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
            }),
        _ => None,
    }
}

fn first_date(raw: &Value, paths: &[&str]) -> Option<DateTime<Utc>> {
    paths
        .iter()
        .find_map(|path| value_at(raw, path).and_then(parse_date_value))
}

// ============================================================================
// Составные блоки
// ============================================================================

/// Имя покупателя: четыре возможных источника, по убыванию приоритета
fn extract_customer_name(raw: &Value) -> String {
    if let Some(name) = first_str(raw, &["customer.fullName", "customerName"]) {
        return name;
    }
    let first = first_str(raw, &["customerFirstName", "customer.firstName"]);
    let last = first_str(raw, &["customerLastName", "customer.lastName"]);
    if first.is_some() || last.is_some() {
        return format!(
            "{} {}",
            first.unwrap_or_default(),
            last.unwrap_or_default()
        )
        .trim()
        .to_string();
    }
    if let Some(name) = str_at(raw, "shipmentAddress.fullName") {
        return name;
    }
    str_at(raw, "invoiceAddress.fullName").unwrap_or_default()
}

fn extract_address(raw: &Value, paths: &[&str]) -> Option<OrderAddress> {
    let node = paths.iter().find_map(|path| value_at(raw, path))?;
    if !node.is_object() {
        return None;
    }
    Some(OrderAddress {
        full_name: first_str(node, &["fullName", "name"]),
        address_line: first_str(node, &["address1", "address", "fullAddress"]),
        city: first_str(node, &["city", "cityName"]),
        district: first_str(node, &["district", "town"]),
        postal_code: first_str(node, &["postalCode", "zipCode"]),
        country: first_str(node, &["countryCode", "country"]),
    })
}

fn extract_items(raw: &Value) -> Vec<OrderItem> {
    let lines = ["lines", "items", "orderItems", "itemList"]
        .iter()
        .find_map(|path| value_at(raw, path).and_then(Value::as_array));

    let Some(lines) = lines else {
        return Vec::new();
    };

    lines
        .iter()
        .map(|line| OrderItem {
            product_name: first_str(line, &["productName", "name", "title"]).unwrap_or_default(),
            sku: first_str(line, &["merchantSku", "sku", "sellerSku", "productCode"]),
            barcode: first_str(line, &["barcode", "gtin"]),
            quantity: first_f64(line, &["quantity", "amount", "qty"]).unwrap_or(1.0),
            unit_price: first_f64(line, &["price", "unitPrice", "totalPrice"]).unwrap_or(0.0),
        })
        .collect()
}

// ============================================================================
// Трансформация
// ============================================================================

/// Чистое отображение сырого заказа площадки в канонический заказ.
///
/// Идентификаторы и поля покупателя извлекаются по цепочкам фолбэков —
/// площадки заполняют их неконсистентно. Исходный payload целиком
/// сохраняется отдельно (source_meta.raw_ref проставляет исполнитель).
pub fn transform(
    raw: &Value,
    connection: &PlatformConnection,
    task: &SyncTask,
) -> Result<SalesOrder> {
    let platform = connection.platform_type;

    let external_order_id = first_str(raw, &["id", "orderId", "shipmentPackageId", "packageNumber"]);
    let order_number = first_str(raw, &["orderNumber", "orderCode", "number"]);

    let raw_status = first_str(raw, &["status", "orderStatus", "shipmentPackageStatus"]);
    let order_status = raw_status
        .as_deref()
        .map(|s| map_status(platform, s))
        .unwrap_or(OrderStatus::Unknown);

    let order_date = first_date(raw, &["orderDate", "createDate", "createdDate", "orderDateTime"])
        .unwrap_or_else(Utc::now);

    let total_amount = first_f64(raw, &["totalPrice", "grossAmount", "totalAmount"]).unwrap_or(0.0);
    let currency = first_str(raw, &["currencyCode", "currency"]).unwrap_or_else(|| "TRY".to_string());

    let customer = OrderCustomer {
        name: extract_customer_name(raw),
        email: first_str(raw, &["customerEmail", "customer.email", "email"]),
        phone: first_str(raw, &["customer.phone", "shipmentAddress.phone", "phone", "gsm"]),
    };

    let shipping_address =
        extract_address(raw, &["shipmentAddress", "shippingAddress", "deliveryAddress"]);
    let billing_address = extract_address(raw, &["invoiceAddress", "billingAddress"]);

    let items = extract_items(raw);

    let identifier = external_order_id
        .clone()
        .or_else(|| order_number.clone())
        .unwrap_or_default();

    let order = SalesOrder::new_for_insert(
        format!("ORD-{}", identifier),
        format!(
            "{} order {} - {}",
            platform.display_name(),
            identifier,
            order_date.format("%Y-%m-%d")
        ),
        external_order_id,
        order_number,
        platform,
        connection.user_id.clone(),
        order_status,
        order_date,
        total_amount,
        currency,
        customer,
        shipping_address,
        billing_address,
        items,
        OrderSourceMeta {
            raw_ref: String::new(),
            fetched_at: Some(Utc::now()),
            connection_id: connection.base.id.as_string(),
            task_id: Some(task.base.id.as_string()),
        },
    );

    order
        .validate()
        .map_err(|e| anyhow::anyhow!("Order is not identifiable: {}", e))?;

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_connection(platform: PlatformType) -> PlatformConnection {
        PlatformConnection::new_for_insert(
            "CON-1".to_string(),
            "Test connection".to_string(),
            platform,
            "user-1".to_string(),
            "key".to_string(),
            None,
        )
    }

    fn test_task() -> SyncTask {
        SyncTask::new_for_insert(
            "SYNC-1".to_string(),
            "Test task".to_string(),
            "order_fetching".to_string(),
            "user-1".to_string(),
            "conn-1".to_string(),
            0,
            "{}".to_string(),
            None,
        )
    }

    #[test]
    fn test_trendyol_order_maps_fully() {
        let raw = json!({
            "id": 11650604,
            "orderNumber": "80230",
            "status": "Shipped",
            "orderDate": 1710892800000_i64,
            "totalPrice": 399.90,
            "currencyCode": "TRY",
            "customerFirstName": "Ayşe",
            "customerLastName": "Yılmaz",
            "customerEmail": "ayse@example.com",
            "shipmentAddress": {
                "fullName": "Ayşe Yılmaz",
                "address1": "Atatürk Cad. 15",
                "city": "İstanbul",
                "district": "Kadıköy",
                "postalCode": "34710",
                "countryCode": "TR"
            },
            "lines": [
                {"productName": "Kulaklık", "merchantSku": "SKU-1", "quantity": 2, "price": 199.95}
            ]
        });

        let order = transform(&raw, &test_connection(PlatformType::Trendyol), &test_task()).unwrap();
        assert_eq!(order.external_order_id.as_deref(), Some("11650604"));
        assert_eq!(order.order_number.as_deref(), Some("80230"));
        assert_eq!(order.order_status, OrderStatus::Shipped);
        assert_eq!(order.customer.name, "Ayşe Yılmaz");
        assert_eq!(order.total_amount, 399.90);
        assert_eq!(order.currency, "TRY");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2.0);
        assert_eq!(
            order.order_date,
            DateTime::<Utc>::from_timestamp_millis(1710892800000).unwrap()
        );
        assert_eq!(
            order.shipping_address.as_ref().unwrap().city.as_deref(),
            Some("İstanbul")
        );
    }

    #[test]
    fn test_unmapped_status_resolves_to_unknown() {
        assert_eq!(
            map_status(PlatformType::Trendyol, "SomethingNew"),
            OrderStatus::Unknown
        );
        assert_eq!(
            map_status(PlatformType::N11, "shipped"),
            OrderStatus::Shipped
        );
    }

    #[test]
    fn test_customer_name_falls_back_to_shipment_address() {
        let raw = json!({
            "orderNumber": "N-1",
            "shipmentAddress": {"fullName": "Mehmet Demir"}
        });
        let order = transform(&raw, &test_connection(PlatformType::Hepsiburada), &test_task()).unwrap();
        assert_eq!(order.customer.name, "Mehmet Demir");
    }

    #[test]
    fn test_amount_object_with_amount_field() {
        let raw = json!({
            "orderNumber": "HB-7",
            "status": "Open",
            "totalPrice": {"amount": 120.5, "currency": "TRY"}
        });
        let order = transform(&raw, &test_connection(PlatformType::Hepsiburada), &test_task()).unwrap();
        assert_eq!(order.total_amount, 120.5);
        assert_eq!(order.order_status, OrderStatus::New);
    }

    #[test]
    fn test_order_without_identifiers_is_rejected() {
        let raw = json!({"status": "New", "totalAmount": 10});
        let result = transform(&raw, &test_connection(PlatformType::N11), &test_task());
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_payload_survives_missing_fields() {
        let raw = json!({"orderCode": "X-1"});
        let order = transform(&raw, &test_connection(PlatformType::N11), &test_task()).unwrap();
        assert_eq!(order.order_number.as_deref(), Some("X-1"));
        assert_eq!(order.order_status, OrderStatus::Unknown);
        assert_eq!(order.customer.name, "");
        assert!(order.items.is_empty());
    }
}
