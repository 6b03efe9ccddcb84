//! Request parameter objects for the client operations.
//!
//! Each object turns into the route-specific part of a request body via
//! `to_fields`. Optional parameters are only written when supplied, in the
//! order the API documents them.

use chrono::NaiveDateTime;

use crate::domain::{Compat, OrderStatus, SignedFields, format_time};

/// Currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Filters for listing orders or withdrawals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersQuery {
    pub order_id: Option<i64>,
    pub payment_id: Option<String>,
    pub order_status: Option<OrderStatus>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
    pub page: Option<u32>,
}

impl OrdersQuery {
    pub fn to_fields(&self, compat: &Compat) -> SignedFields {
        let mut fields = SignedFields::new();
        fields.insert_opt("orderId", self.order_id);
        fields.insert_opt("paymentId", self.payment_id.clone());
        fields.insert_opt("orderStatus", self.order_status.map(|s| s.code()));
        fields.insert_opt("dateFrom", self.date_from.as_ref().map(format_time));
        fields.insert_opt(compat.date_to_key(), self.date_to.as_ref().map(format_time));
        fields.insert_opt("page", self.page);
        fields
    }
}

/// Parameters for creating a payment order.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrder {
    /// Payment system id (`i` on the wire).
    pub payment_system_id: i64,
    pub email: String,
    /// Payer IP address.
    pub ip: String,
    pub amount: f64,
    pub currency: String,
    /// Merchant-side order id.
    pub payment_id: Option<String>,
    pub tel: Option<String>,
    pub success_url: Option<String>,
    pub failure_url: Option<String>,
    pub notification_url: Option<String>,
}

impl CreateOrder {
    /// Creates an order in the default currency with no optional fields.
    pub fn new(
        payment_system_id: i64,
        email: impl Into<String>,
        ip: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            payment_system_id,
            email: email.into(),
            ip: ip.into(),
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            payment_id: None,
            tel: None,
            success_url: None,
            failure_url: None,
            notification_url: None,
        }
    }

    pub fn to_fields(&self, compat: &Compat) -> SignedFields {
        let mut fields = SignedFields::new();
        fields.insert("i", self.payment_system_id);
        fields.insert("email", self.email.clone());
        fields.insert("ip", self.ip.clone());
        fields.insert("amount", self.amount);
        fields.insert("currency", self.currency.clone());
        fields.insert_opt("paymentId", self.payment_id.clone());
        fields.insert_opt("tel", self.tel.clone());
        fields.insert_opt(compat.success_url_key(), self.success_url.clone());
        fields.insert_opt("failure_url", self.failure_url.clone());
        fields.insert_opt("notification_url", self.notification_url.clone());
        fields
    }
}

/// Parameters for creating a withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWithdrawal {
    /// Payment system id (`i` on the wire).
    pub payment_system_id: i64,
    /// Destination wallet or card.
    pub account: String,
    pub amount: f64,
    pub currency: String,
    pub payment_id: Option<String>,
}

impl CreateWithdrawal {
    pub fn new(payment_system_id: i64, account: impl Into<String>, amount: f64) -> Self {
        Self {
            payment_system_id,
            account: account.into(),
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            payment_id: None,
        }
    }

    pub fn to_fields(&self) -> SignedFields {
        let mut fields = SignedFields::new();
        fields.insert("i", self.payment_system_id);
        fields.insert("account", self.account.clone());
        fields.insert("amount", self.amount);
        fields.insert("currency", self.currency.clone());
        fields.insert_opt("paymentId", self.payment_id.clone());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_orders_query_empty() {
        let fields = OrdersQuery::default().to_fields(&Compat::default());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_orders_query_field_order() {
        let query = OrdersQuery {
            order_id: Some(10),
            payment_id: Some("p-1".into()),
            order_status: Some(OrderStatus::Paid),
            date_from: Some(at(1)),
            date_to: Some(at(2)),
            page: Some(3),
        };
        let fields = query.to_fields(&Compat::default());

        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            ["orderId", "paymentId", "orderStatus", "dateFrom", "dateTo", "page"]
        );
        assert_eq!(
            fields.signing_string(),
            "10|p-1|1|2024.01.01 12:00:00|2024.01.02 12:00:00|3"
        );
    }

    #[test]
    fn test_orders_query_legacy_date_collapse() {
        let query = OrdersQuery {
            date_from: Some(at(1)),
            date_to: Some(at(2)),
            page: Some(1),
            ..Default::default()
        };
        let fields = query.to_fields(&Compat::legacy());

        assert_eq!(fields.keys().collect::<Vec<_>>(), ["dateFrom", "page"]);
        assert_eq!(
            fields.get("dateFrom").and_then(|v| v.as_str()),
            Some("2024.01.02 12:00:00")
        );
    }

    #[test]
    fn test_zero_status_is_sent() {
        let query = OrdersQuery {
            order_status: Some(OrderStatus::New),
            ..Default::default()
        };
        let fields = query.to_fields(&Compat::default());
        assert_eq!(fields.get("orderStatus"), Some(&serde_json::json!(0)));
    }

    #[test]
    fn test_create_order_required_fields() {
        let order = CreateOrder::new(6, "payer@example.com", "10.0.0.1", 150.5);
        let fields = order.to_fields(&Compat::default());

        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            ["i", "email", "ip", "amount", "currency"]
        );
        assert_eq!(fields.get("currency"), Some(&serde_json::json!("RUB")));
    }

    #[test]
    fn test_create_order_success_url_key() {
        let order = CreateOrder {
            success_url: Some("https://shop/ok".into()),
            failure_url: Some("https://shop/fail".into()),
            ..CreateOrder::new(6, "payer@example.com", "10.0.0.1", 1.0)
        };

        let fixed = order.to_fields(&Compat::default());
        assert!(fixed.get("success_url").is_some());
        assert!(fixed.get("success_url ").is_none());

        let legacy = order.to_fields(&Compat::legacy());
        assert!(legacy.get("success_url ").is_some());
        assert!(legacy.get("success_url").is_none());
        assert_eq!(
            legacy.keys().collect::<Vec<_>>(),
            ["i", "email", "ip", "amount", "currency", "success_url ", "failure_url"]
        );
    }

    #[test]
    fn test_create_withdrawal_fields() {
        let mut withdrawal = CreateWithdrawal::new(4, "4100111", 500.0);
        withdrawal.payment_id = Some("w-9".into());
        let fields = withdrawal.to_fields();

        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            ["i", "account", "amount", "currency", "paymentId"]
        );
        assert_eq!(fields.signing_string(), "4|4100111|500.0|RUB|w-9");
    }
}
