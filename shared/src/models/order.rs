//! Order Model

use super::price::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Set of order identifiers, carried on the wire as `"12,13"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct OrderIds(Vec<String>);

impl OrderIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for id in ids {
            let id: String = id.into();
            let id = id.trim().to_string();
            if !id.is_empty() && !out.contains(&id) {
                out.push(id);
            }
        }
        Self(out)
    }

    /// Parse a comma-separated list; blanks and duplicates are dropped
    pub fn parse_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn to_csv(&self) -> String {
        self.0.join(",")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<String> for OrderIds {
    fn from(value: String) -> Self {
        Self::parse_csv(&value)
    }
}

impl From<OrderIds> for String {
    fn from(value: OrderIds) -> Self {
        value.to_csv()
    }
}

impl std::fmt::Display for OrderIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_csv())
    }
}

/// Order entity as listed for checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Price>,
}

/// Amount to charge for a set of orders, as computed by the server.
///
/// There is no public constructor: the only way to obtain one is to decode
/// the server's `Total` object, so a client-side estimate can never be
/// handed to a payment call by mistake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritativeTotal {
    amount: Price,
    currency: String,
    #[serde(rename = "currencySymbol", default)]
    currency_symbol: String,
}

impl AuthoritativeTotal {
    /// Amount exactly as sent by the server
    pub fn amount(&self) -> &Price {
        &self.amount
    }

    pub fn amount_decimal(&self) -> Option<Decimal> {
        self.amount.amount()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Display form, e.g. "$49"
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_symbol, self.amount)
    }
}

/// Orders listing for checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(rename = "Total")]
    pub total: AuthoritativeTotal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_ids_csv() {
        let ids = OrderIds::parse_csv("12, 13,,12");
        assert_eq!(ids.as_slice(), &["12".to_string(), "13".to_string()]);
        assert_eq!(ids.to_csv(), "12,13");
    }

    #[test]
    fn test_order_ids_serialize_as_csv() {
        let ids = OrderIds::new(["7", "8"]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), "\"7,8\"");
    }

    #[test]
    fn test_orders_response() {
        let raw = r#"{"orders":[{"id":12,"service_name":"Haircut"}],"Total":{"amount":49,"currency":"usd","currencySymbol":"$"}}"#;
        let resp: OrdersResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.orders.len(), 1);
        assert_eq!(resp.total.amount_decimal(), Some(Decimal::new(49, 0)));
        assert_eq!(resp.total.currency(), "usd");
        assert_eq!(resp.total.display(), "$49");
    }
}
