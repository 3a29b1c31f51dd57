//! Navigation targets produced by controllers

use shared::models::OrderIds;

/// Screen the embedding UI should move to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Re-authenticate after the session expired
    Login,
    /// Booking confirmation for a set of orders
    Confirmation { orders: OrderIds },
}

impl Navigation {
    /// Route path of the target screen
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Confirmation { orders } => {
                format!("/booking-confirmation?orders={}", orders.to_csv())
            }
        }
    }
}
