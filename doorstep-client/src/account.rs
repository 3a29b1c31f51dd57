//! Zones and saved addresses

use shared::models::{Address, AddressFields, Zone};
use shared::storage_keys;

use crate::api::AccountApi;
use crate::error::ClientResult;
use crate::store::{SessionStore, SessionStoreExt};

pub async fn load_zones<A: AccountApi + ?Sized>(api: &A) -> ClientResult<Vec<Zone>> {
    api.zones().await
}

/// Persist the selected zone
pub fn select_zone<S: SessionStore + ?Sized>(store: &S, zone: &Zone) -> ClientResult<()> {
    store.set_json(storage_keys::ZONE_ID, &zone.id)?;
    store.set_json(storage_keys::ZONE_NAME, &zone.name)?;
    tracing::info!(zone_id = zone.id, zone = %zone.name, "Zone selected");
    Ok(())
}

/// The persisted zone, if both id and name are present
pub fn selected_zone<S: SessionStore + ?Sized>(store: &S) -> Option<Zone> {
    Some(Zone {
        id: store.get_json(storage_keys::ZONE_ID)?,
        name: store.get_json(storage_keys::ZONE_NAME)?,
    })
}

/// Saved addresses of the logged-in customer
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    addresses: Vec<Address>,
    error: Option<String>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn get(&self, address_id: i64) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == address_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load<A: AccountApi + ?Sized>(&mut self, api: &A) -> ClientResult<()> {
        let result = match api.addresses().await {
            Ok(addresses) => {
                self.addresses = addresses;
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.settle(result)
    }

    /// Save a new address and reload the list
    pub async fn save<A: AccountApi + ?Sized>(&mut self, api: &A, address: &AddressFields) -> ClientResult<()> {
        let result = api.save_address(address).await;
        self.settle(result)?;
        self.load(api).await
    }

    /// Delete an address; the list only changes once the server agreed
    pub async fn delete<A: AccountApi + ?Sized>(&mut self, api: &A, address_id: i64) -> ClientResult<()> {
        let result = api.delete_address(address_id).await;
        self.settle(result)?;
        self.addresses.retain(|a| a.id != address_id);
        Ok(())
    }

    fn settle(&mut self, result: ClientResult<()>) -> ClientResult<()> {
        match result {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Address request failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared::models::{LoginRequest, LoginResponse};

    struct FakeAddresses {
        saved: Mutex<Vec<Address>>,
    }

    #[async_trait]
    impl AccountApi for FakeAddresses {
        async fn login(&self, _: &LoginRequest) -> ClientResult<LoginResponse> {
            unimplemented!()
        }

        async fn zones(&self) -> ClientResult<Vec<Zone>> {
            Ok(vec![Zone {
                id: 1,
                name: "Marina".into(),
            }])
        }

        async fn addresses(&self) -> ClientResult<Vec<Address>> {
            Ok(self.saved.lock().clone())
        }

        async fn save_address(&self, address: &AddressFields) -> ClientResult<()> {
            let mut saved = self.saved.lock();
            let id = saved.len() as i64 + 1;
            saved.push(Address {
                id,
                fields: address.clone(),
            });
            Ok(())
        }

        async fn delete_address(&self, _: i64) -> ClientResult<()> {
            Err(ClientError::Rejected {
                status: 409,
                message: Some("Address is used by an open booking".into()),
            })
        }
    }

    #[test]
    fn test_zone_round_trip() {
        let store = MemoryStore::new();
        assert!(selected_zone(&store).is_none());
        let zone = Zone {
            id: 2,
            name: "Marina".into(),
        };
        select_zone(&store, &zone).unwrap();
        assert_eq!(selected_zone(&store), Some(zone));
    }

    #[tokio::test]
    async fn test_save_reloads_and_failed_delete_keeps_entry() {
        let api = FakeAddresses {
            saved: Mutex::new(Vec::new()),
        };
        assert_eq!(load_zones(&api).await.unwrap().len(), 1);

        let mut book = AddressBook::new();
        book.save(&api, &AddressFields {
            street: "Al Sufouh".into(),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(book.addresses().len(), 1);

        let err = book.delete(&api, 1).await.unwrap_err();
        assert_eq!(err.user_message(), "Address is used by an open booking");
        assert_eq!(book.error(), Some("Address is used by an open booking"));
        assert!(book.get(1).is_some());
    }
}
