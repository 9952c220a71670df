use babyshop_core::{AddressBook, AddressId, AddressInput, AddressPatch, UserId};
use tracing::instrument;

use super::ShopApi;
use crate::endpoints;
use crate::error::ApiError;

impl ShopApi {
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self, address), fields(user_id = %user_id))]
    pub async fn add_address(
        &self,
        user_id: &UserId,
        address: &AddressInput,
    ) -> Result<AddressBook, ApiError> {
        self.post(&endpoints::addresses(user_id.as_str()), address)
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self, patch), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn update_address(
        &self,
        user_id: &UserId,
        address_id: &AddressId,
        patch: &AddressPatch,
    ) -> Result<AddressBook, ApiError> {
        self.put(
            &endpoints::address(user_id.as_str(), address_id.as_str()),
            patch,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn delete_address(
        &self,
        user_id: &UserId,
        address_id: &AddressId,
    ) -> Result<AddressBook, ApiError> {
        self.delete(&endpoints::address(user_id.as_str(), address_id.as_str()))
            .await
    }
}
