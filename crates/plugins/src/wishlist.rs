//! Wishlist plugin.
//!
//! Customer and guest wishlists: CRUD, sharing via token, transfer of a guest
//! wishlist to the signed-in customer, and item management. All calls go
//! through the base client under `/store/wishlists`.

use chrono::{DateTime, Utc};
use extensions::{
    encode_body, encode_query, ClientContext, ClientError, CustomerId, Headers, Plugin,
    ProductId, ProductVariantId, RequestSpec, SalesChannelId, WishlistId, WishlistItemId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::common::{Paginated, ResourceRef, DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET};

const BASE_PATH: &str = "/store/wishlists";

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// A wishlist with its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wishlist {
    pub id: WishlistId,
    pub customer_id: Option<CustomerId>,
    pub sales_channel_id: SalesChannelId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Empty when the endpoint does not expand items (e.g. `update`).
    #[serde(default)]
    pub items: Vec<WishlistItem>,
    #[serde(default)]
    pub items_count: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// One saved product variant.
///
/// Only `id` is guaranteed; `items_fields` on a list or retrieve call can
/// narrow the rest away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_variant_id: Option<ProductVariantId>,
    #[serde(default)]
    pub wishlist_id: Option<WishlistId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// `None` if the variant has since been deleted.
    #[serde(default)]
    pub product_variant: Option<WishlistVariant>,
}

/// The variant behind a [`WishlistItem`], with pricing and availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistVariant {
    #[serde(default)]
    pub id: Option<ProductVariantId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub product: Option<VariantProduct>,
    #[serde(default)]
    pub prices: Vec<Price>,
    /// Present when `include_calculated_price` was requested.
    #[serde(default)]
    pub calculated_price: Option<CalculatedPrice>,
    /// Present when `include_inventory_count` was requested.
    #[serde(default)]
    pub availability: Option<i64>,
    /// Remaining variant attributes (options, dimensions, metadata).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Product summary embedded in a [`WishlistVariant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantProduct {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
}

/// A list price in minor or major units, as configured on the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The price after price lists and promotions for the current context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedPrice {
    #[serde(default)]
    pub calculated_amount: Option<f64>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Body of `create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWishlistInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sales_channel_id: SalesChannelId,
}

/// Query of `list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListWishlistsInput {
    /// Defaults to [`DEFAULT_PAGE_LIMIT`].
    pub limit: Option<u32>,
    /// Defaults to [`DEFAULT_PAGE_OFFSET`].
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_fields: Option<Vec<String>>,
}

/// Wishlist to retrieve and the expansions to include.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrieveWishlistInput {
    #[serde(skip)]
    pub id: WishlistId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_calculated_price: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_inventory_count: Option<bool>,
}

impl RetrieveWishlistInput {
    /// Retrieve `id` with no extra expansions.
    pub fn new(id: WishlistId) -> Self {
        Self {
            id,
            items_fields: None,
            include_calculated_price: None,
            include_inventory_count: None,
        }
    }
}

/// Wishlist to update and its new values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateWishlistInput {
    #[serde(skip)]
    pub id: WishlistId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Wishlist to delete.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteWishlistInput {
    pub id: WishlistId,
}

/// Query of `total_items_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TotalItemsCountInput {
    /// Counts a single wishlist; all of the caller's wishlists when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wishlist_id: Option<WishlistId>,
}

/// Result of `total_items_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalItemsCountOutput {
    pub total_items_count: u64,
}

/// Guest wishlist to transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferWishlistInput {
    pub id: WishlistId,
}

/// Wishlist to share.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareWishlistInput {
    pub id: WishlistId,
}

/// Token another customer can pass to `import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareWishlistOutput {
    pub share_token: String,
}

/// Body of `import`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportWishlistInput {
    pub share_token: String,
}

/// Wishlist and variant for `add_item`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddItemToWishlistInput {
    #[serde(skip)]
    pub id: WishlistId,
    pub product_variant_id: ProductVariantId,
}

/// Query of `list_items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItemsInput {
    #[serde(skip)]
    pub id: WishlistId,
    /// Defaults to [`DEFAULT_PAGE_LIMIT`].
    pub limit: Option<u32>,
    /// Defaults to [`DEFAULT_PAGE_OFFSET`].
    pub offset: Option<u32>,
}

impl ListItemsInput {
    /// First page of `id` at the default page size.
    pub fn new(id: WishlistId) -> Self {
        Self {
            id,
            limit: None,
            offset: None,
        }
    }
}

/// Wishlist item to remove.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveItemFromWishlistInput {
    pub id: WishlistId,
    pub wishlist_item_id: WishlistItemId,
}

/// A page of wishlists.
pub type ListWishlistsOutput = Paginated<Wishlist>;
/// A page of wishlist items.
pub type ListItemsOutput = Paginated<WishlistItem>;

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers the `wishlist` namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct WishlistPlugin;

impl Plugin for WishlistPlugin {
    const NAME: &'static str = "wishlist";
    type Endpoints = WishlistEndpoints;

    fn endpoints(&self, ctx: &ClientContext) -> WishlistEndpoints {
        WishlistEndpoints { ctx: ctx.clone() }
    }
}

/// Wishlist endpoint functions.
#[derive(Debug, Clone)]
pub struct WishlistEndpoints {
    ctx: ClientContext,
}

impl WishlistEndpoints {
    /// `POST /store/wishlists`
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME))]
    pub async fn create(
        &self,
        input: CreateWishlistInput,
        headers: Option<Headers>,
    ) -> Result<Wishlist, ClientError> {
        let body = encode_body(BASE_PATH, &input)?;
        self.ctx.send(BASE_PATH, RequestSpec::post().with_body(body), headers).await
    }

    /// `GET /store/wishlists`, defaulting `limit` and `offset`.
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME))]
    pub async fn list(
        &self,
        mut input: ListWishlistsInput,
        headers: Option<Headers>,
    ) -> Result<ListWishlistsOutput, ClientError> {
        input.limit.get_or_insert(DEFAULT_PAGE_LIMIT);
        input.offset.get_or_insert(DEFAULT_PAGE_OFFSET);
        let query = encode_query(BASE_PATH, &input)?;
        self.ctx.send(BASE_PATH, RequestSpec::get().with_query(query), headers).await
    }

    /// `GET /store/wishlists/{id}`
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME, wishlist_id = %input.id))]
    pub async fn retrieve(
        &self,
        input: RetrieveWishlistInput,
        headers: Option<Headers>,
    ) -> Result<Wishlist, ClientError> {
        let path = format!("{BASE_PATH}/{}", input.id);
        let query = encode_query(&path, &input)?;
        self.ctx.send(&path, RequestSpec::get().with_query(query), headers).await
    }

    /// `PUT /store/wishlists/{id}`. The response omits `items`.
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME, wishlist_id = %input.id))]
    pub async fn update(
        &self,
        input: UpdateWishlistInput,
        headers: Option<Headers>,
    ) -> Result<Wishlist, ClientError> {
        let path = format!("{BASE_PATH}/{}", input.id);
        let body = encode_body(&path, &input)?;
        self.ctx.send(&path, RequestSpec::put().with_body(body), headers).await
    }

    /// `DELETE /store/wishlists/{id}`. `None` when the server answers with an
    /// empty body.
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME, wishlist_id = %input.id))]
    pub async fn delete(
        &self,
        input: DeleteWishlistInput,
        headers: Option<Headers>,
    ) -> Result<Option<ResourceRef<WishlistId>>, ClientError> {
        let path = format!("{BASE_PATH}/{}", input.id);
        self.ctx.send(&path, RequestSpec::delete(), headers).await
    }

    /// `GET /store/wishlists/total-items-count`
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME))]
    pub async fn total_items_count(
        &self,
        input: TotalItemsCountInput,
        headers: Option<Headers>,
    ) -> Result<TotalItemsCountOutput, ClientError> {
        let path = format!("{BASE_PATH}/total-items-count");
        let query = encode_query(&path, &input)?;
        self.ctx.send(&path, RequestSpec::get().with_query(query), headers).await
    }

    /// `POST /store/wishlists/{id}/transfer`: moves a guest wishlist to the
    /// authenticated customer. `None` when the server answers with an empty
    /// body.
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME, wishlist_id = %input.id))]
    pub async fn transfer(
        &self,
        input: TransferWishlistInput,
        headers: Option<Headers>,
    ) -> Result<Option<ResourceRef<WishlistId>>, ClientError> {
        let path = format!("{BASE_PATH}/{}/transfer", input.id);
        self.ctx.send(&path, RequestSpec::post(), headers).await
    }

    /// `POST /store/wishlists/{id}/share`
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME, wishlist_id = %input.id))]
    pub async fn share(
        &self,
        input: ShareWishlistInput,
        headers: Option<Headers>,
    ) -> Result<ShareWishlistOutput, ClientError> {
        let path = format!("{BASE_PATH}/{}/share", input.id);
        self.ctx.send(&path, RequestSpec::post(), headers).await
    }

    /// `POST /store/wishlists/import`: copies a shared wishlist.
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME))]
    pub async fn import(
        &self,
        input: ImportWishlistInput,
        headers: Option<Headers>,
    ) -> Result<Wishlist, ClientError> {
        let path = format!("{BASE_PATH}/import");
        let body = encode_body(&path, &input)?;
        self.ctx.send(&path, RequestSpec::post().with_body(body), headers).await
    }

    /// `POST /store/wishlists/{id}/add-item`
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME, wishlist_id = %input.id))]
    pub async fn add_item(
        &self,
        input: AddItemToWishlistInput,
        headers: Option<Headers>,
    ) -> Result<WishlistItem, ClientError> {
        let path = format!("{BASE_PATH}/{}/add-item", input.id);
        let body = encode_body(&path, &input)?;
        self.ctx.send(&path, RequestSpec::post().with_body(body), headers).await
    }

    /// `GET /store/wishlists/{id}/items`, defaulting `limit` and `offset`.
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME, wishlist_id = %input.id))]
    pub async fn list_items(
        &self,
        mut input: ListItemsInput,
        headers: Option<Headers>,
    ) -> Result<ListItemsOutput, ClientError> {
        input.limit.get_or_insert(DEFAULT_PAGE_LIMIT);
        input.offset.get_or_insert(DEFAULT_PAGE_OFFSET);
        let path = format!("{BASE_PATH}/{}/items", input.id);
        let query = encode_query(&path, &input)?;
        self.ctx.send(&path, RequestSpec::get().with_query(query), headers).await
    }

    /// `DELETE /store/wishlists/{id}/items/{wishlist_item_id}`. `None` when the
    /// server answers with an empty body.
    #[instrument(skip_all, fields(plugin = WishlistPlugin::NAME, wishlist_id = %input.id))]
    pub async fn remove_item(
        &self,
        input: RemoveItemFromWishlistInput,
        headers: Option<Headers>,
    ) -> Result<Option<ResourceRef<WishlistItemId>>, ClientError> {
        let path = format!("{BASE_PATH}/{}/items/{}", input.id, input.wishlist_item_id);
        self.ctx.send(&path, RequestSpec::delete(), headers).await
    }
}
