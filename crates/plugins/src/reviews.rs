//! Product reviews plugin.
//!
//! Reviews, per-product listings with rating aggregates, and review image
//! upload.
//!
//! ## Direct upload
//!
//! [`ReviewsEndpoints::upload_image_files`] is the one endpoint that does not
//! go through the base client. Multipart bodies cannot be expressed as a JSON
//! [`extensions::RequestSpec`], so it issues its own `reqwest` request against
//! the base URL and publishable key from [`extensions::StoreConfig`]. Both
//! settings must be present; otherwise the call fails before any I/O. The auth
//! provider is not consulted for this request.

use chrono::{DateTime, Utc};
use extensions::{
    encode_body, encode_query, ClientContext, ClientError, Headers, Plugin, ProductId,
    RequestSpec, ReviewId, TransportError, PUBLISHABLE_KEY_HEADER,
};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::common::{Paginated, ResourceRef};

const UPLOAD_PATH: &str = "/store/reviews/files/images/upload";

/// Form field name carrying each uploaded image.
pub const UPLOAD_FIELD: &str = "files";

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Rating statistics for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCounts {
    /// Mean rating across all counted reviews.
    pub average: f64,
    /// Number of reviews per rating value.
    pub counts: Vec<RatingCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub total_count: u64,
}

/// Number of reviews with one star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCount {
    pub rating: u8,
    pub count: u64,
}

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    /// 1 to 5.
    pub rating: u8,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub is_verified_purchase: bool,
    pub product_id: ProductId,
    pub customer: ReviewAuthor,
    /// Present when `include_product` was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ReviewedProduct>,
}

/// Public part of the reviewing customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Product summary with its rating aggregate, embedded in a [`Review`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewedProduct {
    pub id: ProductId,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(flatten)]
    pub aggregate: AggregateCounts,
}

/// A file stored by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Field review listings can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSortField {
    CreatedAt,
    Rating,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Body of `create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateReviewInput {
    pub content: String,
    pub rating: u8,
    pub product_id: ProductId,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Filters shared by both review listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Only the authenticated customer's reviews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_reviews_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_purchase_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_product: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ReviewSortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

/// Query of `list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListReviewsInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<ProductId>>,
    #[serde(flatten)]
    pub filters: ReviewFilters,
}

/// Query of `list_product_reviews`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListProductReviewsInput {
    #[serde(skip)]
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_aggregated_counts: Option<bool>,
    #[serde(flatten)]
    pub filters: ReviewFilters,
}

impl ListProductReviewsInput {
    /// Reviews of `product_id` with no filters.
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            include_aggregated_counts: None,
            filters: ReviewFilters::default(),
        }
    }
}

/// A page of a product's reviews, plus its aggregate when requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListProductReviewsOutput {
    #[serde(flatten)]
    pub page: Paginated<Review>,
    #[serde(flatten)]
    pub aggregate: Option<AggregateCounts>,
}

/// Review to delete.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReviewInput {
    pub id: ReviewId,
}

/// Query of `aggregate_counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateCountsInput {
    #[serde(skip)]
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_purchase_only: Option<bool>,
}

/// One image to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    /// MIME type, e.g. `image/png`. Left to the server to sniff when absent.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Images for `upload_image_files`, sent as repeated `files` parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadImageFilesInput {
    pub files: Vec<ImageFile>,
}

/// A page of reviews.
pub type ListReviewsOutput = Paginated<Review>;

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers the `reviews` namespace.
///
/// A shared [`reqwest::Client`] may be supplied for the direct upload;
/// otherwise one is built per upload.
#[derive(Debug, Clone, Default)]
pub struct ReviewsPlugin {
    http: Option<reqwest::Client>,
}

impl ReviewsPlugin {
    /// Uses `http` for the direct image upload.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http: Some(http) }
    }
}

impl Plugin for ReviewsPlugin {
    const NAME: &'static str = "reviews";
    type Endpoints = ReviewsEndpoints;

    fn endpoints(&self, ctx: &ClientContext) -> ReviewsEndpoints {
        ReviewsEndpoints {
            ctx: ctx.clone(),
            http: self.http.clone(),
        }
    }
}

/// Review endpoint functions.
#[derive(Debug, Clone)]
pub struct ReviewsEndpoints {
    ctx: ClientContext,
    http: Option<reqwest::Client>,
}

impl ReviewsEndpoints {
    /// `POST /store/reviews`
    #[instrument(skip_all, fields(plugin = ReviewsPlugin::NAME))]
    pub async fn create(
        &self,
        input: CreateReviewInput,
        headers: Option<Headers>,
    ) -> Result<Review, ClientError> {
        let path = "/store/reviews";
        let body = encode_body(path, &input)?;
        self.ctx.send(path, RequestSpec::post().with_body(body), headers).await
    }

    /// `GET /store/products/reviews`
    #[instrument(skip_all, fields(plugin = ReviewsPlugin::NAME))]
    pub async fn list(
        &self,
        input: ListReviewsInput,
        headers: Option<Headers>,
    ) -> Result<ListReviewsOutput, ClientError> {
        let path = "/store/products/reviews";
        let query = encode_query(path, &input)?;
        self.ctx.send(path, RequestSpec::get().with_query(query), headers).await
    }

    /// `GET /store/reviews/product/{product_id}`
    #[instrument(skip_all, fields(plugin = ReviewsPlugin::NAME, product_id = %input.product_id))]
    pub async fn list_product_reviews(
        &self,
        input: ListProductReviewsInput,
        headers: Option<Headers>,
    ) -> Result<ListProductReviewsOutput, ClientError> {
        let path = format!("/store/reviews/product/{}", input.product_id);
        let query = encode_query(&path, &input)?;
        self.ctx.send(&path, RequestSpec::get().with_query(query), headers).await
    }

    /// `GET /store/reviews/product/{product_id}/aggregate-counts`
    #[instrument(skip_all, fields(plugin = ReviewsPlugin::NAME, product_id = %input.product_id))]
    pub async fn aggregate_counts(
        &self,
        input: AggregateCountsInput,
        headers: Option<Headers>,
    ) -> Result<AggregateCounts, ClientError> {
        let path = format!("/store/reviews/product/{}/aggregate-counts", input.product_id);
        let query = encode_query(&path, &input)?;
        self.ctx.send(&path, RequestSpec::get().with_query(query), headers).await
    }

    /// `DELETE /store/reviews/{id}`. `None` when the server answers with an
    /// empty body.
    #[instrument(skip_all, fields(plugin = ReviewsPlugin::NAME, review_id = %input.id))]
    pub async fn delete(
        &self,
        input: DeleteReviewInput,
        headers: Option<Headers>,
    ) -> Result<Option<ResourceRef<ReviewId>>, ClientError> {
        let path = format!("/store/reviews/{}", input.id);
        self.ctx.send(&path, RequestSpec::delete(), headers).await
    }

    /// Multipart `POST {base_url}/store/reviews/files/images/upload`.
    ///
    /// Bypasses the base client; see the module docs.
    ///
    /// # Errors
    ///
    /// [`ClientError::Configuration`] before any I/O when the base URL or
    /// publishable key is missing. Non-success statuses and network failures
    /// are reported as [`ClientError::Transport`].
    #[instrument(skip_all, fields(plugin = ReviewsPlugin::NAME, files = input.files.len()))]
    pub async fn upload_image_files(
        &self,
        input: UploadImageFilesInput,
        headers: Option<Headers>,
    ) -> Result<Vec<UploadedFile>, ClientError> {
        let store = self.ctx.options().store_config();
        let (Some(base_url), Some(publishable_key)) = (store.base_url(), store.publishable_key())
        else {
            return Err(ClientError::Configuration {
                message: "Missing base URL or publishable key for review image upload".to_owned(),
            });
        };
        let url = format!("{}{UPLOAD_PATH}", base_url.trim_end_matches('/'));

        let mut form = Form::new();
        for file in input.files {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type).map_err(|e| ClientError::Encode {
                    path: UPLOAD_PATH.to_owned(),
                    message: format!("invalid content type '{content_type}': {e}"),
                })?;
            }
            form = form.part(UPLOAD_FIELD, part);
        }

        // The publishable key always wins over a caller header of the same name.
        let headers = headers
            .unwrap_or_default()
            .with(PUBLISHABLE_KEY_HEADER, publishable_key);

        let http = match &self.http {
            Some(http) => http.clone(),
            None => reqwest::Client::builder().build().map_err(network_error)?,
        };
        let mut request = http.post(&url).multipart(form);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(network_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(network_error)?;
        tracing::debug!(status = status.as_u16(), "review image upload finished");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }
            .into());
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            path: UPLOAD_PATH.to_owned(),
            message: e.to_string(),
        })
    }
}

fn network_error(err: reqwest::Error) -> ClientError {
    TransportError::Network {
        message: err.to_string(),
    }
    .into()
}
