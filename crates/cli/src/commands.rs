//! Sub-command dispatch: one endpoint call per command.

use std::path::Path;

use anyhow::Context;
use extensions::{
    Extensions, Headers, ProductId, ProductVariantId, ReviewId, SalesChannelId, WishlistId,
    WishlistItemId,
};
use plugins::econt::{
    CountryRef, ListCitiesInput, ListOfficesInput, ListQuartersInput, LocationSearch,
    ValidateAddressCity, ValidateAddressInput, ValidateAddressInputAddress,
};
use plugins::reviews::{
    AggregateCountsInput, CreateReviewInput, DeleteReviewInput, ImageFile, ListProductReviewsInput,
    ListReviewsInput, ReviewFilters, ReviewSortField, SortOrder, UploadImageFilesInput,
};
use plugins::wishlist::{
    AddItemToWishlistInput, CreateWishlistInput, DeleteWishlistInput, ImportWishlistInput,
    ListItemsInput, ListWishlistsInput, RemoveItemFromWishlistInput, RetrieveWishlistInput,
    ShareWishlistInput, TotalItemsCountInput, TransferWishlistInput, UpdateWishlistInput,
};
use plugins::{EcontPlugin, PaypalPlugin, ReviewsPlugin, WishlistPlugin};
use serde::Serialize;
use serde_json::Value;

use crate::args::{
    Command, EcontCommand, PaypalCommand, ReviewFilterArgs, ReviewsCommand, SearchArgs, SortBy,
    WishlistCommand,
};

/// Runs `command` against the registered namespaces and returns the response.
pub async fn run(
    extensions: &Extensions,
    command: Command,
    headers: Headers,
) -> anyhow::Result<Value> {
    let headers = (!headers.is_empty()).then_some(headers);
    match command {
        Command::Wishlist(command) => wishlist(extensions, command, headers).await,
        Command::Reviews(command) => reviews(extensions, command, headers).await,
        Command::Paypal(PaypalCommand::ClientToken) => {
            let paypal = extensions.require::<PaypalPlugin>()?;
            to_json(paypal.create_client_token(headers).await?)
        }
        Command::Econt(command) => econt(extensions, command, headers).await,
    }
}

fn to_json(output: impl Serialize) -> anyhow::Result<Value> {
    serde_json::to_value(output).context("failed to render response")
}

fn wishlist_id(raw: String) -> anyhow::Result<WishlistId> {
    WishlistId::new(raw).context("wishlist id must not be empty")
}

fn product_id(raw: String) -> anyhow::Result<ProductId> {
    ProductId::new(raw).context("product id must not be empty")
}

async fn wishlist(
    extensions: &Extensions,
    command: WishlistCommand,
    headers: Option<Headers>,
) -> anyhow::Result<Value> {
    let wishlist = extensions.require::<WishlistPlugin>()?;
    match command {
        WishlistCommand::Create {
            sales_channel_id,
            name,
        } => {
            let input = CreateWishlistInput {
                name,
                sales_channel_id: SalesChannelId::new(sales_channel_id)
                    .context("sales channel id must not be empty")?,
            };
            to_json(wishlist.create(input, headers).await?)
        }
        WishlistCommand::List { page } => {
            let input = ListWishlistsInput {
                limit: page.limit,
                offset: page.offset,
                items_fields: None,
            };
            to_json(wishlist.list(input, headers).await?)
        }
        WishlistCommand::Get { id, with_prices } => {
            let mut input = RetrieveWishlistInput::new(wishlist_id(id)?);
            input.include_calculated_price = with_prices.then_some(true);
            to_json(wishlist.retrieve(input, headers).await?)
        }
        WishlistCommand::Rename { id, name } => {
            let input = UpdateWishlistInput {
                id: wishlist_id(id)?,
                name: Some(name),
            };
            to_json(wishlist.update(input, headers).await?)
        }
        WishlistCommand::Delete { id } => {
            let input = DeleteWishlistInput { id: wishlist_id(id)? };
            to_json(wishlist.delete(input, headers).await?)
        }
        WishlistCommand::Count { id } => {
            let input = TotalItemsCountInput {
                wishlist_id: id.map(wishlist_id).transpose()?,
            };
            to_json(wishlist.total_items_count(input, headers).await?)
        }
        WishlistCommand::Transfer { id } => {
            let input = TransferWishlistInput { id: wishlist_id(id)? };
            to_json(wishlist.transfer(input, headers).await?)
        }
        WishlistCommand::Share { id } => {
            let input = ShareWishlistInput { id: wishlist_id(id)? };
            to_json(wishlist.share(input, headers).await?)
        }
        WishlistCommand::Import { share_token } => {
            to_json(wishlist.import(ImportWishlistInput { share_token }, headers).await?)
        }
        WishlistCommand::AddItem { id, variant_id } => {
            let input = AddItemToWishlistInput {
                id: wishlist_id(id)?,
                product_variant_id: ProductVariantId::new(variant_id)
                    .context("variant id must not be empty")?,
            };
            to_json(wishlist.add_item(input, headers).await?)
        }
        WishlistCommand::Items { id, page } => {
            let mut input = ListItemsInput::new(wishlist_id(id)?);
            input.limit = page.limit;
            input.offset = page.offset;
            to_json(wishlist.list_items(input, headers).await?)
        }
        WishlistCommand::RemoveItem { id, item_id } => {
            let input = RemoveItemFromWishlistInput {
                id: wishlist_id(id)?,
                wishlist_item_id: WishlistItemId::new(item_id)
                    .context("wishlist item id must not be empty")?,
            };
            to_json(wishlist.remove_item(input, headers).await?)
        }
    }
}

fn review_filters(args: ReviewFilterArgs) -> ReviewFilters {
    ReviewFilters {
        limit: args.page.limit,
        offset: args.page.offset,
        verified_purchase_only: args.verified_only.then_some(true),
        rating: args.rating,
        sort_by: args.sort_by.map(|sort| match sort {
            SortBy::CreatedAt => ReviewSortField::CreatedAt,
            SortBy::Rating => ReviewSortField::Rating,
        }),
        order: args.descending.then_some(SortOrder::Desc),
        ..ReviewFilters::default()
    }
}

async fn reviews(
    extensions: &Extensions,
    command: ReviewsCommand,
    headers: Option<Headers>,
) -> anyhow::Result<Value> {
    let reviews = extensions.require::<ReviewsPlugin>()?;
    match command {
        ReviewsCommand::Create {
            product_id: product,
            rating,
            content,
            title,
            image_urls,
        } => {
            let input = CreateReviewInput {
                content,
                rating,
                product_id: product_id(product)?,
                image_urls,
                title,
            };
            to_json(reviews.create(input, headers).await?)
        }
        ReviewsCommand::List {
            product_ids,
            mine,
            filters,
        } => {
            let product_ids = product_ids
                .into_iter()
                .map(product_id)
                .collect::<anyhow::Result<Vec<_>>>()?;
            let mut filters = review_filters(filters);
            filters.my_reviews_only = mine.then_some(true);
            let input = ListReviewsInput {
                product_ids: (!product_ids.is_empty()).then_some(product_ids),
                filters,
            };
            to_json(reviews.list(input, headers).await?)
        }
        ReviewsCommand::Product {
            product_id: product,
            with_counts,
            filters,
        } => {
            let mut input = ListProductReviewsInput::new(product_id(product)?);
            input.include_aggregated_counts = with_counts.then_some(true);
            input.filters = review_filters(filters);
            to_json(reviews.list_product_reviews(input, headers).await?)
        }
        ReviewsCommand::Counts {
            product_id: product,
            verified_only,
        } => {
            let input = AggregateCountsInput {
                product_id: product_id(product)?,
                verified_purchase_only: verified_only.then_some(true),
            };
            to_json(reviews.aggregate_counts(input, headers).await?)
        }
        ReviewsCommand::Delete { id } => {
            let input = DeleteReviewInput {
                id: ReviewId::new(id).context("review id must not be empty")?,
            };
            to_json(reviews.delete(input, headers).await?)
        }
        ReviewsCommand::Upload { files } => {
            let mut images = Vec::with_capacity(files.len());
            for path in &files {
                images.push(read_image(path).await?);
            }
            let input = UploadImageFilesInput { files: images };
            to_json(reviews.upload_image_files(input, headers).await?)
        }
    }
}

async fn read_image(path: &Path) -> anyhow::Result<ImageFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_owned();
    Ok(ImageFile {
        content_type: image_content_type(path).map(str::to_owned),
        file_name,
        bytes,
    })
}

fn image_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn location_search(args: SearchArgs) -> LocationSearch {
    LocationSearch {
        q: args.q,
        limit: args.limit,
        offset: args.offset,
        ..LocationSearch::default()
    }
}

async fn econt(
    extensions: &Extensions,
    command: EcontCommand,
    headers: Option<Headers>,
) -> anyhow::Result<Value> {
    let econt = extensions.require::<EcontPlugin>()?;
    match command {
        EcontCommand::Validate {
            city,
            street,
            num,
            quarter,
        } => {
            let input = ValidateAddressInput {
                address: ValidateAddressInputAddress {
                    city: ValidateAddressCity {
                        country: CountryRef {
                            code2: "BG".to_owned(),
                        },
                        name: city,
                    },
                    street,
                    num,
                    quarter,
                    other: None,
                },
            };
            to_json(econt.validate_address(input, headers).await?)
        }
        EcontCommand::Cities { search } => {
            let input = ListCitiesInput {
                country_code: None,
                search: location_search(search),
            };
            to_json(econt.list_cities(input, headers).await?)
        }
        EcontCommand::Quarters { city_id, search } => {
            let mut input = ListQuartersInput::new(city_id);
            input.search = location_search(search);
            to_json(econt.list_quarters(input, headers).await?)
        }
        EcontCommand::Offices {
            city_id,
            office_code,
            search,
        } => {
            let input = ListOfficesInput {
                city_id,
                office_code,
                search: location_search(search),
                ..ListOfficesInput::default()
            };
            to_json(econt.list_offices(input, headers).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_image_content_type_by_extension() {
        assert_eq!(image_content_type(&PathBuf::from("a/shoe.PNG")), Some("image/png"));
        assert_eq!(image_content_type(&PathBuf::from("shoe.jpeg")), Some("image/jpeg"));
        assert_eq!(image_content_type(&PathBuf::from("shoe.tiff")), None);
        assert_eq!(image_content_type(&PathBuf::from("shoe")), None);
    }

    #[test]
    fn test_review_filters_map_flags() {
        let filters = review_filters(ReviewFilterArgs {
            page: crate::args::Page {
                limit: Some(3),
                offset: None,
            },
            verified_only: true,
            rating: Some(4),
            sort_by: Some(SortBy::Rating),
            descending: false,
        });

        assert_eq!(filters.limit, Some(3));
        assert_eq!(filters.verified_purchase_only, Some(true));
        assert_eq!(filters.rating, Some(4));
        assert_eq!(filters.sort_by, Some(ReviewSortField::Rating));
        assert_eq!(filters.order, None);
        assert_eq!(filters.my_reviews_only, None);
    }
}
