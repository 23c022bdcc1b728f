//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Call storefront extension endpoints and print the JSON result.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Store API base URL.
    #[arg(long, env = "STOREFRONT_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Publishable API key sent as `x-publishable-api-key`.
    #[arg(long, env = "STOREFRONT_PUBLISHABLE_KEY", hide_env_values = true, global = true)]
    pub publishable_key: Option<String>,

    /// Customer token sent as `Authorization: Bearer <token>`.
    #[arg(long, env = "STOREFRONT_AUTH_TOKEN", hide_env_values = true, global = true)]
    pub auth_token: Option<String>,

    /// Overall request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Extra request header as `Name:Value`. Repeatable; overrides auth headers.
    #[arg(short = 'H', long = "header", value_parser = parse_header, global = true)]
    pub headers: Vec<(String, String)>,

    /// OTLP/gRPC collector endpoint for span export.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT", global = true)]
    pub otlp_endpoint: Option<String>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected Name:Value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{raw}'"));
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Customer and guest wishlists.
    #[command(subcommand)]
    Wishlist(WishlistCommand),
    /// Product reviews.
    #[command(subcommand)]
    Reviews(ReviewsCommand),
    /// PayPal checkout.
    #[command(subcommand)]
    Paypal(PaypalCommand),
    /// Econt address validation and pickup locations.
    #[command(subcommand)]
    Econt(EcontCommand),
}

#[derive(Debug, Args)]
pub struct Page {
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub offset: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    /// Create a wishlist in a sales channel.
    Create {
        #[arg(long)]
        sales_channel_id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// List the customer's wishlists.
    List {
        #[command(flatten)]
        page: Page,
    },
    /// Retrieve one wishlist.
    Get {
        id: String,
        #[arg(long)]
        with_prices: bool,
    },
    /// Rename a wishlist.
    Rename { id: String, name: String },
    /// Delete a wishlist.
    Delete { id: String },
    /// Count saved items, across all wishlists unless `--id` is given.
    Count {
        #[arg(long)]
        id: Option<String>,
    },
    /// Attach a guest wishlist to the authenticated customer.
    Transfer { id: String },
    /// Create a share token.
    Share { id: String },
    /// Copy a shared wishlist into a new one.
    Import { share_token: String },
    /// Save a product variant.
    AddItem { id: String, variant_id: String },
    /// List saved items.
    Items {
        id: String,
        #[command(flatten)]
        page: Page,
    },
    /// Remove a saved item.
    RemoveItem { id: String, item_id: String },
}

#[derive(Debug, Args)]
pub struct ReviewFilterArgs {
    #[command(flatten)]
    pub page: Page,
    /// Only reviews from verified purchases.
    #[arg(long)]
    pub verified_only: bool,
    /// Only reviews with this star rating.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: Option<u8>,
    #[arg(long, value_enum)]
    pub sort_by: Option<SortBy>,
    #[arg(long)]
    pub descending: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortBy {
    CreatedAt,
    Rating,
}

#[derive(Debug, Subcommand)]
pub enum ReviewsCommand {
    /// Write a review.
    Create {
        product_id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        content: String,
        #[arg(long)]
        title: Option<String>,
        /// Image URL from a prior upload. Repeatable.
        #[arg(long = "image")]
        image_urls: Vec<String>,
    },
    /// List reviews, optionally across several products.
    List {
        #[arg(long = "product")]
        product_ids: Vec<String>,
        /// Only the authenticated customer's reviews.
        #[arg(long)]
        mine: bool,
        #[command(flatten)]
        filters: ReviewFilterArgs,
    },
    /// List one product's reviews.
    Product {
        product_id: String,
        /// Include the rating aggregate.
        #[arg(long)]
        with_counts: bool,
        #[command(flatten)]
        filters: ReviewFilterArgs,
    },
    /// Rating aggregate for a product.
    Counts {
        product_id: String,
        #[arg(long)]
        verified_only: bool,
    },
    /// Delete a review.
    Delete { id: String },
    /// Upload review images.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaypalCommand {
    /// Create a client token for the PayPal JS SDK.
    ClientToken,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Name search.
    #[arg(long)]
    pub q: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub offset: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum EcontCommand {
    /// Validate a Bulgarian delivery address.
    Validate {
        city: String,
        #[arg(long)]
        street: Option<String>,
        #[arg(long)]
        num: Option<String>,
        #[arg(long)]
        quarter: Option<String>,
    },
    /// List cities.
    Cities {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// List quarters of a city.
    Quarters {
        city_id: String,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// List offices by city or office code.
    Offices {
        #[arg(long, required_unless_present = "office_code")]
        city_id: Option<String>,
        #[arg(long)]
        office_code: Option<String>,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("X-Trace: abc").unwrap(),
            ("X-Trace".to_owned(), "abc".to_owned())
        );
        assert_eq!(
            parse_header("x-a:b:c").unwrap(),
            ("x-a".to_owned(), "b:c".to_owned())
        );
        assert!(parse_header("novalue").is_err());
        assert!(parse_header(":v").is_err());
    }

    #[test]
    fn test_parse_wishlist_list() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--base-url",
            "http://localhost:9000",
            "wishlist",
            "list",
            "--limit",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.connection.base_url.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Command::Wishlist(WishlistCommand::List { page }) => {
                assert_eq!(page.limit, Some(5));
                assert_eq!(page.offset, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_offices_require_city_or_code() {
        let err = Cli::try_parse_from(["storefront", "econt", "offices"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_review_rating_range() {
        let args = ["storefront", "reviews", "create", "p1", "6", "bad"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
