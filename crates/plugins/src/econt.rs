//! Econt shipping-carrier plugin.
//!
//! Address validation and pickup-location lookups (cities, quarters, offices)
//! so a storefront can let customers pick an Econt office or validate a
//! delivery address. Location lists are served from the server's cache; this
//! plugin only shapes the queries.
//!
//! Query parameters use the server's camelCase names (`countryCode`,
//! `cityId`, ...). `countryCode` defaults to [`CountryCode::Bgr`], currently
//! the only supported country.

use extensions::{
    encode_body, encode_query, ClientContext, ClientError, Headers, Plugin, RequestSpec,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

const BASE_PATH: &str = "/store/econt";

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

/// ISO 3166-1 alpha-3 code of a country Econt delivers in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCode {
    /// Bulgaria.
    #[default]
    #[serde(rename = "BGR")]
    Bgr,
}

// ---------------------------------------------------------------------------
// Carrier models
// ---------------------------------------------------------------------------

/// An Econt city. Carrier attributes not modelled here are kept in `extra`.
///
/// Every attribute is optional because `fields` can project any of them away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub post_code: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A quarter (neighbourhood) of a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quarter {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "cityID")]
    pub city_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An Econt office or automated parcel locker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub phones: Vec<String>,
    /// Set for automated parcel stations.
    #[serde(default, rename = "isAPS")]
    pub is_aps: Option<bool>,
    /// Structured address as returned by the carrier.
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Address validation
// ---------------------------------------------------------------------------

/// Country of an address to validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRef {
    /// ISO 3166-1 alpha-2 code, e.g. `BG`.
    pub code2: String,
}

/// City of an address to validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateAddressCity {
    pub country: CountryRef,
    pub name: String,
}

/// Address as entered by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateAddressInputAddress {
    pub city: ValidateAddressCity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

/// Body of `validate_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateAddressInput {
    pub address: ValidateAddressInputAddress,
}

/// Geocoded position of a validated address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidateAddressLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// 1 (low) to 5 (high).
    pub confidence: u8,
}

/// Address as normalised by the carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedAddress {
    pub city: City,
    pub full_address: String,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub num: Option<String>,
    #[serde(default)]
    pub location: Option<ValidateAddressLocation>,
}

/// How the carrier treated the submitted address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Valid and found as submitted.
    Normal,
    /// Valid after the carrier adjusted it.
    Processed,
    /// Could not be validated.
    Invalid,
}

/// Result of `validate_address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAddressOutput {
    pub address: ValidatedAddress,
    pub validation_status: ValidationStatus,
}

// ---------------------------------------------------------------------------
// Location lookups
// ---------------------------------------------------------------------------

/// Search, projection and paging parameters shared by every location list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationSearch {
    /// Matches `name` or `nameEn`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Comma-separated list of fields to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    /// 1 to 100; the server defaults to 15.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// e.g. `name` or `-name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// Query of `list_cities`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCitiesInput {
    /// Defaults to [`CountryCode::Bgr`].
    pub country_code: Option<CountryCode>,
    #[serde(flatten)]
    pub search: LocationSearch,
}

/// Result of `list_cities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListCitiesOutput {
    pub cities: Vec<City>,
}

/// Query of `list_quarters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuartersInput {
    pub city_id: String,
    /// Defaults to [`CountryCode::Bgr`].
    pub country_code: Option<CountryCode>,
    #[serde(flatten)]
    pub search: LocationSearch,
}

impl ListQuartersInput {
    /// All quarters of `city_id`.
    pub fn new(city_id: impl Into<String>) -> Self {
        Self {
            city_id: city_id.into(),
            country_code: None,
            search: LocationSearch::default(),
        }
    }
}

/// Result of `list_quarters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuartersOutput {
    pub quarters: Vec<Quarter>,
}

/// Office filters. Provide at least `city_id` or `office_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOfficesInput {
    /// Defaults to [`CountryCode::Bgr`].
    pub country_code: Option<CountryCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_id: Option<String>,
    /// Quarter name; only honoured together with `city_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_code: Option<String>,
    #[serde(flatten)]
    pub search: LocationSearch,
}

/// Result of `list_offices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOfficesOutput {
    pub offices: Vec<Office>,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers the `econt` namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcontPlugin;

impl Plugin for EcontPlugin {
    const NAME: &'static str = "econt";
    type Endpoints = EcontEndpoints;

    fn endpoints(&self, ctx: &ClientContext) -> EcontEndpoints {
        EcontEndpoints { ctx: ctx.clone() }
    }
}

/// Econt endpoint functions.
#[derive(Debug, Clone)]
pub struct EcontEndpoints {
    ctx: ClientContext,
}

impl EcontEndpoints {
    /// `POST /store/econt/validate-address`
    #[instrument(skip_all, fields(plugin = EcontPlugin::NAME))]
    pub async fn validate_address(
        &self,
        input: ValidateAddressInput,
        headers: Option<Headers>,
    ) -> Result<ValidateAddressOutput, ClientError> {
        let path = format!("{BASE_PATH}/validate-address");
        let body = encode_body(&path, &input)?;
        self.ctx.send(&path, RequestSpec::post().with_body(body), headers).await
    }

    /// `GET /store/econt/cities`
    #[instrument(skip_all, fields(plugin = EcontPlugin::NAME))]
    pub async fn list_cities(
        &self,
        mut input: ListCitiesInput,
        headers: Option<Headers>,
    ) -> Result<ListCitiesOutput, ClientError> {
        input.country_code.get_or_insert_with(CountryCode::default);
        self.lookup("cities", &input, headers).await
    }

    /// `GET /store/econt/quarters`
    #[instrument(skip_all, fields(plugin = EcontPlugin::NAME, city_id = %input.city_id))]
    pub async fn list_quarters(
        &self,
        mut input: ListQuartersInput,
        headers: Option<Headers>,
    ) -> Result<ListQuartersOutput, ClientError> {
        input.country_code.get_or_insert_with(CountryCode::default);
        self.lookup("quarters", &input, headers).await
    }

    /// `GET /store/econt/offices`
    #[instrument(skip_all, fields(plugin = EcontPlugin::NAME))]
    pub async fn list_offices(
        &self,
        mut input: ListOfficesInput,
        headers: Option<Headers>,
    ) -> Result<ListOfficesOutput, ClientError> {
        input.country_code.get_or_insert_with(CountryCode::default);
        self.lookup("offices", &input, headers).await
    }

    async fn lookup<I, T>(
        &self,
        resource: &str,
        input: &I,
        headers: Option<Headers>,
    ) -> Result<T, ClientError>
    where
        I: Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let path = format!("{BASE_PATH}/{resource}");
        let query = encode_query(&path, input)?;
        self.ctx.send(&path, RequestSpec::get().with_query(query), headers).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use extensions::testing::RecordingClient;
    use extensions::{ClientOptions, HttpMethod};
    use serde_json::json;

    use super::*;

    fn endpoints(response: Value) -> (Arc<RecordingClient>, EcontEndpoints) {
        let client = Arc::new(RecordingClient::responding(response));
        let ctx = ClientContext::new(client.clone(), ClientOptions::new());
        (client, EcontPlugin.endpoints(&ctx))
    }

    #[tokio::test]
    async fn test_list_cities_defaults_country_code() {
        let (client, econt) = endpoints(json!({
            "cities": [{
                "id": 41,
                "name": "София",
                "nameEn": "Sofia",
                "postCode": "1000",
                "regionName": "София"
            }]
        }));

        let output = econt.list_cities(ListCitiesInput::default(), None).await.unwrap();

        assert_eq!(output.cities[0].name_en.as_deref(), Some("Sofia"));
        let request = client.last_request().unwrap();
        assert_eq!(request.path, "/store/econt/cities");
        assert_eq!(request.spec.method, HttpMethod::Get);
        assert_eq!(Value::Object(request.spec.query.unwrap()), json!({ "countryCode": "BGR" }));
        assert_eq!(request.spec.body, None);
    }

    #[tokio::test]
    async fn test_list_cities_passes_search_parameters() {
        let (client, econt) = endpoints(json!({ "cities": [] }));

        let input = ListCitiesInput {
            country_code: Some(CountryCode::Bgr),
            search: LocationSearch {
                q: Some("varna".into()),
                limit: Some(5),
                order: Some("-name".into()),
                ..LocationSearch::default()
            },
        };
        econt.list_cities(input, None).await.unwrap();

        assert_eq!(
            Value::Object(client.last_request().unwrap().spec.query.unwrap()),
            json!({ "countryCode": "BGR", "q": "varna", "limit": 5, "order": "-name" })
        );
    }

    #[tokio::test]
    async fn test_list_cities_decodes_projected_fields() {
        let (client, econt) = endpoints(json!({ "cities": [{ "id": 41, "nameEn": "Sofia" }] }));

        let input = ListCitiesInput {
            search: LocationSearch {
                fields: Some("id,nameEn".into()),
                ..LocationSearch::default()
            },
            ..ListCitiesInput::default()
        };
        let output = econt.list_cities(input, None).await.unwrap();

        let city = &output.cities[0];
        assert_eq!(city.id, Some(41));
        assert_eq!(city.name, None);
        assert_eq!(city.name_en.as_deref(), Some("Sofia"));
        assert_eq!(
            Value::Object(client.last_request().unwrap().spec.query.unwrap()),
            json!({ "countryCode": "BGR", "fields": "id,nameEn" })
        );
    }

    #[tokio::test]
    async fn test_list_offices_decodes_projected_fields() {
        let (_, econt) = endpoints(json!({
            "offices": [{ "id": 1, "name": "София Лозенец" }]
        }));

        let input = ListOfficesInput {
            city_id: Some("41".into()),
            search: LocationSearch {
                fields: Some("id,name".into()),
                ..LocationSearch::default()
            },
            ..ListOfficesInput::default()
        };
        let output = econt.list_offices(input, None).await.unwrap();

        let office = &output.offices[0];
        assert_eq!(office.code, None);
        assert_eq!(office.name.as_deref(), Some("София Лозенец"));
        assert!(office.phones.is_empty());
    }

    #[tokio::test]
    async fn test_list_quarters_decodes_projected_fields() {
        let (_, econt) = endpoints(json!({ "quarters": [{ "id": 7 }] }));

        let output = econt.list_quarters(ListQuartersInput::new("41"), None).await.unwrap();

        assert_eq!(output.quarters[0].id, Some(7));
        assert_eq!(output.quarters[0].name, None);
    }

    #[tokio::test]
    async fn test_list_quarters_sends_city_id() {
        let (client, econt) = endpoints(json!({
            "quarters": [{ "id": 7, "cityID": 41, "name": "Лозенец", "nameEn": "Lozenets" }]
        }));

        let output = econt.list_quarters(ListQuartersInput::new("41"), None).await.unwrap();

        assert_eq!(output.quarters[0].city_id, Some(41));
        let request = client.last_request().unwrap();
        assert_eq!(request.path, "/store/econt/quarters");
        assert_eq!(
            Value::Object(request.spec.query.unwrap()),
            json!({ "cityId": "41", "countryCode": "BGR" })
        );
    }

    #[tokio::test]
    async fn test_list_offices_filters() {
        let (client, econt) = endpoints(json!({
            "offices": [{
                "id": 1,
                "code": "1127",
                "name": "София Лозенец",
                "phones": ["+359 2 000 000"],
                "isAPS": false,
                "address": { "fullAddress": "бул. Черни връх 1" },
                "normalBusinessHoursFrom": 1700000000000u64
            }]
        }));

        let input = ListOfficesInput {
            city_id: Some("41".into()),
            office_code: Some("1127".into()),
            ..ListOfficesInput::default()
        };
        let output = econt.list_offices(input, None).await.unwrap();

        let office = &output.offices[0];
        assert_eq!(office.code.as_deref(), Some("1127"));
        assert!(office.extra.contains_key("normalBusinessHoursFrom"));
        let request = client.last_request().unwrap();
        assert_eq!(request.path, "/store/econt/offices");
        assert_eq!(
            Value::Object(request.spec.query.unwrap()),
            json!({ "countryCode": "BGR", "cityId": "41", "officeCode": "1127" })
        );
    }

    #[tokio::test]
    async fn test_validate_address_posts_body() {
        let (client, econt) = endpoints(json!({
            "address": {
                "city": { "id": 41, "name": "София" },
                "fullAddress": "София, ул. Витоша 1",
                "street": "Витоша",
                "num": "1",
                "location": { "latitude": 42.69, "longitude": 23.32, "confidence": 5 }
            },
            "validationStatus": "normal"
        }));

        let input = ValidateAddressInput {
            address: ValidateAddressInputAddress {
                city: ValidateAddressCity {
                    country: CountryRef { code2: "BG".into() },
                    name: "София".into(),
                },
                street: Some("Витоша".into()),
                num: Some("1".into()),
                quarter: None,
                other: None,
            },
        };
        let output = econt.validate_address(input, None).await.unwrap();

        assert_eq!(output.validation_status, ValidationStatus::Normal);
        assert_eq!(output.address.location.unwrap().confidence, 5);
        let request = client.last_request().unwrap();
        assert_eq!(request.path, "/store/econt/validate-address");
        assert_eq!(request.spec.method, HttpMethod::Post);
        assert_eq!(
            request.spec.body,
            Some(json!({
                "address": {
                    "city": { "country": { "code2": "BG" }, "name": "София" },
                    "street": "Витоша",
                    "num": "1"
                }
            }))
        );
    }
}
