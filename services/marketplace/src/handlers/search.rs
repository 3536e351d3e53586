use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::ListingType;
use roofline_domain::pagination::PageRequest;

use crate::domain::types::{AreaCount, FilterOptions, SearchFilter};
use crate::error::MarketplaceError;
use crate::handlers::property::PropertyResponse;
use crate::state::AppState;
use crate::usecase::search::{
    AvailableAreasUseCase, FilterOptionsUseCase, GetPublicPropertyUseCase, NearMeQuery,
    NearMeUseCase, SearchPropertiesUseCase,
};

fn parse_query<T: DeserializeOwned + Default>(raw: Option<String>) -> Result<T, MarketplaceError> {
    raw.as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| MarketplaceError::Validation(format!("query: {e}")))
        .map(Option::unwrap_or_default)
}

// ── GET /search/property ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub listing_type: Option<ListingType>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub property_type: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    #[serde(default)]
    pub verified_only: bool,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn price_bound(value: Option<u64>, name: &str) -> Result<Option<i64>, MarketplaceError> {
    value
        .map(i64::try_from)
        .transpose()
        .map_err(|_| MarketplaceError::Validation(format!("{name}: out of range")))
}

pub async fn search_properties(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<PropertyResponse>>, MarketplaceError> {
    let query: SearchQuery = parse_query(raw_query)?;
    let filter = SearchFilter {
        listing_type: query.listing_type,
        city: non_empty(query.city),
        locality: non_empty(query.locality),
        property_type: non_empty(query.property_type),
        bhk: non_empty(query.bhk),
        furnishing: non_empty(query.furnishing),
        min_price: price_bound(query.min_price, "minPrice")?,
        max_price: price_bound(query.max_price, "maxPrice")?,
        verified_only: query.verified_only,
    };
    let usecase = SearchPropertiesUseCase {
        properties: state.property_repo(),
        storage: state.storage.clone(),
    };
    let views = usecase
        .execute(filter, PageRequest::from_query(query.per_page, query.page))
        .await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

// ── GET /search/near-me ──────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NearMeParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_km: Option<f64>,
    pub listing_type: Option<ListingType>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearMeItem {
    #[serde(flatten)]
    pub property: PropertyResponse,
    pub distance_km: f64,
}

pub async fn near_me(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<NearMeItem>>, MarketplaceError> {
    let params: NearMeParams = parse_query(raw_query)?;
    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        let mut missing = Vec::new();
        if params.lat.is_none() {
            missing.push("lat");
        }
        if params.lon.is_none() {
            missing.push("lon");
        }
        return Err(MarketplaceError::MissingFields(missing));
    };
    let usecase = NearMeUseCase {
        properties: state.property_repo(),
        storage: state.storage.clone(),
        default_radius_km: state.settings.near_me_default_radius_km,
    };
    let hits = usecase
        .execute(NearMeQuery {
            origin: GeoPoint::new(lat, lon),
            radius_km: params.radius_km,
            listing_type: params.listing_type,
        })
        .await?;
    Ok(Json(
        hits.into_iter()
            .map(|(view, distance_km)| NearMeItem {
                property: view.into(),
                distance_km,
            })
            .collect(),
    ))
}

// ── GET /search/filters ──────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionsResponse {
    pub cities: Vec<String>,
    pub localities: Vec<String>,
    pub property_types: Vec<String>,
    pub furnishings: Vec<String>,
    pub bhks: Vec<String>,
}

impl From<FilterOptions> for FilterOptionsResponse {
    fn from(o: FilterOptions) -> Self {
        Self {
            cities: o.cities,
            localities: o.localities,
            property_types: o.property_types,
            furnishings: o.furnishings,
            bhks: o.bhks,
        }
    }
}

pub async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptionsResponse>, MarketplaceError> {
    let usecase = FilterOptionsUseCase {
        properties: state.property_repo(),
    };
    Ok(Json(usecase.execute().await?.into()))
}

// ── GET /search/available-areas ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct AreaResponse {
    pub city: String,
    pub locality: String,
    pub count: u64,
}

pub async fn available_areas(
    State(state): State<AppState>,
) -> Result<Json<Vec<AreaResponse>>, MarketplaceError> {
    let usecase = AvailableAreasUseCase {
        properties: state.property_repo(),
    };
    let areas = usecase.execute().await?;
    Ok(Json(
        areas
            .into_iter()
            .map(|AreaCount { city, locality, count }| AreaResponse {
                city,
                locality,
                count,
            })
            .collect(),
    ))
}

// ── GET /search/property/{id} ────────────────────────────────────────────────

pub async fn get_public_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyResponse>, MarketplaceError> {
    let usecase = GetPublicPropertyUseCase {
        properties: state.property_repo(),
        storage: state.storage.clone(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}
