//! IPO request/response models
//!
//! Two read projections exist: the full representation for single-record
//! endpoints and the status sub-collections, and a compact summary for list
//! views. Derived metrics are computed at projection time, never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::entities::ipos::{self, IpoStatus, IssueType};
use crate::services::asset_store::media_url;
use crate::services::ipo_query::IpoFilters;
use crate::services::metrics;

/// Error payload shared by every API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters for GET /api/ipo
///
/// All values are optional; unknown `status` / `issue_type` / `ordering`
/// values degrade to the unfiltered default instead of erroring.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpoListQuery {
    /// Case-insensitive substring over company_name or price_band
    pub search: Option<String>,
    pub status: Option<String>,
    pub issue_type: Option<String>,
    /// Sort key, e.g. `issue_size` or `-open_date` for descending
    pub ordering: Option<String>,
}

impl IpoListQuery {
    pub fn filters(&self) -> IpoFilters {
        IpoFilters {
            search: self
                .search
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            status: self.status.as_deref().and_then(IpoStatus::parse),
            issue_type: self.issue_type.as_deref().and_then(IssueType::parse),
        }
    }
}

/// Body for POST /api/ipo
#[derive(Debug, Clone, Deserialize)]
pub struct IpoCreateRequest {
    pub company_name: String,
    pub price_band: String,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub issue_size: Decimal,
    pub issue_type: Option<String>,
    pub listing_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub ipo_price: Option<Decimal>,
    pub listing_price: Option<Decimal>,
    pub current_market_price: Option<Decimal>,
}

impl IpoCreateRequest {
    /// Validate field constraints; the error names the offending field
    pub fn validate(&self) -> Result<(), String> {
        if self.company_name.trim().is_empty() {
            return Err("company_name must not be empty".to_string());
        }
        if self.price_band.trim().is_empty() {
            return Err("price_band must not be empty".to_string());
        }
        validate_positive("issue_size", Some(self.issue_size))?;
        validate_positive("ipo_price", self.ipo_price)?;
        validate_positive("listing_price", self.listing_price)?;
        validate_positive("current_market_price", self.current_market_price)?;
        validate_enum_values(self.status.as_deref(), self.issue_type.as_deref())
    }

    pub fn parsed_status(&self) -> IpoStatus {
        self.status
            .as_deref()
            .and_then(IpoStatus::parse)
            .unwrap_or_default()
    }

    pub fn parsed_issue_type(&self) -> IssueType {
        self.issue_type
            .as_deref()
            .and_then(IssueType::parse)
            .unwrap_or_default()
    }
}

/// Body for PUT/PATCH /api/ipo/{id}
///
/// Every field is optional; PUT additionally requires the create-time
/// required set to be present. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpoUpdateRequest {
    pub company_name: Option<String>,
    pub price_band: Option<String>,
    pub open_date: Option<NaiveDate>,
    pub close_date: Option<NaiveDate>,
    pub issue_size: Option<Decimal>,
    pub issue_type: Option<String>,
    pub listing_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub ipo_price: Option<Decimal>,
    pub listing_price: Option<Decimal>,
    pub current_market_price: Option<Decimal>,
}

impl IpoUpdateRequest {
    pub fn validate(&self, require_all: bool) -> Result<(), String> {
        if require_all {
            if self.company_name.is_none() {
                return Err("company_name is required".to_string());
            }
            if self.price_band.is_none() {
                return Err("price_band is required".to_string());
            }
            if self.open_date.is_none() {
                return Err("open_date is required".to_string());
            }
            if self.close_date.is_none() {
                return Err("close_date is required".to_string());
            }
            if self.issue_size.is_none() {
                return Err("issue_size is required".to_string());
            }
        }
        if let Some(ref name) = self.company_name {
            if name.trim().is_empty() {
                return Err("company_name must not be empty".to_string());
            }
        }
        if let Some(ref band) = self.price_band {
            if band.trim().is_empty() {
                return Err("price_band must not be empty".to_string());
            }
        }
        validate_positive("issue_size", self.issue_size)?;
        validate_positive("ipo_price", self.ipo_price)?;
        validate_positive("listing_price", self.listing_price)?;
        validate_positive("current_market_price", self.current_market_price)?;
        validate_enum_values(self.status.as_deref(), self.issue_type.as_deref())
    }
}

fn validate_positive(field: &str, value: Option<Decimal>) -> Result<(), String> {
    match value {
        Some(value) if value <= Decimal::ZERO => Err(format!("{} must be positive", field)),
        _ => Ok(()),
    }
}

fn validate_enum_values(status: Option<&str>, issue_type: Option<&str>) -> Result<(), String> {
    if let Some(raw) = status {
        if IpoStatus::parse(raw).is_none() {
            return Err(format!("status must be one of upcoming, ongoing, listed (got '{}')", raw));
        }
    }
    if let Some(raw) = issue_type {
        if IssueType::parse(raw).is_none() {
            return Err(format!(
                "issue_type must be one of book_building, fixed_price, offer_for_sale (got '{}')",
                raw
            ));
        }
    }
    Ok(())
}

/// Full representation: every stored field plus display labels, resolved
/// asset URLs and both derived metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpoResponse {
    pub id: i32,
    pub company_name: String,
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub price_band: String,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub issue_size: Decimal,
    pub issue_type: IssueType,
    pub issue_type_display: String,
    pub listing_date: Option<NaiveDate>,
    pub status: IpoStatus,
    pub status_display: String,
    pub ipo_price: Option<Decimal>,
    pub listing_price: Option<Decimal>,
    pub current_market_price: Option<Decimal>,
    pub rhp_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rhp_document_url: Option<String>,
    pub drhp_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drhp_document_url: Option<String>,
    pub listing_gain: Option<Decimal>,
    pub current_return: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl IpoResponse {
    pub fn from_model(model: &ipos::Model, origin: Option<&str>) -> Self {
        Self {
            id: model.id,
            company_name: model.company_name.clone(),
            logo: model.logo.clone(),
            logo_url: resolve_url(model.logo.as_deref(), origin),
            price_band: model.price_band.clone(),
            open_date: model.open_date,
            close_date: model.close_date,
            issue_size: model.issue_size,
            issue_type: model.issue_type,
            issue_type_display: model.issue_type.label().to_string(),
            listing_date: model.listing_date,
            status: model.status,
            status_display: model.status.label().to_string(),
            ipo_price: model.ipo_price,
            listing_price: model.listing_price,
            current_market_price: model.current_market_price,
            rhp_document: model.rhp_document.clone(),
            rhp_document_url: resolve_url(model.rhp_document.as_deref(), origin),
            drhp_document: model.drhp_document.clone(),
            drhp_document_url: resolve_url(model.drhp_document.as_deref(), origin),
            listing_gain: metrics::listing_gain(model.ipo_price, model.listing_price),
            current_return: metrics::current_return(model.ipo_price, model.current_market_price),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Summary representation for list views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpoSummary {
    pub id: i32,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub price_band: String,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub issue_size: Decimal,
    pub status: IpoStatus,
    pub status_display: String,
    pub ipo_price: Option<Decimal>,
    pub listing_gain: Option<Decimal>,
    pub current_return: Option<Decimal>,
}

impl IpoSummary {
    pub fn from_model(model: &ipos::Model, origin: Option<&str>) -> Self {
        Self {
            id: model.id,
            company_name: model.company_name.clone(),
            logo_url: resolve_url(model.logo.as_deref(), origin),
            price_band: model.price_band.clone(),
            open_date: model.open_date,
            close_date: model.close_date,
            issue_size: model.issue_size,
            status: model.status,
            status_display: model.status.label().to_string(),
            ipo_price: model.ipo_price,
            listing_gain: metrics::listing_gain(model.ipo_price, model.listing_price),
            current_return: metrics::current_return(model.ipo_price, model.current_market_price),
        }
    }
}

/// Payload for GET /api/ipo/{id}/performance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub ipo_price: Option<Decimal>,
    pub listing_price: Option<Decimal>,
    pub current_market_price: Option<Decimal>,
    pub listing_gain: Option<Decimal>,
    pub current_return: Option<Decimal>,
}

impl PerformanceResponse {
    pub fn from_model(model: &ipos::Model) -> Self {
        Self {
            ipo_price: model.ipo_price,
            listing_price: model.listing_price,
            current_market_price: model.current_market_price,
            listing_gain: metrics::listing_gain(model.ipo_price, model.listing_price),
            current_return: metrics::current_return(model.ipo_price, model.current_market_price),
        }
    }
}

/// Populated asset path resolves to a URL; empty stays absent, never ""
fn resolve_url(path: Option<&str>, origin: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| media_url(p, origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn sample_model() -> ipos::Model {
        let stamp = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
            .unwrap();
        ipos::Model {
            id: 1,
            company_name: "Acme Industries".to_string(),
            logo: Some("ipo_logos/acme.png".to_string()),
            price_band: "1000-1100".to_string(),
            open_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            close_date: NaiveDate::from_ymd_opt(2026, 2, 4).unwrap(),
            issue_size: dec!(5000.00),
            issue_type: IssueType::BookBuilding,
            listing_date: Some(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()),
            status: IpoStatus::Listed,
            ipo_price: Some(dec!(100)),
            listing_price: Some(dec!(120)),
            current_market_price: Some(dec!(90)),
            rhp_document: None,
            drhp_document: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_full_projection_computes_metrics_and_labels() {
        let response = IpoResponse::from_model(&sample_model(), None);
        assert_eq!(response.listing_gain, Some(dec!(20.00)));
        assert_eq!(response.current_return, Some(dec!(-10.00)));
        assert_eq!(response.status_display, "Listed");
        assert_eq!(response.issue_type_display, "Book Building");
        assert_eq!(
            response.logo_url.as_deref(),
            Some("/media/ipo_logos/acme.png")
        );
    }

    #[test]
    fn test_urls_absolute_with_origin_absent_without_asset() {
        let mut model = sample_model();
        let response = IpoResponse::from_model(&model, Some("http://example.com"));
        assert_eq!(
            response.logo_url.as_deref(),
            Some("http://example.com/media/ipo_logos/acme.png")
        );
        assert_eq!(response.rhp_document_url, None);

        model.logo = None;
        let response = IpoResponse::from_model(&model, Some("http://example.com"));
        assert_eq!(response.logo_url, None);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("logo_url").is_none());
    }

    #[test]
    fn test_summary_projection_metrics_absent_without_listing_price() {
        let mut model = sample_model();
        model.listing_price = None;
        let summary = IpoSummary::from_model(&model, None);
        assert_eq!(summary.listing_gain, None);
        assert_eq!(summary.current_return, Some(dec!(-10.00)));
    }

    #[test]
    fn test_create_request_validation() {
        let mut request = IpoCreateRequest {
            company_name: "Acme".to_string(),
            price_band: "90-110".to_string(),
            open_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            close_date: NaiveDate::from_ymd_opt(2026, 2, 4).unwrap(),
            issue_size: dec!(100),
            issue_type: None,
            listing_date: None,
            status: Some("ongoing".to_string()),
            ipo_price: None,
            listing_price: None,
            current_market_price: None,
        };
        assert!(request.validate().is_ok());
        assert_eq!(request.parsed_status(), IpoStatus::Ongoing);
        assert_eq!(request.parsed_issue_type(), IssueType::BookBuilding);

        request.issue_size = dec!(0);
        let err = request.validate().unwrap_err();
        assert!(err.contains("issue_size"));

        request.issue_size = dec!(100);
        request.ipo_price = Some(dec!(-1));
        assert!(request.validate().unwrap_err().contains("ipo_price"));

        request.ipo_price = None;
        request.status = Some("delisted".to_string());
        assert!(request.validate().unwrap_err().contains("status"));
    }

    #[test]
    fn test_update_request_required_set_only_for_put() {
        let request = IpoUpdateRequest {
            status: Some("listed".to_string()),
            ..Default::default()
        };
        assert!(request.validate(false).is_ok());
        assert!(request.validate(true).unwrap_err().contains("company_name"));
    }

    #[test]
    fn test_list_query_parses_leniently() {
        let query = IpoListQuery {
            search: Some("".to_string()),
            status: Some("bogus".to_string()),
            issue_type: Some("fixed_price".to_string()),
            ordering: None,
        };
        let filters = query.filters();
        assert_eq!(filters.search, None);
        assert_eq!(filters.status, None);
        assert_eq!(filters.issue_type, Some(IssueType::FixedPrice));
    }
}
