//! SeaORM Entity for IPO records
//!
//! One row per public share offering, from announcement through listing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ipos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Issuing company, unique across the catalog
    pub company_name: String,
    /// Relative media path of the uploaded logo
    pub logo: Option<String>,
    /// Display text, e.g. "1000-1100"; never used in calculations
    pub price_band: String,
    pub open_date: Date,
    pub close_date: Date,
    /// Issue size in crores
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub issue_size: Decimal,
    pub issue_type: IssueType,
    pub listing_date: Option<Date>,
    pub status: IpoStatus,
    /// Final offer price
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub ipo_price: Option<Decimal>,
    /// First listed market price
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub listing_price: Option<Decimal>,
    /// Latest known market price
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub current_market_price: Option<Decimal>,
    /// Relative media path of the Red Herring Prospectus
    pub rhp_document: Option<String>,
    /// Relative media path of the Draft Red Herring Prospectus
    pub drhp_document: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle stage of an offering. Transitions are operator-driven writes,
/// not a state machine; any value may be set at any time.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum IpoStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "listed")]
    Listed,
}

impl IpoStatus {
    /// Wire value used in the API and query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            IpoStatus::Upcoming => "upcoming",
            IpoStatus::Ongoing => "ongoing",
            IpoStatus::Listed => "listed",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            IpoStatus::Upcoming => "Upcoming",
            IpoStatus::Ongoing => "Ongoing",
            IpoStatus::Listed => "Listed",
        }
    }

    /// Lenient parse for query parameters; unknown values yield `None`
    /// and the caller drops the filter
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(IpoStatus::Upcoming),
            "ongoing" => Some(IpoStatus::Ongoing),
            "listed" => Some(IpoStatus::Listed),
            _ => None,
        }
    }
}

impl Default for IpoStatus {
    fn default() -> Self {
        IpoStatus::Upcoming
    }
}

/// Offer mechanism disclosed for the issue
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    #[sea_orm(string_value = "book_building")]
    BookBuilding,
    #[sea_orm(string_value = "fixed_price")]
    FixedPrice,
    #[sea_orm(string_value = "offer_for_sale")]
    OfferForSale,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::BookBuilding => "book_building",
            IssueType::FixedPrice => "fixed_price",
            IssueType::OfferForSale => "offer_for_sale",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueType::BookBuilding => "Book Building",
            IssueType::FixedPrice => "Fixed Price",
            IssueType::OfferForSale => "Offer for Sale",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "book_building" => Some(IssueType::BookBuilding),
            "fixed_price" => Some(IssueType::FixedPrice),
            "offer_for_sale" => Some(IssueType::OfferForSale),
            _ => None,
        }
    }
}

impl Default for IssueType {
    fn default() -> Self {
        IssueType::BookBuilding
    }
}
