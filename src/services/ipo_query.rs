//! Query composition for IPO listings
//!
//! Builds SeaORM selects out of the optional search / filter / ordering
//! criteria shared by the API list endpoint and the web pages. All supplied
//! filters are ANDed; the two text-search columns are ORed with each other.

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Expr, Func},
};

use crate::entities::{
    ipos::{self, IpoStatus, IssueType},
    prelude::Ipos,
};

/// Records shown per status section on the dashboard
pub const DASHBOARD_SLICE: u64 = 6;
/// Records shown in the "related" strip on the detail page
pub const RELATED_LIMIT: u64 = 4;

/// Optional criteria applied to a listing query
#[derive(Debug, Clone, Default)]
pub struct IpoFilters {
    /// Case-insensitive substring over company_name OR price_band
    pub search: Option<String>,
    pub status: Option<IpoStatus>,
    pub issue_type: Option<IssueType>,
}

/// Base select with all supplied filters applied, unordered
pub fn select_filtered(filters: &IpoFilters) -> Select<Ipos> {
    let mut select = Ipos::find();

    if let Some(ref search) = filters.search {
        let pattern = format!("%{}%", search.to_lowercase());
        select = select.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(ipos::Column::CompanyName)))
                        .like(pattern.clone()),
                )
                .add(Expr::expr(Func::lower(Expr::col(ipos::Column::PriceBand))).like(pattern)),
        );
    }

    if let Some(status) = filters.status {
        select = select.filter(ipos::Column::Status.eq(status));
    }

    if let Some(issue_type) = filters.issue_type {
        select = select.filter(ipos::Column::IssueType.eq(issue_type));
    }

    select
}

/// Default ordering for any unordered listing: descending open_date
pub fn order_default(select: Select<Ipos>) -> Select<Ipos> {
    select.order_by_desc(ipos::Column::OpenDate)
}

/// Apply an ordering key (`issue_size`, `-open_date`, ...); a `-` prefix
/// selects descending order.
///
/// Keys outside the allow-list fall back to the default ordering instead of
/// erroring, so a client typo degrades to the default listing.
pub fn order_by_key(select: Select<Ipos>, ordering: Option<&str>) -> Select<Ipos> {
    if let Some(raw) = ordering {
        let (key, descending) = match raw.strip_prefix('-') {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };
        if let Some(column) = sort_column(key) {
            return if descending {
                select.order_by_desc(column)
            } else {
                select.order_by_asc(column)
            };
        }
    }
    order_default(select)
}

fn sort_column(key: &str) -> Option<ipos::Column> {
    match key {
        "open_date" => Some(ipos::Column::OpenDate),
        "close_date" => Some(ipos::Column::CloseDate),
        "issue_size" => Some(ipos::Column::IssueSize),
        "ipo_price" => Some(ipos::Column::IpoPrice),
        "listing_price" => Some(ipos::Column::ListingPrice),
        _ => None,
    }
}

/// Fixed-predicate subset for one status value, default-ordered
pub fn select_with_status(status: IpoStatus) -> Select<Ipos> {
    order_default(Ipos::find().filter(ipos::Column::Status.eq(status)))
}

/// Dashboard slice: the first `DASHBOARD_SLICE` records of one status
/// section, taken from an already-filtered base select
pub fn dashboard_slice(base: Select<Ipos>, status: IpoStatus) -> Select<Ipos> {
    order_default(base.filter(ipos::Column::Status.eq(status))).limit(DASHBOARD_SLICE)
}

/// Related records for a detail view: same status, excluding the record
/// itself, first `RELATED_LIMIT`
pub fn select_related(status: IpoStatus, exclude_id: i32) -> Select<Ipos> {
    order_default(
        Ipos::find()
            .filter(ipos::Column::Status.eq(status))
            .filter(ipos::Column::Id.ne(exclude_id)),
    )
    .limit(RELATED_LIMIT)
}
