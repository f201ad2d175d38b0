//! Human-facing pages
//!
//! Server-rendered views over the same query engine as the API: a dashboard
//! of per-status sections, a filterable full list, a detail page with
//! related records and a static API reference. Markup is built by small
//! escaping helpers; record-supplied text never reaches the page raw.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Deserialize;
use tracing::error;

use crate::AppState;
use crate::entities::{
    ipos::{self, IpoStatus, IssueType},
    prelude::Ipos,
};
use crate::services::ipo_query::{self, IpoFilters};

type PageError = (StatusCode, Html<String>);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPageQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub issue_type: Option<String>,
    pub sort: Option<String>,
}

/// GET / — dashboard with up to 6 records per status section
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, PageError> {
    let filters = IpoFilters {
        search: query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        status: query.status.as_deref().and_then(IpoStatus::parse),
        issue_type: None,
    };

    let base = ipo_query::select_filtered(&filters);
    let upcoming = ipo_query::dashboard_slice(base.clone(), IpoStatus::Upcoming)
        .all(&state.db)
        .await
        .map_err(page_error)?;
    let ongoing = ipo_query::dashboard_slice(base.clone(), IpoStatus::Ongoing)
        .all(&state.db)
        .await
        .map_err(page_error)?;
    let listed = ipo_query::dashboard_slice(base, IpoStatus::Listed)
        .all(&state.db)
        .await
        .map_err(page_error)?;

    // Section totals are unfiltered
    let total_upcoming = status_total(&state, IpoStatus::Upcoming).await?;
    let total_ongoing = status_total(&state, IpoStatus::Ongoing).await?;
    let total_listed = status_total(&state, IpoStatus::Listed).await?;

    let search_echo = query.search.unwrap_or_default();
    let status_echo = query.status.unwrap_or_default();

    let mut body = String::new();
    body.push_str("<h1>IPO Tracker</h1>");
    body.push_str(&filter_form_home(&search_echo, &status_echo));
    body.push_str(&section(
        "Upcoming IPOs",
        total_upcoming,
        &upcoming,
    ));
    body.push_str(&section("Ongoing IPOs", total_ongoing, &ongoing));
    body.push_str(&section("Listed IPOs", total_listed, &listed));

    Ok(Html(layout("IPO Tracker", &body)))
}

async fn status_total(state: &AppState, status: IpoStatus) -> Result<u64, PageError> {
    Ipos::find()
        .filter(ipos::Column::Status.eq(status))
        .count(&state.db)
        .await
        .map_err(page_error)
}

/// GET /list — full list with filtering and sorting
pub async fn ipo_list(
    State(state): State<AppState>,
    Query(query): Query<ListPageQuery>,
) -> Result<Html<String>, PageError> {
    let filters = IpoFilters {
        search: query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        status: query.status.as_deref().and_then(IpoStatus::parse),
        issue_type: query.issue_type.as_deref().and_then(IssueType::parse),
    };

    let records = ipo_query::order_by_key(
        ipo_query::select_filtered(&filters),
        query.sort.as_deref(),
    )
    .all(&state.db)
    .await
    .map_err(page_error)?;

    let mut body = String::new();
    body.push_str("<h1>All IPOs</h1>");
    body.push_str(&filter_form_list(&query));
    body.push_str(&list_table(&records));

    Ok(Html(layout("All IPOs", &body)))
}

/// GET /detail/{id} — one record plus up to 4 related records
pub async fn ipo_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, PageError> {
    let record = Ipos::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(page_error)?
        .ok_or_else(not_found_page)?;

    let related = ipo_query::select_related(record.status, record.id)
        .all(&state.db)
        .await
        .map_err(page_error)?;

    Ok(Html(layout(
        &record.company_name,
        &detail_body(&record, &related),
    )))
}

/// GET /api-docs — static API reference
pub async fn api_docs() -> Html<String> {
    let body = r#"<h1>API Documentation</h1>
<table>
<tr><th>Method</th><th>Path</th><th>Description</th></tr>
<tr><td>GET</td><td>/api/ipo</td><td>List IPOs (summary). Query params: <code>search</code>, <code>status</code>, <code>issue_type</code>, <code>ordering</code></td></tr>
<tr><td>POST</td><td>/api/ipo</td><td>Create an IPO</td></tr>
<tr><td>GET</td><td>/api/ipo/{id}</td><td>Retrieve one IPO (full)</td></tr>
<tr><td>PUT</td><td>/api/ipo/{id}</td><td>Replace an IPO</td></tr>
<tr><td>PATCH</td><td>/api/ipo/{id}</td><td>Partially update an IPO</td></tr>
<tr><td>DELETE</td><td>/api/ipo/{id}</td><td>Delete an IPO</td></tr>
<tr><td>GET</td><td>/api/ipo/upcoming</td><td>Upcoming IPOs (full)</td></tr>
<tr><td>GET</td><td>/api/ipo/ongoing</td><td>Ongoing IPOs (full)</td></tr>
<tr><td>GET</td><td>/api/ipo/listed</td><td>Listed IPOs (full)</td></tr>
<tr><td>GET</td><td>/api/ipo/{id}/performance</td><td>Price fields and derived metrics</td></tr>
<tr><td>POST</td><td>/api/ipo/{id}/logo</td><td>Upload company logo (multipart)</td></tr>
<tr><td>POST</td><td>/api/ipo/{id}/rhp</td><td>Upload Red Herring Prospectus (multipart)</td></tr>
<tr><td>POST</td><td>/api/ipo/{id}/drhp</td><td>Upload Draft Red Herring Prospectus (multipart)</td></tr>
</table>
<p>Ordering accepts <code>open_date</code>, <code>close_date</code>, <code>issue_size</code>,
<code>ipo_price</code> and <code>listing_price</code>, each with an optional <code>-</code>
prefix for descending. Unknown keys fall back to descending open date.</p>"#;
    Html(layout("API Documentation", body))
}

fn page_error(e: sea_orm::DbErr) -> PageError {
    error!(error = %e, "Database error while rendering page");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(layout("Error", "<h1>Something went wrong</h1>")),
    )
}

fn not_found_page() -> PageError {
    (
        StatusCode::NOT_FOUND,
        Html(layout("Not found", "<h1>IPO not found</h1>")),
    )
}

// --- rendering helpers ---

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 64rem; padding: 0 1rem; color: #1c2733; }}
nav a {{ margin-right: 1rem; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border-bottom: 1px solid #d8dee5; padding: 0.4rem 0.6rem; text-align: left; }}
.cards {{ display: flex; flex-wrap: wrap; gap: 0.8rem; }}
.card {{ border: 1px solid #d8dee5; border-radius: 6px; padding: 0.8rem; width: 17rem; }}
.badge {{ border-radius: 4px; padding: 0.1rem 0.5rem; font-size: 0.8rem; color: #fff; }}
.bg-warning {{ background: #b58900; }}
.bg-primary {{ background: #2563eb; }}
.bg-success {{ background: #15803d; }}
.bg-secondary {{ background: #64748b; }}
.gain-pos {{ color: #15803d; }}
.gain-neg {{ color: #b91c1c; }}
form.filters {{ margin: 1rem 0; display: flex; gap: 0.5rem; flex-wrap: wrap; }}
</style>
</head>
<body>
<nav><a href="/">Home</a><a href="/list">All IPOs</a><a href="/api-docs">API Docs</a></nav>
{body}
</body>
</html>"#,
        title = esc(title),
        body = body,
    )
}

/// Minimal HTML escaping for record-supplied text
fn esc(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn status_badge(status: IpoStatus) -> String {
    let class = match status {
        IpoStatus::Upcoming => "badge bg-warning",
        IpoStatus::Ongoing => "badge bg-primary",
        IpoStatus::Listed => "badge bg-success",
    };
    format!(r#"<span class="{}">{}</span>"#, class, status.label())
}

fn fmt_money(value: Option<Decimal>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "N/A".to_string(),
    }
}

fn fmt_percent(value: Option<Decimal>) -> String {
    match value {
        Some(value) => {
            let class = if value >= Decimal::ZERO {
                "gain-pos"
            } else {
                "gain-neg"
            };
            format!(r#"<span class="{}">{:.2}%</span>"#, class, value)
        }
        None => "N/A".to_string(),
    }
}

fn selected(flag: bool) -> &'static str {
    if flag { " selected" } else { "" }
}

fn status_options(current: &str) -> String {
    let mut out = format!(
        r#"<option value=""{}>All statuses</option>"#,
        selected(current.is_empty())
    );
    for status in [IpoStatus::Upcoming, IpoStatus::Ongoing, IpoStatus::Listed] {
        out.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            status.as_str(),
            selected(current == status.as_str()),
            status.label()
        ));
    }
    out
}

fn filter_form_home(search: &str, status: &str) -> String {
    format!(
        r#"<form class="filters" method="get" action="/">
<input type="text" name="search" placeholder="Search company or price band" value="{}">
<select name="status">{}</select>
<button type="submit">Filter</button>
</form>"#,
        esc(search),
        status_options(status),
    )
}

fn filter_form_list(query: &ListPageQuery) -> String {
    let search = query.search.as_deref().unwrap_or("");
    let status = query.status.as_deref().unwrap_or("");
    let issue_type = query.issue_type.as_deref().unwrap_or("");
    let sort = query.sort.as_deref().unwrap_or("-open_date");

    let mut issue_type_options = format!(
        r#"<option value=""{}>All issue types</option>"#,
        selected(issue_type.is_empty())
    );
    for kind in [
        IssueType::BookBuilding,
        IssueType::FixedPrice,
        IssueType::OfferForSale,
    ] {
        issue_type_options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            kind.as_str(),
            selected(issue_type == kind.as_str()),
            kind.label()
        ));
    }

    let mut sort_options = String::new();
    for (key, text) in [
        ("-open_date", "Open date (newest first)"),
        ("open_date", "Open date (oldest first)"),
        ("-close_date", "Close date (latest first)"),
        ("close_date", "Close date (earliest first)"),
        ("-issue_size", "Issue size (largest first)"),
        ("issue_size", "Issue size (smallest first)"),
        ("-ipo_price", "IPO price (highest first)"),
        ("ipo_price", "IPO price (lowest first)"),
    ] {
        sort_options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            key,
            selected(sort == key),
            text
        ));
    }

    format!(
        r#"<form class="filters" method="get" action="/list">
<input type="text" name="search" placeholder="Search company or price band" value="{}">
<select name="status">{}</select>
<select name="issue_type">{}</select>
<select name="sort">{}</select>
<button type="submit">Apply</button>
</form>"#,
        esc(search),
        status_options(status),
        issue_type_options,
        sort_options,
    )
}

fn section(title: &str, total: u64, records: &[ipos::Model]) -> String {
    let mut out = format!("<h2>{} <small>({} total)</small></h2>", title, total);
    if records.is_empty() {
        out.push_str("<p>No IPOs in this section.</p>");
        return out;
    }
    out.push_str(r#"<div class="cards">"#);
    for record in records {
        out.push_str(&card(record));
    }
    out.push_str("</div>");
    out
}

fn card(record: &ipos::Model) -> String {
    format!(
        r#"<div class="card">
<h3><a href="/detail/{id}">{name}</a></h3>
<p>{badge}</p>
<p>Price band: {band}</p>
<p>{open} &ndash; {close}</p>
<p>Issue size: {size}</p>
</div>"#,
        id = record.id,
        name = esc(&record.company_name),
        badge = status_badge(record.status),
        band = esc(&record.price_band),
        open = record.open_date,
        close = record.close_date,
        size = record.issue_size,
    )
}

fn list_table(records: &[ipos::Model]) -> String {
    use crate::services::metrics;

    if records.is_empty() {
        return "<p>No IPOs match the current filters.</p>".to_string();
    }
    let mut out = String::from(
        "<table><tr><th>Company</th><th>Price band</th><th>Open</th><th>Close</th>\
         <th>Issue size</th><th>Type</th><th>Status</th><th>IPO price</th>\
         <th>Listing gain</th><th>Current return</th></tr>",
    );
    for record in records {
        let listing_gain = metrics::listing_gain(record.ipo_price, record.listing_price);
        let current_return =
            metrics::current_return(record.ipo_price, record.current_market_price);
        out.push_str(&format!(
            r#"<tr><td><a href="/detail/{id}">{name}</a></td><td>{band}</td><td>{open}</td><td>{close}</td><td>{size}</td><td>{kind}</td><td>{badge}</td><td>{price}</td><td>{gain}</td><td>{ret}</td></tr>"#,
            id = record.id,
            name = esc(&record.company_name),
            band = esc(&record.price_band),
            open = record.open_date,
            close = record.close_date,
            size = record.issue_size,
            kind = record.issue_type.label(),
            badge = status_badge(record.status),
            price = fmt_money(record.ipo_price),
            gain = fmt_percent(listing_gain),
            ret = fmt_percent(current_return),
        ));
    }
    out.push_str("</table>");
    out
}

fn detail_body(record: &ipos::Model, related: &[ipos::Model]) -> String {
    use crate::services::{asset_store::media_url, metrics};

    let listing_gain = metrics::listing_gain(record.ipo_price, record.listing_price);
    let current_return = metrics::current_return(record.ipo_price, record.current_market_price);

    let mut out = format!(
        r#"<h1>{name} {badge}</h1>
<table>
<tr><th>Price band</th><td>{band}</td></tr>
<tr><th>Open date</th><td>{open}</td></tr>
<tr><th>Close date</th><td>{close}</td></tr>
<tr><th>Listing date</th><td>{listing_date}</td></tr>
<tr><th>Issue size</th><td>{size}</td></tr>
<tr><th>Issue type</th><td>{kind}</td></tr>
<tr><th>IPO price</th><td>{ipo_price}</td></tr>
<tr><th>Listing price</th><td>{listing_price}</td></tr>
<tr><th>Current market price</th><td>{cmp}</td></tr>
<tr><th>Listing gain</th><td>{gain}</td></tr>
<tr><th>Current return</th><td>{ret}</td></tr>
</table>"#,
        name = esc(&record.company_name),
        badge = status_badge(record.status),
        band = esc(&record.price_band),
        open = record.open_date,
        close = record.close_date,
        listing_date = record
            .listing_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        size = record.issue_size,
        kind = record.issue_type.label(),
        ipo_price = fmt_money(record.ipo_price),
        listing_price = fmt_money(record.listing_price),
        cmp = fmt_money(record.current_market_price),
        gain = fmt_percent(listing_gain),
        ret = fmt_percent(current_return),
    );

    let mut documents = String::new();
    if let Some(ref path) = record.rhp_document {
        documents.push_str(&format!(
            r#"<li><a href="{}">Red Herring Prospectus</a></li>"#,
            media_url(path, None)
        ));
    }
    if let Some(ref path) = record.drhp_document {
        documents.push_str(&format!(
            r#"<li><a href="{}">Draft Red Herring Prospectus</a></li>"#,
            media_url(path, None)
        ));
    }
    if !documents.is_empty() {
        out.push_str(&format!("<h2>Documents</h2><ul>{}</ul>", documents));
    }

    if !related.is_empty() {
        out.push_str("<h2>Related IPOs</h2>");
        out.push_str(r#"<div class="cards">"#);
        for other in related {
            out.push_str(&card(other));
        }
        out.push_str("</div>");
    }

    out
}
