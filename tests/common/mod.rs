use chrono::{FixedOffset, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use ipo_tracker_backend::{
    AppState,
    entities::ipos::{self, IpoStatus, IssueType},
    services::asset_store::AssetStore,
};

/// App state over a mock connection; media writes land in a temp dir
pub fn test_state(db: DatabaseConnection) -> AppState {
    let media_root = std::env::temp_dir().join("ipo-tracker-test-media");
    AppState {
        db,
        assets: AssetStore::new(media_root, None),
    }
}

/// Fully-populated listed record with a 20% listing gain and -10% return
#[allow(dead_code)]
pub fn listed_ipo(id: i32, name: &str) -> ipos::Model {
    let mut model = base_ipo(id, name, IpoStatus::Listed);
    model.ipo_price = Some(Decimal::from(100));
    model.listing_price = Some(Decimal::from(120));
    model.current_market_price = Some(Decimal::from(90));
    model.listing_date = Some(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
    model
}

#[allow(dead_code)]
pub fn base_ipo(id: i32, name: &str, status: IpoStatus) -> ipos::Model {
    let stamp = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
        .unwrap();
    ipos::Model {
        id,
        company_name: name.to_string(),
        logo: None,
        price_band: "1000-1100".to_string(),
        open_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        close_date: NaiveDate::from_ymd_opt(2026, 2, 4).unwrap(),
        issue_size: Decimal::new(500000, 2),
        issue_type: IssueType::BookBuilding,
        listing_date: None,
        status,
        ipo_price: None,
        listing_price: None,
        current_market_price: None,
        rhp_document: None,
        drhp_document: None,
        created_at: stamp,
        updated_at: stamp,
    }
}
