use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};

use crate::flash::Flash;
use crate::maintenance::dto::LogItem;
use crate::vehicles::repo::{FleetCounts, Vehicle};

pub const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// `YYYY-MM-DD HH:MM:SS`, or empty when the row has no timestamp.
pub fn format_timestamp(ts: Option<OffsetDateTime>) -> String {
    ts.and_then(|t| t.format(&DATETIME_FORMAT).ok())
        .unwrap_or_default()
}

/// Vehicle form body for both add and edit.
#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleForm {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub plate: String,
}

#[derive(Debug, Serialize)]
pub struct VehicleItem {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate_number: String,
    pub created_at: String,
}

impl From<Vehicle> for VehicleItem {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            brand: v.brand,
            model: v.model,
            year: v.year,
            plate_number: v.plate_number,
            created_at: format_timestamp(v.created_at),
        }
    }
}

/// Fleet counters as shown on the list page; "N/A" when the fleet is empty.
#[derive(Debug, Serialize)]
pub struct FleetStats {
    pub total: i64,
    pub oldest: String,
    pub newest: String,
}

impl From<FleetCounts> for FleetStats {
    fn from(counts: FleetCounts) -> Self {
        let year_or_na = |year: Option<i32>| year.map_or_else(|| "N/A".to_string(), |y| y.to_string());
        Self {
            total: counts.total,
            oldest: year_or_na(counts.oldest),
            newest: year_or_na(counts.newest),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleListPage {
    pub vehicles: Vec<VehicleItem>,
    pub search: String,
    pub stats: FleetStats,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct VehicleDetailPage {
    pub vehicle: VehicleItem,
    pub maintenance_logs: Vec<LogItem>,
    pub flash: Option<Flash>,
}

/// Page model for the add and edit forms; `vehicle` pre-fills the edit form.
#[derive(Debug, Serialize)]
pub struct VehicleFormPage {
    pub vehicle: Option<VehicleItem>,
    pub flash: Option<Flash>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn empty_fleet_reports_na_years() {
        let stats = FleetStats::from(FleetCounts {
            total: 0,
            oldest: None,
            newest: None,
        });
        assert_eq!(stats.oldest, "N/A");
        assert_eq!(stats.newest, "N/A");
    }

    #[test]
    fn single_vehicle_fleet_has_equal_oldest_and_newest() {
        let stats = FleetStats::from(FleetCounts {
            total: 1,
            oldest: Some(2020),
            newest: Some(2020),
        });
        assert_eq!(stats.total, 1);
        assert_eq!(stats.oldest, "2020");
        assert_eq!(stats.newest, "2020");
    }

    #[test]
    fn timestamps_render_as_date_and_time() {
        let ts = datetime!(2024-03-05 07:09:02 UTC);
        assert_eq!(format_timestamp(Some(ts)), "2024-03-05 07:09:02");
        assert_eq!(format_timestamp(None), "");
    }
}
