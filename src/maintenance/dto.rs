use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::flash::Flash;
use crate::maintenance::repo::{MaintenanceLog, RecentLog};
use crate::validate::DATE_FORMAT;
use crate::vehicles::dto::{format_timestamp, VehicleItem};

/// Maintenance form body. Cost and description are optional on the form.
#[derive(Debug, Serialize, Deserialize)]
pub struct MaintenanceForm {
    pub maintenance_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    pub maintenance_date: String,
}

#[derive(Debug, Serialize)]
pub struct LogItem {
    pub id: i64,
    pub vehicle_id: i64,
    pub maintenance_type: String,
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    pub maintenance_date: String,
    pub created_at: String,
}

impl From<MaintenanceLog> for LogItem {
    fn from(log: MaintenanceLog) -> Self {
        Self {
            id: log.id,
            vehicle_id: log.vehicle_id,
            maintenance_type: log.maintenance_type,
            description: log.description,
            cost: log.cost,
            maintenance_date: log
                .maintenance_date
                .format(&DATE_FORMAT)
                .unwrap_or_default(),
            created_at: format_timestamp(log.created_at),
        }
    }
}

/// Page model for the add-maintenance form.
#[derive(Debug, Serialize)]
pub struct MaintenanceFormPage {
    pub vehicle: VehicleItem,
    pub flash: Option<Flash>,
}

/// Dashboard line item: a recent log with its vehicle's label.
#[derive(Debug, Serialize)]
pub struct RecentLogItem {
    pub id: i64,
    pub vehicle_id: i64,
    pub vehicle: String,
    pub maintenance_type: String,
    pub cost: Option<Decimal>,
    pub maintenance_date: String,
}

impl From<RecentLog> for RecentLogItem {
    fn from(log: RecentLog) -> Self {
        Self {
            id: log.id,
            vehicle_id: log.vehicle_id,
            vehicle: format!("{} {}", log.brand, log.model),
            maintenance_type: log.maintenance_type,
            cost: log.cost,
            maintenance_date: log
                .maintenance_date
                .format(&DATE_FORMAT)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn log_item_renders_its_date_as_iso() {
        let item = LogItem::from(MaintenanceLog {
            id: 1,
            vehicle_id: 2,
            user_id: 3,
            maintenance_type: "Oil change".into(),
            description: None,
            cost: Some(Decimal::new(4999, 2)),
            maintenance_date: date!(2024 - 03 - 05),
            created_at: None,
        });
        assert_eq!(item.maintenance_date, "2024-03-05");
        assert_eq!(item.created_at, "");
    }

    #[test]
    fn recent_log_item_labels_the_vehicle() {
        let item = RecentLogItem::from(RecentLog {
            id: 1,
            vehicle_id: 2,
            maintenance_type: "Brakes".into(),
            cost: None,
            maintenance_date: date!(2024 - 03 - 05),
            brand: "Toyota".into(),
            model: "Corolla".into(),
        });
        assert_eq!(item.vehicle, "Toyota Corolla");
    }
}
