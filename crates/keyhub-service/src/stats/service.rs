//! Dashboard counters and monthly issuance series.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use keyhub_core::AppResult;
use keyhub_database::repositories::LicenseRepository;
use keyhub_entity::license::MonthlyLicenseCount;

/// Aggregate numbers shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Total licenses in the inventory.
    pub total_licenses: i64,
    /// Licenses with the kill-switch on.
    pub active_licenses: i64,
    /// Active licenses currently `IN_USE`.
    pub in_use_licenses: i64,
    /// `in_use / active` as a whole percentage; 0 when nothing is active.
    pub utilization_rate: u32,
    /// Issued/in-use counts per month for the trailing six months.
    pub monthly: Vec<MonthlyLicenseCount>,
}

/// Dashboard statistics service.
#[derive(Debug, Clone)]
pub struct StatsService {
    /// License repository.
    licenses: Arc<LicenseRepository>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(licenses: Arc<LicenseRepository>) -> Self {
        Self { licenses }
    }

    /// Collect the dashboard numbers.
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let total_licenses = self.licenses.count_all().await?;
        let active_licenses = self.licenses.count_active().await?;
        let in_use_licenses = self.licenses.count_in_use().await?;
        let monthly = self.licenses.monthly_counts().await?;

        let utilization_rate = if active_licenses > 0 {
            ((in_use_licenses as f64 / active_licenses as f64) * 100.0).round() as u32
        } else {
            0
        };

        Ok(DashboardStats {
            total_licenses,
            active_licenses,
            in_use_licenses,
            utilization_rate,
            monthly,
        })
    }
}
