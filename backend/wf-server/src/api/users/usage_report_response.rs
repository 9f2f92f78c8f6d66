use wf_db::UsageReportRow;

use serde::Serialize;

/// One row of the admin usage report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReportDto {
    pub identity_id: String,
    pub email: String,
    pub feature: String,
    pub count: i64,
}

impl From<UsageReportRow> for UsageReportDto {
    fn from(row: UsageReportRow) -> Self {
        Self {
            identity_id: row.identity_id.to_string(),
            email: row.email,
            feature: row.feature,
            count: row.count,
        }
    }
}
