use serde::Serialize;
use ts_rs::TS;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// 企业首页统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct EnterpriseDashboardSummary {
    pub pending_tasks: i64,
    pub active_projects: i64,
    pub students: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct ChartPoint {
    pub x: String,
    pub y: i64,
}

// 折线图数据序列
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DeliveriesSeries {
    pub name: String,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: String,
    pub data: Vec<ChartPoint>,
}

impl DeliveriesSeries {
    /// counts 下标 0..12 对应 1..12 月
    pub fn from_monthly(name: String, counts: [i64; 12]) -> Self {
        Self {
            name,
            kind: "line".to_string(),
            data: MONTH_LABELS
                .iter()
                .zip(counts)
                .map(|(m, y)| ChartPoint {
                    x: m.to_string(),
                    y,
                })
                .collect(),
        }
    }
}

// 学生首页统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboard {
    pub completed_tasks: i64,
    pub in_progress_tasks: i64,
    pub total_deliverables: i64,
    pub certificate: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_has_twelve_months() {
        let mut counts = [0i64; 12];
        counts[2] = 4;
        let series = DeliveriesSeries::from_monthly("Portal".into(), counts);
        assert_eq!(series.data.len(), 12);
        assert_eq!(series.data[0].x, "Jan");
        assert_eq!(series.data[2].y, 4);

        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["type"], "line");
    }
}
