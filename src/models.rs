use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Deserializes a field into `T`, falling back to `T::default()` when the
/// value has an unexpected shape instead of failing the whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Map variant of [`lenient`]: a non-object becomes an empty map and each
/// malformed entry value degrades to its default independently.
fn lenient_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(key, value)| (key, serde_json::from_value(value).unwrap_or_default()))
            .collect()),
        _ => Ok(BTreeMap::new()),
    }
}

/// Sequence variant of [`lenient`]: a non-array becomes empty and each
/// malformed element degrades to its default independently.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Root document returned by the metrics endpoint. Every branch is optional
/// on the wire; absence and malformed sub-trees both collapse to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    #[serde(deserialize_with = "lenient")]
    pub user: UserStats,
    #[serde(deserialize_with = "lenient")]
    pub booking: BookingStats,
    #[serde(deserialize_with = "lenient_map")]
    pub by_country: BTreeMap<String, CountrySlice>,
}

/// User-side counters. The API exposes two key-naming schemes for the same
/// lookback windows: `new_users_*` aggregates at this level and `new_*` tags
/// nested under `types`. Both are read as-is and never cross-validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    #[serde(deserialize_with = "lenient")]
    pub total_count: u64,
    #[serde(deserialize_with = "lenient")]
    pub active_count: u64,
    #[serde(deserialize_with = "lenient")]
    pub inactive_count: u64,
    #[serde(deserialize_with = "lenient")]
    pub types: UserTypes,
    #[serde(alias = "new_24_hours", deserialize_with = "lenient")]
    pub new_users_24_hrs: Option<PeriodStats>,
    #[serde(alias = "new_7_days", deserialize_with = "lenient")]
    pub new_users_7_days: Option<PeriodStats>,
    #[serde(alias = "new_30_days", deserialize_with = "lenient")]
    pub new_users_30_days: Option<PeriodStats>,
    #[serde(deserialize_with = "lenient_map")]
    pub by_country: BTreeMap<String, CountrySlice>,
}

impl UserStats {
    pub fn type_stats(&self, user_type: UserType) -> &TypeStats {
        match user_type {
            UserType::Customer => &self.types.customer,
            UserType::Artist => &self.types.artist,
            UserType::Business => &self.types.business,
        }
    }

    /// The user-level aggregate block for one period, when the API sent it.
    pub fn aggregate(&self, period: Period) -> Option<&PeriodStats> {
        match period {
            Period::Last24Hours => self.new_users_24_hrs.as_ref(),
            Period::Last7Days => self.new_users_7_days.as_ref(),
            Period::Last30Days => self.new_users_30_days.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserTypes {
    #[serde(deserialize_with = "lenient")]
    pub customer: TypeStats,
    #[serde(deserialize_with = "lenient")]
    pub artist: TypeStats,
    #[serde(deserialize_with = "lenient")]
    pub business: TypeStats,
}

/// Per-type lookback windows, keyed by the nested naming scheme.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeStats {
    #[serde(deserialize_with = "lenient")]
    pub new_24_hours: PeriodStats,
    #[serde(deserialize_with = "lenient")]
    pub new_7_days: PeriodStats,
    #[serde(deserialize_with = "lenient")]
    pub new_30_days: PeriodStats,
}

impl TypeStats {
    pub fn period(&self, period: Period) -> &PeriodStats {
        match period {
            Period::Last24Hours => &self.new_24_hours,
            Period::Last7Days => &self.new_7_days,
            Period::Last30Days => &self.new_30_days,
        }
    }
}

/// One lookback window: a count plus an API-truncated sample. The preview
/// length carries no relation to `count`; it is informational only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodStats {
    #[serde(deserialize_with = "lenient")]
    pub count: u64,
    #[serde(deserialize_with = "lenient_seq")]
    pub preview: Vec<UserPreviewItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreviewItem {
    #[serde(deserialize_with = "lenient")]
    pub display_name: String,
    #[serde(deserialize_with = "lenient")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient")]
    pub account_id: String,
    #[serde(deserialize_with = "lenient")]
    pub created: String,
    #[serde(deserialize_with = "lenient")]
    pub occupation: String,
    #[serde(deserialize_with = "lenient")]
    pub slug: String,
    #[serde(deserialize_with = "lenient")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub longitude: Option<f64>,
}

/// Country-scoped rollup: a 30-day total plus the same window shape per
/// user type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountrySlice {
    #[serde(deserialize_with = "lenient")]
    pub total_last_30_days: u64,
    #[serde(deserialize_with = "lenient")]
    pub customer: PeriodStats,
    #[serde(deserialize_with = "lenient")]
    pub artist: PeriodStats,
    #[serde(deserialize_with = "lenient")]
    pub business: PeriodStats,
}

impl CountrySlice {
    pub fn type_slice(&self, user_type: UserType) -> &PeriodStats {
        match user_type {
            UserType::Customer => &self.customer,
            UserType::Artist => &self.artist,
            UserType::Business => &self.business,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingStats {
    #[serde(deserialize_with = "lenient")]
    pub last_30_days: BookingWindow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingWindow {
    #[serde(deserialize_with = "lenient")]
    pub insights: BookingRollup,
    #[serde(deserialize_with = "lenient_seq")]
    pub preview: Vec<BookingPreviewItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRollup {
    #[serde(deserialize_with = "lenient")]
    pub total_last_30d: Option<u64>,
    #[serde(deserialize_with = "lenient_map")]
    pub by_status: BTreeMap<String, u64>,
    #[serde(deserialize_with = "lenient")]
    pub total_revenue_30d: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub avg_booking_value: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingPreviewItem {
    #[serde(deserialize_with = "lenient")]
    pub booking_id: String,
    #[serde(deserialize_with = "lenient")]
    pub status: String,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub booking_type: String,
    #[serde(deserialize_with = "lenient")]
    pub total_price: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub currency: String,
    #[serde(deserialize_with = "lenient")]
    pub from_time: String,
    #[serde(deserialize_with = "lenient")]
    pub to_time: String,
    #[serde(deserialize_with = "lenient")]
    pub created: String,
    #[serde(deserialize_with = "lenient")]
    pub customer_name: String,
    #[serde(deserialize_with = "lenient")]
    pub service_provider_name: String,
}

/// One of the three fixed lookback windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Last24Hours,
    Last7Days,
    Last30Days,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Last24Hours, Period::Last7Days, Period::Last30Days];

    pub fn label(self) -> &'static str {
        match self {
            Period::Last24Hours => "24h",
            Period::Last7Days => "7d",
            Period::Last30Days => "30d",
        }
    }
}

impl FromStr for Period {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "24h" | "new_24_hours" | "new_users_24_hrs" => Ok(Period::Last24Hours),
            "7d" | "new_7_days" | "new_users_7_days" => Ok(Period::Last7Days),
            "30d" | "new_30_days" | "new_users_30_days" => Ok(Period::Last30Days),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Customer,
    Artist,
    Business,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Customer, UserType::Artist, UserType::Business];

    pub fn label(self) -> &'static str {
        match self {
            UserType::Customer => "customer",
            UserType::Artist => "artist",
            UserType::Business => "business",
        }
    }
}

impl FromStr for UserType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "customer" => Ok(UserType::Customer),
            "artist" => Ok(UserType::Artist),
            "business" => Ok(UserType::Business),
            _ => Err(()),
        }
    }
}

// Derived views served to the page. Plain records; all remaining formatting
// (currency prefixes, icons, layout) happens client-side.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewView {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub customer: u64,
    pub artist: u64,
    pub business: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPreviewRow {
    pub display_name: String,
    pub user_id: String,
    pub created: String,
    pub occupation: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodBreakdownView {
    pub period: &'static str,
    pub count: u64,
    pub by_type: TypeCounts,
    pub preview: Vec<UserPreviewRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSliceView {
    pub count: u64,
    pub preview: Vec<UserPreviewRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeMetricsView {
    pub user_type: &'static str,
    pub new_24_hours: PeriodSliceView,
    pub new_7_days: PeriodSliceView,
    pub new_30_days: PeriodSliceView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRollup {
    pub country: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub display_name: String,
    pub user_type: &'static str,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryInsightsView {
    pub countries: Vec<String>,
    pub total_new_30d: u64,
    pub per_country_breakdown: Vec<CountryRollup>,
    pub map_points: Vec<MapPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRevenue {
    pub provider: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRowView {
    pub booking_id: String,
    pub status: String,
    pub booking_type: String,
    pub total_price: f64,
    pub from_time: String,
    pub to_time: String,
    pub customer_name: String,
    pub service_provider_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingInsightsView {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_label: Option<String>,
    pub daily_counts: Vec<DailyCount>,
    pub top_providers: Vec<ProviderRevenue>,
    pub preview_rows: Vec<BookingRowView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let payload: Payload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload.user.total_count, 0);
        assert!(payload.by_country.is_empty());
        assert!(payload.booking.last_30_days.preview.is_empty());
    }

    #[test]
    fn malformed_preview_degrades_to_empty() {
        let payload: Payload = serde_json::from_value(json!({
            "user": {
                "total_count": 3,
                "types": {
                    "customer": { "new_7_days": { "count": 2, "preview": "oops" } }
                }
            }
        }))
        .unwrap();
        let slice = &payload.user.types.customer.new_7_days;
        assert_eq!(slice.count, 2);
        assert!(slice.preview.is_empty());
        assert_eq!(payload.user.total_count, 3);
    }

    #[test]
    fn malformed_count_degrades_to_zero() {
        let payload: Payload = serde_json::from_value(json!({
            "user": { "total_count": "many", "active_count": -4, "inactive_count": 7 }
        }))
        .unwrap();
        assert_eq!(payload.user.total_count, 0);
        assert_eq!(payload.user.active_count, 0);
        assert_eq!(payload.user.inactive_count, 7);
    }

    #[test]
    fn malformed_country_entry_degrades_independently() {
        let payload: Payload = serde_json::from_value(json!({
            "by_country": {
                "GH": { "total_last_30_days": 5 },
                "NG": 12
            }
        }))
        .unwrap();
        assert_eq!(payload.by_country["GH"].total_last_30_days, 5);
        assert_eq!(payload.by_country["NG"].total_last_30_days, 0);
    }

    #[test]
    fn aggregate_keys_accept_both_naming_schemes() {
        let payload: Payload = serde_json::from_value(json!({
            "user": {
                "new_users_24_hrs": { "count": 4 },
                "new_7_days": { "count": 9 }
            }
        }))
        .unwrap();
        assert_eq!(
            payload.user.aggregate(Period::Last24Hours).map(|p| p.count),
            Some(4)
        );
        assert_eq!(
            payload.user.aggregate(Period::Last7Days).map(|p| p.count),
            Some(9)
        );
        assert!(payload.user.aggregate(Period::Last30Days).is_none());
    }

    #[test]
    fn period_parses_short_and_wire_tags() {
        assert_eq!("24h".parse::<Period>(), Ok(Period::Last24Hours));
        assert_eq!("new_30_days".parse::<Period>(), Ok(Period::Last30Days));
        assert!("yearly".parse::<Period>().is_err());
    }
}
