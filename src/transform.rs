//! Pure projections from a [`Payload`] snapshot to the derived views the
//! dashboard serves. Every function here is total: missing or malformed
//! input has already been normalized to zeros/empties by the model layer,
//! and nothing in this module can fail or mutate the snapshot.

use crate::models::{
    BookingInsightsView, BookingPreviewItem, BookingRowView, CountryInsightsView, CountryRollup,
    CountrySlice, DailyCount, MapPoint, OverviewView, Payload, Period, PeriodBreakdownView,
    PeriodSliceView, PeriodStats, ProviderRevenue, TypeCounts, TypeMetricsView, UserPreviewItem,
    UserPreviewRow, UserType,
};
use std::collections::BTreeMap;

const ID_TRUNCATE_LEN: usize = 8;
const DATE_LEN: usize = 10;
const DATETIME_LEN: usize = 19;
const TOP_PROVIDER_LIMIT: usize = 5;
const UNKNOWN_PROVIDER: &str = "Unknown";

pub fn overview(payload: &Payload) -> OverviewView {
    OverviewView {
        total: payload.user.total_count,
        active: payload.user.active_count,
        inactive: payload.user.inactive_count,
    }
}

/// One lookback window across all user types. The period-level count and
/// preview come from the user-level aggregate block when the API sent one;
/// otherwise the count falls back to the per-type sum and the preview to the
/// per-type previews concatenated in fixed type order. Source order is
/// preserved either way.
pub fn period_breakdown(payload: &Payload, period: Period) -> PeriodBreakdownView {
    let user = &payload.user;
    let by_type = TypeCounts {
        customer: user.types.customer.period(period).count,
        artist: user.types.artist.period(period).count,
        business: user.types.business.period(period).count,
    };
    let type_sum = by_type.customer + by_type.artist + by_type.business;

    let (count, preview) = match user.aggregate(period) {
        Some(aggregate) => (aggregate.count, project_preview(&aggregate.preview)),
        None => {
            let mut merged = Vec::new();
            for user_type in UserType::ALL {
                merged.extend(project_preview(&user.type_stats(user_type).period(period).preview));
            }
            (type_sum, merged)
        }
    };

    PeriodBreakdownView {
        period: period.label(),
        count,
        by_type,
        preview,
    }
}

/// All three lookback windows for a single user type.
pub fn type_metrics(payload: &Payload, user_type: UserType) -> TypeMetricsView {
    let stats = payload.user.type_stats(user_type);
    TypeMetricsView {
        user_type: user_type.label(),
        new_24_hours: project_slice(&stats.new_24_hours),
        new_7_days: project_slice(&stats.new_7_days),
        new_30_days: project_slice(&stats.new_30_days),
    }
}

pub fn country_insights(payload: &Payload) -> CountryInsightsView {
    let source = country_source(payload);

    let countries: Vec<String> = source.keys().cloned().collect();
    let total_new_30d = source.values().map(|slice| slice.total_last_30_days).sum();

    let mut per_country_breakdown: Vec<CountryRollup> = source
        .iter()
        .map(|(country, slice)| CountryRollup {
            country: country.clone(),
            total: slice.customer.count + slice.artist.count + slice.business.count,
        })
        .collect();
    // Stable sort keeps input order between equal totals.
    per_country_breakdown.sort_by(|a, b| b.total.cmp(&a.total));

    let mut map_points = Vec::new();
    for (country, slice) in source {
        for user_type in UserType::ALL {
            for item in &slice.type_slice(user_type).preview {
                if let (Some(latitude), Some(longitude)) = (item.latitude, item.longitude) {
                    map_points.push(MapPoint {
                        display_name: item.display_name.clone(),
                        user_type: user_type.label(),
                        country: country.clone(),
                        latitude,
                        longitude,
                    });
                }
            }
        }
    }

    CountryInsightsView {
        countries,
        total_new_30d,
        per_country_breakdown,
        map_points,
    }
}

pub fn booking_insights(payload: &Payload) -> BookingInsightsView {
    let window = &payload.booking.last_30_days;
    let insights = &window.insights;

    // Fallback keeps the dashboard populated when the aggregate is missing.
    let total = insights
        .total_last_30d
        .unwrap_or(window.preview.len() as u64);

    let mut per_day: BTreeMap<String, u64> = BTreeMap::new();
    for item in &window.preview {
        let day = booking_day(item);
        if day.is_empty() {
            continue;
        }
        *per_day.entry(day).or_default() += 1;
    }
    let daily_counts = per_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();

    BookingInsightsView {
        total,
        by_status: insights.by_status.clone(),
        revenue: insights.total_revenue_30d,
        avg_value: insights.avg_booking_value,
        currency_label: currency_label(&window.preview),
        daily_counts,
        top_providers: top_providers(&window.preview),
        preview_rows: window.preview.iter().map(booking_row).collect(),
    }
}

/// First eight characters plus an ellipsis; shorter values pass through
/// unchanged. Counts characters, not bytes, so multi-byte ids cannot split.
pub fn truncate_id(value: &str) -> String {
    if value.chars().count() <= ID_TRUNCATE_LEN {
        value.to_owned()
    } else {
        let mut head: String = value.chars().take(ID_TRUNCATE_LEN).collect();
        head.push('…');
        head
    }
}

/// Date portion of an ISO-8601 timestamp (`YYYY-MM-DD`).
pub fn date_only(value: &str) -> String {
    clip(value, DATE_LEN)
}

/// Date plus time, sub-second and timezone suffix dropped.
pub fn datetime_label(value: &str) -> String {
    clip(value, DATETIME_LEN)
}

fn clip(value: &str, limit: usize) -> String {
    value.chars().take(limit).collect()
}

/// `user.by_country` wins; the top-level map is a fallback for older
/// payload shapes that carried it beside `user`.
fn country_source(payload: &Payload) -> &BTreeMap<String, CountrySlice> {
    if payload.user.by_country.is_empty() {
        &payload.by_country
    } else {
        &payload.user.by_country
    }
}

fn project_slice(stats: &PeriodStats) -> PeriodSliceView {
    PeriodSliceView {
        count: stats.count,
        preview: project_preview(&stats.preview),
    }
}

fn project_preview(items: &[UserPreviewItem]) -> Vec<UserPreviewRow> {
    items.iter().map(preview_row).collect()
}

fn preview_row(item: &UserPreviewItem) -> UserPreviewRow {
    let id = if item.user_id.is_empty() {
        &item.account_id
    } else {
        &item.user_id
    };
    UserPreviewRow {
        display_name: item.display_name.clone(),
        user_id: truncate_id(id),
        created: date_only(&item.created),
        occupation: item.occupation.clone(),
        slug: item.slug.clone(),
    }
}

fn booking_row(item: &BookingPreviewItem) -> BookingRowView {
    BookingRowView {
        booking_id: truncate_id(&item.booking_id),
        status: item.status.clone(),
        booking_type: item.booking_type.clone(),
        total_price: item.total_price.unwrap_or(0.0),
        from_time: datetime_label(&item.from_time),
        to_time: datetime_label(&item.to_time),
        customer_name: item.customer_name.clone(),
        service_provider_name: item.service_provider_name.clone(),
    }
}

/// Day a booking lands on for the daily series: `from_time` first, then
/// `created`. Items with neither have no place on a date axis and are
/// skipped.
fn booking_day(item: &BookingPreviewItem) -> String {
    if item.from_time.is_empty() {
        date_only(&item.created)
    } else {
        date_only(&item.from_time)
    }
}

/// Revenue per provider, descending, capped at five. The running vector
/// keeps first-seen order so equal revenues stay in input order through the
/// stable sort.
fn top_providers(preview: &[BookingPreviewItem]) -> Vec<ProviderRevenue> {
    let mut rollup: Vec<ProviderRevenue> = Vec::new();
    for item in preview {
        let provider = if item.service_provider_name.is_empty() {
            UNKNOWN_PROVIDER
        } else {
            item.service_provider_name.as_str()
        };
        let price = item.total_price.unwrap_or(0.0);
        match rollup.iter_mut().find(|entry| entry.provider == provider) {
            Some(entry) => entry.revenue += price,
            None => rollup.push(ProviderRevenue {
                provider: provider.to_owned(),
                revenue: price,
            }),
        }
    }
    rollup.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rollup.truncate(TOP_PROVIDER_LIMIT);
    rollup
}

/// A single label only when every item that names a currency agrees on it.
fn currency_label(preview: &[BookingPreviewItem]) -> Option<String> {
    let mut label: Option<&str> = None;
    for item in preview {
        if item.currency.is_empty() {
            continue;
        }
        match label {
            None => label = Some(&item.currency),
            Some(seen) if seen == item.currency => {}
            Some(_) => return None,
        }
    }
    label.map(str::to_owned)
}
