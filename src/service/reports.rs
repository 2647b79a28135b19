use crate::config::TOP_DEVOTEES_LIMIT;
use crate::db::{CountRow, Devotee, TempleStorage};
use crate::error::TempleError;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

/// Report shapes served by `/api/reports/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Last 7 days, oldest first.
    Daily,
    /// Last 12 calendar months, oldest first.
    Monthly,
    /// Last 5 calendar years, oldest first.
    Yearly,
    /// Top 10 devotees by visit count, plus "Others" when fewer exist.
    Devotees,
    /// Selections per item.
    Items,
}

impl ReportKind {
    pub fn parse(selector: &str) -> Option<Self> {
        match selector {
            "daily" => Some(Self::Daily),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            "devotees" => Some(Self::Devotees),
            "items" => Some(Self::Items),
            _ => None,
        }
    }
}

/// Parallel label/value sequences of equal length.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Report {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl Report {
    fn push(&mut self, label: impl Into<String>, value: i64) {
        self.labels.push(label.into());
        self.values.push(value);
    }
}

impl From<Vec<CountRow>> for Report {
    fn from(rows: Vec<CountRow>) -> Self {
        let mut report = Report::default();
        for row in rows {
            report.push(row.label, row.count);
        }
        report
    }
}

/// An inclusive calendar-date range with its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBucket {
    pub label: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

fn out_of_range(what: &str) -> TempleError {
    TempleError::Internal(format!("{what} out of calendar range"))
}

/// The 7 days ending with `today`, oldest first, labelled like `Jan 05`.
pub fn daily_buckets(today: NaiveDate) -> Result<Vec<DateBucket>, TempleError> {
    (0..7u64)
        .rev()
        .map(|back| {
            let day = today
                .checked_sub_days(Days::new(back))
                .ok_or_else(|| out_of_range("day"))?;
            Ok::<_, TempleError>(DateBucket {
                label: day.format("%b %d").to_string(),
                from: day,
                to: day,
            })
        })
        .collect()
}

/// The 12 months ending with the month of `today`, oldest first,
/// labelled like `Jan 2025`.
pub fn monthly_buckets(today: NaiveDate) -> Result<Vec<DateBucket>, TempleError> {
    let this_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .ok_or_else(|| out_of_range("month"))?;
    (0..12u32)
        .rev()
        .map(|back| {
            let first = this_month
                .checked_sub_months(Months::new(back))
                .ok_or_else(|| out_of_range("month"))?;
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .ok_or_else(|| out_of_range("month"))?;
            Ok::<_, TempleError>(DateBucket {
                label: first.format("%b %Y").to_string(),
                from: first,
                to: last,
            })
        })
        .collect()
}

/// The 5 years ending with the year of `today`, oldest first.
pub fn yearly_buckets(today: NaiveDate) -> Result<Vec<DateBucket>, TempleError> {
    let current = today.year();
    (current - 4..=current)
        .map(|year| {
            let from = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| out_of_range("year"))?;
            let to = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| out_of_range("year"))?;
            Ok::<_, TempleError>(DateBucket {
                label: year.to_string(),
                from,
                to,
            })
        })
        .collect()
}

/// Resolve a selector string and build the report. Unknown selectors give
/// an empty report.
pub async fn generate_report(
    storage: &TempleStorage,
    selector: &str,
    today: NaiveDate,
) -> Result<Report, TempleError> {
    match ReportKind::parse(selector) {
        Some(kind) => build_report(storage, kind, today).await,
        None => Ok(Report::default()),
    }
}

pub async fn build_report(
    storage: &TempleStorage,
    kind: ReportKind,
    today: NaiveDate,
) -> Result<Report, TempleError> {
    match kind {
        ReportKind::Daily => count_buckets(storage, daily_buckets(today)?).await,
        ReportKind::Monthly => count_buckets(storage, monthly_buckets(today)?).await,
        ReportKind::Yearly => count_buckets(storage, yearly_buckets(today)?).await,
        ReportKind::Devotees => devotees_report(storage).await,
        ReportKind::Items => Ok(storage.item_distribution().await?.into()),
    }
}

async fn count_buckets(
    storage: &TempleStorage,
    buckets: Vec<DateBucket>,
) -> Result<Report, TempleError> {
    let mut report = Report::default();
    for bucket in buckets {
        let count = storage.count_visits_between(bucket.from, bucket.to).await?;
        report.push(bucket.label, count);
    }
    Ok(report)
}

async fn devotees_report(storage: &TempleStorage) -> Result<Report, TempleError> {
    let (rows, total) = storage.top_devotees(TOP_DEVOTEES_LIMIT).await?;
    let shown = rows.len() as i64;
    let mut report = Report::from(rows);
    if shown < TOP_DEVOTEES_LIMIT {
        let listed: i64 = report.values.iter().sum();
        report.push("Others", total - listed);
    }
    Ok(report)
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub devotees: Vec<Devotee>,
    pub total_visits: i64,
    pub daily_visits: i64,
    pub monthly_visits: i64,
    pub yearly_visits: i64,
}

pub async fn dashboard_summary(
    storage: &TempleStorage,
    today: NaiveDate,
) -> Result<DashboardSummary, TempleError> {
    let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .ok_or_else(|| out_of_range("month"))?;
    let year_start =
        NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or_else(|| out_of_range("year"))?;

    Ok(DashboardSummary {
        devotees: storage.list_devotees().await?,
        total_visits: storage.count_visits().await?,
        daily_visits: storage.count_visits_between(today, today).await?,
        monthly_visits: storage.count_visits_since(month_start).await?,
        yearly_visits: storage.count_visits_since(year_start).await?,
    })
}
