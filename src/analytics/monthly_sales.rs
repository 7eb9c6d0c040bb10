use super::{AnalyticsError, AnalyticsResult, to_amount};
use crate::database::entities::orders::{STATUS_DELIVERED, STATUS_SHIPPED};
use crate::database::{DatabaseManager, OrderDetails, OrderQuery};
use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use utoipa::ToSchema;

/// Key used in `ordersByStatus` for orders without a status
const UNKNOWN_STATUS: &str = "unknown";

/// Calendar range covered by a sales report: a whole year, or one month of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: Option<u32>,
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(year: i32, month: Option<u32>) -> AnalyticsResult<Self> {
        let invalid_year = || AnalyticsError::InvalidInput(format!("Invalid year: {year}"));

        let (start, end) = match month {
            Some(month) => {
                if !(1..=12).contains(&month) {
                    return Err(AnalyticsError::InvalidInput(
                        "Month must be between 1 and 12".to_string(),
                    ));
                }
                let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid_year)?;
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.checked_sub_days(Days::new(1)))
                    .ok_or_else(invalid_year)?;
                (start, end)
            }
            None => (
                NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid_year)?,
                NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid_year)?,
            ),
        };

        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// First day of the period
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the report covers the whole year
    pub fn is_full_year(&self) -> bool {
        self.month.is_none()
    }
}

/// Sales totals for a period
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    /// Total number of orders in the period
    pub total_orders: u64,
    /// Total revenue for the period
    pub total_revenue: f64,
    /// Count of orders by their status
    pub orders_by_status: BTreeMap<String, u64>,
    /// Monthly breakdown, present only for whole-year reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_breakdown: Option<Vec<MonthlySales>>,
}

/// Sales totals for one month of a yearly report
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// The month number (1-12)
    pub month: u32,
    /// Total number of orders in this month
    pub total_orders: u64,
    /// Total revenue for this month
    pub total_revenue: f64,
    pub orders_by_status: StatusBreakdown,
}

/// Delivered/shipped counts within a month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusBreakdown {
    /// Number of delivered orders
    pub delivered: u64,
    /// Number of shipped orders
    pub shipped: u64,
}

/// Shipped and delivered orders of a year or month, summarized.
pub async fn monthly_sales_report(
    database: &dyn DatabaseManager,
    year: i32,
    month: Option<u32>,
) -> AnalyticsResult<SalesReport> {
    let period = ReportPeriod::new(year, month)?;

    let query = OrderQuery {
        start_date: Some(period.start()),
        end_date: Some(period.end()),
        statuses: Some(vec![
            STATUS_SHIPPED.to_string(),
            STATUS_DELIVERED.to_string(),
        ]),
        customer_ids: None,
    };
    let orders = database.orders().find_with_details(&query).await?;

    debug!(
        year,
        month = ?month,
        orders = orders.len(),
        "Building sales report"
    );

    Ok(summarize(&orders, period.is_full_year()))
}

#[derive(Default)]
struct MonthAccumulator {
    total_orders: u64,
    total_revenue: Decimal,
    orders_by_status: StatusBreakdown,
}

fn summarize(orders: &[OrderDetails], with_breakdown: bool) -> SalesReport {
    let mut total_revenue = Decimal::ZERO;
    let mut orders_by_status: BTreeMap<String, u64> = BTreeMap::new();
    // Months in first-occurrence order; at most twelve entries
    let mut months: Vec<(u32, MonthAccumulator)> = Vec::new();

    for details in orders {
        let order_total = details.total();
        total_revenue += order_total;

        let status = details.order.status.as_deref().unwrap_or(UNKNOWN_STATUS);
        *orders_by_status.entry(status.to_string()).or_default() += 1;

        if !with_breakdown {
            continue;
        }

        let month = details.order.order_date.map(|d| d.month()).unwrap_or(1);
        let index = match months.iter().position(|(m, _)| *m == month) {
            Some(index) => index,
            None => {
                months.push((month, MonthAccumulator::default()));
                months.len() - 1
            }
        };
        let entry = &mut months[index].1;
        entry.total_orders += 1;
        entry.total_revenue += order_total;
        match status.to_lowercase().as_str() {
            STATUS_DELIVERED => entry.orders_by_status.delivered += 1,
            STATUS_SHIPPED => entry.orders_by_status.shipped += 1,
            _ => {}
        }
    }

    let monthly_breakdown = with_breakdown.then(|| {
        months
            .into_iter()
            .map(|(month, acc)| MonthlySales {
                month,
                total_orders: acc.total_orders,
                total_revenue: to_amount(acc.total_revenue),
                orders_by_status: acc.orders_by_status,
            })
            .collect()
    });

    SalesReport {
        total_orders: orders.len() as u64,
        total_revenue: to_amount(total_revenue),
        orders_by_status,
        monthly_breakdown,
    }
}
