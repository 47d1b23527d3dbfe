use crate::api::{
    ApiError, ApiResult, CombinedReportRequest, Envelope, Gateway, GenerateReportRequest,
    ReportByDateRequest,
};
use crate::models::{ChecklistType, Report};
use crate::state::Session;
use crate::util::format_form_date;
use chrono::NaiveDate;
use leptos::logging::{error, warn};
use std::fmt;
use std::str::FromStr;

pub(crate) const FUTURE_DATE_ERROR: &str =
    "Selected date is in the future. Please choose a valid date.";
pub(crate) const COMBINED_REPORT_ERROR: &str = "Failed to fetch combined report";
pub(crate) const GENERATE_REPORT_ERROR: &str = "Failed to generate report";
pub(crate) const NO_REPORT_ERROR: &str = "No reports available for the selected date.";

/// Checklist filter of the stats view: every type combined, or one type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum StatsCategory {
    #[default]
    All,
    Only(ChecklistType),
}

impl StatsCategory {
    pub fn options() -> Vec<StatsCategory> {
        std::iter::once(StatsCategory::All)
            .chain(ChecklistType::all().into_iter().map(StatsCategory::Only))
            .collect()
    }
}

impl fmt::Display for StatsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsCategory::All => write!(f, "All"),
            StatsCategory::Only(t) => write!(f, "{t}"),
        }
    }
}

impl FromStr for StatsCategory {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(StatsCategory::All)
        } else {
            s.parse().map(StatsCategory::Only)
        }
    }
}

/// Which backend calls a filter change resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatsPlan {
    RejectFuture,
    Combined,
    /// Today's report must be (re)generated before it can be read.
    GenerateThenFetch(ChecklistType),
    Historical(ChecklistType),
}

pub(crate) fn resolve_plan(category: StatsCategory, date: NaiveDate, today: NaiveDate) -> StatsPlan {
    if date > today {
        return StatsPlan::RejectFuture;
    }
    match category {
        StatsCategory::All => StatsPlan::Combined,
        StatsCategory::Only(t) if date == today => StatsPlan::GenerateThenFetch(t),
        StatsCategory::Only(t) => StatsPlan::Historical(t),
    }
}

/// Run the plan for the current filters. The error is the user-visible
/// message; detail is logged.
pub(crate) async fn load_report<G: Gateway>(
    gateway: &G,
    session: &Session,
    category: StatsCategory,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<Report, String> {
    let user_id = session.user_id().to_string();
    let date_str = format_form_date(date);

    match resolve_plan(category, date, today) {
        StatsPlan::RejectFuture => {
            let e = ApiError::validation(FUTURE_DATE_ERROR);
            warn!("[Stats] Not requesting a report for {date_str}: {e}");
            Err(e.user_message(FUTURE_DATE_ERROR))
        }
        StatsPlan::Combined => {
            let req = CombinedReportRequest {
                user_id,
                date: date_str,
            };
            fetch_report(gateway.get_combined_report(&req).await, COMBINED_REPORT_ERROR)
        }
        StatsPlan::GenerateThenFetch(checklist_type) => {
            let req = GenerateReportRequest {
                user_id: user_id.clone(),
                checklist_type,
                date: Some(date_str.clone()),
            };
            gateway
                .generate_report(&req)
                .await
                .and_then(|envelope| envelope.ensure_success(GENERATE_REPORT_ERROR))
                .map_err(|e| {
                    error!("[Stats] Failed to generate {checklist_type} report: {e}");
                    e.user_message(GENERATE_REPORT_ERROR)
                })?;

            fetch_by_date(gateway, user_id, checklist_type, date_str).await
        }
        StatsPlan::Historical(checklist_type) => {
            fetch_by_date(gateway, user_id, checklist_type, date_str).await
        }
    }
}

async fn fetch_by_date<G: Gateway>(
    gateway: &G,
    user_id: String,
    checklist_type: ChecklistType,
    date: String,
) -> Result<Report, String> {
    let req = ReportByDateRequest {
        user_id,
        checklist_type,
        date,
    };
    fetch_report(gateway.get_report_by_date(&req).await, NO_REPORT_ERROR)
}

fn fetch_report(reply: ApiResult<Envelope<Report>>, fallback: &str) -> Result<Report, String> {
    reply
        .and_then(|envelope| envelope.into_data(fallback))
        .map_err(|e| {
            error!("[Stats] Report request failed: {e}");
            e.user_message(fallback)
        })?
        .ok_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{ok, rejected, transport_error, FakeGateway};
    use crate::state::UserId;
    use futures::executor::block_on;

    fn session() -> Session {
        Session::new(UserId::parse("user-1").unwrap())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn report() -> Report {
        Report {
            date: "2024-03-10".to_string(),
            checklist_type: "Morning".to_string(),
            completed_tasks: 3,
            pending_tasks: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_category_options_and_parsing() {
        let options = StatsCategory::options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0], StatsCategory::All);
        assert_eq!("All".parse::<StatsCategory>().ok(), Some(StatsCategory::All));
        assert_eq!(
            "Night".parse::<StatsCategory>().ok(),
            Some(StatsCategory::Only(ChecklistType::Night))
        );
        assert!("Brunch".parse::<StatsCategory>().is_err());
        assert_eq!(StatsCategory::Only(ChecklistType::LateMorning).to_string(), "LateMorning");
    }

    #[test]
    fn test_resolve_plan_paths() {
        let today = day(10);
        let morning = StatsCategory::Only(ChecklistType::Morning);
        assert_eq!(resolve_plan(StatsCategory::All, day(11), today), StatsPlan::RejectFuture);
        assert_eq!(resolve_plan(morning, day(11), today), StatsPlan::RejectFuture);
        assert_eq!(resolve_plan(StatsCategory::All, today, today), StatsPlan::Combined);
        assert_eq!(resolve_plan(StatsCategory::All, day(1), today), StatsPlan::Combined);
        assert_eq!(
            resolve_plan(morning, today, today),
            StatsPlan::GenerateThenFetch(ChecklistType::Morning)
        );
        assert_eq!(
            resolve_plan(morning, day(9), today),
            StatsPlan::Historical(ChecklistType::Morning)
        );
    }

    #[test]
    fn test_future_date_issues_no_request() {
        let gateway = FakeGateway::new();
        let err = block_on(load_report(
            &gateway,
            &session(),
            StatsCategory::Only(ChecklistType::Evening),
            day(12),
            day(10),
        ))
        .expect_err("future date should be rejected");
        assert_eq!(err, FUTURE_DATE_ERROR);
        assert!(gateway.calls().is_empty());
    }

    #[test]
    fn test_all_uses_only_combined_endpoint() {
        let gateway = FakeGateway::new().with_combined(ok(report()));
        let got = block_on(load_report(&gateway, &session(), StatsCategory::All, day(10), day(10)))
            .expect("combined report should load");
        assert_eq!(got.completed_tasks, 3);
        assert_eq!(gateway.calls(), vec!["/report/getCombinedReport"]);
    }

    #[test]
    fn test_today_generates_before_fetching() {
        let gateway = FakeGateway::new().with_by_date(ok(report()));
        block_on(load_report(
            &gateway,
            &session(),
            StatsCategory::Only(ChecklistType::Morning),
            day(10),
            day(10),
        ))
        .expect("report should load");
        assert_eq!(
            gateway.calls(),
            vec!["/report/generateReport", "/report/getReportByDate"]
        );
    }

    #[test]
    fn test_failed_generation_skips_fetch() {
        let gateway = FakeGateway::new()
            .with_generate(rejected("No checklist for today"))
            .with_by_date(ok(report()));
        let err = block_on(load_report(
            &gateway,
            &session(),
            StatsCategory::Only(ChecklistType::Morning),
            day(10),
            day(10),
        ))
        .expect_err("generation failure should surface");
        assert_eq!(err, "No checklist for today");
        assert_eq!(gateway.calls(), vec!["/report/generateReport"]);
    }

    #[test]
    fn test_past_date_fetches_history_without_generation() {
        let gateway = FakeGateway::new().with_by_date(ok(report()));
        block_on(load_report(
            &gateway,
            &session(),
            StatsCategory::Only(ChecklistType::Night),
            day(3),
            day(10),
        ))
        .expect("historical report should load");
        assert_eq!(gateway.calls(), vec!["/report/getReportByDate"]);
    }

    #[test]
    fn test_missing_report_uses_fallback_message() {
        let gateway = FakeGateway::new().with_by_date(transport_error());
        let err = block_on(load_report(
            &gateway,
            &session(),
            StatsCategory::Only(ChecklistType::Night),
            day(3),
            day(10),
        ))
        .expect_err("should fail");
        assert_eq!(err, NO_REPORT_ERROR);
    }
}
