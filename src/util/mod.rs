use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a view flips from `on_cleanup`; async work checks it before
/// touching view state.
#[derive(Clone, Debug, Default)]
pub(crate) struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// "Today" as the backend sees it: the UTC calendar date.
pub(crate) fn today_utc() -> NaiveDate {
    now_utc().date_naive()
}

/// `2024-03-01T08:15:00.000Z`, the shape the backend stores activity
/// timestamps in.
pub(crate) fn to_iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse the value of an `<input type="date">`.
pub(crate) fn parse_form_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub(crate) fn format_form_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Browser-local wall-clock time shown in the reflection panel.
pub(crate) fn local_time_label() -> String {
    let d = js_sys::Date::new_0();
    String::from(d.to_locale_time_string("default"))
}
