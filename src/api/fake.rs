//! In-memory `Gateway` for workflow tests.

use super::{
    ApiError, ApiErrorKind, ApiResult, ChecklistQuery, CombinedReportRequest,
    CreateChecklistRequest, Envelope, Gateway, GenerateReportRequest, ReportByDateRequest,
    ToggleCompletionRequest,
};
use crate::models::{ActivityRecord, ChecklistType, PriorityTier, Report, Task};
use crate::util::CancelToken;
use std::cell::RefCell;
use std::collections::HashMap;

pub(crate) fn ok<T>(data: T) -> ApiResult<Envelope<T>> {
    Ok(Envelope {
        success: true,
        data: Some(data),
        message: None,
    })
}

pub(crate) fn rejected<T>(message: &str) -> ApiResult<Envelope<T>> {
    Ok(Envelope::rejected(message))
}

pub(crate) fn transport_error<T>() -> ApiResult<Envelope<T>> {
    Err(ApiError {
        kind: ApiErrorKind::Network,
        message: "error sending request: connection refused".to_string(),
    })
}

pub(crate) fn task(id: &str, name: &str, completed: bool) -> Task {
    Task {
        id: id.to_string(),
        name: name.to_string(),
        note: None,
        completed,
        priority: None,
    }
}

type Reply<T> = ApiResult<Envelope<T>>;

pub(crate) struct FakeGateway {
    checklist: HashMap<ChecklistType, Reply<Vec<Task>>>,
    activity: Reply<serde_json::Value>,
    toggle: Reply<serde_json::Value>,
    create: Reply<serde_json::Value>,
    combined: Reply<Report>,
    by_date: Reply<Report>,
    generate: Reply<serde_json::Value>,
    cancel_on_fetch: Option<CancelToken>,

    /// Endpoint paths in call order (checklist fetches as `path:type`).
    calls: RefCell<Vec<String>>,
    pub activities: RefCell<Vec<ActivityRecord>>,
    pub toggles: RefCell<Vec<ToggleCompletionRequest>>,
    pub creates: RefCell<Vec<CreateChecklistRequest>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            checklist: HashMap::new(),
            activity: ok(serde_json::Value::Null),
            toggle: ok(serde_json::Value::Null),
            create: ok(serde_json::Value::Null),
            combined: rejected("No combined report"),
            by_date: rejected("No reports available for the selected date."),
            generate: ok(serde_json::Value::Null),
            cancel_on_fetch: None,
            calls: RefCell::new(vec![]),
            activities: RefCell::new(vec![]),
            toggles: RefCell::new(vec![]),
            creates: RefCell::new(vec![]),
        }
    }

    pub fn with_checklist(mut self, ty: ChecklistType, reply: Reply<Vec<Task>>) -> Self {
        self.checklist.insert(ty, reply);
        self
    }

    pub fn with_activity(mut self, reply: Reply<serde_json::Value>) -> Self {
        self.activity = reply;
        self
    }

    pub fn with_toggle(mut self, reply: Reply<serde_json::Value>) -> Self {
        self.toggle = reply;
        self
    }

    pub fn with_create(mut self, reply: Reply<serde_json::Value>) -> Self {
        self.create = reply;
        self
    }

    pub fn with_combined(mut self, reply: Reply<Report>) -> Self {
        self.combined = reply;
        self
    }

    pub fn with_by_date(mut self, reply: Reply<Report>) -> Self {
        self.by_date = reply;
        self
    }

    pub fn with_generate(mut self, reply: Reply<serde_json::Value>) -> Self {
        self.generate = reply;
        self
    }

    /// Simulates the view being torn down while checklist fetches are in flight.
    pub fn cancelling(mut self, token: CancelToken) -> Self {
        self.cancel_on_fetch = Some(token);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl Gateway for FakeGateway {
    async fn fetch_checklist(
        &self,
        tier: PriorityTier,
        query: &ChecklistQuery,
    ) -> ApiResult<Envelope<Vec<Task>>> {
        self.record(format!("{}:{}", tier.fetch_path(), query.checklist_type));
        if let Some(token) = &self.cancel_on_fetch {
            token.cancel();
        }
        self.checklist
            .get(&query.checklist_type)
            .cloned()
            .unwrap_or_else(|| ok(vec![]))
    }

    async fn toggle_completion(
        &self,
        req: &ToggleCompletionRequest,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.record("/checklist/toggle-completion");
        self.toggles.borrow_mut().push(req.clone());
        self.toggle.clone()
    }

    async fn create_checklist(
        &self,
        req: &CreateChecklistRequest,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.record("/checklist/create");
        self.creates.borrow_mut().push(req.clone());
        self.create.clone()
    }

    async fn create_activity(
        &self,
        record: &ActivityRecord,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.record("/activity/create");
        self.activities.borrow_mut().push(record.clone());
        self.activity.clone()
    }

    async fn get_combined_report(
        &self,
        _req: &CombinedReportRequest,
    ) -> ApiResult<Envelope<Report>> {
        self.record("/report/getCombinedReport");
        self.combined.clone()
    }

    async fn get_report_by_date(&self, _req: &ReportByDateRequest) -> ApiResult<Envelope<Report>> {
        self.record("/report/getReportByDate");
        self.by_date.clone()
    }

    async fn generate_report(
        &self,
        _req: &GenerateReportRequest,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.record("/report/generateReport");
        self.generate.clone()
    }
}
