use crate::models::{ActivityRecord, ChecklistType, PriorityTier, ProfileRecord, Report, Task};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[cfg(test)]
pub(crate) mod fake;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// Request never produced a response.
    Network,
    Http,
    Parse,
    /// The backend answered `success: false`.
    Rejected,
    /// Caught locally before any request was sent.
    Validation,
    /// The owning view went away while the request was in flight.
    Cancelled,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Rejected,
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Validation,
            message: message.into(),
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self {
            kind: ApiErrorKind::Cancelled,
            message: "Request cancelled".to_string(),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.kind == ApiErrorKind::Cancelled
    }

    /// Text shown to the user. Backend and local validation messages are
    /// shown verbatim; transport detail goes to the log only.
    pub(crate) fn user_message(&self, fallback: &str) -> String {
        match self.kind {
            ApiErrorKind::Rejected | ApiErrorKind::Validation => self.message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // Runtime `window.ENV.API_URL` (or `api_url`) wins over the
        // build-time BACKEND_URL.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self { api_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            api_url: Self::build_time_default().to_string(),
        }
    }

    pub fn build_time_default() -> &'static str {
        option_env!("BACKEND_URL").unwrap_or(DEFAULT_API_URL)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Response envelope shared by every backend endpoint.
#[derive(Deserialize, Clone, Debug)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    #[cfg(test)]
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// `Ok(data)` on success, otherwise the backend message (or `fallback`).
    pub(crate) fn into_data(self, fallback: &str) -> ApiResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::rejected(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }

    pub(crate) fn ensure_success(self, fallback: &str) -> ApiResult<()> {
        self.into_data(fallback).map(|_| ())
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChecklistQuery {
    pub user_id: String,
    pub checklist_type: ChecklistType,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToggleCompletionRequest {
    pub user_id: String,
    pub checklist_type: ChecklistType,
    pub task_id: String,
    pub is_completed: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub(crate) struct CustomItem {
    pub name: String,
    pub note: String,
    pub completed: bool,
    pub priority: String,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateChecklistRequest {
    pub user_id: String,
    pub checklist_type: ChecklistType,
    pub custom_items: Vec<CustomItem>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CombinedReportRequest {
    pub user_id: String,
    pub date: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportByDateRequest {
    pub user_id: String,
    pub checklist_type: ChecklistType,
    pub date: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateReportRequest {
    pub user_id: String,
    pub checklist_type: ChecklistType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct ProfileQuery {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Editable profile fields. Numbers that do not parse are sent as `null`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub(crate) struct ProfileUpdates {
    pub name: String,
    pub gender: String,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    pub calories: i64,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct UpdateProfileRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub updates: ProfileUpdates,
}

/// The avatar endpoint reports the stored path at the top level rather than
/// under `data`.
#[derive(Deserialize, Clone, Debug)]
pub(crate) struct AvatarUploadResponse {
    #[serde(default)]
    pub success: bool,
    pub avatar: Option<String>,
    pub message: Option<String>,
}

/// Backend operations used by the checklist and stats workflows.
///
/// Transport problems come back as `Err`; a delivered response (2xx or not)
/// comes back as an `Envelope` whose `success` flag callers inspect.
pub(crate) trait Gateway {
    async fn fetch_checklist(
        &self,
        tier: PriorityTier,
        query: &ChecklistQuery,
    ) -> ApiResult<Envelope<Vec<Task>>>;

    async fn toggle_completion(
        &self,
        req: &ToggleCompletionRequest,
    ) -> ApiResult<Envelope<serde_json::Value>>;

    async fn create_checklist(
        &self,
        req: &CreateChecklistRequest,
    ) -> ApiResult<Envelope<serde_json::Value>>;

    async fn create_activity(
        &self,
        record: &ActivityRecord,
    ) -> ApiResult<Envelope<serde_json::Value>>;

    async fn get_combined_report(&self, req: &CombinedReportRequest)
        -> ApiResult<Envelope<Report>>;

    async fn get_report_by_date(&self, req: &ReportByDateRequest) -> ApiResult<Envelope<Report>>;

    async fn generate_report(
        &self,
        req: &GenerateReportRequest,
    ) -> ApiResult<Envelope<serde_json::Value>>;
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    /// Absolute URL for a path the backend hands out (e.g. avatars).
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn request_envelope<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &impl Serialize,
    ) -> ApiResult<Envelope<T>> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);

        let res = client
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        let text = res.text().await.map_err(ApiError::network)?;
        Self::parse_envelope(status, &text)
    }

    /// A non-2xx reply with a JSON body becomes a failed envelope. A body
    /// that is not an envelope is a parse error whatever the status.
    pub(crate) fn parse_envelope<T: DeserializeOwned>(
        status: reqwest::StatusCode,
        body: &str,
    ) -> ApiResult<Envelope<T>> {
        let mut envelope = serde_json::from_str::<Envelope<T>>(body)
            .map_err(|e| ApiError::parse(format!("{status}: {e}")))?;
        if !status.is_success() {
            envelope.success = false;
        }
        Ok(envelope)
    }

    pub async fn get_profile(&self, user_id: &str) -> ApiResult<Envelope<ProfileRecord>> {
        self.request_envelope(
            reqwest::Method::POST,
            "/profile/getprofile",
            &ProfileQuery {
                id: user_id.to_string(),
            },
        )
        .await
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        updates: ProfileUpdates,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.request_envelope(
            reqwest::Method::PUT,
            "/profile/updateProfile",
            &UpdateProfileRequest {
                id: user_id.to_string(),
                updates,
            },
        )
        .await
    }

    pub async fn upload_profile_picture(
        &self,
        user_id: &str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> ApiResult<AvatarUploadResponse> {
        let form = reqwest::multipart::Form::new()
            .part(
                "profilePicture",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("_id", user_id.to_string());

        let client = reqwest::Client::new();
        let res = client
            .post(format!("{}/profile/uploadProfilePicture", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Failed to upload profile photo"))
        }
    }
}

impl Gateway for ApiClient {
    async fn fetch_checklist(
        &self,
        tier: PriorityTier,
        query: &ChecklistQuery,
    ) -> ApiResult<Envelope<Vec<Task>>> {
        self.request_envelope(reqwest::Method::POST, tier.fetch_path(), query)
            .await
    }

    async fn toggle_completion(
        &self,
        req: &ToggleCompletionRequest,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.request_envelope(reqwest::Method::PUT, "/checklist/toggle-completion", req)
            .await
    }

    async fn create_checklist(
        &self,
        req: &CreateChecklistRequest,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.request_envelope(reqwest::Method::POST, "/checklist/create", req)
            .await
    }

    async fn create_activity(
        &self,
        record: &ActivityRecord,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.request_envelope(reqwest::Method::POST, "/activity/create", record)
            .await
    }

    async fn get_combined_report(
        &self,
        req: &CombinedReportRequest,
    ) -> ApiResult<Envelope<Report>> {
        self.request_envelope(reqwest::Method::POST, "/report/getCombinedReport", req)
            .await
    }

    async fn get_report_by_date(&self, req: &ReportByDateRequest) -> ApiResult<Envelope<Report>> {
        self.request_envelope(reqwest::Method::POST, "/report/getReportByDate", req)
            .await
    }

    async fn generate_report(
        &self,
        req: &GenerateReportRequest,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        self.request_envelope(reqwest::Method::POST, "/report/generateReport", req)
            .await
    }
}
