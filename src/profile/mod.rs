use crate::api::{ApiClient, ProfileUpdates};
use crate::models::{Gender, ProfileRecord};
use crate::state::Session;
use leptos::logging::{error, log};

pub(crate) const DEFAULT_AVATAR_URL: &str =
    "https://cdn1.iconfinder.com/data/icons/content-10/24/user-profile-512.png";

const LOAD_PROFILE_ERROR: &str = "Failed to load profile";
const UPDATE_PROFILE_ERROR: &str = "An error occurred while updating the profile";
const UPDATE_PROFILE_OK: &str = "Profile updated successfully";
const UPLOAD_ERROR: &str = "Failed to upload profile photo";

/// Display-only estimates derived from the profile form.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct HealthMetrics {
    pub bmi: f64,
    pub calories: i64,
}

impl HealthMetrics {
    /// `height` is in centimetres. Inputs are raw form strings; anything
    /// that does not parse to a number counts as missing, and a zero height
    /// does too.
    pub fn compute(weight: &str, height: &str, gender: Gender) -> Self {
        let weight = parse_measure(weight);
        let height_m = parse_measure(height)
            .filter(|cm| *cm != 0.0)
            .map(|cm| cm / 100.0);

        let bmi = match (weight, height_m) {
            (Some(w), Some(h)) => round_to(w / (h * h), 2),
            _ => 0.0,
        };

        let calories = match (weight, gender) {
            (Some(_), Gender::Unset) | (None, _) => 0,
            (Some(w), gender) => (calorie_baseline(gender) - w * 10.0).round() as i64,
        };

        Self { bmi, calories }
    }
}

fn calorie_baseline(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 2500.0,
        _ => 2000.0,
    }
}

fn parse_measure(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Editable copy of the profile, kept as form strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ProfileForm {
    pub name: String,
    pub email: String,
    pub weight: String,
    pub height: String,
    pub gender: Gender,
}

impl ProfileForm {
    pub fn from_record(record: &ProfileRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            weight: record.weight.map(format_measure).unwrap_or_default(),
            height: record.height.map(format_measure).unwrap_or_default(),
            gender: Gender::from_form(record.gender.as_deref().unwrap_or_default()),
        }
    }

    pub fn metrics(&self) -> HealthMetrics {
        HealthMetrics::compute(&self.weight, &self.height, self.gender)
    }

    /// Payload for `/profile/updateProfile`; the derived fields are
    /// recomputed here so the backend always receives consistent values.
    pub fn to_updates(&self) -> ProfileUpdates {
        let metrics = self.metrics();
        ProfileUpdates {
            name: self.name.trim().to_string(),
            gender: self.gender.to_string(),
            weight: self.weight.trim().parse().ok(),
            height: self.height.trim().parse().ok(),
            bmi: metrics.bmi,
            calories: metrics.calories,
        }
    }
}

/// Avatar to show for a stored path: backend-relative paths are resolved
/// against the API origin.
pub(crate) fn avatar_url(client: &ApiClient, avatar: Option<&str>) -> String {
    match avatar.map(str::trim).filter(|a| !a.is_empty()) {
        Some(path) => client.asset_url(path),
        None => DEFAULT_AVATAR_URL.to_string(),
    }
}

pub(crate) async fn load_profile(
    client: &ApiClient,
    session: &Session,
) -> Result<ProfileRecord, String> {
    client
        .get_profile(session.user_id())
        .await
        .and_then(|envelope| envelope.into_data(LOAD_PROFILE_ERROR))
        .map_err(|e| {
            error!("[Profile] Failed to load profile: {e}");
            e.user_message(LOAD_PROFILE_ERROR)
        })?
        .ok_or_else(|| LOAD_PROFILE_ERROR.to_string())
}

/// Returns the confirmation message to show.
pub(crate) async fn save_profile(
    client: &ApiClient,
    session: &Session,
    form: &ProfileForm,
) -> Result<String, String> {
    let envelope = client
        .update_profile(session.user_id(), form.to_updates())
        .await
        .map_err(|e| {
            error!("[Profile] Failed to update profile: {e}");
            UPDATE_PROFILE_ERROR.to_string()
        })?;

    let message = envelope.message.clone();
    envelope.ensure_success(UPDATE_PROFILE_ERROR).map_err(|e| {
        error!("[Profile] Update rejected: {e}");
        e.user_message(UPDATE_PROFILE_ERROR)
    })?;

    log!("[Profile] Saved profile for {}", session.user_id());
    Ok(message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| UPDATE_PROFILE_OK.to_string()))
}

/// Upload a new profile photo; returns the absolute URL of the stored image.
pub(crate) async fn upload_avatar(
    client: &ApiClient,
    session: &Session,
    file_name: String,
    bytes: Vec<u8>,
) -> Result<String, String> {
    let reply = client
        .upload_profile_picture(session.user_id(), file_name, bytes)
        .await
        .map_err(|e| {
            error!("[Profile] Avatar upload failed: {e}");
            UPLOAD_ERROR.to_string()
        })?;

    match reply.avatar {
        Some(path) if reply.success => Ok(avatar_url(client, Some(&path))),
        _ => Err(reply
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UPLOAD_ERROR.to_string())),
    }
}

/// `70.0` -> `"70"`, `72.5` -> `"72.5"`.
fn format_measure(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
