use crate::analytics::{self, StreakGoal};
use crate::challenges;
use crate::errors::{AppError, HubError};
use crate::export;
use crate::history::{self, ChallengeNoteEntry, ReflectionEntry};
use crate::models::{
    AnalyticsQuery, AnalyticsResponse, Challenge, CompletionResponse, CreateUserRequest,
    DateRangeQuery, DurationRequest, EditLogRequest, ExportQuery, MarkCompleteRequest,
    NewChallengeRequest, PasswordCheckRequest, ReflectionRequest, StreakGoalRequest, UserDocument,
    UserPatch, UserProfile,
};
use crate::password::{self, PasswordCheck};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::{render_dashboard, render_landing, stylesheet};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;

pub async fn index() -> Html<String> {
    Html(render_landing())
}

pub async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], stylesheet())
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Html<String>, AppError> {
    let mut data = state.data.lock().await;
    let profile = data
        .users
        .get(&uid)
        .map(|doc| doc.profile.clone())
        .ok_or_else(|| HubError::UserNotFound(uid.clone()))?;

    let prefs = data.preferences.entry(uid.clone()).or_default();
    let first_visit = !prefs.has_visited_dashboard;
    if first_visit {
        prefs.has_visited_dashboard = true;
        persist_data(&state.data_path, &data).await?;
    }

    Ok(Html(render_dashboard(
        &uid,
        &profile,
        Utc::now(),
        first_visit,
    )))
}

pub async fn check_password(Json(payload): Json<PasswordCheckRequest>) -> Json<PasswordCheck> {
    Json(password::check(&payload.password))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let uid = payload.uid.trim().to_string();
    if uid.is_empty() {
        return Err(AppError::bad_request("uid must not be empty"));
    }

    let mut data = state.data.lock().await;
    if data.users.contains_key(&uid) {
        return Err(HubError::UserExists(uid).into());
    }

    let profile = UserProfile {
        name: payload.name.trim().to_string(),
        ..Default::default()
    };
    data.users
        .insert(uid.clone(), UserDocument::new(profile.clone(), Utc::now()));
    persist_data(&state.data_path, &data).await?;

    info!(%uid, "created user document");
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let data = state.data.lock().await;
    let doc = data.users.get(&uid).ok_or(HubError::UserNotFound(uid))?;
    Ok(Json(doc.profile.clone()))
}

pub async fn patch_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(mut patch): Json<UserPatch>,
) -> Result<Json<UserProfile>, AppError> {
    if let Some(name) = patch.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request("name must not be empty"));
        }
    }
    if let Some(bad) = patch
        .challenges
        .iter()
        .flatten()
        .find(|c| c.completed_days > c.duration)
    {
        return Err(AppError::bad_request(format!(
            "challenge '{}' has more completed days than its duration",
            bad.id
        )));
    }

    let mut data = state.data.lock().await;
    let doc = data
        .users
        .get_mut(&uid)
        .ok_or_else(|| HubError::UserNotFound(uid.clone()))?;
    doc.apply(patch, Utc::now());
    let profile = doc.profile.clone();
    persist_data(&state.data_path, &data).await?;

    info!(%uid, "updated user document");
    Ok(Json(profile))
}

pub async fn reset_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .update_data(&uid, |data| {
            if let Some(prefs) = data.preferences.get_mut(&uid) {
                prefs.has_visited_dashboard = false;
            }
            let doc = data
                .users
                .get_mut(&uid)
                .ok_or_else(|| HubError::UserNotFound(uid.clone()))?;
            challenges::reset(&mut doc.profile);
            doc.updated_at = Utc::now();
            Ok(doc.profile.clone())
        })
        .await?;
    info!(%uid, "reset user data");
    Ok(Json(profile))
}

pub async fn add_challenge(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(payload): Json<NewChallengeRequest>,
) -> Result<(StatusCode, Json<Challenge>), AppError> {
    let challenge = state.update_profile(&uid, |profile| {
        challenges::add_challenge(profile, &payload.name, payload.duration, Utc::now())
    })
    .await?;
    info!(%uid, id = %challenge.id, duration = challenge.duration, "added challenge");
    Ok((StatusCode::CREATED, Json(challenge)))
}

pub async fn delete_challenge(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.update_profile(&uid, |profile| challenges::delete_challenge(profile, &id)).await?;
    info!(%uid, %id, "deleted challenge");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_challenge(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
    Json(payload): Json<MarkCompleteRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let (challenge, milestone) = state.update_profile(&uid, |profile| {
        challenges::mark_complete(profile, &id, &payload.note, Utc::now())
    })
    .await?;

    if let Some(event) = &milestone {
        info!(%uid, %id, milestone = %event.title, "milestone reached");
    }
    Ok(Json(CompletionResponse {
        progress: challenges::progress(&challenge),
        challenge,
        milestone,
    }))
}

pub async fn edit_log(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
    Json(payload): Json<EditLogRequest>,
) -> Result<Json<Challenge>, AppError> {
    let challenge = state.update_profile(&uid, |profile| {
        challenges::edit_log(profile, &id, payload.day, &payload.note)
    })
    .await?;
    Ok(Json(challenge))
}

pub async fn delete_log(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
) -> Result<Json<Challenge>, AppError> {
    let challenge =
        state.update_profile(&uid, |profile| challenges::delete_latest_log(profile, &id)).await?;
    info!(%uid, %id, completed = challenge.completed_days, "deleted latest log");
    Ok(Json(challenge))
}

pub async fn update_duration(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
    Json(payload): Json<DurationRequest>,
) -> Result<Json<Challenge>, AppError> {
    let challenge = state.update_profile(&uid, |profile| {
        challenges::update_duration(profile, &id, payload.duration)
    })
    .await?;
    Ok(Json(challenge))
}

pub async fn put_reflection(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(payload): Json<ReflectionRequest>,
) -> Result<Json<ReflectionEntry>, AppError> {
    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());
    state.update_profile(&uid, |profile| {
        challenges::set_reflection(profile, date, &payload.note);
        Ok(())
    })
    .await?;
    Ok(Json(ReflectionEntry {
        date,
        note: payload.note,
    }))
}

pub async fn reflection_history(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<ReflectionEntry>>, AppError> {
    let profile = state.profile(&uid).await?;
    Ok(Json(history::reflections(&profile, &range)))
}

pub async fn challenge_history(
    State(state): State<AppState>,
    Path((uid, id)): Path<(String, String)>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<ChallengeNoteEntry>>, AppError> {
    let profile = state.profile(&uid).await?;
    let challenge = challenges::find(&profile, &id)?;
    Ok(Json(history::challenge_notes(challenge, &range)))
}

pub async fn get_analytics(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let mut data = state.data.lock().await;
    let doc = data
        .users
        .get(&uid)
        .ok_or_else(|| HubError::UserNotFound(uid.clone()))?;
    let report = analytics::build_report(&doc.profile.challenges, query.range, query.compare);

    let prefs = data.preferences.entry(uid.clone()).or_default();
    let newly_achieved = analytics::evaluate_goals(&mut prefs.streak_goals, report.streaks.current_streak);
    let goals = prefs.streak_goals.clone();
    if !newly_achieved.is_empty() {
        info!(%uid, goals = ?newly_achieved, "streak goals achieved");
        persist_data(&state.data_path, &data).await?;
    }

    Ok(Json(AnalyticsResponse {
        next_goal: analytics::next_goal(&goals),
        report,
        goals,
        newly_achieved,
    }))
}

pub async fn export_analytics(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let profile = state.profile(&uid).await?;
    let report = analytics::build_report(&profile.challenges, query.range, query.compare);
    let body = export::render(&report, query.format).map_err(AppError::internal)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::file_name(query.format, report.generated_on)
    );

    info!(%uid, format = query.format.extension(), "exported analytics");
    Ok((
        [
            (header::CONTENT_TYPE, query.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn list_goals(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<StreakGoal>>, AppError> {
    let data = state.data.lock().await;
    if !data.users.contains_key(&uid) {
        return Err(HubError::UserNotFound(uid).into());
    }
    let goals = data
        .preferences
        .get(&uid)
        .map(|prefs| prefs.streak_goals.clone())
        .unwrap_or_else(StreakGoal::defaults);
    Ok(Json(goals))
}

pub async fn add_goal(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(payload): Json<StreakGoalRequest>,
) -> Result<(StatusCode, Json<Vec<StreakGoal>>), AppError> {
    let mut data = state.data.lock().await;
    if !data.users.contains_key(&uid) {
        return Err(HubError::UserNotFound(uid).into());
    }
    let prefs = data.preferences.entry(uid.clone()).or_default();
    analytics::add_goal(&mut prefs.streak_goals, payload.days)?;
    let goals = prefs.streak_goals.clone();
    persist_data(&state.data_path, &data).await?;

    info!(%uid, days = payload.days, "added streak goal");
    Ok((StatusCode::CREATED, Json(goals)))
}
