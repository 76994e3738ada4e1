use axum::http::StatusCode;
use thiserror::Error;

/// Rule violations raised by profile and challenge operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("challenge name must not be empty")]
    EmptyName,

    #[error("challenge duration must be at least {min} days")]
    DurationTooShort { min: u32 },

    #[error("challenge duration must be at most {max} days")]
    DurationTooLong { max: u32 },

    #[error("new duration cannot be less than completed days ({completed})")]
    DurationBelowProgress { completed: u32 },

    #[error("challenge '{0}' is already complete")]
    AlreadyFinished(String),

    #[error("you've already marked today's challenge as complete, come back tomorrow")]
    AlreadyMarkedToday,

    #[error("day {day} is outside 1..={duration}")]
    DayOutOfRange { day: u32, duration: u32 },

    #[error("challenge '{0}' not found")]
    ChallengeNotFound(String),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("user '{0}' already exists")]
    UserExists(String),

    #[error("streak goal must be a positive number of days")]
    InvalidGoal,

    #[error("a {0}-day streak goal already exists")]
    DuplicateGoal(u32),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<HubError> for AppError {
    fn from(err: HubError) -> Self {
        let status = match err {
            HubError::ChallengeNotFound(_) | HubError::UserNotFound(_) => StatusCode::NOT_FOUND,
            HubError::UserExists(_)
            | HubError::DuplicateGoal(_)
            | HubError::AlreadyMarkedToday
            | HubError::AlreadyFinished(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_errors_map_to_statuses() {
        let missing: AppError = HubError::ChallengeNotFound("x".into()).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let twice: AppError = HubError::AlreadyMarkedToday.into();
        assert_eq!(twice.status, StatusCode::CONFLICT);

        let short: AppError = HubError::DurationTooShort { min: 10 }.into();
        assert_eq!(short.status, StatusCode::BAD_REQUEST);
        assert_eq!(short.message, "challenge duration must be at least 10 days");
    }
}
