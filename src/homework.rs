use crate::error::CheckError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error};

/// Rendered instead of a status when the API reports no homework at all.
pub const NO_HOMEWORK: &str = "Нет домашки для проверки";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn verdict(&self) -> &'static str {
        match *self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(CheckError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        };
        f.write_str(code)
    }
}

/// Checks that the body looks like `{"homeworks": [...]}` and returns the list.
pub fn check_response(response: &Value) -> Result<&[Value], CheckError> {
    let body = response.as_object().ok_or_else(|| {
        error!("api response is not a mapping");
        CheckError::NotAMapping
    })?;
    let homeworks = body.get("homeworks").ok_or_else(|| {
        error!("api response has no `homeworks` key");
        CheckError::MissingHomeworks
    })?;
    match homeworks.as_array() {
        Some(list) => Ok(list.as_slice()),
        None => {
            error!("api response `homeworks` is not a list");
            Err(CheckError::HomeworksNotAList)
        }
    }
}

/// Renders the notification text for the first homework in the list.
///
/// Only the most recent record is looked at; the API returns newest first.
pub fn parse_status(homeworks: &[Value]) -> Result<String, CheckError> {
    let homework = match homeworks.first() {
        Some(homework) => homework,
        None => return Ok(NO_HOMEWORK.to_string()),
    };

    let name = homework
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            error!("homework record has no name");
            CheckError::MissingField("homework_name")
        })?;

    let status = match homework.get("status") {
        Some(Value::String(raw)) => raw.parse::<HomeworkStatus>(),
        Some(other) => Err(CheckError::UnknownStatus(other.to_string())),
        None => Err(CheckError::UnknownStatus("null".to_string())),
    }
    .map_err(|e| {
        error!(error = %e, "homework status is incorrect");
        e
    })?;
    debug!(homework = name, status = %status, "parsed homework status");

    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {verdict}",
        name = name,
        verdict = status.verdict()
    ))
}
