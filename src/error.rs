use reqwest::StatusCode;
use std::fmt;

/// Which part of a polling cycle produced a [`CheckError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or a non-200 answer; the next cycle may succeed.
    Transport,
    /// The body is not shaped like `{"homeworks": [...]}`.
    ResponseShape,
    /// The homework record itself is unusable.
    Domain,
}

/// Failure of the fetch, validate or extract stage.
#[derive(Debug)]
pub enum CheckError {
    Transport(reqwest::Error),
    UnexpectedStatus(StatusCode),
    Decode(reqwest::Error),
    NotAMapping,
    MissingHomeworks,
    MissingField(&'static str),
    HomeworksNotAList,
    UnknownStatus(String),
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::Transport(_) | CheckError::UnexpectedStatus(_) => ErrorKind::Transport,
            CheckError::Decode(_)
            | CheckError::NotAMapping
            | CheckError::HomeworksNotAList
            | CheckError::MissingHomeworks => ErrorKind::ResponseShape,
            CheckError::MissingField(_) | CheckError::UnknownStatus(_) => ErrorKind::Domain,
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Transport(e) => write!(f, "Ошибка при запросе к API: {}", e),
            CheckError::UnexpectedStatus(status) => {
                write!(f, "Ошибка при запросе к API: код ответа {}", status)
            }
            CheckError::Decode(e) => write!(f, "Ответ API не является JSON: {}", e),
            CheckError::NotAMapping => write!(f, "Ответ API не является словарём"),
            CheckError::MissingHomeworks => write!(f, "В ответе API нет ключа `homeworks`"),
            CheckError::MissingField(key) => write!(f, "В домашней работе нет ключа `{}`", key),
            CheckError::HomeworksNotAList => {
                write!(f, "Под ключом `homeworks` домашки приходят не в виде списка")
            }
            CheckError::UnknownStatus(status) => {
                write!(f, "Неизвестный статус домашней работы: {}", status)
            }
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Transport(e) | CheckError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure to deliver a chat message. Only ever logged.
#[derive(Debug)]
pub enum NotifyError {
    Transport(reqwest::Error),
    Rejected(StatusCode),
    NotOk(Option<String>),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Transport(e) => write!(f, "telegram request failed: {}", e),
            NotifyError::Rejected(status) => write!(f, "telegram answered with {}", status),
            NotifyError::NotOk(Some(description)) => {
                write!(f, "telegram refused the message: {}", description)
            }
            NotifyError::NotOk(None) => write!(f, "telegram refused the message"),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Transport(e)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariables(Vec<&'static str>),
    Settings(config::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVariables(names) => write!(
                f,
                "missing required environment variables: {}",
                names.join(", ")
            ),
            ConfigError::Settings(e) => write!(f, "invalid settings: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Settings(e)
    }
}
