use frenzy_api::Session;
use log::LevelFilter;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Environment-driven configuration, read once at startup.
#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub api_url: String,
    pub token: Option<String>,
    pub user_id: Option<i64>,
    /// QA preview: reveal locks are bypassed and boards carry a footnote.
    pub qa_mode: bool,
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    pub fn load() -> Self {
        Self {
            api_url: env_nonempty("FRENZY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            token: env_nonempty("FRENZY_TOKEN"),
            user_id: env_nonempty("FRENZY_USER_ID").and_then(|v| v.parse().ok()),
            qa_mode: env_nonempty("FRENZY_QA")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            full_screen: false,
            log_level: env_nonempty("FRENZY_LOG").and_then(|v| parse_log_level(&v)),
        }
    }

    /// Credentials for the private endpoints, when both halves are set.
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            user_id: self.user_id?,
            token: self.token.clone()?,
        })
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// An unrecognized level is ignored rather than fatal; the default filter
// stays in effect.
fn parse_log_level(value: &str) -> Option<LevelFilter> {
    value.parse::<LevelFilter>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_the_usual_names_and_ignores_junk() {
        assert_eq!(parse_log_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_log_level("WARN"), Some(LevelFilter::Warn));
        assert_eq!(parse_log_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_log_level("loud"), None);
    }

    #[test]
    fn session_requires_both_token_and_user_id() {
        let mut settings = AppSettings { token: Some("t".into()), ..AppSettings::default() };
        assert!(settings.session().is_none());
        settings.user_id = Some(9);
        let session = settings.session().unwrap();
        assert_eq!(session.user_id, 9);
        assert_eq!(session.token, "t");
    }
}
