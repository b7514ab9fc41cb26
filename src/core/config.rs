use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub llm_api_hostname: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub system_message: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("TOURMATE_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path.trim_end_matches('/'));
        let llm_api_hostname = env::var("TOURMATE_LLM_HOST")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let llm_api_key =
            env::var("GEMINI_API_KEY").unwrap_or_else(|_| "thiswontworkforgemini".to_string());
        let llm_model =
            env::var("TOURMATE_LLM_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let system_message = env::var("TOURMATE_SYSTEM_MESSAGE").unwrap_or_else(|_| {
            "You are Rafiqi, a friendly travel companion for visitors to Egypt.".to_string()
        });

        Self {
            storage_path,
            db_path,
            llm_api_hostname,
            llm_api_key,
            llm_model,
            system_message,
        }
    }
}

impl AppConfig {
    /// Same as the default config but with storage rooted at
    /// `storage_path` instead of `TOURMATE_STORAGE_PATH`.
    pub fn with_storage_path(storage_path: &str) -> Self {
        Self {
            storage_path: storage_path.to_string(),
            db_path: format!("{}/db", storage_path.trim_end_matches('/')),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_storage_path_sets_db_path() {
        let config = AppConfig::with_storage_path("/tmp/tourmate/");
        assert_eq!(config.storage_path, "/tmp/tourmate/");
        assert_eq!(config.db_path, "/tmp/tourmate/db");
    }
}
