use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub graphql_url: String,
    pub environment: String,
    pub log_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            graphql_url: env::var("GRAPHQL_URL")
                .unwrap_or_else(|_| "http://localhost:4000/graphql".to_string()),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "dev".to_string()),
            log_file: env::var("LOG_FILE")
                .unwrap_or_else(|_| "todo-tui.log".to_string()),
        })
    }
}
