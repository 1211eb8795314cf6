use std::env;

#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: String,
    pub frontend_origin: Option<String>,
    pub twilio: TwilioConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv()?;
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "debug".into());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let frontend_origin = env::var("FRONTEND_ORIGIN").ok();
        let account_sid =
            env::var("TWILIO_ACCOUNT_SID").expect("TWILIO_ACCOUNT_SID should be provided");
        let auth_token =
            env::var("TWILIO_AUTH_TOKEN").expect("TWILIO_AUTH_TOKEN should be provided");
        let from_number =
            env::var("TWILIO_FROM_NUMBER").expect("TWILIO_FROM_NUMBER should be provided");

        Ok(Self {
            database_url,
            rust_log,
            bind_addr,
            frontend_origin,
            twilio: TwilioConfig {
                account_sid,
                auth_token,
                from_number,
            },
        })
    }
}
