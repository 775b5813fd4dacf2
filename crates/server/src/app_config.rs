/// Load configuration from `.env` and environment variables.
pub fn load_config() -> paddy_core::Config {
    paddy_core::config::load_dotenv();
    paddy_core::Config::from_env()
}
