//! `ragturn config`: Print the effective configuration.

use ragturn_config::AppConfig;

use super::load_config;

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    if config.has_api_key() {
        eprintln!("(api_key is set and omitted from output)");
    }
    println!("{}", render(&config)?);
    Ok(())
}

/// The configuration as TOML, without the credential.
fn render(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut public = config.clone();
    public.api_key = None;
    toml::to_string_pretty(&public)
}
