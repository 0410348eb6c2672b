pub mod dashboard;
pub mod fill;
pub mod i18n;
pub mod login;
pub mod prompt;

use anyhow::{Context as _, Result, anyhow};
use clap::Args;
use serde::Serialize;

use campaign_client::ApiClient;
use campaign_form::User;

use crate::config::Settings;
use i18n::trf;

/// Email used to look the user up.
#[derive(Args, Debug, Clone, Default)]
pub struct EmailArg {
    #[arg(long, env = "CAMPAIGN_EMAIL", value_name = "EMAIL")]
    pub email: Option<String>,
}

/// State shared by every command.
pub struct Context {
    pub settings: Settings,
    pub json: bool,
}

impl Context {
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.settings.api_url, self.settings.timeout)
            .with_context(|| format!("invalid API URL {}", self.settings.api_url))
    }

    pub fn email(&self, arg: &EmailArg) -> Result<String> {
        match arg.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => Ok(email.to_string()),
            _ => Ok(self.settings.require_email()?.to_string()),
        }
    }

    pub async fn login(&self, client: &ApiClient, arg: &EmailArg) -> Result<User> {
        let email = self.email(arg)?;
        client
            .login(&email)
            .await
            .map_err(|err| anyhow!(trf("cli.login.failed", &[&err.to_string()])))
    }
}

pub fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
