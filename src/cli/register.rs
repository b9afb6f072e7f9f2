//! Register command - the registration form on the terminal

use std::io::Write;
use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::inventory::{self, InventoryArgs};
use crate::app::{OptionsCache, RegistrationError, RegistrationForm, Route};
use crate::config::AppConfig;
use crate::domain::{FormField, ModelRegistryClient, OptionCategory};

/// Field values; anything not given is asked for interactively
#[derive(Args, Clone, Default)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub version: Option<String>,

    #[arg(long)]
    pub sponsor: Option<String>,

    /// Business line code, e.g. RETAIL_BANKING
    #[arg(long)]
    pub business_line: Option<String>,

    /// Model type code, e.g. CREDIT_RISK
    #[arg(long)]
    pub model_type: Option<String>,

    /// Risk rating code: HIGH, MEDIUM or LOW
    #[arg(long)]
    pub risk_rating: Option<String>,

    /// Status code, e.g. IN_DEVELOPMENT
    #[arg(long)]
    pub status: Option<String>,

    /// Never prompt; missing fields are submitted empty
    #[arg(long)]
    pub no_prompt: bool,

    /// Stay here instead of opening the inventory after registering
    #[arg(long)]
    pub no_follow: bool,
}

impl RegisterArgs {
    fn value(&self, field: FormField) -> Option<&String> {
        match field {
            FormField::Name => self.name.as_ref(),
            FormField::Version => self.version.as_ref(),
            FormField::Sponsor => self.sponsor.as_ref(),
            FormField::BusinessLine => self.business_line.as_ref(),
            FormField::ModelType => self.model_type.as_ref(),
            FormField::RiskRating => self.risk_rating.as_ref(),
            FormField::Status => self.status.as_ref(),
        }
    }
}

pub async fn run(
    config: &AppConfig,
    client: Arc<dyn ModelRegistryClient>,
    args: RegisterArgs,
) -> anyhow::Result<()> {
    let mut form = RegistrationForm::new(Arc::clone(&client))
        .with_redirect_delay(config.registration.redirect_delay());

    println!("Register New Model");
    if !form.activate().await {
        if let Some(message) = form.error_message() {
            println!("{}", message);
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for field in FormField::ALL {
        let value = match args.value(field) {
            Some(value) => value.clone(),
            None if args.no_prompt => String::new(),
            None => {
                print!("{}: ", prompt_label(field, form.options()));
                std::io::stdout().flush()?;
                lines.next_line().await?.unwrap_or_default()
            }
        };
        form.set(field, value);
    }

    let registered = match form.submit().await {
        Ok(registered) => registered,
        Err(err) => {
            if let RegistrationError::Validation(_) = &err {
                for field in FormField::ALL {
                    if let Some(message) = form.field_error(field) {
                        println!("  {}", message);
                    }
                }
            }
            return Err(err.into());
        }
    };

    println!("{}", registered.message);
    if args.no_follow {
        return Ok(());
    }

    println!(
        "Opening inventory in {}s...",
        registered.redirect.after.as_secs_f32()
    );
    match registered.redirect.wait().await {
        Route::Inventory => inventory::run(client, InventoryArgs::default()).await,
        Route::Register => Ok(()),
    }
}

fn category(field: FormField) -> Option<OptionCategory> {
    match field {
        FormField::BusinessLine => Some(OptionCategory::BusinessLines),
        FormField::ModelType => Some(OptionCategory::ModelTypes),
        FormField::RiskRating => Some(OptionCategory::RiskRatings),
        FormField::Status => Some(OptionCategory::Statuses),
        _ => None,
    }
}

/// Field label, followed by the allowed codes once options are loaded
fn prompt_label(field: FormField, options: &OptionsCache) -> String {
    let choices = category(field)
        .map(|category| options.choices(category))
        .unwrap_or_default();

    if choices.is_empty() {
        return field.label().to_string();
    }

    let codes: Vec<_> = choices
        .iter()
        .map(|option| format!("{} = {}", option.value, option.display_name))
        .collect();
    format!("{} [{}]", field.label(), codes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EnumeratedOptionSet;

    #[test]
    fn test_prompt_lists_choices_when_loaded() {
        let mut options = OptionsCache::new();
        options.absorb(Ok(EnumeratedOptionSet::standard()));

        assert_eq!(prompt_label(FormField::Name, &options), "Model Name");
        assert_eq!(
            prompt_label(FormField::RiskRating, &options),
            "Risk Rating [HIGH = High, MEDIUM = Medium, LOW = Low]"
        );
    }

    #[test]
    fn test_prompt_without_options_is_plain_label() {
        assert_eq!(
            prompt_label(FormField::Status, &OptionsCache::new()),
            "Status"
        );
    }

    #[test]
    fn test_args_value_per_field() {
        let args = RegisterArgs {
            sponsor: Some("Risk Team".into()),
            ..Default::default()
        };

        assert_eq!(args.value(FormField::Sponsor).map(String::as_str), Some("Risk Team"));
        assert!(args.value(FormField::Name).is_none());
    }
}
