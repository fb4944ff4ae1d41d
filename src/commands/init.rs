use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::Categories;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its subdirectories and an initial `config.json` file.
///
/// # Arguments
/// - `home` - The directory that will be the root of the data directory, e.g. `$HOME/spendbook`
/// - `categories` - The category names. When empty the default categories are used.
/// - `currency_symbol` - The symbol shown in front of amounts, if not the default.
///
/// # Errors
/// - Returns an error if the category names are blank or repeated.
/// - Returns an error if `home` already holds a config file or any file operations fail.
pub async fn init(
    home: &Path,
    categories: &[String],
    currency_symbol: Option<&str>,
) -> Result<Out<()>> {
    let categories = if categories.is_empty() {
        None
    } else {
        Some(Categories::new(categories).pub_result(ErrorType::Config)?)
    };

    let config = Config::create(home, categories, currency_symbol.map(str::to_string))
        .await
        .context("Unable to create the home directory and config")
        .pub_result(ErrorType::Config)?;

    Ok(format!(
        "Successfully created the spendbook directory at {} with categories {}",
        config.root().display(),
        config.categories().joined()
    )
    .into())
}
