//! These structs provide the CLI interface for the spendbook CLI.

use crate::model::TransactionId;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spendbook: A command-line tool for tracking your expenses against monthly budgets.
///
/// Transactions are recorded with a description, an amount, a date and one of a fixed set of
/// categories. Each category can be given a budget, and the summary shows how your spending
/// compares to it. Everything is stored as JSON files under the spendbook home directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and the configuration file.
    ///
    /// This is the first command you should run. The set of categories is fixed here; pass
    /// --category once per category to replace the defaults (Groceries, Bills, Entertainment).
    Init(InitArgs),
    /// Record a new transaction.
    Add(AddArgs),
    /// Change an existing transaction. Fields that are not given keep their current values.
    Update(UpdateArgs),
    /// Delete a transaction.
    Delete(DeleteArgs),
    /// Show all transactions in the order they were added.
    List,
    /// Show total spending, spending per category and spending against budgets.
    Summary,
    /// Set or show the category budgets.
    Budget(BudgetArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where spendbook data and configuration is held. Defaults to ~/spendbook
    #[arg(long, env = "SPENDBOOK_HOME", default_value_t = default_spendbook_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `spendbook init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// A category name. Repeat to configure several, in the order they should be shown.
    #[arg(long = "category")]
    categories: Vec<String>,

    /// The symbol shown in front of amounts. Defaults to ₹.
    #[arg(long)]
    currency_symbol: Option<String>,
}

impl InitArgs {
    pub fn new(categories: Vec<String>, currency_symbol: Option<String>) -> Self {
        Self {
            categories,
            currency_symbol,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn currency_symbol(&self) -> Option<&str> {
        self.currency_symbol.as_deref()
    }
}

/// Args for the `spendbook add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the money was spent on.
    #[arg(long)]
    description: String,

    /// The amount spent, a positive number such as 50 or 1,050.25.
    #[arg(long)]
    amount: String,

    /// The date of the transaction in YYYY-MM-DD format.
    #[arg(long)]
    date: String,

    /// One of the configured categories.
    #[arg(long)]
    category: String,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        date: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            date: date.into(),
            category: category.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Args for the `spendbook update` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct UpdateArgs {
    /// The id of the transaction to change.
    id: TransactionId,

    /// A new description.
    #[arg(long)]
    description: Option<String>,

    /// A new amount.
    #[arg(long)]
    amount: Option<String>,

    /// A new date in YYYY-MM-DD format.
    #[arg(long)]
    date: Option<String>,

    /// A new category.
    #[arg(long)]
    category: Option<String>,
}

impl UpdateArgs {
    pub fn new(id: TransactionId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Args for the `spendbook delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction to delete.
    id: TransactionId,
}

impl DeleteArgs {
    pub fn new(id: TransactionId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }
}

/// Args for the `spendbook budget` command.
#[derive(Debug, Parser, Clone)]
pub struct BudgetArgs {
    #[command(subcommand)]
    action: BudgetSubcommand,
}

impl BudgetArgs {
    pub fn new(action: BudgetSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &BudgetSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum BudgetSubcommand {
    /// Set the budget for one category. The amount must be zero or positive.
    Set(BudgetSetArgs),
    /// Show every category budget next to what has been spent.
    Show,
}

/// Args for the `spendbook budget set` command.
#[derive(Debug, Parser, Clone)]
pub struct BudgetSetArgs {
    /// One of the configured categories.
    category: String,

    /// The budget limit.
    amount: String,
}

impl BudgetSetArgs {
    pub fn new(category: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount: amount.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

fn default_spendbook_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spendbook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SPENDBOOK_HOME instead of relying on the default \
                spendbook home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("spendbook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
