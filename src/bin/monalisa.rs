//! CLI binary for operating merchants and QRIS invoices on a Monalisa backend.
#![allow(
    clippy::exit,
    reason = "CLI binary uses process::exit for fatal errors"
)]

use core::time::Duration;
use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use monalisa_client::client::MonalisaBlockingClient;
use monalisa_client::config::{ClientConfig, Environment};
use monalisa_client::endpoint::{DEFAULT_LIMIT, DEFAULT_PAGE};
use monalisa_client::models::{
    ConnectionTest, Invoice, InvoiceId, InvoiceStatus, Merchant, MerchantId, MerchantUpdate,
    NewMerchant, PaymentStatus, QrisTransaction, TransactionPage,
};
use monalisa_client::storage::{FileStore, KeyValueStore};
use owo_colors::OwoColorize;
use secrecy::SecretString;

/// Environment variable holding the account password for `login`.
const PASSWORD_ENV: &str = "MONALISA_PASSWORD";

/// Environment variable holding the provider API key for merchant
/// registration and key rotation.
const MERCHANT_KEY_ENV: &str = "MONALISA_MERCHANT_API_KEY";

/// Monalisa API CLI: merchants, QRIS invoices and payment tracking.
#[derive(Debug, Parser)]
#[command(name = "monalisa", version, about)]
struct Cli {
    /// Override the session directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Backend environment (`development` or `production`).
    #[arg(long, global = true, value_name = "ENV")]
    env: Option<Environment>,
    /// Override the backend base URL.
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session token.
    Login {
        /// Account email. The password is read from `MONALISA_PASSWORD`.
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session token.
    Logout,
    /// Check backend liveness.
    Health,
    /// Manage registered merchants.
    #[command(subcommand)]
    Merchants(MerchantCommand),
    /// Create and track QRIS invoices.
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// List a merchant's QRIS transactions.
    Transactions {
        /// Merchant ID.
        #[arg(long)]
        merchant: i64,
        /// 1-based page number.
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        /// Page size.
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
        /// Refresh the listing every SECS seconds.
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
        /// Number of refreshes when watching.
        #[arg(long, default_value_t = 12, requires = "watch")]
        rounds: u32,
    },
}

/// Merchant subcommands.
#[derive(Debug, Subcommand)]
enum MerchantCommand {
    /// List all merchants.
    List,
    /// Show one merchant.
    Show {
        /// Merchant ID.
        id: i64,
    },
    /// Register a merchant. The API key is read from
    /// `MONALISA_MERCHANT_API_KEY`.
    Create {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Merchant ID at the QRIS provider.
        #[arg(long)]
        merchant_id: String,
        /// Register the merchant as inactive.
        #[arg(long)]
        inactive: bool,
    },
    /// Update a merchant; only the given fields change.
    Update {
        /// Merchant ID.
        id: i64,
        /// New display name.
        #[arg(long)]
        name: Option<String>,
        /// New provider merchant ID.
        #[arg(long)]
        merchant_id: Option<String>,
        /// Activate or deactivate the merchant.
        #[arg(long)]
        active: Option<bool>,
        /// Replace the API key with `MONALISA_MERCHANT_API_KEY`.
        #[arg(long)]
        rotate_key: bool,
    },
    /// Delete a merchant.
    Delete {
        /// Merchant ID.
        id: i64,
    },
    /// Verify a merchant's provider credentials.
    Test {
        /// Merchant ID.
        id: i64,
    },
}

/// Invoice subcommands.
#[derive(Debug, Subcommand)]
enum InvoiceCommand {
    /// Mint a QRIS invoice.
    Create {
        /// Merchant ID.
        #[arg(long)]
        merchant: i64,
        /// Amount in rupiah.
        #[arg(long)]
        amount: u64,
        /// Description shown to the payer.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Check the payment status of an invoice.
    Status {
        /// Invoice ID.
        invoice_id: String,
        /// Keep checking until the payment settles or fails.
        #[arg(long)]
        wait: bool,
        /// Seconds between checks when waiting.
        #[arg(long, default_value_t = 5, value_name = "SECS")]
        interval: u64,
        /// Maximum number of checks when waiting.
        #[arg(long, default_value_t = 60)]
        max_checks: u32,
    },
}

/// Reads a required secret from the environment, printing a hint if unset.
fn read_secret_env(name: &str) -> io::Result<Option<SecretString>> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => Ok(Some(SecretString::from(val))),
        _ => {
            let mut err = io::stderr().lock();
            writeln!(
                err,
                "{} {} environment variable is not set",
                "error:".red().bold(),
                name.bold()
            )?;
            writeln!(
                err,
                "  {} export it or add {}=<value> to a .env file",
                "hint:".cyan(),
                name
            )?;
            Ok(None)
        }
    }
}

/// Prints an error line to stderr.
fn report(context: &str, err: &dyn core::fmt::Display) -> io::Result<()> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            report("invalid configuration", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    if let Some(environment) = cli.env {
        config.environment = environment;
    }
    if cli.base_url.is_some() {
        config.base_url = cli.base_url;
    }

    let store = match create_store(cli.data_dir) {
        Ok(store) => store,
        Err(err) => {
            report("failed to initialize session storage", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = match MonalisaBlockingClient::builder()
        .config(config)
        .store(store)
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            report("failed to build client", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    dispatch(&client, cli.command)
}

/// Creates the session store, using `data_dir` if provided or the default
/// XDG data directory otherwise.
fn create_store(data_dir: Option<PathBuf>) -> monalisa_client::error::Result<FileStore> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStore::default_dir()?,
    };
    FileStore::new(dir)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: KeyValueStore>(
    client: &MonalisaBlockingClient<S>,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::Login { email } => cmd_login(client, &email),
        Command::Logout => cmd_logout(client),
        Command::Health => cmd_health(client),
        Command::Merchants(sub) => cmd_merchants(client, sub),
        Command::Invoice(InvoiceCommand::Create {
            merchant,
            amount,
            description,
        }) => cmd_invoice_create(client, MerchantId::new(merchant), amount, &description),
        Command::Invoice(InvoiceCommand::Status {
            invoice_id,
            wait,
            interval,
            max_checks,
        }) => {
            let invoice_id = InvoiceId::new(invoice_id);
            if wait {
                cmd_invoice_wait(
                    client,
                    &invoice_id,
                    Duration::from_secs(interval),
                    max_checks,
                )
            } else {
                cmd_invoice_status(client, &invoice_id)
            }
        }
        Command::Transactions {
            merchant,
            page,
            limit,
            watch,
            rounds,
        } => {
            let merchant = MerchantId::new(merchant);
            match watch {
                Some(secs) => cmd_transactions_watch(
                    client,
                    merchant,
                    (page, limit),
                    Duration::from_secs(secs),
                    rounds,
                ),
                None => cmd_transactions(client, merchant, page, limit),
            }
        }
    }
}

/// Executes the `login` subcommand.
fn cmd_login<S: KeyValueStore>(
    client: &MonalisaBlockingClient<S>,
    email: &str,
) -> io::Result<ExitCode> {
    let Some(password) = read_secret_env(PASSWORD_ENV)? else {
        return Ok(ExitCode::FAILURE);
    };
    let spinner = make_spinner("Logging in...");
    let outcome = client.login(email, password);
    spinner.finish_and_clear();

    match outcome {
        Ok(response) if response.access_token.is_some() => {
            writeln!(
                io::stdout().lock(),
                "{} {}",
                "Logged in".green().bold(),
                format_args!("as {email}").dimmed()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(_) => {
            report("login failed", &"backend issued no access token")?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            report("login failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `logout` subcommand.
fn cmd_logout<S: KeyValueStore>(client: &MonalisaBlockingClient<S>) -> io::Result<ExitCode> {
    client.logout();
    writeln!(io::stdout().lock(), "{}", "Logged out.".green())?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `health` subcommand.
fn cmd_health<S: KeyValueStore>(client: &MonalisaBlockingClient<S>) -> io::Result<ExitCode> {
    match client.health() {
        Ok(health) => {
            writeln!(
                io::stdout().lock(),
                "{} {} {}",
                client.base_url().bold(),
                "is".dimmed(),
                health.status.green()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("health check failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes a `merchants` subcommand.
fn cmd_merchants<S: KeyValueStore>(
    client: &MonalisaBlockingClient<S>,
    command: MerchantCommand,
) -> io::Result<ExitCode> {
    match command {
        MerchantCommand::List => match client.merchants() {
            Ok(list) => {
                print_merchants_table(&list.merchants)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                report("failed to list merchants", &err)?;
                Ok(ExitCode::FAILURE)
            }
        },
        MerchantCommand::Show { id } => {
            print_merchant_outcome(client.merchant(MerchantId::new(id)), "failed to fetch merchant")
        }
        MerchantCommand::Create {
            name,
            merchant_id,
            inactive,
        } => {
            let Some(api_key) = read_secret_env(MERCHANT_KEY_ENV)? else {
                return Ok(ExitCode::FAILURE);
            };
            let merchant = NewMerchant::new(name, merchant_id, api_key).active(!inactive);
            print_merchant_outcome(
                client.create_merchant(&merchant),
                "failed to create merchant",
            )
        }
        MerchantCommand::Update {
            id,
            name,
            merchant_id,
            active,
            rotate_key,
        } => {
            let mut update = MerchantUpdate::new();
            if let Some(name) = name {
                update = update.name(name);
            }
            if let Some(merchant_id) = merchant_id {
                update = update.merchant_id(merchant_id);
            }
            if let Some(active) = active {
                update = update.active(active);
            }
            if rotate_key {
                let Some(api_key) = read_secret_env(MERCHANT_KEY_ENV)? else {
                    return Ok(ExitCode::FAILURE);
                };
                update = update.api_key(api_key);
            }
            if update.is_empty() {
                report("nothing to update", &"pass at least one field to change")?;
                return Ok(ExitCode::FAILURE);
            }
            print_merchant_outcome(
                client.update_merchant(MerchantId::new(id), &update),
                "failed to update merchant",
            )
        }
        MerchantCommand::Delete { id } => match client.delete_merchant(MerchantId::new(id)) {
            Ok(message) => {
                writeln!(io::stdout().lock(), "{}", message.message.green())?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                report("failed to delete merchant", &err)?;
                Ok(ExitCode::FAILURE)
            }
        },
        MerchantCommand::Test { id } => {
            let spinner = make_spinner("Testing provider connection...");
            let outcome = client.test_merchant_connection(MerchantId::new(id));
            spinner.finish_and_clear();
            match outcome {
                Ok(result) => {
                    print_connection_test(&result)?;
                    Ok(if result.is_success() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::FAILURE
                    })
                }
                Err(err) => {
                    report("connection test failed", &err)?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Prints a single merchant or reports the error.
fn print_merchant_outcome(
    outcome: monalisa_client::error::Result<Merchant>,
    context: &str,
) -> io::Result<ExitCode> {
    match outcome {
        Ok(merchant) => {
            print_merchants_table(core::slice::from_ref(&merchant))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report(context, &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `invoice create`.
fn cmd_invoice_create<S: KeyValueStore>(
    client: &MonalisaBlockingClient<S>,
    merchant: MerchantId,
    amount: u64,
    description: &str,
) -> io::Result<ExitCode> {
    match client.create_qris_invoice(merchant, amount, description) {
        Ok(invoice) => {
            print_invoice(&invoice)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to create invoice", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `invoice status` without waiting.
fn cmd_invoice_status<S: KeyValueStore>(
    client: &MonalisaBlockingClient<S>,
    invoice_id: &InvoiceId,
) -> io::Result<ExitCode> {
    match client.check_qris_status(invoice_id) {
        Ok(status) => {
            print_invoice_status(invoice_id, &status)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to check invoice status", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `invoice status --wait`: checks repeatedly until the payment
/// reaches a terminal status or `max_checks` is exhausted.
fn cmd_invoice_wait<S: KeyValueStore>(
    client: &MonalisaBlockingClient<S>,
    invoice_id: &InvoiceId,
    interval: Duration,
    max_checks: u32,
) -> io::Result<ExitCode> {
    let spinner = make_spinner(&format!("Waiting for payment of {invoice_id}..."));
    let outcome = poll_until_terminal(|| client.check_qris_status(invoice_id), interval, max_checks);
    spinner.finish_and_clear();

    match outcome {
        Ok(Some(status)) => {
            print_invoice_status(invoice_id, &status)?;
            Ok(if status.status.is_failed() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Ok(None) => {
            report(
                "gave up waiting",
                &format_args!("{invoice_id} still pending after {max_checks} checks"),
            )?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            report("failed to check invoice status", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Calls `check` until it reports a terminal status, sleeping `interval`
/// between calls. Checks never overlap.
///
/// Returns `Ok(None)` if `max_checks` calls all returned a non-terminal
/// status.
fn poll_until_terminal<F>(
    mut check: F,
    interval: Duration,
    max_checks: u32,
) -> monalisa_client::error::Result<Option<InvoiceStatus>>
where
    F: FnMut() -> monalisa_client::error::Result<InvoiceStatus>,
{
    for attempt in 1..=max_checks {
        let status = check()?;
        tracing::debug!(attempt, status = %status.status, "polled invoice status");
        if status.status.is_terminal() {
            return Ok(Some(status));
        }
        if attempt < max_checks {
            thread::sleep(interval);
        }
    }
    Ok(None)
}

/// Executes `transactions` once.
fn cmd_transactions<S: KeyValueStore>(
    client: &MonalisaBlockingClient<S>,
    merchant: MerchantId,
    page: u32,
    limit: u32,
) -> io::Result<ExitCode> {
    match client.qris_transactions(merchant, page, limit) {
        Ok(listing) => {
            print_transactions_table(&listing)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to list transactions", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `transactions --watch`: refreshes the listing `rounds` times,
/// one request at a time.
fn cmd_transactions_watch<S: KeyValueStore>(
    client: &MonalisaBlockingClient<S>,
    merchant: MerchantId,
    (page, limit): (u32, u32),
    interval: Duration,
    rounds: u32,
) -> io::Result<ExitCode> {
    for round in 1..=rounds {
        let code = cmd_transactions(client, merchant, page, limit)?;
        if code != ExitCode::SUCCESS {
            return Ok(code);
        }
        if round < rounds {
            thread::sleep(interval);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Formats a rupiah amount with dot thousands separators (`Rp 50.000`).
fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len().saturating_mul(2));
    for (idx, ch) in digits.chars().enumerate() {
        let remaining = digits.len().saturating_sub(idx);
        if idx > 0 && remaining % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {grouped}")
}

/// Returns a table cell for a payment status, coloured by outcome.
fn status_cell(status: &PaymentStatus) -> Cell {
    let cell = Cell::new(status.as_str());
    if status.is_settled() {
        cell.fg(Color::Green)
    } else if status.is_failed() {
        cell.fg(Color::Red)
    } else if status.is_pending() {
        cell.fg(Color::Yellow)
    } else {
        cell.fg(Color::DarkGrey)
    }
}

/// Prints merchants in a table.
fn print_merchants_table(merchants: &[Merchant]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if merchants.is_empty() {
        writeln!(out, "{}", "No merchants found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Provider ID").fg(Color::Cyan),
        Cell::new("Active").fg(Color::Cyan),
        Cell::new("Created").fg(Color::Cyan),
    ]);

    for merchant in merchants {
        let active = if merchant.is_active {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        _ = table.add_row(vec![
            Cell::new(merchant.id),
            Cell::new(&merchant.name),
            Cell::new(&merchant.merchant_id),
            active,
            Cell::new(merchant.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Merchants".green().bold(),
        format_args!("({})", merchants.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints one page of transactions in a table.
fn print_transactions_table(listing: &TransactionPage) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if listing.transactions.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Invoice").fg(Color::Cyan),
        Cell::new("Created").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Payer").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
    ]);

    for tx in &listing.transactions {
        _ = table.add_row(transaction_row(tx));
    }

    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!(
            "(page {}, {} of {})",
            listing.page,
            listing.transactions.len(),
            listing.total
        )
        .dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    if listing.has_more() {
        writeln!(
            out,
            "{}",
            format_args!("More available: --page {}", listing.page.saturating_add(1)).dimmed()
        )?;
    }
    Ok(())
}

/// Builds the table row of a transaction.
fn transaction_row(tx: &QrisTransaction) -> Vec<Cell> {
    vec![
        Cell::new(&tx.invoice_id),
        Cell::new(tx.created_at.format("%Y-%m-%d %H:%M")),
        Cell::new(format_rupiah(tx.amount)),
        status_cell(tx.effective_status()),
        Cell::new(tx.customer_name.as_deref().unwrap_or("\u{2014}")),
        Cell::new(tx.description.as_deref().unwrap_or("")),
    ]
}

/// Prints a freshly minted invoice.
fn print_invoice(invoice: &Invoice) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {}",
        "Invoice created".green().bold(),
        invoice.invoice_id.bold()
    )?;
    writeln!(out, "  {:<8} {}", "amount".dimmed(), format_rupiah(invoice.amount))?;
    writeln!(out, "  {:<8} {}", "status".dimmed(), invoice.status)?;
    writeln!(out, "  {:<8} {}", "qr code".dimmed(), invoice.qr_code_url)?;
    Ok(())
}

/// Prints the status of an invoice.
fn print_invoice_status(invoice_id: &InvoiceId, status: &InvoiceStatus) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let label = status.status.as_str();
    if status.status.is_settled() {
        writeln!(out, "{} {}", invoice_id.bold(), label.green().bold())?;
    } else if status.status.is_failed() {
        writeln!(out, "{} {}", invoice_id.bold(), label.red().bold())?;
    } else {
        writeln!(out, "{} {}", invoice_id.bold(), label.yellow())?;
    }
    if let Some(payer) = status.payer_name.as_deref() {
        writeln!(out, "  {:<8} {payer}", "payer".dimmed())?;
    }
    if let Some(method) = status.payment_method.as_deref() {
        writeln!(out, "  {:<8} {method}", "method".dimmed())?;
    }
    Ok(())
}

/// Prints the outcome of a merchant connection test.
fn print_connection_test(result: &ConnectionTest) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if result.is_success() {
        writeln!(out, "{} {}", "ok".green().bold(), result.message)?;
    } else {
        writeln!(out, "{} {}", "failed".red().bold(), result.message)?;
    }
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last resort: if stderr itself failed there is nothing left to do.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
