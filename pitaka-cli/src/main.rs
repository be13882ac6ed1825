use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pitaka_core::{
    normalize_date, split_today, Category, CategoryFilter, Dispatched, ExpenseBook, ExpensePatch,
    ExpenseStore, NewExpense, Payment, Period, PeriodPolicy, StatsQuery, StatsReport, SwipeList,
    UserContext,
};
use pitaka_ingest::parsers::parse_expense_csv;
use pitaka_ingest::ImportedExpense;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod gesture;
mod render;
mod state;
mod store;

use config::Config;
use store::FileStore;

#[derive(Parser, Debug)]
#[command(
    name = "pitaka",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PITAKA_BUILD_SHA"), ")"),
    about = "Pitaka: personal expense tracker"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remember who you are; every other command acts on this user's records
    Login {
        #[arg(long = "user")]
        user_id: i64,

        #[arg(long)]
        name: Option<String>,
    },

    /// Forget the current session
    Logout,

    /// Show the current session
    Whoami,

    /// Record an expense
    Add {
        amount: f64,

        #[arg(long, default_value = "other")]
        category: String,

        #[arg(long, default_value = "cash")]
        payment: String,

        #[arg(long, default_value = "")]
        note: String,

        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change fields of an existing expense
    Edit {
        id: i64,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        payment: Option<String>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete { id: i64 },

    /// Today's expenses, then earlier days grouped by date
    Records {
        #[arg(long)]
        json: bool,
    },

    /// Totals, breakdowns and trend for a period
    Stats {
        /// week | month | year | all (default from config)
        #[arg(long)]
        period: Option<Period>,

        /// calendar | rolling (default from config)
        #[arg(long)]
        policy: Option<PeriodPolicy>,

        /// Reference date, YYYY-MM-DD (default: today)
        #[arg(long)]
        anchor: Option<String>,

        /// Move the anchor by whole periods, e.g. -1 for the previous month
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,

        /// Category tag, or "all"
        #[arg(long, default_value = "all")]
        category: String,

        #[arg(long, default_value = "")]
        search: String,

        #[arg(long)]
        json: bool,
    },

    /// Simulate a swipe on a record and carry out what it commits to
    Swipe {
        id: i64,

        /// Pointer x positions: press, drag..., release (e.g. 200,150,90)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "events")]
        path: Vec<f64>,

        /// JSON file of recorded mouse/touch events
        #[arg(long)]
        events: Option<PathBuf>,

        /// Report the outcome without dispatching it
        #[arg(long)]
        dry_run: bool,
    },

    /// Import expenses from a CSV export
    Import {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PITAKA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let home = state::ensure_pitaka_home()?;

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => {
                let (p, created) = config::init_config(&home)?;
                if created {
                    println!("Wrote {}", p.display());
                } else {
                    println!("Config already exists: {}", p.display());
                }
            }
            ConfigCommand::Show => {
                let cfg = config::load_config(&home)?;
                println!("# {}", config::config_path(&home).display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Login { user_id, name } => {
            let user = UserContext {
                user_id,
                display_name: name.unwrap_or_default(),
            };
            state::write_session(&home, &user)?;
            println!("Logged in as {}", describe_user(&user));
        }

        Command::Logout => {
            if state::clear_session(&home)? {
                println!("Logged out");
            } else {
                println!("No active session");
            }
        }

        Command::Whoami => match state::read_session(&home)? {
            Some(user) => println!("{}", describe_user(&user)),
            None => println!("Not logged in"),
        },

        command => run_with_book(&home, command)?,
    }

    Ok(())
}

fn describe_user(user: &UserContext) -> String {
    if user.display_name.is_empty() {
        format!("user {}", user.user_id)
    } else {
        format!("{} (user {})", user.display_name, user.user_id)
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    normalize_date(raw).with_context(|| format!("unreadable date: {raw} (expected YYYY-MM-DD)"))
}

/// Commands that need a logged-in user and their records.
fn run_with_book(home: &Path, command: Command) -> Result<()> {
    let cfg = config::load_config(home)?;
    let user = state::require_session(home)?;
    let today = pitaka_core::today_in(&cfg.stats.timezone)?;
    let query = StatsQuery::new(cfg.stats.default_period, cfg.stats.policy, today);
    let store = FileStore::open(state::store_path(home))?;
    let mut book = ExpenseBook::open(store, user, query)?;
    let currency = cfg.display.currency.as_str();

    match command {
        Command::Add {
            amount,
            category,
            payment,
            note,
            date,
        } => {
            let date = match date {
                Some(raw) => parse_date_arg(&raw)?,
                None => today,
            };
            let new = NewExpense {
                amount,
                category: Category::from(category),
                payment: Payment::from(payment),
                note,
                date,
            };
            let e = book.add(&new)?;
            println!("Added {}", render::expense_line(currency, &e));
            print_month_total(&book, currency);
        }

        Command::Edit {
            id,
            amount,
            category,
            payment,
            note,
            date,
        } => {
            let patch = ExpensePatch {
                amount,
                category: category.map(Category::from),
                payment: payment.map(Payment::from),
                note,
                date: date.as_deref().map(parse_date_arg).transpose()?,
            };
            if patch.is_empty() {
                bail!("nothing to change (pass --amount, --category, --payment, --note or --date)");
            }
            let e = book.update(id, &patch)?;
            println!("Updated {}", render::expense_line(currency, &e));
        }

        Command::Delete { id } => {
            book.delete(id)?;
            println!("Deleted #{id}");
        }

        Command::Records { json } => {
            let view = split_today(book.expenses(), today);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::records(currency, &view));
            }
        }

        Command::Stats {
            period,
            policy,
            anchor,
            shift,
            category,
            search,
            json,
        } => {
            let anchor = match anchor {
                Some(raw) => parse_date_arg(&raw)?,
                None => today,
            };
            let category: CategoryFilter = category.parse()?;
            let query = StatsQuery::new(
                period.unwrap_or(cfg.stats.default_period),
                policy.unwrap_or(cfg.stats.policy),
                anchor,
            )
            .with_category(category)
            .with_search(search)
            .shifted(shift);
            book.set_query(query);

            let report = StatsReport::build(book.expenses(), book.query(), cfg.display.trend_months);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::stats(currency, &report));
            }
        }

        Command::Swipe {
            id,
            path,
            events,
            dry_run,
        } => swipe(&mut book, &cfg, id, &path, events.as_deref(), dry_run)?,

        Command::Import { csv } => {
            let rows = parse_expense_csv(&csv).with_context(|| format!("parsing {}", csv.display()))?;
            let imported = import_rows(&mut book, rows)?;
            println!(
                "Imported {imported} expense(s) from {} into {}",
                csv.display(),
                book.store().path().display()
            );
        }

        Command::Login { .. } | Command::Logout | Command::Whoami | Command::Config { .. } => {
            bail!("command does not operate on the expense book")
        }
    }

    Ok(())
}

/// Add every row, validating all of them before the first write.
fn import_rows<S: ExpenseStore>(book: &mut ExpenseBook<S>, rows: Vec<ImportedExpense>) -> Result<usize> {
    let new: Vec<NewExpense> = rows.into_iter().map(NewExpense::from).collect();
    for (i, n) in new.iter().enumerate() {
        if !n.amount.is_finite() || n.amount <= 0.0 {
            bail!("row {}: amount must be a positive number, got {}; nothing was imported", i + 1, n.amount);
        }
    }

    for (i, n) in new.iter().enumerate() {
        book.add(n).with_context(|| {
            format!("importing row {}: {i} of {} row(s) were imported before the failure", i + 1, new.len())
        })?;
    }
    Ok(new.len())
}

fn print_month_total(book: &ExpenseBook<FileStore>, currency: &str) {
    let agg = book.aggregate();
    println!(
        "{}: {} across {} expense(s)",
        book.query().period.label(),
        render::money(currency, agg.total),
        agg.count
    );
}

fn swipe(
    book: &mut ExpenseBook<FileStore>,
    cfg: &Config,
    id: i64,
    path: &[f64],
    events: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    if book.find(id).is_none() {
        bail!("no expense #{id} for {}", describe_user(book.user()));
    }
    let events = match events {
        Some(file) => gesture::from_file(file)?,
        None => gesture::from_path(path)?,
    };

    let mut rows = SwipeList::new(book.expenses(), cfg.swipe_config());
    let pending = events.into_iter().filter_map(|ev| rows.handle(id, ev)).last();
    if let Some(row) = rows.row(id) {
        tracing::debug!(state = ?row.tracker.state(), offset = row.tracker.offset(), "gesture finished");
    }

    let Some(pending) = pending else {
        println!("No action: the row springs back");
        return Ok(());
    };
    if dry_run {
        println!("Would {:?} after {} ms", pending.command, pending.delay.as_millis());
        return Ok(());
    }

    std::thread::sleep(pending.delay);
    match book.dispatch(pending.command)? {
        Dispatched::Nothing => println!("No action"),
        Dispatched::EditRequested(e) => {
            println!("Edit requested for {}", render::expense_line(&cfg.display.currency, &e));
            println!("Run: pitaka edit {} --amount <n> [--category ..] [--note ..]", e.id);
        }
        Dispatched::Deleted(id) => {
            println!("Deleted #{id}");
            print_month_total(book, &cfg.display.currency);
        }
    }
    Ok(())
}
