use clap::{Args, Parser, Subcommand};
use kycflow::application::flow::OnboardingFlow;
use kycflow::application::transactions::TransactionDesk;
use kycflow::domain::ports::{ApiGatewayBox, SessionStoreBox};
use kycflow::domain::step::Route;
use kycflow::domain::transaction::{ReverseForm, TransactionForm};
use kycflow::error::KycError;
use kycflow::infrastructure::file::FileSessionStore;
use kycflow::infrastructure::http::{ClientConfig, DEFAULT_API_URL, HttpApiGateway};
use kycflow::interfaces::csv::listing_writer::ListingWriter;
use kycflow::interfaces::document::load_document;
use kycflow::interfaces::review::render_review;
use miette::Result;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the onboarding API
    #[arg(long, env = "KYC_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Directory holding the in-progress application
    #[arg(long, env = "KYC_STATE_DIR", default_value = ".kycflow", global = true)]
    state_dir: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Log API calls and step transitions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List banks
    Banks,
    /// List the branches of a bank
    Branches { bank_id: i64 },
    /// Fill in the entry form and move to review
    Apply(ApplyArgs),
    /// Show the application under review, optionally saving or submitting it
    Review {
        #[arg(long, conflicts_with = "draft")]
        submit: bool,
        #[arg(long)]
        draft: bool,
    },
    /// List applications as CSV
    Applications,
    /// List transactions as CSV
    Transactions,
    /// Create or reverse a transaction
    #[command(subcommand)]
    Transaction(TransactionCommand),
}

#[derive(Args)]
struct ApplyArgs {
    #[arg(long, default_value = "")]
    bank_id: String,
    #[arg(long, default_value = "")]
    branch_id: String,
    #[arg(long, default_value = "")]
    account_name: String,
    #[arg(long, default_value = "")]
    account_number: String,
    /// Proof of bank account (PDF, PNG or JPG)
    #[arg(long)]
    document: Option<PathBuf>,
}

#[derive(Subcommand)]
enum TransactionCommand {
    Create {
        #[arg(long, default_value = "")]
        account_number: String,
        #[arg(long, default_value = "")]
        amount: String,
        #[arg(long, default_value = "")]
        narration: String,
    },
    Reverse {
        #[arg(long, default_value = "")]
        transaction_id: String,
        #[arg(long, default_value = "")]
        reason: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .without_time()
        .init();

    let config = ClientConfig::new(cli.api_url.clone())
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let gateway: ApiGatewayBox = Box::new(HttpApiGateway::new(config)?);
    let session = open_session(&cli)?;

    match cli.command {
        Command::Banks => {
            let mut flow = OnboardingFlow::new(gateway, session);
            for bank in flow.load_banks().await? {
                println!("{}\t{}", bank.id, bank.value);
            }
        }
        Command::Branches { bank_id } => {
            let mut flow = OnboardingFlow::new(gateway, session);
            flow.choose_bank(&bank_id.to_string()).await?;
            for branch in flow.branches() {
                println!("{}\t{}", branch.id, branch.value);
            }
        }
        Command::Apply(args) => apply(gateway, session, args).await?,
        Command::Review { submit, draft } => review(gateway, session, submit, draft).await?,
        Command::Applications => {
            let mut desk = TransactionDesk::new(gateway);
            desk.load().await?;
            let stdout = io::stdout();
            ListingWriter::new(stdout.lock()).write_applications(desk.applications())?;
        }
        Command::Transactions => {
            let mut desk = TransactionDesk::new(gateway);
            desk.load().await?;
            let stdout = io::stdout();
            ListingWriter::new(stdout.lock()).write_transactions(desk.transactions())?;
        }
        Command::Transaction(TransactionCommand::Create {
            account_number,
            amount,
            narration,
        }) => {
            let mut desk = TransactionDesk::new(gateway);
            let record = desk
                .create_transaction(TransactionForm {
                    account_number,
                    amount,
                    narration,
                })
                .await?;
            println!("Transaction created successfully! ({})", record.transaction_id);
        }
        Command::Transaction(TransactionCommand::Reverse {
            transaction_id,
            reason,
        }) => {
            let mut desk = TransactionDesk::new(gateway);
            let record = desk
                .reverse_transaction(ReverseForm {
                    transaction_id,
                    reason,
                })
                .await?;
            println!("Transaction reversed successfully! ({})", record.transaction_id);
        }
    }

    Ok(())
}

fn open_session(cli: &Cli) -> Result<SessionStoreBox> {
    match &cli.db_path {
        Some(db_path) => open_persistent(db_path, cli),
        None => Ok(Box::new(FileSessionStore::new(&cli.state_dir))),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_persistent(db_path: &Path, _cli: &Cli) -> Result<SessionStoreBox> {
    let store = kycflow::infrastructure::rocksdb::RocksDbSessionStore::open(db_path)?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_persistent(_db_path: &Path, cli: &Cli) -> Result<SessionStoreBox> {
    eprintln!(
        "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to file storage."
    );
    Ok(Box::new(FileSessionStore::new(&cli.state_dir)))
}

async fn apply(gateway: ApiGatewayBox, session: SessionStoreBox, args: ApplyArgs) -> Result<()> {
    let mut flow = OnboardingFlow::new(gateway, session);

    flow.choose_bank(&args.bank_id).await?;
    flow.select_branch(&args.branch_id)?;
    flow.set_account_name(&args.account_name)?;
    flow.set_account_number(&args.account_number)?;
    if let Some(path) = &args.document {
        let upload = load_document(path).await?;
        flow.attach_document(upload).await?;
    }

    match flow.proceed_to_review().await {
        Ok(_) => {
            if let Some(app) = flow.reviewed() {
                print!("{}", render_review(app));
            }
            println!("Application ready for review. Run `kycflow review --submit` or `--draft`.");
            Ok(())
        }
        Err(KycError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            Err(KycError::Validation(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn review(
    gateway: ApiGatewayBox,
    session: SessionStoreBox,
    submit: bool,
    draft: bool,
) -> Result<()> {
    let mut flow = match OnboardingFlow::resume(gateway, session).await {
        Ok(flow) => flow,
        Err(e) => {
            if e.redirect() == Some(Route::Entry) {
                eprintln!("No application in progress. Redirecting to the entry form.");
            }
            return Err(e.into());
        }
    };

    if let Some(app) = flow.reviewed() {
        print!("{}", render_review(app));
    }

    if submit {
        flow.submit().await?;
        println!("Application submitted successfully!");
    } else if draft {
        flow.save_draft().await?;
        println!("Application saved as draft.");
    }
    Ok(())
}
