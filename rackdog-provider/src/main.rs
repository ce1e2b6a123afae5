use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rackdog_client::CallContext;
use rackdog_provider::state::DEFAULT_STATE_PATH;
use rackdog_provider::{
    Operation, OsItem, PlanItem, Provider, ProviderError, ProviderSettings, ResourceState,
    ServerSpec, StateDocument, StateFile, apply,
};
use tabled::{Table, Tabled};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rackdog")]
#[command(about = "Reconcile a Rackdog bare-metal server", long_about = None)]
struct Cli {
    /// API endpoint (falls back to RACKDOG_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// API key (falls back to RACKDOG_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Forget servers deleted outside the provider instead of failing
    #[arg(long, global = true)]
    recreate_on_missing: Option<bool>,

    /// Path of the local state file
    #[arg(long, global = true, default_value = DEFAULT_STATE_PATH)]
    state: PathBuf,

    /// Per-call timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate the server and record it
    Create(SpecArgs),

    /// Re-read the server and check for out-of-band changes
    Refresh,

    /// Plan a change to the server (never applied in place)
    Update(SpecArgs),

    /// Destroy the server
    Destroy,

    /// List hardware plans
    Plans {
        /// Location keyword, e.g. NY
        #[arg(short, long)]
        location: Option<String>,
    },

    /// List operating systems
    Os,
}

#[derive(Args)]
struct SpecArgs {
    #[arg(long)]
    plan_id: i64,

    #[arg(long)]
    location_id: i64,

    #[arg(long)]
    os_id: i64,

    #[arg(long)]
    raid: Option<i64>,

    #[arg(long)]
    hostname: Option<String>,
}

impl From<SpecArgs> for ServerSpec {
    fn from(args: SpecArgs) -> Self {
        Self {
            plan_id: args.plan_id,
            location_id: args.location_id,
            os_id: args.os_id,
            raid: args.raid,
            hostname: args.hostname.filter(|h| !h.is_empty()),
        }
    }
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "CORES")]
    cores: i64,
    #[tabled(rename = "RAM")]
    ram: String,
    #[tabled(rename = "STORAGE")]
    storage: String,
    #[tabled(rename = "PRICE/MO")]
    price: String,
}

impl From<PlanItem> for PlanRow {
    fn from(plan: PlanItem) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            cpu: plan.cpu_name,
            cores: plan.cores,
            ram: format!("{}GB", plan.ram),
            storage: format!("{}GB", plan.storage),
            price: plan
                .price_monthly
                .map(|p| format!("${p}"))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct OsRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
}

impl From<OsItem> for OsRow {
    fn from(os: OsItem) -> Self {
        Self {
            id: os.id,
            name: os.name,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rackdog=info,rackdog_provider=info,rackdog_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, state file left unchanged");
            return ExitCode::from(130);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ProviderError>() {
                Some(provider_err) => {
                    eprintln!("Error: {}", provider_err.summary());
                    eprintln!("  {provider_err}");
                }
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let timeout = cli.timeout.map(Duration::from_secs);
    let settings = ProviderSettings {
        endpoint: cli.endpoint,
        api_key: cli.api_key,
        recreate_on_missing: cli.recreate_on_missing,
        timeout,
    };
    let config = settings.resolve().map_err(ProviderError::from)?;

    let mut provider = Provider::new();
    provider.configure(&config)?;

    let ctx = match timeout {
        Some(timeout) => CallContext::with_timeout(timeout),
        None => CallContext::background(),
    };
    let state_file = StateFile::new(cli.state);

    match cli.command {
        Commands::Create(args) => {
            let spec = ServerSpec::from(args);
            let mut document = load(&state_file).await?;
            apply(
                &provider.servers()?,
                &ctx,
                Operation::Create(spec.clone()),
                &mut document.server,
            )
            .await?;
            save(&state_file, document.server, Some(spec)).await?;
        }
        Commands::Refresh => {
            let mut document = load(&state_file).await?;
            apply(&provider.servers()?, &ctx, Operation::Read, &mut document.server).await?;
            let spec = document.spec.filter(|_| document.server.record().is_some());
            save(&state_file, document.server, spec).await?;
        }
        Commands::Update(args) => {
            let mut document = load(&state_file).await?;
            let advisories = apply(
                &provider.servers()?,
                &ctx,
                Operation::Update(ServerSpec::from(args)),
                &mut document.server,
            )
            .await?;
            for advisory in advisories {
                eprintln!("Warning: {}", advisory.summary);
                eprintln!("  {}", advisory.detail);
            }
        }
        Commands::Destroy => {
            let mut document = load(&state_file).await?;
            apply(&provider.servers()?, &ctx, Operation::Delete, &mut document.server).await?;
            save(&state_file, document.server, None).await?;
        }
        Commands::Plans { location } => {
            let plans = provider.plans()?.read(&ctx, location.as_deref()).await?;
            if plans.is_empty() {
                println!("No plans found");
            } else {
                let rows: Vec<PlanRow> = plans.into_iter().map(PlanRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }
        Commands::Os => {
            let systems = provider.operating_systems()?.read(&ctx).await?;
            if systems.is_empty() {
                println!("No operating systems found");
            } else {
                let rows: Vec<OsRow> = systems.into_iter().map(OsRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }
    }

    Ok(())
}

async fn load(state_file: &StateFile) -> Result<StateDocument, ProviderError> {
    Ok(state_file.load().await?)
}

async fn save(
    state_file: &StateFile,
    server: ResourceState,
    spec: Option<ServerSpec>,
) -> anyhow::Result<()> {
    if let Some(record) = server.record() {
        println!(
            "{}",
            serde_json::to_string_pretty(record).context("rendering server record")?
        );
    } else {
        println!("Server is absent");
    }

    state_file
        .save(&StateDocument::new(server, spec))
        .await
        .map_err(ProviderError::from)?;
    info!(path = %state_file.path().display(), "State saved");
    Ok(())
}
