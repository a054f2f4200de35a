use anyhow::Context;
use bzcore::builder::RequestForm;
use bzcore::render::ExportFormat;
use bzcore::view::HealthStatus;
use bzcore::{ApiClient, ClientConfig};
use clap::Parser;
use std::path::PathBuf;
use stub::server::{stub_bind_address, StubServer};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod stub;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the Brillouin zone plot service")]
struct Args {
    /// Load the form fields from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Plot service base URL (overrides the workflow file and BZ_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
    /// Probe the service's health endpoint
    #[arg(long, default_value_t = false)]
    health: bool,
    /// Submit the form and save the returned figure
    #[arg(long, default_value_t = false)]
    generate: bool,
    /// Render a saved figure JSON instead of contacting the service
    #[arg(long)]
    figure: Option<PathBuf>,
    /// Snapshot format, repeatable
    #[arg(long = "export", value_parser = parse_format)]
    exports: Vec<ExportFormat>,
    #[arg(long, default_value = "tools/data")]
    out_dir: PathBuf,
    /// Run the local stub backend until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    let form: RequestForm = workflow_config.to_form();

    let stub = if args.serve {
        Some(StubServer::spawn(stub_bind_address())?)
    } else {
        None
    };
    let explicit = args
        .base_url
        .clone()
        .or_else(|| stub.as_ref().map(StubServer::base_url))
        .or_else(|| workflow_config.base_url.clone());
    let client_config = ClientConfig::resolve(explicit.as_deref());
    log::info!("plot service at {}", client_config.base_url);

    let runner = Runner::new(ApiClient::new(client_config), &args.out_dir, args.exports.clone());
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tokio runtime")?;

    if let Some(path) = &args.figure {
        let written = runner.export_saved(path)?;
        println!("Saved figure -> {} export(s)", written.len());
        for path in written {
            println!("  {}", path.display());
        }
    }

    if args.generate {
        let report = runtime.block_on(runner.execute(&form, args.health))?;
        println!(
            "Generate -> health {}, dispatched {}, succeeded {}",
            report.health.label(),
            report.stats.dispatched,
            report.stats.succeeded
        );
        if let Some(path) = &report.figure_path {
            println!("  figure {}", path.display());
        }
        for path in &report.exports {
            println!("  export {}", path.display());
        }
    } else if args.health {
        let health = runtime.block_on(runner.check_health());
        println!("Plot service: {}", health.label());
        if health == HealthStatus::Offline && !args.serve {
            anyhow::bail!("plot service is offline");
        }
    }

    if args.serve {
        println!("Stub backend running (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
