mod cli;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, RunArgs};
use reframe_av::{
    tools, CommandBuilder, OutputDir, ProcessRunner, RunOutcome, RunnerSettings, TranscodeOptions,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reframe=trace,reframe_av=trace".to_string()
        } else {
            "reframe=info,reframe_av=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Run(args) => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_file(args, cli.config.as_deref()))
        }
        Commands::CheckTools => check_tools(),
        Commands::Version => {
            println!("reframe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_file(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    // Load config
    let config = config::load_config_or_default(config_path)?;

    // Verify input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", args.input);
    }

    tracing::info!("Processing file: {:?}", args.input);

    // Command-line choices override the configured defaults
    let resolution = match args.resolution {
        Some(ref s) => s.parse()?,
        None => config.defaults.resolution,
    };
    let aspect = match args.aspect {
        Some(ref s) => s.parse()?,
        None => config.defaults.aspect,
    };
    let format = match args.format {
        Some(ref s) => s.parse()?,
        None => config.defaults.format,
    };

    let output_name = match args.output {
        Some(name) => name,
        None => args
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    if output_name.trim().is_empty() {
        anyhow::bail!("Output name is empty");
    }

    let mut options = TranscodeOptions::new(&args.input, output_name);
    options.resolution = resolution;
    options.aspect = aspect;
    options.format = format;

    let outputs = OutputDir::create(&config.output.dir)?;

    let base_dir = std::env::current_dir()?;
    let ffmpeg = tools::locate_ffmpeg(&base_dir, config.tools.ffmpeg_path.as_deref());

    let builder = CommandBuilder::new(ffmpeg);
    let invocation = builder.build(&options, &outputs)?;

    // The output path is always the final argument of the built command
    let output_path = invocation.args().last().cloned().unwrap_or_default();

    println!("Executing command: {invocation}");

    if args.dry_run {
        println!("\n[DRY RUN] Command not executed");
        return Ok(());
    }

    let settings = RunnerSettings {
        wait_timeout: Duration::from_secs(
            args.timeout_secs.unwrap_or(config.runner.wait_timeout_secs),
        ),
        kill_on_timeout: args.kill_on_timeout || config.runner.kill_on_timeout,
    };
    let wait_timeout = settings.wait_timeout;
    let runner = ProcessRunner::with_settings(settings);

    let outcome: Arc<Mutex<Option<RunOutcome>>> = Arc::new(Mutex::new(None));
    let outcome_slot = Arc::clone(&outcome);

    let handle = runner.run(
        invocation,
        |line| println!("{line}"),
        move |result| {
            *outcome_slot.lock().unwrap() = Some(result);
        },
    )?;
    handle.join().await;

    let outcome = outcome
        .lock()
        .unwrap()
        .take()
        .ok_or_else(|| anyhow::anyhow!("conversion finished without reporting an outcome"))?;

    if outcome.timed_out {
        println!(
            "\nffmpeg did not finish within {}s; gave up waiting.",
            wait_timeout.as_secs()
        );
        println!("The conversion may still complete in the background.");
        return Ok(());
    }

    match outcome.status {
        Some(status) if status.success() => {
            println!("\nProcessing complete!");
            println!("Output saved to: {output_path}");
            Ok(())
        }
        Some(status) => anyhow::bail!("ffmpeg exited abnormally: {status}"),
        None => anyhow::bail!("ffmpeg could not be reaped after launch"),
    }
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tool = tools::check_ffmpeg();

    let status = if tool.available { "✓" } else { "✗" };
    print!("{} {}", status, tool.name);

    if let Some(ref version) = tool.version {
        print!(" ({version})");
    }

    if let Some(ref path) = tool.path {
        print!(" - {}", path.display());
    }

    println!();

    println!();
    if tool.available {
        println!("All required tools are available!");
    } else {
        println!("ffmpeg was not found. Install it to enable conversions.");
    }

    Ok(())
}
