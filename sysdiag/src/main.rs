use clap::{Arg, ArgAction, Command};
use sysdiag_console::{App, Console, Remediator, StdinConfirm};
use sysdiag_core::{
    config::CliConfig, CancelToken, Config, HttpReasoningService, MetricsCollector,
};
use std::{
    io::{stdout, IsTerminal},
    path::PathBuf,
    process,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = Command::new("sysdiag")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Threshold-triggered system monitor with AI-assisted diagnosis")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("cpu-threshold")
                .long("cpu-threshold")
                .value_name("PCT")
                .help("Escalate when CPU usage exceeds this percentage")
                .value_parser(clap::value_parser!(f32)),
        )
        .arg(
            Arg::new("memory-threshold")
                .long("memory-threshold")
                .value_name("PCT")
                .help("Escalate when memory usage exceeds this percentage")
                .value_parser(clap::value_parser!(f32)),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .value_name("N")
                .help("Number of snapshots kept and sent for diagnosis")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("tick")
                .long("tick")
                .value_name("SECS")
                .help("Seconds to wait between cycles")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("URL")
                .help("OpenAI-compatible chat completions endpoint"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("NAME")
                .help("Model used for diagnosis"),
        )
        .arg(
            Arg::new("no-clear")
                .long("no-clear")
                .help("Do not clear the screen between status lines")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-remediation")
                .long("allow-remediation")
                .help("Offer to kill the diagnosed process after confirmation")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let cli_config = CliConfig {
        cpu_threshold: matches.get_one::<f32>("cpu-threshold").copied(),
        memory_threshold: matches.get_one::<f32>("memory-threshold").copied(),
        history_len: matches.get_one::<usize>("history").copied(),
        tick_secs: matches.get_one::<u64>("tick").copied(),
        endpoint: matches.get_one::<String>("endpoint").cloned(),
        model: matches.get_one::<String>("model").cloned(),
        no_clear: matches.get_flag("no-clear"),
        allow_remediation: matches.get_flag("allow-remediation"),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load(Some(&cli_config), matches.get_one::<PathBuf>("config"))?;

    log::info!(
        "Starting with CPU > {}%, memory > {}%, history {}, tick {}s, model {}",
        config.thresholds.cpu_percent,
        config.thresholds.memory_percent,
        config.history_len,
        config.tick_secs,
        config.reasoning.model
    );

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())?;

    let source = MetricsCollector::new(&config)?;
    let service = HttpReasoningService::new(&config.reasoning)?;

    let mut stdout = stdout();
    let console = Console::new(config.clear_screen, stdout.is_terminal());
    let allow_remediation = config.allow_remediation;

    let mut app = App::new(config, source, service, console);
    if allow_remediation {
        log::warn!("Remediation enabled; proposed kills will be offered for confirmation");
        app = app.with_remediator(Remediator::new(Box::new(StdinConfirm), cancel.clone()));
    }

    app.run(&mut stdout, &cancel)?;
    Ok(())
}
