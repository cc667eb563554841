use clap::Parser;
use watchdog::cli::{
    check, failover, handle_completions, handle_config_init, handle_config_show, Cli, Commands,
    ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => watchdog::cli::run::run_watchdog(args).await,
        Commands::Check(args) => match check::handle_check(&args).await {
            Ok(report) => {
                println!("{}", check::format_check(&report, args.json));
                if !report.healthy {
                    std::process::exit(1);
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Failover(args) => match failover::handle_failover(&args).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
            ConfigCommands::Show(args) => handle_config_show(&args).map(|output| {
                println!("{}", output);
            }),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
