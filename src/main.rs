//! rdsh - interactive command shell built on repl-dispatch.

mod cli;

use cli::Cli;
use repl_dispatch::logging::{self, LogTarget};
use repl_dispatch::{CommandDescriptor, Config, Result, Shell};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();

    // The log file is named after the shell, so config comes first
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    };

    let target = logging::init(LogTarget::for_shell(&config.shell.name, cli.log_stderr));
    let _session = logging::session_span(&config.shell.name).entered();
    info!(?target, "Logging initialized");

    if let Err(e) = run(config) {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_from_file(&cli.config_path())?;
    cli.apply_to(&mut config);
    Ok(config)
}

fn run(config: Config) -> Result<()> {
    info!(
        aliases = ?config.shell.alias_file,
        interpreter = %config.shell.interpreter,
        "Starting shell"
    );
    let mut shell = Shell::new(config, ())?;
    register_builtin_commands(&mut shell)?;
    shell.run()
}

/// Commands every rdsh session has, in addition to those in the config file.
fn register_builtin_commands(shell: &mut Shell<()>) -> Result<()> {
    shell.register(
        CommandDescriptor::free("echo", "print the given text", |text: &str, _: &mut ()| {
            println!("{text}");
            Ok(())
        }),
        None,
    )?;
    shell.register(
        CommandDescriptor::single("version", "show the rdsh version", |_: &mut ()| {
            println!("rdsh {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }),
        None,
    )?;
    Ok(())
}
