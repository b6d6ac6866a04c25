use clap::Parser;
use miette::Result;
use baskit::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    baskit::core::logging::init(global.verbose);

    match cli.command {
        Commands::Init(args) => baskit::cli::commands::init::run(args),
        Commands::Sup(cmd) => baskit::cli::commands::sup::run(cmd, &global),
        Commands::Match(args) => baskit::cli::commands::matching::run(args, &global),
        Commands::Demand(cmd) => baskit::cli::commands::demand::run(cmd, &global),
        Commands::So(cmd) => baskit::cli::commands::so::run(cmd, &global),
        Commands::Transfer(cmd) => baskit::cli::commands::transfer::run(cmd, &global),
        Commands::Po(cmd) => baskit::cli::commands::po::run(cmd, &global),
        Commands::Loyalty(cmd) => baskit::cli::commands::loyalty::run(cmd, &global),
        Commands::Partner(cmd) => baskit::cli::commands::partner::run(cmd, &global),
        Commands::Config(cmd) => baskit::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => baskit::cli::commands::completions::run(args),
    }
}
