use clap::Parser;
use miette::Result;

use bomx::cli::Cli;
use bomx::core::Config;
use bomx::logging;

fn main() -> Result<()> {
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
    let config = Config::load(cli.global.config.as_deref())?;
    logging::init(&logging::filter_for_verbosity(
        &config.log_level,
        cli.global.verbose,
    ));

    bomx::cli::dispatch(cli, &config)
}
