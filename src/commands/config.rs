use anyhow::Result;

use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::ui;

pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Path => path(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let (config, path) = Config::load(ctx.config.as_deref())?;
    if !ctx.quiet {
        let source = if path.exists() {
            path.display().to_string()
        } else {
            format!("built-in defaults ({} not found)", path.display())
        };
        println!("# {source}");
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

fn path(ctx: &Context) -> Result<()> {
    let path = Config::location(ctx.config.as_deref())?;
    println!("{}", path.display());
    if !ctx.quiet && !path.exists() {
        ui::dim("(file does not exist; built-in defaults are used)");
    }
    Ok(())
}
