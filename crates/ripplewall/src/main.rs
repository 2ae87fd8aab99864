mod cli;
mod paths;
mod run;
mod script;
mod trace;

use anyhow::Result;
use cli::Command;
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Command::Run(args) => run::run(args),
        Command::Export(args) => run::export(args),
        Command::Trace(args) => trace::trace(args),
        Command::Where => run_where(),
    }
}

fn run_where() -> Result<()> {
    let paths = AppPaths::discover()?;
    let scene_file = paths.scene_file();
    println!("Configuration directories:");
    println!("  config:     {}", paths.config_dir().display());
    println!(
        "  scene:      {}{}",
        scene_file.display(),
        if scene_file.exists() { "" } else { " (missing)" }
    );
    Ok(())
}
