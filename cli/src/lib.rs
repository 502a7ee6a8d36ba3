use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use color_eyre::{Result, eyre::eyre};
use engine::{
    GenerationClient, GenerationError, GeneratorConfig, Style, UserMessage, ValidationErrorKind,
    ValidationPresenter,
};
use log::info;
use strum::IntoEnumIterator;

use crate::cli::{Cli, Command, Generate};

pub mod cli;

const CONFIG_FILE_NAME: &str = "illustraia.ron";

pub fn config_path() -> Result<PathBuf> {
    Ok(dirs::config_local_dir()
        .ok_or(eyre!("Couldn't get config dir"))?
        .join(CONFIG_FILE_NAME))
}

/// An explicitly named file must exist. The default location is optional.
pub fn load_generator_config(explicit: Option<&Path>) -> Result<GeneratorConfig> {
    if let Some(path) = explicit {
        return GeneratorConfig::load(path);
    }
    let path = config_path()?;
    if !path.exists() {
        Ok(GeneratorConfig::default())
    } else {
        GeneratorConfig::load(&path)
    }
}

pub fn render_message(msg: UserMessage) -> String {
    format!("{}: {}", msg.title, msg.body)
}

struct TerminalPresenter;

impl ValidationPresenter for TerminalPresenter {
    fn present_validation_error(&self, kind: ValidationErrorKind) {
        eprintln!(
            "{}",
            render_message(GenerationError::Validation(kind).user_message())
        );
    }
}

pub fn list_styles(out: &mut impl Write) -> io::Result<()> {
    for style in Style::iter() {
        writeln!(out, "{style}: {}", style.descriptor())?;
    }
    Ok(())
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Styles => {
            list_styles(&mut io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Generate(args) => generate(args).await,
    }
}

async fn generate(args: Generate) -> Result<ExitCode> {
    let config = load_generator_config(args.config.as_deref())?;
    let client =
        GenerationClient::new(config, args.api_key).with_presenter(Arc::new(TerminalPresenter));

    info!(
        "Generating illustration for \"{}\" in style {}",
        args.prompt.trim(),
        args.style
    );
    match client.generate_image(&args.prompt, &args.style).await {
        Ok(url) => {
            println!("{url}");
            Ok(ExitCode::SUCCESS)
        }
        // the presenter already told the user
        Err(e) if e.is_validation() => Ok(ExitCode::from(2)),
        Err(e) => {
            info!("Generation ended with: {e}");
            eprintln!("{}", render_message(e.user_message()));
            Ok(ExitCode::FAILURE)
        }
    }
}
