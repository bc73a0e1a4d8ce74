//! Print the OpenAPI document as JSON or YAML.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use social_backend::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(about = "Print the social backend OpenAPI document")]
struct Args {
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let rendered = match args.format {
        Format::Json => doc.to_pretty_json()?,
        Format::Yaml => doc.to_yaml()?,
    };
    println!("{rendered}");
    Ok(())
}
