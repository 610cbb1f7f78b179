use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Profile free, English-language apps in the Google Play and App Store
/// listing exports to pick a genre worth building for.
#[derive(Parser, Debug)]
#[command(name = "app-market-survey", version)]
pub struct Cli {
    /// Google Play export (googleplaystore.csv)
    #[arg(long, default_value = "googleplaystore.csv")]
    pub google: PathBuf,

    /// App Store export (AppleStore.csv)
    #[arg(long, default_value = "AppleStore.csv")]
    pub apple: PathBuf,

    /// Rows to show after each cleaning stage (0 hides the previews)
    #[arg(long, default_value_t = 3)]
    pub preview: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Also list every app of this category / genre (repeatable)
    #[arg(long = "drill", value_name = "GROUP")]
    pub drill: Vec<String>,
}
