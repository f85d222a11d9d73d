//! Option resolution: CLI flags over an optional TOML file over defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use stringloc::locale::{default_output_root, discover_locales, parse_locale_list};
use stringloc::{Locale, RunConfig};
use tracing::debug;

use crate::validation::{
    ValidationContext, validate_context, validate_language_code, validate_locale_list,
};

/// Options shared by `translate` and `validate`.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// The source strings.xml, usually res/values/strings.xml
    #[arg(short, long)]
    pub input: String,

    /// Folder holding the values-<locale> folders [default: grandparent of the input]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Comma-separated locale folder suffixes, e.g. "fr,de,pt-rBR" [default: discovered]
    #[arg(short, long)]
    pub locales: Option<String>,

    /// Number of locales processed in parallel [default: 5]
    #[arg(short = 'p', long)]
    pub workers: Option<usize>,

    /// Language of the source file [default: en]
    #[arg(long)]
    pub source_lang: Option<String>,

    /// TOML file providing defaults for these options
    #[arg(long)]
    pub config: Option<String>,
}

/// Contents of a `--config` file.
///
/// ```toml
/// source_lang = "en"
/// workers = 8
/// locales = ["fr", "de"]
/// output = "app/src/main/res"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub run: RunConfig,
    pub locales: Vec<String>,
    pub output: Option<PathBuf>,
}

/// Everything a command needs once options are resolved.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    pub input: PathBuf,
    pub output_root: PathBuf,
    pub locales: Vec<Locale>,
    pub config: RunConfig,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Resolves the options of one command. Every error here is a usage error.
pub fn resolve_run(args: &RunArgs, force: bool, verbose: bool) -> Result<ResolvedRun, String> {
    let file = match args.config {
        Some(ref path) => load_file_config(Path::new(path))?,
        None => FileConfig::default(),
    };

    let mut context = ValidationContext::new().with_input_file(args.input.clone());
    if let Some(ref output) = args.output {
        context = context.with_output_root(output.clone());
    }
    if let Some(ref locales) = args.locales {
        context = context.with_locales(locales.clone());
    }
    if let Some(ref lang) = args.source_lang {
        context = context.with_source_lang(lang.clone());
    }
    validate_context(&context)?;

    let input = PathBuf::from(&args.input);
    let output_root = resolve_output_root(&input, args.output.as_deref(), file.output.clone());
    let locales = resolve_locales(&input, &output_root, args.locales.as_deref(), &file.locales)?;

    let source_lang = args
        .source_lang
        .clone()
        .unwrap_or_else(|| file.run.source_lang.clone());
    validate_language_code(&source_lang)?;

    let config = RunConfig {
        source_lang,
        force: force || file.run.force,
        verbose: verbose || file.run.verbose,
        workers: args.workers.unwrap_or(file.run.workers),
    };
    debug!(?config, root = %output_root.display(), "resolved run");

    Ok(ResolvedRun {
        input,
        output_root,
        locales,
        config,
    })
}

fn resolve_output_root(input: &Path, flag: Option<&str>, from_file: Option<PathBuf>) -> PathBuf {
    let root = flag
        .map(PathBuf::from)
        .or(from_file)
        .unwrap_or_else(|| default_output_root(input));
    if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root
    }
}

fn resolve_locales(
    input: &Path,
    output_root: &Path,
    flag: Option<&str>,
    from_file: &[String],
) -> Result<Vec<Locale>, String> {
    if let Some(list) = flag {
        return validate_locale_list(list);
    }
    if !from_file.is_empty() {
        return parse_locale_list(&from_file.join(",")).map_err(|e| e.to_string());
    }

    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("Input path ({}) has no file name", input.display()))?;
    let discovered = discover_locales(output_root, file_name).map_err(|e| {
        format!(
            "Cannot scan {} for locale folders: {}",
            output_root.display(),
            e
        )
    })?;
    if discovered.is_empty() {
        return Err(
            "Couldn't find any locale to process and none was given with --locales".to_string(),
        );
    }
    Ok(discovered)
}
