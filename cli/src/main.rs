use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use registrygen_pipeline::{
    AllDocsRequest, DocsRequest, GeneratorConfig, GitHubClient, MetadataRequest,
    OutlineGenerator, ReqwestClient, check_version, generate_all_docs, generate_docs,
    generate_metadata,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_REGISTRY_PACKAGES_PATH: &str = "../registry/themes/default/data/registry/packages/";
const DEFAULT_DOCS_OUT_DIR: &str = "content/registry/packages";
const DEFAULT_PACKAGE_TREE_OUT_DIR: &str = "static/registry/packages/navs";

#[derive(Debug, Parser)]
#[command(name = "registrygen")]
#[command(about = "Generate package registry metadata and API docs from provider schemas")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the registry metadata file for a package.
    Metadata(MetadataArgs),
    /// Generate API docs and the navigation tree for a package.
    Docs(DocsArgs),
    /// Generate API docs for every package in a registry checkout.
    AllDocs(AllDocsArgs),
    /// Compare a package's latest GitHub release with the registry version.
    Pkgversion(PkgversionArgs),
}

#[derive(Debug, Args)]
struct MetadataArgs {
    /// Repository slug, e.g. pulumi/pulumi-aws.
    #[arg(long)]
    repo_slug: String,
    /// Release tag of the package, e.g. v4.12.0.
    #[arg(long)]
    version: String,
    /// Schema path relative to the repository root.
    #[arg(long)]
    schema_file: String,
    /// Read the schema from a local file instead of downloading it.
    #[arg(long)]
    schema_path: Option<PathBuf>,
    /// Category key override, e.g. cloud or database.
    #[arg(long)]
    category: Option<String>,
    /// Publisher display name override.
    #[arg(long)]
    publisher: Option<String>,
    /// Title override.
    #[arg(long)]
    title: Option<String>,
    /// Mark the package as a component.
    #[arg(long)]
    component: bool,
    /// Output directory for the metadata file.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Release timestamp (RFC 3339) instead of the GitHub tag date.
    #[arg(long)]
    updated_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
struct DocsArgs {
    /// Repository slug, e.g. pulumi/pulumi-aws.
    #[arg(long)]
    repo_slug: String,
    /// Release tag of the package.
    #[arg(long)]
    version: String,
    /// Schema path relative to the repository root.
    #[arg(long)]
    schema_file: String,
    /// Directory the docs are written to. Cleared first.
    #[arg(long)]
    docs_out_dir: PathBuf,
    /// Directory the package tree JSON file is written to.
    #[arg(long)]
    package_tree_json_out_dir: PathBuf,
    /// Raw-content host for schema downloads.
    #[arg(long)]
    host: Option<String>,
    /// Read the schema from a local file instead of downloading it.
    #[arg(long)]
    schema_path: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct AllDocsArgs {
    /// Directory of registry metadata files.
    #[arg(long, default_value = DEFAULT_REGISTRY_PACKAGES_PATH)]
    registry_packages_path: PathBuf,
    /// Base directory; each package goes to <dir>/<package>/api-docs.
    #[arg(long, default_value = DEFAULT_DOCS_OUT_DIR)]
    docs_out_dir: PathBuf,
    /// Directory the package tree JSON files are written to.
    #[arg(long, default_value = DEFAULT_PACKAGE_TREE_OUT_DIR)]
    package_tree_json_out_dir: PathBuf,
    /// Raw-content host for schema downloads.
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Args)]
struct PkgversionArgs {
    /// GitHub owner or organization, e.g. pulumi.
    #[arg(short, long)]
    owner: String,
    /// GitHub repository, e.g. pulumi-aws.
    #[arg(short, long)]
    repo: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Command::Metadata(args) => run_metadata(&config, args),
        Command::Docs(args) => run_docs(&config, args),
        Command::AllDocs(args) => run_all_docs(&config, args),
        Command::Pkgversion(args) => run_pkgversion(&config, args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig, String> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            GeneratorConfig::load(path).map_err(|err| err.to_string())
        }
        None => Ok(GeneratorConfig::default()),
    }
}

fn http_client(config: &GeneratorConfig) -> Result<ReqwestClient, String> {
    config.http_client().map_err(|err| err.to_string())
}

fn run_metadata(config: &GeneratorConfig, args: MetadataArgs) -> Result<(), String> {
    let http = http_client(config)?;
    let github = GitHubClient::from_env(&http, &config.github_api_url);

    let req = MetadataRequest {
        repo_slug: args.repo_slug,
        version: args.version,
        schema_file: args.schema_file,
        schema_path: args.schema_path,
        host: config.host.clone(),
        category: args.category,
        publisher: args.publisher,
        title: args.title,
        component: args.component,
        out_dir: args
            .out_dir
            .unwrap_or_else(|| config.metadata_out_dir.clone()),
        updated_on: args.updated_on,
    };
    let outcome = generate_metadata(&http, &github, &req).map_err(|err| err.to_string())?;

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "Wrote metadata for {} {} to {}",
        outcome.meta.name,
        outcome.meta.version,
        outcome.path.display()
    );
    Ok(())
}

fn run_docs(config: &GeneratorConfig, args: DocsArgs) -> Result<(), String> {
    let http = http_client(config)?;
    let req = DocsRequest {
        repo: args.repo_slug,
        version: args.version,
        schema_file: args.schema_file,
        schema_path: args.schema_path,
        host: args.host.unwrap_or_else(|| config.host.clone()),
        docs_out_dir: args.docs_out_dir,
        package_tree_out_dir: args.package_tree_json_out_dir,
    };
    let outcome = generate_docs(&http, &config.overlay_set(), &OutlineGenerator, &req)
        .map_err(|err| err.to_string())?;

    println!(
        "Generated {} doc pages for {} ({})",
        outcome.files.len(),
        outcome.package,
        outcome.tree_path.display()
    );
    Ok(())
}

fn run_all_docs(config: &GeneratorConfig, args: AllDocsArgs) -> Result<(), String> {
    let http = http_client(config)?;
    let req = AllDocsRequest {
        registry_packages_path: args.registry_packages_path,
        docs_out_dir: args.docs_out_dir,
        package_tree_out_dir: args.package_tree_json_out_dir,
        host: args.host.unwrap_or_else(|| config.host.clone()),
    };
    let outcomes = generate_all_docs(&http, &config.overlay_set(), &OutlineGenerator, &req)
        .map_err(|err| err.to_string())?;

    println!("Generated docs for {} packages", outcomes.len());
    Ok(())
}

fn run_pkgversion(config: &GeneratorConfig, args: PkgversionArgs) -> Result<(), String> {
    let http = http_client(config)?;
    let github = GitHubClient::from_env(&http, &config.github_api_url);
    let check = check_version(&http, &github, &config.registry_raw_url, &args.owner, &args.repo)
        .map_err(|err| err.to_string())?;

    println!("{check}");
    if check.is_outdated() {
        println!("Registry is behind the latest release");
    }
    Ok(())
}
