//! Binary entry point for cxt.
//!
//! This binary provides the CLI interface for the cxt context-file manager.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow terminal output in the main binary
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use cxt::cli::{self, OutputFormat};
use cxt::config::CxtConfig;
use cxt::git::RepoContext;
use cxt::models::{PlanStyle, SyncOptions};
use cxt::services::{ContentValidator, PlanSynchronizer};
use cxt::storage::FilesystemStore;
use cxt::{hooks, observability};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// cxt - Git-tracked context files for AI coding assistants.
#[derive(Parser)]
#[command(name = "cxt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root (defaults to the enclosing git repository).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Scaffold .cxt/ with starter context files.
    Init,

    /// Sync plan.md with the checked-out branch.
    Sync {
        /// Skip the dirty-plan guard (for git hooks and automation).
        #[arg(long)]
        silent: bool,

        /// Style for a newly created plan: blank or template.
        #[arg(long)]
        style: Option<String>,

        /// Do not create a plan when the branch has no snapshot.
        #[arg(long)]
        no_create: bool,
    },

    /// Quick health summary of the context files.
    Status {
        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Full health check, including staleness.
    Validate {
        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Apply automatic fixes for fixable issues.
    Heal {
        /// Show what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage per-branch plan snapshots.
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Manage git hooks.
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Plan snapshot subcommands.
#[derive(Subcommand)]
enum PlanAction {
    /// List branches with saved snapshots.
    List,
    /// Move a branch's snapshot into the completed archive.
    Archive {
        /// Branch name (raw, not sanitized).
        branch: String,
    },
}

/// Hook subcommands.
#[derive(Subcommand)]
enum HookAction {
    /// Install post-checkout and post-merge sync hooks.
    Install {
        /// Overwrite hooks cxt did not write.
        #[arg(long)]
        force: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::init(cli.verbose);

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Resolves the project root: explicit flag, else the enclosing repository
/// workdir, else the current directory.
fn resolve_root(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root);
    }
    if let Ok(workdir) = RepoContext::from_cwd().and_then(|repo| repo.workdir()) {
        return Ok(workdir);
    }
    Ok(std::env::current_dir()?)
}

/// Runs the selected command.
fn run_command(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "cxt", &mut std::io::stdout());
        return Ok(());
    }

    let root = resolve_root(cli.root)?;
    let config = CxtConfig::load_for_root(&root);
    let store = FilesystemStore::new();
    let repo = RepoContext::new(&root);

    match cli.command {
        Commands::Init => cmd_init(&config, &repo),

        Commands::Sync {
            silent,
            style,
            no_create,
        } => cmd_sync(config, repo, silent, style, no_create),

        Commands::Status { format } => cmd_health(config, store, true, &format),

        Commands::Validate { format } => cmd_health(config, store, false, &format),

        Commands::Heal { dry_run } => cmd_heal(config, store, dry_run),

        Commands::Plan { action } => cmd_plan(config, repo, action),

        Commands::Hook { action } => cmd_hook(&config, action),

        Commands::Completions { .. } => Ok(()),
    }
}

/// Init command.
fn cmd_init(config: &CxtConfig, repo: &RepoContext) -> anyhow::Result<()> {
    use cxt::git::BranchSource;

    let branch = repo
        .current_branch()
        .unwrap_or_else(|_| config.fallback_branch.clone());
    let created = cli::cmd_init(config, &FilesystemStore::new(), &branch)?;

    if created.is_empty() {
        println!("Nothing to do: .cxt/ is already set up.");
    } else {
        for name in created {
            println!("Created .cxt/{name}");
        }
        println!("Next: fill in the starter sections, then run `cxt hook install`.");
    }
    Ok(())
}

/// Sync command.
fn cmd_sync(
    config: CxtConfig,
    repo: RepoContext,
    silent: bool,
    style: Option<String>,
    no_create: bool,
) -> anyhow::Result<()> {
    let synchronizer = PlanSynchronizer::new(config, repo, FilesystemStore::new());
    let options = SyncOptions {
        silent,
        create_if_missing: !no_create,
        style: style.as_deref().map(PlanStyle::parse),
    };

    let result = cli::cmd_sync(&synchronizer, &options)?;
    let mut stdout = std::io::stdout();
    cli::write_sync_result(&mut stdout, &result)?;
    Ok(())
}

/// Status and validate commands.
fn cmd_health(
    config: CxtConfig,
    store: FilesystemStore,
    quick: bool,
    format: &str,
) -> anyhow::Result<()> {
    let format: OutputFormat = format.parse()?;
    let validator = ContentValidator::new(config, store);
    validator.ensure_initialized()?;
    let status = validator.check_disk(quick)?;

    let mut stdout = std::io::stdout();
    match format {
        OutputFormat::Text => cli::write_health_text(&mut stdout, &status)?,
        OutputFormat::Json => cli::write_health_json(&mut stdout, &status)?,
    }

    stdout.flush()?;
    Ok(())
}

/// Heal command.
fn cmd_heal(config: CxtConfig, store: FilesystemStore, dry_run: bool) -> anyhow::Result<()> {
    let validator = ContentValidator::new(config, store);
    validator.ensure_initialized()?;

    let descriptions = cli::cmd_heal(&validator, dry_run)?;
    if descriptions.is_empty() {
        println!("Nothing to heal.");
    } else {
        let verb = if dry_run { "Would fix" } else { "Fixed" };
        for description in descriptions {
            println!("{verb}: {description}");
        }
    }
    Ok(())
}

/// Plan subcommands.
fn cmd_plan(config: CxtConfig, repo: RepoContext, action: PlanAction) -> anyhow::Result<()> {
    let synchronizer = PlanSynchronizer::new(config, repo, FilesystemStore::new());

    match action {
        PlanAction::List => {
            let keys = cli::cmd_plan_list(&synchronizer)?;
            if keys.is_empty() {
                println!("No saved branch plans.");
            } else {
                for key in keys {
                    println!("{key}");
                }
            }
        },
        PlanAction::Archive { branch } => {
            if cli::cmd_plan_archive(&synchronizer, &branch)? {
                println!("Archived the plan for '{branch}'.");
            } else {
                println!("No saved plan for '{branch}'.");
            }
        },
    }
    Ok(())
}

/// Hook subcommands.
fn cmd_hook(config: &CxtConfig, action: HookAction) -> anyhow::Result<()> {
    match action {
        HookAction::Install { force } => {
            let git_dir = hooks::git_dir_for(&config.root);
            if !git_dir.exists() {
                anyhow::bail!("no .git directory at {}", config.root.display());
            }

            let outcomes = hooks::install_hooks(&FilesystemStore::new(), &git_dir, force)?;
            for outcome in outcomes {
                match outcome {
                    hooks::HookInstall::Installed(name) => println!("Installed {name}"),
                    hooks::HookInstall::Refreshed(name) => println!("Refreshed {name}"),
                    hooks::HookInstall::SkippedForeign(name) => {
                        println!("Skipped {name}: existing hook was not written by cxt (use --force)");
                    },
                }
            }
        },
    }
    Ok(())
}
