use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sver::build_info::Info;
use sver::cli::{run_tags, run_version, TagsArgs, VersionArgs};
use sver::config::{self, Config};
use sver::domain::SemverGrammar;
use sver::git::GitCommand;
use sver::registry::{Credentials, RegistryClient};
use sver::resolver::VersionResolver;
use sver::ui;

#[derive(Parser)]
#[command(
    name = "sver",
    about = "Prints the semantic version of a git checkout"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short,
        long,
        value_name = "KIND",
        help = "Prints the next version. Possible values are 'major', 'minor' or 'patch'."
    )]
    next: Option<String>,

    #[arg(short = 'm', long, help = "Only prints the major version. Fails if version is a development version.")]
    major_only: bool,

    #[arg(short = 'r', long, help = "Only prints the major and minor versions. Fails if version is a development version.")]
    minor_only: bool,

    #[arg(short, long, help = "Add the 'v' prefix to the output version.")]
    prefix: bool,

    #[command(flatten)]
    resolve: ResolveFlags,
}

#[derive(Args, Debug, Clone)]
struct ResolveFlags {
    #[arg(
        long,
        env = "PRE_RELEASE",
        value_name = "IDENTIFIER",
        help = "Adds a pre release identifier to the version."
    )]
    pre_release: Option<String>,

    #[arg(long = "release", help = "Fail if this is a dev, pre-release or dirty version.")]
    release_only: bool,

    #[arg(short, long, help = "Ignore a dirty repository.")]
    force: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the tags that should be pushed to a docker registry
    ///
    /// Connects to a docker registry and lists all tags for an image.
    /// Depending on whether the current version is a development version and
    /// if it's the latest one, it returns the appropriate tags to be pushed.
    Tags {
        /// Image name, e.g. aserto-dev/sver
        image: String,

        #[arg(short, long, help = "Registry server to connect to.")]
        server: Option<String>,

        #[arg(short, long, help = "Username for the registry.")]
        user: Option<String>,

        #[arg(short, long, env = "REGISTRY_PASSWORD", hide_env_values = true, help = "Password for the registry.")]
        password: Option<String>,

        #[arg(long, help = "Add the 'v' prefix to the output tags.")]
        prefix: bool,

        #[command(flatten)]
        resolve: ResolveFlags,
    },
    /// Print version and exit
    Version,
}

fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let resolver = VersionResolver::new(
        GitCommand::new(config.git.binary.clone(), "."),
        SemverGrammar::new()?,
    );

    match cli.command {
        None => {
            let args = VersionArgs {
                next: cli.next,
                pre_release: cli.resolve.pre_release,
                major_only: cli.major_only,
                minor_only: cli.minor_only,
                release_only: cli.resolve.release_only,
                force: cli.resolve.force,
            };
            let version = run_version(&resolver, &args)?;
            ui::display_lines(&[version], cli.prefix);
        }
        Some(Command::Tags {
            image,
            server,
            user,
            password,
            prefix,
            resolve,
        }) => {
            let registry = registry_client(&config, server, user, password)?;
            let args = TagsArgs {
                image,
                pre_release: resolve.pre_release,
                release_only: resolve.release_only,
                force: resolve.force,
            };
            let tags = run_tags(&resolver, &registry, &args)?;
            ui::display_lines(&tags, prefix);
        }
        Some(Command::Version) => {
            println!("sver {}", Info::current());
        }
    }

    Ok(())
}

/// Command line values win over the configuration file
fn registry_client(
    config: &Config,
    server: Option<String>,
    user: Option<String>,
    password: Option<String>,
) -> Result<RegistryClient> {
    let server = server.unwrap_or_else(|| config.registry.server.clone());
    let credentials = Credentials::from_parts(
        user.or_else(|| config.registry.username.clone()),
        password.or_else(|| config.registry.password.clone()),
    );

    Ok(RegistryClient::new(&server, credentials)?)
}
