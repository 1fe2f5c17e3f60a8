use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thumbnailify::imaging::RustBackend;
use thumbnailify::{config, output, site};

#[derive(Parser)]
#[command(name = "thumbnailify")]
#[command(about = "Linked thumbnails for static sites")]
#[command(long_about = "\
Linked thumbnails for static sites

Pages reference images with a one-argument tag:

  {% t foo.png %}

which is replaced by a link to the full image wrapping a 160x240 thumbnail:

  <a class=\"image\" href=\"/images/foo.png\"><img src=\"/images/foo_t.png\" /></a>

Site structure:

  site/
  ├── config.toml          # Optional: images_directory, images_css_class, ...
  ├── index.html           # Pages (.html .htm .md .markdown .txt) get tags expanded
  ├── _drafts/             # Leading _ or . = skipped
  └── images/
      └── foo.png          # foo_t.png is generated next to it in the output

An invalid filename or a missing image is reported in the page itself.
A corrupt image aborts the build.

Run 'thumbnailify gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory (default: `destination` from config.toml, inside the source)
    #[arg(long, global = true)]
    destination: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand every tag and write the site to the destination
    Build,
    /// Render a single tag invocation and print its output
    Render {
        /// Image filename, as written inside the tag
        filename: String,
    },
    /// Validate every tag without generating anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let backend = RustBackend::new();

    match cli.command {
        Command::Build => {
            let (site_config, destination) = load_site(&cli.source, cli.destination)?;
            init_thread_pool(&site_config.processing);
            println!(
                "==> Building {} \u{2192} {}",
                cli.source.display(),
                destination.display()
            );
            let report = site::build(&cli.source, &destination, &site_config, &backend)?;
            output::print_build_output(&report, &site_config.images_directory);
        }
        Command::Render { filename } => {
            let (site_config, destination) = load_site(&cli.source, cli.destination)?;
            let (result, written) =
                site::render_one(&cli.source, &destination, &site_config, &backend, &filename)?;
            output::print_render_output(&result, &written);
        }
        Command::Check => {
            let (site_config, _) = load_site(&cli.source, cli.destination)?;
            println!("==> Checking {}", cli.source.display());
            let checked = site::check(&cli.source, &site_config, &backend)?;
            output::print_check_output(&checked);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the site config and resolve the output directory.
///
/// An explicit `--destination` wins; otherwise the config value, relative
/// to the source.
fn load_site(
    source: &Path,
    cli_destination: Option<PathBuf>,
) -> Result<(config::SiteConfig, PathBuf), config::ConfigError> {
    let site_config = config::load_config(source)?;
    let destination = cli_destination.unwrap_or_else(|| source.join(&site_config.destination));
    Ok((site_config, destination))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Never more threads than available cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
