mod functions;
mod pipelines;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tributary_client::{ClientConfig, HttpRunClient, RunClient, Submitter};
use tributary_compiler::Compiler;
use tributary_component_registry::{ComponentManifest, ComponentRegistry, FsComponentRegistry};
use tributary_component::Operation;
use tributary_package::PipelinePackage;
use tributary_task_runtime::{FunctionRegistry, LaunchArgs, Launcher};

use crate::functions::builtin_registry;
use crate::pipelines::{PIPELINE_NAMES, PIPELINE_OPERATIONS, builtin_pipeline};

/// Tributary - wrap functions as container steps and run them as pipelines
#[derive(Parser)]
#[command(name = "tributary")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.tributary)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Orchestration service URL, overriding the config file
  #[arg(long, global = true)]
  host: Option<String>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile a built-in pipeline into a package file
  Compile {
    /// Pipeline name
    pipeline: String,

    /// Where to write the package
    #[arg(long, short)]
    output: PathBuf,

    /// Image the pipeline's steps run in
    #[arg(long)]
    image: Option<String>,

    /// Use the latest saved components instead of the built-in functions
    #[arg(long, conflicts_with = "image")]
    from_store: bool,
  },

  /// Submit a pipeline run
  Submit {
    /// Built-in pipeline name
    pipeline: Option<String>,

    /// Submit a compiled package instead of a built-in pipeline
    #[arg(long, conflicts_with = "pipeline")]
    package: Option<PathBuf>,

    #[arg(long)]
    run_name: String,

    /// Experiment name (default from config)
    #[arg(long)]
    experiment: Option<String>,

    /// Pipeline argument as KEY=VALUE
    #[arg(long = "arg", value_parser = parse_key_value)]
    args: Vec<(String, String)>,

    /// Image the pipeline's steps run in
    #[arg(long)]
    image: Option<String>,

    /// Use the latest saved components instead of the built-in functions
    #[arg(long, conflicts_with_all = ["image", "package"])]
    from_store: bool,
  },

  /// Show a run's status
  Status { run_id: String },

  /// Run a built-in function inside a step container
  Exec {
    function: String,

    #[command(flatten)]
    args: LaunchArgs,
  },

  /// Manage saved components
  Components {
    #[command(subcommand)]
    command: ComponentsCommand,
  },
}

#[derive(Subcommand)]
enum ComponentsCommand {
  /// Save a built-in function as a component
  Save {
    function: String,

    /// Component name (default: the function name)
    #[arg(long)]
    name: Option<String>,

    #[arg(long, default_value = "1.0.0")]
    version: String,

    #[arg(long)]
    image: Option<String>,
  },

  /// List saved components
  List,

  /// Print a saved component's manifest
  Show {
    name: String,

    /// Version (default: latest)
    #[arg(long)]
    version: Option<String>,
  },

  /// Remove a saved component version
  Remove { name: String, version: String },
}

fn main() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".tributary"),
  };

  let Some(command) = cli.command else {
    println!("tributary - use --help to see available commands");
    return Ok(());
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(command, data_dir, cli.host).await })
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}

async fn run(command: Commands, data_dir: PathBuf, host: Option<String>) -> Result<()> {
  debug!(data_dir = %data_dir.display(), "starting");
  let functions = builtin_registry().context("failed to register built-in functions")?;
  let registry = FsComponentRegistry::new(data_dir.join("components"));

  match command {
    Commands::Compile {
      pipeline,
      output,
      image,
      from_store,
    } => {
      let store = from_store.then_some(&registry);
      let operations = resolve_operations(&functions, store, image.as_deref()).await?;
      compile(&operations, &pipeline, &output).await
    }
    Commands::Submit {
      pipeline,
      package,
      run_name,
      experiment,
      args,
      image,
      from_store,
    } => {
      let config = load_config(&data_dir, host).await?;
      let package = match (pipeline, package) {
        (_, Some(path)) => PipelinePackage::read_from(&path)
          .await
          .with_context(|| format!("failed to read package: {}", path.display()))?,
        (Some(name), None) => {
          let store = from_store.then_some(&registry);
          let operations = resolve_operations(&functions, store, image.as_deref()).await?;
          compile_builtin(&operations, &name)?
        }
        (None, None) => bail!("either a pipeline name or --package is required"),
      };
      let experiment = experiment.unwrap_or_else(|| config.default_experiment.clone());
      let arguments: BTreeMap<String, String> = args.into_iter().collect();

      let submitter = Submitter::new(HttpRunClient::new(&config));
      let handle = submitter
        .submit(&package, &experiment, &run_name, &arguments)
        .await
        .context("failed to submit run")?;

      println!("{}", serde_json::to_string_pretty(&handle)?);
      Ok(())
    }
    Commands::Status { run_id } => {
      let config = load_config(&data_dir, host).await?;
      let detail = HttpRunClient::new(&config)
        .get_run(&run_id)
        .await
        .with_context(|| format!("failed to fetch run '{}'", run_id))?;

      println!("{}", serde_json::to_string_pretty(&detail)?);
      Ok(())
    }
    Commands::Exec { function, args } => {
      let outcome = Launcher::new(functions)
        .run(&function, &args)
        .await
        .with_context(|| format!("function '{}' failed", function))?;

      for (name, value) in outcome.outputs {
        println!("{}: {}", name, value);
      }
      Ok(())
    }
    Commands::Components { command } => {
      match command {
        ComponentsCommand::Save {
          function,
          name,
          version,
          image,
        } => {
          let operation = functions.operation(&function, image.as_deref())?;
          let manifest = ComponentManifest::new(name.unwrap_or(function), version, operation);
          let stored = registry
            .save(manifest)
            .await
            .context("failed to save component")?;

          eprintln!(
            "Saved {}@{} to {}",
            stored.manifest.name,
            stored.manifest.version,
            stored.component_dir.display()
          );
          Ok(())
        }
        ComponentsCommand::List => {
          for manifest in registry.list().await.context("failed to list components")? {
            println!(
              "{}@{}\t{}",
              manifest.name,
              manifest.version,
              manifest.description.as_deref().unwrap_or("")
            );
          }
          Ok(())
        }
        ComponentsCommand::Show { name, version } => {
          let Some(stored) = registry
            .get(&name, version.as_deref())
            .await
            .context("failed to read component")?
          else {
            bail!("component '{}' not found", name);
          };

          println!("{}", serde_json::to_string_pretty(&stored.manifest)?);
          Ok(())
        }
        ComponentsCommand::Remove { name, version } => {
          registry
            .remove(&name, &version)
            .await
            .with_context(|| format!("failed to remove {}@{}", name, version))?;

          eprintln!("Removed {}@{}", name, version);
          Ok(())
        }
      }
    }
  }
}

/// Operations for the demo pipelines, from the component store when given.
async fn resolve_operations(
  functions: &FunctionRegistry,
  store: Option<&FsComponentRegistry>,
  image: Option<&str>,
) -> Result<BTreeMap<String, Operation>> {
  let mut operations = BTreeMap::new();
  for &name in PIPELINE_OPERATIONS {
    let operation = match store {
      Some(registry) => {
        let Some(stored) = registry
          .get(name, None)
          .await
          .with_context(|| format!("failed to load component '{}'", name))?
        else {
          bail!(
            "component '{}' is not saved (use `tributary components save {}`)",
            name,
            name
          );
        };
        debug!(name, version = %stored.manifest.version, "using saved component");
        stored.manifest.operation
      }
      None => functions.operation(name, image)?,
    };
    operations.insert(name.to_string(), operation);
  }
  Ok(operations)
}

async fn compile(
  operations: &BTreeMap<String, Operation>,
  pipeline: &str,
  output: &Path,
) -> Result<()> {
  let package = compile_builtin(operations, pipeline)?;
  package
    .write_to(output)
    .await
    .with_context(|| format!("failed to write package: {}", output.display()))?;

  eprintln!(
    "Compiled '{}' ({} tasks) to {}",
    package.name,
    package.tasks.len(),
    output.display()
  );
  Ok(())
}

fn compile_builtin(operations: &BTreeMap<String, Operation>, name: &str) -> Result<PipelinePackage> {
  let Some(pipeline) = builtin_pipeline(name, operations)? else {
    bail!(
      "unknown pipeline '{}' (available: {})",
      name,
      PIPELINE_NAMES.join(", ")
    );
  };

  Compiler::new()
    .compile_pipeline(pipeline.as_ref())
    .with_context(|| format!("failed to compile pipeline '{}'", name))
}

async fn load_config(data_dir: &Path, host: Option<String>) -> Result<ClientConfig> {
  let path = data_dir.join("config.json");
  let mut config = ClientConfig::load(&path)
    .await
    .with_context(|| format!("failed to load config: {}", path.display()))?;

  if let Some(host) = host {
    config.host = host;
  }
  Ok(config)
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
  let (key, value) = s
    .split_once('=')
    .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
  if key.is_empty() {
    return Err(format!("empty key in '{}'", s));
  }
  Ok((key.to_string(), value.to_string()))
}
