//! Command line interface

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::debug;

use crate::{Config, CrdResolver};

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("k8s-crd-resolver")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Resolve $ref references in Kubernetes CustomResourceDefinition schemas")
            .arg(
                Arg::new("remove-descriptions")
                    .short('r')
                    .long("remove-descriptions")
                    .help("Remove object descriptions from referenced resources to reduce size")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("jsonpatch")
                    .short('j')
                    .long("jsonpatch")
                    .help("JSON patch to apply on the resolved CRD")
                    .value_name("FILE"),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .help("Configuration file path")
                    .value_name("FILE"),
            )
            .arg(
                Arg::new("max-depth")
                    .long("max-depth")
                    .help("Maximum length of a chain of nested references")
                    .value_name("N")
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("no-remote")
                    .long("no-remote")
                    .help("Do not fetch http(s) references")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("source")
                    .help("Source (\"-\" for stdin)")
                    .required(true),
            )
            .arg(
                Arg::new("destination")
                    .help("Destination (\"-\" for stdout)")
                    .required(true),
            )
    }

    /// Run the CLI application
    pub fn run(matches: &ArgMatches) -> Result<()> {
        let config = Self::config(matches)?;
        debug!("Effective configuration: {:?}", config);

        let source = required(matches, "source")?;
        let destination = required(matches, "destination")?;

        CrdResolver::new(config)?.run(source, destination)?;
        Ok(())
    }

    /// Build the configuration from the optional config file and flags
    pub fn config(matches: &ArgMatches) -> Result<Config> {
        let mut config = match matches.get_one::<String>("config") {
            Some(path) => Config::from_file(&PathBuf::from(path))?,
            None => Config::default(),
        };

        if matches.get_flag("remove-descriptions") {
            config.remove_descriptions = true;
        }
        if let Some(path) = matches.get_one::<String>("jsonpatch") {
            config.jsonpatch = Some(PathBuf::from(path));
        }
        if let Some(max_depth) = matches.get_one::<usize>("max-depth") {
            config.resolver.max_depth = *max_depth;
        }
        if matches.get_flag("no-remote") {
            config.resolver.allow_remote = false;
        }

        Ok(config)
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing argument <{name}>"))
}
