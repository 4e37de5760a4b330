//! CLI command handlers that bridge CLI arguments to library operations
//!
//! This module contains the implementation of all CLI commands, providing
//! a clean separation between CLI argument parsing and core library
//! operations. Output goes to stdout unless `--in-place` asks for an atomic
//! rewrite of the manifest file.

use crate::cli_bin::args::*;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use opsmith::io::{read_bytes, write_atomic};
use opsmith::{
    ops_from_bytes, EvaluateOpts, Node, Op, Pointer, ServiceDeployment, Template, Variables,
};
use std::path::Path;

/// Dispatch a parsed command
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Get(args) => get_command(args),
        Commands::Set(args) => set_command(args),
        Commands::Interpolate(args) => interpolate_command(args),
        Commands::Sync(args) => sync_command(args),
    }
}

/// Execute the get command
pub fn get_command(args: GetArgs) -> Result<()> {
    debug!("get {} from {}", args.path, args.manifest.display());

    let manifest = read_manifest(&args.manifest)?;
    let value = opsmith::get_path(&manifest, &args.path).context("failed to evaluate get path")?;

    println!("{}", value);
    Ok(())
}

/// Execute the set command
pub fn set_command(args: SetArgs) -> Result<()> {
    debug!("set {} in {}", args.path, args.manifest.display());

    let manifest = read_manifest(&args.manifest)?;
    let value = parse_yaml_argument(&args.value)
        .with_context(|| format!("failed to parse value {:?}", args.value))?;

    let updated =
        opsmith::set_path(&manifest, &args.path, value).context("failed to evaluate set path")?;

    emit(&args.manifest, &updated, &args.write)
}

/// Execute the interpolate command
pub fn interpolate_command(args: InterpolateArgs) -> Result<()> {
    debug!(
        "interpolate {} with {} ops file(s)",
        args.manifest.display(),
        args.ops_files.len()
    );

    let manifest = read_manifest(&args.manifest)?;

    let mut op_list = Vec::new();
    for file in &args.ops_files {
        let bytes = read_bytes(file)
            .with_context(|| format!("failed to read ops file {}", file.display()))?;
        let ops = ops_from_bytes(&bytes).with_context(|| {
            format!("failed to create ops from definitions in {}", file.display())
        })?;
        op_list.extend(ops);
    }

    let mut variables = Variables::new();
    for file in &args.vars_files {
        load_vars_file(&mut variables, file)?;
    }
    for pair in &args.vars {
        let (name, raw) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("--var {:?} must be NAME=VALUE", pair))?;
        let value = parse_yaml_argument(raw)
            .with_context(|| format!("failed to parse value of variable {:?}", name))?;
        variables.insert(name, value);
    }

    let opts = match &args.path {
        Some(path) => EvaluateOpts {
            post_op: Some(Op::Find {
                path: Pointer::parse(path)?,
            }),
            unescaped_multiline: true,
        },
        None => EvaluateOpts::default(),
    };

    let evaluated = Template::new(manifest)
        .evaluate(&variables, &op_list, opts)
        .context("failed to evaluate template")?;

    if args.path.is_some() {
        println!("{}", String::from_utf8_lossy(&evaluated).trim());
        return Ok(());
    }

    emit(&args.manifest, &evaluated, &args.write)
}

/// Execute the sync command
pub fn sync_command(args: SyncArgs) -> Result<()> {
    debug!(
        "sync {} from {}",
        args.manifest.display(),
        args.deployment.display()
    );

    let manifest = read_manifest(&args.manifest)?;
    let record = read_bytes(&args.deployment)
        .with_context(|| format!("failed to read deployment file {}", args.deployment.display()))
        .and_then(|bytes| {
            ServiceDeployment::from_bytes(&bytes).context("failed to parse deployment record")
        })?;

    let updated = opsmith::update_from_service_deployment(&manifest, &record)
        .context("failed to sync deployment fields")?;

    emit(&args.manifest, &updated, &args.write)
}

fn read_manifest(path: &Path) -> Result<Vec<u8>> {
    read_bytes(path).with_context(|| format!("failed to read manifest {}", path.display()))
}

/// Parse a CLI-supplied value as YAML, so `3`, `[a, b]`, and `{k: v}` all
/// come through typed
fn parse_yaml_argument(text: &str) -> Result<Node> {
    Ok(Node::from_bytes(text.as_bytes())?)
}

fn load_vars_file(variables: &mut Variables, path: &Path) -> Result<()> {
    let bytes =
        read_bytes(path).with_context(|| format!("failed to read vars file {}", path.display()))?;
    let node = Node::from_bytes(&bytes)
        .with_context(|| format!("failed to parse vars file {}", path.display()))?;

    match node {
        Node::Mapping(entries) => {
            for (name, value) in entries {
                variables.insert(name, value);
            }
            Ok(())
        }
        Node::Null => Ok(()),
        other => bail!(
            "vars file {} must contain a mapping, found {}",
            path.display(),
            other.type_name()
        ),
    }
}

fn emit(path: &Path, content: &[u8], write: &WriteArgs) -> Result<()> {
    if write.in_place {
        write_atomic(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("updated {}", path.display());
    } else {
        print!("{}", String::from_utf8_lossy(content));
    }
    Ok(())
}
