//! Command dispatch: load, pack, and print

use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, ChartConfig};
use crate::domain::{
    augment, pack, ring, Camera, Hierarchy, NodeId, PackedTree, TransitionSpeed,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Layout { file, json }) => layout(file, *json),
        Some(Commands::Tree { file }) => tree(file),
        Some(Commands::Zoom {
            file,
            focus,
            slow,
            steps,
        }) => zoom(file, focus, *slow, *steps),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => config_show(),
            ConfigCommands::Path => config_path(),
        },
        Some(Commands::Info) => info(),
        Some(Commands::Completion { shell }) => completion(*shell),
        None => Ok(()),
    }
}

/// Load the active config, read and validate the hierarchy file, and pack it.
#[instrument]
fn load_chart(file: &Path) -> CliResult<(ChartConfig, PackedTree)> {
    let config = ChartConfig::load()?;
    let input = fs::read_to_string(file).map_err(|source| CliError::Input {
        path: file.to_path_buf(),
        source,
    })?;
    let hierarchy = Hierarchy::from_json_str(&input, &config.pie_source_field)?;
    let packed = pack(&hierarchy, &config)?;
    debug!(nodes = packed.len(), "chart loaded");
    Ok((config, packed))
}

#[instrument]
fn layout(file: &Path, json: bool) -> CliResult<()> {
    let (config, packed) = load_chart(file)?;
    let sectors = augment(&packed);

    if json {
        output::info(&serde_json::to_string_pretty(&sectors)?);
        return Ok(());
    }

    let camera = Camera::new(&packed, &config);
    let k = camera.view().scale(config.diameter);
    output::header(&format!(
        "{:<24} {:>5} {:>9} {:>9} {:>8} {:>8} {:>8} {:>8}",
        "node", "slice", "x", "y", "r", "inner", "start", "end"
    ));
    for sector in &sectors {
        let bounds = ring(sector, k, config.ring_thickness);
        output::info(&format!(
            "{:<24} {:>5} {:>9.2} {:>9.2} {:>8.2} {:>8.2} {:>8.3} {:>8.3}",
            sector.name,
            sector.slice,
            sector.x,
            sector.y,
            bounds.outer_radius,
            bounds.inner_radius,
            sector.start_angle,
            sector.end_angle,
        ));
    }
    Ok(())
}

#[instrument]
fn tree(file: &Path) -> CliResult<()> {
    let (_, packed) = load_chart(file)?;
    output::info(&to_tree_string(&packed, packed.root()));
    Ok(())
}

/// Recursively render the packed tree with termtree.
fn to_tree_string(packed: &PackedTree, id: NodeId) -> Tree<String> {
    let node = packed.node(id);
    let label = format!(
        "{} (weight={}, r={:.2})",
        node.name, node.weight, node.circle.r
    );
    let leaves: Vec<_> = node
        .children
        .iter()
        .map(|&child| to_tree_string(packed, child))
        .collect();
    Tree::new(label).with_leaves(leaves)
}

#[instrument]
fn zoom(file: &Path, focus: &str, slow: bool, steps: usize) -> CliResult<()> {
    if steps == 0 {
        return Err(CliError::InvalidArgs("--steps must be at least 1".into()));
    }
    let (config, packed) = load_chart(file)?;
    let target = packed
        .find(focus)
        .ok_or_else(|| CliError::InvalidArgs(format!("no node named '{}'", focus)))?;

    let speed = if slow {
        TransitionSpeed::Slow
    } else {
        TransitionSpeed::Normal
    };
    let duration = if slow {
        config.transition_duration_slow
    } else {
        config.transition_duration_normal
    };

    let mut camera = Camera::new(&packed, &config);
    camera.select_focus(&packed, target, speed)?;

    output::header(&format!(
        "{:>8} {:>10} {:>10} {:>10} {:>8}",
        "elapsed", "cx", "cy", "viewport", "k"
    ));
    let dt = duration / steps as f64;
    for step in 1..=steps {
        let view = camera.advance(dt);
        output::info(&format!(
            "{:>8.1} {:>10.2} {:>10.2} {:>10.2} {:>8.3}",
            dt * step as f64,
            view.cx,
            view.cy,
            view.diameter,
            view.scale(config.diameter),
        ));
    }

    // Land exactly on the target view if sampling fell short of the duration.
    if camera.is_transitioning() {
        camera.advance(dt);
    }

    output::action("focus", &packed.node(camera.focus()).name);
    let visible: Vec<&str> = packed
        .iter()
        .filter(|(_, node)| camera.label_state(node).displayed)
        .map(|(_, node)| node.name.as_str())
        .collect();
    if visible.is_empty() {
        output::detail("no labels visible (leaf focus)");
    } else {
        output::detail(&format!("visible labels: {}", visible.join(", ")));
    }
    Ok(())
}

fn config_show() -> CliResult<()> {
    let config = ChartConfig::load()?;
    output::info(&toml::to_string_pretty(&config)?);
    Ok(())
}

fn config_path() -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::info(&path.display()),
        None => output::detail("no home directory found"),
    }
    Ok(())
}

fn info() -> CliResult<()> {
    let cmd = Cli::command();
    if let Some(author) = cmd.get_author() {
        output::action("author", &author);
    }
    if let Some(version) = cmd.get_version() {
        output::action("version", &version);
    }
    if let Some(path) = global_config_path() {
        output::action("config", &path.display());
    }
    Ok(())
}

fn completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
