use anyhow::{Context, Result, bail};
use tracing::{debug, error, info};

use crate::cli::Cli;
use crate::container::Container;
use crate::target::TargetSpec;

/// Process every target in order. A failing target is reported and the
/// remaining ones are still attempted; the run as a whole fails if any did.
pub fn run(cli: Cli) -> Result<()> {
    let mut failures = 0usize;
    for token in &cli.targets {
        if let Err(err) = process_target(token, cli.parents) {
            error!("{token}: {err:#}");
            failures += 1;
        }
    }
    if failures > 0 {
        bail!("{failures} of {} target(s) failed", cli.targets.len());
    }
    Ok(())
}

fn process_target(token: &str, parents: bool) -> Result<()> {
    let spec = TargetSpec::parse(token)?;
    let mut container = Container::open_or_create(&spec.container)
        .with_context(|| format!("opening {}", spec.container))?;

    match &spec.path {
        Some(path) if parents => {
            let created = container.mkdir_all(path);
            debug!("{}: created {created} directories under `{path}`", spec.container);
        }
        Some(path) => {
            if container.mkdir(path)? {
                debug!("{}: created directory `{path}`", spec.container);
            } else {
                info!("{}: directory `{path}` already exists", spec.container);
            }
        }
        None => {}
    }

    container
        .save()
        .with_context(|| format!("writing {}", spec.container))
}
