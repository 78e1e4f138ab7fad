mod cli;
mod container;
mod logging;
mod runner;
mod target;
#[cfg(test)]
mod testutil;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
