use clap::Parser;

const EXAMPLES: &str = "\
Examples:
  rootmkdir example.rmkd:dir
      Add the directory `dir` to the container file `example.rmkd`

  rootmkdir example.rmkd:dir1/dir2
      Add the directory `dir2` in `dir1` inside `example.rmkd`

  rootmkdir -p example.rmkd:dir1/dir2/dir3
      Make parent directories of `dir3` as needed, no error if existing

  rootmkdir example.rmkd
      Create an empty container file named `example.rmkd`";

/// Top-level CLI definition for `rootmkdir`.
#[derive(Parser, Debug)]
#[command(
    name = "rootmkdir",
    version,
    about = "Add directories in container files",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Make parent directories as needed, no error if existing.
    #[arg(short = 'p', long = "parents")]
    pub parents: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Targets of the form `container-path[:internal/dir/path]`.
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<String>,
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
