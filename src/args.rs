use std::path::PathBuf;

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sort classes so that each class comes after the classes it depends on.
///
/// Dependencies are read from `<class>.deps` files in the class directory. The
/// order of the class list is kept wherever the dependencies allow it.
#[derive(Debug, clap::Parser)]
#[command(name = NAME, version = VERSION)]
pub struct Args {
    /// Path to the config file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    /// Enable increasingly more verbose output
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Log the class list and all dependencies.
    #[arg(long, short)]
    pub debug: bool,
    /// Directory containing the dependency declarations.
    ///
    /// Defaults to the `class` directory of the config space ($FAI).
    #[arg(long)]
    pub class_dir: Option<PathBuf>,
    /// File listing the classes to sort, one per line.
    ///
    /// Defaults to `FAI_CLASSES` in the log directory ($LOGDIR).
    #[arg(long)]
    pub classes_file: Option<PathBuf>,
    /// Where to write the sorted classes.
    ///
    /// Defaults to overwriting the class list file.
    #[arg(long, short, conflicts_with = "print")]
    pub output: Option<PathBuf>,
    /// Print the sorted classes instead of writing them to a file.
    #[arg(long)]
    pub print: bool,
}
