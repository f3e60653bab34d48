use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "crxget")]
#[command(version)]
#[command(about = "Download Chrome extension CRX packages and unpack them", long_about = None)]
#[command(after_help = "Examples:\n  \
  crxget cfhdojbkjhnklbpkdaibdccddilifddb          download into ./cfhdojbk.../\n  \
  crxget -d ~/extensions aapbdbdomjkkjkaonfhkkikfgjllcleb   unpack under ~/extensions\n  \
  crxget -q id1 id2                                fetch two extensions quietly")]
pub struct Cli {
    /// Extension IDs to download (from the Web Store URL)
    #[arg(value_name = "EXTENSION_ID", required = true)]
    pub extension_ids: Vec<String>,

    /// Directory to unpack into (one subdirectory per extension)
    #[arg(short = 'd', long = "dir", value_name = "DIR", default_value = ".")]
    pub dir: String,

    /// Browser version to report to the update service
    #[arg(long, value_name = "VERSION")]
    pub prodversion: Option<String>,

    /// Quiet mode: only print the final summary
    #[arg(short = 'q')]
    pub quiet: bool,
}
