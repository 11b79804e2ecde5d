//! Command-line interface definition using clap.

use clap::Parser;

/// Produce a browsable HTML archive of a WhatsApp conversation export.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatarchive")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatarchive -i chat.txt -o archive.html
    chatarchive -i chat.txt -o archive.html -m WhatsApp_Media
    chatarchive -i old_export.txt --second-input new_export.txt -o archive.html -m media
    chatarchive -i chat.txt --toc toc.yaml -o archive.html")]
pub struct Args {
    /// Path to the chat export text file
    #[arg(short, long)]
    pub input: String,

    /// Path of the HTML file to write
    #[arg(short, long)]
    pub output: String,

    /// Second export of the same conversation, merged into the first
    #[arg(long, value_name = "FILE")]
    pub second_input: Option<String>,

    /// YAML sidecar with title, table-of-contents entries and link list
    #[arg(long, value_name = "FILE")]
    pub toc: Option<String>,

    /// Directory containing the exported media files
    #[arg(short, long, value_name = "DIR")]
    pub media_dir: Option<String>,
}
