//! # chatarchive CLI
//!
//! Command-line interface for the chatarchive library.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatarchive::cli::Args;
use chatarchive::config::ArchiveConfig;
use chatarchive::media::MediaIndex;
use chatarchive::merge::merge_exports;
use chatarchive::parser::ExportParser;
use chatarchive::render::{PostProcessor, group_runs, render_page};
use chatarchive::toc::TocData;
use chatarchive::{ArchiveError, Message};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ArchiveError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    println!("🗂  chatarchive v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    if let Some(ref second) = args.second_input {
        println!("📂 Second:  {}", second);
    }
    if let Some(ref toc) = args.toc {
        println!("📑 TOC:     {}", toc);
    }
    if let Some(ref media) = args.media_dir {
        println!("🖼  Media:   {}", media);
    }
    println!("💾 Output:  {}", args.output);
    println!();

    let config = ArchiveConfig::default();
    let parser = ExportParser::with_config(config.clone());

    let mut media = match args.media_dir {
        Some(ref dir) => {
            println!("⏳ Indexing media files...");
            let index = MediaIndex::scan(Path::new(dir))?;
            println!("   {} files indexed", index.len());
            index
        }
        None => MediaIndex::new(),
    };

    println!("⏳ Parsing export...");
    let parse_start = Instant::now();
    let messages: Vec<Message> = match args.second_input {
        Some(ref second) => {
            let left = parser.parse(Path::new(&args.input))?;
            let right = parser.parse(Path::new(second))?;
            println!(
                "   Found {} + {} messages ({:.2}s)",
                left.len(),
                right.len(),
                parse_start.elapsed().as_secs_f64()
            );
            println!("🔀 Merging exports...");
            merge_exports(left, right, &mut media, &config)?
        }
        None if args.media_dir.is_some() => {
            parser.parse_with_media(Path::new(&args.input), &mut media)?
        }
        None => parser.parse(Path::new(&args.input))?,
    };
    println!("   {} messages total", messages.len());

    let toc = match args.toc {
        Some(ref path) => TocData::load(Path::new(path))?,
        None => TocData::default(),
    };

    println!("📝 Rendering HTML...");
    let runs = group_runs(messages);
    let basename = Path::new(&args.input)
        .file_name()
        .map_or_else(|| args.input.clone(), |n| n.to_string_lossy().into_owned());
    let page = render_page(&runs, &toc, &basename, chrono::Local::now().naive_local());
    let page = PostProcessor::new(&config).process(&page);
    fs::write(&args.output, page)?;

    println!();
    println!(
        "✅ Done! Archive saved to {} ({:.2}s)",
        args.output,
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}
