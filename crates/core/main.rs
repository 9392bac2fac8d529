#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{error, path::PathBuf, process};

mod commands;
mod file;
mod interact;

use commands::Commands;

use coverart::{
    config::{DEFAULT_BOOK_SELECTOR, DEFAULT_ISBN_ATTRIBUTE, DEFAULT_PLACEHOLDER_SELECTOR},
    Config, GOOGLE_BOOKS_ENDPOINT,
};

use clap::{Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{}", err);
        process::exit(2);
    }
}

fn try_main() -> Result<(), Box<dyn error::Error>> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                file,
                interact,
                verbosity,
                quiet,
                scan,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    // `quiet` wins over `interact`
    let interact = interact && !quiet;

    if interact {
        trace!("Interact mode enabled");
    }

    let config = Config::from(scan);
    let message = command.execute(file, &config, interact)?;

    if !quiet {
        println!("{message}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<(), Box<dyn error::Error>> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new()
        .module(module_path!())
        .verbosity(verbosity)
        .init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "coverart")]
#[clap(about = "Fill in the cover art of the books listed on an HTML page using Google Books")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// The HTML page to read
    ///
    /// When not given the current directory is searched for a single .html file.
    #[clap(short, long, parse(from_os_str), global = true)]
    file: Option<PathBuf>,

    /// Enables interactive mode, which asks before the page is overwritten.
    #[clap(short, long, global = true)]
    interact: bool,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,

    #[clap(flatten)]
    scan: ScanOpts,
}

#[derive(Debug, Args)]
struct ScanOpts {
    /// CSS selector of the elements marked as books
    #[clap(long = "book", default_value = DEFAULT_BOOK_SELECTOR, global = true)]
    book_selector: String,

    /// Attribute of a book element holding its ISBN
    #[clap(long, default_value = DEFAULT_ISBN_ATTRIBUTE, global = true)]
    isbn_attr: String,

    /// CSS selector of the cover image inside a book element
    #[clap(long = "thumbnail", default_value = DEFAULT_PLACEHOLDER_SELECTOR, global = true)]
    placeholder_selector: String,

    /// The catalog endpoint, queried as `{endpoint}?q=isbn:{isbn}`
    #[clap(long, default_value = GOOGLE_BOOKS_ENDPOINT, global = true)]
    endpoint: String,
}

impl From<ScanOpts> for Config {
    fn from(opts: ScanOpts) -> Self {
        Self {
            endpoint: opts.endpoint,
            book_selector: opts.book_selector,
            isbn_attribute: opts.isbn_attr,
            placeholder_selector: opts.placeholder_selector,
        }
    }
}
