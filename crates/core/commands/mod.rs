use std::{fmt::Write, future::Future, path::PathBuf};

use crate::{file, interact};

use coverart::{Config, Cover, Page};

use clap::Subcommand;
use eyre::{eyre, Context};
use log::{info, trace};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Look up the cover of every book on the page and write it into the page
    ///
    /// Books without an ISBN are left as they are. When no output file is given the page is
    /// written back to the file it was read from, in interact mode only after confirming.
    Enrich {
        /// Write the enriched page to this file instead
        #[clap(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },

    /// List the books found on the page without looking anything up
    Scan,

    /// Look up the cover of a single ISBN
    #[clap(arg_required_else_help = true)]
    Lookup {
        /// The ISBN to search for
        isbn: String,
    },
}

impl Commands {
    pub fn execute(
        self,
        file_name: Option<PathBuf>,
        config: &Config,
        interact: bool,
    ) -> eyre::Result<String> {
        match self {
            Commands::Enrich { output } => {
                let mut html_file = file::open_html_file(file_name)?;
                let mut page = Page::parse(&html_file.read()?);

                let issued = block_on(coverart::enrich(&mut page, config))??;
                let html = page.html();

                if let Some(output) = output {
                    trace!("Writing the page to '{}'", output.display());
                    file::write_html_to(&output, &html)?;
                } else {
                    let prompt = format!("Overwrite '{}'?", html_file.path().display());
                    if interact && !interact::user_confirm(prompt)? {
                        return Ok("Page left unchanged".to_owned());
                    }
                    trace!("Updating the page file..");
                    html_file.write(&html)?;
                }

                info!("Done!");
                Ok(format!("{issued} cover lookups issued"))
            }
            Commands::Scan => {
                let mut html_file = file::open_html_file(file_name)?;
                let page = Page::parse(&html_file.read()?);
                let entries = page.scan(&config.selectors()?);

                let mut message = format!("{} books found", entries.len());
                for (n, entry) in entries.iter().enumerate() {
                    let line = match entry.isbn() {
                        Some(isbn) => write!(message, "\n{:>3}. {isbn}", n + 1),
                        None => write!(message, "\n{:>3}. no ISBN - skipped", n + 1),
                    };
                    line.map_err(|e| eyre!("Cannot format book listing: {e}"))?;
                }
                Ok(message)
            }
            Commands::Lookup { isbn } => {
                let cover = block_on(coverart::lookup(&isbn, config))?;
                Ok(describe(&cover))
            }
        }
    }
}

fn describe(cover: &Cover) -> String {
    match cover.src() {
        Some(src) => format!("src: {src}\nalt: {}", cover.alt()),
        None => format!("alt: {}", cover.alt()),
    }
}

fn block_on<F: Future>(future: F) -> eyre::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to start the async runtime")?;

    Ok(runtime.block_on(future))
}

#[test]
fn describe_found_and_fallback_covers() {
    let found = Cover::Found {
        thumbnail: "http://books.google.com/cover.jpg".to_owned(),
        title: Some("Code Complete".to_owned()),
    };

    assert_eq!(
        "src: http://books.google.com/cover.jpg\nalt: Code Complete Cover",
        describe(&found)
    );
    assert_eq!("alt: Error loading cover art.", describe(&Cover::Failed));
}
