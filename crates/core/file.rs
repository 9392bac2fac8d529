use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, Write},
    path::{Path, PathBuf},
};

use eyre::{eyre, Context};
use glob::glob;
use log::trace;

const HTML_EXT: &str = "html";

/// An HTML page opened for reading and writing.
#[allow(clippy::module_name_repetitions)]
pub struct HtmlFile {
    path: PathBuf,
    file: File,
}

impl HtmlFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&mut self) -> eyre::Result<String> {
        let mut content = String::new();
        self.file
            .read_to_string(&mut content)
            .wrap_err_with(|| format!("Cannot read contents of '{}'", self.path.display()))
            .map(move |_| content)
    }

    pub fn write(&mut self, html: &str) -> eyre::Result<()> {
        overwrite_file_from_start(&mut self.file, html.as_bytes())
            .wrap_err_with(|| format!("Cannot write the page to '{}'", self.path.display()))
    }
}

fn overwrite_file_from_start(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    // Rewind the cursor back to the start of the file to write over the contents and set
    // the length of the file to be equal to bytes so that existing data is removed
    file.rewind()?;
    file.set_len(bytes.len() as u64)?;
    file.write_all(bytes)
}

pub fn open_html_file(file_name: Option<PathBuf>) -> eyre::Result<HtmlFile> {
    if let Some(path) = file_name {
        trace!("opening {} as an HTML page", path.display());
        open_file_by_name(&path)
    } else {
        trace!("Searching current directory for any .{HTML_EXT} files");
        find_html_file_in_directory(".")
    }
}

pub fn write_html_to(path: &Path, html: &str) -> eyre::Result<()> {
    std::fs::write(path, html)
        .wrap_err_with(|| format!("Cannot write the page to '{}'", path.display()))
}

#[inline]
fn open_file_for_read_and_write(path: &Path) -> eyre::Result<HtmlFile> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map(|file| HtmlFile {
            path: path.to_owned(),
            file,
        })
        .wrap_err_with(|| {
            format!(
                "Failed to open the '{}' file for reading and writing.",
                path.display()
            )
        })
}

fn open_file_by_name(path: &Path) -> eyre::Result<HtmlFile> {
    if path.extension().is_some() {
        open_file_for_read_and_write(path)
    } else {
        open_file_for_read_and_write(&path.with_extension(HTML_EXT))
    }
}

fn find_html_file_in_directory<P>(dir: P) -> eyre::Result<HtmlFile>
where
    P: AsRef<Path>,
{
    let path = dir.as_ref();
    if !path.is_dir() {
        return Err(eyre!("Path entered is not a directory"));
    }

    let pattern = format!("{}/*.{HTML_EXT}", path.to_string_lossy());

    let mut iter = glob(&pattern).wrap_err("Cannot build a search pattern for this directory")?;

    let path_buf = iter
        .next()
        .ok_or_else(|| {
            eyre!(
                "No .{HTML_EXT} file found in the '{}' directory",
                path.display()
            )
        })?
        .wrap_err("Cannot determine a file path - Do you have the correct permissions?")?;

    if iter.next().is_some() {
        return Err(eyre!(
            "More than one .{HTML_EXT} file found - use the --file option to select one"
        ));
    }

    open_file_for_read_and_write(path_buf.as_path())
}
