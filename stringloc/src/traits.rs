//! Traits at the two seams of stringloc: reading/writing resource files and
//! calling a translation backend.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use crate::error::{Error, TranslateError};

/// A trait for parsing and writing string resources from/to one file.
///
/// # Example
///
/// ```rust,no_run
/// use stringloc::{ResourceDocument, traits::Parser};
/// let doc = ResourceDocument::read_from("res/values/strings.xml")?;
/// doc.write_to("res/values-fr/strings.xml")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// A leading BOM selects the decoding (UTF-8 or UTF-16); otherwise the
    /// bytes pass through as UTF-8.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(BufReader::new(Cursor::new(bytes)))
    }
}

/// A text-to-text translation backend.
///
/// Implementations receive one segment at a time: never empty, never containing
/// the two-character `\n` escape. Failures are reported per call and never retried
/// by the caller.
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        segment: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError>;
}

impl<F> Translator for F
where
    F: Fn(&str, &str, &str) -> Result<String, TranslateError> + Send + Sync,
{
    fn translate(
        &self,
        segment: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        self(segment, source_lang, target_lang)
    }
}
