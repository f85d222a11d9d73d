//! Translation requests: `\n` segment splitting and the Google web backend.

use lazy_static::lazy_static;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::Regex;
use reqwest::blocking::Client;
use tracing::debug;

use crate::{
    error::{Error, TranslateError},
    traits::Translator,
};

/// The two-character escape Android uses for a line break inside a string.
pub const SEGMENT_SEPARATOR: &str = "\\n";

/// Mobile endpoint of Google Translate.
pub const GOOGLE_WEB_ENDPOINT: &str = "https://translate.google.com/m";

const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/126.0 Mobile Safari/537.36";

/// Markers that open the translated text in the mobile result page.
const RESULT_MARKERS: [&str; 2] = ["class=\"result-container\">", "class=\"t0\">"];
const RESULT_END: &str = "</div>";

lazy_static! {
    static ref SPLIT_POSITIONAL_REGEX: Regex =
        Regex::new(r"%\s+(\d+)\s*\$\s*([ds])").expect("valid positional repair regex");
    static ref SPLIT_SIMPLE_REGEX: Regex = Regex::new(r"%\s+([ds])").expect("valid repair regex");
}

/// Translates `text` segment by segment.
///
/// The text is split on the literal `\n` escape; blank segments are kept as they
/// are and every other segment goes to `translator` on its own. The results are
/// joined with the same separator, so the segment count never changes. Any
/// failing segment fails the whole text.
pub fn translate_segmented<T: Translator + ?Sized>(
    translator: &T,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslateError> {
    let segments = text
        .split(SEGMENT_SEPARATOR)
        .map(|segment| {
            if segment.trim().is_empty() {
                Ok(segment.to_string())
            } else {
                translator.translate(segment, source_lang, target_lang)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(segments.join(SEGMENT_SEPARATOR))
}

/// Scrapes the Google Translate mobile page. Blocking, no retries.
#[derive(Debug, Clone)]
pub struct GoogleWebTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleWebTranslator {
    pub fn new() -> Result<Self, Error> {
        Self::with_endpoint(GOOGLE_WEB_ENDPOINT)
    }

    /// Sends requests to `endpoint` instead of the public page.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(TranslateError::Http)?;
        Ok(GoogleWebTranslator {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Translator for GoogleWebTranslator {
    fn translate(
        &self,
        segment: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        debug!(target_lang, source_lang, segment, "requesting translation");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("hl", target_lang), ("sl", source_lang), ("q", segment)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }
        parse_response(&response.text()?)
    }
}

/// Extracts the translation from a result page and turns it into resource text.
pub fn parse_response(body: &str) -> Result<String, TranslateError> {
    let start = RESULT_MARKERS
        .iter()
        .find_map(|marker| body.find(marker).map(|pos| pos + marker.len()))
        .ok_or(TranslateError::EmptyResponse)?;
    let rest = &body[start..];
    let end = rest.find(RESULT_END).unwrap_or(rest.len());

    let text = repair_placeholders(&rest[..end]);
    let text = text.trim();
    if text.is_empty() {
        return Err(TranslateError::EmptyResponse);
    }

    // The result page is HTML, so named entities such as `&nbsp;` appear too.
    let text = unescape_with(text, resolve_html5_entity)
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| text.to_string());
    Ok(escape_apostrophes(&text))
}

/// Rejoins placeholders the backend split apart (`% 1 $ s`, `% s`).
pub fn repair_placeholders(text: &str) -> String {
    let text = SPLIT_POSITIONAL_REGEX.replace_all(text, " %${1}$$${2}");
    SPLIT_SIMPLE_REGEX.replace_all(&text, " %${1}").into_owned()
}

/// Escapes every apostrophe as `\'`, leaving already escaped ones alone.
pub fn escape_apostrophes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut escaped = false;
    for ch in text.chars() {
        if ch == '\'' && !escaped {
            out.push('\\');
        }
        escaped = ch == '\\' && !escaped;
        out.push(ch);
    }
    out
}
