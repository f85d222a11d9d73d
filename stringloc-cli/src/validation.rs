use std::path::Path;
use stringloc::Locale;
use stringloc::locale::parse_locale_list;
use unic_langid::LanguageIdentifier;

/// Everything a command checks before any locale runs.
pub struct ValidationContext {
    pub input_file: Option<String>,
    pub output_root: Option<String>,
    pub locales: Option<String>,
    pub source_lang: Option<String>,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationContext {
    pub fn new() -> Self {
        Self {
            input_file: None,
            output_root: None,
            locales: None,
            source_lang: None,
        }
    }

    pub fn with_input_file(mut self, file: String) -> Self {
        self.input_file = Some(file);
        self
    }

    pub fn with_output_root(mut self, root: String) -> Self {
        self.output_root = Some(root);
        self
    }

    pub fn with_locales(mut self, locales: String) -> Self {
        self.locales = Some(locales);
        self
    }

    pub fn with_source_lang(mut self, lang: String) -> Self {
        self.source_lang = Some(lang);
        self
    }
}

/// Validate the input path exists and is a regular file
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("Input path ({}) doesn't exist", path));
    }

    if path_obj.is_dir() {
        return Err(format!("Input path ({}) is a directory", path));
    }

    if !path_obj.metadata().map(|m| m.is_file()).unwrap_or(false) {
        return Err(format!("Cannot read file: {}", path));
    }

    Ok(())
}

/// Validate the output root is a directory, if it already exists
pub fn validate_output_root(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if path_obj.exists() && !path_obj.is_dir() {
        return Err(format!("Output root is not a directory: {}", path));
    }

    Ok(())
}

/// Validate language code format using unic-langid (same as lib crate)
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Validate a comma-separated list of locale folder suffixes
pub fn validate_locale_list(list: &str) -> Result<Vec<Locale>, String> {
    let locales = parse_locale_list(list).map_err(|e| e.to_string())?;
    if locales.is_empty() {
        return Err("Locale list cannot be empty".to_string());
    }
    Ok(locales)
}

/// Validate a complete validation context
pub fn validate_context(context: &ValidationContext) -> Result<(), String> {
    match context.input_file {
        Some(ref input) => validate_file_path(input)?,
        None => return Err("An input file is required".to_string()),
    }

    if let Some(ref root) = context.output_root {
        validate_output_root(root)?;
    }

    if let Some(ref locales) = context.locales {
        validate_locale_list(locales)?;
    }

    if let Some(ref lang) = context.source_lang {
        validate_language_code(lang)
            .map_err(|e| format!("Source language validation failed: {}", e))?;
    }

    Ok(())
}
