//! Environment-driven settings for the import binary.

use tagihan_core::UserId;
use tagihan_import::ImportOptions;

pub const CREATE_MISSING_VAR: &str = "TAGIHAN_CREATE_MISSING";
pub const IMPORT_AS_DRAFT_VAR: &str = "TAGIHAN_IMPORT_AS_DRAFT";
pub const CSV_DELIMITER_VAR: &str = "TAGIHAN_CSV_DELIMITER";
pub const CSV_HAS_HEADER_VAR: &str = "TAGIHAN_CSV_HAS_HEADER";
pub const USER_ID_VAR: &str = "TAGIHAN_USER_ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub options: ImportOptions,
    pub user_id: UserId,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source. Unset variables keep their
    /// defaults; unreadable ones are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ImportOptions::default();

        let options = ImportOptions {
            create_missing_entities: flag(&lookup, CREATE_MISSING_VAR, defaults.create_missing_entities),
            import_as_draft: flag(&lookup, IMPORT_AS_DRAFT_VAR, defaults.import_as_draft),
            delimiter: lookup(CSV_DELIMITER_VAR)
                .map(|raw| {
                    parse_delimiter(&raw).unwrap_or_else(|| {
                        tracing::warn!(value = %raw, "{CSV_DELIMITER_VAR} is not a single ASCII character; using ','");
                        defaults.delimiter
                    })
                })
                .unwrap_or(defaults.delimiter),
            has_header: flag(&lookup, CSV_HAS_HEADER_VAR, defaults.has_header),
        };

        let user_id = match lookup(USER_ID_VAR) {
            Some(raw) => raw.parse::<UserId>().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "{USER_ID_VAR} is invalid; using a generated user id");
                UserId::new()
            }),
            None => {
                tracing::warn!("{USER_ID_VAR} not set; using a generated user id");
                UserId::new()
            }
        };

        Self { options, user_id }
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    match lookup(name) {
        Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
            tracing::warn!(value = %raw, "{name} is not a boolean; using {default}");
            default
        }),
        None => default,
    }
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A single ASCII character, or `tab` / `\t` for a tab.
pub fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw {
        "tab" | "\\t" | "\t" => Some(b'\t'),
        _ => match raw.as_bytes() {
            [byte] if byte.is_ascii() => Some(*byte),
            _ => None,
        },
    }
}
