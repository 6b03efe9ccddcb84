//! Switches that reproduce quirks of the legacy integration.

/// How the client picks the `nonce` field for each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonceMode {
    /// Starts at the construction timestamp and increments on every request.
    #[default]
    PerRequest,
    /// Sends the construction timestamp on every request.
    Fixed,
}

/// Wire-level compatibility with the legacy integration.
///
/// The default sends the corrected field names. [`Compat::legacy`] restores
/// the original request bytes for integrations that depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Compat {
    /// Write `dateTo` under the `dateFrom` key, overwriting any `dateFrom`.
    pub collapse_date_range: bool,
    /// Send the success URL as `"success_url "` (with a trailing space).
    pub padded_success_url: bool,
}

impl Compat {
    pub fn legacy() -> Self {
        Self {
            collapse_date_range: true,
            padded_success_url: true,
        }
    }

    pub(crate) fn date_to_key(&self) -> &'static str {
        if self.collapse_date_range {
            "dateFrom"
        } else {
            "dateTo"
        }
    }

    pub(crate) fn success_url_key(&self) -> &'static str {
        if self.padded_success_url {
            "success_url "
        } else {
            "success_url"
        }
    }
}
