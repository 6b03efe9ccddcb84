//! API routes.

/// Production API base URL.
pub const API_URL: &str = "https://api.freekassa.ru/v1/";

/// Named API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Balance,
    Orders,
    CreateOrder,
    Withdrawals,
    WithdrawalCurrencies,
    CreateWithdrawal,
    Currencies,
    CurrencyStatus,
    Shops,
}

impl Route {
    /// Returns the path template, relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Orders => "orders",
            Self::CreateOrder => "orders/create",
            Self::Withdrawals => "withdrawals",
            Self::WithdrawalCurrencies => "withdrawals/currencies",
            Self::CreateWithdrawal => "withdrawals/create",
            Self::Currencies => "currencies",
            Self::CurrencyStatus => "currencies/%id%/status",
            Self::Shops => "shops",
        }
    }

    /// Builds the absolute URL, replacing every `%key%` token with its value.
    ///
    /// `base` must end with `/`. Tokens without a binding are left untouched.
    pub fn url(&self, base: &str, params: &[(&str, String)]) -> String {
        substitute(&format!("{}{}", base, self.path()), params)
    }
}

/// Replaces every `%key%` occurrence in `template` with the bound value.
pub fn substitute(template: &str, params: &[(&str, String)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("%{}%", key), value)
        })
}
