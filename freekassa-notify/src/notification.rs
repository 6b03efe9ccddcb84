//! Inbound payment notifications.
//!
//! Freekassa calls the merchant's notification URL with a form-encoded
//! payload once a payment completes. The payload is trusted only if its
//! `SIGN` matches `md5("{MERCHANT_ID}:{AMOUNT}:{secret2}:{MERCHANT_ORDER_ID}")`
//! and, optionally, if it came from one of the provider's servers.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use freekassa_types::NotificationError;
use md5::{Digest, Md5};
use subtle::ConstantTimeEq;

/// Response body the provider expects for an accepted notification.
pub const SUCCESS_MARKER: &str = "YES";

/// Addresses Freekassa sends notifications from.
pub const NOTIFICATION_IPS: [Ipv4Addr; 4] = [
    Ipv4Addr::new(168, 119, 157, 136),
    Ipv4Addr::new(168, 119, 60, 227),
    Ipv4Addr::new(138, 201, 88, 124),
    Ipv4Addr::new(178, 154, 197, 79),
];

/// Marker for provider-echoed custom fields.
const CUSTOM_FIELD_MARKER: &str = "us_";

/// Returns true if `ip` is a Freekassa notification server.
///
/// IPv4-mapped IPv6 addresses are compared by their IPv4 form.
pub fn is_notification_ip(ip: IpAddr) -> bool {
    let v4 = match ip {
        IpAddr::V4(v4) => v4,
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => v4,
            None => return false,
        },
    };
    NOTIFICATION_IPS.contains(&v4)
}

/// Computes the notification signature as lowercase hex.
pub fn notification_signature(
    shop_id: &str,
    amount: &str,
    secret2: &str,
    payment_id: &str,
) -> String {
    let text = format!("{}:{}:{}:{}", shop_id, amount, secret2, payment_id);
    hex::encode(Md5::digest(text.as_bytes()))
}

/// A parsed notification, checked once and then dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Notification {
    /// `MERCHANT_ID`
    pub shop_id: Option<String>,
    /// `AMOUNT`
    pub amount: Option<String>,
    /// `intid`, the provider's transaction id.
    pub freekassa_id: Option<String>,
    /// `MERCHANT_ORDER_ID`, the merchant's own order id.
    pub payment_id: Option<String>,
    /// `P_EMAIL`
    pub email: Option<String>,
    /// `P_PHONE`
    pub phone: Option<String>,
    /// `CUR_ID`
    pub currency_id: Option<String>,
    /// `SIGN`
    pub sign: Option<String>,
    pub payer_account: Option<String>,
    /// `commission`
    pub commission: Option<String>,
    /// Every field whose name contains `us_`, keyed by its original name.
    pub custom_fields: BTreeMap<String, String>,
    secret2: String,
    ip: Option<IpAddr>,
}

impl Notification {
    /// Parses a decoded notification payload.
    ///
    /// `secret2` is the shop's second secret word. Pass `ip` to also require
    /// the request to come from a Freekassa server.
    pub fn new<I, K, V>(payload: I, secret2: impl Into<String>, ip: Option<IpAddr>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut notification = Self {
            shop_id: None,
            amount: None,
            freekassa_id: None,
            payment_id: None,
            email: None,
            phone: None,
            currency_id: None,
            sign: None,
            payer_account: None,
            commission: None,
            custom_fields: BTreeMap::new(),
            secret2: secret2.into(),
            ip,
        };

        for (key, value) in payload {
            let key = key.into();
            let value = value.into();
            if key.contains(CUSTOM_FIELD_MARKER) {
                notification.custom_fields.insert(key.clone(), value.clone());
            }
            let slot = match key.as_str() {
                "MERCHANT_ID" => &mut notification.shop_id,
                "AMOUNT" => &mut notification.amount,
                "intid" => &mut notification.freekassa_id,
                "MERCHANT_ORDER_ID" => &mut notification.payment_id,
                "P_EMAIL" => &mut notification.email,
                "P_PHONE" => &mut notification.phone,
                "CUR_ID" => &mut notification.currency_id,
                "SIGN" => &mut notification.sign,
                "payer_account" => &mut notification.payer_account,
                "commission" => &mut notification.commission,
                _ => continue,
            };
            *slot = Some(value);
        }

        notification
    }

    /// The observed source address, if one was supplied.
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    /// Returns the signature this notification should carry.
    pub fn expected_signature(&self) -> String {
        notification_signature(
            self.shop_id.as_deref().unwrap_or_default(),
            self.amount.as_deref().unwrap_or_default(),
            &self.secret2,
            self.payment_id.as_deref().unwrap_or_default(),
        )
    }

    pub fn check_signature(&self) -> Result<(), NotificationError> {
        let expected = self.expected_signature();
        let supplied = self.sign.as_deref().unwrap_or_default();
        if expected.as_bytes().ct_eq(supplied.as_bytes()).into() {
            Ok(())
        } else {
            Err(NotificationError::InvalidSignature)
        }
    }

    /// Checks the source address. Passes when no address was supplied.
    pub fn check_ip(&self) -> Result<(), NotificationError> {
        match self.ip {
            Some(ip) if !is_notification_ip(ip) => Err(NotificationError::IpNotAllowed(ip)),
            _ => Ok(()),
        }
    }

    /// Runs the IP check (if an address was supplied), then the signature
    /// check. Returns [`SUCCESS_MARKER`] when both pass.
    pub fn check(&self) -> Result<&'static str, NotificationError> {
        self.check_ip()?;
        self.check_signature()?;
        Ok(SUCCESS_MARKER)
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("shop_id", &self.shop_id)
            .field("amount", &self.amount)
            .field("freekassa_id", &self.freekassa_id)
            .field("payment_id", &self.payment_id)
            .field("currency_id", &self.currency_id)
            .field("custom_fields", &self.custom_fields)
            .field("ip", &self.ip)
            .finish_non_exhaustive()
    }
}
