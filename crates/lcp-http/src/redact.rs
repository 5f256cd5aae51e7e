//! Masking of sensitive fields in request payloads before they are logged.
//!
//! Only these fields are touched:
//!
//! | Field | Masked as |
//! |-------|-----------|
//! | `billingInfo.cardNumber` | all but the last four digits replaced with `X` |
//! | `billingInfo.securityCode` | `XXX` |
//! | `password` (top level) | `XXX` |

use serde_json::Value;

use crate::error::MaskError;

/// Replacement for short secrets such as passwords and security codes.
pub const MASKED: &str = "XXX";

const LAST_DIGITS: usize = 4;
const BIN_DIGITS: usize = 6;

/// Mask all but the last four digits of a card number with `X`.
///
/// # Errors
///
/// Returns [`MaskError::InsufficientDigits`] when fewer than four digits are present.
///
/// # Examples
///
/// ```
/// use lcp_http::redact::mask_card_number;
///
/// assert_eq!(mask_card_number("4111111111111111").unwrap(), "XXXXXXXXXXXX1111");
/// ```
pub fn mask_card_number(number: &str) -> Result<String, MaskError> {
    let digits: Vec<char> = number.chars().collect();
    if digits.len() < LAST_DIGITS {
        return Err(MaskError::InsufficientDigits {
            required: LAST_DIGITS,
            found: digits.len(),
        });
    }
    let split = digits.len() - LAST_DIGITS;
    let mut masked = "X".repeat(split);
    masked.extend(&digits[split..]);
    Ok(masked)
}

/// Mask all but the BIN (first six digits) and the last four digits with `X`.
///
/// # Errors
///
/// Returns [`MaskError::InsufficientDigits`] when fewer than ten digits are present.
///
/// # Examples
///
/// ```
/// use lcp_http::redact::mask_card_number_with_bin;
///
/// assert_eq!(mask_card_number_with_bin("4111111111111111").unwrap(), "411111XXXXXX1111");
/// ```
pub fn mask_card_number_with_bin(number: &str) -> Result<String, MaskError> {
    let digits: Vec<char> = number.chars().collect();
    let required = BIN_DIGITS + LAST_DIGITS;
    if digits.len() < required {
        return Err(MaskError::InsufficientDigits {
            required,
            found: digits.len(),
        });
    }
    let tail = digits.len() - LAST_DIGITS;
    let mut masked: String = digits[..BIN_DIGITS].iter().collect();
    masked.push_str(&"X".repeat(tail - BIN_DIGITS));
    masked.extend(&digits[tail..]);
    Ok(masked)
}

/// Return a copy of `data` with the `billingInfo` card fields masked.
///
/// Non-object values are returned unchanged. A `null` card number stays `null`;
/// a numeric one is masked as its decimal text.
///
/// # Errors
///
/// Returns a [`MaskError`] when the card number is too short to mask.
pub fn mask_billing_info(data: &Value) -> Result<Value, MaskError> {
    let mut copied = data.clone();
    if let Some(billing) = copied
        .get_mut("billingInfo")
        .and_then(Value::as_object_mut)
    {
        if let Some(card_number) = billing.get_mut("cardNumber") {
            let text = match &*card_number {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            };
            if let Some(text) = text {
                *card_number = Value::String(mask_card_number(&text)?);
            }
        }
        if let Some(security_code) = billing.get_mut("securityCode") {
            *security_code = Value::String(MASKED.to_owned());
        }
    }
    Ok(copied)
}

/// Return a copy of `data` with every sensitive field masked.
///
/// # Errors
///
/// Returns a [`MaskError`] when the card number is too short to mask.
///
/// # Examples
///
/// ```
/// use lcp_http::redact::mask_sensitive_data;
/// use serde_json::json;
///
/// let masked = mask_sensitive_data(&json!({"password": "hunter2", "name": "x"})).unwrap();
/// assert_eq!(masked, json!({"password": "XXX", "name": "x"}));
/// ```
pub fn mask_sensitive_data(data: &Value) -> Result<Value, MaskError> {
    let mut copied = mask_billing_info(data)?;
    if let Some(password) = copied.get_mut("password") {
        *password = Value::String(MASKED.to_owned());
    }
    Ok(copied)
}
