//! Header value redaction.
//!
//! Nothing is redacted unless a [`Redactor`] is configured on the logger.

use http::{header, HeaderName};

/// Replacement for hidden secrets.
pub const MASK: &str = "████████████████████";

/// Rewrites header values before they are printed.
pub trait Redactor: Send + Sync {
    /// Returns the value to print instead of `value`, or `None` to print it unchanged.
    fn redact(&self, name: &HeaderName, value: &str) -> Option<String>;
}

struct FnRedactor<F>(F);

impl<F> Redactor for FnRedactor<F>
where
    F: Fn(&HeaderName, &str) -> Option<String> + Send + Sync,
{
    #[inline]
    fn redact(&self, name: &HeaderName, value: &str) -> Option<String> {
        (self.0)(name, value)
    }
}

/// Creates a [`Redactor`] from a closure.
pub fn fn_redactor<F>(f: F) -> impl Redactor
where
    F: Fn(&HeaderName, &str) -> Option<String> + Send + Sync,
{
    FnRedactor(f)
}

/// Masks credentials and cookie values.
///
/// - `Authorization`, `Proxy-Authorization`: the scheme is kept, the credentials are masked
/// - `Cookie`: every cookie keeps its name, the value is masked
/// - `Set-Cookie`: the cookie value is masked, the attributes are kept
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialRedactor;

impl Redactor for CredentialRedactor {
    fn redact(&self, name: &HeaderName, value: &str) -> Option<String> {
        if *name == header::AUTHORIZATION || *name == header::PROXY_AUTHORIZATION {
            return Some(mask_credentials(value));
        }

        if *name == header::COOKIE {
            return Some(mask_cookies(value));
        }

        if *name == header::SET_COOKIE {
            return Some(mask_set_cookie(value));
        }

        None
    }
}

fn mask_credentials(value: &str) -> String {
    match value.trim().split_once(' ') {
        Some((scheme, _)) => format!("{scheme} {MASK}"),
        None => MASK.to_string(),
    }
}

fn mask_cookie_pair(pair: &str) -> String {
    match pair.split_once('=') {
        Some((name, _)) => format!("{}={MASK}", name.trim()),
        None => MASK.to_string(),
    }
}

fn mask_cookies(value: &str) -> String {
    value.split(';').map(str::trim).filter(|pair| !pair.is_empty()).map(mask_cookie_pair).collect::<Vec<_>>().join("; ")
}

fn mask_set_cookie(value: &str) -> String {
    match value.split_once(';') {
        Some((pair, attributes)) => format!("{};{attributes}", mask_cookie_pair(pair)),
        None => mask_cookie_pair(value),
    }
}
