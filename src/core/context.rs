//! Startup context shared by every tool.
//!
//! The context is built once from the process arguments (and the `API_KEY`
//! environment variable) before any tool is registered. It is immutable and
//! handed to each tool as an `Arc<ServerContext>`.

use std::collections::BTreeMap;

/// Name of the argument / environment variable carrying the credential.
pub const API_KEY_PARAM: &str = "API_KEY";

/// Immutable startup context: optional credential plus passthrough parameters.
#[derive(Clone, Default)]
pub struct ServerContext {
    /// Opaque credential. Only its presence is ever reported.
    api_key: Option<String>,

    /// `--key=value` arguments, echoed into diagnostics without interpretation.
    params: BTreeMap<String, String>,
}

/// Custom Debug implementation to redact the credential from logs.
impl std::fmt::Debug for ServerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerContext")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("params", &self.params)
            .finish()
    }
}

impl ServerContext {
    /// Build the context from the current process arguments and environment.
    pub fn from_process() -> Self {
        Self::from_args(
            std::env::args_os()
                .skip(1)
                .map(|arg| arg.to_string_lossy().into_owned()),
            std::env::var(API_KEY_PARAM).ok(),
        )
    }

    /// Build the context from an argument list and an optional environment credential.
    ///
    /// A `--API_KEY=...` argument wins over the environment value. The
    /// credential is removed from the passthrough parameters so it is never
    /// echoed back to clients.
    pub fn from_args<I, S>(args: I, env_api_key: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = parse_args(args);
        let api_key = params
            .remove(API_KEY_PARAM)
            .or_else(|| env_api_key.filter(|key| !key.is_empty()));

        Self { api_key, params }
    }

    /// The credential, if one was supplied.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Whether a credential was supplied.
    pub fn api_key_provided(&self) -> bool {
        self.api_key.is_some()
    }

    /// The passthrough parameters.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

/// Parse `--key=value` (or `—key=value`, em dash) arguments into a map.
///
/// The value is everything after the first `=`, with one pair of surrounding
/// quotes removed. Arguments with no key, no `=` or an empty value are ignored.
pub fn parse_args<I, S>(args: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .filter_map(|arg| parse_arg(arg.as_ref()))
        .collect()
}

fn parse_arg(arg: &str) -> Option<(String, String)> {
    let rest = arg
        .strip_prefix("--")
        .or_else(|| arg.strip_prefix('\u{2014}'))?;
    let (key, value) = rest.split_once('=')?;
    let value = strip_quotes(value);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key.to_string(), value.to_string()))
}

fn strip_quotes(value: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && is_quote(last) => {
            &value[first.len_utf8()..value.len() - last.len_utf8()]
        }
        _ => value,
    }
}
