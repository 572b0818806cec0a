//! Deep link router for htnx
//!
//! Maps explorer-style links onto the two views the client has.
//!
//! ## Supported Routes
//!
//! - `htnx://txs/<id>` - Transaction details
//! - `htnx://home` or `htnx://` - Network dashboard
//!
//! ## Accepted Formats
//!
//! - Case-insensitive scheme with slash variants: `HTNX://`, `htnx:/`, `htnx:////`
//! - Explorer web links: `https://explorer.example/txs/<id>`
//! - Path and hash forms: `/txs/<id>`, `#/txs/<id>`
//! - A bare 64-character hex transaction id
//!
//! Query strings and fragments are stripped before matching.

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(i) => &s[..i],
        None => s,
    }
}

#[inline]
fn trim_leading_slashes(mut s: &str) -> &str {
    while let Some(rest) = s.strip_prefix('/') {
        s = rest;
    }
    s
}

/// Extract path after the htnx scheme (case-insensitive, handles variants)
#[inline]
fn after_htnx_scheme(raw: &str) -> Option<&str> {
    let (scheme, rest) = raw.split_once(':')?;
    if scheme.eq_ignore_ascii_case("htnx") {
        Some(trim_leading_slashes(rest))
    } else {
        None
    }
}

/// Path of an http(s) link with the host removed
#[inline]
fn after_web_origin(raw: &str) -> Option<&str> {
    let (scheme, rest) = raw.split_once("://")?;
    if !(scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")) {
        return None;
    }
    Some(rest.find('/').map(|i| &rest[i + 1..]).unwrap_or(""))
}

fn is_tx_id(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Network stats dashboard
    Dashboard,
    /// Transaction details
    Tx { id: String },
}

/// Parse a route from the formats listed in the module docs.
///
/// Returns `None` for links that point at pages this client does not have.
pub fn parse(raw: &str) -> Option<Route> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(Route::Dashboard);
    }
    if is_tx_id(s) {
        return Some(tx_route(s));
    }

    let path = if let Some(rest) = after_htnx_scheme(s) {
        rest
    } else if let Some(rest) = after_web_origin(s) {
        rest
    } else if let Some(rest) = s.strip_prefix("#/") {
        rest
    } else if let Some(rest) = s.strip_prefix('/') {
        rest
    } else {
        return None;
    };

    let path = strip_query_frag(path);
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    let page = segments.next().unwrap_or("").to_ascii_lowercase();
    match page.as_str() {
        "" | "home" => Some(Route::Dashboard),
        "txs" | "tx" => {
            let id = segments.next()?;
            Some(tx_route(id))
        }
        _ => None,
    }
}

/// Hex ids are case-insensitive; anything else is passed through for the backend to reject
fn tx_route(id: &str) -> Route {
    let id = if is_tx_id(id) { id.to_ascii_lowercase() } else { id.to_string() };
    Route::Tx { id }
}
