#![deny(missing_docs)]

//! # HTTP Constant Tables
//!
//! Pure lookup tables: verb normalization, status code rendering for
//! generated code, status names for constructor naming, and canonical
//! header-key casing.

/// Normalizes an HTTP verb to its canonical upper-case form.
pub fn canonical_verb(method: &str) -> String {
    method.to_ascii_uppercase()
}

/// Returns the symbolic `StatusCode` constant rendered in generated code,
/// falling back to a numeric construction for uncommon codes.
pub fn status_const(code: u16) -> String {
    match status_ident(code) {
        Some(name) => format!("StatusCode::{}", name.to_ascii_uppercase().replace(' ', "_")),
        None => format!("StatusCode::from_u16({}).unwrap()", code),
    }
}

/// Returns the UpperCamelCase status name used in constructor names
/// (e.g. `Accepted` for 202), or the bare code for uncommon codes.
pub fn status_name(code: u16) -> String {
    match status_ident(code) {
        Some(name) => name.split(' ').collect::<Vec<_>>().join(""),
        None => format!("Status{}", code),
    }
}

fn status_ident(code: u16) -> Option<&'static str> {
    Some(match code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "Ok",
        201 => "Created",
        202 => "Accepted",
        203 => "Non Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return None,
    })
}

/// Returns the canonical casing of an HTTP header key: the first letter
/// and every letter following a hyphen upper-cased, everything else
/// lower-cased (`content-type` becomes `Content-Type`). Keys containing
/// characters outside the token alphabet are returned unchanged.
pub fn canonical_header_key(key: &str) -> String {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len());
    let mut upper = true;
    for c in key.chars() {
        if c == '-' {
            out.push(c);
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}
