use stencil_constants::LATEST_TAG;

/// Splits `name@version` into its parts, defaulting the version to `latest`.
/// Scoped names keep their leading `@` (`@acme/tmpl@1.0.0`).
#[must_use]
pub fn parse_pkg_spec(spec: &str) -> (String, String) {
    let (scope_prefix, rest) = match spec.strip_prefix('@') {
        Some(rest) if rest.contains('/') => ("@", rest),
        _ => ("", spec),
    };

    match rest.split_once('@') {
        Some((n, v)) if !n.is_empty() && !v.is_empty() => {
            (format!("{scope_prefix}{n}"), v.to_string())
        }
        Some((n, _)) if !n.is_empty() => (format!("{scope_prefix}{n}"), LATEST_TAG.to_string()),
        _ => (spec.to_string(), LATEST_TAG.to_string()),
    }
}
