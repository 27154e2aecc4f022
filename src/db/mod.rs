pub mod audit;
pub mod clients;
pub mod leads;
pub mod projects;
pub mod users;

/// Escape LIKE wildcards in user-supplied search input (backslash is the
/// default escape character in Postgres).
pub(crate) fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
