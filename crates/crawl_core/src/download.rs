/// Server route that streams an artifact; the file name is its last segment.
pub const DOWNLOAD_ROUTE: [&str; 2] = ["api", "download"];

/// Final path segment of a server-side result path.
///
/// Both `/` and `\` are separators, since the server may run on either
/// convention.
pub fn result_filename(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}
