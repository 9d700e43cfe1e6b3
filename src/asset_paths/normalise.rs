/// Produce the canonical form of an asset path.
///
/// The result always uses forward slashes and carries no leading `./` or `/`, so manifests
/// authored on any platform compare equal to the paths found on disk.
pub fn normalise_asset_path(path: &str) -> String {
    let mut value = path.trim().replace('\\', "/");

    loop {
        if let Some(rest) = value.strip_prefix("./") {
            value = rest.to_string();
        } else if let Some(rest) = value.strip_prefix('/') {
            value = rest.to_string();
        } else {
            break;
        }
    }

    value
}
