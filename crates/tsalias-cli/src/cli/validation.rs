use tsalias_core::PackageManager;

/// One `--alias PATTERN=PATH[,PATH...]` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasArg {
    pub pattern: String,
    pub paths: Vec<String>,
}

/// Parse `PATTERN=PATH[,PATH...]`.
///
/// Whitespace around each part is trimmed and empty paths are dropped.
/// Characters the config files cannot hold are checked later by the setup
/// itself.
pub fn parse_alias(s: &str) -> Result<AliasArg, String> {
    let (pattern, paths) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected PATTERN=PATH[,PATH...], got '{}'", s))?;

    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err("Alias pattern cannot be empty".to_string());
    }

    let paths: Vec<String> = paths
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();
    if paths.is_empty() {
        return Err(format!("Alias '{}' needs at least one path", pattern));
    }

    Ok(AliasArg {
        pattern: pattern.to_string(),
        paths,
    })
}

pub fn parse_package_manager(s: &str) -> Result<PackageManager, String> {
    s.parse()
}
