use crate::common::run_captured;
use log::debug;
use serde::Serialize;

/// Minimum Node.js major version OpenClaw supports
pub const DEFAULT_MIN_NODE_MAJOR: u32 = 22;

/// Result of the Node.js runtime check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCheck {
    pub ok: bool,
    pub found_version: String,
    pub found_major: u32,
    pub minimum_major: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

/// Extract the major component of `vMAJOR.MINOR.PATCH` or `MAJOR.MINOR.PATCH`
pub fn parse_node_major(version: &str) -> Option<u32> {
    let clean = version.trim();
    let clean = clean.strip_prefix('v').unwrap_or(clean);
    clean.split('.').next()?.parse().ok()
}

/// Compare a reported version against the required major
pub fn evaluate_node_version(found_version: &str, minimum_major: u32) -> NodeCheck {
    let found_major = parse_node_major(found_version);
    let ok = found_major.is_some_and(|major| major >= minimum_major);

    NodeCheck {
        ok,
        found_version: found_version.trim().to_string(),
        found_major: found_major.unwrap_or(0),
        minimum_major,
        guidance: (!ok).then(|| guidance(minimum_major)),
    }
}

/// Run `node --version` and check it against `minimum_major`
pub async fn check_node(minimum_major: u32) -> NodeCheck {
    match run_captured("node", &["--version"], None).await {
        Ok(output) if output.success() => evaluate_node_version(&output.stdout, minimum_major),
        Ok(output) => {
            debug!("node --version exited with {:?}: {}", output.code, output.stderr.trim());
            not_found(minimum_major)
        }
        Err(e) => {
            debug!("node is not available: {}", e);
            not_found(minimum_major)
        }
    }
}

fn not_found(minimum_major: u32) -> NodeCheck {
    NodeCheck {
        ok: false,
        found_version: "not found".to_string(),
        found_major: 0,
        minimum_major,
        guidance: Some(guidance(minimum_major)),
    }
}

fn guidance(minimum_major: u32) -> String {
    format!(
        "Node.js {m}+ is required. Install with nvm: nvm install {m} && nvm use {m}",
        m = minimum_major
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_node_major() {
        assert_eq!(parse_node_major("v22.5.1"), Some(22));
        assert_eq!(parse_node_major("20.12.0"), Some(20));
        assert_eq!(parse_node_major("v18.19.0\n"), Some(18));
        assert_eq!(parse_node_major("garbage"), None);
        assert_eq!(parse_node_major(""), None);
    }

    #[test]
    fn test_evaluate_node_version() {
        let check = evaluate_node_version("v22.5.1", 22);
        assert!(check.ok);
        assert_eq!(check.found_major, 22);
        assert!(check.guidance.is_none());

        let check = evaluate_node_version("v20.12.0", 22);
        assert!(!check.ok);
        assert_eq!(check.found_major, 20);
        assert_eq!(
            check.guidance.as_deref(),
            Some("Node.js 22+ is required. Install with nvm: nvm install 22 && nvm use 22")
        );
    }

    proptest! {
        #[test]
        fn major_is_extracted(
            major in 0u32..1000,
            minor in 0u32..100,
            patch in 0u32..100,
            prefixed in any::<bool>(),
        ) {
            let prefix = if prefixed { "v" } else { "" };
            let version = format!("{}{}.{}.{}", prefix, major, minor, patch);
            prop_assert_eq!(parse_node_major(&version), Some(major));
        }
    }
}
