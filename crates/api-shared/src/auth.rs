use std::net::IpAddr;

/// The client is not the allow-listed address.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("access denied for client {}", describe_client(.client))]
pub struct AccessDenied {
    pub client: Option<IpAddr>,
}

fn describe_client(client: &Option<IpAddr>) -> String {
    client
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".into())
}

/// Check a client address against an optional single allowed IP.
///
/// With no allowed IP configured every client passes. With one configured, only an exact match
/// passes; an unknown client address is rejected. IPv4-mapped IPv6 addresses are compared as
/// IPv4.
pub fn validate_client_ip(
    allowed: Option<IpAddr>,
    client: Option<IpAddr>,
) -> Result<(), AccessDenied> {
    let Some(allowed) = allowed else {
        return Ok(());
    };

    match client {
        Some(ip) if canonical(ip) == canonical(allowed) => Ok(()),
        _ => Err(AccessDenied { client }),
    }
}

fn canonical(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

/// Parse the optional allowed client IP. Missing or blank values disable the check.
pub fn allowed_ip_from_env_value(value: Option<String>) -> Result<Option<IpAddr>, String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    value
        .map(|v| {
            v.parse::<IpAddr>()
                .map_err(|e| format!("invalid allowed IP {v:?}: {e}"))
        })
        .transpose()
}
