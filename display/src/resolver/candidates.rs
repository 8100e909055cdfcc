//! Candidate addresses for the endpoint-file lookup and for active probing.

use floorboard_common::net::LOOPBACK_HOSTS;

/// `(host, port)` pairs to look for the published endpoint file on: loopback only,
/// host-major.
#[must_use]
pub fn endpoint_file_candidates(ports: &[u16]) -> Vec<(String, u16)> {
    cartesian(LOOPBACK_HOSTS.iter().map(ToString::to_string), ports)
}

/// `(host, port)` pairs to probe, host-major and deduplicated.
///
/// With `loopback_first` the loopback aliases lead, otherwise they trail after the page host
/// and the detected local addresses.
#[must_use]
pub fn probe_candidates(
    page_host: Option<&str>,
    local_hosts: &[String],
    loopback_first: bool,
    ports: &[u16],
) -> Vec<(String, u16)> {
    let loopback = LOOPBACK_HOSTS.iter().map(ToString::to_string);
    let network = page_host
        .map(ToString::to_string)
        .into_iter()
        .chain(local_hosts.iter().cloned());

    let ordered: Vec<String> = if loopback_first {
        loopback.chain(network).collect()
    } else {
        network.chain(loopback).collect()
    };

    let mut hosts: Vec<String> = Vec::with_capacity(ordered.len());
    for host in ordered {
        if !host.is_empty() && !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    cartesian(hosts, ports)
}

fn cartesian<I: IntoIterator<Item = String>>(hosts: I, ports: &[u16]) -> Vec<(String, u16)> {
    hosts
        .into_iter()
        .flat_map(|host| ports.iter().map(move |port| (host.clone(), *port)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(candidates: &[(String, u16)]) -> Vec<&str> {
        let mut hosts: Vec<&str> = Vec::new();
        for (host, _) in candidates {
            if hosts.last() != Some(&host.as_str()) {
                hosts.push(host);
            }
        }
        hosts
    }

    #[test]
    fn file_candidates_are_loopback_only() {
        let candidates = endpoint_file_candidates(&[1337, 1338]);
        assert_eq!(
            candidates,
            vec![
                ("localhost".to_string(), 1337),
                ("localhost".to_string(), 1338),
                ("127.0.0.1".to_string(), 1337),
                ("127.0.0.1".to_string(), 1338),
            ]
        );
    }

    #[test]
    fn loopback_first_ordering() {
        let local = vec!["192.168.1.5".to_string()];
        let candidates = probe_candidates(Some("dash.lan"), &local, true, &[1337]);
        assert_eq!(
            hosts(&candidates),
            ["localhost", "127.0.0.1", "dash.lan", "192.168.1.5"]
        );
    }

    #[test]
    fn network_first_ordering_and_dedup() {
        let local = vec!["192.168.1.5".to_string(), "localhost".to_string()];
        let candidates = probe_candidates(Some("192.168.1.5"), &local, false, &[1337, 1338]);
        assert_eq!(hosts(&candidates), ["192.168.1.5", "localhost", "127.0.0.1"]);
        assert_eq!(candidates.len(), 6);
    }
}
