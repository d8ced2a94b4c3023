//! Router endpoint configuration per network.
//!
//! The router is the protocol's contract-facing service: it resolves
//! deployed contract addresses for its chain and exposes the read/write
//! operations the client consumes. Endpoints are tried in order at
//! connect time.

use esrdesk_core::Network;

/// Get the protocol router endpoints for a network.
pub fn get_router_endpoints(network: Network) -> &'static [&'static str] {
    match network {
        Network::Ethereum => &[
            "https://router.esrswap.io/eth",
            "https://router-backup.esrswap.io/eth",
        ],
        Network::Bsc => &[
            "https://router.esrswap.io/bsc",
            "https://router-backup.esrswap.io/bsc",
        ],
        Network::Polygon => &[
            "https://router.esrswap.io/polygon",
            "https://router-backup.esrswap.io/polygon",
        ],
        Network::Sepolia => &[
            "https://router.testnet.esrswap.io/sepolia",
            "https://router-backup.testnet.esrswap.io/sepolia",
        ],
        Network::BscTestnet => &[
            "https://router.testnet.esrswap.io/bsc-testnet",
            "https://router-backup.testnet.esrswap.io/bsc-testnet",
        ],
        Network::Amoy => &["https://router.testnet.esrswap.io/amoy"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_network_has_an_endpoint() {
        for network in Network::all() {
            assert!(!get_router_endpoints(*network).is_empty());
        }
    }
}
