//! Core domain types for the ESR protocol client.

use serde::{Deserialize, Serialize};

/// Token amount in smallest integer subunits.
pub type Balance = u128;

/// Decimals of the ESR token (staking and emission asset).
pub const ESR_DECIMALS: u8 = 18;
/// Decimals of the LP tokens accepted by the farming pools.
pub const LP_DECIMALS: u8 = 18;
/// Decimals of the fee/reward asset (USDT).
pub const FEE_ASSET_DECIMALS: u8 = 6;

/// Supported networks - exhaustive match required (no default case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Ethereum,
    Bsc,
    Polygon,
    Sepolia,
    BscTestnet,
    Amoy,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Ethereum => 1,
            Network::Bsc => 56,
            Network::Polygon => 137,
            Network::Sepolia => 11_155_111,
            Network::BscTestnet => 97,
            Network::Amoy => 80_002,
        }
    }

    pub fn is_testnet(&self) -> bool {
        match self {
            Network::Ethereum | Network::Bsc | Network::Polygon => false,
            Network::Sepolia | Network::BscTestnet | Network::Amoy => true,
        }
    }

    /// Returns all known networks.
    pub fn all() -> &'static [Network] {
        &[
            Network::Ethereum,
            Network::Bsc,
            Network::Polygon,
            Network::Sepolia,
            Network::BscTestnet,
            Network::Amoy,
        ]
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Ethereum => write!(f, "Ethereum"),
            Network::Bsc => write!(f, "BNB Chain"),
            Network::Polygon => write!(f, "Polygon"),
            Network::Sepolia => write!(f, "Sepolia"),
            Network::BscTestnet => write!(f, "BNB Testnet"),
            Network::Amoy => write!(f, "Amoy"),
        }
    }
}

/// 20-byte account address, rendered as 0x-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Truncated form for table cells: `0x1234..abcd`.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}..{}", &full[..6], &full[full.len() - 4..])
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;
        if hex_part.len() != 40 {
            return Err(AddressError::BadLength(hex_part.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut bytes).map_err(|_| AddressError::BadHex)?;
        Ok(Address(bytes))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,
    #[error("address must be 40 hex characters, got {0}")]
    BadLength(usize),
    #[error("address contains non-hex characters")]
    BadHex,
}

/// Connection status for the router client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error(String),
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Connecting => write!(f, "Connecting"),
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

/// Explicit per-call context: which account against which network.
///
/// Passed to every refresh and mutating operation instead of being read
/// from a process-wide global, so tests can inject arbitrary combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainContext {
    pub account: Option<Address>,
    pub network: Network,
}

impl ChainContext {
    pub fn new(network: Network, account: Option<Address>) -> Self {
        Self { account, network }
    }

    pub fn anonymous(network: Network) -> Self {
        Self {
            account: None,
            network,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_chain_ids() {
        assert_eq!(Network::Ethereum.chain_id(), 1);
        assert_eq!(Network::Bsc.chain_id(), 56);
        assert_eq!(Network::Polygon.chain_id(), 137);
        assert_eq!(Network::Sepolia.chain_id(), 11_155_111);
        assert_eq!(Network::BscTestnet.chain_id(), 97);
        assert_eq!(Network::Amoy.chain_id(), 80_002);
    }

    #[test]
    fn test_network_testnet_flag() {
        assert!(!Network::Ethereum.is_testnet());
        assert!(!Network::Bsc.is_testnet());
        assert!(!Network::Polygon.is_testnet());
        assert!(Network::Sepolia.is_testnet());
        assert!(Network::BscTestnet.is_testnet());
        assert!(Network::Amoy.is_testnet());
    }

    #[test]
    fn test_network_all() {
        let all = Network::all();
        assert_eq!(all.len(), 6);
        assert!(all.contains(&Network::Ethereum));
        assert!(all.contains(&Network::Amoy));
    }

    #[test]
    fn test_address_roundtrip() {
        let s = "0x00112233445566778899aabbccddeeff00112233";
        let addr: Address = s.parse().unwrap();
        assert_eq!(addr.to_string(), s);
    }

    #[test]
    fn test_address_rejects_missing_prefix() {
        let err = "00112233445566778899aabbccddeeff00112233"
            .parse::<Address>()
            .unwrap_err();
        assert_eq!(err, AddressError::MissingPrefix);
    }

    #[test]
    fn test_address_rejects_bad_length() {
        let err = "0x0011".parse::<Address>().unwrap_err();
        assert_eq!(err, AddressError::BadLength(4));
    }

    #[test]
    fn test_address_rejects_non_hex() {
        let err = "0xzz112233445566778899aabbccddeeff00112233"
            .parse::<Address>()
            .unwrap_err();
        assert_eq!(err, AddressError::BadHex);
    }

    #[test]
    fn test_address_short() {
        let addr: Address = "0x00112233445566778899aabbccddeeff00112233"
            .parse()
            .unwrap();
        assert_eq!(addr.short(), "0x0011..2233");
    }

    #[test]
    fn test_context_equality_drives_invalidation() {
        let a: Address = "0x00112233445566778899aabbccddeeff00112233"
            .parse()
            .unwrap();
        let ctx1 = ChainContext::new(Network::Sepolia, Some(a));
        let ctx2 = ChainContext::new(Network::Sepolia, Some(a));
        let ctx3 = ChainContext::new(Network::BscTestnet, Some(a));
        assert_eq!(ctx1, ctx2);
        assert_ne!(ctx1, ctx3);
        assert_ne!(ctx1, ChainContext::anonymous(Network::Sepolia));
    }
}
