//! Bitcoin network definitions and address-encoding parameters.

/// Bitcoin network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Bitcoin mainnet
    Mainnet,
    /// Bitcoin testnet (testnet3 and testnet4 share address parameters)
    Testnet,
    /// Bitcoin signet
    Signet,
    /// Local regression test network
    Regtest,
}

impl Network {
    /// All supported networks.
    pub const ALL: [Network; 4] = [
        Network::Mainnet,
        Network::Testnet,
        Network::Signet,
        Network::Regtest,
    ];

    /// Get the Bech32 human-readable part for this network.
    pub fn bech32_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "bc",
            Network::Testnet | Network::Signet => "tb",
            Network::Regtest => "bcrt",
        }
    }

    /// Get the version byte for P2PKH addresses.
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet | Network::Signet | Network::Regtest => 0x6f,
        }
    }

    /// Get the version byte for P2SH addresses.
    pub fn p2sh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            Network::Testnet | Network::Signet | Network::Regtest => 0xc4,
        }
    }

    /// Parse network from a name such as `"mainnet"` or `"testnet4"`.
    pub fn from_name(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "mainnet" | "main" | "bitcoin" => Some(Network::Mainnet),
            "testnet" | "testnet3" | "testnet4" | "test" => Some(Network::Testnet),
            "signet" => Some(Network::Signet),
            "regtest" => Some(Network::Regtest),
            _ => None,
        }
    }

    /// Get network name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Mainnet => "Bitcoin Mainnet",
            Network::Testnet => "Bitcoin Testnet",
            Network::Signet => "Bitcoin Signet",
            Network::Regtest => "Bitcoin Regtest",
        }
    }
}

impl core::fmt::Display for Network {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}
