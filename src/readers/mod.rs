//! Protocol-specific reader implementations

pub mod bitcoin;
pub mod ethereum;
pub mod price;
pub mod solana;

pub use bitcoin::BitcoinReader;
pub use ethereum::EthereumReader;
pub use price::PriceReader;
pub use solana::SolanaReader;
