// src/catalog/builtin.rs

//! Catalog used when neither `--task` nor `[catalog].tasks` is given: the
//! exchange collector scripts.

pub const DEFAULT_CATALOG: &[&str] = &[
    "biconomy.py",
    "bigone.py",
    "binance.py",
    "bitget.py",
    "bitmart.py",
    "bitrue.py",
    "btse.py",
    "bybit.py",
    "coinbase.py",
    "coinex.py",
    "coinw.py",
    "cryptocom.py",
    "deepcoin.py",
    "digifinex.py",
    "gateio.py",
    "gemini.py",
    "hashkeyglobal.py",
    "htx.py",
    "kraken.py",
    "kucoin.py",
    "lbank.py",
    "mexc.py",
    "okx.py",
    "pionex.py",
    "toobit.py",
    "whitebit.py",
];

pub fn default_catalog() -> Vec<String> {
    DEFAULT_CATALOG.iter().map(|s| s.to_string()).collect()
}
