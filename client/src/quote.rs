//! Jupiter quote adapter: sizes a stablecoin output for a SOL deposit.

use serde_json::Value;

pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

const SLIPPAGE_BPS: u16 = 10;

/// USDC base units quoted for `lamports` of SOL, or `None` when no usable
/// quote is available. `None` means "quote unavailable", never zero; callers
/// must not settle or mint against it.
pub fn quote_usdc_out(quote_url: &str, lamports: u64) -> Option<u64> {
    let amount = lamports.to_string();
    let slippage = SLIPPAGE_BPS.to_string();
    let response = reqwest::blocking::Client::new()
        .get(quote_url)
        .query(&[
            ("inputMint", WSOL_MINT),
            ("outputMint", USDC_MINT),
            ("amount", amount.as_str()),
            ("slippageBps", slippage.as_str()),
        ])
        .send()
        .ok()?;
    let body: Value = response.json().ok()?;
    parse_out_amount(&body)
}

/// `outAmount` arrives as an integer-as-string on mainnet but some gateways
/// return a bare number; accept both, reject anything non-positive.
fn parse_out_amount(body: &Value) -> Option<u64> {
    let out = body.get("outAmount")?;
    let amount = match out {
        Value::String(s) => s.parse::<u64>().ok()?,
        Value::Number(n) => n.as_u64()?,
        _ => return None,
    };
    (amount > 0).then_some(amount)
}
