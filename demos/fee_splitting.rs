//! Fee splitting and ether conversion examples

use feedback_core::fees::wei::{format_ether, parse_ether};
use feedback_core::fees::{FeeSplit, PLATFORM_FEE_BASIS_POINTS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("💰 Feedback Core - Fee Splitting Examples\n");

    println!(
        "Platform fee rate: {} basis points ({}%)\n",
        PLATFORM_FEE_BASIS_POINTS,
        PLATFORM_FEE_BASIS_POINTS as f64 / 100.0
    );

    // 1. Splits across a range of gross amounts
    println!("📊 Splits for sample gross amounts (wei):");
    for gross in [0u128, 199, 200, 1_000, 1_000_000, 1_000_000_000_000_000_000] {
        let split = FeeSplit::compute(gross);
        println!(
            "  gross {:>22} => fee {:>18}, net {:>22}",
            split.gross, split.fee, split.net
        );
        assert_eq!(split.fee + split.net, split.gross);
    }
    println!();

    // 2. Sub-fee transfers floor to zero
    println!("🔍 Floor semantics:");
    let tiny = FeeSplit::compute(199);
    println!(
        "  199 wei is below the 200 wei fee threshold: fee = {}, net = {}",
        tiny.fee, tiny.net
    );
    println!();

    // 3. Ether string conversions at the caller boundary
    println!("🔄 Decimal ether conversions:");
    for input in ["1", "0.5", "0.000000000000000001", "12.75"] {
        let wei = parse_ether(input)?;
        println!("  {:>22} ETH = {:>22} wei (round-trips to {})", input, wei, format_ether(wei));
    }
    println!();

    // 4. Rejected inputs
    println!("❌ Rejected amounts:");
    for bad in ["-1", "abc", "0.0000000000000000001"] {
        match parse_ether(bad) {
            Ok(_) => println!("  {bad:?} unexpectedly accepted"),
            Err(e) => println!("  {bad:?}: {e}"),
        }
    }
    println!();

    // 5. A full payment worked end to end
    println!("🧾 Payment walkthrough:");
    let gross = parse_ether("2.5")?;
    let split = FeeSplit::compute(gross);
    println!("  Responder sends:   {} ETH", format_ether(split.gross));
    println!("  Platform withholds: {} ETH", format_ether(split.fee));
    println!("  Owner receives:    {} ETH", format_ether(split.net));

    println!("\n🎉 Fee splitting examples completed successfully!");
    Ok(())
}
