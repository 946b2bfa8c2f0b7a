//! argentum-powtool
//!
//! Operator tool for inspecting Argentum proof-of-work rules offline.
//!
//! Usage:
//!   argentum-powtool decode-bits <bits>
//!   argentum-powtool algo        <version>
//!   argentum-powtool next-work   --chain <fixture.json> [--algo <name>]
//!   argentum-powtool check       --header <header.json> [--best-height <n>]
//!
//! Global flags select the parameter set: `--network main|testnet|regtest`
//! or a full `--params <file.json>`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use argentum_consensus::{
    check_bits_range, check_header, next_work_required, RetargetAlgorithm, Target,
};
use argentum_core::{Algo, BlockHeader, ConsensusParams, Hash256, Network};
use argentum_crypto::HasherRegistry;

mod fixture;
use fixture::{load_chain, load_header, parse_u32};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "argentum-powtool",
    version,
    about = "Argentum proof-of-work toolkit: compact bits, retargets, header checks"
)]
struct Args {
    /// Network whose consensus parameters apply.
    #[arg(long, global = true, default_value = "main")]
    network: Network,

    /// Load consensus parameters from a JSON file instead of a preset.
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Log per-retarget diagnostics.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode compact bits and range-check them against the pow limit.
    DecodeBits {
        /// Compact bits, hex (0x1e0ffff0) or decimal.
        bits: String,
    },

    /// Show what a block version field encodes.
    Algo {
        /// Version, hex (0x20000a02) or decimal.
        version: String,
    },

    /// Compute the bits required of the block after a fixture chain's tip.
    NextWork {
        /// JSON array of `{version, time, bits}` blocks, oldest first.
        #[arg(long)]
        chain: PathBuf,
        /// Algorithm of the candidate block (defaults to the tip's).
        #[arg(long)]
        algo: Option<Algo>,
    },

    /// Hash a header with its algorithm and verify its proof of work.
    Check {
        /// Header JSON (`version`, `prev_block`, `merkle_root`, `time`, `bits`, `nonce`).
        #[arg(long)]
        header: PathBuf,
        /// Best-chain height the node would verify at.
        #[arg(long, default_value_t = u32::MAX)]
        best_height: u32,
    },
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "info,argentum=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let params = match &args.params {
        Some(path) => ConsensusParams::from_json_file(path)
            .with_context(|| format!("loading params from {}", path.display()))?,
        None => ConsensusParams::for_network(args.network).clone(),
    };
    debug!(network = %args.network, custom = args.params.is_some(), "consensus params ready");

    match args.command {
        Command::DecodeBits { bits } => cmd_decode_bits(&bits, &params),
        Command::Algo { version } => cmd_algo(&version),
        Command::NextWork { chain, algo } => cmd_next_work(&chain, algo, &params),
        Command::Check {
            header,
            best_height,
        } => cmd_check(&header, best_height, &params),
    }
}

// ── Commands ─────────────────────────────────────────────────────────────────

fn cmd_decode_bits(bits: &str, params: &ConsensusParams) -> anyhow::Result<()> {
    let bits = parse_u32(bits)?;
    let decoded = Target::from_compact(bits);

    println!("Bits:      {bits:#010x}");
    println!("Target:    {}", decoded.target);
    println!("Negative:  {}", decoded.negative);
    println!("Overflow:  {}", decoded.overflow);
    println!("Canonical: {:#010x}", decoded.target.to_compact());
    match check_bits_range(bits, params) {
        Ok(_) => println!("Range:     ok (limit {})", Target::limit(params)),
        Err(e) => println!("Range:     rejected: {e}"),
    }
    Ok(())
}

fn cmd_algo(version: &str) -> anyhow::Result<()> {
    let raw = parse_u32(version)?;
    let header = BlockHeader {
        version: raw as i32,
        prev_block: Hash256::ZERO,
        merkle_root: Hash256::ZERO,
        time: 0,
        bits: 0,
        nonce: 0,
    };

    println!("Version:      {:#010x}", raw);
    println!("Algorithm:    {} (tag {})", header.algo(), header.algo().tag());
    println!("Base version: {}", header.base_version());
    println!("Chain id:     {}", header.chain_id());
    println!("AuxPoW:       {}", header.is_auxpow());
    Ok(())
}

fn cmd_next_work(
    chain_path: &Path,
    algo: Option<Algo>,
    params: &ConsensusParams,
) -> anyhow::Result<()> {
    let chain = load_chain(chain_path)?;
    let tip = chain.tip().context("fixture chain is empty")?;
    let algo = algo.unwrap_or_else(|| tip.algo());
    info!(blocks = chain.len(), tip = tip.height, %algo, "loaded chain fixture");

    let regime = RetargetAlgorithm::for_height(tip.height, params);
    let bits = next_work_required(&chain, Some(tip), algo, params);

    println!("Tip height: {}", tip.height);
    println!("Next block: {} ({})", tip.height + 1, algo);
    println!("Retarget:   {regime}");
    println!("Bits:       {bits:#010x}");
    println!("Target:     {}", Target::from_compact(bits).target);
    Ok(())
}

fn cmd_check(
    header_path: &Path,
    best_height: u32,
    params: &ConsensusParams,
) -> anyhow::Result<()> {
    let header = load_header(header_path)?;
    let hashers = HasherRegistry::with_builtin();
    let algo = header.algo();

    println!("Block:     {}", header.hash());
    println!("Algorithm: {algo}");
    println!("Bits:      {:#010x}", header.bits);

    let pow = check_header(&header, &hashers, params, best_height)
        .with_context(|| format!("{algo} proof of work rejected"))?;
    println!("PoW hash:  {pow}");
    println!("Result:    valid");
    Ok(())
}
