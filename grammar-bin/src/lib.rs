pub mod cli;
mod codec;

use cli::{Cli, EngineArg};
use grammar_core::{CompressorConfig, Engine, EngineKind, GrammarError, ScoreMode, Sequence};
use tracing::info;

const MIN_RAM_CAP_MB: f64 = 60.0;

pub fn run(cli: Cli) -> grammar_types::Result<()> {
    if let Some(ram_cap) = cli.ram_cap_mb {
        if ram_cap < MIN_RAM_CAP_MB {
            return Err(GrammarError::ConfigurationError {
                reason: format!("-r {ram_cap} is below the minimum of {MIN_RAM_CAP_MB} MB"),
            });
        }
    }

    let input = std::fs::read(&cli.infile).map_err(|source| GrammarError::IoError { path: cli.infile.clone(), source })?;
    let (format_flag, symbols) = codec::decode_input(&input);
    let score_mode = ScoreMode::from_format_flag(format_flag);
    info!(format_flag, cap_encoded = codec::is_cap_encoded(format_flag), len = symbols.len(), "decoded input");

    let alphabet_size = 256u32;
    let sequence = Sequence::new(symbols);

    let config = CompressorConfig {
        engine: match cli.engine {
            EngineArg::Pair => EngineKind::Pair,
            EngineArg::Longest => EngineKind::Longest,
        },
        production_cost_override: cli.production_cost,
        alpha: cli.profit_ratio_power.unwrap_or_else(|| score_mode.default_alpha()),
        word_mode: !cli.disable_word_mode,
        score_mode,
        ..CompressorConfig::default()
    };

    let engine = Engine::new(config);
    let (rules, residual, stats) = engine.compress(alphabet_size, sequence)?;

    let output = codec::encode_output(residual.as_slice(), &rules, alphabet_size);
    std::fs::write(&cli.outfile, &output).map_err(|source| GrammarError::IoError { path: cli.outfile.clone(), source })?;

    info!(
        rules = stats.rules_emitted,
        residual = stats.residual_symbols,
        ratio = stats.compression_ratio(),
        output_bytes = output.len(),
        "wrote compressed output"
    );
    Ok(())
}
